// ============================================================
// KEYWORD DOMAIN LAYER
// ============================================================
// Core types and value objects for ranking-export extraction
// No I/O, no async

mod extraction_config;
mod keyword_record;
mod raw_row;

pub use extraction_config::{ColumnMapping, ExtractionConfig};
pub use keyword_record::{ExtractionResult, ExtractionStats, KeywordRecord};
pub use raw_row::RawRow;

pub type FieldMap = std::collections::HashMap<String, String>;
