mod app;
mod application;
mod domain;
mod infrastructure;
mod interfaces;

pub use app::run;
pub use application::{ExportedFile, KeywordExportUseCase, KeywordExtractionUseCase, SeoChatUseCase};
pub use domain::error::{AppError, Result};
pub use domain::keyword::{
    ColumnMapping, ExtractionConfig, ExtractionResult, ExtractionStats, KeywordRecord, RawRow,
};
pub use domain::llm_config::{LLMConfig, LLMProvider};
pub use infrastructure::config::{AppConfig, ServerConfig};
pub use infrastructure::csv::{decode_text, CsvDecoder, CsvWriter, RawRows, EXPORT_FILE_NAME};
pub use infrastructure::llm_clients::{LLMClient, OpenAIClient};
