pub mod use_cases;

pub use use_cases::keyword_export::{ExportedFile, KeywordExportUseCase};
pub use use_cases::keyword_extraction::KeywordExtractionUseCase;
pub use use_cases::seo_chat::SeoChatUseCase;
