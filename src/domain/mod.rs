pub mod error;
pub mod llm_config;

// Ranking export extraction
pub mod keyword;
