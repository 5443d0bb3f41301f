pub mod keyword_export;
pub mod keyword_extraction;
pub mod seo_chat;
