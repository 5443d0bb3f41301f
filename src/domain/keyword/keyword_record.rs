// ============================================================
// KEYWORD RECORD TYPES
// ============================================================
// Validated ranking rows and the output of one extraction run

use serde::{Deserialize, Serialize};

pub const UNKNOWN_KEYWORD: &str = "Unknown Keyword";
pub const NO_URL_PROVIDED: &str = "No URL Provided";

/// One validated ranking row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordRecord {
    pub keyword: String,
    pub position: u32,
    pub volume: u64,
    pub url: String,
}

impl KeywordRecord {
    /// Build a record, substituting placeholders for blank text fields
    pub fn new(keyword: &str, position: u32, volume: u64, url: &str) -> Self {
        let keyword = match keyword.trim() {
            "" => UNKNOWN_KEYWORD.to_string(),
            k => k.to_string(),
        };
        let url = match url.trim() {
            "" => NO_URL_PROVIDED.to_string(),
            u => u.to_string(),
        };

        Self {
            keyword,
            position,
            volume,
            url,
        }
    }
}

/// Per-run counters, allocated fresh for every extraction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionStats {
    /// Records read after the header line
    pub rows_read: u64,

    /// Records dropped for missing essential fields
    pub rows_skipped: u64,

    /// Records that landed in the fruit set
    pub fruit_count: u64,
}

/// Result of one extraction run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Records ranking inside the configured page-2 window, in source order
    pub fruit_set: Vec<KeywordRecord>,

    /// First validated records regardless of position
    pub preview_sample: Vec<KeywordRecord>,

    pub stats: ExtractionStats,
}
