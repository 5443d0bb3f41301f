// ============================================================
// EXTRACTION CONFIGURATION
// ============================================================
// Column names and classification bounds for ranking exports

use serde::{Deserialize, Serialize};

/// Header names of the columns the pipeline reads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub keyword: String,
    pub position: String,
    pub volume: String,
    pub url: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self::ranking_export()
    }
}

impl ColumnMapping {
    /// Layout of the ranking export uploaded by users
    pub fn ranking_export() -> Self {
        Self {
            keyword: "Keyword".to_string(),
            position: "Current position".to_string(),
            volume: "Volume".to_string(),
            url: "Current URL".to_string(),
        }
    }

    /// Layout written by the serializer, for re-importing an export
    pub fn export_layout() -> Self {
        Self {
            keyword: "Keyword".to_string(),
            position: "Position".to_string(),
            volume: "Search Volume".to_string(),
            url: "URL".to_string(),
        }
    }

    fn names(&self) -> [(&'static str, &str); 4] {
        [
            ("keyword", &self.keyword),
            ("position", &self.position),
            ("volume", &self.volume),
            ("url", &self.url),
        ]
    }
}

/// Configuration for a keyword extraction run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub columns: ColumnMapping,

    /// Lowest position counted as low-hanging fruit (default: 11)
    pub min_position: u32,

    /// Highest position counted as low-hanging fruit (default: 20)
    pub max_position: u32,

    /// Number of validated rows echoed back as a preview (default: 5)
    pub preview_size: usize,

    /// Field delimiter, must be a single ASCII character (default: ',')
    pub delimiter: char,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            min_position: 11,
            max_position: 20,
            preview_size: 5,
            delimiter: ',',
        }
    }
}

impl ExtractionConfig {
    /// Config for decoding a file produced by the export serializer
    pub fn for_export_layout() -> Self {
        Self {
            columns: ColumnMapping::export_layout(),
            ..Default::default()
        }
    }

    pub fn is_fruit(&self, position: u32) -> bool {
        (self.min_position..=self.max_position).contains(&position)
    }

    pub fn delimiter_byte(&self) -> u8 {
        // validate() guarantees ASCII; fall back to comma otherwise
        if self.delimiter.is_ascii() {
            self.delimiter as u8
        } else {
            b','
        }
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.min_position > self.max_position {
            return Err("min_position must be <= max_position".to_string());
        }
        if self.preview_size == 0 {
            return Err("preview_size must be > 0".to_string());
        }
        if !self.delimiter.is_ascii() || matches!(self.delimiter, '"' | '\n' | '\r') {
            return Err("delimiter must be a single ASCII character other than a quote or newline".to_string());
        }
        for (role, name) in self.columns.names() {
            if name.trim().is_empty() {
                return Err(format!("{} column name must not be empty", role));
            }
        }
        Ok(())
    }
}
