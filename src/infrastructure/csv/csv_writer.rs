// ============================================================
// CSV WRITER
// ============================================================
// Re-serialize keyword records for download

use csv::{QuoteStyle, Terminator, WriterBuilder};

use crate::domain::error::{AppError, Result};
use crate::domain::keyword::KeywordRecord;

/// Header row of every export, matching `ColumnMapping::export_layout`
pub const EXPORT_HEADERS: [&str; 4] = ["Keyword", "Position", "Search Volume", "URL"];

/// File name offered to the browser for downloads
pub const EXPORT_FILE_NAME: &str = "low_hanging_fruit.csv";

/// Writes records as delimited text without any quoting.
///
/// Values containing the delimiter or a newline are written verbatim and will
/// not survive a re-import.
pub struct CsvWriter {
    delimiter: u8,
}

impl Default for CsvWriter {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Header line plus one line per record, `\n`-separated, no trailing newline
    pub fn write_to_string(&self, records: &[KeywordRecord]) -> Result<String> {
        let mut writer = WriterBuilder::new()
            .delimiter(self.delimiter)
            .quote_style(QuoteStyle::Never)
            .terminator(Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        writer.write_record(EXPORT_HEADERS)?;

        for record in records {
            let position = record.position.to_string();
            let volume = record.volume.to_string();
            writer.write_record([
                record.keyword.as_str(),
                position.as_str(),
                volume.as_str(),
                record.url.as_str(),
            ])?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::Internal(format!("Failed to flush CSV output: {}", e)))?;
        let mut text = String::from_utf8(bytes)
            .map_err(|e| AppError::Internal(format!("CSV output is not UTF-8: {}", e)))?;

        if text.ends_with('\n') {
            text.pop();
        }

        Ok(text)
    }
}
