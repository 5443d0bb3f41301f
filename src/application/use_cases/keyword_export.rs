use crate::domain::error::{AppError, Result};
use crate::domain::keyword::KeywordRecord;
use crate::infrastructure::csv::{CsvWriter, EXPORT_FILE_NAME};

/// A rendered download
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedFile {
    pub file_name: String,
    pub content: String,
}

pub struct KeywordExportUseCase {
    writer: CsvWriter,
}

impl KeywordExportUseCase {
    pub fn new(delimiter: u8) -> Self {
        Self {
            writer: CsvWriter::new().with_delimiter(delimiter),
        }
    }

    pub fn execute(&self, records: &[KeywordRecord]) -> Result<ExportedFile> {
        if records.is_empty() {
            return Err(AppError::InputMissing(
                "No extracted data to download.".to_string(),
            ));
        }

        let content = self.writer.write_to_string(records)?;
        tracing::info!(records = records.len(), "Rendered keyword export");

        Ok(ExportedFile {
            file_name: EXPORT_FILE_NAME.to_string(),
            content,
        })
    }
}
