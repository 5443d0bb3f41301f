// ============================================================
// KEYWORD EXTRACTION USE CASE
// ============================================================
// Decode a ranking export, validate rows, and collect page-2 keywords

use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use crate::domain::error::{AppError, Result};
use crate::domain::keyword::{
    ColumnMapping, ExtractionConfig, ExtractionResult, ExtractionStats, KeywordRecord, RawRow,
};
use crate::infrastructure::csv::{decode_text, CsvDecoder};

/// Parse the leading base-10 digits of a cell, defaulting to zero.
///
/// Mirrors how ranking tools' numbers are read loosely: `"15.0"` is 15,
/// `"12 (new)"` is 12, while blanks, signs and overflow fall back to 0.
pub fn coerce_count<T: FromStr + Default>(raw: Option<&str>) -> T {
    let Some(raw) = raw else {
        return T::default();
    };
    let trimmed = raw.trim_start();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());

    unsigned[..end].parse().unwrap_or_default()
}

/// Turn a raw row into a record, or `None` when an essential field is missing.
///
/// Keyword and URL must be non-blank. The position column only has to be
/// present: an empty position is a soft field and coerces to 0 like volume.
pub fn normalize_row(row: &RawRow, columns: &ColumnMapping) -> Option<KeywordRecord> {
    let keyword = row.non_empty(&columns.keyword)?;
    let url = row.non_empty(&columns.url)?;
    let position = row.get(&columns.position)?;

    Some(KeywordRecord::new(
        keyword,
        coerce_count(Some(position)),
        coerce_count(row.get(&columns.volume)),
        url,
    ))
}

/// Single-pass accumulator for the fruit set and the preview sample
pub struct Classifier<'a> {
    config: &'a ExtractionConfig,
    result: ExtractionResult,
}

impl<'a> Classifier<'a> {
    pub fn new(config: &'a ExtractionConfig) -> Self {
        Self {
            config,
            result: ExtractionResult::default(),
        }
    }

    pub fn accept(&mut self, record: KeywordRecord) {
        if self.result.preview_sample.len() < self.config.preview_size {
            self.result.preview_sample.push(record.clone());
        }
        if self.config.is_fruit(record.position) {
            self.result.stats.fruit_count += 1;
            self.result.fruit_set.push(record);
        }
    }

    pub fn skip(&mut self) {
        self.result.stats.rows_skipped += 1;
    }

    pub fn finish(mut self, rows_read: u64) -> ExtractionResult {
        self.result.stats.rows_read = rows_read;
        self.result
    }
}

/// Keyword extraction use case.
///
/// Holds configuration only; every call allocates its own counters and
/// accumulators, so one instance can serve concurrent requests.
pub struct KeywordExtractionUseCase {
    config: ExtractionConfig,
}

impl KeywordExtractionUseCase {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    /// Run the pipeline over an uploaded file on disk
    pub fn execute_file(&self, path: &Path) -> Result<ExtractionResult> {
        let bytes = std::fs::read(path).map_err(|e| {
            AppError::DecodeError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        self.execute_bytes(&bytes)
    }

    /// Run the pipeline over raw upload bytes, honouring a byte-order mark
    pub fn execute_bytes(&self, bytes: &[u8]) -> Result<ExtractionResult> {
        let text = decode_text(bytes)?;
        self.execute_reader(text.as_bytes())
    }

    /// Run the pipeline over a UTF-8 stream in one forward pass
    pub fn execute_reader<R: Read>(&self, source: R) -> Result<ExtractionResult> {
        let start = Instant::now();

        self.config.validate().map_err(|e| {
            AppError::ValidationError(format!("Invalid extraction config: {}", e))
        })?;

        let rows = CsvDecoder::new()
            .with_delimiter(self.config.delimiter_byte())
            .rows(source)?;

        let mut classifier = Classifier::new(&self.config);
        let mut rows_read = 0u64;

        for row in rows {
            let row = row?;
            rows_read += 1;

            match normalize_row(&row, &self.config.columns) {
                Some(record) => classifier.accept(record),
                None => {
                    tracing::warn!(
                        record = row.record,
                        "Skipping row due to missing essential data"
                    );
                    classifier.skip();
                }
            }
        }

        let result = classifier.finish(rows_read);
        let ExtractionStats {
            rows_read,
            rows_skipped,
            fruit_count,
        } = result.stats;

        tracing::info!(
            rows_read,
            rows_skipped,
            fruit_count,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "Keyword extraction complete"
        );

        Ok(result)
    }
}
