// ============================================================
// CSV DECODER
// ============================================================
// Turn uploaded bytes into a lazy stream of header-keyed rows

use std::borrow::Cow;
use std::io::Read;

use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use encoding_rs::{Encoding, UTF_8};

use crate::domain::error::{AppError, Result};
use crate::domain::keyword::{FieldMap, RawRow};

/// Decode raw upload bytes into text.
///
/// A byte-order mark picks the encoding (ranking tools commonly emit
/// UTF-16 with a BOM); without one the bytes must be valid UTF-8.
/// Malformed sequences are rejected rather than replaced.
pub fn decode_text(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (encoding, bom_len) = Encoding::for_bom(bytes).unwrap_or((UTF_8, 0));

    encoding
        .decode_without_bom_handling_and_without_replacement(&bytes[bom_len..])
        .ok_or_else(|| {
            AppError::DecodeError(format!("Input is not valid {} text", encoding.name()))
        })
}

/// CSV decoder producing [`RawRow`]s.
///
/// Headers and values are always trimmed of surrounding whitespace.
pub struct CsvDecoder {
    /// Delimiter character (default: comma)
    delimiter: u8,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set custom delimiter
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Read the header line and return a cursor over the remaining records
    pub fn rows<R: Read>(&self, source: R) -> Result<RawRows<R>> {
        let mut reader = ReaderBuilder::new()
            .delimiter(self.delimiter)
            .trim(Trim::All)
            .flexible(true) // Short and long rows are zipped against headers
            .from_reader(source);

        let headers = reader
            .headers()
            .map_err(|e| AppError::DecodeError(format!("Failed to read CSV headers: {}", e)))?
            .clone();

        Ok(RawRows {
            reader,
            headers,
            record: StringRecord::new(),
            count: 0,
            done: false,
        })
    }
}

/// Forward-only cursor over decoded rows.
///
/// Yields one `Err` at most: the first read failure ends the stream.
pub struct RawRows<R> {
    reader: Reader<R>,
    headers: StringRecord,
    record: StringRecord,
    count: u64,
    done: bool,
}

impl<R> RawRows<R> {
    pub fn headers(&self) -> impl Iterator<Item = &str> {
        self.headers.iter()
    }
}

impl<R: Read> Iterator for RawRows<R> {
    type Item = Result<RawRow>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            match self.reader.read_record(&mut self.record) {
                Ok(true) => {
                    // Whitespace-only lines are blank lines, not records
                    if self.record.iter().all(str::is_empty) {
                        continue;
                    }
                    self.count += 1;
                    // zip stops at the shorter side: missing trailing fields stay absent
                    let fields: FieldMap = self
                        .headers
                        .iter()
                        .zip(self.record.iter())
                        .map(|(header, value)| (header.to_string(), value.to_string()))
                        .collect();
                    return Some(Ok(RawRow::new(self.count, fields)));
                }
                Ok(false) => {
                    self.done = true;
                    return None;
                }
                Err(e) => {
                    self.done = true;
                    return Some(Err(AppError::DecodeError(format!(
                        "Failed to parse CSV record {}: {}",
                        self.count + 1,
                        e
                    ))));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(content: &str) -> Vec<RawRow> {
        CsvDecoder::new()
            .rows(content.as_bytes())
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn test_rows_keyed_by_header() {
        let rows = collect("Keyword,Current position\nfoo,15\nbar,5\n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].record, 1);
        assert_eq!(rows[0].get("Keyword"), Some("foo"));
        assert_eq!(rows[1].get("Current position"), Some("5"));
    }

    #[test]
    fn test_trailing_blank_lines_skipped() {
        let rows = collect("Keyword,Current position\nfoo,15\n\n\n");
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_whitespace_only_lines_skipped() {
        let rows = collect("Keyword,Current position\nfoo,15\n   \n \t \nbar,3\n   \n");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].record, 2);
        assert_eq!(rows[1].get("Keyword"), Some("bar"));
    }

    #[test]
    fn test_short_row_leaves_fields_absent() {
        let rows = collect("Keyword,Current position,Current URL\nfoo,15\n");
        assert_eq!(rows[0].get("Current position"), Some("15"));
        assert_eq!(rows[0].get("Current URL"), None);
    }

    #[test]
    fn test_quoted_delimiter_respected() {
        let rows = collect("Keyword,Current position\n\"shoes, red\",12\n");
        assert_eq!(rows[0].get("Keyword"), Some("shoes, red"));
        assert_eq!(rows[0].get("Current position"), Some("12"));
    }

    #[test]
    fn test_header_only_yields_nothing() {
        let mut rows = CsvDecoder::new().rows("Keyword,Current URL\n".as_bytes()).unwrap();
        assert_eq!(rows.headers().collect::<Vec<_>>(), vec!["Keyword", "Current URL"]);
        assert!(rows.next().is_none());
    }

    #[test]
    fn test_custom_delimiter() {
        let decoder = CsvDecoder::new().with_delimiter(b';');
        let rows: Vec<_> = decoder
            .rows("Keyword;Current position\nfoo;14\n".as_bytes())
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        assert_eq!(rows[0].get("Current position"), Some("14"));
    }

    #[test]
    fn test_decode_text_strips_utf8_bom() {
        let bytes = b"\xEF\xBB\xBFKeyword\nfoo\n";
        assert_eq!(decode_text(bytes).unwrap(), "Keyword\nfoo\n");
    }

    #[test]
    fn test_decode_text_utf16le_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Keyword\nfoo".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }
        assert_eq!(decode_text(&bytes).unwrap(), "Keyword\nfoo");
    }

    #[test]
    fn test_decode_text_rejects_invalid_utf8() {
        let err = decode_text(b"Keyword\n\xC3\x28\n").unwrap_err();
        assert!(matches!(err, AppError::DecodeError(_)));
    }

    #[test]
    fn test_invalid_utf8_in_stream_is_decode_error() {
        let bytes: &[u8] = b"Keyword,Current position\n\xFF\xFE\xFD,12\n";
        let mut rows = CsvDecoder::new().rows(bytes).unwrap();
        assert!(matches!(rows.next(), Some(Err(AppError::DecodeError(_)))));
        assert!(rows.next().is_none());
    }
}
