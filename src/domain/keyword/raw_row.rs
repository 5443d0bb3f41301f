// ============================================================
// RAW ROW
// ============================================================
// One decoded record, keyed by the header line of its file

use super::FieldMap;

/// A single decoded record before validation.
///
/// Short rows simply lack the trailing headers: a missing field is absent
/// from the map, never stored as an empty string.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based record number, header excluded
    pub record: u64,

    /// Header name to raw value
    pub fields: FieldMap,
}

impl RawRow {
    pub fn new(record: u64, fields: FieldMap) -> Self {
        Self { record, fields }
    }

    /// Raw value for a column, `None` when the row has no such field
    pub fn get(&self, column: &str) -> Option<&str> {
        self.fields.get(column).map(String::as_str)
    }

    /// Value for a column only when it is present and not blank
    pub fn non_empty(&self, column: &str) -> Option<&str> {
        self.get(column).filter(|value| !value.trim().is_empty())
    }
}
