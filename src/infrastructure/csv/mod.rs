// ============================================================
// CSV INFRASTRUCTURE LAYER
// ============================================================
// Byte decoding, row cursor, and export writer

mod csv_decoder;
mod csv_writer;

pub use csv_decoder::{decode_text, CsvDecoder, RawRows};
pub use csv_writer::{CsvWriter, EXPORT_FILE_NAME};
