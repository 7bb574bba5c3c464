//! Input decoder module
//!
//! Loads the CSV files that drive the sync commands.
//!
//! # Overview
//!
//! Files are read as UTF-8, with an optional byte order mark. Rows can be
//! read positionally (`CsvDecoder::rows`) or keyed by the header line
//! (`CsvDecoder::records`). Blank lines are skipped; every row keeps the
//! 1-based line number it came from so warnings can point at it.

mod csv_reader;

pub use csv_reader::{load_csv, CsvDecoder, CsvRecord, CsvRow};
