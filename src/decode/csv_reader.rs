//! CSV decoding

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

const BOM: char = '\u{feff}';

/// Read a CSV file into a string, dropping a leading byte order mark
pub fn load_csv(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            Error::FileNotFound {
                path: path.display().to_string(),
            }
        } else {
            Error::csv(path.display().to_string(), e.to_string())
        }
    })?;

    Ok(match content.strip_prefix(BOM) {
        Some(stripped) => stripped.to_string(),
        None => content,
    })
}

/// A positional CSV row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRow {
    /// 1-based line number in the source
    pub line: usize,
    /// Field values as written, surrounding whitespace included
    pub fields: Vec<String>,
}

/// A CSV row keyed by the header line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRecord {
    /// 1-based line number in the source
    pub line: usize,
    values: HashMap<String, String>,
}

impl CsvRecord {
    /// Value of a column; missing trailing fields read as empty
    pub fn get(&self, column: &str) -> Option<&str> {
        self.values.get(column).map(String::as_str)
    }
}

/// CSV decoder with configurable delimiter and header handling
#[derive(Debug, Clone)]
pub struct CsvDecoder {
    /// Field delimiter
    delimiter: char,
    /// Whether the first row is a header
    has_header: bool,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
        }
    }
}

impl CsvDecoder {
    /// Create a new CSV decoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a CSV decoder with custom settings
    pub fn with_options(delimiter: char, has_header: bool) -> Self {
        Self {
            delimiter,
            has_header,
        }
    }

    /// Decode positional rows, skipping the header line if there is one
    pub fn rows(&self, body: &str) -> Vec<CsvRow> {
        let rows = self.split(body);
        if self.has_header {
            rows.into_iter().skip(1).collect()
        } else {
            rows
        }
    }

    /// Decode rows keyed by the header line
    ///
    /// Returns the header columns alongside the records. A decoder without a
    /// header cannot produce keyed records.
    pub fn records(&self, body: &str) -> Result<(Vec<String>, Vec<CsvRecord>)> {
        if !self.has_header {
            return Err(Error::config("keyed CSV records need a header row"));
        }

        let mut rows = self.split(body).into_iter();
        let Some(header) = rows.next() else {
            return Ok((Vec::new(), Vec::new()));
        };

        let records = rows
            .map(|row| {
                let values = header
                    .fields
                    .iter()
                    .enumerate()
                    .map(|(i, column)| {
                        (column.clone(), row.fields.get(i).cloned().unwrap_or_default())
                    })
                    .collect();
                CsvRecord {
                    line: row.line,
                    values,
                }
            })
            .collect();

        Ok((header.fields, records))
    }

    fn split(&self, body: &str) -> Vec<CsvRow> {
        body.lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| CsvRow {
                line: i + 1,
                fields: parse_csv_line(line, self.delimiter),
            })
            .collect()
    }
}

/// Parse a CSV line into fields
fn parse_csv_line(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '"' {
            if in_quotes {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                in_quotes = true;
            }
        } else if c == delimiter && !in_quotes {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }

    fields.push(current);
    fields
}
