//! Delimited-text loader with per-column type inference.

use crate::data::{Column, DataError, Dataset};
use csv::{ByteRecord, ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Cell contents that count as a missing value.
pub const DEFAULT_MISSING_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// How to read a delimited file.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvOptions {
    pub delimiter: u8,
    pub missing_tokens: Vec<String>,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            missing_tokens: DEFAULT_MISSING_TOKENS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl CsvOptions {
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    fn is_missing(&self, cell: &str) -> bool {
        self.missing_tokens.iter().any(|token| token == cell)
    }
}

/// Load a dataset from a file on disk.
pub fn load_csv(path: &Path, options: &CsvOptions) -> Result<Dataset, DataError> {
    let file = File::open(path)?;
    read_csv(file, options)
}

/// Read a dataset from any reader. The first record is the header.
///
/// A column is numeric when every non-missing cell parses as a float or a
/// boolean literal (mapped to 1/0); otherwise it is categorical. A numeric
/// cell that parses to NaN in any spelling is missing. Fields that are not
/// valid UTF-8 are decoded as Latin-1.
pub fn read_csv<R: Read>(reader: R, options: &CsvOptions) -> Result<Dataset, DataError> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(reader);

    let header = rdr.byte_headers()?.clone();
    if header.is_empty() || (header.len() == 1 && header[0].is_empty()) {
        return Err(DataError::EmptyInput);
    }

    let names: Vec<String> = header
        .iter()
        .map(|field| decode_field(field).trim_start_matches('\u{feff}').to_string())
        .collect();
    let width = names.len();

    let mut cells: Vec<Vec<Option<String>>> = vec![Vec::new(); width];
    let mut record = ByteRecord::new();
    while rdr.read_byte_record(&mut record)? {
        if record.len() != width {
            return Err(DataError::RaggedRow {
                line: record.position().map_or(0, |p| p.line()),
                expected: width,
                found: record.len(),
            });
        }

        for (j, field) in record.iter().enumerate() {
            let text = decode_field(field);
            let cell = if options.is_missing(&text) {
                None
            } else {
                Some(text)
            };
            cells[j].push(cell);
        }
    }

    let columns = names
        .into_iter()
        .zip(cells)
        .map(|(name, values)| infer_column(name, values))
        .collect();

    Dataset::new(columns)
}

fn decode_field(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

fn parse_number(cell: &str) -> Option<f64> {
    match cell {
        "true" | "True" | "TRUE" => Some(1.0),
        "false" | "False" | "FALSE" => Some(0.0),
        _ => cell.parse::<f64>().ok(),
    }
}

fn infer_column(name: String, values: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = values
        .iter()
        .map(|cell| match cell {
            None => Some(None),
            Some(text) => parse_number(text).map(|v| (!v.is_nan()).then_some(v)),
        })
        .collect();

    match parsed {
        Some(numbers) => Column::numeric(name, numbers),
        None => Column::categorical(name, values),
    }
}
