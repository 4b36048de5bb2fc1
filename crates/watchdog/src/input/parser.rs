//! CSV/TSV ingestion into a typed [`Dataset`].

use std::io::{BufRead, BufReader};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::dataset::{Dataset, Value};
use crate::error::{Result, WatchdogError};

use super::source::SourceMetadata;

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Tokens read as null by default, compared case-insensitively after trimming.
pub const DEFAULT_NULL_VALUES: &[&str] = &["", "NA", "N/A", "NULL", "None", "NaN", "nil", "#N/A"];

/// Parser configuration.
#[derive(Debug, Clone)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
    /// Whether the file has a header row.
    pub has_header: bool,
    /// Maximum rows to read (None = all).
    pub max_rows: Option<usize>,
    /// Quote character.
    pub quote: u8,
    /// Cell contents treated as null.
    pub null_values: Vec<String>,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            delimiter: None,
            has_header: true,
            max_rows: None,
            quote: b'"',
            null_values: DEFAULT_NULL_VALUES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl ParserConfig {
    /// Use a fixed delimiter instead of auto-detection.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Stop after `max_rows` data rows.
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = Some(max_rows);
        self
    }

    /// Use a quote character other than `"`.
    pub fn with_quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    /// Replace the null tokens.
    pub fn with_null_values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.null_values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Returns true if the raw cell is a null token.
    pub fn is_null_token(&self, raw: &str) -> bool {
        let trimmed = raw.trim();
        self.null_values.iter().any(|token| token.eq_ignore_ascii_case(trimmed))
    }

    /// Type a raw cell: null token, finite number, or text.
    pub fn type_cell(&self, raw: &str) -> Value {
        if self.is_null_token(raw) {
            return Value::Null;
        }
        match raw.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(raw.to_string()),
        }
    }
}

/// Parse a delimiter given on the command line or in configuration.
///
/// Accepts a single ASCII character or one of `tab`, `\t`, `comma`,
/// `semicolon`, `pipe`.
pub fn parse_delimiter(s: &str) -> Result<u8> {
    match s {
        "tab" | "\\t" | "\t" => Ok(b'\t'),
        "comma" => Ok(b','),
        "semicolon" => Ok(b';'),
        "pipe" => Ok(b'|'),
        _ => {
            let bytes = s.as_bytes();
            if bytes.len() == 1 && bytes[0].is_ascii() && !bytes[0].is_ascii_alphanumeric() {
                Ok(bytes[0])
            } else {
                Err(WatchdogError::InvalidDelimiter(s.to_string()))
            }
        }
    }
}

/// Parses delimited text into datasets.
#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

/// A parsed dataset together with parse statistics.
struct Parsed {
    dataset: Dataset,
    delimiter: u8,
    ragged_rows: usize,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// The active configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Parse a file and return the dataset and provenance metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(Dataset, SourceMetadata)> {
        let path = path.as_ref();

        let contents = std::fs::read(path).map_err(|e| WatchdogError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let parsed = self.parse_with_stats(&contents)?;
        debug!(
            path = %path.display(),
            rows = parsed.dataset.len(),
            columns = parsed.dataset.column_count(),
            "parsed file"
        );

        let metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            contents.len() as u64,
            parsed.delimiter,
        )
        .with_shape(
            parsed.dataset.len(),
            parsed.dataset.column_count(),
            parsed.ragged_rows,
        );

        Ok((parsed.dataset, metadata))
    }

    /// Parse in-memory text.
    pub fn parse_str(&self, text: &str) -> Result<Dataset> {
        self.parse_bytes(text.as_bytes())
    }

    /// Parse in-memory bytes.
    pub fn parse_bytes(&self, bytes: &[u8]) -> Result<Dataset> {
        self.parse_with_stats(bytes).map(|parsed| parsed.dataset)
    }

    fn parse_with_stats(&self, bytes: &[u8]) -> Result<Parsed> {
        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(bytes, self.config.quote)?,
        };

        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(false)
            .quote(self.config.quote)
            .flexible(true)
            .from_reader(bytes);

        let mut records = reader.records();

        let headers: Vec<String> = if self.config.has_header {
            match records.next() {
                Some(record) => record?.iter().map(|s| s.trim().to_string()).collect(),
                None => return Err(WatchdogError::EmptyData("No header row found".to_string())),
            }
        } else {
            Vec::new()
        };

        let mut raw_rows: Vec<csv::StringRecord> = Vec::new();
        for result in records {
            if self.config.max_rows.is_some_and(|max| raw_rows.len() >= max) {
                break;
            }
            raw_rows.push(result?);
        }

        let headers = if self.config.has_header {
            name_blank_headers(headers)
        } else {
            match raw_rows.first() {
                Some(first) => (0..first.len()).map(|i| format!("column_{}", i + 1)).collect(),
                None => return Err(WatchdogError::EmptyData("No data rows found".to_string())),
            }
        };

        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(WatchdogError::EmptyData("No columns found".to_string()));
        }

        let expected_cols = headers.len();
        let mut ragged_rows = 0;
        let mut typed_rows = Vec::with_capacity(raw_rows.len());

        for (index, record) in raw_rows.iter().enumerate() {
            if record.len() != expected_cols {
                ragged_rows += 1;
                warn!(
                    row = index,
                    found = record.len(),
                    expected = expected_cols,
                    "row width differs from header; padding with nulls or truncating"
                );
            }

            let mut values: Vec<Value> = record
                .iter()
                .take(expected_cols)
                .map(|cell| self.config.type_cell(cell))
                .collect();
            values.resize(expected_cols, Value::Null);
            typed_rows.push(values);
        }

        let dataset = Dataset::from_records(headers, typed_rows)?;

        Ok(Parsed {
            dataset,
            delimiter,
            ragged_rows,
        })
    }
}

/// Blank header cells become `column_N`, as in headerless mode.
///
/// An all-blank header is left alone so it is reported as having no columns.
fn name_blank_headers(headers: Vec<String>) -> Vec<String> {
    if headers.iter().all(String::is_empty) {
        return headers;
    }
    headers
        .into_iter()
        .enumerate()
        .map(|(i, name)| if name.is_empty() { format!("column_{}", i + 1) } else { name })
        .collect()
}

/// Detect the delimiter by analyzing the first few lines.
///
/// Prefers the candidate that appears the same number of times on every line;
/// falls back to a comma when nothing splits the input.
fn detect_delimiter(bytes: &[u8], quote: u8) -> Result<u8> {
    let lines: Vec<String> = BufReader::new(bytes)
        .lines()
        .take(10)
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(WatchdogError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim, quote))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
        let variance =
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64;

        let score = if counts.iter().all(|&c| c == first_count) {
            first_count * 1000 + if delim == b'\t' { 100 } else { 0 }
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, ignoring quoted sections.
fn count_delimiter_in_line(line: &str, delimiter: u8, quote: u8) -> usize {
    let delim_char = char::from(delimiter);
    let quote_char = char::from(quote);
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            c if c == quote_char => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}
