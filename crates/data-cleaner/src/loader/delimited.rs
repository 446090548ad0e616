//! Delimited text reading: delimiter sniffing, header handling, NA markers
//! and per-column dtype inference.

use crate::error::{CleanerError, Result};
use crate::table::{Column, Table};
use crate::utils::{is_na_marker, parse_number};
use tracing::debug;

/// Delimiters considered by [`sniff_delimiter`], in preference order.
pub const DELIMITER_CANDIDATES: [u8; 5] = [b',', b';', b'\t', b'|', b':'];

/// Number of records inspected when sniffing.
const SNIFF_RECORDS: usize = 20;

/// Count occurrences of `delim` per record over the first records of `text`.
/// Delimiters inside double quotes are ignored and quoted newlines do not
/// end a record. Blank lines are skipped.
fn delimiter_counts(text: &str, delim: u8) -> Vec<usize> {
    let mut counts = Vec::new();
    let mut in_quotes = false;
    let mut current = 0usize;
    let mut line_has_content = false;

    for &b in text.as_bytes() {
        if counts.len() >= SNIFF_RECORDS {
            break;
        }
        match b {
            b'"' => {
                in_quotes = !in_quotes;
                line_has_content = true;
            }
            b'\n' if !in_quotes => {
                if line_has_content {
                    counts.push(current);
                }
                current = 0;
                line_has_content = false;
            }
            b'\r' if !in_quotes => {}
            _ if b == delim && !in_quotes => {
                current += 1;
                line_has_content = true;
            }
            _ => line_has_content = true,
        }
    }
    if line_has_content && counts.len() < SNIFF_RECORDS {
        counts.push(current);
    }
    counts
}

/// Infer the field delimiter.
///
/// A candidate qualifies when it occurs in the header; among qualifying
/// candidates the one whose per-record count matches the header's most often
/// wins, earlier candidates winning ties. Falls back to a comma.
pub fn sniff_delimiter(text: &str) -> u8 {
    let mut best: Option<(u8, usize)> = None;

    for delim in DELIMITER_CANDIDATES {
        let counts = delimiter_counts(text, delim);
        let Some(&header_count) = counts.first() else {
            continue;
        };
        if header_count == 0 {
            continue;
        }
        let consistent = counts.iter().filter(|c| **c == header_count).count();
        if best.is_none_or(|(_, score)| consistent > score) {
            best = Some((delim, consistent));
        }
    }

    best.map_or(b',', |(delim, _)| delim)
}

/// Build a column from raw fields: numeric when every non-null field parses
/// as a number, text otherwise.
fn infer_column(name: String, fields: Vec<Option<String>>) -> Column {
    let parsed: Option<Vec<Option<f64>>> = fields
        .iter()
        .map(|f| match f {
            None => Some(None),
            Some(s) => parse_number(s).map(|v| (!v.is_nan()).then_some(v)),
        })
        .collect();

    match parsed {
        Some(values) => Column::numeric(name, values),
        None => Column::text(name, fields),
    }
}

/// Parse delimited text into a table. The first record is the header.
pub fn read_delimited(text: &str) -> Result<Table> {
    let delimiter = sniff_delimiter(text);
    debug!("Using delimiter {:?}", delimiter as char);

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut header: Option<Vec<String>> = None;
    let mut fields: Vec<Vec<Option<String>>> = Vec::new();

    for (line, record) in reader.records().enumerate() {
        let record = record.map_err(|e| CleanerError::ParseFailure(e.to_string()))?;
        if record.len() == 1 && record[0].trim().is_empty() {
            continue;
        }

        let Some(names) = &header else {
            let names: Vec<String> = record
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    if name.is_empty() {
                        format!("Unnamed: {}", i)
                    } else {
                        name.to_string()
                    }
                })
                .collect();
            fields = vec![Vec::new(); names.len()];
            header = Some(names);
            continue;
        };

        if record.len() > names.len() {
            return Err(CleanerError::ParseFailure(format!(
                "Expected {} fields in line {}, saw {}",
                names.len(),
                line + 1,
                record.len()
            )));
        }

        for (i, values) in fields.iter_mut().enumerate() {
            let value = record
                .get(i)
                .filter(|f| !is_na_marker(f))
                .map(str::to_string);
            values.push(value);
        }
    }

    let names = header
        .ok_or_else(|| CleanerError::ParseFailure("No columns to parse from file".to_string()))?;

    let columns = names
        .into_iter()
        .zip(fields)
        .map(|(name, values)| infer_column(name, values))
        .collect();
    Table::new(columns)
}
