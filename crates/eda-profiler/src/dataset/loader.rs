//! Reading delimited text into a polars DataFrame.
//!
//! Loading happens in two passes: a structural pass with the `csv` reader
//! (header sanity, equal field counts on every row), then a typed read with
//! polars that infers integer, float, boolean and string columns.

use crate::config::ProfilerConfig;
use crate::error::{ProfilerError, Result};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions, NullValues};
use polars::prelude::*;
use std::collections::HashSet;
use std::io::Cursor;
use std::path::Path;
use tracing::{debug, warn};

/// Read a delimited file from disk.
pub(crate) fn read_path(path: &Path, config: &ProfilerConfig) -> Result<DataFrame> {
    if !path.exists() {
        return Err(ProfilerError::Load(format!(
            "file not found: {}",
            path.display()
        )));
    }

    let bytes = std::fs::read(path)
        .map_err(|e| ProfilerError::Load(format!("cannot read {}: {}", path.display(), e)))?;
    let text = String::from_utf8(bytes).map_err(|e| {
        ProfilerError::Load(format!("{} is not valid UTF-8: {}", path.display(), e))
    })?;

    let delimiter = config
        .delimiter
        .unwrap_or_else(|| detect_delimiter(Some(path), &text));

    read_text(text, delimiter, config)
}

/// Read delimited text held in memory.
pub(crate) fn read_str(text: &str, config: &ProfilerConfig) -> Result<DataFrame> {
    let delimiter = config
        .delimiter
        .unwrap_or_else(|| detect_delimiter(None, text));

    read_text(text.to_string(), delimiter, config)
}

fn read_text(text: String, delimiter: u8, config: &ProfilerConfig) -> Result<DataFrame> {
    let rows = validate_structure(&text, delimiter)?;
    debug!(
        "Structural check passed: {} data rows, delimiter {:?}",
        rows, delimiter as char
    );

    let mut parse_options = CsvParseOptions::default()
        .with_separator(delimiter)
        .with_quote_char(Some(b'"'))
        .with_missing_is_null(true);

    if !config.null_values.is_empty() {
        let markers: Vec<PlSmallStr> = config
            .null_values
            .iter()
            .map(|s| s.as_str().into())
            .collect();
        parse_options = parse_options.with_null_values(Some(NullValues::AllColumns(markers)));
    }

    match typed_read(&text, &parse_options, config.infer_schema_length) {
        Ok(df) => Ok(df),
        Err(e) if config.infer_schema_length.is_some() => {
            warn!(
                "Typed read with {:?} inference rows failed ({}), retrying with a full scan",
                config.infer_schema_length, e
            );
            typed_read(&text, &parse_options, None)
        }
        Err(e) => Err(e),
    }
}

fn typed_read(
    text: &str,
    parse_options: &CsvParseOptions,
    infer_schema_length: Option<usize>,
) -> Result<DataFrame> {
    CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(infer_schema_length)
        .with_parse_options(parse_options.clone())
        .into_reader_with_file_handle(Cursor::new(text.to_owned()))
        .finish()
        .map_err(|e| ProfilerError::Load(e.to_string()))
}

/// Pick the delimiter: tab for `.tsv`/`.tab` files or a tab-only header,
/// comma otherwise.
pub(crate) fn detect_delimiter(path: Option<&Path>, text: &str) -> u8 {
    let by_extension = path
        .and_then(|p| p.extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("tsv") || ext.eq_ignore_ascii_case("tab"))
        .unwrap_or(false);
    if by_extension {
        return b'\t';
    }

    let header = text.lines().next().unwrap_or_default();
    if header.contains('\t') && !header.contains(',') {
        b'\t'
    } else {
        b','
    }
}

/// Check the header and that every row has as many fields as the header.
///
/// Returns the number of data rows.
fn validate_structure(text: &str, delimiter: u8) -> Result<usize> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(false)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| ProfilerError::Load(format!("cannot read header row: {}", e)))?
        .clone();

    if headers.is_empty() {
        return Err(ProfilerError::Load(
            "empty resource: no header row".to_string(),
        ));
    }

    let mut seen = HashSet::new();
    for (idx, name) in headers.iter().enumerate() {
        if name.trim().is_empty() {
            return Err(ProfilerError::Load(format!(
                "header column {} has an empty name",
                idx + 1
            )));
        }
        if !seen.insert(name) {
            return Err(ProfilerError::Load(format!(
                "duplicate column name '{}' in header",
                name
            )));
        }
    }

    let mut rows = 0;
    for record in reader.records() {
        if let Err(e) = record {
            return Err(match e.kind() {
                csv::ErrorKind::UnequalLengths {
                    pos,
                    expected_len,
                    len,
                } => ProfilerError::Load(format!(
                    "inconsistent column count at line {}: expected {} fields, found {}",
                    pos.as_ref().map_or(0, |p| p.line()),
                    expected_len,
                    len
                )),
                _ => ProfilerError::Load(e.to_string()),
            });
        }
        rows += 1;
    }

    Ok(rows)
}
