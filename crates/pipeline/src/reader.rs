//! CSV input.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use auditflow_core::RawRecord;

use crate::error::PipelineError;

/// `" Patient ID "` -> `"patient_id"`.
pub fn normalize_header(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
}

/// Read every data row as a [`RawRecord`] keyed by normalized header.
///
/// Two headers that normalize to the same key are refused with
/// [`PipelineError::DuplicateHeader`].
///
/// Rows shorter than the header simply lack the trailing fields (the validator
/// reports them as missing); cells past the last header are dropped.
pub fn read_records<R: Read>(reader: R, delimiter: u8) -> Result<Vec<RawRecord>, PipelineError> {
    let mut csv = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv.headers()?.iter().map(normalize_header).collect();
    let mut seen = HashSet::with_capacity(headers.len());
    for header in &headers {
        if !seen.insert(header.as_str()) {
            return Err(PipelineError::DuplicateHeader(header.clone()));
        }
    }

    let mut records = Vec::new();
    for row in csv.records() {
        let row = row?;
        records.push(RawRecord::from_pairs(
            headers.iter().cloned().zip(row.iter().map(str::to_string)),
        ));
    }
    Ok(records)
}

pub fn read_file(path: &Path, delimiter: u8) -> Result<Vec<RawRecord>, PipelineError> {
    if !path.exists() {
        return Err(PipelineError::InputNotFound(path.to_path_buf()));
    }
    let file = File::open(path).map_err(|e| PipelineError::io(path, e))?;
    read_records(file, delimiter)
}
