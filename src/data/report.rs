//! Persisting sentiment reports under date-stamped, collision-free names.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
};

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer, Value};
use thiserror::Error;
use tracing::{info, warn};

use crate::nlp::{normalize::NormalizedResult, schema::Schema};

#[derive(Debug, Error)]
pub enum WriteError {
    #[error("failed to save results in {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize results: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File name for the `attempt`-th candidate: `DD_MM_YYYY_prefix.json`, then
/// `DD_MM_YYYY_1_prefix.json`, `DD_MM_YYYY_2_prefix.json`, ...
pub fn report_file_name(date: NaiveDate, prefix: &str, attempt: usize) -> String {
    let base = date.format("%d_%m_%Y");
    if attempt == 0 {
        format!("{base}_{prefix}.json")
    } else {
        format!("{base}_{attempt}_{prefix}.json")
    }
}

/// Four-space indented JSON with a trailing newline; non-ASCII is kept as is.
pub fn to_pretty_json(value: &Value) -> Result<Vec<u8>, serde_json::Error> {
    let mut buf = Vec::new();
    let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut ser)?;
    buf.push(b'\n');
    Ok(buf)
}

/// Write the report into `dir`, never overwriting an existing file.
pub fn write_result(
    result: &NormalizedResult,
    schema: &Schema,
    dir: &Path,
    prefix: &str,
    date: NaiveDate,
) -> Result<PathBuf, WriteError> {
    let body = to_pretty_json(&result.to_value(schema))?;
    let (path, file) = create_unique(dir, prefix, date)?;
    persist(&path, file, &body)?;
    info!(path = %path.display(), total = result.total(), "saved results");
    Ok(path)
}

/// Write `body` to a freshly created report file, removing it if the write fails.
fn persist<W: Write>(path: &Path, mut file: W, body: &[u8]) -> Result<(), WriteError> {
    if let Err(source) = file.write_all(body).and_then(|_| file.flush()) {
        drop(file);
        if let Err(err) = fs::remove_file(path) {
            warn!(path = %path.display(), %err, "could not remove partial report");
        }
        return Err(WriteError::Io {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}

fn create_unique(dir: &Path, prefix: &str, date: NaiveDate) -> Result<(PathBuf, File), WriteError> {
    let mut attempt = 0;
    loop {
        let path = dir.join(report_file_name(date, prefix, attempt));
        match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => return Ok((path, file)),
            Err(err) if err.kind() == ErrorKind::AlreadyExists => attempt += 1,
            Err(source) => return Err(WriteError::Io { path, source }),
        }
    }
}
