//! Review comment ingestion from newline-delimited JSON.

use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// A single review comment as scraped from the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub content: String,
    pub date: String,
}

/// Comments kept from one input file together with the lines that were dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentBatch {
    pub comments: Vec<Comment>,
    pub skipped: SkipTally,
}

/// Count of input lines discarded during ingestion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipTally {
    /// Lines that are not a JSON object.
    pub malformed: usize,
    /// Objects missing `content` or `date`, or carrying non-string values there.
    pub incomplete: usize,
}

impl SkipTally {
    pub fn total(&self) -> usize {
        self.malformed + self.incomplete
    }
}

impl CommentBatch {
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.comments.len()
    }
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file {0} was not found")]
    NotFound(PathBuf),

    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Parse newline-delimited JSON text, keeping lines with both required fields.
pub fn parse_comments(text: &str) -> CommentBatch {
    let mut batch = CommentBatch::default();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = match serde_json::from_str(line) {
            Ok(v @ Value::Object(_)) => v,
            Ok(_) => {
                debug!(line = idx + 1, "skipping non-object line");
                batch.skipped.malformed += 1;
                continue;
            }
            Err(err) => {
                debug!(line = idx + 1, %err, "skipping malformed line");
                batch.skipped.malformed += 1;
                continue;
            }
        };
        match field(&value, "content").zip(field(&value, "date")) {
            Some((content, date)) => batch.comments.push(Comment {
                content: content.to_string(),
                date: date.to_string(),
            }),
            None => {
                debug!(line = idx + 1, "skipping line without content/date");
                batch.skipped.incomplete += 1;
            }
        }
    }
    batch
}

fn field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value.get(key).and_then(Value::as_str)
}

/// Read and parse a comments file, surfacing file-level failures.
pub fn read_comments(path: &Path) -> Result<CommentBatch, IngestError> {
    let text = fs::read_to_string(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => IngestError::NotFound(path.to_path_buf()),
        ErrorKind::InvalidData => IngestError::Decode {
            path: path.to_path_buf(),
            source,
        },
        _ => IngestError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;
    Ok(parse_comments(&text))
}

/// Load comments for a run; file-level failures are reported and yield an empty batch.
pub fn load_comments(path: &Path) -> CommentBatch {
    match read_comments(path) {
        Ok(batch) => {
            if batch.skipped.total() > 0 {
                warn!(
                    path = %path.display(),
                    malformed = batch.skipped.malformed,
                    incomplete = batch.skipped.incomplete,
                    "skipped invalid comment lines"
                );
            }
            info!(path = %path.display(), count = batch.len(), "loaded comments");
            batch
        }
        Err(err) => {
            error!(%err, "could not load comments");
            CommentBatch::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_valid_lines_in_order() {
        let text = concat!(
            "{\"content\": \"ótimo app\", \"date\": \"2024-06-01\", \"score\": 5}\n",
            "not json at all\n",
            "{\"content\": \"trava muito\"}\n",
            "\n",
            "{\"content\": \"ok\", \"date\": \"2024-06-03\"}\n",
            "[1, 2, 3]\n",
        );
        let batch = parse_comments(text);
        assert_eq!(
            batch.comments,
            vec![
                Comment {
                    content: "ótimo app".into(),
                    date: "2024-06-01".into()
                },
                Comment {
                    content: "ok".into(),
                    date: "2024-06-03".into()
                },
            ]
        );
        assert_eq!(batch.skipped.malformed, 2);
        assert_eq!(batch.skipped.incomplete, 1);
    }

    #[test]
    fn non_string_fields_are_incomplete() {
        let batch = parse_comments("{\"content\": 42, \"date\": \"2024-01-01\"}");
        assert!(batch.is_empty());
        assert_eq!(batch.skipped.incomplete, 1);
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_comments(&dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, IngestError::NotFound(_)));
    }

    #[test]
    fn missing_file_loads_empty_batch() {
        let dir = tempfile::tempdir().unwrap();
        let batch = load_comments(&dir.path().join("absent.json"));
        assert!(batch.is_empty());
        assert_eq!(batch.skipped.total(), 0);
    }

    #[test]
    fn invalid_utf8_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.json");
        fs::write(&path, b"{\"content\": \"\xe9\", \"date\": \"x\"}\n").unwrap();
        let err = read_comments(&path).unwrap_err();
        assert!(matches!(err, IngestError::Decode { .. }));
        assert!(load_comments(&path).is_empty());
    }
}
