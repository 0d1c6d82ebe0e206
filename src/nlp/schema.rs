//! Sentiment labels and field names used to read model replies and write reports.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Names used on both sides of the normalization step.
///
/// The defaults match the Portuguese template shipped in
/// [`prompt`](crate::nlp::prompt); a JSON file with any subset of these keys
/// overrides them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Schema {
    /// Sentiment labels, in output order.
    pub labels: Vec<String>,
    /// Key of the per-label count table in the report.
    pub counts_key: String,
    /// Key mapping labels to comment lists, in both the reply and the report.
    pub topics_key: String,
    /// Key of the free-text executive summary, in both the reply and the report.
    pub summary_key: String,
    /// Comment date field as emitted by the model.
    pub reply_date_field: String,
    /// Comment text field as emitted by the model.
    pub reply_comment_field: String,
    /// Comment date field in the report.
    pub report_date_field: String,
    /// Comment text field in the report.
    pub report_comment_field: String,
}

impl Default for Schema {
    fn default() -> Self {
        Self {
            labels: vec!["Positivo".into(), "Negativo".into(), "Neutro".into()],
            counts_key: "Tabela de Sentimentos".into(),
            topics_key: "Comentários por Tópicos".into(),
            summary_key: "Análise para o Conselho Executivo".into(),
            reply_date_field: "data".into(),
            reply_comment_field: "comentario".into(),
            report_date_field: "Data".into(),
            report_comment_field: "Comentário".into(),
        }
    }
}

impl Schema {
    /// Load a schema override from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text =
            fs::read_to_string(path).with_context(|| format!("reading schema {path:?}"))?;
        let schema: Schema =
            serde_json::from_str(&text).with_context(|| format!("parsing schema {path:?}"))?;
        anyhow::ensure!(!schema.labels.is_empty(), "schema {path:?} has no labels");
        Ok(schema)
    }

    /// Resolve the schema for a run: the given file, or the built-in default.
    pub fn resolve(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn has_label(&self, label: &str) -> bool {
        self.labels.iter().any(|l| l == label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_override_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        fs::write(
            &path,
            r#"{"labels": ["Positive", "Negative", "Neutral", "Mixed"], "summary_key": "Board Summary"}"#,
        )
        .unwrap();
        let schema = Schema::from_file(&path).unwrap();
        assert_eq!(schema.labels.len(), 4);
        assert!(schema.has_label("Mixed"));
        assert!(!schema.has_label("Positivo"));
        assert_eq!(schema.summary_key, "Board Summary");
        assert_eq!(schema.topics_key, "Comentários por Tópicos");
    }

    #[test]
    fn empty_label_set_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.json");
        fs::write(&path, r#"{"labels": []}"#).unwrap();
        assert!(Schema::from_file(&path).is_err());
    }

    #[test]
    fn resolve_without_file_is_default() {
        assert_eq!(Schema::resolve(None).unwrap(), Schema::default());
    }
}
