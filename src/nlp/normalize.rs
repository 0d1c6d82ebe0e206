//! Reshaping a parsed model reply into the fixed sentiment report.

use indexmap::IndexMap;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::nlp::schema::Schema;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("unexpected response structure: {0}")]
    StructuralMismatch(String),
}

/// One classified comment as written to the report.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicComment {
    pub date: String,
    pub comment: String,
}

/// Sentiment report with every configured label present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedResult {
    pub counts: IndexMap<String, usize>,
    pub topics: IndexMap<String, Vec<TopicComment>>,
    pub summary: String,
}

/// Reshape a parsed reply; labels outside the schema are dropped.
pub fn normalize(raw: &Value, schema: &Schema) -> Result<NormalizedResult, NormalizeError> {
    let topics = raw
        .get(&schema.topics_key)
        .ok_or_else(|| mismatch(format!("missing key {:?}", schema.topics_key)))?
        .as_object()
        .ok_or_else(|| mismatch(format!("{:?} is not an object", schema.topics_key)))?;

    for label in topics.keys().filter(|label| !schema.has_label(label)) {
        debug!(%label, "dropping unrecognized sentiment label");
    }

    let mut result = NormalizedResult::default();
    for label in &schema.labels {
        let comments = match topics.get(label) {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| topic_comment(item, label, schema))
                .collect::<Result<Vec<_>, _>>()?,
            Some(_) => return Err(mismatch(format!("comments for {label:?} are not a list"))),
            None => Vec::new(),
        };
        result.counts.insert(label.clone(), comments.len());
        result.topics.insert(label.clone(), comments);
    }
    result.summary = text_field(raw.get(&schema.summary_key));
    Ok(result)
}

fn topic_comment(
    item: &Value,
    label: &str,
    schema: &Schema,
) -> Result<TopicComment, NormalizeError> {
    let obj = item
        .as_object()
        .ok_or_else(|| mismatch(format!("comment under {label:?} is not an object")))?;
    Ok(TopicComment {
        date: text_field(obj.get(&schema.reply_date_field)),
        comment: text_field(obj.get(&schema.reply_comment_field)),
    })
}

fn text_field(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn mismatch(detail: String) -> NormalizeError {
    NormalizeError::StructuralMismatch(detail)
}

impl NormalizedResult {
    /// Render the report document in schema order.
    pub fn to_value(&self, schema: &Schema) -> Value {
        let mut counts = Map::new();
        let mut topics = Map::new();
        for label in &schema.labels {
            let count = self.counts.get(label).copied().unwrap_or(0);
            counts.insert(label.clone(), Value::from(count));
            let items = self
                .topics
                .get(label)
                .map(|list| {
                    list.iter()
                        .map(|c| {
                            let mut item = Map::new();
                            item.insert(
                                schema.report_date_field.clone(),
                                Value::from(c.date.as_str()),
                            );
                            item.insert(
                                schema.report_comment_field.clone(),
                                Value::from(c.comment.as_str()),
                            );
                            Value::Object(item)
                        })
                        .collect()
                })
                .unwrap_or_default();
            topics.insert(label.clone(), Value::Array(items));
        }

        let mut doc = Map::new();
        doc.insert(schema.counts_key.clone(), Value::Object(counts));
        doc.insert(schema.topics_key.clone(), Value::Object(topics));
        doc.insert(schema.summary_key.clone(), Value::from(self.summary.as_str()));
        Value::Object(doc)
    }

    /// Read back a document produced by [`NormalizedResult::to_value`].
    pub fn from_value(value: &Value, schema: &Schema) -> Result<Self, NormalizeError> {
        let counts_obj = value
            .get(&schema.counts_key)
            .and_then(Value::as_object)
            .ok_or_else(|| mismatch(format!("missing object {:?}", schema.counts_key)))?;
        let topics_obj = value
            .get(&schema.topics_key)
            .and_then(Value::as_object)
            .ok_or_else(|| mismatch(format!("missing object {:?}", schema.topics_key)))?;

        let mut result = Self::default();
        for label in &schema.labels {
            let count = counts_obj
                .get(label)
                .and_then(Value::as_u64)
                .ok_or_else(|| mismatch(format!("missing count for {label:?}")))?;
            let items = topics_obj
                .get(label)
                .and_then(Value::as_array)
                .ok_or_else(|| mismatch(format!("missing comments for {label:?}")))?;
            let comments = items
                .iter()
                .map(|item| TopicComment {
                    date: text_field(item.get(&schema.report_date_field)),
                    comment: text_field(item.get(&schema.report_comment_field)),
                })
                .collect();
            result.counts.insert(label.clone(), count as usize);
            result.topics.insert(label.clone(), comments);
        }
        result.summary = text_field(value.get(&schema.summary_key));
        Ok(result)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn single_positive_comment() {
        let raw = json!({
            "Comentários por Tópicos": {
                "Positivo": [{"data": "2024-01-01", "comentario": "ótimo"}]
            }
        });
        let schema = Schema::default();
        let result = normalize(&raw, &schema).unwrap();
        let doc = result.to_value(&schema);
        assert_eq!(
            doc["Tabela de Sentimentos"],
            json!({"Positivo": 1, "Negativo": 0, "Neutro": 0})
        );
        assert_eq!(
            doc["Comentários por Tópicos"]["Positivo"],
            json!([{"Data": "2024-01-01", "Comentário": "ótimo"}])
        );
        assert_eq!(doc["Análise para o Conselho Executivo"], json!(""));
    }

    #[test]
    fn all_labels_present_and_unknown_dropped() {
        let raw = json!({
            "Comentários por Tópicos": {
                "Neutro": [{"data": "2024-02-02"}, {"comentario": "sem data"}],
                "Misto": [{"data": "2024-02-03", "comentario": "ignorado"}]
            },
            "Análise para o Conselho Executivo": "Estável."
        });
        let result = normalize(&raw, &Schema::default()).unwrap();
        let labels: Vec<_> = result.counts.keys().cloned().collect();
        assert_eq!(labels, vec!["Positivo", "Negativo", "Neutro"]);
        assert_eq!(result.topics.keys().collect::<Vec<_>>(), labels.iter().collect::<Vec<_>>());
        assert_eq!(result.counts["Neutro"], 2);
        assert_eq!(result.counts["Positivo"], 0);
        assert_eq!(
            result.topics["Neutro"],
            vec![
                TopicComment {
                    date: "2024-02-02".into(),
                    comment: String::new()
                },
                TopicComment {
                    date: String::new(),
                    comment: "sem data".into()
                },
            ]
        );
        assert_eq!(result.summary, "Estável.");
        assert_eq!(result.total(), 2);
    }

    #[test]
    fn missing_topics_key_is_fatal() {
        let raw = json!({"Tabela de Sentimentos": {"Positivo": 3}});
        let err = normalize(&raw, &Schema::default()).unwrap_err();
        assert!(matches!(err, NormalizeError::StructuralMismatch(_)));
    }

    #[test]
    fn non_list_label_is_fatal() {
        let raw = json!({"Comentários por Tópicos": {"Positivo": "muitos"}});
        assert!(normalize(&raw, &Schema::default()).is_err());
    }

    #[test]
    fn scalar_fields_are_stringified() {
        let raw = json!({
            "Comentários por Tópicos": {"Negativo": [{"data": 20240101, "comentario": null}]},
            "Análise para o Conselho Executivo": ["linha 1", "linha 2"]
        });
        let result = normalize(&raw, &Schema::default()).unwrap();
        assert_eq!(result.topics["Negativo"][0].date, "20240101");
        assert_eq!(result.topics["Negativo"][0].comment, "");
        assert_eq!(result.summary, r#"["linha 1","linha 2"]"#);
    }

    #[test]
    fn document_round_trips() {
        let raw = json!({
            "Comentários por Tópicos": {
                "Positivo": [{"data": "d1", "comentario": "a"}, {"data": "d2", "comentario": "b"}],
                "Negativo": [{"data": "d3", "comentario": "c"}]
            },
            "Análise para o Conselho Executivo": "Resumo"
        });
        let schema = Schema::default();
        let result = normalize(&raw, &schema).unwrap();
        let back = NormalizedResult::from_value(&result.to_value(&schema), &schema).unwrap();
        assert_eq!(back, result);
    }
}
