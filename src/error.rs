//! Error taxonomy for the sentiment pipeline.

use thiserror::Error;

use crate::{
    data::{comments::IngestError, report::WriteError},
    nlp::{model::ModelError, normalize::NormalizeError, prompt::PromptError},
};

/// Any failure that ends a sentiment-analysis run.
///
/// Per-line ingestion problems never surface here; they are tallied on the
/// [`CommentBatch`](crate::data::comments::CommentBatch) instead.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Prompt(#[from] PromptError),

    #[error("model call failed: {0}")]
    Model(#[from] ModelError),

    #[error("failed to extract JSON content from the response")]
    Extraction,

    #[error("problem decoding JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Normalize(#[from] NormalizeError),

    #[error(transparent)]
    Write(#[from] WriteError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
