//! Sentiment classification orchestration layer.

pub mod extract;
pub mod model;
pub mod normalize;
pub mod prompt;
pub mod schema;

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info, instrument};

use crate::{
    data::{comments::CommentBatch, report},
    error::{PipelineError, Result},
};

use self::{
    extract::ExtractStrategy, model::ModelClient, normalize::NormalizedResult, schema::Schema,
};

/// Where and how a run's report is written.
#[derive(Debug, Clone)]
pub struct ReportTarget<'a> {
    pub dir: &'a Path,
    pub prefix: &'a str,
    pub date: NaiveDate,
}

/// Outcome of a successful run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub comments: usize,
    pub skipped_lines: usize,
    pub result: NormalizedResult,
    pub path: PathBuf,
}

/// Classify a batch of comments through the model and save the report.
#[instrument(skip_all, fields(case_of_use = %case_of_use, comments = batch.len()))]
pub async fn analyze_sentiment(
    client: &dyn ModelClient,
    batch: &CommentBatch,
    case_of_use: &str,
    strategy: ExtractStrategy,
    schema: &Schema,
    target: &ReportTarget<'_>,
) -> Result<RunReport> {
    let prompt = prompt::build_prompt(case_of_use, &batch.comments)?;
    debug!(%prompt, "prompt being sent to the model");

    let reply = client.chat(&prompt).await?;
    debug!(content = reply.content(), "model reply");

    let (result, path) = reshape_reply(reply.content(), strategy, schema, target)?;
    Ok(RunReport {
        comments: batch.len(),
        skipped_lines: batch.skipped.total(),
        result,
        path,
    })
}

/// Extract, parse, normalize and save a raw model reply.
pub fn reshape_reply(
    reply: &str,
    strategy: ExtractStrategy,
    schema: &Schema,
    target: &ReportTarget<'_>,
) -> Result<(NormalizedResult, PathBuf)> {
    let json_content = strategy.extract(reply);
    if json_content.is_empty() {
        return Err(PipelineError::Extraction);
    }
    debug!(%json_content, "cleaned content");

    let raw: Value = serde_json::from_str(json_content)?;
    let result = normalize::normalize(&raw, schema)?;
    debug!(document = %result.to_value(schema), "result to be saved");
    let path = report::write_result(&result, schema, target.dir, target.prefix, target.date)?;
    info!(
        path = %path.display(),
        counts = ?result.counts,
        "sentiment report written"
    );
    Ok((result, path))
}
