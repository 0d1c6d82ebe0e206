//! CLI entry-point for the full sentiment-analysis run.

use std::path::PathBuf;

use anyhow::Result;
use chrono::Local;
use clap::Args as ClapArgs;
use tracing::{error, info, instrument, warn};

use crate::{
    config::Settings,
    data::comments,
    nlp::{
        self,
        extract::ExtractStrategy,
        model::OllamaClient,
        prompt::SENTIMENT_ANALYSIS,
        schema::Schema,
        ReportTarget,
    },
};

/// Args for the `analyze` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Comments file; defaults to `COMMENTS_FILE`.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Prompt template key.
    #[arg(long = "case", default_value = SENTIMENT_ANALYSIS)]
    pub case_of_use: String,
    /// Report file-name suffix; defaults to `OUTPUT_PREFIX`.
    #[arg(long)]
    pub prefix: Option<String>,
    /// How the JSON object is located in the model reply.
    #[arg(long, value_enum, default_value_t = ExtractStrategy::Balanced)]
    pub extract: ExtractStrategy,
    /// Schema override for labels and field names.
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

/// Failures are reported to the operator; the command itself always completes.
#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let input = args.input.as_deref().unwrap_or(&settings.comments_file);
    let batch = comments::load_comments(input);
    if batch.is_empty() {
        warn!(path = %input.display(), "no comments to analyse");
        return Ok(());
    }

    let schema = match Schema::resolve(settings.schema_path(args.schema.as_deref())) {
        Ok(schema) => schema,
        Err(err) => {
            error!("error analysing sentiment: {err:#}");
            return Ok(());
        }
    };
    let client = match OllamaClient::new(&settings.model_config()) {
        Ok(client) => client,
        Err(err) => {
            error!(%err, "error analysing sentiment");
            return Ok(());
        }
    };

    let prefix = args.prefix.as_deref().unwrap_or(&settings.output_prefix);
    let target = ReportTarget {
        dir: &settings.outputs_dir,
        prefix,
        date: Local::now().date_naive(),
    };

    match nlp::analyze_sentiment(
        &client,
        &batch,
        &args.case_of_use,
        args.extract,
        &schema,
        &target,
    )
    .await
    {
        Ok(report) => {
            info!(
                path = %report.path.display(),
                comments = report.comments,
                skipped = report.skipped_lines,
                "results saved"
            );
            println!("{}", report.path.display());
        }
        Err(err) => error!(%err, "error analysing sentiment"),
    }
    Ok(())
}
