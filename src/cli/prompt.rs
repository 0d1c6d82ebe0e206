//! CLI entry-point for previewing the rendered prompt.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    config::Settings,
    data::comments,
    nlp::prompt::{self, SENTIMENT_ANALYSIS},
};

/// Args for the `prompt` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Comments file; defaults to `COMMENTS_FILE`.
    #[arg(long)]
    pub input: Option<PathBuf>,
    /// Prompt template key.
    #[arg(long = "case", default_value = SENTIMENT_ANALYSIS)]
    pub case_of_use: String,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let input = args.input.as_deref().unwrap_or(&settings.comments_file);
    let batch = comments::load_comments(input);
    let rendered = prompt::build_prompt(&args.case_of_use, &batch.comments)?;
    println!("{rendered}");
    Ok(())
}
