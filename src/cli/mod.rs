//! Command-line interface wiring for review-sentiment.

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Settings;

pub mod analyze;
pub mod prompt;
pub mod reshape;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(author, version, about = "Sentiment analysis of app review comments", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        match self.command {
            Commands::Analyze(args) => analyze::run(args, settings).await,
            Commands::Prompt(args) => prompt::run(args, settings),
            Commands::Reshape(args) => reshape::run(args, settings),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Classify comments through the model and save the sentiment report.
    Analyze(analyze::Args),
    /// Print the rendered prompt without calling the model.
    Prompt(prompt::Args),
    /// Rebuild a report from a saved raw model reply.
    Reshape(reshape::Args),
}
