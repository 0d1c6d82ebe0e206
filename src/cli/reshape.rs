//! CLI entry-point for rebuilding a report from a saved model reply.

use std::{fs, path::PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args as ClapArgs;
use tracing::{error, instrument};

use crate::{
    config::Settings,
    nlp::{self, extract::ExtractStrategy, schema::Schema, ReportTarget},
};

/// Args for the `reshape` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// File holding the raw text of a model reply.
    #[arg(long)]
    pub response: PathBuf,
    /// Report file-name suffix; defaults to `OUTPUT_PREFIX`.
    #[arg(long)]
    pub prefix: Option<String>,
    /// How the JSON object is located in the reply.
    #[arg(long, value_enum, default_value_t = ExtractStrategy::Balanced)]
    pub extract: ExtractStrategy,
    /// Schema override for labels and field names.
    #[arg(long)]
    pub schema: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub fn run(args: Args, settings: Settings) -> Result<()> {
    let reply = fs::read_to_string(&args.response)
        .with_context(|| format!("reading model reply {:?}", args.response))?;
    let schema = Schema::resolve(settings.schema_path(args.schema.as_deref()))?;
    let target = ReportTarget {
        dir: &settings.outputs_dir,
        prefix: args.prefix.as_deref().unwrap_or(&settings.output_prefix),
        date: Local::now().date_naive(),
    };

    match nlp::reshape_reply(&reply, args.extract, &schema, &target) {
        Ok((_, path)) => println!("{}", path.display()),
        Err(err) => error!(%err, "error reshaping model reply"),
    }
    Ok(())
}
