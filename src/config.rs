//! Runtime configuration utilities for review-sentiment.

use std::{
    env,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;

use crate::nlp::model::ModelConfig;

/// Application configuration resolved from `.env` and defaults.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Base URL of the Ollama server.
    pub ollama_host: String,
    /// Model used for classification.
    pub ollama_model: String,
    /// Optional request timeout for the model call.
    pub model_timeout: Option<Duration>,
    /// Newline-delimited JSON file of scraped reviews.
    pub comments_file: PathBuf,
    /// Folder receiving the JSON reports.
    pub outputs_dir: PathBuf,
    /// File-name suffix of written reports.
    pub output_prefix: String,
    /// Optional JSON schema override for labels and field names.
    pub schema_file: Option<PathBuf>,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let ollama_host =
            env::var("OLLAMA_HOST").unwrap_or_else(|_| "http://localhost:11434".to_string());
        let ollama_model = env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3".to_string());
        let model_timeout = env::var("MODEL_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .map(Duration::from_secs);
        let comments_file = env::var("COMMENTS_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("google_play_review.json"));
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));
        let output_prefix = env::var("OUTPUT_PREFIX")
            .unwrap_or_else(|_| "android_analysis_sentiment".to_string());
        let schema_file = env::var("SCHEMA_FILE").ok().map(PathBuf::from);

        std::fs::create_dir_all(&outputs_dir).context("creating outputs dir")?;

        Ok(Self {
            ollama_host,
            ollama_model,
            model_timeout,
            comments_file,
            outputs_dir,
            output_prefix,
            schema_file,
        })
    }

    /// Explicit client configuration handed to the model collaborator.
    pub fn model_config(&self) -> ModelConfig {
        ModelConfig {
            host: self.ollama_host.clone(),
            model: self.ollama_model.clone(),
            timeout: self.model_timeout,
        }
    }

    /// Schema file from the CLI, else from the environment.
    pub fn schema_path<'a>(&'a self, cli: Option<&'a Path>) -> Option<&'a Path> {
        cli.or(self.schema_file.as_deref())
    }
}
