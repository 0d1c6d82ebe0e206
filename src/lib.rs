//! Batch sentiment classification of review comments through a local LLM.

pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod logging;
pub mod nlp;
