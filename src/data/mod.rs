//! Comment ingestion and report persistence layer.

pub mod comments;
pub mod report;
