pub mod followers;
pub mod network;
pub mod wordcloud;

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Result of a complete pipeline run
#[derive(Debug, Serialize)]
pub struct RunSummary {
    pub pipeline: String,
    pub records_fetched: usize,
    pub records_kept: usize,
    pub records_geocoded: usize,
    pub artifacts: Vec<String>,
    pub completed_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn new(pipeline: &str) -> Self {
        Self {
            pipeline: pipeline.to_string(),
            records_fetched: 0,
            records_kept: 0,
            records_geocoded: 0,
            artifacts: Vec::new(),
            completed_at: Utc::now(),
        }
    }

    /// Stamp the summary once the pipeline finishes.
    pub fn finish(mut self) -> Self {
        self.completed_at = Utc::now();
        self
    }
}

/// Persist a normalized table to pretty-printed JSON under the output
/// directory, returning the written path.
pub fn persist_json<T: Serialize>(value: &T, output_dir: &str, filename: &str) -> Result<String> {
    fs::create_dir_all(output_dir)?;
    let filepath = Path::new(output_dir).join(filename);
    let content = serde_json::to_string_pretty(value)?;
    fs::write(&filepath, content)?;
    Ok(filepath.to_string_lossy().to_string())
}

/// Write an HTML artifact under the output directory.
pub fn persist_html(page: &str, output_dir: &str, filename: &str) -> Result<String> {
    fs::create_dir_all(output_dir)?;
    let filepath = Path::new(output_dir).join(filename);
    fs::write(&filepath, page)?;
    Ok(filepath.to_string_lossy().to_string())
}
