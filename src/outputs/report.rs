//! JSON run report written after every pipeline run.
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! └── report_20250506_083001.json
//! ```
//!
//! ```json
//! {
//!   "success": true,
//!   "timestamp": "2025-05-06T08:30:01.204+08:00",
//!   "steps": {
//!     "fetch_news": { "success": true, "count": 10 },
//!     "generate_images": { "success": true, "images": ["..."] },
//!     "send_to_getnote": { "success": true, "skipped": true }
//!   }
//! }
//! ```

use crate::delivery::DeliveryReport;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Outcome of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    pub success: bool,
    pub timestamp: String,
    pub steps: Steps,
}

/// Per-stage outcomes; a stage that never ran is omitted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Steps {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fetch_news: Option<StepReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generate_images: Option<StepReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub send_to_getnote: Option<SendStep>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepReport {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<PathBuf>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepReport {
    pub fn fetched(count: usize) -> Self {
        Self {
            success: true,
            count: Some(count),
            images: None,
            error: None,
        }
    }

    pub fn rendered(images: Vec<PathBuf>) -> Self {
        Self {
            success: true,
            count: None,
            images: Some(images),
            error: None,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        Self {
            success: false,
            count: None,
            images: None,
            error: Some(error.to_string()),
        }
    }
}

/// Delivery stage: the sender's own report, a skip, or an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SendStep {
    Delivered(DeliveryReport),
    Skipped { success: bool, skipped: bool },
    Failed { success: bool, error: String },
}

impl SendStep {
    pub fn skipped() -> Self {
        SendStep::Skipped {
            success: true,
            skipped: true,
        }
    }

    pub fn failed(error: impl ToString) -> Self {
        SendStep::Failed {
            success: false,
            error: error.to_string(),
        }
    }
}

impl RunReport {
    pub fn started_at(at: DateTime<Local>) -> Self {
        Self {
            success: true,
            timestamp: at.to_rfc3339(),
            steps: Steps::default(),
        }
    }
}

/// Write `report` as pretty JSON into `output_dir`, named after `at`.
#[instrument(level = "info", skip(report), fields(output_dir = %output_dir.display()))]
pub async fn write_report(
    report: &RunReport,
    output_dir: &Path,
    at: DateTime<Local>,
) -> io::Result<PathBuf> {
    let json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;

    fs::create_dir_all(output_dir).await?;
    let path = output_dir.join(format!("report_{}.json", at.format("%Y%m%d_%H%M%S")));
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote run report");
    Ok(path)
}
