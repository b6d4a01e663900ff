//! Feedback log — visitor testimonials appended to a local JSON file.
//!
//! DESIGN
//! ======
//! The log is a single JSON array, rewritten whole on every append. Appends
//! are serialized through an async mutex so concurrent submissions in one
//! process never lose a record. Ids are millisecond timestamps, bumped past
//! the last stored id so they stay strictly increasing.
//!
//! `submit` is the form-shaped entry point: it reports `Loading` and then
//! `Success` or `Error`. Failures are logged and never retried.

use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{error, info};

use crate::error::ErrorCode;

pub const DEFAULT_IMAGE_SRC: &str = "https://images.unsplash.com/photo-1535713875002-d1d0cf377fde?q=80&w=1000";
pub const DEFAULT_THUMBNAIL_SRC: &str = "https://images.unsplash.com/photo-1535713875002-d1d0cf377fde?q=80&w=200";

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum FeedbackError {
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("feedback log io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("feedback log is not valid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl ErrorCode for FeedbackError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "E_FEEDBACK_MISSING_FIELD",
            Self::Io(_) => "E_FEEDBACK_IO",
            Self::Json(_) => "E_FEEDBACK_JSON",
        }
    }
}

/// Form input. Blank images fall back to the stock avatar.
#[derive(Debug, Clone, Default)]
pub struct FeedbackDraft {
    pub name: String,
    pub affiliation: String,
    pub quote: String,
    pub image_src: Option<String>,
    pub thumbnail_src: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRecord {
    pub id: u64,
    pub name: String,
    pub affiliation: String,
    pub quote: String,
    pub image_src: String,
    pub thumbnail_src: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

fn now_ms() -> u64 {
    let Ok(dur) = SystemTime::now().duration_since(UNIX_EPOCH) else {
        return 0;
    };
    u64::try_from(dur.as_millis()).unwrap_or(u64::MAX)
}

fn required(value: &str, field: &'static str) -> Result<String, FeedbackError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(FeedbackError::MissingField(field));
    }
    Ok(value.to_string())
}

fn image_or(value: Option<&str>, default: &str) -> String {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(default)
        .to_string()
}

// =============================================================================
// STORE
// =============================================================================

pub struct FeedbackStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FeedbackStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records, oldest first. A missing file is an empty log.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a JSON array of records.
    pub async fn load(&self) -> Result<Vec<FeedbackRecord>, FeedbackError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Vec::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Validate `draft` and append it as a new record.
    ///
    /// # Errors
    ///
    /// Returns [`FeedbackError::MissingField`] for a blank name, affiliation or
    /// quote, or an io/json error if the log cannot be read or written.
    pub async fn append(&self, draft: FeedbackDraft) -> Result<FeedbackRecord, FeedbackError> {
        let name = required(&draft.name, "name")?;
        let affiliation = required(&draft.affiliation, "affiliation")?;
        let quote = required(&draft.quote, "quote")?;

        let _guard = self.write_lock.lock().await;
        let mut records = self.load().await?;
        let floor = records.last().map_or(0, |r| r.id.saturating_add(1));
        let record = FeedbackRecord {
            id: now_ms().max(floor),
            name,
            affiliation,
            quote,
            image_src: image_or(draft.image_src.as_deref(), DEFAULT_IMAGE_SRC),
            thumbnail_src: image_or(draft.thumbnail_src.as_deref(), DEFAULT_THUMBNAIL_SRC),
        };
        records.push(record.clone());

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_vec_pretty(&records)?).await?;
        info!(id = record.id, total = records.len(), "feedback: record appended");
        Ok(record)
    }

    /// Append `draft`, reporting `Loading` then `Success` or `Error`.
    pub async fn submit<F>(&self, draft: FeedbackDraft, mut on_status: F) -> Option<FeedbackRecord>
    where
        F: FnMut(SubmissionStatus),
    {
        on_status(SubmissionStatus::Loading);
        match self.append(draft).await {
            Ok(record) => {
                on_status(SubmissionStatus::Success);
                Some(record)
            }
            Err(e) => {
                error!(error = %e, code = e.error_code(), "feedback: submission failed");
                on_status(SubmissionStatus::Error);
                None
            }
        }
    }
}

#[cfg(test)]
#[path = "feedback_test.rs"]
mod tests;
