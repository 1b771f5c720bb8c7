//! Unified ingestion entrypoint.
//!
//! Most callers should use [`ingest_from_path`], which loads a roster file into an in-memory
//! [`crate::types::Roster`].
//!
//! - If [`IngestionOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`super::observability::IngestionObserver`] is provided, success/failure/alerts are
//!   reported to it.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::error::{RosterError, RosterResult};
use crate::types::Roster;

use super::json;
use super::observability::{IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats};

/// Supported roster file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestionFormat {
    /// A JSON array, a single object, or a `{"models": [...]}` envelope.
    Json,
    /// One JSON object per line.
    Ndjson,
}

impl IngestionFormat {
    /// Parse an ingestion format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Self::Json),
            "ndjson" | "jsonl" => Some(Self::Ndjson),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Ndjson => "ndjson",
        }
    }
}

#[derive(Clone)]
pub struct IngestionOptions {
    /// If `None`, auto-detect format from file extension.
    pub format: Option<IngestionFormat>,
    /// Optional observer for logging/alerts.
    pub observer: Option<Arc<dyn IngestionObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: IngestionSeverity,
}

impl fmt::Debug for IngestionOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IngestionOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for IngestionOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: IngestionSeverity::Critical,
        }
    }
}

/// Load a roster from `path`.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
///
/// use roster_pipeline::ingestion::{ingest_from_path, IngestionOptions, IngestionSeverity, LogObserver};
///
/// # fn main() -> Result<(), roster_pipeline::RosterError> {
/// let opts = IngestionOptions {
///     observer: Some(Arc::new(LogObserver)),
///     alert_at_or_above: IngestionSeverity::Error,
///     ..Default::default()
/// };
/// let roster = ingest_from_path("roster.json", &opts)?;
/// println!("records={}", roster.len());
/// # Ok(())
/// # }
/// ```
pub fn ingest_from_path(path: impl AsRef<Path>, options: &IngestionOptions) -> RosterResult<Roster> {
    let path = path.as_ref();
    let fmt = match options.format {
        Some(f) => f,
        None => infer_format_from_path(path)?,
    };

    let ctx = IngestionContext {
        path: path.to_path_buf(),
        format: fmt,
    };

    let result = fs::read_to_string(path)
        .map_err(RosterError::from)
        .and_then(|text| match fmt {
            IngestionFormat::Json => json::ingest_roster_from_str(&text),
            IngestionFormat::Ndjson => json::ingest_ndjson_from_str(&text),
        });

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(roster) => obs.on_success(
                &ctx,
                IngestionStats {
                    records: roster.len(),
                    missing_rate: roster.iter().filter(|r| r.pricing.rate.is_none()).count(),
                },
            ),
            Err(e) => {
                let sev = severity_for_error(e);
                obs.on_failure(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn severity_for_error(e: &RosterError) -> IngestionSeverity {
    match e {
        RosterError::Io(_) => IngestionSeverity::Critical,
        RosterError::Json(_)
        | RosterError::InvalidRecord { .. }
        | RosterError::DuplicateIdentity { .. } => IngestionSeverity::Error,
        RosterError::InvalidScale { .. } | RosterError::Config { .. } => IngestionSeverity::Warning,
    }
}

fn infer_format_from_path(path: &Path) -> RosterResult<IngestionFormat> {
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .ok_or_else(|| RosterError::Config {
            message: format!("cannot infer format: path has no extension ({})", path.display()),
        })?;

    IngestionFormat::from_extension(ext).ok_or_else(|| RosterError::Config {
        message: format!(
            "cannot infer format from extension '{ext}' for path ({})",
            path.display()
        ),
    })
}

/// Owned ingestion request, e.g. for handing to a job queue.
#[derive(Clone, Debug)]
pub struct IngestionRequest {
    /// Path to the roster file.
    pub path: PathBuf,
    /// Options controlling ingestion.
    pub options: IngestionOptions,
}

impl IngestionRequest {
    /// Execute the request by calling [`ingest_from_path`].
    pub fn run(&self) -> RosterResult<Roster> {
        ingest_from_path(&self.path, &self.options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_from_extension() {
        assert_eq!(IngestionFormat::from_extension("JSON"), Some(IngestionFormat::Json));
        assert_eq!(IngestionFormat::from_extension("jsonl"), Some(IngestionFormat::Ndjson));
        assert_eq!(IngestionFormat::from_extension("csv"), None);
    }

    #[test]
    fn unknown_extension_is_rejected_before_reading() {
        let err = ingest_from_path("roster.csv", &IngestionOptions::default()).unwrap_err();
        assert!(err.to_string().contains("cannot infer format"));
    }
}
