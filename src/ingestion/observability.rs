//! Ingestion outcome reporting.
//!
//! [`super::ingest_from_path`] reports every load to an optional [`IngestionObserver`]: the
//! record count on success, a severity and the [`RosterError`] on failure, and an alert when
//! the severity reaches [`super::IngestionOptions::alert_at_or_above`].

use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{SecondsFormat, Utc};

use crate::error::RosterError;

use super::unified::IngestionFormat;

/// How bad a failed load is. Ordered, so it doubles as an alert threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum IngestionSeverity {
    Info,
    /// The roster loaded but a setting around it was rejected.
    Warning,
    /// The file was read but a record or the document was rejected.
    Error,
    /// The file could not be read at all.
    Critical,
}

impl IngestionSeverity {
    pub fn label(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }
}

/// The roster file an attempt read and the parser it used.
#[derive(Debug, Clone)]
pub struct IngestionContext {
    pub path: PathBuf,
    pub format: IngestionFormat,
}

/// Counts reported for a roster that loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestionStats {
    pub records: usize,
    /// Records without a primary rate (they price as `0` downstream).
    pub missing_rate: usize,
}

/// Receives ingestion outcomes. Every callback defaults to doing nothing, except `on_alert`,
/// which forwards to `on_failure`.
pub trait IngestionObserver: Send + Sync {
    fn on_success(&self, _ctx: &IngestionContext, _stats: IngestionStats) {}

    fn on_failure(&self, _ctx: &IngestionContext, _severity: IngestionSeverity, _error: &RosterError) {}

    /// Called after `on_failure` when `severity` meets the configured threshold.
    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &RosterError) {
        self.on_failure(ctx, severity, error)
    }
}

/// Offending record of a rejected roster, e.g. `row=2` or `username=twin`. Empty when the
/// error is not about one record.
fn offending_record(error: &RosterError) -> String {
    match error {
        RosterError::InvalidRecord { row, .. } => format!("row={row}"),
        RosterError::DuplicateIdentity { username } => format!("username={username}"),
        _ => String::new(),
    }
}

/// Forwards every outcome to each inner observer, in order.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn IngestionObserver>>,
}

impl CompositeObserver {
    pub fn new(observers: Vec<Arc<dyn IngestionObserver>>) -> Self {
        Self { observers }
    }

    fn each(&self, f: impl Fn(&dyn IngestionObserver)) {
        self.observers.iter().for_each(|o| f(o.as_ref()));
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeObserver({} observers)", self.observers.len())
    }
}

impl IngestionObserver for CompositeObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.each(|o| o.on_success(ctx, stats));
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &RosterError) {
        self.each(|o| o.on_failure(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &RosterError) {
        self.each(|o| o.on_alert(ctx, severity, error));
    }
}

/// Forwards ingestion events to the `log` facade under the `roster::ingest` target.
#[derive(Debug, Default)]
pub struct LogObserver;

impl IngestionObserver for LogObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        log::info!(
            target: "roster::ingest",
            "loaded {} models from {} ({})",
            stats.records,
            ctx.path.display(),
            ctx.format.label()
        );
        if stats.missing_rate > 0 {
            log::warn!(
                target: "roster::ingest",
                "{} model(s) in {} have no pvt_rate and price as 0",
                stats.missing_rate,
                ctx.path.display()
            );
        }
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &RosterError) {
        log::error!(
            target: "roster::ingest",
            "rejected {} ({}) severity={} {}: {error}",
            ctx.path.display(),
            ctx.format.label(),
            severity.label(),
            offending_record(error)
        );
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &RosterError) {
        log::error!(
            target: "roster::ingest",
            "ALERT roster {} unusable severity={}: {error}",
            ctx.path.display(),
            severity.label()
        );
    }
}

/// Appends one line per outcome to a roster load journal.
///
/// ```text
/// 2024-05-02T08:00:00Z loaded path=roster.json format=json records=3 missing_rate=0
/// 2024-05-02T08:05:00Z rejected path=bad.json format=json severity=error row=2 error="..."
/// ```
///
/// Journal writes are best-effort; an unwritable journal never fails ingestion.
#[derive(Debug)]
pub struct FileObserver {
    journal: PathBuf,
    lock: Mutex<()>,
}

impl FileObserver {
    pub fn new(journal: impl AsRef<Path>) -> Self {
        Self {
            journal: journal.as_ref().to_path_buf(),
            lock: Mutex::new(()),
        }
    }

    fn append(&self, event: &str, ctx: &IngestionContext, fields: &str) {
        let line = format!(
            "{} {event} path={} format={} {fields}",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            ctx.path.display(),
            ctx.format.label()
        );
        let _guard = self.lock.lock().ok();
        if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(&self.journal) {
            let _ = writeln!(f, "{}", line.trim_end());
        }
    }

    fn rejection_fields(severity: IngestionSeverity, error: &RosterError) -> String {
        format!("severity={} {} error={:?}", severity.label(), offending_record(error), error.to_string())
    }
}

impl IngestionObserver for FileObserver {
    fn on_success(&self, ctx: &IngestionContext, stats: IngestionStats) {
        self.append(
            "loaded",
            ctx,
            &format!("records={} missing_rate={}", stats.records, stats.missing_rate),
        );
    }

    fn on_failure(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &RosterError) {
        self.append("rejected", ctx, &Self::rejection_fields(severity, error));
    }

    fn on_alert(&self, ctx: &IngestionContext, severity: IngestionSeverity, error: &RosterError) {
        self.append("alert", ctx, &Self::rejection_fields(severity, error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offending_record_names_row_or_username() {
        let invalid = RosterError::InvalidRecord {
            row: 7,
            message: "bad tier".to_string(),
        };
        assert_eq!(offending_record(&invalid), "row=7");

        let duplicate = RosterError::DuplicateIdentity {
            username: "twin".to_string(),
        };
        assert_eq!(offending_record(&duplicate), "username=twin");

        let config = RosterError::Config {
            message: "x".to_string(),
        };
        assert_eq!(offending_record(&config), "");
    }

    #[test]
    fn severities_order_for_thresholds() {
        assert!(IngestionSeverity::Critical > IngestionSeverity::Error);
        assert!(IngestionSeverity::Warning > IngestionSeverity::Info);
        assert_eq!(IngestionSeverity::Critical.label(), "critical");
    }
}
