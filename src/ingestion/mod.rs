//! Roster ingestion.
//!
//! Most callers should use [`ingest_from_path`] (from [`unified`]) which:
//!
//! - auto-detects JSON vs NDJSON by file extension (or you can override via [`IngestionOptions`])
//! - validates every record against the model schema and rejects duplicate usernames
//! - optionally reports success/failure/alerts to an [`IngestionObserver`]
//!
//! String-based entrypoints live in [`json`].

pub mod json;
pub mod observability;
pub mod unified;

pub use json::{ingest_ndjson_from_str, ingest_roster_from_path, ingest_roster_from_str};
pub use observability::{
    CompositeObserver, FileObserver, IngestionContext, IngestionObserver, IngestionSeverity, IngestionStats,
    LogObserver,
};
pub use unified::{ingest_from_path, IngestionFormat, IngestionOptions, IngestionRequest};
