//! `roster-pipeline` loads a roster of rated live-stream performers and turns it into the data a
//! catalog dashboard shows: scores, value ratings, filtered and sorted views, and summary
//! statistics.
//!
//! The primary entrypoints are [`ingestion::ingest_from_path`] for loading a roster file and the
//! functions in [`processing`] for working with it. [`execution::CatalogEngine`] runs the same
//! operations over a thread pool with metrics and observer hooks.
//!
//! ## What you can ingest
//!
//! - **JSON**: `.json`, holding an array of model objects, a single object, or an envelope
//!   `{"models": [...]}`
//! - **NDJSON**: `.ndjson` / `.jsonl`, one model object per line
//!
//! Ratings use the tier labels `S++`, `S+`, `S`, `A+`, `A`, `B`, `C`, `D`. A record whose
//! `pricing` carries only a `"44/10"` style `pvt` label gets its rate and minimum parsed from it.
//!
//! ## Quick example: ingest a roster
//!
//! ```no_run
//! use roster_pipeline::ingestion::{ingest_from_path, IngestionOptions};
//!
//! # fn main() -> Result<(), roster_pipeline::RosterError> {
//! let roster = ingest_from_path("roster.json", &IngestionOptions::default())?;
//! println!("models={}", roster.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: file loading, format detection, and ingestion observers
//! - [`types`]: the record model ([`types::ModelRecord`], [`types::Roster`], rating tiers)
//! - [`processing`]: scoring, filter, sort, summarize, cards and dashboard assembly
//! - [`execution`]: parallel engine with throttling, metrics, and fallback diagnostics
//! - [`config`]: tunable scoring constants and list limits
//! - [`error`]: the crate-wide error type
//!
//! ## Processing example
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use roster_pipeline::processing::{filter, sort, summarize, Criteria, SortDirection, SortKey};
//! use roster_pipeline::types::{ModelRecord, Pricing, RatingTier, Roster};
//!
//! let ts = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
//! let mut a = ModelRecord::new("a", RatingTier::S, ts);
//! a.pricing = Pricing::with_rate(20.0);
//! let mut b = ModelRecord::new("b", RatingTier::A, ts);
//! b.pricing = Pricing::with_rate(40.0);
//! let roster: Roster = vec![a, b].into_iter().collect();
//!
//! let top = filter(&roster, &Criteria::new().with_rating_tier(RatingTier::S));
//! assert_eq!(top.usernames(), vec!["a"]);
//!
//! let by_price = sort(&roster, SortKey::Price, SortDirection::Descending);
//! assert_eq!(by_price.usernames(), vec!["b", "a"]);
//!
//! let summary = summarize(&roster);
//! assert_eq!(summary.total_models, 2);
//! assert_eq!(summary.average_score, 81.5);
//! ```

pub mod config;
pub mod error;
pub mod execution;
pub mod ingestion;
pub mod processing;
pub mod types;

pub use config::CatalogConfig;
pub use error::{RosterError, RosterResult};
