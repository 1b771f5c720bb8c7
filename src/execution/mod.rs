//! Execution engine for running roster pipelines with configurable parallelism.
//!
//! This module sits "above" [`crate::processing`] and provides:
//!
//! - Parallel (chunked) execution for filter and summarize, with output identical to the
//!   sequential functions
//! - Resource limits / throttling (in-flight chunks)
//! - Real-time metrics, fallback diagnostics, and observer hooks for monitoring

mod observer;
mod semaphore;

use std::ops::Range;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use rayon::prelude::*;
use rayon::ThreadPool;
use rayon::ThreadPoolBuilder;

use crate::config::CatalogConfig;
use crate::error::{RosterError, RosterResult};
use crate::processing::{
    parse_query, sort_with, Criteria, DashboardSummary, FallbackCounts, SortSpec, SummaryAccumulator,
};
use crate::types::{ModelRecord, Roster};

pub use observer::{
    ExecutionEvent, ExecutionMetrics, ExecutionMetricsSnapshot, ExecutionObserver, LogExecutionObserver, Operation,
};

use semaphore::Semaphore;

/// Configuration for the [`CatalogEngine`].
#[derive(Debug, Clone)]
pub struct ExecutionOptions {
    /// Number of worker threads used by the engine.
    ///
    /// If `None`, uses the platform's available parallelism.
    pub num_threads: Option<usize>,
    /// Number of records per chunk.
    pub chunk_size: usize,
    /// Upper bound on concurrently executing chunks.
    ///
    /// This is an additional throttle on top of `num_threads`.
    pub max_in_flight_chunks: usize,
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        let n = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        Self {
            num_threads: Some(n),
            chunk_size: 256,
            max_in_flight_chunks: n.max(1),
        }
    }
}

/// Runs the roster pipeline on a dedicated thread pool.
///
/// The engine holds no roster state; one engine can serve any number of rosters. Runs started
/// from several threads at once are queued and execute one after another, so
/// [`CatalogEngine::metrics`] always describes a single, most recent run.
pub struct CatalogEngine {
    pool: ThreadPool,
    run_lock: Mutex<()>,
    opts: ExecutionOptions,
    config: CatalogConfig,
    observer: Option<Arc<dyn ExecutionObserver>>,
    metrics: Arc<ExecutionMetrics>,
}

impl CatalogEngine {
    /// Create a new engine with the given options and the default [`CatalogConfig`].
    ///
    /// Returns [`RosterError::Config`] if `chunk_size == 0`, `max_in_flight_chunks == 0`,
    /// `num_threads == Some(0)`, or the thread pool cannot be built.
    pub fn new(opts: ExecutionOptions) -> RosterResult<Self> {
        if opts.chunk_size == 0 {
            return Err(config_error("chunk_size must be > 0"));
        }
        if opts.max_in_flight_chunks == 0 {
            return Err(config_error("max_in_flight_chunks must be > 0"));
        }
        if opts.num_threads == Some(0) {
            return Err(config_error("num_threads must be > 0 when set"));
        }

        let n_threads = opts
            .num_threads
            .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
            .max(1);

        let pool = ThreadPoolBuilder::new()
            .num_threads(n_threads)
            .thread_name(|i| format!("roster-engine-{i}"))
            .build()
            .map_err(|e| config_error(&format!("failed to build thread pool: {e}")))?;

        Ok(Self {
            pool,
            run_lock: Mutex::new(()),
            opts,
            config: CatalogConfig::default(),
            observer: None,
            metrics: Arc::new(ExecutionMetrics::new()),
        })
    }

    /// Replace the scoring configuration.
    pub fn with_config(mut self, config: CatalogConfig) -> Self {
        self.config = config;
        self
    }

    /// Attach an observer for execution events (metrics/logging).
    pub fn with_observer(mut self, observer: Arc<dyn ExecutionObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Get a handle to real-time execution metrics.
    pub fn metrics(&self) -> Arc<ExecutionMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Filter in parallel chunks. The result equals [`crate::processing::filter`].
    pub fn filter_parallel(&self, roster: &Roster, criteria: &Criteria) -> Roster {
        self.run(Operation::Filter, roster.len(), || self.filter_chunks(roster, criteria))
    }

    /// Stable sort under the engine's rating scale.
    pub fn sort(&self, roster: &Roster, spec: SortSpec) -> Roster {
        self.run(Operation::Sort, roster.len(), || self.sort_inner(roster, spec))
    }

    /// Summarize in parallel chunks. The result equals
    /// [`crate::processing::summarize_with`] under the engine's config.
    pub fn summarize_parallel(&self, roster: &Roster) -> DashboardSummary {
        self.run(Operation::Summarize, roster.len(), || {
            self.report_fallbacks(&FallbackCounts::for_summary(roster));
            self.summarize_chunks(roster)
        })
    }

    /// Filter then sort: the catalog view of a roster.
    pub fn view(&self, roster: &Roster, criteria: &Criteria, spec: SortSpec) -> Roster {
        self.run(Operation::View, roster.len(), || {
            let filtered = self.filter_chunks(roster, criteria);
            self.sort_inner(&filtered, spec)
        })
    }

    /// Parse UI query parameters and produce the catalog view.
    ///
    /// Unparseable parameters fall back to their defaults and are counted in the run's
    /// fallback metrics.
    pub fn view_query<'a, I>(&self, roster: &Roster, pairs: I) -> Roster
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let parsed = parse_query(pairs);
        self.run(Operation::View, roster.len(), || {
            self.report_fallbacks(&parsed.fallbacks);
            let filtered = self.filter_chunks(roster, &parsed.criteria);
            self.sort_inner(&filtered, parsed.sort)
        })
    }

    fn run<T: Send>(&self, op: Operation, records: usize, f: impl FnOnce() -> T + Send) -> T {
        let _running = self.run_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let start = Instant::now();
        self.metrics.begin_run();
        self.emit(ExecutionEvent::RunStarted { op, records });

        let out = self.pool.install(f);

        self.metrics.end_run(start.elapsed());
        self.emit(ExecutionEvent::RunFinished {
            op,
            elapsed: start.elapsed(),
            metrics: self.metrics.snapshot(),
        });
        out
    }

    fn filter_chunks(&self, roster: &Roster, criteria: &Criteria) -> Roster {
        let compiled = criteria.compile();
        if compiled.is_identity() {
            self.metrics.on_records_processed(roster.len());
            return roster.clone();
        }

        let per_chunk: Vec<Vec<ModelRecord>> = self.map_chunks(
            roster,
            |_, records| records.iter().filter(|r| compiled.matches(r)).cloned().collect(),
            |kept: &Vec<ModelRecord>| kept.len(),
        );

        Roster::new(per_chunk.into_iter().flatten().collect())
    }

    fn summarize_chunks(&self, roster: &Roster) -> DashboardSummary {
        let partials: Vec<SummaryAccumulator> = self.map_chunks(
            roster,
            |range, records| {
                let mut acc = SummaryAccumulator::from_config(&self.config);
                for (offset, r) in records.iter().enumerate() {
                    acc.push(range.start + offset, r);
                }
                acc
            },
            |_| 1,
        );

        partials
            .into_iter()
            .fold(SummaryAccumulator::from_config(&self.config), SummaryAccumulator::merge)
            .finish()
    }

    fn sort_inner(&self, roster: &Roster, spec: SortSpec) -> Roster {
        self.report_fallbacks(&FallbackCounts::for_sort(roster, spec.key));
        self.emit(ExecutionEvent::SortApplied { spec });
        sort_with(roster, spec, &self.config.scale)
    }

    /// Run `work` over every chunk in parallel, returning results in chunk order.
    ///
    /// `output_len` sizes the `ChunkFinished` event.
    fn map_chunks<T, W, L>(&self, roster: &Roster, work: W, output_len: L) -> Vec<T>
    where
        T: Send,
        W: Fn(Range<usize>, &[ModelRecord]) -> T + Send + Sync,
        L: Fn(&T) -> usize + Send + Sync,
    {
        let sem = Semaphore::new(self.opts.max_in_flight_chunks);
        chunk_ranges(roster.len(), self.opts.chunk_size)
            .into_par_iter()
            .map(|range| {
                let (permit, waited) = sem.acquire();
                if waited > Duration::ZERO {
                    self.metrics.on_throttle_wait(waited);
                    self.emit(ExecutionEvent::ThrottleWaited { duration: waited });
                }

                self.metrics.on_chunk_start();
                self.emit(ExecutionEvent::ChunkStarted {
                    start_index: range.start,
                    record_count: range.len(),
                });

                let records = &roster.records[range.clone()];
                let out = work(range, records);
                self.metrics.on_records_processed(records.len());

                self.emit(ExecutionEvent::ChunkFinished {
                    output_records: output_len(&out),
                });
                self.metrics.on_chunk_end();
                drop(permit);
                out
            })
            .collect()
    }

    fn report_fallbacks(&self, counts: &FallbackCounts) {
        for (kind, count) in counts.non_zero() {
            self.metrics.on_fallback(kind, count);
            self.emit(ExecutionEvent::FallbackHit { kind, count });
        }
    }

    fn emit(&self, event: ExecutionEvent) {
        if let Some(obs) = &self.observer {
            obs.on_event(&event);
        }
    }
}

fn config_error(message: &str) -> RosterError {
    RosterError::Config {
        message: message.to_string(),
    }
}

fn chunk_ranges(len: usize, chunk_size: usize) -> Vec<Range<usize>> {
    if len == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(len.div_ceil(chunk_size));
    let mut start = 0usize;
    while start < len {
        let end = (start + chunk_size).min(len);
        out.push(start..end);
        start = end;
    }
    out
}
