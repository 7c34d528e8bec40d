//! Session telemetry counters.
//!
//! Tracks what the live loop did - samples accepted and rejected, ticks
//! computed, reports built - without holding any signal data. Counters
//! persist across runs so `jawsense status` can show cumulative totals.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Counters for the current session.
#[derive(Debug)]
pub struct SessionCounters {
    samples_ingested: AtomicU64,
    samples_rejected: AtomicU64,
    ticks_computed: AtomicU64,
    reports_built: AtomicU64,
    session_start: DateTime<Utc>,
    persist_path: Option<PathBuf>,
}

impl SessionCounters {
    pub fn new() -> Self {
        Self {
            samples_ingested: AtomicU64::new(0),
            samples_rejected: AtomicU64::new(0),
            ticks_computed: AtomicU64::new(0),
            reports_built: AtomicU64::new(0),
            session_start: Utc::now(),
            persist_path: None,
        }
    }

    /// Create counters backed by a JSON file, seeded from any previous run.
    pub fn with_persistence(path: PathBuf) -> Self {
        let mut counters = Self::new();
        counters.persist_path = Some(path);

        if let Err(e) = counters.load() {
            eprintln!("Note: could not load previous telemetry: {e}");
        }

        counters
    }

    pub fn record_sample_ingested(&self) {
        self.samples_ingested.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_sample_rejected(&self) {
        self.samples_rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_tick_computed(&self) {
        self.ticks_computed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_report_built(&self) {
        self.reports_built.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the current statistics.
    pub fn stats(&self) -> TelemetryStats {
        TelemetryStats {
            samples_ingested: self.samples_ingested.load(Ordering::Relaxed),
            samples_rejected: self.samples_rejected.load(Ordering::Relaxed),
            ticks_computed: self.ticks_computed.load(Ordering::Relaxed),
            reports_built: self.reports_built.load(Ordering::Relaxed),
            session_start: self.session_start,
            session_duration_secs: (Utc::now() - self.session_start).num_seconds() as u64,
        }
    }

    /// Get a summary string for display.
    pub fn summary(&self) -> String {
        let stats = self.stats();
        format!(
            "Session telemetry:\n\
             - Samples ingested: {}\n\
             - Samples rejected: {}\n\
             - Snapshots computed: {}\n\
             - Reports built: {}\n\
             - Session duration: {} seconds",
            stats.samples_ingested,
            stats.samples_rejected,
            stats.ticks_computed,
            stats.reports_built,
            stats.session_duration_secs
        )
    }

    /// Save counters to disk.
    pub fn save(&self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            let stats = self.stats();
            let persisted = PersistedCounters {
                samples_ingested: stats.samples_ingested,
                samples_rejected: stats.samples_rejected,
                ticks_computed: stats.ticks_computed,
                reports_built: stats.reports_built,
                last_updated: Utc::now(),
            };

            let json = serde_json::to_string_pretty(&persisted).map_err(std::io::Error::other)?;
            std::fs::write(path, json)?;
        }
        Ok(())
    }

    /// Load counters from disk.
    fn load(&mut self) -> Result<(), std::io::Error> {
        if let Some(ref path) = self.persist_path {
            if path.exists() {
                let content = std::fs::read_to_string(path)?;
                let persisted: PersistedCounters =
                    serde_json::from_str(&content).map_err(std::io::Error::other)?;

                self.samples_ingested
                    .store(persisted.samples_ingested, Ordering::Relaxed);
                self.samples_rejected
                    .store(persisted.samples_rejected, Ordering::Relaxed);
                self.ticks_computed
                    .store(persisted.ticks_computed, Ordering::Relaxed);
                self.reports_built
                    .store(persisted.reports_built, Ordering::Relaxed);
            }
        }
        Ok(())
    }

    /// Reset all counters.
    pub fn reset(&self) {
        self.samples_ingested.store(0, Ordering::Relaxed);
        self.samples_rejected.store(0, Ordering::Relaxed);
        self.ticks_computed.store(0, Ordering::Relaxed);
        self.reports_built.store(0, Ordering::Relaxed);
    }
}

impl Default for SessionCounters {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of telemetry statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryStats {
    pub samples_ingested: u64,
    pub samples_rejected: u64,
    pub ticks_computed: u64,
    pub reports_built: u64,
    pub session_start: DateTime<Utc>,
    pub session_duration_secs: u64,
}

/// Counter format for persistence.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedCounters {
    samples_ingested: u64,
    samples_rejected: u64,
    ticks_computed: u64,
    reports_built: u64,
    last_updated: DateTime<Utc>,
}

/// Thread-safe shared counters.
pub type SharedCounters = Arc<SessionCounters>;

/// Create new shared counters.
pub fn create_shared_counters() -> SharedCounters {
    Arc::new(SessionCounters::new())
}

/// Create new shared counters with persistence.
pub fn create_shared_counters_with_persistence(path: PathBuf) -> SharedCounters {
    Arc::new(SessionCounters::with_persistence(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counting() {
        let counters = SessionCounters::new();

        counters.record_sample_ingested();
        counters.record_sample_ingested();
        counters.record_sample_rejected();
        counters.record_tick_computed();

        let stats = counters.stats();
        assert_eq!(stats.samples_ingested, 2);
        assert_eq!(stats.samples_rejected, 1);
        assert_eq!(stats.ticks_computed, 1);
        assert_eq!(stats.reports_built, 0);
    }

    #[test]
    fn test_reset() {
        let counters = SessionCounters::new();
        counters.record_sample_ingested();
        counters.record_report_built();
        counters.reset();

        let stats = counters.stats();
        assert_eq!(stats.samples_ingested, 0);
        assert_eq!(stats.reports_built, 0);
    }

    #[test]
    fn test_summary_format() {
        let counters = SessionCounters::new();
        let summary = counters.summary();

        assert!(summary.contains("Samples ingested"));
        assert!(summary.contains("Samples rejected"));
        assert!(summary.contains("Snapshots computed"));
        assert!(summary.contains("Reports built"));
    }

    #[test]
    fn test_persistence_round_trip() {
        let path = std::env::temp_dir().join("jawsense-telemetry-test.json");
        let _ = std::fs::remove_file(&path);

        let counters = SessionCounters::with_persistence(path.clone());
        counters.record_sample_ingested();
        counters.record_tick_computed();
        counters.save().unwrap();

        let reloaded = SessionCounters::with_persistence(path.clone());
        let stats = reloaded.stats();
        assert_eq!(stats.samples_ingested, 1);
        assert_eq!(stats.ticks_computed, 1);

        let _ = std::fs::remove_file(&path);
    }
}
