//! JawSense Engine - bruxism episode classification for sleep sessions.
//!
//! This library turns two raw biometric streams captured during sleep -
//! jaw-muscle EMG (raw ADC counts) and heart rate (BPM), optionally skin
//! temperature - into a structured clinical summary: discrete clenching
//! episodes, their severity, their temporal relationship to autonomic
//! arousal, and an aggregate sleep-quality score.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        JawSense Engine                         │
//! ├────────────────────────────────────────────────────────────────┤
//! │  ┌────────────┐   ┌────────────┐   ┌────────────┐              │
//! │  │   Ingest   │──▶│  Segment   │──▶│  Classify  │              │
//! │  │ (validate) │   │ (run-len)  │   │ (correlate)│              │
//! │  └────────────┘   └────────────┘   └────────────┘              │
//! │        │                                  │                    │
//! │        ▼                                  ▼                    │
//! │  ┌────────────┐                    ┌────────────┐              │
//! │  │ Telemetry  │                    │ Score +    │              │
//! │  │  Counters  │                    │ Report     │              │
//! │  └────────────┘                    └────────────┘              │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The classification core (`core`) is pure and synchronous: given an
//! ordered sample slice it deterministically produces episodes and
//! statistics. Ingestion (`ingest`) owns validation and the append-only
//! session buffer; the binary drives the two decoupled cadences of a
//! live session (sample arrival and snapshot recomputation).
//!
//! # Example
//!
//! ```
//! use jawsense_engine::config::EngineConfig;
//! use jawsense_engine::core::build_report;
//! use jawsense_engine::ingest::Sample;
//! use uuid::Uuid;
//!
//! let cfg = EngineConfig::default();
//! let samples = vec![Sample::new(0, 80.0, 61.0), Sample::new(100, 82.0, 62.0)];
//! let report = build_report(Uuid::new_v4(), &samples, 0.1, &cfg);
//! assert_eq!(report.episode_count, 0);
//! ```

pub mod config;
pub mod core;
pub mod ingest;
pub mod narrative;
pub mod telemetry;

// Re-export key types at crate root for convenience
pub use crate::config::{Config, EngineConfig};
pub use crate::core::{
    build_live_stats, build_report, ArousalEpisode, ClenchEpisode, EmgBand, EpisodeKind,
    LiveStats, Report, Severity,
};
pub use crate::ingest::{Sample, SampleError, SessionBuffer};
pub use crate::telemetry::{SessionCounters, SharedCounters, TelemetryStats};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
