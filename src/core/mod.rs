//! The classification core: pure, synchronous computation from an
//! ordered sample sequence to classified episodes, scores, and reports.
//!
//! Nothing in this module does I/O or holds state between calls; given
//! the same samples and configuration, every function returns the same
//! result.

pub mod classify;
pub mod report;
pub mod score;
pub mod segment;
pub mod stats;
pub mod transforms;

// Re-export the pipeline surface
pub use classify::{
    arousal_only_events, classify_clench_episodes, detect_arousal_episodes, detect_clench_runs,
    ArousalEpisode, ClenchEpisode, EpisodeKind, Severity,
};
pub use report::{build_live_stats, build_report, LiveStats, Report};
pub use score::{sleep_quality_score, stress_likelihood_pct};
pub use segment::{segment_above, RunLength};
pub use stats::{hr_baseline, hr_summary, peak_emg, temp_summary, HrSummary, TempSummary};
pub use transforms::{emg_to_band, emg_to_intensity_pct, hr_to_activation_pct, EmgBand};
