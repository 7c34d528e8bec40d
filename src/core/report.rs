//! Session report and live snapshot builders - the two consumers of the
//! classification pipeline.
//!
//! `build_report` folds a closed sample set once, at finalize time;
//! `build_live_stats` recomputes from scratch on every tick of a live
//! session. Both run the identical pipeline: the heart-rate baseline is
//! re-derived from whatever samples are in view, so a live snapshot may
//! reclassify an earlier episode as the median shifts. Persisted reports
//! are built from the final buffer and never change.

use crate::config::EngineConfig;
use crate::core::classify::{
    arousal_only_events, classify_clench_episodes, detect_arousal_episodes, detect_clench_runs,
    ArousalEpisode, ClenchEpisode,
};
use crate::core::score::{sleep_quality_score, stress_likelihood_pct};
use crate::core::stats::{hr_baseline, hr_summary, peak_emg, temp_summary, HrSummary, TempSummary};
use crate::core::transforms::{emg_to_band, emg_to_intensity_pct, EmgBand};
use crate::ingest::Sample;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Immutable clinical summary of a finished session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub duration_secs: f64,
    pub episode_count: usize,
    pub stress_likelihood_pct: u8,
    pub sleep_quality_score: u8,
    pub hr_mean: f64,
    /// Population standard deviation of heart rate
    pub hr_std_dev: f64,
    pub peak_emg: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_mean: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temp_drift: Option<f64>,
    pub episodes: Vec<ClenchEpisode>,
    pub arousal_only: Vec<ArousalEpisode>,
}

/// Transient snapshot recomputed every tick of a live session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveStats {
    pub sample_count: usize,
    pub episode_count: usize,
    pub stress_likelihood_pct: u8,
    pub sleep_quality_score: u8,
    pub hr_mean: f64,
    pub current_hr: f64,
    pub current_intensity_pct: f64,
    pub current_band: EmgBand,
    /// True iff the most recent sample's EMG is at or above the clench
    /// detection threshold
    pub is_clenching: bool,
}

/// Intermediate products shared by both builders.
struct Analysis {
    episodes: Vec<ClenchEpisode>,
    arousal_only: Vec<ArousalEpisode>,
    hr: HrSummary,
    temp: Option<TempSummary>,
    peak_emg: f64,
}

impl Analysis {
    fn quality_score(&self, cfg: &EngineConfig) -> u8 {
        sleep_quality_score(
            self.episodes.len(),
            self.hr.std_dev,
            self.temp.map(|t| t.drift),
            &cfg.quality,
        )
    }
}

fn analyze(samples: &[Sample], cfg: &EngineConfig) -> Analysis {
    let baseline = hr_baseline(samples);

    let runs = detect_clench_runs(samples, cfg);
    let episodes = classify_clench_episodes(samples, &runs, baseline, cfg);

    let arousals = detect_arousal_episodes(samples, baseline, cfg);
    let arousal_only = arousal_only_events(&arousals, &episodes, &cfg.correlation);

    Analysis {
        episodes,
        arousal_only,
        hr: hr_summary(samples),
        temp: temp_summary(samples),
        peak_emg: peak_emg(samples),
    }
}

/// Fold a closed sample set into the persisted session summary.
///
/// An empty session is a defined outcome, not an error: zero episodes
/// and the configured neutral quality score.
pub fn build_report(
    session_id: Uuid,
    samples: &[Sample],
    duration_secs: f64,
    cfg: &EngineConfig,
) -> Report {
    if samples.is_empty() {
        return Report {
            session_id,
            created_at: Utc::now(),
            duration_secs,
            episode_count: 0,
            stress_likelihood_pct: 0,
            sleep_quality_score: cfg.quality.empty_session_score,
            hr_mean: 0.0,
            hr_std_dev: 0.0,
            peak_emg: 0.0,
            temp_mean: None,
            temp_drift: None,
            episodes: Vec::new(),
            arousal_only: Vec::new(),
        };
    }

    let analysis = analyze(samples, cfg);

    Report {
        session_id,
        created_at: Utc::now(),
        duration_secs,
        episode_count: analysis.episodes.len(),
        stress_likelihood_pct: stress_likelihood_pct(&analysis.episodes),
        sleep_quality_score: analysis.quality_score(cfg),
        hr_mean: analysis.hr.mean,
        hr_std_dev: analysis.hr.std_dev,
        peak_emg: analysis.peak_emg,
        temp_mean: analysis.temp.map(|t| t.mean),
        temp_drift: analysis.temp.map(|t| t.drift),
        episodes: analysis.episodes,
        arousal_only: analysis.arousal_only,
    }
}

/// Recompute the running snapshot from scratch over the current buffer.
pub fn build_live_stats(samples: &[Sample], cfg: &EngineConfig) -> LiveStats {
    let last = match samples.last() {
        Some(last) => last,
        None => {
            return LiveStats {
                sample_count: 0,
                episode_count: 0,
                stress_likelihood_pct: 0,
                sleep_quality_score: cfg.quality.empty_session_score,
                hr_mean: 0.0,
                current_hr: 0.0,
                current_intensity_pct: 0.0,
                current_band: EmgBand::Relaxed,
                is_clenching: false,
            }
        }
    };

    let analysis = analyze(samples, cfg);

    LiveStats {
        sample_count: samples.len(),
        episode_count: analysis.episodes.len(),
        stress_likelihood_pct: stress_likelihood_pct(&analysis.episodes),
        sleep_quality_score: analysis.quality_score(cfg),
        hr_mean: analysis.hr.mean,
        current_hr: last.hr,
        current_intensity_pct: emg_to_intensity_pct(last.emg, cfg.signal.intensity_ceiling),
        current_band: emg_to_band(last.emg, &cfg.signal),
        is_clenching: last.emg >= cfg.clench.threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet_stream(until_ms: u64) -> Vec<Sample> {
        (0..until_ms)
            .step_by(100)
            .map(|t| Sample::new(t, 40.0, 60.0).with_temp(36.5))
            .collect()
    }

    #[test]
    fn test_empty_report_neutral_defaults() {
        let cfg = EngineConfig::default();
        let report = build_report(Uuid::new_v4(), &[], 0.0, &cfg);

        assert_eq!(report.episode_count, 0);
        assert_eq!(report.stress_likelihood_pct, 0);
        assert_eq!(report.sleep_quality_score, cfg.quality.empty_session_score);
        assert_eq!(report.hr_mean, 0.0);
        assert!(report.episodes.is_empty());
        assert!(report.arousal_only.is_empty());
        assert_eq!(report.temp_mean, None);
    }

    #[test]
    fn test_quiet_night_scores_high() {
        let cfg = EngineConfig::default();
        let samples = quiet_stream(120_000);
        let report = build_report(Uuid::new_v4(), &samples, 120.0, &cfg);

        assert_eq!(report.episode_count, 0);
        assert_eq!(report.stress_likelihood_pct, 0);
        assert!(report.sleep_quality_score >= 95);
        assert!((report.hr_mean - 60.0).abs() < 1e-9);
        assert_eq!(report.peak_emg, 40.0);
        assert_eq!(report.temp_drift, Some(0.0));
    }

    #[test]
    fn test_live_stats_empty_buffer() {
        let cfg = EngineConfig::default();
        let stats = build_live_stats(&[], &cfg);

        assert_eq!(stats.sample_count, 0);
        assert_eq!(stats.sleep_quality_score, cfg.quality.empty_session_score);
        assert!(!stats.is_clenching);
        assert_eq!(stats.current_band, EmgBand::Relaxed);
    }

    #[test]
    fn test_live_stats_tracks_latest_sample() {
        let cfg = EngineConfig::default();
        let mut samples = quiet_stream(10_000);
        samples.push(Sample::new(10_000, 512.0, 64.0));

        let stats = build_live_stats(&samples, &cfg);
        assert!(stats.is_clenching);
        assert_eq!(stats.current_band, EmgBand::Clenching);
        assert_eq!(stats.current_hr, 64.0);
        assert!((stats.current_intensity_pct - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_live_stats_below_threshold_not_clenching() {
        let cfg = EngineConfig::default();
        let samples = quiet_stream(10_000);
        let stats = build_live_stats(&samples, &cfg);

        assert!(!stats.is_clenching);
        assert_eq!(stats.current_band, EmgBand::Relaxed);
    }

    #[test]
    fn test_report_serializes_round_trip() {
        let cfg = EngineConfig::default();
        let samples = quiet_stream(30_000);
        let report = build_report(Uuid::new_v4(), &samples, 30.0, &cfg);

        let json = serde_json::to_string(&report).unwrap();
        let parsed: Report = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.session_id, report.session_id);
        assert_eq!(parsed.sleep_quality_score, report.sleep_quality_score);
        assert_eq!(parsed.episode_count, report.episode_count);
    }
}
