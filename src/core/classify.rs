//! Event detection and cross-signal correlation.
//!
//! Both detection passes run through the one generic segmenter; the
//! classifier then correlates each clench against the activation seen in
//! a backward-looking window, and prunes arousal episodes that a clench
//! answered. Every time window here is inclusive at its lower bound and
//! exclusive at its upper bound, matching the segmenter's `>=`/`<`
//! split.

use crate::config::{CorrelationConfig, EngineConfig, SeverityConfig};
use crate::core::segment::{segment_above, RunLength};
use crate::core::transforms::{emg_to_intensity_pct, hr_to_activation_pct};
use crate::ingest::Sample;
use serde::{Deserialize, Serialize};

/// How a clench episode relates to preceding autonomic activity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EpisodeKind {
    /// Heart-rate activation was elevated in the window before onset
    ArousalLinked,
    /// No meaningful activation preceded the episode
    Isolated,
}

impl std::fmt::Display for EpisodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EpisodeKind::ArousalLinked => write!(f, "arousal-linked"),
            EpisodeKind::Isolated => write!(f, "isolated"),
        }
    }
}

/// Clinical severity label derived from peak intensity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Mild,
    Moderate,
    Severe,
}

impl Severity {
    /// Inclusive at each cutoff: a peak exactly at a floor takes the
    /// higher label.
    pub fn from_intensity(pct: f64, cfg: &SeverityConfig) -> Self {
        if pct >= cfg.severe_floor_pct {
            Severity::Severe
        } else if pct >= cfg.moderate_floor_pct {
            Severity::Moderate
        } else {
            Severity::Mild
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Mild => write!(f, "mild"),
            Severity::Moderate => write!(f, "moderate"),
            Severity::Severe => write!(f, "severe"),
        }
    }
}

/// A classified clenching episode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClenchEpisode {
    pub start_ms: u64,
    pub end_ms: u64,
    /// Highest raw ADC count inside the episode
    pub peak_emg: f64,
    pub kind: EpisodeKind,
    pub peak_intensity_pct: f64,
    pub duration_secs: f64,
    pub severity: Severity,
}

/// An autonomic-arousal episode over the activation signal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArousalEpisode {
    pub start_ms: u64,
    pub end_ms: u64,
    pub peak_activation_pct: f64,
}

/// Raw clench intervals: EMG at or above the detection threshold for at
/// least the minimum duration.
pub fn detect_clench_runs(samples: &[Sample], cfg: &EngineConfig) -> Vec<RunLength> {
    segment_above(
        samples,
        |s| s.emg,
        cfg.clench.threshold,
        cfg.clench.min_duration_ms,
    )
}

/// Standalone arousal episodes over the heart-rate-activation signal.
pub fn detect_arousal_episodes(
    samples: &[Sample],
    baseline: f64,
    cfg: &EngineConfig,
) -> Vec<ArousalEpisode> {
    segment_above(
        samples,
        |s| hr_to_activation_pct(s.hr, baseline),
        cfg.arousal.activation_floor_pct,
        cfg.arousal.min_duration_ms,
    )
    .into_iter()
    .map(|run| ArousalEpisode {
        start_ms: run.start_ms,
        end_ms: run.end_ms,
        peak_activation_pct: run.peak,
    })
    .collect()
}

/// Label each raw clench run against the activation in the window just
/// before it, and derive intensity, duration, and severity.
pub fn classify_clench_episodes(
    samples: &[Sample],
    runs: &[RunLength],
    baseline: f64,
    cfg: &EngineConfig,
) -> Vec<ClenchEpisode> {
    runs.iter()
        .map(|run| {
            let preceding =
                peak_preceding_activation(samples, run.start_ms, baseline, &cfg.correlation);
            let kind = if preceding > cfg.correlation.preceding_activation_pct {
                EpisodeKind::ArousalLinked
            } else {
                EpisodeKind::Isolated
            };

            let peak_intensity_pct = emg_to_intensity_pct(run.peak, cfg.signal.intensity_ceiling);

            ClenchEpisode {
                start_ms: run.start_ms,
                end_ms: run.end_ms,
                peak_emg: run.peak,
                kind,
                peak_intensity_pct,
                duration_secs: run.duration_ms() as f64 / 1000.0,
                severity: Severity::from_intensity(peak_intensity_pct, &cfg.severity),
            }
        })
        .collect()
}

/// Peak activation over samples with
/// `t in [start - precede_window_ms, start - precede_gap_ms)`.
///
/// The gap keeps the episode's own onset out of the look-back. An empty
/// window yields 0, which always classifies as isolated.
fn peak_preceding_activation(
    samples: &[Sample],
    start_ms: u64,
    baseline: f64,
    cfg: &CorrelationConfig,
) -> f64 {
    let lo = start_ms.saturating_sub(cfg.precede_window_ms);
    let hi = start_ms.saturating_sub(cfg.precede_gap_ms);

    samples
        .iter()
        .filter(|s| s.t_ms >= lo && s.t_ms < hi)
        .map(|s| hr_to_activation_pct(s.hr, baseline))
        .fold(0.0_f64, f64::max)
}

/// Arousal episodes with no clench starting anywhere around them -
/// decoupled autonomic activation with no associated jaw event.
///
/// An arousal is suppressed when a clench starts inside
/// `[arousal.start - follow_lookback_ms, arousal.end + follow_window_ms)`.
pub fn arousal_only_events(
    arousals: &[ArousalEpisode],
    clenches: &[ClenchEpisode],
    cfg: &CorrelationConfig,
) -> Vec<ArousalEpisode> {
    arousals
        .iter()
        .filter(|arousal| {
            let lo = arousal.start_ms.saturating_sub(cfg.follow_lookback_ms);
            let hi = arousal.end_ms + cfg.follow_window_ms;
            !clenches
                .iter()
                .any(|clench| clench.start_ms >= lo && clench.start_ms < hi)
        })
        .copied()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 10 Hz stream with overridable EMG and HR spans.
    fn stream(
        until_ms: u64,
        emg_spans: &[(u64, u64, f64)],
        hr_spans: &[(u64, u64, f64)],
    ) -> Vec<Sample> {
        (0..until_ms)
            .step_by(100)
            .map(|t| {
                let emg = emg_spans
                    .iter()
                    .find(|&&(lo, hi, _)| t >= lo && t < hi)
                    .map_or(40.0, |&(_, _, v)| v);
                let hr = hr_spans
                    .iter()
                    .find(|&&(lo, hi, _)| t >= lo && t < hi)
                    .map_or(60.0, |&(_, _, v)| v);
                Sample::new(t, emg, hr)
            })
            .collect()
    }

    #[test]
    fn test_flat_heart_rate_classifies_isolated() {
        let cfg = EngineConfig::default();
        let samples = stream(60_000, &[(30_000, 30_600, 300.0)], &[]);

        let runs = detect_clench_runs(&samples, &cfg);
        assert_eq!(runs.len(), 1);

        let episodes = classify_clench_episodes(&samples, &runs, 60.0, &cfg);
        assert_eq!(episodes[0].kind, EpisodeKind::Isolated);
    }

    #[test]
    fn test_elevated_window_classifies_linked() {
        let cfg = EngineConfig::default();
        // HR 20% above baseline from 5s before onset until onset
        let samples = stream(
            60_000,
            &[(30_000, 30_600, 300.0)],
            &[(25_000, 30_000, 72.0)],
        );

        let runs = detect_clench_runs(&samples, &cfg);
        let episodes = classify_clench_episodes(&samples, &runs, 60.0, &cfg);
        assert_eq!(episodes[0].kind, EpisodeKind::ArousalLinked);
    }

    #[test]
    fn test_activation_inside_gap_does_not_count() {
        let cfg = EngineConfig::default();
        // Elevated only inside the 1s gap right before onset
        let samples = stream(
            60_000,
            &[(30_000, 30_600, 300.0)],
            &[(29_000, 30_000, 90.0)],
        );

        let runs = detect_clench_runs(&samples, &cfg);
        let episodes = classify_clench_episodes(&samples, &runs, 60.0, &cfg);
        assert_eq!(episodes[0].kind, EpisodeKind::Isolated);
    }

    #[test]
    fn test_window_lower_bound_is_inclusive() {
        let cfg = EngineConfig::default();
        // One elevated sample exactly at start - precede_window_ms
        let samples = stream(
            60_000,
            &[(30_000, 30_600, 300.0)],
            &[(15_000, 15_100, 80.0)],
        );

        let runs = detect_clench_runs(&samples, &cfg);
        let episodes = classify_clench_episodes(&samples, &runs, 60.0, &cfg);
        assert_eq!(episodes[0].kind, EpisodeKind::ArousalLinked);
    }

    #[test]
    fn test_every_episode_gets_exactly_one_kind() {
        let cfg = EngineConfig::default();
        let samples = stream(
            120_000,
            &[
                (20_000, 21_000, 300.0),
                (50_000, 51_500, 500.0),
                (90_000, 90_800, 800.0),
            ],
            &[(44_000, 50_000, 75.0)],
        );

        let runs = detect_clench_runs(&samples, &cfg);
        let episodes = classify_clench_episodes(&samples, &runs, 60.0, &cfg);

        assert_eq!(episodes.len(), 3);
        for episode in &episodes {
            assert!(matches!(
                episode.kind,
                EpisodeKind::ArousalLinked | EpisodeKind::Isolated
            ));
        }
        assert_eq!(episodes[1].kind, EpisodeKind::ArousalLinked);
        assert_eq!(episodes[0].kind, EpisodeKind::Isolated);
        assert_eq!(episodes[2].kind, EpisodeKind::Isolated);
    }

    #[test]
    fn test_arousal_detection_uses_own_thresholds() {
        let cfg = EngineConfig::default();
        // 25% above baseline for 4s: above the 20% floor, past the 2s minimum
        let samples = stream(60_000, &[], &[(10_000, 14_000, 75.0)]);

        let arousals = detect_arousal_episodes(&samples, 60.0, &cfg);
        assert_eq!(arousals.len(), 1);
        assert_eq!(arousals[0].start_ms, 10_000);
        assert_eq!(arousals[0].end_ms, 14_000);
        assert!((arousals[0].peak_activation_pct - 25.0).abs() < 1e-9);
    }

    #[test]
    fn test_arousal_only_survives_without_clench() {
        let cfg = EngineConfig::default();
        let samples = stream(60_000, &[], &[(10_000, 14_000, 75.0)]);

        let arousals = detect_arousal_episodes(&samples, 60.0, &cfg);
        let decoupled = arousal_only_events(&arousals, &[], &cfg.correlation);
        assert_eq!(decoupled.len(), 1);
    }

    #[test]
    fn test_arousal_answered_by_clench_is_suppressed() {
        let cfg = EngineConfig::default();
        // Clench starts 10s after the arousal ends, inside the 30s follow window
        let samples = stream(
            60_000,
            &[(24_000, 25_000, 300.0)],
            &[(10_000, 14_000, 75.0)],
        );

        let arousals = detect_arousal_episodes(&samples, 60.0, &cfg);
        let runs = detect_clench_runs(&samples, &cfg);
        let clenches = classify_clench_episodes(&samples, &runs, 60.0, &cfg);

        let decoupled = arousal_only_events(&arousals, &clenches, &cfg.correlation);
        assert!(decoupled.is_empty());
    }

    #[test]
    fn test_follow_window_upper_bound_is_exclusive() {
        let cfg = EngineConfig::default();
        let arousal = ArousalEpisode {
            start_ms: 10_000,
            end_ms: 14_000,
            peak_activation_pct: 25.0,
        };
        let clench_at = |start_ms: u64| ClenchEpisode {
            start_ms,
            end_ms: start_ms + 1000,
            peak_emg: 300.0,
            kind: EpisodeKind::Isolated,
            peak_intensity_pct: 29.3,
            duration_secs: 1.0,
            severity: Severity::Mild,
        };

        // Exactly at end + follow window: outside (exclusive upper bound)
        let at_bound = [clench_at(14_000 + cfg.correlation.follow_window_ms)];
        assert_eq!(
            arousal_only_events(&[arousal], &at_bound, &cfg.correlation).len(),
            1
        );

        // One millisecond inside: suppressed
        let inside = [clench_at(14_000 + cfg.correlation.follow_window_ms - 1)];
        assert!(arousal_only_events(&[arousal], &inside, &cfg.correlation).is_empty());
    }

    #[test]
    fn test_severity_cutoffs_inclusive() {
        let cfg = SeverityConfig::default();
        assert_eq!(Severity::from_intensity(75.0, &cfg), Severity::Severe);
        assert_eq!(Severity::from_intensity(74.9, &cfg), Severity::Moderate);
        assert_eq!(Severity::from_intensity(50.0, &cfg), Severity::Moderate);
        assert_eq!(Severity::from_intensity(49.9, &cfg), Severity::Mild);
        assert_eq!(Severity::from_intensity(0.0, &cfg), Severity::Mild);
    }

    #[test]
    fn test_derived_fields() {
        let cfg = EngineConfig::default();
        let samples = stream(60_000, &[(30_000, 31_200, 812.0)], &[]);

        let runs = detect_clench_runs(&samples, &cfg);
        let episodes = classify_clench_episodes(&samples, &runs, 60.0, &cfg);

        let episode = &episodes[0];
        assert_eq!(episode.peak_emg, 812.0);
        assert!((episode.duration_secs - 1.2).abs() < 1e-9);
        assert!((episode.peak_intensity_pct - 812.0 / 1024.0 * 100.0).abs() < 1e-9);
        assert_eq!(episode.severity, Severity::Severe);
    }
}
