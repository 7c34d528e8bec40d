//! Aggregate scoring over the classified episode set.

use crate::config::QualityConfig;
use crate::core::classify::{ClenchEpisode, EpisodeKind};

/// Share of clench episodes preceded by autonomic arousal, rounded to a
/// whole percentage. Zero for an empty episode set.
pub fn stress_likelihood_pct(episodes: &[ClenchEpisode]) -> u8 {
    if episodes.is_empty() {
        return 0;
    }
    let linked = episodes
        .iter()
        .filter(|e| e.kind == EpisodeKind::ArousalLinked)
        .count();
    (linked as f64 / episodes.len() as f64 * 100.0).round() as u8
}

/// Bounded 0-100 sleep-quality score: 100 minus three capped linear
/// penalties (episode count, heart-rate variability, temperature drift).
pub fn sleep_quality_score(
    episode_count: usize,
    hr_std_dev: f64,
    temp_drift: Option<f64>,
    cfg: &QualityConfig,
) -> u8 {
    let clench_penalty =
        (episode_count as f64 * cfg.clench_penalty_per_episode).min(cfg.clench_penalty_cap);
    let hr_penalty = (hr_std_dev * cfg.hr_variability_slope).min(cfg.hr_variability_cap);
    let temp_penalty = temp_drift
        .map(|drift| (drift.abs() * cfg.temp_drift_slope).min(cfg.temp_drift_cap))
        .unwrap_or(0.0);

    (100.0 - clench_penalty - hr_penalty - temp_penalty)
        .round()
        .clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::classify::Severity;

    fn episode(kind: EpisodeKind) -> ClenchEpisode {
        ClenchEpisode {
            start_ms: 0,
            end_ms: 1000,
            peak_emg: 300.0,
            kind,
            peak_intensity_pct: 29.3,
            duration_secs: 1.0,
            severity: Severity::Mild,
        }
    }

    #[test]
    fn test_stress_zero_for_no_episodes() {
        assert_eq!(stress_likelihood_pct(&[]), 0);
    }

    #[test]
    fn test_stress_rounded_share() {
        let episodes = vec![
            episode(EpisodeKind::ArousalLinked),
            episode(EpisodeKind::Isolated),
            episode(EpisodeKind::Isolated),
        ];
        // 1 of 3 -> 33.33 -> 33
        assert_eq!(stress_likelihood_pct(&episodes), 33);
    }

    #[test]
    fn test_stress_bounds() {
        let all_linked = vec![episode(EpisodeKind::ArousalLinked); 5];
        assert_eq!(stress_likelihood_pct(&all_linked), 100);

        let none_linked = vec![episode(EpisodeKind::Isolated); 5];
        assert_eq!(stress_likelihood_pct(&none_linked), 0);
    }

    #[test]
    fn test_quality_perfect_night() {
        let cfg = QualityConfig::default();
        assert_eq!(sleep_quality_score(0, 0.0, Some(0.0), &cfg), 100);
    }

    #[test]
    fn test_quality_penalties_are_capped() {
        let cfg = QualityConfig::default();
        // Even absurd statistics cannot push the score below zero
        let score = sleep_quality_score(1000, 1e6, Some(1e6), &cfg);
        let floor = 100.0
            - cfg.clench_penalty_cap
            - cfg.hr_variability_cap
            - cfg.temp_drift_cap;
        assert_eq!(score as f64, floor.max(0.0));
    }

    #[test]
    fn test_quality_always_in_bounds() {
        let cfg = QualityConfig::default();
        for count in [0usize, 1, 5, 50, 500] {
            for std_dev in [0.0, 2.5, 30.0, 1e4] {
                for drift in [None, Some(0.0), Some(-3.0), Some(50.0)] {
                    let score = sleep_quality_score(count, std_dev, drift, &cfg);
                    assert!(score <= 100);
                }
            }
        }
    }

    #[test]
    fn test_quality_missing_temperature_costs_nothing() {
        let cfg = QualityConfig::default();
        let with = sleep_quality_score(2, 1.0, Some(0.0), &cfg);
        let without = sleep_quality_score(2, 1.0, None, &cfg);
        assert_eq!(with, without);
    }
}
