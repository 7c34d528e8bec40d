//! Narrative session context for external consumers.
//!
//! Serializes a finished report into descriptive plain text - the form
//! handed to the coaching assistant's prompt and to clinicians reading a
//! session outside the dashboard. Every numeric field of the report
//! appears in the text; the exact prose is not part of the engine's
//! contract.

use crate::core::{EpisodeKind, Report};
use std::fmt::Write;

/// Render a report as descriptive text, one fact per line.
pub fn session_context(report: &Report) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Sleep session {}", report.session_id);
    let _ = writeln!(
        out,
        "Recorded {} | duration {:.1} min",
        report.created_at.format("%Y-%m-%d %H:%M UTC"),
        report.duration_secs / 60.0
    );
    let _ = writeln!(out, "Sleep quality score: {}/100", report.sleep_quality_score);
    let _ = writeln!(
        out,
        "Stress likelihood: {}% of episodes preceded by autonomic arousal",
        report.stress_likelihood_pct
    );
    let _ = writeln!(
        out,
        "Heart rate: mean {:.1} bpm, variability (population std dev) {:.2} bpm",
        report.hr_mean, report.hr_std_dev
    );
    let _ = writeln!(out, "Peak jaw EMG: {:.0} ADC counts", report.peak_emg);

    if let (Some(mean), Some(drift)) = (report.temp_mean, report.temp_drift) {
        let _ = writeln!(
            out,
            "Skin temperature: mean {mean:.2} C, net drift {drift:+.2} C"
        );
    } else {
        let _ = writeln!(out, "Skin temperature: not recorded");
    }

    let _ = writeln!(out, "Clenching episodes: {}", report.episode_count);
    for episode in &report.episodes {
        let _ = writeln!(
            out,
            "  - at {} for {:.1}s: {} clench, peak {:.0} ADC ({:.1}% intensity), {}",
            format_offset(episode.start_ms),
            episode.duration_secs,
            episode.severity,
            episode.peak_emg,
            episode.peak_intensity_pct,
            match episode.kind {
                EpisodeKind::ArousalLinked => "preceded by heart-rate arousal",
                EpisodeKind::Isolated => "no preceding arousal",
            }
        );
    }

    let _ = writeln!(
        out,
        "Arousal-only events (no jaw response): {}",
        report.arousal_only.len()
    );
    for arousal in &report.arousal_only {
        let _ = writeln!(
            out,
            "  - at {} for {:.1}s: heart rate peaked {:.1}% above baseline",
            format_offset(arousal.start_ms),
            (arousal.end_ms - arousal.start_ms) as f64 / 1000.0,
            arousal.peak_activation_pct
        );
    }

    out
}

/// Milliseconds since session start as `HH:MM:SS`.
fn format_offset(t_ms: u64) -> String {
    let total_secs = t_ms / 1000;
    format!(
        "{:02}:{:02}:{:02}",
        total_secs / 3600,
        total_secs % 3600 / 60,
        total_secs % 60
    )
}
