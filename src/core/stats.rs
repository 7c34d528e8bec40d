//! Descriptive statistics over a session's samples.
//!
//! Plain population statistics - no windowing, no filtering. Every
//! function is total: empty input produces zeros (or `None` for the
//! temperature summary, which is absent when no sensor was fitted).

use crate::ingest::Sample;
use statrs::statistics::{Data, OrderStatistics, Statistics};

/// Mean and population standard deviation of the heart-rate series.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HrSummary {
    pub mean: f64,
    pub std_dev: f64,
}

/// Mean temperature and net drift (last reading minus first).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TempSummary {
    pub mean: f64,
    pub drift: f64,
}

/// Median heart rate over the samples in view - the zero point for
/// activation percentages. Recomputed per pass, never persisted.
pub fn hr_baseline(samples: &[Sample]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let mut series = Data::new(samples.iter().map(|s| s.hr).collect::<Vec<_>>());
    series.median()
}

pub fn hr_summary(samples: &[Sample]) -> HrSummary {
    if samples.is_empty() {
        return HrSummary::default();
    }
    HrSummary {
        mean: samples.iter().map(|s| s.hr).mean(),
        std_dev: samples.iter().map(|s| s.hr).population_std_dev(),
    }
}

/// Highest raw EMG count seen in the session; 0 when empty.
pub fn peak_emg(samples: &[Sample]) -> f64 {
    samples.iter().map(|s| s.emg).fold(0.0_f64, f64::max)
}

/// Temperature statistics over the samples that carry a reading.
pub fn temp_summary(samples: &[Sample]) -> Option<TempSummary> {
    let temps: Vec<f64> = samples.iter().filter_map(|s| s.temp).collect();
    let (first, last) = match (temps.first(), temps.last()) {
        (Some(&first), Some(&last)) => (first, last),
        _ => return None,
    };

    Some(TempSummary {
        mean: temps.iter().mean(),
        drift: last - first,
    })
}
