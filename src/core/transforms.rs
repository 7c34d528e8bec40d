//! Pure transforms from raw readings to clinical units.

use crate::config::SignalConfig;
use serde::{Deserialize, Serialize};

/// Discrete jaw-activity band for a raw EMG count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmgBand {
    Relaxed,
    Talking,
    Clenching,
}

impl std::fmt::Display for EmgBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmgBand::Relaxed => write!(f, "relaxed"),
            EmgBand::Talking => write!(f, "talking"),
            EmgBand::Clenching => write!(f, "clenching"),
        }
    }
}

/// Map a raw ADC count to a 0-100 intensity percentage.
///
/// Zero and negative counts map to 0; counts at or above `ceiling` map
/// to 100; linear in between. A non-positive ceiling yields 0 rather
/// than dividing through it.
pub fn emg_to_intensity_pct(adc: f64, ceiling: f64) -> f64 {
    if ceiling <= 0.0 {
        return 0.0;
    }
    (adc / ceiling * 100.0).clamp(0.0, 100.0)
}

/// Partition a raw count into the three activity bands.
///
/// A count exactly at a floor belongs to the higher band.
pub fn emg_to_band(adc: f64, cfg: &SignalConfig) -> EmgBand {
    if adc < cfg.talking_floor {
        EmgBand::Relaxed
    } else if adc < cfg.clenching_floor {
        EmgBand::Talking
    } else {
        EmgBand::Clenching
    }
}

/// Heart-rate elevation above baseline, as a percentage.
///
/// Never negative; a non-positive baseline yields 0.
pub fn hr_to_activation_pct(hr: f64, baseline: f64) -> f64 {
    if baseline <= 0.0 {
        return 0.0;
    }
    ((hr - baseline) / baseline * 100.0).max(0.0)
}
