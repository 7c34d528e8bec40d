//! Sample types shared by every stage of the engine.

use serde::{Deserialize, Serialize};

/// One point in time from the bedside hub: jaw EMG, heart rate, and an
/// optional skin temperature reading.
///
/// `t_ms` is milliseconds since session start; the hub guarantees rows
/// arrive in non-decreasing `t` order. EMG is a raw 12-bit ADC count
/// (nominally 0-4095, unbounded above in practice), not a voltage.
///
/// The hub emits rows as `{"t": ..., "emg": ..., "bpm": ...}`; `hr`
/// accepts the `bpm` wire name on input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Milliseconds since session start
    #[serde(rename = "t")]
    pub t_ms: u64,
    /// Raw EMG ADC count
    pub emg: f64,
    /// Heart rate in beats per minute
    #[serde(alias = "bpm")]
    pub hr: f64,
    /// Skin temperature in degrees Celsius, when the sensor is fitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temp: Option<f64>,
}

impl Sample {
    pub fn new(t_ms: u64, emg: f64, hr: f64) -> Self {
        Self {
            t_ms,
            emg,
            hr,
            temp: None,
        }
    }

    pub fn with_temp(mut self, temp: f64) -> Self {
        self.temp = Some(temp);
        self
    }

    /// Name of the first non-finite reading, if any.
    pub fn non_finite_field(&self) -> Option<&'static str> {
        if !self.emg.is_finite() {
            Some("emg")
        } else if !self.hr.is_finite() {
            Some("hr")
        } else if matches!(self.temp, Some(t) if !t.is_finite()) {
            Some("temp")
        } else {
            None
        }
    }
}

/// Why a sample was refused at the ingestion boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleError {
    /// A reading was NaN or infinite
    NonFinite { t_ms: u64, field: &'static str },
    /// Timestamp went backwards relative to the last accepted sample
    OutOfOrder { prev_ms: u64, t_ms: u64 },
}

impl std::fmt::Display for SampleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SampleError::NonFinite { t_ms, field } => {
                write!(f, "non-finite {field} reading at t={t_ms}ms")
            }
            SampleError::OutOfOrder { prev_ms, t_ms } => {
                write!(f, "timestamp {t_ms}ms arrived after {prev_ms}ms")
            }
        }
    }
}

impl std::error::Error for SampleError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_wire_names() {
        // The hub writes "t" and "bpm"; both must parse.
        let sample: Sample = serde_json::from_str(r#"{"t": 1500, "emg": 312.0, "bpm": 64.5}"#)
            .expect("hub row should parse");
        assert_eq!(sample.t_ms, 1500);
        assert_eq!(sample.hr, 64.5);
        assert_eq!(sample.temp, None);
    }

    #[test]
    fn test_sample_serializes_without_missing_temp() {
        let json = serde_json::to_string(&Sample::new(0, 10.0, 60.0)).unwrap();
        assert!(!json.contains("temp"));

        let json = serde_json::to_string(&Sample::new(0, 10.0, 60.0).with_temp(36.5)).unwrap();
        assert!(json.contains("temp"));
    }

    #[test]
    fn test_non_finite_field_detection() {
        assert_eq!(Sample::new(0, 10.0, 60.0).non_finite_field(), None);
        assert_eq!(
            Sample::new(0, f64::NAN, 60.0).non_finite_field(),
            Some("emg")
        );
        assert_eq!(
            Sample::new(0, 10.0, f64::INFINITY).non_finite_field(),
            Some("hr")
        );
        assert_eq!(
            Sample::new(0, 10.0, 60.0).with_temp(f64::NAN).non_finite_field(),
            Some("temp")
        );
    }
}
