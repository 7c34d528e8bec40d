//! Synthetic overnight sessions for demos and tests.
//!
//! The simulator produces the same stream shape the hub does: a noisy
//! EMG floor with occasional clench bursts, heart rate wandering around
//! a resting baseline with arousal ramps that sometimes precede a burst,
//! and a slow downward temperature drift. Seeded construction makes a
//! session fully reproducible.

use crate::ingest::types::Sample;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Shape of the generated session.
#[derive(Debug, Clone)]
pub struct SimulatorConfig {
    /// Milliseconds between samples (hub streams at 10 Hz)
    pub sample_period_ms: u64,
    /// Resting heart rate the stream wanders around
    pub resting_hr: f64,
    /// Quiet-jaw EMG level in raw ADC counts
    pub emg_floor: f64,
    /// Typical burst peak in raw ADC counts
    pub clench_peak: f64,
    /// Skin temperature at session start
    pub temp_start: f64,
    /// Chance per sample that an arousal ramp begins
    pub arousal_rate: f64,
    /// Chance per sample that a burst begins with no arousal before it
    pub spontaneous_clench_rate: f64,
}

impl Default for SimulatorConfig {
    fn default() -> Self {
        Self {
            sample_period_ms: 100,
            resting_hr: 62.0,
            emg_floor: 60.0,
            clench_peak: 700.0,
            temp_start: 36.4,
            arousal_rate: 0.002,
            spontaneous_clench_rate: 0.0005,
        }
    }
}

/// Stateful generator of one synthetic session stream.
pub struct SessionSimulator {
    config: SimulatorConfig,
    rng: StdRng,
    t_ms: u64,
    /// Remaining milliseconds of the active arousal ramp
    arousal_left_ms: u64,
    /// Activation the current ramp adds, as a fraction of resting HR
    arousal_lift: f64,
    /// Remaining milliseconds of the active clench burst
    clench_left_ms: u64,
    /// Countdown until an arousal-triggered burst begins
    pending_clench_ms: Option<u64>,
}

impl SessionSimulator {
    pub fn new(config: SimulatorConfig) -> Self {
        Self::from_rng(config, StdRng::from_entropy())
    }

    /// Deterministic stream for tests and reproducible demos.
    pub fn with_seed(config: SimulatorConfig, seed: u64) -> Self {
        Self::from_rng(config, StdRng::seed_from_u64(seed))
    }

    fn from_rng(config: SimulatorConfig, rng: StdRng) -> Self {
        Self {
            config,
            rng,
            t_ms: 0,
            arousal_left_ms: 0,
            arousal_lift: 0.0,
            clench_left_ms: 0,
            pending_clench_ms: None,
        }
    }

    /// Produce the next sample and advance the clock by one period.
    pub fn next_sample(&mut self) -> Sample {
        let period = self.config.sample_period_ms;

        // Arousal ramps run 8-15s and lift HR 15-35% above resting.
        if self.arousal_left_ms == 0 && self.rng.gen_bool(self.config.arousal_rate) {
            self.arousal_left_ms = self.rng.gen_range(8_000..15_000);
            self.arousal_lift = self.rng.gen_range(0.15..0.35);
            // Most ramps are followed by a clench a few seconds in.
            if self.rng.gen_bool(0.7) {
                self.pending_clench_ms = Some(self.rng.gen_range(4_000..8_000));
            }
        }

        if self.clench_left_ms == 0 {
            let due = match self.pending_clench_ms {
                Some(left) if left <= period => {
                    self.pending_clench_ms = None;
                    true
                }
                Some(left) => {
                    self.pending_clench_ms = Some(left - period);
                    false
                }
                None => self.rng.gen_bool(self.config.spontaneous_clench_rate),
            };
            if due {
                self.clench_left_ms = self.rng.gen_range(1_000..3_000);
            }
        }

        let hr_noise = self.rng.gen_range(-1.5..1.5);
        let hr = if self.arousal_left_ms > 0 {
            self.config.resting_hr * (1.0 + self.arousal_lift) + hr_noise
        } else {
            self.config.resting_hr + hr_noise
        };

        let emg = if self.clench_left_ms > 0 {
            self.config.clench_peak * self.rng.gen_range(0.6..1.1)
        } else {
            self.config.emg_floor * self.rng.gen_range(0.5..1.5)
        };

        // Skin temperature drops slowly over the night.
        let temp = self.config.temp_start - self.t_ms as f64 * 1.0e-8
            + self.rng.gen_range(-0.02..0.02);

        let sample = Sample::new(self.t_ms, emg, hr).with_temp(temp);

        self.arousal_left_ms = self.arousal_left_ms.saturating_sub(period);
        self.clench_left_ms = self.clench_left_ms.saturating_sub(period);
        self.t_ms += period;

        sample
    }

    /// Generate a whole session worth of samples at once.
    pub fn take_session(&mut self, duration_secs: u64) -> Vec<Sample> {
        let count = duration_secs * 1000 / self.config.sample_period_ms;
        (0..count).map(|_| self.next_sample()).collect()
    }
}
