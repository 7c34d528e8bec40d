//! Configuration for the JawSense engine.
//!
//! Every clinical threshold the classification core uses lives here, so
//! hardware recalibration or parameter tuning never requires touching the
//! classification logic. The app-level [`Config`] wraps the engine
//! tunables with runtime concerns (tick cadence, export/data paths).

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// EMG band floors and the intensity ceiling, in raw ADC counts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalConfig {
    /// Counts below this read as a relaxed jaw
    pub talking_floor: f64,
    /// Counts at or above this read as clenching; between the floors, talking
    pub clenching_floor: f64,
    /// Count that maps to 100% intensity; everything above clamps to 100%
    pub intensity_ceiling: f64,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            talking_floor: 100.0,
            clenching_floor: 250.0,
            intensity_ceiling: 1024.0,
        }
    }
}

/// Clench episode detection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClenchConfig {
    /// Raw ADC count the EMG signal must reach for a sample to count
    pub threshold: f64,
    /// Runs shorter than this are discarded, not reported
    pub min_duration_ms: u64,
}

impl Default for ClenchConfig {
    fn default() -> Self {
        Self {
            threshold: 250.0,
            min_duration_ms: 400,
        }
    }
}

/// Standalone arousal episode detection parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArousalConfig {
    /// Heart-rate elevation above baseline (percent) that counts as arousal
    pub activation_floor_pct: f64,
    /// Minimum duration of a standalone arousal episode
    pub min_duration_ms: u64,
}

impl Default for ArousalConfig {
    fn default() -> Self {
        Self {
            activation_floor_pct: 20.0,
            min_duration_ms: 2000,
        }
    }
}

/// Temporal correlation windows between the two signals.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorrelationConfig {
    /// How far back to look for arousal before a clench starts
    pub precede_window_ms: u64,
    /// Gap just before the clench start excluded from the look-back, so the
    /// episode's own onset is never counted as "preceding" arousal
    pub precede_gap_ms: u64,
    /// Activation (percent) inside the look-back window that marks a clench
    /// arousal-linked; smaller than `ArousalConfig::activation_floor_pct`
    pub preceding_activation_pct: f64,
    /// Look-back before an arousal's start when searching for a paired clench
    pub follow_lookback_ms: u64,
    /// Look-forward after an arousal's end when searching for a paired clench
    pub follow_window_ms: u64,
}

impl Default for CorrelationConfig {
    fn default() -> Self {
        Self {
            precede_window_ms: 15_000,
            precede_gap_ms: 1000,
            preceding_activation_pct: 10.0,
            follow_lookback_ms: 2000,
            follow_window_ms: 30_000,
        }
    }
}

/// Severity label cutoffs on peak intensity percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeverityConfig {
    /// Peaks at or above this are Severe
    pub severe_floor_pct: f64,
    /// Peaks at or above this (and below the severe floor) are Moderate
    pub moderate_floor_pct: f64,
}

impl Default for SeverityConfig {
    fn default() -> Self {
        Self {
            severe_floor_pct: 75.0,
            moderate_floor_pct: 50.0,
        }
    }
}

/// Sleep-quality penalty slopes and caps.
///
/// The score is `100 - clench - hr_variability - temp_drift`, each penalty a
/// capped linear function of its statistic, clamped to 0-100 at the end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    pub clench_penalty_per_episode: f64,
    pub clench_penalty_cap: f64,
    /// Applied to the population standard deviation of heart rate
    pub hr_variability_slope: f64,
    pub hr_variability_cap: f64,
    /// Applied to the absolute net temperature drift over the session
    pub temp_drift_slope: f64,
    pub temp_drift_cap: f64,
    /// Score reported for a session with no samples at all
    pub empty_session_score: u8,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            clench_penalty_per_episode: 4.0,
            clench_penalty_cap: 40.0,
            hr_variability_slope: 1.5,
            hr_variability_cap: 25.0,
            temp_drift_slope: 10.0,
            temp_drift_cap: 15.0,
            empty_session_score: 85,
        }
    }
}

/// The full tunable surface of the classification core.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub signal: SignalConfig,
    pub clench: ClenchConfig,
    pub arousal: ArousalConfig,
    pub correlation: CorrelationConfig,
    pub severity: SeverityConfig,
    pub quality: QualityConfig,
}

impl EngineConfig {
    /// Check the ordering constraints the classification logic relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.signal.talking_floor >= self.signal.clenching_floor {
            return Err(ConfigError::Invalid(
                "talking_floor must be below clenching_floor".to_string(),
            ));
        }
        if self.signal.intensity_ceiling <= 0.0 {
            return Err(ConfigError::Invalid(
                "intensity_ceiling must be positive".to_string(),
            ));
        }
        if self.clench.min_duration_ms == 0 || self.arousal.min_duration_ms == 0 {
            return Err(ConfigError::Invalid(
                "minimum episode durations must be nonzero".to_string(),
            ));
        }
        if self.correlation.precede_gap_ms >= self.correlation.precede_window_ms {
            return Err(ConfigError::Invalid(
                "precede_gap_ms must be below precede_window_ms".to_string(),
            ));
        }
        if self.correlation.preceding_activation_pct >= self.arousal.activation_floor_pct {
            return Err(ConfigError::Invalid(
                "preceding_activation_pct must be below the standalone arousal floor".to_string(),
            ));
        }
        if self.severity.moderate_floor_pct >= self.severity.severe_floor_pct {
            return Err(ConfigError::Invalid(
                "moderate_floor_pct must be below severe_floor_pct".to_string(),
            ));
        }
        if self.quality.empty_session_score > 100 {
            return Err(ConfigError::Invalid(
                "empty_session_score must be at most 100".to_string(),
            ));
        }
        Ok(())
    }
}

/// Main configuration for the engine binary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Classification thresholds and windows
    pub engine: EngineConfig,

    /// How often the live loop recomputes a snapshot
    #[serde(with = "duration_serde")]
    pub tick_interval: Duration,

    /// Path for exported session reports
    pub export_path: PathBuf,

    /// Path for storing telemetry and state
    pub data_path: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("jawsense");

        Self {
            engine: EngineConfig::default(),
            tick_interval: Duration::from_secs(1),
            export_path: data_dir.join("reports"),
            data_path: data_dir,
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .map_err(|e| ConfigError::IoError(e.to_string()))?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            config.engine.validate()?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        let config_path = Self::config_path();

        // Ensure parent directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(&config_path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the configuration file.
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("jawsense")
            .join("config.json")
    }

    /// Ensure all required directories exist.
    pub fn ensure_directories(&self) -> Result<(), ConfigError> {
        std::fs::create_dir_all(&self.export_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        std::fs::create_dir_all(&self.data_path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(e) => write!(f, "IO error: {e}"),
            ConfigError::ParseError(e) => write!(f, "Parse error: {e}"),
            ConfigError::SerializeError(e) => write!(f, "Serialize error: {e}"),
            ConfigError::Invalid(e) => write!(f, "Invalid configuration: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Serde support for Duration.
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (duration.as_millis() as u64).serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u64::deserialize(deserializer)?;
        Ok(Duration::from_millis(millis))
    }
}
