//! Daemon configuration parameters
//!
//! Every field has a default, so the daemon runs without a config file.
//! An optional JSON file (`-c <path>`) overrides any subset of fields.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Random blink timing, in microseconds. Ranges are half-open.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BlinkConfig {
    pub high_min_us: u32,
    pub high_max_us: u32,
    pub low_min_us: u32,
    pub low_max_us: u32,
}

impl Default for BlinkConfig {
    fn default() -> Self {
        Self {
            high_min_us: 50_000,
            high_max_us: 200_000,
            low_min_us: 25_000,
            low_max_us: 75_000,
        }
    }
}

impl BlinkConfig {
    pub fn high_range(&self) -> core::ops::Range<u32> {
        self.high_min_us..self.high_max_us
    }

    pub fn low_range(&self) -> core::ops::Range<u32> {
        self.low_min_us..self.low_max_us
    }
}

/// Gamma-corrected breathing pulse.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PulseConfig {
    /// PWM steps per half cycle; also the step period in microseconds.
    pub steps: u32,
    /// Brightness curve exponent.
    pub gamma: f64,
}

impl Default for PulseConfig {
    fn default() -> Self {
        Self {
            steps: 1000,
            gamma: 2.1,
        }
    }
}

/// Where log records go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogTarget {
    /// System log, facility `daemon`, tagged with program name and pid.
    #[default]
    Syslog,
    /// Standard error (foreground and debugging).
    Stderr,
}

/// Core daemon configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DaemonConfig {
    // --- Command channel ---
    /// FIFO path. `None` derives `/tmp/<program>.fifo`.
    pub fifo_path: Option<PathBuf>,

    // --- GPIO ---
    /// GPIO character device.
    pub gpio_chip: PathBuf,
    /// Consumer label attached to requested lines.
    pub consumer: String,

    // --- Entropy ---
    pub entropy_path: PathBuf,

    // --- Effects ---
    pub blink: BlinkConfig,
    pub pulse: PulseConfig,

    // --- Logging ---
    pub log_target: LogTarget,

    // --- Timing ---
    /// Sleep between polls while no continuous effect is running.
    pub idle_poll_interval_ms: u32,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            fifo_path: None,
            gpio_chip: PathBuf::from("/dev/gpiochip0"),
            consumer: String::from("gpiod"),
            entropy_path: PathBuf::from("/dev/urandom"),
            blink: BlinkConfig::default(),
            pulse: PulseConfig::default(),
            log_target: LogTarget::Syslog,
            idle_poll_interval_ms: 10,
        }
    }
}

/// Errors from [`DaemonConfig::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl DaemonConfig {
    /// Read a JSON config file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config '{}'", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config '{}'", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the effect generators cannot honour.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.blink.high_min_us >= self.blink.high_max_us {
            return Err(ConfigError::ValidationFailed(
                "blink.high_min_us must be below blink.high_max_us",
            ));
        }
        if self.blink.low_min_us >= self.blink.low_max_us {
            return Err(ConfigError::ValidationFailed(
                "blink.low_min_us must be below blink.low_max_us",
            ));
        }
        if self.pulse.steps == 0 {
            return Err(ConfigError::ValidationFailed("pulse.steps must be non-zero"));
        }
        if !self.pulse.gamma.is_finite() || self.pulse.gamma <= 0.0 {
            return Err(ConfigError::ValidationFailed(
                "pulse.gamma must be a positive finite number",
            ));
        }
        Ok(())
    }

    /// FIFO path to use: the configured one, or `/tmp/<program>.fifo`.
    pub fn resolve_fifo_path(&self, program: &str) -> PathBuf {
        self.fifo_path
            .clone()
            .unwrap_or_else(|| default_fifo_path(program))
    }
}

/// `/tmp/<program>.fifo`, where `<program>` is the file name part of argv[0].
pub fn default_fifo_path(program: &str) -> PathBuf {
    let name = Path::new(program)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or(env!("CARGO_PKG_NAME"));
    PathBuf::from(format!("/tmp/{name}.fifo"))
}
