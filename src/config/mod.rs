// src/config/mod.rs
//! User configuration loaded from `config.toml`.
//!
//! Every field has a default, so a missing file or a partial one is fine.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::graph::{MAX_FFT_SIZE, MIN_FFT_SIZE};

const APP_DIR: &str = "warble";
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid setting `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerSection {
    /// Starting volume ratio in `[0, 1]`.
    pub initial_volume: f64,
    /// Step for the back/forward buttons, in seconds.
    pub skip_seconds: f64,
    /// Volume change per key press, as a ratio.
    pub volume_step: f64,
    /// Use the spectrum player instead of the plain one.
    pub visualizer: bool,
}

impl Default for PlayerSection {
    fn default() -> Self {
        Self {
            initial_volume: 0.8,
            skip_seconds: 15.0,
            volume_step: 0.05,
            visualizer: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyserSection {
    pub fft_size: usize,
    pub smoothing: f32,
}

impl Default for AnalyserSection {
    fn default() -> Self {
        Self {
            fft_size: 2048,
            smoothing: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrumSection {
    pub bar_count: usize,
    pub bar_gap: f64,
    /// Fraction of the frequency bins spread across the bars.
    pub spectrum_range: f64,
    pub frame_rate: u32,
}

impl Default for SpectrumSection {
    fn default() -> Self {
        Self {
            bar_count: 32,
            bar_gap: 1.0,
            spectrum_range: 0.7,
            frame_rate: 60,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogSection {
    /// Default filter directive; `RUST_LOG` takes precedence.
    pub level: String,
    /// Log file. Logging is off when unset, since the terminal belongs to the UI.
    pub file: Option<PathBuf>,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub player: PlayerSection,
    pub analyser: AnalyserSection,
    pub spectrum: SpectrumSection,
    pub log: LogSection,
}

impl Config {
    /// `<config dir>/warble/config.toml`, if the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Load `path`, or the default location when `None`. A missing default file
    /// yields the defaults; a missing explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => return Ok(Self::default()),
            },
        };

        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if !required && e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        Self::parse(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse { path, source },
            other => other,
        })
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key, reason: String| Err(ConfigError::Invalid { key, reason });

        if !(0.0..=1.0).contains(&self.player.initial_volume) {
            return invalid("player.initial_volume", "must be within [0, 1]".into());
        }
        if !(self.player.skip_seconds.is_finite() && self.player.skip_seconds > 0.0) {
            return invalid("player.skip_seconds", "must be positive".into());
        }
        if !(self.player.volume_step > 0.0 && self.player.volume_step <= 1.0) {
            return invalid("player.volume_step", "must be within (0, 1]".into());
        }
        let fft = self.analyser.fft_size;
        if !fft.is_power_of_two() || !(MIN_FFT_SIZE..=MAX_FFT_SIZE).contains(&fft) {
            return invalid(
                "analyser.fft_size",
                format!("{fft} is not a power of two in [{MIN_FFT_SIZE}, {MAX_FFT_SIZE}]"),
            );
        }
        if !(0.0..1.0).contains(&self.analyser.smoothing) {
            return invalid("analyser.smoothing", "must be within [0, 1)".into());
        }
        if self.spectrum.bar_count == 0 {
            return invalid("spectrum.bar_count", "must be at least 1".into());
        }
        if !(self.spectrum.bar_gap.is_finite() && self.spectrum.bar_gap >= 0.0) {
            return invalid("spectrum.bar_gap", "must not be negative".into());
        }
        if !(self.spectrum.spectrum_range > 0.0 && self.spectrum.spectrum_range <= 1.0) {
            return invalid("spectrum.spectrum_range", "must be within (0, 1]".into());
        }
        if self.spectrum.frame_rate == 0 {
            return invalid("spectrum.frame_rate", "must be at least 1".into());
        }
        Ok(())
    }
}
