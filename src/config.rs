use serde::Deserialize;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use thiserror::Error;

/// Resolved thresholds, immutable for the lifetime of the run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdConfig {
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub max_processes: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub thresholds: ThresholdOverrides,
}

/// Thresholds as they appear in the file; absent keys keep their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThresholdOverrides {
    #[serde(default)]
    pub cpu_percent: Option<f64>,
    #[serde(default)]
    pub memory_percent: Option<f64>,
    #[serde(default)]
    pub disk_percent: Option<f64>,
    #[serde(default)]
    pub max_processes: Option<u64>,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            cpu_percent: default_cpu_percent(),
            memory_percent: default_memory_percent(),
            disk_percent: default_disk_percent(),
            max_processes: default_max_processes(),
        }
    }
}

impl fmt::Display for ThresholdConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cpu_percent={:.1}, memory_percent={:.1}, disk_percent={:.1}, max_processes={}",
            self.cpu_percent, self.memory_percent, self.disk_percent, self.max_processes
        )
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse JSON in {path}: {source}")]
    Parse {
        path: String,
        source: serde_json::Error,
    },
    #[error("invalid configuration: {0}")]
    Validation(String),
}

impl ThresholdConfig {
    /// Loads thresholds from `path`. A missing file yields the defaults.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path_ref = path.as_ref();
        let path_display = path_ref.display().to_string();
        let text = match fs::read_to_string(path_ref) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path_display,
                    source,
                })
            }
        };

        Self::parse(&text, path_display)
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Self::parse(text, "<inline>".to_string())
    }

    fn parse(text: &str, path: String) -> Result<Self, ConfigError> {
        let file: FileConfig =
            serde_json::from_str(text).map_err(|source| ConfigError::Parse { path, source })?;

        let cfg = Self::default().overlay(&file.thresholds);
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn overlay(self, overrides: &ThresholdOverrides) -> Self {
        Self {
            cpu_percent: overrides.cpu_percent.unwrap_or(self.cpu_percent),
            memory_percent: overrides.memory_percent.unwrap_or(self.memory_percent),
            disk_percent: overrides.disk_percent.unwrap_or(self.disk_percent),
            max_processes: overrides.max_processes.unwrap_or(self.max_processes),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let percents = [
            ("cpu_percent", self.cpu_percent),
            ("memory_percent", self.memory_percent),
            ("disk_percent", self.disk_percent),
        ];
        for (name, value) in percents {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Validation(format!(
                    "thresholds.{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }

    pub fn example_json() -> &'static str {
        include_str!("../monitor_config.json.example")
    }
}

const fn default_cpu_percent() -> f64 {
    80.0
}

const fn default_memory_percent() -> f64 {
    85.0
}

const fn default_disk_percent() -> f64 {
    90.0
}

const fn default_max_processes() -> u64 {
    300
}
