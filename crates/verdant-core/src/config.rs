//! Configuration loading and typed config structures for the Verdant simulation.
//!
//! The canonical configuration lives in `verdant-config.yaml` at the project
//! root. Every field has a default, so a partial file (or an empty one) is
//! valid. [`SimulationConfig::validate`] rejects values the tick pipeline
//! cannot run with; it is called by both loaders.

use std::path::Path;

use serde::Deserialize;
use verdant_types::WORLD_SCHEMA_VERSION;
use verdant_workforce::WorkforceConfig;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// A value is out of range.
    #[error("invalid configuration: {reason}")]
    Invalid {
        /// What is wrong.
        reason: String,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level simulation configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Time model.
    #[serde(default)]
    pub world: WorldConfig,

    /// Workforce tunables.
    #[serde(default)]
    pub workforce: WorkforceConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML, or
    /// [`ConfigError::Invalid`] if a value is out of range.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = if yaml.trim().is_empty() {
            Self::default()
        } else {
            serde_yml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Check ranges the pipeline relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad value.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: &str| {
            Err(ConfigError::Invalid {
                reason: reason.to_owned(),
            })
        };
        let world = &self.world;
        if !(world.hours_per_tick.is_finite() && world.hours_per_tick > 0.0) {
            return invalid("world.hours_per_tick must be positive");
        }
        if !(world.hours_per_day.is_finite() && world.hours_per_day > 0.0) {
            return invalid("world.hours_per_day must be positive");
        }
        if world.hours_per_tick > world.hours_per_day {
            return invalid("world.hours_per_tick cannot exceed world.hours_per_day");
        }
        let workforce = &self.workforce;
        if workforce.payroll.overtime_multiplier < 1.0 {
            return invalid("workforce.payroll.overtime_multiplier must be at least 1");
        }
        let (lo, hi) = workforce.market.main_skill_range;
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
            return invalid("workforce.market.main_skill_range must lie within 0..=1");
        }
        let (lo, hi) = workforce.market.secondary_skill_range;
        if !(0.0..=1.0).contains(&lo) || !(0.0..=1.0).contains(&hi) || lo > hi {
            return invalid("workforce.market.secondary_skill_range must lie within 0..=1");
        }
        if workforce.wellbeing.experience_ceiling_hours <= 0.0 {
            return invalid("workforce.wellbeing.experience_ceiling_hours must be positive");
        }
        if workforce.dispatch.tie_epsilon < 0.0 {
            return invalid("workforce.dispatch.tie_epsilon cannot be negative");
        }
        Ok(())
    }
}

/// Time model of the simulation.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WorldConfig {
    /// Simulated hours per tick (default: 1).
    #[serde(default = "default_hours_per_tick")]
    pub hours_per_tick: f64,

    /// Hours per simulation day (default: 24).
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,

    /// Schema version world documents must carry.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            hours_per_tick: default_hours_per_tick(),
            hours_per_day: default_hours_per_day(),
            schema_version: default_schema_version(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format: `"pretty"` or `"json"`.
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (required by serde)
// ---------------------------------------------------------------------------

const fn default_hours_per_tick() -> f64 {
    1.0
}

const fn default_hours_per_day() -> f64 {
    24.0
}

fn default_schema_version() -> String {
    WORLD_SCHEMA_VERSION.to_owned()
}

fn default_log_level() -> String {
    String::from("info")
}

fn default_log_format() -> String {
    String::from("pretty")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = SimulationConfig::parse("").ok();
        assert_eq!(config, Some(SimulationConfig::default()));
    }

    #[test]
    fn partial_document_keeps_other_defaults() {
        let yaml = r"
world:
  hours_per_day: 12
workforce:
  market:
    pool_size: 4
  payroll:
    overtime_multiplier: 1.5
    location_index:
      s-1: 1.2
";
        let config = SimulationConfig::parse(yaml);
        assert!(config.is_ok(), "{config:?}");
        let config = config.unwrap_or_default();
        assert!((config.world.hours_per_day - 12.0).abs() < f64::EPSILON);
        assert!((config.world.hours_per_tick - 1.0).abs() < f64::EPSILON);
        assert_eq!(config.workforce.market.pool_size, 4);
        assert_eq!(config.workforce.market.scan_cooldown_days, 30);
        assert!((config.workforce.payroll.overtime_multiplier - 1.5).abs() < f64::EPSILON);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let result = SimulationConfig::parse("world:\n  hours_per_tick: 0\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
        let result = SimulationConfig::parse("world:\n  hours_per_tick: 48\n");
        assert!(matches!(result, Err(ConfigError::Invalid { .. })));
    }

    #[test]
    fn malformed_yaml_is_a_yaml_error() {
        let result = SimulationConfig::parse("world: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn bundled_config_file_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../verdant-config.yaml");
        let config = SimulationConfig::from_file(&path);
        assert!(config.is_ok(), "{config:?}");
        let config = config.unwrap_or_default();
        assert_eq!(config.workforce.market.pool_size, 16);
        assert_eq!(config.logging.format, "pretty");
    }
}
