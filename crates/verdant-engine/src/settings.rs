//! Run settings read from the environment.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `VERDANT_CONFIG` | YAML config path | `verdant-config.yaml` |
//! | `VERDANT_SCENARIO` | JSON scenario (world + intents) | built-in demo |
//! | `VERDANT_SEED` | Seed of the built-in demo | `verdant` |
//! | `VERDANT_TICKS` | Ticks to run | one week |
//! | `VERDANT_GOLDEN` | Recorded digest to verify against | none |
//! | `VERDANT_GOLDEN_WRITE` | Record the digest instead of verifying | off |
//! | `VERDANT_TRACE` | Time stages and sample the heap | off |

use std::path::PathBuf;

use crate::error::EngineError;

/// Default config file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "verdant-config.yaml";

/// Default seed of the built-in demo.
pub const DEFAULT_SEED: &str = "verdant";

/// Everything the binary needs from its environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Config path.
    pub config_path: PathBuf,
    /// Scenario document, if any.
    pub scenario_path: Option<PathBuf>,
    /// Seed of the built-in demo.
    pub seed: String,
    /// Ticks to run; `None` means one week.
    pub ticks: Option<u64>,
    /// Golden digest path, if any.
    pub golden_path: Option<PathBuf>,
    /// Record instead of verify.
    pub golden_write: bool,
    /// Collect stage traces.
    pub trace: bool,
}

impl Settings {
    /// Read settings from the process environment.
    pub fn from_env() -> Result<Self, EngineError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Read settings through `lookup`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, EngineError> {
        let ticks = match lookup("VERDANT_TICKS") {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|_| EngineError::Env {
                name: "VERDANT_TICKS",
                value: raw.clone(),
            })?),
            None => None,
        };
        Ok(Self {
            config_path: lookup("VERDANT_CONFIG")
                .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from),
            scenario_path: lookup("VERDANT_SCENARIO").map(PathBuf::from),
            seed: lookup("VERDANT_SEED").unwrap_or_else(|| DEFAULT_SEED.to_owned()),
            ticks,
            golden_path: lookup("VERDANT_GOLDEN").map(PathBuf::from),
            golden_write: lookup("VERDANT_GOLDEN_WRITE").is_some_and(|v| is_truthy(&v)),
            trace: lookup("VERDANT_TRACE").is_some_and(|v| is_truthy(&v)),
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: BTreeMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();
        assert_eq!(settings.config_path, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert_eq!(settings.seed, DEFAULT_SEED);
        assert_eq!(settings.ticks, None);
        assert!(!settings.trace);
    }

    #[test]
    fn overrides_are_read() {
        let settings = Settings::from_lookup(lookup(&[
            ("VERDANT_CONFIG", "/etc/verdant.yaml"),
            ("VERDANT_TICKS", "48"),
            ("VERDANT_GOLDEN_WRITE", "true"),
        ]))
        .unwrap();
        assert_eq!(settings.config_path, PathBuf::from("/etc/verdant.yaml"));
        assert_eq!(settings.ticks, Some(48));
        assert!(settings.golden_write);
    }

    #[test]
    fn bad_tick_count_is_rejected() {
        let result = Settings::from_lookup(lookup(&[("VERDANT_TICKS", "many")]));
        assert!(matches!(result, Err(EngineError::Env { name: "VERDANT_TICKS", .. })));
    }
}
