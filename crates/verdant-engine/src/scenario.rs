//! Scenario documents: a world snapshot plus the intents to feed it.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;
use verdant_core::scenario::{demo_intents, demo_world};
use verdant_types::{WorkforceIntent, World};

use crate::error::EngineError;

/// A JSON scenario file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    /// Starting world.
    pub world: World,
    /// Intents keyed by the tick they are submitted before.
    #[serde(default)]
    pub intents: BTreeMap<u64, Vec<WorkforceIntent>>,
    /// Preferred run length.
    #[serde(default)]
    pub ticks: Option<u64>,
}

impl Scenario {
    /// Read and parse a scenario file.
    pub fn from_file(path: &Path) -> Result<Self, EngineError> {
        let contents = std::fs::read_to_string(path).map_err(|source| EngineError::File {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| EngineError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The built-in demo, with intents for `ticks` ticks.
    pub fn demo(seed: &str, ticks: u64, ticks_per_day: u64) -> Self {
        let days = ticks.div_ceil(ticks_per_day.max(1));
        Self {
            world: demo_world(seed),
            intents: demo_intents(days, ticks_per_day),
            ticks: Some(ticks),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn bundled_scenario_parses() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../scenarios/greenhouse.json");
        let scenario = Scenario::from_file(&path).unwrap();
        assert_eq!(scenario.world.seed, "greenhouse-1");
        assert!(!scenario.intents.is_empty());
        assert_eq!(scenario.ticks, Some(72));
        let config = verdant_core::SimulationConfig::default();
        assert!(verdant_core::validate_world(&scenario.world, &config).is_ok());
    }

    #[test]
    fn demo_covers_partial_days() {
        let scenario = Scenario::demo("s", 30, 24);
        assert_eq!(scenario.ticks, Some(30));
        assert!(scenario.intents.contains_key(&32));
    }

    #[test]
    fn missing_file_is_a_file_error() {
        let result = Scenario::from_file(Path::new("/nonexistent/scenario.json"));
        assert!(matches!(result, Err(EngineError::File { .. })));
    }
}
