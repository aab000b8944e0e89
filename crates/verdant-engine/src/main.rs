//! Command-line runner for the Verdant simulation.
//!
//! # Startup Sequence
//!
//! 1. Read run settings from the environment
//! 2. Load configuration from `verdant-config.yaml` (or `VERDANT_CONFIG`)
//! 3. Initialize structured logging (tracing)
//! 4. Build the simulation (clock, trait registry)
//! 5. Load the scenario document, or the built-in demo
//! 6. Validate the starting world
//! 7. Run the ticks
//! 8. Hash the run and verify or record the golden master
//! 9. Print the digest

mod error;
mod scenario;
mod settings;

use std::path::Path;

use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use verdant_core::{
    GoldenDigest, LoggingConfig, NoOpCallback, RunPlan, Simulation, SimulationConfig,
    StatmDataSampler, TickOptions, TracingSink, run_simulation, validate_world, verify_golden,
};

use crate::error::EngineError;
use crate::scenario::Scenario;
use crate::settings::Settings;

/// Days run when neither the environment nor the scenario sets a length.
const DEFAULT_DAYS: u64 = 7;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any startup step fails, a tick breaks an invariant,
/// or the run drifts from the recorded golden master.
fn main() -> Result<(), EngineError> {
    // 1-2. Settings and configuration.
    let settings = Settings::from_env()?;
    let config = load_config(&settings.config_path)?;

    // 3. Structured logging.
    init_tracing(&config.logging);
    info!(
        config = %settings.config_path.display(),
        hours_per_tick = config.world.hours_per_tick,
        hours_per_day = config.world.hours_per_day,
        "verdant-engine starting"
    );

    // 4. Simulation.
    let sim = Simulation::new(config)?;
    let ticks_per_day = sim.clock().ticks_per_day();

    // 5-6. Scenario.
    let scenario = match &settings.scenario_path {
        Some(path) => Scenario::from_file(path)?,
        None => {
            let ticks = settings
                .ticks
                .unwrap_or_else(|| ticks_per_day.saturating_mul(DEFAULT_DAYS));
            Scenario::demo(&settings.seed, ticks, ticks_per_day)
        }
    };
    validate_world(&scenario.world, sim.config())?;
    let ticks = settings
        .ticks
        .or(scenario.ticks)
        .unwrap_or_else(|| ticks_per_day.saturating_mul(DEFAULT_DAYS));
    info!(
        world = %scenario.world.id,
        seed = %scenario.world.seed,
        employees = scenario.world.workforce.employees.len(),
        ticks,
        "Scenario loaded"
    );

    // 7. Run.
    let plan = RunPlan {
        ticks,
        intents: scenario.intents,
    };
    let sampler = StatmDataSampler::default();
    let mut sink = TracingSink;
    let mut options = TickOptions {
        sink: Some(&mut sink),
        heap_sampler: &sampler,
        trace: settings.trace,
        ..TickOptions::default()
    };
    let run = run_simulation(&sim, &scenario.world, &plan, &mut options, &mut NoOpCallback)?;

    if let Some(slowest) = run
        .traces
        .iter()
        .filter_map(|t| t.slowest().map(|s| (t.tick, s)))
        .max_by_key(|(_, s)| s.duration)
    {
        info!(
            tick = slowest.0,
            stage = %slowest.1.stage,
            micros = u64::try_from(slowest.1.duration.as_micros()).unwrap_or(u64::MAX),
            "Slowest stage"
        );
    }

    // 8. Golden master.
    let digest = GoldenDigest::from_run(&run)?;
    if let Some(path) = &settings.golden_path {
        if settings.golden_write {
            write_golden(path, &digest)?;
            info!(path = %path.display(), "Golden master recorded");
        } else {
            let expected = read_golden(path)?;
            verify_golden(&expected, &digest)?;
            info!(path = %path.display(), days = digest.days.len(), "Golden master verified");
        }
    }

    // 9. Output.
    let rendered = serde_json::to_string_pretty(&digest).map_err(|source| EngineError::Json {
        path: settings.golden_path.clone().unwrap_or_default(),
        source,
    })?;
    println!("{rendered}");
    println!("combined: {}", digest.combined()?);
    Ok(())
}

/// Load configuration, falling back to defaults when the file is absent.
fn load_config(path: &Path) -> Result<SimulationConfig, EngineError> {
    if path.exists() {
        Ok(SimulationConfig::from_file(path)?)
    } else {
        Ok(SimulationConfig::default())
    }
}

fn init_tracing(logging: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if logging.format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
    if !matches!(logging.format.as_str(), "json" | "pretty") {
        warn!(format = %logging.format, "Unknown log format, using pretty");
    }
}

fn read_golden(path: &Path) -> Result<GoldenDigest, EngineError> {
    let contents = std::fs::read_to_string(path).map_err(|source| EngineError::File {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| EngineError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn write_golden(path: &Path, digest: &GoldenDigest) -> Result<(), EngineError> {
    let rendered = serde_json::to_string_pretty(digest).map_err(|source| EngineError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, rendered).map_err(|source| EngineError::File {
        path: path.to_path_buf(),
        source,
    })
}
