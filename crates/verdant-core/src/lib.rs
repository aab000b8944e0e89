//! Tick pipeline, runner and golden-master harness for the Verdant
//! cultivation simulation.
//!
//! The core owns the tick loop. A [`Simulation`] advances an immutable
//! [`World`](verdant_types::World) snapshot through a fixed sequence of
//! [`PipelineStage`]s; the workforce and economy stages are implemented
//! here, the others are supplied by [`Collaborators`].
//!
//! # Modules
//!
//! - [`config`] -- YAML configuration ([`SimulationConfig`])
//! - [`clock`] -- Tick counter and simulation time ([`TickClock`])
//! - [`context`] -- Per-tick scratch state ([`RunContext`])
//! - [`pipeline`] -- Stage order ([`PipelineStage`])
//! - [`collaborators`] -- Seams for external stage implementations
//! - [`instrumentation`] -- Stage observers, heap samplers, traces
//! - [`telemetry`] -- Sinks for committed telemetry
//! - [`tick`] -- The orchestrator ([`Simulation::run_tick`])
//! - [`runner`] -- Multi-tick runs and daily/summary records
//! - [`golden`] -- Canonical hashing and drift detection
//! - [`validation`] -- Boundary validation of world documents
//! - [`scenario`] -- Built-in demo world and intents

pub mod clock;
pub mod collaborators;
pub mod config;
pub mod context;
pub mod golden;
pub mod instrumentation;
pub mod pipeline;
pub mod runner;
pub mod scenario;
pub mod telemetry;
pub mod tick;
pub mod validation;

mod stages;

// Re-export primary types at crate root for convenience.
pub use clock::{ClockError, ClockReading, TickClock};
pub use collaborators::{Collaborators, NoopCollaborators};
pub use config::{ConfigError, LoggingConfig, SimulationConfig, WorldConfig};
pub use context::RunContext;
pub use golden::{DayDigest, GoldenDigest, GoldenError, canonical_hash, verify_golden};
pub use instrumentation::{
    ChangeRecorder, HeapSampler, NullHeapSampler, StageChange, StageObserver, StageTrace,
    StatmDataSampler, TickTrace,
};
pub use pipeline::PipelineStage;
pub use runner::{
    DailyRecord, NoOpCallback, RunPlan, RunnerError, SimulationRun, SummaryRecord, TickCallback,
    run_simulation,
};
pub use telemetry::{MemorySink, TelemetrySink, TracingSink};
pub use tick::{SetupError, Simulation, TickError, TickOptions, TickOutcome};
pub use validation::{WorldValidationError, validate_world};
