//! Workforce logic for the Verdant cultivation simulation.
//!
//! Everything that operates on [`WorkforceState`](verdant_types::WorkforceState)
//! without touching I/O: hiring, scheduling, dispatch, wellbeing, raises and
//! terminations. It sits between `verdant-types` (data) and `verdant-core`
//! (the tick pipeline).
//!
//! Every stochastic decision draws from a [`rng::RngStream`] keyed by stable
//! identifiers, so identical inputs always yield identical outputs.
//!
//! # Modules
//!
//! - [`catalog`] -- Boundary validation of roles, task definitions and roster
//! - [`config`] -- Tunables ([`WorkforceConfig`])
//! - [`dispatch`] -- Capacity-constrained task assignment
//! - [`engine`] -- The workforce tick ([`process_tick`])
//! - [`error`] -- Error types ([`CatalogError`], [`TraitError`])
//! - [`events`] -- Workforce events and their telemetry topics
//! - [`kpi`] -- KPI snapshots and bounded histories
//! - [`market`] -- Hiring market scans and hires
//! - [`raises`] -- Raise eligibility and application
//! - [`rng`] -- Seeded, stream-keyed RNG
//! - [`scheduler`] -- Dispatch ordering and structure resolution
//! - [`termination`] -- Removing employees
//! - [`traits`] -- Trait registry and effect composition
//! - [`wellbeing`] -- Fatigue, morale and experience

pub mod catalog;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod error;
pub mod events;
pub mod kpi;
pub mod market;
pub mod raises;
pub mod rng;
pub mod scheduler;
pub mod termination;
pub mod traits;
pub mod wellbeing;

#[cfg(test)]
mod test_support;

// Re-export primary types at crate root for convenience.
pub use catalog::validate_catalog;
pub use config::{
    DispatchConfig, HireDefaults, MarketConfig, RaiseConfig, RaiseEffect, TerminationConfig,
    WellbeingConfig, WorkforceConfig,
};
pub use dispatch::{DispatchContext, DispatchOutcome, TaskAssignment, dispatch};
pub use engine::{PayrollAccrualSnapshot, WorkforceTickInput, WorkforceTickResult, process_tick};
pub use error::{CatalogError, TraitError};
pub use events::WorkforceEvent;
pub use market::{HireOutcome, ScanOutcome, ScanRequest, perform_hire, perform_scan};
pub use rng::{RngStream, create_stream};
pub use scheduler::{LocationIndex, ScheduleEntry, build_schedule, compare_schedule_entries};
pub use traits::{TraitEffectBase, TraitEffectContext, TraitEffectOutcome, TraitRegistry};
