//! Shared type definitions for the Verdant cultivation simulation.
//!
//! This crate is the single source of truth for the data carried by a
//! [`World`] snapshot and exchanged with collaborators. It holds no
//! behaviour beyond lookups and small invariant helpers.
//!
//! # Modules
//!
//! - [`ids`] -- Type-safe string identifiers
//! - [`enums`] -- Task status, cost basis, traits, raise decisions, warnings
//! - [`company`] -- Structures, rooms, zones, devices
//! - [`workforce`] -- Roles, employees, tasks, hiring market, payroll
//! - [`world`] -- The copy-on-write world snapshot
//! - [`intents`] -- Commands consumed during a tick
//! - [`telemetry`] -- Event envelope and topic names

pub mod company;
pub mod enums;
pub mod ids;
pub mod intents;
pub mod telemetry;
pub mod workforce;
pub mod world;

// Re-export all public types at crate root for convenience.
pub use company::{Company, Device, Room, Structure, Zone};
pub use enums::{RaiseDecision, TaskCategory, TaskCostBasis, TaskStatus, TraitKind, WarningCode};
pub use ids::{
    CandidateId, DeviceId, EmployeeId, EmployeeRngSeed, RoleId, RoomId, StructureId, TaskId,
    WorldId, ZoneId,
};
pub use intents::WorkforceIntent;
pub use telemetry::TelemetryEvent;
pub use workforce::{
    Employee, EmployeeDayUsage, EmployeeExperience, EmployeeRaiseState, EmployeeRole,
    EmployeeSchedule, FinalizedPayrollDay, PayrollTotals, RoleCompensation, RoleSkill,
    SkillRequirement, SkillTriad, SkillValue, TaskContext, TaskCostModel, TraitAssignment,
    WorkforceKpiSnapshot, WorkforceMarketCandidate, WorkforceMarketState,
    WorkforceMarketStructureState, WorkforcePayrollState, WorkforceState,
    WorkforceTaskDefinition, WorkforceTaskInstance, WorkforceWarning,
};
pub use world::{FinanceState, World, WORLD_SCHEMA_VERSION, day_index_for};
