//! Error types for the verdant-workforce crate.
//!
//! Only boundary validation fails with an error: a malformed trait table or
//! task catalog is rejected before the first tick. Everything that can go
//! wrong inside a tick is reported as a warning instead.

use verdant_types::TraitKind;

/// Errors raised while building the trait registry.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TraitError {
    /// A trait lists itself as a conflict.
    #[error("trait {0:?} conflicts with itself")]
    SelfConflict(TraitKind),

    /// A strength range is empty or leaves `[0, 1]`.
    #[error("trait {trait_kind:?} has invalid strength range {min}..={max}")]
    InvalidStrengthRange {
        /// Offending trait.
        trait_kind: TraitKind,
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },

    /// The table does not describe every trait exactly once.
    #[error("trait table describes {found} traits, expected {expected}")]
    IncompleteTable {
        /// Entries in the table.
        found: usize,
        /// Size of the closed trait set.
        expected: usize,
    },
}

/// Errors raised while validating roles and task definitions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CatalogError {
    /// Two roles share an id or slug.
    #[error("duplicate role: {0}")]
    DuplicateRole(String),

    /// Two task definitions share a task code.
    #[error("duplicate task definition: {0}")]
    DuplicateTaskCode(String),

    /// A task definition has a negative or non-finite labour demand.
    #[error("task definition {task_code} has invalid labour minutes {minutes}")]
    InvalidLaborMinutes {
        /// Task code.
        task_code: String,
        /// Declared minutes.
        minutes: f64,
    },

    /// A skill threshold leaves `[0, 1]`.
    #[error("skill threshold {skill}={level} out of range in {owner}")]
    SkillThresholdOutOfRange {
        /// Role slug or task code owning the threshold.
        owner: String,
        /// Skill key.
        skill: String,
        /// Declared threshold.
        level: f64,
    },

    /// A role's compensation figures are negative or non-finite.
    #[error("role {0} has invalid compensation")]
    InvalidCompensation(String),

    /// An employee schedule cannot be satisfied.
    #[error("employee {employee} has invalid schedule: {reason}")]
    InvalidSchedule {
        /// Employee id.
        employee: String,
        /// What is wrong.
        reason: String,
    },

    /// An employee references a role missing from the catalog.
    #[error("employee {employee} references unknown role {role}")]
    UnknownRole {
        /// Employee id.
        employee: String,
        /// Role id.
        role: String,
    },
}
