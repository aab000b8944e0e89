//! Enumeration types shared across the workspace.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// Behavioural trait an employee or candidate can carry.
///
/// The set is closed. Declaration order is the catalog order in which trait
/// effects are composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraitKind {
    /// Faster at plant work.
    GreenThumb,
    /// Faster and gentler on maintenance work.
    Gearhead,
    /// Slower but makes fewer mistakes.
    Meticulous,
    /// Makes more mistakes.
    Forgetful,
    /// Wears devices down faster.
    Clumsy,
    /// Slow and spares their own energy.
    Slacker,
    /// Quick and enjoys the work.
    Motivated,
    /// Tires slowly.
    Resilient,
    /// Gains experience faster.
    QuickLearner,
    /// Asks for less money.
    Frugal,
    /// Asks for more money.
    Demanding,
    /// Morale lifts with every task.
    Optimist,
}

impl TraitKind {
    /// Every trait in catalog order.
    pub const ALL: [Self; 12] = [
        Self::GreenThumb,
        Self::Gearhead,
        Self::Meticulous,
        Self::Forgetful,
        Self::Clumsy,
        Self::Slacker,
        Self::Motivated,
        Self::Resilient,
        Self::QuickLearner,
        Self::Frugal,
        Self::Demanding,
        Self::Optimist,
    ];

    /// Stable string id used for breakdown sorting and telemetry.
    pub const fn id(self) -> &'static str {
        match self {
            Self::GreenThumb => "trait_green_thumb",
            Self::Gearhead => "trait_gearhead",
            Self::Meticulous => "trait_meticulous",
            Self::Forgetful => "trait_forgetful",
            Self::Clumsy => "trait_clumsy",
            Self::Slacker => "trait_slacker",
            Self::Motivated => "trait_motivated",
            Self::Resilient => "trait_resilient",
            Self::QuickLearner => "trait_quick_learner",
            Self::Frugal => "trait_frugal",
            Self::Demanding => "trait_demanding",
            Self::Optimist => "trait_optimist",
        }
    }

    /// Position of the trait in catalog order.
    pub fn catalog_index(self) -> usize {
        Self::ALL.iter().position(|t| *t == self).unwrap_or(usize::MAX)
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Lifecycle state of a task instance. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Waiting for dispatch.
    Queued,
    /// Assigned and partially worked.
    InProgress,
    /// Finished. Terminal.
    Completed,
    /// Withdrawn by a collaborator. Terminal.
    Cancelled,
}

impl TaskStatus {
    /// Whether the status can no longer change.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Forward-only transition check.
    pub const fn can_transition_to(self, next: Self) -> bool {
        match self {
            Self::Queued => !matches!(next, Self::Queued),
            Self::InProgress => matches!(next, Self::Completed | Self::Cancelled | Self::Queued),
            Self::Completed | Self::Cancelled => false,
        }
    }
}

/// How the labour demand of a task scales.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TaskCostBasis {
    /// Fixed minutes per execution.
    PerAction,
    /// Minutes per plant in the target zone.
    PerPlant,
    /// Minutes per square metre of the target area.
    PerSquareMeter,
}

/// Broad task category. Drives wellbeing rules and trait focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Plant care, harvesting, training.
    #[default]
    Cultivation,
    /// Device servicing and repair.
    Maintenance,
    /// Sanitation.
    Cleaning,
    /// Pest and disease inspection or treatment.
    Inspection,
    /// Paperwork and logistics.
    Administration,
    /// Rest; recovers fatigue instead of adding it.
    Break,
}

// ---------------------------------------------------------------------------
// Raises and warnings
// ---------------------------------------------------------------------------

/// Outcome of a raise negotiation chosen by the player or policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RaiseDecision {
    /// Grant a permanent raise.
    Accept,
    /// Pay a bonus with a smaller permanent adjustment.
    Bonus,
    /// Decline; morale drops.
    Ignore,
}

/// Machine-readable warning code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningCode {
    /// A queued task references a task code missing from the catalog.
    UnknownTaskDefinition,
    /// A queued task's structure could not be resolved.
    UnroutableTask,
    /// An intent referenced an employee that is not on the roster.
    UnknownEmployee,
    /// An intent referenced a task that is not in the queue.
    UnknownTask,
    /// A hire intent referenced a candidate that is not in the pool.
    UnknownCandidate,
    /// A hire intent referenced a role slug with no matching role.
    UnknownRole,
    /// A raise intent arrived before the employee was eligible.
    RaiseNotEligible,
    /// A task transition was rejected because it would move backwards.
    InvalidTaskTransition,
    /// A payroll contribution was rejected by the ledger.
    PayrollRejected,
    /// A scan was requested during the cooldown window.
    ScanCooldown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_states_never_transition() {
        for next in [
            TaskStatus::Queued,
            TaskStatus::InProgress,
            TaskStatus::Completed,
            TaskStatus::Cancelled,
        ] {
            assert!(!TaskStatus::Completed.can_transition_to(next));
            assert!(!TaskStatus::Cancelled.can_transition_to(next));
        }
        assert!(TaskStatus::Queued.can_transition_to(TaskStatus::Completed));
    }

    #[test]
    fn trait_ids_are_unique_and_indexed() {
        let mut ids: Vec<&str> = TraitKind::ALL.iter().map(|t| t.id()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), TraitKind::ALL.len());
        assert_eq!(TraitKind::Optimist.catalog_index(), 11);
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_string(&TaskStatus::InProgress).ok();
        assert_eq!(json.as_deref(), Some("\"in-progress\""));
    }
}
