//! Intents: externally supplied commands consumed during a tick.
//!
//! Collaborators and players append intents to the run context before a
//! tick. The workforce stage drains them in submission order.

use serde::{Deserialize, Serialize};

use crate::enums::RaiseDecision;
use crate::ids::{CandidateId, EmployeeId, StructureId, TaskId};
use crate::workforce::WorkforceTaskInstance;

/// A workforce command, discriminated by its `type` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WorkforceIntent {
    /// Append a task instance to the queue.
    EnqueueTask {
        /// The task to append. Its status must be `queued`.
        task: WorkforceTaskInstance,
    },
    /// Cancel a queued or in-progress task.
    CancelTask {
        /// Task to cancel.
        task_id: TaskId,
    },
    /// Refresh the candidate pool of a structure.
    ScanMarket {
        /// Structure to scan for.
        structure_id: StructureId,
    },
    /// Hire a candidate from a structure's pool.
    Hire {
        /// Structure whose pool holds the candidate.
        structure_id: StructureId,
        /// Candidate to hire.
        candidate_id: CandidateId,
    },
    /// Resolve a raise negotiation.
    Raise {
        /// Employee asking for a raise.
        employee_id: EmployeeId,
        /// Decision taken.
        decision: RaiseDecision,
        /// Override of the default rate increase fraction.
        #[serde(default)]
        rate_increase: Option<f64>,
        /// Override of the default morale delta.
        #[serde(default)]
        morale_delta: Option<f64>,
    },
    /// Let an employee go.
    Terminate {
        /// Employee to remove.
        employee_id: EmployeeId,
        /// Free-form reason for telemetry.
        #[serde(default)]
        reason: Option<String>,
        /// Override of the default morale ripple on co-workers.
        #[serde(default)]
        morale_ripple: Option<f64>,
    },
}

impl WorkforceIntent {
    /// The `type` discriminant as serialized.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::EnqueueTask { .. } => "enqueue_task",
            Self::CancelTask { .. } => "cancel_task",
            Self::ScanMarket { .. } => "scan_market",
            Self::Hire { .. } => "hire",
            Self::Raise { .. } => "raise",
            Self::Terminate { .. } => "terminate",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intents_are_tagged_by_type() {
        let json = r#"{"type":"raise","employee_id":"e1","decision":"accept"}"#;
        let intent: Result<WorkforceIntent, _> = serde_json::from_str(json);
        let intent = intent.ok();
        assert_eq!(
            intent.as_ref().map(WorkforceIntent::kind),
            Some("raise")
        );
        assert!(matches!(
            intent,
            Some(WorkforceIntent::Raise {
                decision: RaiseDecision::Accept,
                rate_increase: None,
                ..
            })
        ));
    }
}
