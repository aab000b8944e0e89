//! Employee termination.
//!
//! Removing an employee reverts every task they held that is not terminal
//! to `queued` with no assignee, then nudges the morale of everyone left in
//! the same structure by a bounded ripple.

use tracing::debug;
use verdant_types::{EmployeeId, StructureId, TaskStatus, WorkforceState};

use crate::config::TerminationConfig;

/// What a termination changed.
#[derive(Debug, Clone, PartialEq)]
pub struct TerminationOutcome {
    /// Removed employee.
    pub employee_id: EmployeeId,
    /// Structure they worked in.
    pub structure_id: StructureId,
    /// Number of tasks reverted to `queued`.
    pub reverted_tasks: usize,
    /// Ripple applied to co-workers.
    pub morale_ripple: f64,
    /// Co-workers affected.
    pub affected_coworkers: usize,
}

/// Remove `employee_id` from the roster. Returns `None` if they are unknown.
pub fn terminate_employee(
    workforce: &mut WorkforceState,
    employee_id: &EmployeeId,
    ripple_override: Option<f64>,
    config: &TerminationConfig,
) -> Option<TerminationOutcome> {
    let position = workforce.employees.iter().position(|e| &e.id == employee_id)?;
    let removed = workforce.employees.remove(position);

    let mut reverted_tasks: usize = 0;
    for task in &mut workforce.task_queue {
        if task.assigned_employee_id.as_ref() == Some(employee_id) && !task.status.is_terminal() {
            task.status = TaskStatus::Queued;
            task.assigned_employee_id = None;
            reverted_tasks = reverted_tasks.saturating_add(1);
        }
    }

    let bound = config.max_ripple.abs();
    let morale_ripple = ripple_override
        .unwrap_or(config.morale_ripple)
        .clamp(-bound, bound);
    let mut affected_coworkers: usize = 0;
    for coworker in workforce
        .employees
        .iter_mut()
        .filter(|e| e.assigned_structure_id == removed.assigned_structure_id)
    {
        coworker.morale01 = (coworker.morale01 + morale_ripple).clamp(0.0, 1.0);
        affected_coworkers = affected_coworkers.saturating_add(1);
    }

    debug!(
        employee = %removed.id,
        structure = %removed.assigned_structure_id,
        reverted_tasks,
        morale_ripple,
        "employee terminated"
    );

    Some(TerminationOutcome {
        employee_id: removed.id,
        structure_id: removed.assigned_structure_id,
        reverted_tasks,
        morale_ripple,
        affected_coworkers,
    })
}

#[cfg(test)]
mod tests {
    use verdant_types::{TaskContext, TaskId, WorkforceTaskInstance};

    use super::*;
    use crate::test_support::employee;

    fn task(id: &str, status: TaskStatus, assignee: Option<&str>) -> WorkforceTaskInstance {
        WorkforceTaskInstance {
            id: TaskId::new(id),
            task_code: "water".to_owned(),
            status,
            created_at_tick: 0,
            due_tick: None,
            assigned_employee_id: assignee.map(EmployeeId::new),
            completed_at_tick: None,
            context: TaskContext::Unscoped,
        }
    }

    #[test]
    fn reverts_open_tasks_and_ripples_coworkers() {
        let mut workforce = WorkforceState {
            employees: vec![
                employee("e1", "s-1"),
                employee("e2", "s-1"),
                employee("e3", "s-2"),
            ],
            task_queue: vec![
                task("t1", TaskStatus::InProgress, Some("e1")),
                task("t2", TaskStatus::Completed, Some("e1")),
                task("t3", TaskStatus::InProgress, Some("e2")),
            ],
            ..WorkforceState::default()
        };
        let outcome = terminate_employee(
            &mut workforce,
            &EmployeeId::new("e1"),
            None,
            &TerminationConfig::default(),
        );
        let outcome = outcome.unwrap_or_else(|| panic!("employee should exist"));
        assert_eq!(outcome.reverted_tasks, 1);
        assert_eq!(outcome.affected_coworkers, 1);
        assert_eq!(workforce.employees.len(), 2);

        let statuses: Vec<(TaskStatus, Option<&str>)> = workforce
            .task_queue
            .iter()
            .map(|t| (t.status, t.assigned_employee_id.as_ref().map(EmployeeId::as_str)))
            .collect();
        assert_eq!(
            statuses,
            vec![
                (TaskStatus::Queued, None),
                (TaskStatus::Completed, Some("e1")),
                (TaskStatus::InProgress, Some("e2")),
            ]
        );
        let morale = |id: &str| {
            workforce
                .employee(&EmployeeId::new(id))
                .map_or(f64::NAN, |e| e.morale01)
        };
        assert!((morale("e2") - 0.68).abs() < 1e-9);
        assert!((morale("e3") - 0.7).abs() < 1e-9);
    }

    #[test]
    fn lone_employee_reports_zero_counts() {
        let mut workforce = WorkforceState {
            employees: vec![employee("e1", "s-1"), employee("e2", "s-2")],
            task_queue: vec![task("t1", TaskStatus::Completed, Some("e1"))],
            ..WorkforceState::default()
        };
        let outcome = terminate_employee(
            &mut workforce,
            &EmployeeId::new("e1"),
            None,
            &TerminationConfig::default(),
        );
        let counts = outcome.map(|o| (o.reverted_tasks, o.affected_coworkers));
        assert_eq!(counts, Some((0, 0)));
        assert_eq!(
            workforce.task_queue.first().map(|t| t.status),
            Some(TaskStatus::Completed)
        );
    }

    #[test]
    fn ripple_override_is_bounded() {
        let mut workforce = WorkforceState {
            employees: vec![employee("e1", "s-1"), employee("e2", "s-1")],
            ..WorkforceState::default()
        };
        let outcome = terminate_employee(
            &mut workforce,
            &EmployeeId::new("e1"),
            Some(-0.9),
            &TerminationConfig::default(),
        );
        let ripple = outcome.map_or(0.0, |o| o.morale_ripple);
        assert!((ripple + 0.2).abs() < 1e-12);
    }

    #[test]
    fn unknown_employee_is_a_no_op() {
        let mut workforce = WorkforceState::default();
        assert!(
            terminate_employee(
                &mut workforce,
                &EmployeeId::new("ghost"),
                None,
                &TerminationConfig::default()
            )
            .is_none()
        );
    }
}
