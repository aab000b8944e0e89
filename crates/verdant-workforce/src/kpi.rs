//! Per-tick KPI snapshots and bounded history.

use verdant_types::{WorkforceKpiSnapshot, WorkforceState};

use crate::dispatch::{DispatchOutcome, is_working_day};

/// Snapshot the workforce after dispatch.
pub fn snapshot(
    workforce: &WorkforceState,
    tick: u64,
    day_index: u64,
    dispatch: &DispatchOutcome,
) -> WorkforceKpiSnapshot {
    let headcount = u32::try_from(workforce.employees.len()).unwrap_or(u32::MAX);
    let queue_depth = u32::try_from(
        workforce
            .task_queue
            .iter()
            .filter(|t| !t.status.is_terminal())
            .count(),
    )
    .unwrap_or(u32::MAX);

    let mut used = 0.0;
    let mut contracted = 0.0;
    let mut morale = 0.0;
    let mut fatigue = 0.0;
    for employee in &workforce.employees {
        morale += employee.morale01;
        fatigue += employee.fatigue01;
        if is_working_day(&employee.schedule, day_index) {
            used += employee.usage.base_minutes + employee.usage.overtime_minutes;
            contracted += (employee.schedule.hours_per_day
                + employee.schedule.overtime_hours_per_day)
                * 60.0;
        }
    }
    let mean = |sum: f64| {
        if headcount == 0 {
            0.0
        } else {
            sum / f64::from(headcount)
        }
    };

    WorkforceKpiSnapshot {
        tick,
        day_index,
        headcount,
        tasks_completed: u32::try_from(dispatch.assignments.len()).unwrap_or(u32::MAX),
        queue_depth,
        labor_minutes: dispatch.base_minutes(),
        overtime_minutes: dispatch.overtime_minutes(),
        utilization01: if contracted > 0.0 {
            (used / contracted).clamp(0.0, 1.0)
        } else {
            0.0
        },
        average_morale01: mean(morale),
        average_fatigue01: mean(fatigue),
    }
}

/// Append `item`, dropping the oldest entries beyond `limit`.
pub fn push_bounded<T>(history: &mut Vec<T>, item: T, limit: usize) {
    history.push(item);
    if history.len() > limit {
        let excess = history.len().saturating_sub(limit);
        history.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::employee;

    #[test]
    fn empty_roster_has_zeroed_averages() {
        let kpi = snapshot(&WorkforceState::default(), 3, 0, &DispatchOutcome::default());
        assert_eq!(kpi.headcount, 0);
        assert!(kpi.average_morale01.abs() < f64::EPSILON);
        assert!(kpi.utilization01.abs() < f64::EPSILON);
    }

    #[test]
    fn utilization_counts_todays_usage() {
        let mut e = employee("e1", "s-1");
        e.usage.base_minutes = 240.0;
        let workforce = WorkforceState {
            employees: vec![e],
            ..WorkforceState::default()
        };
        let kpi = snapshot(&workforce, 10, 0, &DispatchOutcome::default());
        assert!((kpi.utilization01 - 0.5).abs() < 1e-12);
        assert!((kpi.average_morale01 - 0.7).abs() < 1e-12);
    }

    #[test]
    fn history_is_bounded_oldest_first() {
        let mut history = Vec::new();
        for i in 0..10 {
            push_bounded(&mut history, i, 3);
        }
        assert_eq!(history, vec![7, 8, 9]);
    }
}
