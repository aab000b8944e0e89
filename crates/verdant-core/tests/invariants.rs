//! Properties that must hold at every tick of a run.

#![allow(clippy::unwrap_used)]

mod common;

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;
use verdant_ledger::{round_currency, verify_finalized, verify_identity};
use verdant_types::{TaskId, TaskStatus};

use common::run_demo;

const TOLERANCE: f64 = 1e-6;

#[test]
fn capacity_is_never_exceeded() {
    let (_, ticks) = run_demo("capacity", 10);
    for outcome in &ticks {
        for employee in &outcome.world.workforce.employees {
            let usage = &employee.usage;
            let schedule = &employee.schedule;
            assert!(
                usage.base_minutes <= schedule.hours_per_day * 60.0 + TOLERANCE,
                "{} exceeded base capacity at tick {}",
                employee.id,
                outcome.reading.tick
            );
            assert!(
                usage.overtime_minutes <= schedule.overtime_hours_per_day * 60.0 + TOLERANCE,
                "{} exceeded overtime capacity at tick {}",
                employee.id,
                outcome.reading.tick
            );
        }
    }
}

#[test]
fn bounded_fields_stay_in_unit_interval() {
    let (_, ticks) = run_demo("bounds", 10);
    for outcome in &ticks {
        for employee in &outcome.world.workforce.employees {
            for value in [
                employee.morale01,
                employee.fatigue01,
                employee.experience.level01,
            ] {
                assert!((0.0..=1.0).contains(&value), "{} out of range", employee.id);
            }
            assert!(employee.skills.values().all(|v| (0.0..=1.0).contains(v)));
        }
    }
}

#[test]
fn payroll_identity_holds_at_every_tick() {
    let (run, ticks) = run_demo("identity", 6);
    for outcome in &ticks {
        assert!(verify_identity(&outcome.world.workforce.payroll).is_balanced());
        let snapshot = &outcome.payroll;
        assert_eq!(
            snapshot.total_labor_cost,
            snapshot.base_cost + snapshot.overtime_cost
        );
        assert!(snapshot.total_labor_cost >= Decimal::ZERO);
    }
    for day in &run.daily {
        assert!(verify_finalized(&day.payroll).is_balanced());
        let totals = &day.payroll.totals;
        assert_eq!(totals.total_labor_cost, totals.base_cost + totals.overtime_cost);
    }
}

#[test]
fn sealed_day_equals_sum_of_its_ticks() {
    let (run, ticks) = run_demo("rollover", 3);

    let mut base: BTreeMap<u64, Decimal> = BTreeMap::new();
    let mut overtime: BTreeMap<u64, Decimal> = BTreeMap::new();
    for outcome in &ticks {
        let day = outcome.reading.day_index;
        *base.entry(day).or_default() += outcome.payroll.base_cost;
        *overtime.entry(day).or_default() += outcome.payroll.overtime_cost;
    }

    assert_eq!(run.daily.len(), 3);
    for record in &run.daily {
        let day = record.day_index;
        let expected = round_currency(base.get(&day).copied().unwrap_or_default(), 2)
            + round_currency(overtime.get(&day).copied().unwrap_or_default(), 2);
        assert_eq!(record.payroll.totals.total_labor_cost, expected, "day {day}");
    }

    let sealed_days: Vec<u64> = ticks
        .iter()
        .filter_map(|t| t.payroll.finalized.as_ref().map(|d| d.day_index))
        .collect();
    assert_eq!(sealed_days, vec![0, 1, 2]);
}

#[test]
fn task_status_never_regresses() {
    let rank = |status: TaskStatus| match status {
        TaskStatus::Queued => 0,
        TaskStatus::InProgress => 1,
        TaskStatus::Completed | TaskStatus::Cancelled => 2,
    };
    let (_, ticks) = run_demo("monotonic", 8);
    let mut last: BTreeMap<TaskId, TaskStatus> = BTreeMap::new();
    for outcome in &ticks {
        for task in &outcome.world.workforce.task_queue {
            if let Some(previous) = last.get(&task.id) {
                assert!(
                    rank(task.status) >= rank(*previous),
                    "{} went from {previous:?} to {:?}",
                    task.id,
                    task.status
                );
                if previous.is_terminal() {
                    assert_eq!(task.status, *previous);
                }
            }
            last.insert(task.id.clone(), task.status);
        }
    }
}

#[test]
fn no_task_is_assigned_twice() {
    let (_, ticks) = run_demo("unique", 8);
    let mut ever = BTreeSet::new();
    for outcome in &ticks {
        let mut this_tick = BTreeSet::new();
        for assignment in &outcome.assignments {
            assert!(this_tick.insert(assignment.task_id.clone()));
            assert!(
                ever.insert(assignment.task_id.clone()),
                "{} dispatched again",
                assignment.task_id
            );
        }
    }
    assert!(!ever.is_empty());
}

#[test]
fn context_holds_nothing_between_ticks() {
    use verdant_core::scenario::demo_world;
    use verdant_core::{RunContext, TickOptions};

    let sim = common::simulation();
    let mut ctx = RunContext::new();
    let mut world = demo_world("drain");
    for _ in 0..30 {
        world = sim
            .run_tick(&world, &mut ctx, &mut TickOptions::default())
            .unwrap()
            .world;
        assert!(ctx.is_drained());
    }
}
