//! End-to-end behaviour of the demo scenario.

#![allow(clippy::unwrap_used)]

mod common;

use verdant_core::scenario::{DEMO_CASH, demo_world};
use verdant_core::{
    ChangeRecorder, PipelineStage, RunContext, StatmDataSampler, TickOptions, validate_world,
};
use verdant_types::telemetry::topics;
use verdant_types::{EmployeeId, TaskStatus, TelemetryEvent, WorkforceIntent};

use common::{demo_plan, run_demo, run_plan, simulation};

fn events_on<'a>(
    ticks: &'a [verdant_core::TickOutcome],
    topic: &'a str,
) -> impl Iterator<Item = &'a TelemetryEvent> {
    ticks
        .iter()
        .flat_map(|t| t.telemetry.iter())
        .filter(move |e| e.topic == topic)
}

#[test]
fn quarantined_zone_is_serviced_only_after_release() {
    let (_, ticks) = run_demo("quarantine", 3);
    let mut south_dispatches = Vec::new();
    for outcome in &ticks {
        for assignment in &outcome.assignments {
            if assignment.task_id.as_str().ends_with("z-south-1")
                || assignment.task_id.as_str().ends_with("d-lamp-s1")
            {
                south_dispatches.push((outcome.reading.tick, assignment.task_id.clone()));
            }
        }
    }
    assert!(!south_dispatches.is_empty());
    assert!(south_dispatches.iter().all(|(tick, _)| *tick >= 48));
    // Day 0 work waited in the queue and is done on release.
    assert!(
        south_dispatches
            .iter()
            .any(|(tick, id)| *tick == 48 && id.as_str() == "task:0:water_zone:z-south-1")
    );
}

#[test]
fn scan_then_hire_grows_the_roster() {
    let (_, ticks) = run_demo("hiring", 1);
    let scans: Vec<_> = events_on(&ticks, topics::MARKET_SCAN).collect();
    assert_eq!(scans.len(), 1);
    assert_eq!(scans.first().map(|e| e.tick), Some(6));
    assert_eq!(
        scans.first().map(|e| e.payload["did_scan"].clone()),
        Some(serde_json::Value::Bool(true))
    );

    let onboarded: Vec<_> = events_on(&ticks, topics::EMPLOYEE_ONBOARDED).collect();
    assert_eq!(onboarded.len(), 1);
    assert_eq!(
        onboarded.first().map(|e| e.payload["candidate_id"].clone()),
        Some(serde_json::Value::from("cand:s-north:1:00"))
    );

    let after_hire = ticks.iter().find(|t| t.reading.tick == 7).unwrap();
    assert_eq!(after_hire.world.workforce.employees.len(), 8);
    let pool = after_hire
        .world
        .workforce
        .market
        .structures
        .values()
        .next()
        .map_or(0, |s| s.pool.len());
    assert_eq!(pool, 15);
}

#[test]
fn premature_raise_and_repeated_scan_only_warn() {
    let (_, ticks) = run_demo("warnings", 3);
    let codes: Vec<_> = events_on(&ticks, topics::WORKFORCE_WARNING)
        .map(|e| (e.tick, e.payload["code"].as_str().unwrap_or("").to_owned()))
        .collect();
    assert!(codes.contains(&(33, "raise_not_eligible".to_owned())));
    assert!(codes.contains(&(57, "scan_cooldown".to_owned())));
    assert_eq!(events_on(&ticks, topics::RAISE).count(), 0);
}

#[test]
fn termination_removes_employee_and_ripples_morale() {
    let (run, ticks) = run_demo("termination", 4);
    let terminated: Vec<_> = events_on(&ticks, topics::EMPLOYEE_TERMINATED).collect();
    assert_eq!(terminated.len(), 1);
    assert_eq!(terminated.first().map(|e| e.tick), Some(89));

    let ben = EmployeeId::new("e-ben");
    assert!(run.world.workforce.employees.iter().all(|e| e.id != ben));

    let before = ticks.iter().find(|t| t.reading.tick == 88).unwrap();
    let after = ticks.iter().find(|t| t.reading.tick == 89).unwrap();
    let morale = |outcome: &verdant_core::TickOutcome, id: &str| {
        outcome
            .world
            .workforce
            .employees
            .iter()
            .find(|e| e.id.as_str() == id)
            .map(|e| e.morale01)
    };
    // A co-worker in the same structure, idle in that hour, takes the ripple.
    assert!(morale(after, "e-gus") < morale(before, "e-gus"));
    assert!(
        after
            .world
            .workforce
            .task_queue
            .iter()
            .filter(|t| t.assigned_employee_id.as_ref() == Some(&ben))
            .all(|t| t.status == TaskStatus::Completed)
    );
}

#[test]
fn weekend_days_dispatch_nothing() {
    let (run, _) = run_demo("weekend", 7);
    let worked: Vec<_> = run.daily.iter().map(|d| (d.day_index, d.tasks_completed)).collect();
    for (day, completed) in worked {
        if day % 7 >= 5 {
            assert_eq!(completed, 0, "day {day}");
        } else {
            assert!(completed > 0, "day {day}");
        }
    }
}

#[test]
fn device_service_emits_maintenance_with_trait_wear() {
    // Task intents only, so the technician on the roster is the sole one.
    let mut plan = demo_plan(1);
    for batch in plan.intents.values_mut() {
        batch.retain(|i| matches!(i, WorkforceIntent::EnqueueTask { .. }));
    }
    let (_, ticks) = run_plan("maintenance", &plan);
    let services: Vec<_> = events_on(&ticks, topics::DEVICE_MAINTENANCE).collect();
    let north = services
        .iter()
        .find(|e| e.payload["device_id"] == "d-lamp-n1")
        .unwrap();
    assert_eq!(north.payload["employee_id"], "e-cy");
    // Gearhead at 0.6 strength: wear x (1 - 0.3 * 0.6)
    let wear = north.payload["device_wear_multiplier"].as_f64().unwrap();
    assert!((wear - 0.82).abs() < 1e-9);
}

#[test]
fn labour_cost_is_charged_to_cash() {
    let (run, _) = run_demo("cash", 2);
    assert!(run.summary.cumulative_labor_cost > rust_decimal::Decimal::ZERO);
    assert_eq!(
        run.summary.cash_on_hand,
        DEMO_CASH - run.summary.cumulative_labor_cost
    );
}

#[test]
fn demo_world_passes_validation_and_traces_with_statm_sampler() {
    let sim = simulation();
    let world = demo_world("trace");
    validate_world(&world, sim.config()).unwrap();

    let sampler = StatmDataSampler::default();
    let mut recorder = ChangeRecorder::default();
    let mut options = TickOptions {
        heap_sampler: &sampler,
        observer: Some(&mut recorder),
        trace: true,
        ..TickOptions::default()
    };
    let outcome = sim.run_tick(&world, &mut RunContext::new(), &mut options).unwrap();
    let trace = outcome.trace.unwrap();
    let stages: Vec<_> = trace.stages.iter().map(|s| s.stage).collect();
    assert_eq!(stages, PipelineStage::ORDER.to_vec());
    assert_eq!(recorder.changes.len(), 8);
}
