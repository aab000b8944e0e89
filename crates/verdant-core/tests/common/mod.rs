//! Shared harness for the integration suites.

#![allow(dead_code, clippy::unwrap_used)]

use verdant_core::scenario::{demo_intents, demo_world};
use verdant_core::{
    RunPlan, Simulation, SimulationConfig, SimulationRun, TickCallback, TickOptions,
    TickOutcome, run_simulation,
};

/// Keeps every tick outcome.
#[derive(Default)]
pub struct Recorder {
    pub outcomes: Vec<TickOutcome>,
}

impl TickCallback for Recorder {
    fn on_tick(&mut self, outcome: &TickOutcome) {
        self.outcomes.push(outcome.clone());
    }
}

pub fn simulation() -> Simulation {
    Simulation::new(SimulationConfig::default()).unwrap()
}

pub fn demo_plan(days: u64) -> RunPlan {
    RunPlan {
        ticks: days * 24,
        intents: demo_intents(days, 24),
    }
}

/// Run the demo scenario and keep every tick.
pub fn run_demo(seed: &str, days: u64) -> (SimulationRun, Vec<TickOutcome>) {
    run_plan(seed, &demo_plan(days))
}

pub fn run_plan(seed: &str, plan: &RunPlan) -> (SimulationRun, Vec<TickOutcome>) {
    let mut recorder = Recorder::default();
    let run = run_simulation(
        &simulation(),
        &demo_world(seed),
        plan,
        &mut TickOptions::default(),
        &mut recorder,
    )
    .unwrap();
    (run, recorder.outcomes)
}
