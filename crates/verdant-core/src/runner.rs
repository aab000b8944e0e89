//! Multi-tick runner.
//!
//! [`run_simulation`] drives [`Simulation::run_tick`] for a fixed number of
//! ticks, feeding the intents scheduled for each tick, and condenses the
//! run into per-day [`DailyRecord`]s and a final [`SummaryRecord`]. The
//! records hold only deterministic values, so they can be hashed by the
//! golden-master harness.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use verdant_ledger::PayrollLedger;
use verdant_types::telemetry::topics;
use verdant_types::{FinalizedPayrollDay, WorkforceIntent, WorkforceKpiSnapshot, World};

use crate::context::RunContext;
use crate::instrumentation::TickTrace;
use crate::tick::{Simulation, TickError, TickOptions, TickOutcome};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick {tick} failed: {source}")]
    Tick {
        /// Tick that failed.
        tick: u64,
        /// The underlying tick error.
        source: TickError,
    },
}

/// What to run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunPlan {
    /// Number of ticks.
    pub ticks: u64,
    /// Intents submitted before the keyed tick, in order.
    pub intents: BTreeMap<u64, Vec<WorkforceIntent>>,
}

/// Callback invoked after each tick completes.
pub trait TickCallback {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, outcome: &TickOutcome);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _outcome: &TickOutcome) {}
}

/// One sealed day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRecord {
    /// Day index.
    pub day_index: u64,
    /// Ticks of this day seen by the run.
    pub ticks: u32,
    /// Sealed payroll.
    pub payroll: FinalizedPayrollDay,
    /// Tasks completed during the day.
    pub tasks_completed: u32,
    /// Regular minutes dispatched.
    pub labor_minutes: f64,
    /// Overtime minutes dispatched.
    pub overtime_minutes: f64,
    /// Warnings raised.
    pub warnings: u32,
    /// Headcount at the last tick of the day.
    pub headcount: u32,
    /// Queue depth at the last tick of the day.
    pub queue_depth: u32,
    /// Mean morale at the last tick of the day.
    pub average_morale01: f64,
    /// Mean fatigue at the last tick of the day.
    pub average_fatigue01: f64,
}

/// Whole-run summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    /// Ticks executed.
    pub ticks: u64,
    /// Tick counter of the final world.
    pub final_tick: u64,
    /// Days sealed during the run.
    pub days_finalized: u32,
    /// Sum of the sealed days' labour cost.
    pub finalized_labor_cost: Decimal,
    /// Rounded view of the day still open at the end.
    pub open_day: FinalizedPayrollDay,
    /// Tasks completed.
    pub tasks_completed: u64,
    /// Warnings raised.
    pub warnings: u64,
    /// Telemetry events committed.
    pub telemetry_events: u64,
    /// Final headcount.
    pub headcount: u32,
    /// Final queue depth.
    pub queue_depth: u32,
    /// Final cash on hand.
    pub cash_on_hand: Decimal,
    /// Labour cost accrued over the whole life of the world.
    pub cumulative_labor_cost: Decimal,
}

/// Result of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationRun {
    /// Final world.
    pub world: World,
    /// Sealed days in order.
    pub daily: Vec<DailyRecord>,
    /// Summary.
    pub summary: SummaryRecord,
    /// Per-tick traces, when tracing was requested.
    pub traces: Vec<TickTrace>,
}

#[derive(Debug, Default)]
struct DayAccumulator {
    ticks: u32,
    tasks_completed: u32,
    labor_minutes: f64,
    overtime_minutes: f64,
    warnings: u32,
    last_kpi: Option<WorkforceKpiSnapshot>,
}

impl DayAccumulator {
    fn record(&mut self, kpi: Option<&WorkforceKpiSnapshot>, warnings: u32) {
        self.ticks = self.ticks.saturating_add(1);
        self.warnings = self.warnings.saturating_add(warnings);
        if let Some(kpi) = kpi {
            self.tasks_completed = self.tasks_completed.saturating_add(kpi.tasks_completed);
            self.labor_minutes += kpi.labor_minutes;
            self.overtime_minutes += kpi.overtime_minutes;
            self.last_kpi = Some(kpi.clone());
        }
    }

    fn seal(self, payroll: FinalizedPayrollDay) -> DailyRecord {
        let last = self.last_kpi.unwrap_or_default();
        DailyRecord {
            day_index: payroll.day_index,
            ticks: self.ticks,
            payroll,
            tasks_completed: self.tasks_completed,
            labor_minutes: round6(self.labor_minutes),
            overtime_minutes: round6(self.overtime_minutes),
            warnings: self.warnings,
            headcount: last.headcount,
            queue_depth: last.queue_depth,
            average_morale01: round6(last.average_morale01),
            average_fatigue01: round6(last.average_fatigue01),
        }
    }
}

/// Six decimal places; keeps records stable against last-bit float noise.
fn round6(value: f64) -> f64 {
    (value * 1e6).round() / 1e6
}

/// Run `plan` from `world`.
///
/// # Errors
///
/// Returns [`RunnerError::Tick`] naming the first tick that failed.
pub fn run_simulation(
    sim: &Simulation,
    world: &World,
    plan: &RunPlan,
    options: &mut TickOptions<'_>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationRun, RunnerError> {
    info!(world = %world.id, seed = %world.seed, ticks = plan.ticks, "Simulation starting");

    let mut ctx = RunContext::new();
    let mut current = world.clone();
    let mut daily = Vec::new();
    let mut traces = Vec::new();
    let mut day = DayAccumulator::default();
    let mut tasks_completed: u64 = 0;
    let mut warnings: u64 = 0;
    let mut telemetry_events: u64 = 0;

    for _ in 0..plan.ticks {
        let next_tick = current.tick.saturating_add(1);
        if let Some(intents) = plan.intents.get(&next_tick) {
            ctx.extend_intents(intents.iter().cloned());
        }

        let outcome = sim
            .run_tick(&current, &mut ctx, options)
            .map_err(|source| RunnerError::Tick {
                tick: next_tick,
                source,
            })?;

        if let Some(sealed) = outcome.payroll.finalized.clone() {
            let record = std::mem::take(&mut day).seal(sealed);
            info!(
                day = record.day_index,
                labor_cost = %record.payroll.totals.total_labor_cost,
                tasks = record.tasks_completed,
                "Day sealed"
            );
            daily.push(record);
        }

        let kpi = outcome
            .world
            .workforce
            .kpis
            .last()
            .filter(|k| k.tick == outcome.reading.tick);
        let tick_warnings = outcome
            .telemetry
            .iter()
            .filter(|e| e.topic == topics::WORKFORCE_WARNING)
            .count();
        let tick_warnings = u32::try_from(tick_warnings).unwrap_or(u32::MAX);
        day.record(kpi, tick_warnings);

        tasks_completed =
            tasks_completed.saturating_add(kpi.map_or(0, |k| u64::from(k.tasks_completed)));
        warnings = warnings.saturating_add(u64::from(tick_warnings));
        telemetry_events = telemetry_events
            .saturating_add(u64::try_from(outcome.telemetry.len()).unwrap_or(u64::MAX));

        callback.on_tick(&outcome);
        if let Some(trace) = &outcome.trace {
            traces.push(trace.clone());
        }
        current = outcome.world;
    }

    if plan.ticks == 0 {
        warn!("Simulation ended with no ticks executed");
    }

    let workforce = &current.workforce;
    let open_day = PayrollLedger::from_state(workforce.payroll.clone())
        .with_currency_scale(sim.config().workforce.payroll.currency_scale)
        .finalize();
    let last_kpi = workforce.kpis.last();
    let summary = SummaryRecord {
        ticks: plan.ticks,
        final_tick: current.tick,
        days_finalized: u32::try_from(daily.len()).unwrap_or(u32::MAX),
        finalized_labor_cost: daily
            .iter()
            .map(|d| d.payroll.totals.total_labor_cost)
            .fold(Decimal::ZERO, Decimal::saturating_add),
        open_day,
        tasks_completed,
        warnings,
        telemetry_events,
        headcount: u32::try_from(workforce.employees.len()).unwrap_or(u32::MAX),
        queue_depth: last_kpi.map_or(0, |k| k.queue_depth),
        cash_on_hand: current.finance.cash_on_hand,
        cumulative_labor_cost: current.finance.cumulative_labor_cost,
    };

    info!(
        final_tick = summary.final_tick,
        days = summary.days_finalized,
        tasks = summary.tasks_completed,
        cash = %summary.cash_on_hand,
        "Simulation ended"
    );

    Ok(SimulationRun {
        world: current,
        daily,
        summary,
        traces,
    })
}
