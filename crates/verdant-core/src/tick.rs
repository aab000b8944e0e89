//! Tick orchestration: the fixed stage pipeline that drives the simulation.
//!
//! Each tick runs these steps:
//!
//! 1. **Clock** -- advance the tick counter and simulation time.
//! 2. **Stages** -- run every [`PipelineStage`] in [`PipelineStage::ORDER`]
//!    over the world snapshot. Each stage takes the snapshot by value and
//!    returns the next one; unchanged substructures are shared, not copied.
//! 3. **Drain** -- hand committed telemetry to the sink and move every
//!    per-tick artifact out of the [`RunContext`] into the [`TickOutcome`].
//!
//! After every stage the optional [`StageObserver`] sees both snapshots.
//! When tracing is requested each stage is timed and bracketed by heap
//! samples. Apart from those caller-supplied hooks [`Simulation::run_tick`]
//! is a pure function of the world, the intents in the context and the
//! configuration.

use std::time::Instant;

use tracing::{debug, debug_span};
use verdant_ledger::PayrollAnomaly;
use verdant_types::{TelemetryEvent, World};
use verdant_workforce::{PayrollAccrualSnapshot, TaskAssignment, TraitError, TraitRegistry};

use crate::clock::{ClockError, ClockReading, TickClock};
use crate::collaborators::{Collaborators, NoopCollaborators};
use crate::config::SimulationConfig;
use crate::context::RunContext;
use crate::instrumentation::{HeapSampler, NullHeapSampler, StageObserver, StageTrace, TickTrace};
use crate::pipeline::PipelineStage;
use crate::stages;
use crate::telemetry::TelemetrySink;

static NOOP_COLLABORATORS: NoopCollaborators = NoopCollaborators;
static NULL_HEAP_SAMPLER: NullHeapSampler = NullHeapSampler;

/// Errors that can occur while building a [`Simulation`].
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    /// The time model is invalid.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The trait catalog is inconsistent.
    #[error("trait catalog error: {source}")]
    Traits {
        /// The underlying trait error.
        #[from]
        source: TraitError,
    },
}

/// Errors that can occur during tick execution.
///
/// "Nothing to do" conditions never surface here; they become warning
/// telemetry. A `TickError` means an invariant broke.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: ClockError,
    },

    /// The payroll identity does not hold after the workforce stage.
    #[error("payroll identity violated: {anomaly}")]
    PayrollIdentity {
        /// The violation.
        anomaly: PayrollAnomaly,
    },

    /// A finance balance left the decimal range.
    #[error("finance balance overflow")]
    FinanceOverflow,

    /// A telemetry payload could not be serialized.
    #[error("telemetry serialization failed: {source}")]
    Telemetry {
        /// The underlying serialization error.
        #[from]
        source: serde_json::Error,
    },
}

/// Hooks and collaborators for one tick.
pub struct TickOptions<'a> {
    /// Stage implementations outside the core.
    pub collaborators: &'a dyn Collaborators,
    /// Called after every stage.
    pub observer: Option<&'a mut dyn StageObserver>,
    /// Receives committed telemetry.
    pub sink: Option<&'a mut dyn TelemetrySink>,
    /// Heap sampler used when tracing.
    pub heap_sampler: &'a dyn HeapSampler,
    /// Time each stage and sample the heap.
    pub trace: bool,
}

impl Default for TickOptions<'_> {
    fn default() -> Self {
        Self {
            collaborators: &NOOP_COLLABORATORS,
            observer: None,
            sink: None,
            heap_sampler: &NULL_HEAP_SAMPLER,
            trace: false,
        }
    }
}

impl core::fmt::Debug for TickOptions<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TickOptions")
            .field("observer", &self.observer.is_some())
            .field("sink", &self.sink.is_some())
            .field("trace", &self.trace)
            .finish_non_exhaustive()
    }
}

/// Result of a single tick.
#[derive(Debug, Clone, PartialEq)]
pub struct TickOutcome {
    /// The next world snapshot.
    pub world: World,
    /// Clock reading of the tick.
    pub reading: ClockReading,
    /// Assignments committed by the workforce stage.
    pub assignments: Vec<TaskAssignment>,
    /// Payroll accrued this tick, including any day sealed.
    pub payroll: PayrollAccrualSnapshot,
    /// Committed telemetry in sequence order.
    pub telemetry: Vec<TelemetryEvent>,
    /// Stage timings, when tracing was requested.
    pub trace: Option<TickTrace>,
}

/// Static inputs shared by every tick of a run.
#[derive(Debug, Clone)]
pub struct Simulation {
    config: SimulationConfig,
    clock: TickClock,
    registry: TraitRegistry,
}

impl Simulation {
    /// Build the clock and the trait registry for `config`.
    ///
    /// # Errors
    ///
    /// Returns [`SetupError`] if the time model or the trait catalog is
    /// invalid.
    pub fn new(config: SimulationConfig) -> Result<Self, SetupError> {
        let clock = TickClock::new(&config.world)?;
        let registry = TraitRegistry::standard()?;
        Ok(Self {
            config,
            clock,
            registry,
        })
    }

    /// Configuration.
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Clock.
    pub const fn clock(&self) -> &TickClock {
        &self.clock
    }

    /// Trait registry.
    pub const fn registry(&self) -> &TraitRegistry {
        &self.registry
    }

    /// Run one tick over `world`.
    ///
    /// Intents queued in `ctx` are consumed. On return the context holds no
    /// per-tick state; only intents queued by collaborators during the tick
    /// remain, for the next one.
    ///
    /// # Errors
    ///
    /// Returns [`TickError`] if the clock cannot advance or an invariant
    /// breaks. The input world is never modified.
    pub fn run_tick(
        &self,
        world: &World,
        ctx: &mut RunContext,
        options: &mut TickOptions<'_>,
    ) -> Result<TickOutcome, TickError> {
        let reading = self.clock.advance(world)?;
        ctx.begin_tick(reading);

        let mut current = World {
            tick: reading.tick,
            sim_time_hours: reading.sim_hours,
            ..world.clone()
        };
        let mut stage_traces = Vec::new();

        for stage in PipelineStage::ORDER {
            let span = debug_span!("stage", tick = reading.tick, stage = stage.as_str());
            let _guard = span.enter();

            let before = options.observer.is_some().then(|| current.clone());
            let heap_before = options.trace.then(|| options.heap_sampler.sample()).flatten();
            let started = options.trace.then(Instant::now);

            current = self.run_stage(stage, &reading, current, ctx, options.collaborators)?;

            if let Some(started) = started {
                stage_traces.push(StageTrace {
                    stage,
                    duration: started.elapsed(),
                    heap_before,
                    heap_after: options.heap_sampler.sample(),
                });
            }
            if let (Some(observer), Some(before)) = (options.observer.as_deref_mut(), before) {
                observer.after_stage(reading.tick, stage, &before, &current);
            }
        }

        let artifacts = ctx.finish_tick();
        if let Some(sink) = options.sink.as_deref_mut() {
            for event in &artifacts.telemetry {
                sink.publish(event);
            }
        }

        debug!(
            tick = reading.tick,
            day = reading.day_index,
            assignments = artifacts.assignments.len(),
            telemetry = artifacts.telemetry.len(),
            "tick complete"
        );

        Ok(TickOutcome {
            world: current,
            reading,
            assignments: artifacts.assignments,
            payroll: artifacts.payroll,
            telemetry: artifacts.telemetry,
            trace: options.trace.then(|| TickTrace {
                tick: reading.tick,
                stages: stage_traces,
            }),
        })
    }

    fn run_stage(
        &self,
        stage: PipelineStage,
        reading: &ClockReading,
        world: World,
        ctx: &mut RunContext,
        collaborators: &dyn Collaborators,
    ) -> Result<World, TickError> {
        Ok(match stage {
            PipelineStage::DeviceEffects => collaborators.apply_device_effects(world, ctx),
            PipelineStage::Environment => collaborators.update_environment(world, ctx),
            PipelineStage::Irrigation => collaborators.apply_irrigation(world, ctx),
            PipelineStage::Workforce => stages::workforce(self, reading, world, ctx)?,
            PipelineStage::Physiology => collaborators.advance_physiology(world, ctx),
            PipelineStage::Harvest => collaborators.harvest(world, ctx),
            PipelineStage::EconomyAccrual => stages::economy_accrual(reading, world, ctx)?,
            PipelineStage::CommitTelemetry => stages::commit_telemetry(reading, world, ctx),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;

    use verdant_types::telemetry::topics;

    use super::*;
    use crate::instrumentation::ChangeRecorder;
    use crate::scenario::{demo_intents, demo_world};
    use crate::telemetry::MemorySink;

    fn simulation() -> Simulation {
        Simulation::new(SimulationConfig::default()).unwrap()
    }

    #[test]
    fn tick_advances_clock_and_leaves_input_untouched() {
        let sim = simulation();
        let world = demo_world("seed");
        let snapshot = world.clone();
        let mut ctx = RunContext::new();
        let outcome = sim
            .run_tick(&world, &mut ctx, &mut TickOptions::default())
            .unwrap();
        assert_eq!(outcome.world.tick, 1);
        assert_eq!(world, snapshot);
        assert!(ctx.is_drained());
    }

    #[test]
    fn unchanged_substructures_are_shared() {
        let sim = simulation();
        let world = demo_world("seed");
        let mut ctx = RunContext::new();
        let outcome = sim
            .run_tick(&world, &mut ctx, &mut TickOptions::default())
            .unwrap();
        assert!(Arc::ptr_eq(&outcome.world.company, &world.company));
        assert!(Arc::ptr_eq(&outcome.world.finance, &world.finance));
    }

    #[test]
    fn observer_sees_every_stage_in_order() {
        let sim = simulation();
        let mut recorder = ChangeRecorder::default();
        let mut options = TickOptions {
            observer: Some(&mut recorder),
            ..TickOptions::default()
        };
        sim.run_tick(&demo_world("seed"), &mut RunContext::new(), &mut options)
            .unwrap();
        let stages: Vec<_> = recorder.changes.iter().map(|c| c.stage).collect();
        assert_eq!(stages, PipelineStage::ORDER.to_vec());
        let workforce_changed = recorder
            .changes
            .iter()
            .filter(|c| c.workforce)
            .map(|c| c.stage)
            .collect::<Vec<_>>();
        assert_eq!(workforce_changed, vec![PipelineStage::Workforce]);
    }

    #[test]
    fn trace_has_one_entry_per_stage() {
        let sim = simulation();
        let mut options = TickOptions {
            trace: true,
            ..TickOptions::default()
        };
        let outcome = sim
            .run_tick(&demo_world("seed"), &mut RunContext::new(), &mut options)
            .unwrap();
        let trace = outcome.trace.unwrap();
        assert_eq!(trace.stages.len(), 8);
        assert_eq!(trace.heap_delta(), None);
    }

    #[test]
    fn telemetry_is_sequenced_and_published() {
        let sim = simulation();
        let mut world = demo_world("seed");
        world.tick = 7;
        world.sim_time_hours = 7.0;
        let mut ctx = RunContext::new();
        for intent in demo_intents(1, 24).remove(&8).unwrap_or_default() {
            ctx.push_intent(intent);
        }

        let mut sink = MemorySink::default();
        let mut options = TickOptions {
            sink: Some(&mut sink),
            ..TickOptions::default()
        };
        let telemetry = sim.run_tick(&world, &mut ctx, &mut options).unwrap().telemetry;

        assert_eq!(sink.events, telemetry);
        let sequences: Vec<u32> = telemetry.iter().map(|e| e.sequence).collect();
        let expected: Vec<u32> = (0..u32::try_from(telemetry.len()).unwrap_or(0)).collect();
        assert_eq!(sequences, expected);
        assert!(telemetry.iter().all(|e| e.tick == 8));
        assert!(sink.on_topic(topics::TASK_DISPATCHED).count() > 0);
        assert_eq!(sink.on_topic(topics::WORKFORCE_KPI).count(), 1);
        assert!(ctx.pending_intents().is_empty());
    }

    #[test]
    fn labour_cost_reaches_finance() {
        let sim = simulation();
        let mut world = demo_world("seed");
        world.tick = 7;
        world.sim_time_hours = 7.0;
        let mut ctx = RunContext::new();
        ctx.extend_intents(demo_intents(1, 24).remove(&8).unwrap_or_default());
        let outcome = sim
            .run_tick(&world, &mut ctx, &mut TickOptions::default())
            .unwrap();
        assert!(outcome.payroll.total_labor_cost > rust_decimal::Decimal::ZERO);
        assert_eq!(
            outcome.world.finance.cash_on_hand,
            world.finance.cash_on_hand - outcome.payroll.total_labor_cost
        );
        assert_eq!(outcome.world.finance.last_accrual_tick, Some(8));
    }
}
