//! Per-tick scratch state.
//!
//! [`RunContext`] is passed by mutable reference through every stage of a
//! tick. Intents are the only field that outlives a tick boundary: callers
//! append them between ticks and the workforce stage drains them. Every
//! other field is reset when a tick begins and drained by the stage that
//! owns it before the tick returns.

use verdant_types::{TelemetryEvent, WorkforceIntent};
use verdant_workforce::{PayrollAccrualSnapshot, TaskAssignment};

use crate::clock::ClockReading;

/// Typed per-tick context.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunContext {
    intents: Vec<WorkforceIntent>,
    reading: Option<ClockReading>,
    assignments: Vec<TaskAssignment>,
    payroll: Option<PayrollAccrualSnapshot>,
    pending_telemetry: Vec<TelemetryEvent>,
    committed_telemetry: Vec<TelemetryEvent>,
}

impl RunContext {
    /// Empty context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an intent for the next workforce stage.
    pub fn push_intent(&mut self, intent: WorkforceIntent) {
        self.intents.push(intent);
    }

    /// Queue several intents, keeping their order.
    pub fn extend_intents(&mut self, intents: impl IntoIterator<Item = WorkforceIntent>) {
        self.intents.extend(intents);
    }

    /// Intents waiting for the workforce stage.
    pub fn pending_intents(&self) -> &[WorkforceIntent] {
        &self.intents
    }

    /// Buffer a telemetry event; it is stamped by the commit stage.
    pub fn emit(&mut self, event: TelemetryEvent) {
        self.pending_telemetry.push(event);
    }

    /// Clock reading of the running tick.
    pub const fn reading(&self) -> Option<&ClockReading> {
        self.reading.as_ref()
    }

    /// Assignments committed by the workforce stage of the running tick.
    pub fn assignments(&self) -> &[TaskAssignment] {
        &self.assignments
    }

    /// Payroll accrued by the workforce stage of the running tick.
    pub const fn payroll(&self) -> Option<&PayrollAccrualSnapshot> {
        self.payroll.as_ref()
    }

    /// Whether no per-tick state is left over.
    pub fn is_drained(&self) -> bool {
        self.reading.is_none()
            && self.assignments.is_empty()
            && self.payroll.is_none()
            && self.pending_telemetry.is_empty()
            && self.committed_telemetry.is_empty()
    }

    // -----------------------------------------------------------------------
    // Orchestrator and stage access
    // -----------------------------------------------------------------------

    pub(crate) fn begin_tick(&mut self, reading: ClockReading) {
        self.reading = Some(reading);
        self.assignments.clear();
        self.payroll = None;
        self.pending_telemetry.clear();
        self.committed_telemetry.clear();
    }

    pub(crate) fn take_intents(&mut self) -> Vec<WorkforceIntent> {
        std::mem::take(&mut self.intents)
    }

    pub(crate) fn record_workforce(
        &mut self,
        assignments: Vec<TaskAssignment>,
        payroll: PayrollAccrualSnapshot,
    ) {
        self.assignments = assignments;
        self.payroll = Some(payroll);
    }

    /// Stamp every buffered event with `tick` and its position in the tick.
    pub(crate) fn commit_telemetry(&mut self, tick: u64) {
        let offset = self.committed_telemetry.len();
        for (position, mut event) in self.pending_telemetry.drain(..).enumerate() {
            event.tick = tick;
            event.sequence = u32::try_from(offset.saturating_add(position)).unwrap_or(u32::MAX);
            self.committed_telemetry.push(event);
        }
    }

    /// Drain everything the tick produced.
    pub(crate) fn finish_tick(&mut self) -> TickArtifacts {
        self.reading = None;
        TickArtifacts {
            assignments: std::mem::take(&mut self.assignments),
            payroll: self.payroll.take().unwrap_or_default(),
            telemetry: std::mem::take(&mut self.committed_telemetry),
        }
    }
}

/// Per-tick output drained from the context.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TickArtifacts {
    pub(crate) assignments: Vec<TaskAssignment>,
    pub(crate) payroll: PayrollAccrualSnapshot,
    pub(crate) telemetry: Vec<TelemetryEvent>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use verdant_types::{CandidateId, StructureId};

    use super::*;

    fn reading(tick: u64) -> ClockReading {
        ClockReading {
            tick,
            sim_hours: 1.0,
            day_index: 0,
        }
    }

    #[test]
    fn intents_survive_begin_tick() {
        let mut ctx = RunContext::new();
        ctx.push_intent(WorkforceIntent::Hire {
            structure_id: StructureId::new("s-1"),
            candidate_id: CandidateId::new("c"),
        });
        ctx.begin_tick(reading(1));
        assert_eq!(ctx.pending_intents().len(), 1);
        assert_eq!(ctx.take_intents().len(), 1);
        assert!(ctx.pending_intents().is_empty());
    }

    #[test]
    fn commit_assigns_sequence_in_emission_order() {
        let mut ctx = RunContext::new();
        ctx.begin_tick(reading(7));
        ctx.emit(TelemetryEvent::new("a", 0, json!({})));
        ctx.emit(TelemetryEvent::new("b", 0, json!({})));
        ctx.commit_telemetry(7);

        let artifacts = ctx.finish_tick();
        let stamped: Vec<_> = artifacts
            .telemetry
            .iter()
            .map(|e| (e.topic.as_str(), e.tick, e.sequence))
            .collect();
        assert_eq!(stamped, vec![("a", 7, 0), ("b", 7, 1)]);
        assert!(ctx.is_drained());
    }

    #[test]
    fn begin_tick_discards_stale_scratch() {
        let mut ctx = RunContext::new();
        ctx.begin_tick(reading(1));
        ctx.emit(TelemetryEvent::new("stale", 0, json!(null)));
        ctx.record_workforce(Vec::new(), PayrollAccrualSnapshot::default());
        ctx.begin_tick(reading(2));
        assert!(ctx.payroll().is_none());
        ctx.commit_telemetry(2);
        assert!(ctx.finish_tick().telemetry.is_empty());
    }
}
