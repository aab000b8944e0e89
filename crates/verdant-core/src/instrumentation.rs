//! Stage observation, timing and heap sampling.
//!
//! Instrumentation never changes simulation output. A [`StageObserver`] sees
//! the world before and after every stage; when tracing is requested the
//! orchestrator also times each stage and samples the heap through a
//! [`HeapSampler`], producing a [`TickTrace`].

use std::sync::Arc;
use std::time::Duration;

use verdant_types::World;

use crate::pipeline::PipelineStage;

// ---------------------------------------------------------------------------
// Observer
// ---------------------------------------------------------------------------

/// Hook invoked after every stage.
pub trait StageObserver {
    /// Called with the snapshots on either side of `stage`.
    fn after_stage(&mut self, tick: u64, stage: PipelineStage, before: &World, after: &World);
}

/// Which parts of the world a stage replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageChange {
    /// Tick the stage ran in.
    pub tick: u64,
    /// The stage.
    pub stage: PipelineStage,
    /// Company tree pointer changed.
    pub company: bool,
    /// Workforce pointer changed.
    pub workforce: bool,
    /// Finance pointer changed.
    pub finance: bool,
}

impl StageChange {
    /// Compare two snapshots by pointer identity.
    pub fn between(tick: u64, stage: PipelineStage, before: &World, after: &World) -> Self {
        Self {
            tick,
            stage,
            company: !Arc::ptr_eq(&before.company, &after.company),
            workforce: !Arc::ptr_eq(&before.workforce, &after.workforce),
            finance: !Arc::ptr_eq(&before.finance, &after.finance),
        }
    }

    /// Whether any substructure was replaced.
    pub const fn any(&self) -> bool {
        self.company || self.workforce || self.finance
    }
}

/// Observer that records a [`StageChange`] per stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeRecorder {
    /// Changes in the order stages ran.
    pub changes: Vec<StageChange>,
}

impl StageObserver for ChangeRecorder {
    fn after_stage(&mut self, tick: u64, stage: PipelineStage, before: &World, after: &World) {
        self.changes
            .push(StageChange::between(tick, stage, before, after));
    }
}

// ---------------------------------------------------------------------------
// Heap samplers
// ---------------------------------------------------------------------------

/// Source of heap-usage samples.
pub trait HeapSampler {
    /// Bytes in use, or `None` when unavailable.
    fn sample(&self) -> Option<u64>;
}

/// Sampler that never reports a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NullHeapSampler;

impl HeapSampler for NullHeapSampler {
    fn sample(&self) -> Option<u64> {
        None
    }
}

/// Reads the `data` field of `/proc/self/statm` (Linux only).
///
/// `data` counts data plus stack pages, so the figure approximates heap use
/// rather than measuring it. Page size defaults to 4096 bytes; use
/// [`StatmDataSampler::with_page_size`] on hosts with larger pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatmDataSampler {
    page_size: u64,
}

impl Default for StatmDataSampler {
    fn default() -> Self {
        Self { page_size: 4096 }
    }
}

impl StatmDataSampler {
    /// Sampler assuming pages of `page_size` bytes.
    pub const fn with_page_size(page_size: u64) -> Self {
        Self { page_size }
    }

    /// Parse a `statm` line into bytes of data plus stack.
    pub fn parse(&self, statm: &str) -> Option<u64> {
        // size resident shared text lib data dt
        let pages: u64 = statm.split_whitespace().nth(5)?.parse().ok()?;
        pages.checked_mul(self.page_size)
    }
}

impl HeapSampler for StatmDataSampler {
    fn sample(&self) -> Option<u64> {
        let statm = std::fs::read_to_string("/proc/self/statm").ok()?;
        self.parse(&statm)
    }
}

// ---------------------------------------------------------------------------
// Traces
// ---------------------------------------------------------------------------

/// Timing and heap figures for one stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageTrace {
    /// The stage.
    pub stage: PipelineStage,
    /// Wall time spent in the stage.
    pub duration: Duration,
    /// Heap sample before the stage.
    pub heap_before: Option<u64>,
    /// Heap sample after the stage.
    pub heap_after: Option<u64>,
}

impl StageTrace {
    /// Signed heap growth across the stage.
    pub fn heap_delta(&self) -> Option<i64> {
        heap_delta(self.heap_before, self.heap_after)
    }
}

/// Timing and heap figures for one tick.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickTrace {
    /// Tick traced.
    pub tick: u64,
    /// Per-stage figures in execution order.
    pub stages: Vec<StageTrace>,
}

impl TickTrace {
    /// Sum of stage durations.
    pub fn duration(&self) -> Duration {
        self.stages
            .iter()
            .fold(Duration::ZERO, |acc, s| acc.saturating_add(s.duration))
    }

    /// Heap growth from before the first stage to after the last.
    pub fn heap_delta(&self) -> Option<i64> {
        let first = self.stages.first()?;
        let last = self.stages.last()?;
        heap_delta(first.heap_before, last.heap_after)
    }

    /// The stage that took longest.
    pub fn slowest(&self) -> Option<&StageTrace> {
        self.stages.iter().max_by_key(|s| s.duration)
    }
}

fn heap_delta(before: Option<u64>, after: Option<u64>) -> Option<i64> {
    let before = i64::try_from(before?).ok()?;
    let after = i64::try_from(after?).ok()?;
    after.checked_sub(before)
}
