//! Telemetry sinks.
//!
//! Committed events are handed to a [`TelemetrySink`] after the commit
//! stage. Publishing is fire-and-forget: a sink cannot fail a tick and
//! nothing it does is read back by the simulation.

use tracing::debug;
use verdant_types::TelemetryEvent;

/// Receiver of committed telemetry.
pub trait TelemetrySink {
    /// Accept one event.
    fn publish(&mut self, event: &TelemetryEvent);
}

/// Keeps every event in memory.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MemorySink {
    /// Events in commit order.
    pub events: Vec<TelemetryEvent>,
}

impl MemorySink {
    /// Events published on `topic`.
    pub fn on_topic<'a>(&'a self, topic: &'a str) -> impl Iterator<Item = &'a TelemetryEvent> {
        self.events.iter().filter(move |e| e.topic == topic)
    }
}

impl TelemetrySink for MemorySink {
    fn publish(&mut self, event: &TelemetryEvent) {
        self.events.push(event.clone());
    }
}

/// Logs each event at debug level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TracingSink;

impl TelemetrySink for TracingSink {
    fn publish(&mut self, event: &TelemetryEvent) {
        debug!(
            topic = %event.topic,
            tick = event.tick,
            sequence = event.sequence,
            payload = %event.payload,
            "telemetry"
        );
    }
}
