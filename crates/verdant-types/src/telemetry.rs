//! Telemetry envelope handed to the transport collaborator.
//!
//! Events are fire-and-forget: nothing in the next tick reads them back.

use serde::{Deserialize, Serialize};

/// Versioned topic strings.
pub mod topics {
    /// Per-tick workforce KPI snapshot.
    pub const WORKFORCE_KPI: &str = "telemetry.workforce.kpi.v1";
    /// Running payroll after the workforce stage.
    pub const PAYROLL_SNAPSHOT: &str = "telemetry.workforce.payroll_snapshot.v1";
    /// A payroll day was sealed.
    pub const PAYROLL_FINALIZED: &str = "telemetry.workforce.payroll_finalized.v1";
    /// A warning was raised instead of an error.
    pub const WORKFORCE_WARNING: &str = "telemetry.workforce.warning.v1";
    /// A hiring-market scan completed.
    pub const MARKET_SCAN: &str = "telemetry.hiring.market_scan.v1";
    /// A candidate was hired.
    pub const EMPLOYEE_ONBOARDED: &str = "telemetry.hiring.employee_onboarded.v1";
    /// A raise decision was applied.
    pub const RAISE: &str = "telemetry.workforce.raise.v1";
    /// An employee was terminated.
    pub const EMPLOYEE_TERMINATED: &str = "telemetry.workforce.employee_terminated.v1";
    /// A device was serviced.
    pub const DEVICE_MAINTENANCE: &str = "telemetry.device.maintenance.v1";
    /// A task was dispatched.
    pub const TASK_DISPATCHED: &str = "telemetry.workforce.task_dispatched.v1";
}

/// A telemetry event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryEvent {
    /// Versioned topic.
    pub topic: String,
    /// Tick the event was produced in.
    pub tick: u64,
    /// Position within the tick, assigned on commit.
    pub sequence: u32,
    /// JSON payload.
    pub payload: serde_json::Value,
}

impl TelemetryEvent {
    /// Create an uncommitted event; sequence is assigned later.
    pub fn new(topic: &str, tick: u64, payload: serde_json::Value) -> Self {
        Self {
            topic: topic.to_owned(),
            tick,
            sequence: 0,
            payload,
        }
    }
}
