//! Workforce events and their telemetry topics.
//!
//! The workforce tick reports what happened as [`WorkforceEvent`]s. The
//! tick pipeline buffers them and the commit stage wraps each one in a
//! [`TelemetryEvent`] under its versioned topic.

use rust_decimal::Decimal;
use serde::Serialize;
use verdant_types::telemetry::topics;
use verdant_types::{
    CandidateId, DeviceId, EmployeeId, FinalizedPayrollDay, PayrollTotals, RaiseDecision, RoleId,
    StructureId, TaskId, TelemetryEvent, WorkforceKpiSnapshot, WorkforceWarning, ZoneId,
};

/// Something the workforce tick did.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum WorkforceEvent {
    /// KPI snapshot after dispatch.
    Kpi(WorkforceKpiSnapshot),

    /// Running payroll after dispatch.
    PayrollSnapshot {
        /// Day of the running totals.
        day_index: u64,
        /// Running totals.
        totals: PayrollTotals,
        /// Cost accrued in this tick.
        tick_labor_cost: Decimal,
    },

    /// A payroll day was sealed.
    PayrollFinalized(FinalizedPayrollDay),

    /// A warning was raised.
    Warning(WorkforceWarning),

    /// A scan request was processed.
    MarketScan {
        /// Structure scanned.
        structure_id: StructureId,
        /// Whether the cooldown allowed the scan.
        did_scan: bool,
        /// Counter after the request.
        scan_counter: Option<u32>,
        /// Candidates generated.
        pool_size: usize,
    },

    /// A candidate was hired.
    EmployeeOnboarded {
        /// New employee.
        employee_id: EmployeeId,
        /// Candidate they were.
        candidate_id: CandidateId,
        /// Structure they joined.
        structure_id: StructureId,
        /// Role they hold.
        role_id: RoleId,
        /// Hourly rate they expect.
        expected_rate_per_hour: f64,
    },

    /// A raise decision was applied.
    Raise {
        /// Employee.
        employee_id: EmployeeId,
        /// Decision.
        decision: RaiseDecision,
        /// Factor applied to rate and expectation.
        factor: f64,
        /// Morale delta.
        morale_delta: f64,
        /// New cadence sequence.
        cadence_sequence: u32,
        /// Next eligible day.
        next_eligible_day: u64,
    },

    /// An employee left the roster.
    EmployeeTerminated {
        /// Employee.
        employee_id: EmployeeId,
        /// Structure they worked in.
        structure_id: StructureId,
        /// Reason given.
        reason: Option<String>,
        /// Tasks reverted to queued.
        reverted_tasks: usize,
        /// Ripple applied to co-workers.
        morale_ripple: f64,
    },

    /// A device was serviced.
    DeviceMaintenance {
        /// Device.
        device_id: DeviceId,
        /// Zone holding the device.
        zone_id: ZoneId,
        /// Task that serviced it.
        task_id: TaskId,
        /// Employee who serviced it.
        employee_id: EmployeeId,
        /// Wear multiplier of the service.
        device_wear_multiplier: f64,
    },

    /// A task was dispatched and completed.
    TaskDispatched {
        /// Task.
        task_id: TaskId,
        /// Task code.
        task_code: String,
        /// Assignee.
        employee_id: EmployeeId,
        /// Structure.
        structure_id: StructureId,
        /// Regular minutes.
        base_minutes: f64,
        /// Overtime minutes.
        overtime_minutes: f64,
        /// Error rate.
        error_rate01: f64,
    },
}

impl WorkforceEvent {
    /// Versioned telemetry topic.
    pub const fn topic(&self) -> &'static str {
        match self {
            Self::Kpi(_) => topics::WORKFORCE_KPI,
            Self::PayrollSnapshot { .. } => topics::PAYROLL_SNAPSHOT,
            Self::PayrollFinalized(_) => topics::PAYROLL_FINALIZED,
            Self::Warning(_) => topics::WORKFORCE_WARNING,
            Self::MarketScan { .. } => topics::MARKET_SCAN,
            Self::EmployeeOnboarded { .. } => topics::EMPLOYEE_ONBOARDED,
            Self::Raise { .. } => topics::RAISE,
            Self::EmployeeTerminated { .. } => topics::EMPLOYEE_TERMINATED,
            Self::DeviceMaintenance { .. } => topics::DEVICE_MAINTENANCE,
            Self::TaskDispatched { .. } => topics::TASK_DISPATCHED,
        }
    }

    /// Wrap in a telemetry envelope for `tick`.
    pub fn to_telemetry(&self, tick: u64) -> Result<TelemetryEvent, serde_json::Error> {
        Ok(TelemetryEvent::new(self.topic(), tick, serde_json::to_value(self)?))
    }
}
