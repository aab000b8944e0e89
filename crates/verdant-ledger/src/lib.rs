//! Payroll accrual ledger for the Verdant simulation.
//!
//! Every minute an employee works is priced and folded into a running
//! per-day ledger. When the simulation crosses into a new day the previous
//! day is sealed exactly once: currency is rounded half-to-even, minutes
//! are truncated, and a fresh zeroed ledger starts.
//!
//! # Architecture
//!
//! - [`config`] -- [`PayrollConfig`]: overtime multiplier, experience premium,
//!   location index table.
//! - [`contribution`] -- The hourly-rate formula and [`PayrollContribution`].
//! - [`ledger`] -- [`PayrollLedger`]: accrual, day rollover, finalization.
//! - [`identity`] -- Payroll identity verification.
//!
//! # Payroll Identity
//!
//! At every observation point:
//!
//! ```text
//! total_labor_cost == base_cost + overtime_cost, all three >= 0
//! ```
//!
//! A violation is reported as a [`PayrollAnomaly`]. The ledger never panics;
//! it returns errors.
//!
//! # Usage
//!
//! ```
//! use rust_decimal::Decimal;
//! use verdant_ledger::{PayrollContribution, PayrollLedger};
//! use verdant_types::StructureId;
//!
//! let mut ledger = PayrollLedger::new(0);
//! let contribution = PayrollContribution {
//!     structure_id: StructureId::new("s1"),
//!     base_minutes: Decimal::new(60, 0),
//!     overtime_minutes: Decimal::ZERO,
//!     base_cost: Decimal::new(1500, 2),
//!     overtime_cost: Decimal::ZERO,
//! };
//! ledger.accrue(&contribution).ok();
//!
//! let sealed = ledger.roll_to_day(1);
//! assert_eq!(sealed.map(|day| day.totals.base_minutes), Some(Decimal::new(60, 0)));
//! ```

pub mod config;
pub mod contribution;
pub mod identity;
pub mod ledger;

// Re-export primary types at crate root.
pub use config::PayrollConfig;
pub use contribution::{PayrollContribution, PayrollRateInputs, compute_contribution, hourly_rate};
pub use identity::{IdentityResult, verify_finalized, verify_identity};
pub use ledger::{PayrollLedger, round_currency, truncate_minutes};

use rust_decimal::Decimal;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur when pricing or recording payroll.
#[derive(Debug, thiserror::Error)]
pub enum PayrollError {
    /// A minute count or cost was negative.
    #[error("payroll {field} must not be negative, got {value}")]
    NegativeAmount {
        /// Which field was negative.
        field: &'static str,
        /// The offending value.
        value: Decimal,
    },

    /// The computed rate or minute count was NaN or infinite.
    #[error("payroll {field} is not a finite number")]
    NonFinite {
        /// Which input was not finite.
        field: &'static str,
    },

    /// A float could not be represented as a decimal.
    #[error("payroll {field} value {value} cannot be represented as a decimal")]
    Unrepresentable {
        /// Which input failed conversion.
        field: &'static str,
        /// The raw value.
        value: f64,
    },
}

// ---------------------------------------------------------------------------
// Anomaly type
// ---------------------------------------------------------------------------

/// A payroll identity violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollAnomaly {
    /// Day the violating totals belong to.
    pub day_index: u64,
    /// Which totals failed (`"company"` or a structure id).
    pub scope: String,
    /// Human-readable description.
    pub message: String,
}

impl core::fmt::Display for PayrollAnomaly {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.message)
    }
}
