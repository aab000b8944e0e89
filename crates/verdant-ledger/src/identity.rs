//! Payroll identity verification.
//!
//! `total_labor_cost == base_cost + overtime_cost` and no figure is
//! negative. The ledger maintains this by construction; the check exists
//! so the orchestrator and the harness can assert it at observation points.

use verdant_types::{FinalizedPayrollDay, PayrollTotals, WorkforcePayrollState};

use crate::PayrollAnomaly;

/// Outcome of an identity check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityResult {
    /// Every total satisfies the identity.
    Balanced,
    /// At least one total violates it.
    Anomaly(PayrollAnomaly),
}

impl IdentityResult {
    /// Whether the check passed.
    pub const fn is_balanced(&self) -> bool {
        matches!(self, Self::Balanced)
    }
}

/// Check a running ledger.
pub fn verify_identity(state: &WorkforcePayrollState) -> IdentityResult {
    check_all(state.day_index, &state.totals, state.by_structure.iter())
}

/// Check a sealed day.
pub fn verify_finalized(day: &FinalizedPayrollDay) -> IdentityResult {
    check_all(day.day_index, &day.totals, day.by_structure.iter())
}

fn check_all<'a, I, K>(day_index: u64, company: &PayrollTotals, structures: I) -> IdentityResult
where
    I: Iterator<Item = (&'a K, &'a PayrollTotals)>,
    K: core::fmt::Display + 'a,
{
    if let Some(message) = violation(company) {
        return IdentityResult::Anomaly(PayrollAnomaly {
            day_index,
            scope: "company".to_owned(),
            message,
        });
    }
    for (id, totals) in structures {
        if let Some(message) = violation(totals) {
            return IdentityResult::Anomaly(PayrollAnomaly {
                day_index,
                scope: id.to_string(),
                message,
            });
        }
    }
    IdentityResult::Balanced
}

fn violation(totals: &PayrollTotals) -> Option<String> {
    let negative = [
        ("base_minutes", totals.base_minutes),
        ("overtime_minutes", totals.overtime_minutes),
        ("base_cost", totals.base_cost),
        ("overtime_cost", totals.overtime_cost),
        ("total_labor_cost", totals.total_labor_cost),
    ]
    .into_iter()
    .find(|(_, value)| value.is_sign_negative() && !value.is_zero());
    if let Some((field, value)) = negative {
        return Some(format!("{field} is negative: {value}"));
    }
    let expected = totals.base_cost.checked_add(totals.overtime_cost)?;
    if expected != totals.total_labor_cost {
        return Some(format!(
            "total_labor_cost {} != base_cost {} + overtime_cost {}",
            totals.total_labor_cost, totals.base_cost, totals.overtime_cost
        ));
    }
    None
}
