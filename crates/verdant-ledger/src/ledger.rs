//! The running per-day payroll ledger.
//!
//! [`PayrollLedger`] wraps the [`WorkforcePayrollState`] stored in the
//! world snapshot and adds the three operations the workforce stage needs:
//! accrue a contribution, roll over to a new day, and finalize.
//!
//! # Design
//!
//! - **Running totals**: contributions are summed unrounded all day.
//! - **Exactly-once seal**: a day is finalized only when the ledger is rolled
//!   to a *different* day index, and the ledger it produced is replaced by a
//!   zeroed one, so a day can never be sealed twice.
//! - **Rounding**: half-to-even on currency, truncation on minutes, applied
//!   only when sealing.

use std::collections::BTreeMap;

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;
use verdant_types::{FinalizedPayrollDay, PayrollTotals, WorkforcePayrollState};

use crate::PayrollError;
use crate::contribution::PayrollContribution;

/// Default number of decimal places kept on finalized currency.
pub const DEFAULT_CURRENCY_SCALE: u32 = 2;

/// Running payroll for the current day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollLedger {
    state: WorkforcePayrollState,
    currency_scale: u32,
}

impl Default for PayrollLedger {
    fn default() -> Self {
        Self::new(0)
    }
}

impl PayrollLedger {
    /// Create an empty ledger for `day_index`.
    pub fn new(day_index: u64) -> Self {
        Self {
            state: WorkforcePayrollState {
                day_index,
                ..WorkforcePayrollState::default()
            },
            currency_scale: DEFAULT_CURRENCY_SCALE,
        }
    }

    /// Wrap a ledger loaded from a world snapshot.
    pub const fn from_state(state: WorkforcePayrollState) -> Self {
        Self {
            state,
            currency_scale: DEFAULT_CURRENCY_SCALE,
        }
    }

    /// Set the number of decimal places kept when a day is sealed.
    #[must_use]
    pub const fn with_currency_scale(mut self, scale: u32) -> Self {
        self.currency_scale = scale;
        self
    }

    /// Borrow the running state.
    pub const fn state(&self) -> &WorkforcePayrollState {
        &self.state
    }

    /// Unwrap into the state stored in the world snapshot.
    pub fn into_state(self) -> WorkforcePayrollState {
        self.state
    }

    /// Day the running totals belong to.
    pub const fn day_index(&self) -> u64 {
        self.state.day_index
    }

    /// Fold a contribution into both the company and the structure totals.
    ///
    /// # Errors
    ///
    /// Returns [`PayrollError::NegativeAmount`] if any field of the
    /// contribution is negative. The ledger is unchanged on error.
    pub fn accrue(&mut self, contribution: &PayrollContribution) -> Result<(), PayrollError> {
        ensure_non_negative("base_minutes", contribution.base_minutes)?;
        ensure_non_negative("overtime_minutes", contribution.overtime_minutes)?;
        ensure_non_negative("base_cost", contribution.base_cost)?;
        ensure_non_negative("overtime_cost", contribution.overtime_cost)?;

        add_into(&mut self.state.totals, contribution);
        let structure = self
            .state
            .by_structure
            .entry(contribution.structure_id.clone())
            .or_default();
        add_into(structure, contribution);
        Ok(())
    }

    /// Move the ledger to `day_index`.
    ///
    /// If the ledger already belongs to `day_index` nothing happens and
    /// `None` is returned. Otherwise the current day is finalized, a new
    /// zeroed ledger begins for `day_index`, and the sealed day is returned.
    pub fn roll_to_day(&mut self, day_index: u64) -> Option<FinalizedPayrollDay> {
        if self.state.day_index == day_index {
            return None;
        }
        let sealed = self.finalize();
        debug!(
            sealed_day = sealed.day_index,
            next_day = day_index,
            total = %sealed.totals.total_labor_cost,
            "Payroll day finalized"
        );
        self.state = WorkforcePayrollState {
            day_index,
            ..WorkforcePayrollState::default()
        };
        Some(sealed)
    }

    /// Produce the rounded, sealed view of the current day without
    /// modifying the ledger.
    pub fn finalize(&self) -> FinalizedPayrollDay {
        FinalizedPayrollDay {
            day_index: self.state.day_index,
            totals: round_totals(&self.state.totals, self.currency_scale),
            by_structure: self
                .state
                .by_structure
                .iter()
                .map(|(id, totals)| (id.clone(), round_totals(totals, self.currency_scale)))
                .collect::<BTreeMap<_, _>>(),
        }
    }
}

fn ensure_non_negative(field: &'static str, value: Decimal) -> Result<(), PayrollError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(PayrollError::NegativeAmount { field, value });
    }
    Ok(())
}

fn add_into(totals: &mut PayrollTotals, contribution: &PayrollContribution) {
    totals.base_minutes = totals.base_minutes.saturating_add(contribution.base_minutes);
    totals.overtime_minutes = totals
        .overtime_minutes
        .saturating_add(contribution.overtime_minutes);
    totals.base_cost = totals.base_cost.saturating_add(contribution.base_cost);
    totals.overtime_cost = totals.overtime_cost.saturating_add(contribution.overtime_cost);
    totals.total_labor_cost = totals.base_cost.saturating_add(totals.overtime_cost);
}

/// Round currency half-to-even at `scale` places.
pub fn round_currency(value: Decimal, scale: u32) -> Decimal {
    value.round_dp_with_strategy(scale, RoundingStrategy::MidpointNearestEven)
}

/// Truncate minutes toward zero.
pub fn truncate_minutes(value: Decimal) -> Decimal {
    value.trunc()
}

fn round_totals(totals: &PayrollTotals, scale: u32) -> PayrollTotals {
    let base_cost = round_currency(totals.base_cost, scale);
    let overtime_cost = round_currency(totals.overtime_cost, scale);
    PayrollTotals {
        base_minutes: truncate_minutes(totals.base_minutes),
        overtime_minutes: truncate_minutes(totals.overtime_minutes),
        base_cost,
        overtime_cost,
        total_labor_cost: base_cost.saturating_add(overtime_cost),
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use verdant_types::StructureId;

    use super::*;

    fn contribution(structure: &str, minutes: Decimal, cost: Decimal) -> PayrollContribution {
        PayrollContribution {
            structure_id: StructureId::new(structure),
            base_minutes: minutes,
            overtime_minutes: Decimal::ZERO,
            base_cost: cost,
            overtime_cost: Decimal::ZERO,
        }
    }

    #[test]
    fn accrual_updates_company_and_structure_totals() {
        let mut ledger = PayrollLedger::new(0);
        assert!(ledger.accrue(&contribution("s1", dec!(60), dec!(15))).is_ok());
        assert!(ledger.accrue(&contribution("s2", dec!(30), dec!(7.5))).is_ok());

        let state = ledger.state();
        assert_eq!(state.totals.base_minutes, dec!(90));
        assert_eq!(state.totals.total_labor_cost, dec!(22.5));
        assert_eq!(
            state
                .by_structure
                .get(&StructureId::new("s2"))
                .map(|t| t.base_cost),
            Some(dec!(7.5))
        );
    }

    #[test]
    fn negative_contribution_leaves_ledger_untouched() {
        let mut ledger = PayrollLedger::new(0);
        let result = ledger.accrue(&contribution("s1", dec!(-1), dec!(0)));
        assert!(result.is_err());
        assert_eq!(ledger, PayrollLedger::new(0));
    }

    #[test]
    fn same_day_roll_is_a_noop() {
        let mut ledger = PayrollLedger::new(3);
        assert!(ledger.accrue(&contribution("s1", dec!(10), dec!(2))).is_ok());
        assert!(ledger.roll_to_day(3).is_none());
        assert_eq!(ledger.state().totals.base_minutes, dec!(10));
    }

    #[test]
    fn rollover_seals_once_and_starts_fresh() {
        let mut ledger = PayrollLedger::new(0);
        assert!(ledger.accrue(&contribution("s1", dec!(60), dec!(15))).is_ok());

        let sealed = ledger.roll_to_day(1);
        assert_eq!(sealed.as_ref().map(|d| d.day_index), Some(0));
        assert_eq!(sealed.map(|d| d.totals.base_minutes), Some(dec!(60)));
        assert_eq!(ledger.day_index(), 1);
        assert_eq!(ledger.state().totals, PayrollTotals::default());

        // Rolling to the same day again never seals a second time.
        assert!(ledger.roll_to_day(1).is_none());
    }

    #[test]
    fn finalization_rounds_half_to_even_and_truncates_minutes() {
        let mut ledger = PayrollLedger::new(0);
        let c = PayrollContribution {
            structure_id: StructureId::new("s1"),
            base_minutes: dec!(59.9),
            overtime_minutes: dec!(10.99),
            base_cost: dec!(10.125),
            overtime_cost: dec!(2.135),
        };
        assert!(ledger.accrue(&c).is_ok());
        let sealed = ledger.finalize();
        assert_eq!(sealed.totals.base_minutes, dec!(59));
        assert_eq!(sealed.totals.overtime_minutes, dec!(10));
        assert_eq!(sealed.totals.base_cost, dec!(10.12));
        assert_eq!(sealed.totals.overtime_cost, dec!(2.14));
        assert_eq!(sealed.totals.total_labor_cost, dec!(12.26));
    }
}
