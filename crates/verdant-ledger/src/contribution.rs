//! The hourly-rate formula and per-dispatch payroll contributions.
//!
//! ```text
//! rate = (hourly_base + skill_rate * skill_level)
//!      * location_index * role_multiplier * employee_multiplier
//!      * labor_market_factor * experience_multiplier * time_premium
//!
//! base_cost     = rate * base_minutes / 60
//! overtime_cost = rate * overtime_multiplier * overtime_minutes / 60
//! ```
//!
//! The rate is computed in `f64` (inputs are continuous employee state) and
//! converted to [`Decimal`] before any money is summed.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use verdant_types::StructureId;

use crate::PayrollError;
use crate::config::PayrollConfig;

/// Minutes per hour, as a decimal.
const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);

/// Everything the rate formula reads.
#[derive(Debug, Clone, PartialEq)]
pub struct PayrollRateInputs {
    /// Role base hourly rate.
    pub hourly_base: f64,
    /// Role rate per unit of skill.
    pub skill_rate: f64,
    /// Employee skill level in `[0, 1]`.
    pub skill_level: f64,
    /// Location index of the structure.
    pub location_index: f64,
    /// Role multiplier.
    pub role_multiplier: f64,
    /// Employee base-rate multiplier.
    pub employee_multiplier: f64,
    /// Labour market factor.
    pub labor_market_factor: f64,
    /// Employee experience level in `[0, 1]`.
    pub experience_level01: f64,
    /// Time premium multiplier.
    pub time_premium: f64,
}

/// A single dispatch commit, priced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayrollContribution {
    /// Structure the work happened in.
    pub structure_id: StructureId,
    /// Regular minutes.
    pub base_minutes: Decimal,
    /// Overtime minutes.
    pub overtime_minutes: Decimal,
    /// Cost of regular minutes.
    pub base_cost: Decimal,
    /// Cost of overtime minutes.
    pub overtime_cost: Decimal,
}

impl PayrollContribution {
    /// Combined cost.
    pub fn total_cost(&self) -> Decimal {
        self.base_cost.saturating_add(self.overtime_cost)
    }
}

/// Compute the hourly rate for the given inputs.
pub fn hourly_rate(inputs: &PayrollRateInputs, config: &PayrollConfig) -> f64 {
    let experience_multiplier =
        inputs.experience_level01.clamp(0.0, 1.0).mul_add(config.experience_premium, 1.0);
    inputs.skill_rate.mul_add(inputs.skill_level, inputs.hourly_base)
        * inputs.location_index
        * inputs.role_multiplier
        * inputs.employee_multiplier
        * inputs.labor_market_factor
        * experience_multiplier
        * inputs.time_premium
}

/// Price a dispatch commit.
///
/// # Errors
///
/// Returns [`PayrollError::NonFinite`] if the rate or minutes are not finite,
/// [`PayrollError::NegativeAmount`] if any of them is negative, and
/// [`PayrollError::Unrepresentable`] if a value does not fit a decimal.
pub fn compute_contribution(
    structure_id: &StructureId,
    inputs: &PayrollRateInputs,
    base_minutes: f64,
    overtime_minutes: f64,
    config: &PayrollConfig,
) -> Result<PayrollContribution, PayrollError> {
    let rate = hourly_rate(inputs, config);
    let rate = to_decimal("hourly_rate", rate)?;
    let overtime_rate = to_decimal("overtime_multiplier", config.overtime_multiplier)?
        .checked_mul(rate)
        .ok_or(PayrollError::NonFinite {
            field: "overtime_rate",
        })?;
    let base_minutes = to_decimal("base_minutes", base_minutes)?;
    let overtime_minutes = to_decimal("overtime_minutes", overtime_minutes)?;

    let base_cost = price(rate, base_minutes)?;
    let overtime_cost = price(overtime_rate, overtime_minutes)?;

    Ok(PayrollContribution {
        structure_id: structure_id.clone(),
        base_minutes,
        overtime_minutes,
        base_cost,
        overtime_cost,
    })
}

fn price(rate: Decimal, minutes: Decimal) -> Result<Decimal, PayrollError> {
    rate.checked_mul(minutes)
        .and_then(|v| v.checked_div(MINUTES_PER_HOUR))
        .ok_or(PayrollError::NonFinite { field: "cost" })
}

/// Convert a non-negative finite float into a [`Decimal`].
fn to_decimal(field: &'static str, value: f64) -> Result<Decimal, PayrollError> {
    if !value.is_finite() {
        return Err(PayrollError::NonFinite { field });
    }
    let decimal = Decimal::from_f64(value).ok_or(PayrollError::Unrepresentable { field, value })?;
    if decimal.is_sign_negative() && !decimal.is_zero() {
        return Err(PayrollError::NegativeAmount {
            field,
            value: decimal,
        });
    }
    Ok(decimal)
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;

    use super::*;

    fn flat_inputs() -> PayrollRateInputs {
        PayrollRateInputs {
            hourly_base: 12.0,
            skill_rate: 8.0,
            skill_level: 0.5,
            location_index: 1.0,
            role_multiplier: 1.0,
            employee_multiplier: 1.0,
            labor_market_factor: 1.0,
            experience_level01: 0.0,
            time_premium: 1.0,
        }
    }

    #[test]
    fn rate_combines_every_factor() {
        let config = PayrollConfig::default();
        let mut inputs = flat_inputs();
        assert!((hourly_rate(&inputs, &config) - 16.0).abs() < 1e-9);

        inputs.location_index = 1.5;
        inputs.experience_level01 = 1.0;
        // 16 * 1.5 * 1.2
        assert!((hourly_rate(&inputs, &config) - 28.8).abs() < 1e-9);
    }

    #[test]
    fn one_hour_of_base_minutes_costs_the_rate() {
        let config = PayrollConfig::default();
        let contribution =
            compute_contribution(&StructureId::new("s1"), &flat_inputs(), 60.0, 0.0, &config);
        let contribution = contribution.ok();
        assert_eq!(contribution.as_ref().map(|c| c.base_cost), Some(dec!(16)));
        assert_eq!(contribution.as_ref().map(|c| c.base_minutes), Some(dec!(60)));
        assert_eq!(contribution.map(|c| c.overtime_cost), Some(Decimal::ZERO));
    }

    #[test]
    fn overtime_uses_the_multiplier() {
        let config = PayrollConfig::default();
        let contribution =
            compute_contribution(&StructureId::new("s1"), &flat_inputs(), 0.0, 30.0, &config);
        // 16 * 1.25 * 30 / 60
        assert_eq!(contribution.ok().map(|c| c.overtime_cost), Some(dec!(10)));
    }

    #[test]
    fn negative_minutes_are_rejected() {
        let config = PayrollConfig::default();
        let result =
            compute_contribution(&StructureId::new("s1"), &flat_inputs(), -5.0, 0.0, &config);
        assert!(matches!(
            result,
            Err(PayrollError::NegativeAmount {
                field: "base_minutes",
                ..
            })
        ));
    }

    #[test]
    fn nan_rate_is_rejected() {
        let config = PayrollConfig::default();
        let mut inputs = flat_inputs();
        inputs.role_multiplier = f64::NAN;
        let result = compute_contribution(&StructureId::new("s1"), &inputs, 60.0, 0.0, &config);
        assert!(matches!(result, Err(PayrollError::NonFinite { .. })));
    }
}
