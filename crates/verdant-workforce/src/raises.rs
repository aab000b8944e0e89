//! Raise eligibility and application.
//!
//! An employee may negotiate once they have been employed for
//! `min_employment_days` and their `next_eligible_day` has been reached.
//! Applying a decision scales the pay multiplier and the salary expectation
//! by the same factor, moves morale, and schedules the next window with a
//! seeded jitter drawn from `"workforce:raise:<employee seed>:<sequence>"`.

use tracing::debug;
use verdant_types::{Employee, RaiseDecision};

use crate::config::{RaiseConfig, RaiseEffect};
use crate::rng::create_stream;

/// Caller overrides of a raise decision's defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RaiseOverrides {
    /// Fractional rate increase.
    pub rate_increase: Option<f64>,
    /// Morale delta.
    pub morale_delta: Option<f64>,
}

/// What a raise changed, for telemetry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaiseApplied {
    /// Decision taken.
    pub decision: RaiseDecision,
    /// Factor applied to rate and expectation.
    pub factor: f64,
    /// Morale delta applied before clamping.
    pub morale_delta: f64,
    /// New cadence sequence.
    pub cadence_sequence: u32,
    /// Next eligible day.
    pub next_eligible_day: u64,
}

/// Whether `employee` may negotiate on `current_day`.
pub fn is_raise_eligible(employee: &Employee, current_day: u64, config: &RaiseConfig) -> bool {
    let tenure_ok =
        current_day >= employee.employment_start_day.saturating_add(config.min_employment_days);
    let window_ok = employee
        .raise_state
        .next_eligible_day
        .is_none_or(|next| current_day >= next);
    tenure_ok && window_ok
}

/// Default effect of a decision.
pub const fn default_effect(decision: RaiseDecision, config: &RaiseConfig) -> RaiseEffect {
    match decision {
        RaiseDecision::Accept => config.accept,
        RaiseDecision::Bonus => config.bonus,
        RaiseDecision::Ignore => config.ignore,
    }
}

/// Apply a decision. The caller checks eligibility first.
pub fn apply_raise(
    employee: &mut Employee,
    decision: RaiseDecision,
    overrides: RaiseOverrides,
    current_day: u64,
    config: &RaiseConfig,
) -> RaiseApplied {
    let defaults = default_effect(decision, config);
    let rate_increase = overrides.rate_increase.unwrap_or(defaults.rate_increase);
    let morale_delta = overrides.morale_delta.unwrap_or(defaults.morale_delta);
    let factor = (1.0 + rate_increase).max(0.0);

    employee.base_rate_multiplier *= factor;
    employee.salary_expectation_per_hour *= factor;
    employee.morale01 = (employee.morale01 + morale_delta).clamp(0.0, 1.0);

    let sequence = employee.raise_state.cadence_sequence.saturating_add(1);
    let next_eligible_day = next_eligible_day(employee, sequence, current_day, config);
    employee.raise_state.cadence_sequence = sequence;
    employee.raise_state.last_raise_day = Some(current_day);
    employee.raise_state.next_eligible_day = Some(next_eligible_day);

    debug!(
        employee = %employee.id,
        ?decision,
        factor,
        next_eligible_day,
        "raise applied"
    );

    RaiseApplied {
        decision,
        factor,
        morale_delta,
        cadence_sequence: sequence,
        next_eligible_day,
    }
}

/// `current_day + cooldown + jitter`, never earlier than
/// `current_day + min_employment_days`.
///
/// When `cooldown_days - jitter_days` falls below `min_employment_days` the
/// clamp collapses every early draw onto the floor and the jitter becomes
/// one-sided.
pub fn next_eligible_day(
    employee: &Employee,
    sequence: u32,
    current_day: u64,
    config: &RaiseConfig,
) -> u64 {
    let stream_id = format!("workforce:raise:{}:{sequence}", employee.rng_seed);
    let mut rng = create_stream("", &stream_id);
    let span = config.jitter_days.saturating_mul(2).saturating_add(1);
    let offset = u64::try_from(rng.next_index(usize::try_from(span).unwrap_or(usize::MAX)))
        .unwrap_or(0);

    let base = current_day.saturating_add(config.cooldown_days);
    let jittered = base
        .saturating_add(offset)
        .saturating_sub(config.jitter_days);
    jittered.max(current_day.saturating_add(config.min_employment_days))
}

#[cfg(test)]
mod tests {
    use verdant_types::EmployeeRngSeed;

    use super::*;
    use crate::test_support;

    fn employee(start_day: u64) -> Employee {
        let mut employee = test_support::employee("e1", "s-1");
        employee.employment_start_day = start_day;
        employee.salary_expectation_per_hour = 20.0;
        employee
    }

    #[test]
    fn eligibility_needs_tenure_and_window() {
        let config = RaiseConfig::default();
        let mut e = employee(0);
        assert!(!is_raise_eligible(&e, 179, &config));
        assert!(is_raise_eligible(&e, 180, &config));
        e.raise_state.next_eligible_day = Some(200);
        assert!(!is_raise_eligible(&e, 190, &config));
        assert!(is_raise_eligible(&e, 200, &config));
    }

    #[test]
    fn accept_scales_rate_and_expectation_together() {
        let config = RaiseConfig::default();
        let mut e = employee(0);
        let applied = apply_raise(
            &mut e,
            RaiseDecision::Accept,
            RaiseOverrides::default(),
            180,
            &config,
        );
        assert!((applied.factor - 1.05).abs() < 1e-12);
        assert!((e.base_rate_multiplier - 1.05).abs() < 1e-12);
        assert!((e.salary_expectation_per_hour - 21.0).abs() < 1e-9);
        assert!((e.morale01 - 0.76).abs() < 1e-9);
        assert_eq!(e.raise_state.cadence_sequence, 1);
        assert_eq!(e.raise_state.last_raise_day, Some(180));
    }

    #[test]
    fn overrides_win_and_morale_is_clamped() {
        let config = RaiseConfig::default();
        let mut e = employee(0);
        apply_raise(
            &mut e,
            RaiseDecision::Ignore,
            RaiseOverrides {
                rate_increase: None,
                morale_delta: Some(-5.0),
            },
            180,
            &config,
        );
        assert!(e.morale01.abs() < f64::EPSILON);
        assert!((e.base_rate_multiplier - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn next_window_is_stable_and_bounded() {
        let config = RaiseConfig::default();
        let e = employee(0);
        for sequence in 1..50 {
            let a = next_eligible_day(&e, sequence, 200, &config);
            let b = next_eligible_day(&e, sequence, 200, &config);
            assert_eq!(a, b);
            assert!(a >= 200 + config.min_employment_days);
            assert!(a <= 200 + config.cooldown_days + config.jitter_days);
        }
    }

    #[test]
    fn default_jitter_spreads_both_ways() {
        let config = RaiseConfig::default();
        let base = 200 + config.cooldown_days;
        let floor = 200 + config.min_employment_days;
        let (mut early, mut late, mut on_floor) = (0_u32, 0_u32, 0_u32);
        for slot in 0..400 {
            let mut e = employee(0);
            e.rng_seed = EmployeeRngSeed::new(format!("s1:employee:{slot}"));
            let day = next_eligible_day(&e, 1, 200, &config);
            assert!(day >= floor);
            if day < base {
                early += 1;
            } else if day > base {
                late += 1;
            }
            if day == floor {
                on_floor += 1;
            }
        }
        assert!(early > 120 && late > 120, "early={early} late={late}");
        assert!(on_floor < 40, "on_floor={on_floor}");
    }

    #[test]
    fn short_cooldown_still_respects_tenure_floor() {
        let config = RaiseConfig {
            cooldown_days: 10,
            ..RaiseConfig::default()
        };
        let e = employee(0);
        for sequence in 1..20 {
            assert_eq!(
                next_eligible_day(&e, sequence, 50, &config),
                50 + config.min_employment_days
            );
        }
    }
}
