//! Fatigue, morale and experience adjustments.
//!
//! Every adjustment clamps to the field's domain: morale and fatigue to
//! `[0, 1]`, experience hours to `[0, ceiling]`.

use verdant_types::{Employee, TaskCategory};

use crate::config::WellbeingConfig;
use crate::traits::TraitEffectOutcome;

/// Minutes of one dispatch commit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorkMinutes {
    /// Regular minutes.
    pub base: f64,
    /// Overtime minutes.
    pub overtime: f64,
}

impl WorkMinutes {
    /// Regular plus overtime.
    pub fn total(self) -> f64 {
        self.base + self.overtime
    }
}

/// Clamp to `[0, 1]`, mapping NaN to zero.
pub fn clamp01(value: f64) -> f64 {
    if value.is_nan() { 0.0 } else { value.clamp(0.0, 1.0) }
}

/// Start a new day's usage counters if `day` differs from the stored day.
///
/// Moving forward recovers overnight fatigue once, however many days were
/// skipped. Returns whether a reset happened.
pub fn reset_day_usage(employee: &mut Employee, day: u64, config: &WellbeingConfig) -> bool {
    if employee.usage.day_index == day {
        return false;
    }
    if day > employee.usage.day_index {
        employee.fatigue01 = clamp01(employee.fatigue01 - config.overnight_fatigue_recovery);
    }
    employee.usage.day_index = day;
    employee.usage.base_minutes = 0.0;
    employee.usage.overtime_minutes = 0.0;
    employee.usage.overtime_morale_penalty = 0.0;
    true
}

/// Apply the wellbeing effects of a commit.
///
/// Break tasks recover fatigue; everything else adds fatigue proportional
/// to the minutes worked. Overtime costs morale up to the daily cap.
pub fn apply_work(
    employee: &mut Employee,
    minutes: WorkMinutes,
    category: TaskCategory,
    effects: &TraitEffectOutcome,
    config: &WellbeingConfig,
) {
    let worked = minutes.total();
    let fatigue = if category == TaskCategory::Break {
        employee.fatigue01 - worked * config.break_recovery_per_minute
    } else {
        (worked * config.fatigue_per_minute).mul_add(effects.fatigue_multiplier, employee.fatigue01)
            + effects.fatigue_delta
    };
    employee.fatigue01 = clamp01(fatigue);

    let headroom =
        (config.overtime_morale_daily_cap - employee.usage.overtime_morale_penalty).max(0.0);
    let penalty = (minutes.overtime * config.overtime_morale_per_minute).clamp(0.0, headroom);
    employee.usage.overtime_morale_penalty += penalty;
    employee.morale01 = clamp01(employee.morale01 - penalty + effects.morale_delta);
}

/// Accrue experience for `minutes` worked at `xp_multiplier`.
pub fn accrue_experience(
    employee: &mut Employee,
    minutes: f64,
    xp_multiplier: f64,
    config: &WellbeingConfig,
) {
    let ceiling = config.experience_ceiling_hours.max(f64::MIN_POSITIVE);
    let gained = (minutes / 60.0 * xp_multiplier).max(0.0);
    let hours = (employee.experience.hours_accrued + gained).clamp(0.0, ceiling);
    employee.experience.hours_accrued = hours;
    employee.experience.level01 = clamp01(hours / ceiling);
}
