//! Configuration constants and defaults for the workforce subsystem.
//!
//! These values correspond to the `workforce` section of
//! `verdant-config.yaml`. The [`WorkforceConfig`] struct bundles every
//! tunable so that callers (tick pipeline, tests) can override defaults.

use serde::Deserialize;
use verdant_ledger::PayrollConfig;

/// Every workforce tunable.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct WorkforceConfig {
    /// Hiring market.
    #[serde(default)]
    pub market: MarketConfig,
    /// Payroll pricing.
    #[serde(default)]
    pub payroll: PayrollConfig,
    /// Raise cadence.
    #[serde(default)]
    pub raises: RaiseConfig,
    /// Termination side effects.
    #[serde(default)]
    pub termination: TerminationConfig,
    /// Fatigue, morale and experience.
    #[serde(default)]
    pub wellbeing: WellbeingConfig,
    /// Scheduler and dispatcher.
    #[serde(default)]
    pub dispatch: DispatchConfig,
}

// ---------------------------------------------------------------------------
// Market
// ---------------------------------------------------------------------------

/// Hiring market parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MarketConfig {
    /// Days between scans of the same structure (default: 30).
    #[serde(default = "default_scan_cooldown_days")]
    pub scan_cooldown_days: u64,

    /// Candidates generated per scan (default: 16).
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// Wage offset in the expected-rate formula (default: 10.0).
    #[serde(default = "default_wage_offset")]
    pub wage_offset: f64,

    /// Wage per unit of main skill (default: 20.0).
    #[serde(default = "default_wage_skill_multiplier")]
    pub wage_skill_multiplier: f64,

    /// Range the main skill is drawn from (default: 0.25..0.9).
    #[serde(default = "default_main_skill_range")]
    pub main_skill_range: (f64, f64),

    /// Range secondary skills are drawn from (default: 0.05..0.6).
    #[serde(default = "default_secondary_skill_range")]
    pub secondary_skill_range: (f64, f64),

    /// Maximum traits per candidate (default: 2).
    #[serde(default = "default_max_traits")]
    pub max_traits: u32,

    /// Skill universe used when roles declare no core skills.
    #[serde(default = "default_skill_universe")]
    pub skill_universe: Vec<String>,

    /// Secondary skills used when the remaining universe is too small.
    #[serde(default = "default_fallback_skills")]
    pub fallback_skills: Vec<String>,

    /// Defaults applied to freshly hired employees.
    #[serde(default)]
    pub hire: HireDefaults,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            scan_cooldown_days: default_scan_cooldown_days(),
            pool_size: default_pool_size(),
            wage_offset: default_wage_offset(),
            wage_skill_multiplier: default_wage_skill_multiplier(),
            main_skill_range: default_main_skill_range(),
            secondary_skill_range: default_secondary_skill_range(),
            max_traits: default_max_traits(),
            skill_universe: default_skill_universe(),
            fallback_skills: default_fallback_skills(),
            hire: HireDefaults::default(),
        }
    }
}

/// Starting values of a hired employee.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HireDefaults {
    /// Starting morale (default: 0.75).
    #[serde(default = "default_starting_morale")]
    pub morale01: f64,
    /// Regular hours per day (default: 8).
    #[serde(default = "default_hours_per_day")]
    pub hours_per_day: f64,
    /// Overtime hours per day (default: 2).
    #[serde(default = "default_overtime_hours")]
    pub overtime_hours_per_day: f64,
    /// Working days per week (default: 5).
    #[serde(default = "default_days_per_week")]
    pub days_per_week: u8,
}

impl Default for HireDefaults {
    fn default() -> Self {
        Self {
            morale01: default_starting_morale(),
            hours_per_day: default_hours_per_day(),
            overtime_hours_per_day: default_overtime_hours(),
            days_per_week: default_days_per_week(),
        }
    }
}

// ---------------------------------------------------------------------------
// Raises and termination
// ---------------------------------------------------------------------------

/// Rate and morale effect of one raise decision.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct RaiseEffect {
    /// Fractional rate increase (0.05 = +5%).
    pub rate_increase: f64,
    /// Morale delta.
    pub morale_delta: f64,
}

/// Raise cadence parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RaiseConfig {
    /// Days of employment before the first raise (default: 180).
    #[serde(default = "default_min_employment_days")]
    pub min_employment_days: u64,
    /// Days between raise decisions (default: 225). Keep this at least
    /// `min_employment_days + jitter_days` or the floor clamp eats the lower
    /// half of the jitter.
    #[serde(default = "default_raise_cooldown_days")]
    pub cooldown_days: u64,
    /// Maximum seeded jitter in days, applied symmetrically (default: 45).
    #[serde(default = "default_raise_jitter_days")]
    pub jitter_days: u64,
    /// Defaults for an accepted raise.
    #[serde(default = "default_accept_effect")]
    pub accept: RaiseEffect,
    /// Defaults for a bonus.
    #[serde(default = "default_bonus_effect")]
    pub bonus: RaiseEffect,
    /// Defaults for an ignored request.
    #[serde(default = "default_ignore_effect")]
    pub ignore: RaiseEffect,
}

impl Default for RaiseConfig {
    fn default() -> Self {
        Self {
            min_employment_days: default_min_employment_days(),
            cooldown_days: default_raise_cooldown_days(),
            jitter_days: default_raise_jitter_days(),
            accept: default_accept_effect(),
            bonus: default_bonus_effect(),
            ignore: default_ignore_effect(),
        }
    }
}

/// Termination side effects.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TerminationConfig {
    /// Morale delta applied to co-workers in the same structure (default: -0.02).
    #[serde(default = "default_morale_ripple")]
    pub morale_ripple: f64,
    /// Largest ripple magnitude accepted from an override (default: 0.2).
    #[serde(default = "default_max_ripple")]
    pub max_ripple: f64,
}

impl Default for TerminationConfig {
    fn default() -> Self {
        Self {
            morale_ripple: default_morale_ripple(),
            max_ripple: default_max_ripple(),
        }
    }
}

// ---------------------------------------------------------------------------
// Wellbeing and dispatch
// ---------------------------------------------------------------------------

/// Fatigue, morale and experience rates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WellbeingConfig {
    /// Fatigue added per minute worked (default: 0.001).
    #[serde(default = "default_fatigue_per_minute")]
    pub fatigue_per_minute: f64,
    /// Fatigue recovered per minute of break (default: 0.004).
    #[serde(default = "default_break_recovery_per_minute")]
    pub break_recovery_per_minute: f64,
    /// Morale lost per overtime minute (default: 0.0005).
    #[serde(default = "default_overtime_morale_per_minute")]
    pub overtime_morale_per_minute: f64,
    /// Daily cap on overtime morale loss (default: 0.05).
    #[serde(default = "default_overtime_morale_daily_cap")]
    pub overtime_morale_daily_cap: f64,
    /// Fatigue recovered at each day rollover (default: 0.3).
    #[serde(default = "default_overnight_recovery")]
    pub overnight_fatigue_recovery: f64,
    /// Experience hours that map to level 1.0 (default: 2000).
    #[serde(default = "default_experience_ceiling_hours")]
    pub experience_ceiling_hours: f64,
}

impl Default for WellbeingConfig {
    fn default() -> Self {
        Self {
            fatigue_per_minute: default_fatigue_per_minute(),
            break_recovery_per_minute: default_break_recovery_per_minute(),
            overtime_morale_per_minute: default_overtime_morale_per_minute(),
            overtime_morale_daily_cap: default_overtime_morale_daily_cap(),
            overnight_fatigue_recovery: default_overnight_recovery(),
            experience_ceiling_hours: default_experience_ceiling_hours(),
        }
    }
}

/// Scheduler and dispatcher parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DispatchConfig {
    /// Scores closer than this are ties (default: 1e-9).
    #[serde(default = "default_tie_epsilon")]
    pub tie_epsilon: f64,
    /// Score used when neither the task nor the employee has skills (default: 0.5).
    #[serde(default = "default_neutral_score")]
    pub neutral_skill_score: f64,
    /// Error rate before trait adjustments (default: 0.05).
    #[serde(default = "default_base_error_rate")]
    pub base_error_rate: f64,
    /// KPI snapshots kept in the world (default: 336).
    #[serde(default = "default_kpi_history_limit")]
    pub kpi_history_limit: usize,
    /// Warnings kept in the world (default: 200).
    #[serde(default = "default_warning_limit")]
    pub warning_limit: usize,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            tie_epsilon: default_tie_epsilon(),
            neutral_skill_score: default_neutral_score(),
            base_error_rate: default_base_error_rate(),
            kpi_history_limit: default_kpi_history_limit(),
            warning_limit: default_warning_limit(),
        }
    }
}

// ---------------------------------------------------------------------------
// Default value functions (required by serde)
// ---------------------------------------------------------------------------

const fn default_scan_cooldown_days() -> u64 {
    30
}
const fn default_pool_size() -> u32 {
    16
}
const fn default_wage_offset() -> f64 {
    10.0
}
const fn default_wage_skill_multiplier() -> f64 {
    20.0
}
const fn default_main_skill_range() -> (f64, f64) {
    (0.25, 0.9)
}
const fn default_secondary_skill_range() -> (f64, f64) {
    (0.05, 0.6)
}
const fn default_max_traits() -> u32 {
    2
}
fn default_skill_universe() -> Vec<String> {
    ["gardening", "maintenance", "cleanliness", "logistics", "administration"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}
fn default_fallback_skills() -> Vec<String> {
    ["cleanliness", "logistics"]
        .into_iter()
        .map(str::to_owned)
        .collect()
}
const fn default_starting_morale() -> f64 {
    0.75
}
const fn default_hours_per_day() -> f64 {
    8.0
}
const fn default_overtime_hours() -> f64 {
    2.0
}
const fn default_days_per_week() -> u8 {
    5
}
const fn default_min_employment_days() -> u64 {
    180
}
const fn default_raise_cooldown_days() -> u64 {
    225
}
const fn default_raise_jitter_days() -> u64 {
    45
}
const fn default_accept_effect() -> RaiseEffect {
    RaiseEffect {
        rate_increase: 0.05,
        morale_delta: 0.06,
    }
}
const fn default_bonus_effect() -> RaiseEffect {
    RaiseEffect {
        rate_increase: 0.02,
        morale_delta: 0.03,
    }
}
const fn default_ignore_effect() -> RaiseEffect {
    RaiseEffect {
        rate_increase: 0.0,
        morale_delta: -0.08,
    }
}
const fn default_morale_ripple() -> f64 {
    -0.02
}
const fn default_max_ripple() -> f64 {
    0.2
}
const fn default_fatigue_per_minute() -> f64 {
    0.001
}
const fn default_break_recovery_per_minute() -> f64 {
    0.004
}
const fn default_overtime_morale_per_minute() -> f64 {
    0.0005
}
const fn default_overtime_morale_daily_cap() -> f64 {
    0.05
}
const fn default_overnight_recovery() -> f64 {
    0.3
}
const fn default_experience_ceiling_hours() -> f64 {
    2000.0
}
const fn default_tie_epsilon() -> f64 {
    1e-9
}
const fn default_neutral_score() -> f64 {
    0.5
}
const fn default_base_error_rate() -> f64 {
    0.05
}
const fn default_kpi_history_limit() -> usize {
    336
}
const fn default_warning_limit() -> usize {
    200
}
