//! Workforce data model: roles, employees, tasks, market and payroll state.
//!
//! These are plain data. Every behaviour lives in `verdant-workforce` and
//! `verdant-ledger`; this module only carries what the snapshot stores.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::enums::{TaskCategory, TaskCostBasis, TaskStatus, TraitKind, WarningCode};
use crate::ids::{
    CandidateId, DeviceId, EmployeeId, EmployeeRngSeed, RoleId, RoomId, StructureId, TaskId,
    ZoneId,
};

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// A job role from the static catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeRole {
    /// Role identifier.
    pub id: RoleId,
    /// Slug task definitions match against (e.g. `"gardener"`).
    pub slug: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Skills the role leans on. Candidates draw their main skill from here.
    #[serde(default)]
    pub core_skills: Vec<RoleSkill>,
    /// Pay parameters.
    #[serde(default)]
    pub compensation: RoleCompensation,
}

/// A core skill of a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleSkill {
    /// Skill key.
    pub skill: String,
    /// Minimum level a hire is expected to bring.
    #[serde(default)]
    pub min_level01: f64,
}

/// Hourly pay parameters for a role.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleCompensation {
    /// Base hourly rate before skill.
    #[serde(default = "default_hourly_base")]
    pub hourly_base: f64,
    /// Additional hourly rate per unit of skill level.
    #[serde(default = "default_skill_rate")]
    pub skill_rate: f64,
    /// Role multiplier applied on top of the computed rate.
    #[serde(default = "default_one")]
    pub rate_multiplier: f64,
}

impl Default for RoleCompensation {
    fn default() -> Self {
        Self {
            hourly_base: default_hourly_base(),
            skill_rate: default_skill_rate(),
            rate_multiplier: 1.0,
        }
    }
}

const fn default_hourly_base() -> f64 {
    12.0
}

const fn default_skill_rate() -> f64 {
    8.0
}

const fn default_one() -> f64 {
    1.0
}

// ---------------------------------------------------------------------------
// Employees
// ---------------------------------------------------------------------------

/// A single skill value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillValue {
    /// Skill key.
    pub skill: String,
    /// Level in `[0, 1]`.
    pub level01: f64,
}

/// Main skill plus two secondary skills, as generated by the hiring market.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillTriad {
    /// Strongest skill.
    pub main: SkillValue,
    /// Two weaker skills.
    pub secondary: [SkillValue; 2],
}

impl SkillTriad {
    /// All three skills, main first.
    pub fn iter(&self) -> impl Iterator<Item = &SkillValue> {
        core::iter::once(&self.main).chain(self.secondary.iter())
    }
}

/// A trait carried at a given strength.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitAssignment {
    /// Which trait.
    pub trait_id: TraitKind,
    /// Strength in `[0, 1]`, within the trait's declared range.
    pub strength01: f64,
}

/// Working hours an employee is contracted for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeSchedule {
    /// Regular hours per working day.
    pub hours_per_day: f64,
    /// Overtime hours available per working day.
    #[serde(default)]
    pub overtime_hours_per_day: f64,
    /// Working days per seven-day week.
    #[serde(default = "default_days_per_week")]
    pub days_per_week: u8,
}

const fn default_days_per_week() -> u8 {
    5
}

impl Default for EmployeeSchedule {
    fn default() -> Self {
        Self {
            hours_per_day: 8.0,
            overtime_hours_per_day: 0.0,
            days_per_week: default_days_per_week(),
        }
    }
}

/// Accumulated experience.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeExperience {
    /// Experience hours accrued.
    pub hours_accrued: f64,
    /// Normalised level in `[0, 1]`.
    pub level01: f64,
}

/// Raise cadence bookkeeping.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRaiseState {
    /// Number of raise decisions taken so far.
    pub cadence_sequence: u32,
    /// Day of the last decision.
    pub last_raise_day: Option<u64>,
    /// First day the next decision may be taken.
    pub next_eligible_day: Option<u64>,
}

/// Minutes worked on one simulation day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDayUsage {
    /// Day the counters belong to.
    pub day_index: u64,
    /// Regular minutes used.
    pub base_minutes: f64,
    /// Overtime minutes used.
    pub overtime_minutes: f64,
    /// Morale already deducted for overtime today.
    pub overtime_morale_penalty: f64,
}

/// An employee on the active roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Employee identifier.
    pub id: EmployeeId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Role identifier.
    pub role_id: RoleId,
    /// Seed for per-employee RNG streams.
    pub rng_seed: EmployeeRngSeed,
    /// Structure the employee works in.
    pub assigned_structure_id: StructureId,
    /// Morale in `[0, 1]`.
    pub morale01: f64,
    /// Fatigue in `[0, 1]`.
    pub fatigue01: f64,
    /// Skill levels keyed by skill.
    #[serde(default)]
    pub skills: BTreeMap<String, f64>,
    /// Skill bundle the employee was hired with.
    #[serde(default)]
    pub skill_triad: Option<SkillTriad>,
    /// Trait assignments.
    #[serde(default)]
    pub traits: Vec<TraitAssignment>,
    /// Contracted hours.
    #[serde(default)]
    pub schedule: EmployeeSchedule,
    /// Experience.
    #[serde(default)]
    pub experience: EmployeeExperience,
    /// Employee-specific multiplier on the hourly rate.
    #[serde(default = "default_one")]
    pub base_rate_multiplier: f64,
    /// Labour market factor at hire time.
    #[serde(default = "default_one")]
    pub labor_market_factor: f64,
    /// Premium for unsociable hours.
    #[serde(default = "default_one")]
    pub time_premium_multiplier: f64,
    /// Simulation day the employee started.
    #[serde(default)]
    pub employment_start_day: u64,
    /// Hourly rate the employee expects.
    #[serde(default)]
    pub salary_expectation_per_hour: f64,
    /// Raise cadence.
    #[serde(default)]
    pub raise_state: EmployeeRaiseState,
    /// Minutes used on the current day.
    #[serde(default)]
    pub usage: EmployeeDayUsage,
}

impl Employee {
    /// Level of a skill, zero when the employee lacks it.
    pub fn skill_level(&self, skill: &str) -> f64 {
        self.skills.get(skill).copied().unwrap_or(0.0)
    }

    /// Mean of all skill levels, `None` if the employee has no skills.
    pub fn average_skill(&self) -> Option<f64> {
        if self.skills.is_empty() {
            return None;
        }
        let sum: f64 = self.skills.values().sum();
        #[allow(clippy::cast_precision_loss)]
        let count = self.skills.len() as f64;
        Some(sum / count)
    }
}

// ---------------------------------------------------------------------------
// Tasks
// ---------------------------------------------------------------------------

/// Skill gate on a task definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillRequirement {
    /// Skill key.
    pub skill: String,
    /// Candidates below this level are disqualified.
    #[serde(default)]
    pub min_level01: f64,
}

/// Labour demand model of a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskCostModel {
    /// What the minutes scale with.
    pub basis: TaskCostBasis,
    /// Minutes per unit of basis.
    pub labor_minutes: f64,
}

/// Immutable catalog entry describing a kind of task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkforceTaskDefinition {
    /// Task code instances refer to.
    pub task_code: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Category.
    #[serde(default)]
    pub category: TaskCategory,
    /// Role slug an assignee must hold.
    pub required_role_slug: String,
    /// Skill gates.
    #[serde(default)]
    pub required_skills: Vec<SkillRequirement>,
    /// Higher runs first.
    #[serde(default)]
    pub priority: i32,
    /// Labour demand.
    pub cost_model: TaskCostModel,
}

/// Routing and demand context attached to a task instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scope", rename_all = "snake_case")]
pub enum TaskContext {
    /// Work on a whole structure.
    Structure {
        /// Target structure.
        structure_id: StructureId,
    },
    /// Work in a room.
    Room {
        /// Target room.
        room_id: RoomId,
        /// Explicit structure, if the producer knew it.
        #[serde(default)]
        structure_id: Option<StructureId>,
        /// Area override in square metres.
        #[serde(default)]
        area_m2: Option<f64>,
    },
    /// Work in a zone.
    Zone {
        /// Target zone.
        zone_id: ZoneId,
        /// Explicit structure, if the producer knew it.
        #[serde(default)]
        structure_id: Option<StructureId>,
        /// Plant count override.
        #[serde(default)]
        plant_count: Option<u32>,
        /// Area override in square metres.
        #[serde(default)]
        area_m2: Option<f64>,
    },
    /// Servicing a device.
    Device {
        /// Target device.
        device_id: DeviceId,
        /// Zone the device sits in.
        zone_id: ZoneId,
        /// Explicit structure, if the producer knew it.
        #[serde(default)]
        structure_id: Option<StructureId>,
    },
    /// No location; cannot be routed.
    Unscoped,
}

impl TaskContext {
    /// The explicitly named structure, if any.
    pub const fn explicit_structure(&self) -> Option<&StructureId> {
        match self {
            Self::Structure { structure_id } => Some(structure_id),
            Self::Room { structure_id, .. }
            | Self::Zone { structure_id, .. }
            | Self::Device { structure_id, .. } => structure_id.as_ref(),
            Self::Unscoped => None,
        }
    }

    /// The zone the task is scoped to, used for quarantine checks.
    pub const fn zone_id(&self) -> Option<&ZoneId> {
        match self {
            Self::Zone { zone_id, .. } | Self::Device { zone_id, .. } => Some(zone_id),
            Self::Structure { .. } | Self::Room { .. } | Self::Unscoped => None,
        }
    }
}

/// A unit of work in the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkforceTaskInstance {
    /// Task identifier.
    pub id: TaskId,
    /// Catalog task code.
    pub task_code: String,
    /// Lifecycle state.
    pub status: TaskStatus,
    /// Tick the task was created.
    pub created_at_tick: u64,
    /// Optional deadline tick.
    #[serde(default)]
    pub due_tick: Option<u64>,
    /// Employee the task is or was assigned to.
    #[serde(default)]
    pub assigned_employee_id: Option<EmployeeId>,
    /// Tick the task completed.
    #[serde(default)]
    pub completed_at_tick: Option<u64>,
    /// Routing and demand context.
    pub context: TaskContext,
}

// ---------------------------------------------------------------------------
// Hiring market
// ---------------------------------------------------------------------------

/// A generated, not-yet-hired prospective employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkforceMarketCandidate {
    /// Candidate identifier.
    pub id: CandidateId,
    /// Structure the candidate applied to.
    pub structure_id: StructureId,
    /// Role slug the candidate applied for.
    pub role_slug: String,
    /// Skill bundle.
    pub skills: SkillTriad,
    /// Traits.
    pub traits: Vec<TraitAssignment>,
    /// Hourly rate the candidate asks for.
    pub expected_base_rate_per_hour: f64,
    /// Scan counter of the scan that produced the candidate.
    pub valid_until_scan_counter: u32,
}

/// Market state for one structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkforceMarketStructureState {
    /// Day of the last scan.
    pub last_scan_day: Option<u64>,
    /// Monotonic scan counter.
    pub scan_counter: u32,
    /// Current candidate pool.
    pub pool: Vec<WorkforceMarketCandidate>,
}

/// Hiring market state across structures.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkforceMarketState {
    /// Per-structure state.
    #[serde(default)]
    pub structures: BTreeMap<StructureId, WorkforceMarketStructureState>,
}

// ---------------------------------------------------------------------------
// Payroll
// ---------------------------------------------------------------------------

/// Minute and cost totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollTotals {
    /// Regular minutes.
    pub base_minutes: Decimal,
    /// Overtime minutes.
    pub overtime_minutes: Decimal,
    /// Cost of regular minutes.
    pub base_cost: Decimal,
    /// Cost of overtime minutes.
    pub overtime_cost: Decimal,
    /// `base_cost + overtime_cost`.
    pub total_labor_cost: Decimal,
}

/// Running payroll for the current day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkforcePayrollState {
    /// Day the running totals belong to.
    pub day_index: u64,
    /// Company-wide totals.
    pub totals: PayrollTotals,
    /// Totals per structure.
    #[serde(default)]
    pub by_structure: BTreeMap<StructureId, PayrollTotals>,
}

/// A sealed, rounded payroll day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalizedPayrollDay {
    /// Day that was sealed.
    pub day_index: u64,
    /// Rounded company-wide totals.
    pub totals: PayrollTotals,
    /// Rounded totals per structure.
    pub by_structure: BTreeMap<StructureId, PayrollTotals>,
}

// ---------------------------------------------------------------------------
// KPIs and warnings
// ---------------------------------------------------------------------------

/// Per-tick workforce KPI snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkforceKpiSnapshot {
    /// Tick the snapshot was taken.
    pub tick: u64,
    /// Day index of the tick.
    pub day_index: u64,
    /// Active headcount.
    pub headcount: u32,
    /// Tasks completed this tick.
    pub tasks_completed: u32,
    /// Tasks still queued after dispatch.
    pub queue_depth: u32,
    /// Regular minutes dispatched this tick.
    pub labor_minutes: f64,
    /// Overtime minutes dispatched this tick.
    pub overtime_minutes: f64,
    /// Share of today's contracted minutes used so far.
    pub utilization01: f64,
    /// Mean morale.
    pub average_morale01: f64,
    /// Mean fatigue.
    pub average_fatigue01: f64,
}

/// Warning surfaced instead of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkforceWarning {
    /// Tick the warning was raised.
    pub tick: u64,
    /// Machine-readable code.
    pub code: WarningCode,
    /// Human-readable text.
    pub message: String,
    /// Related entity id, if any.
    #[serde(default)]
    pub subject_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// Everything the workforce subsystem owns inside a [`World`](crate::World).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkforceState {
    /// Role catalog.
    #[serde(default)]
    pub roles: Vec<EmployeeRole>,
    /// Active roster.
    #[serde(default)]
    pub employees: Vec<Employee>,
    /// Task catalog.
    #[serde(default)]
    pub task_definitions: Vec<WorkforceTaskDefinition>,
    /// Task queue in insertion order.
    #[serde(default)]
    pub task_queue: Vec<WorkforceTaskInstance>,
    /// KPI history, oldest first.
    #[serde(default)]
    pub kpis: Vec<WorkforceKpiSnapshot>,
    /// Recent warnings, oldest first.
    #[serde(default)]
    pub warnings: Vec<WorkforceWarning>,
    /// Running payroll.
    #[serde(default)]
    pub payroll: WorkforcePayrollState,
    /// Sealed payroll days, oldest first.
    #[serde(default)]
    pub payroll_history: Vec<FinalizedPayrollDay>,
    /// Hiring market.
    #[serde(default)]
    pub market: WorkforceMarketState,
}

impl WorkforceState {
    /// Find a role by id.
    pub fn role(&self, id: &RoleId) -> Option<&EmployeeRole> {
        self.roles.iter().find(|r| &r.id == id)
    }

    /// Find a role by slug.
    pub fn role_by_slug(&self, slug: &str) -> Option<&EmployeeRole> {
        self.roles.iter().find(|r| r.slug == slug)
    }

    /// Find a task definition by code.
    pub fn definition(&self, task_code: &str) -> Option<&WorkforceTaskDefinition> {
        self.task_definitions.iter().find(|d| d.task_code == task_code)
    }

    /// Find an employee by id.
    pub fn employee(&self, id: &EmployeeId) -> Option<&Employee> {
        self.employees.iter().find(|e| &e.id == id)
    }
}
