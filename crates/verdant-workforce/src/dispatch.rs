//! Dispatch: assign scheduled tasks to employees under capacity limits.
//!
//! Entries are visited in [`compare_schedule_entries`] order. For each one
//! the dispatcher collects the employees of the task's structure holding
//! the required role, scores them, drops the ones whose trait-adjusted
//! demand exceeds their remaining regular plus overtime minutes, and picks
//! the best `score x availability`. Near-ties rotate by
//! `(tick + structure index) mod ties` over the lexically sorted ids.
//!
//! A task that cannot be placed stays `queued`; dispatch never fails.
//!
//! [`compare_schedule_entries`]: crate::scheduler::compare_schedule_entries

use rust_decimal::Decimal;
use tracing::{debug, trace};
use verdant_ledger::{PayrollLedger, PayrollRateInputs, compute_contribution};
use verdant_types::{
    DeviceId, Employee, EmployeeId, EmployeeSchedule, StructureId, TaskContext, TaskId,
    TaskStatus, WarningCode, WorkforceState, WorkforceTaskDefinition, ZoneId,
};

use crate::config::WorkforceConfig;
use crate::scheduler::{LocationIndex, ScheduleIssue, build_schedule};
use crate::traits::{TraitEffectBase, TraitEffectContext, TraitEffectOutcome, TraitRegistry};
use crate::wellbeing::{WorkMinutes, accrue_experience, apply_work};

/// Capacity left within this tolerance still counts as enough.
const CAPACITY_TOLERANCE: f64 = 1e-9;

/// Read-only inputs of one dispatch pass.
#[derive(Debug, Clone, Copy)]
pub struct DispatchContext<'a> {
    /// Current tick.
    pub tick: u64,
    /// Current day index.
    pub day_index: u64,
    /// Company lookup tables.
    pub index: &'a LocationIndex,
    /// Trait registry.
    pub registry: &'a TraitRegistry,
    /// Workforce configuration.
    pub config: &'a WorkforceConfig,
}

/// A committed task-to-employee assignment.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskAssignment {
    /// Task.
    pub task_id: TaskId,
    /// Task code.
    pub task_code: String,
    /// Assignee.
    pub employee_id: EmployeeId,
    /// Structure the work happened in.
    pub structure_id: StructureId,
    /// Regular minutes used.
    pub base_minutes: f64,
    /// Overtime minutes used.
    pub overtime_minutes: f64,
    /// Skill match score of the assignee.
    pub score: f64,
    /// Trait-adjusted error rate.
    pub error_rate01: f64,
    /// Trait-adjusted XP multiplier.
    pub xp_multiplier: f64,
    /// Device wear multiplier, for device tasks.
    pub device_wear_multiplier: f64,
    /// Serviced device, for device tasks.
    pub device: Option<(DeviceId, ZoneId)>,
    /// Payroll cost of the regular minutes.
    pub base_cost: Decimal,
    /// Payroll cost of the overtime minutes.
    pub overtime_cost: Decimal,
}

/// Everything one dispatch pass produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DispatchOutcome {
    /// Assignments in commit order.
    pub assignments: Vec<TaskAssignment>,
    /// Tasks skipped for data problems.
    pub issues: Vec<ScheduleIssue>,
    /// Tasks skipped because their zone is quarantined.
    pub quarantined: u32,
    /// Tasks that found no feasible employee.
    pub unassigned: u32,
}

impl DispatchOutcome {
    /// Regular minutes committed.
    pub fn base_minutes(&self) -> f64 {
        self.assignments.iter().map(|a| a.base_minutes).sum()
    }

    /// Overtime minutes committed.
    pub fn overtime_minutes(&self) -> f64 {
        self.assignments.iter().map(|a| a.overtime_minutes).sum()
    }
}

/// A scheduled task, detached from the queue borrow.
#[derive(Debug, Clone)]
struct PendingTask {
    queue_index: usize,
    task_id: TaskId,
    context: TaskContext,
    definition: WorkforceTaskDefinition,
    structure_id: StructureId,
    structure_index: usize,
    demand_minutes: f64,
}

/// A feasible employee for one task.
#[derive(Debug, Clone)]
struct Candidate {
    roster_index: usize,
    employee_id: EmployeeId,
    score: f64,
    value: f64,
    remaining_base: f64,
    effects: TraitEffectOutcome,
}

/// Minutes left today.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capacity {
    /// Regular minutes left.
    pub remaining_base: f64,
    /// Overtime minutes left.
    pub remaining_overtime: f64,
    /// Regular plus overtime minutes contracted today.
    pub total: f64,
}

impl Capacity {
    /// Regular plus overtime minutes left.
    pub fn remaining(self) -> f64 {
        self.remaining_base + self.remaining_overtime
    }

    /// Share of today's capacity still free, zero on a day off.
    pub fn availability(self) -> f64 {
        if self.total > 0.0 {
            (self.remaining() / self.total).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

/// Whether `day` is a working day for `schedule`.
pub fn is_working_day(schedule: &EmployeeSchedule, day: u64) -> bool {
    day.checked_rem(7)
        .is_some_and(|weekday| weekday < u64::from(schedule.days_per_week))
}

/// Minutes left for `employee` on `day`. Usage must already belong to `day`.
pub fn remaining_capacity(employee: &Employee, day: u64) -> Capacity {
    if !is_working_day(&employee.schedule, day) {
        return Capacity {
            remaining_base: 0.0,
            remaining_overtime: 0.0,
            total: 0.0,
        };
    }
    let base = (employee.schedule.hours_per_day * 60.0).max(0.0);
    let overtime = (employee.schedule.overtime_hours_per_day * 60.0).max(0.0);
    Capacity {
        remaining_base: (base - employee.usage.base_minutes).max(0.0),
        remaining_overtime: (overtime - employee.usage.overtime_minutes).max(0.0),
        total: base + overtime,
    }
}

/// Skill match of `employee` against `definition`.
///
/// `None` if any required skill is below its threshold. With no required
/// skills the score is the employee's average skill, or `neutral` when they
/// have none.
pub fn skill_match_score(
    employee: &Employee,
    definition: &WorkforceTaskDefinition,
    neutral: f64,
) -> Option<f64> {
    if definition.required_skills.is_empty() {
        return Some(employee.average_skill().unwrap_or(neutral));
    }
    let mut sum = 0.0;
    for requirement in &definition.required_skills {
        let level = employee.skill_level(&requirement.skill);
        if level < requirement.min_level01 {
            return None;
        }
        sum += level;
    }
    #[allow(clippy::cast_precision_loss)]
    let count = definition.required_skills.len() as f64;
    Some(sum / count)
}

/// Run one dispatch pass over the queued tasks of `workforce`.
///
/// `workforce.employees` usage must already belong to `ctx.day_index`.
pub fn dispatch(
    workforce: &mut WorkforceState,
    ledger: &mut PayrollLedger,
    ctx: &DispatchContext<'_>,
) -> DispatchOutcome {
    let plan = build_schedule(workforce, ctx.index);
    let mut outcome = DispatchOutcome {
        issues: plan.issues,
        ..DispatchOutcome::default()
    };
    let pending: Vec<PendingTask> = plan
        .entries
        .into_iter()
        .map(|entry| PendingTask {
            queue_index: entry.queue_index,
            task_id: entry.task.id.clone(),
            context: entry.task.context.clone(),
            definition: entry.definition.clone(),
            structure_id: entry.structure_id,
            structure_index: entry.structure_index,
            demand_minutes: entry.demand_minutes,
        })
        .collect();

    for task in &pending {
        if ctx.index.is_quarantined(&task.context, ctx.tick) {
            trace!(task = %task.task_id, "zone quarantined, task stays queued");
            outcome.quarantined = outcome.quarantined.saturating_add(1);
            continue;
        }
        let Some(chosen) = select_candidate(workforce, task, ctx) else {
            outcome.unassigned = outcome.unassigned.saturating_add(1);
            continue;
        };
        match commit(workforce, ledger, task, &chosen, ctx) {
            Ok(assignment) => outcome.assignments.push(assignment),
            Err(issue) => outcome.issues.push(issue),
        }
    }

    debug!(
        tick = ctx.tick,
        assigned = outcome.assignments.len(),
        unassigned = outcome.unassigned,
        quarantined = outcome.quarantined,
        "dispatch complete"
    );
    outcome
}

fn select_candidate(
    workforce: &WorkforceState,
    task: &PendingTask,
    ctx: &DispatchContext<'_>,
) -> Option<Candidate> {
    let skills: Vec<String> = task
        .definition
        .required_skills
        .iter()
        .map(|s| s.skill.clone())
        .collect();
    let effect_context = TraitEffectContext {
        category: Some(task.definition.category),
        skills: &skills,
        device_task: matches!(task.context, TaskContext::Device { .. }),
    };
    let base = TraitEffectBase {
        duration_minutes: task.demand_minutes,
        error_rate01: ctx.config.dispatch.base_error_rate,
    };

    let mut feasible: Vec<Candidate> = Vec::new();
    for (roster_index, employee) in workforce.employees.iter().enumerate() {
        if employee.assigned_structure_id != task.structure_id {
            continue;
        }
        let holds_role = workforce
            .role(&employee.role_id)
            .is_some_and(|role| role.slug == task.definition.required_role_slug);
        if !holds_role {
            continue;
        }
        let Some(score) = skill_match_score(
            employee,
            &task.definition,
            ctx.config.dispatch.neutral_skill_score,
        ) else {
            continue;
        };
        let effects = ctx.registry.compose(&employee.traits, &effect_context, base);
        let capacity = remaining_capacity(employee, ctx.day_index);
        if effects.adjusted_duration_minutes > capacity.remaining() + CAPACITY_TOLERANCE {
            continue;
        }
        feasible.push(Candidate {
            roster_index,
            employee_id: employee.id.clone(),
            score,
            value: score * capacity.availability(),
            remaining_base: capacity.remaining_base,
            effects,
        });
    }

    pick_with_rotation(feasible, ctx.tick, task.structure_index, ctx.config.dispatch.tie_epsilon)
}

/// Highest value wins; values within `epsilon` of the best rotate by
/// `(tick + structure_index) mod ties` over lexically sorted ids.
fn pick_with_rotation(
    feasible: Vec<Candidate>,
    tick: u64,
    structure_index: usize,
    epsilon: f64,
) -> Option<Candidate> {
    let best = feasible
        .iter()
        .map(|c| c.value)
        .fold(f64::NEG_INFINITY, f64::max);
    let mut ties: Vec<Candidate> = feasible
        .into_iter()
        .filter(|c| c.value >= best - epsilon)
        .collect();
    ties.sort_by(|a, b| a.employee_id.cmp(&b.employee_id));
    let count = u64::try_from(ties.len()).ok()?;
    let rotation = tick
        .wrapping_add(u64::try_from(structure_index).unwrap_or(0))
        .checked_rem(count)?;
    let position = usize::try_from(rotation).ok()?;
    if position < ties.len() {
        Some(ties.swap_remove(position))
    } else {
        None
    }
}

fn commit(
    workforce: &mut WorkforceState,
    ledger: &mut PayrollLedger,
    task: &PendingTask,
    chosen: &Candidate,
    ctx: &DispatchContext<'_>,
) -> Result<TaskAssignment, ScheduleIssue> {
    let demand = chosen.effects.adjusted_duration_minutes;
    let minutes = WorkMinutes {
        base: demand.min(chosen.remaining_base).max(0.0),
        overtime: (demand - chosen.remaining_base).max(0.0),
    };

    let rejected = |message: String| ScheduleIssue {
        code: WarningCode::PayrollRejected,
        task_id: task.task_id.to_string(),
        message,
    };

    let employee = workforce
        .employees
        .get(chosen.roster_index)
        .ok_or_else(|| rejected(format!("employee {} left the roster", chosen.employee_id)))?;
    let compensation = workforce
        .role(&employee.role_id)
        .map(|role| role.compensation.clone())
        .unwrap_or_default();
    let inputs = PayrollRateInputs {
        hourly_base: compensation.hourly_base,
        skill_rate: compensation.skill_rate,
        skill_level: employee.average_skill().unwrap_or(0.0),
        location_index: ctx.config.payroll.location_index_for(&task.structure_id),
        role_multiplier: compensation.rate_multiplier,
        employee_multiplier: employee.base_rate_multiplier,
        labor_market_factor: employee.labor_market_factor,
        experience_level01: employee.experience.level01,
        time_premium: employee.time_premium_multiplier,
    };
    let contribution = compute_contribution(
        &task.structure_id,
        &inputs,
        minutes.base,
        minutes.overtime,
        &ctx.config.payroll,
    )
    .map_err(|e| rejected(format!("task {} not priced: {e}", task.task_id)))?;

    let status_ok = workforce
        .task_queue
        .get(task.queue_index)
        .is_some_and(|t| t.status.can_transition_to(TaskStatus::Completed));
    if !status_ok {
        return Err(ScheduleIssue {
            code: WarningCode::InvalidTaskTransition,
            task_id: task.task_id.to_string(),
            message: format!("task {} cannot complete from its current status", task.task_id),
        });
    }

    ledger
        .accrue(&contribution)
        .map_err(|e| rejected(format!("task {} rejected by ledger: {e}", task.task_id)))?;

    if let Some(employee) = workforce.employees.get_mut(chosen.roster_index) {
        employee.usage.base_minutes += minutes.base;
        employee.usage.overtime_minutes += minutes.overtime;
        apply_work(
            employee,
            minutes,
            task.definition.category,
            &chosen.effects,
            &ctx.config.wellbeing,
        );
        accrue_experience(
            employee,
            minutes.total(),
            chosen.effects.xp_rate_multiplier,
            &ctx.config.wellbeing,
        );
    }
    if let Some(instance) = workforce.task_queue.get_mut(task.queue_index) {
        instance.status = TaskStatus::Completed;
        instance.assigned_employee_id = Some(chosen.employee_id.clone());
        instance.completed_at_tick = Some(ctx.tick);
    }

    let device = match &task.context {
        TaskContext::Device {
            device_id, zone_id, ..
        } => Some((device_id.clone(), zone_id.clone())),
        _ => None,
    };

    Ok(TaskAssignment {
        task_id: task.task_id.clone(),
        task_code: task.definition.task_code.clone(),
        employee_id: chosen.employee_id.clone(),
        structure_id: task.structure_id.clone(),
        base_minutes: minutes.base,
        overtime_minutes: minutes.overtime,
        score: chosen.score,
        error_rate01: chosen.effects.error_rate01,
        xp_multiplier: chosen.effects.xp_rate_multiplier,
        device_wear_multiplier: chosen.effects.device_wear_multiplier,
        device,
        base_cost: contribution.base_cost,
        overtime_cost: contribution.overtime_cost,
    })
}
