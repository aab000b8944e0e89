//! The workforce tick.
//!
//! [`process_tick`] advances the workforce by one tick over an immutable
//! input state and returns the next state plus everything that happened.
//!
//! # Order of operations
//!
//! 1. Payroll day rollover: seal the previous day, start a zeroed ledger
//! 2. Per-employee day usage reset with overnight recovery
//! 3. Intents in submission order
//! 4. Dispatch
//! 5. KPI snapshot, payroll snapshot, warnings

use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use verdant_ledger::PayrollLedger;
use verdant_types::{
    Company, FinalizedPayrollDay, PayrollTotals, TaskStatus, WarningCode, WorkforceIntent,
    WorkforceState, WorkforceWarning, day_index_for,
};

use crate::config::WorkforceConfig;
use crate::dispatch::{DispatchContext, TaskAssignment, dispatch};
use crate::events::WorkforceEvent;
use crate::kpi::{push_bounded, snapshot};
use crate::market::{ScanRequest, onboard_candidate, perform_hire, perform_scan};
use crate::raises::{RaiseOverrides, apply_raise, is_raise_eligible};
use crate::scheduler::{LocationIndex, ScheduleIssue};
use crate::termination::terminate_employee;
use crate::traits::TraitRegistry;
use crate::wellbeing::reset_day_usage;

/// Inputs of one workforce tick.
#[derive(Debug, Clone, Copy)]
pub struct WorkforceTickInput<'a> {
    /// Current tick.
    pub tick: u64,
    /// Simulation time in hours after the clock advanced.
    pub sim_hours: f64,
    /// Hours per simulation day.
    pub hours_per_day: f64,
    /// World seed.
    pub seed: &'a str,
    /// Company tree.
    pub company: &'a Company,
    /// Intents to apply, in submission order.
    pub intents: &'a [WorkforceIntent],
    /// Trait registry.
    pub registry: &'a TraitRegistry,
    /// Workforce configuration.
    pub config: &'a WorkforceConfig,
}

/// Payroll accrued during one tick, read by the economy stage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PayrollAccrualSnapshot {
    /// Day the accrual belongs to.
    pub day_index: u64,
    /// Regular cost accrued this tick.
    pub base_cost: Decimal,
    /// Overtime cost accrued this tick.
    pub overtime_cost: Decimal,
    /// `base_cost + overtime_cost`.
    pub total_labor_cost: Decimal,
    /// Running totals of the day after this tick.
    pub running: PayrollTotals,
    /// Day sealed at the start of this tick, if any.
    pub finalized: Option<FinalizedPayrollDay>,
}

/// Output of one workforce tick.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkforceTickResult {
    /// Next workforce state.
    pub workforce: WorkforceState,
    /// Committed assignments.
    pub assignments: Vec<TaskAssignment>,
    /// Events in the order they happened.
    pub events: Vec<WorkforceEvent>,
    /// Payroll accrual for the economy stage.
    pub payroll: PayrollAccrualSnapshot,
}

/// Collects warnings and events during a tick.
struct TickLog<'a> {
    tick: u64,
    limit: usize,
    events: Vec<WorkforceEvent>,
    workforce: &'a mut WorkforceState,
}

impl TickLog<'_> {
    fn warn(&mut self, code: WarningCode, subject: Option<String>, message: String) {
        warn!(tick = self.tick, ?code, subject = subject.as_deref().unwrap_or(""), "{message}");
        let warning = WorkforceWarning {
            tick: self.tick,
            code,
            message,
            subject_id: subject,
        };
        push_bounded(&mut self.workforce.warnings, warning.clone(), self.limit);
        self.events.push(WorkforceEvent::Warning(warning));
    }

    /// Scheduling issues persist while the data is wrong; report each once.
    fn warn_issue(&mut self, issue: ScheduleIssue) {
        let known = self.workforce.warnings.iter().any(|w| {
            w.code == issue.code && w.subject_id.as_deref() == Some(issue.task_id.as_str())
        });
        if !known {
            self.warn(issue.code, Some(issue.task_id), issue.message);
        }
    }
}

/// Advance the workforce by one tick.
pub fn process_tick(state: &WorkforceState, input: &WorkforceTickInput<'_>) -> WorkforceTickResult {
    let config = input.config;
    let day = day_index_for(input.sim_hours, input.hours_per_day);
    let mut workforce = state.clone();

    // 1. Payroll rollover
    let mut ledger = PayrollLedger::from_state(workforce.payroll.clone())
        .with_currency_scale(config.payroll.currency_scale);
    let finalized = ledger.roll_to_day(day);
    let mut events = Vec::new();
    if let Some(sealed) = &finalized {
        info!(
            day = sealed.day_index,
            total = %sealed.totals.total_labor_cost,
            "payroll day sealed"
        );
        workforce.payroll_history.push(sealed.clone());
        workforce.task_queue.retain(|t| !t.status.is_terminal());
        events.push(WorkforceEvent::PayrollFinalized(sealed.clone()));
    }

    // 2. Day usage
    for employee in &mut workforce.employees {
        reset_day_usage(employee, day, &config.wellbeing);
    }

    let mut log = TickLog {
        tick: input.tick,
        limit: config.dispatch.warning_limit,
        events,
        workforce: &mut workforce,
    };

    // 3. Intents
    for intent in input.intents {
        apply_intent(&mut log, intent, day, input);
    }

    // 4. Dispatch
    let index = LocationIndex::build(input.company);
    let outcome = dispatch(
        log.workforce,
        &mut ledger,
        &DispatchContext {
            tick: input.tick,
            day_index: day,
            index: &index,
            registry: input.registry,
            config,
        },
    );
    for issue in outcome.issues.iter().cloned() {
        log.warn_issue(issue);
    }
    for assignment in &outcome.assignments {
        log.events.push(WorkforceEvent::TaskDispatched {
            task_id: assignment.task_id.clone(),
            task_code: assignment.task_code.clone(),
            employee_id: assignment.employee_id.clone(),
            structure_id: assignment.structure_id.clone(),
            base_minutes: assignment.base_minutes,
            overtime_minutes: assignment.overtime_minutes,
            error_rate01: assignment.error_rate01,
        });
        if let Some((device_id, zone_id)) = &assignment.device {
            log.events.push(WorkforceEvent::DeviceMaintenance {
                device_id: device_id.clone(),
                zone_id: zone_id.clone(),
                task_id: assignment.task_id.clone(),
                employee_id: assignment.employee_id.clone(),
                device_wear_multiplier: assignment.device_wear_multiplier,
            });
        }
    }

    // 5. KPIs and payroll snapshot
    let kpi = snapshot(log.workforce, input.tick, day, &outcome);
    push_bounded(
        &mut log.workforce.kpis,
        kpi.clone(),
        config.dispatch.kpi_history_limit,
    );
    log.events.push(WorkforceEvent::Kpi(kpi));

    let base_cost: Decimal = outcome.assignments.iter().map(|a| a.base_cost).sum();
    let overtime_cost: Decimal = outcome.assignments.iter().map(|a| a.overtime_cost).sum();
    let running = ledger.state().totals.clone();
    let tick_labor_cost = base_cost.saturating_add(overtime_cost);
    log.events.push(WorkforceEvent::PayrollSnapshot {
        day_index: day,
        totals: running.clone(),
        tick_labor_cost,
    });

    let events = log.events;
    workforce.payroll = ledger.into_state();

    debug!(
        tick = input.tick,
        day,
        assigned = outcome.assignments.len(),
        events = events.len(),
        "workforce tick complete"
    );

    WorkforceTickResult {
        workforce,
        assignments: outcome.assignments,
        events,
        payroll: PayrollAccrualSnapshot {
            day_index: day,
            base_cost,
            overtime_cost,
            total_labor_cost: tick_labor_cost,
            running,
            finalized,
        },
    }
}

fn apply_intent(
    log: &mut TickLog<'_>,
    intent: &WorkforceIntent,
    day: u64,
    input: &WorkforceTickInput<'_>,
) {
    let config = input.config;
    match intent {
        WorkforceIntent::EnqueueTask { task } => {
            if task.status != TaskStatus::Queued {
                log.warn(
                    WarningCode::InvalidTaskTransition,
                    Some(task.id.to_string()),
                    format!("task {} must be enqueued as queued", task.id),
                );
            } else if log.workforce.task_queue.iter().any(|t| t.id == task.id) {
                log.warn(
                    WarningCode::InvalidTaskTransition,
                    Some(task.id.to_string()),
                    format!("task {} is already in the queue", task.id),
                );
            } else {
                log.workforce.task_queue.push(task.clone());
            }
        }

        WorkforceIntent::CancelTask { task_id } => {
            let Some(task) = log.workforce.task_queue.iter_mut().find(|t| &t.id == task_id) else {
                log.warn(
                    WarningCode::UnknownTask,
                    Some(task_id.to_string()),
                    format!("cannot cancel unknown task {task_id}"),
                );
                return;
            };
            if task.status.can_transition_to(TaskStatus::Cancelled) {
                task.status = TaskStatus::Cancelled;
            } else {
                log.warn(
                    WarningCode::InvalidTaskTransition,
                    Some(task_id.to_string()),
                    format!("task {task_id} is already terminal"),
                );
            }
        }

        WorkforceIntent::ScanMarket { structure_id } => {
            let outcome = perform_scan(
                &log.workforce.market,
                &config.market,
                input.registry,
                &ScanRequest {
                    seed: input.seed,
                    structure_id,
                    sim_hours: input.sim_hours,
                    hours_per_day: input.hours_per_day,
                    roles: &log.workforce.roles,
                },
            );
            if !outcome.did_scan {
                log.warn(
                    WarningCode::ScanCooldown,
                    Some(structure_id.to_string()),
                    format!("market scan for {structure_id} is cooling down"),
                );
            }
            log.events.push(WorkforceEvent::MarketScan {
                structure_id: structure_id.clone(),
                did_scan: outcome.did_scan,
                scan_counter: outcome.scan_counter,
                pool_size: outcome.pool.as_ref().map_or(0, Vec::len),
            });
            log.workforce.market = outcome.market;
        }

        WorkforceIntent::Hire {
            structure_id,
            candidate_id,
        } => {
            let outcome = perform_hire(&log.workforce.market, structure_id, candidate_id);
            let Some(candidate) = outcome.candidate else {
                log.warn(
                    WarningCode::UnknownCandidate,
                    Some(candidate_id.to_string()),
                    format!("candidate {candidate_id} is not in the pool of {structure_id}"),
                );
                return;
            };
            let Some(role) = log.workforce.role_by_slug(&candidate.role_slug).cloned() else {
                log.warn(
                    WarningCode::UnknownRole,
                    Some(candidate_id.to_string()),
                    format!("candidate {candidate_id} applied for unknown role {}", candidate.role_slug),
                );
                return;
            };
            let employee =
                onboard_candidate(&candidate, &role, input.seed, day, &config.market, &config.raises);
            log.events.push(WorkforceEvent::EmployeeOnboarded {
                employee_id: employee.id.clone(),
                candidate_id: candidate.id.clone(),
                structure_id: employee.assigned_structure_id.clone(),
                role_id: role.id.clone(),
                expected_rate_per_hour: candidate.expected_base_rate_per_hour,
            });
            log.workforce.market = outcome.market;
            log.workforce.employees.push(employee);
        }

        WorkforceIntent::Raise {
            employee_id,
            decision,
            rate_increase,
            morale_delta,
        } => {
            let Some(employee) = log
                .workforce
                .employees
                .iter_mut()
                .find(|e| &e.id == employee_id)
            else {
                log.warn(
                    WarningCode::UnknownEmployee,
                    Some(employee_id.to_string()),
                    format!("raise for unknown employee {employee_id}"),
                );
                return;
            };
            if !is_raise_eligible(employee, day, &config.raises) {
                log.warn(
                    WarningCode::RaiseNotEligible,
                    Some(employee_id.to_string()),
                    format!("employee {employee_id} is not eligible for a raise on day {day}"),
                );
                return;
            }
            let applied = apply_raise(
                employee,
                *decision,
                RaiseOverrides {
                    rate_increase: *rate_increase,
                    morale_delta: *morale_delta,
                },
                day,
                &config.raises,
            );
            log.events.push(WorkforceEvent::Raise {
                employee_id: employee_id.clone(),
                decision: applied.decision,
                factor: applied.factor,
                morale_delta: applied.morale_delta,
                cadence_sequence: applied.cadence_sequence,
                next_eligible_day: applied.next_eligible_day,
            });
        }

        WorkforceIntent::Terminate {
            employee_id,
            reason,
            morale_ripple,
        } => {
            let Some(outcome) =
                terminate_employee(log.workforce, employee_id, *morale_ripple, &config.termination)
            else {
                log.warn(
                    WarningCode::UnknownEmployee,
                    Some(employee_id.to_string()),
                    format!("cannot terminate unknown employee {employee_id}"),
                );
                return;
            };
            log.events.push(WorkforceEvent::EmployeeTerminated {
                employee_id: outcome.employee_id,
                structure_id: outcome.structure_id,
                reason: reason.clone(),
                reverted_tasks: outcome.reverted_tasks,
                morale_ripple: outcome.morale_ripple,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use verdant_types::{CandidateId, EmployeeId, RaiseDecision, StructureId, TaskId};

    use super::*;
    use crate::test_support::{company, definition, employee, role, structure_context, task};

    struct Fixture {
        company: Company,
        registry: TraitRegistry,
        config: WorkforceConfig,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                company: company(),
                registry: TraitRegistry::standard().unwrap_or_else(|e| panic!("{e}")),
                config: WorkforceConfig::default(),
            }
        }

        fn tick(
            &self,
            state: &WorkforceState,
            tick: u64,
            intents: &[WorkforceIntent],
        ) -> WorkforceTickResult {
            #[allow(clippy::cast_precision_loss)]
            let sim_hours = tick as f64;
            process_tick(
                state,
                &WorkforceTickInput {
                    tick,
                    sim_hours,
                    hours_per_day: 24.0,
                    seed: "s1",
                    company: &self.company,
                    intents,
                    registry: &self.registry,
                    config: &self.config,
                },
            )
        }
    }

    fn grower_state() -> WorkforceState {
        WorkforceState {
            roles: vec![role("role-grower", "grower")],
            employees: vec![employee("e1", "s-1")],
            task_definitions: vec![definition("water", "grower", 1, 60.0)],
            ..WorkforceState::default()
        }
    }

    #[test]
    fn enqueued_task_is_dispatched_in_the_same_tick() {
        let fx = Fixture::new();
        let intents = [WorkforceIntent::EnqueueTask {
            task: task("t1", "water", 1, structure_context("s-1")),
        }];
        let result = fx.tick(&grower_state(), 1, &intents);
        assert_eq!(result.assignments.len(), 1);
        assert_eq!(result.workforce.payroll.totals.base_minutes, dec!(60));
        assert!(result.payroll.total_labor_cost > Decimal::ZERO);
        assert_eq!(result.workforce.kpis.len(), 1);
        assert!(
            result
                .events
                .iter()
                .any(|e| matches!(e, WorkforceEvent::TaskDispatched { .. }))
        );
    }

    #[test]
    fn day_rollover_seals_once_and_resets_usage() {
        let fx = Fixture::new();
        let mut state = grower_state();
        state.task_queue = vec![task("t1", "water", 0, structure_context("s-1"))];
        let day0 = fx.tick(&state, 1, &[]);
        let day0_cost = day0.workforce.payroll.totals.total_labor_cost;

        let day1 = fx.tick(&day0.workforce, 24, &[]);
        assert_eq!(day1.workforce.payroll_history.len(), 1);
        let sealed = day1.payroll.finalized.clone().unwrap_or_default();
        assert_eq!(sealed.day_index, 0);
        assert_eq!(sealed.totals.total_labor_cost, day0_cost.round_dp(2));
        assert_eq!(day1.workforce.payroll.day_index, 1);
        assert!(day1.workforce.task_queue.is_empty());
        let usage = day1.workforce.employees.first().map(|e| e.usage.day_index);
        assert_eq!(usage, Some(1));

        let again = fx.tick(&day1.workforce, 25, &[]);
        assert_eq!(again.workforce.payroll_history.len(), 1);
        assert!(again.payroll.finalized.is_none());
    }

    #[test]
    fn scan_then_hire_onboards_a_deterministic_employee() {
        let fx = Fixture::new();
        let mut state = grower_state();
        state.roles = vec![role("role-grower", "gardener"), role("role-tech", "technician")];
        let structure = StructureId::new("s-1");
        let scan = [WorkforceIntent::ScanMarket {
            structure_id: structure.clone(),
        }];
        let scanned = fx.tick(&state, 1, &scan);
        let candidate = CandidateId::new("cand:s-1:1:00");
        let hire = [WorkforceIntent::Hire {
            structure_id: structure.clone(),
            candidate_id: candidate.clone(),
        }];
        let hired = fx.tick(&scanned.workforce, 2, &hire);
        let expected = EmployeeId::from_candidate("s1", &candidate);
        assert!(hired.workforce.employee(&expected).is_some());
        assert_eq!(hired.workforce.employees.len(), 2);

        let again = fx.tick(&hired.workforce, 3, &hire);
        assert_eq!(again.workforce.employees.len(), 2);
        assert!(
            again
                .workforce
                .warnings
                .iter()
                .any(|w| w.code == WarningCode::UnknownCandidate)
        );
    }

    #[test]
    fn scan_during_cooldown_warns() {
        let fx = Fixture::new();
        let scan = [WorkforceIntent::ScanMarket {
            structure_id: StructureId::new("s-1"),
        }];
        let first = fx.tick(&grower_state(), 1, &scan);
        let second = fx.tick(&first.workforce, 2, &scan);
        assert!(
            second
                .workforce
                .warnings
                .iter()
                .any(|w| w.code == WarningCode::ScanCooldown)
        );
    }

    #[test]
    fn early_raise_is_refused_with_warning() {
        let fx = Fixture::new();
        let raise = [WorkforceIntent::Raise {
            employee_id: EmployeeId::new("e1"),
            decision: RaiseDecision::Accept,
            rate_increase: None,
            morale_delta: None,
        }];
        let result = fx.tick(&grower_state(), 1, &raise);
        let multiplier = result.workforce.employees.first().map(|e| e.base_rate_multiplier);
        assert_eq!(multiplier, Some(1.0));
        assert!(
            result
                .workforce
                .warnings
                .iter()
                .any(|w| w.code == WarningCode::RaiseNotEligible)
        );
    }

    #[test]
    fn cancel_and_terminate_follow_lifecycle_rules() {
        let fx = Fixture::new();
        let mut state = grower_state();
        state.employees.push(employee("e2", "s-1"));
        state.task_queue = vec![task("t9", "unknown", 0, structure_context("s-1"))];
        let intents = [
            WorkforceIntent::CancelTask {
                task_id: TaskId::new("t9"),
            },
            WorkforceIntent::CancelTask {
                task_id: TaskId::new("t9"),
            },
            WorkforceIntent::Terminate {
                employee_id: EmployeeId::new("e1"),
                reason: Some("restructuring".to_owned()),
                morale_ripple: None,
            },
        ];
        let result = fx.tick(&state, 1, &intents);
        let status = result.workforce.task_queue.first().map(|t| t.status);
        assert_eq!(status, Some(TaskStatus::Cancelled));
        assert_eq!(result.workforce.employees.len(), 1);
        let codes: Vec<WarningCode> = result.workforce.warnings.iter().map(|w| w.code).collect();
        assert_eq!(codes, vec![WarningCode::InvalidTaskTransition]);
    }

    #[test]
    fn persistent_schedule_issues_warn_once() {
        let fx = Fixture::new();
        let mut state = grower_state();
        state.task_queue = vec![task("t1", "ghost", 0, structure_context("s-1"))];
        let first = fx.tick(&state, 1, &[]);
        let second = fx.tick(&first.workforce, 2, &[]);
        assert_eq!(second.workforce.warnings.len(), 1);
    }
}
