//! Stage implementations owned by the core.
//!
//! The workforce, economy accrual and commit-telemetry stages live here;
//! the remaining stages delegate to [`Collaborators`](crate::Collaborators).

use std::sync::Arc;

use tracing::{debug, warn};
use verdant_ledger::{IdentityResult, verify_finalized, verify_identity};
use verdant_types::World;
use verdant_workforce::{WorkforceTickInput, process_tick};

use crate::clock::ClockReading;
use crate::context::RunContext;
use crate::tick::{Simulation, TickError};

/// Drain intents, run the workforce tick and buffer its telemetry.
///
/// # Errors
///
/// Returns [`TickError::PayrollIdentity`] if the ledger or a sealed day
/// fails the identity check, and [`TickError::Telemetry`] if an event
/// cannot be serialized.
pub(crate) fn workforce(
    sim: &Simulation,
    reading: &ClockReading,
    world: World,
    ctx: &mut RunContext,
) -> Result<World, TickError> {
    let intents = ctx.take_intents();
    let result = process_tick(
        &world.workforce,
        &WorkforceTickInput {
            tick: reading.tick,
            sim_hours: reading.sim_hours,
            hours_per_day: sim.clock().hours_per_day(),
            seed: &world.seed,
            company: &world.company,
            intents: &intents,
            registry: sim.registry(),
            config: &sim.config().workforce,
        },
    );

    if let IdentityResult::Anomaly(anomaly) = verify_identity(&result.workforce.payroll) {
        warn!(tick = reading.tick, scope = %anomaly.scope, "payroll identity violated");
        return Err(TickError::PayrollIdentity { anomaly });
    }
    if let Some(sealed) = &result.payroll.finalized {
        if let IdentityResult::Anomaly(anomaly) = verify_finalized(sealed) {
            warn!(tick = reading.tick, day = sealed.day_index, "sealed payroll day is unbalanced");
            return Err(TickError::PayrollIdentity { anomaly });
        }
    }

    for event in &result.events {
        ctx.emit(event.to_telemetry(reading.tick)?);
    }
    debug!(
        tick = reading.tick,
        intents = intents.len(),
        assignments = result.assignments.len(),
        "workforce stage complete"
    );
    ctx.record_workforce(result.assignments, result.payroll);
    Ok(World {
        workforce: Arc::new(result.workforce),
        ..world
    })
}

/// Charge this tick's labour cost to the company finances.
///
/// Ticks without labour cost leave the finance pointer untouched.
///
/// # Errors
///
/// Returns [`TickError::FinanceOverflow`] if a balance leaves the decimal
/// range.
pub(crate) fn economy_accrual(
    reading: &ClockReading,
    world: World,
    ctx: &RunContext,
) -> Result<World, TickError> {
    let Some(payroll) = ctx.payroll() else {
        return Ok(world);
    };
    let cost = payroll.total_labor_cost;
    if cost.is_zero() {
        return Ok(world);
    }
    let mut finance = (*world.finance).clone();
    finance.cash_on_hand = finance
        .cash_on_hand
        .checked_sub(cost)
        .ok_or(TickError::FinanceOverflow)?;
    finance.cumulative_labor_cost = finance
        .cumulative_labor_cost
        .checked_add(cost)
        .ok_or(TickError::FinanceOverflow)?;
    finance.last_accrual_tick = Some(reading.tick);
    debug!(
        tick = reading.tick,
        cost = %cost,
        cash = %finance.cash_on_hand,
        "labour cost accrued"
    );
    Ok(world.with_finance(finance))
}

/// Stamp buffered telemetry with the tick and a sequence number.
pub(crate) fn commit_telemetry(reading: &ClockReading, world: World, ctx: &mut RunContext) -> World {
    ctx.commit_telemetry(reading.tick);
    world
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use verdant_workforce::PayrollAccrualSnapshot;

    use super::*;
    use crate::scenario::demo_world;

    fn reading() -> ClockReading {
        ClockReading {
            tick: 5,
            sim_hours: 5.0,
            day_index: 0,
        }
    }

    #[test]
    fn economy_charges_cash_and_grows_cumulative_cost() {
        let world = demo_world("seed");
        let cash = world.finance.cash_on_hand;
        let mut ctx = RunContext::new();
        ctx.begin_tick(reading());
        ctx.record_workforce(
            Vec::new(),
            PayrollAccrualSnapshot {
                total_labor_cost: dec!(12.5),
                base_cost: dec!(12.5),
                ..PayrollAccrualSnapshot::default()
            },
        );
        let next = economy_accrual(&reading(), world, &ctx);
        let next = next.ok();
        assert_eq!(
            next.as_ref().map(|w| w.finance.cash_on_hand),
            Some(cash - dec!(12.5))
        );
        assert_eq!(
            next.as_ref().map(|w| w.finance.cumulative_labor_cost),
            Some(dec!(12.5))
        );
        assert_eq!(next.and_then(|w| w.finance.last_accrual_tick), Some(5));
    }

    #[test]
    fn zero_cost_tick_reuses_finance() {
        let world = demo_world("seed");
        let finance = Arc::clone(&world.finance);
        let mut ctx = RunContext::new();
        ctx.begin_tick(reading());
        ctx.record_workforce(Vec::new(), PayrollAccrualSnapshot::default());
        let next = economy_accrual(&reading(), world, &ctx).ok();
        assert!(next.is_some_and(|w| Arc::ptr_eq(&w.finance, &finance)));
    }
}
