//! The immutable world snapshot fed through the tick pipeline.
//!
//! Substructures sit behind [`Arc`]: a stage that changes the workforce
//! replaces only the workforce pointer, and the company tree and finance
//! state of the previous snapshot are reused as-is.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::company::Company;
use crate::ids::WorldId;
use crate::workforce::WorkforceState;

/// Current world schema version.
pub const WORLD_SCHEMA_VERSION: &str = "1.0.0";

/// A world snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct World {
    /// World identifier.
    pub id: WorldId,
    /// Schema version of the snapshot.
    #[serde(default = "default_schema_version")]
    pub schema_version: String,
    /// Seed every RNG stream derives from.
    pub seed: String,
    /// Number of ticks simulated so far.
    #[serde(default)]
    pub tick: u64,
    /// Simulation time in hours.
    #[serde(default)]
    pub sim_time_hours: f64,
    /// Company tree.
    #[serde(default)]
    pub company: Arc<Company>,
    /// Workforce state.
    #[serde(default)]
    pub workforce: Arc<WorkforceState>,
    /// Company finances.
    #[serde(default)]
    pub finance: Arc<FinanceState>,
}

fn default_schema_version() -> String {
    WORLD_SCHEMA_VERSION.to_owned()
}

/// Company cash position as seen by the economy accrual stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceState {
    /// Cash available.
    #[serde(default)]
    pub cash_on_hand: Decimal,
    /// Labour cost accrued since the start of the run.
    #[serde(default)]
    pub cumulative_labor_cost: Decimal,
    /// Last tick an accrual was applied.
    #[serde(default)]
    pub last_accrual_tick: Option<u64>,
}

impl World {
    /// Create an empty world at tick zero.
    pub fn new(id: WorldId, seed: impl Into<String>) -> Self {
        Self {
            id,
            schema_version: default_schema_version(),
            seed: seed.into(),
            tick: 0,
            sim_time_hours: 0.0,
            company: Arc::new(Company::default()),
            workforce: Arc::new(WorkforceState::default()),
            finance: Arc::new(FinanceState::default()),
        }
    }

    /// Replace the company tree.
    #[must_use]
    pub fn with_company(mut self, company: Company) -> Self {
        self.company = Arc::new(company);
        self
    }

    /// Replace the workforce state.
    #[must_use]
    pub fn with_workforce(mut self, workforce: WorkforceState) -> Self {
        self.workforce = Arc::new(workforce);
        self
    }

    /// Replace the finance state.
    #[must_use]
    pub fn with_finance(mut self, finance: FinanceState) -> Self {
        self.finance = Arc::new(finance);
        self
    }

    /// Day index of the current simulation time.
    pub fn day_index(&self, hours_per_day: f64) -> u64 {
        day_index_for(self.sim_time_hours, hours_per_day)
    }
}

/// `floor(sim_hours / hours_per_day)`, saturating at zero for bad input.
pub fn day_index_for(sim_hours: f64, hours_per_day: f64) -> u64 {
    if hours_per_day.is_nan() || hours_per_day <= 0.0 || !sim_hours.is_finite() || sim_hours <= 0.0
    {
        return 0;
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let day = (sim_hours / hours_per_day).floor() as u64;
    day
}
