//! Payroll tunables.
//!
//! Mirrors the `workforce.payroll` section of `verdant-config.yaml`.

use std::collections::BTreeMap;

use serde::Deserialize;
use verdant_types::StructureId;

/// Configuration for pricing labour.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PayrollConfig {
    /// Multiplier on the hourly rate for overtime minutes (default: 1.25).
    #[serde(default = "default_overtime_multiplier")]
    pub overtime_multiplier: f64,

    /// Rate premium at experience level 1.0 (default: 0.2, i.e. +20%).
    #[serde(default = "default_experience_premium")]
    pub experience_premium: f64,

    /// Location index used for structures missing from the table (default: 1.0).
    #[serde(default = "default_location_index")]
    pub default_location_index: f64,

    /// Location index per structure.
    #[serde(default)]
    pub location_index: BTreeMap<StructureId, f64>,

    /// Decimal places kept when a day is finalized (default: 2).
    #[serde(default = "default_currency_scale")]
    pub currency_scale: u32,
}

impl Default for PayrollConfig {
    fn default() -> Self {
        Self {
            overtime_multiplier: default_overtime_multiplier(),
            experience_premium: default_experience_premium(),
            default_location_index: default_location_index(),
            location_index: BTreeMap::new(),
            currency_scale: default_currency_scale(),
        }
    }
}

impl PayrollConfig {
    /// Location index of a structure.
    pub fn location_index_for(&self, structure_id: &StructureId) -> f64 {
        self.location_index
            .get(structure_id)
            .copied()
            .unwrap_or(self.default_location_index)
    }
}

const fn default_overtime_multiplier() -> f64 {
    1.25
}

const fn default_experience_premium() -> f64 {
    0.2
}

const fn default_location_index() -> f64 {
    1.0
}

const fn default_currency_scale() -> u32 {
    2
}
