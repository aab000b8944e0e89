//! Boundary validation of a world document.
//!
//! Runs once before the first tick; a failure is fatal to startup. It
//! covers what the in-tick code assumes but never re-checks: unique ids,
//! a known schema version, bounded employee state, a valid catalog and a
//! balanced payroll ledger.

use std::collections::BTreeSet;

use tracing::debug;
use verdant_ledger::{IdentityResult, PayrollAnomaly, verify_finalized, verify_identity};
use verdant_types::World;
use verdant_workforce::{CatalogError, validate_catalog};

use crate::config::SimulationConfig;

/// Reasons a world document is rejected.
#[derive(Debug, thiserror::Error)]
pub enum WorldValidationError {
    /// The document was written for another schema.
    #[error("world schema version {found} is not supported (expected {expected})")]
    SchemaVersion {
        /// Version the configuration accepts.
        expected: String,
        /// Version the document declares.
        found: String,
    },

    /// The seed is empty.
    #[error("world seed must not be empty")]
    EmptySeed,

    /// Simulation time is negative or not finite.
    #[error("world simulation time {hours} is invalid")]
    InvalidTime {
        /// The offending value.
        hours: f64,
    },

    /// Two entities of the same kind share an id.
    #[error("duplicate {kind} id {id}")]
    DuplicateId {
        /// Entity kind.
        kind: &'static str,
        /// The repeated id.
        id: String,
    },

    /// An employee is assigned to a structure the company does not have.
    #[error("employee {employee} is assigned to unknown structure {structure}")]
    UnknownStructure {
        /// Employee id.
        employee: String,
        /// Structure id.
        structure: String,
    },

    /// A bounded field is outside `[0, 1]` or not finite.
    #[error("{field} of {owner} is out of range: {value}")]
    OutOfRange {
        /// Field name.
        field: &'static str,
        /// Owning entity id.
        owner: String,
        /// The offending value.
        value: f64,
    },

    /// The role, task or roster catalog is invalid.
    #[error("invalid catalog: {source}")]
    Catalog {
        /// The underlying catalog error.
        #[from]
        source: CatalogError,
    },

    /// The stored payroll ledger does not balance.
    #[error("payroll ledger is unbalanced: {anomaly}")]
    Payroll {
        /// The violation.
        anomaly: PayrollAnomaly,
    },
}

/// Validate `world` against `config`.
///
/// # Errors
///
/// Returns the first [`WorldValidationError`] found.
pub fn validate_world(world: &World, config: &SimulationConfig) -> Result<(), WorldValidationError> {
    if world.schema_version != config.world.schema_version {
        return Err(WorldValidationError::SchemaVersion {
            expected: config.world.schema_version.clone(),
            found: world.schema_version.clone(),
        });
    }
    if world.seed.trim().is_empty() {
        return Err(WorldValidationError::EmptySeed);
    }
    if !world.sim_time_hours.is_finite() || world.sim_time_hours < 0.0 {
        return Err(WorldValidationError::InvalidTime {
            hours: world.sim_time_hours,
        });
    }

    validate_company(world)?;

    let workforce = &world.workforce;
    validate_catalog(workforce)?;

    let mut employees = BTreeSet::new();
    for employee in &workforce.employees {
        unique(&mut employees, "employee", employee.id.as_str())?;
        if world.company.structure(&employee.assigned_structure_id).is_none() {
            return Err(WorldValidationError::UnknownStructure {
                employee: employee.id.to_string(),
                structure: employee.assigned_structure_id.to_string(),
            });
        }
        bounded("morale01", employee.id.as_str(), employee.morale01)?;
        bounded("fatigue01", employee.id.as_str(), employee.fatigue01)?;
        bounded("experience.level01", employee.id.as_str(), employee.experience.level01)?;
        for (skill, level) in &employee.skills {
            bounded("skill", &format!("{}/{skill}", employee.id), *level)?;
        }
        for assignment in &employee.traits {
            bounded("trait strength01", employee.id.as_str(), assignment.strength01)?;
        }
    }

    let mut tasks = BTreeSet::new();
    for task in &workforce.task_queue {
        unique(&mut tasks, "task", task.id.as_str())?;
    }

    if let IdentityResult::Anomaly(anomaly) = verify_identity(&workforce.payroll) {
        return Err(WorldValidationError::Payroll { anomaly });
    }
    for day in &workforce.payroll_history {
        if let IdentityResult::Anomaly(anomaly) = verify_finalized(day) {
            return Err(WorldValidationError::Payroll { anomaly });
        }
    }

    debug!(
        world = %world.id,
        structures = world.company.structures.len(),
        employees = workforce.employees.len(),
        tasks = workforce.task_queue.len(),
        "world document validated"
    );
    Ok(())
}

fn validate_company(world: &World) -> Result<(), WorldValidationError> {
    let mut structures = BTreeSet::new();
    let mut rooms = BTreeSet::new();
    let mut zones = BTreeSet::new();
    let mut devices = BTreeSet::new();
    for structure in &world.company.structures {
        unique(&mut structures, "structure", structure.id.as_str())?;
        for room in &structure.rooms {
            unique(&mut rooms, "room", room.id.as_str())?;
            for zone in &room.zones {
                unique(&mut zones, "zone", zone.id.as_str())?;
                for device in &zone.devices {
                    unique(&mut devices, "device", device.id.as_str())?;
                    bounded("condition01", device.id.as_str(), device.condition01)?;
                }
            }
        }
    }
    Ok(())
}

fn unique<'a>(
    seen: &mut BTreeSet<&'a str>,
    kind: &'static str,
    id: &'a str,
) -> Result<(), WorldValidationError> {
    if seen.insert(id) {
        Ok(())
    } else {
        Err(WorldValidationError::DuplicateId {
            kind,
            id: id.to_owned(),
        })
    }
}

fn bounded(field: &'static str, owner: &str, value: f64) -> Result<(), WorldValidationError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(WorldValidationError::OutOfRange {
            field,
            owner: owner.to_owned(),
            value,
        })
    }
}
