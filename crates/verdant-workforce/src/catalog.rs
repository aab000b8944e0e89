//! Boundary validation of roles, task definitions and the roster.
//!
//! Runs once before the first tick. Anything rejected here is fatal to
//! startup; anything that passes is safe for the in-tick code, which only
//! ever skips.

use std::collections::BTreeSet;

use verdant_types::WorkforceState;

use crate::error::CatalogError;

/// Validate the static catalogs and the roster of `workforce`.
pub fn validate_catalog(workforce: &WorkforceState) -> Result<(), CatalogError> {
    let mut role_keys = BTreeSet::new();
    for role in &workforce.roles {
        if !role_keys.insert(format!("id:{}", role.id)) {
            return Err(CatalogError::DuplicateRole(role.id.to_string()));
        }
        if !role_keys.insert(format!("slug:{}", role.slug)) {
            return Err(CatalogError::DuplicateRole(role.slug.clone()));
        }
        let pay = &role.compensation;
        if [pay.hourly_base, pay.skill_rate, pay.rate_multiplier]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(CatalogError::InvalidCompensation(role.slug.clone()));
        }
        for skill in &role.core_skills {
            check_threshold(&role.slug, &skill.skill, skill.min_level01)?;
        }
    }

    let mut codes = BTreeSet::new();
    for definition in &workforce.task_definitions {
        if !codes.insert(definition.task_code.as_str()) {
            return Err(CatalogError::DuplicateTaskCode(definition.task_code.clone()));
        }
        let minutes = definition.cost_model.labor_minutes;
        if !minutes.is_finite() || minutes < 0.0 {
            return Err(CatalogError::InvalidLaborMinutes {
                task_code: definition.task_code.clone(),
                minutes,
            });
        }
        for requirement in &definition.required_skills {
            check_threshold(&definition.task_code, &requirement.skill, requirement.min_level01)?;
        }
    }

    for employee in &workforce.employees {
        if workforce.role(&employee.role_id).is_none() {
            return Err(CatalogError::UnknownRole {
                employee: employee.id.to_string(),
                role: employee.role_id.to_string(),
            });
        }
        let schedule = &employee.schedule;
        let reason = if !(0.0..=24.0).contains(&schedule.hours_per_day) {
            Some("hours per day outside 0..=24")
        } else if !(0.0..=24.0).contains(&schedule.overtime_hours_per_day)
            || schedule.hours_per_day + schedule.overtime_hours_per_day > 24.0
        {
            Some("overtime pushes the day past 24 hours")
        } else if schedule.days_per_week > 7 {
            Some("more than 7 days per week")
        } else {
            None
        };
        if let Some(reason) = reason {
            return Err(CatalogError::InvalidSchedule {
                employee: employee.id.to_string(),
                reason: reason.to_owned(),
            });
        }
    }
    Ok(())
}

fn check_threshold(owner: &str, skill: &str, level: f64) -> Result<(), CatalogError> {
    if (0.0..=1.0).contains(&level) {
        Ok(())
    } else {
        Err(CatalogError::SkillThresholdOutOfRange {
            owner: owner.to_owned(),
            skill: skill.to_owned(),
            level,
        })
    }
}

#[cfg(test)]
mod tests {
    use verdant_types::SkillRequirement;

    use super::*;
    use crate::test_support::{definition, employee, role};

    fn valid() -> WorkforceState {
        WorkforceState {
            roles: vec![role("role-grower", "grower")],
            employees: vec![employee("e1", "s-1")],
            task_definitions: vec![definition("water", "grower", 1, 30.0)],
            ..WorkforceState::default()
        }
    }

    #[test]
    fn valid_catalog_passes() {
        assert_eq!(validate_catalog(&valid()), Ok(()));
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut workforce = valid();
        workforce.task_definitions.push(definition("water", "grower", 2, 10.0));
        assert_eq!(
            validate_catalog(&workforce),
            Err(CatalogError::DuplicateTaskCode("water".to_owned()))
        );

        let mut workforce = valid();
        workforce.roles.push(role("role-other", "grower"));
        assert!(matches!(
            validate_catalog(&workforce),
            Err(CatalogError::DuplicateRole(_))
        ));
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let mut workforce = valid();
        if let Some(d) = workforce.task_definitions.first_mut() {
            d.cost_model.labor_minutes = -1.0;
        }
        assert!(matches!(
            validate_catalog(&workforce),
            Err(CatalogError::InvalidLaborMinutes { .. })
        ));

        let mut workforce = valid();
        if let Some(d) = workforce.task_definitions.first_mut() {
            d.required_skills.push(SkillRequirement {
                skill: "gardening".to_owned(),
                min_level01: 1.5,
            });
        }
        assert!(matches!(
            validate_catalog(&workforce),
            Err(CatalogError::SkillThresholdOutOfRange { .. })
        ));
    }

    #[test]
    fn roster_must_reference_known_roles_and_sane_schedules() {
        let mut workforce = valid();
        workforce.roles.clear();
        workforce.task_definitions.clear();
        assert!(matches!(
            validate_catalog(&workforce),
            Err(CatalogError::UnknownRole { .. })
        ));

        let mut workforce = valid();
        if let Some(e) = workforce.employees.first_mut() {
            e.schedule.overtime_hours_per_day = 20.0;
        }
        assert!(matches!(
            validate_catalog(&workforce),
            Err(CatalogError::InvalidSchedule { .. })
        ));
    }
}
