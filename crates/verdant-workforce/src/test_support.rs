//! Builders shared by the inline test modules.

use std::collections::BTreeMap;

use verdant_types::{
    Company, Device, DeviceId, Employee, EmployeeDayUsage, EmployeeExperience, EmployeeId,
    EmployeeRaiseState, EmployeeRngSeed, EmployeeRole, EmployeeSchedule, RoleCompensation, RoleId,
    Room, RoomId, Structure, StructureId, TaskCategory, TaskContext, TaskCostBasis, TaskCostModel,
    TaskId, TaskStatus, WorkforceTaskDefinition, WorkforceTaskInstance, Zone, ZoneId,
};

pub fn employee(id: &str, structure: &str) -> Employee {
    Employee {
        id: EmployeeId::new(id),
        name: String::new(),
        role_id: RoleId::new("role-grower"),
        rng_seed: EmployeeRngSeed::new(format!("s1:employee:{id}")),
        assigned_structure_id: StructureId::new(structure),
        morale01: 0.7,
        fatigue01: 0.0,
        skills: BTreeMap::new(),
        skill_triad: None,
        traits: Vec::new(),
        schedule: EmployeeSchedule::default(),
        experience: EmployeeExperience::default(),
        base_rate_multiplier: 1.0,
        labor_market_factor: 1.0,
        time_premium_multiplier: 1.0,
        employment_start_day: 0,
        salary_expectation_per_hour: 15.0,
        raise_state: EmployeeRaiseState::default(),
        usage: EmployeeDayUsage::default(),
    }
}

pub fn role(id: &str, slug: &str) -> EmployeeRole {
    EmployeeRole {
        id: RoleId::new(id),
        slug: slug.to_owned(),
        name: slug.to_owned(),
        core_skills: Vec::new(),
        compensation: RoleCompensation::default(),
    }
}

pub fn definition(code: &str, slug: &str, priority: i32, minutes: f64) -> WorkforceTaskDefinition {
    WorkforceTaskDefinition {
        task_code: code.to_owned(),
        description: String::new(),
        category: TaskCategory::Cultivation,
        required_role_slug: slug.to_owned(),
        required_skills: Vec::new(),
        priority,
        cost_model: TaskCostModel {
            basis: TaskCostBasis::PerAction,
            labor_minutes: minutes,
        },
    }
}

pub fn task(id: &str, code: &str, created_at_tick: u64, context: TaskContext) -> WorkforceTaskInstance {
    WorkforceTaskInstance {
        id: TaskId::new(id),
        task_code: code.to_owned(),
        status: TaskStatus::Queued,
        created_at_tick,
        due_tick: None,
        assigned_employee_id: None,
        completed_at_tick: None,
        context,
    }
}

pub fn structure_context(structure: &str) -> TaskContext {
    TaskContext::Structure {
        structure_id: StructureId::new(structure),
    }
}

/// One structure `s-1` with room `r-1` (60 m2) holding zone `z-1`
/// (40 m2, 120 plants, one lamp `d-1`).
pub fn company() -> Company {
    Company {
        name: "Acme Greens".to_owned(),
        structures: vec![Structure {
            id: StructureId::new("s-1"),
            name: "North".to_owned(),
            rooms: vec![Room {
                id: RoomId::new("r-1"),
                name: "Grow A".to_owned(),
                area_m2: 60.0,
                zones: vec![Zone {
                    id: ZoneId::new("z-1"),
                    name: "Bench 1".to_owned(),
                    area_m2: 40.0,
                    plant_count: 120,
                    quarantine_until_tick: None,
                    devices: vec![Device {
                        id: DeviceId::new("d-1"),
                        kind: "lamp".to_owned(),
                        condition01: 0.9,
                    }],
                }],
            }],
        }],
    }
}
