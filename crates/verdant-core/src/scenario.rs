//! Built-in demo scenario.
//!
//! A small two-structure company with seven employees and a daily task
//! cycle. The engine binary runs it when no world document is given, and
//! the test suites use it as their fixture.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use verdant_types::{
    CandidateId, Company, Device, DeviceId, Employee, EmployeeDayUsage, EmployeeExperience,
    EmployeeId, EmployeeRaiseState, EmployeeRngSeed, EmployeeRole, EmployeeSchedule,
    FinanceState, RaiseDecision, RoleCompensation, RoleId, RoleSkill, Room, RoomId,
    SkillRequirement, Structure, StructureId, TaskCategory, TaskContext, TaskCostBasis,
    TaskCostModel, TaskId, TaskStatus, TraitAssignment, TraitKind, WorkforceIntent,
    WorkforceState, WorkforceTaskDefinition, WorkforceTaskInstance, World, WorldId, Zone, ZoneId,
};

/// Structure the demo scans and hires for.
pub const DEMO_HQ: &str = "s-north";

/// Starting cash of the demo company.
pub const DEMO_CASH: Decimal = Decimal::from_parts(250_000, 0, 0, false, 0);

/// The demo world at tick zero.
pub fn demo_world(seed: &str) -> World {
    World::new(WorldId::new(format!("demo:{seed}")), seed)
        .with_company(demo_company())
        .with_workforce(demo_workforce(seed))
        .with_finance(FinanceState {
            cash_on_hand: DEMO_CASH,
            ..FinanceState::default()
        })
}

/// Intents keyed by the tick they are submitted before.
///
/// Every day at 08:00 each zone is watered, plants are pruned, rooms are
/// cleaned and every lamp is serviced. The first week also carries a market
/// scan and a hire, a premature raise request, a second scan inside the
/// cooldown, and a termination.
pub fn demo_intents(days: u64, ticks_per_day: u64) -> BTreeMap<u64, Vec<WorkforceIntent>> {
    let company = demo_company();
    let mut plan: BTreeMap<u64, Vec<WorkforceIntent>> = BTreeMap::new();
    for day in 0..days {
        let tick = day
            .saturating_mul(ticks_per_day)
            .saturating_add(ticks_per_day.saturating_mul(8) / 24)
            .max(1);
        let created = tick.saturating_sub(1);
        let batch = plan.entry(tick).or_default();
        for structure in &company.structures {
            for room in &structure.rooms {
                batch.push(enqueue(
                    format!("task:{day}:clean:{}", room.id),
                    "clean_room",
                    created,
                    TaskContext::Room {
                        room_id: room.id.clone(),
                        structure_id: None,
                        area_m2: None,
                    },
                ));
                for zone in &room.zones {
                    for code in ["water_zone", "prune_plants"] {
                        batch.push(enqueue(
                            format!("task:{day}:{code}:{}", zone.id),
                            code,
                            created,
                            TaskContext::Zone {
                                zone_id: zone.id.clone(),
                                structure_id: None,
                                plant_count: None,
                                area_m2: None,
                            },
                        ));
                    }
                    for device in &zone.devices {
                        batch.push(enqueue(
                            format!("task:{day}:service:{}", device.id),
                            "service_lamp",
                            created,
                            TaskContext::Device {
                                device_id: device.id.clone(),
                                zone_id: zone.id.clone(),
                                structure_id: Some(structure.id.clone()),
                            },
                        ));
                    }
                }
            }
        }
    }

    let hq = StructureId::new(DEMO_HQ);
    let at = |day: u64, hour: u64| {
        day.saturating_mul(ticks_per_day)
            .saturating_add(ticks_per_day.saturating_mul(hour) / 24)
            .max(1)
    };
    let lifecycle = [
        (
            at(0, 6),
            WorkforceIntent::ScanMarket {
                structure_id: hq.clone(),
            },
        ),
        (
            at(0, 7),
            WorkforceIntent::Hire {
                structure_id: hq.clone(),
                candidate_id: CandidateId::new(format!("cand:{DEMO_HQ}:1:00")),
            },
        ),
        (
            at(1, 9),
            WorkforceIntent::Raise {
                employee_id: EmployeeId::new("e-ada"),
                decision: RaiseDecision::Accept,
                rate_increase: None,
                morale_delta: None,
            },
        ),
        (
            at(2, 9),
            WorkforceIntent::ScanMarket {
                structure_id: hq,
            },
        ),
        (
            at(3, 17),
            WorkforceIntent::Terminate {
                employee_id: EmployeeId::new("e-ben"),
                reason: Some("restructuring".to_owned()),
                morale_ripple: None,
            },
        ),
    ];
    let last_tick = days.saturating_mul(ticks_per_day);
    for (tick, intent) in lifecycle {
        if tick <= last_tick {
            plan.entry(tick).or_default().push(intent);
        }
    }
    plan
}

fn enqueue(id: String, code: &str, created_at_tick: u64, context: TaskContext) -> WorkforceIntent {
    WorkforceIntent::EnqueueTask {
        task: WorkforceTaskInstance {
            id: TaskId::new(id),
            task_code: code.to_owned(),
            status: TaskStatus::Queued,
            created_at_tick,
            due_tick: None,
            assigned_employee_id: None,
            completed_at_tick: None,
            context,
        },
    }
}

/// Two structures: `s-north` (one room, two zones) and `s-south` (one room,
/// one zone under quarantine for the first two days).
pub fn demo_company() -> Company {
    let zone = |id: &str, area: f64, plants: u32, lamp: &str, quarantine: Option<u64>| Zone {
        id: ZoneId::new(id),
        name: id.to_owned(),
        area_m2: area,
        plant_count: plants,
        quarantine_until_tick: quarantine,
        devices: vec![Device {
            id: DeviceId::new(lamp),
            kind: "lamp".to_owned(),
            condition01: 0.85,
        }],
    };
    Company {
        name: "Verdant Demo Farms".to_owned(),
        structures: vec![
            Structure {
                id: StructureId::new(DEMO_HQ),
                name: "North Warehouse".to_owned(),
                rooms: vec![Room {
                    id: RoomId::new("r-north-a"),
                    name: "Grow A".to_owned(),
                    area_m2: 80.0,
                    zones: vec![
                        zone("z-north-1", 30.0, 96, "d-lamp-n1", None),
                        zone("z-north-2", 30.0, 64, "d-lamp-n2", None),
                    ],
                }],
            },
            Structure {
                id: StructureId::new("s-south"),
                name: "South Greenhouse".to_owned(),
                rooms: vec![Room {
                    id: RoomId::new("r-south-a"),
                    name: "Glasshouse".to_owned(),
                    area_m2: 50.0,
                    zones: vec![zone("z-south-1", 40.0, 120, "d-lamp-s1", Some(48))],
                }],
            },
        ],
    }
}

fn role(id: &str, slug: &str, skill: &str, min: f64, hourly_base: f64) -> EmployeeRole {
    EmployeeRole {
        id: RoleId::new(id),
        slug: slug.to_owned(),
        name: slug.to_owned(),
        core_skills: vec![RoleSkill {
            skill: skill.to_owned(),
            min_level01: min,
        }],
        compensation: RoleCompensation {
            hourly_base,
            ..RoleCompensation::default()
        },
    }
}

fn definition(
    code: &str,
    slug: &str,
    category: TaskCategory,
    priority: i32,
    basis: TaskCostBasis,
    minutes: f64,
    skill: Option<(&str, f64)>,
) -> WorkforceTaskDefinition {
    WorkforceTaskDefinition {
        task_code: code.to_owned(),
        description: code.replace('_', " "),
        category,
        required_role_slug: slug.to_owned(),
        required_skills: skill
            .map(|(skill, min)| SkillRequirement {
                skill: skill.to_owned(),
                min_level01: min,
            })
            .into_iter()
            .collect(),
        priority,
        cost_model: TaskCostModel {
            basis,
            labor_minutes: minutes,
        },
    }
}

fn employee(
    seed: &str,
    id: &str,
    role: &str,
    structure: &str,
    skills: &[(&str, f64)],
    traits: &[(TraitKind, f64)],
) -> Employee {
    Employee {
        id: EmployeeId::new(id),
        name: id.trim_start_matches("e-").to_owned(),
        role_id: RoleId::new(role),
        rng_seed: EmployeeRngSeed::new(format!("{seed}:employee:{id}")),
        assigned_structure_id: StructureId::new(structure),
        morale01: 0.75,
        fatigue01: 0.1,
        skills: skills
            .iter()
            .map(|(skill, level)| ((*skill).to_owned(), *level))
            .collect(),
        skill_triad: None,
        traits: traits
            .iter()
            .map(|(trait_id, strength01)| TraitAssignment {
                trait_id: *trait_id,
                strength01: *strength01,
            })
            .collect(),
        schedule: EmployeeSchedule {
            hours_per_day: 8.0,
            overtime_hours_per_day: 2.0,
            days_per_week: 5,
        },
        experience: EmployeeExperience::default(),
        base_rate_multiplier: 1.0,
        labor_market_factor: 1.0,
        time_premium_multiplier: 1.0,
        employment_start_day: 0,
        salary_expectation_per_hour: 18.0,
        raise_state: EmployeeRaiseState::default(),
        usage: EmployeeDayUsage::default(),
    }
}

fn demo_workforce(seed: &str) -> WorkforceState {
    WorkforceState {
        roles: vec![
            role("role-grower", "grower", "gardening", 0.3, 14.0),
            role("role-technician", "technician", "maintenance", 0.3, 16.0),
            role("role-janitor", "janitor", "cleanliness", 0.1, 11.0),
        ],
        employees: vec![
            employee(
                seed,
                "e-ada",
                "role-grower",
                DEMO_HQ,
                &[("gardening", 0.8), ("logistics", 0.3)],
                &[(TraitKind::GreenThumb, 0.7)],
            ),
            employee(
                seed,
                "e-ben",
                "role-grower",
                DEMO_HQ,
                &[("gardening", 0.5)],
                &[(TraitKind::Slacker, 0.4)],
            ),
            employee(
                seed,
                "e-cy",
                "role-technician",
                DEMO_HQ,
                &[("maintenance", 0.7)],
                &[(TraitKind::Gearhead, 0.6), (TraitKind::Resilient, 0.5)],
            ),
            employee(
                seed,
                "e-gus",
                "role-janitor",
                DEMO_HQ,
                &[("cleanliness", 0.5)],
                &[],
            ),
            employee(
                seed,
                "e-dee",
                "role-janitor",
                "s-south",
                &[("cleanliness", 0.6), ("gardening", 0.45)],
                &[(TraitKind::Optimist, 0.8)],
            ),
            employee(
                seed,
                "e-eve",
                "role-grower",
                "s-south",
                &[("gardening", 0.65)],
                &[(TraitKind::Meticulous, 0.5)],
            ),
            employee(
                seed,
                "e-fay",
                "role-technician",
                "s-south",
                &[("maintenance", 0.55)],
                &[(TraitKind::Clumsy, 0.3)],
            ),
        ],
        task_definitions: vec![
            definition(
                "water_zone",
                "grower",
                TaskCategory::Cultivation,
                3,
                TaskCostBasis::PerAction,
                45.0,
                Some(("gardening", 0.2)),
            ),
            definition(
                "prune_plants",
                "grower",
                TaskCategory::Cultivation,
                2,
                TaskCostBasis::PerPlant,
                0.5,
                Some(("gardening", 0.4)),
            ),
            definition(
                "clean_room",
                "janitor",
                TaskCategory::Cleaning,
                1,
                TaskCostBasis::PerSquareMeter,
                0.75,
                None,
            ),
            definition(
                "service_lamp",
                "technician",
                TaskCategory::Maintenance,
                4,
                TaskCostBasis::PerAction,
                60.0,
                Some(("maintenance", 0.5)),
            ),
        ],
        ..WorkforceState::default()
    }
}
