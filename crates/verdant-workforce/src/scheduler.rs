//! Scheduling: which queued tasks are considered, and in what order.
//!
//! [`build_schedule`] turns the queue into [`ScheduleEntry`] values for
//! every queued task whose definition exists and whose structure resolves,
//! sorted by [`compare_schedule_entries`]. Structure resolution prefers an
//! explicit id on the task context and otherwise falls back to the room and
//! zone lookup tables of a [`LocationIndex`], built once per tick.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use verdant_types::{
    Company, RoomId, StructureId, TaskContext, TaskCostBasis, TaskStatus, WarningCode,
    WorkforceState, WorkforceTaskDefinition, WorkforceTaskInstance, ZoneId,
};

/// Geometry and routing facts about one zone.
#[derive(Debug, Clone, PartialEq)]
pub struct ZoneFacts {
    /// Owning structure.
    pub structure_id: StructureId,
    /// Cultivated area.
    pub area_m2: f64,
    /// Live plants.
    pub plant_count: u32,
    /// Quarantine end tick, exclusive.
    pub quarantine_until_tick: Option<u64>,
}

/// Lookup tables over the company tree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LocationIndex {
    structures: BTreeMap<StructureId, (usize, f64)>,
    rooms: BTreeMap<RoomId, (StructureId, f64)>,
    zones: BTreeMap<ZoneId, ZoneFacts>,
}

impl LocationIndex {
    /// Index a company tree.
    pub fn build(company: &Company) -> Self {
        let mut index = Self::default();
        for (position, structure) in company.structures.iter().enumerate() {
            let mut structure_area = 0.0;
            for room in &structure.rooms {
                structure_area += room.area_m2;
                index
                    .rooms
                    .insert(room.id.clone(), (structure.id.clone(), room.area_m2));
                for zone in &room.zones {
                    index.zones.insert(
                        zone.id.clone(),
                        ZoneFacts {
                            structure_id: structure.id.clone(),
                            area_m2: zone.area_m2,
                            plant_count: zone.plant_count,
                            quarantine_until_tick: zone.quarantine_until_tick,
                        },
                    );
                }
            }
            index
                .structures
                .insert(structure.id.clone(), (position, structure_area));
        }
        index
    }

    /// Position of a structure in blueprint order. Structures unknown to
    /// the blueprint sort after every known one.
    pub fn structure_index(&self, id: &StructureId) -> usize {
        self.structures
            .get(id)
            .map_or(self.structures.len(), |(position, _)| *position)
    }

    /// Facts about a zone.
    pub fn zone(&self, id: &ZoneId) -> Option<&ZoneFacts> {
        self.zones.get(id)
    }

    /// Resolve the structure a task context belongs to.
    pub fn resolve_structure(&self, context: &TaskContext) -> Option<StructureId> {
        if let Some(explicit) = context.explicit_structure() {
            return Some(explicit.clone());
        }
        match context {
            TaskContext::Room { room_id, .. } => self.rooms.get(room_id).map(|(s, _)| s.clone()),
            TaskContext::Zone { zone_id, .. } | TaskContext::Device { zone_id, .. } => {
                self.zones.get(zone_id).map(|z| z.structure_id.clone())
            }
            TaskContext::Structure { .. } | TaskContext::Unscoped => None,
        }
    }

    /// Whether the task's zone is quarantined at `tick`. Only zone and
    /// device contexts carry a zone.
    pub fn is_quarantined(&self, context: &TaskContext, tick: u64) -> bool {
        context
            .zone_id()
            .and_then(|zone_id| self.zones.get(zone_id))
            .and_then(|zone| zone.quarantine_until_tick)
            .is_some_and(|until| tick < until)
    }

    fn area_of(&self, context: &TaskContext) -> Option<f64> {
        match context {
            TaskContext::Structure { structure_id } => {
                self.structures.get(structure_id).map(|(_, area)| *area)
            }
            TaskContext::Room {
                room_id, area_m2, ..
            } => area_m2.or_else(|| self.rooms.get(room_id).map(|(_, area)| *area)),
            TaskContext::Zone {
                zone_id, area_m2, ..
            } => area_m2.or_else(|| self.zones.get(zone_id).map(|z| z.area_m2)),
            TaskContext::Device { zone_id, .. } => self.zones.get(zone_id).map(|z| z.area_m2),
            TaskContext::Unscoped => None,
        }
    }

    fn plants_of(&self, context: &TaskContext) -> Option<u32> {
        match context {
            TaskContext::Zone {
                zone_id,
                plant_count,
                ..
            } => plant_count.or_else(|| self.zones.get(zone_id).map(|z| z.plant_count)),
            TaskContext::Device { zone_id, .. } => self.zones.get(zone_id).map(|z| z.plant_count),
            TaskContext::Structure { .. } | TaskContext::Room { .. } | TaskContext::Unscoped => {
                None
            }
        }
    }
}

/// Nominal labour demand of a task in minutes.
///
/// When the basis metric cannot be resolved from the context the task
/// counts as a single unit.
pub fn task_demand_minutes(
    definition: &WorkforceTaskDefinition,
    context: &TaskContext,
    index: &LocationIndex,
) -> f64 {
    let minutes = definition.cost_model.labor_minutes.max(0.0);
    let units = match definition.cost_model.basis {
        TaskCostBasis::PerAction => 1.0,
        TaskCostBasis::PerPlant => index.plants_of(context).map_or(1.0, f64::from),
        TaskCostBasis::PerSquareMeter => index.area_of(context).unwrap_or(1.0).max(0.0),
    };
    minutes * units
}

/// A queued task ready for dispatch.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleEntry<'a> {
    /// Position of the task in the queue.
    pub queue_index: usize,
    /// The task.
    pub task: &'a WorkforceTaskInstance,
    /// Its definition.
    pub definition: &'a WorkforceTaskDefinition,
    /// Resolved structure.
    pub structure_id: StructureId,
    /// Blueprint position of the structure.
    pub structure_index: usize,
    /// Nominal demand in minutes.
    pub demand_minutes: f64,
}

/// A queued task that could not be scheduled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleIssue {
    /// Why.
    pub code: WarningCode,
    /// Task id.
    pub task_id: String,
    /// Human-readable text.
    pub message: String,
}

/// Dispatch order plus the tasks that were left out.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchedulePlan<'a> {
    /// Entries in dispatch order.
    pub entries: Vec<ScheduleEntry<'a>>,
    /// Tasks skipped for data problems.
    pub issues: Vec<ScheduleIssue>,
}

/// The dispatch order: priority descending, creation tick ascending,
/// queue position ascending. A strict total order over distinct entries.
pub fn compare_schedule_entries(a: &ScheduleEntry<'_>, b: &ScheduleEntry<'_>) -> Ordering {
    b.definition
        .priority
        .cmp(&a.definition.priority)
        .then_with(|| a.task.created_at_tick.cmp(&b.task.created_at_tick))
        .then_with(|| a.queue_index.cmp(&b.queue_index))
}

/// Build the sorted dispatch plan for the queued tasks of `workforce`.
pub fn build_schedule<'a>(workforce: &'a WorkforceState, index: &LocationIndex) -> SchedulePlan<'a> {
    let mut plan = SchedulePlan::default();
    for (queue_index, task) in workforce.task_queue.iter().enumerate() {
        if task.status != TaskStatus::Queued {
            continue;
        }
        let Some(definition) = workforce.definition(&task.task_code) else {
            plan.issues.push(ScheduleIssue {
                code: WarningCode::UnknownTaskDefinition,
                task_id: task.id.to_string(),
                message: format!("task {} references unknown definition {}", task.id, task.task_code),
            });
            continue;
        };
        let Some(structure_id) = index.resolve_structure(&task.context) else {
            plan.issues.push(ScheduleIssue {
                code: WarningCode::UnroutableTask,
                task_id: task.id.to_string(),
                message: format!("task {} has no resolvable structure", task.id),
            });
            continue;
        };
        plan.entries.push(ScheduleEntry {
            queue_index,
            task,
            definition,
            structure_index: index.structure_index(&structure_id),
            structure_id,
            demand_minutes: task_demand_minutes(definition, &task.context, index),
        });
    }
    plan.entries.sort_by(compare_schedule_entries);
    plan
}
