//! The company tree: structures contain rooms, rooms contain zones.
//!
//! Geometry and device data are supplied by the blueprint collaborator and
//! are only read by the workforce core (task demand, routing, quarantine).

use serde::{Deserialize, Serialize};

use crate::ids::{DeviceId, RoomId, StructureId, ZoneId};

/// The cultivation company and everything it operates.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Company {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Structures in blueprint order. The index of a structure in this list
    /// is its `structure index` for dispatch tie-breaking.
    #[serde(default)]
    pub structures: Vec<Structure>,
}

/// A leased building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Structure identifier.
    pub id: StructureId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Rooms in blueprint order.
    #[serde(default)]
    pub rooms: Vec<Room>,
}

/// A room inside a structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    /// Room identifier.
    pub id: RoomId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Floor area in square metres.
    #[serde(default)]
    pub area_m2: f64,
    /// Zones in blueprint order.
    #[serde(default)]
    pub zones: Vec<Zone>,
}

/// A grow zone: the unit plants, devices and quarantine are scoped to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Zone identifier.
    pub id: ZoneId,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Cultivated area in square metres.
    #[serde(default)]
    pub area_m2: f64,
    /// Number of live plants.
    #[serde(default)]
    pub plant_count: u32,
    /// Quarantine is active while the current tick is below this value.
    #[serde(default)]
    pub quarantine_until_tick: Option<u64>,
    /// Installed devices.
    #[serde(default)]
    pub devices: Vec<Device>,
}

impl Zone {
    /// Whether the zone is under quarantine at `tick`.
    pub fn is_quarantined(&self, tick: u64) -> bool {
        self.quarantine_until_tick.is_some_and(|until| tick < until)
    }
}

/// A device installed in a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    /// Device identifier.
    pub id: DeviceId,
    /// Blueprint slug (e.g. `"lamp"`, `"dehumidifier"`).
    #[serde(default)]
    pub kind: String,
    /// Condition in `[0, 1]`; 1 is factory new.
    #[serde(default = "default_condition")]
    pub condition01: f64,
}

const fn default_condition() -> f64 {
    1.0
}

impl Company {
    /// Find a structure by id.
    pub fn structure(&self, id: &StructureId) -> Option<&Structure> {
        self.structures.iter().find(|s| &s.id == id)
    }

    /// Find a zone anywhere in the company.
    pub fn zone(&self, id: &ZoneId) -> Option<&Zone> {
        self.structures
            .iter()
            .flat_map(|s| s.rooms.iter())
            .flat_map(|r| r.zones.iter())
            .find(|z| &z.id == id)
    }

    /// Find a room anywhere in the company.
    pub fn room(&self, id: &RoomId) -> Option<&Room> {
        self.structures
            .iter()
            .flat_map(|s| s.rooms.iter())
            .find(|r| &r.id == id)
    }
}
