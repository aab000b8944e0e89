//! Seams for the subsystems that share the pipeline with the workforce.
//!
//! Device, climate, irrigation, plant and harvest models live outside this
//! workspace. They plug in through [`Collaborators`]; every method defaults
//! to passing the world through unchanged. Implementations must be pure
//! functions of the world and the context so ticks stay reproducible.

use verdant_types::World;

use crate::context::RunContext;

/// Stage implementations supplied by collaborating subsystems.
///
/// A collaborator may enqueue intents (consumed by the next workforce
/// stage that runs) and emit telemetry through the context.
pub trait Collaborators {
    /// Device condition and wear.
    fn apply_device_effects(&self, world: World, _ctx: &mut RunContext) -> World {
        world
    }

    /// Climate and environment.
    fn update_environment(&self, world: World, _ctx: &mut RunContext) -> World {
        world
    }

    /// Water and nutrient delivery.
    fn apply_irrigation(&self, world: World, _ctx: &mut RunContext) -> World {
        world
    }

    /// Plant growth and health.
    fn advance_physiology(&self, world: World, _ctx: &mut RunContext) -> World {
        world
    }

    /// Harvest and inventory.
    fn harvest(&self, world: World, _ctx: &mut RunContext) -> World {
        world
    }
}

/// Collaborators that leave the world untouched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoopCollaborators;

impl Collaborators for NoopCollaborators {}
