//! Simulation clock.
//!
//! The world snapshot carries the number of ticks simulated so far and the
//! simulation time in hours. [`TickClock`] derives the reading for the next
//! tick from those two values and the [`WorldConfig`] time model.
//!
//! # Design Principles
//!
//! - The tick counter advances with checked arithmetic (no silent overflow).
//! - The day index is derived from simulation hours, never stored
//!   independently.

use verdant_types::{World, day_index_for};

use crate::config::WorldConfig;

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,

    /// Simulation time is not a finite, non-negative number.
    #[error("simulation time {hours} is not a valid number of hours")]
    InvalidTime {
        /// The offending value.
        hours: f64,
    },

    /// Invalid time configuration.
    #[error("invalid time configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong with the configuration.
        reason: String,
    },
}

/// Time at the start of a tick, after the clock advanced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClockReading {
    /// Tick being simulated (1-based).
    pub tick: u64,
    /// Simulation time in hours.
    pub sim_hours: f64,
    /// `floor(sim_hours / hours_per_day)`.
    pub day_index: u64,
}

/// Fixed-step clock.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickClock {
    hours_per_tick: f64,
    hours_per_day: f64,
}

impl TickClock {
    /// Build a clock from the time model.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::InvalidConfig`] if either length is not positive.
    pub fn new(config: &WorldConfig) -> Result<Self, ClockError> {
        if !(config.hours_per_tick.is_finite() && config.hours_per_tick > 0.0) {
            return Err(ClockError::InvalidConfig {
                reason: "hours_per_tick must be positive".to_owned(),
            });
        }
        if !(config.hours_per_day.is_finite() && config.hours_per_day > 0.0) {
            return Err(ClockError::InvalidConfig {
                reason: "hours_per_day must be positive".to_owned(),
            });
        }
        Ok(Self {
            hours_per_tick: config.hours_per_tick,
            hours_per_day: config.hours_per_day,
        })
    }

    /// Simulated hours per tick.
    pub const fn hours_per_tick(&self) -> f64 {
        self.hours_per_tick
    }

    /// Hours per simulation day.
    pub const fn hours_per_day(&self) -> f64 {
        self.hours_per_day
    }

    /// Number of ticks in one simulation day, rounded up.
    pub fn ticks_per_day(&self) -> u64 {
        let ticks = (self.hours_per_day / self.hours_per_tick).ceil();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let ticks = ticks.max(1.0) as u64;
        ticks
    }

    /// Reading for the tick that follows `world`.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter is exhausted
    /// and [`ClockError::InvalidTime`] if the world carries a bad time.
    pub fn advance(&self, world: &World) -> Result<ClockReading, ClockError> {
        if !world.sim_time_hours.is_finite() || world.sim_time_hours < 0.0 {
            return Err(ClockError::InvalidTime {
                hours: world.sim_time_hours,
            });
        }
        let tick = world.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        let sim_hours = world.sim_time_hours + self.hours_per_tick;
        if !sim_hours.is_finite() {
            return Err(ClockError::InvalidTime { hours: sim_hours });
        }
        Ok(ClockReading {
            tick,
            sim_hours,
            day_index: day_index_for(sim_hours, self.hours_per_day),
        })
    }
}
