//! The fixed stage order of a tick.

use core::fmt;

/// A named pipeline stage. [`PipelineStage::ORDER`] is the execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PipelineStage {
    /// Device condition and wear effects.
    DeviceEffects,
    /// Climate and environment update.
    Environment,
    /// Water and nutrient delivery.
    Irrigation,
    /// Intents, dispatch, payroll accrual.
    Workforce,
    /// Plant growth and health.
    Physiology,
    /// Harvest and inventory.
    Harvest,
    /// Fold labour cost into company finances.
    EconomyAccrual,
    /// Stamp and hand off buffered telemetry.
    CommitTelemetry,
}

impl PipelineStage {
    /// Every stage, in execution order.
    pub const ORDER: [Self; 8] = [
        Self::DeviceEffects,
        Self::Environment,
        Self::Irrigation,
        Self::Workforce,
        Self::Physiology,
        Self::Harvest,
        Self::EconomyAccrual,
        Self::CommitTelemetry,
    ];

    /// Stable name used in spans and traces.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DeviceEffects => "device_effects",
            Self::Environment => "environment",
            Self::Irrigation => "irrigation",
            Self::Workforce => "workforce",
            Self::Physiology => "physiology",
            Self::Harvest => "harvest",
            Self::EconomyAccrual => "economy_accrual",
            Self::CommitTelemetry => "commit_telemetry",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_matches_declaration_order() {
        let mut sorted = PipelineStage::ORDER;
        sorted.sort();
        assert_eq!(sorted, PipelineStage::ORDER);
        assert_eq!(PipelineStage::ORDER.first(), Some(&PipelineStage::DeviceEffects));
        assert_eq!(PipelineStage::ORDER.last(), Some(&PipelineStage::CommitTelemetry));
    }

    #[test]
    fn workforce_runs_before_economy() {
        let position = |stage| PipelineStage::ORDER.iter().position(|s| *s == stage);
        assert!(position(PipelineStage::Workforce) < position(PipelineStage::EconomyAccrual));
        assert_eq!(PipelineStage::EconomyAccrual.to_string(), "economy_accrual");
    }
}
