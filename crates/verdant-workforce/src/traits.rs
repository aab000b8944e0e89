//! Trait effect engine.
//!
//! The trait set is closed ([`TraitKind`]); each trait is described by one
//! row of a static table holding its strength range, its conflicts, its
//! focus skills and a behaviour function. [`TraitRegistry::standard`] turns
//! that table into a validated registry once at startup: conflicts are
//! declared one-sided in the table and symmetrised there, so the registry is
//! never mutated afterwards.
//!
//! # Composition
//!
//! [`TraitRegistry::compose`] walks a subject's assignments in catalog
//! order. Multiplicative contributions (duration, fatigue, device wear, XP
//! rate) compose by product and are clamped to [`MULTIPLIER_MIN`]..=
//! [`MULTIPLIER_MAX`] after every step. Additive contributions (error rate,
//! morale, fatigue, salary) sum. The final error rate is clamped to
//! `[0, 1]` and the adjusted duration to non-negative.

use std::collections::BTreeSet;

use verdant_types::{TaskCategory, TraitAssignment, TraitKind};

use crate::error::TraitError;
use crate::rng::RngStream;

/// Lower bound of every composed multiplier.
pub const MULTIPLIER_MIN: f64 = 0.5;

/// Upper bound of every composed multiplier.
pub const MULTIPLIER_MAX: f64 = 1.5;

/// Strength range used by traits that do not declare their own.
pub const DEFAULT_STRENGTH_RANGE: (f64, f64) = (0.2, 1.0);

// ---------------------------------------------------------------------------
// Contributions
// ---------------------------------------------------------------------------

/// What the trait effect is being evaluated for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitEffectContext<'a> {
    /// Category of the task, `None` outside task execution (e.g. wage setting).
    pub category: Option<TaskCategory>,
    /// Skills the task requires.
    pub skills: &'a [String],
    /// Whether the task services a device.
    pub device_task: bool,
}

impl TraitEffectContext<'_> {
    /// Context used when no task is involved.
    pub const NONE: TraitEffectContext<'static> = TraitEffectContext {
        category: None,
        skills: &[],
        device_task: false,
    };
}

/// Base values the composed effects are applied to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitEffectBase {
    /// Nominal task duration in minutes.
    pub duration_minutes: f64,
    /// Error rate before traits.
    pub error_rate01: f64,
}

/// Partial effect of one trait at one strength.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitContribution {
    /// Multiplier on task duration.
    pub duration_multiplier: f64,
    /// Multiplier on fatigue gained while working.
    pub fatigue_multiplier: f64,
    /// Multiplier on wear of serviced devices.
    pub device_wear_multiplier: f64,
    /// Multiplier on experience gain.
    pub xp_rate_multiplier: f64,
    /// Added to the error rate.
    pub error_rate_delta: f64,
    /// Added to morale per completed task.
    pub morale_delta: f64,
    /// Added to fatigue per completed task.
    pub fatigue_delta: f64,
    /// Fractional adjustment of the expected wage.
    pub salary_delta: f64,
}

impl TraitContribution {
    /// A contribution that changes nothing.
    pub const NEUTRAL: Self = Self {
        duration_multiplier: 1.0,
        fatigue_multiplier: 1.0,
        device_wear_multiplier: 1.0,
        xp_rate_multiplier: 1.0,
        error_rate_delta: 0.0,
        morale_delta: 0.0,
        fatigue_delta: 0.0,
        salary_delta: 0.0,
    };
}

impl Default for TraitContribution {
    fn default() -> Self {
        Self::NEUTRAL
    }
}

/// Inputs handed to a behaviour function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BehaviorInput<'a> {
    /// Strength of the assignment.
    pub strength01: f64,
    /// Whether the task touches one of the trait's focus skills. Always true
    /// for traits without focus skills.
    pub focused: bool,
    /// Evaluation context.
    pub context: &'a TraitEffectContext<'a>,
}

/// A trait's behaviour.
pub type TraitBehavior = fn(&BehaviorInput<'_>) -> TraitContribution;

/// One contribution in a composed outcome, for auditing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TraitBreakdownEntry {
    /// Trait that contributed.
    pub trait_id: TraitKind,
    /// Strength it contributed at.
    pub strength01: f64,
    /// What it contributed.
    pub contribution: TraitContribution,
}

/// Composed trait effects for one subject.
#[derive(Debug, Clone, PartialEq)]
pub struct TraitEffectOutcome {
    /// Product of duration multipliers.
    pub duration_multiplier: f64,
    /// Product of fatigue multipliers.
    pub fatigue_multiplier: f64,
    /// Product of device wear multipliers.
    pub device_wear_multiplier: f64,
    /// Product of XP rate multipliers.
    pub xp_rate_multiplier: f64,
    /// Sum of morale deltas.
    pub morale_delta: f64,
    /// Sum of fatigue deltas.
    pub fatigue_delta: f64,
    /// Sum of salary deltas.
    pub salary_delta: f64,
    /// Base duration times the duration multiplier, never negative.
    pub adjusted_duration_minutes: f64,
    /// Base error rate plus deltas, clamped to `[0, 1]`.
    pub error_rate01: f64,
    /// Per-trait contributions sorted by trait id.
    pub breakdown: Vec<TraitBreakdownEntry>,
}

// ---------------------------------------------------------------------------
// Static table
// ---------------------------------------------------------------------------

/// One row of the trait table.
#[derive(Debug, Clone, Copy)]
pub struct TraitSpec {
    /// Which trait.
    pub kind: TraitKind,
    /// Strength range; `None` uses [`DEFAULT_STRENGTH_RANGE`].
    pub strength_range: Option<(f64, f64)>,
    /// Conflicts, possibly declared on one side only.
    pub conflicts: &'static [TraitKind],
    /// Skills the trait's task effects are limited to.
    pub focus_skills: &'static [&'static str],
    /// Behaviour.
    pub behavior: TraitBehavior,
}

/// The built-in trait table in catalog order.
pub const TRAIT_TABLE: [TraitSpec; 12] = [
    TraitSpec {
        kind: TraitKind::GreenThumb,
        strength_range: None,
        conflicts: &[],
        focus_skills: &["gardening"],
        behavior: green_thumb,
    },
    TraitSpec {
        kind: TraitKind::Gearhead,
        strength_range: None,
        conflicts: &[TraitKind::Clumsy],
        focus_skills: &["maintenance"],
        behavior: gearhead,
    },
    TraitSpec {
        kind: TraitKind::Meticulous,
        strength_range: Some((0.3, 1.0)),
        conflicts: &[],
        focus_skills: &[],
        behavior: meticulous,
    },
    TraitSpec {
        kind: TraitKind::Forgetful,
        strength_range: Some((0.2, 0.8)),
        conflicts: &[TraitKind::Meticulous],
        focus_skills: &[],
        behavior: forgetful,
    },
    TraitSpec {
        kind: TraitKind::Clumsy,
        strength_range: Some((0.2, 0.8)),
        conflicts: &[],
        focus_skills: &[],
        behavior: clumsy,
    },
    TraitSpec {
        kind: TraitKind::Slacker,
        strength_range: None,
        conflicts: &[TraitKind::Motivated],
        focus_skills: &[],
        behavior: slacker,
    },
    TraitSpec {
        kind: TraitKind::Motivated,
        strength_range: None,
        conflicts: &[],
        focus_skills: &[],
        behavior: motivated,
    },
    TraitSpec {
        kind: TraitKind::Resilient,
        strength_range: None,
        conflicts: &[],
        focus_skills: &[],
        behavior: resilient,
    },
    TraitSpec {
        kind: TraitKind::QuickLearner,
        strength_range: None,
        conflicts: &[],
        focus_skills: &[],
        behavior: quick_learner,
    },
    TraitSpec {
        kind: TraitKind::Frugal,
        strength_range: Some((0.3, 1.0)),
        conflicts: &[TraitKind::Demanding],
        focus_skills: &[],
        behavior: frugal,
    },
    TraitSpec {
        kind: TraitKind::Demanding,
        strength_range: Some((0.3, 1.0)),
        conflicts: &[],
        focus_skills: &[],
        behavior: demanding,
    },
    TraitSpec {
        kind: TraitKind::Optimist,
        strength_range: None,
        conflicts: &[],
        focus_skills: &[],
        behavior: optimist,
    },
];

fn green_thumb(input: &BehaviorInput<'_>) -> TraitContribution {
    if !input.focused {
        return TraitContribution::NEUTRAL;
    }
    let s = input.strength01;
    TraitContribution {
        duration_multiplier: 0.2f64.mul_add(-s, 1.0),
        error_rate_delta: -0.02 * s,
        ..TraitContribution::NEUTRAL
    }
}

fn gearhead(input: &BehaviorInput<'_>) -> TraitContribution {
    let s = input.strength01;
    let wear = if input.context.device_task {
        0.3f64.mul_add(-s, 1.0)
    } else {
        1.0
    };
    if !input.focused {
        return TraitContribution {
            device_wear_multiplier: wear,
            ..TraitContribution::NEUTRAL
        };
    }
    TraitContribution {
        duration_multiplier: 0.15f64.mul_add(-s, 1.0),
        device_wear_multiplier: wear,
        ..TraitContribution::NEUTRAL
    }
}

fn meticulous(input: &BehaviorInput<'_>) -> TraitContribution {
    let s = input.strength01;
    TraitContribution {
        duration_multiplier: 0.1f64.mul_add(s, 1.0),
        error_rate_delta: -0.04 * s,
        ..TraitContribution::NEUTRAL
    }
}

fn forgetful(input: &BehaviorInput<'_>) -> TraitContribution {
    TraitContribution {
        error_rate_delta: 0.05 * input.strength01,
        ..TraitContribution::NEUTRAL
    }
}

fn clumsy(input: &BehaviorInput<'_>) -> TraitContribution {
    let s = input.strength01;
    TraitContribution {
        device_wear_multiplier: if input.context.device_task {
            0.4f64.mul_add(s, 1.0)
        } else {
            1.0
        },
        error_rate_delta: 0.02 * s,
        ..TraitContribution::NEUTRAL
    }
}

fn slacker(input: &BehaviorInput<'_>) -> TraitContribution {
    let s = input.strength01;
    TraitContribution {
        duration_multiplier: 0.2f64.mul_add(s, 1.0),
        fatigue_multiplier: 0.2f64.mul_add(-s, 1.0),
        ..TraitContribution::NEUTRAL
    }
}

fn motivated(input: &BehaviorInput<'_>) -> TraitContribution {
    let s = input.strength01;
    TraitContribution {
        duration_multiplier: 0.1f64.mul_add(-s, 1.0),
        morale_delta: 0.002 * s,
        ..TraitContribution::NEUTRAL
    }
}

fn resilient(input: &BehaviorInput<'_>) -> TraitContribution {
    TraitContribution {
        fatigue_multiplier: 0.3f64.mul_add(-input.strength01, 1.0),
        ..TraitContribution::NEUTRAL
    }
}

fn quick_learner(input: &BehaviorInput<'_>) -> TraitContribution {
    TraitContribution {
        xp_rate_multiplier: 0.5f64.mul_add(input.strength01, 1.0),
        ..TraitContribution::NEUTRAL
    }
}

fn frugal(input: &BehaviorInput<'_>) -> TraitContribution {
    TraitContribution {
        salary_delta: -0.1 * input.strength01,
        ..TraitContribution::NEUTRAL
    }
}

fn demanding(input: &BehaviorInput<'_>) -> TraitContribution {
    let s = input.strength01;
    TraitContribution {
        salary_delta: 0.15 * s,
        morale_delta: -0.002 * s,
        ..TraitContribution::NEUTRAL
    }
}

fn optimist(input: &BehaviorInput<'_>) -> TraitContribution {
    TraitContribution {
        morale_delta: 0.005 * input.strength01,
        ..TraitContribution::NEUTRAL
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// A validated trait definition.
#[derive(Debug, Clone)]
pub struct TraitDefinition {
    /// Which trait.
    pub kind: TraitKind,
    /// Inclusive strength range.
    pub strength_range: (f64, f64),
    /// Symmetric conflict set.
    pub conflicts: BTreeSet<TraitKind>,
    /// Focus skills; empty means the trait applies to every task.
    pub focus_skills: &'static [&'static str],
    behavior: TraitBehavior,
}

impl TraitDefinition {
    /// `strength01` clamped to the declared range.
    pub fn clamp_strength(&self, strength01: f64) -> f64 {
        let (min, max) = self.strength_range;
        strength01.clamp(min, max)
    }

    /// Evaluate the behaviour at `strength01`, clamped to the declared range.
    pub fn evaluate(&self, strength01: f64, context: &TraitEffectContext<'_>) -> TraitContribution {
        let focused = self.focus_skills.is_empty()
            || context
                .skills
                .iter()
                .any(|skill| self.focus_skills.contains(&skill.as_str()));
        (self.behavior)(&BehaviorInput {
            strength01: self.clamp_strength(strength01),
            focused,
            context,
        })
    }
}

/// Validated, immutable trait registry indexed by catalog order.
#[derive(Debug, Clone)]
pub struct TraitRegistry {
    definitions: Vec<TraitDefinition>,
}

impl TraitRegistry {
    /// Registry over the built-in [`TRAIT_TABLE`].
    pub fn standard() -> Result<Self, TraitError> {
        Self::from_table(&TRAIT_TABLE)
    }

    /// Validate a table and symmetrise its conflicts.
    pub fn from_table(table: &[TraitSpec]) -> Result<Self, TraitError> {
        if table.len() != TraitKind::ALL.len()
            || TraitKind::ALL
                .iter()
                .any(|kind| table.get(kind.catalog_index()).map(|s| s.kind) != Some(*kind))
        {
            return Err(TraitError::IncompleteTable {
                found: table.len(),
                expected: TraitKind::ALL.len(),
            });
        }

        let mut definitions = Vec::with_capacity(table.len());
        for spec in table {
            let (min, max) = spec.strength_range.unwrap_or(DEFAULT_STRENGTH_RANGE);
            if !(0.0..=1.0).contains(&min) || !(0.0..=1.0).contains(&max) || min > max {
                return Err(TraitError::InvalidStrengthRange {
                    trait_kind: spec.kind,
                    min,
                    max,
                });
            }
            if spec.conflicts.contains(&spec.kind) {
                return Err(TraitError::SelfConflict(spec.kind));
            }
            definitions.push(TraitDefinition {
                kind: spec.kind,
                strength_range: (min, max),
                conflicts: spec.conflicts.iter().copied().collect(),
                focus_skills: spec.focus_skills,
                behavior: spec.behavior,
            });
        }

        // Symmetric closure: A conflicts with B implies B conflicts with A.
        let edges: Vec<(TraitKind, TraitKind)> = definitions
            .iter()
            .flat_map(|d| d.conflicts.iter().map(move |other| (d.kind, *other)))
            .collect();
        for (from, to) in edges {
            if let Some(def) = definitions.get_mut(to.catalog_index()) {
                def.conflicts.insert(from);
            }
        }

        Ok(Self { definitions })
    }

    /// Definition of a trait.
    pub fn definition(&self, kind: TraitKind) -> Option<&TraitDefinition> {
        self.definitions.get(kind.catalog_index())
    }

    /// Whether two traits conflict.
    pub fn conflicts(&self, a: TraitKind, b: TraitKind) -> bool {
        self.definition(a).is_some_and(|d| d.conflicts.contains(&b))
    }

    /// Compose the effects of `assignments` over `base`.
    pub fn compose(
        &self,
        assignments: &[TraitAssignment],
        context: &TraitEffectContext<'_>,
        base: TraitEffectBase,
    ) -> TraitEffectOutcome {
        let mut ordered: Vec<&TraitAssignment> = assignments.iter().collect();
        ordered.sort_by_key(|a| a.trait_id.catalog_index());

        let mut duration = 1.0;
        let mut fatigue = 1.0;
        let mut wear = 1.0;
        let mut xp = 1.0;
        let mut error_delta = 0.0;
        let mut morale_delta = 0.0;
        let mut fatigue_delta = 0.0;
        let mut salary_delta = 0.0;
        let mut breakdown = Vec::with_capacity(ordered.len());

        for assignment in ordered {
            let Some(definition) = self.definition(assignment.trait_id) else {
                continue;
            };
            let strength01 = definition.clamp_strength(assignment.strength01);
            let contribution = definition.evaluate(strength01, context);
            duration = clamp_multiplier(duration * contribution.duration_multiplier);
            fatigue = clamp_multiplier(fatigue * contribution.fatigue_multiplier);
            wear = clamp_multiplier(wear * contribution.device_wear_multiplier);
            xp = clamp_multiplier(xp * contribution.xp_rate_multiplier);
            error_delta += contribution.error_rate_delta;
            morale_delta += contribution.morale_delta;
            fatigue_delta += contribution.fatigue_delta;
            salary_delta += contribution.salary_delta;
            breakdown.push(TraitBreakdownEntry {
                trait_id: assignment.trait_id,
                strength01,
                contribution,
            });
        }

        breakdown.sort_by(|a, b| a.trait_id.id().cmp(b.trait_id.id()));

        TraitEffectOutcome {
            duration_multiplier: duration,
            fatigue_multiplier: fatigue,
            device_wear_multiplier: wear,
            xp_rate_multiplier: xp,
            morale_delta,
            fatigue_delta,
            salary_delta,
            adjusted_duration_minutes: (base.duration_minutes * duration).max(0.0),
            error_rate01: (base.error_rate01 + error_delta).clamp(0.0, 1.0),
            breakdown,
        }
    }

    /// Draw up to `max_traits` non-conflicting traits with strengths inside
    /// each trait's range. The result is in catalog order.
    pub fn sample(&self, rng: &mut RngStream, max_traits: u32) -> Vec<TraitAssignment> {
        let wanted = rng.next_index(usize::try_from(max_traits).unwrap_or(0).saturating_add(1));
        let mut pool = TraitKind::ALL.to_vec();
        for i in (1..pool.len()).rev() {
            let j = rng.next_index(i.saturating_add(1));
            pool.swap(i, j);
        }

        let mut chosen: Vec<TraitAssignment> = Vec::with_capacity(wanted);
        for kind in pool {
            if chosen.len() >= wanted {
                break;
            }
            if chosen.iter().any(|c| self.conflicts(c.trait_id, kind)) {
                continue;
            }
            let Some(definition) = self.definition(kind) else {
                continue;
            };
            let (min, max) = definition.strength_range;
            let strength01 = if max > min { rng.next_range(min, max) } else { min };
            chosen.push(TraitAssignment {
                trait_id: kind,
                strength01,
            });
        }
        chosen.sort_by_key(|a| a.trait_id.catalog_index());
        chosen
    }
}

const fn clamp_multiplier(value: f64) -> f64 {
    value.clamp(MULTIPLIER_MIN, MULTIPLIER_MAX)
}
