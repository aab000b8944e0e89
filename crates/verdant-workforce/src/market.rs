//! Hiring market: per-structure candidate pools.
//!
//! A scan regenerates a structure's pool once its cooldown has elapsed. Each
//! of the `pool_size` slots draws from its own stream,
//! `"workforce:scan:<structure>:<counter>:<slot>"`, so a candidate depends
//! only on the world seed, the structure, the scan counter and its slot.
//! Hiring removes a candidate from the pool and turns it into an
//! [`Employee`].

use std::collections::BTreeMap;

use tracing::debug;
use verdant_types::{
    CandidateId, Employee, EmployeeDayUsage, EmployeeExperience, EmployeeId, EmployeeRaiseState,
    EmployeeRngSeed, EmployeeRole, EmployeeSchedule, SkillTriad, SkillValue, StructureId,
    WorkforceMarketCandidate, WorkforceMarketState, day_index_for,
};

use crate::config::{MarketConfig, RaiseConfig};
use crate::rng::{RngStream, create_stream};
use crate::traits::{TraitEffectBase, TraitEffectContext, TraitRegistry};

/// Role slug given to candidates when the role catalog is empty.
pub const GENERALIST_SLUG: &str = "generalist";

/// Everything a scan depends on.
#[derive(Debug, Clone, Copy)]
pub struct ScanRequest<'a> {
    /// World seed.
    pub seed: &'a str,
    /// Structure to scan for.
    pub structure_id: &'a StructureId,
    /// Current simulation time in hours.
    pub sim_hours: f64,
    /// Hours per simulation day.
    pub hours_per_day: f64,
    /// Role catalog.
    pub roles: &'a [EmployeeRole],
}

/// Result of [`perform_scan`].
#[derive(Debug, Clone, PartialEq)]
pub struct ScanOutcome {
    /// Market after the scan.
    pub market: WorkforceMarketState,
    /// The fresh pool, if a scan happened.
    pub pool: Option<Vec<WorkforceMarketCandidate>>,
    /// The new scan counter, if a scan happened.
    pub scan_counter: Option<u32>,
    /// Whether the cooldown allowed a scan.
    pub did_scan: bool,
}

/// Result of [`perform_hire`].
#[derive(Debug, Clone, PartialEq)]
pub struct HireOutcome {
    /// Market after the hire.
    pub market: WorkforceMarketState,
    /// The hired candidate, `None` if the id was not in the pool.
    pub candidate: Option<WorkforceMarketCandidate>,
}

/// Refresh a structure's pool if its cooldown has elapsed.
pub fn perform_scan(
    market: &WorkforceMarketState,
    config: &MarketConfig,
    registry: &TraitRegistry,
    request: &ScanRequest<'_>,
) -> ScanOutcome {
    let day = day_index_for(request.sim_hours, request.hours_per_day);
    let current = market
        .structures
        .get(request.structure_id)
        .cloned()
        .unwrap_or_default();

    let cooled_down = current
        .last_scan_day
        .is_none_or(|last| day >= last.saturating_add(config.scan_cooldown_days));
    if !cooled_down {
        return ScanOutcome {
            market: market.clone(),
            pool: None,
            scan_counter: None,
            did_scan: false,
        };
    }

    let counter = current.scan_counter.saturating_add(1);
    let pool = generate_pool(config, registry, request, counter);

    let mut next = market.clone();
    let entry = next
        .structures
        .entry(request.structure_id.clone())
        .or_default();
    entry.last_scan_day = Some(day);
    entry.scan_counter = counter;
    entry.pool.clone_from(&pool);

    debug!(
        structure = %request.structure_id,
        day,
        counter,
        candidates = pool.len(),
        "market scan"
    );

    ScanOutcome {
        market: next,
        pool: Some(pool),
        scan_counter: Some(counter),
        did_scan: true,
    }
}

/// Remove a candidate from a structure's pool.
///
/// An unknown structure or candidate leaves the market unchanged.
pub fn perform_hire(
    market: &WorkforceMarketState,
    structure_id: &StructureId,
    candidate_id: &CandidateId,
) -> HireOutcome {
    let position = market.structures.get(structure_id).and_then(|state| {
        state
            .pool
            .iter()
            .position(|c| &c.id == candidate_id && c.valid_until_scan_counter >= state.scan_counter)
    });
    let Some(position) = position else {
        return HireOutcome {
            market: market.clone(),
            candidate: None,
        };
    };

    let mut next = market.clone();
    let candidate = next
        .structures
        .get_mut(structure_id)
        .filter(|state| position < state.pool.len())
        .map(|state| state.pool.remove(position));
    HireOutcome {
        market: next,
        candidate,
    }
}

/// Turn a hired candidate into a roster entry.
pub fn onboard_candidate(
    candidate: &WorkforceMarketCandidate,
    role: &EmployeeRole,
    seed: &str,
    day: u64,
    market: &MarketConfig,
    raises: &RaiseConfig,
) -> Employee {
    let skills: BTreeMap<String, f64> = candidate
        .skills
        .iter()
        .map(|s| (s.skill.clone(), s.level01))
        .collect();
    let hire = &market.hire;
    Employee {
        id: EmployeeId::from_candidate(seed, &candidate.id),
        name: format!("{} {}", role.name, candidate.id),
        role_id: role.id.clone(),
        rng_seed: EmployeeRngSeed::from_candidate(seed, &candidate.id),
        assigned_structure_id: candidate.structure_id.clone(),
        morale01: hire.morale01.clamp(0.0, 1.0),
        fatigue01: 0.0,
        skills,
        skill_triad: Some(candidate.skills.clone()),
        traits: candidate.traits.clone(),
        schedule: EmployeeSchedule {
            hours_per_day: hire.hours_per_day,
            overtime_hours_per_day: hire.overtime_hours_per_day,
            days_per_week: hire.days_per_week,
        },
        experience: EmployeeExperience::default(),
        base_rate_multiplier: 1.0,
        labor_market_factor: 1.0,
        time_premium_multiplier: 1.0,
        employment_start_day: day,
        salary_expectation_per_hour: candidate.expected_base_rate_per_hour,
        raise_state: EmployeeRaiseState {
            cadence_sequence: 0,
            last_raise_day: None,
            next_eligible_day: Some(day.saturating_add(raises.min_employment_days)),
        },
        usage: EmployeeDayUsage {
            day_index: day,
            ..EmployeeDayUsage::default()
        },
    }
}

// ---------------------------------------------------------------------------
// Generation
// ---------------------------------------------------------------------------

fn generate_pool(
    config: &MarketConfig,
    registry: &TraitRegistry,
    request: &ScanRequest<'_>,
    counter: u32,
) -> Vec<WorkforceMarketCandidate> {
    let universe = skill_universe(request.roles, config);
    (0..config.pool_size)
        .map(|slot| {
            let stream_id = format!("workforce:scan:{}:{counter}:{slot}", request.structure_id);
            let mut rng = create_stream(request.seed, &stream_id);
            generate_candidate(config, registry, request, &universe, counter, slot, &mut rng)
        })
        .collect()
}

fn generate_candidate(
    config: &MarketConfig,
    registry: &TraitRegistry,
    request: &ScanRequest<'_>,
    universe: &[String],
    counter: u32,
    slot: u32,
    rng: &mut RngStream,
) -> WorkforceMarketCandidate {
    let role = rng.pick(request.roles);
    let role_slug = role.map_or_else(|| GENERALIST_SLUG.to_owned(), |r| r.slug.clone());

    let core: Vec<(&str, f64)> = role
        .map(|r| {
            r.core_skills
                .iter()
                .map(|s| (s.skill.as_str(), s.min_level01))
                .collect()
        })
        .unwrap_or_default();
    let (main_skill, main_floor) = rng
        .pick(&core)
        .copied()
        .or_else(|| rng.pick(universe).map(|s| (s.as_str(), 0.0)))
        .unwrap_or(("general", 0.0));

    let (lo, hi) = config.main_skill_range;
    let main_level = round3(rng.next_range(lo, hi).max(main_floor).clamp(0.0, 1.0));

    let mut remaining: Vec<&str> = universe
        .iter()
        .map(String::as_str)
        .filter(|s| *s != main_skill)
        .collect();
    if remaining.len() < 2 {
        for fallback in &config.fallback_skills {
            if fallback != main_skill && !remaining.contains(&fallback.as_str()) {
                remaining.push(fallback);
            }
        }
    }
    let (slo, shi) = config.secondary_skill_range;
    let mut draw_secondary = |rng: &mut RngStream| {
        let index = rng.next_index(remaining.len());
        let skill = if index < remaining.len() {
            remaining.remove(index).to_owned()
        } else {
            "general".to_owned()
        };
        SkillValue {
            skill,
            level01: round3(rng.next_range(slo, shi).clamp(0.0, 1.0)),
        }
    };
    let first = draw_secondary(rng);
    let second = draw_secondary(rng);

    let traits = registry.sample(rng, config.max_traits);
    let salary_delta = registry
        .compose(
            &traits,
            &TraitEffectContext::NONE,
            TraitEffectBase {
                duration_minutes: 0.0,
                error_rate01: 0.0,
            },
        )
        .salary_delta;
    let base_wage = config.wage_skill_multiplier.mul_add(main_level, config.wage_offset);
    let expected = round2((base_wage * (1.0 + salary_delta)).max(0.0));

    WorkforceMarketCandidate {
        id: CandidateId::new(format!("cand:{}:{counter}:{slot:02}", request.structure_id)),
        structure_id: request.structure_id.clone(),
        role_slug,
        skills: SkillTriad {
            main: SkillValue {
                skill: main_skill.to_owned(),
                level01: main_level,
            },
            secondary: [first, second],
        },
        traits,
        expected_base_rate_per_hour: expected,
        valid_until_scan_counter: counter,
    }
}

/// Skills the market draws from: the roles' core skills in first-seen
/// order, or the configured universe when no role declares any.
fn skill_universe(roles: &[EmployeeRole], config: &MarketConfig) -> Vec<String> {
    let mut skills: Vec<String> = Vec::new();
    for skill in roles.iter().flat_map(|r| r.core_skills.iter()) {
        if !skills.contains(&skill.skill) {
            skills.push(skill.skill.clone());
        }
    }
    if skills.is_empty() {
        skills.clone_from(&config.skill_universe);
    }
    skills
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

#[cfg(test)]
mod tests {
    use verdant_types::{RoleCompensation, RoleId, RoleSkill};

    use super::*;

    fn roles() -> Vec<EmployeeRole> {
        vec![
            EmployeeRole {
                id: RoleId::new("role-gardener"),
                slug: "gardener".to_owned(),
                name: "Gardener".to_owned(),
                core_skills: vec![RoleSkill {
                    skill: "gardening".to_owned(),
                    min_level01: 0.3,
                }],
                compensation: RoleCompensation::default(),
            },
            EmployeeRole {
                id: RoleId::new("role-tech"),
                slug: "technician".to_owned(),
                name: "Technician".to_owned(),
                core_skills: vec![RoleSkill {
                    skill: "maintenance".to_owned(),
                    min_level01: 0.0,
                }],
                compensation: RoleCompensation::default(),
            },
        ]
    }

    fn registry() -> TraitRegistry {
        TraitRegistry::standard().unwrap_or_else(|e| panic!("{e}"))
    }

    fn scan(market: &WorkforceMarketState, sim_hours: f64, roles: &[EmployeeRole]) -> ScanOutcome {
        let structure = StructureId::new("s-1");
        perform_scan(
            market,
            &MarketConfig::default(),
            &registry(),
            &ScanRequest {
                seed: "s1",
                structure_id: &structure,
                sim_hours,
                hours_per_day: 24.0,
                roles,
            },
        )
    }

    #[test]
    fn first_scan_fills_pool_and_bumps_counter() {
        let roles = roles();
        let outcome = scan(&WorkforceMarketState::default(), 0.0, &roles);
        assert!(outcome.did_scan);
        assert_eq!(outcome.scan_counter, Some(1));
        let pool = outcome.pool.unwrap_or_default();
        assert_eq!(pool.len(), 16);
        let first = pool.first().map(|c| c.id.as_str().to_owned());
        assert_eq!(first.as_deref(), Some("cand:s-1:1:00"));
        for candidate in &pool {
            assert!(candidate.expected_base_rate_per_hour > 0.0);
            let skills: Vec<&str> = candidate.skills.iter().map(|s| s.skill.as_str()).collect();
            assert_eq!(skills.len(), 3);
            assert!(skills.iter().skip(1).all(|s| *s != skills.first().copied().unwrap_or("")));
            assert!(candidate.role_slug == "gardener" || candidate.role_slug == "technician");
        }
    }

    #[test]
    fn scans_are_deterministic() {
        let roles = roles();
        let a = scan(&WorkforceMarketState::default(), 0.0, &roles);
        let b = scan(&WorkforceMarketState::default(), 0.0, &roles);
        assert_eq!(a, b);
    }

    #[test]
    fn cooldown_blocks_rescan_until_elapsed() {
        let roles = roles();
        let first = scan(&WorkforceMarketState::default(), 0.0, &roles);
        let blocked = scan(&first.market, 29.0 * 24.0, &roles);
        assert!(!blocked.did_scan);
        assert_eq!(blocked.market, first.market);
        let again = scan(&first.market, 30.0 * 24.0, &roles);
        assert!(again.did_scan);
        assert_eq!(again.scan_counter, Some(2));
    }

    #[test]
    fn empty_catalog_falls_back_to_universe() {
        let outcome = scan(&WorkforceMarketState::default(), 0.0, &[]);
        let pool = outcome.pool.unwrap_or_default();
        assert!(pool.iter().all(|c| c.role_slug == GENERALIST_SLUG));
        let universe = MarketConfig::default().skill_universe;
        assert!(pool.iter().all(|c| universe.contains(&c.skills.main.skill)));
    }

    #[test]
    fn hire_removes_candidate_once() {
        let roles = roles();
        let scanned = scan(&WorkforceMarketState::default(), 0.0, &roles);
        let structure = StructureId::new("s-1");
        let id = CandidateId::new("cand:s-1:1:03");
        let hired = perform_hire(&scanned.market, &structure, &id);
        assert_eq!(hired.candidate.as_ref().map(|c| &c.id), Some(&id));
        let pool_len = hired
            .market
            .structures
            .get(&structure)
            .map_or(0, |s| s.pool.len());
        assert_eq!(pool_len, 15);

        let again = perform_hire(&hired.market, &structure, &id);
        assert!(again.candidate.is_none());
        assert_eq!(again.market, hired.market);
    }

    #[test]
    fn onboarding_is_deterministic() {
        let roles = roles();
        let scanned = scan(&WorkforceMarketState::default(), 0.0, &roles);
        let candidate = scanned
            .pool
            .and_then(|p| p.into_iter().next())
            .unwrap_or_else(|| panic!("empty pool"));
        let role = roles
            .iter()
            .find(|r| r.slug == candidate.role_slug)
            .unwrap_or_else(|| panic!("role missing"));
        let a = onboard_candidate(&candidate, role, "s1", 3, &MarketConfig::default(), &RaiseConfig::default());
        let b = onboard_candidate(&candidate, role, "s1", 3, &MarketConfig::default(), &RaiseConfig::default());
        assert_eq!(a.id, b.id);
        assert_eq!(a.raise_state.next_eligible_day, Some(183));
        assert_eq!(a.skills.len(), 3);
    }
}
