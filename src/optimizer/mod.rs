pub mod combinations;
pub mod dominance;
pub mod flex;
pub mod ranking;
pub mod rules;
pub mod scoring;
pub mod synergy;
pub mod team_generator;

use serde::Serialize;
use tracing::{debug, info};

use crate::config::AssaultConfig;
use crate::data::boss::{resolve_bosses, Boss};
use crate::data::roster::{Roster, Team};
use crate::data::unit::Unit;
use crate::error::{PlannerError, Result};
use crate::optimizer::combinations::{find_exclusive_combinations, Combination, BOSSES_PER_ASSAULT};
use crate::optimizer::dominance::DominanceFilter;
use crate::optimizer::flex::extend_with_flex;
use crate::optimizer::ranking::{rank_teams_for_boss, BossTeams, ScoredTeam};
use crate::optimizer::scoring::{score_members, ScoreOptions, ScoreReport};
use crate::optimizer::team_generator::{GeneratedTeams, TeamGenerator};
use crate::parallel::WorkerPool;

/// Per-boss outcome of the ranking stage.
#[derive(Debug, Clone, Serialize)]
pub struct BossDiagnostics {
    pub boss: String,
    pub viable: usize,
    pub lenient: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best: Option<ScoredTeam>,
}

impl BossDiagnostics {
    fn from_ranked(ranked: &BossTeams) -> Self {
        Self {
            boss: ranked.boss.name.clone(),
            viable: ranked.teams.len(),
            lenient: ranked.lenient,
            best: ranked.best().cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssaultReport {
    pub bosses: Vec<BossDiagnostics>,
    /// Best first, truncated to the configured limit.
    pub combinations: Vec<Combination>,
    /// Non-dominated combinations before truncation.
    pub total_found: usize,
    /// Combinations discarded by the dominance filter.
    pub dominated: usize,
    pub roster_size: usize,
    pub teams_generated: usize,
}

/// Team-builder output: one ranked list against the neutral boss.
#[derive(Debug, Clone, Serialize)]
pub struct TeamRanking {
    pub teams: Vec<ScoredTeam>,
    pub total_found: usize,
    pub lenient: bool,
}

/// Apply whitelist, blacklist and developer units to the dataset.
pub fn assemble_roster(units: &[Unit], config: &AssaultConfig) -> Result<Roster> {
    let mut selected: Vec<Unit> = units
        .iter()
        .filter(|unit| {
            config.whitelist.is_empty()
                || config.whitelist.iter().any(|name| unit.is_named(name))
        })
        .filter(|unit| !config.blacklist.iter().any(|name| unit.is_named(name)))
        .cloned()
        .collect();

    for record in &config.dev_units {
        let dev = Unit::try_from(record.clone())?;
        match selected.iter().position(|unit| unit.id == dev.id) {
            Some(existing) => selected[existing] = dev,
            None => selected.push(dev),
        }
    }
    Roster::new(selected)
}

/// Generated triples (plus pairs when asked), extended with flex units.
pub fn build_candidates(roster: &Roster, flex: &[String], include_pairs: bool) -> Result<Vec<Team>> {
    let flex_indices = roster.resolve_indices(flex)?;
    let GeneratedTeams { pairs, mut triples } = TeamGenerator::new().generate(roster);
    let created = extend_with_flex(roster, &pairs, &mut triples, &flex_indices);
    debug!(
        pairs = pairs.len(),
        triples = triples.len(),
        flex_created = created,
        "generated teams"
    );

    let mut candidates: Vec<Team> = triples.into_values().collect();
    if include_pairs {
        candidates.extend(pairs.into_values());
    }
    Ok(candidates)
}

/// Deadly-assault planner: best disjoint team per boss for three bosses.
pub fn plan_assault(units: &[Unit], bosses: &[Boss], config: &AssaultConfig) -> Result<AssaultReport> {
    if config.bosses.len() != BOSSES_PER_ASSAULT {
        return Err(PlannerError::BossCount {
            expected: BOSSES_PER_ASSAULT,
            found: config.bosses.len(),
        });
    }
    let selected_bosses = resolve_bosses(bosses, &config.bosses)?;
    let roster = assemble_roster(units, config)?;
    let candidates = build_candidates(&roster, &config.flex, config.include_pairs)?;
    let candidate_refs: Vec<&Team> = candidates.iter().collect();

    let pool = WorkerPool::with_workers(config.workers);
    let per_boss: Vec<BossTeams> = selected_bosses
        .iter()
        .map(|boss| rank_teams_for_boss(&candidate_refs, boss, &pool))
        .collect();
    let diagnostics: Vec<BossDiagnostics> = per_boss.iter().map(BossDiagnostics::from_ranked).collect();
    if config.verbose {
        for entry in &diagnostics {
            info!(
                boss = %entry.boss,
                viable = entry.viable,
                lenient = entry.lenient,
                best = entry.best.as_ref().map(|best| best.team.label()).unwrap_or("-"),
                "boss summary"
            );
        }
    }

    let found = find_exclusive_combinations(&per_boss, config.top_k)?;
    let before_filter = found.len();
    let mut combinations = DominanceFilter::new(&roster, &per_boss, config.top_k).apply(found);
    let total_found = combinations.len();
    combinations.truncate(config.limit);

    info!(
        roster = roster.len(),
        teams = candidates.len(),
        found = total_found,
        dominated = before_filter - total_found,
        "assault planned"
    );

    Ok(AssaultReport {
        bosses: diagnostics,
        combinations,
        total_found,
        dominated: before_filter - total_found,
        roster_size: roster.len(),
        teams_generated: candidates.len(),
    })
}

/// Team-builder mode: rank every generated team against the neutral boss.
pub fn rank_teams(units: &[Unit], flex: &[String], limit: usize) -> Result<TeamRanking> {
    let roster = Roster::new(units.to_vec())?;
    let candidates = build_candidates(&roster, flex, false)?;
    let candidate_refs: Vec<&Team> = candidates.iter().collect();
    let ranked = rank_teams_for_boss(&candidate_refs, &Boss::neutral(), &WorkerPool::sequential());

    let total_found = ranked.teams.len();
    let mut teams = ranked.teams;
    teams.truncate(limit);
    Ok(TeamRanking {
        teams,
        total_found,
        lenient: ranked.lenient,
    })
}

/// Score one hand-picked team against one boss, with the full rule trace.
pub fn score_named_team(
    units: &[Unit],
    boss: &Boss,
    names: &[String],
    lenient: bool,
) -> Result<ScoreReport> {
    let roster = Roster::new(units.to_vec())?;
    let mut indices = roster.resolve_indices(names)?;
    indices.sort_unstable();
    indices.dedup();
    if !(2..=3).contains(&indices.len()) {
        return Err(PlannerError::Config {
            message: format!("a team needs 2 or 3 distinct units, got {}", indices.len()),
        });
    }

    let team = Team::new(&roster, &indices);
    let options = if lenient {
        ScoreOptions::lenient()
    } else {
        ScoreOptions::strict()
    };
    Ok(score_members(team.members(), boss, options))
}
