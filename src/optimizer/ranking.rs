use serde::Serialize;
use tracing::{debug, warn};

use crate::data::boss::Boss;
use crate::data::roster::Team;
use crate::optimizer::scoring::{score_team, ScoreOptions};
use crate::parallel::WorkerPool;

#[derive(Debug, Clone, Serialize)]
pub struct ScoredTeam {
    pub team: Team,
    pub score: i32,
    /// 1 = best viable team for this boss.
    pub rank: usize,
    /// Only qualified under relaxed rules.
    pub lenient: bool,
}

/// Viable teams for one boss, best first.
#[derive(Debug, Clone, Serialize)]
pub struct BossTeams {
    pub boss: Boss,
    pub teams: Vec<ScoredTeam>,
    pub lenient: bool,
}

impl BossTeams {
    pub fn best(&self) -> Option<&ScoredTeam> {
        self.teams.first()
    }

    pub fn is_empty(&self) -> bool {
        self.teams.is_empty()
    }
}

/// Score every team, keep positive scores, and fall back to lenient scoring when the
/// strict pass leaves nothing.
pub fn rank_teams_for_boss(teams: &[&Team], boss: &Boss, pool: &WorkerPool) -> BossTeams {
    let strict = score_viable(teams, boss, ScoreOptions::strict(), pool);
    let (scored, lenient) = if strict.is_empty() && !teams.is_empty() {
        warn!(boss = %boss.name, "no team qualifies under strict rules, retrying leniently");
        (score_viable(teams, boss, ScoreOptions::lenient(), pool), true)
    } else {
        (strict, false)
    };

    let ranked = rank_scored(scored, lenient);
    debug!(
        boss = %boss.name,
        candidates = teams.len(),
        viable = ranked.len(),
        lenient,
        "ranked teams"
    );
    BossTeams {
        boss: boss.clone(),
        teams: ranked,
        lenient,
    }
}

fn score_viable(
    teams: &[&Team],
    boss: &Boss,
    options: ScoreOptions,
    pool: &WorkerPool,
) -> Vec<(Team, i32)> {
    let scores = pool.map(teams, |team| score_team(team, boss, options).score);
    teams
        .iter()
        .zip(scores)
        .filter(|(_, score)| score.is_viable())
        .map(|(team, score)| ((*team).clone(), score.value()))
        .collect()
}

/// Sort by score (desc) then label and assign 1-based ranks.
pub fn rank_scored(mut scored: Vec<(Team, i32)>, lenient: bool) -> Vec<ScoredTeam> {
    scored.sort_by(|(left_team, left), (right_team, right)| {
        right
            .cmp(left)
            .then_with(|| left_team.label().cmp(right_team.label()))
    });
    scored
        .into_iter()
        .enumerate()
        .map(|(index, (team, score))| ScoredTeam {
            team,
            score,
            rank: index + 1,
            lenient,
        })
        .collect()
}
