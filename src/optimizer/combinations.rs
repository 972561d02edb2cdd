//! Cross-boss assignment search: one team per boss, no unit used twice.
//!
//! Priority favours the combination whose worst per-boss pick is strongest; the rank
//! sum only breaks ties between equal worst ranks. Total score is the last tiebreak.

use std::cmp::Ordering;

use serde::Serialize;

use crate::data::roster::UnitMask;
use crate::error::{PlannerError, Result};
use crate::optimizer::dominance::DominanceNote;
use crate::optimizer::ranking::{BossTeams, ScoredTeam};

/// Teams per boss considered by the search.
pub const TOP_K: usize = 20;
pub const BOSSES_PER_ASSAULT: usize = 3;
/// Weight of the worst rank in [priority]; must exceed any possible rank sum.
pub const WORST_RANK_WEIGHT: usize = 100;
/// Largest `top_k` for which a better worst rank always wins regardless of rank sum.
pub const MAX_TOP_K: usize = (WORST_RANK_WEIGHT - 1) / BOSSES_PER_ASSAULT;

pub const COMBINATION_LABEL_SEPARATOR: &str = " | ";

#[derive(Debug, Clone, Serialize)]
pub struct Assignment {
    pub boss: String,
    #[serde(flatten)]
    pub team: ScoredTeam,
}

#[derive(Debug, Clone, Serialize)]
pub struct Combination {
    pub label: String,
    /// In boss order.
    pub assignments: Vec<Assignment>,
    pub total_score: i32,
    /// Lower is better.
    pub priority: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominance: Option<DominanceNote>,
}

impl Combination {
    fn new(assignments: Vec<Assignment>) -> Self {
        let ranks: Vec<usize> = assignments.iter().map(|a| a.team.rank).collect();
        let label = assignments
            .iter()
            .map(|a| a.team.team.label())
            .collect::<Vec<_>>()
            .join(COMBINATION_LABEL_SEPARATOR);
        Self {
            label,
            total_score: assignments.iter().map(|a| a.team.score).sum(),
            priority: priority(&ranks),
            assignments,
            dominance: None,
        }
    }

    pub fn mask(&self) -> UnitMask {
        self.assignments
            .iter()
            .fold(UnitMask::EMPTY, |mask, a| mask.union(a.team.team.mask()))
    }

    pub fn worst_rank(&self) -> usize {
        self.assignments
            .iter()
            .map(|a| a.team.rank)
            .max()
            .unwrap_or(0)
    }

    pub fn rank_sum(&self) -> usize {
        self.assignments.iter().map(|a| a.team.rank).sum()
    }
}

/// `max(ranks) * WORST_RANK_WEIGHT + sum(ranks)`.
pub fn priority(ranks: &[usize]) -> usize {
    let worst = ranks.iter().copied().max().unwrap_or(0);
    worst * WORST_RANK_WEIGHT + ranks.iter().sum::<usize>()
}

/// Ascending priority, then descending total score, then label.
pub fn compare_combinations(left: &Combination, right: &Combination) -> Ordering {
    left.priority
        .cmp(&right.priority)
        .then_with(|| right.total_score.cmp(&left.total_score))
        .then_with(|| left.label.cmp(&right.label))
}

/// Every disjoint assignment over the top `top_k` teams of each boss, best first.
pub fn find_exclusive_combinations(per_boss: &[BossTeams], top_k: usize) -> Result<Vec<Combination>> {
    let [first, second, third] = per_boss else {
        return Err(PlannerError::BossCount {
            expected: BOSSES_PER_ASSAULT,
            found: per_boss.len(),
        });
    };

    let top_k = top_k.min(MAX_TOP_K);
    let head = |boss: &BossTeams| -> Vec<ScoredTeam> {
        boss.teams.iter().take(top_k).cloned().collect()
    };
    let (first_teams, second_teams, third_teams) = (head(first), head(second), head(third));

    let assign = |boss: &BossTeams, team: &ScoredTeam| Assignment {
        boss: boss.boss.name.clone(),
        team: team.clone(),
    };

    let mut combinations = Vec::new();
    for a in &first_teams {
        for b in &second_teams {
            if a.team.mask().intersects(b.team.mask()) {
                continue;
            }
            let used = a.team.mask().union(b.team.mask());
            for c in &third_teams {
                if used.intersects(c.team.mask()) {
                    continue;
                }
                combinations.push(Combination::new(vec![
                    assign(first, a),
                    assign(second, b),
                    assign(third, c),
                ]));
            }
        }
    }

    combinations.sort_by(compare_combinations);
    Ok(combinations)
}
