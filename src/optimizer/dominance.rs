//! Deadly-assault dominance filter.
//!
//! A combination is dominated when an elite unit it leaves on the bench could replace one
//! non-elite member of one of its teams, for the same boss, giving a searched team that
//! scores at least as well. Such combinations are dropped. Survivors pay a priority penalty for every elite
//! support left unused without a structural excuse.

use std::collections::{BTreeSet, HashMap};

use serde::Serialize;
use tracing::debug;

use crate::data::roster::{Roster, UnitMask};
use crate::data::unit::Role;
use crate::optimizer::combinations::{compare_combinations, Combination, MAX_TOP_K};
use crate::optimizer::ranking::BossTeams;
use crate::optimizer::rules::is_elite;

/// Priority added per unused, unexcused elite support.
pub const UNUSED_ELITE_SUPPORT_PENALTY: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DominanceNote {
    pub unused_elite_supports: Vec<String>,
    pub priority_penalty: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DominatingSwap {
    pub boss: String,
    pub replaced: String,
    pub elite: String,
    pub score: i32,
}

#[derive(Debug)]
pub struct DominanceFilter<'a> {
    roster: &'a Roster,
    per_boss: &'a [BossTeams],
    /// Per boss: the searched top-K teams keyed by team identity.
    scores_by_mask: Vec<HashMap<UnitMask, i32>>,
    elites: Vec<usize>,
}

impl<'a> DominanceFilter<'a> {
    pub fn new(roster: &'a Roster, per_boss: &'a [BossTeams], top_k: usize) -> Self {
        let top_k = top_k.min(MAX_TOP_K);
        let scores_by_mask = per_boss
            .iter()
            .map(|boss| {
                boss.teams
                    .iter()
                    .take(top_k)
                    .map(|scored| (scored.team.mask(), scored.score))
                    .collect()
            })
            .collect();
        let elites = roster
            .units()
            .iter()
            .enumerate()
            .filter(|(_, unit)| is_elite(unit))
            .map(|(index, _)| index)
            .collect();
        Self {
            roster,
            per_boss,
            scores_by_mask,
            elites,
        }
    }

    /// First swap (in boss, member, roster order) that proves `combination` redundant.
    ///
    /// Elite members are never swapped out, so every swap strictly raises the number of
    /// elites in play and some combination always survives.
    pub fn dominating_swap(&self, combination: &Combination) -> Option<DominatingSwap> {
        let used = combination.mask();
        let bench: Vec<usize> = self
            .elites
            .iter()
            .copied()
            .filter(|&index| !used.contains(index))
            .collect();
        if bench.is_empty() {
            return None;
        }

        for (slot, assignment) in combination.assignments.iter().enumerate() {
            let scores = self.scores_by_mask.get(slot)?;
            let team = &assignment.team.team;
            let others = combination
                .assignments
                .iter()
                .enumerate()
                .filter(|(other, _)| *other != slot)
                .fold(UnitMask::EMPTY, |mask, (_, a)| mask.union(a.team.team.mask()));

            for &member in team.indices() {
                if self.elites.contains(&member) {
                    continue;
                }
                for &elite in &bench {
                    let swapped = team.mask().without(member).with(elite);
                    if swapped.intersects(others) {
                        continue;
                    }
                    let Some(&score) = scores.get(&swapped) else {
                        continue;
                    };
                    if score >= assignment.team.score {
                        return Some(DominatingSwap {
                            boss: assignment.boss.clone(),
                            replaced: self.unit_name(member),
                            elite: self.unit_name(elite),
                            score,
                        });
                    }
                }
            }
        }
        None
    }

    /// Elite supports on the bench whose synergy does not avoid every damage role in play.
    pub fn unexcused_elite_supports(&self, combination: &Combination) -> Vec<String> {
        let used = combination.mask();
        let dps_roles: BTreeSet<Role> = combination
            .assignments
            .iter()
            .flat_map(|a| a.team.team.members().iter())
            .filter(|unit| unit.is_dps())
            .map(|unit| unit.role)
            .collect();

        self.elites
            .iter()
            .copied()
            .filter(|&index| !used.contains(index))
            .filter_map(|index| self.roster.get(index))
            .filter(|unit| unit.is_support_side())
            .filter(|unit| {
                let excused = !dps_roles.is_empty()
                    && dps_roles.iter().all(|role| unit.avoids_tag(role.as_str()));
                !excused
            })
            .map(|unit| unit.name.clone())
            .collect()
    }

    /// Drop dominated combinations, annotate and re-sort the rest.
    pub fn apply(&self, combinations: Vec<Combination>) -> Vec<Combination> {
        let before = combinations.len();
        let mut kept: Vec<Combination> = combinations
            .into_iter()
            .filter_map(|mut combination| {
                if let Some(swap) = self.dominating_swap(&combination) {
                    debug!(
                        combination = %combination.label,
                        boss = %swap.boss,
                        replaced = %swap.replaced,
                        elite = %swap.elite,
                        "dominated"
                    );
                    return None;
                }
                let unused = self.unexcused_elite_supports(&combination);
                let penalty = unused.len() * UNUSED_ELITE_SUPPORT_PENALTY;
                combination.priority += penalty;
                combination.dominance = Some(DominanceNote {
                    unused_elite_supports: unused,
                    priority_penalty: penalty,
                });
                Some(combination)
            })
            .collect();
        kept.sort_by(compare_combinations);
        debug!(
            before,
            after = kept.len(),
            bosses = self.per_boss.len(),
            "dominance filter"
        );
        kept
    }

    fn unit_name(&self, index: usize) -> String {
        self.roster
            .get(index)
            .map(|unit| unit.name.clone())
            .unwrap_or_default()
    }
}
