use std::collections::BTreeMap;

use crate::data::roster::{Roster, Team};

/// Minimum roster size for any team.
pub const MIN_TEAM_SIZE: usize = 2;

/// Canonical label → team. Ordered so iteration is deterministic.
pub type TeamMap = BTreeMap<String, Team>;

#[derive(Debug, Clone, Default)]
pub struct GeneratedTeams {
    /// Mutually-accepting pairs; seeds for flex extension.
    pub pairs: TeamMap,
    /// Three-unit teams where every member accepts at least one teammate.
    pub triples: TeamMap,
}

/// Exhaustive pair and triple enumeration over a roster.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamGenerator;

impl TeamGenerator {
    pub fn new() -> Self {
        Self
    }

    pub fn generate(&self, roster: &Roster) -> GeneratedTeams {
        let mut generated = GeneratedTeams::default();
        if roster.len() < MIN_TEAM_SIZE {
            return generated;
        }

        let units = roster.units();
        let mut order: Vec<usize> = (0..units.len()).collect();
        order.sort_by(|&left, &right| units[left].name.cmp(&units[right].name));

        let accepts = |member: usize, teammate: usize| units[member].accepts(&units[teammate]);

        for (i, &a) in order.iter().enumerate() {
            for (j, &b) in order.iter().enumerate().skip(i + 1) {
                if accepts(a, b) && accepts(b, a) {
                    let team = Team::new(roster, &[a, b]);
                    generated.pairs.insert(team.label().to_string(), team);
                }

                for &c in order.iter().skip(j + 1) {
                    let a_ok = accepts(a, b) || accepts(a, c);
                    let b_ok = accepts(b, a) || accepts(b, c);
                    let c_ok = accepts(c, a) || accepts(c, b);
                    if !(a_ok && b_ok && c_ok) {
                        continue;
                    }
                    let team = Team::new(roster, &[a, b, c]);
                    generated.triples.insert(team.label().to_string(), team);
                }
            }
        }

        generated
    }
}

/// True when every member's join set is satisfied by at least one teammate.
pub fn is_eligible(team: &Team) -> bool {
    let members = team.members();
    members.iter().enumerate().all(|(index, member)| {
        members
            .iter()
            .enumerate()
            .any(|(other, teammate)| other != index && member.accepts(teammate))
    })
}
