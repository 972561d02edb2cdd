//! Flex extension: units whose kit fits anywhere are slotted into every mutual pair,
//! bypassing the join check.

use tracing::debug;

use crate::data::roster::{Roster, Team};
use crate::optimizer::team_generator::TeamMap;

/// Add `pair + flex` for every pair and every flex unit not already on it.
/// Existing labels are left untouched. Returns the number of teams created.
pub fn extend_with_flex(
    roster: &Roster,
    pairs: &TeamMap,
    triples: &mut TeamMap,
    flex_indices: &[usize],
) -> usize {
    let mut created = 0;
    for pair in pairs.values() {
        for &flex in flex_indices {
            if pair.mask().contains(flex) || roster.get(flex).is_none() {
                continue;
            }
            let team = Team::with_flex(roster, pair, flex);
            if triples.contains_key(team.label()) {
                continue;
            }
            triples.insert(team.label().to_string(), team);
            created += 1;
        }
    }
    debug!(created, flex_units = flex_indices.len(), "flex extension");
    created
}
