//! Pairwise teammate synergy and support-unit profiles.

use std::sync::Arc;

use serde::Serialize;

use crate::data::unit::{Role, Unit};
use crate::optimizer::scoring::Disqualification;

pub const NAMED_SYNERGY_BONUS: i32 = 60;
pub const TAG_SYNERGY_BONUS: i32 = 25;
pub const MUTUAL_SYNERGY_BONUS: i32 = 50;
pub const AVOID_PENALTY: i32 = 80;
/// A unit that wants an element nobody on the team carries.
pub const WASTED_ELEMENT_PENALTY: i32 = 100;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SynergyScore {
    pub total: i32,
    pub entries: Vec<(String, i32)>,
}

impl SynergyScore {
    fn push(&mut self, reason: String, delta: i32) {
        self.total += delta;
        self.entries.push((reason, delta));
    }
}

/// Either unit names the other.
pub fn has_named_link(left: &Unit, right: &Unit) -> bool {
    left.names(right) || right.names(left)
}

/// Both units name each other.
pub fn is_mutual(left: &Unit, right: &Unit) -> bool {
    left.names(right) && right.names(left)
}

/// Same element plus an explicit link: a named partner or a preference for the other's role.
pub fn element_linked(left: &Unit, right: &Unit) -> bool {
    left.element.is_some()
        && left.element == right.element
        && (has_named_link(left, right)
            || left.prefers_tag(right.role.as_str())
            || right.prefers_tag(left.role.as_str()))
}

/// Additive synergy over every ordered pair of members.
///
/// An `avoid` tag carried by a damage dealer is a conflict (sentinel -999); on any other
/// teammate it costs [AVOID_PENALTY].
pub fn synergy_score(members: &[Arc<Unit>]) -> Result<SynergyScore, Disqualification> {
    let mut score = SynergyScore::default();

    for (index, unit) in members.iter().enumerate() {
        let teammates = || {
            members
                .iter()
                .enumerate()
                .filter(move |(other, _)| *other != index)
                .map(|(_, teammate)| teammate)
        };

        for teammate in teammates() {
            if unit.names(teammate) {
                score.push(
                    format!("{} pairs with {}", unit.name, teammate.name),
                    NAMED_SYNERGY_BONUS,
                );
            }
            for tag in unit.synergy.tags.iter().filter(|tag| teammate.has_tag(tag)) {
                score.push(
                    format!("{} wants {tag}, {} has it", unit.name, teammate.name),
                    TAG_SYNERGY_BONUS,
                );
            }
            for tag in unit.synergy.avoid.iter().filter(|tag| teammate.has_tag(tag)) {
                if teammate.is_dps() {
                    return Err(Disqualification::conflict(
                        "synergy",
                        format!("{} avoids {tag} damage dealer {}", unit.name, teammate.name),
                    ));
                }
                score.push(
                    format!("{} avoids {tag} ({})", unit.name, teammate.name),
                    -AVOID_PENALTY,
                );
            }
        }

        let wanted = unit.preferred_elements();
        if !wanted.is_empty()
            && !teammates().any(|teammate| {
                teammate
                    .element
                    .is_some_and(|element| wanted.contains(&element))
            })
        {
            score.push(
                format!("{} has no teammate of a wanted element", unit.name),
                -WASTED_ELEMENT_PENALTY,
            );
        }
    }

    for (index, left) in members.iter().enumerate() {
        for right in members.iter().skip(index + 1) {
            if is_mutual(left, right) {
                score.push(
                    format!("{} and {} are mutual partners", left.name, right.name),
                    MUTUAL_SYNERGY_BONUS,
                );
            }
        }
    }

    Ok(score)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SupportProfile {
    /// Wants exactly one damage role and avoids the other two.
    Specialist(Role),
    /// No teammate preference at all.
    Generalist,
    Other,
}

pub fn support_profile(unit: &Unit) -> SupportProfile {
    let preferred = unit.preferred_dps_roles();
    if let [role] = preferred.as_slice() {
        let avoids_others = Role::DPS
            .iter()
            .filter(|other| *other != role)
            .all(|other| unit.avoids_tag(other.as_str()));
        if avoids_others {
            return SupportProfile::Specialist(*role);
        }
    }
    if unit.synergy.tags.is_empty() && unit.synergy.avoid.is_empty() {
        return SupportProfile::Generalist;
    }
    SupportProfile::Other
}
