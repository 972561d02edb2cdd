//! The ordered scoring rules and their tuned constants.
//!
//! Constants are game-balance values. They are kept as named items so that tuning
//! never requires touching rule logic.

use std::fmt::Write as _;

use crate::data::unit::{Rank, Role, Unit};
use crate::optimizer::scoring::{Disqualification, ScoreSheet, ScoringContext};
use crate::optimizer::synergy::{
    element_linked, has_named_link, is_mutual, support_profile, synergy_score, SupportProfile,
};

pub const BASE_SCORE: i32 = 100;
/// Replaces a relaxable disqualification in lenient mode.
pub const LENIENT_PENALTY: i32 = 250;
/// Lenient scoring is the last resort, so any surviving team stays presentable.
pub const LENIENT_SCORE_FLOOR: i32 = 1;

pub const SHILL_BONUS: i32 = 150;
pub const SHILL_MISS_WITH_WEAKNESS_PENALTY: i32 = 60;
pub const SHILL_MISS_PENALTY: i32 = 200;

pub const FAVORED_BONUS: i32 = 60;

/// Tier cliffs (inclusive upper bounds, lower tier is better).
pub const ELITE_TIER_MAX: f64 = 0.5;
pub const GOOD_TIER_MAX: f64 = 1.5;
pub const MEDIOCRE_TIER_MAX: f64 = 2.5;
pub const BAD_TIER_MAX: f64 = 3.5;
pub const ELITE_TIER_BONUS: i32 = 120;
pub const GOOD_TIER_BONUS: i32 = 60;
pub const BAD_TIER_PENALTY: i32 = 120;
pub const TERRIBLE_TIER_PENALTY: i32 = 300;

pub const MIN_DPS: usize = 1;
pub const MAX_DPS: usize = 2;
/// Attacker quality needed for the attack + anomaly hybrid exception.
pub const HYBRID_ATTACKER_TIER_MAX: f64 = 0.5;

pub const ATTACK_NO_STUN_PENALTY: i32 = 150;
pub const RUPTURE_CAST_PENALTY: i32 = 150;
pub const ANOMALY_DUAL_ELEMENT_BONUS: i32 = 80;
pub const ANOMALY_SAME_ELEMENT_PENALTY: i32 = 40;
pub const ANOMALY_STUN_ONLY_PENALTY: i32 = 120;

pub const S_RANK_WEAKNESS_BONUS: i32 = 120;
pub const A_RANK_WEAKNESS_BONUS: i32 = 70;
pub const NO_WEAKNESS_MATCH_PENALTY: i32 = 250;
pub const STUN_WEAKNESS_BONUS: i32 = 30;
pub const STUN_RESISTED_PENALTY: i32 = 150;
pub const DEFENSE_WEAKNESS_BONUS: i32 = 15;
pub const DEFENSE_RESISTED_PENALTY: i32 = 40;

/// (S rank, titled, limited) bonuses by seat.
pub const DPS_RANK_BONUSES: (i32, i32, i32) = (80, 40, 30);
pub const STUN_RANK_BONUSES: (i32, i32, i32) = (40, 20, 15);
pub const SUPPORT_RANK_BONUSES: (i32, i32, i32) = (30, 15, 10);
/// A-rank damage dealers worse than this are filler.
pub const A_RANK_DPS_TIER_MAX: f64 = 1.5;
pub const A_RANK_FILLER_PENALTY: i32 = 200;

pub const SPECIALIST_MATCH_BONUS: i32 = 120;
pub const SPECIALIST_MISMATCH_PENALTY: i32 = 200;
pub const GENERALIST_HOMOGENEOUS_BONUS: i32 = 20;
pub const GENERALIST_MIXED_PENALTY: i32 = 20;
pub const GENERALIST_ELEMENT_BONUS: i32 = 15;

pub const DOUBLE_DPS_PENALTY: i32 = 250;

pub const DOUBLE_STUN_BONUS: i32 = 60;
pub const DOUBLE_STUN_PENALTY: i32 = 120;

pub const ASSIST_SURPLUS_BONUS: i32 = 15;

pub type RuleResult = Result<(), Disqualification>;
pub type Rule = fn(&ScoringContext<'_>, &mut ScoreSheet) -> RuleResult;

/// Applied in order; the first disqualification wins.
pub const RULES: [(&str, Rule); 13] = [
    ("anti", anti_rule),
    ("shill", shill_rule),
    ("favored", favored_rule),
    ("tier", tier_rule),
    ("composition", composition_rule),
    ("archetype", archetype_rule),
    ("element", element_rule),
    ("rank", rank_rule),
    ("specialist", specialist_rule),
    ("synergy", synergy_rule),
    ("dps_mix", dps_mix_rule),
    ("double_stun", double_stun_rule),
    ("assists", assists_rule),
];

/// Disqualify in strict mode; charge [LENIENT_PENALTY] in lenient mode.
fn relaxable(
    context: &ScoringContext<'_>,
    sheet: &mut ScoreSheet,
    rule: &'static str,
    reason: String,
) -> RuleResult {
    if context.options.lenient {
        sheet.apply(-LENIENT_PENALTY, format!("lenient: {reason}"));
        Ok(())
    } else {
        Err(Disqualification::rejected(rule, reason))
    }
}

/// Discontinuous tier curve.
pub fn tier_bonus(tier: f64) -> i32 {
    if tier <= ELITE_TIER_MAX {
        ELITE_TIER_BONUS
    } else if tier <= GOOD_TIER_MAX {
        GOOD_TIER_BONUS
    } else if tier <= MEDIOCRE_TIER_MAX {
        0
    } else if tier <= BAD_TIER_MAX {
        -BAD_TIER_PENALTY
    } else {
        -TERRIBLE_TIER_PENALTY
    }
}

pub fn is_elite(unit: &Unit) -> bool {
    unit.tier <= ELITE_TIER_MAX
}

/// An elite attacker paired with an element-linked anomaly unit.
pub fn hybrid_exception(dps: &[&Unit]) -> bool {
    let [first, second] = dps else {
        return false;
    };
    let (attacker, anomaly) = match (first.role, second.role) {
        (Role::Attack, Role::Anomaly) => (first, second),
        (Role::Anomaly, Role::Attack) => (second, first),
        _ => return false,
    };
    attacker.tier <= HYBRID_ATTACKER_TIER_MAX && element_linked(attacker, anomaly)
}

fn anti_rule(context: &ScoringContext<'_>, _sheet: &mut ScoreSheet) -> RuleResult {
    match context
        .units()
        .find(|unit| context.boss.anti.contains(&unit.role))
    {
        Some(unit) => Err(Disqualification::rejected(
            "anti",
            format!("{} rejects {} ({})", context.boss.name, unit.role, unit.name),
        )),
        None => Ok(()),
    }
}

fn shill_rule(context: &ScoringContext<'_>, sheet: &mut ScoreSheet) -> RuleResult {
    let Some(shill) = context.boss.shill else {
        return Ok(());
    };

    if context.units().any(|unit| unit.role == shill) {
        sheet.apply(SHILL_BONUS, format!("fields preferred {shill}"));
        return Ok(());
    }

    if !shill.is_dps() {
        return relaxable(context, sheet, "shill", format!("no {shill} unit"));
    }

    if context
        .dps
        .iter()
        .any(|unit| context.boss.is_weak_to(unit.element))
    {
        sheet.apply(
            -SHILL_MISS_WITH_WEAKNESS_PENALTY,
            format!("no {shill} damage, weakness still covered"),
        );
    } else {
        sheet.apply(-SHILL_MISS_PENALTY, format!("no {shill} damage"));
    }
    Ok(())
}

fn favored_rule(context: &ScoringContext<'_>, sheet: &mut ScoreSheet) -> RuleResult {
    for unit in context.units().filter(|unit| context.boss.favors(&unit.name)) {
        sheet.apply(FAVORED_BONUS, format!("{} is favored", unit.name));
    }
    Ok(())
}

fn tier_rule(context: &ScoringContext<'_>, sheet: &mut ScoreSheet) -> RuleResult {
    for unit in context.units() {
        sheet.apply(tier_bonus(unit.tier), format!("{} tier {}", unit.name, unit.tier));
    }
    Ok(())
}

fn composition_rule(context: &ScoringContext<'_>, sheet: &mut ScoreSheet) -> RuleResult {
    let dps = context.dps.len();
    if dps < MIN_DPS {
        return Err(Disqualification::rejected("composition", "no damage dealer"));
    }
    if dps > MAX_DPS {
        return Err(Disqualification::rejected(
            "composition",
            format!("{dps} damage dealers"),
        ));
    }

    let untitled_anomaly = context
        .dps
        .iter()
        .find(|unit| unit.role == Role::Anomaly && !unit.is_titled());
    if let Some(anomaly) = untitled_anomaly {
        let alone = dps == 1;
        let mixed = context.dps.iter().any(|unit| unit.role != Role::Anomaly);
        if (alone || mixed) && !hybrid_exception(&context.dps) {
            let reason = if alone {
                format!("{} is the only damage dealer", anomaly.name)
            } else {
                format!("{} shares the team with non-anomaly damage", anomaly.name)
            };
            return relaxable(context, sheet, "composition", reason);
        }
    }
    Ok(())
}

fn archetype_rule(context: &ScoringContext<'_>, sheet: &mut ScoreSheet) -> RuleResult {
    let Some(archetype) = context.archetype() else {
        return Ok(());
    };

    match archetype {
        Role::Attack => {
            if context.stunners.is_empty() {
                sheet.apply(-ATTACK_NO_STUN_PENALTY, "attack team without a stunner");
            }
        }
        Role::Rupture => {
            let stun_with_synergy = context.stunners.iter().any(|stunner| {
                context.dps.iter().any(|dealer| {
                    dealer.role == Role::Rupture
                        && (has_named_link(stunner, dealer)
                            || stunner.prefers_tag(Role::Rupture.as_str())
                            || dealer.prefers_tag(Role::Stun.as_str()))
                })
            });
            if !stun_with_synergy && context.support_side.len() < 2 {
                sheet.apply(
                    -RUPTURE_CAST_PENALTY,
                    "rupture team needs a synergistic stunner or double support",
                );
            }
        }
        Role::Anomaly => {
            let anomalies: Vec<&&Unit> = context
                .dps
                .iter()
                .filter(|unit| unit.role == Role::Anomaly)
                .collect();
            if let [first, second] = anomalies.as_slice() {
                if first.element.is_some() && first.element != second.element {
                    sheet.apply(ANOMALY_DUAL_ELEMENT_BONUS, "dual anomaly, different elements");
                } else {
                    sheet.apply(-ANOMALY_SAME_ELEMENT_PENALTY, "dual anomaly, same element");
                }
            } else {
                let non_dps: Vec<&Unit> = context.units().filter(|unit| !unit.is_dps()).collect();
                if !non_dps.is_empty() && non_dps.iter().all(|unit| unit.role == Role::Stun) {
                    sheet.apply(-ANOMALY_STUN_ONLY_PENALTY, "anomaly team backed only by stun");
                }
            }
        }
        _ => {}
    }
    Ok(())
}

fn element_rule(context: &ScoringContext<'_>, sheet: &mut ScoreSheet) -> RuleResult {
    let boss = context.boss;

    for unit in &context.dps {
        if boss.resists(unit.element) {
            let reason = format!("{} resists {}'s element", boss.name, unit.name);
            relaxable(context, sheet, "element", reason)?;
        }
    }

    let mut matched: Vec<Role> = Vec::new();
    for unit in context.dps.iter().filter(|unit| boss.is_weak_to(unit.element)) {
        let base = match unit.rank {
            Rank::S => S_RANK_WEAKNESS_BONUS,
            Rank::A => A_RANK_WEAKNESS_BONUS,
        };
        let bonus = if matched.contains(&unit.role) { base / 2 } else { base };
        sheet.apply(bonus, format!("{} hits the weakness", unit.name));
        matched.push(unit.role);
    }
    if boss.weaknesses.len() >= 2 && matched.is_empty() {
        sheet.apply(-NO_WEAKNESS_MATCH_PENALTY, "no damage dealer hits any weakness");
    }

    for unit in &context.stunners {
        if boss.resists(unit.element) {
            sheet.apply(-STUN_RESISTED_PENALTY, format!("{} stun is resisted", unit.name));
        } else if boss.is_weak_to(unit.element) {
            sheet.apply(STUN_WEAKNESS_BONUS, format!("{} stuns on weakness", unit.name));
        }
    }

    for unit in context.units().filter(|unit| unit.role == Role::Defense) {
        if boss.resists(unit.element) {
            sheet.apply(-DEFENSE_RESISTED_PENALTY, format!("{} is resisted", unit.name));
        } else if boss.is_weak_to(unit.element) {
            sheet.apply(DEFENSE_WEAKNESS_BONUS, format!("{} on weakness", unit.name));
        }
    }
    Ok(())
}

fn rank_rule(context: &ScoringContext<'_>, sheet: &mut ScoreSheet) -> RuleResult {
    for unit in context.units() {
        let (rank_bonus, title_bonus, limited_bonus) = match unit.role {
            role if role.is_dps() => DPS_RANK_BONUSES,
            Role::Stun => STUN_RANK_BONUSES,
            _ => SUPPORT_RANK_BONUSES,
        };
        if unit.rank == Rank::S {
            sheet.apply(rank_bonus, format!("{} is S rank", unit.name));
        }
        if unit.is_titled() {
            sheet.apply(title_bonus, format!("{} is titled", unit.name));
        }
        if unit.limited {
            sheet.apply(limited_bonus, format!("{} is limited", unit.name));
        }
        if unit.is_dps() && unit.rank == Rank::A && unit.tier > A_RANK_DPS_TIER_MAX {
            sheet.apply(
                -A_RANK_FILLER_PENALTY,
                format!("{} is filler damage", unit.name),
            );
        }
    }
    Ok(())
}

fn specialist_rule(context: &ScoringContext<'_>, sheet: &mut ScoreSheet) -> RuleResult {
    let dps_roles = context.dps_roles();
    for unit in &context.support_side {
        match support_profile(unit) {
            SupportProfile::Specialist(role) if dps_roles.contains(&role) => {
                sheet.apply(
                    SPECIALIST_MATCH_BONUS,
                    format!("{} specialises in {role}", unit.name),
                );
            }
            SupportProfile::Specialist(role) => {
                sheet.apply(
                    -SPECIALIST_MISMATCH_PENALTY,
                    format!("{} specialises in {role}, team has none", unit.name),
                );
            }
            SupportProfile::Generalist => {
                if dps_roles.len() == 1 {
                    sheet.apply(
                        GENERALIST_HOMOGENEOUS_BONUS,
                        format!("{} backs a single damage type", unit.name),
                    );
                } else {
                    sheet.apply(
                        -GENERALIST_MIXED_PENALTY,
                        format!("{} spread across damage types", unit.name),
                    );
                }
                if unit.element.is_some()
                    && context.dps.iter().any(|dealer| dealer.element == unit.element)
                {
                    sheet.apply(
                        GENERALIST_ELEMENT_BONUS,
                        format!("{} shares an element with the damage", unit.name),
                    );
                }
            }
            SupportProfile::Other => {}
        }
    }
    Ok(())
}

fn synergy_rule(context: &ScoringContext<'_>, sheet: &mut ScoreSheet) -> RuleResult {
    let score = synergy_score(context.members)?;
    for (reason, delta) in score.entries {
        sheet.apply(delta, reason);
    }
    Ok(())
}

fn dps_mix_rule(context: &ScoringContext<'_>, sheet: &mut ScoreSheet) -> RuleResult {
    let [first, second] = context.dps.as_slice() else {
        return Ok(());
    };

    let mut reason = String::new();
    let _ = write!(&mut reason, "{} + {}", first.name, second.name);

    match (first.role, second.role) {
        (Role::Attack, Role::Attack) | (Role::Rupture, Role::Rupture) => {
            if !has_named_link(first, second)
                && !first.prefers_tag(second.role.as_str())
                && !second.prefers_tag(first.role.as_str())
            {
                sheet.apply(
                    -DOUBLE_DPS_PENALTY,
                    format!("double {} without synergy: {reason}", first.role),
                );
            }
            Ok(())
        }
        (Role::Attack, Role::Rupture) | (Role::Rupture, Role::Attack) => Err(
            Disqualification::rejected("dps_mix", format!("attack and rupture: {reason}")),
        ),
        (Role::Anomaly, Role::Rupture) | (Role::Rupture, Role::Anomaly) => Err(
            Disqualification::rejected("dps_mix", format!("anomaly and rupture: {reason}")),
        ),
        (Role::Attack, Role::Anomaly) | (Role::Anomaly, Role::Attack) => {
            if element_linked(first, second) {
                Ok(())
            } else {
                Err(Disqualification::rejected(
                    "dps_mix",
                    format!("attack and anomaly without an element link: {reason}"),
                ))
            }
        }
        _ => Ok(()),
    }
}

fn double_stun_rule(context: &ScoringContext<'_>, sheet: &mut ScoreSheet) -> RuleResult {
    let [first, second] = context.stunners.as_slice() else {
        return Ok(());
    };

    if context
        .dps
        .iter()
        .any(|dealer| dealer.prefers_tag(Role::Stun.as_str()))
    {
        sheet.apply(DOUBLE_STUN_BONUS, "damage dealer wants double stun");
    } else if context.boss.shill != Some(Role::Stun) && !is_mutual(first, second) {
        sheet.apply(
            -DOUBLE_STUN_PENALTY,
            format!("double stun: {} + {}", first.name, second.name),
        );
    }
    Ok(())
}

fn assists_rule(context: &ScoringContext<'_>, sheet: &mut ScoreSheet) -> RuleResult {
    let assists = context
        .units()
        .filter(|unit| unit.is_defensive_assist())
        .count();
    let required = context.boss.assists;
    if assists < required {
        return Err(Disqualification::rejected(
            "assists",
            format!("{assists} defensive assists, {required} required"),
        ));
    }
    let surplus = (assists - required) as i32;
    sheet.apply(
        surplus * ASSIST_SURPLUS_BONUS,
        format!("{surplus} spare defensive assists"),
    );
    Ok(())
}
