//! Team suitability scoring.
//!
//! A score is built by running an ordered list of rules (see [crate::optimizer::rules])
//! over a [ScoreSheet]. Each rule adds signed deltas to the running total and may
//! disqualify the team, which stops the pipeline. Every applied delta is recorded in the
//! returned trace, so the result of [score_team] can always be audited.

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::data::boss::Boss;
use crate::data::roster::Team;
use crate::data::unit::{Role, Unit};
use crate::optimizer::rules::{BASE_SCORE, LENIENT_SCORE_FLOOR, RULES};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreOptions {
    /// Turn a few hard disqualifications into heavy penalties. Fallback only.
    #[serde(default)]
    pub lenient: bool,
}

impl ScoreOptions {
    pub fn strict() -> Self {
        Self { lenient: false }
    }

    pub fn lenient() -> Self {
        Self { lenient: true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentinel {
    /// Team never fits this boss.
    Rejected,
    /// A member refuses to fight next to a damage dealer on the team.
    Conflict,
}

impl Sentinel {
    pub fn value(self) -> i32 {
        match self {
            Self::Rejected => -1,
            Self::Conflict => -999,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Disqualification {
    pub rule: &'static str,
    pub reason: String,
    pub sentinel: Sentinel,
}

impl Disqualification {
    pub fn rejected(rule: &'static str, reason: impl Into<String>) -> Self {
        Self {
            rule,
            reason: reason.into(),
            sentinel: Sentinel::Rejected,
        }
    }

    pub fn conflict(rule: &'static str, reason: impl Into<String>) -> Self {
        Self {
            rule,
            reason: reason.into(),
            sentinel: Sentinel::Conflict,
        }
    }

    pub fn value(&self) -> i32 {
        self.sentinel.value()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TeamScore {
    Scored { value: i32 },
    Disqualified(Disqualification),
}

impl TeamScore {
    /// Integer form: -1 / -999 for disqualifications, otherwise the non-negative score.
    pub fn value(&self) -> i32 {
        match self {
            Self::Scored { value } => *value,
            Self::Disqualified(disqualification) => disqualification.value(),
        }
    }

    /// Only strictly positive scores are presented.
    pub fn is_viable(&self) -> bool {
        matches!(self, Self::Scored { value } if *value > 0)
    }

    pub fn is_disqualified(&self) -> bool {
        matches!(self, Self::Disqualified(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TraceStep {
    pub rule: &'static str,
    pub reason: String,
    pub delta: i32,
    pub running: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreReport {
    pub score: TeamScore,
    pub trace: Vec<TraceStep>,
}

/// Running total plus the trace of every applied delta.
#[derive(Debug, Clone)]
pub struct ScoreSheet {
    total: i32,
    trace: Vec<TraceStep>,
    current_rule: &'static str,
}

impl ScoreSheet {
    pub fn new(base: i32) -> Self {
        Self {
            total: base,
            trace: vec![TraceStep {
                rule: "base",
                reason: "base score".to_string(),
                delta: base,
                running: base,
            }],
            current_rule: "base",
        }
    }

    pub fn total(&self) -> i32 {
        self.total
    }

    pub fn trace(&self) -> &[TraceStep] {
        &self.trace
    }

    pub(crate) fn enter(&mut self, rule: &'static str) {
        self.current_rule = rule;
    }

    /// Add `delta` under the current rule. Zero deltas are not recorded.
    pub fn apply(&mut self, delta: i32, reason: impl Into<String>) {
        if delta == 0 {
            return;
        }
        self.total += delta;
        self.trace.push(TraceStep {
            rule: self.current_rule,
            reason: reason.into(),
            delta,
            running: self.total,
        });
    }

    fn finish_disqualified(mut self, disqualification: Disqualification) -> ScoreReport {
        let sentinel = disqualification.value();
        self.trace.push(TraceStep {
            rule: disqualification.rule,
            reason: disqualification.reason.clone(),
            delta: sentinel - self.total,
            running: sentinel,
        });
        ScoreReport {
            score: TeamScore::Disqualified(disqualification),
            trace: self.trace,
        }
    }

    fn finish(self, options: ScoreOptions) -> ScoreReport {
        let floor = if options.lenient { LENIENT_SCORE_FLOOR } else { 0 };
        ScoreReport {
            score: TeamScore::Scored {
                value: self.total.max(floor),
            },
            trace: self.trace,
        }
    }
}

/// Read-only view of a team against one boss, with members pre-split by role.
#[derive(Debug)]
pub struct ScoringContext<'a> {
    pub boss: &'a Boss,
    pub options: ScoreOptions,
    pub members: &'a [Arc<Unit>],
    pub dps: Vec<&'a Unit>,
    pub stunners: Vec<&'a Unit>,
    /// Support and defense members.
    pub support_side: Vec<&'a Unit>,
}

impl<'a> ScoringContext<'a> {
    pub fn new(members: &'a [Arc<Unit>], boss: &'a Boss, options: ScoreOptions) -> Self {
        let units = || members.iter().map(|unit| &**unit);
        Self {
            boss,
            options,
            members,
            dps: units().filter(|unit| unit.is_dps()).collect(),
            stunners: units().filter(|unit| unit.role == Role::Stun).collect(),
            support_side: units().filter(|unit| unit.is_support_side()).collect(),
        }
    }

    pub fn units(&self) -> impl Iterator<Item = &'a Unit> + '_ {
        self.members.iter().map(|unit| &**unit)
    }

    pub fn dps_roles(&self) -> BTreeSet<Role> {
        self.dps.iter().map(|unit| unit.role).collect()
    }

    pub fn dps_count(&self, role: Role) -> usize {
        self.dps.iter().filter(|unit| unit.role == role).count()
    }

    /// Dominant damage role: most members, then best (lowest) tier.
    pub fn archetype(&self) -> Option<Role> {
        let best_tier = |role: Role| {
            self.dps
                .iter()
                .filter(|unit| unit.role == role)
                .map(|unit| unit.tier)
                .fold(f64::INFINITY, f64::min)
        };
        Role::DPS
            .into_iter()
            .filter(|&role| self.dps_count(role) > 0)
            .max_by(|&left, &right| {
                self.dps_count(left)
                    .cmp(&self.dps_count(right))
                    .then_with(|| best_tier(right).total_cmp(&best_tier(left)))
            })
    }
}

pub fn score_members(members: &[Arc<Unit>], boss: &Boss, options: ScoreOptions) -> ScoreReport {
    let context = ScoringContext::new(members, boss, options);
    let mut sheet = ScoreSheet::new(BASE_SCORE);
    for (name, rule) in RULES {
        sheet.enter(name);
        if let Err(disqualification) = rule(&context, &mut sheet) {
            return sheet.finish_disqualified(disqualification);
        }
    }
    sheet.finish(options)
}

pub fn score_team(team: &Team, boss: &Boss, options: ScoreOptions) -> ScoreReport {
    score_members(team.members(), boss, options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheet_records_running_totals() {
        let mut sheet = ScoreSheet::new(100);
        sheet.enter("tier");
        sheet.apply(20, "good");
        sheet.apply(0, "ignored");
        sheet.apply(-50, "bad");
        assert_eq!(sheet.total(), 70);
        let running: Vec<i32> = sheet.trace().iter().map(|step| step.running).collect();
        assert_eq!(running, vec![100, 120, 70]);
        assert_eq!(sheet.trace()[2].rule, "tier");
    }

    #[test]
    fn negative_totals_clamp_to_zero() {
        let mut sheet = ScoreSheet::new(10);
        sheet.apply(-500, "terrible");
        let report = sheet.finish(ScoreOptions::strict());
        assert_eq!(report.score, TeamScore::Scored { value: 0 });
        assert!(!report.score.is_viable());
    }

    #[test]
    fn disqualification_ends_at_sentinel() {
        let sheet = ScoreSheet::new(100);
        let report = sheet.finish_disqualified(Disqualification::conflict("synergy", "avoid"));
        assert_eq!(report.score.value(), -999);
        assert_eq!(report.trace.last().map(|step| step.running), Some(-999));
    }
}
