//! Unit records: the raw JSON shape (`UnitRecord`) and the validated model (`Unit`).
//! Role and element are derived from the free-form tag set once, at load time.

use std::collections::BTreeSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlannerError, Result};

pub const DEFAULT_UNITS_PATH: &str = "data/units.json";

pub const TITLE_TAG: &str = "title";
pub const DEFENSIVE_ASSIST_TAG: &str = "assist:defensive";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Attack,
    Anomaly,
    Rupture,
    Stun,
    Defense,
    Support,
}

impl Role {
    pub const ALL: [Role; 6] = [
        Role::Attack,
        Role::Anomaly,
        Role::Rupture,
        Role::Stun,
        Role::Defense,
        Role::Support,
    ];
    pub const DPS: [Role; 3] = [Role::Attack, Role::Anomaly, Role::Rupture];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attack => "attack",
            Self::Anomaly => "anomaly",
            Self::Rupture => "rupture",
            Self::Stun => "stun",
            Self::Defense => "defense",
            Self::Support => "support",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.as_str() == tag)
    }

    pub fn is_dps(&self) -> bool {
        matches!(self, Self::Attack | Self::Anomaly | Self::Rupture)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Fire,
    Ice,
    Electric,
    Physical,
    Ether,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Fire,
        Element::Ice,
        Element::Electric,
        Element::Physical,
        Element::Ether,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fire => "fire",
            Self::Ice => "ice",
            Self::Electric => "electric",
            Self::Physical => "physical",
            Self::Ether => "ether",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|element| element.as_str() == tag)
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rank {
    S,
    A,
}

/// Teammate preferences. `tags` may hold element tags, meaning the unit's utility
/// is wasted without a teammate of that element.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Synergy {
    #[serde(default)]
    pub units: Vec<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub avoid: Vec<String>,
}

impl Synergy {
    pub fn is_empty(&self) -> bool {
        self.units.is_empty() && self.tags.is_empty() && self.avoid.is_empty()
    }
}

/// Unit as stored in `units.json` (and as injected developer units in assault configs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitRecord {
    pub id: String,
    pub name: String,
    pub rank: Rank,
    #[serde(default)]
    pub limited: bool,
    pub tier: f64,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub join: Vec<String>,
    #[serde(default)]
    pub synergy: Option<Synergy>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Unit {
    pub id: String,
    pub name: String,
    pub rank: Rank,
    pub limited: bool,
    pub tier: f64,
    pub role: Role,
    pub element: Option<Element>,
    pub tags: BTreeSet<String>,
    pub join: BTreeSet<String>,
    pub synergy: Synergy,
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_ascii_lowercase()
}

impl TryFrom<UnitRecord> for Unit {
    type Error = PlannerError;

    fn try_from(record: UnitRecord) -> Result<Self> {
        let invalid = |reason: String| PlannerError::InvalidUnit {
            name: record.name.clone(),
            reason,
        };

        if record.id.trim().is_empty() || record.name.trim().is_empty() {
            return Err(invalid("id and name must be non-empty".to_string()));
        }
        if !record.tier.is_finite() {
            return Err(invalid(format!("tier {} is not a finite number", record.tier)));
        }

        let tags: BTreeSet<String> = record
            .tags
            .iter()
            .map(|tag| normalize_tag(tag))
            .filter(|tag| !tag.is_empty())
            .collect();

        let roles: Vec<Role> = tags.iter().filter_map(|tag| Role::from_tag(tag)).collect();
        let role = match roles.as_slice() {
            [role] => *role,
            [] => return Err(invalid("missing role tag".to_string())),
            _ => return Err(invalid(format!("{} role tags, expected one", roles.len()))),
        };

        let elements: Vec<Element> = tags
            .iter()
            .filter_map(|tag| Element::from_tag(tag))
            .collect();
        if elements.len() > 1 {
            return Err(invalid(format!(
                "{} element tags, expected at most one",
                elements.len()
            )));
        }

        let synergy = record
            .synergy
            .map(|synergy| Synergy {
                units: synergy.units,
                tags: synergy.tags.iter().map(|tag| normalize_tag(tag)).collect(),
                avoid: synergy.avoid.iter().map(|tag| normalize_tag(tag)).collect(),
            })
            .unwrap_or_default();

        Ok(Unit {
            join: record.join.iter().map(|tag| normalize_tag(tag)).collect(),
            id: record.id,
            name: record.name,
            rank: record.rank,
            limited: record.limited,
            tier: record.tier,
            role,
            element: elements.first().copied(),
            tags,
            synergy,
        })
    }
}

impl Unit {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    pub fn is_dps(&self) -> bool {
        self.role.is_dps()
    }

    /// Matches `query` against the id or, case-insensitively, the name.
    pub fn is_named(&self, query: &str) -> bool {
        let query = query.trim();
        self.id == query || self.name.eq_ignore_ascii_case(query)
    }

    pub fn is_titled(&self) -> bool {
        self.has_tag(TITLE_TAG)
    }

    pub fn is_defensive_assist(&self) -> bool {
        self.has_tag(DEFENSIVE_ASSIST_TAG)
    }

    /// Support-side roles: support and defense.
    pub fn is_support_side(&self) -> bool {
        matches!(self.role, Role::Support | Role::Defense)
    }

    /// Entry condition: some tag of `other` is in this unit's `join` set.
    /// An empty `join` set accepts anyone.
    pub fn accepts(&self, other: &Unit) -> bool {
        self.join.is_empty() || self.join.iter().any(|tag| other.tags.contains(tag))
    }

    /// True when this unit names `other` in `synergy.units`.
    pub fn names(&self, other: &Unit) -> bool {
        self.synergy
            .units
            .iter()
            .any(|name| name.eq_ignore_ascii_case(&other.name) || name == &other.id)
    }

    pub fn prefers_tag(&self, tag: &str) -> bool {
        self.synergy.tags.iter().any(|preferred| preferred == tag)
    }

    pub fn avoids_tag(&self, tag: &str) -> bool {
        self.synergy.avoid.iter().any(|avoided| avoided == tag)
    }

    /// Element tags listed in `synergy.tags`.
    pub fn preferred_elements(&self) -> Vec<Element> {
        self.synergy
            .tags
            .iter()
            .filter_map(|tag| Element::from_tag(tag))
            .collect()
    }

    /// Damage roles listed in `synergy.tags`.
    pub fn preferred_dps_roles(&self) -> Vec<Role> {
        self.synergy
            .tags
            .iter()
            .filter_map(|tag| Role::from_tag(tag))
            .filter(Role::is_dps)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
struct UnitsFile {
    units: Vec<UnitRecord>,
}

/// Read raw records from `{ "units": [...] }`.
pub fn load_unit_records(path: impl AsRef<Path>) -> Result<Vec<UnitRecord>> {
    let raw = fs::read_to_string(path)?;
    let parsed: UnitsFile = serde_json::from_str(&raw)?;
    Ok(parsed.units)
}

pub fn load_units(path: impl AsRef<Path>) -> Result<Vec<Unit>> {
    load_unit_records(path)?
        .into_iter()
        .map(Unit::try_from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(tags: &[&str]) -> UnitRecord {
        UnitRecord {
            id: "u1".to_string(),
            name: "Unit One".to_string(),
            rank: Rank::S,
            limited: false,
            tier: 1.0,
            tags: tags.iter().map(|tag| tag.to_string()).collect(),
            join: vec!["stun".to_string()],
            synergy: None,
        }
    }

    #[test]
    fn role_and_element_are_derived_from_tags() {
        let unit = Unit::try_from(record(&["Attack", "fire", "title"])).expect("valid unit");
        assert_eq!(unit.role, Role::Attack);
        assert_eq!(unit.element, Some(Element::Fire));
        assert!(unit.is_titled());
        assert!(unit.is_dps());
    }

    #[test]
    fn two_role_tags_are_rejected() {
        let err = Unit::try_from(record(&["attack", "stun"])).unwrap_err();
        assert!(err.to_string().contains("role tags"));
    }

    #[test]
    fn missing_role_tag_is_rejected() {
        assert!(Unit::try_from(record(&["fire"])).is_err());
    }

    #[test]
    fn support_without_element_is_allowed() {
        let unit = Unit::try_from(record(&["support"])).expect("valid unit");
        assert_eq!(unit.element, None);
        assert!(unit.is_support_side());
    }

    #[test]
    fn empty_join_accepts_anyone() {
        let mut open = record(&["support"]);
        open.join.clear();
        let open = Unit::try_from(open).expect("valid unit");
        let other = Unit::try_from(record(&["attack", "ice"])).expect("valid unit");
        assert!(open.accepts(&other));
        assert!(!other.accepts(&other));
    }
}
