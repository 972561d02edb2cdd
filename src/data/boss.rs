//! Boss encounters: elemental weaknesses/resistances and role preferences.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::unit::{Element, Role};
use crate::error::{PlannerError, Result};

pub const DEFAULT_BOSSES_PATH: &str = "data/bosses.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boss {
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub weaknesses: Vec<Element>,
    #[serde(default)]
    pub resistances: Vec<Element>,
    /// Preferred role or damage type.
    #[serde(default)]
    pub shill: Option<Role>,
    /// Damage types that disqualify a team outright.
    #[serde(default)]
    pub anti: Vec<Role>,
    #[serde(default)]
    pub favored: Vec<String>,
    /// Minimum number of defensive-assist units.
    #[serde(default)]
    pub assists: usize,
}

impl Boss {
    /// Synthetic boss with no preferences, used to rank teams generically.
    pub fn neutral() -> Self {
        Self {
            name: "Neutral".to_string(),
            short_name: "neutral".to_string(),
            weaknesses: Vec::new(),
            resistances: Vec::new(),
            shill: None,
            anti: Vec::new(),
            favored: Vec::new(),
            assists: 0,
        }
    }

    pub fn is_weak_to(&self, element: Option<Element>) -> bool {
        element.is_some_and(|element| self.weaknesses.contains(&element))
    }

    pub fn resists(&self, element: Option<Element>) -> bool {
        element.is_some_and(|element| self.resistances.contains(&element))
    }

    pub fn favors(&self, unit_name: &str) -> bool {
        self.favored
            .iter()
            .any(|name| name.eq_ignore_ascii_case(unit_name))
    }

    fn matches_lookup(&self, query: &str) -> bool {
        let query = query.trim();
        self.name.eq_ignore_ascii_case(query)
            || (!self.short_name.is_empty() && self.short_name.eq_ignore_ascii_case(query))
    }
}

/// Resolve each name (case-insensitive, full or short name) against `bosses`, keeping the request order.
pub fn resolve_bosses(bosses: &[Boss], names: &[String]) -> Result<Vec<Boss>> {
    names
        .iter()
        .map(|name| {
            bosses
                .iter()
                .find(|boss| boss.matches_lookup(name))
                .cloned()
                .ok_or_else(|| PlannerError::UnknownBoss(name.clone()))
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct BossesFile {
    bosses: Vec<Boss>,
}

pub fn load_bosses(path: impl AsRef<Path>) -> Result<Vec<Boss>> {
    let raw = fs::read_to_string(path)?;
    let parsed: BossesFile = serde_json::from_str(&raw)?;
    Ok(parsed.bosses)
}
