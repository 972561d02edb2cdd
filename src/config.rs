//! Assault configuration: YAML or JSON, chosen by file extension.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::data::unit::UnitRecord;
use crate::data::validate::{validate_units, ValidationSeverity};
use crate::error::{PlannerError, Result};
use crate::optimizer::combinations::{BOSSES_PER_ASSAULT, MAX_TOP_K, TOP_K};

pub const DEFAULT_RESULT_LIMIT: usize = 10;

fn default_limit() -> usize {
    DEFAULT_RESULT_LIMIT
}

fn default_top_k() -> usize {
    TOP_K
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssaultConfig {
    /// Boss names or short names, in assault order.
    pub bosses: Vec<String>,
    /// When non-empty, only these units (name or id) are considered.
    #[serde(default)]
    pub whitelist: Vec<String>,
    #[serde(default)]
    pub blacklist: Vec<String>,
    /// Extra units not present in the dataset. A record whose id matches a dataset unit replaces it.
    #[serde(default)]
    pub dev_units: Vec<UnitRecord>,
    /// Units slotted into every mutual pair regardless of join rules.
    #[serde(default)]
    pub flex: Vec<String>,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default = "default_limit")]
    pub limit: usize,
    /// Scoring threads; 0 scores on the calling thread.
    #[serde(default)]
    pub workers: usize,
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    /// Also rank two-unit teams, not only triples.
    #[serde(default)]
    pub include_pairs: bool,
}

impl Default for AssaultConfig {
    fn default() -> Self {
        Self {
            bosses: Vec::new(),
            whitelist: Vec::new(),
            blacklist: Vec::new(),
            dev_units: Vec::new(),
            flex: Vec::new(),
            verbose: false,
            limit: DEFAULT_RESULT_LIMIT,
            workers: 0,
            top_k: TOP_K,
            include_pairs: false,
        }
    }
}

impl AssaultConfig {
    pub fn for_bosses<S: AsRef<str>>(bosses: &[S]) -> Self {
        Self {
            bosses: bosses.iter().map(|name| name.as_ref().trim().to_string()).collect(),
            ..Self::default()
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)?;
        let config: Self = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&raw)?,
            Some("yaml" | "yml") | None => serde_yaml::from_str(&raw)?,
            Some(other) => {
                return Err(PlannerError::Config {
                    message: format!(
                        "unsupported config extension '.{other}' (expected .yaml, .yml or .json)"
                    ),
                })
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.bosses.len() != BOSSES_PER_ASSAULT {
            return Err(PlannerError::BossCount {
                expected: BOSSES_PER_ASSAULT,
                found: self.bosses.len(),
            });
        }
        if let Some(blank) = self.bosses.iter().position(|name| name.trim().is_empty()) {
            return Err(PlannerError::Config {
                message: format!("boss #{} has an empty name", blank + 1),
            });
        }
        if self.limit == 0 {
            return Err(PlannerError::Config {
                message: "limit must be at least 1".to_string(),
            });
        }
        if self.top_k == 0 || self.top_k > MAX_TOP_K {
            return Err(PlannerError::Config {
                message: format!("top_k must be within 1..={MAX_TOP_K}, got {}", self.top_k),
            });
        }
        if let Some(name) = self
            .whitelist
            .iter()
            .find(|name| self.blacklist.iter().any(|other| other.eq_ignore_ascii_case(name)))
        {
            return Err(PlannerError::Config {
                message: format!("unit '{name}' is both whitelisted and blacklisted"),
            });
        }
        if !self.dev_units.is_empty() {
            let report = validate_units(&self.dev_units)?;
            if let Some(problem) = report
                .diagnostics
                .iter()
                .find(|diag| diag.severity == ValidationSeverity::Error)
            {
                return Err(PlannerError::Config {
                    message: format!("developer unit {problem}"),
                });
            }
        }
        Ok(())
    }
}
