use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::fs;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::data::unit::{Element, Role, UnitRecord, DEFENSIVE_ASSIST_TAG, TITLE_TAG};
use crate::error::Result;

/// Tier values outside this range are almost certainly data-entry mistakes.
const TIER_RANGE: std::ops::RangeInclusive<f64> = 0.0..=10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationSeverity {
    Error,
    Warning,
    Info,
}

impl ValidationSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl fmt::Display for ValidationSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationDiagnostic {
    pub severity: ValidationSeverity,
    pub context: String,
    pub message: String,
}

impl fmt::Display for ValidationDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.context, self.message)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub diagnostics: Vec<ValidationDiagnostic>,
}

impl ValidationReport {
    pub fn push(
        &mut self,
        severity: ValidationSeverity,
        context: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.diagnostics.push(ValidationDiagnostic {
            severity,
            context: context.into(),
            message: message.into(),
        });
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|diag| diag.severity == ValidationSeverity::Error)
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

pub fn validate_unit_dataset(path: &str) -> Result<ValidationReport> {
    let raw = fs::read_to_string(path)?;
    let payload: Value = serde_json::from_str(&raw)?;
    Ok(validate_unit_payload(&payload))
}

/// Validate already-parsed records, e.g. developer units from an assault config.
pub fn validate_units(records: &[UnitRecord]) -> Result<ValidationReport> {
    let payload = serde_json::to_value(records)?;
    Ok(validate_unit_payload(&payload))
}

/// Validate `{ "units": [...] }` (or a bare array) without deserializing into the model,
/// so that every problem is reported instead of the first.
pub fn validate_unit_payload(payload: &Value) -> ValidationReport {
    let mut report = ValidationReport::default();
    let Some(entries) = payload
        .get("units")
        .and_then(Value::as_array)
        .or_else(|| payload.as_array())
    else {
        report.push(
            ValidationSeverity::Error,
            "root",
            "expected top-level JSON array or { units: [...] }",
        );
        return report;
    };

    let known_names: HashSet<String> = entries
        .iter()
        .filter_map(|entry| entry.get("name").and_then(Value::as_str))
        .map(str::to_ascii_lowercase)
        .collect();
    let known_tags: BTreeSet<String> = entries
        .iter()
        .filter_map(|entry| entry.get("tags").and_then(Value::as_array))
        .flatten()
        .filter_map(Value::as_str)
        .map(|tag| tag.trim().to_ascii_lowercase())
        .chain([TITLE_TAG.to_string(), DEFENSIVE_ASSIST_TAG.to_string()])
        .collect();

    let mut seen_ids = HashSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let base_context = format!("entry[{index}]");
        let Some(object) = entry.as_object() else {
            report.push(ValidationSeverity::Error, base_context, "entry is not an object");
            continue;
        };

        let unit_id = match object.get("id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => {
                if !seen_ids.insert(id.to_string()) {
                    report.push(
                        ValidationSeverity::Error,
                        format!("{base_context}.id"),
                        format!("duplicate id '{id}'"),
                    );
                }
                id.to_string()
            }
            _ => {
                report.push(
                    ValidationSeverity::Error,
                    format!("{base_context}.id"),
                    "missing non-empty 'id'",
                );
                "<missing-id>".to_string()
            }
        };
        let context = format!("{base_context} id='{unit_id}'");

        match object.get("name").and_then(Value::as_str) {
            Some(name) if !name.trim().is_empty() => {}
            _ => report.push(
                ValidationSeverity::Error,
                format!("{context}.name"),
                "missing non-empty 'name'",
            ),
        }

        match object.get("rank").and_then(Value::as_str) {
            Some("S" | "A") => {}
            Some(other) => report.push(
                ValidationSeverity::Error,
                format!("{context}.rank"),
                format!("unsupported rank '{other}' (expected S or A)"),
            ),
            None => report.push(
                ValidationSeverity::Error,
                format!("{context}.rank"),
                "missing 'rank'",
            ),
        }

        match object.get("tier").and_then(Value::as_f64) {
            Some(tier) if TIER_RANGE.contains(&tier) => {}
            Some(tier) => report.push(
                ValidationSeverity::Warning,
                format!("{context}.tier"),
                format!("tier {tier} outside {}..={}", TIER_RANGE.start(), TIER_RANGE.end()),
            ),
            None => report.push(
                ValidationSeverity::Error,
                format!("{context}.tier"),
                "missing numeric 'tier'",
            ),
        }

        validate_tags(&mut report, object, &context);
        validate_join(&mut report, object, &context, &known_tags);
        validate_synergy(&mut report, object, &context, &known_names, &known_tags);
    }

    report
}

fn string_list<'a>(object: &'a Map<String, Value>, key: &str) -> Vec<&'a str> {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}

fn validate_tags(report: &mut ValidationReport, object: &Map<String, Value>, context: &str) {
    let tags: Vec<String> = string_list(object, "tags")
        .into_iter()
        .map(|tag| tag.trim().to_ascii_lowercase())
        .collect();
    let roles: Vec<Role> = tags.iter().filter_map(|tag| Role::from_tag(tag)).collect();
    let elements = tags
        .iter()
        .filter(|tag| Element::from_tag(tag).is_some())
        .count();

    if roles.len() != 1 {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.tags"),
            format!("{} role tags, expected exactly one", roles.len()),
        );
    }
    if elements > 1 {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.tags"),
            format!("{elements} element tags, expected at most one"),
        );
    }
    if elements == 0 && roles.first().is_some_and(Role::is_dps) {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.tags"),
            "damage dealer without an element tag never matches a weakness",
        );
    }
}

fn validate_join(
    report: &mut ValidationReport,
    object: &Map<String, Value>,
    context: &str,
    known_tags: &BTreeSet<String>,
) {
    let join = string_list(object, "join");
    if join.is_empty() {
        report.push(
            ValidationSeverity::Info,
            format!("{context}.join"),
            "empty join set accepts any teammate",
        );
    }
    for tag in join {
        if !known_tags.contains(&tag.trim().to_ascii_lowercase()) {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.join"),
                format!("join tag '{tag}' is not carried by any unit"),
            );
        }
    }
}

fn validate_synergy(
    report: &mut ValidationReport,
    object: &Map<String, Value>,
    context: &str,
    known_names: &HashSet<String>,
    known_tags: &BTreeSet<String>,
) {
    let Some(synergy) = object.get("synergy") else {
        return;
    };
    if synergy.is_null() {
        return;
    }
    let Some(synergy) = synergy.as_object() else {
        report.push(
            ValidationSeverity::Error,
            format!("{context}.synergy"),
            "expected object",
        );
        return;
    };

    for name in string_list(synergy, "units") {
        if !known_names.contains(&name.to_ascii_lowercase()) {
            report.push(
                ValidationSeverity::Warning,
                format!("{context}.synergy.units"),
                format!("synergy partner '{name}' is not in the dataset"),
            );
        }
    }
    for key in ["tags", "avoid"] {
        for tag in string_list(synergy, key) {
            if !known_tags.contains(&tag.trim().to_ascii_lowercase()) {
                report.push(
                    ValidationSeverity::Warning,
                    format!("{context}.synergy.{key}"),
                    format!("tag '{tag}' is not carried by any unit"),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn clean_dataset_has_no_errors() {
        let payload = json!({
            "units": [
                { "id": "a", "name": "Attacker", "rank": "S", "tier": 0.5,
                  "tags": ["attack", "ice"], "join": ["stun"] },
                { "id": "s", "name": "Stunner", "rank": "A", "tier": 1.0,
                  "tags": ["stun", "ice"], "join": ["attack"],
                  "synergy": { "units": ["Attacker"], "tags": ["ice"] } }
            ]
        });
        let report = validate_unit_payload(&payload);
        assert!(!report.has_errors(), "{:?}", report.diagnostics);
        assert_eq!(report.count(ValidationSeverity::Warning), 0);
    }

    #[test]
    fn reports_every_problem() {
        let payload = json!([
            { "id": "x", "name": "", "rank": "B", "tier": 1.0, "tags": ["attack", "stun"] },
            { "id": "x", "name": "Dup", "rank": "S", "tags": ["support"],
              "synergy": { "units": ["Nobody"] } }
        ]);
        let report = validate_unit_payload(&payload);
        let messages: Vec<String> = report.diagnostics.iter().map(ToString::to_string).collect();
        assert!(messages.iter().any(|m| m.contains("duplicate id 'x'")));
        assert!(messages.iter().any(|m| m.contains("missing non-empty 'name'")));
        assert!(messages.iter().any(|m| m.contains("unsupported rank 'B'")));
        assert!(messages.iter().any(|m| m.contains("2 role tags")));
        assert!(messages.iter().any(|m| m.contains("missing numeric 'tier'")));
        assert!(messages.iter().any(|m| m.contains("'Nobody' is not in the dataset")));
    }

    #[test]
    fn non_array_root_is_an_error() {
        let report = validate_unit_payload(&json!({ "teams": 3 }));
        assert!(report.has_errors());
    }
}
