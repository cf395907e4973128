//! Offline diagnostics for catalog and synergy files. Loading never needs
//! this: bad entries are filtered there. The report explains what was
//! filtered and which illuvials will resolve as Unknown.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;

use serde_json::{Map, Value};

use crate::data::illuvial::catalog_entries;
use crate::error::{DataError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
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

#[derive(Debug, Clone, PartialEq, Eq)]
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

#[derive(Debug, Clone, Default)]
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
        self.count(ValidationSeverity::Error) > 0
    }

    pub fn count(&self, severity: ValidationSeverity) -> usize {
        self.diagnostics
            .iter()
            .filter(|diag| diag.severity == severity)
            .count()
    }
}

#[derive(Clone, Copy)]
enum FieldKind {
    String,
    Number,
}

const CATALOG_FIELDS: &[(&str, FieldKind)] = &[
    ("displayName", FieldKind::String),
    ("line", FieldKind::String),
    ("stage", FieldKind::Number),
    ("tier", FieldKind::Number),
    ("affinity", FieldKind::String),
    ("class", FieldKind::String),
    ("maxHealth", FieldKind::Number),
    ("attackPhysical", FieldKind::Number),
    ("attackSpeed", FieldKind::Number),
    ("image", FieldKind::String),
];

fn read(path: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|source| DataError::Io {
        path: path.to_string(),
        source,
    })
}

fn parse_json(path: &str, raw: &str) -> Result<Value> {
    serde_json::from_str(raw).map_err(|source| DataError::Json {
        path: path.to_string(),
        source,
    })
}

fn parse_synergy_value(path: &str, raw: &str) -> Result<Value> {
    let lower = path.to_ascii_lowercase();
    if lower.ends_with(".yaml") || lower.ends_with(".yml") {
        serde_yaml::from_str(raw).map_err(|source| DataError::Yaml {
            path: path.to_string(),
            source,
        })
    } else {
        parse_json(path, raw)
    }
}

/// Validate both files and cross-check catalog display names against the
/// synergy keys. Read/parse failures return Err; content issues go in the report.
pub fn validate_datasets(catalog_path: &str, synergy_path: &str) -> Result<ValidationReport> {
    let catalog = parse_json(catalog_path, &read(catalog_path)?)?;
    let synergy = parse_synergy_value(synergy_path, &read(synergy_path)?)?;
    validate_values(catalog_path, &catalog, &synergy)
}

pub fn validate_values(catalog_path: &str, catalog: &Value, synergy: &Value) -> Result<ValidationReport> {
    let entries = catalog_entries(catalog).ok_or_else(|| DataError::Shape {
        path: catalog_path.to_string(),
        message: "expected top-level JSON array or { illuvials: [...] }".to_string(),
    })?;

    let mut report = ValidationReport::default();
    let synergy_bases = validate_synergy(&mut report, synergy);
    let catalog_names = validate_catalog(&mut report, entries, &synergy_bases);

    let mut orphans: Vec<&String> = synergy_bases
        .keys()
        .filter(|name| !catalog_names.contains(name.as_str()))
        .collect();
    orphans.sort();
    for name in orphans {
        report.push(
            ValidationSeverity::Info,
            format!("synergy['{name}']"),
            "no catalog entry uses this display name",
        );
    }

    Ok(report)
}

fn validate_catalog(
    report: &mut ValidationReport,
    entries: &[Value],
    synergy_bases: &HashMap<String, (String, String)>,
) -> HashSet<String> {
    let mut seen_ids = HashSet::new();
    let mut names = HashSet::new();

    for (index, entry) in entries.iter().enumerate() {
        let base_context = format!("catalog[{index}]");
        let Some(object) = entry.as_object() else {
            report.push(ValidationSeverity::Error, base_context, "entry is not an object");
            continue;
        };

        match object.get("id").and_then(Value::as_str) {
            Some(id) if !id.trim().is_empty() => {
                if !seen_ids.insert(id.to_string()) {
                    report.push(
                        ValidationSeverity::Error,
                        format!("{base_context}.id"),
                        format!("duplicate id '{id}'"),
                    );
                }
            }
            _ => {
                report.push(
                    ValidationSeverity::Error,
                    format!("{base_context}.id"),
                    "missing non-empty 'id'",
                );
                continue;
            }
        }

        let mut conforms = true;
        for &(field, kind) in CATALOG_FIELDS {
            let ok = match (object.get(field), kind) {
                (Some(Value::String(_)), FieldKind::String) => true,
                (Some(Value::Number(_)), FieldKind::Number) => true,
                _ => false,
            };
            if !ok {
                conforms = false;
                let expected = match kind {
                    FieldKind::String => "string",
                    FieldKind::Number => "number",
                };
                report.push(
                    ValidationSeverity::Warning,
                    format!("{base_context}.{field}"),
                    format!("expected {expected}; entry is excluded from the catalog"),
                );
            }
        }
        if !conforms {
            continue;
        }

        let display_name = object.get("displayName").and_then(Value::as_str).unwrap_or_default();
        names.insert(display_name.to_string());
        check_against_synergy(report, &base_context, object, display_name, synergy_bases);
    }

    names
}

fn check_against_synergy(
    report: &mut ValidationReport,
    context: &str,
    object: &Map<String, Value>,
    display_name: &str,
    synergy_bases: &HashMap<String, (String, String)>,
) {
    let Some((base_affinity, base_class)) = synergy_bases.get(display_name) else {
        report.push(
            ValidationSeverity::Info,
            context.to_string(),
            format!("'{display_name}' has no synergy entry and resolves as Unknown"),
        );
        return;
    };

    let affinity = object.get("affinity").and_then(Value::as_str).unwrap_or_default();
    if affinity != base_affinity.as_str() {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.affinity"),
            format!("catalog affinity '{affinity}' differs from synergy base '{base_affinity}'"),
        );
    }
    let class_name = object.get("class").and_then(Value::as_str).unwrap_or_default();
    if class_name != base_class.as_str() {
        report.push(
            ValidationSeverity::Warning,
            format!("{context}.class"),
            format!("catalog class '{class_name}' differs from synergy base '{base_class}'"),
        );
    }
}

/// Returns the base tags of every usable entry, keyed by display name.
fn validate_synergy(report: &mut ValidationReport, synergy: &Value) -> HashMap<String, (String, String)> {
    let mut bases = HashMap::new();
    let Some(map) = synergy.as_object() else {
        report.push(ValidationSeverity::Error, "synergy", "expected a mapping of display name to entry");
        return bases;
    };

    let mut names: Vec<&String> = map.keys().collect();
    names.sort();
    for name in names {
        let context = format!("synergy['{name}']");
        let Some(entry) = map.get(name).and_then(Value::as_object) else {
            report.push(ValidationSeverity::Error, context, "entry is not an object");
            continue;
        };

        let base_affinity = required_tag(report, &context, entry, "baseAffinity");
        let base_class = required_tag(report, &context, entry, "baseClass");
        composite_tags(report, &context, entry, "compositeAffinities", base_affinity.as_deref());
        composite_tags(report, &context, entry, "compositeClasses", base_class.as_deref());

        if let (Some(affinity), Some(class_name)) = (base_affinity, base_class) {
            bases.insert(name.clone(), (affinity, class_name));
        }
    }
    bases
}

fn required_tag(
    report: &mut ValidationReport,
    context: &str,
    entry: &Map<String, Value>,
    field: &str,
) -> Option<String> {
    match entry.get(field).and_then(Value::as_str) {
        Some(tag) if !tag.trim().is_empty() => Some(tag.to_string()),
        _ => {
            report.push(
                ValidationSeverity::Error,
                format!("{context}.{field}"),
                format!("missing non-empty '{field}'"),
            );
            None
        }
    }
}

fn composite_tags(
    report: &mut ValidationReport,
    context: &str,
    entry: &Map<String, Value>,
    field: &str,
    base: Option<&str>,
) {
    let Some(raw) = entry.get(field) else {
        return;
    };
    let Some(values) = raw.as_array() else {
        report.push(ValidationSeverity::Error, format!("{context}.{field}"), "expected array");
        return;
    };

    let mut seen: HashSet<&str> = base.into_iter().collect();
    for (index, value) in values.iter().enumerate() {
        match value.as_str() {
            Some(tag) if !seen.insert(tag) => report.push(
                ValidationSeverity::Info,
                format!("{context}.{field}[{index}]"),
                format!("'{tag}' repeats an earlier tag and is counted once"),
            ),
            Some(_) => {}
            None => report.push(
                ValidationSeverity::Error,
                format!("{context}.{field}[{index}]"),
                "expected string",
            ),
        }
    }
}
