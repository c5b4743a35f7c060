//! Field registry: maps report field names to keys and labels.
//!
//! Field names may be dotted (`Member.Email`). Every name maps to a
//! [`FieldKey`] whose key is the name with `.` replaced by `_`. That mapping is
//! pure; the registry does not guard against a dotted and an undotted name
//! colliding (`A.B` and `A_B`), which is left to whoever declares the fields.
//!
//! A registry is built from a [`ReportType`], the capability set a concrete
//! report must provide. Missing capabilities are rejected when the registry is
//! built, not when a report first runs.

use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

use inflector::Inflector;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::model::{Column, ReportDefinition};

/// Synthetic identity field present in every registry.
pub const IDENTITY_FIELD: &str = "ID";

static FIELD_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+(\.[A-Za-z0-9_]+)*$").unwrap());

/// Errors raised when a report type is registered.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RegistryError {
    #[error("report type is missing a required capability: {0}")]
    MissingCapability(&'static str),

    #[error("invalid field name '{0}': only letters, digits, '.' and '_' are allowed")]
    InvalidFieldName(String),
}

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Stable identifier for a field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldKey {
    /// The field name as authored, possibly dotted.
    pub name: String,
    /// Dot-free internal identifier.
    pub key: String,
}

impl FieldKey {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            key: name.replace('.', "_"),
        }
    }

    pub fn identity() -> Self {
        Self::new(IDENTITY_FIELD)
    }

    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl fmt::Display for FieldKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

/// A field a report type offers, with an optional human label.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FieldSpec {
    pub name: String,
    pub label: Option<String>,
}

impl FieldSpec {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.into(),
            label: None,
        }
    }

    pub fn labeled(name: &str, label: &str) -> Self {
        Self {
            name: name.into(),
            label: Some(label.into()),
        }
    }
}

/// Capabilities a concrete report type must implement.
pub trait ReportType {
    /// Human name of the report type.
    fn report_name(&self) -> &str;

    /// Fields users may select, filter and sort by.
    fn reportable_fields(&self) -> Vec<FieldSpec>;

    /// The record set the report reads from.
    fn data_objects(&self) -> &str;
}

/// One selected field together with the result column it produces.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectedField {
    pub field: FieldKey,
    pub column: Column,
}

/// Registry of the fields one report type exposes.
#[derive(Debug, Clone)]
pub struct FieldRegistry {
    report_name: String,
    record_set: String,
    order: Vec<String>,
    labels: HashMap<String, String>,
}

impl FieldRegistry {
    /// Build a registry from a report type, validating its capabilities.
    pub fn for_report_type(report: &dyn ReportType) -> RegistryResult<Self> {
        if report.report_name().trim().is_empty() {
            return Err(RegistryError::MissingCapability("report_name"));
        }
        if report.data_objects().trim().is_empty() {
            return Err(RegistryError::MissingCapability("data_objects"));
        }
        let fields = report.reportable_fields();
        if fields.is_empty() {
            return Err(RegistryError::MissingCapability("reportable_fields"));
        }

        let mut registry = Self {
            report_name: report.report_name().to_string(),
            record_set: report.data_objects().to_string(),
            order: Vec::new(),
            labels: HashMap::new(),
        };
        for spec in fields {
            registry.insert(spec)?;
        }
        if !registry.contains(IDENTITY_FIELD) {
            registry.insert(FieldSpec::labeled(IDENTITY_FIELD, IDENTITY_FIELD))?;
        }
        Ok(registry)
    }

    fn insert(&mut self, spec: FieldSpec) -> RegistryResult<()> {
        if !FIELD_NAME.is_match(&spec.name) {
            return Err(RegistryError::InvalidFieldName(spec.name));
        }
        let label = spec
            .label
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| spec.name.to_title_case());
        if !self.labels.contains_key(&spec.name) {
            self.order.push(spec.name.clone());
        }
        self.labels.insert(spec.name, label);
        Ok(())
    }

    pub fn report_name(&self) -> &str {
        &self.report_name
    }

    pub fn record_set(&self) -> &str {
        &self.record_set
    }

    /// Registered field names in declaration order.
    pub fn field_names(&self) -> &[String] {
        &self.order
    }

    pub fn contains(&self, name: &str) -> bool {
        self.labels.contains_key(name)
    }

    pub fn resolve(&self, name: &str) -> FieldKey {
        FieldKey::new(name)
    }

    /// Human label for a field, or the raw name when it is not registered.
    pub fn label_for(&self, name: &str) -> String {
        self.labels
            .get(name)
            .cloned()
            .unwrap_or_else(|| name.to_string())
    }

    /// Resolve the definition's selected fields into result columns.
    ///
    /// Fields the registry does not expose are dropped. Repeated selections
    /// of the same field get `_2`, `_3`, ... appended to their column key
    /// from the second occurrence on. Headers come from the definition at the
    /// field's authored position, falling back to the registry label.
    pub fn selection(&self, definition: &ReportDefinition) -> Vec<SelectedField> {
        let kept: Vec<(usize, &String)> = definition
            .fields
            .iter()
            .enumerate()
            .filter(|(_, name)| {
                let known = self.contains(name);
                if !known {
                    tracing::debug!(field = %name, "skipping selection of unknown field");
                }
                known
            })
            .collect();
        let names: Vec<String> = kept.iter().map(|(_, name)| (*name).clone()).collect();
        let keys = disambiguate(&names);

        kept.into_iter()
            .zip(keys)
            .map(|((position, name), key)| SelectedField {
                field: self.resolve(name),
                column: Column {
                    key,
                    header: definition
                        .header_at(position)
                        .map(str::to_string)
                        .unwrap_or_else(|| self.label_for(name)),
                },
            })
            .collect()
    }

    /// Ordered mapping of disambiguated column key to header text.
    pub fn compute_headers(&self, definition: &ReportDefinition) -> Vec<Column> {
        self.selection(definition)
            .into_iter()
            .map(|s| s.column)
            .collect()
    }
}

/// Disambiguate an ordered field list into unique column keys.
///
/// The first occurrence of a field keeps its plain key; later occurrences are
/// suffixed with their 1-based occurrence number.
pub fn disambiguate(fields: &[String]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    fields
        .iter()
        .map(|name| {
            let key = FieldKey::new(name).key;
            let count = seen.entry(key.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                key
            } else {
                format!("{}_{}", key, count)
            }
        })
        .collect()
}
