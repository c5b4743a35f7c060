//! The user-authored report definition.
//!
//! A definition is produced by an editing surface outside this crate and is
//! read-only here. Every list is kept exactly as authored; validation happens
//! when the definition is compiled, never on load.
//!
//! ```toml
//! title = "Members by region"
//! fields = ["Region", "Member.Name", "Total"]
//! headers = ["Region", "Name"]
//! condition_fields = ["Total"]
//! condition_operators = [">"]
//! condition_values = ["100"]
//! sort_fields = ["Region", "Total"]
//! sort_directions = ["ASC", "DESC"]
//! blank_duplicates = ["Region"]
//! column_totals = ["Total"]
//! formats = ["html", "csv"]
//! ```

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// A declarative report configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportDefinition {
    /// Report title, also the basis of artifact file names.
    pub title: String,

    /// Selected field names, in display order. Names may be dotted.
    pub fields: Vec<String>,

    /// Display headers, positionally aligned with `fields`. May be shorter.
    pub headers: Vec<String>,

    /// Condition field names.
    pub condition_fields: Vec<String>,

    /// Condition operators, aligned with `condition_fields`.
    pub condition_operators: Vec<String>,

    /// Raw condition values, aligned with `condition_fields`.
    pub condition_values: Vec<String>,

    /// Sort field names.
    pub sort_fields: Vec<String>,

    /// Sort directions (`ASC`/`DESC`), aligned with `sort_fields`.
    pub sort_directions: Vec<String>,

    /// Fields sorted numerically rather than lexicographically.
    pub numeric_sort: BTreeSet<String>,

    /// Fields whose consecutive repeated values are blanked.
    pub blank_duplicates: BTreeSet<String>,

    /// Fields combined into a per-row derived column.
    pub add_in_rows: BTreeSet<String>,

    /// Fields totalled at the foot of the report.
    pub column_totals: BTreeSet<String>,

    /// Field whose distinct values split the report into pages.
    pub paginate_by: Option<String>,

    /// Page heading template; `$name` is replaced by the page value.
    pub page_header: Option<String>,

    /// Fallback values for `param:` substitutions.
    pub default_parameters: BTreeMap<String, String>,

    /// Formats produced by a batch generation.
    pub formats: Vec<String>,
}

impl ReportDefinition {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn with_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headers = headers.into_iter().map(Into::into).collect();
        self
    }

    /// Append a complete condition tuple to the three parallel lists.
    pub fn with_condition(mut self, field: &str, operator: &str, value: &str) -> Self {
        self.condition_fields.push(field.into());
        self.condition_operators.push(operator.into());
        self.condition_values.push(value.into());
        self
    }

    /// Append a sort key. `None` leaves the direction slot empty.
    ///
    /// An empty slot only stays empty when it is trailing; a later explicit
    /// direction fills earlier gaps with `""`, which the planner treats as
    /// invalid and therefore as "carry over".
    pub fn with_sort(mut self, field: &str, direction: Option<&str>) -> Self {
        let index = self.sort_fields.len();
        self.sort_fields.push(field.into());
        if let Some(dir) = direction {
            self.sort_directions.resize(index, String::new());
            self.sort_directions.push(dir.into());
        }
        self
    }

    pub fn with_numeric_sort(mut self, field: &str) -> Self {
        self.numeric_sort.insert(field.into());
        self
    }

    pub fn with_blank_duplicates(mut self, field: &str) -> Self {
        self.blank_duplicates.insert(field.into());
        self
    }

    pub fn with_add_in_rows(mut self, field: &str) -> Self {
        self.add_in_rows.insert(field.into());
        self
    }

    pub fn with_column_total(mut self, field: &str) -> Self {
        self.column_totals.insert(field.into());
        self
    }

    pub fn with_paginate_by(mut self, field: &str) -> Self {
        self.paginate_by = Some(field.into());
        self
    }

    pub fn with_page_header(mut self, template: &str) -> Self {
        self.page_header = Some(template.into());
        self
    }

    pub fn with_default_parameter(mut self, name: &str, value: &str) -> Self {
        self.default_parameters.insert(name.into(), value.into());
        self
    }

    pub fn with_formats<I, S>(mut self, formats: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.formats = formats.into_iter().map(Into::into).collect();
        self
    }

    /// Header text authored for the field at `index`, if any.
    pub fn header_at(&self, index: usize) -> Option<&str> {
        self.headers
            .get(index)
            .map(String::as_str)
            .filter(|h| !h.trim().is_empty())
    }
}
