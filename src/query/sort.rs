//! Sort planner: compiles multi-key sort specifications.

use std::fmt;
use std::str::FromStr;

use crate::model::ReportDefinition;
use crate::registry::{FieldKey, FieldRegistry};

/// Marker appended to a key that sorts numerically.
pub const NUMERIC_MARKER: &str = "+0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(format!("Unknown sort direction: {}", s)),
        }
    }
}

/// One compiled sort key.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSort {
    pub field: FieldKey,
    pub direction: SortDirection,
    /// Compare numerically rather than lexicographically.
    pub numeric: bool,
}

impl CompiledSort {
    pub fn new(field: FieldKey, direction: SortDirection) -> Self {
        Self {
            field,
            direction,
            numeric: false,
        }
    }

    /// The key as ordered by, with the numeric marker when coerced.
    pub fn ordering_key(&self) -> String {
        if self.numeric {
            format!("{}{}", self.field.key, NUMERIC_MARKER)
        } else {
            self.field.key.clone()
        }
    }
}

impl fmt::Display for CompiledSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ordering_key(), self.direction.as_str())
    }
}

pub struct SortPlanner<'a> {
    registry: &'a FieldRegistry,
}

impl<'a> SortPlanner<'a> {
    pub fn new(registry: &'a FieldRegistry) -> Self {
        Self { registry }
    }

    /// Compile the definition's sort lists.
    ///
    /// A missing or invalid direction reuses the last valid one (starting at
    /// `ASC`). Fields unknown to the registry are skipped and leave the carried
    /// direction alone. With no sort fields at all the identity field is
    /// sorted ascending.
    pub fn compile(&self, definition: &ReportDefinition) -> Vec<CompiledSort> {
        if definition.sort_fields.is_empty() {
            return vec![CompiledSort::new(FieldKey::identity(), SortDirection::Asc)];
        }

        let mut carried = SortDirection::Asc;
        let mut compiled = Vec::new();
        for (index, field) in definition.sort_fields.iter().enumerate() {
            if !self.registry.contains(field) {
                tracing::debug!(field = %field, "skipping sort on unknown field");
                continue;
            }
            if let Some(Ok(direction)) = definition
                .sort_directions
                .get(index)
                .map(|d| d.parse::<SortDirection>())
            {
                carried = direction;
            }
            compiled.push(CompiledSort {
                field: self.registry.resolve(field),
                direction: carried,
                numeric: definition.numeric_sort.contains(field),
            });
        }
        compiled
    }
}
