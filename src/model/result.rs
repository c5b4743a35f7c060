//! Materialised report results and the artifacts rendered from them.

use std::path::PathBuf;

use serde::Serialize;

use super::value::Value;

/// A result column: disambiguated field key plus display header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Column {
    pub key: String,
    pub header: String,
}

/// A cell keeps the underlying value separate from what is displayed, so
/// display-only passes such as duplicate blanking never lose data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    pub value: Value,
    pub display: String,
}

impl Cell {
    pub fn new(value: Value) -> Self {
        let display = value.to_string();
        Self { value, display }
    }

    /// An empty cell, used as filler in the totals row.
    pub fn empty() -> Self {
        Self {
            value: Value::Null,
            display: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    pub cells: Vec<Cell>,
}

impl Row {
    pub fn from_values(values: Vec<Value>) -> Self {
        Self {
            cells: values.into_iter().map(Cell::new).collect(),
        }
    }

    pub fn displays(&self) -> Vec<&str> {
        self.cells.iter().map(|c| c.display.as_str()).collect()
    }
}

/// A rectangular result matrix.
///
/// Owned by a single generation request and discarded once its artifacts
/// have been rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReportResult {
    pub columns: Vec<Column>,
    pub rows: Vec<Row>,
    /// Column totals, appended after the body when any column is totalled.
    pub totals: Option<Row>,
    /// Index of the column whose values split the result into pages.
    #[serde(skip)]
    pub paginate_by: Option<usize>,
}

/// A run of consecutive rows sharing a pagination value.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<'a> {
    pub label: Option<String>,
    pub rows: &'a [Row],
}

impl ReportResult {
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows,
            totals: None,
            paginate_by: None,
        }
    }

    pub fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    /// Display values of one column, top to bottom.
    pub fn column_displays(&self, key: &str) -> Vec<&str> {
        match self.column_index(key) {
            Some(idx) => self
                .rows
                .iter()
                .map(|r| r.cells[idx].display.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Split rows into pages by the pagination column.
    ///
    /// Pages group *consecutive* rows; the data source orders by the
    /// pagination field first so each value forms one page. Without a
    /// pagination column the whole body is a single unlabeled page.
    pub fn pages(&self) -> Vec<Page<'_>> {
        let Some(idx) = self.paginate_by else {
            return vec![Page {
                label: None,
                rows: &self.rows,
            }];
        };

        let mut pages = Vec::new();
        let mut start = 0;
        for i in 1..=self.rows.len() {
            let boundary = i == self.rows.len()
                || self.rows[i].cells[idx].value != self.rows[start].cells[idx].value;
            if boundary {
                pages.push(Page {
                    label: Some(self.rows[start].cells[idx].value.to_string()),
                    rows: &self.rows[start..i],
                });
                start = i;
            }
        }
        pages
    }
}

/// Rendered content, either carried inline or stored durably.
#[derive(Debug, Clone, PartialEq)]
pub enum ArtifactContent {
    Inline(Vec<u8>),
    Stored(PathBuf),
}

/// One rendered output of a report in one format. Never mutated after
/// creation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedArtifact {
    /// The format the caller asked for, even when rendering went through an
    /// intermediate format.
    pub format: String,
    /// Sanitised file name.
    pub name: String,
    pub content: ArtifactContent,
    /// SHA-256 of the rendered bytes.
    pub checksum: String,
}

impl GeneratedArtifact {
    /// Inline content as text, if the artifact carries its content.
    pub fn inline_text(&self) -> Option<String> {
        match &self.content {
            ArtifactContent::Inline(bytes) => Some(String::from_utf8_lossy(bytes).into_owned()),
            ArtifactContent::Stored(_) => None,
        }
    }

    pub fn stored_path(&self) -> Option<&PathBuf> {
        match &self.content {
            ArtifactContent::Stored(path) => Some(path),
            ArtifactContent::Inline(_) => None,
        }
    }
}
