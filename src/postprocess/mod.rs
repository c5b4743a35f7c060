//! Column post-processing over a fetched result matrix.
//!
//! Passes run in a fixed order: derived columns first, then duplicate
//! blanking, then totals. Derived columns exist by the time totals are
//! summed, so they can be totalled like any other column.

use std::collections::BTreeSet;

use crate::model::{Cell, Column, ReportDefinition, ReportResult, Row, Value};
use crate::registry::SelectedField;

/// Key of the column appended by [`RowSum`].
pub const ROW_TOTAL_KEY: &str = "row_total";

/// Blank repeated consecutive display values in the given columns.
///
/// Comparison is on the underlying value, so a run of three equal values
/// blanks the second and third. Values themselves are left intact. When the
/// result is paginated the comparison restarts on each page, so the first row
/// of a page always shows its values.
pub fn blank_duplicates(result: &mut ReportResult, keys: &BTreeSet<String>) {
    let page_starts: Vec<bool> = (0..result.rows.len())
        .map(|i| match result.paginate_by {
            Some(p) => i > 0 && result.rows[i].cells[p].value != result.rows[i - 1].cells[p].value,
            None => false,
        })
        .collect();

    for key in keys {
        let Some(idx) = result.column_index(key) else {
            continue;
        };
        for i in (1..result.rows.len()).rev() {
            if page_starts[i] {
                continue;
            }
            if result.rows[i].cells[idx].value == result.rows[i - 1].cells[idx].value {
                result.rows[i].cells[idx].display.clear();
            }
        }
    }
}

/// Sum the given columns into `result.totals`.
///
/// Cells are read by their leading number; anything without one counts as
/// zero. Unmarked columns get an empty cell. With no matching columns the
/// totals row is left unset.
pub fn apply_totals(result: &mut ReportResult, keys: &BTreeSet<String>) {
    let marked: Vec<usize> = keys.iter().filter_map(|k| result.column_index(k)).collect();
    if marked.is_empty() {
        return;
    }

    let cells = (0..result.columns.len())
        .map(|idx| {
            if marked.contains(&idx) {
                let sum: f64 = result.rows.iter().map(|r| r.cells[idx].value.as_number()).sum();
                Cell::new(Value::Real(sum))
            } else {
                Cell::empty()
            }
        })
        .collect();
    result.totals = Some(Row { cells });
}

/// Produces per-row derived columns for fields marked "add in rows".
pub trait RowDeriver {
    /// Columns appended to the result, in order.
    fn columns(&self) -> Vec<Column>;

    /// Values for the appended columns, computed from the cells at `inputs`.
    fn derive(&self, row: &Row, inputs: &[usize]) -> Vec<Value>;
}

/// Default deriver: one `Total` column summing the marked cells of each row.
#[derive(Debug, Clone, Copy, Default)]
pub struct RowSum;

impl RowDeriver for RowSum {
    fn columns(&self) -> Vec<Column> {
        vec![Column {
            key: ROW_TOTAL_KEY.into(),
            header: "Total".into(),
        }]
    }

    fn derive(&self, row: &Row, inputs: &[usize]) -> Vec<Value> {
        let sum: f64 = inputs.iter().map(|&i| row.cells[i].value.as_number()).sum();
        vec![Value::Real(sum)]
    }
}

/// Append the deriver's columns, computed from the columns at `keys`.
pub fn derive_columns(result: &mut ReportResult, keys: &BTreeSet<String>, deriver: &dyn RowDeriver) {
    let inputs: Vec<usize> = keys.iter().filter_map(|k| result.column_index(k)).collect();
    if inputs.is_empty() {
        return;
    }

    let columns = deriver.columns();
    let width = columns.len();
    for row in &mut result.rows {
        let mut values = deriver.derive(row, &inputs);
        values.resize(width, Value::Null);
        row.cells.extend(values.into_iter().map(Cell::new));
    }
    result.columns.extend(columns);
}

/// Runs the configured passes for one definition.
///
/// Definitions name fields, but passes work on result columns. A field
/// selected twice marks both of its columns.
pub struct PostProcessor<'a> {
    deriver: &'a dyn RowDeriver,
    add_in_rows: BTreeSet<String>,
    blank: BTreeSet<String>,
    totals: BTreeSet<String>,
}

impl<'a> PostProcessor<'a> {
    pub fn new(
        definition: &ReportDefinition,
        selection: &[SelectedField],
        deriver: &'a dyn RowDeriver,
    ) -> Self {
        let columns_for = |fields: &BTreeSet<String>| -> BTreeSet<String> {
            selection
                .iter()
                .filter(|s| fields.contains(&s.field.name))
                .map(|s| s.column.key.clone())
                .collect()
        };

        let add_in_rows = columns_for(&definition.add_in_rows);
        // Derived columns are not selected fields; they are totalled by key.
        let mut totals = columns_for(&definition.column_totals);
        if !add_in_rows.is_empty() {
            for column in deriver.columns() {
                if definition.column_totals.contains(&column.key) {
                    totals.insert(column.key);
                }
            }
        }

        Self {
            deriver,
            add_in_rows,
            blank: columns_for(&definition.blank_duplicates),
            totals,
        }
    }

    pub fn run(&self, result: &mut ReportResult) {
        derive_columns(result, &self.add_in_rows, self.deriver);
        blank_duplicates(result, &self.blank);
        apply_totals(result, &self.totals);
    }
}
