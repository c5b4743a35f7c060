//! In-memory data source.
//!
//! Evaluates requests against a vector of records with SQL-like semantics:
//! comparisons against null are false (except `IS`/`IS NOT`), `LIKE` is
//! case-insensitive with `%` and `_` wildcards, and numeric sort keys compare
//! by their leading number.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use super::{DataSource, QueryRequest, Rows, SourceError, SourceResult};
use crate::model::Value;
use crate::query::{CompiledCondition, CompiledSort, ConditionValue, Operator, SortDirection};
use crate::registry::FieldKey;

/// One record, keyed by field key.
pub type Record = BTreeMap<String, Value>;

/// A data source over records held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    record_set: String,
    records: Vec<Record>,
}

impl MemorySource {
    pub fn new(record_set: &str) -> Self {
        Self {
            record_set: record_set.into(),
            records: Vec::new(),
        }
    }

    /// Add a record from `(field key, value)` pairs.
    pub fn with_record<I, K, V>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        self.records.push(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    pub fn push(&mut self, record: Record) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl DataSource for MemorySource {
    fn execute(&self, request: &QueryRequest) -> SourceResult<Rows> {
        if request.record_set != self.record_set {
            return Err(SourceError::UnknownRecordSet(request.record_set.clone()));
        }

        let mut matching: Vec<&Record> = self
            .records
            .iter()
            .filter(|r| request.conditions.iter().all(|c| matches(r, c)))
            .collect();

        let mut keys: Vec<CompiledSort> = request.sort.clone();
        if let Some(page) = &request.paginate_by {
            if keys.first().map(|k| &k.field.key) != Some(&page.key) {
                keys.insert(0, CompiledSort::new(page.clone(), SortDirection::Asc));
            }
        }
        // Stable, so ties keep insertion order.
        matching.sort_by(|a, b| compare_records(a, b, &keys));

        Ok(matching
            .into_iter()
            .map(|r| request.fields.iter().map(|f| lookup(r, f)).collect())
            .collect())
    }
}

fn lookup(record: &Record, field: &FieldKey) -> Value {
    record.get(&field.key).cloned().unwrap_or_default()
}

fn compare_records(a: &Record, b: &Record, keys: &[CompiledSort]) -> Ordering {
    for key in keys {
        let (va, vb) = (lookup(a, &key.field), lookup(b, &key.field));
        let ordering = if key.numeric {
            va.as_number()
                .partial_cmp(&vb.as_number())
                .unwrap_or(Ordering::Equal)
        } else {
            va.compare(&vb)
        };
        let ordering = match key.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}

fn matches(record: &Record, condition: &CompiledCondition) -> bool {
    let cell = lookup(record, &condition.field);
    match (&condition.value, condition.operator) {
        (ConditionValue::Null, Operator::NotEq | Operator::IsNot) => !cell.is_null(),
        (ConditionValue::Null, _) => cell.is_null(),
        (ConditionValue::List(items), _) => {
            !cell.is_null() && items.iter().any(|item| compare(&cell, item) == Ordering::Equal)
        }
        // Null-safe: a null cell is distinct from any value.
        (ConditionValue::Single(_), Operator::IsNot) if cell.is_null() => true,
        (ConditionValue::Single(_), _) if cell.is_null() => false,
        (ConditionValue::Single(value), op) => {
            let ordering = compare(&cell, value);
            match op {
                Operator::Eq | Operator::In => ordering == Ordering::Equal,
                Operator::NotEq => ordering != Ordering::Equal,
                Operator::Lt => ordering == Ordering::Less,
                Operator::LtEq => ordering != Ordering::Greater,
                Operator::Gt => ordering == Ordering::Greater,
                Operator::GtEq => ordering != Ordering::Less,
                Operator::Like => like(&cell.as_text(), value),
                Operator::NotLike => !like(&cell.as_text(), value),
                Operator::Is => ordering == Ordering::Equal,
                Operator::IsNot => ordering != Ordering::Equal,
            }
        }
    }
}

/// Compare a stored value with a condition operand.
///
/// Numeric cells compare numerically when the operand parses as a number;
/// everything else compares as text.
fn compare(cell: &Value, operand: &str) -> Ordering {
    match cell {
        Value::Integer(_) | Value::Real(_) => match operand.trim().parse::<f64>() {
            Ok(n) => cell.as_number().partial_cmp(&n).unwrap_or(Ordering::Equal),
            Err(_) => cell.as_text().as_str().cmp(operand),
        },
        _ => cell.as_text().as_str().cmp(operand),
    }
}

/// SQL `LIKE`: `%` matches any run, `_` one character, ASCII case-insensitive.
fn like(text: &str, pattern: &str) -> bool {
    let text: Vec<char> = text.chars().map(|c| c.to_ascii_lowercase()).collect();
    let pattern: Vec<char> = pattern.chars().map(|c| c.to_ascii_lowercase()).collect();

    let (mut t, mut p) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;
    while t < text.len() {
        if p < pattern.len() && (pattern[p] == '_' || pattern[p] == text[t]) {
            t += 1;
            p += 1;
        } else if p < pattern.len() && pattern[p] == '%' {
            backtrack = Some((p, t));
            p += 1;
        } else if let Some((bp, bt)) = backtrack {
            p = bp + 1;
            t = bt + 1;
            backtrack = Some((bp, bt + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|&c| c == '%')
}
