//! Data sources: where report rows come from.
//!
//! The assembler hands a source a [`QueryRequest`]: already-validated field
//! keys, conditions and sort keys. How the source evaluates them is its own
//! business, but it must treat condition values as data. The SQL-backed
//! source binds them as parameters; the in-memory source compares them
//! directly.

mod memory;
mod sqlite;

pub use memory::MemorySource;
pub use sqlite::SqliteSource;

use crate::model::Value;
use crate::query::{CompiledCondition, CompiledSort};
use crate::registry::FieldKey;

/// Errors a data source can raise.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Unknown record set: {0}")]
    UnknownRecordSet(String),

    #[error("Data source failure: {0}")]
    Other(String),
}

pub type SourceResult<T> = Result<T, SourceError>;

/// Everything a source needs to fetch one report's rows.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRequest {
    /// Record set (table, view) to read.
    pub record_set: String,
    /// Selected fields in column order. A field selected twice appears twice.
    pub fields: Vec<FieldKey>,
    pub conditions: Vec<CompiledCondition>,
    pub sort: Vec<CompiledSort>,
    /// When set, rows must be ordered by this field before any sort key.
    pub paginate_by: Option<FieldKey>,
}

/// Rows aligned with [`QueryRequest::fields`].
pub type Rows = Vec<Vec<Value>>;

/// A blocking source of report rows.
pub trait DataSource {
    fn execute(&self, request: &QueryRequest) -> SourceResult<Rows>;
}

impl<T: DataSource + ?Sized> DataSource for &T {
    fn execute(&self, request: &QueryRequest) -> SourceResult<Rows> {
        (**self).execute(request)
    }
}
