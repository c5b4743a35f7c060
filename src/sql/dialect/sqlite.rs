//! SQLite SQL dialect.
//!
//! SQLite features:
//! - ANSI identifier quoting (`"`)
//! - Numbered `?N` bind parameters
//! - `CAST(x AS REAL)` reads the leading number of text values
//! - `IS [NOT] DISTINCT FROM` for null-safe value comparison (3.39+)

use super::helpers;
use super::SqlDialect;

/// SQLite SQL dialect.
#[derive(Debug, Clone, Copy)]
pub struct Sqlite;

impl SqlDialect for Sqlite {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn quote_identifier(&self, ident: &str) -> String {
        helpers::quote_double(ident)
    }

    fn placeholder(&self, n: usize) -> String {
        helpers::placeholder_question_numbered(n)
    }

    // Uses default emit_numeric_sort (CAST ... AS REAL)
    // Uses default emit_null_safe_compare (IS [NOT] DISTINCT FROM)
}
