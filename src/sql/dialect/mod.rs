//! SQL Dialect definitions and formatting rules.
//!
//! Report queries are single flat SELECTs, so the dialect surface is small:
//!
//! | Concern              | SQLite                   | Postgres                 | MySQL     |
//! |----------------------|--------------------------|--------------------------|-----------|
//! | Identifier quoting   | `"x"`                    | `"x"`                    | `` `x` `` |
//! | Bind placeholder     | `?N`                     | `$N`                     | `?`       |
//! | Numeric sort         | `CAST(x AS REAL)`        | regex prefix cast        | `x + 0`   |
//! | Null-safe `IS value` | `IS [NOT] DISTINCT FROM` | `IS [NOT] DISTINCT FROM` | `<=>`     |

pub mod helpers;
mod mysql;
mod postgres;
mod sqlite;

pub use mysql::MySql;
pub use postgres::Postgres;
pub use sqlite::Sqlite;

use std::str::FromStr;

use super::token::{Token, TokenStream};

/// SQL dialect trait - defines how report SQL constructs are rendered.
pub trait SqlDialect: std::fmt::Debug {
    /// Dialect name for display/logging.
    fn name(&self) -> &'static str;

    /// Quote an identifier (table, column, alias).
    fn quote_identifier(&self, ident: &str) -> String;

    /// Quote a string literal.
    fn quote_string(&self, s: &str) -> String {
        format!("'{}'", s.replace('\'', "''"))
    }

    /// Bind placeholder for the 1-based parameter `n`.
    fn placeholder(&self, n: usize) -> String {
        let _ = n;
        "?".into()
    }

    /// Expression that orders `ident` numerically by its leading number.
    fn emit_numeric_sort(&self, ident: &str) -> TokenStream {
        helpers::cast_ident(ident, Token::Real)
    }

    /// Null-safe comparison of `lhs` against a bound value.
    fn emit_null_safe_compare(
        &self,
        lhs: &TokenStream,
        rhs: &TokenStream,
        negated: bool,
    ) -> TokenStream {
        helpers::distinct_from(lhs, rhs, negated)
    }
}

/// Supported SQL dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dialect {
    #[default]
    Sqlite,
    Postgres,
    MySql,
}

impl Dialect {
    /// Get the dialect implementation.
    pub fn dialect(&self) -> &'static dyn SqlDialect {
        match self {
            Dialect::Sqlite => &Sqlite,
            Dialect::Postgres => &Postgres,
            Dialect::MySql => &MySql,
        }
    }
}

impl FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Dialect::Sqlite),
            "postgres" | "postgresql" => Ok(Dialect::Postgres),
            "mysql" => Ok(Dialect::MySql),
            _ => Err(format!("Unknown dialect: {}", s)),
        }
    }
}

// Implement SqlDialect for Dialect enum by delegating to concrete types
impl SqlDialect for Dialect {
    fn name(&self) -> &'static str {
        self.dialect().name()
    }

    fn quote_identifier(&self, ident: &str) -> String {
        self.dialect().quote_identifier(ident)
    }

    fn quote_string(&self, s: &str) -> String {
        self.dialect().quote_string(s)
    }

    fn placeholder(&self, n: usize) -> String {
        self.dialect().placeholder(n)
    }

    fn emit_numeric_sort(&self, ident: &str) -> TokenStream {
        self.dialect().emit_numeric_sort(ident)
    }

    fn emit_null_safe_compare(
        &self,
        lhs: &TokenStream,
        rhs: &TokenStream,
        negated: bool,
    ) -> TokenStream {
        self.dialect().emit_null_safe_compare(lhs, rhs, negated)
    }
}
