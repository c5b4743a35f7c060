//! SQLite data source.

use std::path::Path;

use rusqlite::config::DbConfig;
use rusqlite::types::ValueRef;
use rusqlite::{params_from_iter, Connection};

use super::{DataSource, QueryRequest, Rows, SourceResult};
use crate::model::Value;
use crate::sql::{Dialect, SelectQuery};

/// Reads report rows from a SQLite database.
///
/// Record sets are table or view names. Every condition operand is bound as
/// a parameter. Double-quoted string literals are disabled on the connection,
/// so a quoted identifier naming a missing column is an error rather than a
/// string constant.
pub struct SqliteSource {
    conn: Connection,
}

impl SqliteSource {
    /// Open a database file.
    pub fn open(path: impl AsRef<Path>) -> SourceResult<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> SourceResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    pub fn from_connection(conn: Connection) -> SourceResult<Self> {
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DML, false)?;
        conn.set_db_config(DbConfig::SQLITE_DBCONFIG_DQS_DDL, false)?;
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl DataSource for SqliteSource {
    fn execute(&self, request: &QueryRequest) -> SourceResult<Rows> {
        let built = SelectQuery::from_request(request).build(Dialect::Sqlite);
        tracing::debug!(sql = %built.sql, binds = built.binds.len(), "executing report query");

        let mut stmt = self.conn.prepare(&built.sql)?;
        let width = request.fields.len();
        let rows = stmt
            .query_map(params_from_iter(built.binds.iter()), |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(to_value))
                    .collect::<Result<Vec<_>, _>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

fn to_value(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(f) => Value::Real(f),
        ValueRef::Text(t) => Value::Text(String::from_utf8_lossy(t).into_owned()),
        ValueRef::Blob(b) => Value::Text(format!("<{} bytes>", b.len())),
    }
}
