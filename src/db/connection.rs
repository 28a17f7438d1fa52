//! Database connection management.

use crate::config::StoreConfig;
use crate::error::{Error, Result};
use rusqlite::{params, Connection as SqliteConnection, OptionalExtension, Row, ToSql};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Path to the questions database file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbPath {
    path: PathBuf,
}

impl DbPath {
    /// Default database filename.
    pub const DEFAULT_FILE: &'static str = "questions.db";

    /// Create a new DbPath with the default filename.
    pub fn default_path() -> Self {
        Self {
            path: PathBuf::from(Self::DEFAULT_FILE),
        }
    }

    /// Create a DbPath from a string path.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the path as a reference.
    pub fn as_path(&self) -> &Path {
        &self.path
    }

    /// Check if the database file exists.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Default for DbPath {
    fn default() -> Self {
        Self::default_path()
    }
}

/// Storage handle shared by every entity operation.
///
/// The caller owns the lifecycle: open it once, pass `&mut Connection` to the
/// finders and entity methods, and drop or [`close`](Connection::close) it
/// when done. All values reach SQLite as bound parameters.
pub struct Connection {
    conn: SqliteConnection,
}

impl Connection {
    /// Open a connection to the database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = SqliteConnection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened database");
        let mut conn = Self { conn };
        conn.set_foreign_keys(true)?;
        Ok(conn)
    }

    /// Open a connection described by a [`StoreConfig`].
    pub fn open_with(config: &StoreConfig) -> Result<Self> {
        let mut conn = Self::open(config.path.as_path())?;
        conn.set_foreign_keys(config.foreign_keys)?;
        Ok(conn)
    }

    /// Open an in-memory database for testing.
    pub fn open_in_memory() -> Result<Self> {
        let conn = SqliteConnection::open_in_memory()?;
        let mut conn = Self { conn };
        conn.set_foreign_keys(true)?;
        Ok(conn)
    }

    /// Close the connection, reporting any error SQLite raises on close.
    pub fn close(self) -> Result<()> {
        self.conn.close().map_err(|(_, e)| Error::from(e))
    }

    /// Turn `PRAGMA foreign_keys` on or off.
    pub fn set_foreign_keys(&mut self, enabled: bool) -> Result<()> {
        let sql = if enabled {
            "PRAGMA foreign_keys = ON"
        } else {
            "PRAGMA foreign_keys = OFF"
        };
        self.conn.execute_batch(sql)?;
        Ok(())
    }

    /// Execute a statement and return the number of rows affected.
    pub fn execute(&mut self, sql: &str, params: &[&dyn ToSql]) -> Result<usize> {
        debug!(sql, params = params.len(), "execute");
        self.conn.execute(sql, params).map_err(Error::from)
    }

    /// Execute several semicolon-separated statements without parameters.
    pub fn execute_batch(&mut self, sql: &str) -> Result<()> {
        debug!(bytes = sql.len(), "execute batch");
        self.conn.execute_batch(sql).map_err(Error::from)
    }

    /// Query a single row. Fails with `QueryReturnedNoRows` on a miss.
    pub fn query_row<T, F>(&mut self, sql: &str, params: &[&dyn ToSql], f: F) -> Result<T>
    where
        F: FnOnce(&Row) -> rusqlite::Result<T>,
    {
        debug!(sql, params = params.len(), "query row");
        self.conn.query_row(sql, params, f).map_err(Error::from)
    }

    /// Query at most one row, mapping a miss to `None`.
    pub fn query_optional<T, F>(
        &mut self,
        sql: &str,
        params: &[&dyn ToSql],
        f: F,
    ) -> Result<Option<T>>
    where
        F: FnOnce(&Row) -> rusqlite::Result<T>,
    {
        debug!(sql, params = params.len(), "query optional");
        self.conn
            .query_row(sql, params, f)
            .optional()
            .map_err(Error::from)
    }

    /// Query multiple rows.
    pub fn query<T, F>(&mut self, sql: &str, params: &[&dyn ToSql], f: F) -> Result<Vec<T>>
    where
        F: FnMut(&Row) -> rusqlite::Result<T>,
    {
        debug!(sql, params = params.len(), "query");
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params, f)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Check if a table exists.
    pub fn table_exists(&mut self, table_name: &str) -> Result<bool> {
        let found = self.query_optional(
            "SELECT name FROM sqlite_master WHERE type='table' AND name=?",
            params![table_name],
            |_| Ok(()),
        )?;
        Ok(found.is_some())
    }

    /// Get the last inserted row id.
    pub fn last_insert_rowid(&self) -> i64 {
        self.conn.last_insert_rowid()
    }
}
