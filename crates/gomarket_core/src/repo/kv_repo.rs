//! Durable key-value store contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide `get`/`set` over string keys for device-local persistence.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - `get` returns `None` for keys never written.
//! - `set` is an upsert; last write wins.
//! - Blank keys are rejected before touching storage.

use crate::db::DbError;
use log::{debug, error};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type RepoResult<T> = Result<T, RepoError>;

/// Error for key-value persistence operations.
#[derive(Debug)]
pub enum RepoError {
    Db(DbError),
    InvalidKey(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::InvalidKey(key) => write!(f, "invalid storage key `{key}`"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::InvalidKey(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Durable key-value store addressed by string keys.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> RepoResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> RepoResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        (**self).set(key, value)
    }
}

/// SQLite-backed key-value store over the `kv_entries` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> RepoResult<Option<String>> {
        ensure_key(key)?;

        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;

        debug!(
            "event=kv_get module=repo status=ok found={} bytes={}",
            value.is_some(),
            value.as_ref().map_or(0, String::len)
        );
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> RepoResult<()> {
        ensure_key(key)?;

        self.conn
            .execute(
                "INSERT INTO kv_entries (key, value)
                 VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = (strftime('%s', 'now') * 1000);",
                params![key, value],
            )
            .map_err(|err| {
                error!("event=kv_set module=repo status=error error={err}");
                err
            })?;

        debug!("event=kv_set module=repo status=ok bytes={}", value.len());
        Ok(())
    }
}

fn ensure_key(key: &str) -> RepoResult<()> {
    if key.trim().is_empty() {
        return Err(RepoError::InvalidKey(key.to_string()));
    }
    Ok(())
}
