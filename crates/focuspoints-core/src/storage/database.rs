//! SQLite-backed key-value store.
//!
//! Every persisted scalar (points, streak, session counters, settings,
//! reward codes, trial state) lives in a single `kv` table so state
//! survives process restarts. Several processes may open the same file;
//! [`Store::atomic`] serializes their commands with `BEGIN IMMEDIATE`.

use std::path::Path;
use std::time::Duration;

use rusqlite::{params, Connection, Transaction, TransactionBehavior};

use super::{data_dir, Store};
use crate::error::{CoreError, StoreError};

/// How long a writer waits for another process's transaction to finish.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// SQLite database for application state.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/focuspoints.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created or the
    /// database cannot be opened or migrated.
    pub fn open() -> Result<Self, CoreError> {
        let path = data_dir()?.join("focuspoints.db");
        Ok(Self::open_at(path)?)
    }

    /// Open (or create) the database at an explicit path.
    pub fn open_at(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a value from the kv store.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a value in the kv store.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    pub fn kv_remove(&self, key: &str) -> Result<(), rusqlite::Error> {
        self.conn
            .execute("DELETE FROM kv WHERE key = ?1", params![key])?;
        Ok(())
    }

    pub fn kv_clear(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute("DELETE FROM kv", [])?;
        Ok(())
    }
}

impl Store for Database {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.kv_get(key)?)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(self.kv_set(key, value)?)
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        Ok(self.kv_remove(key)?)
    }

    fn clear(&self) -> Result<(), StoreError> {
        Ok(self.kv_clear()?)
    }

    fn atomic<T, E, F>(&self, f: F) -> Result<T, E>
    where
        Self: Sized,
        E: From<StoreError>,
        F: FnOnce() -> Result<T, E>,
    {
        // Nested call: the outer transaction already holds the lock.
        if !self.conn.is_autocommit() {
            return f();
        }
        let tx = Transaction::new_unchecked(&self.conn, TransactionBehavior::Immediate)
            .map_err(StoreError::from)?;
        // Dropping `tx` without commit rolls back.
        let value = f()?;
        tx.commit().map_err(StoreError::from)?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kv_store() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("test").unwrap().is_none());
        db.kv_set("test", "hello").unwrap();
        assert_eq!(db.kv_get("test").unwrap().unwrap(), "hello");
    }

    #[test]
    fn set_overwrites_existing_key() {
        let db = Database::open_memory().unwrap();
        db.set_i64("fp_points", 5).unwrap();
        db.set_i64("fp_points", 7).unwrap();
        assert_eq!(db.get_i64("fp_points", 0).unwrap(), 7);
    }

    #[test]
    fn remove_and_clear() {
        let db = Database::open_memory().unwrap();
        db.set("a", "1").unwrap();
        db.set("b", "2").unwrap();
        db.remove("a").unwrap();
        assert!(db.get("a").unwrap().is_none());
        db.clear().unwrap();
        assert!(db.get("b").unwrap().is_none());
    }

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("focuspoints.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.set_bool("fp_subscribed", true).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert!(db.get_bool("fp_subscribed", false).unwrap());
    }

    #[test]
    fn atomic_commits_on_success() {
        let db = Database::open_memory().unwrap();
        let out: Result<i64, StoreError> = db.atomic(|| {
            db.set_i64("fp_points", 3)?;
            db.get_i64("fp_points", 0)
        });
        assert_eq!(out.unwrap(), 3);
        assert_eq!(db.get_i64("fp_points", 0).unwrap(), 3);
        assert!(db.conn.is_autocommit());
    }

    #[test]
    fn atomic_rolls_back_on_error() {
        let db = Database::open_memory().unwrap();
        db.set_i64("fp_points", 1).unwrap();
        let out: Result<(), StoreError> = db.atomic(|| {
            db.set_i64("fp_points", 99)?;
            Err(StoreError::Locked)
        });
        assert!(out.is_err());
        assert_eq!(db.get_i64("fp_points", 0).unwrap(), 1);
    }

    #[test]
    fn nested_atomic_joins_outer_transaction() {
        let db = Database::open_memory().unwrap();
        let out: Result<(), StoreError> = db.atomic(|| {
            db.atomic(|| db.set("a", "1"))?;
            db.set("b", "2")
        });
        out.unwrap();
        assert_eq!(db.get("a").unwrap().as_deref(), Some("1"));
        assert_eq!(db.get("b").unwrap().as_deref(), Some("2"));
    }
}
