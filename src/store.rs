use chrono::Utc;
use rusqlite::{Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    SqliteError(#[from] rusqlite::Error),
    #[error("Failed to create store directory: {0}")]
    DirectoryError(String),
}

/// Key to serialized-value persistence.
///
/// `set` replaces the whole value of a key. There are no partial writes and no
/// transactions spanning more than one key.
pub trait Store {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&self, key: &str) -> Result<(), StoreError>;
    fn keys(&self) -> Result<Vec<String>, StoreError>;
}

/// Process-local store, mostly for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw values, as if another producer had written them.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            entries: RefCell::new(entries),
            writes: Cell::new(0),
        }
    }

    /// Number of `set` calls served so far.
    pub fn writes(&self) -> usize {
        self.writes.get()
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

/// Durable store backed by a single SQLite table.
///
/// Every key lives inside a namespace, so a dev and a prod profile (or two
/// boards) can share one database file without seeing each other's data.
pub struct SqliteStore {
    conn: Connection,
    namespace: String,
}

impl SqliteStore {
    /// Open the database at `path`, creating it and its parent directory if needed
    pub fn open(path: &Path, namespace: &str) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::DirectoryError(e.to_string()))?;
            }
        }

        let conn = Connection::open(path)?;
        Self::with_connection(conn, namespace)
    }

    pub fn open_in_memory(namespace: &str) -> Result<Self, StoreError> {
        Self::with_connection(Connection::open_in_memory()?, namespace)
    }

    fn with_connection(conn: Connection, namespace: &str) -> Result<Self, StoreError> {
        let store = SqliteStore {
            conn,
            namespace: namespace.to_string(),
        };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&self) -> Result<(), StoreError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv (
                namespace       TEXT NOT NULL,
                key             TEXT NOT NULL,
                value           TEXT NOT NULL,
                updated_at      TEXT NOT NULL,
                PRIMARY KEY (namespace, key)
            )",
            [],
        )?;
        Ok(())
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }
}

impl Store for SqliteStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE namespace = ?1 AND key = ?2",
                rusqlite::params![self.namespace, key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (namespace, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(namespace, key)
             DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
            rusqlite::params![
                self.namespace,
                key,
                value,
                Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
            ],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "DELETE FROM kv WHERE namespace = ?1 AND key = ?2",
            rusqlite::params![self.namespace, key],
        )?;
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv WHERE namespace = ?1 ORDER BY key ASC")?;
        let keys = stmt
            .query_map(rusqlite::params![self.namespace], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(keys)
    }
}
