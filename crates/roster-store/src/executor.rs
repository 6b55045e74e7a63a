//! Async SQLite executor using a dedicated background thread.
//!
//! All SQL runs on one thread owned by `tokio-rusqlite`; callers await the
//! result without blocking the runtime. Queries execute in FIFO order, so
//! a write issued before a read is always visible to that read.
//!
//! Only SQL belongs inside [`AsyncStore::call`]. Channel sends, logging of
//! outcomes and anything else happen after the call returns.

use std::path::Path;

use tokio_rusqlite::Connection;
use tracing::info;

use crate::{sqlite, StoreError, StoreResult};

/// Convert a tokio_rusqlite::Error to StoreError.
fn from_tokio_rusqlite(e: tokio_rusqlite::Error) -> StoreError {
    match e {
        tokio_rusqlite::Error::Rusqlite(e) => StoreError::Sqlite(e),
        tokio_rusqlite::Error::ConnectionClosed => {
            StoreError::Connection("connection closed".to_string())
        }
        other => StoreError::Connection(other.to_string()),
    }
}

/// Async SQLite database with a dedicated executor thread.
#[derive(Clone)]
pub struct AsyncStore {
    conn: Connection,
}

impl AsyncStore {
    /// Opens (creating if needed) a database file and applies the schema.
    pub async fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| StoreError::Connection(e.to_string()))?;
            }
        }

        info!(path = %path.display(), "opening document store");

        let conn = Connection::open(path)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { conn };
        store
            .call_sqlite(|conn| {
                conn.execute_batch(
                    "
                    PRAGMA journal_mode = WAL;
                    PRAGMA synchronous = NORMAL;
                    PRAGMA busy_timeout = 5000;
                    ",
                )?;
                sqlite::init_schema(conn)
            })
            .await?;

        Ok(store)
    }

    /// Opens a private in-memory database. Useful for tests.
    pub async fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let store = Self { conn };
        store.call_sqlite(|conn| sqlite::init_schema(conn)).await?;
        Ok(store)
    }

    /// Executes a closure on the connection's thread.
    pub async fn call<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> StoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        // The closure's own result rides inside tokio_rusqlite's Ok so that
        // StoreError variants survive the trip back.
        let outer = self.conn.call(move |conn| Ok(f(conn))).await;

        match outer {
            Ok(inner) => inner,
            Err(e) => Err(from_tokio_rusqlite(e)),
        }
    }

    /// Executes a closure that only produces rusqlite errors.
    pub async fn call_sqlite<F, T>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&rusqlite::Connection) -> rusqlite::Result<T> + Send + 'static,
        T: Send + 'static,
    {
        self.conn
            .call(move |conn| Ok(f(conn)?))
            .await
            .map_err(from_tokio_rusqlite)
    }
}
