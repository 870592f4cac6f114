//! # Local Storage Module
//!
//! Durable on-device storage for the Trip Store. Two blobs are kept under
//! fixed keys: the full set of trip collections (local-only mode) and the
//! offline mutation queue.
//!
//! ## Key Components
//!
//! - `LocalStorage`: async string key/value interface
//! - `SqliteStorage`: SQLite-backed implementation (WAL mode)
//! - `MemoryStorage`: in-process implementation for tests and ephemeral sessions
//! - `strip_oversized_documents`: drops large inline file payloads before persistence
//!
//! ## Usage
//!
//! ```rust,no_run
//! use tripmate::client::local_db::{LocalStorage, SqliteStorage, QUEUE_KEY};
//!
//! # async fn demo() -> Result<(), tripmate::client::local_db::StorageError> {
//! let storage = SqliteStorage::open_default().await?;
//! let queue = storage.get(QUEUE_KEY).await?;
//! # Ok(())
//! # }
//! ```

pub mod schema;

use crate::shared::itinerary::Document;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;

/// Key of the serialized trip collections
pub const STATE_KEY: &str = "tripmate.state.v1";

/// Key of the serialized offline mutation queue
pub const QUEUE_KEY: &str = "tripmate.offline-queue.v1";

/// Inline document payloads above this size are not persisted
pub const MAX_INLINE_DOCUMENT_BYTES: usize = 512 * 1024;

/// Errors raised by local storage
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for local storage operations
pub type Result<T> = std::result::Result<T, StorageError>;

/// String key/value store that survives process restarts
#[async_trait]
pub trait LocalStorage: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>>;

    async fn set(&self, key: &str, value: &str) -> Result<()>;

    async fn remove(&self, key: &str) -> Result<()>;
}

/// Read and deserialize the blob stored under `key`
pub async fn read_json<T: DeserializeOwned>(
    storage: &dyn LocalStorage,
    key: &str,
) -> Result<Option<T>> {
    match storage.get(key).await? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Serialize `value` and store it under `key`
pub async fn write_json<T: Serialize + ?Sized>(
    storage: &dyn LocalStorage,
    key: &str,
    value: &T,
) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    storage.set(key, &raw).await
}

/// Replace oversized inline `fileUrl`s with an empty placeholder.
///
/// Metadata (title, type, file name) is kept. Returns how many documents
/// were stripped.
pub fn strip_oversized_documents(documents: &mut [Document]) -> usize {
    let mut stripped = 0;
    for document in documents.iter_mut() {
        if document.is_inline() && document.file_url.len() > MAX_INLINE_DOCUMENT_BYTES {
            tracing::warn!(
                document_id = %document.id,
                bytes = document.file_url.len(),
                "Inline document too large to persist, keeping metadata only"
            );
            document.file_url.clear();
            stripped += 1;
        }
    }
    stripped
}

/// SQLite-backed storage
///
/// Manages the SQLite connection pool holding the `kv_store` table.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    pool: SqlitePool,
}

impl SqliteStorage {
    /// Open or create the database at the platform data directory
    pub async fn open_default() -> Result<Self> {
        Self::open(&Self::default_path()).await
    }

    /// Open or create the database file at `path`
    ///
    /// Uses WAL mode for better concurrency and durability.
    pub async fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;

        let storage = Self { pool };
        storage.init_schema().await?;
        tracing::debug!(path = %path.display(), "Opened local database");
        Ok(storage)
    }

    /// Private in-memory database, dropped with the pool
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::new().in_memory(true);
        // Every connection to :memory: is a separate database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        let storage = Self { pool };
        storage.init_schema().await?;
        Ok(storage)
    }

    /// Get database file path
    ///
    /// Returns the platform-specific path for the local database file.
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(std::env::temp_dir);
        path.push("tripmate");
        path.push("local.db");
        path
    }

    async fn init_schema(&self) -> Result<()> {
        sqlx::query(schema::CREATE_MIGRATIONS)
            .execute(&self.pool)
            .await?;

        let current_version: i32 =
            sqlx::query_scalar("SELECT COALESCE(MAX(version), 0) FROM schema_migrations")
                .fetch_one(&self.pool)
                .await?;

        for migration in schema::pending(current_version) {
            tracing::info!(
                version = migration.version,
                "Applying local schema migration: {}",
                migration.description
            );
            let mut tx = self.pool.begin().await?;
            sqlx::query(migration.sql).execute(&mut *tx).await?;
            sqlx::query("INSERT INTO schema_migrations (version, applied_at) VALUES (?, ?)")
                .bind(migration.version)
                .bind(chrono::Utc::now().to_rfc3339())
                .execute(&mut *tx)
                .await?;
            tx.commit().await?;
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl LocalStorage for SqliteStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let value = sqlx::query_scalar::<_, String>("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO kv_store (key, value, updated_at) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        )
        .bind(key)
        .bind(value)
        .bind(chrono::Utc::now().to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

/// In-process storage
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl LocalStorage for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries().insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.entries().remove(key);
        Ok(())
    }
}
