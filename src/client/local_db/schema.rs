//! Database Schema Definitions
//!
//! Versioned migrations for the on-device SQLite file. Each migration runs
//! once; applied versions are recorded in `schema_migrations`.

/// One forward-only schema change
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    pub version: i32,
    pub description: &'static str,
    pub sql: &'static str,
}

/// Bookkeeping table, created before any migration runs
pub const CREATE_MIGRATIONS: &str = "CREATE TABLE IF NOT EXISTS schema_migrations (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
)";

/// Every migration, oldest first
pub const MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    description: "key/value blobs for trip state and the offline queue",
    sql: "CREATE TABLE IF NOT EXISTS kv_store (
        key TEXT PRIMARY KEY NOT NULL,
        value TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )",
}];

/// Version a fully migrated database reports
pub fn latest_version() -> i32 {
    MIGRATIONS.last().map_or(0, |m| m.version)
}

/// Migrations newer than `current_version`, in the order they must run
pub fn pending(current_version: i32) -> impl Iterator<Item = &'static Migration> {
    MIGRATIONS
        .iter()
        .filter(move |m| m.version > current_version)
}
