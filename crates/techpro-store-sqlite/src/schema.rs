//! SQL schema for the TechPro SQLite stores.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Site key/value storage. Values are JSON text written by the record store.
CREATE TABLE IF NOT EXISTS kv (
    key   TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

-- Contacts received by the intake service.
-- Strictly append-only: no UPDATE or DELETE is ever issued.
CREATE TABLE IF NOT EXISTS inbox (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    created    TEXT NOT NULL,   -- ISO 8601 UTC; server-assigned
    name       TEXT NOT NULL,
    details    TEXT NOT NULL,
    message    TEXT NOT NULL,
    user_agent TEXT NOT NULL DEFAULT '',
    source     TEXT NOT NULL
);

PRAGMA user_version = 1;
";
