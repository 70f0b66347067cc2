//! SQL schema for the Reel SQLite store.
//!
//! Executed once at connection startup. Idempotent thanks to
//! `CREATE TABLE IF NOT EXISTS`.

pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS movies (
    id             TEXT PRIMARY KEY,
    title          TEXT NOT NULL UNIQUE,
    description    TEXT NOT NULL DEFAULT '',
    year           INTEGER NOT NULL,
    director       TEXT NOT NULL,
    producers_json TEXT NOT NULL DEFAULT '[]'  -- JSON array of strings
);

PRAGMA user_version = 1;
";
