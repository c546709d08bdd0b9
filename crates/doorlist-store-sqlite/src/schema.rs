//! SQL schema for the doorlist SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- Written only by roster upload.
CREATE TABLE IF NOT EXISTS hosts (
    name    TEXT PRIMARY KEY,
    cohort  TEXT
);

-- Only check_in_status and check_in_time are ever updated.
CREATE TABLE IF NOT EXISTS guests (
    guest_id        INTEGER PRIMARY KEY AUTOINCREMENT,
    name            TEXT NOT NULL UNIQUE,   -- uppercase; lookup key
    host_name       TEXT NOT NULL REFERENCES hosts(name),
    campus_status   TEXT NOT NULL,          -- 'on_campus' | 'off_campus'
    gender          TEXT NOT NULL,          -- 'M' | 'F'
    check_in_status TEXT NOT NULL DEFAULT 'not_checked_in',
    check_in_time   TEXT,                   -- RFC 3339 UTC or NULL
    is_late_add     INTEGER NOT NULL DEFAULT 0,
    cohort          TEXT                    -- copied from hosts at insert
);

CREATE INDEX IF NOT EXISTS guests_host_idx ON guests(host_name);

PRAGMA user_version = 1;
";
