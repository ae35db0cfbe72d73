//! SQL schema for the Spark SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

CREATE TABLE IF NOT EXISTS users (
    user_id          INTEGER PRIMARY KEY,
    email            TEXT NOT NULL UNIQUE,
    phone            TEXT NOT NULL UNIQUE,
    password_hash    TEXT NOT NULL,
    name             TEXT NOT NULL,
    gender           TEXT NOT NULL,            -- 'male' | 'female'
    is_inactive      INTEGER NOT NULL DEFAULT 0,
    premium_expiry   TEXT,                     -- RFC 3339 UTC or NULL
    unlimited_swipes INTEGER NOT NULL DEFAULT 0,
    is_verified      INTEGER NOT NULL DEFAULT 0,
    created_at       TEXT NOT NULL,
    updated_at       TEXT NOT NULL
);

-- Swipes are strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS swipes (
    swipe_id    INTEGER PRIMARY KEY AUTOINCREMENT,
    actor_id    INTEGER NOT NULL,
    target_id   INTEGER NOT NULL,
    action      TEXT NOT NULL,                 -- 'like' | 'pass'
    created_at  TEXT NOT NULL                  -- RFC 3339 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS swipes_actor_idx ON swipes(actor_id, created_at);

PRAGMA user_version = 1;
";
