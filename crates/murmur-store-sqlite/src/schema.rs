//! SQL schema for the Murmur SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id    TEXT PRIMARY KEY,
    username   TEXT NOT NULL UNIQUE,
    email      TEXT NOT NULL UNIQUE,
    created_at TEXT NOT NULL,    -- ISO 8601 UTC; server-assigned
    thoughts   TEXT NOT NULL DEFAULT '[]',   -- JSON array of thought ids
    friends    TEXT NOT NULL DEFAULT '[]'    -- JSON array of user ids
);

CREATE TABLE IF NOT EXISTS thoughts (
    thought_id   TEXT PRIMARY KEY,
    thought_text TEXT NOT NULL,
    username     TEXT NOT NULL,   -- denormalized author name, wire contract
    user_id      TEXT REFERENCES users(user_id),  -- owner; NULL for orphans
    created_at   TEXT NOT NULL,
    reactions    TEXT NOT NULL DEFAULT '[]'  -- JSON array of embedded reactions
);

CREATE INDEX IF NOT EXISTS thoughts_owner_idx ON thoughts(user_id);

PRAGMA user_version = 1;
";
