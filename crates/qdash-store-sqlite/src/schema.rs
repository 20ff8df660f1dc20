//! SQL schema for the SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;

-- Both tables are strictly append-only.
-- No UPDATE or DELETE is ever issued against them; rowid is insertion order.
CREATE TABLE IF NOT EXISTS kpi_records (
    date      TEXT NOT NULL,   -- YYYY-MM-DD
    category  TEXT NOT NULL,   -- form label, e.g. 'Safety/5S'
    kpi       TEXT NOT NULL,
    target    TEXT NOT NULL,
    actual    TEXT NOT NULL,
    status    TEXT NOT NULL,   -- 'Met' | 'Missed' | 'Check Data'
    notes     TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS ctq_records (
    date               TEXT    NOT NULL,
    defect_rate        REAL    NOT NULL,
    first_pass_yield   REAL    NOT NULL,
    downtime_events    INTEGER NOT NULL,
    scrap_units        INTEGER NOT NULL,
    calibration_misses INTEGER NOT NULL,
    health_score       INTEGER NOT NULL CHECK (health_score BETWEEN 0 AND 5),
    recommendation     TEXT    NOT NULL
);

PRAGMA user_version = 1;
";
