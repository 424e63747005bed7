//! SQL schema for the Gumshoe SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id  TEXT PRIMARY KEY,
    nickname TEXT NOT NULL UNIQUE,
    role     TEXT NOT NULL,              -- 'client' | 'culprit' | 'police' | 'detective'
    score    INTEGER NOT NULL DEFAULT 0  -- cached sum of score_log deltas
);

CREATE TABLE IF NOT EXISTS cases (
    case_id      TEXT PRIMARY KEY,
    title        TEXT NOT NULL,
    body         TEXT NOT NULL,
    difficulty   INTEGER NOT NULL,
    true_culprit TEXT REFERENCES users(user_id),  -- set once, on first fabrication
    status       TEXT NOT NULL DEFAULT 'registered'
);

-- Exactly one participation per case; the UNIQUE constraint is the declared
-- 1:1 invariant, not an accident of query usage.
CREATE TABLE IF NOT EXISTS participations (
    participation_id TEXT PRIMARY KEY,
    case_id          TEXT NOT NULL REFERENCES cases(case_id),
    client           TEXT REFERENCES users(user_id),
    culprit          TEXT REFERENCES users(user_id),
    police           TEXT REFERENCES users(user_id),
    detective        TEXT REFERENCES users(user_id),
    detective_guess  TEXT REFERENCES users(user_id),
    solved           INTEGER,                     -- NULL until the detective guesses
    UNIQUE (case_id)
);

-- Immutable reference data seeded before gameplay.
CREATE TABLE IF NOT EXISTS original_evidence (
    evidence_id       TEXT PRIMARY KEY,
    case_id           TEXT NOT NULL REFERENCES cases(case_id),
    description       TEXT NOT NULL,
    is_true           INTEGER NOT NULL,
    is_fake_candidate INTEGER NOT NULL
);

-- Replaced wholesale on each fabrication (delete-then-insert).
CREATE TABLE IF NOT EXISTS submitted_evidence (
    submitted_id TEXT PRIMARY KEY,
    case_id      TEXT NOT NULL REFERENCES cases(case_id),
    description  TEXT NOT NULL,
    is_true      INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS suspects (
    suspect_id TEXT PRIMARY KEY,
    case_id    TEXT NOT NULL REFERENCES cases(case_id),
    name       TEXT NOT NULL
);

-- The ledger is strictly append-only.
-- No UPDATE or DELETE is ever issued against this table.
CREATE TABLE IF NOT EXISTS score_log (
    entry_id  TEXT PRIMARY KEY,
    user_id   TEXT NOT NULL REFERENCES users(user_id),
    case_id   TEXT NOT NULL REFERENCES cases(case_id),
    delta     INTEGER NOT NULL,
    reason    TEXT NOT NULL,
    logged_at TEXT NOT NULL                       -- ISO 8601 UTC; server-assigned
);

CREATE INDEX IF NOT EXISTS cases_status_idx          ON cases(status);
CREATE INDEX IF NOT EXISTS participations_case_idx   ON participations(case_id);
CREATE INDEX IF NOT EXISTS original_evidence_case_idx ON original_evidence(case_id);
CREATE INDEX IF NOT EXISTS submitted_evidence_case_idx ON submitted_evidence(case_id);
CREATE INDEX IF NOT EXISTS suspects_case_idx         ON suspects(case_id);
CREATE INDEX IF NOT EXISTS score_log_user_idx        ON score_log(user_id);

PRAGMA user_version = 1;
";
