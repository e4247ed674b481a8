//! SQL schema for the Stitchbook SQLite store.
//!
//! Executed once at connection startup. The `UNIQUE` constraints here are the
//! real guarantee behind the workflow's duplicate checks, which only read
//! before writing.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users (
    user_id        TEXT PRIMARY KEY,
    name           TEXT NOT NULL UNIQUE,
    phone_number   TEXT NOT NULL UNIQUE,
    password_hash  TEXT NOT NULL,
    avatar         TEXT NOT NULL,
    role           TEXT NOT NULL,   -- 'ADMIN' | 'HELPER' | 'CUTTING_MASTER' | 'TAILOR' | 'CUSTOMER'
    refresh_token  TEXT,
    created_at     TEXT NOT NULL
);

-- Helpers, cutting masters and tailors share one table.
CREATE TABLE IF NOT EXISTS staff_profiles (
    profile_id     TEXT PRIMARY KEY,
    user_document  TEXT NOT NULL UNIQUE REFERENCES users(user_id),
    kind           TEXT NOT NULL,   -- 'HELPER' | 'CUTTING_MASTER' | 'TAILOR'
    name           TEXT NOT NULL,
    phone_number   TEXT NOT NULL,
    avatar         TEXT NOT NULL,
    monthly        REAL NOT NULL DEFAULT 0,
    advance        REAL NOT NULL DEFAULT 0,
    earned         REAL NOT NULL DEFAULT 0,
    price_map      TEXT NOT NULL DEFAULT '{}',   -- JSON object, item name -> amount
    created_at     TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS customers (
    customer_id  TEXT PRIMARY KEY,
    user_id      TEXT NOT NULL UNIQUE REFERENCES users(user_id),
    name         TEXT NOT NULL,
    created_at   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS clothing_items (
    name                   TEXT PRIMARY KEY,
    stitching              INTEGER NOT NULL,
    default_stitching_amt  REAL NOT NULL,
    default_cutting_amt    REAL NOT NULL,
    created_at             TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS measurements (
    measurement_id         TEXT PRIMARY KEY,
    customer_id            TEXT NOT NULL REFERENCES customers(customer_id),
    measurements           TEXT NOT NULL,   -- JSON object
    customer_requirements  TEXT,
    drawing                TEXT,
    created_at             TEXT NOT NULL
);

-- Ordered per-customer lists. Appending is a single INSERT.
CREATE TABLE IF NOT EXISTS customer_measurements (
    seq             INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id     TEXT NOT NULL REFERENCES customers(customer_id),
    measurement_id  TEXT NOT NULL UNIQUE REFERENCES measurements(measurement_id)
);

CREATE TABLE IF NOT EXISTS measurement_history (
    history_id      TEXT PRIMARY KEY,
    measurement_id  TEXT NOT NULL UNIQUE REFERENCES measurements(measurement_id),
    customer_id     TEXT NOT NULL REFERENCES customers(customer_id),
    recorded_at     TEXT NOT NULL
);

CREATE TRIGGER IF NOT EXISTS measurement_history_no_update
BEFORE UPDATE ON measurement_history
BEGIN
    SELECT RAISE(ABORT, 'measurement history is append-only');
END;

CREATE TABLE IF NOT EXISTS sold_bills (
    bill_id       TEXT PRIMARY KEY,
    name          TEXT NOT NULL,
    user_id       TEXT NOT NULL REFERENCES users(user_id),
    customer_id   TEXT NOT NULL REFERENCES customers(customer_id),
    bill_number   TEXT NOT NULL UNIQUE,
    phone_number  TEXT NOT NULL,
    cloth_amt     REAL NOT NULL,
    total_amt     REAL NOT NULL,
    created_at    TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS stitch_bills (
    bill_id        TEXT PRIMARY KEY,
    name           TEXT NOT NULL,
    user_id        TEXT NOT NULL REFERENCES users(user_id),
    customer_id    TEXT NOT NULL REFERENCES customers(customer_id),
    bill_number    TEXT NOT NULL UNIQUE,
    phone_number   TEXT NOT NULL,
    delivery_date  TEXT NOT NULL,   -- YYYY-MM-DD
    cloth_amt      REAL NOT NULL,
    clothes        TEXT NOT NULL,   -- JSON array of cloth lines
    sub_total      REAL NOT NULL,
    advance_amt    REAL NOT NULL,
    total_amt      REAL NOT NULL,
    created_at     TEXT NOT NULL,
    CHECK (abs(total_amt - (sub_total - advance_amt)) < 0.005)
);

CREATE TABLE IF NOT EXISTS customer_stitched_bills (
    seq          INTEGER PRIMARY KEY AUTOINCREMENT,
    customer_id  TEXT NOT NULL REFERENCES customers(customer_id),
    bill_id      TEXT NOT NULL UNIQUE REFERENCES stitch_bills(bill_id)
);

CREATE INDEX IF NOT EXISTS staff_kind_idx              ON staff_profiles(kind);
CREATE INDEX IF NOT EXISTS customer_measurements_idx   ON customer_measurements(customer_id);
CREATE INDEX IF NOT EXISTS measurement_history_idx     ON measurement_history(customer_id);
CREATE INDEX IF NOT EXISTS customer_stitched_bills_idx ON customer_stitched_bills(customer_id);

PRAGMA user_version = 1;
";
