//! Storage backend adapter: one connection enum over the embedded (SQLite)
//! and networked (PostgreSQL) engines, plus every piece of dialect-specific
//! SQL in the crate. Core query logic goes through `AnyConnection` and never
//! builds dialect strings itself.

use diesel::connection::SimpleConnection;
use diesel::prelude::*;

use crate::config::BackendConfig;
use crate::db::models::{LatestDeviceState, LatestParam, NewDeviceStateEvent, NewParamEvent};
use crate::error::StoreError;
use crate::schema;

#[derive(diesel::MultiConnection)]
pub enum AnyConnection {
    Sqlite(SqliteConnection),
    Postgres(PgConnection),
}

/// Rows per INSERT statement during bulk loads; keeps the bind count well
/// under SQLite's host-parameter limit.
const INSERT_CHUNK: usize = 500;

const SQLITE_DDL: &str = "\
CREATE TABLE IF NOT EXISTS device_states (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    group_name TEXT NOT NULL,
    device_name TEXT NOT NULL,
    status SMALLINT NOT NULL,
    ts TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_device_states_key_ts ON device_states (group_name, device_name, ts);
CREATE INDEX IF NOT EXISTS idx_device_states_ts ON device_states (ts);
CREATE TABLE IF NOT EXISTS important_params (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    param_name TEXT NOT NULL,
    value DOUBLE NOT NULL,
    ts TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_important_params_key_ts ON important_params (param_name, ts);
CREATE INDEX IF NOT EXISTS idx_important_params_ts ON important_params (ts);";

const POSTGRES_DDL: &str = "\
CREATE TABLE IF NOT EXISTS device_states (
    id BIGSERIAL PRIMARY KEY,
    group_name TEXT NOT NULL,
    device_name TEXT NOT NULL,
    status SMALLINT NOT NULL,
    ts TIMESTAMP NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_device_states_key_ts ON device_states (group_name, device_name, ts);
CREATE INDEX IF NOT EXISTS idx_device_states_ts ON device_states (ts);
CREATE TABLE IF NOT EXISTS important_params (
    id BIGSERIAL PRIMARY KEY,
    param_name TEXT NOT NULL,
    value DOUBLE PRECISION NOT NULL,
    ts TIMESTAMP NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_important_params_key_ts ON important_params (param_name, ts);
CREATE INDEX IF NOT EXISTS idx_important_params_ts ON important_params (ts);";

// Latest per key. SQLite joins against a MAX(ts) aggregate; Postgres ranks
// with a window function. Timestamp ties within one second are resolved
// arbitrarily by the engine in both dialects.
const SQLITE_LATEST_STATES: &str = "\
SELECT ds.group_name, ds.device_name, ds.status, ds.ts
FROM device_states ds
JOIN (
    SELECT group_name, device_name, MAX(ts) AS max_ts
    FROM device_states
    GROUP BY group_name, device_name
) latest ON latest.group_name = ds.group_name
        AND latest.device_name = ds.device_name
        AND ds.ts = latest.max_ts
ORDER BY ds.group_name, ds.device_name";

const POSTGRES_LATEST_STATES: &str = "\
SELECT group_name, device_name, status, ts
FROM (
    SELECT group_name, device_name, status, ts,
           ROW_NUMBER() OVER (PARTITION BY group_name, device_name ORDER BY ts DESC) AS rn
    FROM device_states
) ranked
WHERE rn = 1
ORDER BY group_name, device_name";

const SQLITE_LATEST_PARAMS: &str = "\
SELECT p.param_name, p.value, p.ts
FROM important_params p
JOIN (
    SELECT param_name, MAX(ts) AS max_ts
    FROM important_params
    GROUP BY param_name
) latest ON latest.param_name = p.param_name
        AND p.ts = latest.max_ts
ORDER BY p.param_name";

const POSTGRES_LATEST_PARAMS: &str = "\
SELECT param_name, value, ts
FROM (
    SELECT param_name, value, ts,
           ROW_NUMBER() OVER (PARTITION BY param_name ORDER BY ts DESC) AS rn
    FROM important_params
) ranked
WHERE rn = 1
ORDER BY param_name";

/// Open a connection to the configured backend.
pub fn establish(cfg: &BackendConfig) -> Result<AnyConnection, StoreError> {
    match cfg {
        BackendConfig::Sqlite { sqlite_path } => SqliteConnection::establish(sqlite_path)
            .map(AnyConnection::Sqlite)
            .map_err(|e| StoreError::Connection(format!("sqlite open failed ({}): {}", sqlite_path, e))),
        BackendConfig::Postgres { url } => PgConnection::establish(url)
            .map(AnyConnection::Postgres)
            .map_err(|e| StoreError::Connection(format!("postgres connect failed: {}", e))),
    }
}

/// Ensure both event tables and their indexes exist. Idempotent; a second
/// call is a no-op.
pub fn init_schema(conn: &mut AnyConnection) -> Result<(), StoreError> {
    match conn {
        AnyConnection::Sqlite(c) => c.batch_execute(SQLITE_DDL),
        AnyConnection::Postgres(c) => c.batch_execute(POSTGRES_DDL),
    }
    .map_err(StoreError::from)
}

pub fn latest_device_state_rows(conn: &mut AnyConnection) -> Result<Vec<LatestDeviceState>, StoreError> {
    match conn {
        AnyConnection::Sqlite(c) => diesel::sql_query(SQLITE_LATEST_STATES).load(c),
        AnyConnection::Postgres(c) => diesel::sql_query(POSTGRES_LATEST_STATES).load(c),
    }
    .map_err(StoreError::from)
}

pub fn latest_param_rows(conn: &mut AnyConnection) -> Result<Vec<LatestParam>, StoreError> {
    match conn {
        AnyConnection::Sqlite(c) => diesel::sql_query(SQLITE_LATEST_PARAMS).load(c),
        AnyConnection::Postgres(c) => diesel::sql_query(POSTGRES_LATEST_PARAMS).load(c),
    }
    .map_err(StoreError::from)
}

/// Append device state rows in chunks under a single commit.
pub fn insert_device_states(conn: &mut AnyConnection, rows: &[NewDeviceStateEvent]) -> Result<usize, StoreError> {
    use schema::device_states::dsl as D;

    if rows.is_empty() {
        return Ok(0);
    }
    match conn {
        AnyConnection::Sqlite(c) => c.transaction::<usize, diesel::result::Error, _>(|c| {
            let mut inserted = 0;
            for chunk in rows.chunks(INSERT_CHUNK) {
                inserted += diesel::insert_into(D::device_states).values(chunk).execute(c)?;
            }
            Ok(inserted)
        }),
        AnyConnection::Postgres(c) => c.transaction::<usize, diesel::result::Error, _>(|c| {
            let mut inserted = 0;
            for chunk in rows.chunks(INSERT_CHUNK) {
                inserted += diesel::insert_into(D::device_states).values(chunk).execute(c)?;
            }
            Ok(inserted)
        }),
    }
    .map_err(StoreError::from)
}

/// Append parameter rows in chunks under a single commit.
pub fn insert_params(conn: &mut AnyConnection, rows: &[NewParamEvent]) -> Result<usize, StoreError> {
    use schema::important_params::dsl as P;

    if rows.is_empty() {
        return Ok(0);
    }
    match conn {
        AnyConnection::Sqlite(c) => c.transaction::<usize, diesel::result::Error, _>(|c| {
            let mut inserted = 0;
            for chunk in rows.chunks(INSERT_CHUNK) {
                inserted += diesel::insert_into(P::important_params).values(chunk).execute(c)?;
            }
            Ok(inserted)
        }),
        AnyConnection::Postgres(c) => c.transaction::<usize, diesel::result::Error, _>(|c| {
            let mut inserted = 0;
            for chunk in rows.chunks(INSERT_CHUNK) {
                inserted += diesel::insert_into(P::important_params).values(chunk).execute(c)?;
            }
            Ok(inserted)
        }),
    }
    .map_err(StoreError::from)
}
