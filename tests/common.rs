#![allow(dead_code)]

use chrono::NaiveDateTime;
use diesel::prelude::*;
use facility_telemetry::config::{BackendConfig, Config, DeviceGroup};
use facility_telemetry::db::backend::{self, AnyConnection};

/// Fresh in-memory store with the schema applied.
pub fn mem_conn() -> AnyConnection {
    let conn = SqliteConnection::establish(":memory:").expect("in-memory sqlite");
    let mut conn = AnyConnection::Sqlite(conn);
    backend::init_schema(&mut conn).expect("schema init");
    conn
}

pub fn ts(text: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S").expect("test timestamp")
}

/// Small catalog: two groups, three devices, no configured params, 2h
/// look-back at 30min steps.
pub fn test_config() -> Config {
    Config {
        db: BackendConfig::Sqlite {
            sqlite_path: ":memory:".to_string(),
        },
        groups: vec![
            DeviceGroup {
                name: "G1".to_string(),
                devices: vec!["D1".to_string(), "D2".to_string()],
            },
            DeviceGroup {
                name: "G2".to_string(),
                devices: vec!["D1".to_string()],
            },
        ],
        params: Vec::new(),
        seed_on_first_run: true,
        seed_hours: 2,
        seed_step_minutes: 30,
    }
}
