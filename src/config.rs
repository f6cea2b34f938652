//! Runtime configuration loaded once at startup from a JSON file.
//! The catalog (groups/devices/params) is read-only for the process lifetime.

use crate::error::StoreError;
use serde::Deserialize;
use std::{fs, path::Path};

pub const DEFAULT_SEED_HOURS: u32 = 24;
pub const DEFAULT_SEED_STEP_MINUTES: u32 = 30;

/// Backend selector plus connection parameters.
///
/// Decoding rejects unknown `type` tags, so an unsupported backend fails the
/// startup config load rather than surfacing later as a broken connection.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendConfig {
    /// Embedded file engine; `sqlite_path` may be a file path or `:memory:`.
    Sqlite { sqlite_path: String },
    /// Networked engine, addressed by a standard connection URL.
    Postgres { url: String },
}

impl BackendConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            BackendConfig::Sqlite { .. } => "sqlite",
            BackendConfig::Postgres { .. } => "postgres",
        }
    }
}

/// One equipment group and its ordered device list.
#[derive(Debug, Clone, Deserialize)]
pub struct DeviceGroup {
    pub name: String,
    pub devices: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub db: BackendConfig,
    pub groups: Vec<DeviceGroup>,
    /// Optional parameter catalog; empty means "fall back to defaults when
    /// seeding and to distinct stored names when listing".
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default = "default_true")]
    pub seed_on_first_run: bool,
    #[serde(default = "default_seed_hours")]
    pub seed_hours: u32,
    #[serde(default = "default_seed_step_minutes")]
    pub seed_step_minutes: u32,
}

impl Config {
    pub fn from_file(path: &Path) -> Result<Self, StoreError> {
        let text = fs::read_to_string(path)
            .map_err(|e| StoreError::Configuration(format!("cannot read {}: {}", path.display(), e)))?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, StoreError> {
        let mut de = serde_json::Deserializer::from_str(text);
        let cfg: Config = serde_path_to_error::deserialize(&mut de)
            .map_err(|e| StoreError::Configuration(format!("at `{}`: {}", e.path(), e.inner())))?;
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), StoreError> {
        match &self.db {
            BackendConfig::Sqlite { sqlite_path } if sqlite_path.is_empty() => {
                return Err(StoreError::Configuration("db.sqlite_path must not be empty".to_string()));
            }
            BackendConfig::Postgres { url } if url.is_empty() => {
                return Err(StoreError::Configuration("db.url must not be empty".to_string()));
            }
            _ => {}
        }
        for group in &self.groups {
            if group.name.is_empty() {
                return Err(StoreError::Configuration("group name must not be empty".to_string()));
            }
            if group.devices.iter().any(|d| d.is_empty()) {
                return Err(StoreError::Configuration(format!(
                    "group `{}` contains an empty device name",
                    group.name
                )));
            }
        }
        if self.params.iter().any(|p| p.is_empty()) {
            return Err(StoreError::Configuration("params contains an empty name".to_string()));
        }
        if self.seed_hours == 0 {
            return Err(StoreError::Configuration("seed_hours must be at least 1".to_string()));
        }
        if self.seed_step_minutes == 0 {
            return Err(StoreError::Configuration("seed_step_minutes must be at least 1".to_string()));
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

fn default_seed_hours() -> u32 {
    DEFAULT_SEED_HOURS
}

fn default_seed_step_minutes() -> u32 {
    DEFAULT_SEED_STEP_MINUTES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses() {
        let cfg = Config::from_json_str(
            r#"{
                "db": { "type": "postgres", "url": "postgres://monitor:monitor@db:5432/telemetry" },
                "groups": [
                    { "name": "Chillers", "devices": ["CH-1", "CH-2"] },
                    { "name": "CDA", "devices": ["Compressor-A"] }
                ],
                "params": ["Cleanroom_Temp"],
                "seed_on_first_run": false,
                "seed_hours": 48,
                "seed_step_minutes": 15
            }"#,
        )
        .expect("config should parse");
        assert_eq!(cfg.db.kind(), "postgres");
        assert_eq!(cfg.groups.len(), 2);
        assert_eq!(cfg.groups[0].devices, vec!["CH-1", "CH-2"]);
        assert!(!cfg.seed_on_first_run);
        assert_eq!(cfg.seed_hours, 48);
        assert_eq!(cfg.seed_step_minutes, 15);
    }

    #[test]
    fn seed_fields_default() {
        let cfg = Config::from_json_str(
            r#"{
                "db": { "type": "sqlite", "sqlite_path": "telemetry.db" },
                "groups": [ { "name": "G1", "devices": ["D1"] } ]
            }"#,
        )
        .expect("config should parse");
        assert!(cfg.seed_on_first_run);
        assert_eq!(cfg.seed_hours, DEFAULT_SEED_HOURS);
        assert_eq!(cfg.seed_step_minutes, DEFAULT_SEED_STEP_MINUTES);
        assert!(cfg.params.is_empty());
    }

    #[test]
    fn unsupported_backend_is_rejected() {
        let err = Config::from_json_str(
            r#"{
                "db": { "type": "mssql", "url": "whatever" },
                "groups": []
            }"#,
        )
        .expect_err("unknown backend must fail");
        match err {
            StoreError::Configuration(msg) => assert!(msg.contains("mssql"), "got: {}", msg),
            other => panic!("expected Configuration error, got {}", other),
        }
    }

    #[test]
    fn zero_step_is_rejected() {
        let err = Config::from_json_str(
            r#"{
                "db": { "type": "sqlite", "sqlite_path": ":memory:" },
                "groups": [ { "name": "G1", "devices": ["D1"] } ],
                "seed_step_minutes": 0
            }"#,
        )
        .expect_err("zero step must fail");
        assert!(matches!(err, StoreError::Configuration(_)));
    }
}
