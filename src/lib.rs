//! Telemetry dashboard backend core: append-only device state and parameter
//! logs over an embedded (SQLite) or networked (PostgreSQL) backend, with
//! latest-per-key retrieval, time-range history and first-run seeding.
//! The HTTP layer is an external collaborator calling into `services`.

pub mod config;
pub mod error;
pub mod schema;
pub mod utils;
pub mod db {
    pub mod backend;
    pub mod models;
}
pub mod services {
    pub mod ingest;
    pub mod queries;
    pub mod seed;
}
