//! Synthetic history generator: bootstraps an empty store with a plausible
//! look-back trend so the dashboard has something to chart on first run.
//!
//! Runs at most once per process start, and only when both event tables are
//! empty. Two replicas sharing a backend can race this check and double-seed;
//! that gap is accepted and documented rather than locked around.

use chrono::{Duration, NaiveDateTime};
use diesel::prelude::*;
use log::info;
use rand::Rng;
use std::hash::{DefaultHasher, Hash, Hasher};

use crate::config::Config;
use crate::db::backend::{self, AnyConnection};
use crate::db::models::{NewDeviceStateEvent, NewParamEvent};
use crate::error::StoreError;
use crate::utils::now_second;

/// Built-in parameter catalog: (name, baseline, drift scale). Used when the
/// configuration supplies no parameter list.
const DEFAULT_PARAMS: [(&str, f64, f64); 8] = [
    ("Cleanroom_Temp", 22.0, 0.08),
    ("Cleanroom_Humid", 48.0, 0.5),
    ("CDA_Pressure", 7.2, 0.05),
    ("CH_Supply_Temp", 6.5, 0.05),
    ("CH_Return_Temp", 13.0, 0.06),
    ("CH_Flow", 950.0, 12.0),
    ("DI_Resistivity", 16.0, 0.2),
    ("VAC_Level", -0.8, 0.05),
];

/// Seed both logs if enabled and the store is empty. Returns the number of
/// (state, parameter) rows inserted; (0, 0) when seeding was skipped.
///
/// A single non-empty table is treated as "already initialized" and blocks
/// seeding as a whole, so synthetic rows never mix into real data.
pub fn seed_if_needed(conn: &mut AnyConnection, cfg: &Config) -> Result<(usize, usize), StoreError> {
    if !cfg.seed_on_first_run {
        info!("Seed: disabled via seed_on_first_run");
        return Ok((0, 0));
    }
    if state_rows_or_zero(conn) > 0 || param_rows_or_zero(conn) > 0 {
        info!("Seed: store already has data, skipping");
        return Ok((0, 0));
    }

    let now = now_second();
    let start = now - Duration::hours(cfg.seed_hours as i64);
    let step = Duration::minutes(cfg.seed_step_minutes as i64);

    let state_rows = generate_state_rows(cfg, start, now, step);
    let param_rows = generate_param_rows(cfg, start, now, step);

    // One commit per table; not atomic across both.
    let states = backend::insert_device_states(conn, &state_rows)?;
    let params = backend::insert_params(conn, &param_rows)?;
    info!(
        "Seed: inserted {} state rows and {} parameter rows ({}h look-back at {}min steps)",
        states, params, cfg.seed_hours, cfg.seed_step_minutes
    );
    Ok((states, params))
}

fn generate_state_rows(
    cfg: &Config,
    start: NaiveDateTime,
    end: NaiveDateTime,
    step: Duration,
) -> Vec<NewDeviceStateEvent> {
    let mut rng = rand::rng();
    let mut rows = Vec::new();
    let mut ts = start;
    while ts <= end {
        for group in &cfg.groups {
            for device in &group.devices {
                // Oldest bucket is a coin flip; later buckets lean 3:1
                // toward ON. Independent draws, not a Markov chain.
                let on = if ts == start {
                    rng.random_bool(0.5)
                } else {
                    rng.random_ratio(3, 4)
                };
                rows.push(NewDeviceStateEvent {
                    group_name: group.name.clone(),
                    device_name: device.clone(),
                    status: on as i16,
                    ts,
                });
            }
        }
        ts += step;
    }
    rows
}

fn generate_param_rows(
    cfg: &Config,
    start: NaiveDateTime,
    end: NaiveDateTime,
    step: Duration,
) -> Vec<NewParamEvent> {
    let names: Vec<String> = if cfg.params.is_empty() {
        DEFAULT_PARAMS.iter().map(|(name, _, _)| (*name).to_string()).collect()
    } else {
        cfg.params.clone()
    };

    let mut rows = Vec::new();
    for name in &names {
        let (base, drift) = param_profile(name);
        let mut value = base;
        let mut ts = start;
        while ts <= end {
            value += drift_step(name, ts) * drift;
            rows.push(NewParamEvent {
                param_name: name.clone(),
                value,
                ts,
            });
            ts += step;
        }
    }
    rows
}

/// Baseline and drift scale for a parameter; names outside the built-in
/// catalog walk from zero with unit drift.
fn param_profile(name: &str) -> (f64, f64) {
    DEFAULT_PARAMS
        .iter()
        .find(|(candidate, _, _)| *candidate == name)
        .map(|(_, base, drift)| (*base, *drift))
        .unwrap_or((0.0, 1.0))
}

/// Walk increment in [-0.5, 0.5), derived from a hash of (name, bucket
/// timestamp). Deterministic-looking but the distribution is unspecified;
/// the walk is biased, not mean-reverting.
fn drift_step(name: &str, ts: NaiveDateTime) -> f64 {
    let mut hasher = DefaultHasher::new();
    name.hash(&mut hasher);
    ts.and_utc().timestamp().hash(&mut hasher);
    (hasher.finish() % 100) as f64 / 100.0 - 0.5
}

// The emptiness probes read a count failure (e.g. table missing) as zero
// rows; this is the only swallowed error in the crate.
fn state_rows_or_zero(conn: &mut AnyConnection) -> i64 {
    use crate::schema::device_states::dsl as D;
    D::device_states.count().get_result(conn).unwrap_or(0)
}

fn param_rows_or_zero(conn: &mut AnyConnection) -> i64 {
    use crate::schema::important_params::dsl as P;
    P::important_params.count().get_result(conn).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn drift_step_is_stable_for_a_given_key_and_bucket() {
        let ts = NaiveDate::from_ymd_opt(2026, 8, 24)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let a = drift_step("Cleanroom_Temp", ts);
        let b = drift_step("Cleanroom_Temp", ts);
        assert_eq!(a, b);
        assert!((-0.5..0.5).contains(&a), "increment out of range: {}", a);
    }

    #[test]
    fn unknown_params_walk_from_zero() {
        assert_eq!(param_profile("Mystery_Sensor"), (0.0, 1.0));
        assert_eq!(param_profile("CH_Flow"), (950.0, 12.0));
    }
}
