//! Write path: validated single-event appends (manual overrides from the
//! dashboard). Each call stamps the current wall clock at second precision
//! and writes exactly one immutable row.

use crate::db::backend::{self, AnyConnection};
use crate::db::models::{NewDeviceStateEvent, NewParamEvent};
use crate::error::StoreError;
use crate::utils::{format_ts, now_second};

/// Map a status token to its stored 0/1 form.
///
/// Accepted: `ON`/`OFF`/`1`/`0`/`True`/`False` (case-insensitive) plus the
/// locale synonyms `開` and `開機` (both ON).
pub fn parse_status_token(raw: &str) -> Result<i16, StoreError> {
    match raw.to_uppercase().as_str() {
        "ON" | "1" | "TRUE" | "開" | "開機" => Ok(1),
        "OFF" | "0" | "FALSE" => Ok(0),
        _ => Err(StoreError::Validation(format!("unrecognized status token: {}", raw))),
    }
}

/// Append one device state event; returns the generated timestamp string
/// for display confirmation.
pub fn write_device_state(
    conn: &mut AnyConnection,
    group: &str,
    device: &str,
    status: &str,
) -> Result<String, StoreError> {
    if group.is_empty() {
        return Err(StoreError::Validation("group must not be empty".to_string()));
    }
    if device.is_empty() {
        return Err(StoreError::Validation("device must not be empty".to_string()));
    }
    let status = parse_status_token(status)?;

    let ts = now_second();
    backend::insert_device_states(
        conn,
        &[NewDeviceStateEvent {
            group_name: group.to_string(),
            device_name: device.to_string(),
            status,
            ts,
        }],
    )?;
    Ok(format_ts(ts))
}

/// Append one parameter event; `value` must parse as a floating-point
/// number. Returns the generated timestamp string.
pub fn write_param(conn: &mut AnyConnection, param: &str, value: &str) -> Result<String, StoreError> {
    if param.is_empty() {
        return Err(StoreError::Validation("param must not be empty".to_string()));
    }
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| StoreError::Validation(format!("numeric value required, got `{}`", value)))?;

    let ts = now_second();
    backend::insert_params(
        conn,
        &[NewParamEvent {
            param_name: param.to_string(),
            value,
            ts,
        }],
    )?;
    Ok(format_ts(ts))
}
