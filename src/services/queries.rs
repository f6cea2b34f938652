//! Read side: catalog listings, latest-value retrieval and time-range
//! history. Latest values are always derived from the append-only logs;
//! there is no separately stored current state.

use diesel::prelude::*;

use crate::config::Config;
use crate::db::backend::{self, AnyConnection};
use crate::db::models::{DeviceRef, DeviceStateEvent, DeviceStateView, ParamEvent, ParamView};
use crate::error::StoreError;
use crate::utils::TimeWindow;

/// Every (group, device) pair from the catalog, in configured order.
/// No database access.
pub fn list_devices(cfg: &Config) -> Vec<DeviceRef> {
    cfg.groups
        .iter()
        .flat_map(|g| {
            g.devices.iter().map(|d| DeviceRef {
                group: g.name.clone(),
                device: d.clone(),
            })
        })
        .collect()
}

/// One row per distinct (group, device) present in the log, carrying the
/// maximum timestamp for that pair, ordered by group then device.
pub fn latest_device_states(conn: &mut AnyConnection) -> Result<Vec<DeviceStateView>, StoreError> {
    let rows = backend::latest_device_state_rows(conn)?;
    Ok(rows.into_iter().map(DeviceStateView::from).collect())
}

/// Full state history inside the inclusive window, ascending by timestamp.
/// `group = None` means all groups.
pub fn device_state_history(
    conn: &mut AnyConnection,
    group: Option<&str>,
    window: &TimeWindow,
) -> Result<Vec<DeviceStateView>, StoreError> {
    use crate::schema::device_states::dsl as D;

    let rows: Vec<DeviceStateEvent> = match group {
        Some(group) => D::device_states
            .filter(D::group_name.eq(group))
            .filter(D::ts.between(window.start, window.end))
            .order(D::ts.asc())
            .load(conn)?,
        None => D::device_states
            .filter(D::ts.between(window.start, window.end))
            .order(D::ts.asc())
            .load(conn)?,
    };
    Ok(rows.into_iter().map(DeviceStateView::from).collect())
}

/// Parameter names: the catalog list when configured, otherwise the
/// distinct names observed in storage, ascending.
pub fn list_params(conn: &mut AnyConnection, cfg: &Config) -> Result<Vec<String>, StoreError> {
    use crate::schema::important_params::dsl as P;

    if !cfg.params.is_empty() {
        return Ok(cfg.params.clone());
    }
    P::important_params
        .select(P::param_name)
        .distinct()
        .order(P::param_name.asc())
        .load(conn)
        .map_err(StoreError::from)
}

/// One row per distinct parameter name with its maximum timestamp,
/// ordered by name.
pub fn latest_params(conn: &mut AnyConnection) -> Result<Vec<ParamView>, StoreError> {
    let rows = backend::latest_param_rows(conn)?;
    Ok(rows.into_iter().map(ParamView::from).collect())
}

/// Full parameter history inside the inclusive window, ascending by
/// timestamp. An empty `params` filter means all parameters.
pub fn param_history(
    conn: &mut AnyConnection,
    params: &[String],
    window: &TimeWindow,
) -> Result<Vec<ParamView>, StoreError> {
    use crate::schema::important_params::dsl as P;

    let rows: Vec<ParamEvent> = if params.is_empty() {
        P::important_params
            .filter(P::ts.between(window.start, window.end))
            .order(P::ts.asc())
            .load(conn)?
    } else {
        P::important_params
            .filter(P::param_name.eq_any(params))
            .filter(P::ts.between(window.start, window.end))
            .order(P::ts.asc())
            .load(conn)?
    };
    Ok(rows.into_iter().map(ParamView::from).collect())
}
