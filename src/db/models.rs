//! Diesel model structs for the two append-only event logs, plus the view
//! shapes handed to the HTTP collaborator.
//!
//! Events are immutable once written; there is no update or delete model.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel::sql_types::{Double, SmallInt, Text, Timestamp};
use serde::Serialize;

use crate::schema;
use crate::utils::format_ts;

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = schema::device_states)]
pub struct DeviceStateEvent {
    pub id: i64,
    pub group_name: String,
    pub device_name: String,
    pub status: i16,
    pub ts: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::device_states)]
pub struct NewDeviceStateEvent {
    pub group_name: String,
    pub device_name: String,
    pub status: i16,
    pub ts: NaiveDateTime,
}

#[derive(Debug, Clone, Queryable, Identifiable, Serialize)]
#[diesel(table_name = schema::important_params)]
pub struct ParamEvent {
    pub id: i64,
    pub param_name: String,
    pub value: f64,
    pub ts: NaiveDateTime,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = schema::important_params)]
pub struct NewParamEvent {
    pub param_name: String,
    pub value: f64,
    pub ts: NaiveDateTime,
}

/// Raw row produced by the dialect-specific latest-per-key statements.
#[derive(Debug, QueryableByName)]
pub struct LatestDeviceState {
    #[diesel(sql_type = Text)]
    pub group_name: String,
    #[diesel(sql_type = Text)]
    pub device_name: String,
    #[diesel(sql_type = SmallInt)]
    pub status: i16,
    #[diesel(sql_type = Timestamp)]
    pub ts: NaiveDateTime,
}

#[derive(Debug, QueryableByName)]
pub struct LatestParam {
    #[diesel(sql_type = Text)]
    pub param_name: String,
    #[diesel(sql_type = Double)]
    pub value: f64,
    #[diesel(sql_type = Timestamp)]
    pub ts: NaiveDateTime,
}

/// Catalog entry returned by the device listing; no database access involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceRef {
    pub group: String,
    pub device: String,
}

/// One device state as presented to the dashboard: both the label and the
/// numeric form of the status, timestamp already in wire format.
#[derive(Debug, Clone, Serialize)]
pub struct DeviceStateView {
    pub group: String,
    pub device: String,
    pub status: &'static str,
    pub status_num: i16,
    pub ts: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParamView {
    pub param: String,
    pub value: f64,
    pub ts: String,
}

pub fn status_label(status: i16) -> &'static str {
    if status == 1 { "ON" } else { "OFF" }
}

impl From<LatestDeviceState> for DeviceStateView {
    fn from(row: LatestDeviceState) -> Self {
        DeviceStateView {
            group: row.group_name,
            device: row.device_name,
            status: status_label(row.status),
            status_num: row.status,
            ts: format_ts(row.ts),
        }
    }
}

impl From<DeviceStateEvent> for DeviceStateView {
    fn from(row: DeviceStateEvent) -> Self {
        DeviceStateView {
            group: row.group_name,
            device: row.device_name,
            status: status_label(row.status),
            status_num: row.status,
            ts: format_ts(row.ts),
        }
    }
}

impl From<LatestParam> for ParamView {
    fn from(row: LatestParam) -> Self {
        ParamView {
            param: row.param_name,
            value: row.value,
            ts: format_ts(row.ts),
        }
    }
}

impl From<ParamEvent> for ParamView {
    fn from(row: ParamEvent) -> Self {
        ParamView {
            param: row.param_name,
            value: row.value,
            ts: format_ts(row.ts),
        }
    }
}
