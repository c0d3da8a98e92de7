//! Bookable slot — a computed value, never a table row

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Slot status as surfaced to booking and admin UIs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SlotStatus {
    Available,
    Reserved,
    Blocked,
    Cancelled,
}

/// A fixed-duration bookable time window for one employee on one date.
///
/// Slots are derived on demand from working hours and the service duration;
/// appointments and blocked-slot rows are the persistent facts they are
/// checked against. Invariants: `end_time - start_time == duration_minutes`;
/// reserved slots carry the owning appointment id, available ones never do.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Slot {
    pub service_id: i32,
    pub employee_id: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub duration_minutes: i32,
    pub status: SlotStatus,
    pub appointment_id: Option<i32>,
}
