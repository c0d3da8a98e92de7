//! Schedule models (weekly working hours, blocked slots)

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

// ---------------------------------------------------------------------------
// WorkingInterval
// ---------------------------------------------------------------------------

/// One employee's working hours on one weekday.
///
/// Rows are deactivated rather than deleted; only active rows feed the
/// availability engine. Overlapping active rows for the same weekday are
/// rejected at write time.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct WorkingInterval {
    pub id: i32,
    pub employee_id: i32,
    /// Day of week (1=Monday .. 7=Sunday)
    pub day_of_week: i16,
    /// Shift start
    pub start_time: NaiveTime,
    /// Shift end (must be after start)
    pub end_time: NaiveTime,
    pub active: bool,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

/// Upsert working hours for one weekday
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpsertWorkingInterval {
    /// Day of week (1=Monday .. 7=Sunday)
    #[validate(range(min = 1, max = 7))]
    pub day_of_week: i16,
    /// Shift start (HH:MM)
    pub start_time: String,
    /// Shift end (HH:MM)
    pub end_time: String,
    pub active: bool,
}

// ---------------------------------------------------------------------------
// BlockedSlot
// ---------------------------------------------------------------------------

/// An explicit admin block subtracted from availability
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct BlockedSlot {
    pub id: i32,
    pub employee_id: i32,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub reason: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
}

/// Create blocked slot request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateBlockedSlot {
    pub employee_id: i32,
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Block start (HH:MM)
    pub start_time: String,
    /// Block end (HH:MM)
    pub end_time: String,
    pub reason: Option<String>,
}

/// Query parameters for blocked slots
#[derive(Debug, Deserialize, IntoParams, ToSchema)]
pub struct BlockedSlotQuery {
    pub employee_id: Option<i32>,
    /// Filter blocks on this date (YYYY-MM-DD)
    pub date: Option<String>,
}
