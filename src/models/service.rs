//! Service model (read-only collaborator record)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A bookable salon service.
///
/// Price and deposit settings are captured onto each appointment at booking
/// time; editing a service never retroactively changes existing bookings.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Service {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    /// Appointment length in minutes; also the slot grid step
    pub duration_minutes: i32,
    pub price: Decimal,
    pub requires_deposit: bool,
    /// Deposit share of the (discounted) total, 0-100
    pub deposit_percentage: i16,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}
