//! API handlers for Opaline REST endpoints

pub mod appointments;
pub mod availability;
pub mod catalog;
pub mod health;
pub mod openapi;
pub mod payments;
pub mod promotions;
pub mod schedules;

use chrono::{NaiveDate, NaiveTime};

use crate::error::{AppError, AppResult};

/// Parse a YYYY-MM-DD request field
pub(crate) fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} (use YYYY-MM-DD)", field)))
}

/// Parse an HH:MM request field
pub(crate) fn parse_time(value: &str, field: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid {} (use HH:MM)", field)))
}
