//! Availability endpoints

use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{error::AppResult, models::slot::Slot};

use super::parse_date;

/// Query parameters for free slots on one date
#[derive(Debug, Deserialize, IntoParams)]
pub struct SlotsQuery {
    pub service_id: i32,
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Restrict to one employee; omit for all qualified employees
    pub employee_id: Option<i32>,
}

/// Query parameters for bookable days in a range
#[derive(Debug, Deserialize, IntoParams)]
pub struct DaysQuery {
    pub service_id: i32,
    /// Range start (YYYY-MM-DD)
    pub start_date: String,
    /// Range end, inclusive (YYYY-MM-DD)
    pub end_date: String,
    pub employee_id: Option<i32>,
}

/// Query parameters for the admin day grid
#[derive(Debug, Deserialize, IntoParams)]
pub struct GridQuery {
    pub employee_id: i32,
    pub service_id: i32,
    /// Date (YYYY-MM-DD)
    pub date: String,
}

/// List free slots for a service on a date
#[utoipa::path(
    get,
    path = "/availability/slots",
    tag = "availability",
    params(SlotsQuery),
    responses(
        (status = 200, description = "Free slots, chronological; empty when nothing is bookable", body = Vec<Slot>),
        (status = 400, description = "Malformed date")
    )
)]
pub async fn list_slots(
    State(state): State<crate::AppState>,
    Query(query): Query<SlotsQuery>,
) -> AppResult<Json<Vec<Slot>>> {
    let date = parse_date(&query.date, "date")?;
    let slots = state
        .services
        .availability
        .available_slots(query.service_id, date, query.employee_id)
        .await?;
    Ok(Json(slots))
}

/// List days with at least one free slot
#[utoipa::path(
    get,
    path = "/availability/days",
    tag = "availability",
    params(DaysQuery),
    responses(
        (status = 200, description = "Bookable days in the range", body = Vec<NaiveDate>),
        (status = 400, description = "Malformed or oversized range")
    )
)]
pub async fn list_days(
    State(state): State<crate::AppState>,
    Query(query): Query<DaysQuery>,
) -> AppResult<Json<Vec<NaiveDate>>> {
    let start = parse_date(&query.start_date, "start_date")?;
    let end = parse_date(&query.end_date, "end_date")?;
    let days = state
        .services
        .availability
        .available_days(query.service_id, start, end, query.employee_id)
        .await?;
    Ok(Json(days))
}

/// Full slot grid for one employee and date (admin day view)
#[utoipa::path(
    get,
    path = "/availability/grid",
    tag = "availability",
    params(GridQuery),
    responses(
        (status = 200, description = "Every slot with its status", body = Vec<Slot>),
        (status = 400, description = "Malformed date")
    )
)]
pub async fn day_grid(
    State(state): State<crate::AppState>,
    Query(query): Query<GridQuery>,
) -> AppResult<Json<Vec<Slot>>> {
    let date = parse_date(&query.date, "date")?;
    let grid = state
        .services
        .availability
        .day_grid(query.employee_id, query.service_id, date)
        .await?;
    Ok(Json(grid))
}
