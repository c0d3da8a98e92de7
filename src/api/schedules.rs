//! Schedule API endpoints (working hours, blocked slots)

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::schedule::{
        BlockedSlot, BlockedSlotQuery, CreateBlockedSlot, UpsertWorkingInterval, WorkingInterval,
    },
};

use super::parse_date;

// ---- Working hours ----

/// List an employee's working hours
#[utoipa::path(
    get,
    path = "/employees/{id}/working-hours",
    tag = "schedules",
    params(("id" = i32, Path, description = "Employee ID")),
    responses(
        (status = 200, description = "Working-hour rows, active and inactive", body = Vec<WorkingInterval>),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn list_working_hours(
    State(state): State<crate::AppState>,
    Path(employee_id): Path<i32>,
) -> AppResult<Json<Vec<WorkingInterval>>> {
    let hours = state.services.schedules.working_hours(employee_id).await?;
    Ok(Json(hours))
}

/// Upsert one weekday's working hours for an employee.
/// Setting `active` to false deactivates the day; rows are never deleted.
#[utoipa::path(
    put,
    path = "/employees/{id}/working-hours",
    tag = "schedules",
    params(("id" = i32, Path, description = "Employee ID")),
    request_body = UpsertWorkingInterval,
    responses(
        (status = 200, description = "Working hours stored", body = WorkingInterval),
        (status = 400, description = "Malformed times or weekday"),
        (status = 404, description = "Employee not found"),
        (status = 422, description = "Overlaps another active interval")
    )
)]
pub async fn upsert_working_hours(
    State(state): State<crate::AppState>,
    Path(employee_id): Path<i32>,
    Json(data): Json<UpsertWorkingInterval>,
) -> AppResult<Json<WorkingInterval>> {
    data.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;
    let interval = state
        .services
        .schedules
        .upsert_working_hours(employee_id, &data)
        .await?;
    Ok(Json(interval))
}

// ---- Blocked slots ----

/// List blocked slots
#[utoipa::path(
    get,
    path = "/blocked-slots",
    tag = "schedules",
    params(BlockedSlotQuery),
    responses(
        (status = 200, description = "Blocked slots", body = Vec<BlockedSlot>)
    )
)]
pub async fn list_blocked_slots(
    State(state): State<crate::AppState>,
    Query(query): Query<BlockedSlotQuery>,
) -> AppResult<Json<Vec<BlockedSlot>>> {
    let date = match query.date.as_deref() {
        Some(d) => Some(parse_date(d, "date")?),
        None => None,
    };
    let blocked = state
        .services
        .schedules
        .list_blocked(query.employee_id, date)
        .await?;
    Ok(Json(blocked))
}

/// Block a window of an employee's day
#[utoipa::path(
    post,
    path = "/blocked-slots",
    tag = "schedules",
    request_body = CreateBlockedSlot,
    responses(
        (status = 201, description = "Blocked slot created", body = BlockedSlot),
        (status = 400, description = "Malformed date or times"),
        (status = 404, description = "Employee not found")
    )
)]
pub async fn create_blocked_slot(
    State(state): State<crate::AppState>,
    Json(data): Json<CreateBlockedSlot>,
) -> AppResult<(StatusCode, Json<BlockedSlot>)> {
    let blocked = state.services.schedules.create_blocked(&data).await?;
    Ok((StatusCode::CREATED, Json(blocked)))
}

/// Remove a block
#[utoipa::path(
    delete,
    path = "/blocked-slots/{id}",
    tag = "schedules",
    params(("id" = i32, Path, description = "Blocked slot ID")),
    responses(
        (status = 204, description = "Block removed"),
        (status = 404, description = "Block not found")
    )
)]
pub async fn delete_blocked_slot(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.schedules.delete_blocked(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
