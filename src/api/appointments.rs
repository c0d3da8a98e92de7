//! Appointment booking and lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppResult,
    models::appointment::{Appointment, AppointmentStatus, BookAppointment},
};

use super::{parse_date, parse_time};

/// Create appointment request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAppointmentRequest {
    pub service_id: i32,
    pub client_id: i32,
    /// Omit to take any qualified employee free at the requested time
    pub employee_id: Option<i32>,
    /// Date (YYYY-MM-DD)
    pub date: String,
    /// Slot start (HH:MM); must match a slot from the availability listing
    pub start_time: String,
    pub special_requests: Option<String>,
    /// URL of a client-supplied reference photo
    pub reference_photo: Option<String>,
    pub promotion_code: Option<String>,
}

/// Cancel request
#[derive(Debug, Deserialize, ToSchema)]
pub struct CancelRequest {
    pub reason: String,
}

/// Reschedule request
#[derive(Debug, Deserialize, ToSchema)]
pub struct RescheduleRequest {
    /// Omit to keep the current employee
    pub employee_id: Option<i32>,
    /// New date (YYYY-MM-DD)
    pub date: String,
    /// New slot start (HH:MM)
    pub start_time: String,
}

/// Query parameters for the admin day listing
#[derive(Debug, Deserialize, IntoParams)]
pub struct AppointmentListQuery {
    /// Date (YYYY-MM-DD)
    pub date: String,
    pub status: Option<AppointmentStatus>,
}

/// Book a slot
#[utoipa::path(
    post,
    path = "/appointments",
    tag = "appointments",
    request_body = CreateAppointmentRequest,
    responses(
        (status = 201, description = "Appointment created", body = Appointment),
        (status = 400, description = "Malformed request or slot outside working hours"),
        (status = 409, description = "Slot no longer available"),
        (status = 422, description = "Promotion not applicable")
    )
)]
pub async fn create_appointment(
    State(state): State<crate::AppState>,
    Json(request): Json<CreateAppointmentRequest>,
) -> AppResult<(StatusCode, Json<Appointment>)> {
    let book = BookAppointment {
        service_id: request.service_id,
        client_id: request.client_id,
        employee_id: request.employee_id,
        date: parse_date(&request.date, "date")?,
        start_time: parse_time(&request.start_time, "start_time")?,
        special_requests: request.special_requests,
        reference_photo: request.reference_photo,
        promotion_code: request.promotion_code,
    };

    let appointment = state
        .services
        .booking
        .create_appointment(book, Utc::now())
        .await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Get an appointment
#[utoipa::path(
    get,
    path = "/appointments/{id}",
    tag = "appointments",
    params(("id" = i32, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment", body = Appointment),
        (status = 404, description = "Appointment not found")
    )
)]
pub async fn get_appointment(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Appointment>> {
    let appointment = state.services.booking.get(id).await?;
    Ok(Json(appointment))
}

/// List appointments for a date (admin)
#[utoipa::path(
    get,
    path = "/appointments",
    tag = "appointments",
    params(AppointmentListQuery),
    responses(
        (status = 200, description = "Appointments for the date", body = Vec<Appointment>)
    )
)]
pub async fn list_appointments(
    State(state): State<crate::AppState>,
    Query(query): Query<AppointmentListQuery>,
) -> AppResult<Json<Vec<Appointment>>> {
    let date = parse_date(&query.date, "date")?;
    let appointments = state
        .services
        .booking
        .list_for_date(date, query.status)
        .await?;
    Ok(Json(appointments))
}

/// List overdue appointments (admin alerting)
#[utoipa::path(
    get,
    path = "/appointments/overdue",
    tag = "appointments",
    responses(
        (status = 200, description = "Confirmed appointments past their grace period", body = Vec<Appointment>)
    )
)]
pub async fn list_overdue(
    State(state): State<crate::AppState>,
) -> AppResult<Json<Vec<Appointment>>> {
    let appointments = state.services.booking.list_overdue(Utc::now()).await?;
    Ok(Json(appointments))
}

/// Cancel an appointment
#[utoipa::path(
    post,
    path = "/appointments/{id}/cancel",
    tag = "appointments",
    params(("id" = i32, Path, description = "Appointment ID")),
    request_body = CancelRequest,
    responses(
        (status = 200, description = "Appointment cancelled", body = Appointment),
        (status = 404, description = "Appointment not found"),
        (status = 422, description = "Not cancellable in its current state")
    )
)]
pub async fn cancel_appointment(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<CancelRequest>,
) -> AppResult<Json<Appointment>> {
    let appointment = state
        .services
        .booking
        .cancel(id, &request.reason, Utc::now())
        .await?;
    Ok(Json(appointment))
}

/// Reschedule an appointment to a new slot
#[utoipa::path(
    post,
    path = "/appointments/{id}/reschedule",
    tag = "appointments",
    params(("id" = i32, Path, description = "Appointment ID")),
    request_body = RescheduleRequest,
    responses(
        (status = 200, description = "Appointment rescheduled", body = Appointment),
        (status = 404, description = "Appointment not found"),
        (status = 409, description = "New slot no longer available"),
        (status = 422, description = "Reschedule limit reached or state does not allow it")
    )
)]
pub async fn reschedule_appointment(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
    Json(request): Json<RescheduleRequest>,
) -> AppResult<Json<Appointment>> {
    let date = parse_date(&request.date, "date")?;
    let start_time = parse_time(&request.start_time, "start_time")?;
    let appointment = state
        .services
        .booking
        .reschedule(id, request.employee_id, date, start_time, Utc::now())
        .await?;
    Ok(Json(appointment))
}

/// Mark an appointment completed
#[utoipa::path(
    post,
    path = "/appointments/{id}/complete",
    tag = "appointments",
    params(("id" = i32, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment completed", body = Appointment),
        (status = 404, description = "Appointment not found"),
        (status = 422, description = "Only confirmed appointments can complete")
    )
)]
pub async fn complete_appointment(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Appointment>> {
    let appointment = state.services.booking.complete(id, Utc::now()).await?;
    Ok(Json(appointment))
}

/// Mark an appointment as a no-show
#[utoipa::path(
    post,
    path = "/appointments/{id}/no-show",
    tag = "appointments",
    params(("id" = i32, Path, description = "Appointment ID")),
    responses(
        (status = 200, description = "Appointment marked as no-show", body = Appointment),
        (status = 404, description = "Appointment not found"),
        (status = 422, description = "Not confirmed, or scheduled time not yet passed")
    )
)]
pub async fn mark_no_show(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Appointment>> {
    let appointment = state.services.booking.mark_no_show(id, Utc::now()).await?;
    Ok(Json(appointment))
}
