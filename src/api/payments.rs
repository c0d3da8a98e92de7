//! Payment collaborator webhook
//!
//! The payment gateway is an external collaborator; by the time this
//! endpoint fires it has already verified funds. The core only moves the
//! appointment through its lifecycle. Replays are no-ops.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::appointment::Appointment};

/// Payment notification payload
#[derive(Debug, Deserialize, ToSchema)]
pub struct PaymentWebhookRequest {
    pub appointment_id: i32,
    /// Gateway reference for the verified payment
    pub payment_reference: String,
    /// "succeeded" confirms the deposit; anything else leaves the
    /// appointment untouched
    pub outcome: String,
}

/// Deposit payment notification
#[utoipa::path(
    post,
    path = "/payments/webhook",
    tag = "payments",
    request_body = PaymentWebhookRequest,
    responses(
        (status = 200, description = "Appointment after processing the notification", body = Appointment),
        (status = 404, description = "Appointment not found"),
        (status = 422, description = "Appointment not awaiting a deposit")
    )
)]
pub async fn payment_webhook(
    State(state): State<crate::AppState>,
    Json(request): Json<PaymentWebhookRequest>,
) -> AppResult<Json<Appointment>> {
    if request.outcome != "succeeded" {
        tracing::info!(
            appointment_id = request.appointment_id,
            outcome = %request.outcome,
            "ignoring non-success payment notification"
        );
        let appointment = state.services.booking.get(request.appointment_id).await?;
        return Ok(Json(appointment));
    }

    let appointment = state
        .services
        .booking
        .confirm_deposit(request.appointment_id, &request.payment_reference, Utc::now())
        .await?;
    Ok(Json(appointment))
}
