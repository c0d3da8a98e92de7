//! Promotion validation endpoint

use axum::{extract::State, Json};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{error::AppResult, services::promotions::PromotionQuote};

use super::parse_date;

/// Promotion quote request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ValidatePromotionRequest {
    pub code: String,
    pub service_id: i32,
    /// Prospective booking date (YYYY-MM-DD)
    pub date: String,
    /// Base amount the discount would apply to
    pub amount: Decimal,
}

/// Quote the discount a promotion code would yield.
/// Never consumes a use of the code.
#[utoipa::path(
    post,
    path = "/promotions/validate",
    tag = "promotions",
    request_body = ValidatePromotionRequest,
    responses(
        (status = 200, description = "Quote, applicable or not", body = PromotionQuote),
        (status = 404, description = "Unknown promotion code")
    )
)]
pub async fn validate_promotion(
    State(state): State<crate::AppState>,
    Json(request): Json<ValidatePromotionRequest>,
) -> AppResult<Json<PromotionQuote>> {
    let date = parse_date(&request.date, "date")?;
    let quote = state
        .services
        .promotions
        .quote(&request.code, request.service_id, date, request.amount, Utc::now())
        .await?;
    Ok(Json(quote))
}
