//! Promotion quote service
//!
//! Validation only; usage counting happens inside the booking transaction
//! when an appointment actually reaches confirmed.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, repository::Repository};

/// The outcome of checking a code against a prospective booking
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PromotionQuote {
    pub code: String,
    pub applicable: bool,
    pub discount: Decimal,
    pub final_amount: Decimal,
}

#[derive(Clone)]
pub struct PromotionsService {
    repository: Repository,
}

impl PromotionsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Quote the discount a code would yield for a service/date/amount.
    /// Never mutates used_count.
    pub async fn quote(
        &self,
        code: &str,
        service_id: i32,
        date: NaiveDate,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> AppResult<PromotionQuote> {
        let promotion = self.repository.promotions.get_by_code(code).await?;

        if !promotion.is_applicable(service_id, date, now) {
            return Ok(PromotionQuote {
                code: promotion.code,
                applicable: false,
                discount: Decimal::ZERO,
                final_amount: amount,
            });
        }

        let discount = promotion.discount(amount);
        Ok(PromotionQuote {
            code: promotion.code,
            applicable: true,
            discount,
            final_amount: amount - discount,
        })
    }
}
