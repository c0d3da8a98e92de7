//! Promotion model and discount rules

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::scheduling::pricing::round_money;

/// How a promotion's value is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "promo_type", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PromoType {
    /// `value` is a percentage of the base amount
    Percentage,
    /// `value` is a flat amount off
    Fixed,
}

/// A discount code with eligibility rules and a usage cap.
///
/// `used_count` moves only through the repository's atomic increment, and
/// only when a booking that used the code reaches confirmed. The eligibility
/// and discount methods here are pure; "now" is always passed in.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Promotion {
    pub id: i32,
    pub code: String,
    pub promo_type: PromoType,
    pub value: Decimal,
    /// Below this base amount the promotion yields nothing
    pub min_amount: Option<Decimal>,
    /// Ceiling on the computed discount
    pub max_discount: Option<Decimal>,
    pub usage_limit: Option<i32>,
    pub used_count: i32,
    pub is_active: bool,
    pub starts_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Weekdays (1=Monday .. 7=Sunday) the code applies on; empty = all
    pub applicable_days: Vec<i16>,
    /// Services the code applies to; empty = all
    pub applicable_service_ids: Vec<i32>,
    pub crea_date: Option<DateTime<Utc>>,
}

impl Promotion {
    /// Active, inside its window, with usage headroom
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.starts_at <= now
            && now <= self.expires_at
            && self
                .usage_limit
                .map(|limit| self.used_count < limit)
                .unwrap_or(true)
    }

    /// Valid and matching the service/weekday restrictions
    pub fn is_applicable(&self, service_id: i32, date: NaiveDate, now: DateTime<Utc>) -> bool {
        if !self.is_valid(now) {
            return false;
        }
        if !self.applicable_service_ids.is_empty()
            && !self.applicable_service_ids.contains(&service_id)
        {
            return false;
        }
        let weekday = date.weekday().number_from_monday() as i16;
        self.applicable_days.is_empty() || self.applicable_days.contains(&weekday)
    }

    /// Monetary discount for a base amount, rounded to whole units.
    ///
    /// Zero below `min_amount`; capped by `max_discount`; never more than
    /// the amount itself and never negative.
    pub fn discount(&self, amount: Decimal) -> Decimal {
        if let Some(min) = self.min_amount {
            if amount < min {
                return Decimal::ZERO;
            }
        }
        let raw = match self.promo_type {
            PromoType::Percentage => amount * self.value / Decimal::from(100),
            PromoType::Fixed => self.value,
        };
        let capped = match self.max_discount {
            Some(max) if raw > max => max,
            _ => raw,
        };
        round_money(capped.min(amount).max(Decimal::ZERO))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn promo() -> Promotion {
        Promotion {
            id: 1,
            code: "SPRING20".to_string(),
            promo_type: PromoType::Percentage,
            value: Decimal::from(20),
            min_amount: None,
            max_discount: None,
            usage_limit: None,
            used_count: 0,
            is_active: true,
            starts_at: Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap(),
            expires_at: Utc.with_ymd_and_hms(2025, 5, 31, 23, 59, 59).unwrap(),
            applicable_days: Vec::new(),
            applicable_service_ids: Vec::new(),
            crea_date: None,
        }
    }

    fn in_window() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn valid_inside_window() {
        assert!(promo().is_valid(in_window()));
    }

    #[test]
    fn invalid_outside_window_or_inactive() {
        let p = promo();
        assert!(!p.is_valid(Utc.with_ymd_and_hms(2025, 2, 28, 0, 0, 0).unwrap()));
        assert!(!p.is_valid(Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap()));

        let mut p = promo();
        p.is_active = false;
        assert!(!p.is_valid(in_window()));
    }

    #[test]
    fn usage_cap_exhausts_validity() {
        let mut p = promo();
        p.usage_limit = Some(10);
        p.used_count = 9;
        assert!(p.is_valid(in_window()));
        p.used_count = 10;
        assert!(!p.is_valid(in_window()));
    }

    #[test]
    fn service_and_weekday_restrictions() {
        let mut p = promo();
        p.applicable_service_ids = vec![3, 4];
        // 2025-04-15 is a Tuesday (weekday 2)
        let date = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
        assert!(p.is_applicable(3, date, in_window()));
        assert!(!p.is_applicable(5, date, in_window()));

        p.applicable_days = vec![6, 7];
        assert!(!p.is_applicable(3, date, in_window()));
        let saturday = NaiveDate::from_ymd_opt(2025, 4, 19).unwrap();
        assert!(p.is_applicable(3, saturday, in_window()));
    }

    #[test]
    fn empty_restriction_sets_mean_all() {
        let p = promo();
        let date = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
        assert!(p.is_applicable(42, date, in_window()));
    }

    #[test]
    fn below_min_amount_yields_nothing() {
        let mut p = promo();
        p.min_amount = Some(Decimal::from(5_000));
        assert_eq!(p.discount(Decimal::from(4_000)), Decimal::ZERO);
    }

    #[test]
    fn twenty_percent_of_twenty_thousand() {
        let mut p = promo();
        p.min_amount = Some(Decimal::from(5_000));
        assert_eq!(p.discount(Decimal::from(20_000)), Decimal::from(4_000));
    }

    #[test]
    fn max_discount_caps_the_result() {
        let mut p = promo();
        p.max_discount = Some(Decimal::from(3_000));
        assert_eq!(p.discount(Decimal::from(20_000)), Decimal::from(3_000));
    }

    #[test]
    fn fixed_discount_never_exceeds_the_amount() {
        let mut p = promo();
        p.promo_type = PromoType::Fixed;
        p.value = Decimal::from(8_000);
        assert_eq!(p.discount(Decimal::from(6_500)), Decimal::from(6_500));
    }

    #[test]
    fn discount_is_bounded_by_zero_and_amount() {
        let p = promo();
        for amount in [0i64, 1, 999, 10_000, 250_000] {
            let amount = Decimal::from(amount);
            let d = p.discount(amount);
            assert!(d >= Decimal::ZERO);
            assert!(d <= amount);
        }
    }

    #[test]
    fn percentage_discount_rounds_half_up() {
        let mut p = promo();
        p.value = Decimal::from(15);
        // 15% of 3330 = 499.5 -> 500
        assert_eq!(p.discount(Decimal::from(3_330)), Decimal::from(500));
    }
}
