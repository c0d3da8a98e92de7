//! Appointment model and lifecycle state machine

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

// ---------------------------------------------------------------------------
// AppointmentStatus
// ---------------------------------------------------------------------------

/// Closed appointment status set.
///
/// `Rescheduled` is a transient tag, not a dead end: for every lifecycle
/// decision it resolves to `PendingDeposit` or `Confirmed` through
/// [`Appointment::effective_status`], depending on whether the deposit has
/// been settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "appointment_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    PendingDeposit,
    Confirmed,
    Completed,
    Cancelled,
    NoShow,
    Rescheduled,
}

impl AppointmentStatus {
    /// Terminal states admit no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::Completed | AppointmentStatus::Cancelled | AppointmentStatus::NoShow
        )
    }

    /// Does an appointment in this status keep its slot reserved?
    /// Cancelled and no-show appointments release their window.
    pub fn blocks_slot(&self) -> bool {
        matches!(
            self,
            AppointmentStatus::PendingDeposit
                | AppointmentStatus::Confirmed
                | AppointmentStatus::Completed
                | AppointmentStatus::Rescheduled
        )
    }

    /// Valid next statuses from this one. `Rescheduled` must be resolved to
    /// its effective status before consulting the table.
    pub fn valid_transitions(&self) -> &'static [AppointmentStatus] {
        match self {
            AppointmentStatus::PendingDeposit => &[
                AppointmentStatus::Confirmed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::Rescheduled,
            ],
            AppointmentStatus::Confirmed => &[
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
                AppointmentStatus::Rescheduled,
            ],
            AppointmentStatus::Rescheduled => &[
                AppointmentStatus::Confirmed,
                AppointmentStatus::Completed,
                AppointmentStatus::Cancelled,
                AppointmentStatus::NoShow,
                AppointmentStatus::Rescheduled,
            ],
            AppointmentStatus::Completed
            | AppointmentStatus::Cancelled
            | AppointmentStatus::NoShow => &[],
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AppointmentStatus::PendingDeposit => "pending_deposit",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Completed => "completed",
            AppointmentStatus::Cancelled => "cancelled",
            AppointmentStatus::NoShow => "no_show",
            AppointmentStatus::Rescheduled => "rescheduled",
        };
        write!(f, "{}", label)
    }
}

// ---------------------------------------------------------------------------
// Appointment
// ---------------------------------------------------------------------------

/// Appointment model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Appointment {
    pub id: i32,
    pub service_id: i32,
    pub client_id: i32,
    pub employee_id: i32,
    pub scheduled_at: DateTime<Utc>,
    /// Always scheduled_at + the service duration captured at booking time
    pub ends_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    /// Service price minus any promotion discount
    pub total_price: Decimal,
    /// Required upfront payment; zero when the service needs no deposit
    pub deposit_amount: Decimal,
    pub deposit_paid: bool,
    pub deposit_paid_at: Option<DateTime<Utc>>,
    pub payment_reference: Option<String>,
    pub promotion_id: Option<i32>,
    pub promotion_discount: Decimal,
    pub reschedule_count: i16,
    pub special_requests: Option<String>,
    pub reference_photo: Option<String>,
    pub admin_notes: Option<String>,
    pub crea_date: Option<DateTime<Utc>>,
    pub modif_date: Option<DateTime<Utc>>,
}

impl Appointment {
    /// Resolve the `Rescheduled` tag to the state the appointment actually
    /// lives in: confirmed when its deposit is settled (paid, or none was
    /// ever required), pending otherwise. Every other status maps to itself.
    pub fn effective_status(&self) -> AppointmentStatus {
        match self.status {
            AppointmentStatus::Rescheduled => {
                if self.deposit_paid || self.deposit_amount.is_zero() {
                    AppointmentStatus::Confirmed
                } else {
                    AppointmentStatus::PendingDeposit
                }
            }
            other => other,
        }
    }

    /// Is the transition to `target` allowed from the current state?
    pub fn can_transition_to(&self, target: AppointmentStatus) -> bool {
        self.effective_status().valid_transitions().contains(&target)
    }

    /// Reschedule guard: non-terminal and still under the limit
    pub fn can_be_rescheduled(&self, max_reschedules: i16) -> bool {
        !self.effective_status().is_terminal() && self.reschedule_count < max_reschedules
    }

    /// A confirmed appointment whose start has slipped more than the grace
    /// period into the past. Derived only, for admin alerting; it never
    /// transitions state by itself.
    pub fn is_overdue(&self, now: DateTime<Utc>, grace_minutes: i64) -> bool {
        self.effective_status() == AppointmentStatus::Confirmed
            && now > self.scheduled_at + Duration::minutes(grace_minutes)
    }
}

// ---------------------------------------------------------------------------
// Booking inputs
// ---------------------------------------------------------------------------

/// A booking request as the service layer consumes it: the slot is still a
/// wish, the employee possibly unchosen, the promotion just a code.
#[derive(Debug, Clone)]
pub struct BookAppointment {
    pub service_id: i32,
    pub client_id: i32,
    /// None = "any employee"; resolved to a concrete employee before insert
    pub employee_id: Option<i32>,
    pub date: chrono::NaiveDate,
    pub start_time: chrono::NaiveTime,
    pub special_requests: Option<String>,
    pub reference_photo: Option<String>,
    pub promotion_code: Option<String>,
}

/// Fully resolved booking, ready for the atomic check-and-reserve insert
#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub service_id: i32,
    pub client_id: i32,
    pub employee_id: i32,
    pub scheduled_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub total_price: Decimal,
    pub deposit_amount: Decimal,
    pub promotion_id: Option<i32>,
    pub promotion_discount: Decimal,
    pub special_requests: Option<String>,
    pub reference_photo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn appointment(status: AppointmentStatus) -> Appointment {
        Appointment {
            id: 1,
            service_id: 1,
            client_id: 1,
            employee_id: 1,
            scheduled_at: Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0).unwrap(),
            ends_at: Utc.with_ymd_and_hms(2025, 6, 2, 14, 30, 0).unwrap(),
            status,
            total_price: Decimal::from(10_000),
            deposit_amount: Decimal::from(5_000),
            deposit_paid: false,
            deposit_paid_at: None,
            payment_reference: None,
            promotion_id: None,
            promotion_discount: Decimal::ZERO,
            reschedule_count: 0,
            special_requests: None,
            reference_photo: None,
            admin_notes: None,
            crea_date: None,
            modif_date: None,
        }
    }

    #[test]
    fn terminal_states_admit_no_transitions() {
        for status in [
            AppointmentStatus::Completed,
            AppointmentStatus::Cancelled,
            AppointmentStatus::NoShow,
        ] {
            assert!(status.is_terminal());
            assert!(status.valid_transitions().is_empty());
        }
    }

    #[test]
    fn cancelled_and_no_show_release_their_slot() {
        assert!(!AppointmentStatus::Cancelled.blocks_slot());
        assert!(!AppointmentStatus::NoShow.blocks_slot());
        assert!(AppointmentStatus::PendingDeposit.blocks_slot());
        assert!(AppointmentStatus::Confirmed.blocks_slot());
        assert!(AppointmentStatus::Rescheduled.blocks_slot());
        assert!(AppointmentStatus::Completed.blocks_slot());
    }

    #[test]
    fn pending_deposit_cannot_complete_or_no_show() {
        let appt = appointment(AppointmentStatus::PendingDeposit);
        assert!(appt.can_transition_to(AppointmentStatus::Confirmed));
        assert!(appt.can_transition_to(AppointmentStatus::Cancelled));
        assert!(!appt.can_transition_to(AppointmentStatus::Completed));
        assert!(!appt.can_transition_to(AppointmentStatus::NoShow));
    }

    #[test]
    fn confirmed_can_complete_cancel_or_no_show() {
        let appt = appointment(AppointmentStatus::Confirmed);
        assert!(appt.can_transition_to(AppointmentStatus::Completed));
        assert!(appt.can_transition_to(AppointmentStatus::Cancelled));
        assert!(appt.can_transition_to(AppointmentStatus::NoShow));
        assert!(!appt.can_transition_to(AppointmentStatus::PendingDeposit));
    }

    #[test]
    fn rescheduled_with_paid_deposit_acts_as_confirmed() {
        let mut appt = appointment(AppointmentStatus::Rescheduled);
        appt.deposit_paid = true;
        assert_eq!(appt.effective_status(), AppointmentStatus::Confirmed);
        assert!(appt.can_transition_to(AppointmentStatus::Completed));
        assert!(appt.can_transition_to(AppointmentStatus::NoShow));
    }

    #[test]
    fn rescheduled_without_deposit_requirement_acts_as_confirmed() {
        let mut appt = appointment(AppointmentStatus::Rescheduled);
        appt.deposit_amount = Decimal::ZERO;
        assert_eq!(appt.effective_status(), AppointmentStatus::Confirmed);
    }

    #[test]
    fn rescheduled_with_unpaid_deposit_acts_as_pending() {
        let appt = appointment(AppointmentStatus::Rescheduled);
        assert_eq!(appt.effective_status(), AppointmentStatus::PendingDeposit);
        assert!(!appt.can_transition_to(AppointmentStatus::Completed));
        assert!(appt.can_transition_to(AppointmentStatus::Confirmed));
    }

    #[test]
    fn reschedule_limit_allows_two_then_refuses() {
        let mut appt = appointment(AppointmentStatus::Confirmed);
        assert!(appt.can_be_rescheduled(2));
        appt.reschedule_count = 1;
        assert!(appt.can_be_rescheduled(2));
        appt.reschedule_count = 2;
        assert!(!appt.can_be_rescheduled(2));
    }

    #[test]
    fn terminal_appointments_cannot_be_rescheduled() {
        let appt = appointment(AppointmentStatus::Cancelled);
        assert!(!appt.can_be_rescheduled(2));
    }

    #[test]
    fn confirmed_eleven_minutes_late_is_overdue() {
        let appt = appointment(AppointmentStatus::Confirmed);
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 14, 11, 0).unwrap();
        assert!(appt.is_overdue(now, 10));
    }

    #[test]
    fn grace_boundary_is_exclusive() {
        let appt = appointment(AppointmentStatus::Confirmed);
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 14, 10, 0).unwrap();
        assert!(!appt.is_overdue(now, 10));
    }

    #[test]
    fn completed_appointment_is_never_overdue() {
        let appt = appointment(AppointmentStatus::Completed);
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 14, 11, 0).unwrap();
        assert!(!appt.is_overdue(now, 10));
    }

    #[test]
    fn pending_deposit_is_not_overdue() {
        let appt = appointment(AppointmentStatus::PendingDeposit);
        let now = Utc.with_ymd_and_hms(2025, 6, 2, 15, 0, 0).unwrap();
        assert!(!appt.is_overdue(now, 10));
    }
}
