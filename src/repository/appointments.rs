//! Appointments repository: atomic slot reservation and lifecycle writes
//!
//! Every reservation-changing operation runs inside a transaction that takes
//! a per-employee advisory lock before re-checking conflicts, so two
//! concurrent bookings of the same window cannot both pass the check. A
//! partial unique index on (employee_id, scheduled_at) over slot-blocking
//! statuses backstops the same invariant at the constraint level.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use sqlx::{PgConnection, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::appointment::{Appointment, AppointmentStatus, NewAppointment},
};

use super::promotions::PromotionsRepository;

/// Advisory-lock class for slot reservation, paired with the employee id
const RESERVATION_LOCK_CLASS: i32 = 0x4f50;

/// Statuses whose appointments keep their window reserved
const BLOCKING_STATUSES: &str = "('pending_deposit', 'confirmed', 'completed', 'rescheduled')";

#[derive(Clone)]
pub struct AppointmentsRepository {
    pool: Pool<Postgres>,
    promotions: PromotionsRepository,
}

impl AppointmentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            promotions: PromotionsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Get appointment by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Appointment> {
        sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
    }

    /// Appointments holding a slot for one employee on one date
    pub async fn blocking_for_day(
        &self,
        employee_id: i32,
        date: NaiveDate,
    ) -> AppResult<Vec<Appointment>> {
        let day_start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let day_end = day_start + Duration::days(1);
        let rows = sqlx::query_as::<_, Appointment>(&format!(
            r#"
            SELECT * FROM appointments
            WHERE employee_id = $1
              AND scheduled_at >= $2 AND scheduled_at < $3
              AND status IN {BLOCKING_STATUSES}
            ORDER BY scheduled_at
            "#,
        ))
        .bind(employee_id)
        .bind(day_start)
        .bind(day_end)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Admin listing for one date, optionally narrowed to one status
    pub async fn list_for_date(
        &self,
        date: NaiveDate,
        status: Option<AppointmentStatus>,
    ) -> AppResult<Vec<Appointment>> {
        let day_start = date.and_hms_opt(0, 0, 0).unwrap().and_utc();
        let day_end = day_start + Duration::days(1);
        let rows = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE scheduled_at >= $1 AND scheduled_at < $2
              AND ($3::appointment_status IS NULL OR status = $3)
            ORDER BY scheduled_at, employee_id
            "#,
        )
        .bind(day_start)
        .bind(day_end)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Confirmed appointments (including rescheduled ones whose deposit is
    /// settled) whose start has slipped more than the grace period into the
    /// past. Admin alerting only; nothing is transitioned here.
    pub async fn list_overdue(
        &self,
        now: DateTime<Utc>,
        grace_minutes: i64,
    ) -> AppResult<Vec<Appointment>> {
        let rows = sqlx::query_as::<_, Appointment>(
            r#"
            SELECT * FROM appointments
            WHERE (status = 'confirmed'
                   OR (status = 'rescheduled' AND (deposit_paid OR deposit_amount = 0)))
              AND scheduled_at + make_interval(mins => $2::int) < $1
            ORDER BY scheduled_at
            "#,
        )
        .bind(now)
        .bind(grace_minutes as i32)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Atomically check-and-reserve the window and insert the appointment.
    ///
    /// Availability seen by the caller is advisory; this re-check under the
    /// employee's advisory lock is the one that counts. Promotion usage is
    /// consumed in the same transaction when the booking is born confirmed.
    pub async fn create(&self, new: &NewAppointment) -> AppResult<Appointment> {
        let mut tx = self.pool.begin().await?;

        lock_employee(&mut *tx, new.employee_id).await?;
        ensure_window_free(&mut *tx, new.employee_id, new.scheduled_at, new.ends_at, None).await?;

        let row = sqlx::query_as::<_, Appointment>(
            r#"
            INSERT INTO appointments (
                service_id, client_id, employee_id, scheduled_at, ends_at,
                status, total_price, deposit_amount, promotion_id,
                promotion_discount, special_requests, reference_photo
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING *
            "#,
        )
        .bind(new.service_id)
        .bind(new.client_id)
        .bind(new.employee_id)
        .bind(new.scheduled_at)
        .bind(new.ends_at)
        .bind(new.status)
        .bind(new.total_price)
        .bind(new.deposit_amount)
        .bind(new.promotion_id)
        .bind(new.promotion_discount)
        .bind(&new.special_requests)
        .bind(&new.reference_photo)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_reservation_conflict)?;

        if new.status == AppointmentStatus::Confirmed {
            if let Some(promotion_id) = new.promotion_id {
                consume_promotion(&self.promotions, &mut tx, promotion_id, row.id).await?;
            }
        }

        tx.commit().await?;
        Ok(row)
    }

    /// Payment-webhook transition: pending deposit -> confirmed.
    ///
    /// Idempotent: replaying the confirmation for an appointment that is
    /// already (effectively) confirmed returns it unchanged.
    pub async fn confirm_deposit(
        &self,
        id: i32,
        payment_reference: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        let mut tx = self.pool.begin().await?;
        let appt = fetch_for_update(&mut tx, id).await?;

        match appt.effective_status() {
            AppointmentStatus::Confirmed => {
                tx.commit().await?;
                return Ok(appt);
            }
            AppointmentStatus::PendingDeposit => {}
            other => {
                return Err(AppError::InvalidState(format!(
                    "Cannot confirm deposit for appointment {} in status {}",
                    id, other
                )));
            }
        }

        let row = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET status = 'confirmed', deposit_paid = TRUE, deposit_paid_at = $1,
                payment_reference = $2, modif_date = $1
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(now)
        .bind(payment_reference)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(promotion_id) = row.promotion_id {
            consume_promotion(&self.promotions, &mut tx, promotion_id, row.id).await?;
        }

        tx.commit().await?;
        Ok(row)
    }

    /// Cancel from pending-deposit or confirmed; the window is released by
    /// virtue of the status no longer blocking.
    pub async fn cancel(
        &self,
        id: i32,
        reason: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        let mut tx = self.pool.begin().await?;
        let appt = fetch_for_update(&mut tx, id).await?;

        if !appt.can_transition_to(AppointmentStatus::Cancelled) {
            return Err(AppError::InvalidState(format!(
                "Cannot cancel appointment {} in status {}",
                id,
                appt.effective_status()
            )));
        }

        let row = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET status = 'cancelled',
                admin_notes = COALESCE(admin_notes || E'\n', '') || 'Cancelled: ' || $1,
                modif_date = $2
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(reason)
        .bind(now)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Mark a confirmed appointment completed
    pub async fn complete(&self, id: i32, now: DateTime<Utc>) -> AppResult<Appointment> {
        self.transition(id, AppointmentStatus::Completed, now).await
    }

    /// Mark a confirmed appointment as a no-show; only meaningful once the
    /// scheduled time has passed.
    pub async fn mark_no_show(&self, id: i32, now: DateTime<Utc>) -> AppResult<Appointment> {
        let appt = self.get_by_id(id).await?;
        if now < appt.scheduled_at {
            return Err(AppError::BusinessRule(format!(
                "Appointment {} has not started yet; no-show applies after the scheduled time",
                id
            )));
        }
        self.transition(id, AppointmentStatus::NoShow, now).await
    }

    async fn transition(
        &self,
        id: i32,
        target: AppointmentStatus,
        now: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        let mut tx = self.pool.begin().await?;
        let appt = fetch_for_update(&mut tx, id).await?;

        if !appt.can_transition_to(target) {
            return Err(AppError::InvalidState(format!(
                "Cannot move appointment {} from {} to {}",
                id,
                appt.effective_status(),
                target
            )));
        }

        let row = sqlx::query_as::<_, Appointment>(
            "UPDATE appointments SET status = $1, modif_date = $2 WHERE id = $3 RETURNING *",
        )
        .bind(target)
        .bind(now)
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    /// Move an appointment to a new window: release-old/reserve-new as a
    /// single transaction, bumping the reschedule counter.
    pub async fn reschedule(
        &self,
        id: i32,
        employee_id: i32,
        scheduled_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
        max_reschedules: i16,
        now: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        let mut tx = self.pool.begin().await?;
        let appt = fetch_for_update(&mut tx, id).await?;

        if appt.effective_status().is_terminal() {
            return Err(AppError::InvalidState(format!(
                "Cannot reschedule appointment {} in status {}",
                id,
                appt.effective_status()
            )));
        }
        if !appt.can_be_rescheduled(max_reschedules) {
            return Err(AppError::RescheduleLimitExceeded(format!(
                "Appointment {} has already been rescheduled {} times",
                id, appt.reschedule_count
            )));
        }

        lock_employee(&mut *tx, employee_id).await?;
        ensure_window_free(&mut *tx, employee_id, scheduled_at, ends_at, Some(id)).await?;

        let row = sqlx::query_as::<_, Appointment>(
            r#"
            UPDATE appointments
            SET employee_id = $1, scheduled_at = $2, ends_at = $3,
                status = 'rescheduled', reschedule_count = reschedule_count + 1,
                modif_date = $4
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(employee_id)
        .bind(scheduled_at)
        .bind(ends_at)
        .bind(now)
        .bind(id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_reservation_conflict)?;

        tx.commit().await?;
        Ok(row)
    }
}

/// Serialize reservations per employee for the rest of the transaction
async fn lock_employee(tx: &mut PgConnection, employee_id: i32) -> AppResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock($1, $2)")
        .bind(RESERVATION_LOCK_CLASS)
        .bind(employee_id)
        .execute(tx)
        .await?;
    Ok(())
}

/// Re-check, under the advisory lock, that [start, end) collides with no
/// blocking appointment and no blocked slot for this employee.
async fn ensure_window_free(
    tx: &mut PgConnection,
    employee_id: i32,
    scheduled_at: DateTime<Utc>,
    ends_at: DateTime<Utc>,
    exclude_appointment: Option<i32>,
) -> AppResult<()> {
    let booked: bool = sqlx::query_scalar(&format!(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM appointments
            WHERE employee_id = $1
              AND id IS DISTINCT FROM $4
              AND status IN {BLOCKING_STATUSES}
              AND scheduled_at < $3 AND ends_at > $2
        )
        "#,
    ))
    .bind(employee_id)
    .bind(scheduled_at)
    .bind(ends_at)
    .bind(exclude_appointment)
    .fetch_one(&mut *tx)
    .await?;

    if booked {
        return Err(AppError::Conflict(
            "Slot is no longer available".to_string(),
        ));
    }

    let blocked: bool = sqlx::query_scalar(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM blocked_slots
            WHERE employee_id = $1
              AND date = $2::date
              AND start_time < $4::time AND $3::time < end_time
        )
        "#,
    )
    .bind(employee_id)
    .bind(scheduled_at.date_naive())
    .bind(scheduled_at.time())
    .bind(ends_at.time())
    .fetch_one(&mut *tx)
    .await?;

    if blocked {
        return Err(AppError::Conflict("Slot is blocked".to_string()));
    }

    Ok(())
}

async fn consume_promotion(
    promotions: &PromotionsRepository,
    tx: &mut sqlx::Transaction<'_, Postgres>,
    promotion_id: i32,
    appointment_id: i32,
) -> AppResult<()> {
    let consumed = promotions.increment_usage(&mut **tx, promotion_id).await?;
    if !consumed {
        // a code that hit its cap between booking and payment does not fail
        // a paid confirmation; the discount was already granted
        tracing::warn!(
            appointment_id,
            promotion_id,
            "promotion usage cap reached before confirmation; usage not counted"
        );
    }
    Ok(())
}

async fn fetch_for_update(
    tx: &mut sqlx::Transaction<'_, Postgres>,
    id: i32,
) -> AppResult<Appointment> {
    sqlx::query_as::<_, Appointment>("SELECT * FROM appointments WHERE id = $1 FOR UPDATE")
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Appointment {} not found", id)))
}

/// The partial unique index on (employee_id, scheduled_at) is the last line
/// of defense; surface its violation as the same conflict the explicit
/// re-check produces.
fn map_reservation_conflict(err: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(ref db) = err {
        if db.constraint() == Some("appointments_active_slot_idx") {
            return AppError::Conflict("Slot is no longer available".to_string());
        }
    }
    AppError::Database(err)
}
