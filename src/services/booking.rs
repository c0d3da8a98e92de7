//! Booking service: appointment creation and lifecycle orchestration

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;

use crate::{
    config::BookingConfig,
    error::{AppError, AppResult},
    models::{
        appointment::{Appointment, AppointmentStatus, BookAppointment, NewAppointment},
        service::Service,
    },
    repository::Repository,
    scheduling::{pricing::deposit_amount, slot_windows, TimeRange},
};

use super::availability::AvailabilityService;

#[derive(Clone)]
pub struct BookingService {
    repository: Repository,
    availability: AvailabilityService,
    config: BookingConfig,
}

impl BookingService {
    pub fn new(
        repository: Repository,
        availability: AvailabilityService,
        config: BookingConfig,
    ) -> Self {
        Self {
            repository,
            availability,
            config,
        }
    }

    /// Book a slot.
    ///
    /// Validates the request (service, client, window alignment, employee
    /// qualification), resolves "any employee" to a concrete one, prices the
    /// booking, then hands over to the repository's atomic check-and-reserve.
    /// A window lost between the advisory availability check and the commit
    /// surfaces as a Conflict the caller must resolve with the user.
    pub async fn create_appointment(
        &self,
        book: BookAppointment,
        now: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        let service = self
            .repository
            .services
            .find_active(book.service_id)
            .await?
            .ok_or_else(|| AppError::Validation("Unknown or inactive service".to_string()))?;
        self.repository
            .clients
            .find_active(book.client_id)
            .await?
            .ok_or_else(|| AppError::Validation("Unknown or inactive client".to_string()))?;

        let window = requested_window(book.start_time, service.duration_minutes);
        let employee_id = self
            .resolve_employee(&service, book.employee_id, book.date, window)
            .await?;

        let (total_price, promotion_id, promotion_discount) = self
            .price_booking(&service, book.promotion_code.as_deref(), book.date, now)
            .await?;

        let deposit = if service.requires_deposit {
            deposit_amount(total_price, service.deposit_percentage)
        } else {
            Decimal::ZERO
        };
        let status = if service.requires_deposit {
            AppointmentStatus::PendingDeposit
        } else {
            AppointmentStatus::Confirmed
        };

        let scheduled_at = book.date.and_time(window.start).and_utc();
        let ends_at = scheduled_at + Duration::minutes(service.duration_minutes as i64);

        let appointment = self
            .repository
            .appointments
            .create(&NewAppointment {
                service_id: service.id,
                client_id: book.client_id,
                employee_id,
                scheduled_at,
                ends_at,
                status,
                total_price,
                deposit_amount: deposit,
                promotion_id,
                promotion_discount,
                special_requests: book.special_requests,
                reference_photo: book.reference_photo,
            })
            .await?;

        tracing::info!(
            appointment_id = appointment.id,
            employee_id,
            %scheduled_at,
            status = %appointment.status,
            "appointment booked"
        );
        Ok(appointment)
    }

    /// Payment-webhook entry point; idempotent on replay
    pub async fn confirm_deposit(
        &self,
        id: i32,
        payment_reference: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        let appointment = self
            .repository
            .appointments
            .confirm_deposit(id, payment_reference, now)
            .await?;
        tracing::info!(appointment_id = id, "deposit confirmed");
        Ok(appointment)
    }

    pub async fn cancel(
        &self,
        id: i32,
        reason: &str,
        now: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        let appointment = self.repository.appointments.cancel(id, reason, now).await?;
        tracing::info!(appointment_id = id, reason, "appointment cancelled");
        Ok(appointment)
    }

    /// Move an appointment to a new window, within the reschedule limit
    pub async fn reschedule(
        &self,
        id: i32,
        employee_id: Option<i32>,
        date: NaiveDate,
        start_time: NaiveTime,
        now: DateTime<Utc>,
    ) -> AppResult<Appointment> {
        let appointment = self.repository.appointments.get_by_id(id).await?;
        let service = self
            .repository
            .services
            .get_by_id(appointment.service_id)
            .await?;

        let window = requested_window(start_time, service.duration_minutes);
        let target_employee = employee_id.unwrap_or(appointment.employee_id);
        if target_employee != appointment.employee_id
            && !self
                .repository
                .employees
                .is_qualified(target_employee, service.id)
                .await?
        {
            return Err(AppError::Validation(
                "Employee is not qualified for this service".to_string(),
            ));
        }
        self.ensure_window_in_schedule(&service, target_employee, date, window)
            .await?;

        let scheduled_at = date.and_time(window.start).and_utc();
        let ends_at = scheduled_at + Duration::minutes(service.duration_minutes as i64);

        let appointment = self
            .repository
            .appointments
            .reschedule(
                id,
                target_employee,
                scheduled_at,
                ends_at,
                self.config.max_reschedules,
                now,
            )
            .await?;
        tracing::info!(
            appointment_id = id,
            employee_id = target_employee,
            %scheduled_at,
            reschedule_count = appointment.reschedule_count,
            "appointment rescheduled"
        );
        Ok(appointment)
    }

    pub async fn complete(&self, id: i32, now: DateTime<Utc>) -> AppResult<Appointment> {
        self.repository.appointments.complete(id, now).await
    }

    pub async fn mark_no_show(&self, id: i32, now: DateTime<Utc>) -> AppResult<Appointment> {
        self.repository.appointments.mark_no_show(id, now).await
    }

    pub async fn get(&self, id: i32) -> AppResult<Appointment> {
        self.repository.appointments.get_by_id(id).await
    }

    pub async fn list_for_date(
        &self,
        date: NaiveDate,
        status: Option<AppointmentStatus>,
    ) -> AppResult<Vec<Appointment>> {
        self.repository.appointments.list_for_date(date, status).await
    }

    /// Confirmed appointments past their grace period, for admin alerting
    pub async fn list_overdue(&self, now: DateTime<Utc>) -> AppResult<Vec<Appointment>> {
        self.repository
            .appointments
            .list_overdue(now, self.config.overdue_grace_minutes)
            .await
    }

    /// Pick the employee who will take the booking: the requested one when
    /// the window sits in their schedule, otherwise the first qualified
    /// employee with the window still free.
    async fn resolve_employee(
        &self,
        service: &Service,
        employee_id: Option<i32>,
        date: NaiveDate,
        window: TimeRange,
    ) -> AppResult<i32> {
        if let Some(id) = employee_id {
            if !self.repository.employees.is_qualified(id, service.id).await? {
                return Err(AppError::Validation(
                    "Employee is not qualified for this service".to_string(),
                ));
            }
            self.ensure_window_in_schedule(service, id, date, window)
                .await?;
            return Ok(id);
        }

        let candidates = self
            .repository
            .employees
            .qualified_for_service(service.id)
            .await?;
        if candidates.is_empty() {
            return Err(AppError::Validation(
                "No employee performs this service".to_string(),
            ));
        }

        let mut any_scheduled = false;
        for employee in &candidates {
            if !self
                .window_in_schedule(service, employee.id, date, window)
                .await?
            {
                continue;
            }
            any_scheduled = true;
            let free = self
                .availability
                .free_windows(employee.id, service, date)
                .await?;
            if free.contains(&window) {
                return Ok(employee.id);
            }
        }

        if any_scheduled {
            Err(AppError::Conflict(
                "No employee is free at the requested time".to_string(),
            ))
        } else {
            Err(AppError::Validation(
                "Requested slot is outside every working interval".to_string(),
            ))
        }
    }

    /// The requested window must be one of the slots carved from the
    /// employee's working hours; anything else is malformed input, not a
    /// conflict.
    async fn ensure_window_in_schedule(
        &self,
        service: &Service,
        employee_id: i32,
        date: NaiveDate,
        window: TimeRange,
    ) -> AppResult<()> {
        if self
            .window_in_schedule(service, employee_id, date, window)
            .await?
        {
            Ok(())
        } else {
            Err(AppError::Validation(
                "Requested slot is outside the employee's working hours".to_string(),
            ))
        }
    }

    async fn window_in_schedule(
        &self,
        service: &Service,
        employee_id: i32,
        date: NaiveDate,
        window: TimeRange,
    ) -> AppResult<bool> {
        let weekday = date.weekday().number_from_monday() as i16;
        let intervals = self
            .repository
            .schedules
            .active_intervals(employee_id, weekday)
            .await?;
        Ok(intervals.iter().any(|interval| {
            slot_windows(interval.start_time, interval.end_time, service.duration_minutes)
                .contains(&window)
        }))
    }

    /// Price the booking, resolving an optional promotion code.
    /// Returns (total, promotion id, discount).
    async fn price_booking(
        &self,
        service: &Service,
        promotion_code: Option<&str>,
        date: NaiveDate,
        now: DateTime<Utc>,
    ) -> AppResult<(Decimal, Option<i32>, Decimal)> {
        let Some(code) = promotion_code else {
            return Ok((service.price, None, Decimal::ZERO));
        };

        let promotion = match self.repository.promotions.get_by_code(code).await {
            Ok(p) => p,
            Err(AppError::NotFound(_)) => {
                return Err(AppError::PromotionNotApplicable(format!(
                    "Unknown promotion code '{}'",
                    code
                )));
            }
            Err(e) => return Err(e),
        };

        if !promotion.is_applicable(service.id, date, now) {
            return Err(AppError::PromotionNotApplicable(format!(
                "Promotion '{}' does not apply to this booking",
                promotion.code
            )));
        }

        let discount = promotion.discount(service.price);
        Ok((service.price - discount, Some(promotion.id), discount))
    }
}

fn requested_window(start: NaiveTime, duration_minutes: i32) -> TimeRange {
    let end = start + Duration::minutes(duration_minutes as i64);
    TimeRange::new(start, end)
}
