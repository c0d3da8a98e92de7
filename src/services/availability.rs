//! Availability resolution: working hours minus what is already taken

use chrono::{Datelike, Duration, NaiveDate};

use crate::{
    config::BookingConfig,
    error::{AppError, AppResult},
    models::{
        service::Service,
        slot::{Slot, SlotStatus},
    },
    repository::Repository,
    scheduling::{slot_windows, subtract_busy, TimeRange},
};

#[derive(Clone)]
pub struct AvailabilityService {
    repository: Repository,
    config: BookingConfig,
}

impl AvailabilityService {
    pub fn new(repository: Repository, config: BookingConfig) -> Self {
        Self { repository, config }
    }

    /// Free slots for a service on a date, across one or all qualified
    /// employees.
    ///
    /// Unknown services and unqualified employees yield an empty list rather
    /// than an error; booking UIs treat "no slots" uniformly no matter the
    /// cause.
    pub async fn available_slots(
        &self,
        service_id: i32,
        date: NaiveDate,
        employee_id: Option<i32>,
    ) -> AppResult<Vec<Slot>> {
        let Some(service) = self.repository.services.find_active(service_id).await? else {
            return Ok(Vec::new());
        };

        let mut slots = Vec::new();
        for candidate in self.candidate_employees(&service, employee_id).await? {
            let free = self.free_windows(candidate, &service, date).await?;
            slots.extend(free.into_iter().map(|w| Slot {
                service_id: service.id,
                employee_id: candidate,
                date,
                start_time: w.start,
                end_time: w.end,
                duration_minutes: service.duration_minutes,
                status: SlotStatus::Available,
                appointment_id: None,
            }));
        }

        // chronological; same-time slots from different employees are all
        // distinct bookable options
        slots.sort_by_key(|s| (s.start_time, s.employee_id));
        Ok(slots)
    }

    /// Dates in [start_date, end_date] with at least one free slot
    pub async fn available_days(
        &self,
        service_id: i32,
        start_date: NaiveDate,
        end_date: NaiveDate,
        employee_id: Option<i32>,
    ) -> AppResult<Vec<NaiveDate>> {
        if end_date < start_date {
            return Err(AppError::Validation(
                "end_date must not precede start_date".to_string(),
            ));
        }
        if (end_date - start_date) > Duration::days(self.config.max_day_range) {
            return Err(AppError::Validation(format!(
                "Date range exceeds {} days",
                self.config.max_day_range
            )));
        }

        let mut days = Vec::new();
        let mut date = start_date;
        while date <= end_date {
            if !self
                .available_slots(service_id, date, employee_id)
                .await?
                .is_empty()
            {
                days.push(date);
            }
            date = date + Duration::days(1);
        }
        Ok(days)
    }

    /// Full slot grid for one employee and one date: every window from the
    /// working hours, marked available, reserved (with the owning
    /// appointment) or blocked. Admin day view.
    pub async fn day_grid(
        &self,
        employee_id: i32,
        service_id: i32,
        date: NaiveDate,
    ) -> AppResult<Vec<Slot>> {
        let Some(service) = self.repository.services.find_active(service_id).await? else {
            return Ok(Vec::new());
        };

        let windows = self.all_windows(employee_id, &service, date).await?;
        let appointments = self
            .repository
            .appointments
            .blocking_for_day(employee_id, date)
            .await?;
        let blocked = self
            .repository
            .schedules
            .blocked_for_day(employee_id, date)
            .await?;

        let grid = windows
            .into_iter()
            .map(|w| {
                let reserved_by = appointments.iter().find(|a| {
                    w.overlaps(&TimeRange::new(a.scheduled_at.time(), a.ends_at.time()))
                });
                let (status, appointment_id) = if let Some(appt) = reserved_by {
                    (SlotStatus::Reserved, Some(appt.id))
                } else if blocked
                    .iter()
                    .any(|b| w.overlaps(&TimeRange::new(b.start_time, b.end_time)))
                {
                    (SlotStatus::Blocked, None)
                } else {
                    (SlotStatus::Available, None)
                };
                Slot {
                    service_id: service.id,
                    employee_id,
                    date,
                    start_time: w.start,
                    end_time: w.end,
                    duration_minutes: service.duration_minutes,
                    status,
                    appointment_id,
                }
            })
            .collect();
        Ok(grid)
    }

    /// Candidate employees: the given one when qualified and scheduled that
    /// weekday, otherwise every qualified employee. Unqualified explicit
    /// choices resolve to no candidates.
    async fn candidate_employees(
        &self,
        service: &Service,
        employee_id: Option<i32>,
    ) -> AppResult<Vec<i32>> {
        match employee_id {
            Some(id) => {
                if self.repository.employees.is_qualified(id, service.id).await? {
                    Ok(vec![id])
                } else {
                    Ok(Vec::new())
                }
            }
            None => {
                let employees = self
                    .repository
                    .employees
                    .qualified_for_service(service.id)
                    .await?;
                Ok(employees.into_iter().map(|e| e.id).collect())
            }
        }
    }

    /// All candidate windows for an employee's active intervals on a date
    async fn all_windows(
        &self,
        employee_id: i32,
        service: &Service,
        date: NaiveDate,
    ) -> AppResult<Vec<TimeRange>> {
        let weekday = date.weekday().number_from_monday() as i16;
        let intervals = self
            .repository
            .schedules
            .active_intervals(employee_id, weekday)
            .await?;

        let mut windows = Vec::new();
        for interval in intervals {
            windows.extend(slot_windows(
                interval.start_time,
                interval.end_time,
                service.duration_minutes,
            ));
        }
        Ok(windows)
    }

    /// Candidate windows minus existing reservations and explicit blocks
    pub(crate) async fn free_windows(
        &self,
        employee_id: i32,
        service: &Service,
        date: NaiveDate,
    ) -> AppResult<Vec<TimeRange>> {
        let windows = self.all_windows(employee_id, service, date).await?;
        if windows.is_empty() {
            return Ok(windows);
        }

        let mut busy = Vec::new();
        for appt in self
            .repository
            .appointments
            .blocking_for_day(employee_id, date)
            .await?
        {
            busy.push(TimeRange::new(appt.scheduled_at.time(), appt.ends_at.time()));
        }
        for block in self
            .repository
            .schedules
            .blocked_for_day(employee_id, date)
            .await?
        {
            busy.push(TimeRange::new(block.start_time, block.end_time));
        }

        Ok(subtract_busy(windows, &busy))
    }
}
