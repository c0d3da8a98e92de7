//! Schedules repository (weekly working hours, blocked slots)

use chrono::{NaiveDate, NaiveTime, Utc};
use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::schedule::{BlockedSlot, CreateBlockedSlot, UpsertWorkingInterval, WorkingInterval},
};

#[derive(Clone)]
pub struct SchedulesRepository {
    pool: Pool<Postgres>,
}

fn parse_time(value: &str, field: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| AppError::Validation(format!("Invalid {} (use HH:MM)", field)))
}

fn parse_date(value: &str, field: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::Validation(format!("Invalid {} (use YYYY-MM-DD)", field)))
}

impl SchedulesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // ---- Working hours ----

    /// List all working-hour rows for an employee, ordered by weekday
    pub async fn working_hours(&self, employee_id: i32) -> AppResult<Vec<WorkingInterval>> {
        let rows = sqlx::query_as::<_, WorkingInterval>(
            "SELECT * FROM working_hours WHERE employee_id = $1 ORDER BY day_of_week, start_time",
        )
        .bind(employee_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Active intervals for one employee on one weekday (1=Monday .. 7=Sunday)
    pub async fn active_intervals(
        &self,
        employee_id: i32,
        day_of_week: i16,
    ) -> AppResult<Vec<WorkingInterval>> {
        let rows = sqlx::query_as::<_, WorkingInterval>(
            r#"
            SELECT * FROM working_hours
            WHERE employee_id = $1 AND day_of_week = $2 AND active
            ORDER BY start_time
            "#,
        )
        .bind(employee_id)
        .bind(day_of_week)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Upsert the working hours for one (employee, weekday).
    ///
    /// An active interval overlapping another active interval for the same
    /// weekday is rejected; availability math relies on active rows being
    /// disjoint.
    pub async fn upsert_interval(
        &self,
        employee_id: i32,
        data: &UpsertWorkingInterval,
    ) -> AppResult<WorkingInterval> {
        let start = parse_time(&data.start_time, "start_time")?;
        let end = parse_time(&data.end_time, "end_time")?;
        if start >= end {
            return Err(AppError::Validation(
                "start_time must be before end_time".to_string(),
            ));
        }

        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let existing_id: Option<i32> = sqlx::query_scalar(
            "SELECT id FROM working_hours WHERE employee_id = $1 AND day_of_week = $2",
        )
        .bind(employee_id)
        .bind(data.day_of_week)
        .fetch_optional(&mut *tx)
        .await?;

        if data.active {
            let overlapping: bool = sqlx::query_scalar(
                r#"
                SELECT EXISTS(
                    SELECT 1 FROM working_hours
                    WHERE employee_id = $1 AND day_of_week = $2 AND active
                      AND id IS DISTINCT FROM $3
                      AND start_time < $5 AND $4 < end_time
                )
                "#,
            )
            .bind(employee_id)
            .bind(data.day_of_week)
            .bind(existing_id)
            .bind(start)
            .bind(end)
            .fetch_one(&mut *tx)
            .await?;

            if overlapping {
                return Err(AppError::BusinessRule(
                    "Working hours overlap an existing active interval for that day".to_string(),
                ));
            }
        }

        let row = match existing_id {
            Some(id) => {
                sqlx::query_as::<_, WorkingInterval>(
                    r#"
                    UPDATE working_hours
                    SET start_time = $1, end_time = $2, active = $3, modif_date = $4
                    WHERE id = $5
                    RETURNING *
                    "#,
                )
                .bind(start)
                .bind(end)
                .bind(data.active)
                .bind(now)
                .bind(id)
                .fetch_one(&mut *tx)
                .await?
            }
            None => {
                sqlx::query_as::<_, WorkingInterval>(
                    r#"
                    INSERT INTO working_hours (employee_id, day_of_week, start_time, end_time, active)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING *
                    "#,
                )
                .bind(employee_id)
                .bind(data.day_of_week)
                .bind(start)
                .bind(end)
                .bind(data.active)
                .fetch_one(&mut *tx)
                .await?
            }
        };

        tx.commit().await?;
        Ok(row)
    }

    // ---- Blocked slots ----

    /// List blocked slots, optionally filtered by employee and date
    pub async fn list_blocked(
        &self,
        employee_id: Option<i32>,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<BlockedSlot>> {
        let rows = sqlx::query_as::<_, BlockedSlot>(
            r#"
            SELECT * FROM blocked_slots
            WHERE ($1::int IS NULL OR employee_id = $1)
              AND ($2::date IS NULL OR date = $2)
            ORDER BY date, start_time
            "#,
        )
        .bind(employee_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Blocked slots for one employee on one date
    pub async fn blocked_for_day(
        &self,
        employee_id: i32,
        date: NaiveDate,
    ) -> AppResult<Vec<BlockedSlot>> {
        let rows = sqlx::query_as::<_, BlockedSlot>(
            "SELECT * FROM blocked_slots WHERE employee_id = $1 AND date = $2 ORDER BY start_time",
        )
        .bind(employee_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Create a blocked slot
    pub async fn create_blocked(&self, data: &CreateBlockedSlot) -> AppResult<BlockedSlot> {
        let date = parse_date(&data.date, "date")?;
        let start = parse_time(&data.start_time, "start_time")?;
        let end = parse_time(&data.end_time, "end_time")?;
        if start >= end {
            return Err(AppError::Validation(
                "start_time must be before end_time".to_string(),
            ));
        }

        let row = sqlx::query_as::<_, BlockedSlot>(
            r#"
            INSERT INTO blocked_slots (employee_id, date, start_time, end_time, reason)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(data.employee_id)
        .bind(date)
        .bind(start)
        .bind(end)
        .bind(&data.reason)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Delete a blocked slot
    pub async fn delete_blocked(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM blocked_slots WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Blocked slot {} not found", id)));
        }
        Ok(())
    }
}
