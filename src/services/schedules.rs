//! Schedules service (working hours, blocked slots)

use chrono::NaiveDate;

use crate::{
    error::AppResult,
    models::schedule::{BlockedSlot, CreateBlockedSlot, UpsertWorkingInterval, WorkingInterval},
    repository::Repository,
};

#[derive(Clone)]
pub struct SchedulesService {
    repository: Repository,
}

impl SchedulesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // ---- Working hours ----

    pub async fn working_hours(&self, employee_id: i32) -> AppResult<Vec<WorkingInterval>> {
        // Verify employee exists
        self.repository.employees.get_by_id(employee_id).await?;
        self.repository.schedules.working_hours(employee_id).await
    }

    pub async fn upsert_working_hours(
        &self,
        employee_id: i32,
        data: &UpsertWorkingInterval,
    ) -> AppResult<WorkingInterval> {
        self.repository.employees.get_by_id(employee_id).await?;
        self.repository
            .schedules
            .upsert_interval(employee_id, data)
            .await
    }

    // ---- Blocked slots ----

    pub async fn list_blocked(
        &self,
        employee_id: Option<i32>,
        date: Option<NaiveDate>,
    ) -> AppResult<Vec<BlockedSlot>> {
        self.repository.schedules.list_blocked(employee_id, date).await
    }

    pub async fn create_blocked(&self, data: &CreateBlockedSlot) -> AppResult<BlockedSlot> {
        self.repository.employees.get_by_id(data.employee_id).await?;
        self.repository.schedules.create_blocked(data).await
    }

    pub async fn delete_blocked(&self, id: i32) -> AppResult<()> {
        self.repository.schedules.delete_blocked(id).await
    }
}
