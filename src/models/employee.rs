//! Employee model (read-only collaborator record)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

/// A salon employee. Which services an employee performs is recorded in the
/// `employee_services` assignment table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Employee {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}
