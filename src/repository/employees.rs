//! Employees repository (read-only collaborator records + qualifications)

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::employee::Employee,
};

#[derive(Clone)]
pub struct EmployeesRepository {
    pool: Pool<Postgres>,
}

impl EmployeesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get employee by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Employee> {
        sqlx::query_as::<_, Employee>("SELECT * FROM employees WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Employee {} not found", id)))
    }

    /// List active employees, ordered by name
    pub async fn list_active(&self) -> AppResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, Employee>(
            "SELECT * FROM employees WHERE is_active ORDER BY last_name, first_name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Active employees with an active assignment to the given service
    pub async fn qualified_for_service(&self, service_id: i32) -> AppResult<Vec<Employee>> {
        let rows = sqlx::query_as::<_, Employee>(
            r#"
            SELECT e.*
            FROM employees e
            JOIN employee_services es ON es.employee_id = e.id
            WHERE es.service_id = $1 AND es.active AND e.is_active
            ORDER BY e.id
            "#,
        )
        .bind(service_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Does this active employee hold an active assignment to the service?
    pub async fn is_qualified(&self, employee_id: i32, service_id: i32) -> AppResult<bool> {
        let qualified: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM employee_services es
                JOIN employees e ON e.id = es.employee_id
                WHERE es.employee_id = $1 AND es.service_id = $2
                  AND es.active AND e.is_active
            )
            "#,
        )
        .bind(employee_id)
        .bind(service_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(qualified)
    }
}
