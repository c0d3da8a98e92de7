//! Services repository (read-only collaborator records)

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::service::Service,
};

#[derive(Clone)]
pub struct ServicesRepository {
    pool: Pool<Postgres>,
}

impl ServicesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get service by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Service> {
        sqlx::query_as::<_, Service>("SELECT * FROM services WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Service {} not found", id)))
    }

    /// Get service by ID without treating absence as an error.
    /// Availability lookups answer "no slots" for unknown services.
    pub async fn find_active(&self, id: i32) -> AppResult<Option<Service>> {
        let service = sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE id = $1 AND is_active",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(service)
    }

    /// List active services, ordered by name
    pub async fn list_active(&self) -> AppResult<Vec<Service>> {
        let rows = sqlx::query_as::<_, Service>(
            "SELECT * FROM services WHERE is_active ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
