//! Clients repository (read-only collaborator records)

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::client::Client,
};

#[derive(Clone)]
pub struct ClientsRepository {
    pool: Pool<Postgres>,
}

impl ClientsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get client by ID
    pub async fn get_by_id(&self, id: i32) -> AppResult<Client> {
        sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Client {} not found", id)))
    }

    /// Get an active client by ID without treating absence as an error;
    /// booking validation reports unknown clients as bad input
    pub async fn find_active(&self, id: i32) -> AppResult<Option<Client>> {
        let client =
            sqlx::query_as::<_, Client>("SELECT * FROM clients WHERE id = $1 AND is_active")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(client)
    }
}
