//! Promotions repository

use sqlx::{Executor, Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::promotion::Promotion,
};

#[derive(Clone)]
pub struct PromotionsRepository {
    pool: Pool<Postgres>,
}

impl PromotionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Get promotion by code (case-insensitive)
    pub async fn get_by_code(&self, code: &str) -> AppResult<Promotion> {
        sqlx::query_as::<_, Promotion>("SELECT * FROM promotions WHERE UPPER(code) = UPPER($1)")
            .bind(code)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Promotion '{}' not found", code)))
    }

    /// Count one use of the promotion, guarded by its usage cap.
    ///
    /// A single conditional UPDATE, so concurrent confirmations cannot push
    /// used_count past usage_limit. Returns false when the cap had already
    /// been reached. Takes any executor so callers can run it inside their
    /// own reservation transaction.
    pub async fn increment_usage<'e, E>(&self, executor: E, id: i32) -> AppResult<bool>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE promotions
            SET used_count = used_count + 1
            WHERE id = $1
              AND (usage_limit IS NULL OR used_count < usage_limit)
            "#,
        )
        .bind(id)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
