//! Repositorio de operadores
//!
//! Lookup de solo lectura contra el directorio de operadores de campo.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::operator::Operator;
use crate::utils::errors::{map_sqlx_error, AppResult};

pub struct OperatorRepository {
    pool: PgPool,
}

impl OperatorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
        organization_id: Uuid,
    ) -> AppResult<Option<Operator>> {
        let operator = sqlx::query_as::<_, Operator>(
            "SELECT * FROM operators WHERE id = $1 AND organization_id = $2",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Error finding operator", e))?;

        Ok(operator)
    }
}
