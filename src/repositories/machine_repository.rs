//! Repositorio de máquinas
//!
//! Lookup de solo lectura contra el registro de máquinas. El motor de rutas
//! únicamente valida existencia/organización y toma el snapshot de
//! coordenadas al planificar.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::machine::Machine;
use crate::utils::errors::{map_sqlx_error, AppResult};

pub struct MachineRepository {
    pool: PgPool,
}

impl MachineRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(
        &self,
        id: Uuid,
        organization_id: Uuid,
    ) -> AppResult<Option<Machine>> {
        let machine = sqlx::query_as::<_, Machine>(
            "SELECT * FROM machines WHERE id = $1 AND organization_id = $2",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Error finding machine", e))?;

        Ok(machine)
    }
}
