//! Modelo de Operator
//!
//! Directorio de operadores de campo. El motor solo valida que el operador
//! exista y pertenezca a la organización de la ruta.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Operator {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub full_name: String,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}
