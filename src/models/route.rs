//! Modelo de Route
//!
//! Este módulo contiene el struct Route y sus tipos asociados.
//! Mapea exactamente al schema PostgreSQL con primary key 'id'.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

/// Tipo de ruta - mapea al ENUM route_type
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq, Hash)]
#[sqlx(type_name = "route_type", rename_all = "lowercase")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteType {
    Refill,
    Collection,
    Maintenance,
    Mixed,
}

impl fmt::Display for RouteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RouteType::Refill => "REFILL",
            RouteType::Collection => "COLLECTION",
            RouteType::Maintenance => "MAINTENANCE",
            RouteType::Mixed => "MIXED",
        };
        write!(f, "{}", name)
    }
}

impl RouteType {
    /// Parsear el tipo desde el valor que envía la API
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "REFILL" => Some(RouteType::Refill),
            "COLLECTION" => Some(RouteType::Collection),
            "MAINTENANCE" => Some(RouteType::Maintenance),
            "MIXED" => Some(RouteType::Mixed),
            _ => None,
        }
    }
}

/// Route principal - mapea exactamente a la tabla routes
///
/// La ruta no tiene campo de estado propio: el estado vive en sus stops.
/// `completed_at` congela la ruta y `deleted_at` implementa soft delete.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub operator_id: Uuid,
    pub name: String,
    pub route_type: RouteType,
    pub planned_date: NaiveDate,
    pub estimated_duration_minutes: Option<i32>,
    pub estimated_distance_km: Option<Decimal>,
    pub actual_duration_minutes: Option<i32>,
    pub actual_distance_km: Option<Decimal>,
    pub notes: Option<String>,
    pub metadata: serde_json::Value,
    pub auto_optimize: bool,
    pub version: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Route {
    /// Una ruta completada o eliminada ya no acepta mutaciones de stops
    pub fn is_frozen(&self) -> bool {
        self.completed_at.is_some() || self.deleted_at.is_some()
    }
}
