//! DTOs de Route
//!
//! Requests y responses de la API de rutas. Los requests se validan con
//! `validator` antes de tocar el servicio.

use chrono::{DateTime, NaiveDate, Utc};
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::dto::stop_dto::StopResponse;
use crate::models::route::Route;

// Response genérica
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
        }
    }

    pub fn success_with_message(data: T, message: String) -> Self {
        Self {
            success: true,
            message: Some(message),
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            message: Some(message),
            data: None,
        }
    }
}

/// Request para crear una nueva ruta
#[derive(Debug, Deserialize, Validate)]
pub struct CreateRouteRequest {
    pub operator_id: Uuid,

    #[validate(length(min = 3, max = 120))]
    pub name: String,

    /// REFILL | COLLECTION | MAINTENANCE | MIXED (default MIXED)
    pub route_type: Option<String>,

    /// Fecha de planificación en formato YYYY-MM-DD
    pub planned_date: String,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,

    pub metadata: Option<serde_json::Value>,
    pub auto_optimize: Option<bool>,
}

/// Filtros para búsqueda de rutas
#[derive(Debug, Deserialize)]
pub struct RouteFilters {
    pub operator_id: Option<Uuid>,
    pub planned_date_from: Option<NaiveDate>,
    pub planned_date_to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

/// Response de ruta para la API
#[derive(Debug, Serialize)]
pub struct RouteResponse {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub operator_id: Uuid,
    pub name: String,
    pub route_type: String,
    pub planned_date: NaiveDate,
    pub estimated_duration_minutes: Option<i32>,
    pub estimated_distance_km: Option<f64>,
    pub actual_duration_minutes: Option<i32>,
    pub actual_distance_km: Option<f64>,
    pub notes: Option<String>,
    pub metadata: serde_json::Value,
    pub auto_optimize: bool,
    pub version: i32,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        Self {
            id: route.id,
            organization_id: route.organization_id,
            operator_id: route.operator_id,
            name: route.name,
            route_type: route.route_type.to_string(),
            planned_date: route.planned_date,
            estimated_duration_minutes: route.estimated_duration_minutes,
            estimated_distance_km: route.estimated_distance_km.and_then(|d| d.to_f64()),
            actual_duration_minutes: route.actual_duration_minutes,
            actual_distance_km: route.actual_distance_km.and_then(|d| d.to_f64()),
            notes: route.notes,
            metadata: route.metadata,
            auto_optimize: route.auto_optimize,
            version: route.version,
            completed_at: route.completed_at,
            created_at: route.created_at,
        }
    }
}

/// Response de ruta con sus paradas ordenadas por secuencia
#[derive(Debug, Serialize)]
pub struct RouteDetailResponse {
    #[serde(flatten)]
    pub route: RouteResponse,
    pub stops: Vec<StopResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_route_request_validates_name_length() {
        let request = CreateRouteRequest {
            operator_id: Uuid::new_v4(),
            name: "ab".to_string(),
            route_type: None,
            planned_date: "2026-08-06".to_string(),
            notes: None,
            metadata: None,
            auto_optimize: None,
        };
        assert!(request.validate().is_err());
    }
}
