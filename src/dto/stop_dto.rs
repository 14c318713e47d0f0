//! DTOs de RouteStop
//!
//! Requests y responses de paradas: alta, reorden, optimización y eventos
//! de progreso.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::route_stop::RouteStop;

/// Request para agregar una parada a una ruta
#[derive(Debug, Deserialize, Validate)]
pub struct AddStopRequest {
    pub machine_id: Uuid,
    pub task_id: Option<Uuid>,

    /// Permite visitar la misma máquina dos veces en la misma ruta
    pub repeat_visit: Option<bool>,

    #[validate(length(max = 1000))]
    pub notes: Option<String>,

    pub metadata: Option<serde_json::Value>,
}

/// Request para reordenar manualmente las paradas no terminales
#[derive(Debug, Deserialize, Validate)]
pub struct ReorderStopsRequest {
    #[validate(length(min = 1))]
    pub ordered_stop_ids: Vec<Uuid>,
}

/// Request para optimizar una ruta
#[derive(Debug, Deserialize, Default)]
pub struct OptimizeRouteRequest {
    /// Si es true, calcula la propuesta sin persistirla
    pub preview: Option<bool>,
    /// Punto de partida del operador (o depósito); si falta se usa la
    /// última parada completada o la primera parada con coordenadas
    pub start_latitude: Option<f64>,
    pub start_longitude: Option<f64>,
}

/// Request para registrar un evento de progreso sobre una parada
#[derive(Debug, Deserialize)]
pub struct ProgressEventRequest {
    /// START_TRAVEL | ARRIVE | DEPART | SKIP | CANCEL
    pub event: String,
    /// Timestamp del evento; default: now (el ingest GPS manda el suyo)
    pub timestamp: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
}

/// Response de parada para la API
#[derive(Debug, Serialize)]
pub struct StopResponse {
    pub id: Uuid,
    pub route_id: Uuid,
    pub machine_id: Uuid,
    pub task_id: Option<Uuid>,
    pub sequence: i32,
    pub status: String,
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub actual_arrival: Option<DateTime<Utc>>,
    pub departed_at: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
    pub metadata: serde_json::Value,
}

impl From<RouteStop> for StopResponse {
    fn from(stop: RouteStop) -> Self {
        Self {
            id: stop.id,
            route_id: stop.route_id,
            machine_id: stop.machine_id,
            task_id: stop.task_id,
            sequence: stop.sequence,
            status: stop.status.to_string(),
            estimated_arrival: stop.estimated_arrival,
            actual_arrival: stop.actual_arrival,
            departed_at: stop.departed_at,
            latitude: stop.latitude,
            longitude: stop.longitude,
            notes: stop.notes,
            metadata: stop.metadata,
        }
    }
}

/// Propuesta de optimización para confirmación en la UI
#[derive(Debug, Serialize)]
pub struct OptimizeRouteResponse {
    /// false cuando se pidió preview: la propuesta no se persistió
    pub applied: bool,
    pub ordered_stops: Vec<StopResponse>,
    pub total_distance_km: f64,
    pub total_duration_minutes: i64,
    /// Paradas sin coordenadas, agregadas al final del orden propuesto
    pub warnings: Vec<Uuid>,
}
