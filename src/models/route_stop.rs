//! Modelo de RouteStop
//!
//! Este módulo contiene el struct RouteStop, el estado de cada parada
//! y los eventos de progreso que reporta el operador (o el ingest GPS).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use std::fmt;
use uuid::Uuid;

/// Estado de una parada - mapea al ENUM stop_status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Type, PartialEq, Eq)]
#[sqlx(type_name = "stop_status", rename_all = "snake_case")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopStatus {
    Pending,
    EnRoute,
    Arrived,
    Departed,
    Skipped,
    Cancelled,
}

impl StopStatus {
    /// DEPARTED, SKIPPED y CANCELLED son estados terminales
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            StopStatus::Departed | StopStatus::Skipped | StopStatus::Cancelled
        )
    }

    /// Una parada terminal por skip/cancel sale de la propagación de ETAs
    /// pero conserva su slot de secuencia.
    pub fn participates_in_etas(&self) -> bool {
        matches!(self, StopStatus::Pending | StopStatus::EnRoute)
    }
}

impl fmt::Display for StopStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StopStatus::Pending => "PENDING",
            StopStatus::EnRoute => "EN_ROUTE",
            StopStatus::Arrived => "ARRIVED",
            StopStatus::Departed => "DEPARTED",
            StopStatus::Skipped => "SKIPPED",
            StopStatus::Cancelled => "CANCELLED",
        };
        write!(f, "{}", name)
    }
}

/// Evento de progreso reportado sobre una parada
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProgressEvent {
    StartTravel,
    Arrive,
    Depart,
    Skip,
    Cancel,
}

impl ProgressEvent {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "START_TRAVEL" => Some(ProgressEvent::StartTravel),
            "ARRIVE" => Some(ProgressEvent::Arrive),
            "DEPART" => Some(ProgressEvent::Depart),
            "SKIP" => Some(ProgressEvent::Skip),
            "CANCEL" => Some(ProgressEvent::Cancel),
            _ => None,
        }
    }
}

impl fmt::Display for ProgressEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProgressEvent::StartTravel => "START_TRAVEL",
            ProgressEvent::Arrive => "ARRIVE",
            ProgressEvent::Depart => "DEPART",
            ProgressEvent::Skip => "SKIP",
            ProgressEvent::Cancel => "CANCEL",
        };
        write!(f, "{}", name)
    }
}

/// RouteStop - mapea exactamente a la tabla route_stops
///
/// `latitude`/`longitude` son un snapshot de la ubicación de la máquina al
/// momento de planificar; pueden divergir de la ubicación viva de la máquina.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RouteStop {
    pub id: Uuid,
    pub route_id: Uuid,
    pub machine_id: Uuid,
    pub task_id: Option<Uuid>,
    pub sequence: i32,
    pub status: StopStatus,
    pub estimated_arrival: Option<DateTime<Utc>>,
    pub actual_arrival: Option<DateTime<Utc>>,
    pub departed_at: Option<DateTime<Utc>>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RouteStop {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }

    /// Flag de visita repetida en metadata que relaja la unicidad de máquina
    pub fn is_repeat_visit(&self) -> bool {
        self.metadata
            .get("repeat_visit")
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }
}
