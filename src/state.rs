//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum. No hay estado mutable en proceso: toda la
//! coordinación entre requests vive en la capa de persistencia.

use sqlx::PgPool;
use std::sync::Arc;

use crate::config::environment::EnvironmentConfig;
use crate::services::geo_distance::{DistanceProvider, HaversineProvider, MapboxMatrixProvider};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: EnvironmentConfig,
    pub distance: Arc<dyn DistanceProvider>,
}

impl AppState {
    pub fn new(pool: PgPool, config: EnvironmentConfig) -> Self {
        let distance = build_distance_provider(&config);
        Self {
            pool,
            config,
            distance,
        }
    }
}

/// Elegir el proveedor de distancias según configuración: Mapbox Matrix
/// cuando hay token, haversine como default siempre disponible.
pub fn build_distance_provider(config: &EnvironmentConfig) -> Arc<dyn DistanceProvider> {
    match &config.mapbox_token {
        Some(token) => {
            log::info!("🗺️ Proveedor de distancias: Mapbox Matrix API");
            Arc::new(MapboxMatrixProvider::new(
                token.clone(),
                config.average_speed_kmh,
            ))
        }
        None => {
            log::info!(
                "🗺️ Proveedor de distancias: haversine a {} km/h",
                config.average_speed_kmh
            );
            Arc::new(HaversineProvider::new(config.average_speed_kmh))
        }
    }
}
