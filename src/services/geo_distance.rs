//! Proveedores de distancia
//!
//! Este módulo define el proveedor de distancias/duraciones entre
//! coordenadas. Hay dos implementaciones: haversine (línea recta, siempre
//! disponible) y la Matrix API de Mapbox cuando hay token configurado.
//! El optimizador recibe el proveedor como trait object, así que es
//! intercambiable sin tocar la heurística.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use crate::utils::errors::{AppError, AppResult};

/// Radio de la Tierra en kilómetros
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Velocidad media asumida cuando solo hay distancia en línea recta
pub const DEFAULT_SPEED_KMH: f64 = 40.0;

/// Matriz de distancias y duraciones entre un conjunto de puntos.
/// Las coordenadas se manejan siempre como (latitud, longitud).
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    pub distances_km: Vec<Vec<f64>>,
    pub durations_secs: Vec<Vec<f64>>,
}

/// Proveedor de matrices de distancia entre coordenadas
#[async_trait]
pub trait DistanceProvider: Send + Sync {
    async fn matrix(&self, points: &[(f64, f64)]) -> AppResult<DistanceMatrix>;
}

/// Distancia haversine entre dos puntos en kilómetros
pub fn haversine_km(from: (f64, f64), to: (f64, f64)) -> f64 {
    let (lat1, lng1) = from;
    let (lat2, lng2) = to;

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lng = (lng2 - lng1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Proveedor haversine: estima el tiempo de viaje con distancia en línea
/// recta y una velocidad media asumida.
#[derive(Debug, Clone)]
pub struct HaversineProvider {
    pub speed_kmh: f64,
}

impl Default for HaversineProvider {
    fn default() -> Self {
        Self {
            speed_kmh: DEFAULT_SPEED_KMH,
        }
    }
}

impl HaversineProvider {
    pub fn new(speed_kmh: f64) -> Self {
        Self { speed_kmh }
    }

    fn km_to_seconds(&self, km: f64) -> f64 {
        km / self.speed_kmh * 3600.0
    }
}

#[async_trait]
impl DistanceProvider for HaversineProvider {
    async fn matrix(&self, points: &[(f64, f64)]) -> AppResult<DistanceMatrix> {
        let n = points.len();
        let mut distances_km = vec![vec![0.0; n]; n];
        let mut durations_secs = vec![vec![0.0; n]; n];

        for (i, from) in points.iter().enumerate() {
            for (j, to) in points.iter().enumerate() {
                if i != j {
                    let km = haversine_km(*from, *to);
                    distances_km[i][j] = km;
                    durations_secs[i][j] = self.km_to_seconds(km);
                }
            }
        }

        Ok(DistanceMatrix {
            distances_km,
            durations_secs,
        })
    }
}

/// La Matrix API de Mapbox acepta hasta 25 coordenadas por request
const MAPBOX_MATRIX_MAX_COORDS: usize = 25;

/// Response de la Matrix API de Mapbox
#[derive(Debug, serde::Deserialize)]
struct MapboxMatrixResponse {
    code: String,
    durations: Option<Vec<Vec<Option<f64>>>>,
    distances: Option<Vec<Vec<Option<f64>>>>,
}

/// Proveedor basado en la Matrix API de Mapbox (perfil driving).
///
/// Si el request excede el límite de coordenadas de la API, degrada a
/// haversine en lugar de fallar la operación completa.
pub struct MapboxMatrixProvider {
    mapbox_token: String,
    client: Client,
    fallback: HaversineProvider,
}

impl MapboxMatrixProvider {
    pub fn new(mapbox_token: String, speed_kmh: f64) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            mapbox_token,
            client,
            fallback: HaversineProvider::new(speed_kmh),
        }
    }

    fn coordinates_path(points: &[(f64, f64)]) -> String {
        points
            .iter()
            .map(|(lat, lon)| format!("{:.6},{:.6}", lon, lat))
            .collect::<Vec<_>>()
            .join(";")
    }
}

#[async_trait]
impl DistanceProvider for MapboxMatrixProvider {
    async fn matrix(&self, points: &[(f64, f64)]) -> AppResult<DistanceMatrix> {
        if points.len() > MAPBOX_MATRIX_MAX_COORDS {
            log::warn!(
                "⚠️ {} coordenadas superan el límite de Mapbox Matrix ({}), usando haversine",
                points.len(),
                MAPBOX_MATRIX_MAX_COORDS
            );
            return self.fallback.matrix(points).await;
        }

        let url = format!(
            "https://api.mapbox.com/directions-matrix/v1/mapbox/driving/{}?annotations=distance,duration&access_token={}",
            Self::coordinates_path(points),
            self.mapbox_token
        );

        log::info!("📡 Solicitando matriz de {} puntos a Mapbox", points.len());

        let response = self
            .client
            .get(&url)
            .header("User-Agent", "VendingRouting/1.0")
            .send()
            .await
            .map_err(|e| AppError::DependencyUnavailable(format!("Mapbox Matrix API: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::DependencyUnavailable(format!("Mapbox Matrix API: {}", e)))?;

        if !status.is_success() {
            return Err(AppError::DependencyUnavailable(format!(
                "Mapbox Matrix API {}: {}",
                status, body
            )));
        }

        let parsed: MapboxMatrixResponse = serde_json::from_str(&body)
            .map_err(|e| AppError::DependencyUnavailable(format!("Mapbox Matrix parse: {}", e)))?;

        if parsed.code != "Ok" {
            return Err(AppError::DependencyUnavailable(format!(
                "Mapbox Matrix code {}",
                parsed.code
            )));
        }

        let durations = parsed
            .durations
            .ok_or_else(|| AppError::DependencyUnavailable("Mapbox Matrix sin durations".to_string()))?;
        let distances = parsed
            .distances
            .ok_or_else(|| AppError::DependencyUnavailable("Mapbox Matrix sin distances".to_string()))?;

        // Celdas null (pares inalcanzables por ruta) se rellenan con haversine
        let mut distances_km = vec![vec![0.0; points.len()]; points.len()];
        let mut durations_secs = vec![vec![0.0; points.len()]; points.len()];
        for i in 0..points.len() {
            for j in 0..points.len() {
                match (distances[i][j], durations[i][j]) {
                    (Some(meters), Some(secs)) => {
                        distances_km[i][j] = meters / 1000.0;
                        durations_secs[i][j] = secs;
                    }
                    _ if i != j => {
                        let km = haversine_km(points[i], points[j]);
                        distances_km[i][j] = km;
                        durations_secs[i][j] = self.fallback.km_to_seconds(km);
                    }
                    _ => {}
                }
            }
        }

        Ok(DistanceMatrix {
            distances_km,
            durations_secs,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let dist = haversine_km((48.85, 2.35), (48.85, 2.35));
        assert!(dist < 0.001, "Same point should have ~0 distance");
    }

    #[test]
    fn test_haversine_known_distance() {
        // París (48.8566, 2.3522) a Lyon (45.7640, 4.8357): ~392 km
        let dist = haversine_km((48.8566, 2.3522), (45.7640, 4.8357));
        assert!(
            dist > 380.0 && dist < 410.0,
            "Paris-Lyon should be ~392km, got {}",
            dist
        );
    }

    #[tokio::test]
    async fn test_haversine_matrix_diagonal_is_zero() {
        let provider = HaversineProvider::default();
        let points = vec![(48.1, 2.1), (48.2, 2.2), (48.3, 2.3)];
        let matrix = provider.matrix(&points).await.unwrap();

        for i in 0..points.len() {
            assert_eq!(matrix.distances_km[i][i], 0.0);
            assert_eq!(matrix.durations_secs[i][i], 0.0);
        }
    }

    #[tokio::test]
    async fn test_haversine_matrix_symmetric() {
        let provider = HaversineProvider::default();
        let points = vec![(48.1, 2.1), (48.2, 2.2)];
        let matrix = provider.matrix(&points).await.unwrap();

        assert_eq!(matrix.distances_km[0][1], matrix.distances_km[1][0]);
    }

    #[tokio::test]
    async fn test_travel_time_uses_assumed_speed() {
        // 10 km a 40 km/h = 900 segundos
        let provider = HaversineProvider::new(40.0);
        assert_eq!(provider.km_to_seconds(10.0), 900.0);
    }

    #[test]
    fn test_mapbox_coordinates_path_is_lon_lat() {
        let path = MapboxMatrixProvider::coordinates_path(&[(48.8566, 2.3522), (45.764, 4.8357)]);
        assert_eq!(path, "2.352200,48.856600;4.835700,45.764000");
    }
}
