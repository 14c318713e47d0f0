//! Optimizador de rutas
//!
//! Dado el conjunto de paradas no terminales de una ruta y un punto de
//! partida, produce un orden de visita que aproxima la distancia mínima y
//! calcula el ETA de cada parada.
//!
//! Heurística: tour inicial por vecino más cercano desde el punto de
//! partida, mejorado con pasadas 2-opt acotadas por presupuesto fijo. Con
//! distancias empatadas gana el machine_id menor, así el resultado es
//! reproducible para el mismo input. Las paradas sin coordenadas se
//! excluyen de la matriz y se agregan al final del orden propuesto en vez
//! de abortar la operación completa.

use chrono::{DateTime, Duration, Utc};
use lazy_static::lazy_static;
use std::collections::HashMap;
use uuid::Uuid;

use crate::models::route::RouteType;
use crate::services::geo_distance::{DistanceMatrix, DistanceProvider};
use crate::utils::errors::AppResult;

/// Tolerancia para considerar dos distancias como empate
const DISTANCE_EPSILON_KM: f64 = 1e-9;

lazy_static! {
    /// Duración media de servicio en cada parada según el tipo de ruta
    static ref SERVICE_DURATION_MINUTES: HashMap<RouteType, i64> = {
        let mut m = HashMap::new();
        m.insert(RouteType::Refill, 10);
        m.insert(RouteType::Collection, 6);
        m.insert(RouteType::Maintenance, 25);
        m.insert(RouteType::Mixed, 12);
        m
    };
}

/// Duración de servicio asumida para una parada del tipo de ruta dado
pub fn service_duration_minutes(route_type: RouteType) -> i64 {
    *SERVICE_DURATION_MINUTES.get(&route_type).unwrap_or(&10)
}

/// Parada candidata a optimización: identidad + snapshot de coordenadas
#[derive(Debug, Clone)]
pub struct OptimizableStop {
    pub stop_id: Uuid,
    pub machine_id: Uuid,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl OptimizableStop {
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

/// Plan de visita producido por el optimizador (o por un reorden manual)
#[derive(Debug, Clone)]
pub struct TourPlan {
    /// Orden de visita propuesto; incluye al final las paradas sin coordenadas
    pub ordered_stop_ids: Vec<Uuid>,
    /// ETA por parada; las paradas sin coordenadas no tienen ETA
    pub etas: HashMap<Uuid, DateTime<Utc>>,
    pub total_distance_km: f64,
    pub total_duration_minutes: i64,
    /// Paradas excluidas de la matriz por no tener coordenadas
    pub missing_coordinates: Vec<Uuid>,
}

/// Calcular el orden de visita optimizado y los ETAs.
///
/// Con menos de dos paradas optimizables no hay nada que ordenar: se
/// conserva el orden recibido y solo se calculan ETAs y totales.
pub async fn plan_tour(
    provider: &dyn DistanceProvider,
    start_point: (f64, f64),
    start_time: DateTime<Utc>,
    route_type: RouteType,
    stops: &[OptimizableStop],
    two_opt_passes: usize,
) -> AppResult<TourPlan> {
    let with_coords: Vec<&OptimizableStop> =
        stops.iter().filter(|s| s.coordinates().is_some()).collect();

    if with_coords.len() < 2 {
        return compute_etas(provider, start_point, start_time, route_type, stops).await;
    }

    // Punto 0 = partida, punto i+1 = parada i
    let mut points = Vec::with_capacity(with_coords.len() + 1);
    points.push(start_point);
    for stop in &with_coords {
        points.push(stop.coordinates().unwrap());
    }
    let matrix = provider.matrix(&points).await?;

    let mut order = nearest_neighbor_order(&matrix, &with_coords);
    two_opt_improve(&mut order, &matrix, two_opt_passes);

    let missing: Vec<&OptimizableStop> =
        stops.iter().filter(|s| s.coordinates().is_none()).collect();

    let mut ordered_stop_ids: Vec<Uuid> =
        order.iter().map(|&i| with_coords[i].stop_id).collect();
    ordered_stop_ids.extend(missing.iter().map(|s| s.stop_id));

    let walk = walk_etas(&matrix, &order, &with_coords, start_time, route_type);

    Ok(TourPlan {
        ordered_stop_ids,
        etas: walk.etas,
        total_distance_km: walk.total_distance_km,
        total_duration_minutes: walk.total_duration_minutes,
        missing_coordinates: missing.iter().map(|s| s.stop_id).collect(),
    })
}

/// Calcular ETAs y totales para un orden dado, sin tocar el orden.
///
/// Es la rutina que usa el reorden manual: la intención del operador se
/// conserva literalmente y solo se refrescan las estimaciones de viaje.
pub async fn compute_etas(
    provider: &dyn DistanceProvider,
    start_point: (f64, f64),
    start_time: DateTime<Utc>,
    route_type: RouteType,
    ordered_stops: &[OptimizableStop],
) -> AppResult<TourPlan> {
    let with_coords: Vec<&OptimizableStop> = ordered_stops
        .iter()
        .filter(|s| s.coordinates().is_some())
        .collect();

    let mut points = Vec::with_capacity(with_coords.len() + 1);
    points.push(start_point);
    for stop in &with_coords {
        points.push(stop.coordinates().unwrap());
    }
    let matrix = provider.matrix(&points).await?;

    let identity: Vec<usize> = (0..with_coords.len()).collect();
    let walk = walk_etas(&matrix, &identity, &with_coords, start_time, route_type);

    Ok(TourPlan {
        ordered_stop_ids: ordered_stops.iter().map(|s| s.stop_id).collect(),
        etas: walk.etas,
        total_distance_km: walk.total_distance_km,
        total_duration_minutes: walk.total_duration_minutes,
        missing_coordinates: ordered_stops
            .iter()
            .filter(|s| s.coordinates().is_none())
            .map(|s| s.stop_id)
            .collect(),
    })
}

/// Tour inicial por vecino más cercano desde el punto de partida.
///
/// Devuelve índices sobre `stops`; el empate en distancia se resuelve por
/// machine_id menor para que el orden sea determinista.
fn nearest_neighbor_order(matrix: &DistanceMatrix, stops: &[&OptimizableStop]) -> Vec<usize> {
    let n = stops.len();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    // Índice de punto actual en la matriz (0 = partida)
    let mut current = 0usize;

    for _ in 0..n {
        let mut best: Option<usize> = None;
        for candidate in 0..n {
            if visited[candidate] {
                continue;
            }
            let dist = matrix.distances_km[current][candidate + 1];
            match best {
                None => best = Some(candidate),
                Some(current_best) => {
                    let best_dist = matrix.distances_km[current][current_best + 1];
                    if dist + DISTANCE_EPSILON_KM < best_dist {
                        best = Some(candidate);
                    } else if (dist - best_dist).abs() <= DISTANCE_EPSILON_KM
                        && stops[candidate].machine_id < stops[current_best].machine_id
                    {
                        best = Some(candidate);
                    }
                }
            }
        }
        let next = best.expect("unvisited stop must exist");
        visited[next] = true;
        order.push(next);
        current = next + 1;
    }

    order
}

/// Longitud del camino abierto partida -> paradas en el orden dado
fn tour_distance(matrix: &DistanceMatrix, order: &[usize]) -> f64 {
    let mut total = 0.0;
    let mut current = 0usize;
    for &stop_idx in order {
        total += matrix.distances_km[current][stop_idx + 1];
        current = stop_idx + 1;
    }
    total
}

/// Mejora 2-opt acotada: invierte el segmento [i..=j] si acorta el camino.
///
/// El presupuesto de pasadas es fijo para que el tiempo de cómputo quede
/// acotado sin importar el tamaño del input.
fn two_opt_improve(order: &mut Vec<usize>, matrix: &DistanceMatrix, max_passes: usize) {
    let n = order.len();
    if n < 3 {
        return;
    }

    for _ in 0..max_passes {
        let mut improved = false;
        let mut current_distance = tour_distance(matrix, order);

        for i in 0..n - 1 {
            for j in i + 1..n {
                let mut candidate = order.clone();
                candidate[i..=j].reverse();
                let candidate_distance = tour_distance(matrix, &candidate);
                if candidate_distance + DISTANCE_EPSILON_KM < current_distance {
                    order[i..=j].reverse();
                    current_distance = candidate_distance;
                    improved = true;
                }
            }
        }

        if !improved {
            break;
        }
    }
}

struct EtaWalk {
    etas: HashMap<Uuid, DateTime<Utc>>,
    total_distance_km: f64,
    total_duration_minutes: i64,
}

/// Recorrer el orden acumulando viaje + servicio desde la hora de partida
fn walk_etas(
    matrix: &DistanceMatrix,
    order: &[usize],
    stops: &[&OptimizableStop],
    start_time: DateTime<Utc>,
    route_type: RouteType,
) -> EtaWalk {
    let service = Duration::minutes(service_duration_minutes(route_type));
    let mut etas = HashMap::new();
    let mut total_distance_km = 0.0;
    let mut clock = start_time;
    let mut current = 0usize;

    for &stop_idx in order {
        let travel_secs = matrix.durations_secs[current][stop_idx + 1];
        total_distance_km += matrix.distances_km[current][stop_idx + 1];
        clock += Duration::milliseconds((travel_secs * 1000.0) as i64);
        etas.insert(stops[stop_idx].stop_id, clock);
        clock += service;
        current = stop_idx + 1;
    }

    EtaWalk {
        etas,
        total_distance_km,
        total_duration_minutes: (clock - start_time).num_minutes(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::geo_distance::HaversineProvider;

    fn stop(id: u128, machine: u128, coords: Option<(f64, f64)>) -> OptimizableStop {
        OptimizableStop {
            stop_id: Uuid::from_u128(id),
            machine_id: Uuid::from_u128(machine),
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
        }
    }

    fn start_time() -> DateTime<Utc> {
        "2026-08-06T08:00:00Z".parse().unwrap()
    }

    #[tokio::test]
    async fn test_equidistant_candidates_break_tie_by_machine_id() {
        // M2(0,1) y M3(1,0) equidistan del punto de partida (0,0);
        // M1 está en la partida misma así que sale primero con distancia 0
        let provider = HaversineProvider::default();
        let stops = vec![
            stop(30, 3, Some((1.0, 0.0))), // M3
            stop(20, 2, Some((0.0, 1.0))), // M2
            stop(10, 1, Some((0.0, 0.0))), // M1
        ];

        let plan = plan_tour(&provider, (0.0, 0.0), start_time(), RouteType::Refill, &stops, 8)
            .await
            .unwrap();

        assert_eq!(
            plan.ordered_stop_ids,
            vec![Uuid::from_u128(10), Uuid::from_u128(20), Uuid::from_u128(30)]
        );

        // El total es partida->M1 (0) + M1->M2 + M2->M3, no el orden naive
        let naive = compute_etas(&provider, (0.0, 0.0), start_time(), RouteType::Refill, &stops)
            .await
            .unwrap();
        assert!(plan.total_distance_km < naive.total_distance_km);
    }

    #[tokio::test]
    async fn test_optimize_preview_is_deterministic() {
        let provider = HaversineProvider::default();
        let stops = vec![
            stop(1, 11, Some((48.86, 2.35))),
            stop(2, 12, Some((48.85, 2.29))),
            stop(3, 13, Some((48.89, 2.38))),
            stop(4, 14, Some((48.83, 2.32))),
            stop(5, 15, Some((48.87, 2.30))),
        ];

        let a = plan_tour(&provider, (48.84, 2.34), start_time(), RouteType::Mixed, &stops, 8)
            .await
            .unwrap();
        let b = plan_tour(&provider, (48.84, 2.34), start_time(), RouteType::Mixed, &stops, 8)
            .await
            .unwrap();

        assert_eq!(a.ordered_stop_ids, b.ordered_stop_ids);
        assert_eq!(a.etas, b.etas);
        assert_eq!(a.total_distance_km, b.total_distance_km);
        assert_eq!(a.total_duration_minutes, b.total_duration_minutes);
    }

    #[tokio::test]
    async fn test_two_opt_never_worsens_nearest_neighbor() {
        let provider = HaversineProvider::default();
        let stops = vec![
            stop(1, 11, Some((48.86, 2.35))),
            stop(2, 12, Some((48.80, 2.45))),
            stop(3, 13, Some((48.92, 2.25))),
            stop(4, 14, Some((48.83, 2.40))),
            stop(5, 15, Some((48.88, 2.28))),
            stop(6, 16, Some((48.81, 2.31))),
        ];

        let without = plan_tour(&provider, (48.85, 2.35), start_time(), RouteType::Mixed, &stops, 0)
            .await
            .unwrap();
        let with = plan_tour(&provider, (48.85, 2.35), start_time(), RouteType::Mixed, &stops, 8)
            .await
            .unwrap();

        assert!(with.total_distance_km <= without.total_distance_km + 1e-9);
    }

    #[tokio::test]
    async fn test_fewer_than_two_stops_keeps_existing_order() {
        let provider = HaversineProvider::default();
        let stops = vec![stop(7, 70, Some((48.86, 2.35)))];

        let plan = plan_tour(&provider, (48.85, 2.35), start_time(), RouteType::Refill, &stops, 8)
            .await
            .unwrap();

        assert_eq!(plan.ordered_stop_ids, vec![Uuid::from_u128(7)]);
        assert!(plan.etas.contains_key(&Uuid::from_u128(7)));
        assert!(plan.total_distance_km > 0.0);
    }

    #[tokio::test]
    async fn test_missing_coordinates_appended_with_warning() {
        let provider = HaversineProvider::default();
        let stops = vec![
            stop(1, 11, Some((48.86, 2.35))),
            stop(2, 12, None),
            stop(3, 13, Some((48.89, 2.38))),
        ];

        let plan = plan_tour(&provider, (48.85, 2.35), start_time(), RouteType::Mixed, &stops, 8)
            .await
            .unwrap();

        assert_eq!(plan.ordered_stop_ids.len(), 3);
        assert_eq!(*plan.ordered_stop_ids.last().unwrap(), Uuid::from_u128(2));
        assert_eq!(plan.missing_coordinates, vec![Uuid::from_u128(2)]);
        assert!(!plan.etas.contains_key(&Uuid::from_u128(2)));
    }

    #[tokio::test]
    async fn test_etas_accumulate_travel_plus_service() {
        // Dos paradas alineadas al norte de la partida, velocidad 40 km/h
        let provider = HaversineProvider::new(40.0);
        let stops = vec![
            stop(1, 11, Some((0.09, 0.0))), // ~10 km de la partida
            stop(2, 12, Some((0.18, 0.0))), // ~10 km más
        ];

        let plan = plan_tour(&provider, (0.0, 0.0), start_time(), RouteType::Refill, &stops, 8)
            .await
            .unwrap();

        let eta1 = plan.etas[&Uuid::from_u128(1)];
        let eta2 = plan.etas[&Uuid::from_u128(2)];

        // ~15 minutos de viaje hasta la primera parada
        let travel1 = (eta1 - start_time()).num_minutes();
        assert!((14..=16).contains(&travel1), "got {}", travel1);

        // Entre paradas: 10 minutos de servicio + ~15 de viaje
        let gap = (eta2 - eta1).num_minutes();
        assert!((24..=26).contains(&gap), "got {}", gap);
    }

    #[tokio::test]
    async fn test_manual_order_is_preserved_verbatim() {
        let provider = HaversineProvider::default();
        // Orden manual deliberadamente subóptimo
        let stops = vec![
            stop(3, 13, Some((48.89, 2.38))),
            stop(1, 11, Some((48.86, 2.35))),
            stop(2, 12, Some((48.85, 2.29))),
        ];

        let plan = compute_etas(&provider, (48.85, 2.35), start_time(), RouteType::Mixed, &stops)
            .await
            .unwrap();

        assert_eq!(
            plan.ordered_stop_ids,
            vec![Uuid::from_u128(3), Uuid::from_u128(1), Uuid::from_u128(2)]
        );
    }

    #[test]
    fn test_service_duration_per_route_type() {
        assert_eq!(service_duration_minutes(RouteType::Refill), 10);
        assert_eq!(service_duration_minutes(RouteType::Collection), 6);
        assert_eq!(service_duration_minutes(RouteType::Maintenance), 25);
        assert_eq!(service_duration_minutes(RouteType::Mixed), 12);
    }
}
