//! Servicio de rutas
//!
//! Orquesta creación de rutas, gestión de paradas, reorden manual,
//! optimización y registro de progreso. Es la única superficie de API del
//! motor: los handlers HTTP llegan acá con un contexto de operador ya
//! resuelto (organización + operador) y el servicio asume llamadas
//! pre-autorizadas.

use chrono::{DateTime, NaiveTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::route_dto::{CreateRouteRequest, RouteFilters};
use crate::dto::stop_dto::{
    AddStopRequest, OptimizeRouteRequest, ProgressEventRequest, ReorderStopsRequest,
};
use crate::middleware::auth::OperatorContext;
use crate::models::route::{Route, RouteType};
use crate::models::route_stop::{ProgressEvent, RouteStop, StopStatus};
use crate::repositories::machine_repository::MachineRepository;
use crate::repositories::operator_repository::OperatorRepository;
use crate::repositories::route_repository::{
    compute_sequence_assignment, NewRoute, NewStop, RouteRepository, StopTransition,
};
use crate::services::geo_distance::{haversine_km, DistanceProvider};
use crate::services::route_optimizer::{
    self, service_duration_minutes, OptimizableStop, TourPlan,
};
use crate::services::stop_state_machine;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::{validate_date, validate_latitude, validate_longitude};

/// Resultado de una optimización, antes de convertirse en response HTTP
pub struct OptimizationOutcome {
    pub applied: bool,
    /// Paradas en el orden propuesto con su secuencia y ETA propuestos
    pub ordered_stops: Vec<(RouteStop, i32, Option<DateTime<Utc>>)>,
    pub total_distance_km: f64,
    pub total_duration_minutes: i64,
    pub warnings: Vec<Uuid>,
}

pub struct RouteService {
    routes: RouteRepository,
    machines: MachineRepository,
    operators: OperatorRepository,
    distance: Arc<dyn DistanceProvider>,
    config: EnvironmentConfig,
}

impl RouteService {
    pub fn new(
        pool: sqlx::PgPool,
        config: EnvironmentConfig,
        distance: Arc<dyn DistanceProvider>,
    ) -> Self {
        Self {
            routes: RouteRepository::new(pool.clone()),
            machines: MachineRepository::new(pool.clone()),
            operators: OperatorRepository::new(pool),
            distance,
            config,
        }
    }

    /// Crear una ruta validando operador y fecha de planificación
    pub async fn create_route(
        &self,
        ctx: &OperatorContext,
        request: CreateRouteRequest,
    ) -> AppResult<Route> {
        request.validate()?;

        let planned_date = validate_date(&request.planned_date)
            .map_err(|_| AppError::BadRequest("planned_date must be YYYY-MM-DD".to_string()))?;

        let today = Utc::now().date_naive();
        let earliest = today - chrono::Duration::days(self.config.planned_date_tolerance_days);
        if planned_date < earliest {
            return Err(AppError::BadRequest(format!(
                "planned_date {} is in the past",
                planned_date
            )));
        }

        let route_type = match &request.route_type {
            Some(value) => RouteType::parse(value).ok_or_else(|| {
                AppError::BadRequest(format!("Unknown route type '{}'", value))
            })?,
            None => RouteType::Mixed,
        };

        // El operador debe existir y pertenecer a la organización
        self.operators
            .find_by_id(request.operator_id, ctx.organization_id)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Operator {} does not belong to this organization",
                    request.operator_id
                ))
            })?;

        let route = self
            .routes
            .create_route(NewRoute {
                organization_id: ctx.organization_id,
                operator_id: request.operator_id,
                name: request.name,
                route_type,
                planned_date,
                notes: request.notes,
                metadata: request.metadata.unwrap_or_else(|| serde_json::json!({})),
                auto_optimize: request.auto_optimize.unwrap_or(false),
            })
            .await?;

        log::info!("🗺️ Ruta {} creada para operador {}", route.id, route.operator_id);

        Ok(route)
    }

    pub async fn get_route(
        &self,
        ctx: &OperatorContext,
        route_id: Uuid,
    ) -> AppResult<(Route, Vec<RouteStop>)> {
        let (route, stops) = futures::try_join!(
            self.routes.find_route(route_id, ctx.organization_id),
            self.routes.list_stops(route_id)
        )?;

        let route =
            route.ok_or_else(|| AppError::NotFound(format!("Route {} not found", route_id)))?;

        Ok((route, stops))
    }

    pub async fn list_routes(
        &self,
        ctx: &OperatorContext,
        filters: &RouteFilters,
    ) -> AppResult<Vec<Route>> {
        self.routes.list_routes(ctx.organization_id, filters).await
    }

    pub async fn delete_route(&self, ctx: &OperatorContext, route_id: Uuid) -> AppResult<()> {
        self.routes
            .soft_delete_route(route_id, ctx.organization_id)
            .await?;
        log::info!("🗑️ Ruta {} marcada como eliminada", route_id);
        Ok(())
    }

    /// Agregar una parada con secuencia provisional `max + 1`.
    ///
    /// Si la ruta tiene auto_optimize, dispara la optimización después del
    /// alta; un fallo del optimizador no revierte el alta ya confirmada.
    pub async fn add_stop(
        &self,
        ctx: &OperatorContext,
        route_id: Uuid,
        request: AddStopRequest,
    ) -> AppResult<RouteStop> {
        request.validate()?;

        let route = self
            .routes
            .find_route(route_id, ctx.organization_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Route {} not found", route_id)))?;

        let machine = self
            .machines
            .find_by_id(request.machine_id, ctx.organization_id)
            .await?
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "Machine {} does not belong to this organization",
                    request.machine_id
                ))
            })?;

        let stop = self
            .routes
            .add_stop(
                route_id,
                ctx.organization_id,
                NewStop {
                    machine_id: machine.id,
                    task_id: request.task_id,
                    latitude: machine.latitude,
                    longitude: machine.longitude,
                    notes: request.notes,
                    metadata: request.metadata.unwrap_or_else(|| serde_json::json!({})),
                    repeat_visit: request.repeat_visit.unwrap_or(false),
                },
            )
            .await?;

        if route.auto_optimize {
            let optimize_request = OptimizeRouteRequest {
                preview: Some(false),
                ..Default::default()
            };
            match self.optimize(ctx, route_id, optimize_request).await {
                Ok(outcome) => {
                    log::info!(
                        "🔄 Ruta {} re-optimizada tras el alta de parada ({:.1} km)",
                        route_id,
                        outcome.total_distance_km
                    );
                    // La secuencia pudo cambiar, devolver la parada fresca
                    if let Some(fresh) = self.routes.find_stop(stop.id).await? {
                        return Ok(fresh);
                    }
                }
                Err(e) => {
                    log::warn!("⚠️ Auto-optimización de ruta {} falló: {}", route_id, e);
                }
            }
        }

        Ok(stop)
    }

    /// Quitar una parada PENDING; el resto de la secuencia se compacta
    pub async fn remove_stop(
        &self,
        ctx: &OperatorContext,
        route_id: Uuid,
        stop_id: Uuid,
    ) -> AppResult<()> {
        self.routes
            .remove_stop(route_id, stop_id, ctx.organization_id)
            .await
    }

    /// Reorden manual: el orden pedido se conserva literalmente y solo se
    /// refrescan los ETAs con las estimaciones de viaje actuales.
    pub async fn reorder_stops(
        &self,
        ctx: &OperatorContext,
        route_id: Uuid,
        request: ReorderStopsRequest,
    ) -> AppResult<Vec<RouteStop>> {
        request.validate()?;

        let (route, stops) = self.get_route(ctx, route_id).await?;
        if route.is_frozen() {
            return Err(AppError::InvalidState(format!(
                "Route {} is completed and frozen",
                route_id
            )));
        }

        // Validar el conjunto antes de pedir la matriz de distancias
        compute_sequence_assignment(&stops, &request.ordered_stop_ids)?;

        let by_id: HashMap<Uuid, &RouteStop> = stops.iter().map(|s| (s.id, s)).collect();
        let ordered: Vec<OptimizableStop> = request
            .ordered_stop_ids
            .iter()
            .map(|id| to_optimizable(by_id[id]))
            .collect();

        let (start_point, start_time) = start_context(
            &route,
            &stops,
            None,
            self.config.work_day_start,
        );

        let plan = route_optimizer::compute_etas(
            self.distance.as_ref(),
            start_point,
            start_time,
            route.route_type,
            &ordered,
        )
        .await?;

        let eta_updates = eta_updates_for(&request.ordered_stop_ids, &plan);

        self.routes
            .replace_sequence(
                route_id,
                ctx.organization_id,
                route.version,
                &request.ordered_stop_ids,
                &eta_updates,
                &plan.missing_coordinates,
                Some((plan.total_distance_km, plan.total_duration_minutes)),
            )
            .await
    }

    /// Optimizar el orden de visita de las paradas PENDING/EN_ROUTE.
    ///
    /// En modo preview calcula la propuesta sin persistirla; en modo apply
    /// la confirma atómicamente junto con los ETAs y totales de la ruta.
    /// Las paradas terminales quedan congeladas y las ARRIVED encabezan el
    /// orden resultante sin moverse del frente.
    pub async fn optimize(
        &self,
        ctx: &OperatorContext,
        route_id: Uuid,
        request: OptimizeRouteRequest,
    ) -> AppResult<OptimizationOutcome> {
        let (route, stops) = self.get_route(ctx, route_id).await?;
        if route.is_frozen() {
            return Err(AppError::InvalidState(format!(
                "Route {} is completed and frozen",
                route_id
            )));
        }

        let preview = request.preview.unwrap_or(false);

        let arrived: Vec<&RouteStop> = stops
            .iter()
            .filter(|s| s.status == StopStatus::Arrived)
            .collect();
        let optimizable: Vec<OptimizableStop> = stops
            .iter()
            .filter(|s| s.status.participates_in_etas())
            .map(|s| to_optimizable(s))
            .collect();

        let requested_start = match (request.start_latitude, request.start_longitude) {
            (Some(lat), Some(lon)) => {
                if validate_latitude(lat).is_err() || validate_longitude(lon).is_err() {
                    return Err(AppError::BadRequest(
                        "Start coordinates are out of range".to_string(),
                    ));
                }
                Some((lat, lon))
            }
            _ => None,
        };
        let (start_point, start_time) = start_context(
            &route,
            &stops,
            requested_start,
            self.config.work_day_start,
        );

        let plan = route_optimizer::plan_tour(
            self.distance.as_ref(),
            start_point,
            start_time,
            route.route_type,
            &optimizable,
            self.config.two_opt_passes,
        )
        .await?;

        // Las ARRIVED integran el conjunto no terminal: mantienen el frente
        let mut ordered_ids: Vec<Uuid> = arrived.iter().map(|s| s.id).collect();
        ordered_ids.extend(plan.ordered_stop_ids.iter().copied());

        let eta_updates = eta_updates_for(&plan.ordered_stop_ids, &plan);

        if preview {
            let assignments = compute_sequence_assignment(&stops, &ordered_ids)?;
            let slot_by_id: HashMap<Uuid, i32> = assignments.into_iter().collect();
            let by_id: HashMap<Uuid, &RouteStop> = stops.iter().map(|s| (s.id, s)).collect();

            let ordered_stops = ordered_ids
                .iter()
                .map(|id| {
                    let stop = by_id[id];
                    let eta = match eta_updates.get(id) {
                        Some(eta) => *eta,
                        None => stop.estimated_arrival,
                    };
                    ((*stop).clone(), slot_by_id[id], eta)
                })
                .collect();

            return Ok(OptimizationOutcome {
                applied: false,
                ordered_stops,
                total_distance_km: plan.total_distance_km,
                total_duration_minutes: plan.total_duration_minutes,
                warnings: plan.missing_coordinates,
            });
        }

        let refreshed = self
            .routes
            .replace_sequence(
                route_id,
                ctx.organization_id,
                route.version,
                &ordered_ids,
                &eta_updates,
                &plan.missing_coordinates,
                Some((plan.total_distance_km, plan.total_duration_minutes)),
            )
            .await?;

        log::info!(
            "✅ Ruta {} optimizada: {} paradas, {:.1} km estimados",
            route_id,
            refreshed.len(),
            plan.total_distance_km
        );

        let ordered_stops = refreshed
            .into_iter()
            .map(|stop| {
                let sequence = stop.sequence;
                let eta = stop.estimated_arrival;
                (stop, sequence, eta)
            })
            .collect();

        Ok(OptimizationOutcome {
            applied: true,
            ordered_stops,
            total_distance_km: plan.total_distance_km,
            total_duration_minutes: plan.total_duration_minutes,
            warnings: plan.missing_coordinates,
        })
    }

    /// Registrar un evento de progreso sobre una parada.
    ///
    /// Al partir de una parada, el corrimiento entre el timing real y el
    /// estimado se propaga a los ETAs de las paradas posteriores.
    pub async fn record_progress(
        &self,
        ctx: &OperatorContext,
        stop_id: Uuid,
        request: ProgressEventRequest,
    ) -> AppResult<RouteStop> {
        let event = ProgressEvent::parse(&request.event).ok_or_else(|| {
            AppError::BadRequest(format!("Unknown progress event '{}'", request.event))
        })?;

        let stop = self
            .routes
            .find_stop(stop_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Stop {} not found", stop_id)))?;

        // La ruta acota la organización y puede estar congelada
        let route = self
            .routes
            .find_route(stop.route_id, ctx.organization_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Stop {} not found", stop_id)))?;
        if route.is_frozen() {
            return Err(AppError::InvalidState(format!(
                "Route {} is completed and frozen",
                route.id
            )));
        }

        let at = request.timestamp.unwrap_or_else(Utc::now);
        let outcome = stop_state_machine::apply_event(stop.status, event, at)?;

        let eta_shift_seconds = match (outcome.status, outcome.departed_at) {
            (StopStatus::Departed, Some(departed_at)) => departure_eta_shift(
                stop.estimated_arrival,
                service_duration_minutes(route.route_type),
                departed_at,
            ),
            _ => None,
        };

        let updated = self
            .routes
            .apply_stop_transition(
                ctx.organization_id,
                stop_id,
                StopTransition {
                    from: stop.status,
                    to: outcome.status,
                    actual_arrival: outcome.actual_arrival,
                    departed_at: outcome.departed_at,
                    eta_shift_seconds,
                    notes: request.notes,
                },
            )
            .await?;

        log::info!(
            "📍 Parada {} ahora {} (evento {})",
            stop_id,
            updated.status,
            event
        );

        Ok(updated)
    }

    /// Completar la ruta: exige que todas las paradas sean terminales y
    /// calcula duración y distancia reales a partir de lo registrado.
    pub async fn complete_route(
        &self,
        ctx: &OperatorContext,
        route_id: Uuid,
    ) -> AppResult<Route> {
        let (route, stops) = self.get_route(ctx, route_id).await?;

        if route.completed_at.is_some() {
            return Err(AppError::InvalidState(format!(
                "Route {} is already completed",
                route_id
            )));
        }

        if let Some(open) = stops.iter().find(|s| !s.status.is_terminal()) {
            return Err(AppError::InvalidState(format!(
                "Stop {} is still {}, all stops must reach a terminal state",
                open.id, open.status
            )));
        }

        let (actual_duration_minutes, actual_distance_km) = compute_actuals(&stops);

        let finalized = self
            .routes
            .finalize_route(
                route_id,
                ctx.organization_id,
                route.version,
                actual_duration_minutes,
                actual_distance_km,
            )
            .await?;

        log::info!(
            "🏁 Ruta {} completada: {:?} minutos, {:.1} km reales",
            route_id,
            actual_duration_minutes,
            actual_distance_km
        );

        Ok(finalized)
    }
}

fn to_optimizable(stop: &RouteStop) -> OptimizableStop {
    OptimizableStop {
        stop_id: stop.id,
        machine_id: stop.machine_id,
        latitude: stop.latitude,
        longitude: stop.longitude,
    }
}

/// ETAs a persistir para los ids dados: las paradas sin ETA calculado
/// (sin coordenadas) quedan explícitamente en NULL.
fn eta_updates_for(
    ordered_ids: &[Uuid],
    plan: &TourPlan,
) -> HashMap<Uuid, Option<DateTime<Utc>>> {
    ordered_ids
        .iter()
        .map(|id| (*id, plan.etas.get(id).copied()))
        .collect()
}

/// Punto y hora de partida para el cálculo de ETAs.
///
/// Prioridad: última parada completada (el operador está ahí y parte a la
/// hora en que realmente partió), luego el punto pedido por el caller,
/// luego la primera parada con coordenadas a la hora de inicio de jornada.
fn start_context(
    route: &Route,
    stops: &[RouteStop],
    requested: Option<(f64, f64)>,
    work_day_start: NaiveTime,
) -> ((f64, f64), DateTime<Utc>) {
    let planned_start = route.planned_date.and_time(work_day_start).and_utc();

    let last_departed = stops
        .iter()
        .filter(|s| s.status == StopStatus::Departed)
        .filter(|s| s.coordinates().is_some() && s.departed_at.is_some())
        .max_by_key(|s| s.departed_at);

    if let Some(stop) = last_departed {
        return (stop.coordinates().unwrap(), stop.departed_at.unwrap());
    }

    if let Some(point) = requested {
        return (point, planned_start);
    }

    if let Some(stop) = stops.iter().find(|s| s.coordinates().is_some()) {
        return (stop.coordinates().unwrap(), planned_start);
    }

    ((0.0, 0.0), planned_start)
}

/// Corrimiento de ETAs al partir: diferencia entre la partida real y la
/// partida estimada (ETA + servicio). Sin ETA previo no hay corrimiento.
fn departure_eta_shift(
    estimated_arrival: Option<DateTime<Utc>>,
    service_minutes: i64,
    departed_at: DateTime<Utc>,
) -> Option<f64> {
    let estimated_arrival = estimated_arrival?;
    let estimated_departure = estimated_arrival + chrono::Duration::minutes(service_minutes);
    let shift = departed_at - estimated_departure;
    Some(shift.num_milliseconds() as f64 / 1000.0)
}

/// Duración real (primera llegada a última partida) y distancia real
/// (suma de tramos entre paradas DEPARTED consecutivas por secuencia).
fn compute_actuals(stops: &[RouteStop]) -> (Option<i32>, f64) {
    let first_arrival = stops.iter().filter_map(|s| s.actual_arrival).min();
    let last_departure = stops.iter().filter_map(|s| s.departed_at).max();

    let duration = match (first_arrival, last_departure) {
        (Some(start), Some(end)) if end >= start => {
            Some((end - start).num_minutes() as i32)
        }
        _ => None,
    };

    let mut visited: Vec<&RouteStop> = stops
        .iter()
        .filter(|s| s.status == StopStatus::Departed && s.coordinates().is_some())
        .collect();
    visited.sort_by_key(|s| s.sequence);

    let distance = visited
        .windows(2)
        .map(|pair| {
            haversine_km(
                pair[0].coordinates().unwrap(),
                pair[1].coordinates().unwrap(),
            )
        })
        .sum();

    (duration, distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn stop_at(
        id: u128,
        sequence: i32,
        status: StopStatus,
        coords: Option<(f64, f64)>,
    ) -> RouteStop {
        RouteStop {
            id: Uuid::from_u128(id),
            route_id: Uuid::from_u128(999),
            machine_id: Uuid::from_u128(id + 100),
            task_id: None,
            sequence,
            status,
            estimated_arrival: None,
            actual_arrival: None,
            departed_at: None,
            latitude: coords.map(|c| c.0),
            longitude: coords.map(|c| c.1),
            notes: None,
            metadata: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn route_for(planned: NaiveDate) -> Route {
        Route {
            id: Uuid::from_u128(999),
            organization_id: Uuid::from_u128(1),
            operator_id: Uuid::from_u128(2),
            name: "Ruta centro".to_string(),
            route_type: RouteType::Refill,
            planned_date: planned,
            estimated_duration_minutes: None,
            estimated_distance_km: None,
            actual_duration_minutes: None,
            actual_distance_km: None,
            notes: None,
            metadata: serde_json::json!({}),
            auto_optimize: false,
            version: 1,
            completed_at: None,
            deleted_at: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn work_day_start() -> NaiveTime {
        NaiveTime::from_hms_opt(8, 0, 0).unwrap()
    }

    #[test]
    fn test_start_context_seeds_from_planned_date() {
        let route = route_for(NaiveDate::from_ymd_opt(2026, 8, 10).unwrap());
        let stops = vec![stop_at(1, 1, StopStatus::Pending, Some((48.85, 2.35)))];

        let (point, time) = start_context(&route, &stops, None, work_day_start());
        assert_eq!(point, (48.85, 2.35));
        assert_eq!(time, "2026-08-10T08:00:00Z".parse::<DateTime<Utc>>().unwrap());
    }

    #[test]
    fn test_start_context_prefers_requested_point() {
        let route = route_for(NaiveDate::from_ymd_opt(2026, 8, 10).unwrap());
        let stops = vec![stop_at(1, 1, StopStatus::Pending, Some((48.85, 2.35)))];

        let (point, _) = start_context(&route, &stops, Some((45.76, 4.84)), work_day_start());
        assert_eq!(point, (45.76, 4.84));
    }

    #[test]
    fn test_start_context_resumes_from_last_departed_stop() {
        let route = route_for(NaiveDate::from_ymd_opt(2026, 8, 10).unwrap());
        let departed_at = "2026-08-10T10:45:00Z".parse::<DateTime<Utc>>().unwrap();

        let mut done = stop_at(1, 1, StopStatus::Departed, Some((48.80, 2.30)));
        done.departed_at = Some(departed_at);
        let stops = vec![done, stop_at(2, 2, StopStatus::Pending, Some((48.85, 2.35)))];

        let (point, time) = start_context(&route, &stops, Some((45.76, 4.84)), work_day_start());
        // La parada completada pisa incluso al punto pedido
        assert_eq!(point, (48.80, 2.30));
        assert_eq!(time, departed_at);
    }

    #[test]
    fn test_departure_eta_shift_late_and_early() {
        let eta = "2026-08-10T09:00:00Z".parse::<DateTime<Utc>>().unwrap();

        // Partió 20 minutos después de lo estimado (ETA 9:00 + 10 servicio = 9:10)
        let late = "2026-08-10T09:30:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(departure_eta_shift(Some(eta), 10, late), Some(1200.0));

        // Partió antes de lo estimado: corrimiento negativo
        let early = "2026-08-10T09:05:00Z".parse::<DateTime<Utc>>().unwrap();
        assert_eq!(departure_eta_shift(Some(eta), 10, early), Some(-300.0));

        // Sin ETA previo no se propaga nada
        assert_eq!(departure_eta_shift(None, 10, late), None);
    }

    #[test]
    fn test_compute_actuals_duration_and_distance() {
        let mut first = stop_at(1, 1, StopStatus::Departed, Some((0.0, 0.0)));
        first.actual_arrival = Some("2026-08-10T08:30:00Z".parse().unwrap());
        first.departed_at = Some("2026-08-10T08:45:00Z".parse().unwrap());

        let mut second = stop_at(2, 2, StopStatus::Departed, Some((0.09, 0.0)));
        second.actual_arrival = Some("2026-08-10T09:00:00Z".parse().unwrap());
        second.departed_at = Some("2026-08-10T09:20:00Z".parse().unwrap());

        let skipped = stop_at(3, 3, StopStatus::Skipped, Some((5.0, 5.0)));

        let (duration, distance) = compute_actuals(&[first, second, skipped]);
        assert_eq!(duration, Some(50));
        // ~10 km entre las dos paradas visitadas; la SKIPPED no suma
        assert!(distance > 9.0 && distance < 11.0, "got {}", distance);
    }

    #[test]
    fn test_compute_actuals_with_no_visits() {
        let stops = vec![
            stop_at(1, 1, StopStatus::Cancelled, Some((0.0, 0.0))),
            stop_at(2, 2, StopStatus::Skipped, None),
        ];
        let (duration, distance) = compute_actuals(&stops);
        assert_eq!(duration, None);
        assert_eq!(distance, 0.0);
    }
}
