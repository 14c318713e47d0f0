//! Controller de rutas
//!
//! Capa fina entre los handlers HTTP y RouteService: arma el servicio a
//! partir del estado compartido y convierte dominio a DTOs de respuesta.

use uuid::Uuid;

use crate::dto::route_dto::{
    ApiResponse, CreateRouteRequest, RouteDetailResponse, RouteFilters, RouteResponse,
};
use crate::dto::stop_dto::{
    AddStopRequest, OptimizeRouteRequest, OptimizeRouteResponse, ProgressEventRequest,
    ReorderStopsRequest, StopResponse,
};
use crate::middleware::auth::OperatorContext;
use crate::services::route_service::RouteService;
use crate::state::AppState;
use crate::utils::errors::AppResult;

pub struct RouteController {
    service: RouteService,
}

impl RouteController {
    pub fn new(state: &AppState) -> Self {
        Self {
            service: RouteService::new(
                state.pool.clone(),
                state.config.clone(),
                state.distance.clone(),
            ),
        }
    }

    pub async fn create(
        &self,
        ctx: &OperatorContext,
        request: CreateRouteRequest,
    ) -> AppResult<ApiResponse<RouteResponse>> {
        let route = self.service.create_route(ctx, request).await?;
        Ok(ApiResponse::success_with_message(
            route.into(),
            "Ruta creada exitosamente".to_string(),
        ))
    }

    pub async fn get(
        &self,
        ctx: &OperatorContext,
        route_id: Uuid,
    ) -> AppResult<RouteDetailResponse> {
        let (route, stops) = self.service.get_route(ctx, route_id).await?;
        Ok(RouteDetailResponse {
            route: route.into(),
            stops: stops.into_iter().map(StopResponse::from).collect(),
        })
    }

    pub async fn list(
        &self,
        ctx: &OperatorContext,
        filters: RouteFilters,
    ) -> AppResult<Vec<RouteResponse>> {
        let routes = self.service.list_routes(ctx, &filters).await?;
        Ok(routes.into_iter().map(RouteResponse::from).collect())
    }

    pub async fn delete(&self, ctx: &OperatorContext, route_id: Uuid) -> AppResult<()> {
        self.service.delete_route(ctx, route_id).await
    }

    pub async fn add_stop(
        &self,
        ctx: &OperatorContext,
        route_id: Uuid,
        request: AddStopRequest,
    ) -> AppResult<ApiResponse<StopResponse>> {
        let stop = self.service.add_stop(ctx, route_id, request).await?;
        Ok(ApiResponse::success_with_message(
            stop.into(),
            "Parada agregada exitosamente".to_string(),
        ))
    }

    pub async fn remove_stop(
        &self,
        ctx: &OperatorContext,
        route_id: Uuid,
        stop_id: Uuid,
    ) -> AppResult<()> {
        self.service.remove_stop(ctx, route_id, stop_id).await
    }

    pub async fn reorder_stops(
        &self,
        ctx: &OperatorContext,
        route_id: Uuid,
        request: ReorderStopsRequest,
    ) -> AppResult<Vec<StopResponse>> {
        let stops = self.service.reorder_stops(ctx, route_id, request).await?;
        Ok(stops.into_iter().map(StopResponse::from).collect())
    }

    pub async fn optimize(
        &self,
        ctx: &OperatorContext,
        route_id: Uuid,
        request: OptimizeRouteRequest,
    ) -> AppResult<OptimizeRouteResponse> {
        let outcome = self.service.optimize(ctx, route_id, request).await?;

        let ordered_stops = outcome
            .ordered_stops
            .into_iter()
            .map(|(stop, sequence, eta)| {
                let mut response = StopResponse::from(stop);
                response.sequence = sequence;
                response.estimated_arrival = eta;
                response
            })
            .collect();

        Ok(OptimizeRouteResponse {
            applied: outcome.applied,
            ordered_stops,
            total_distance_km: outcome.total_distance_km,
            total_duration_minutes: outcome.total_duration_minutes,
            warnings: outcome.warnings,
        })
    }

    pub async fn record_progress(
        &self,
        ctx: &OperatorContext,
        stop_id: Uuid,
        request: ProgressEventRequest,
    ) -> AppResult<StopResponse> {
        let stop = self.service.record_progress(ctx, stop_id, request).await?;
        Ok(stop.into())
    }

    pub async fn complete(
        &self,
        ctx: &OperatorContext,
        route_id: Uuid,
    ) -> AppResult<ApiResponse<RouteResponse>> {
        let route = self.service.complete_route(ctx, route_id).await?;
        Ok(ApiResponse::success_with_message(
            route.into(),
            "Ruta completada exitosamente".to_string(),
        ))
    }
}
