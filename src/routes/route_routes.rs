use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::route_controller::RouteController;
use crate::dto::route_dto::{
    ApiResponse, CreateRouteRequest, RouteDetailResponse, RouteFilters, RouteResponse,
};
use crate::dto::stop_dto::{
    AddStopRequest, OptimizeRouteRequest, OptimizeRouteResponse, ProgressEventRequest,
    ReorderStopsRequest, StopResponse,
};
use crate::middleware::auth::OperatorContext;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_route_router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_route))
        .route("/", get(list_routes))
        .route("/:id", get(get_route))
        .route("/:id", delete(delete_route))
        .route("/:id/stops", post(add_stop))
        .route("/:id/stops/:stop_id", delete(remove_stop))
        .route("/:id/stops/reorder", post(reorder_stops))
        .route("/:id/optimize", post(optimize_route))
        .route("/:id/complete", post(complete_route))
        .route("/stops/:stop_id/event", post(record_progress))
}

async fn create_route(
    State(state): State<AppState>,
    Extension(ctx): Extension<OperatorContext>,
    Json(request): Json<CreateRouteRequest>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.create(&ctx, request).await?;
    Ok(Json(response))
}

async fn list_routes(
    State(state): State<AppState>,
    Extension(ctx): Extension<OperatorContext>,
    Query(filters): Query<RouteFilters>,
) -> Result<Json<Vec<RouteResponse>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.list(&ctx, filters).await?;
    Ok(Json(response))
}

async fn get_route(
    State(state): State<AppState>,
    Extension(ctx): Extension<OperatorContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteDetailResponse>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.get(&ctx, id).await?;
    Ok(Json(response))
}

async fn delete_route(
    State(state): State<AppState>,
    Extension(ctx): Extension<OperatorContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = RouteController::new(&state);
    controller.delete(&ctx, id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Ruta eliminada exitosamente"
    })))
}

async fn add_stop(
    State(state): State<AppState>,
    Extension(ctx): Extension<OperatorContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<AddStopRequest>,
) -> Result<Json<ApiResponse<StopResponse>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.add_stop(&ctx, id, request).await?;
    Ok(Json(response))
}

async fn remove_stop(
    State(state): State<AppState>,
    Extension(ctx): Extension<OperatorContext>,
    Path((id, stop_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<serde_json::Value>, AppError> {
    let controller = RouteController::new(&state);
    controller.remove_stop(&ctx, id, stop_id).await?;
    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Parada eliminada exitosamente"
    })))
}

async fn reorder_stops(
    State(state): State<AppState>,
    Extension(ctx): Extension<OperatorContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<ReorderStopsRequest>,
) -> Result<Json<Vec<StopResponse>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.reorder_stops(&ctx, id, request).await?;
    Ok(Json(response))
}

async fn optimize_route(
    State(state): State<AppState>,
    Extension(ctx): Extension<OperatorContext>,
    Path(id): Path<Uuid>,
    Json(request): Json<OptimizeRouteRequest>,
) -> Result<Json<OptimizeRouteResponse>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.optimize(&ctx, id, request).await?;
    Ok(Json(response))
}

async fn record_progress(
    State(state): State<AppState>,
    Extension(ctx): Extension<OperatorContext>,
    Path(stop_id): Path<Uuid>,
    Json(request): Json<ProgressEventRequest>,
) -> Result<Json<StopResponse>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.record_progress(&ctx, stop_id, request).await?;
    Ok(Json(response))
}

async fn complete_route(
    State(state): State<AppState>,
    Extension(ctx): Extension<OperatorContext>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<RouteResponse>>, AppError> {
    let controller = RouteController::new(&state);
    let response = controller.complete(&ctx, id).await?;
    Ok(Json(response))
}
