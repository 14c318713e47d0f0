//! Middleware de autenticación JWT
//!
//! Resuelve el contexto de operador (organización + operador) desde el
//! token Bearer y lo inyecta como extension. El motor de rutas asume
//! llamadas pre-autorizadas: los chequeos de rol viven en la capa que
//! emite el token, acá solo se resuelve identidad.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::state::AppState;
use crate::utils::errors::AppError;
use crate::utils::jwt::{verify_token, JwtConfig};

/// Contexto ya resuelto que reciben los handlers y el servicio
#[derive(Debug, Clone, Copy)]
pub struct OperatorContext {
    pub operator_id: Uuid,
    pub organization_id: Uuid,
}

/// Middleware de autenticación JWT
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    // Extraer token del header Authorization
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|auth_str| auth_str.to_str().ok())
        .and_then(|auth_str| auth_str.strip_prefix("Bearer "))
        .ok_or_else(|| AppError::Unauthorized("Token de autorización requerido".to_string()))?;

    let jwt_config = JwtConfig::from(&state.config);
    let claims = verify_token(auth_header, &jwt_config)?;

    let operator_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| AppError::Jwt("Claim sub inválido".to_string()))?;
    let organization_id = Uuid::parse_str(&claims.organization_id)
        .map_err(|_| AppError::Jwt("Claim organization_id inválido".to_string()))?;

    request.extensions_mut().insert(OperatorContext {
        operator_id,
        organization_id,
    });

    Ok(next.run(request).await)
}
