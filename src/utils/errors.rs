//! Sistema de manejo de errores
//!
//! Este módulo define todos los tipos de errores del motor de rutas
//! y su conversión a respuestas HTTP apropiadas.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errores principales de la aplicación
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate machine: {0}")]
    DuplicateMachine(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Illegal stop transition from {from} to {to}")]
    IllegalTransition { from: String, to: String },

    #[error("Sequence mismatch: {0}")]
    SequenceMismatch(String),

    #[error("Concurrent modification: {0}")]
    ConcurrentModification(String),

    #[error("Dependency unavailable: {0}")]
    DependencyUnavailable(String),

    #[error("JWT error: {0}")]
    Jwt(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    code: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_response) = match self {
            AppError::Database(msg) => {
                eprintln!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Database Error".to_string(),
                        message: "An error occurred while accessing the database".to_string(),
                        details: Some(json!({ "sql_error": msg })),
                        code: Some("DB_ERROR".to_string()),
                    },
                )
            }

            AppError::Validation(e) => {
                eprintln!("Validation error: {}", e);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Validation Error".to_string(),
                        message: "The provided data is invalid".to_string(),
                        details: Some(json!(e)),
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::BadRequest(msg) => {
                eprintln!("Bad request: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Bad Request".to_string(),
                        message: msg,
                        details: None,
                        code: Some("VALIDATION_ERROR".to_string()),
                    },
                )
            }

            AppError::Unauthorized(msg) => {
                eprintln!("Unauthorized access: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse {
                        error: "Unauthorized".to_string(),
                        message: msg,
                        details: None,
                        code: Some("UNAUTHORIZED".to_string()),
                    },
                )
            }

            AppError::Forbidden(msg) => {
                eprintln!("Forbidden access: {}", msg);
                (
                    StatusCode::FORBIDDEN,
                    ErrorResponse {
                        error: "Forbidden".to_string(),
                        message: msg,
                        details: None,
                        code: Some("FORBIDDEN".to_string()),
                    },
                )
            }

            AppError::NotFound(msg) => {
                eprintln!("Resource not found: {}", msg);
                (
                    StatusCode::NOT_FOUND,
                    ErrorResponse {
                        error: "Not Found".to_string(),
                        message: msg,
                        details: None,
                        code: Some("NOT_FOUND".to_string()),
                    },
                )
            }

            AppError::DuplicateMachine(msg) => {
                eprintln!("Duplicate machine: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Duplicate Machine".to_string(),
                        message: msg,
                        details: None,
                        code: Some("DUPLICATE_MACHINE".to_string()),
                    },
                )
            }

            AppError::InvalidState(msg) => {
                eprintln!("Invalid state: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Invalid State".to_string(),
                        message: msg,
                        details: None,
                        code: Some("INVALID_STATE".to_string()),
                    },
                )
            }

            AppError::IllegalTransition { from, to } => {
                eprintln!("Illegal transition: {} -> {}", from, to);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Illegal Transition".to_string(),
                        message: format!("Cannot transition stop from {} to {}", from, to),
                        details: Some(json!({ "from": from, "to": to })),
                        code: Some("ILLEGAL_TRANSITION".to_string()),
                    },
                )
            }

            AppError::SequenceMismatch(msg) => {
                eprintln!("Sequence mismatch: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Sequence Mismatch".to_string(),
                        message: msg,
                        details: None,
                        code: Some("SEQUENCE_MISMATCH".to_string()),
                    },
                )
            }

            AppError::ConcurrentModification(msg) => {
                eprintln!("Concurrent modification: {}", msg);
                (
                    StatusCode::CONFLICT,
                    ErrorResponse {
                        error: "Concurrent Modification".to_string(),
                        message: "The route was modified by another request. Refetch and retry".to_string(),
                        details: Some(json!({ "conflict": msg })),
                        code: Some("CONCURRENT_MODIFICATION".to_string()),
                    },
                )
            }

            AppError::DependencyUnavailable(msg) => {
                eprintln!("Dependency unavailable: {}", msg);
                (
                    StatusCode::BAD_GATEWAY,
                    ErrorResponse {
                        error: "Dependency Unavailable".to_string(),
                        message: "An upstream dependency is unavailable".to_string(),
                        details: Some(json!({ "dependency_error": msg })),
                        code: Some("DEPENDENCY_UNAVAILABLE".to_string()),
                    },
                )
            }

            AppError::Jwt(msg) => {
                eprintln!("JWT error: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse {
                        error: "JWT Error".to_string(),
                        message: msg,
                        details: None,
                        code: Some("JWT_ERROR".to_string()),
                    },
                )
            }

            AppError::Internal(msg) => {
                eprintln!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal Server Error".to_string(),
                        message: "An unexpected error occurred".to_string(),
                        details: Some(json!({ "internal_error": msg })),
                        code: Some("INTERNAL_ERROR".to_string()),
                    },
                )
            }
        };

        (status, Json(error_response)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Convertir errores de sqlx distinguiendo conflictos de lock por ruta.
///
/// `SELECT ... FOR UPDATE NOWAIT` devuelve `lock_not_available` (55P03)
/// cuando otra request tiene bloqueada la misma ruta; ese caso se expone
/// como conflicto reintentable, no como error de base de datos.
pub fn map_sqlx_error(context: &str, e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.code().as_deref() == Some("55P03") {
            return AppError::ConcurrentModification(context.to_string());
        }
    }
    AppError::Database(format!("{}: {}", context, e))
}

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    async fn status_of(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[tokio::test]
    async fn test_conflict_family_maps_to_409() {
        assert_eq!(
            status_of(AppError::DuplicateMachine("m".into())).await,
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::InvalidState("s".into())).await,
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::SequenceMismatch("x".into())).await,
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::ConcurrentModification("r".into())).await,
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(AppError::IllegalTransition {
                from: "DEPARTED".into(),
                to: "ARRIVED".into(),
            })
            .await,
            StatusCode::CONFLICT
        );
    }

    #[tokio::test]
    async fn test_dependency_unavailable_maps_to_502() {
        assert_eq!(
            status_of(AppError::DependencyUnavailable("mapbox".into())).await,
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_illegal_transition_names_both_states() {
        let err = AppError::IllegalTransition {
            from: "PENDING".into(),
            to: "DEPARTED".into(),
        };
        let msg = err.to_string();
        assert!(msg.contains("PENDING"));
        assert!(msg.contains("DEPARTED"));
    }
}
