//! Middleware del sistema
//!
//! Este módulo contiene el middleware para autenticación, CORS y otras
//! funcionalidades transversales.

pub mod auth;
pub mod cors;

pub use auth::*;
pub use cors::*;
