//! Services module
//!
//! Este módulo contiene la lógica de negocio del motor de rutas: el
//! proveedor de distancias, la máquina de estados de paradas, el
//! optimizador y el servicio orquestador.

pub mod geo_distance;
pub mod route_optimizer;
pub mod route_service;
pub mod stop_state_machine;

pub use route_service::*;
