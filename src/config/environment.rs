//! Configuración de variables de entorno
//!
//! Este módulo maneja la configuración del entorno y variables de
//! configuración del motor de rutas.

use chrono::NaiveTime;
use std::env;

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub environment: String,
    pub port: u16,
    pub host: String,
    pub jwt_secret: String,
    pub jwt_expiration: u64,
    pub cors_origins: Vec<String>,
    /// Token opcional: con token se usa la Matrix API de Mapbox como
    /// proveedor de distancias, sin token se usa haversine
    pub mapbox_token: Option<String>,
    /// Inicio de la jornada laboral, semilla de los ETAs (HH:MM)
    pub work_day_start: NaiveTime,
    /// Velocidad media asumida para estimar tiempos con haversine
    pub average_speed_kmh: f64,
    /// Tolerancia en días para aceptar planned_date en el pasado
    pub planned_date_tolerance_days: i64,
    /// Presupuesto de pasadas 2-opt del optimizador
    pub two_opt_passes: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .expect("PORT must be a valid number"),
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            jwt_expiration: env::var("JWT_EXPIRATION")
                .unwrap_or_else(|_| "86400".to_string())
                .parse()
                .expect("JWT_EXPIRATION must be a valid number"),
            cors_origins: env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            mapbox_token: env::var("MAPBOX_TOKEN").ok(),
            work_day_start: NaiveTime::parse_from_str(
                &env::var("WORK_DAY_START").unwrap_or_else(|_| "08:00".to_string()),
                "%H:%M",
            )
            .expect("WORK_DAY_START must be HH:MM"),
            average_speed_kmh: env::var("AVERAGE_SPEED_KMH")
                .unwrap_or_else(|_| "40".to_string())
                .parse()
                .expect("AVERAGE_SPEED_KMH must be a valid number"),
            planned_date_tolerance_days: env::var("PLANNED_DATE_TOLERANCE_DAYS")
                .unwrap_or_else(|_| "0".to_string())
                .parse()
                .expect("PLANNED_DATE_TOLERANCE_DAYS must be a valid number"),
            two_opt_passes: env::var("TWO_OPT_PASSES")
                .unwrap_or_else(|_| "8".to_string())
                .parse()
                .expect("TWO_OPT_PASSES must be a valid number"),
        }
    }
}

impl EnvironmentConfig {
    /// Verificar si estamos en modo desarrollo
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Verificar si estamos en modo producción
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Obtener la URL del servidor
    pub fn server_url(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
