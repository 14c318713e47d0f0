//! Repositorio de rutas y paradas
//!
//! Frontera de persistencia de los agregados Route/RouteStop. Toda mutación
//! del conjunto de paradas de una ruta corre dentro de una transacción que
//! bloquea la fila de la ruta (`FOR UPDATE NOWAIT`), así las mutaciones
//! sobre una misma ruta quedan serializadas y el perdedor recibe un
//! conflicto reintentable en vez de interlevarse. El invariante de
//! secuencia densa 1..N se restablece dentro de la misma transacción.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::dto::route_dto::RouteFilters;
use crate::models::route::{Route, RouteType};
use crate::models::route_stop::{RouteStop, StopStatus};
use crate::utils::errors::{map_sqlx_error, AppError, AppResult};

/// Datos para crear una ruta
pub struct NewRoute {
    pub organization_id: Uuid,
    pub operator_id: Uuid,
    pub name: String,
    pub route_type: RouteType,
    pub planned_date: chrono::NaiveDate,
    pub notes: Option<String>,
    pub metadata: serde_json::Value,
    pub auto_optimize: bool,
}

/// Datos para agregar una parada (snapshot de máquina incluido)
pub struct NewStop {
    pub machine_id: Uuid,
    pub task_id: Option<Uuid>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
    pub metadata: serde_json::Value,
    pub repeat_visit: bool,
}

/// Transición validada por la máquina de estados, lista para persistir.
///
/// `from` es el estado que el servicio observó al validar: si al momento de
/// la transacción el estado ya no coincide, otra request ganó la carrera.
pub struct StopTransition {
    pub from: StopStatus,
    pub to: StopStatus,
    pub actual_arrival: Option<DateTime<Utc>>,
    pub departed_at: Option<DateTime<Utc>>,
    /// Corrimiento de ETAs aguas abajo en segundos (solo al partir)
    pub eta_shift_seconds: Option<f64>,
    pub notes: Option<String>,
}

pub struct RouteRepository {
    pool: PgPool,
}

impl RouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create_route(&self, new_route: NewRoute) -> AppResult<Route> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            INSERT INTO routes (
                id, organization_id, operator_id, name, route_type, planned_date,
                notes, metadata, auto_optimize, version, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 1, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(new_route.organization_id)
        .bind(new_route.operator_id)
        .bind(new_route.name)
        .bind(new_route.route_type)
        .bind(new_route.planned_date)
        .bind(new_route.notes)
        .bind(new_route.metadata)
        .bind(new_route.auto_optimize)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Error creating route", e))?;

        Ok(route)
    }

    pub async fn find_route(&self, id: Uuid, organization_id: Uuid) -> AppResult<Option<Route>> {
        let route = sqlx::query_as::<_, Route>(
            "SELECT * FROM routes WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL",
        )
        .bind(id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Error finding route", e))?;

        Ok(route)
    }

    pub async fn list_routes(
        &self,
        organization_id: Uuid,
        filters: &RouteFilters,
    ) -> AppResult<Vec<Route>> {
        let limit = filters.limit.unwrap_or(50).clamp(1, 200);
        let offset = filters.offset.unwrap_or(0).max(0);

        let routes = sqlx::query_as::<_, Route>(
            r#"
            SELECT * FROM routes
            WHERE organization_id = $1
              AND deleted_at IS NULL
              AND ($2::uuid IS NULL OR operator_id = $2)
              AND ($3::date IS NULL OR planned_date >= $3)
              AND ($4::date IS NULL OR planned_date <= $4)
            ORDER BY planned_date DESC, created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(organization_id)
        .bind(filters.operator_id)
        .bind(filters.planned_date_from)
        .bind(filters.planned_date_to)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Error listing routes", e))?;

        Ok(routes)
    }

    /// Soft delete: la ruta se marca eliminada y queda para auditoría
    pub async fn soft_delete_route(&self, id: Uuid, organization_id: Uuid) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE routes
            SET deleted_at = NOW(), updated_at = NOW(), version = version + 1
            WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(organization_id)
        .execute(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Error deleting route", e))?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Route {} not found", id)));
        }

        Ok(())
    }

    pub async fn list_stops(&self, route_id: Uuid) -> AppResult<Vec<RouteStop>> {
        let stops = sqlx::query_as::<_, RouteStop>(
            "SELECT * FROM route_stops WHERE route_id = $1 ORDER BY sequence ASC",
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("Error listing stops", e))?;

        Ok(stops)
    }

    pub async fn find_stop(&self, stop_id: Uuid) -> AppResult<Option<RouteStop>> {
        let stop = sqlx::query_as::<_, RouteStop>("SELECT * FROM route_stops WHERE id = $1")
            .bind(stop_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("Error finding stop", e))?;

        Ok(stop)
    }

    /// Agregar una parada con `sequence = max + 1`.
    ///
    /// Rechaza máquinas repetidas dentro de la ruta salvo flag de visita
    /// repetida (el flag queda registrado en metadata).
    pub async fn add_stop(
        &self,
        route_id: Uuid,
        organization_id: Uuid,
        new_stop: NewStop,
    ) -> AppResult<RouteStop> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Error starting transaction", e))?;

        let route = Self::lock_route(&mut tx, route_id, organization_id).await?;
        Self::ensure_mutable(&route)?;

        if !new_stop.repeat_visit {
            let exists: (bool,) = sqlx::query_as(
                "SELECT EXISTS(SELECT 1 FROM route_stops WHERE route_id = $1 AND machine_id = $2)",
            )
            .bind(route_id)
            .bind(new_stop.machine_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Error checking duplicate machine", e))?;

            if exists.0 {
                return Err(AppError::DuplicateMachine(format!(
                    "Machine {} is already a stop of route {}",
                    new_stop.machine_id, route_id
                )));
            }
        }

        let mut metadata = new_stop.metadata;
        if new_stop.repeat_visit {
            if let serde_json::Value::Object(ref mut map) = metadata {
                map.insert("repeat_visit".to_string(), serde_json::Value::Bool(true));
            }
        }

        let stop = sqlx::query_as::<_, RouteStop>(
            r#"
            INSERT INTO route_stops (
                id, route_id, machine_id, task_id, sequence, status,
                latitude, longitude, notes, metadata, created_at, updated_at
            )
            VALUES (
                $1, $2, $3, $4,
                (SELECT COALESCE(MAX(sequence), 0) + 1 FROM route_stops WHERE route_id = $2),
                'pending', $5, $6, $7, $8, NOW(), NOW()
            )
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(route_id)
        .bind(new_stop.machine_id)
        .bind(new_stop.task_id)
        .bind(new_stop.latitude)
        .bind(new_stop.longitude)
        .bind(new_stop.notes)
        .bind(metadata)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Error inserting stop", e))?;

        Self::bump_version(&mut tx, route_id).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Error committing add_stop", e))?;

        Ok(stop)
    }

    /// Quitar una parada PENDING compactando la secuencia restante a 1..N
    pub async fn remove_stop(
        &self,
        route_id: Uuid,
        stop_id: Uuid,
        organization_id: Uuid,
    ) -> AppResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Error starting transaction", e))?;

        let route = Self::lock_route(&mut tx, route_id, organization_id).await?;
        Self::ensure_mutable(&route)?;

        let stop = sqlx::query_as::<_, RouteStop>(
            "SELECT * FROM route_stops WHERE id = $1 AND route_id = $2",
        )
        .bind(stop_id)
        .bind(route_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Error finding stop", e))?
        .ok_or_else(|| AppError::NotFound(format!("Stop {} not found", stop_id)))?;

        if stop.status != StopStatus::Pending {
            return Err(AppError::InvalidState(format!(
                "Stop {} is {} and can no longer be removed, cancel it instead",
                stop_id, stop.status
            )));
        }

        sqlx::query("DELETE FROM route_stops WHERE id = $1")
            .bind(stop_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Error deleting stop", e))?;

        // Compactar: las paradas posteriores retroceden un slot
        sqlx::query(
            "UPDATE route_stops SET sequence = sequence - 1, updated_at = NOW()
             WHERE route_id = $1 AND sequence > $2",
        )
        .bind(route_id)
        .bind(stop.sequence)
        .execute(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Error compacting sequence", e))?;

        Self::bump_version(&mut tx, route_id).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Error committing remove_stop", e))?;

        Ok(())
    }

    /// Reescribir la secuencia de las paradas no terminales.
    ///
    /// `ordered_stop_ids` debe coincidir exactamente con el conjunto de
    /// paradas no terminales de la ruta. Las paradas terminales conservan su
    /// slot congelado; las demás se asignan a los slots libres en orden
    /// ascendente, así la secuencia completa sigue siendo 1..N.
    ///
    /// `expected_version` implementa el control optimista: el plan se calculó
    /// fuera de la transacción y se descarta si la ruta cambió en el medio.
    #[allow(clippy::too_many_arguments)]
    pub async fn replace_sequence(
        &self,
        route_id: Uuid,
        organization_id: Uuid,
        expected_version: i32,
        ordered_stop_ids: &[Uuid],
        eta_updates: &HashMap<Uuid, Option<DateTime<Utc>>>,
        warnings: &[Uuid],
        totals: Option<(f64, i64)>,
    ) -> AppResult<Vec<RouteStop>> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Error starting transaction", e))?;

        let route = Self::lock_route(&mut tx, route_id, organization_id).await?;
        Self::ensure_mutable(&route)?;

        if route.version != expected_version {
            return Err(AppError::ConcurrentModification(format!(
                "Route {} changed while the new order was being computed",
                route_id
            )));
        }

        let stops = sqlx::query_as::<_, RouteStop>(
            "SELECT * FROM route_stops WHERE route_id = $1 ORDER BY sequence ASC",
        )
        .bind(route_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Error listing stops", e))?;

        let assignments = compute_sequence_assignment(&stops, ordered_stop_ids)?;

        for (stop_id, sequence) in &assignments {
            if let Some(eta) = eta_updates.get(stop_id) {
                sqlx::query(
                    "UPDATE route_stops SET sequence = $1, estimated_arrival = $2, updated_at = NOW()
                     WHERE id = $3",
                )
                .bind(sequence)
                .bind(eta)
                .bind(stop_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("Error updating stop sequence", e))?;
            } else {
                sqlx::query(
                    "UPDATE route_stops SET sequence = $1, updated_at = NOW() WHERE id = $2",
                )
                .bind(sequence)
                .bind(stop_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("Error updating stop sequence", e))?;
            }
        }

        for stop_id in warnings {
            sqlx::query(
                r#"
                UPDATE route_stops
                SET metadata = jsonb_set(metadata, '{warning}', '"missing_coordinates"'),
                    updated_at = NOW()
                WHERE id = $1
                "#,
            )
            .bind(stop_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Error flagging stop warning", e))?;
        }

        if let Some((distance_km, duration_minutes)) = totals {
            sqlx::query(
                r#"
                UPDATE routes
                SET estimated_distance_km = $1,
                    estimated_duration_minutes = $2,
                    version = version + 1,
                    updated_at = NOW()
                WHERE id = $3
                "#,
            )
            .bind(Decimal::from_f64_retain(distance_km))
            .bind(duration_minutes as i32)
            .bind(route_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Error updating route totals", e))?;
        } else {
            Self::bump_version(&mut tx, route_id).await?;
        }

        let refreshed = sqlx::query_as::<_, RouteStop>(
            "SELECT * FROM route_stops WHERE route_id = $1 ORDER BY sequence ASC",
        )
        .bind(route_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Error refreshing stops", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Error committing replace_sequence", e))?;

        Ok(refreshed)
    }

    /// Persistir una transición ya validada por la máquina de estados.
    ///
    /// Si el evento es de partida, corre los ETAs de las paradas
    /// PENDING/EN_ROUTE posteriores en la misma transacción.
    pub async fn apply_stop_transition(
        &self,
        organization_id: Uuid,
        stop_id: Uuid,
        transition: StopTransition,
    ) -> AppResult<RouteStop> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Error starting transaction", e))?;

        let route_id: (Uuid,) =
            sqlx::query_as("SELECT route_id FROM route_stops WHERE id = $1")
                .bind(stop_id)
                .fetch_optional(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("Error finding stop", e))?
                .ok_or_else(|| AppError::NotFound(format!("Stop {} not found", stop_id)))?;
        let route_id = route_id.0;

        let route = Self::lock_route(&mut tx, route_id, organization_id).await?;
        Self::ensure_mutable(&route)?;

        let stop = sqlx::query_as::<_, RouteStop>("SELECT * FROM route_stops WHERE id = $1")
            .bind(stop_id)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Error reading stop", e))?;

        if stop.status != transition.from {
            return Err(AppError::ConcurrentModification(format!(
                "Stop {} is now {}, transition was validated against {}",
                stop_id, stop.status, transition.from
            )));
        }

        let updated = sqlx::query_as::<_, RouteStop>(
            r#"
            UPDATE route_stops
            SET status = $1,
                actual_arrival = COALESCE($2, actual_arrival),
                departed_at = COALESCE($3, departed_at),
                notes = COALESCE($4, notes),
                updated_at = NOW()
            WHERE id = $5
            RETURNING *
            "#,
        )
        .bind(transition.to)
        .bind(transition.actual_arrival)
        .bind(transition.departed_at)
        .bind(transition.notes)
        .bind(stop_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Error updating stop status", e))?;

        if let Some(shift_seconds) = transition.eta_shift_seconds {
            sqlx::query(
                r#"
                UPDATE route_stops
                SET estimated_arrival = estimated_arrival + make_interval(secs => $1),
                    updated_at = NOW()
                WHERE route_id = $2
                  AND sequence > $3
                  AND status IN ('pending', 'en_route')
                  AND estimated_arrival IS NOT NULL
                "#,
            )
            .bind(shift_seconds)
            .bind(route_id)
            .bind(stop.sequence)
            .execute(&mut *tx)
            .await
            .map_err(|e| map_sqlx_error("Error shifting downstream ETAs", e))?;
        }

        Self::bump_version(&mut tx, route_id).await?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Error committing stop transition", e))?;

        Ok(updated)
    }

    /// Congelar la ruta con sus totales reales.
    ///
    /// Revalida dentro de la transacción que todas las paradas sean
    /// terminales y que la versión no haya cambiado desde el cálculo.
    pub async fn finalize_route(
        &self,
        route_id: Uuid,
        organization_id: Uuid,
        expected_version: i32,
        actual_duration_minutes: Option<i32>,
        actual_distance_km: f64,
    ) -> AppResult<Route> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("Error starting transaction", e))?;

        let route = Self::lock_route(&mut tx, route_id, organization_id).await?;
        Self::ensure_mutable(&route)?;

        if route.version != expected_version {
            return Err(AppError::ConcurrentModification(format!(
                "Route {} changed while completion was being computed",
                route_id
            )));
        }

        let open_stops: (i64,) = sqlx::query_as(
            r#"
            SELECT COUNT(*) FROM route_stops
            WHERE route_id = $1 AND status NOT IN ('departed', 'skipped', 'cancelled')
            "#,
        )
        .bind(route_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Error counting open stops", e))?;

        if open_stops.0 > 0 {
            return Err(AppError::InvalidState(format!(
                "Route {} still has {} non-terminal stops",
                route_id, open_stops.0
            )));
        }

        let finalized = sqlx::query_as::<_, Route>(
            r#"
            UPDATE routes
            SET completed_at = NOW(),
                actual_duration_minutes = $1,
                actual_distance_km = $2,
                version = version + 1,
                updated_at = NOW()
            WHERE id = $3
            RETURNING *
            "#,
        )
        .bind(actual_duration_minutes)
        .bind(Decimal::from_f64_retain(actual_distance_km))
        .bind(route_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("Error finalizing route", e))?;

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("Error committing finalize_route", e))?;

        Ok(finalized)
    }

    /// Bloquear la fila de la ruta; 55P03 se traduce a conflicto reintentable
    async fn lock_route(
        tx: &mut Transaction<'_, Postgres>,
        route_id: Uuid,
        organization_id: Uuid,
    ) -> AppResult<Route> {
        sqlx::query_as::<_, Route>(
            r#"
            SELECT * FROM routes
            WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
            FOR UPDATE NOWAIT
            "#,
        )
        .bind(route_id)
        .bind(organization_id)
        .fetch_optional(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("Error locking route", e))?
        .ok_or_else(|| AppError::NotFound(format!("Route {} not found", route_id)))
    }

    fn ensure_mutable(route: &Route) -> AppResult<()> {
        if route.completed_at.is_some() {
            return Err(AppError::InvalidState(format!(
                "Route {} is completed and frozen",
                route.id
            )));
        }
        Ok(())
    }

    async fn bump_version(tx: &mut Transaction<'_, Postgres>, route_id: Uuid) -> AppResult<()> {
        sqlx::query("UPDATE routes SET version = version + 1, updated_at = NOW() WHERE id = $1")
            .bind(route_id)
            .execute(&mut **tx)
            .await
            .map_err(|e| map_sqlx_error("Error bumping route version", e))?;
        Ok(())
    }
}

/// Asignación de slots para `replace_sequence`.
///
/// Las paradas terminales conservan su número de secuencia; los ids
/// ordenados llenan los slots libres en orden ascendente. El conjunto de
/// ids debe coincidir exactamente con las paradas no terminales.
pub fn compute_sequence_assignment(
    stops: &[RouteStop],
    ordered_stop_ids: &[Uuid],
) -> AppResult<Vec<(Uuid, i32)>> {
    let non_terminal: HashSet<Uuid> = stops
        .iter()
        .filter(|s| !s.status.is_terminal())
        .map(|s| s.id)
        .collect();

    let requested: HashSet<Uuid> = ordered_stop_ids.iter().copied().collect();

    if requested.len() != ordered_stop_ids.len() {
        return Err(AppError::SequenceMismatch(
            "Duplicate stop ids in requested order".to_string(),
        ));
    }

    if requested != non_terminal {
        return Err(AppError::SequenceMismatch(format!(
            "Requested order covers {} stops but the route has {} non-terminal stops",
            requested.len(),
            non_terminal.len()
        )));
    }

    let frozen_slots: HashSet<i32> = stops
        .iter()
        .filter(|s| s.status.is_terminal())
        .map(|s| s.sequence)
        .collect();

    let mut free_slots: Vec<i32> = (1..=stops.len() as i32)
        .filter(|slot| !frozen_slots.contains(slot))
        .collect();
    free_slots.sort_unstable();

    if free_slots.len() != ordered_stop_ids.len() {
        return Err(AppError::Internal(format!(
            "Sequence slots are corrupted: {} free slots for {} stops",
            free_slots.len(),
            ordered_stop_ids.len()
        )));
    }

    Ok(ordered_stop_ids
        .iter()
        .copied()
        .zip(free_slots)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn stop_with(id: u128, sequence: i32, status: StopStatus) -> RouteStop {
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
            latitude: Some(48.85),
            longitude: Some(2.35),
            notes: None,
            metadata: serde_json::json!({}),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_assignment_without_terminal_stops_is_dense() {
        let stops = vec![
            stop_with(1, 1, StopStatus::Pending),
            stop_with(2, 2, StopStatus::Pending),
            stop_with(3, 3, StopStatus::Pending),
        ];
        let order = vec![Uuid::from_u128(3), Uuid::from_u128(1), Uuid::from_u128(2)];

        let assignments = compute_sequence_assignment(&stops, &order).unwrap();
        assert_eq!(
            assignments,
            vec![
                (Uuid::from_u128(3), 1),
                (Uuid::from_u128(1), 2),
                (Uuid::from_u128(2), 3),
            ]
        );
    }

    #[test]
    fn test_assignment_preserves_frozen_slots() {
        // La parada 2 ya partió y conserva su slot 2
        let stops = vec![
            stop_with(1, 1, StopStatus::Pending),
            stop_with(2, 2, StopStatus::Departed),
            stop_with(3, 3, StopStatus::Pending),
            stop_with(4, 4, StopStatus::Skipped),
            stop_with(5, 5, StopStatus::EnRoute),
        ];
        let order = vec![Uuid::from_u128(5), Uuid::from_u128(3), Uuid::from_u128(1)];

        let assignments = compute_sequence_assignment(&stops, &order).unwrap();
        // Slots libres: 1, 3, 5 (2 y 4 congelados)
        assert_eq!(
            assignments,
            vec![
                (Uuid::from_u128(5), 1),
                (Uuid::from_u128(3), 3),
                (Uuid::from_u128(1), 5),
            ]
        );
    }

    #[test]
    fn test_assignment_rejects_wrong_set() {
        let stops = vec![
            stop_with(1, 1, StopStatus::Pending),
            stop_with(2, 2, StopStatus::Pending),
        ];

        // Falta la parada 2
        let result = compute_sequence_assignment(&stops, &[Uuid::from_u128(1)]);
        assert!(matches!(result, Err(AppError::SequenceMismatch(_))));

        // Incluye una parada ajena
        let result =
            compute_sequence_assignment(&stops, &[Uuid::from_u128(1), Uuid::from_u128(9)]);
        assert!(matches!(result, Err(AppError::SequenceMismatch(_))));
    }

    #[test]
    fn test_assignment_rejects_duplicates() {
        let stops = vec![
            stop_with(1, 1, StopStatus::Pending),
            stop_with(2, 2, StopStatus::Pending),
        ];
        let result =
            compute_sequence_assignment(&stops, &[Uuid::from_u128(1), Uuid::from_u128(1)]);
        assert!(matches!(result, Err(AppError::SequenceMismatch(_))));
    }

    #[test]
    fn test_assignment_rejects_terminal_stops_in_order() {
        let stops = vec![
            stop_with(1, 1, StopStatus::Departed),
            stop_with(2, 2, StopStatus::Pending),
        ];
        let result =
            compute_sequence_assignment(&stops, &[Uuid::from_u128(1), Uuid::from_u128(2)]);
        assert!(matches!(result, Err(AppError::SequenceMismatch(_))));
    }
}
