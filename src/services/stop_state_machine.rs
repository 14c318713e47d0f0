//! Máquina de estados de paradas
//!
//! Valida y aplica transiciones de estado sobre paradas individuales.
//! Es lógica pura: el servicio decide qué hacer con el resultado y el
//! repositorio persiste los timestamps.
//!
//! ```text
//! PENDING  -> EN_ROUTE | SKIPPED | CANCELLED
//! EN_ROUTE -> ARRIVED  | SKIPPED
//! ARRIVED  -> DEPARTED
//! ```

use chrono::{DateTime, Utc};

use crate::models::route_stop::{ProgressEvent, StopStatus};
use crate::utils::errors::{AppError, AppResult};

/// Resultado de aplicar un evento: nuevo estado y timestamps a estampar
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionOutcome {
    pub status: StopStatus,
    pub actual_arrival: Option<DateTime<Utc>>,
    pub departed_at: Option<DateTime<Utc>>,
}

/// Estado destino de cada evento, usado para nombrar transiciones ilegales
pub fn target_status(event: ProgressEvent) -> StopStatus {
    match event {
        ProgressEvent::StartTravel => StopStatus::EnRoute,
        ProgressEvent::Arrive => StopStatus::Arrived,
        ProgressEvent::Depart => StopStatus::Departed,
        ProgressEvent::Skip => StopStatus::Skipped,
        ProgressEvent::Cancel => StopStatus::Cancelled,
    }
}

/// Aplicar un evento de progreso sobre el estado actual de una parada.
///
/// Entrar a ARRIVED estampa `actual_arrival`; entrar a DEPARTED estampa
/// `departed_at`. Cualquier par (estado, evento) fuera de la tabla falla
/// con `IllegalTransition` sin efectos.
pub fn apply_event(
    current: StopStatus,
    event: ProgressEvent,
    at: DateTime<Utc>,
) -> AppResult<TransitionOutcome> {
    let outcome = match (current, event) {
        (StopStatus::Pending, ProgressEvent::StartTravel) => TransitionOutcome {
            status: StopStatus::EnRoute,
            actual_arrival: None,
            departed_at: None,
        },
        (StopStatus::Pending, ProgressEvent::Skip) => TransitionOutcome {
            status: StopStatus::Skipped,
            actual_arrival: None,
            departed_at: None,
        },
        (StopStatus::Pending, ProgressEvent::Cancel) => TransitionOutcome {
            status: StopStatus::Cancelled,
            actual_arrival: None,
            departed_at: None,
        },
        (StopStatus::EnRoute, ProgressEvent::Arrive) => TransitionOutcome {
            status: StopStatus::Arrived,
            actual_arrival: Some(at),
            departed_at: None,
        },
        (StopStatus::EnRoute, ProgressEvent::Skip) => TransitionOutcome {
            status: StopStatus::Skipped,
            actual_arrival: None,
            departed_at: None,
        },
        (StopStatus::Arrived, ProgressEvent::Depart) => TransitionOutcome {
            status: StopStatus::Departed,
            actual_arrival: None,
            departed_at: Some(at),
        },
        (from, event) => {
            return Err(AppError::IllegalTransition {
                from: from.to_string(),
                to: target_status(event).to_string(),
            })
        }
    };

    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        "2026-08-06T09:30:00Z".parse().unwrap()
    }

    #[test]
    fn test_legal_transitions() {
        let cases = [
            (StopStatus::Pending, ProgressEvent::StartTravel, StopStatus::EnRoute),
            (StopStatus::Pending, ProgressEvent::Skip, StopStatus::Skipped),
            (StopStatus::Pending, ProgressEvent::Cancel, StopStatus::Cancelled),
            (StopStatus::EnRoute, ProgressEvent::Arrive, StopStatus::Arrived),
            (StopStatus::EnRoute, ProgressEvent::Skip, StopStatus::Skipped),
            (StopStatus::Arrived, ProgressEvent::Depart, StopStatus::Departed),
        ];

        for (current, event, expected) in cases {
            let outcome = apply_event(current, event, now()).unwrap();
            assert_eq!(outcome.status, expected, "{} + {}", current, event);
        }
    }

    #[test]
    fn test_arrive_stamps_actual_arrival() {
        let at = now();
        let outcome = apply_event(StopStatus::EnRoute, ProgressEvent::Arrive, at).unwrap();
        assert_eq!(outcome.actual_arrival, Some(at));
        assert_eq!(outcome.departed_at, None);
    }

    #[test]
    fn test_depart_stamps_departed_at() {
        let at = now();
        let outcome = apply_event(StopStatus::Arrived, ProgressEvent::Depart, at).unwrap();
        assert_eq!(outcome.departed_at, Some(at));
        assert_eq!(outcome.actual_arrival, None);
    }

    #[test]
    fn test_all_illegal_pairs_fail() {
        let statuses = [
            StopStatus::Pending,
            StopStatus::EnRoute,
            StopStatus::Arrived,
            StopStatus::Departed,
            StopStatus::Skipped,
            StopStatus::Cancelled,
        ];
        let events = [
            ProgressEvent::StartTravel,
            ProgressEvent::Arrive,
            ProgressEvent::Depart,
            ProgressEvent::Skip,
            ProgressEvent::Cancel,
        ];
        let legal = [
            (StopStatus::Pending, ProgressEvent::StartTravel),
            (StopStatus::Pending, ProgressEvent::Skip),
            (StopStatus::Pending, ProgressEvent::Cancel),
            (StopStatus::EnRoute, ProgressEvent::Arrive),
            (StopStatus::EnRoute, ProgressEvent::Skip),
            (StopStatus::Arrived, ProgressEvent::Depart),
        ];

        for status in statuses {
            for event in events {
                let result = apply_event(status, event, now());
                if legal.contains(&(status, event)) {
                    assert!(result.is_ok(), "{} + {} should be legal", status, event);
                } else {
                    match result {
                        Err(AppError::IllegalTransition { from, to }) => {
                            assert_eq!(from, status.to_string());
                            assert_eq!(to, target_status(event).to_string());
                        }
                        other => panic!("{} + {} expected IllegalTransition, got {:?}", status, event, other.map(|_| ())),
                    }
                }
            }
        }
    }

    #[test]
    fn test_terminal_states_accept_nothing() {
        for status in [StopStatus::Departed, StopStatus::Skipped, StopStatus::Cancelled] {
            for event in [
                ProgressEvent::StartTravel,
                ProgressEvent::Arrive,
                ProgressEvent::Depart,
                ProgressEvent::Skip,
                ProgressEvent::Cancel,
            ] {
                assert!(apply_event(status, event, now()).is_err());
            }
        }
    }

    #[test]
    fn test_double_arrive_is_illegal() {
        // ARRIVE sobre una parada ya ARRIVED debe fallar
        let result = apply_event(StopStatus::Arrived, ProgressEvent::Arrive, now());
        assert!(matches!(result, Err(AppError::IllegalTransition { .. })));
    }
}
