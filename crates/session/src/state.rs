//! Session state and the transitions between stages.
//!
//! [`SessionState`] is never mutated in place. [`SessionState::apply`] takes
//! an [`Action`] and returns the next state, or a [`SessionError`] when the
//! action is not allowed from the current stage.

use crate::error::SessionError;
use routeplan_core::model::{ConstraintUpdate, Constraints, DeliveryPoint, PointIndex, Route};
use routeplan_core::validation::{validate_constraints, ValidationResult};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Where the session is in the load, generate, review cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    NoData,
    DataLoaded,
    Generating,
    RoutesAvailable,
}

/// Last known reachability of the route service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceStatus {
    #[default]
    Unknown,
    Available,
    Unavailable,
}

/// Identifies one generation request so a stale reply can be recognised.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct GenerationId(u64);

/// Everything that can happen to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// New delivery data replaced the old set
    DataLoaded(Vec<DeliveryPoint>),
    /// An upload or sample fetch failed
    LoadFailed(String),
    /// One constraint field was edited
    ConstraintChanged(ConstraintUpdate),
    /// The whole constraint set was replaced
    ConstraintsReplaced(Constraints),
    /// A generation request is about to be sent
    GenerationStarted,
    /// The service answered a generation request
    RoutesGenerated {
        generation: GenerationId,
        routes: Vec<Route>,
    },
    /// A generation request failed
    GenerationFailed {
        generation: GenerationId,
        message: String,
    },
    /// Result of a health check or an observed outage
    ServiceChecked(ServiceStatus),
    /// The user acknowledged the current error
    ErrorDismissed,
}

/// One immutable snapshot of a planning session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    stage: Stage,
    points: Arc<[DeliveryPoint]>,
    constraints: Constraints,
    routes: Arc<[Route]>,
    error: Option<String>,
    service: ServiceStatus,
    generation: GenerationId,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            stage: Stage::NoData,
            points: Arc::from(Vec::new()),
            constraints: Constraints::default(),
            routes: Arc::from(Vec::new()),
            error: None,
            service: ServiceStatus::Unknown,
            generation: GenerationId::default(),
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn points(&self) -> &[DeliveryPoint] {
        &self.points
    }

    pub fn constraints(&self) -> &Constraints {
        &self.constraints
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Error overlay, independent of the stage
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn service(&self) -> ServiceStatus {
        self.service
    }

    /// Id of the most recently started generation
    pub fn generation(&self) -> GenerationId {
        self.generation
    }

    /// Field-keyed problems with the current constraints.
    pub fn constraint_check(&self) -> ValidationResult {
        validate_constraints(&self.constraints)
    }

    /// Lookup table for rendering the current routes.
    pub fn point_index(&self) -> PointIndex<'_> {
        PointIndex::new(&self.points)
    }

    /// Why generation would be refused right now, if it would.
    pub fn generation_blocker(&self) -> Option<SessionError> {
        match self.stage {
            Stage::NoData => return Some(SessionError::NoData),
            Stage::Generating => return Some(SessionError::AlreadyGenerating),
            Stage::DataLoaded | Stage::RoutesAvailable => {}
        }
        if self.service == ServiceStatus::Unavailable {
            return Some(SessionError::ServiceUnavailable);
        }
        let check = self.constraint_check();
        if !check.is_valid() {
            let messages = check
                .errors()
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect();
            return Some(SessionError::InvalidConstraints(messages));
        }
        None
    }

    pub fn can_generate(&self) -> bool {
        self.generation_blocker().is_none()
    }

    /// Sample data needs the service unless it is known to be down.
    pub fn can_load_sample(&self) -> bool {
        self.service != ServiceStatus::Unavailable
    }

    /// Produce the next state.
    pub fn apply(&self, action: Action) -> Result<Self, SessionError> {
        let next = match action {
            Action::DataLoaded(points) => self.with_points(points),
            Action::LoadFailed(message) => Self {
                error: Some(message),
                ..self.clone()
            },
            Action::ConstraintChanged(update) => {
                let constraints = self.constraints.clone().apply(update);
                self.with_constraints(constraints)
            }
            Action::ConstraintsReplaced(constraints) => self.with_constraints(constraints),
            Action::GenerationStarted => {
                if let Some(blocker) = self.generation_blocker() {
                    warn!(stage = ?self.stage, reason = %blocker, "Generation rejected");
                    return Err(blocker);
                }
                Self {
                    stage: Stage::Generating,
                    error: None,
                    generation: GenerationId(self.generation.0 + 1),
                    ..self.clone()
                }
            }
            Action::RoutesGenerated { generation, routes } => match self.stage {
                Stage::Generating if generation == self.generation => {
                    let index = self.point_index();
                    let unknown: usize = routes.iter().map(|r| r.unknown_stops(&index).len()).sum();
                    if unknown > 0 {
                        warn!(unknown, "Routes reference unknown delivery ids");
                    }
                    Self {
                        stage: Stage::RoutesAvailable,
                        routes: Arc::from(routes),
                        error: None,
                        service: ServiceStatus::Available,
                        ..self.clone()
                    }
                }
                Stage::Generating | Stage::NoData | Stage::DataLoaded | Stage::RoutesAvailable => {
                    debug!(?generation, current = ?self.generation, "Discarding superseded routes");
                    self.clone()
                }
            },
            Action::GenerationFailed {
                generation,
                message,
            } => match self.stage {
                Stage::Generating if generation == self.generation => Self {
                    stage: Stage::DataLoaded,
                    error: Some(message),
                    ..self.clone()
                },
                Stage::Generating | Stage::NoData | Stage::DataLoaded | Stage::RoutesAvailable => {
                    debug!(?generation, "Discarding superseded generation failure");
                    self.clone()
                }
            },
            Action::ServiceChecked(service) => Self {
                service,
                ..self.clone()
            },
            Action::ErrorDismissed => Self {
                error: None,
                ..self.clone()
            },
        };
        Ok(next)
    }

    fn with_points(&self, points: Vec<DeliveryPoint>) -> Self {
        let stage = if points.is_empty() {
            Stage::NoData
        } else {
            Stage::DataLoaded
        };
        Self {
            stage,
            points: Arc::from(points),
            routes: Arc::from(Vec::new()),
            error: None,
            ..self.clone()
        }
    }

    fn with_constraints(&self, constraints: Constraints) -> Self {
        let stage = match self.stage {
            Stage::RoutesAvailable => Stage::DataLoaded,
            Stage::NoData | Stage::DataLoaded | Stage::Generating => self.stage,
        };
        let routes = match self.stage {
            Stage::RoutesAvailable => Arc::from(Vec::new()),
            Stage::NoData | Stage::DataLoaded | Stage::Generating => Arc::clone(&self.routes),
        };
        Self {
            stage,
            constraints,
            routes,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use routeplan_core::model::RouteStop;
    use routeplan_core::sample::sample_delivery_points;

    fn loaded() -> SessionState {
        SessionState::new()
            .apply(Action::DataLoaded(sample_delivery_points()))
            .unwrap()
    }

    fn route(ids: &[&str]) -> Route {
        Route {
            route_id: Some(1),
            stops: ids
                .iter()
                .map(|id| RouteStop {
                    delivery_id: (*id).to_string(),
                    distance_from_previous: None,
                })
                .collect(),
            total_distance: 4.2,
            estimated_time: 30.0,
            summary: None,
        }
    }

    fn with_routes() -> SessionState {
        let generating = loaded().apply(Action::GenerationStarted).unwrap();
        generating
            .apply(Action::RoutesGenerated {
                generation: generating.generation(),
                routes: vec![route(&["D001", "D002"])],
            })
            .unwrap()
    }

    #[test]
    fn test_initial_state() {
        let state = SessionState::new();
        assert_eq!(state.stage(), Stage::NoData);
        assert!(state.points().is_empty());
        assert_eq!(state.service(), ServiceStatus::Unknown);
        assert!(state.can_load_sample());
        assert!(!state.can_generate());
    }

    #[test]
    fn test_generation_requires_data() {
        let err = SessionState::new().apply(Action::GenerationStarted).unwrap_err();
        assert_eq!(err, SessionError::NoData);
    }

    #[test]
    fn test_full_cycle() {
        let state = with_routes();
        assert_eq!(state.stage(), Stage::RoutesAvailable);
        assert_eq!(state.routes().len(), 1);
        assert_eq!(state.service(), ServiceStatus::Available);
        assert!(state.error().is_none());
    }

    #[test]
    fn test_no_second_generation_while_generating() {
        let generating = loaded().apply(Action::GenerationStarted).unwrap();
        assert_eq!(
            generating.apply(Action::GenerationStarted).unwrap_err(),
            SessionError::AlreadyGenerating
        );
    }

    #[test]
    fn test_new_data_drops_routes() {
        let state = with_routes()
            .apply(Action::DataLoaded(sample_delivery_points()[..3].to_vec()))
            .unwrap();
        assert_eq!(state.stage(), Stage::DataLoaded);
        assert!(state.routes().is_empty());
        assert_eq!(state.points().len(), 3);
    }

    #[test]
    fn test_empty_data_means_no_data() {
        let state = loaded().apply(Action::DataLoaded(Vec::new())).unwrap();
        assert_eq!(state.stage(), Stage::NoData);
    }

    #[test]
    fn test_constraint_change_drops_routes() {
        let state = with_routes()
            .apply(Action::ConstraintChanged(ConstraintUpdate::MaxStopsPerRoute(3)))
            .unwrap();
        assert_eq!(state.stage(), Stage::DataLoaded);
        assert!(state.routes().is_empty());
        assert_eq!(state.constraints().max_stops_per_route, 3);
    }

    #[test]
    fn test_constraint_change_without_routes_keeps_stage() {
        let state = SessionState::new()
            .apply(Action::ConstraintChanged(ConstraintUpdate::VehicleCapacity(5)))
            .unwrap();
        assert_eq!(state.stage(), Stage::NoData);
        assert_eq!(state.constraints().vehicle_capacity, 5);
    }

    #[test]
    fn test_invalid_constraints_block_generation() {
        let state = loaded()
            .apply(Action::ConstraintChanged(ConstraintUpdate::MaxStopsPerRoute(0)))
            .unwrap();
        match state.apply(Action::GenerationStarted).unwrap_err() {
            SessionError::InvalidConstraints(messages) => {
                assert!(messages[0].starts_with("max_stops_per_route"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_unavailable_service_blocks_generation_and_sample() {
        let down = loaded()
            .apply(Action::ServiceChecked(ServiceStatus::Unavailable))
            .unwrap();
        assert!(!down.can_load_sample());
        assert_eq!(
            down.apply(Action::GenerationStarted).unwrap_err(),
            SessionError::ServiceUnavailable
        );

        let up = down
            .apply(Action::ServiceChecked(ServiceStatus::Available))
            .unwrap();
        assert!(up.can_load_sample());
        assert!(up.apply(Action::GenerationStarted).is_ok());
    }

    #[test]
    fn test_superseded_result_is_discarded() {
        let generating = loaded().apply(Action::GenerationStarted).unwrap();
        let stale = generating.generation();

        let reloaded = generating
            .apply(Action::DataLoaded(sample_delivery_points()))
            .unwrap();
        assert_eq!(reloaded.stage(), Stage::DataLoaded);

        let after = reloaded
            .apply(Action::RoutesGenerated {
                generation: stale,
                routes: vec![route(&["D001"])],
            })
            .unwrap();
        assert_eq!(after, reloaded);
    }

    #[test]
    fn test_older_generation_id_is_discarded() {
        let first = loaded().apply(Action::GenerationStarted).unwrap();
        let stale = first.generation();
        let failed = first
            .apply(Action::GenerationFailed {
                generation: stale,
                message: "boom".into(),
            })
            .unwrap();
        let second = failed.apply(Action::GenerationStarted).unwrap();
        assert!(second.generation() > stale);

        let after = second
            .apply(Action::RoutesGenerated {
                generation: stale,
                routes: vec![route(&["D001"])],
            })
            .unwrap();
        assert_eq!(after.stage(), Stage::Generating);
    }

    #[test]
    fn test_generation_failure_sets_overlay() {
        let generating = loaded().apply(Action::GenerationStarted).unwrap();
        let failed = generating
            .apply(Action::GenerationFailed {
                generation: generating.generation(),
                message: "Request timed out".into(),
            })
            .unwrap();
        assert_eq!(failed.stage(), Stage::DataLoaded);
        assert_eq!(failed.error(), Some("Request timed out"));

        let dismissed = failed.apply(Action::ErrorDismissed).unwrap();
        assert!(dismissed.error().is_none());
        assert_eq!(dismissed.stage(), Stage::DataLoaded);
    }

    #[test]
    fn test_load_failure_keeps_existing_data() {
        let state = with_routes()
            .apply(Action::LoadFailed("Unsupported file type".into()))
            .unwrap();
        assert_eq!(state.stage(), Stage::RoutesAvailable);
        assert_eq!(state.routes().len(), 1);
        assert_eq!(state.error(), Some("Unsupported file type"));
    }

    #[test]
    fn test_apply_leaves_original_untouched() {
        let before = loaded();
        let snapshot = before.clone();
        let _ = before.apply(Action::GenerationStarted).unwrap();
        assert_eq!(before, snapshot);
    }
}
