//! Drives a [`SessionState`] through user actions and service calls.

use crate::error::SessionError;
use crate::service::{is_outage, RouteService};
use crate::state::{Action, ServiceStatus, SessionState, Stage};
use routeplan_core::export::{ExportBundle, ExportFormat};
use routeplan_core::ingest::{load_file, FileFormat};
use routeplan_core::model::{ConstraintUpdate, Constraints, DeliveryPoint, Route};
use routeplan_core::validation::ValidationResult;
use routeplan_core::{Error, Result};
use routeplan_telemetry::{Event, Timer};
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// One planning session against a route service.
///
/// Calls run one at a time; each completed call replaces the state.
pub struct Session<S> {
    service: S,
    state: SessionState,
}

impl<S: RouteService> Session<S> {
    pub fn new(service: S) -> Self {
        Self::with_state(service, SessionState::new())
    }

    pub fn with_state(service: S, state: SessionState) -> Self {
        Self { service, state }
    }

    /// Current snapshot
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    fn dispatch(&mut self, action: Action) -> std::result::Result<(), SessionError> {
        let next = self.state.apply(action)?;
        if next.stage() != self.state.stage() {
            info!(from = ?self.state.stage(), to = ?next.stage(), "Session stage changed");
        }
        self.state = next;
        Ok(())
    }

    /// Record a failure on the overlay, mark outages, and hand the error back.
    fn fail_load(&mut self, err: Error) -> Error {
        self.note_outage(&err);
        // LoadFailed is accepted from every stage.
        let _ = self.dispatch(Action::LoadFailed(err.user_message()));
        err
    }

    fn note_outage(&mut self, err: &Error) {
        if is_outage(err) {
            warn!(code = %err.code, "Marking route service unavailable");
            let _ = self.dispatch(Action::ServiceChecked(ServiceStatus::Unavailable));
        }
    }

    fn loaded(&mut self, points: Vec<DeliveryPoint>, source: &str) -> Result<usize> {
        let count = points.len();
        self.dispatch(Action::DataLoaded(points))?;
        Event::new("data_loaded", json!({ "source": source, "points": count })).log();
        Ok(count)
    }

    /// Check the service; success re-enables sample loading and generation.
    pub async fn check_health(&mut self) -> Result<()> {
        let result = self.service.check_health().await;
        let status = if result.is_ok() {
            ServiceStatus::Available
        } else {
            ServiceStatus::Unavailable
        };
        self.dispatch(Action::ServiceChecked(status))?;
        result
    }

    /// Parse and validate a local CSV/JSON file.
    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        match load_file(path.as_ref()) {
            Ok(points) => self.loaded(points, "file"),
            Err(err) => Err(self.fail_load(err)),
        }
    }

    /// Have the service parse the file instead.
    ///
    /// The extension is checked locally first, as for [`Session::load_file`].
    pub async fn upload_file(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        let path = path.as_ref();
        if let Err(err) = FileFormat::from_path(path) {
            return Err(self.fail_load(err));
        }
        match self.service.upload_file(path).await {
            Ok(points) => self.loaded(points, "upload"),
            Err(err) => Err(self.fail_load(err)),
        }
    }

    /// Fetch the service's sample set.
    pub async fn load_sample(&mut self) -> Result<usize> {
        if !self.state.can_load_sample() {
            return Err(SessionError::ServiceUnavailable.into());
        }
        match self.service.fetch_sample().await {
            Ok(points) => self.loaded(points, "sample"),
            Err(err) => Err(self.fail_load(err)),
        }
    }

    /// Use points obtained elsewhere, e.g. the built-in sample.
    pub fn load_points(&mut self, points: Vec<DeliveryPoint>) -> Result<usize> {
        self.loaded(points, "local")
    }

    /// Edit one constraint field; returns the field-keyed check of the result.
    pub fn update_constraint(&mut self, update: ConstraintUpdate) -> ValidationResult {
        // ConstraintChanged is accepted from every stage.
        let _ = self.dispatch(Action::ConstraintChanged(update));
        self.state.constraint_check()
    }

    /// Replace all constraints at once.
    pub fn set_constraints(&mut self, constraints: Constraints) -> ValidationResult {
        let _ = self.dispatch(Action::ConstraintsReplaced(constraints));
        self.state.constraint_check()
    }

    /// Ask the service for routes over the loaded points.
    pub async fn generate(&mut self) -> Result<&[Route]> {
        self.dispatch(Action::GenerationStarted)?;
        let generation = self.state.generation();
        let timer = Timer::start("generate_routes");

        let result = self
            .service
            .generate_routes(self.state.points(), self.state.constraints())
            .await;
        let elapsed = timer.stop();

        match result {
            Ok(routes) => {
                let count = routes.len();
                self.dispatch(Action::RoutesGenerated { generation, routes })?;
                Event::new(
                    "routes_generated",
                    json!({ "routes": count, "elapsed_ms": elapsed.as_millis() as u64 }),
                )
                .log();
                Ok(self.state.routes())
            }
            Err(err) => {
                self.dispatch(Action::GenerationFailed {
                    generation,
                    message: err.user_message(),
                })?;
                self.note_outage(&err);
                Err(err)
            }
        }
    }

    /// Write the current plan to `dir` as `routes_<date>.<ext>`.
    pub fn export(&self, format: ExportFormat, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let bundle = self.bundle()?;
        bundle.write_to_dir(format, dir)
    }

    /// Write the current plan to an explicit path.
    pub fn export_to(&self, format: ExportFormat, path: impl AsRef<Path>) -> Result<()> {
        let bundle = self.bundle()?;
        bundle.write_to_file(format, path)
    }

    /// Read-only view of the current plan.
    pub fn bundle(&self) -> Result<ExportBundle<'_>> {
        match self.state.stage() {
            Stage::RoutesAvailable => Ok(ExportBundle::new(
                self.state.routes(),
                self.state.points(),
                self.state.constraints(),
            )),
            Stage::NoData | Stage::DataLoaded | Stage::Generating => Err(SessionError::NoRoutes.into()),
        }
    }

    /// Clear the error overlay.
    pub fn dismiss_error(&mut self) {
        let _ = self.dispatch(Action::ErrorDismissed);
    }
}
