//! Health endpoints tracking the service lifecycle.
//!
//! The process moves through [`Stage::Starting`], [`Stage::Migrated`] once
//! the schema is current, [`Stage::Serving`] once the listener is bound, and
//! finally [`Stage::Draining`] after a shutdown signal. Readiness holds only
//! while serving; liveness fails only while draining. Both probes report the
//! current stage as JSON.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use utoipa::ToSchema;

/// Lifecycle stage reported by the probes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Stage {
    /// Settings loaded; migrations have not finished.
    Starting = 0,
    /// Migrations applied and the pool is open.
    Migrated = 1,
    /// Listener bound and accepting traffic.
    Serving = 2,
    /// Shutdown requested; in-flight requests are finishing.
    Draining = 3,
}

impl Stage {
    const fn from_u8(raw: u8) -> Self {
        match raw {
            0 => Self::Starting,
            1 => Self::Migrated,
            2 => Self::Serving,
            _ => Self::Draining,
        }
    }
}

/// Probe body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct StageReport {
    /// Current lifecycle stage.
    pub stage: Stage,
}

/// Shared lifecycle state read by the probes.
#[derive(Debug)]
pub struct HealthState {
    stage: AtomicU8,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            stage: AtomicU8::new(Stage::Starting as u8),
        }
    }
}

impl HealthState {
    /// Start in [`Stage::Starting`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Current stage.
    #[must_use]
    pub fn stage(&self) -> Stage {
        Stage::from_u8(self.stage.load(Ordering::Acquire))
    }

    fn advance(&self, from: Stage, to: Stage) -> bool {
        self.stage
            .compare_exchange(from as u8, to as u8, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Record that migrations finished. Returns `false` unless starting.
    pub fn mark_migrated(&self) -> bool {
        self.advance(Stage::Starting, Stage::Migrated)
    }

    /// Record that the listener is bound. Returns `false` unless migrated.
    pub fn mark_serving(&self) -> bool {
        self.advance(Stage::Migrated, Stage::Serving)
    }

    /// Enter the terminal draining stage.
    pub fn mark_draining(&self) {
        self.stage.store(Stage::Draining as u8, Ordering::Release);
    }

    /// Whether readiness checks pass.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.stage() == Stage::Serving
    }

    /// Whether liveness checks pass.
    #[must_use]
    pub fn is_alive(&self) -> bool {
        self.stage() != Stage::Draining
    }

    fn probe_response(&self, probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };
        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .json(StageReport {
                stage: self.stage(),
            })
    }
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Migrated and serving", body = StageReport),
        (status = 503, description = "Starting, migrating or draining", body = StageReport)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    state.probe_response(state.is_ready())
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Process is alive", body = StageReport),
        (status = 503, description = "Draining after a shutdown signal", body = StageReport)
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    state.probe_response(state.is_alive())
}
