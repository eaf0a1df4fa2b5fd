//! Liveness and readiness probes.
//!
//! The process moves through three phases: starting (live, not ready),
//! serving (live and ready) and draining (neither). Probe responses are
//! never cached.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::{HttpResponse, get, http::header, web};

const STARTING: u8 = 0;
const SERVING: u8 = 1;
const DRAINING: u8 = 2;

/// Lifecycle phase shared between bootstrap, the shutdown hook and the probes.
pub struct HealthState {
    phase: AtomicU8,
}

impl Default for HealthState {
    fn default() -> Self {
        Self::new()
    }
}

impl HealthState {
    pub fn new() -> Self {
        Self {
            phase: AtomicU8::new(STARTING),
        }
    }

    /// Called once the listener is bound.
    pub fn mark_ready(&self) {
        let _ = self
            .phase
            .compare_exchange(STARTING, SERVING, Ordering::AcqRel, Ordering::Acquire);
    }

    /// Called on shutdown; both probes fail from here on.
    pub fn mark_draining(&self) {
        self.phase.store(DRAINING, Ordering::Release);
    }

    pub fn is_ready(&self) -> bool {
        self.phase.load(Ordering::Acquire) == SERVING
    }

    pub fn is_alive(&self) -> bool {
        self.phase.load(Ordering::Acquire) != DRAINING
    }
}

fn probe(passing: bool) -> HttpResponse {
    let mut builder = if passing {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    builder
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness probe.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Accepting traffic"),
        (status = 503, description = "Starting up or draining")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_ready())
}

/// Liveness probe.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security([]),
    responses(
        (status = 200, description = "Process is running"),
        (status = 503, description = "Draining for shutdown")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    probe(state.is_alive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;

    async fn statuses(state: web::Data<HealthState>) -> (StatusCode, StatusCode) {
        let app = test::init_service(App::new().app_data(state).service(ready).service(live)).await;
        let mut out = Vec::new();
        for uri in ["/health/ready", "/health/live"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let res = test::call_service(&app, req).await;
            assert_eq!(
                res.headers()
                    .get(header::CACHE_CONTROL)
                    .and_then(|value| value.to_str().ok()),
                Some("no-store")
            );
            out.push(res.status());
        }
        (out[0], out[1])
    }

    #[rstest]
    #[case::starting(&[], StatusCode::SERVICE_UNAVAILABLE, StatusCode::OK)]
    #[case::serving(&["ready"], StatusCode::OK, StatusCode::OK)]
    #[case::draining(
        &["ready", "drain"],
        StatusCode::SERVICE_UNAVAILABLE,
        StatusCode::SERVICE_UNAVAILABLE
    )]
    #[case::drain_is_final(
        &["drain", "ready"],
        StatusCode::SERVICE_UNAVAILABLE,
        StatusCode::SERVICE_UNAVAILABLE
    )]
    #[actix_web::test]
    async fn probes_follow_lifecycle(
        #[case] steps: &[&str],
        #[case] ready_status: StatusCode,
        #[case] live_status: StatusCode,
    ) {
        let state = web::Data::new(HealthState::new());
        for step in steps {
            match *step {
                "ready" => state.mark_ready(),
                _ => state.mark_draining(),
            }
        }
        assert_eq!(statuses(state).await, (ready_status, live_status));
    }
}
