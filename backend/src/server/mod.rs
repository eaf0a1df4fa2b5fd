//! HTTP server assembly.

mod config;
mod state_builders;

pub use config::ServerConfig;
pub use state_builders::{bootstrap_admin, build_http_state};

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};
use tracing::info;

use civic_complaints::Trace;
#[cfg(debug_assertions)]
use civic_complaints::doc::ApiDoc;
use civic_complaints::inbound::http;
use civic_complaints::inbound::http::health::HealthState;
use civic_complaints::inbound::http::pages::PageTemplates;
use civic_complaints::inbound::http::session_config::SessionSettings;
use civic_complaints::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// State shared by every worker. `SessionMiddleware` is not `Send`, so only
/// its settings cross into the worker factory.
#[derive(Clone)]
struct Shared {
    health: web::Data<HealthState>,
    http: web::Data<HttpState>,
    templates: web::Data<PageTemplates>,
    session: SessionSettings,
}

impl Shared {
    fn register(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.health.clone())
            .app_data(self.http.clone())
            .app_data(self.templates.clone());
        http::configure(cfg);

        #[cfg(debug_assertions)]
        cfg.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
    }
}

/// Bind the listener and mark `health` ready once the socket is open.
///
/// Signal handling is left to the caller so it can drain the probes before
/// stopping the server.
///
/// # Errors
/// Fails when the address cannot be bound.
pub fn create_server(
    health: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        bind_addr,
        http_state,
        session,
        templates,
    } = config;
    let shared = Shared {
        health: health.clone(),
        http: http_state,
        templates: web::Data::new(templates),
        session,
    };

    let server = HttpServer::new(move || {
        App::new()
            .configure(|cfg| shared.register(cfg))
            .wrap(shared.session.middleware())
            .wrap(Trace)
    })
    .disable_signals()
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "server listening");
    health.mark_ready();
    Ok(server)
}
