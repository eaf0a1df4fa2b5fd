//! Civic complaints server entry-point.

mod server;

use actix_web::web;
use color_eyre::eyre::{Result, WrapErr, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use civic_complaints::config::AppSettings;
use civic_complaints::inbound::http::health::HealthState;
use civic_complaints::inbound::http::pages::PageTemplates;
use civic_complaints::inbound::http::session_config::{BuildMode, session_settings_from_env};
use server::{ServerConfig, bootstrap_admin, build_http_state, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let backend = settings.backend_settings()?;
    let admin = settings.bootstrap_admin()?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .wrap_err("invalid session configuration")?;

    let templates_dir = settings.templates_dir();
    let templates = PageTemplates::open(&templates_dir)
        .wrap_err_with(|| format!("failed to open templates at {}", templates_dir.display()))?;
    let missing = templates.missing();
    if !missing.is_empty() {
        warn!(dir = %templates_dir.display(), ?missing, "page templates missing");
    }

    let http_state = build_http_state(&backend)?;
    if let Some(credentials) = admin {
        bootstrap_admin(&http_state, credentials).await;
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting civic complaints server");
    let server = create_server(
        health_state.clone(),
        ServerConfig {
            bind_addr,
            http_state,
            session,
            templates,
        },
    )?;
    let handle = server.handle();
    actix_web::rt::spawn(async move {
        if let Err(error) = tokio::signal::ctrl_c().await {
            warn!(%error, "failed to listen for shutdown signal");
            return;
        }
        info!("shutdown requested; draining");
        health_state.mark_draining();
        handle.stop(true).await;
    });
    server.await?;
    Ok(())
}
