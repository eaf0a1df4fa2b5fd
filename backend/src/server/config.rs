//! Inputs resolved at startup and handed to [`super::create_server`].

use std::net::SocketAddr;

use actix_web::web;

use civic_complaints::inbound::http::pages::PageTemplates;
use civic_complaints::inbound::http::session_config::SessionSettings;
use civic_complaints::inbound::http::state::HttpState;

pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// Driving ports, already wired to the configured backend.
    pub http_state: web::Data<HttpState>,
    /// Cookie key and attributes; a middleware is built from these per worker.
    pub session: SessionSettings,
    pub templates: PageTemplates,
}
