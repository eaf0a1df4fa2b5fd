//! HTTP inbound adapter exposing the JSON API, HTML pages, and probes.

pub mod accounts;
pub mod complaints;
pub mod departments;
pub mod error;
pub mod health;
pub mod pages;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// JSON API routes, mounted under `/api`.
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api")
        .service(accounts::register)
        .service(accounts::login)
        .service(accounts::logout)
        .service(accounts::me)
        .service(departments::list_departments)
        .service(departments::create_department)
        .service(complaints::create_complaint)
        .service(complaints::list_complaints)
        .service(complaints::update_complaint)
        .service(complaints::stats)
}

/// Register every route the server exposes.
///
/// Callers supply [`state::HttpState`], [`pages::PageTemplates`], and
/// [`health::HealthState`] as app data and wrap the app in session
/// middleware.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(api_scope())
        .service(pages::index)
        .service(pages::login_page)
        .service(pages::register_page)
        .service(pages::dashboard)
        .service(health::ready)
        .service(health::live);
}
