//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint under `/api` plus the health
//! probes, the schema wrappers from [`crate::inbound::http::schemas`], and the
//! session cookie security scheme. Swagger UI serves it in debug builds and
//! `openapi-dump` prints it for external tooling.

use crate::inbound::http::schemas::{
    ComplaintRecordSchema, ComplaintStatsSchema, ComplaintViewSchema, DepartmentSchema,
    DepartmentSummarySchema, ErrorCodeSchema, ErrorSchema, SubmitterSummarySchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Civic complaints API",
        description = "File and track complaints against municipal departments."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::accounts::register,
        crate::inbound::http::accounts::login,
        crate::inbound::http::accounts::logout,
        crate::inbound::http::accounts::me,
        crate::inbound::http::departments::list_departments,
        crate::inbound::http::departments::create_department,
        crate::inbound::http::complaints::create_complaint,
        crate::inbound::http::complaints::list_complaints,
        crate::inbound::http::complaints::update_complaint,
        crate::inbound::http::complaints::stats,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        DepartmentSchema,
        ComplaintRecordSchema,
        ComplaintViewSchema,
        DepartmentSummarySchema,
        SubmitterSummarySchema,
        ComplaintStatsSchema
    )),
    tags(
        (name = "accounts", description = "Registration, login, and the current session"),
        (name = "departments", description = "Municipal departments"),
        (name = "complaints", description = "Complaints and their status"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
