//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their wire shape so handlers can reference them in
//! `#[utoipa::path]` annotations.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// Authentication failed or is missing.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Authenticated but not permitted to perform this action.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The backend could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "Missing required fields")]
    message: String,
    /// Correlation identifier, echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`crate::domain::Department`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Department)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DepartmentSchema {
    #[schema(example = 1)]
    id: i64,
    #[schema(example = "Roads")]
    name: String,
}

/// OpenAPI schema for [`crate::domain::ComplaintRecord`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ComplaintRecord)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ComplaintRecordSchema {
    #[schema(example = 42)]
    id: i64,
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    user_id: String,
    #[schema(example = 1)]
    department_id: i64,
    #[schema(example = "Pothole on Main St")]
    title: String,
    description: String,
    /// One of `Pending`, `In Progress`, `Resolved`, `Rejected`.
    #[schema(example = "Pending")]
    status: String,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
}

/// Department name embedded in complaint listings.
#[derive(ToSchema)]
#[schema(as = crate::domain::DepartmentSummary)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DepartmentSummarySchema {
    name: String,
}

/// Submitter profile embedded in complaint listings.
#[derive(ToSchema)]
#[schema(as = crate::domain::SubmitterSummary)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct SubmitterSummarySchema {
    full_name: Option<String>,
    email: Option<String>,
}

/// OpenAPI schema for [`crate::domain::ComplaintView`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ComplaintView)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ComplaintViewSchema {
    id: i64,
    user_id: String,
    department_id: i64,
    title: String,
    description: String,
    status: String,
    created_at: Option<chrono::DateTime<chrono::Utc>>,
    departments: Option<DepartmentSummarySchema>,
    profiles: Option<SubmitterSummarySchema>,
}

/// OpenAPI schema for [`crate::domain::ComplaintStats`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ComplaintStats)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ComplaintStatsSchema {
    #[schema(example = 12)]
    total: u64,
    #[schema(example = 5)]
    resolved: u64,
    #[schema(example = 4)]
    pending: u64,
}
