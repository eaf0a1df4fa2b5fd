//! Complaint HTTP handlers.
//!
//! ```text
//! POST /api/complaints {"user_id":"...","department_id":1,"title":"Pothole","description":"..."}
//! GET  /api/complaints?role=citizen&user_id=...
//! PUT  /api/complaints/{id} {"status":"Resolved","comment":"Patched"}
//! GET  /api/stats
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    ComplaintRecord, ComplaintScope, ComplaintStats, ComplaintView, Error, NewComplaint, Role,
    StatusChange,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    ComplaintRecordSchema, ComplaintStatsSchema, ComplaintViewSchema, ErrorSchema,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, NumericInput, missing_field_error, optional_account_id, optional_department_id,
    parse_complaint_id, parse_status, required_text,
};

const MISSING_FIELDS: &str = "Missing required fields";

/// Request body for `POST /api/complaints`. Any `status` sent is ignored.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateComplaintRequest {
    pub user_id: Option<String>,
    #[schema(value_type = Option<i64>)]
    pub department_id: Option<NumericInput>,
    pub title: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComplaintCreated {
    pub message: String,
    #[schema(value_type = Vec<ComplaintRecordSchema>)]
    pub data: Vec<ComplaintRecord>,
}

/// Listing filters for `GET /api/complaints`.
#[derive(Debug, Default, Deserialize, Serialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ComplaintListQuery {
    /// `citizen`, `officer`, or `admin`.
    pub role: Option<String>,
    /// Used when `role=citizen`.
    pub user_id: Option<String>,
    /// Used when `role=officer`.
    pub department_id: Option<String>,
}

/// Request body for `PUT /api/complaints/{id}`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateComplaintRequest {
    /// One of `Pending`, `In Progress`, `Resolved`, `Rejected`.
    pub status: Option<String>,
    pub comment: Option<String>,
    /// Must match the signed-in account when present.
    pub updated_by: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

fn parse_new_complaint(payload: CreateComplaintRequest) -> Result<NewComplaint, Error> {
    let user_field = FieldName::new("user_id");
    let department_field = FieldName::new("department_id");
    let owner = optional_account_id(payload.user_id.as_deref())
        .ok_or_else(|| missing_field_error(user_field, MISSING_FIELDS))?;
    let department_id = optional_department_id(payload.department_id, department_field)?
        .ok_or_else(|| missing_field_error(department_field, MISSING_FIELDS))?;
    let title = required_text(payload.title.as_deref(), FieldName::new("title"), MISSING_FIELDS)?;
    let description = required_text(
        payload.description.as_deref(),
        FieldName::new("description"),
        MISSING_FIELDS,
    )?;

    NewComplaint::try_new(owner, department_id, &title, &description)
        .map_err(|err| Error::invalid_request(err.to_string()))
}

fn parse_scope(query: ComplaintListQuery) -> Result<ComplaintScope, Error> {
    let role = query
        .role
        .as_deref()
        .and_then(|raw| raw.parse::<Role>().ok());
    let user_id = optional_account_id(query.user_id.as_deref());
    let department_id = optional_department_id(
        query.department_id.map(NumericInput::Text),
        FieldName::new("department_id"),
    )?;
    Ok(ComplaintScope::resolve(role, user_id, department_id))
}

/// File a complaint. New complaints always start as `Pending`.
#[utoipa::path(
    post,
    path = "/api/complaints",
    request_body = CreateComplaintRequest,
    responses(
        (status = 201, description = "Complaint registered", body = ComplaintCreated),
        (status = 400, description = "Missing required fields", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Filed for another account", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "createComplaint"
)]
#[post("/complaints")]
pub async fn create_complaint(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateComplaintRequest>,
) -> ApiResult<HttpResponse> {
    let complaint = parse_new_complaint(payload.into_inner())?;
    let actor = session.require_actor()?;
    let data = state.complaints.submit(&actor, complaint).await?;
    Ok(HttpResponse::Created().json(ComplaintCreated {
        message: "Complaint registered".to_owned(),
        data,
    }))
}

/// List complaints visible to a role, newest first.
#[utoipa::path(
    get,
    path = "/api/complaints",
    params(ComplaintListQuery),
    responses(
        (status = 200, description = "Complaints", body = [ComplaintViewSchema]),
        (status = 400, description = "Malformed department id", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Backend unavailable", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "listComplaints"
)]
#[get("/complaints")]
pub async fn list_complaints(
    state: web::Data<HttpState>,
    query: web::Query<ComplaintListQuery>,
) -> ApiResult<web::Json<Vec<ComplaintView>>> {
    let scope = parse_scope(query.into_inner())?;
    Ok(web::Json(state.complaints_query.list(scope).await?))
}

/// Update a complaint's status. Officers and admins only.
#[utoipa::path(
    put,
    path = "/api/complaints/{id}",
    params(("id" = i64, Path, description = "Complaint identifier")),
    request_body = UpdateComplaintRequest,
    responses(
        (status = 200, description = "Complaint updated", body = MessageResponse),
        (status = 400, description = "Unknown status", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Not permitted", body = ErrorSchema),
        (status = 404, description = "Complaint not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "updateComplaint"
)]
#[put("/complaints/{id}")]
pub async fn update_complaint(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<UpdateComplaintRequest>,
) -> ApiResult<web::Json<MessageResponse>> {
    let complaint_id = parse_complaint_id(&path.into_inner(), FieldName::new("id"))?;
    let payload = payload.into_inner();
    let status = parse_status(payload.status.as_deref(), FieldName::new("status"))?;
    let change = StatusChange::new(
        complaint_id,
        status,
        payload.comment,
        optional_account_id(payload.updated_by.as_deref()),
    );
    let actor = session.require_actor()?;
    state.complaints.update_status(&actor, change).await?;
    Ok(web::Json(MessageResponse {
        message: "Complaint updated".to_owned(),
    }))
}

/// Complaint counters for dashboards.
#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Complaint counts", body = ComplaintStatsSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Backend unavailable", body = ErrorSchema)
    ),
    tags = ["complaints"],
    operation_id = "complaintStats",
    security([])
)]
#[get("/stats")]
pub async fn stats(state: web::Data<HttpState>) -> ApiResult<web::Json<ComplaintStats>> {
    Ok(web::Json(state.stats.stats().await?))
}

#[cfg(test)]
#[path = "complaints_tests.rs"]
mod tests;
