//! Account HTTP handlers.
//!
//! ```text
//! POST /api/register {"email":"a@x.com","password":"pw","full_name":"Ada","role":"citizen"}
//! POST /api/login    {"email":"a@x.com","password":"pw"}
//! POST /api/logout
//! GET  /api/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::{
    Actor, Error, LoginCredentials, LoginValidationError, Profile, Registration,
    ensure_may_register,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, NumericInput, missing_field_error, optional_department_id, role_or_default,
};

const CREDENTIALS_REQUIRED: &str = "Email and password are required";

/// Request body for `POST /api/register`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct RegisterRequest {
    pub email: Option<String>,
    pub password: Option<String>,
    pub full_name: Option<String>,
    /// One of `citizen` (default), `officer`, `admin`.
    pub role: Option<String>,
    /// Only stored for officers.
    #[schema(value_type = Option<i64>)]
    pub department_id: Option<NumericInput>,
}

/// Request body for `POST /api/login`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisteredUser {
    pub id: String,
    pub email: String,
    pub role: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RegisterResponse {
    pub message: String,
    pub user: RegisteredUser,
}

/// Account summary returned by login and `GET /api/me`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub email: Option<String>,
    pub role: String,
    pub full_name: Option<String>,
    pub department_id: Option<i64>,
}

impl From<Profile> for UserSummary {
    fn from(profile: Profile) -> Self {
        Self {
            id: profile.id.into(),
            email: Some(profile.email),
            role: profile.role.as_str().to_owned(),
            full_name: profile.full_name,
            department_id: profile.department_id.map(|id| id.get()),
        }
    }
}

impl From<Actor> for UserSummary {
    fn from(actor: Actor) -> Self {
        Self {
            id: actor.account_id.into(),
            email: None,
            role: actor.role.as_str().to_owned(),
            full_name: None,
            department_id: actor.department_id.map(|id| id.get()),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: UserSummary,
}

fn credentials(email: Option<&str>, password: Option<&str>) -> Result<LoginCredentials, Error> {
    LoginCredentials::try_from_parts(email.unwrap_or_default(), password.unwrap_or_default())
        .map_err(|err| match err {
            LoginValidationError::EmptyEmail => {
                missing_field_error(FieldName::new("email"), CREDENTIALS_REQUIRED)
            }
            LoginValidationError::EmptyPassword => {
                missing_field_error(FieldName::new("password"), CREDENTIALS_REQUIRED)
            }
        })
}

fn parse_registration(payload: RegisterRequest) -> Result<Registration, Error> {
    let credentials = credentials(payload.email.as_deref(), payload.password.as_deref())?;
    let role = role_or_default(payload.role.as_deref(), FieldName::new("role"))?;
    let department_id =
        optional_department_id(payload.department_id, FieldName::new("department_id"))?;
    Ok(Registration::new(
        credentials,
        payload.full_name,
        role,
        department_id,
    ))
}

/// Register a new account and its profile.
///
/// Citizens register themselves. Officer and admin accounts need an admin
/// session.
#[utoipa::path(
    post,
    path = "/api/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Registration successful", body = RegisterResponse),
        (status = 400, description = "Missing fields or backend rejection", body = ErrorSchema),
        (status = 403, description = "Staff role without an admin session", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema),
        (status = 503, description = "Backend unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "register",
    security([])
)]
#[post("/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RegisterRequest>,
) -> ApiResult<HttpResponse> {
    let registration = parse_registration(payload.into_inner())?;
    ensure_may_register(session.actor()?.as_ref(), registration.role())?;
    let account = state.accounts.register(registration).await?;
    Ok(HttpResponse::Created().json(RegisterResponse {
        message: "Registration successful".to_owned(),
        user: RegisteredUser {
            id: account.id.into(),
            email: account.email,
            role: account.role.as_str().to_owned(),
        },
    }))
}

/// Sign in, returning the backend token and establishing a session cookie.
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (
            status = 200,
            description = "Login successful",
            body = LoginResponse,
            headers(("Set-Cookie" = String, description = "Session cookie"))
        ),
        (status = 400, description = "Missing fields", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 503, description = "Backend unavailable", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let credentials = credentials(payload.email.as_deref(), payload.password.as_deref())?;
    let outcome = state.accounts.login(credentials).await?;

    let profile = outcome.profile;
    session.persist_actor(&Actor::new(
        profile.id.clone(),
        profile.role,
        profile.department_id,
    ))?;
    info!(account_id = %profile.id, role = %profile.role, "login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        message: "Login successful".to_owned(),
        token: outcome.token.expose().to_owned(),
        user: profile.into(),
    }))
}

/// End the session.
#[utoipa::path(
    post,
    path = "/api/logout",
    responses((status = 204, description = "Session cleared")),
    tags = ["accounts"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.purge();
    HttpResponse::NoContent().finish()
}

/// The signed-in account as recorded in the session.
#[utoipa::path(
    get,
    path = "/api/me",
    responses(
        (status = 200, description = "Current account", body = UserSummary),
        (status = 401, description = "No session", body = ErrorSchema)
    ),
    tags = ["accounts"],
    operation_id = "currentAccount"
)]
#[get("/me")]
pub async fn me(session: SessionContext) -> ApiResult<web::Json<UserSummary>> {
    let actor = session.require_actor()?;
    Ok(web::Json(actor.into()))
}

#[cfg(test)]
#[path = "accounts_tests.rs"]
mod tests;
