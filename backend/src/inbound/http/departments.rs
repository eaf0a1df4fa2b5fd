//! Department HTTP handlers.
//!
//! ```text
//! GET  /api/departments
//! POST /api/departments {"name":"Parks"}
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Department, DepartmentName, Error};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{DepartmentSchema, ErrorSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, required_text};

#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateDepartmentRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DepartmentCreated {
    pub message: String,
    #[schema(value_type = Vec<DepartmentSchema>)]
    pub data: Vec<Department>,
}

/// List every department.
#[utoipa::path(
    get,
    path = "/api/departments",
    responses(
        (status = 200, description = "Departments", body = [DepartmentSchema]),
        (status = 400, description = "Backend rejected the query", body = ErrorSchema),
        (status = 503, description = "Backend unavailable", body = ErrorSchema)
    ),
    tags = ["departments"],
    operation_id = "listDepartments",
    security([])
)]
#[get("/departments")]
pub async fn list_departments(
    state: web::Data<HttpState>,
) -> ApiResult<web::Json<Vec<Department>>> {
    Ok(web::Json(state.departments.list().await?))
}

/// Create a department. Admin only.
#[utoipa::path(
    post,
    path = "/api/departments",
    request_body = CreateDepartmentRequest,
    responses(
        (status = 201, description = "Department created", body = DepartmentCreated),
        (status = 400, description = "Missing name or rejected insert", body = ErrorSchema),
        (status = 401, description = "No session", body = ErrorSchema),
        (status = 403, description = "Not an admin", body = ErrorSchema),
        (status = 503, description = "Backend unavailable", body = ErrorSchema)
    ),
    tags = ["departments"],
    operation_id = "createDepartment"
)]
#[post("/departments")]
pub async fn create_department(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateDepartmentRequest>,
) -> ApiResult<HttpResponse> {
    let name = required_text(
        payload.name.as_deref(),
        FieldName::new("name"),
        "Department name is required",
    )?;
    let name = DepartmentName::new(name)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let actor = session.require_actor()?;
    let data = state.departments_command.create(&actor, name).await?;
    Ok(HttpResponse::Created().json(DepartmentCreated {
        message: "Department created".to_owned(),
        data,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{AccountId, Actor, DepartmentId, Role};
    use crate::inbound::http::test_utils::{
        MockPorts, session_cookie, sign_in_route, test_session_middleware,
    };
    use actix_web::http::StatusCode;
    use actix_web::{App, test as actix_test};
    use rstest::rstest;
    use serde_json::json;

    fn actor(role: Role) -> Actor {
        Actor::new(AccountId::new("u-1").expect("id"), role, None)
    }

    async fn call_create(
        ports: MockPorts,
        signed_in: Option<Actor>,
        body: serde_json::Value,
    ) -> actix_web::dev::ServiceResponse {
        let mut app = App::new()
            .app_data(ports.into_state())
            .wrap(test_session_middleware())
            .service(web::scope("/api").service(create_department));
        if let Some(actor) = signed_in.clone() {
            app = app.route("/sign-in", sign_in_route(actor));
        }
        let app = actix_test::init_service(app).await;

        let mut req = actix_test::TestRequest::post()
            .uri("/api/departments")
            .set_json(body);
        if signed_in.is_some() {
            let res = actix_test::call_service(
                &app,
                actix_test::TestRequest::get().uri("/sign-in").to_request(),
            )
            .await;
            req = req.cookie(session_cookie(&res));
        }
        actix_test::call_service(&app, req.to_request()).await
    }

    #[actix_web::test]
    async fn lists_departments() {
        let mut ports = MockPorts::default();
        ports.departments.expect_list().times(1).return_once(|| {
            Ok(vec![Department {
                id: DepartmentId::new(1),
                name: "Roads".into(),
            }])
        });
        let app = actix_test::init_service(
            App::new()
                .app_data(ports.into_state())
                .service(web::scope("/api").service(list_departments)),
        )
        .await;

        let req = actix_test::TestRequest::get()
            .uri("/api/departments")
            .to_request();
        let body: serde_json::Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(body, json!([{"id": 1, "name": "Roads"}]));
    }

    #[actix_web::test]
    async fn create_without_session_is_unauthorised() {
        let mut ports = MockPorts::default();
        ports.departments_command.expect_create().never();
        let res = call_create(ports, None, json!({"name": "Parks"})).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({"name": "   "}))]
    #[actix_web::test]
    async fn create_requires_name(#[case] body: serde_json::Value) {
        let mut ports = MockPorts::default();
        ports.departments_command.expect_create().never();
        let res = call_create(ports, Some(actor(Role::Admin)), body).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn create_passes_session_actor_to_service() {
        let mut ports = MockPorts::default();
        ports
            .departments_command
            .expect_create()
            .withf(|actor, name| actor.role == Role::Admin && name.as_ref() == "Parks")
            .times(1)
            .return_once(|_, name| {
                Ok(vec![Department {
                    id: DepartmentId::new(4),
                    name: name.into(),
                }])
            });

        let res = call_create(ports, Some(actor(Role::Admin)), json!({"name": " Parks "})).await;
        assert_eq!(res.status(), StatusCode::CREATED);
        let body: DepartmentCreated = actix_test::read_body_json(res).await;
        assert_eq!(body.message, "Department created");
        assert_eq!(body.data[0].id.get(), 4);
    }

    #[actix_web::test]
    async fn forbidden_from_service_is_403() {
        let mut ports = MockPorts::default();
        ports
            .departments_command
            .expect_create()
            .return_once(|_, _| Err(Error::forbidden("admin role required")));

        let res = call_create(ports, Some(actor(Role::Citizen)), json!({"name": "Parks"})).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
