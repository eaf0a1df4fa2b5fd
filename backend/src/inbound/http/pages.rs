//! HTML page routes.
//!
//! Pages are static templates read from a capability-scoped directory on each
//! request. Dashboards are only served to a session holding the matching role;
//! anyone else is sent back to the login page.

use std::io;
use std::path::Path;

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpResponse, get, web};
use cap_std::{ambient_authority, fs::Dir};
use tracing::error;

use crate::domain::{Error, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;

const LOGIN_PATH: &str = "/login";

/// Pages the server can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Login,
    Register,
    Dashboard(Role),
}

impl Page {
    fn file_name(self) -> &'static str {
        match self {
            Self::Login => "login.html",
            Self::Register => "register.html",
            Self::Dashboard(Role::Citizen) => "citizen_dashboard.html",
            Self::Dashboard(Role::Officer) => "officer_dashboard.html",
            Self::Dashboard(Role::Admin) => "admin_dashboard.html",
        }
    }

    /// Every template file the server expects to find.
    pub fn all() -> [Page; 5] {
        [
            Self::Login,
            Self::Register,
            Self::Dashboard(Role::Citizen),
            Self::Dashboard(Role::Officer),
            Self::Dashboard(Role::Admin),
        ]
    }
}

/// Template directory handle shared by the page handlers.
pub struct PageTemplates {
    dir: Dir,
}

impl PageTemplates {
    /// Open the template directory. Fails when the directory is missing.
    pub fn open(path: &Path) -> io::Result<Self> {
        Dir::open_ambient_dir(path, ambient_authority()).map(Self::from_dir)
    }

    pub fn from_dir(dir: Dir) -> Self {
        Self { dir }
    }

    /// Templates named by [`Page::all`] that cannot be found.
    pub fn missing(&self) -> Vec<&'static str> {
        Page::all()
            .into_iter()
            .map(Page::file_name)
            .filter(|name| !self.dir.is_file(name))
            .collect()
    }

    fn render(&self, page: Page) -> Result<HttpResponse, Error> {
        let name = page.file_name();
        let body = self.dir.read_to_string(name).map_err(|err| {
            error!(template = name, error = %err, "failed to read template");
            Error::internal(format!("template {name} unavailable"))
        })?;
        Ok(HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body))
    }
}

fn redirect_to_login() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, LOGIN_PATH))
        .finish()
}

#[get("/")]
pub async fn index() -> HttpResponse {
    redirect_to_login()
}

#[get("/login")]
pub async fn login_page(templates: web::Data<PageTemplates>) -> ApiResult<HttpResponse> {
    templates.render(Page::Login)
}

#[get("/register")]
pub async fn register_page(templates: web::Data<PageTemplates>) -> ApiResult<HttpResponse> {
    templates.render(Page::Register)
}

/// `/dashboard/{citizen|officer|admin}`.
#[get("/dashboard/{role}")]
pub async fn dashboard(
    templates: web::Data<PageTemplates>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let name = path.into_inner();
    let role: Role = name
        .parse()
        .map_err(|_| Error::not_found(format!("no dashboard named {name}")))?;
    if !session.has_role(role) {
        return Ok(redirect_to_login());
    }
    templates.render(Page::Dashboard(role))
}
