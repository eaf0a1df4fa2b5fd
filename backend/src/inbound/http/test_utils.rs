//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::ServiceResponse;
use actix_web::{HttpResponse, web};

use crate::domain::Actor;
use crate::domain::ports::{
    MockAccountsCommand, MockComplaintStatsQuery, MockComplaintsCommand, MockComplaintsQuery,
    MockDepartmentsCommand, MockDepartmentsQuery,
};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Session cookie name used across HTTP tests.
pub const SESSION_COOKIE: &str = "session";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Disables the `Secure` flag for local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Extract the session cookie set on `response`.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE)
        .map(|cookie| cookie.into_owned())
        .expect("session cookie set")
}

/// Mock driving ports for handler tests. Unconfigured mocks panic when
/// called, so each test only sets expectations for the port under test.
#[derive(Default)]
pub struct MockPorts {
    pub accounts: MockAccountsCommand,
    pub departments: MockDepartmentsQuery,
    pub departments_command: MockDepartmentsCommand,
    pub complaints: MockComplaintsCommand,
    pub complaints_query: MockComplaintsQuery,
    pub stats: MockComplaintStatsQuery,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState {
            accounts: Arc::new(self.accounts),
            departments: Arc::new(self.departments),
            departments_command: Arc::new(self.departments_command),
            complaints: Arc::new(self.complaints),
            complaints_query: Arc::new(self.complaints_query),
            stats: Arc::new(self.stats),
        })
    }
}

/// Route that stores `actor` in the session, letting tests sign in without
/// going through the login handler.
pub fn sign_in_route(actor: Actor) -> actix_web::Route {
    web::get().to(move |session: SessionContext| {
        let actor = actor.clone();
        async move {
            session.persist_actor(&actor)?;
            Ok::<_, crate::domain::Error>(HttpResponse::NoContent().finish())
        }
    })
}
