//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The signed, encrypted session cookie records the [`Actor`] resolved at
//! login. The access policy trusts only this record, never identifiers sent
//! in request bodies or query strings.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;

use crate::domain::{Actor, Error, Role};

pub(crate) const ACTOR_KEY: &str = "actor";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated actor, rotating the session id first.
    pub fn persist_actor(&self, actor: &Actor) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ACTOR_KEY, actor)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The actor recorded at login, if any.
    ///
    /// Undecodable session state is logged and treated as signed out.
    pub fn actor(&self) -> Result<Option<Actor>, Error> {
        match self.0.get::<Actor>(ACTOR_KEY) {
            Ok(actor) => Ok(actor),
            Err(error) => {
                tracing::warn!(%error, "discarding unreadable session actor");
                Ok(None)
            }
        }
    }

    /// Require an authenticated actor or return `401 Unauthorized`.
    pub fn require_actor(&self) -> Result<Actor, Error> {
        self.actor()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Whether the session belongs to an account with `role`.
    pub fn has_role(&self, role: Role) -> bool {
        matches!(self.actor(), Ok(Some(actor)) if actor.role == role)
    }

    /// Drop all session state and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
