//! Driven port for the backend's email/password authentication service.

use async_trait::async_trait;

use crate::domain::{AccessToken, Identity, LoginCredentials};

use super::define_port_error;

/// Outcome of a sign-in call.
///
/// Either part may be missing when the backend accepts the request but does
/// not establish a session (for example, unconfirmed email addresses).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignInSession {
    pub identity: Option<Identity>,
    pub access_token: Option<AccessToken>,
}

define_port_error! {
    /// Errors raised by identity provider adapters.
    pub enum IdentityProviderError {
        /// The auth service could not be reached or timed out.
        Connection { message: String } =>
            "identity provider connection failed: {message}",
        /// The auth service refused the credentials or the sign-up.
        Rejected { message: String } =>
            "identity provider rejected request: {message}",
        /// The auth service response could not be decoded.
        Decode { message: String } =>
            "identity provider response could not be decoded: {message}",
    }
}

/// Port for account creation and password sign-in.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Create an identity. `None` means the backend accepted the request
    /// without returning an identity.
    async fn sign_up(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<Identity>, IdentityProviderError>;

    /// Exchange credentials for a session.
    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<SignInSession, IdentityProviderError>;
}
