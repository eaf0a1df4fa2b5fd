//! Driving port for account registration and login.
//!
//! Inbound adapters call this port with validated credentials; the identity
//! provider and profile storage behind it stay out of handler code so HTTP
//! tests can substitute a mock.

use async_trait::async_trait;

use crate::domain::{Error, LoginCredentials, LoginOutcome, RegisteredAccount, Registration};

/// Domain use-case port for account lifecycle operations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountsCommand: Send + Sync {
    /// Create an identity and its profile row.
    ///
    /// # Errors
    ///
    /// - `invalid_request` when the backend rejects the sign-up or returns no
    ///   identity.
    /// - `service_unavailable` when the backend cannot be reached.
    async fn register(&self, registration: Registration) -> Result<RegisteredAccount, Error>;

    /// Sign in and resolve the caller's profile.
    ///
    /// # Errors
    ///
    /// - `unauthorized` for bad credentials or a missing or ambiguous profile.
    /// - `service_unavailable` when the backend cannot be reached.
    async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome, Error>;
}
