//! Authentication primitives: credentials, registrations, and session tokens.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;

use zeroize::Zeroizing;

use crate::domain::{AccountId, DepartmentId, Profile, Role};

/// Domain error returned when credential payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated email/password credentials used by the identity provider.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace so the identity provider sees exactly what was typed.
///
/// # Examples
/// ```
/// use civic_complaints::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" a@x.com ", "secret").unwrap();
/// assert_eq!(creds.email(), "a@x.com");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email address used as the login name.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// A validated registration request.
///
/// The department reference is only retained for officers; any department
/// sent for another role is dropped at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    credentials: LoginCredentials,
    full_name: Option<String>,
    role: Role,
    department_id: Option<DepartmentId>,
}

impl Registration {
    /// Assemble a registration from validated parts.
    pub fn new(
        credentials: LoginCredentials,
        full_name: Option<String>,
        role: Role,
        department_id: Option<DepartmentId>,
    ) -> Self {
        let full_name = full_name
            .map(|name| name.trim().to_owned())
            .filter(|name| !name.is_empty());
        let department_id = department_id.filter(|_| role == Role::Officer);
        Self {
            credentials,
            full_name,
            role,
            department_id,
        }
    }

    pub fn credentials(&self) -> &LoginCredentials {
        &self.credentials
    }

    pub fn full_name(&self) -> Option<&str> {
        self.full_name.as_deref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn department_id(&self) -> Option<DepartmentId> {
        self.department_id
    }
}

/// Identity returned by the backend's auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub id: AccountId,
    pub email: Option<String>,
}

/// Bearer token issued by the backend on sign-in.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(Zeroizing<String>);

impl AccessToken {
    /// Wrap a raw token string.
    pub fn new(token: impl Into<String>) -> Self {
        Self(Zeroizing::new(token.into()))
    }

    /// Raw token value for transmission to the client.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Result of a successful registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisteredAccount {
    pub id: AccountId,
    pub email: String,
    pub role: Role,
}

/// Result of a successful login: the session token plus the resolved profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub token: AccessToken,
    pub profile: Profile,
}
