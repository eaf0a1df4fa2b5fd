//! Account identity, roles, and the application profile record.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::DepartmentId;

/// Validation errors raised by account primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    /// The identity id was blank.
    EmptyId,
    /// The role string is not one of `citizen`, `officer`, or `admin`.
    UnknownRole(String),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyId => write!(f, "account id must not be empty"),
            Self::UnknownRole(role) => {
                write!(f, "role must be citizen, officer, or admin (got {role:?})")
            }
        }
    }
}

impl std::error::Error for AccountValidationError {}

/// Identity identifier issued by the backend's auth service.
///
/// The value is opaque to the application; only blank ids are rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    /// Validate and construct an [`AccountId`].
    ///
    /// # Examples
    /// ```
    /// use civic_complaints::domain::AccountId;
    ///
    /// assert!(AccountId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6").is_ok());
    /// assert!(AccountId::new("  ").is_err());
    /// ```
    pub fn new(id: impl Into<String>) -> Result<Self, AccountValidationError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(AccountValidationError::EmptyId);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = AccountValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Role attached to every profile. Determines which complaints are visible
/// and which mutations are permitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Citizen,
    Officer,
    Admin,
}

impl Role {
    /// Wire representation stored in the `profiles.role` column.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Citizen => "citizen",
            Self::Officer => "officer",
            Self::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AccountValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "citizen" => Ok(Self::Citizen),
            "officer" => Ok(Self::Officer),
            "admin" => Ok(Self::Admin),
            other => Err(AccountValidationError::UnknownRole(other.to_owned())),
        }
    }
}

/// Application-level account record stored in the `profiles` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: AccountId,
    pub email: String,
    pub full_name: Option<String>,
    pub role: Role,
    pub department_id: Option<DepartmentId>,
}
