//! Municipal departments that complaints are filed against.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Validation errors raised by department primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepartmentValidationError {
    /// The department name was blank.
    EmptyName,
}

impl fmt::Display for DepartmentValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "department name must not be empty"),
        }
    }
}

impl std::error::Error for DepartmentValidationError {}

/// Numeric department identifier assigned by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DepartmentId(i64);

impl DepartmentId {
    /// Wrap a raw identifier.
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DepartmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Department display name, trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DepartmentName(String);

impl DepartmentName {
    /// Validate and construct a [`DepartmentName`].
    ///
    /// # Examples
    /// ```
    /// use civic_complaints::domain::DepartmentName;
    ///
    /// let name = DepartmentName::new("  Roads ").unwrap();
    /// assert_eq!(name.as_ref(), "Roads");
    /// ```
    pub fn new(name: impl Into<String>) -> Result<Self, DepartmentValidationError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DepartmentValidationError::EmptyName);
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for DepartmentName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

impl From<DepartmentName> for String {
    fn from(value: DepartmentName) -> Self {
        value.0
    }
}

impl TryFrom<String> for DepartmentName {
    type Error = DepartmentValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Department row as stored in the `departments` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: DepartmentId,
    pub name: String,
}
