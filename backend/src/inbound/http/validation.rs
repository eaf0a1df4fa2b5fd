//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every validation failure is an `invalid_request` error whose details name
//! the offending field and a machine-readable code.

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::domain::{
    AccountId, ComplaintId, ComplaintStatus, DepartmentId, Error, Role,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidNumber,
    InvalidRole,
    InvalidStatus,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidNumber => "invalid_number",
            ErrorCode::InvalidRole => "invalid_role",
            ErrorCode::InvalidStatus => "invalid_status",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Numeric identifiers arrive as JSON numbers from API clients and as
/// strings from HTML forms; both are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(i64),
    Text(String),
}

fn field_error(field: FieldName, message: impl Into<String>, code: ErrorCode) -> Error {
    Error::invalid_request(message).with_details(json!({
        "field": field.as_str(),
        "code": code.as_str(),
    }))
}

/// Missing-field error carrying a caller-chosen message.
pub(crate) fn missing_field_error(field: FieldName, message: &str) -> Error {
    field_error(field, message, ErrorCode::MissingField)
}

/// Return the trimmed text, treating absent and blank values alike.
pub(crate) fn required_text(
    value: Option<&str>,
    field: FieldName,
    message: &str,
) -> Result<String, Error> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_owned()),
        _ => Err(missing_field_error(field, message)),
    }
}

/// Parse an optional numeric input. Blank strings count as absent.
pub(crate) fn optional_number(
    value: Option<NumericInput>,
    field: FieldName,
) -> Result<Option<i64>, Error> {
    match value {
        None => Ok(None),
        Some(NumericInput::Number(number)) => Ok(Some(number)),
        Some(NumericInput::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumericInput::Text(text)) => text.trim().parse().map(Some).map_err(|_| {
            field_error(
                field,
                format!("{} must be an integer", field.as_str()),
                ErrorCode::InvalidNumber,
            )
        }),
    }
}

pub(crate) fn optional_department_id(
    value: Option<NumericInput>,
    field: FieldName,
) -> Result<Option<DepartmentId>, Error> {
    optional_number(value, field).map(|id| id.map(DepartmentId::new))
}

pub(crate) fn parse_complaint_id(raw: &str, field: FieldName) -> Result<ComplaintId, Error> {
    optional_number(Some(NumericInput::Text(raw.to_owned())), field)?
        .map(ComplaintId::new)
        .ok_or_else(|| missing_field_error(field, "complaint id is required"))
}

/// Parse an optional account id. Blank values count as absent.
pub(crate) fn optional_account_id(value: Option<&str>) -> Option<AccountId> {
    value.and_then(|raw| AccountId::new(raw).ok())
}

/// Parse a role, defaulting to citizen when absent or blank.
pub(crate) fn role_or_default(value: Option<&str>, field: FieldName) -> Result<Role, Error> {
    match value.map(str::trim) {
        None | Some("") => Ok(Role::default()),
        Some(raw) => raw.parse().map_err(|err| {
            field_error(field, format!("{err}"), ErrorCode::InvalidRole)
        }),
    }
}

pub(crate) fn parse_status(
    value: Option<&str>,
    field: FieldName,
) -> Result<ComplaintStatus, Error> {
    let raw = required_text(value, field, "status is required")?;
    raw.parse()
        .map_err(|err| field_error(field, format!("{err}"), ErrorCode::InvalidStatus))
}
