//! Failures the domain reports to its callers.
//!
//! An [`Error`] knows nothing about HTTP. It carries a stable
//! [`ErrorCode`], a client-facing message, the trace id of the request that
//! raised it, and optional structured details such as per-field validation
//! messages. Port errors from the outbound adapters are translated into
//! these by the services.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error as ThisError;

use crate::domain::TraceId;

/// Header carrying the request trace identifier.
pub const TRACE_ID_HEADER: &str = "trace-id";

/// Failure category, serialised in `snake_case`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Missing or malformed input.
    InvalidRequest,
    /// No session, or credentials were refused.
    Unauthorized,
    /// The session may not perform the action.
    Forbidden,
    NotFound,
    /// The backend could not be reached.
    ServiceUnavailable,
    InternalError,
}

/// Domain error payload.
///
/// The message is never blank.
///
/// # Examples
/// ```
/// use civic_complaints::domain::{Error, ErrorCode};
///
/// let err = Error::not_found("complaint 7 not found");
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.to_string(), "complaint 7 not found");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Envelope", into = "Envelope")]
pub struct Error {
    code: ErrorCode,
    message: String,
    trace_id: Option<String>,
    details: Option<Value>,
}

/// Reasons an [`Error`] cannot be built or decoded.
#[derive(Debug, Clone, PartialEq, Eq, ThisError)]
pub enum ErrorValidationError {
    #[error("error message must not be empty")]
    EmptyMessage,
    #[error("trace identifier must not be empty")]
    EmptyTraceId,
}

macro_rules! code_constructors {
    ($($name:ident => $code:ident),+ $(,)?) => {
        $(
            #[doc = concat!("[`ErrorCode::", stringify!($code), "`] with `message`.")]
            pub fn $name(message: impl Into<String>) -> Self {
                Self::new(ErrorCode::$code, message)
            }
        )+
    };
}

impl Error {
    /// Build an error, picking up the current [`TraceId`] if one is in scope.
    ///
    /// # Panics
    /// When `message` is blank. Use [`Error::try_new`] for untrusted text.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::try_new(code, message)
            .unwrap_or_else(|err| panic!("invalid domain error: {err}"))
    }

    pub fn try_new(
        code: ErrorCode,
        message: impl Into<String>,
    ) -> Result<Self, ErrorValidationError> {
        let message = message.into();
        if message.trim().is_empty() {
            return Err(ErrorValidationError::EmptyMessage);
        }
        Ok(Self {
            code,
            message,
            trace_id: TraceId::current().map(|id| id.to_string()),
            details: None,
        })
    }

    code_constructors! {
        invalid_request => InvalidRequest,
        unauthorized => Unauthorized,
        forbidden => Forbidden,
        not_found => NotFound,
        service_unavailable => ServiceUnavailable,
        internal => InternalError,
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.trace_id.as_deref()
    }

    pub fn details(&self) -> Option<&Value> {
        self.details.as_ref()
    }

    /// Replace the captured trace identifier.
    pub fn with_trace_id(self, id: impl Into<String>) -> Self {
        Self {
            trace_id: Some(id.into()),
            ..self
        }
    }

    /// Attach structured details, e.g. a list of invalid fields.
    ///
    /// ```
    /// use civic_complaints::domain::Error;
    /// use serde_json::json;
    ///
    /// let err = Error::invalid_request("Missing required fields")
    ///     .with_details(json!([{ "field": "title", "message": "is required" }]));
    /// assert!(err.details().is_some());
    /// ```
    pub fn with_details(self, details: Value) -> Self {
        Self {
            details: Some(details),
            ..self
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Error {}

/// JSON body shape: `{code, message, traceId?, details?}`.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Envelope {
    code: ErrorCode,
    message: String,
    #[serde(default, alias = "trace_id", skip_serializing_if = "Option::is_none")]
    trace_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl From<Error> for Envelope {
    fn from(error: Error) -> Self {
        let Error {
            code,
            message,
            trace_id,
            details,
        } = error;
        Self {
            code,
            message,
            trace_id,
            details,
        }
    }
}

impl TryFrom<Envelope> for Error {
    type Error = ErrorValidationError;

    fn try_from(envelope: Envelope) -> Result<Self, Self::Error> {
        if envelope
            .trace_id
            .as_deref()
            .is_some_and(|id| id.trim().is_empty())
        {
            return Err(ErrorValidationError::EmptyTraceId);
        }
        let mut error = Error::try_new(envelope.code, envelope.message)?;
        error.trace_id = envelope.trace_id;
        error.details = envelope.details;
        Ok(error)
    }
}
