//! Domain primitives, services, and ports.
//!
//! Purpose: define strongly typed entities for accounts, departments, and
//! complaints, the access policy applied to mutations, and the services that
//! implement the driving ports on top of the backend's driven ports.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Account, department, and complaint types with their validation errors.
//! - Actor: authenticated caller used by the access policy.
//! - Services: `AccountsService`, `DepartmentsService`, `ComplaintsService`,
//!   `ComplaintStatsService`.

pub mod accounts_service;
pub mod complaints_service;
pub mod departments_service;
pub mod error;
pub mod ports;
pub mod trace_id;

mod account;
mod auth;
mod complaint;
mod complaint_scope;
mod department;
mod policy;
mod rows;
mod stats;

pub use self::account::{AccountId, AccountValidationError, Profile, Role};
pub use self::accounts_service::AccountsService;
pub use self::auth::{
    AccessToken, Identity, LoginCredentials, LoginOutcome, LoginValidationError,
    RegisteredAccount, Registration,
};
pub use self::complaint::{
    ComplaintId, ComplaintRecord, ComplaintStatus, ComplaintValidationError, ComplaintView,
    DepartmentSummary, NewComplaint, StatusChange, SubmitterSummary,
};
pub use self::complaint_scope::ComplaintScope;
pub use self::complaints_service::{ComplaintStatsService, ComplaintsService};
pub use self::department::{Department, DepartmentId, DepartmentName, DepartmentValidationError};
pub use self::departments_service::DepartmentsService;
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::policy::{Actor, ensure_may_register};
pub use self::stats::ComplaintStats;
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use civic_complaints::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
