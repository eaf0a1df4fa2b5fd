//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    AccountsCommand, ComplaintStatsQuery, ComplaintsCommand, ComplaintsQuery, DepartmentsCommand,
    DepartmentsQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub accounts: Arc<dyn AccountsCommand>,
    pub departments: Arc<dyn DepartmentsQuery>,
    pub departments_command: Arc<dyn DepartmentsCommand>,
    pub complaints: Arc<dyn ComplaintsCommand>,
    pub complaints_query: Arc<dyn ComplaintsQuery>,
    pub stats: Arc<dyn ComplaintStatsQuery>,
}
