//! Driving ports for department listing and creation.

use async_trait::async_trait;

use crate::domain::{Actor, Department, DepartmentName, Error};

/// Read side of the department resource.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentsQuery: Send + Sync {
    /// Every department, unfiltered.
    async fn list(&self) -> Result<Vec<Department>, Error>;
}

/// Write side of the department resource.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DepartmentsCommand: Send + Sync {
    /// Create a department on behalf of `actor` and return the inserted rows.
    async fn create(&self, actor: &Actor, name: DepartmentName) -> Result<Vec<Department>, Error>;
}
