//! Department listing and creation.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::info;

use crate::domain::ports::{
    DepartmentsCommand, DepartmentsQuery, Row, Table, TableQuery, TableStore, TableStoreError,
};
use crate::domain::rows::{decode_rows, map_store_error};
use crate::domain::{Actor, Department, DepartmentName, Error};

/// Store failures on the department resource surface as bad requests,
/// except for connectivity problems.
fn map_department_store_error(error: TableStoreError) -> Error {
    match error {
        TableStoreError::Query { message } => Error::invalid_request(message),
        other => map_store_error(other),
    }
}

/// Department service implementing both department driving ports.
#[derive(Clone)]
pub struct DepartmentsService<S> {
    store: Arc<S>,
}

impl<S> DepartmentsService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl<S> DepartmentsQuery for DepartmentsService<S>
where
    S: TableStore,
{
    async fn list(&self) -> Result<Vec<Department>, Error> {
        let rows = self
            .store
            .select(&TableQuery::new(Table::Departments))
            .await
            .map_err(map_department_store_error)?;
        decode_rows(rows)
    }
}

#[async_trait]
impl<S> DepartmentsCommand for DepartmentsService<S>
where
    S: TableStore,
{
    async fn create(&self, actor: &Actor, name: DepartmentName) -> Result<Vec<Department>, Error> {
        actor.ensure_admin()?;

        let mut row = Row::new();
        row.insert("name".into(), Value::String(name.into()));
        let rows = self
            .store
            .insert(Table::Departments, row)
            .await
            .map_err(map_department_store_error)?;
        let created: Vec<Department> = decode_rows(rows)?;
        info!(created = created.len(), by = %actor.account_id, "department created");
        Ok(created)
    }
}
