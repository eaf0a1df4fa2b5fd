//! Driven port for the backend's relational table store.
//!
//! The store is addressed with JSON rows rather than typed records so the
//! same contract covers every table: services decode rows into domain types
//! and adapters only translate queries into their backend's dialect.

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

/// A single table row keyed by column name.
pub type Row = serde_json::Map<String, Value>;

/// Tables owned by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Table {
    Profiles,
    Departments,
    Complaints,
    ComplaintUpdates,
}

impl Table {
    /// Table name as exposed by the backend.
    pub fn name(self) -> &'static str {
        match self {
            Self::Profiles => "profiles",
            Self::Departments => "departments",
            Self::Complaints => "complaints",
            Self::ComplaintUpdates => "complaint_updates",
        }
    }
}

/// Equality filter on one column.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    pub column: &'static str,
    pub value: Value,
}

impl Filter {
    /// Match rows whose `column` equals `value`.
    pub fn eq(column: &'static str, value: impl Into<Value>) -> Self {
        Self {
            column,
            value: value.into(),
        }
    }
}

/// Sort order applied to a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Order {
    pub column: &'static str,
    pub descending: bool,
}

/// Related row expanded into each result under the related table's name.
///
/// `foreign_key` names the column on the queried table that references the
/// related table's `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embed {
    pub table: Table,
    pub foreign_key: &'static str,
    pub columns: Vec<&'static str>,
}

/// A filtered, optionally joined and ordered select.
#[derive(Debug, Clone, PartialEq)]
pub struct TableQuery {
    pub table: Table,
    pub embeds: Vec<Embed>,
    pub filters: Vec<Filter>,
    pub order: Option<Order>,
}

impl TableQuery {
    /// Select every column of every row in `table`.
    pub fn new(table: Table) -> Self {
        Self {
            table,
            embeds: Vec::new(),
            filters: Vec::new(),
            order: None,
        }
    }

    pub fn embed(
        mut self,
        table: Table,
        foreign_key: &'static str,
        columns: &[&'static str],
    ) -> Self {
        self.embeds.push(Embed {
            table,
            foreign_key,
            columns: columns.to_vec(),
        });
        self
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn order_desc(mut self, column: &'static str) -> Self {
        self.order = Some(Order {
            column,
            descending: true,
        });
        self
    }
}

define_port_error! {
    /// Errors raised by table store adapters.
    pub enum TableStoreError {
        /// The backend could not be reached or timed out.
        Connection { message: String } =>
            "table store connection failed: {message}",
        /// The backend refused the request (constraint or permission failure).
        Rejected { message: String } =>
            "table store rejected request: {message}",
        /// The backend failed while executing the request.
        Query { message: String } =>
            "table store query failed: {message}",
        /// The backend response could not be decoded.
        Decode { message: String } =>
            "table store response could not be decoded: {message}",
    }
}

/// Port for inserting, selecting, updating, and counting table rows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Insert one row and return the stored representation.
    async fn insert(&self, table: Table, row: Row) -> Result<Vec<Row>, TableStoreError>;

    /// Return rows matching `query`.
    async fn select(&self, query: &TableQuery) -> Result<Vec<Row>, TableStoreError>;

    /// Apply `changes` to every row matching `filters` and return the
    /// updated rows.
    async fn update(
        &self,
        table: Table,
        changes: Row,
        filters: &[Filter],
    ) -> Result<Vec<Row>, TableStoreError>;

    /// Count rows matching `filters` exactly.
    async fn count(&self, table: Table, filters: &[Filter]) -> Result<u64, TableStoreError>;
}
