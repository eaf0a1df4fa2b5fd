//! Process-local backend implementing the identity and table store ports.
//!
//! Used for local development and the end-to-end tests. Tables live behind a
//! single mutex; integer ids are assigned per table in insertion order and
//! complaints receive a `created_at` timestamp from the injected clock.

mod rows;

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use mockable::{Clock, DefaultClock};
use serde_json::Value;
use sha2::{Digest, Sha256};
use tracing::debug;
use uuid::Uuid;

use self::rows::{compare_column, matches_filters, project};
use crate::domain::ports::{
    Filter, IdentityProvider, IdentityProviderError, Row, SignInSession, Table, TableQuery,
    TableStore, TableStoreError,
};
use crate::domain::{AccessToken, AccountId, Identity, LoginCredentials};

/// Departments created by [`MemoryBackend::seeded`].
pub const DEMO_DEPARTMENTS: [&str; 3] = ["Roads", "Sanitation", "Health"];

struct StoredAccount {
    id: AccountId,
    password_digest: String,
}

#[derive(Default)]
struct MemoryState {
    tables: BTreeMap<Table, Vec<Row>>,
    next_ids: BTreeMap<Table, i64>,
    accounts: HashMap<String, StoredAccount>,
}

impl MemoryState {
    fn rows(&self, table: Table) -> &[Row] {
        self.tables.get(&table).map(Vec::as_slice).unwrap_or_default()
    }

    fn next_id(&mut self, table: Table) -> i64 {
        let next = self.next_ids.entry(table).or_insert(1);
        let id = *next;
        *next += 1;
        id
    }
}

/// In-memory stand-in for the hosted backend.
pub struct MemoryBackend {
    state: Mutex<MemoryState>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl MemoryBackend {
    /// Empty backend stamping complaints with `clock`.
    pub fn new(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            state: Mutex::new(MemoryState::default()),
            clock,
        }
    }

    /// Backend pre-populated with [`DEMO_DEPARTMENTS`].
    pub fn seeded(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        let backend = Self::new(clock);
        if let Ok(mut state) = backend.state.lock() {
            for name in DEMO_DEPARTMENTS {
                let id = state.next_id(Table::Departments);
                let mut row = Row::new();
                row.insert("id".to_owned(), Value::from(id));
                row.insert("name".to_owned(), Value::from(name));
                state.tables.entry(Table::Departments).or_default().push(row);
            }
        }
        backend
    }

    fn lock_tables(&self) -> Result<MutexGuard<'_, MemoryState>, TableStoreError> {
        self.state
            .lock()
            .map_err(|_| TableStoreError::query("memory backend state poisoned"))
    }

    fn lock_accounts(&self) -> Result<MutexGuard<'_, MemoryState>, IdentityProviderError> {
        self.state
            .lock()
            .map_err(|_| IdentityProviderError::connection("memory backend state poisoned"))
    }

    fn expand(&self, state: &MemoryState, query: &TableQuery, row: &Row) -> Row {
        let mut expanded = row.clone();
        for embed in &query.embeds {
            let related = row.get(embed.foreign_key).and_then(|key| {
                state
                    .rows(embed.table)
                    .iter()
                    .find(|candidate| candidate.get("id") == Some(key))
            });
            let value = related
                .map(|related| Value::Object(project(related, &embed.columns)))
                .unwrap_or(Value::Null);
            expanded.insert(embed.table.name().to_owned(), value);
        }
        expanded
    }
}

fn password_digest(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

#[async_trait]
impl TableStore for MemoryBackend {
    async fn insert(&self, table: Table, mut row: Row) -> Result<Vec<Row>, TableStoreError> {
        let mut state = self.lock_tables()?;
        if table != Table::Profiles {
            let id = state.next_id(table);
            row.insert("id".to_owned(), Value::from(id));
        } else if !row.contains_key("id") {
            return Err(TableStoreError::rejected("profiles rows require an id"));
        }
        if table == Table::Complaints {
            row.entry("created_at")
                .or_insert_with(|| Value::from(self.clock.utc().to_rfc3339()));
        }
        if table == Table::Profiles
            && state
                .rows(table)
                .iter()
                .any(|existing| existing.get("id") == row.get("id"))
        {
            return Err(TableStoreError::rejected(
                "duplicate key value violates unique constraint",
            ));
        }
        debug!(table = table.name(), ?row, "memory insert");
        state.tables.entry(table).or_default().push(row.clone());
        Ok(vec![row])
    }

    async fn select(&self, query: &TableQuery) -> Result<Vec<Row>, TableStoreError> {
        let state = self.lock_tables()?;
        let mut rows: Vec<Row> = state
            .rows(query.table)
            .iter()
            .filter(|row| matches_filters(row, &query.filters))
            .map(|row| self.expand(&state, query, row))
            .collect();
        if let Some(order) = query.order {
            rows.sort_by(|left, right| {
                let ordering = compare_column(left, right, order.column)
                    .then_with(|| compare_column(left, right, "id"));
                if order.descending {
                    ordering.reverse()
                } else {
                    ordering
                }
            });
        }
        debug!(
            table = query.table.name(),
            filters = ?query.filters,
            returned = rows.len(),
            "memory select"
        );
        Ok(rows)
    }

    async fn update(
        &self,
        table: Table,
        changes: Row,
        filters: &[Filter],
    ) -> Result<Vec<Row>, TableStoreError> {
        let mut state = self.lock_tables()?;
        let mut updated = Vec::new();
        for row in state.tables.entry(table).or_default() {
            if matches_filters(row, filters) {
                row.extend(changes.clone());
                updated.push(row.clone());
            }
        }
        debug!(table = table.name(), ?filters, updated = updated.len(), "memory update");
        Ok(updated)
    }

    async fn count(&self, table: Table, filters: &[Filter]) -> Result<u64, TableStoreError> {
        let state = self.lock_tables()?;
        let count = state
            .rows(table)
            .iter()
            .filter(|row| matches_filters(row, filters))
            .count() as u64;
        debug!(table = table.name(), ?filters, count, "memory count");
        Ok(count)
    }
}

#[async_trait]
impl IdentityProvider for MemoryBackend {
    async fn sign_up(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<Option<Identity>, IdentityProviderError> {
        let mut state = self.lock_accounts()?;
        let email = credentials.email().to_owned();
        if state.accounts.contains_key(&email) {
            return Err(IdentityProviderError::rejected("User already registered"));
        }
        let id = AccountId::new(Uuid::new_v4().to_string())
            .map_err(|err| IdentityProviderError::decode(err.to_string()))?;
        state.accounts.insert(
            email.clone(),
            StoredAccount {
                id: id.clone(),
                password_digest: password_digest(credentials.password()),
            },
        );
        debug!(account_id = %id, "memory sign-up");
        Ok(Some(Identity {
            id,
            email: Some(email),
        }))
    }

    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<SignInSession, IdentityProviderError> {
        let state = self.lock_accounts()?;
        let account = state
            .accounts
            .get(credentials.email())
            .filter(|account| account.password_digest == password_digest(credentials.password()))
            .ok_or_else(|| IdentityProviderError::rejected("Invalid login credentials"))?;
        debug!(account_id = %account.id, "memory sign-in");
        Ok(SignInSession {
            identity: Some(Identity {
                id: account.id.clone(),
                email: Some(credentials.email().to_owned()),
            }),
            access_token: Some(AccessToken::new(Uuid::new_v4().to_string())),
        })
    }
}

#[cfg(test)]
mod tests;
