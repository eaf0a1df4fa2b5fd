//! Account registration and login.
//!
//! Registration creates an identity with the identity provider and then a
//! matching `profiles` row. Login signs in and resolves exactly one profile
//! row for the returned identity.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::domain::ports::{
    AccountsCommand, Filter, IdentityProvider, IdentityProviderError, Table, TableQuery,
    TableStore, TableStoreError,
};
use crate::domain::rows::{decode_rows, encode_row, map_store_error};
use crate::domain::{
    AccountId, DepartmentId, Error, LoginCredentials, LoginOutcome, Profile, RegisteredAccount,
    Registration, Role,
};

#[derive(Serialize)]
struct ProfileInsert<'a> {
    id: &'a AccountId,
    email: &'a str,
    full_name: Option<&'a str>,
    role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    department_id: Option<DepartmentId>,
}

/// Profile row as read back from the store. A missing role reads as citizen.
#[derive(Deserialize)]
struct ProfileRow {
    id: AccountId,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    full_name: Option<String>,
    #[serde(default)]
    role: Option<Role>,
    #[serde(default)]
    department_id: Option<DepartmentId>,
}

fn map_sign_up_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::Rejected { message } => Error::invalid_request(message),
        IdentityProviderError::Connection { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
        IdentityProviderError::Decode { message } => {
            Error::internal(format!("identity provider response malformed: {message}"))
        }
    }
}

fn map_sign_in_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::Rejected { .. } => Error::unauthorized("invalid credentials"),
        other => map_sign_up_error(other),
    }
}

fn map_profile_lookup_error(error: TableStoreError) -> Error {
    match error {
        TableStoreError::Rejected { .. } => Error::unauthorized("profile lookup refused"),
        other => map_store_error(other),
    }
}

/// Account service implementing [`AccountsCommand`].
#[derive(Clone)]
pub struct AccountsService<I, S> {
    identity: Arc<I>,
    store: Arc<S>,
}

impl<I, S> AccountsService<I, S> {
    pub fn new(identity: Arc<I>, store: Arc<S>) -> Self {
        Self { identity, store }
    }
}

impl<I, S> AccountsService<I, S>
where
    S: TableStore,
{
    async fn fetch_single_profile(&self, id: &AccountId) -> Result<ProfileRow, Error> {
        let query = TableQuery::new(Table::Profiles).filter(Filter::eq("id", id.as_ref()));
        let rows = self
            .store
            .select(&query)
            .await
            .map_err(map_profile_lookup_error)?;
        let mut profiles: Vec<ProfileRow> = decode_rows(rows)?;
        if profiles.len() != 1 {
            warn!(account_id = %id, rows = profiles.len(), "expected exactly one profile row");
            return Err(Error::unauthorized("profile not found"));
        }
        profiles
            .pop()
            .ok_or_else(|| Error::unauthorized("profile not found"))
    }
}

#[async_trait]
impl<I, S> AccountsCommand for AccountsService<I, S>
where
    I: IdentityProvider,
    S: TableStore,
{
    async fn register(&self, registration: Registration) -> Result<RegisteredAccount, Error> {
        let credentials = registration.credentials();
        let identity = self
            .identity
            .sign_up(credentials)
            .await
            .map_err(map_sign_up_error)?
            .ok_or_else(|| Error::invalid_request("registration failed"))?;

        let row = encode_row(&ProfileInsert {
            id: &identity.id,
            email: credentials.email(),
            full_name: registration.full_name(),
            role: registration.role(),
            department_id: registration.department_id(),
        })?;
        self.store
            .insert(Table::Profiles, row)
            .await
            .map_err(map_store_error)?;

        info!(account_id = %identity.id, role = %registration.role(), "account registered");
        Ok(RegisteredAccount {
            email: identity
                .email
                .unwrap_or_else(|| credentials.email().to_owned()),
            id: identity.id,
            role: registration.role(),
        })
    }

    async fn login(&self, credentials: LoginCredentials) -> Result<LoginOutcome, Error> {
        let session = self
            .identity
            .sign_in(&credentials)
            .await
            .map_err(map_sign_in_error)?;
        let (Some(identity), Some(token)) = (session.identity, session.access_token) else {
            return Err(Error::unauthorized("invalid credentials"));
        };

        let row = self.fetch_single_profile(&identity.id).await?;
        let email = identity
            .email
            .or(row.email)
            .unwrap_or_else(|| credentials.email().to_owned());
        let profile = Profile {
            id: row.id,
            email,
            full_name: row.full_name,
            role: row.role.unwrap_or_default(),
            department_id: row.department_id,
        };
        Ok(LoginOutcome { token, profile })
    }
}

#[cfg(test)]
#[path = "accounts_service_tests.rs"]
mod tests;
