//! Builders for the HTTP state from the configured backend.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::{info, warn};

use civic_complaints::config::BackendSettings;
use civic_complaints::domain::ports::{IdentityProvider, TableStore};
use civic_complaints::domain::{
    AccountsService, ComplaintStatsService, ComplaintsService, DepartmentsService, ErrorCode,
    LoginCredentials, Registration, Role,
};
use civic_complaints::inbound::http::state::HttpState;
use civic_complaints::outbound::memory::MemoryBackend;
use civic_complaints::outbound::supabase::{SupabaseAuth, SupabaseClient, SupabaseTables};

/// Wire every driving port onto one identity provider and table store.
fn http_state_from_ports<I, S>(identity: Arc<I>, store: Arc<S>) -> HttpState
where
    I: IdentityProvider + 'static,
    S: TableStore + 'static,
{
    let departments = Arc::new(DepartmentsService::new(store.clone()));
    let complaints = Arc::new(ComplaintsService::new(store.clone()));
    HttpState {
        accounts: Arc::new(AccountsService::new(identity, store.clone())),
        departments: departments.clone(),
        departments_command: departments,
        complaints: complaints.clone(),
        complaints_query: complaints,
        stats: Arc::new(ComplaintStatsService::new(store)),
    }
}

/// Build handler state for the configured backend.
///
/// # Errors
/// Propagates [`std::io::Error`] when the Supabase HTTP client cannot be
/// constructed.
pub fn build_http_state(backend: &BackendSettings) -> std::io::Result<web::Data<HttpState>> {
    let state = match backend {
        BackendSettings::Memory { seed_departments } => {
            let clock = Arc::new(DefaultClock);
            let memory = Arc::new(if *seed_departments {
                MemoryBackend::seeded(clock)
            } else {
                MemoryBackend::new(clock)
            });
            info!(seeded = *seed_departments, "using in-memory backend");
            http_state_from_ports(memory.clone(), memory)
        }
        BackendSettings::Supabase { url, key, timeout } => {
            let client = SupabaseClient::new(url.clone(), key.clone(), *timeout)
                .map_err(|err| std::io::Error::other(format!("supabase client: {err}")))?;
            info!(host = url.host_str().unwrap_or_default(), "using supabase backend");
            http_state_from_ports(
                Arc::new(SupabaseAuth::new(client.clone())),
                Arc::new(SupabaseTables::new(client)),
            )
        }
    };
    Ok(web::Data::new(state))
}

/// Register the startup admin account.
///
/// An account that already exists is left alone. Other failures are logged
/// and startup continues so a flaky backend does not block the server.
pub async fn bootstrap_admin(state: &HttpState, credentials: LoginCredentials) {
    let email = credentials.email().to_owned();
    let registration = Registration::new(
        credentials,
        Some("Administrator".to_owned()),
        Role::Admin,
        None,
    );
    match state.accounts.register(registration).await {
        Ok(account) => info!(account_id = %account.id, %email, "bootstrap admin created"),
        Err(error) if error.code() == ErrorCode::InvalidRequest => {
            info!(%email, reason = error.message(), "bootstrap admin not created");
        }
        Err(error) => warn!(%email, %error, "bootstrap admin registration failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::time::Duration;
    use url::Url;
    use zeroize::Zeroizing;

    #[rstest]
    #[case(true, 3)]
    #[case(false, 0)]
    #[actix_web::test]
    async fn memory_state_honours_seeding(#[case] seed: bool, #[case] expected: usize) {
        let state = build_http_state(&BackendSettings::Memory {
            seed_departments: seed,
        })
        .expect("state");
        let departments = state.departments.list().await.expect("list");
        assert_eq!(departments.len(), expected);
    }

    #[actix_web::test]
    async fn bootstrap_admin_can_sign_in_and_is_idempotent() {
        let state = build_http_state(&BackendSettings::Memory {
            seed_departments: false,
        })
        .expect("state");
        let credentials =
            LoginCredentials::try_from_parts("root@city.gov", "s3cret").expect("credentials");

        bootstrap_admin(&state, credentials.clone()).await;
        bootstrap_admin(&state, credentials.clone()).await;

        let outcome = state.accounts.login(credentials).await.expect("login");
        assert_eq!(outcome.profile.role, Role::Admin);
    }

    #[rstest]
    fn supabase_state_builds_without_network() {
        let backend = BackendSettings::Supabase {
            url: Url::parse("https://demo.supabase.co").expect("url"),
            key: Zeroizing::new("anon".to_owned()),
            timeout: Duration::from_secs(1),
        };
        assert!(build_http_state(&backend).is_ok());
    }
}
