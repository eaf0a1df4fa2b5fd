//! Verify the configured backend is reachable and its tables are in place.
//!
//! Lists the departments the backend returns. An empty list usually means the
//! database setup script has not been run.

use std::sync::Arc;

use color_eyre::eyre::{Result, eyre};
use mockable::DefaultClock;
use ortho_config::OrthoConfig;

use civic_complaints::config::{AppSettings, BackendSettings};
use civic_complaints::domain::DepartmentsService;
use civic_complaints::domain::ports::DepartmentsQuery;
use civic_complaints::outbound::memory::MemoryBackend;
use civic_complaints::outbound::supabase::{SupabaseClient, SupabaseTables};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let settings =
        AppSettings::load().map_err(|err| eyre!("failed to load configuration: {err}"))?;

    let departments: Arc<dyn DepartmentsQuery> = match settings.backend_settings()? {
        BackendSettings::Memory { seed_departments } => {
            println!("Checking in-memory backend...");
            let clock = Arc::new(DefaultClock);
            let backend = if seed_departments {
                MemoryBackend::seeded(clock)
            } else {
                MemoryBackend::new(clock)
            };
            Arc::new(DepartmentsService::new(Arc::new(backend)))
        }
        BackendSettings::Supabase { url, key, timeout } => {
            println!("Checking Supabase connection at {url}...");
            let client = SupabaseClient::new(url, key, timeout)?;
            Arc::new(DepartmentsService::new(Arc::new(SupabaseTables::new(client))))
        }
    };

    let listed = departments.list().await.map_err(|err| {
        eyre!(
            "could not list departments: {}; check the backend settings and that the \
             database setup script has been applied",
            err.message()
        )
    })?;
    println!("Connection successful. Found {} departments.", listed.len());
    for department in &listed {
        println!("- {}", department.name);
    }
    Ok(())
}
