//! Application configuration loaded via OrthoConfig.
//!
//! Values layer defaults, an optional config file, `CIVIC_*` environment
//! variables, and CLI flags. Session cookie settings are handled separately
//! in [`crate::inbound::http::session_config`].

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;
use url::Url;
use zeroize::Zeroizing;

use crate::domain::{LoginCredentials, LoginValidationError};

const DEFAULT_HOST: &str = "0.0.0.0";

fn default_templates_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("templates")
}

/// Which backend the driven ports talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendMode {
    /// Process-local tables; nothing survives a restart.
    Memory,
    /// A Supabase-compatible BaaS reached over HTTP.
    Supabase,
}

/// Resolved backend connection settings.
#[derive(Debug, Clone)]
pub enum BackendSettings {
    Memory {
        seed_departments: bool,
    },
    Supabase {
        url: Url,
        key: Zeroizing<String>,
        timeout: Duration,
    },
}

/// Errors raised while resolving configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown backend '{0}'; expected memory or supabase")]
    UnknownBackend(String),
    #[error("supabase backend selected but {0} is not set")]
    MissingSupabaseSetting(&'static str),
    #[error("invalid supabase url '{url}': {source}")]
    InvalidSupabaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("invalid bind host '{0}'")]
    InvalidHost(String),
    #[error("CIVIC_ADMIN_EMAIL and CIVIC_ADMIN_PASSWORD must be set together")]
    IncompleteAdmin,
    #[error("invalid bootstrap admin credentials: {0}")]
    InvalidAdmin(#[from] LoginValidationError),
}

/// Top-level application settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "CIVIC")]
pub struct AppSettings {
    /// Address to bind the HTTP listener to.
    pub host: Option<String>,
    /// Port to bind the HTTP listener to.
    #[ortho_config(default = 5000)]
    pub port: u16,
    /// `memory` (default) or `supabase`.
    pub backend: Option<String>,
    /// Base URL of the Supabase project.
    pub supabase_url: Option<String>,
    /// Service or anon key sent as `apikey` and bearer token.
    pub supabase_key: Option<String>,
    /// Per-request timeout for backend calls, in seconds.
    #[ortho_config(default = 10)]
    pub request_timeout_secs: u64,
    /// Directory holding the HTML page templates.
    pub templates_dir: Option<PathBuf>,
    /// Seed the in-memory backend with demo departments. Defaults to true.
    pub seed_departments: Option<bool>,
    /// Admin account registered at startup when it does not exist yet.
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl AppSettings {
    /// Socket address the server binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(host.to_owned()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn backend_mode(&self) -> Result<BackendMode, ConfigError> {
        match self.backend.as_deref().map(str::trim) {
            None | Some("") => Ok(BackendMode::Memory),
            Some(raw) if raw.eq_ignore_ascii_case("memory") => Ok(BackendMode::Memory),
            Some(raw) if raw.eq_ignore_ascii_case("supabase") => Ok(BackendMode::Supabase),
            Some(raw) => Err(ConfigError::UnknownBackend(raw.to_owned())),
        }
    }

    /// Resolve the backend settings. Selecting `supabase` without a URL and
    /// key is an error rather than a silent fallback to memory.
    pub fn backend_settings(&self) -> Result<BackendSettings, ConfigError> {
        match self.backend_mode()? {
            BackendMode::Memory => Ok(BackendSettings::Memory {
                seed_departments: self.seed_departments.unwrap_or(true),
            }),
            BackendMode::Supabase => {
                let raw_url = non_blank(self.supabase_url.as_deref())
                    .ok_or(ConfigError::MissingSupabaseSetting("CIVIC_SUPABASE_URL"))?;
                let key = non_blank(self.supabase_key.as_deref())
                    .ok_or(ConfigError::MissingSupabaseSetting("CIVIC_SUPABASE_KEY"))?;
                let url = Url::parse(raw_url).map_err(|source| ConfigError::InvalidSupabaseUrl {
                    url: raw_url.to_owned(),
                    source,
                })?;
                Ok(BackendSettings::Supabase {
                    url,
                    key: Zeroizing::new(key.to_owned()),
                    timeout: self.request_timeout(),
                })
            }
        }
    }

    /// Credentials for the startup admin account, if configured.
    ///
    /// Officer and admin accounts can only be created by an admin, so a fresh
    /// deployment needs one seeded this way.
    pub fn bootstrap_admin(&self) -> Result<Option<LoginCredentials>, ConfigError> {
        match (
            non_blank(self.admin_email.as_deref()),
            non_blank(self.admin_password.as_deref()),
        ) {
            (None, None) => Ok(None),
            (Some(email), Some(password)) => {
                Ok(Some(LoginCredentials::try_from_parts(email, password)?))
            }
            _ => Err(ConfigError::IncompleteAdmin),
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn templates_dir(&self) -> PathBuf {
        self.templates_dir
            .clone()
            .unwrap_or_else(default_templates_dir)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}
