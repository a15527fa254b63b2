//! Portal settings loaded via OrthoConfig.
//!
//! Values come from `PORTAL_*` environment variables, an optional config
//! file, or command-line flags, in the usual OrthoConfig precedence.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{Email, UserValidationError};
use crate::inbound::ws::state::OriginPolicy;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address '{value}': {source}")]
    BindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },
    #[error("invalid admin email '{value}': {source}")]
    AdminEmail {
        value: String,
        #[source]
        source: UserValidationError,
    },
    #[error("invalid allowed origin list: {0}")]
    AllowedOrigins(#[from] url::ParseError),
}

/// Runtime configuration for the portal server.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PORTAL")]
pub struct PortalSettings {
    /// Socket address to listen on.
    pub bind_addr: Option<String>,
    /// Comma-separated emails seeded into the admin allow-list at start-up.
    pub admin_emails: Option<String>,
    /// Comma-separated origins allowed to open the complaint feed.
    pub allowed_origins: Option<String>,
}

impl PortalSettings {
    /// The configured listen address, `0.0.0.0:8080` when unset.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let value = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        value.parse().map_err(|source| SettingsError::BindAddr {
            value: value.to_owned(),
            source,
        })
    }

    /// Normalised admin emails; blank entries are ignored.
    pub fn admin_emails(&self) -> Result<Vec<Email>, SettingsError> {
        split_list(self.admin_emails.as_deref())
            .map(|value| {
                Email::new(value).map_err(|source| SettingsError::AdminEmail {
                    value: value.to_owned(),
                    source,
                })
            })
            .collect()
    }

    pub fn origin_policy(&self) -> Result<OriginPolicy, SettingsError> {
        Ok(OriginPolicy::parse(
            self.allowed_origins.as_deref().unwrap_or_default(),
        )?)
    }
}

fn split_list(raw: Option<&str>) -> impl Iterator<Item = &str> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
}
