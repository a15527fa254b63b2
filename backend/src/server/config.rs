//! HTTP server configuration object.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite};
use campus_portal::domain::Email;
use campus_portal::inbound::ws::state::OriginPolicy;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) origins: OriginPolicy,
    pub(crate) admin_emails: Vec<Email>,
}

impl ServerConfig {
    #[must_use]
    pub fn new(key: Key, cookie_secure: bool, same_site: SameSite, bind_addr: SocketAddr) -> Self {
        Self {
            key,
            cookie_secure,
            same_site,
            bind_addr,
            origins: OriginPolicy::default(),
            admin_emails: Vec::new(),
        }
    }

    /// Origins allowed to open the complaint feed.
    #[must_use]
    pub fn with_origins(mut self, origins: OriginPolicy) -> Self {
        self.origins = origins;
        self
    }

    /// Emails granted the admin dashboard before the listener starts.
    #[must_use]
    pub fn with_admin_emails(mut self, admin_emails: Vec<Email>) -> Self {
        self.admin_emails = admin_emails;
        self
    }
}
