//! Shared WebSocket adapter state.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{ComplaintQuery, LoginService};

const LOCALHOST: &str = "localhost";

/// Origins allowed to open a WebSocket.
///
/// `http://localhost:<port>` is always accepted for local front ends; any
/// other origin must be listed explicitly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

impl OriginPolicy {
    pub fn new(origins: impl IntoIterator<Item = Url>) -> Self {
        Self {
            allowed: origins
                .into_iter()
                .map(|url| url.origin().ascii_serialization())
                .collect(),
        }
    }

    /// Parse a comma-separated origin list; blank entries are skipped.
    ///
    /// # Examples
    /// ```
    /// use campus_portal::inbound::ws::state::OriginPolicy;
    /// use url::Url;
    ///
    /// let policy = OriginPolicy::parse("https://portal.college.edu, ").expect("valid list");
    /// assert!(policy.allows(&Url::parse("https://portal.college.edu").expect("url")));
    /// assert!(!policy.allows(&Url::parse("https://evil.example").expect("url")));
    /// ```
    pub fn parse(raw: &str) -> Result<Self, url::ParseError> {
        let origins = raw
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(Url::parse)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(origins))
    }

    pub fn allows(&self, origin: &Url) -> bool {
        let Some(host) = origin.host_str() else {
            return false;
        };
        if origin.scheme() == "http" && host == LOCALHOST {
            return matches!(origin.port(), Some(port) if port != 0);
        }
        let serialised = origin.origin().ascii_serialization();
        self.allowed.iter().any(|allowed| *allowed == serialised)
    }
}

/// Dependency bundle for WebSocket handlers.
#[derive(Clone)]
pub struct WsState {
    pub complaints_query: Arc<dyn ComplaintQuery>,
    /// Source of the provider identity signal each feed follows.
    pub login: Arc<dyn LoginService>,
    pub origins: Arc<OriginPolicy>,
}

impl WsState {
    pub fn new(
        complaints_query: Arc<dyn ComplaintQuery>,
        login: Arc<dyn LoginService>,
        origins: OriginPolicy,
    ) -> Self {
        Self {
            complaints_query,
            login,
            origins: Arc::new(origins),
        }
    }
}
