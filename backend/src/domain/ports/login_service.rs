//! Driving port for login, sign-up and sign-out.
//!
//! Inbound adapters call it with the caller's session holder so the decision
//! and the session state stay together.

use async_trait::async_trait;

use crate::domain::{
    Admission, Error, Identity, LoginCredentials, PortalTab, SessionHolder, SignUp, UserId,
};

/// Outcome of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Admitted {
    pub identity: Identity,
    pub admission: Admission,
}

/// Domain use-case port for account access.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Authenticate and decide admission to `tab`.
    ///
    /// On success the session holds the identity. On any failure the session
    /// is signed out and the error carries the user-facing message.
    async fn sign_in(
        &self,
        session: &SessionHolder,
        tab: PortalTab,
        credentials: &LoginCredentials,
    ) -> Result<Admitted, Error>;

    /// Create an account and its profile. The caller is left signed out.
    async fn sign_up(&self, request: SignUp) -> Result<UserId, Error>;

    /// Sign the session's identity out of the provider and clear it.
    async fn sign_out(&self, session: &SessionHolder) -> Result<(), Error>;

    /// Holder following the provider's signal for a previously admitted
    /// identity, or a signed-out holder when there is none.
    fn session_for(&self, identity: Option<Identity>) -> SessionHolder;
}
