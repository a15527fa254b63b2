//! Port for the external authentication provider.
//!
//! The provider owns credentials and issues the stable user id. Profile data
//! lives in the document store; the provider only knows email and password.

use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::{Email, Identity, IdentityState, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by auth provider adapters.
    pub enum AuthProviderError {
        /// Unknown email or wrong password.
        InvalidCredentials => "invalid email or password",
        /// Sign-up used an email that already has an account.
        EmailInUse { email: String } => "an account already exists for {email}",
        /// The provider rejected the password at sign-up.
        WeakPassword { message: String } => "password rejected: {message}",
        /// The provider could not be reached.
        Unavailable { message: String } => "auth provider unavailable: {message}",
    }
}

/// Port for account authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Check credentials and open a provider session for the account.
    async fn sign_in(&self, email: &Email, password: &str) -> Result<Identity, AuthProviderError>;

    /// Create an account. The new account starts signed in, as with the
    /// hosted providers this port models.
    async fn sign_up(&self, email: &Email, password: &str) -> Result<Identity, AuthProviderError>;

    /// Close the provider session for `user_id`. Closing a session that is
    /// not open succeeds.
    async fn sign_out(&self, user_id: &UserId) -> Result<(), AuthProviderError>;

    /// Signal carrying the provider-side state of `user_id`'s session.
    ///
    /// Sign-in and sign-up publish [`IdentityState::SignedIn`]; sign-out
    /// publishes [`IdentityState::SignedOut`]. Adapters that have not yet
    /// learned the account's state report [`IdentityState::Unknown`] until
    /// they do.
    fn identity_changes(&self, user_id: &UserId) -> watch::Receiver<IdentityState>;
}
