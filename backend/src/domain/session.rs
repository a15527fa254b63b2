//! Per-session identity holder.
//!
//! A [`SessionHolder`] follows the auth provider's identity signal for one
//! caller session. The provider publishes on a `tokio::sync::watch` channel
//! (see [`AuthProvider::identity_changes`]), so observers always see the
//! latest state and may start before the first decision has been made. A
//! provider-side sign-out reaches every holder following that account.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::watch;

use crate::domain::Identity;
use crate::domain::ports::{AuthProvider, AuthProviderError};

/// Identity known to a session.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentityState {
    /// No decision yet.
    #[default]
    Unknown,
    SignedOut,
    SignedIn(Identity),
}

impl IdentityState {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::SignedIn(identity) => Some(identity),
            Self::Unknown | Self::SignedOut => None,
        }
    }
}

/// A receiver whose sender is already gone; it holds `state` forever.
fn detached(state: IdentityState) -> watch::Receiver<IdentityState> {
    watch::channel(state).1
}

/// Holder of one session's identity.
///
/// # Examples
/// ```
/// use campus_portal::domain::{IdentityState, SessionHolder};
///
/// let session = SessionHolder::new();
/// assert_eq!(session.state(), IdentityState::Unknown);
/// assert!(session.current_identity().is_none());
/// ```
#[derive(Debug)]
pub struct SessionHolder {
    source: Mutex<watch::Receiver<IdentityState>>,
}

impl Default for SessionHolder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionHolder {
    /// Start in [`IdentityState::Unknown`], following nothing.
    pub fn new() -> Self {
        Self::following(detached(IdentityState::Unknown))
    }

    /// Follow an identity signal published by the auth provider.
    pub fn following(changes: watch::Receiver<IdentityState>) -> Self {
        Self {
            source: Mutex::new(changes),
        }
    }

    /// A holder that is signed out and follows nothing.
    pub fn signed_out() -> Self {
        Self::following(detached(IdentityState::SignedOut))
    }

    fn source(&self) -> MutexGuard<'_, watch::Receiver<IdentityState>> {
        self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn state(&self) -> IdentityState {
        self.source().borrow().clone()
    }

    /// Identity of the signed-in account, if any.
    pub fn current_identity(&self) -> Option<Identity> {
        self.source().borrow().identity().cloned()
    }

    /// Observe identity changes from the signal currently followed.
    pub fn subscribe(&self) -> watch::Receiver<IdentityState> {
        self.source().clone()
    }

    /// Resolve once the state has left [`IdentityState::Unknown`].
    ///
    /// A holder whose signal closes while still unknown resolves to
    /// [`IdentityState::Unknown`].
    pub async fn wait_until_known(&self) -> IdentityState {
        let mut receiver = self.subscribe();
        let known = receiver
            .wait_for(|state| !matches!(state, IdentityState::Unknown))
            .await
            .map(|state| state.clone());
        match known {
            Ok(state) => state,
            Err(_) => receiver.borrow().clone(),
        }
    }

    /// Switch to the provider's signal for the account just authenticated.
    pub(crate) fn follow(&self, changes: watch::Receiver<IdentityState>) {
        *self.source() = changes;
    }

    /// Detach from the provider and hold [`IdentityState::SignedOut`].
    pub(crate) fn clear(&self) {
        *self.source() = detached(IdentityState::SignedOut);
    }

    /// Sign the current identity out of the provider, then clear it.
    ///
    /// Waits for the provider's first decision. On provider failure the
    /// identity is kept and the error returned.
    pub async fn sign_out(&self, provider: &dyn AuthProvider) -> Result<(), AuthProviderError> {
        if let IdentityState::SignedIn(identity) = self.wait_until_known().await {
            provider.sign_out(&identity.user_id).await?;
        }
        self.clear();
        Ok(())
    }
}
