//! In-memory auth provider.
//!
//! Accounts are keyed by normalised email. Passwords are kept only as salted
//! SHA-256 digests; the provider never stores the plaintext. Each account has
//! a watch channel carrying its provider-side session state.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use rand::Rng;
use sha2::{Digest, Sha256};
use tokio::sync::{RwLock, watch};
use tracing::debug;
use zeroize::Zeroizing;

use crate::domain::ports::{AuthProvider, AuthProviderError};
use crate::domain::{Email, Identity, IdentityState, UserId};

/// Shortest password the provider itself accepts.
pub const PROVIDER_PASSWORD_MIN: usize = 6;

const SALT_LEN: usize = 16;

#[derive(Debug, Clone)]
struct Account {
    user_id: UserId,
    salt: [u8; SALT_LEN],
    digest: String,
}

fn digest(salt: &[u8], password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

/// Compare digests without short-circuiting on the first differing byte.
fn digests_match(candidate: &str, stored: &str) -> bool {
    let (candidate, stored) = (candidate.as_bytes(), stored.as_bytes());
    candidate.len() == stored.len()
        && candidate
            .iter()
            .zip(stored)
            .fold(0_u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Auth provider kept in process memory.
#[derive(Debug, Default)]
pub struct InMemoryAuthProvider {
    accounts: RwLock<HashMap<Email, Account>>,
    signals: Mutex<HashMap<UserId, watch::Sender<IdentityState>>>,
}

impl InMemoryAuthProvider {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_signal<R>(
        &self,
        user_id: &UserId,
        f: impl FnOnce(&watch::Sender<IdentityState>) -> R,
    ) -> R {
        let mut signals = self.signals.lock().unwrap_or_else(PoisonError::into_inner);
        let sender = signals
            .entry(user_id.clone())
            .or_insert_with(|| watch::channel(IdentityState::SignedOut).0);
        f(sender)
    }

    fn publish(&self, user_id: &UserId, state: IdentityState) {
        self.with_signal(user_id, |sender| sender.send_replace(state));
    }
}

#[async_trait]
impl AuthProvider for InMemoryAuthProvider {
    async fn sign_in(&self, email: &Email, password: &str) -> Result<Identity, AuthProviderError> {
        let account = self.accounts.read().await.get(email).cloned();
        let Some(account) = account else {
            debug!("sign-in for unknown account");
            return Err(AuthProviderError::invalid_credentials());
        };
        let candidate = Zeroizing::new(digest(&account.salt, password));
        if !digests_match(&candidate, &account.digest) {
            debug!(user_id = %account.user_id, "sign-in with wrong password");
            return Err(AuthProviderError::invalid_credentials());
        }
        let identity = Identity {
            user_id: account.user_id,
            email: email.clone(),
        };
        self.publish(&identity.user_id, IdentityState::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_up(&self, email: &Email, password: &str) -> Result<Identity, AuthProviderError> {
        if password.chars().count() < PROVIDER_PASSWORD_MIN {
            return Err(AuthProviderError::weak_password(format!(
                "must be at least {PROVIDER_PASSWORD_MIN} characters"
            )));
        }
        let user_id = {
            let mut accounts = self.accounts.write().await;
            if accounts.contains_key(email) {
                return Err(AuthProviderError::email_in_use(email.to_string()));
            }
            let mut salt = [0_u8; SALT_LEN];
            rand::thread_rng().fill(&mut salt);
            let user_id = UserId::random();
            accounts.insert(
                email.clone(),
                Account {
                    user_id: user_id.clone(),
                    salt,
                    digest: digest(&salt, password),
                },
            );
            user_id
        };
        let identity = Identity {
            user_id,
            email: email.clone(),
        };
        self.publish(&identity.user_id, IdentityState::SignedIn(identity.clone()));
        Ok(identity)
    }

    async fn sign_out(&self, user_id: &UserId) -> Result<(), AuthProviderError> {
        self.publish(user_id, IdentityState::SignedOut);
        Ok(())
    }

    fn identity_changes(&self, user_id: &UserId) -> watch::Receiver<IdentityState> {
        self.with_signal(user_id, watch::Sender::subscribe)
    }
}
