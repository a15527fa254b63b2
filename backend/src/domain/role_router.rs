//! Login admission, sign-up and sign-out.
//!
//! The router authenticates against the auth provider, then admits the
//! caller to the requested portal tab only when the stored profile allows
//! it:
//! - the student tab requires the `student` role;
//! - the admin tab requires the email to be on the admin allow-list.
//!
//! Every other outcome signs the provider out again and leaves the session
//! signed out.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, error, info, warn};

use crate::domain::ports::{Admitted, AuthProvider, AuthProviderError, LoginService};
use crate::domain::{
    Admission, Error, Identity, LoginCredentials, PortalTab, RecordRepository, Role,
    SessionHolder, SignUp, User, UserId,
};

/// Message returned when the account has no stored profile.
pub const PROFILE_NOT_FOUND: &str = "user profile not found";

/// Domain service implementing [`LoginService`].
#[derive(Clone)]
pub struct RoleRouter {
    auth: Arc<dyn AuthProvider>,
    records: RecordRepository,
}

impl RoleRouter {
    pub fn new(auth: Arc<dyn AuthProvider>, records: RecordRepository) -> Self {
        Self { auth, records }
    }

    fn map_auth_error(error: AuthProviderError) -> Error {
        match error {
            AuthProviderError::InvalidCredentials => {
                Error::unauthorized("invalid email or password")
            }
            AuthProviderError::EmailInUse { email } => {
                Error::conflict(format!("an account already exists for {email}"))
            }
            AuthProviderError::WeakPassword { message } => {
                Error::invalid_request(format!("password rejected: {message}"))
                    .with_details(json!({ "field": "password", "code": "weak_password" }))
            }
            AuthProviderError::Unavailable { message } => {
                Error::service_unavailable(format!("auth provider unavailable: {message}"))
            }
        }
    }

    fn denied(admission: Admission) -> Error {
        Error::forbidden(format!(
            "You are not authorized to access the {}.",
            admission.dashboard()
        ))
    }

    async fn decide(&self, tab: PortalTab, identity: &Identity) -> Result<Admission, Error> {
        let user = self
            .records
            .find_user(&identity.user_id)
            .await?
            .ok_or_else(|| Error::forbidden(PROFILE_NOT_FOUND))?;

        let admission = Admission::from(tab);
        let allowed = match admission {
            Admission::Student => user.role() == Role::Student,
            Admission::Admin => self.records.is_authorized_admin(&identity.email).await?,
        };
        if allowed {
            Ok(admission)
        } else {
            Err(Self::denied(admission))
        }
    }

    /// Sign the provider out after a denial. The session ends signed out
    /// even when the provider call fails.
    async fn deny(&self, session: &SessionHolder) {
        if let Err(err) = session.sign_out(self.auth.as_ref()).await {
            warn!(error = %err, "provider sign-out failed after denied login");
            session.clear();
        }
    }
}

#[async_trait]
impl LoginService for RoleRouter {
    async fn sign_in(
        &self,
        session: &SessionHolder,
        tab: PortalTab,
        credentials: &LoginCredentials,
    ) -> Result<Admitted, Error> {
        let identity = match self
            .auth
            .sign_in(credentials.email(), credentials.password())
            .await
        {
            Ok(identity) => identity,
            Err(err) => {
                debug!(error = %err, "provider rejected sign-in");
                session.clear();
                return Err(Self::map_auth_error(err));
            }
        };
        session.follow(self.auth.identity_changes(&identity.user_id));

        match self.decide(tab, &identity).await {
            Ok(admission) => {
                info!(
                    user_id = %identity.user_id,
                    admission = admission.as_str(),
                    "login admitted"
                );
                Ok(Admitted {
                    identity,
                    admission,
                })
            }
            Err(denial) => {
                info!(
                    user_id = %identity.user_id,
                    reason = denial.message(),
                    "login denied"
                );
                self.deny(session).await;
                Err(denial)
            }
        }
    }

    async fn sign_up(&self, request: SignUp) -> Result<UserId, Error> {
        let profile = request.profile().clone();
        let identity = self
            .auth
            .sign_up(&profile.email, request.password())
            .await
            .map_err(Self::map_auth_error)?;
        let user = User::new(identity.user_id.clone(), profile);
        let stored = self.records.put_user(&user).await;

        if let Err(err) = self.auth.sign_out(&identity.user_id).await {
            warn!(user_id = %identity.user_id, error = %err, "sign-out after sign-up failed");
        }
        if let Err(err) = stored {
            error!(
                user_id = %identity.user_id,
                error = %err,
                "profile write failed after account creation"
            );
            return Err(err.into());
        }

        info!(user_id = %identity.user_id, role = %user.role(), "account created");
        Ok(identity.user_id)
    }

    async fn sign_out(&self, session: &SessionHolder) -> Result<(), Error> {
        session
            .sign_out(self.auth.as_ref())
            .await
            .map_err(Self::map_auth_error)
    }

    fn session_for(&self, identity: Option<Identity>) -> SessionHolder {
        identity.map_or_else(SessionHolder::signed_out, |identity| {
            SessionHolder::following(self.auth.identity_changes(&identity.user_id))
        })
    }
}

#[cfg(test)]
#[path = "role_router_tests.rs"]
mod tests;
