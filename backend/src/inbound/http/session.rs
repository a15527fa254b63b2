//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! Provides a thin wrapper around Actix sessions so handlers only deal with
//! domain-friendly operations such as persisting an admission or requiring a
//! particular dashboard.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::ports::Admitted;
use crate::domain::{Admission, Email, Error, Identity, UserId};

pub(crate) const USER_ID_KEY: &str = "user_id";
pub(crate) const EMAIL_KEY: &str = "email";
pub(crate) const ADMISSION_KEY: &str = "admission";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist an admitted identity in the session cookie.
    ///
    /// The session is renewed first so a pre-login cookie cannot be reused.
    pub fn persist(&self, admitted: &Admitted) -> Result<(), Error> {
        self.0.renew();
        self.insert(USER_ID_KEY, admitted.identity.user_id.as_ref())?;
        self.insert(EMAIL_KEY, admitted.identity.email.as_ref())?;
        self.insert(ADMISSION_KEY, admitted.admission.as_str())
    }

    fn insert(&self, key: &str, value: &str) -> Result<(), Error> {
        self.0
            .insert(key, value)
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    fn read(&self, key: &str) -> Result<Option<String>, Error> {
        self.0
            .get::<String>(key)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))
    }

    /// Fetch the admitted identity from the session, if present.
    ///
    /// Cookies with unparseable values are treated as signed out.
    pub fn admitted(&self) -> Result<Option<Admitted>, Error> {
        let (Some(raw_id), Some(raw_email), Some(raw_admission)) = (
            self.read(USER_ID_KEY)?,
            self.read(EMAIL_KEY)?,
            self.read(ADMISSION_KEY)?,
        ) else {
            return Ok(None);
        };
        let user_id = match UserId::new(&raw_id) {
            Ok(id) => id,
            Err(error) => {
                warn!("invalid user id in session cookie: {error}");
                return Ok(None);
            }
        };
        let email = match Email::new(&raw_email) {
            Ok(email) => email,
            Err(error) => {
                warn!(%user_id, "invalid email in session cookie: {error}");
                return Ok(None);
            }
        };
        let admission = match raw_admission.parse::<Admission>() {
            Ok(admission) => admission,
            Err(error) => {
                warn!(%user_id, "invalid admission in session cookie: {error}");
                return Ok(None);
            }
        };
        Ok(Some(Admitted {
            identity: Identity { user_id, email },
            admission,
        }))
    }

    /// Require a signed-in session or return `401 Unauthorized`.
    pub fn require_admitted(&self) -> Result<Admitted, Error> {
        self.admitted()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require a session admitted to `admission`.
    ///
    /// Missing sessions yield `401`; sessions admitted to the other dashboard
    /// yield `403`.
    pub fn require(&self, admission: Admission) -> Result<Identity, Error> {
        let admitted = self.require_admitted()?;
        if admitted.admission == admission {
            Ok(admitted.identity)
        } else {
            Err(Error::forbidden(format!(
                "You are not authorized to access the {}.",
                admission.dashboard()
            )))
        }
    }

    /// Drop every value and expire the cookie.
    pub fn purge(&self) {
        self.0.purge();
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
