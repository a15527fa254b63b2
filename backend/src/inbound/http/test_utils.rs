//! Test helpers for inbound HTTP components.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};

use crate::domain::ports::{
    Admitted, MockComplaintCommand, MockComplaintQuery, MockLoginService, MockSuggestionCommand,
    MockSuggestionQuery, MockUserProfileQuery,
};
use crate::domain::{Admission, Email, Error, Identity, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mock ports handed to [`HttpState`] in handler tests.
///
/// Tests set expectations on the fields they care about and leave the rest
/// untouched; an unexpected call on any mock fails the test.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub complaints: MockComplaintCommand,
    pub complaints_query: MockComplaintQuery,
    pub suggestions: MockSuggestionCommand,
    pub suggestions_query: MockSuggestionQuery,
    pub profile: MockUserProfileQuery,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState {
            login: Arc::new(self.login),
            complaints: Arc::new(self.complaints),
            complaints_query: Arc::new(self.complaints_query),
            suggestions: Arc::new(self.suggestions),
            suggestions_query: Arc::new(self.suggestions_query),
            profile: Arc::new(self.profile),
        }
    }
}

/// User id persisted by [`sign_in_as`].
pub const TEST_USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// Identity persisted by [`sign_in_as`].
pub fn test_identity() -> Identity {
    Identity {
        user_id: UserId::new(TEST_USER_ID).expect("fixture id"),
        email: Email::new("ada@college.edu").expect("fixture email"),
    }
}

/// Register `/test/sign-in/{admission}` so tests can obtain a session cookie
/// without going through the login port.
pub fn test_sign_in_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/test/sign-in/{admission}", web::get().to(sign_in_handler));
}

async fn sign_in_handler(
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let admission = path
        .into_inner()
        .parse::<Admission>()
        .map_err(Error::invalid_request)?;
    session.persist(&Admitted {
        identity: test_identity(),
        admission,
    })?;
    Ok(HttpResponse::Ok().finish())
}

/// Sign in through the test route and return the session cookie.
pub async fn sign_in_as<S>(app: &S, admission: Admission) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::get()
        .uri(&format!("/test/sign-in/{}", admission.as_str()))
        .to_request();
    let res = test::call_service(app, req).await;
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(|cookie| cookie.into_owned())
        .expect("session cookie")
}

/// Formatted log output captured from the current thread.
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Route this thread's events into a fresh buffer until the guard drops.
    pub fn install() -> (Self, tracing::subscriber::DefaultGuard) {
        let logs = Self::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        (logs, tracing::subscriber::set_default(subscriber))
    }

    /// Number of captured lines containing `needle`.
    pub fn count(&self, needle: &str) -> usize {
        let bytes = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes)
            .lines()
            .filter(|line| line.contains(needle))
            .count()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
