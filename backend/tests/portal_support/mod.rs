//! Server harness shared by the portal integration suites.
//!
//! The harness runs the real handlers over the in-memory adapters on a
//! single-threaded Tokio runtime with a `LocalSet`, because Actix uses
//! `spawn_local` internally. Dropping the [`WorldFixture`] stops the server.

use std::cell::RefCell;
use std::collections::HashMap;
use std::net::TcpListener;
use std::rc::Rc;
use std::sync::Arc;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::ServerHandle;
use actix_web::http::{Method, header};
use actix_web::{App, HttpServer, web};
use awc::Client;
use campus_portal::Trace;
use campus_portal::domain::{
    ComplaintService, Email, RecordRepository, RoleRouter, SuggestionService, TRACE_ID_HEADER,
    UserProfileService,
};
use campus_portal::inbound::http::auth::{current_session, login, logout, sign_up};
use campus_portal::inbound::http::complaints::{
    add_feedback, list_complaints, list_my_complaints, remove_feedback, set_status,
    submit_complaint, toggle_status,
};
use campus_portal::inbound::http::error::json_config;
use campus_portal::inbound::http::state::HttpState;
use campus_portal::inbound::http::suggestions::{list_suggestions, submit_suggestion};
use campus_portal::inbound::http::users::current_user;
use campus_portal::inbound::ws;
use campus_portal::inbound::ws::state::{OriginPolicy, WsState};
use campus_portal::outbound::memory::{InMemoryAuthProvider, InMemoryDocumentStore};
use mockable::DefaultClock;
use serde_json::{Value, json};
use tokio::runtime::Runtime;
use tokio::task::LocalSet;

/// Email seeded into the admin allow-list.
pub(crate) const ADMIN_EMAIL: &str = "dean@college.edu";
/// Password that satisfies the sign-up policy.
pub(crate) const PASSWORD: &str = "Str0ng#pass";

/// Handle on a running portal server.
pub(crate) struct PortalServer {
    pub(crate) base_url: String,
    pub(crate) handle: ServerHandle,
    pub(crate) store: Arc<InMemoryDocumentStore>,
}

fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".to_owned())
        .cookie_path("/".to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}

/// Start the portal on an ephemeral port with `ADMIN_EMAIL` allow-listed.
pub(crate) async fn spawn_portal_server() -> Result<PortalServer, String> {
    let store = Arc::new(InMemoryDocumentStore::new());
    let records = RecordRepository::new(store.clone());
    let admin = Email::new(ADMIN_EMAIL).map_err(|err| err.to_string())?;
    records
        .authorize_admin(&admin)
        .await
        .map_err(|err| err.to_string())?;

    let clock = Arc::new(DefaultClock);
    let complaints = Arc::new(ComplaintService::new(records.clone(), clock.clone()));
    let suggestions = Arc::new(SuggestionService::new(records.clone(), clock));
    let login_service = Arc::new(RoleRouter::new(
        Arc::new(InMemoryAuthProvider::new()),
        records.clone(),
    ));
    let http_data = web::Data::new(HttpState {
        login: login_service.clone(),
        complaints: complaints.clone(),
        complaints_query: complaints.clone(),
        suggestions: suggestions.clone(),
        suggestions_query: suggestions,
        profile: Arc::new(UserProfileService::new(records)),
    });
    let ws_data = web::Data::new(WsState::new(complaints, login_service, OriginPolicy::default()));

    let key = Key::generate();
    let listener = TcpListener::bind("127.0.0.1:0").map_err(|err| err.to_string())?;
    let addr = listener.local_addr().map_err(|err| err.to_string())?;
    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1")
            .service(login)
            .service(sign_up)
            .service(logout)
            .service(current_session)
            .service(current_user)
            .service(submit_complaint)
            .service(list_my_complaints)
            .service(list_complaints)
            .service(set_status)
            .service(toggle_status)
            .service(add_feedback)
            .service(remove_feedback)
            .service(submit_suggestion)
            .service(list_suggestions);

        App::new()
            .app_data(http_data.clone())
            .app_data(ws_data.clone())
            .app_data(json_config())
            .wrap(session_middleware(key.clone()))
            .wrap(Trace)
            .service(api)
            .service(ws::complaint_feed)
    })
    .disable_signals()
    .workers(1)
    .listen(listener)
    .map_err(|err| err.to_string())?
    .run();

    let handle = server.handle();
    actix_web::rt::spawn(server);
    Ok(PortalServer {
        base_url: format!("http://{addr}"),
        handle,
        store,
    })
}

/// Sign-up body for a user with the given email and role.
pub(crate) fn sign_up_body(email: &str, role: &str) -> Value {
    json!({
        "firstName": "Ada",
        "lastName": "Lovelace",
        "email": email,
        "password": PASSWORD,
        "contactNumber": "0123456789",
        "department": "Computing",
        "role": role,
    })
}

pub(crate) struct PortalWorld {
    pub(crate) runtime: Runtime,
    pub(crate) local: LocalSet,
    pub(crate) server: PortalServer,
    /// Session cookie pairs keyed by the account's email.
    pub(crate) cookies: HashMap<String, String>,
    pub(crate) last_status: Option<u16>,
    pub(crate) last_body: Option<Value>,
    pub(crate) last_trace_id: Option<String>,
    pub(crate) complaint_id: Option<String>,
}

pub(crate) type SharedWorld = Rc<RefCell<PortalWorld>>;

pub(crate) struct WorldFixture {
    world: SharedWorld,
}

impl WorldFixture {
    pub(crate) fn world(&self) -> SharedWorld {
        self.world.clone()
    }
}

impl Drop for WorldFixture {
    fn drop(&mut self) {
        let ctx = self.world.borrow();
        let handle = ctx.server.handle.clone();
        ctx.local.block_on(&ctx.runtime, async move {
            handle.stop(true).await;
        });
    }
}

pub(crate) fn world() -> WorldFixture {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("tokio runtime");
    let local = LocalSet::new();
    let server = local
        .block_on(&runtime, spawn_portal_server())
        .expect("portal server");
    WorldFixture {
        world: Rc::new(RefCell::new(PortalWorld {
            runtime,
            local,
            server,
            cookies: HashMap::new(),
            last_status: None,
            last_body: None,
            last_trace_id: None,
            complaint_id: None,
        })),
    }
}

/// Run `operation` against the server's base URL on the world's runtime.
///
/// The world stays borrowed while the future runs, so the future must not
/// touch it.
pub(crate) fn with_world_async<R, F>(world: &SharedWorld, operation: impl FnOnce(String) -> F) -> R
where
    F: std::future::Future<Output = R>,
{
    let ctx = world.borrow();
    let base_url = ctx.server.base_url.clone();
    ctx.local.block_on(&ctx.runtime, operation(base_url))
}

pub(crate) struct JsonRequest<'a> {
    /// Email whose session cookie accompanies the request.
    pub(crate) as_user: Option<&'a str>,
    pub(crate) method: Method,
    pub(crate) path: &'a str,
    pub(crate) payload: Option<Value>,
}

/// Send a JSON request and record status, trace id and body in the world.
///
/// A `Set-Cookie` on the response replaces the stored cookie for
/// `as_user`.
pub(crate) fn perform_json_request(world: &SharedWorld, spec: JsonRequest<'_>) {
    let JsonRequest {
        as_user,
        method,
        path,
        payload,
    } = spec;
    let cookie = as_user.and_then(|email| world.borrow().cookies.get(email).cloned());
    let (status, trace_id, set_cookie, body) = with_world_async(world, |base_url| async move {
        let mut request = Client::default().request(method, format!("{base_url}{path}"));
        if let Some(cookie) = cookie {
            request = request.insert_header((header::COOKIE, cookie));
        }
        let mut response = match payload {
            Some(payload) => request.send_json(&payload).await.expect("json request"),
            None => request.send().await.expect("request"),
        };
        let status = response.status().as_u16();
        let trace_id = response
            .headers()
            .get(TRACE_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned);
        let set_cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(';').next())
            .map(str::to_owned);
        let bytes = response.body().await.expect("body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, trace_id, set_cookie, body)
    });

    let mut ctx = world.borrow_mut();
    if let (Some(email), Some(cookie)) = (as_user, set_cookie) {
        ctx.cookies.insert(email.to_owned(), cookie);
    }
    ctx.last_status = Some(status);
    ctx.last_trace_id = trace_id;
    ctx.last_body = Some(body);
}
