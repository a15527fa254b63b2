//! WebSocket inbound adapter: the live complaint feed for students.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list, student session)
//! - spawn the per-connection feed task, which ends when the provider signs
//!   the student out

use actix_web::http::header::{HeaderValue, ORIGIN};
use actix_web::web::{self, Payload};
use actix_web::{HttpRequest, HttpResponse, get};
use tracing::{error, info, warn};
use url::Url;

use crate::domain::Admission;
use crate::inbound::http::session::SessionContext;
use crate::inbound::ws::state::{OriginPolicy, WsState};

mod session;

pub mod messages;
pub mod state;

/// Upgrade to the signed-in student's complaint feed.
#[utoipa::path(
    get,
    path = "/ws/complaints",
    responses(
        (status = 101, description = "Switching to the complaint feed"),
        (status = 400, description = "Malformed Origin header"),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "Origin not allowed or not a student session")
    ),
    tags = ["complaints"],
    operation_id = "complaintFeed"
)]
#[get("/ws/complaints")]
pub async fn complaint_feed(
    state: web::Data<WsState>,
    session: SessionContext,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origins = req.headers().get_all(ORIGIN);
    let origin = origins.next().ok_or_else(|| {
        warn!("missing Origin header on WebSocket upgrade");
        actix_web::error::ErrorForbidden("Origin not allowed")
    })?;
    if origins.next().is_some() {
        warn!("multiple Origin headers on WebSocket upgrade");
        return Err(actix_web::error::ErrorBadRequest("Invalid Origin header"));
    }
    validate_origin(&state.origins, origin)?;

    let identity = session.require(Admission::Student)?;
    let (response, ws_session, messages) = actix_ws::handle(&req, stream).map_err(|err| {
        error!(error = %err, "WebSocket upgrade failed");
        err
    })?;
    let owner = identity.user_id.clone();
    let holder = state.login.session_for(Some(identity));
    info!(user_id = %owner, "complaint feed opened");
    actix_web::rt::spawn(session::handle_ws_session(
        state.complaints_query.clone(),
        owner,
        holder.subscribe(),
        ws_session,
        messages,
    ));
    Ok(response)
}

fn validate_origin(policy: &OriginPolicy, header: &HeaderValue) -> actix_web::Result<()> {
    let raw = header.to_str().map_err(|err| {
        warn!(error = %err, "Origin header is not valid UTF-8");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;
    let origin = Url::parse(raw).map_err(|err| {
        warn!(error = %err, origin = raw, "Origin header is not a URL");
        actix_web::error::ErrorBadRequest("Invalid Origin header")
    })?;
    if policy.allows(&origin) {
        Ok(())
    } else {
        warn!(origin = raw, "rejected WebSocket upgrade from disallowed origin");
        Err(actix_web::error::ErrorForbidden("Origin not allowed"))
    }
}
