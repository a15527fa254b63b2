//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};

use campus_portal::Trace;
#[cfg(debug_assertions)]
use campus_portal::doc::ApiDoc;
use campus_portal::inbound::http::auth::{current_session, login, logout, sign_up};
use campus_portal::inbound::http::complaints::{
    add_feedback, list_complaints, list_my_complaints, remove_feedback, set_status,
    submit_complaint, toggle_status,
};
use campus_portal::inbound::http::error::json_config;
use campus_portal::inbound::http::health::{HealthState, live, ready};
use campus_portal::inbound::http::state::HttpState;
use campus_portal::inbound::http::suggestions::{list_suggestions, submit_suggestion};
use campus_portal::inbound::http::users::current_user;
use campus_portal::inbound::ws;
use campus_portal::inbound::ws::state::WsState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use state_builders::build_states;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    ws_state: web::Data<WsState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        ws_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

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

    // The complaint feed reads the same cookie as the API, so the session
    // middleware wraps the whole app rather than the `/api/v1` scope.
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(ws_state)
        .app_data(json_config())
        .wrap(session)
        .wrap(Trace)
        .service(api)
        .service(ws::complaint_feed)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Seed the admin allow-list, wire the services and bind the listener.
///
/// Readiness flips once the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when seeding, binding or starting fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        origins,
        admin_emails,
    } = config;
    let states = build_states(&admin_emails, origins).await?;
    let http_state = web::Data::new(states.http);
    let ws_state = web::Data::new(states.ws);
    let server_health_state = health_state.clone();

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            ws_state: ws_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
