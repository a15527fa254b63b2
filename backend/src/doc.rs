//! OpenAPI document for the portal.
//!
//! Served by Swagger UI in debug builds and exported by the `openapi-dump`
//! binary for front-end tooling.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Admission, Error, ErrorCode, Priority, Status};
use crate::inbound::http::auth::{LoginRequest, SessionResponse, SignUpRequest, SignUpResponse};
use crate::inbound::http::complaints::{
    AddFeedbackRequest, AdminComplaintResponse, ComplaintOverviewResponse, ComplaintResponse,
    ComplaintStatsResponse, CreatedResponse, FeedbackResponse, MyComplaintsResponse,
    RemoveFeedbackRequest, StatusRequest, SubmitComplaintRequest,
};
use crate::inbound::http::suggestions::{SubmitSuggestionRequest, SuggestionResponse};
use crate::inbound::http::users::ProfileResponse;

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);
        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Campus portal API",
        description = "Complaints and suggestions with separate student and admin dashboards."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_session,
        crate::inbound::http::users::current_user,
        crate::inbound::http::complaints::submit_complaint,
        crate::inbound::http::complaints::list_my_complaints,
        crate::inbound::http::complaints::list_complaints,
        crate::inbound::http::complaints::set_status,
        crate::inbound::http::complaints::toggle_status,
        crate::inbound::http::complaints::add_feedback,
        crate::inbound::http::complaints::remove_feedback,
        crate::inbound::http::suggestions::submit_suggestion,
        crate::inbound::http::suggestions::list_suggestions,
        crate::inbound::ws::complaint_feed,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        Admission,
        Priority,
        Status,
        LoginRequest,
        SessionResponse,
        SignUpRequest,
        SignUpResponse,
        ProfileResponse,
        SubmitComplaintRequest,
        CreatedResponse,
        FeedbackResponse,
        ComplaintResponse,
        ComplaintStatsResponse,
        MyComplaintsResponse,
        AdminComplaintResponse,
        ComplaintOverviewResponse,
        StatusRequest,
        AddFeedbackRequest,
        RemoveFeedbackRequest,
        SubmitSuggestionRequest,
        SuggestionResponse,
    )),
    tags(
        (name = "access", description = "Login, sign-up and session"),
        (name = "users", description = "Profile of the signed-in user"),
        (name = "complaints", description = "Complaint submission and triage"),
        (name = "suggestions", description = "Suggestion box"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
