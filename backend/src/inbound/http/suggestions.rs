//! Suggestion handlers.
//!
//! Students post suggestions; administrators read all of them. Suggestions
//! carry no status and no feedback thread.

use actix_web::{HttpResponse, get, post, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::SuggestionEntry;
use crate::domain::{Admission, Error, SuggestionDraft, SuggestionForm};
use crate::inbound::http::ApiResult;
use crate::inbound::http::complaints::CreatedResponse;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::submission_validation_error;

/// Suggestion form body for `POST /api/v1/suggestions`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitSuggestionRequest {
    #[schema(example = "Longer library hours")]
    pub title: String,
    pub description: String,
    pub agreement: bool,
}

impl From<SubmitSuggestionRequest> for SuggestionForm {
    fn from(value: SubmitSuggestionRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            agreement: value.agreement,
        }
    }
}

/// Suggestion row on the admin dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub submitted_on: NaiveDate,
    pub submitter_email: Option<String>,
}

impl From<SuggestionEntry> for SuggestionResponse {
    fn from(value: SuggestionEntry) -> Self {
        let SuggestionEntry {
            suggestion,
            submitter_email,
        } = value;
        Self {
            id: suggestion.id().to_string(),
            user_id: suggestion.owner().to_string(),
            title: suggestion.title().to_owned(),
            description: suggestion.description().to_owned(),
            submitted_on: suggestion.submitted_on(),
            submitter_email: submitter_email.map(|email| email.to_string()),
        }
    }
}

/// Submit a suggestion owned by the signed-in student.
#[utoipa::path(
    post,
    path = "/api/v1/suggestions",
    request_body = SubmitSuggestionRequest,
    responses(
        (status = 201, description = "Suggestion stored", body = CreatedResponse),
        (status = 400, description = "Invalid form", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Not a student session", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["suggestions"],
    operation_id = "submitSuggestion"
)]
#[post("/suggestions")]
pub async fn submit_suggestion(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitSuggestionRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require(Admission::Student)?;
    let draft = SuggestionDraft::try_from_form(payload.into_inner().into())
        .map_err(|err| submission_validation_error(&err))?;
    let id = state.suggestions.submit(&identity.user_id, draft).await?;
    Ok(HttpResponse::Created().json(CreatedResponse { id: id.to_string() }))
}

/// List every suggestion, oldest first.
#[utoipa::path(
    get,
    path = "/api/v1/suggestions",
    responses(
        (status = 200, description = "All suggestions", body = [SuggestionResponse]),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Not an admin session", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["suggestions"],
    operation_id = "listSuggestions"
)]
#[get("/suggestions")]
pub async fn list_suggestions(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<SuggestionResponse>>> {
    session.require(Admission::Admin)?;
    let entries = state.suggestions_query.list_all().await?;
    Ok(web::Json(
        entries.into_iter().map(SuggestionResponse::from).collect(),
    ))
}
