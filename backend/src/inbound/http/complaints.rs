//! Complaint handlers for both dashboards.
//!
//! ```text
//! POST   /api/v1/complaints                      (student)
//! GET    /api/v1/complaints/mine                 (student)
//! GET    /api/v1/complaints?status=unresolved    (admin)
//! PUT    /api/v1/complaints/{id}/status          (admin)
//! POST   /api/v1/complaints/{id}/status/toggle   (admin)
//! POST   /api/v1/complaints/{id}/feedbacks       (admin)
//! DELETE /api/v1/complaints/{id}/feedbacks       (admin)
//! ```

use actix_web::{HttpResponse, delete, get, post, put, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::{ComplaintEntry, ComplaintListing, ComplaintOverview};
use crate::domain::{
    Admission, Complaint, ComplaintDraft, ComplaintFilter, ComplaintForm, ComplaintStats, Error,
    Feedback, FeedbackKey, FeedbackMessage, Priority, RecordId, Status,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, feedback_validation_error, invalid_value_error, missing_field_error,
    parse_record_id, submission_validation_error,
};

const ID_FIELD: FieldName = FieldName::new("id");
const STATUS_FIELD: FieldName = FieldName::new("status");
const PRIORITY_FIELD: FieldName = FieldName::new("priority");

/// Complaint form body for `POST /api/v1/complaints`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitComplaintRequest {
    #[schema(example = "Projector broken")]
    pub title: String,
    pub description: String,
    #[schema(example = "Facilities")]
    pub category: String,
    /// `low`, `medium` or `high`; blank means `low`.
    pub priority: Option<String>,
    /// The privacy-policy checkbox.
    pub agreement: bool,
}

impl From<SubmitComplaintRequest> for ComplaintForm {
    fn from(value: SubmitComplaintRequest) -> Self {
        Self {
            title: value.title,
            description: value.description,
            category: value.category,
            priority: value.priority.unwrap_or_default(),
            agreement: value.agreement,
        }
    }
}

/// Identifier of a newly created record.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedResponse {
    pub id: String,
}

/// One administrator message on a complaint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub author_id: String,
}

impl From<&Feedback> for FeedbackResponse {
    fn from(value: &Feedback) -> Self {
        Self {
            message: value.message.as_ref().to_owned(),
            timestamp: value.timestamp,
            author_id: value.author_id.to_string(),
        }
    }
}

/// Complaint as shown on either dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComplaintResponse {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    pub priority: Priority,
    pub status: Status,
    pub submitted_on: NaiveDate,
    pub feedbacks: Vec<FeedbackResponse>,
    /// Pass back as `expectedRevision` to guard feedback edits.
    pub revision: u64,
}

impl From<&Complaint> for ComplaintResponse {
    fn from(value: &Complaint) -> Self {
        Self {
            id: value.id().to_string(),
            user_id: value.owner().to_string(),
            title: value.title().to_owned(),
            description: value.description().to_owned(),
            category: value.category().to_string(),
            priority: value.priority(),
            status: value.status(),
            submitted_on: value.submitted_on(),
            feedbacks: value.feedbacks().iter().map(FeedbackResponse::from).collect(),
            revision: value.revision(),
        }
    }
}

/// Student dashboard payload.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MyComplaintsResponse {
    pub complaints: Vec<ComplaintResponse>,
    pub stats: ComplaintStatsResponse,
}

/// Dashboard counters.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ComplaintStatsResponse {
    pub total: usize,
    pub resolved: usize,
    pub unresolved: usize,
}

impl From<ComplaintStats> for ComplaintStatsResponse {
    fn from(value: ComplaintStats) -> Self {
        Self {
            total: value.total,
            resolved: value.resolved,
            unresolved: value.unresolved,
        }
    }
}

impl From<ComplaintListing> for MyComplaintsResponse {
    fn from(value: ComplaintListing) -> Self {
        Self {
            complaints: value.complaints.iter().map(ComplaintResponse::from).collect(),
            stats: value.stats.into(),
        }
    }
}

/// Complaint row on the admin dashboard.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AdminComplaintResponse {
    #[serde(flatten)]
    pub complaint: ComplaintResponse,
    /// Absent when the submitter's profile is missing.
    pub submitter_email: Option<String>,
}

impl From<ComplaintEntry> for AdminComplaintResponse {
    fn from(value: ComplaintEntry) -> Self {
        Self {
            complaint: ComplaintResponse::from(&value.complaint),
            submitter_email: value.submitter_email.map(|email| email.to_string()),
        }
    }
}

/// Admin dashboard payload. `stats` always covers every complaint.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ComplaintOverviewResponse {
    pub complaints: Vec<AdminComplaintResponse>,
    pub stats: ComplaintStatsResponse,
}

impl From<ComplaintOverview> for ComplaintOverviewResponse {
    fn from(value: ComplaintOverview) -> Self {
        Self {
            complaints: value
                .entries
                .into_iter()
                .map(AdminComplaintResponse::from)
                .collect(),
            stats: value.stats.into(),
        }
    }
}

/// Filter parameters for `GET /api/v1/complaints`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ComplaintFilterQuery {
    /// Case-insensitive substring of title or description.
    pub query: Option<String>,
    /// `resolved` or `unresolved`.
    pub status: Option<String>,
    pub category: Option<String>,
    /// `low`, `medium` or `high`.
    pub priority: Option<String>,
}

impl TryFrom<ComplaintFilterQuery> for ComplaintFilter {
    type Error = Error;

    fn try_from(value: ComplaintFilterQuery) -> Result<Self, Self::Error> {
        let status = value.status.unwrap_or_default();
        if !status.trim().is_empty() {
            status
                .parse::<Status>()
                .map_err(|err| invalid_value_error(STATUS_FIELD, &status, err.to_string()))?;
        }
        let priority = value.priority.unwrap_or_default();
        if !priority.trim().is_empty() {
            priority
                .parse::<Priority>()
                .map_err(|err| invalid_value_error(PRIORITY_FIELD, &priority, err.to_string()))?;
        }
        Ok(Self {
            query: value.query.unwrap_or_default(),
            status,
            category: value.category.unwrap_or_default(),
            priority,
        })
    }
}

/// Body for `PUT /api/v1/complaints/{id}/status`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct StatusRequest {
    #[schema(example = "resolved")]
    pub status: Option<String>,
}

/// Body for `POST /api/v1/complaints/{id}/feedbacks`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct AddFeedbackRequest {
    pub message: String,
    /// Revision the caller last read; omit to guard against the current one.
    pub expected_revision: Option<u64>,
}

/// Body for `DELETE /api/v1/complaints/{id}/feedbacks`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFeedbackRequest {
    pub timestamp: DateTime<Utc>,
    pub message: String,
    #[serde(default)]
    pub expected_revision: Option<u64>,
}

fn record_id(path: web::Path<String>) -> Result<RecordId, Error> {
    parse_record_id(path.into_inner(), ID_FIELD)
}

/// Submit a complaint owned by the signed-in student.
#[utoipa::path(
    post,
    path = "/api/v1/complaints",
    request_body = SubmitComplaintRequest,
    responses(
        (status = 201, description = "Complaint stored", body = CreatedResponse),
        (status = 400, description = "Invalid form", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Not a student session", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "submitComplaint"
)]
#[post("/complaints")]
pub async fn submit_complaint(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitComplaintRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require(Admission::Student)?;
    let draft = ComplaintDraft::try_from_form(payload.into_inner().into())
        .map_err(|err| submission_validation_error(&err))?;
    let id = state.complaints.submit(&identity.user_id, draft).await?;
    Ok(HttpResponse::Created().json(CreatedResponse { id: id.to_string() }))
}

/// List the signed-in student's complaints with dashboard counters.
#[utoipa::path(
    get,
    path = "/api/v1/complaints/mine",
    responses(
        (status = 200, description = "Own complaints", body = MyComplaintsResponse),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Not a student session", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "listMyComplaints"
)]
#[get("/complaints/mine")]
pub async fn list_my_complaints(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<MyComplaintsResponse>> {
    let identity = session.require(Admission::Student)?;
    let listing = state.complaints_query.list_mine(&identity.user_id).await?;
    Ok(web::Json(listing.into()))
}

/// List every complaint for the admin dashboard, optionally filtered.
#[utoipa::path(
    get,
    path = "/api/v1/complaints",
    params(ComplaintFilterQuery),
    responses(
        (status = 200, description = "Filtered complaints", body = ComplaintOverviewResponse),
        (status = 400, description = "Invalid filter", body = Error),
        (status = 401, description = "Not signed in", body = Error),
        (status = 403, description = "Not an admin session", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "listComplaints"
)]
#[get("/complaints")]
pub async fn list_complaints(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ComplaintFilterQuery>,
) -> ApiResult<web::Json<ComplaintOverviewResponse>> {
    session.require(Admission::Admin)?;
    let filter = ComplaintFilter::try_from(query.into_inner())?;
    let overview = state.complaints_query.overview(&filter).await?;
    Ok(web::Json(overview.into()))
}

/// Set a complaint's status.
#[utoipa::path(
    put,
    path = "/api/v1/complaints/{id}/status",
    params(("id" = String, Path, description = "Complaint identifier")),
    request_body = StatusRequest,
    responses(
        (status = 200, description = "Updated complaint", body = ComplaintResponse),
        (status = 400, description = "Invalid status", body = Error),
        (status = 403, description = "Not an admin session", body = Error),
        (status = 404, description = "Unknown complaint", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "setComplaintStatus"
)]
#[put("/complaints/{id}/status")]
pub async fn set_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<StatusRequest>,
) -> ApiResult<web::Json<ComplaintResponse>> {
    session.require(Admission::Admin)?;
    let id = record_id(path)?;
    let raw = payload
        .into_inner()
        .status
        .ok_or_else(|| missing_field_error(STATUS_FIELD))?;
    let status = raw
        .parse::<Status>()
        .map_err(|err| invalid_value_error(STATUS_FIELD, &raw, err.to_string()))?;
    let complaint = state.complaints.set_status(&id, status).await?;
    Ok(web::Json(ComplaintResponse::from(&complaint)))
}

/// Flip a complaint between resolved and unresolved.
#[utoipa::path(
    post,
    path = "/api/v1/complaints/{id}/status/toggle",
    params(("id" = String, Path, description = "Complaint identifier")),
    responses(
        (status = 200, description = "Updated complaint", body = ComplaintResponse),
        (status = 403, description = "Not an admin session", body = Error),
        (status = 404, description = "Unknown complaint", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "toggleComplaintStatus"
)]
#[post("/complaints/{id}/status/toggle")]
pub async fn toggle_status(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<ComplaintResponse>> {
    session.require(Admission::Admin)?;
    let id = record_id(path)?;
    let complaint = state.complaints.toggle_status(&id).await?;
    Ok(web::Json(ComplaintResponse::from(&complaint)))
}

/// Append an administrator message to a complaint.
#[utoipa::path(
    post,
    path = "/api/v1/complaints/{id}/feedbacks",
    params(("id" = String, Path, description = "Complaint identifier")),
    request_body = AddFeedbackRequest,
    responses(
        (status = 201, description = "Feedback appended", body = ComplaintResponse),
        (status = 400, description = "Invalid message", body = Error),
        (status = 403, description = "Not an admin session", body = Error),
        (status = 404, description = "Unknown complaint", body = Error),
        (status = 409, description = "Complaint changed since it was read", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "addFeedback"
)]
#[post("/complaints/{id}/feedbacks")]
pub async fn add_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<AddFeedbackRequest>,
) -> ApiResult<HttpResponse> {
    let identity = session.require(Admission::Admin)?;
    let id = record_id(path)?;
    let AddFeedbackRequest {
        message,
        expected_revision,
    } = payload.into_inner();
    let message = FeedbackMessage::new(&message).map_err(|err| feedback_validation_error(&err))?;
    let complaint = state
        .complaints
        .add_feedback(&id, &identity.user_id, message, expected_revision)
        .await?;
    Ok(HttpResponse::Created().json(ComplaintResponse::from(&complaint)))
}

/// Remove the feedback entry matching `(timestamp, message)`.
#[utoipa::path(
    delete,
    path = "/api/v1/complaints/{id}/feedbacks",
    params(("id" = String, Path, description = "Complaint identifier")),
    request_body = RemoveFeedbackRequest,
    responses(
        (status = 200, description = "Feedback removed", body = ComplaintResponse),
        (status = 403, description = "Not an admin session", body = Error),
        (status = 404, description = "Unknown complaint or feedback", body = Error),
        (status = 409, description = "Complaint changed since it was read", body = Error)
    ),
    tags = ["complaints"],
    operation_id = "removeFeedback"
)]
#[delete("/complaints/{id}/feedbacks")]
pub async fn remove_feedback(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RemoveFeedbackRequest>,
) -> ApiResult<web::Json<ComplaintResponse>> {
    session.require(Admission::Admin)?;
    let id = record_id(path)?;
    let RemoveFeedbackRequest {
        timestamp,
        message,
        expected_revision,
    } = payload.into_inner();
    let key = FeedbackKey { timestamp, message };
    let complaint = state
        .complaints
        .remove_feedback(&id, &key, expected_revision)
        .await?;
    Ok(web::Json(ComplaintResponse::from(&complaint)))
}

#[cfg(test)]
#[path = "complaints_tests.rs"]
mod tests;
