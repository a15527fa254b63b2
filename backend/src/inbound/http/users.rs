//! Profile handler for the signed-in user.
//!
//! ```text
//! GET /api/v1/me
//! ```

use actix_web::{get, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{Error, User};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Stored profile of the signed-in user.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "Ada")]
    pub first_name: String,
    #[schema(example = "Lovelace")]
    pub last_name: String,
    #[schema(example = "ada@college.edu")]
    pub email: String,
    #[schema(example = "0123456789")]
    pub contact_number: String,
    #[schema(example = "Computer Science")]
    pub department: String,
    #[schema(example = "student")]
    pub role: String,
}

impl From<User> for ProfileResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id().to_string(),
            first_name: user.first_name().as_ref().to_owned(),
            last_name: user.last_name().as_ref().to_owned(),
            email: user.email().to_string(),
            contact_number: user.contact_number().as_ref().to_owned(),
            department: user.department().as_ref().to_owned(),
            role: user.role().as_str().to_owned(),
        }
    }
}

/// Fetch the stored profile of the signed-in user.
#[utoipa::path(
    get,
    path = "/api/v1/me",
    responses(
        (status = 200, description = "Profile", body = ProfileResponse),
        (status = 401, description = "Not signed in", body = Error),
        (status = 404, description = "Profile missing", body = Error),
        (status = 503, description = "Record store unavailable", body = Error)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/me")]
pub async fn current_user(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ProfileResponse>> {
    let admitted = session.require_admitted()?;
    let user = state.profile.fetch_profile(&admitted.identity.user_id).await?;
    Ok(web::Json(ProfileResponse::from(user)))
}
