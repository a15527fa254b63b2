//! Login, sign-up and logout handlers.
//!
//! ```text
//! POST /api/v1/login {"tab":"student","email":"ada@college.edu","password":"..."}
//! POST /api/v1/signup {...profile fields...}
//! POST /api/v1/logout
//! GET /api/v1/session
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::Admitted;
use crate::domain::{
    Admission, Error, LoginCredentials, PortalTab, SessionHolder, SignUp, SignUpForm,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, invalid_value_error, login_validation_error, missing_field_error,
    sign_up_validation_error,
};

const TAB_FIELD: FieldName = FieldName::new("tab");

/// Login request body for `POST /api/v1/login`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Portal tab the caller is logging into: `student` or `admin`.
    #[schema(example = "student")]
    pub tab: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Identity and admission held by the current session.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub user_id: String,
    #[schema(example = "ada@college.edu")]
    pub email: String,
    pub admission: Admission,
    /// Name of the dashboard the caller should be routed to.
    #[schema(example = "Student Dashboard")]
    pub dashboard: String,
}

impl From<&Admitted> for SessionResponse {
    fn from(value: &Admitted) -> Self {
        Self {
            user_id: value.identity.user_id.to_string(),
            email: value.identity.email.to_string(),
            admission: value.admission,
            dashboard: value.admission.dashboard().to_owned(),
        }
    }
}

/// Sign-up request body for `POST /api/v1/signup`.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUpRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    /// Exactly ten digits.
    #[schema(example = "0123456789")]
    pub contact_number: String,
    pub department: String,
    /// Stored role; defaults to `student`.
    pub role: Option<String>,
}

impl From<SignUpRequest> for SignUpForm {
    fn from(value: SignUpRequest) -> Self {
        Self {
            first_name: value.first_name,
            last_name: value.last_name,
            email: value.email,
            password: value.password,
            contact_number: value.contact_number,
            department: value.department,
            role: value.role.unwrap_or_else(|| "student".to_owned()),
        }
    }
}

/// Response body for `POST /api/v1/signup`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignUpResponse {
    pub user_id: String,
}

fn parse_tab(raw: Option<String>) -> Result<PortalTab, Error> {
    let raw = raw.ok_or_else(|| missing_field_error(TAB_FIELD))?;
    raw.parse::<PortalTab>()
        .map_err(|message| invalid_value_error(TAB_FIELD, &raw, message))
}

/// Authenticate, decide admission for the requested tab and establish a
/// session.
///
/// A denied login leaves the caller signed out.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionResponse, headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = Error),
        (status = 401, description = "Invalid credentials", body = Error),
        (status = 403, description = "Role does not match the requested tab", body = Error),
        (status = 503, description = "Record store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["access"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<web::Json<SessionResponse>> {
    let LoginRequest {
        tab,
        email,
        password,
    } = payload.into_inner();
    let tab = parse_tab(tab)?;
    let credentials = LoginCredentials::try_from_parts(&email, &password)
        .map_err(|err| login_validation_error(&err))?;

    let holder = SessionHolder::new();
    match state.login.sign_in(&holder, tab, &credentials).await {
        Ok(admitted) => {
            session.persist(&admitted)?;
            Ok(web::Json(SessionResponse::from(&admitted)))
        }
        Err(error) => {
            session.purge();
            Err(error)
        }
    }
}

/// Create an account and its student profile.
///
/// The new account is not signed in; the caller logs in afterwards.
#[utoipa::path(
    post,
    path = "/api/v1/signup",
    request_body = SignUpRequest,
    responses(
        (status = 201, description = "Account created", body = SignUpResponse),
        (status = 400, description = "Invalid request", body = Error),
        (status = 409, description = "Email already registered", body = Error),
        (status = 503, description = "Record store unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["access"],
    operation_id = "signUp",
    security([])
)]
#[post("/signup")]
pub async fn sign_up(
    state: web::Data<HttpState>,
    payload: web::Json<SignUpRequest>,
) -> ApiResult<HttpResponse> {
    let request = SignUp::try_from_form(payload.into_inner().into())
        .map_err(|err| sign_up_validation_error(&err))?;
    let user_id = state.login.sign_up(request).await?;
    Ok(HttpResponse::Created().json(SignUpResponse {
        user_id: user_id.to_string(),
    }))
}

/// Sign the caller out of the auth provider and clear the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses(
        (status = 204, description = "Signed out"),
        (status = 503, description = "Auth provider unavailable", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["access"],
    operation_id = "logout"
)]
#[post("/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let identity = session.admitted()?.map(|admitted| admitted.identity);
    let holder = state.login.session_for(identity);
    state.login.sign_out(&holder).await?;
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}

/// Report the identity and admission held by the session.
#[utoipa::path(
    get,
    path = "/api/v1/session",
    responses(
        (status = 200, description = "Current session", body = SessionResponse),
        (status = 401, description = "Not signed in", body = Error)
    ),
    tags = ["access"],
    operation_id = "currentSession"
)]
#[get("/session")]
pub async fn current_session(session: SessionContext) -> ApiResult<web::Json<SessionResponse>> {
    let admitted = session.require_admitted()?;
    Ok(web::Json(SessionResponse::from(&admitted)))
}

#[cfg(test)]
#[path = "auth_tests.rs"]
mod tests;
