//! Authentication primitives: login credentials, sign-up forms, portal tabs
//! and the admission decided at login.
//!
//! Keep inbound payload parsing outside the domain by exposing constructors
//! that validate string inputs before a handler talks to a port or service.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use zeroize::Zeroizing;

use crate::domain::{
    ContactNumber, Department, Email, PersonName, Role, UserId, UserProfile, UserValidationError,
};

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Email did not look like an address.
    InvalidEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::InvalidEmail => write!(f, "email must look like name@domain.tld"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is normalised (trimmed, lower-cased).
/// - `password` is non-empty but retains caller-provided whitespace.
///
/// # Examples
/// ```
/// use campus_portal::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts("Ada@College.edu", "secret").unwrap();
/// assert_eq!(creds.email().as_ref(), "ada@college.edu");
/// assert_eq!(creds.password(), "secret");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: Email,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let email = Email::new(email).map_err(|err| match err {
            UserValidationError::EmptyEmail => LoginValidationError::EmptyEmail,
            _ => LoginValidationError::InvalidEmail,
        })?;

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email,
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email used for account lookups.
    pub fn email(&self) -> &Email {
        &self.email
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Portal tab the caller asked to log into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PortalTab {
    Student,
    Admin,
}

impl FromStr for PortalTab {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "admin" => Ok(Self::Admin),
            other => Err(format!("invalid login type '{other}'")),
        }
    }
}

/// Access granted to a session at login.
///
/// Decided once by the role router and matched exhaustively wherever a view
/// or operation is gated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Admission {
    Student,
    Admin,
}

impl Admission {
    /// Human-facing name of the dashboard behind this admission.
    pub fn dashboard(self) -> &'static str {
        match self {
            Self::Student => "Student Dashboard",
            Self::Admin => "Admin Dashboard",
        }
    }

    /// Wire representation stored in the session.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Student => "student",
            Self::Admin => "admin",
        }
    }
}

impl From<PortalTab> for Admission {
    fn from(tab: PortalTab) -> Self {
        match tab {
            PortalTab::Student => Self::Student,
            PortalTab::Admin => Self::Admin,
        }
    }
}

impl FromStr for Admission {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        PortalTab::from_str(value).map(Self::from)
    }
}

/// Identity reported by the auth provider for the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    pub user_id: UserId,
    pub email: Email,
}

/// Raw sign-up form as submitted by the caller.
#[derive(Debug, Clone, Default)]
pub struct SignUpForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub contact_number: String,
    pub department: String,
    pub role: String,
}

/// Errors raised while validating a sign-up form.
///
/// Password strength is the auth provider's call; the form only requires
/// one to be present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpValidationError {
    Profile(UserValidationError),
    EmptyPassword,
}

impl fmt::Display for SignUpValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Profile(err) => err.fmt(f),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for SignUpValidationError {}

impl From<UserValidationError> for SignUpValidationError {
    fn from(value: UserValidationError) -> Self {
        Self::Profile(value)
    }
}

/// Validated sign-up request ready for the auth provider and profile store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUp {
    profile: UserProfile,
    password: Zeroizing<String>,
}

impl SignUp {
    /// Validate every field of the form, reporting the first failure.
    pub fn try_from_form(form: SignUpForm) -> Result<Self, SignUpValidationError> {
        let profile = UserProfile {
            first_name: PersonName::new(&form.first_name, "firstName")?,
            last_name: PersonName::new(&form.last_name, "lastName")?,
            email: Email::new(&form.email)?,
            contact_number: ContactNumber::new(&form.contact_number)?,
            department: Department::new(&form.department)?,
            role: form.role.parse::<Role>()?,
        };
        if form.password.is_empty() {
            return Err(SignUpValidationError::EmptyPassword);
        }
        Ok(Self {
            profile,
            password: Zeroizing::new(form.password),
        })
    }

    /// Validated profile fields.
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// Password to hand to the auth provider.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}
