//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed records of the portal (users,
//! complaints, suggestions, feedback) and the services that implement the
//! driving ports. Nothing here knows about HTTP or a concrete store.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - SessionHolder: per-session identity with change notifications.
//! - RecordRepository: typed access to the document store port.
//! - RoleRouter, ComplaintService, SuggestionService, UserProfileService:
//!   implementations of the driving ports in [`ports`].

pub mod auth;
pub mod complaint;
pub mod complaint_service;
pub mod error;
pub mod feedback;
pub mod filter;
pub mod ports;
pub mod records;
pub mod role_router;
pub mod session;
pub mod submission;
pub mod suggestion;
pub mod suggestion_service;
pub mod trace_id;
pub mod user;
pub mod user_profile_service;

pub use self::auth::{
    Admission, Identity, LoginCredentials, LoginValidationError, PortalTab, SignUp, SignUpForm,
    SignUpValidationError,
};
pub use self::complaint::{
    CATEGORY_MAX, Category, Complaint, ComplaintDraft, ComplaintForm, Priority, Status,
    UnknownStatus,
};
pub use self::complaint_service::ComplaintService;
pub use self::error::{Error, ErrorCode, TRACE_ID_HEADER};
pub use self::feedback::{
    FEEDBACK_MAX, Feedback, FeedbackKey, FeedbackMessage, FeedbackValidationError,
    append_feedback, remove_feedback,
};
pub use self::filter::{ComplaintFilter, ComplaintStats};
pub use self::records::{RecordError, RecordRepository};
pub use self::role_router::{PROFILE_NOT_FOUND, RoleRouter};
pub use self::session::{IdentityState, SessionHolder};
pub use self::submission::{
    DESCRIPTION_MAX, EmptyRecordId, RecordId, SubmissionValidationError, TITLE_MAX,
};
pub use self::suggestion::{Suggestion, SuggestionDraft, SuggestionForm};
pub use self::suggestion_service::SuggestionService;
pub use self::user_profile_service::UserProfileService;
pub use self::trace_id::TraceId;
pub use self::user::{
    ContactNumber, Department, Email, PERSON_NAME_MAX, PersonName, Role, User, UserId,
    UserProfile, UserValidationError,
};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use campus_portal::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("nope"))
/// }
/// # assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
