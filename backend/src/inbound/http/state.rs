//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    ComplaintCommand, ComplaintQuery, LoginService, SuggestionCommand, SuggestionQuery,
    UserProfileQuery,
};

/// Dependency bundle for HTTP handlers.
///
/// # Examples
/// ```no_run
/// use std::sync::Arc;
///
/// use campus_portal::domain::{
///     ComplaintService, RecordRepository, RoleRouter, SuggestionService, UserProfileService,
/// };
/// use campus_portal::inbound::http::state::HttpState;
/// use campus_portal::outbound::memory::{InMemoryAuthProvider, InMemoryDocumentStore};
/// use mockable::DefaultClock;
///
/// let records = RecordRepository::new(Arc::new(InMemoryDocumentStore::new()));
/// let complaints = Arc::new(ComplaintService::new(records.clone(), Arc::new(DefaultClock)));
/// let suggestions = Arc::new(SuggestionService::new(records.clone(), Arc::new(DefaultClock)));
/// let state = HttpState {
///     login: Arc::new(RoleRouter::new(Arc::new(InMemoryAuthProvider::new()), records.clone())),
///     complaints: complaints.clone(),
///     complaints_query: complaints,
///     suggestions: suggestions.clone(),
///     suggestions_query: suggestions,
///     profile: Arc::new(UserProfileService::new(records)),
/// };
/// let _login = state.login.clone();
/// ```
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub complaints: Arc<dyn ComplaintCommand>,
    pub complaints_query: Arc<dyn ComplaintQuery>,
    pub suggestions: Arc<dyn SuggestionCommand>,
    pub suggestions_query: Arc<dyn SuggestionQuery>,
    pub profile: Arc<dyn UserProfileQuery>,
}
