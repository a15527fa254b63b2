//! Wiring of domain services over the in-memory adapters.

use std::sync::Arc;

use mockable::DefaultClock;
use tracing::info;

use campus_portal::domain::{
    ComplaintService, Email, RecordRepository, RoleRouter, SuggestionService, UserProfileService,
};
use campus_portal::inbound::http::state::HttpState;
use campus_portal::inbound::ws::state::{OriginPolicy, WsState};
use campus_portal::outbound::memory::{InMemoryAuthProvider, InMemoryDocumentStore};

/// Adapter states shared by every worker.
pub(crate) struct PortalStates {
    pub(crate) http: HttpState,
    pub(crate) ws: WsState,
}

/// Build services over fresh in-memory adapters and seed the admin
/// allow-list.
///
/// # Errors
/// Returns [`std::io::Error`] when seeding the allow-list fails.
pub(crate) async fn build_states(
    admin_emails: &[Email],
    origins: OriginPolicy,
) -> std::io::Result<PortalStates> {
    let records = RecordRepository::new(Arc::new(InMemoryDocumentStore::new()));
    for email in admin_emails {
        records
            .authorize_admin(email)
            .await
            .map_err(|err| std::io::Error::other(format!("seeding admin {email}: {err}")))?;
        info!(%email, "admin allow-list entry seeded");
    }

    let clock = Arc::new(DefaultClock);
    let complaints = Arc::new(ComplaintService::new(records.clone(), clock.clone()));
    let suggestions = Arc::new(SuggestionService::new(records.clone(), clock));
    let login = Arc::new(RoleRouter::new(
        Arc::new(InMemoryAuthProvider::new()),
        records.clone(),
    ));
    let http = HttpState {
        login: login.clone(),
        complaints: complaints.clone(),
        complaints_query: complaints.clone(),
        suggestions: suggestions.clone(),
        suggestions_query: suggestions,
        profile: Arc::new(UserProfileService::new(records)),
    };
    let ws = WsState::new(complaints, login, origins);
    Ok(PortalStates { http, ws })
}
