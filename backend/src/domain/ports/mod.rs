//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod auth_provider;
mod complaint_command;
mod complaint_query;
mod document_store;
mod login_service;
mod suggestion_command;
mod suggestion_query;
mod user_profile_query;

#[cfg(test)]
pub use auth_provider::MockAuthProvider;
pub use auth_provider::{AuthProvider, AuthProviderError};
#[cfg(test)]
pub use complaint_command::MockComplaintCommand;
pub use complaint_command::ComplaintCommand;
#[cfg(test)]
pub use complaint_query::MockComplaintQuery;
pub use complaint_query::{ComplaintEntry, ComplaintListing, ComplaintOverview, ComplaintQuery};
#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{
    Collection, CollectionChange, Document, DocumentStore, DocumentStoreError, StoredDocument,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{Admitted, LoginService};
#[cfg(test)]
pub use suggestion_command::MockSuggestionCommand;
pub use suggestion_command::SuggestionCommand;
#[cfg(test)]
pub use suggestion_query::MockSuggestionQuery;
pub use suggestion_query::{SuggestionEntry, SuggestionQuery};
#[cfg(test)]
pub use user_profile_query::MockUserProfileQuery;
pub use user_profile_query::UserProfileQuery;
