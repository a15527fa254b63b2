//! Process-local adapters for the document store and auth provider ports.
//!
//! State lives for the lifetime of the process. The server seeds the admin
//! allow-list at start-up; everything else is created through the API.

mod auth_provider;
mod document_store;

pub use auth_provider::{InMemoryAuthProvider, PROVIDER_PASSWORD_MIN};
pub use document_store::InMemoryDocumentStore;
