//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **memory**: process-local document store and auth provider used by the
//!   server binary and the integration tests.
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod memory;
