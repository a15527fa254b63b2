//! Campus complaint and suggestion portal.
//!
//! Hexagonal layout: [`domain`] holds the records, validation and services;
//! [`inbound`] adapts HTTP and WebSocket traffic onto the domain ports;
//! [`outbound`] implements the store and auth provider ports.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

#[cfg(test)]
pub(crate) mod test_support;

pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
