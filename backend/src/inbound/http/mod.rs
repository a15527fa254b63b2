//! HTTP inbound adapter exposing the portal's REST endpoints.

pub mod auth;
pub mod complaints;
pub mod error;
pub mod health;
pub mod session;
pub mod session_config;
pub mod state;
pub mod suggestions;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

pub use error::ApiResult;
