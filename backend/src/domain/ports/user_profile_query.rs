//! Driving port for user profile queries.
//!
//! Inbound adapters use this port to load the signed-in user's stored
//! profile without importing persistence details.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for reading the current user's profile.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserProfileQuery: Send + Sync {
    /// Return the stored profile, or `not_found` when none exists.
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error>;
}
