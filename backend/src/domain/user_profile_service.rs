//! Profile lookup for the signed-in user.

use async_trait::async_trait;

use crate::domain::ports::UserProfileQuery;
use crate::domain::{Error, RecordRepository, User, UserId};

/// Service implementing [`UserProfileQuery`] over the record repository.
#[derive(Clone)]
pub struct UserProfileService {
    records: RecordRepository,
}

impl UserProfileService {
    pub fn new(records: RecordRepository) -> Self {
        Self { records }
    }
}

#[async_trait]
impl UserProfileQuery for UserProfileService {
    async fn fetch_profile(&self, user_id: &UserId) -> Result<User, Error> {
        self.records
            .find_user(user_id)
            .await?
            .ok_or_else(|| Error::not_found(crate::domain::PROFILE_NOT_FOUND))
    }
}
