use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    error::RepositoryError,
    models::{
        profile::{Phone, Profile, ProfileKind},
        user::UserId,
    },
};

/// Access to the Manager, Driver and Analyst collections, addressed by kind
#[async_trait]
pub trait ProfileRepository<S: Send + Sync + 'static> {
    async fn find_by_user(
        &self,
        kind: ProfileKind,
        user_id: &UserId,
        session: Option<&S>,
    ) -> Result<Option<Profile>, RepositoryError>;

    async fn create(&self, profile: &Profile, session: Option<&S>) -> Result<(), RepositoryError>;

    /// Sets the phone on the profile owned by `user_id` and returns the updated
    /// document, or `None` when the user has no profile of this kind.
    async fn update_phone_by_user(
        &self,
        kind: ProfileKind,
        user_id: &UserId,
        phone: &Phone,
        session: Option<&S>,
    ) -> Result<Option<Profile>, RepositoryError>;

    async fn delete_by_id(
        &self,
        kind: ProfileKind,
        id: Uuid,
        session: Option<&S>,
    ) -> Result<bool, RepositoryError>;
}
