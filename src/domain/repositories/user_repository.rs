use async_trait::async_trait;

use crate::domain::{
    error::RepositoryError,
    models::user::{User, UserId, Username},
};

#[async_trait]
pub trait UserRepository<S: Send + Sync + 'static> {
    async fn find_by_id(&self, id: &UserId, session: Option<&S>)
    -> Result<Option<User>, RepositoryError>;

    /// Lookup under the store's case- and accent-insensitive collation
    async fn find_by_username(
        &self,
        username: &Username,
        session: Option<&S>,
    ) -> Result<Option<User>, RepositoryError>;

    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    async fn create(&self, user: &User, session: Option<&S>) -> Result<(), RepositoryError>;

    async fn update(&self, user: &User, session: Option<&S>) -> Result<(), RepositoryError>;

    /// Returns whether a document was removed
    async fn delete_by_id(&self, id: &UserId, session: Option<&S>) -> Result<bool, RepositoryError>;
}
