use async_trait::async_trait;

use crate::domain::error::RepositoryError;

/// Multi-statement atomicity spanning every collection of the store.
///
/// A session returned by [`SessionManager::begin`] must be consumed by exactly
/// one of [`SessionManager::commit`] or [`SessionManager::abort`]. Repository
/// operations join it by receiving `Some(&session)`.
#[async_trait]
pub trait SessionManager {
    type Session: Send + Sync + 'static;

    async fn begin(&self) -> Result<Self::Session, RepositoryError>;

    async fn commit(&self, session: Self::Session) -> Result<(), RepositoryError>;

    async fn abort(&self, session: Self::Session) -> Result<(), RepositoryError>;
}
