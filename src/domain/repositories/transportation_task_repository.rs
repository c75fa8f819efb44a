use async_trait::async_trait;

use crate::domain::{error::RepositoryError, models::user::UserId};

#[async_trait]
pub trait TransportationTaskRepository<S: Send + Sync + 'static> {
    /// Any task, completed or not, naming `driver` as its assigned driver
    async fn exists_by_assigned_driver(
        &self,
        driver: &UserId,
        session: Option<&S>,
    ) -> Result<bool, RepositoryError>;
}
