use tracing::info;

use crate::domain::{
    error::DomainError, models::user::UserId,
    repositories::transportation_task_repository::TransportationTaskRepository,
};

/// Blocks removal of a driver that transportation tasks still point at
#[derive(Clone)]
pub struct ReferentialGuard<T> {
    task_repository: T,
}

impl<T> ReferentialGuard<T> {
    pub fn new(task_repository: T) -> Self {
        Self { task_repository }
    }

    /// Existence check run inside the caller's open session, so it observes
    /// the same snapshot as the deletes that follow it.
    pub async fn has_blocking_references<S>(
        &self,
        driver: &UserId,
        session: &S,
    ) -> Result<bool, DomainError>
    where
        S: Send + Sync + 'static,
        T: TransportationTaskRepository<S> + Send + Sync,
    {
        let blocked = self
            .task_repository
            .exists_by_assigned_driver(driver, Some(session))
            .await?;

        if blocked {
            info!(driver = %driver, "driver is referenced by a transportation task");
        }

        Ok(blocked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::repositories::session::SessionManager,
        test_support::InMemoryStore,
    };

    #[tokio::test]
    async fn reports_tasks_regardless_of_completion() {
        let store = InMemoryStore::new();
        let open = UserId::new();
        let done = UserId::new();
        let idle = UserId::new();
        store.seed_task(&open, false);
        store.seed_task(&done, true);

        let guard = ReferentialGuard::new(store.clone());
        let session = store.begin().await.unwrap();

        assert!(guard.has_blocking_references(&open, &session).await.unwrap());
        assert!(guard.has_blocking_references(&done, &session).await.unwrap());
        assert!(!guard.has_blocking_references(&idle, &session).await.unwrap());

        store.abort(session).await.unwrap();
        assert_eq!(store.writes(), 0);
    }
}
