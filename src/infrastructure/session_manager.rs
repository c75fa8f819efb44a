use async_trait::async_trait;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::{
    domain::{error::RepositoryError, repositories::session::SessionManager},
    infrastructure::db_error::map_db_err,
};

/// Sessions backed by database transactions. A transaction dropped without
/// commit is rolled back by the driver.
#[derive(Clone)]
pub struct SeaOrmSessionManager {
    db: DatabaseConnection,
}

impl SeaOrmSessionManager {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SessionManager for SeaOrmSessionManager {
    type Session = DatabaseTransaction;

    async fn begin(&self) -> Result<DatabaseTransaction, RepositoryError> {
        self.db.begin().await.map_err(map_db_err)
    }

    async fn commit(&self, session: DatabaseTransaction) -> Result<(), RepositoryError> {
        session.commit().await.map_err(map_db_err)
    }

    async fn abort(&self, session: DatabaseTransaction) -> Result<(), RepositoryError> {
        session.rollback().await.map_err(map_db_err)
    }
}
