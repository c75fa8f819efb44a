use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QueryFilter, QuerySelect,
    Select,
};

use crate::{
    domain::{
        error::RepositoryError, models::user::UserId,
        repositories::transportation_task_repository::TransportationTaskRepository,
    },
    infrastructure::{db_error::map_db_err, entities::transportation_tasks},
};

#[derive(Clone)]
pub struct SeaOrmTransportationTaskRepository {
    db: DatabaseConnection,
}

impl SeaOrmTransportationTaskRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// First task assigned to `driver`, read under a shared lock.
///
/// A plain select inside a transaction is a consistent read that locks
/// nothing. `FOR SHARE` makes a concurrent task insert or reassignment for
/// this driver wait until the deleting transaction ends.
fn assigned_to(driver: &UserId) -> Select<transportation_tasks::Entity> {
    transportation_tasks::Entity::find()
        .select_only()
        .column(transportation_tasks::Column::Id)
        .filter(transportation_tasks::Column::AssignedDriver.eq(*driver.as_uuid()))
        .limit(1)
        .lock_shared()
}

#[async_trait]
impl TransportationTaskRepository<DatabaseTransaction> for SeaOrmTransportationTaskRepository {
    async fn exists_by_assigned_driver(
        &self,
        driver: &UserId,
        session: Option<&DatabaseTransaction>,
    ) -> Result<bool, RepositoryError> {
        let found = with_connection!(self.db, session, conn => {
            assigned_to(driver)
                .into_tuple::<uuid::Uuid>()
                .one(conn)
                .await
        })
        .map_err(map_db_err)?;

        Ok(found.is_some())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{DbBackend, QueryTrait};

    use super::*;

    #[test]
    fn driver_lookup_takes_a_shared_lock() {
        let sql = assigned_to(&UserId::new()).build(DbBackend::MySql).to_string();

        assert!(sql.contains("`assigned_driver` ="), "{}", sql);
        assert!(sql.ends_with("FOR SHARE"), "{}", sql);
    }
}
