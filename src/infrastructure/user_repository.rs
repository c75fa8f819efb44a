use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, DatabaseConnection, DatabaseTransaction,
    EntityTrait, QueryFilter, QueryOrder,
};

use crate::{
    domain::{
        error::RepositoryError,
        models::{
            credential::HashedPassword,
            role::RoleSet,
            user::{User, UserId, Username},
        },
        repositories::user_repository::UserRepository,
    },
    infrastructure::{db_error::map_db_err, entities::users},
};

#[derive(Clone)]
pub struct SeaOrmUserRepository {
    db: DatabaseConnection,
}

impl SeaOrmUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: users::Model) -> Result<User, RepositoryError> {
    let names: Vec<String> = serde_json::from_value(model.roles)
        .map_err(|e| RepositoryError::DatabaseError(format!("malformed roles: {}", e)))?;
    let roles = RoleSet::parse(&names).map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
    let username =
        Username::new(model.username).map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;

    User::new(
        UserId::from_uuid(model.id),
        username,
        HashedPassword::new(model.password_hash),
        model.first_name,
        model.last_name,
        roles,
        model.active,
    )
    .map_err(|e| RepositoryError::DatabaseError(e.to_string()))
}

fn to_active_model(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(*user.id().as_uuid()),
        username: Set(user.username().as_str().to_string()),
        password_hash: Set(user.password_hash().as_str().to_string()),
        first_name: Set(user.first_name().to_string()),
        last_name: Set(user.last_name().to_string()),
        roles: Set(serde_json::json!(user.roles().names())),
        active: Set(user.is_active()),
    }
}

#[async_trait]
impl UserRepository<DatabaseTransaction> for SeaOrmUserRepository {
    async fn find_by_id(
        &self,
        id: &UserId,
        session: Option<&DatabaseTransaction>,
    ) -> Result<Option<User>, RepositoryError> {
        let model = with_connection!(self.db, session, conn => {
            users::Entity::find_by_id(*id.as_uuid()).one(conn).await
        })
        .map_err(map_db_err)?;

        model.map(to_domain).transpose()
    }

    async fn find_by_username(
        &self,
        username: &Username,
        session: Option<&DatabaseTransaction>,
    ) -> Result<Option<User>, RepositoryError> {
        let model = with_connection!(self.db, session, conn => {
            users::Entity::find()
                .filter(users::Column::Username.eq(username.as_str()))
                .one(conn)
                .await
        })
        .map_err(map_db_err)?;

        model.map(to_domain).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        users::Entity::find()
            .order_by_asc(users::Column::Username)
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(to_domain)
            .collect()
    }

    async fn create(
        &self,
        user: &User,
        session: Option<&DatabaseTransaction>,
    ) -> Result<(), RepositoryError> {
        with_connection!(self.db, session, conn => {
            users::Entity::insert(to_active_model(user))
                .exec_without_returning(conn)
                .await
        })
        .map_err(map_db_err)?;
        Ok(())
    }

    async fn update(
        &self,
        user: &User,
        session: Option<&DatabaseTransaction>,
    ) -> Result<(), RepositoryError> {
        with_connection!(self.db, session, conn => {
            to_active_model(user).update(conn).await
        })
        .map_err(map_db_err)?;
        Ok(())
    }

    async fn delete_by_id(
        &self,
        id: &UserId,
        session: Option<&DatabaseTransaction>,
    ) -> Result<bool, RepositoryError> {
        let result = with_connection!(self.db, session, conn => {
            users::Entity::delete_by_id(*id.as_uuid()).exec(conn).await
        })
        .map_err(map_db_err)?;
        Ok(result.rows_affected > 0)
    }
}
