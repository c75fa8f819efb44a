use async_trait::async_trait;
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction, DbErr,
    EntityTrait, QueryFilter, sea_query::Expr,
};
use uuid::Uuid;

use crate::{
    domain::{
        error::RepositoryError,
        models::{
            profile::{Phone, Profile, ProfileKind},
            user::UserId,
        },
        repositories::profile_repository::ProfileRepository,
    },
    infrastructure::{
        db_error::map_db_err,
        entities::{analysts, drivers, managers},
    },
};

/// Column access shared by the three profile tables
trait ProfileTable: EntityTrait {
    const KIND: ProfileKind;

    fn id_column() -> Self::Column;
    fn user_id_column() -> Self::Column;
    fn phone_column() -> Self::Column;
    async fn insert_row<C: ConnectionTrait>(conn: &C, profile: &Profile) -> Result<(), DbErr>;
    fn to_domain(model: Self::Model) -> Result<Profile, RepositoryError>;
}

macro_rules! profile_table {
    ($module:ident, $kind:expr) => {
        impl ProfileTable for $module::Entity {
            const KIND: ProfileKind = $kind;

            fn id_column() -> Self::Column {
                $module::Column::Id
            }

            fn user_id_column() -> Self::Column {
                $module::Column::UserId
            }

            fn phone_column() -> Self::Column {
                $module::Column::Phone
            }

            async fn insert_row<C: ConnectionTrait>(conn: &C, profile: &Profile) -> Result<(), DbErr> {
                let model = $module::ActiveModel {
                    id: Set(profile.id()),
                    user_id: Set(*profile.user_id().as_uuid()),
                    phone: Set(profile.phone().as_str().to_string()),
                };
                $module::Entity::insert(model)
                    .exec_without_returning(conn)
                    .await
                    .map(|_| ())
            }

            fn to_domain(model: Self::Model) -> Result<Profile, RepositoryError> {
                let phone = Phone::new(model.phone)
                    .map_err(|e| RepositoryError::DatabaseError(e.to_string()))?;
                Ok(Profile::reconstruct(
                    model.id,
                    Self::KIND,
                    UserId::from_uuid(model.user_id),
                    phone,
                ))
            }
        }
    };
}

profile_table!(managers, ProfileKind::Manager);
profile_table!(drivers, ProfileKind::Driver);
profile_table!(analysts, ProfileKind::Analyst);

/// Binds `$entity` to the table for `$kind` and evaluates `$body`
macro_rules! by_kind {
    ($kind:expr, $entity:ident => $body:expr) => {
        match $kind {
            ProfileKind::Manager => {
                type $entity = managers::Entity;
                $body
            }
            ProfileKind::Driver => {
                type $entity = drivers::Entity;
                $body
            }
            ProfileKind::Analyst => {
                type $entity = analysts::Entity;
                $body
            }
        }
    };
}

async fn find_owned<E: ProfileTable, C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
) -> Result<Option<Profile>, RepositoryError> {
    E::find()
        .filter(E::user_id_column().eq(user_id))
        .one(conn)
        .await
        .map_err(map_db_err)?
        .map(E::to_domain)
        .transpose()
}

async fn insert<E: ProfileTable, C: ConnectionTrait>(
    conn: &C,
    profile: &Profile,
) -> Result<(), RepositoryError> {
    // the driver table also carries a unique index for concurrent writers
    if E::KIND.enforces_unique_owner()
        && find_owned::<E, C>(conn, *profile.user_id().as_uuid())
            .await?
            .is_some()
    {
        return Err(RepositoryError::Duplicate(format!(
            "{} profile already exists for this user",
            E::KIND
        )));
    }

    E::insert_row(conn, profile).await.map_err(map_db_err)
}

async fn set_phone<E: ProfileTable, C: ConnectionTrait>(
    conn: &C,
    user_id: Uuid,
    phone: &Phone,
) -> Result<Option<Profile>, RepositoryError> {
    E::update_many()
        .col_expr(E::phone_column(), Expr::value(phone.as_str().to_string()))
        .filter(E::user_id_column().eq(user_id))
        .exec(conn)
        .await
        .map_err(map_db_err)?;

    // callers need the stored profile, not a row count
    find_owned::<E, C>(conn, user_id).await
}

async fn remove<E: ProfileTable, C: ConnectionTrait>(
    conn: &C,
    id: Uuid,
) -> Result<bool, RepositoryError> {
    let result = E::delete_many()
        .filter(E::id_column().eq(id))
        .exec(conn)
        .await
        .map_err(map_db_err)?;
    Ok(result.rows_affected > 0)
}

#[derive(Clone)]
pub struct SeaOrmProfileRepository {
    db: DatabaseConnection,
}

impl SeaOrmProfileRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ProfileRepository<DatabaseTransaction> for SeaOrmProfileRepository {
    async fn find_by_user(
        &self,
        kind: ProfileKind,
        user_id: &UserId,
        session: Option<&DatabaseTransaction>,
    ) -> Result<Option<Profile>, RepositoryError> {
        let user_id = *user_id.as_uuid();
        with_connection!(self.db, session, conn => {
            by_kind!(kind, Table => find_owned::<Table, _>(conn, user_id).await)
        })
    }

    async fn create(
        &self,
        profile: &Profile,
        session: Option<&DatabaseTransaction>,
    ) -> Result<(), RepositoryError> {
        with_connection!(self.db, session, conn => {
            by_kind!(profile.kind(), Table => insert::<Table, _>(conn, profile).await)
        })
    }

    async fn update_phone_by_user(
        &self,
        kind: ProfileKind,
        user_id: &UserId,
        phone: &Phone,
        session: Option<&DatabaseTransaction>,
    ) -> Result<Option<Profile>, RepositoryError> {
        let user_id = *user_id.as_uuid();
        with_connection!(self.db, session, conn => {
            by_kind!(kind, Table => set_phone::<Table, _>(conn, user_id, phone).await)
        })
    }

    async fn delete_by_id(
        &self,
        kind: ProfileKind,
        id: Uuid,
        session: Option<&DatabaseTransaction>,
    ) -> Result<bool, RepositoryError> {
        with_connection!(self.db, session, conn => {
            by_kind!(kind, Table => remove::<Table, _>(conn, id).await)
        })
    }
}
