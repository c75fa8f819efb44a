use sea_orm::{
    ConnectionTrait, DatabaseConnection, DbBackend, DbErr, Schema, sea_query::TableCreateStatement,
};
use tracing::info;

use crate::infrastructure::entities::{analysts, drivers, managers, transportation_tasks, users};

/// Case- and accent-insensitive; username lookups and the unique index rely on it.
const USERNAME_COLLATION: &str = "utf8mb4_0900_ai_ci";

fn create_statements(backend: DbBackend) -> Vec<TableCreateStatement> {
    let schema = Schema::new(backend);

    let mut users = schema.create_table_from_entity(users::Entity);
    users.character_set("utf8mb4").collate(USERNAME_COLLATION);

    let mut statements = vec![
        users,
        schema.create_table_from_entity(managers::Entity),
        schema.create_table_from_entity(drivers::Entity),
        schema.create_table_from_entity(analysts::Entity),
        schema.create_table_from_entity(transportation_tasks::Entity),
    ];

    for statement in statements.iter_mut() {
        statement.if_not_exists();
    }
    statements
}

/// Creates any missing table. Existing tables are left untouched.
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    let backend = db.get_database_backend();
    let statements = create_statements(backend);

    for statement in &statements {
        db.execute(backend.build(statement)).await?;
    }

    info!(tables = statements.len(), "schema ready");
    Ok(())
}
