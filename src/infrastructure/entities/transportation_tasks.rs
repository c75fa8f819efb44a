use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transportation_tasks")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub filled_by: Uuid,
    pub cargo_description: String,
    pub cargo_weight: f64,
    pub price_per_ton: f64,
    pub source: String,
    pub destination: String,
    pub assigned_vehicle: String,
    /// Owning user of the driver profile
    pub assigned_driver: Uuid,
    pub scheduled_time: DateTimeUtc,
    pub completed: bool,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
