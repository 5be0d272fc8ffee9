use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Phone model catalog entry (e.g. "iPhone 16 Pro"). Seeded out-of-band.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "models")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,
    pub year: i32,
    pub price: Decimal,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::phone_case::Entity")]
    PhoneCases,
}

impl Related<super::phone_case::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PhoneCases.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
