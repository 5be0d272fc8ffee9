use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "delivered")]
    Delivered,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

/// A paid purchase. Created exactly once per checkout session by the order
/// finalizer; price is stored in minor currency units.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub price: i64,
    pub is_paid: bool,
    pub status: OrderStatus,

    #[sea_orm(unique)]
    pub stripe_session_id: String,

    pub phone_case_id: String,
    pub user_id: Uuid,
    pub shipping_id: Uuid,
    pub billing_id: Uuid,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::phone_case::Entity",
        from = "Column::PhoneCaseId",
        to = "super::phone_case::Column::Id"
    )]
    PhoneCase,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(
        belongs_to = "super::shipping_address::Entity",
        from = "Column::ShippingId",
        to = "super::shipping_address::Column::Id"
    )]
    ShippingAddress,
    #[sea_orm(
        belongs_to = "super::billing_address::Entity",
        from = "Column::BillingId",
        to = "super::billing_address::Column::Id"
    )]
    BillingAddress,
}

impl Related<super::phone_case::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PhoneCase.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::shipping_address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ShippingAddress.def()
    }
}

impl Related<super::billing_address::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::BillingAddress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
