use crate::{
    db::DbPool,
    entities::{color, material, model},
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

/// Read-only access to the seeded catalog reference data.
#[derive(Clone)]
pub struct CatalogService {
    db: Arc<DbPool>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ModelView {
    pub id: Uuid,
    pub name: String,
    pub year: i32,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaterialView {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ColorView {
    pub id: Uuid,
    pub name: String,
    pub hex: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<model::Model> for ModelView {
    fn from(row: model::Model) -> Self {
        Self {
            id: row.id,
            name: row.name,
            year: row.year,
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<material::Model> for MaterialView {
    fn from(row: material::Model) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<color::Model> for ColorView {
    fn from(row: color::Model) -> Self {
        Self {
            id: row.id,
            name: row.name,
            hex: row.hex,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl CatalogService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    pub async fn list_models(&self) -> Result<Vec<ModelView>, ServiceError> {
        let rows = model::Entity::find().all(&*self.db).await?;
        Ok(rows.into_iter().map(ModelView::from).collect())
    }

    pub async fn list_materials(&self) -> Result<Vec<MaterialView>, ServiceError> {
        let rows = material::Entity::find().all(&*self.db).await?;
        Ok(rows.into_iter().map(MaterialView::from).collect())
    }

    pub async fn list_colors(&self) -> Result<Vec<ColorView>, ServiceError> {
        let rows = color::Entity::find().all(&*self.db).await?;
        Ok(rows.into_iter().map(ColorView::from).collect())
    }
}
