use crate::{
    db::DbPool,
    entities::{color, material, model, phone_case},
    errors::ServiceError,
    services::catalog::{ColorView, MaterialView, ModelView},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, EntityTrait, Set};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};
use utoipa::ToSchema;
use uuid::Uuid;

/// Placeholder stored in the cropped-image column until the configurator
/// produces the composited crop.
const CROPPED_IMAGE_PLACEHOLDER: &str = "TEMP";

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PhoneCaseView {
    pub id: String,
    pub image: String,
    pub cropped_image: String,
    pub width: i32,
    pub height: i32,
    pub price: Decimal,
    pub total_price: Decimal,
    pub user_id: Option<Uuid>,
    pub model_id: Option<Uuid>,
    pub material_id: Option<Uuid>,
    pub color_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<phone_case::Model> for PhoneCaseView {
    fn from(row: phone_case::Model) -> Self {
        Self {
            id: row.id,
            image: row.image,
            cropped_image: row.cropped_image,
            width: row.width,
            height: row.height,
            price: row.price,
            total_price: row.total_price,
            user_id: row.user_id,
            model_id: row.model_id,
            material_id: row.material_id,
            color_id: row.color_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Denormalized configuration view with the joined catalog selections.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PhoneCaseDetail {
    #[serde(flatten)]
    pub case: PhoneCaseView,
    pub model: Option<ModelView>,
    pub material: Option<MaterialView>,
    pub color: Option<ColorView>,
}

/// CRUD over case configurations. Rows are keyed by a client-supplied
/// opaque id minted when the configurator starts an upload.
#[derive(Clone)]
pub struct PhoneCaseService {
    db: Arc<DbPool>,
}

impl PhoneCaseService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Allocates an empty configuration row for the given client id.
    #[instrument(skip(self))]
    pub async fn create(&self, config_id: &str) -> Result<PhoneCaseView, ServiceError> {
        if phone_case::Entity::find_by_id(config_id)
            .one(&*self.db)
            .await?
            .is_some()
        {
            return Err(ServiceError::Conflict(format!(
                "Phone case {} already exists",
                config_id
            )));
        }

        let now = Utc::now();
        let row = phone_case::ActiveModel {
            id: Set(config_id.to_string()),
            image: Set(String::new()),
            cropped_image: Set(CROPPED_IMAGE_PLACEHOLDER.to_string()),
            width: Set(0),
            height: Set(0),
            price: Set(Decimal::ZERO),
            total_price: Set(Decimal::ZERO),
            user_id: Set(None),
            model_id: Set(None),
            material_id: Set(None),
            color_id: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let created = row.insert(&*self.db).await?;
        info!(config_id = %created.id, "phone case configuration created");
        Ok(created.into())
    }

    /// Returns the configuration joined with its catalog selections.
    #[instrument(skip(self))]
    pub async fn get(&self, config_id: &str) -> Result<PhoneCaseDetail, ServiceError> {
        let case = self.find_case(config_id).await?;

        let model = match case.model_id {
            Some(id) => model::Entity::find_by_id(id).one(&*self.db).await?,
            None => None,
        };
        let material = match case.material_id {
            Some(id) => material::Entity::find_by_id(id).one(&*self.db).await?,
            None => None,
        };
        let color = match case.color_id {
            Some(id) => color::Entity::find_by_id(id).one(&*self.db).await?,
            None => None,
        };

        Ok(PhoneCaseDetail {
            case: case.into(),
            model: model.map(Into::into),
            material: material.map(Into::into),
            color: color.map(Into::into),
        })
    }

    /// Applies model/material/color selections and recomputes the total
    /// price server-side from the catalog rows.
    #[instrument(skip(self))]
    pub async fn update_selections(
        &self,
        config_id: &str,
        model_id: Uuid,
        material_id: Uuid,
        color_id: Uuid,
    ) -> Result<PhoneCaseView, ServiceError> {
        let case = self.find_case(config_id).await?;

        let model = model::Entity::find_by_id(model_id).one(&*self.db).await?;
        let material = material::Entity::find_by_id(material_id)
            .one(&*self.db)
            .await?;
        let color = color::Entity::find_by_id(color_id).one(&*self.db).await?;

        let (Some(model), Some(material), Some(_color)) = (model, material, color) else {
            return Err(ServiceError::ValidationError(
                "Invalid materialId, modelId, or colorId".to_string(),
            ));
        };

        let total_price = model.price + material.price;

        let mut update: phone_case::ActiveModel = case.into();
        update.model_id = Set(Some(model_id));
        update.material_id = Set(Some(material_id));
        update.color_id = Set(Some(color_id));
        update.total_price = Set(total_price);
        update.updated_at = Set(Utc::now());

        let updated = update.update(&*self.db).await?;
        info!(config_id = %updated.id, total_price = %updated.total_price, "selections updated");
        Ok(updated.into())
    }

    /// Records a completed upload. The first stored file becomes the source
    /// image and fixes the pixel dimensions and initial price fields; any
    /// later upload replaces the composited crop.
    #[instrument(skip(self))]
    pub async fn attach_upload(
        &self,
        config_id: &str,
        file_url: &str,
        width: Option<i32>,
        height: Option<i32>,
    ) -> Result<PhoneCaseView, ServiceError> {
        let case = self.find_case(config_id).await?;
        let first_image = case.image.is_empty();

        let mut update: phone_case::ActiveModel = case.into();
        if first_image {
            update.image = Set(file_url.to_string());
            update.width = Set(width.unwrap_or(0));
            update.height = Set(height.unwrap_or(0));
            update.price = Set(Decimal::ZERO);
            update.total_price = Set(Decimal::ZERO);
        } else {
            update.cropped_image = Set(file_url.to_string());
        }
        update.updated_at = Set(Utc::now());

        let updated = update.update(&*self.db).await?;
        info!(config_id = %updated.id, first_image, "upload attached");
        Ok(updated.into())
    }

    async fn find_case(&self, config_id: &str) -> Result<phone_case::Model, ServiceError> {
        phone_case::Entity::find_by_id(config_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("No phone case found".to_string()))
    }
}
