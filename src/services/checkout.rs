use crate::{
    auth::AuthenticatedUser,
    config::AppConfig,
    db::DbPool,
    entities::phone_case,
    errors::ServiceError,
    payments::{CheckoutMetadata, CheckoutRequest, PaymentGateway},
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::EntityTrait;
use std::sync::Arc;
use tracing::{info, instrument};

const PRODUCT_NAME: &str = "Custom iPhone Case";
const CURRENCY: &str = "usd";

/// Checkout-related knobs lifted out of the full config so the service does
/// not carry unrelated settings.
#[derive(Debug, Clone)]
pub struct CheckoutSettings {
    pub client_origin: String,
    pub allowed_countries: Vec<String>,
}

impl CheckoutSettings {
    pub fn from_config(cfg: &AppConfig) -> Self {
        Self {
            client_origin: cfg.client_origin.trim_end_matches('/').to_string(),
            allowed_countries: cfg.allowed_countries(),
        }
    }
}

/// Converts an accumulated configuration price into minor currency units,
/// rounded to the nearest integer.
pub fn charge_amount_minor(total: Decimal) -> Result<i64, ServiceError> {
    (total * Decimal::from(100))
        .round()
        .to_i64()
        .ok_or_else(|| ServiceError::InvalidInput("price out of range".to_string()))
}

/// Creates provider-hosted checkout sessions for configurations. No local
/// state is persisted; the session lives on the provider side until its
/// completion event arrives.
#[derive(Clone)]
pub struct CheckoutService {
    db: Arc<DbPool>,
    gateway: Arc<dyn PaymentGateway>,
    settings: CheckoutSettings,
}

impl CheckoutService {
    pub fn new(
        db: Arc<DbPool>,
        gateway: Arc<dyn PaymentGateway>,
        settings: CheckoutSettings,
    ) -> Self {
        Self {
            db,
            gateway,
            settings,
        }
    }

    /// Computes the charge for the configuration and opens a hosted
    /// checkout session carrying the correlation metadata. Returns the
    /// redirect URL for the client.
    #[instrument(skip(self, user), fields(user_id = %user.id))]
    pub async fn create_checkout(
        &self,
        config_id: &str,
        user: &AuthenticatedUser,
    ) -> Result<String, ServiceError> {
        let case = phone_case::Entity::find_by_id(config_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound("Phone case with this ID does not exist.".to_string())
            })?;

        let amount_minor = charge_amount_minor(case.total_price)?;

        let request = CheckoutRequest {
            product_name: PRODUCT_NAME.to_string(),
            product_image: Some(case.image.clone()).filter(|url| !url.is_empty()),
            amount_minor,
            currency: CURRENCY.to_string(),
            success_url: format!(
                "{}/thank-you?session_id={{CHECKOUT_SESSION_ID}}",
                self.settings.client_origin
            ),
            cancel_url: format!(
                "{}/configure/preview?id={}",
                self.settings.client_origin, case.id
            ),
            allowed_countries: self.settings.allowed_countries.clone(),
            metadata: CheckoutMetadata {
                user_id: user.id,
                phone_case_id: case.id.clone(),
            },
        };

        let checkout = self.gateway.create_checkout(request).await?;
        info!(
            config_id = %case.id,
            session_id = %checkout.session_id,
            amount_minor,
            "hosted checkout session created"
        );

        Ok(checkout.url)
    }
}
