pub mod catalog;
pub mod common;
pub mod orders;
pub mod payment_webhooks;
pub mod phone_cases;
pub mod uploads;

use crate::db::DbPool;
use crate::payments::PaymentGateway;
use crate::services::checkout::CheckoutSettings;
use std::sync::Arc;

// Re-export AppState so handler modules can import it as crate::handlers::AppState
pub use crate::AppState;

/// Services layer that encapsulates business logic used by HTTP handlers
#[derive(Clone)]
pub struct AppServices {
    pub phone_cases: Arc<crate::services::PhoneCaseService>,
    pub catalog: Arc<crate::services::CatalogService>,
    pub checkout: Arc<crate::services::CheckoutService>,
    pub orders: Arc<crate::services::OrderService>,
}

impl AppServices {
    pub fn new(
        db: Arc<DbPool>,
        gateway: Arc<dyn PaymentGateway>,
        checkout_settings: CheckoutSettings,
    ) -> Self {
        let phone_cases = Arc::new(crate::services::PhoneCaseService::new(db.clone()));
        let catalog = Arc::new(crate::services::CatalogService::new(db.clone()));
        let checkout = Arc::new(crate::services::CheckoutService::new(
            db.clone(),
            gateway.clone(),
            checkout_settings,
        ));
        let orders = Arc::new(crate::services::OrderService::new(db, gateway));

        Self {
            phone_cases,
            catalog,
            checkout,
            orders,
        }
    }
}
