pub mod stripe;
pub mod webhook;

use crate::errors::ServiceError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use stripe::StripeGateway;
pub use webhook::{construct_event, CheckoutSessionEvent, WebhookEvent};

/// Correlation metadata attached to every hosted checkout session so the
/// asynchronous completion event can be mapped back to domain entities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutMetadata {
    pub user_id: Uuid,
    pub phone_case_id: String,
}

/// Everything the provider needs to host one purchase attempt.
#[derive(Debug, Clone)]
pub struct CheckoutRequest {
    pub product_name: String,
    pub product_image: Option<String>,
    pub amount_minor: i64,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub allowed_countries: Vec<String>,
    pub metadata: CheckoutMetadata,
}

/// Provider-side handle for a created checkout session.
#[derive(Debug, Clone)]
pub struct HostedCheckout {
    pub session_id: String,
    pub url: String,
}

/// Customer details as returned when retrieving a completed session.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<CustomerAddress>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerAddress {
    pub line1: Option<String>,
    pub city: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
}

/// Full session state fetched by id; the initial webhook payload may omit
/// customer details, so the finalizer always re-reads the session.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionDetails {
    pub id: String,
    pub customer_details: Option<CustomerDetails>,
}

/// Seam to the payment provider. The production implementation talks to
/// Stripe over HTTP; tests substitute a fake.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Registers a purchasable item and creates a hosted checkout session
    /// for it, returning the redirect URL handed back to the client.
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<HostedCheckout, ServiceError>;

    /// Retrieves a session with its customer details expanded.
    async fn retrieve_session(&self, session_id: &str) -> Result<SessionDetails, ServiceError>;
}
