use super::{CheckoutRequest, HostedCheckout, PaymentGateway, SessionDetails};
use crate::errors::ServiceError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

/// Thin form-encoded client for the two Stripe endpoints this service
/// consumes: product registration and hosted checkout sessions.
#[derive(Clone)]
pub struct StripeGateway {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

#[derive(Debug, Deserialize)]
struct ProductResponse {
    #[allow(dead_code)]
    id: String,
    default_price: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CheckoutSessionResponse {
    id: String,
    url: Option<String>,
}

impl StripeGateway {
    pub fn new(secret_key: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: secret_key.into(),
            api_base: api_base.into(),
        }
    }

    async fn post_form<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        params: &[(String, String)],
    ) -> Result<T, ServiceError> {
        let url = format!("{}{}", self.api_base, path);
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .form(params)
            .send()
            .await
            .map_err(|e| ServiceError::PaymentGateway(format!("request to {} failed: {}", path, e)))?;

        Self::read_json(path, response).await
    }

    async fn read_json<T: for<'de> Deserialize<'de>>(
        path: &str,
        response: reqwest::Response,
    ) -> Result<T, ServiceError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::PaymentGateway(format!(
                "{} returned {}: {}",
                path, status, body
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ServiceError::PaymentGateway(format!("invalid response from {}: {}", path, e)))
    }
}

#[async_trait]
impl PaymentGateway for StripeGateway {
    #[instrument(skip(self, request), fields(phone_case_id = %request.metadata.phone_case_id))]
    async fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> Result<HostedCheckout, ServiceError> {
        // Register the purchasable item with its one-off price.
        let mut product_params = vec![
            ("name".to_string(), request.product_name.clone()),
            (
                "default_price_data[currency]".to_string(),
                request.currency.clone(),
            ),
            (
                "default_price_data[unit_amount]".to_string(),
                request.amount_minor.to_string(),
            ),
        ];
        if let Some(image) = request.product_image.as_ref().filter(|url| !url.is_empty()) {
            product_params.push(("images[0]".to_string(), image.clone()));
        }

        let product: ProductResponse = self.post_form("/v1/products", &product_params).await?;
        let price_id = product.default_price.ok_or_else(|| {
            ServiceError::PaymentGateway("product creation returned no default price".to_string())
        })?;

        let mut session_params = vec![
            ("success_url".to_string(), request.success_url.clone()),
            ("cancel_url".to_string(), request.cancel_url.clone()),
            ("mode".to_string(), "payment".to_string()),
            ("payment_method_types[0]".to_string(), "card".to_string()),
            (
                "metadata[userId]".to_string(),
                request.metadata.user_id.to_string(),
            ),
            (
                "metadata[phoneCaseId]".to_string(),
                request.metadata.phone_case_id.clone(),
            ),
            ("line_items[0][price]".to_string(), price_id),
            ("line_items[0][quantity]".to_string(), "1".to_string()),
        ];
        for (i, country) in request.allowed_countries.iter().enumerate() {
            session_params.push((
                format!("shipping_address_collection[allowed_countries][{}]", i),
                country.clone(),
            ));
        }

        let session: CheckoutSessionResponse =
            self.post_form("/v1/checkout/sessions", &session_params).await?;
        let url = session.url.ok_or_else(|| {
            ServiceError::PaymentGateway("checkout session has no redirect url".to_string())
        })?;

        debug!(session_id = %session.id, "created hosted checkout session");
        Ok(HostedCheckout {
            session_id: session.id,
            url,
        })
    }

    #[instrument(skip(self))]
    async fn retrieve_session(&self, session_id: &str) -> Result<SessionDetails, ServiceError> {
        let path = format!("/v1/checkout/sessions/{}", session_id);
        let url = format!("{}{}", self.api_base, path);
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.secret_key, Option::<&str>::None)
            .query(&[("expand[]", "customer_details")])
            .send()
            .await
            .map_err(|e| {
                ServiceError::PaymentGateway(format!("request to {} failed: {}", path, e))
            })?;

        Self::read_json(&path, response).await
    }
}
