use crate::{
    db::DbPool,
    entities::{
        billing_address, color, material, model, order, phone_case, shipping_address,
    },
    errors::ServiceError,
    payments::{CheckoutSessionEvent, CustomerDetails, PaymentGateway},
    services::checkout::charge_amount_minor,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbErr, EntityTrait, QueryFilter, QueryOrder, Set, SqlErr,
    TransactionTrait,
};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use utoipa::ToSchema;
use uuid::Uuid;

const UNKNOWN_FIELD: &str = "Unknown";
const UNKNOWN_CUSTOMER: &str = "Unknown Customer";

/// Result of one finalizer invocation. Everything except `Created` means
/// the event changed nothing; the webhook handler acknowledges all of them.
#[derive(Debug)]
pub enum FinalizeOutcome {
    Created { order_id: Uuid },
    AlreadyProcessed,
    Skipped(&'static str),
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddressView {
    pub name: String,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
    pub phone_number: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCaseColor {
    pub name: String,
    pub hex: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderCaseSummary {
    pub id: String,
    pub image: String,
    pub cropped_image: String,
    pub color: Option<OrderCaseColor>,
    pub model: Option<String>,
    pub material: Option<String>,
}

/// Denormalized order as served to the thank-you page and the dashboard.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetail {
    pub id: Uuid,
    pub price: i64,
    pub is_paid: bool,
    pub status: order::OrderStatus,
    pub stripe_session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub phone_case: Option<OrderCaseSummary>,
    pub shipping_address: Option<AddressView>,
    pub billing_address: Option<AddressView>,
}

impl From<shipping_address::Model> for AddressView {
    fn from(row: shipping_address::Model) -> Self {
        Self {
            name: row.name,
            street: row.street,
            city: row.city,
            postal_code: row.postal_code,
            country: row.country,
            phone_number: row.phone_number,
        }
    }
}

impl From<billing_address::Model> for AddressView {
    fn from(row: billing_address::Model) -> Self {
        Self {
            name: row.name,
            street: row.street,
            city: row.city,
            postal_code: row.postal_code,
            country: row.country,
            phone_number: row.phone_number,
        }
    }
}

/// Finalizes paid checkout sessions into orders and serves order queries.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    gateway: Arc<dyn PaymentGateway>,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>, gateway: Arc<dyn PaymentGateway>) -> Self {
        Self { db, gateway }
    }

    /// Turns a verified `checkout.session.completed` event into exactly one
    /// order. Safe to invoke any number of times for the same session:
    /// a pre-insert lookup short-circuits redeliveries, and the unique
    /// constraint on the session id decides races between concurrent
    /// deliveries.
    #[instrument(skip(self, session), fields(session_id = %session.id))]
    pub async fn finalize_checkout(
        &self,
        session: &CheckoutSessionEvent,
    ) -> Result<FinalizeOutcome, ServiceError> {
        let Some(metadata) = session.metadata.as_ref() else {
            warn!("completed session carries no metadata");
            return Ok(FinalizeOutcome::Skipped("no metadata on session"));
        };

        let (Some(user_raw), Some(case_id)) = (metadata.get("userId"), metadata.get("phoneCaseId"))
        else {
            warn!("completed session metadata lacks userId or phoneCaseId");
            return Ok(FinalizeOutcome::Skipped("missing correlation metadata"));
        };

        let Ok(user_id) = Uuid::parse_str(user_raw) else {
            warn!(user_raw = %user_raw, "completed session carries malformed userId");
            return Ok(FinalizeOutcome::Skipped("malformed userId metadata"));
        };

        let Some(case) = phone_case::Entity::find_by_id(case_id).one(&*self.db).await? else {
            warn!(case_id = %case_id, "configuration for completed session no longer exists");
            return Ok(FinalizeOutcome::Skipped("phone case not found"));
        };

        let existing = order::Entity::find()
            .filter(order::Column::StripeSessionId.eq(&session.id))
            .one(&*self.db)
            .await?;
        if existing.is_some() {
            info!("order already exists for session; skipping");
            return Ok(FinalizeOutcome::AlreadyProcessed);
        }

        // The event payload may omit customer details; re-read the session.
        let full_session = self.gateway.retrieve_session(&session.id).await?;
        let customer = full_session.customer_details.unwrap_or_default();
        let price = charge_amount_minor(case.total_price)?;

        self.insert_order(&session.id, case.id.clone(), user_id, price, customer)
            .await
    }

    async fn insert_order(
        &self,
        session_id: &str,
        phone_case_id: String,
        user_id: Uuid,
        price: i64,
        customer: CustomerDetails,
    ) -> Result<FinalizeOutcome, ServiceError> {
        let name = customer
            .name
            .clone()
            .unwrap_or_else(|| UNKNOWN_CUSTOMER.to_string());
        let phone = customer.phone.clone().unwrap_or_default();
        let address = customer.address.unwrap_or_default();
        let street = address
            .line1
            .unwrap_or_else(|| UNKNOWN_FIELD.to_string());
        let city = address.city.unwrap_or_else(|| UNKNOWN_FIELD.to_string());
        let postal_code = address
            .postal_code
            .unwrap_or_else(|| UNKNOWN_FIELD.to_string());
        let country = address
            .country
            .unwrap_or_else(|| UNKNOWN_FIELD.to_string());

        let now = Utc::now();
        let txn = self.db.begin().await?;

        let shipping = shipping_address::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.clone()),
            street: Set(street.clone()),
            city: Set(city.clone()),
            postal_code: Set(postal_code.clone()),
            country: Set(country.clone()),
            phone_number: Set(phone.clone()),
        }
        .insert(&txn)
        .await?;

        let billing = billing_address::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            street: Set(street),
            city: Set(city),
            postal_code: Set(postal_code),
            country: Set(country),
            phone_number: Set(phone),
        }
        .insert(&txn)
        .await?;

        let order_id = Uuid::new_v4();
        let inserted = order::ActiveModel {
            id: Set(order_id),
            price: Set(price),
            is_paid: Set(true),
            status: Set(order::OrderStatus::Pending),
            stripe_session_id: Set(session_id.to_string()),
            phone_case_id: Set(phone_case_id),
            user_id: Set(user_id),
            shipping_id: Set(shipping.id),
            billing_id: Set(billing.id),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await;

        match inserted {
            Ok(order) => {
                txn.commit().await?;
                info!(order_id = %order.id, price, "order finalized");
                Ok(FinalizeOutcome::Created { order_id: order.id })
            }
            Err(e) if is_unique_violation(&e) => {
                // A concurrent delivery of the same event won the race.
                let _ = txn.rollback().await;
                info!("concurrent delivery already created the order");
                Ok(FinalizeOutcome::AlreadyProcessed)
            }
            Err(e) => {
                let _ = txn.rollback().await;
                Err(e.into())
            }
        }
    }

    /// Denormalized order lookup by checkout session id.
    #[instrument(skip(self))]
    pub async fn get_by_session(&self, session_id: &str) -> Result<OrderDetail, ServiceError> {
        let order = order::Entity::find()
            .filter(order::Column::StripeSessionId.eq(session_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Order not found".to_string()))?;

        self.assemble_detail(order).await
    }

    /// All orders for one user, newest first.
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<OrderDetail>, ServiceError> {
        let orders = order::Entity::find()
            .filter(order::Column::UserId.eq(user_id))
            .order_by_desc(order::Column::CreatedAt)
            .all(&*self.db)
            .await?;

        let mut details = Vec::with_capacity(orders.len());
        for order in orders {
            details.push(self.assemble_detail(order).await?);
        }
        Ok(details)
    }

    async fn assemble_detail(&self, order: order::Model) -> Result<OrderDetail, ServiceError> {
        let case = phone_case::Entity::find_by_id(&order.phone_case_id)
            .one(&*self.db)
            .await?;

        let phone_case = match case {
            Some(case) => {
                let color = match case.color_id {
                    Some(id) => color::Entity::find_by_id(id).one(&*self.db).await?,
                    None => None,
                };
                let model = match case.model_id {
                    Some(id) => model::Entity::find_by_id(id).one(&*self.db).await?,
                    None => None,
                };
                let material = match case.material_id {
                    Some(id) => material::Entity::find_by_id(id).one(&*self.db).await?,
                    None => None,
                };

                Some(OrderCaseSummary {
                    id: case.id,
                    image: case.image,
                    cropped_image: case.cropped_image,
                    color: color.map(|c| OrderCaseColor {
                        name: c.name,
                        hex: c.hex,
                    }),
                    model: model.map(|m| m.name),
                    material: material.map(|m| m.name),
                })
            }
            None => None,
        };

        let shipping = shipping_address::Entity::find_by_id(order.shipping_id)
            .one(&*self.db)
            .await?;
        let billing = billing_address::Entity::find_by_id(order.billing_id)
            .one(&*self.db)
            .await?;

        Ok(OrderDetail {
            id: order.id,
            price: order.price,
            is_paid: order.is_paid,
            status: order.status,
            stripe_session_id: order.stripe_session_id,
            created_at: order.created_at,
            updated_at: order.updated_at,
            phone_case,
            shipping_address: shipping.map(Into::into),
            billing_address: billing.map(Into::into),
        })
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
