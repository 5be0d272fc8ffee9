use crate::errors::ServiceError;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::collections::HashMap;

type HmacSha256 = Hmac<Sha256>;

/// Header carrying the provider signature, e.g.
/// `Stripe-Signature: t=1700000000,v1=<hex digest>`.
pub const SIGNATURE_HEADER: &str = "stripe-signature";

/// Provider event envelope. Only the fields the finalizer consumes are
/// modeled; everything else in the payload is ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEvent {
    pub id: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub data: WebhookEventData,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEventData {
    pub object: CheckoutSessionEvent,
}

/// The `data.object` of a checkout lifecycle event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSessionEvent {
    pub id: String,
    #[serde(default)]
    pub metadata: Option<HashMap<String, String>>,
}

/// Verifies the signature over the exact raw payload bytes and parses the
/// typed event. Any intermediate re-serialization of the body would break
/// the digest, so callers must hand over the request body untouched.
pub fn construct_event(
    payload: &[u8],
    signature_header: &str,
    secret: &str,
    tolerance_secs: i64,
) -> Result<WebhookEvent, ServiceError> {
    let (timestamp, signature) = parse_signature_header(signature_header)?;

    let age = chrono::Utc::now().timestamp() - timestamp;
    if age.abs() > tolerance_secs {
        return Err(ServiceError::InvalidSignature(
            "timestamp outside tolerance".to_string(),
        ));
    }

    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| ServiceError::InvalidSignature("invalid signing secret".to_string()))?;
    mac.update(timestamp.to_string().as_bytes());
    mac.update(b".");
    mac.update(payload);
    let expected = hex::encode(mac.finalize().into_bytes());

    if !constant_time_eq(&expected, &signature) {
        return Err(ServiceError::InvalidSignature(
            "signature mismatch".to_string(),
        ));
    }

    serde_json::from_slice(payload)
        .map_err(|e| ServiceError::InvalidInput(format!("invalid event payload: {}", e)))
}

fn parse_signature_header(header: &str) -> Result<(i64, String), ServiceError> {
    let mut timestamp = None;
    let mut signature = None;

    for part in header.split(',') {
        let mut it = part.trim().splitn(2, '=');
        match (it.next(), it.next()) {
            (Some("t"), Some(val)) => timestamp = val.parse::<i64>().ok(),
            (Some("v1"), Some(val)) => signature = Some(val.to_string()),
            _ => {}
        }
    }

    match (timestamp, signature) {
        (Some(t), Some(v1)) => Ok((t, v1)),
        _ => Err(ServiceError::InvalidSignature(
            "malformed signature header".to_string(),
        )),
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut res = 0u8;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes()) {
        res |= x ^ y;
    }
    res == 0
}
