use crate::{
    entities::{session, user},
    errors::ServiceError,
    AppState,
};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

/// User resolved from a session token, injected into request extensions by
/// [`require_session`]. Session and user rows are owned by the external
/// auth provider; this layer only reads them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

impl From<user::Model> for AuthenticatedUser {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}

/// Middleware guarding endpoints that require a signed-in user. Resolves
/// `Authorization: Bearer <token>` against the sessions table and attaches
/// the owning user, or rejects with 401.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ServiceError> {
    let token = bearer_token(&req)
        .ok_or_else(|| ServiceError::Unauthorized("missing session token".to_string()))?;

    let session = session::Entity::find()
        .filter(session::Column::Token.eq(token))
        .one(&*state.db)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("unknown session".to_string()))?;

    if session.expires_at <= Utc::now() {
        return Err(ServiceError::Unauthorized("session expired".to_string()));
    }

    let user = user::Entity::find_by_id(session.user_id)
        .one(&*state.db)
        .await?
        .ok_or_else(|| ServiceError::Unauthorized("session has no user".to_string()))?;

    debug!(user_id = %user.id, "session resolved");
    req.extensions_mut().insert(AuthenticatedUser::from(user));

    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_auth(value: Option<&str>) -> Request {
        let mut builder = axum::http::Request::builder().uri("/api/orders/dashboard");
        if let Some(value) = value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn extracts_bearer_token() {
        let req = request_with_auth(Some("Bearer sess_abc123"));
        assert_eq!(bearer_token(&req), Some("sess_abc123"));
    }

    #[test]
    fn rejects_missing_or_malformed_header() {
        assert_eq!(bearer_token(&request_with_auth(None)), None);
        assert_eq!(bearer_token(&request_with_auth(Some("sess_abc123"))), None);
        assert_eq!(bearer_token(&request_with_auth(Some("Bearer "))), None);
    }
}
