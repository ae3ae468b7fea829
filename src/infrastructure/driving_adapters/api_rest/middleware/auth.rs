//! JWT Authentication Middleware
//!
//! Extracts and validates JWT tokens from requests. The `project_id` claim
//! scopes every operation of the request.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::{header::AUTHORIZATION, request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::domain::models::{ProjectId, RequestContext};
use crate::infrastructure::driven_adapters::config::AppConfig;
use crate::infrastructure::driving_adapters::api_rest::AppState;
use crate::shared::errors::{ErrorDetail, ErrorResponse};

use super::request_id::RequestId;

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    /// Project the caller acts in
    pub project_id: String,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
}

/// Authenticated caller extracted from JWT
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub id: String,
    pub project_id: ProjectId,
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            project_id: ProjectId::new(claims.project_id),
        }
    }
}

impl AuthenticatedUser {
    /// Request context for use cases
    #[must_use]
    pub fn context(&self) -> RequestContext {
        RequestContext::new(self.project_id.clone(), self.id.clone())
    }
}

/// JWT authentication extractor
pub struct JwtAuth(pub AuthenticatedUser);

/// Error type for authentication failures
pub struct AuthError {
    message: String,
    request_id: Option<String>,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            error: ErrorDetail {
                code: "AuthFailure".to_string(),
                message: self.message,
                details: None,
            },
            request_id: self.request_id,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (StatusCode::UNAUTHORIZED, Json(body)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for JwtAuth
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let request_id = parts.extensions.get::<RequestId>().map(ToString::to_string);
        let reject = |message: &str| AuthError {
            message: message.to_string(),
            request_id: request_id.clone(),
        };

        let config = parts
            .extensions
            .get::<Arc<AppConfig>>()
            .ok_or_else(|| reject("Configuration not available"))?
            .clone();

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| reject("Missing Authorization header"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| reject("Invalid Authorization header format"))?;

        // Pin the algorithm; tokens signed with anything else are rejected
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 60;

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt.secret.as_bytes()),
            &validation,
        )
        .map_err(|_| reject("Invalid or expired token"))?;

        if token_data.claims.project_id.is_empty() {
            return Err(reject("Token carries no project"));
        }

        Ok(JwtAuth(token_data.claims.into()))
    }
}

/// Middleware layer that adds config to request extensions for JWT validation
pub async fn add_config_extension(
    State(state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: axum::middleware::Next,
) -> Response {
    request.extensions_mut().insert(state.config.clone());
    next.run(request).await
}
