//! Error Types
//!
//! Layered error types with HTTP status and EC2-style error code mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use validator::{ValidationErrors, ValidationErrorsKind};
use thiserror::Error;

use crate::domain::models::identifier::ResourceKind;

/// Domain-level errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid id: \"{0}\"")]
    MalformedIdentifier(String),
}

/// Repository-level errors for data access failures
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Data mapping error: {0}")]
    Mapping(String),
}

/// Errors raised by the network control plane
#[derive(Debug, Error)]
pub enum ControlPlaneError {
    #[error("Control plane resource not found: {0}")]
    NotFound(String),

    #[error("Control plane returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Control plane request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Control plane response mapping error: {0}")]
    Mapping(String),
}

/// Use case-level errors for application logic failures
#[derive(Debug, Error)]
pub enum UseCaseError {
    #[error("Validation failed: {0:?}")]
    Validation(Vec<String>),

    #[error("The {kind} ID '{id}' does not exist")]
    NotFound { kind: ResourceKind, id: String },

    #[error("{0}")]
    ResourceAlreadyAssociated(String),

    #[error("{0}")]
    InvalidParameterValue(String),

    #[error("The internetGateway '{gateway_id}' is not attached to network '{vpc_id}'")]
    GatewayNotAttached { gateway_id: String, vpc_id: String },

    #[error("{0}")]
    DependencyViolation(String),

    #[error("Precondition failed: {0}")]
    PreconditionFailed(String),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error(transparent)]
    ControlPlane(#[from] ControlPlaneError),
}

impl UseCaseError {
    /// Get the HTTP status code for this error
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidParameterValue(_) => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ResourceAlreadyAssociated(_) | Self::GatewayNotAttached { .. } | Self::DependencyViolation(_) => {
                StatusCode::CONFLICT
            }
            Self::PreconditionFailed(_) => StatusCode::PRECONDITION_FAILED,
            Self::Domain(DomainError::MalformedIdentifier(_)) => StatusCode::BAD_REQUEST,
            Self::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ControlPlane(_) => StatusCode::BAD_GATEWAY,
        }
    }

    /// Get the error code for this error
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "ValidationError",
            Self::NotFound { kind, .. } => kind.not_found_code(),
            Self::ResourceAlreadyAssociated(_) => "Resource.AlreadyAssociated",
            Self::InvalidParameterValue(_) => "InvalidParameterValue",
            Self::GatewayNotAttached { .. } => "Gateway.NotAttached",
            Self::DependencyViolation(_) => "DependencyViolation",
            Self::PreconditionFailed(_) => "PreconditionFailed",
            Self::Domain(DomainError::MalformedIdentifier(_)) => "InvalidID",
            Self::Repository(_) => "InternalError",
            Self::ControlPlane(_) => "ProviderError",
        }
    }
}

/// API error response for HTTP responses
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    UseCase(#[from] UseCaseError),

    #[error("Invalid request: {0}")]
    BadRequest(String),
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::UseCase(UseCaseError::Domain(err))
    }
}

/// Error response body structure
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub timestamp: String,
}

/// Error detail structure
#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-level error for validation errors
#[derive(Debug, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message, details) = match &self {
            ApiError::UseCase(uc_error) => {
                let details = if let UseCaseError::Validation(errors) = uc_error {
                    Some(
                        errors
                            .iter()
                            .map(|e| {
                                let (field, message) = e.split_once(": ").unwrap_or(("", e.as_str()));
                                FieldError {
                                    field: field.to_string(),
                                    message: message.to_string(),
                                }
                            })
                            .collect(),
                    )
                } else {
                    None
                };
                // Storage and provider failures are logged, not echoed back
                let message = match uc_error {
                    UseCaseError::Repository(_) => {
                        tracing::error!(error = %uc_error, "Storage failure");
                        "An unexpected error occurred".to_string()
                    }
                    UseCaseError::ControlPlane(_) => {
                        tracing::error!(error = %uc_error, "Control plane failure");
                        "The network control plane rejected the request".to_string()
                    }
                    _ => uc_error.to_string(),
                };
                (uc_error.status_code(), uc_error.error_code().to_string(), message, details)
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "MalformedRequest".to_string(), msg.clone(), None),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code,
                message,
                details,
            },
            request_id: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

fn collect_validation_messages(prefix: &str, errors: &ValidationErrors, messages: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(errors) => messages.extend(errors.iter().map(|e| {
                format!("{}: {}", path, e.message.as_ref().map_or("invalid", |m| m.as_ref()))
            })),
            ValidationErrorsKind::Struct(nested) => collect_validation_messages(&path, nested, messages),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect_validation_messages(&format!("{path}[{index}]"), nested, messages);
                }
            }
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(err: ValidationErrors) -> Self {
        let mut messages = Vec::new();
        collect_validation_messages("", &err, &mut messages);
        messages.sort();
        ApiError::UseCase(UseCaseError::Validation(messages))
    }
}
