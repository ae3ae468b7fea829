//! REST API Module
//!
//! Contains HTTP handlers, DTOs, and middleware for the REST API.

pub mod dto;
pub mod handlers;
pub mod middleware;

use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::application::use_cases::internet_gateways::{
    AttachInternetGatewayUseCase, CreateInternetGatewayUseCase, DeleteInternetGatewayUseCase,
    DescribeInternetGatewaysUseCase, DetachInternetGatewayUseCase,
};
use crate::infrastructure::driven_adapters::config::AppConfig;

use handlers::internet_gateways;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub create_internet_gateway_use_case: Arc<CreateInternetGatewayUseCase>,
    pub attach_internet_gateway_use_case: Arc<AttachInternetGatewayUseCase>,
    pub detach_internet_gateway_use_case: Arc<DetachInternetGatewayUseCase>,
    pub delete_internet_gateway_use_case: Arc<DeleteInternetGatewayUseCase>,
    pub describe_internet_gateways_use_case: Arc<DescribeInternetGatewaysUseCase>,
}

/// Build the API router with authentication and request correlation.
///
/// Rate limiting and CORS are deployment concerns layered on by the binary.
pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/internet-gateways", internet_gateways::router())
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::add_config_extension,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .with_state(state)
}
