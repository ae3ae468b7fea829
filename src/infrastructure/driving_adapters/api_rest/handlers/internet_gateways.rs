//! Internet Gateway Handlers
//!
//! HTTP handlers for the internet gateway lifecycle.
//! All endpoints require JWT authentication; the token's project scopes
//! every lookup.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use validator::Validate;

use crate::application::use_cases::internet_gateways::DescribeFilter;
use crate::domain::models::{ExternalId, ItemKey, ResourceKind};
use crate::infrastructure::driving_adapters::api_rest::dto::{
    AttachInternetGatewayDto, DescribeInternetGatewaysDto, DescribeInternetGatewaysResponseDto,
    InternetGatewayResponseDto, ReturnDto,
};
use crate::infrastructure::driving_adapters::api_rest::middleware::auth::JwtAuth;
use crate::infrastructure::driving_adapters::api_rest::AppState;
use crate::shared::errors::{ApiError, UseCaseError};

/// Create the router for internet gateway endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_internet_gateway).get(describe_all_internet_gateways))
        .route("/describe", post(describe_internet_gateways))
        .route("/:id", get(describe_internet_gateway).delete(delete_internet_gateway))
        .route("/:id/attachment", put(attach_internet_gateway))
        .route("/:id/attachment/:vpc_id", delete(detach_internet_gateway))
}

fn gateway_key(id: &str) -> Result<ItemKey, ApiError> {
    Ok(ExternalId::decode_as(ResourceKind::InternetGateway, id)?)
}

fn vpc_key(id: &str) -> Result<ItemKey, ApiError> {
    Ok(ExternalId::decode_as(ResourceKind::Vpc, id)?)
}

/// POST /internet-gateways - Create a detached internet gateway
///
/// # Responses
///
/// * 201 Created - Gateway created
/// * 401 Unauthorized - Missing or invalid JWT token
#[axum::debug_handler]
async fn create_internet_gateway(
    JwtAuth(user): JwtAuth,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<InternetGatewayResponseDto>), ApiError> {
    let gateway = state.create_internet_gateway_use_case.execute(&user.context()).await?;

    Ok((StatusCode::CREATED, Json(InternetGatewayResponseDto::from(gateway))))
}

/// GET /internet-gateways - Describe every gateway of the project
#[axum::debug_handler]
async fn describe_all_internet_gateways(
    JwtAuth(user): JwtAuth,
    State(state): State<AppState>,
) -> Result<Json<DescribeInternetGatewaysResponseDto>, ApiError> {
    let gateways = state
        .describe_internet_gateways_use_case
        .execute(&user.context(), None, &[])
        .await?;

    Ok(Json(gateways.into()))
}

/// POST /internet-gateways/describe - Describe gateways by id and filter
///
/// # Responses
///
/// * 200 OK - Matching gateways (possibly none)
/// * 400 Bad Request - Malformed id, unknown filter or invalid body
/// * 404 Not Found - A requested gateway does not exist
#[axum::debug_handler]
async fn describe_internet_gateways(
    JwtAuth(user): JwtAuth,
    State(state): State<AppState>,
    payload: Result<Json<DescribeInternetGatewaysDto>, JsonRejection>,
) -> Result<Json<DescribeInternetGatewaysResponseDto>, ApiError> {
    let Json(dto) = payload?;
    dto.validate()?;

    let keys = dto
        .internet_gateway_ids
        .iter()
        .map(|id| gateway_key(id))
        .collect::<Result<Vec<_>, _>>()?;
    let filters: Vec<DescribeFilter> = dto.filters.into_iter().map(DescribeFilter::from).collect();

    let gateways = state
        .describe_internet_gateways_use_case
        .execute(&user.context(), Some(keys.as_slice()), &filters)
        .await?;

    Ok(Json(gateways.into()))
}

/// GET /internet-gateways/:id - Describe a single gateway
///
/// # Responses
///
/// * 200 OK - Gateway found
/// * 400 Bad Request - Malformed id
/// * 404 Not Found - Gateway does not exist
#[axum::debug_handler]
async fn describe_internet_gateway(
    JwtAuth(user): JwtAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<InternetGatewayResponseDto>, ApiError> {
    let key = gateway_key(&id)?;

    let gateway = state
        .describe_internet_gateways_use_case
        .execute(&user.context(), Some([key].as_slice()), &[])
        .await?
        .into_iter()
        .next()
        .ok_or(UseCaseError::NotFound {
            kind: ResourceKind::InternetGateway,
            id,
        })?;

    Ok(Json(gateway.into()))
}

/// DELETE /internet-gateways/:id - Delete a detached gateway
///
/// # Responses
///
/// * 200 OK - Gateway deleted
/// * 404 Not Found - Gateway does not exist
/// * 409 Conflict - Gateway is still attached
#[axum::debug_handler]
async fn delete_internet_gateway(
    JwtAuth(user): JwtAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReturnDto>, ApiError> {
    let key = gateway_key(&id)?;

    let deleted = state.delete_internet_gateway_use_case.execute(&user.context(), key).await?;

    Ok(Json(deleted.into()))
}

/// PUT /internet-gateways/:id/attachment - Attach a gateway to a VPC
///
/// # Responses
///
/// * 200 OK - Gateway attached
/// * 404 Not Found - Gateway or VPC does not exist
/// * 409 Conflict - Gateway already attached
/// * 400 Bad Request - VPC already has a gateway, or invalid body
/// * 412 Precondition Failed - External network is not available
/// * 502 Bad Gateway - Control plane rejected the change
#[axum::debug_handler]
async fn attach_internet_gateway(
    JwtAuth(user): JwtAuth,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<AttachInternetGatewayDto>, JsonRejection>,
) -> Result<Json<ReturnDto>, ApiError> {
    let Json(dto) = payload?;
    dto.validate()?;
    let gateway = gateway_key(&id)?;
    let vpc = vpc_key(&dto.vpc_id)?;

    let attached = state
        .attach_internet_gateway_use_case
        .execute(&user.context(), gateway, vpc)
        .await?;

    Ok(Json(attached.into()))
}

/// DELETE /internet-gateways/:id/attachment/:vpc_id - Detach a gateway
///
/// # Responses
///
/// * 200 OK - Gateway detached
/// * 404 Not Found - Gateway or VPC does not exist
/// * 409 Conflict - Gateway is not attached to this VPC
/// * 502 Bad Gateway - Control plane rejected the change
#[axum::debug_handler]
async fn detach_internet_gateway(
    JwtAuth(user): JwtAuth,
    State(state): State<AppState>,
    Path((id, vpc_id)): Path<(String, String)>,
) -> Result<Json<ReturnDto>, ApiError> {
    let gateway = gateway_key(&id)?;
    let vpc = vpc_key(&vpc_id)?;

    let detached = state
        .detach_internet_gateway_use_case
        .execute(&user.context(), gateway, vpc)
        .await?;

    Ok(Json(detached.into()))
}
