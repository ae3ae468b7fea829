//! Internet Gateway DTOs
//!
//! Data transfer objects for internet gateway API endpoints. Field names
//! follow the EC2 wire shape (`internetGatewayId`, `attachmentSet`).

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::application::use_cases::internet_gateways::{AttachmentView, DescribeFilter, InternetGatewayView};

lazy_static! {
    /// Filter names: lowercase words joined by `-` or `.`
    static ref FILTER_NAME_REGEX: Regex = Regex::new(r"^[a-z][a-z0-9]*([.-][a-z0-9]+)*$").expect("valid regex");
}

fn validate_filter_name(name: &str) -> Result<(), validator::ValidationError> {
    if FILTER_NAME_REGEX.is_match(name) {
        Ok(())
    } else {
        let mut error = validator::ValidationError::new("filter_name");
        error.message = Some("Filter name must be lowercase words separated by '-' or '.'".into());
        Err(error)
    }
}

/// DTO for attaching a gateway to a VPC
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AttachInternetGatewayDto {
    #[validate(length(min = 1, max = 32, message = "vpcId must be between 1 and 32 characters"))]
    pub vpc_id: String,
}

/// Describe filter as sent by clients
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FilterDto {
    #[validate(length(min = 1, max = 64, message = "name must be between 1 and 64 characters"))]
    #[validate(custom(function = "validate_filter_name"))]
    pub name: String,

    #[serde(default)]
    #[validate(length(max = 50, message = "values can have at most 50 items"))]
    pub values: Vec<String>,
}

impl From<FilterDto> for DescribeFilter {
    fn from(dto: FilterDto) -> Self {
        Self {
            name: dto.name,
            values: dto.values,
        }
    }
}

/// DTO for describing gateways by id and filter
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct DescribeInternetGatewaysDto {
    #[serde(default)]
    #[validate(length(max = 200, message = "internetGatewayIds can have at most 200 items"))]
    pub internet_gateway_ids: Vec<String>,

    #[serde(default)]
    #[validate(length(max = 20, message = "filters can have at most 20 items"))]
    #[validate(nested)]
    pub filters: Vec<FilterDto>,
}

/// Attachment in a gateway response
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentDto {
    pub vpc_id: String,
    pub state: &'static str,
}

impl From<AttachmentView> for AttachmentDto {
    fn from(view: AttachmentView) -> Self {
        Self {
            vpc_id: view.vpc_id,
            state: view.state.as_str(),
        }
    }
}

/// Internet gateway response DTO
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InternetGatewayResponseDto {
    pub internet_gateway_id: String,
    pub attachment_set: Vec<AttachmentDto>,
}

impl From<InternetGatewayView> for InternetGatewayResponseDto {
    fn from(view: InternetGatewayView) -> Self {
        Self {
            internet_gateway_id: view.internet_gateway_id,
            attachment_set: view.attachments.into_iter().map(AttachmentDto::from).collect(),
        }
    }
}

/// Response of describe operations
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DescribeInternetGatewaysResponseDto {
    pub internet_gateway_set: Vec<InternetGatewayResponseDto>,
}

impl From<Vec<InternetGatewayView>> for DescribeInternetGatewaysResponseDto {
    fn from(views: Vec<InternetGatewayView>) -> Self {
        Self {
            internet_gateway_set: views.into_iter().map(InternetGatewayResponseDto::from).collect(),
        }
    }
}

/// Acknowledgement returned by attach, detach and delete
#[derive(Debug, Clone, Serialize)]
pub struct ReturnDto {
    #[serde(rename = "return")]
    pub value: bool,
}

impl From<bool> for ReturnDto {
    fn from(value: bool) -> Self {
        Self { value }
    }
}
