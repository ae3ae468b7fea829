//! Data Transfer Objects
//!
//! Request and response DTOs for the REST API.

pub mod internet_gateway;

pub use internet_gateway::{
    AttachInternetGatewayDto, AttachmentDto, DescribeInternetGatewaysDto, DescribeInternetGatewaysResponseDto,
    FilterDto, InternetGatewayResponseDto, ReturnDto,
};
