//! Use Cases
//!
//! Application-specific business rules.
//! Each use case is a single-purpose struct with an execute() method.

pub mod internet_gateways;

pub use internet_gateways::{
    AttachInternetGatewayUseCase, CreateInternetGatewayUseCase, DeleteInternetGatewayUseCase,
    DescribeInternetGatewaysUseCase, DetachInternetGatewayUseCase,
};
