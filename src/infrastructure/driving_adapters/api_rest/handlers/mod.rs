//! HTTP Handlers

pub mod internet_gateways;
