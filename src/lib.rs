//! EC2 Network Gateway API
//!
//! Manages EC2-style internet gateways and their attachment to VPCs. Gateway
//! records live in an item store; attaching or detaching sets or clears the
//! external gateway of the VPC's router on a Neutron-style network control
//! plane. Follows Clean/Hexagonal Architecture principles.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod shared;
