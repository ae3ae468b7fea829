//! Application Layer
//!
//! Contains use cases that orchestrate business logic, plus the compensation
//! and locking primitives they share.
//! Use cases depend on domain gateways (abstractions), not concrete implementations.

pub mod compensation;
pub mod locks;
pub mod use_cases;
