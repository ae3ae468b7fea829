//! Gateway Traits (Ports)
//!
//! Abstract interfaces defining contracts for external dependencies.
//! These are implemented by driven adapters in the infrastructure layer.

pub mod item_repository;
pub mod network_control_plane;

pub use item_repository::ItemRepository;
pub use network_control_plane::{GatewayInfo, NetworkControlPlane, NetworkFilter, ProviderNetwork};
