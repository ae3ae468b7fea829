//! Driven Adapters
//!
//! Implementations of gateway traits for external systems:
//! - Item stores (PostgreSQL and in-memory)
//! - Network control plane client
//! - Configuration

pub mod config;
pub mod control_plane;
pub mod database;
pub mod item_repository;

pub use config::AppConfig;
pub use control_plane::NeutronClient;
pub use item_repository::{MemoryItemRepository, PostgresItemRepository};
