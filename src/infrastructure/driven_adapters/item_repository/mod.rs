//! Item Repository Adapters
//!
//! PostgreSQL for deployments, in-memory for tests and single-process use.

mod memory;
mod postgres;

pub use memory::MemoryItemRepository;
pub use postgres::PostgresItemRepository;
