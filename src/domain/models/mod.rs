//! Domain Models
//!
//! Pure domain entities and value objects representing gateway resources.

pub mod context;
pub mod identifier;
pub mod internet_gateway;
pub mod item;
pub mod vpc;

pub use context::{ProjectId, RequestContext};
pub use identifier::{ExternalId, ItemKey, ResourceKind};
pub use internet_gateway::InternetGateway;
pub use item::{Item, ItemAttributes};
pub use vpc::Vpc;
