//! Domain Layer
//!
//! Contains the gateway resource models, the identifier translator, and the
//! gateway traits (ports). This layer has no dependencies on infrastructure.

pub mod gateways;
pub mod models;

pub use gateways::{ItemRepository, NetworkControlPlane};
pub use models::{ExternalId, InternetGateway, Item, ItemAttributes, ItemKey, ProjectId, RequestContext, ResourceKind, Vpc};
