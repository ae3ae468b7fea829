//! Stored Items
//!
//! The envelope persisted by the item store: an internal key plus the fixed
//! attribute set of one resource kind.

use serde::{Deserialize, Serialize};

use super::identifier::{ItemKey, ResourceKind};

/// Attributes of a stored item, one variant per resource kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemAttributes {
    InternetGateway { vpc_id: Option<ItemKey> },
    Vpc { os_id: String },
}

#[derive(Serialize, Deserialize)]
struct InternetGatewayData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    vpc_id: Option<ItemKey>,
}

#[derive(Serialize, Deserialize)]
struct VpcData {
    os_id: String,
}

impl ItemAttributes {
    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        match self {
            Self::InternetGateway { .. } => ResourceKind::InternetGateway,
            Self::Vpc { .. } => ResourceKind::Vpc,
        }
    }

    /// Serialize the attributes without the kind tag
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        match self {
            Self::InternetGateway { vpc_id } => serde_json::to_value(InternetGatewayData { vpc_id: *vpc_id }),
            Self::Vpc { os_id } => serde_json::to_value(VpcData { os_id: os_id.clone() }),
        }
    }

    /// Rebuild attributes of the given kind from their JSON form
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON does not match the kind's shape.
    pub fn from_json(kind: ResourceKind, value: serde_json::Value) -> Result<Self, serde_json::Error> {
        match kind {
            ResourceKind::InternetGateway => {
                let data: InternetGatewayData = serde_json::from_value(value)?;
                Ok(Self::InternetGateway { vpc_id: data.vpc_id })
            }
            ResourceKind::Vpc => {
                let data: VpcData = serde_json::from_value(value)?;
                Ok(Self::Vpc { os_id: data.os_id })
            }
        }
    }
}

/// A record in the item store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    key: ItemKey,
    attributes: ItemAttributes,
}

impl Item {
    #[must_use]
    pub fn new(key: ItemKey, attributes: ItemAttributes) -> Self {
        Self { key, attributes }
    }

    #[must_use]
    pub fn key(&self) -> ItemKey {
        self.key
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.attributes.kind()
    }

    #[must_use]
    pub fn attributes(&self) -> &ItemAttributes {
        &self.attributes
    }

    #[must_use]
    pub fn into_attributes(self) -> ItemAttributes {
        self.attributes
    }
}
