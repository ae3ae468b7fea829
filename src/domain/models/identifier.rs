//! Resource Identifiers
//!
//! Translates between internal store keys and the typed external ids
//! (`igw-0000000a`, `vpc-00000001`) exposed through the API.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::shared::errors::DomainError;

static EXTERNAL_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-z]+)-([0-9a-f]{8,16})$").expect("valid regex"));

/// Kind of resource tracked in the item store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    InternetGateway,
    Vpc,
}

impl ResourceKind {
    /// Prefix used both in external ids and in the store's `kind` column
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::InternetGateway => "igw",
            Self::Vpc => "vpc",
        }
    }

    /// Error code reported when an id of this kind does not resolve
    #[must_use]
    pub fn not_found_code(self) -> &'static str {
        match self {
            Self::InternetGateway => "InvalidInternetGatewayID.NotFound",
            Self::Vpc => "InvalidVpcID.NotFound",
        }
    }

    /// Parse a kind from its prefix
    #[must_use]
    pub fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix {
            "igw" => Some(Self::InternetGateway),
            "vpc" => Some(Self::Vpc),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InternetGateway => f.write_str("internetGateway"),
            Self::Vpc => f.write_str("vpc"),
        }
    }
}

/// Durable internal key assigned by the item store
///
/// Keys are never negative, so every key has a decodable external id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct ItemKey(i64);

impl ItemKey {
    /// Wrap a key issued by an in-process counter
    #[must_use]
    pub(crate) fn new(value: i64) -> Self {
        debug_assert!(value >= 0, "item keys are never negative");
        Self(value)
    }

    #[must_use]
    pub fn value(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for ItemKey {
    type Error = DomainError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if value < 0 {
            return Err(DomainError::MalformedIdentifier(value.to_string()));
        }
        Ok(Self(value))
    }
}

impl From<ItemKey> for i64 {
    fn from(key: ItemKey) -> Self {
        key.0
    }
}

impl fmt::Display for ItemKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Externally visible id: resource kind plus internal key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExternalId {
    kind: ResourceKind,
    key: ItemKey,
}

impl ExternalId {
    /// Encode a kind and key as an external id
    #[must_use]
    pub fn encode(kind: ResourceKind, key: ItemKey) -> Self {
        Self { kind, key }
    }

    /// Decode an external id of any known kind
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedIdentifier` if the input is not the
    /// canonical encoding of some kind and key.
    pub fn decode(value: &str) -> Result<Self, DomainError> {
        let malformed = || DomainError::MalformedIdentifier(value.to_string());

        let captures = EXTERNAL_ID_REGEX.captures(value).ok_or_else(malformed)?;
        let kind = ResourceKind::from_prefix(&captures[1]).ok_or_else(malformed)?;
        let raw = u64::from_str_radix(&captures[2], 16).map_err(|_| malformed())?;
        let key = i64::try_from(raw).map_err(|_| malformed())?;

        let decoded = Self::encode(kind, ItemKey::try_from(key)?);
        // Leading zeros beyond the padding would map two strings to one key
        if decoded.to_string() != value {
            return Err(malformed());
        }
        Ok(decoded)
    }

    /// Decode an external id that must be of the given kind
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MalformedIdentifier` if the id is malformed or
    /// names a different kind.
    pub fn decode_as(kind: ResourceKind, value: &str) -> Result<ItemKey, DomainError> {
        let decoded = Self::decode(value)?;
        if decoded.kind != kind {
            return Err(DomainError::MalformedIdentifier(value.to_string()));
        }
        Ok(decoded.key)
    }

    #[must_use]
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    #[must_use]
    pub fn key(&self) -> ItemKey {
        self.key
    }
}

impl fmt::Display for ExternalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:08x}", self.kind.prefix(), self.key.0)
    }
}

impl FromStr for ExternalId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}
