//! Request Context
//!
//! Tenant scope attached to every lifecycle operation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Project (tenant) identifier scoping every stored item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ProjectId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Caller identity and tenant scope of a single request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub project_id: ProjectId,
    pub user_id: String,
}

impl RequestContext {
    #[must_use]
    pub fn new(project_id: ProjectId, user_id: impl Into<String>) -> Self {
        Self {
            project_id,
            user_id: user_id.into(),
        }
    }
}
