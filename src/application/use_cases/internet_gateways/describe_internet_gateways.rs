//! Describe Internet Gateways Use Case
//!
//! Lists the gateways of a project, optionally restricted to given ids and
//! narrowed by filters.

use std::sync::Arc;

use regex::Regex;

use crate::domain::gateways::ItemRepository;
use crate::domain::models::{InternetGateway, ItemKey, RequestContext, ResourceKind};
use crate::shared::errors::UseCaseError;

use super::{not_found, InternetGatewayView};

/// Filter on described gateways. Values are alternatives and may use the
/// `*` and `?` wildcards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DescribeFilter {
    pub name: String,
    pub values: Vec<String>,
}

#[derive(Debug, Clone, Copy)]
enum FilterField {
    InternetGatewayId,
    AttachmentVpcId,
    AttachmentState,
}

impl FilterField {
    fn parse(name: &str) -> Option<Self> {
        match name {
            "internet-gateway-id" => Some(Self::InternetGatewayId),
            "attachment.vpc-id" => Some(Self::AttachmentVpcId),
            "attachment.state" => Some(Self::AttachmentState),
            _ => None,
        }
    }

    fn values(self, view: &InternetGatewayView) -> Vec<&str> {
        match self {
            Self::InternetGatewayId => vec![view.internet_gateway_id.as_str()],
            Self::AttachmentVpcId => view.attachments.iter().map(|a| a.vpc_id.as_str()).collect(),
            Self::AttachmentState => view.attachments.iter().map(|a| a.state.as_str()).collect(),
        }
    }
}

struct FilterMatcher {
    field: FilterField,
    patterns: Vec<Regex>,
}

impl FilterMatcher {
    fn compile(filter: &DescribeFilter) -> Result<Self, UseCaseError> {
        let field = FilterField::parse(&filter.name).ok_or_else(|| {
            UseCaseError::InvalidParameterValue(format!("The filter '{}' is invalid", filter.name))
        })?;
        if filter.values.is_empty() {
            return Err(UseCaseError::InvalidParameterValue(format!(
                "The filter '{}' requires at least one value",
                filter.name
            )));
        }

        let patterns = filter
            .values
            .iter()
            .map(|value| wildcard_pattern(value))
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| UseCaseError::InvalidParameterValue(format!("The filter '{}' is invalid: {err}", filter.name)))?;

        Ok(Self { field, patterns })
    }

    fn matches(&self, view: &InternetGatewayView) -> bool {
        self.field
            .values(view)
            .iter()
            .any(|value| self.patterns.iter().any(|pattern| pattern.is_match(value)))
    }
}

fn wildcard_pattern(value: &str) -> Result<Regex, regex::Error> {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('^');
    for ch in value.chars() {
        match ch {
            '*' => pattern.push_str(".*"),
            '?' => pattern.push('.'),
            _ => pattern.push_str(&regex::escape(ch.encode_utf8(&mut [0; 4]))),
        }
    }
    pattern.push('$');
    Regex::new(&pattern)
}

/// Use case for describing internet gateways
pub struct DescribeInternetGatewaysUseCase {
    item_repository: Arc<dyn ItemRepository>,
}

impl DescribeInternetGatewaysUseCase {
    /// Create a new DescribeInternetGatewaysUseCase
    #[must_use]
    pub fn new(item_repository: Arc<dyn ItemRepository>) -> Self {
        Self { item_repository }
    }

    /// Execute the use case
    ///
    /// With no `gateway_keys` every gateway of the project is considered.
    ///
    /// # Errors
    ///
    /// Returns `UseCaseError::InvalidParameterValue` for an unknown filter.
    /// Returns `UseCaseError::NotFound` if a requested gateway does not exist.
    /// Returns `UseCaseError::Repository` if the store fails.
    pub async fn execute(
        &self,
        ctx: &RequestContext,
        gateway_keys: Option<&[ItemKey]>,
        filters: &[DescribeFilter],
    ) -> Result<Vec<InternetGatewayView>, UseCaseError> {
        tracing::debug!(project_id = %ctx.project_id, filters = filters.len(), "Describing internet gateways");

        let matchers = filters.iter().map(FilterMatcher::compile).collect::<Result<Vec<_>, _>>()?;
        let gateway_keys = gateway_keys.filter(|keys| !keys.is_empty());

        let gateways = self
            .item_repository
            .find_all(&ctx.project_id, ResourceKind::InternetGateway, gateway_keys)
            .await?
            .into_iter()
            .map(InternetGateway::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(keys) = gateway_keys {
            if let Some(missing) = keys.iter().find(|key| !gateways.iter().any(|g| g.key() == **key)) {
                return Err(not_found(ResourceKind::InternetGateway, *missing));
            }
        }

        let views: Vec<InternetGatewayView> = gateways
            .iter()
            .map(InternetGatewayView::from)
            .filter(|view| matchers.iter().all(|matcher| matcher.matches(view)))
            .collect();

        tracing::debug!(count = views.len(), "Found internet gateways");
        Ok(views)
    }
}
