//! Internet Gateway View
//!
//! External representation of a gateway returned by create and describe.

use crate::domain::models::{ExternalId, InternetGateway, ResourceKind};

/// State reported for an attachment. Attachments are only ever observed
/// fully attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentState {
    Available,
}

impl AttachmentState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentView {
    pub vpc_id: String,
    pub state: AttachmentState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InternetGatewayView {
    pub internet_gateway_id: String,
    pub attachments: Vec<AttachmentView>,
}

impl From<&InternetGateway> for InternetGatewayView {
    fn from(gateway: &InternetGateway) -> Self {
        let attachments = gateway
            .vpc_id()
            .map(|vpc_id| AttachmentView {
                vpc_id: ExternalId::encode(ResourceKind::Vpc, vpc_id).to_string(),
                state: AttachmentState::Available,
            })
            .into_iter()
            .collect();

        Self {
            internet_gateway_id: gateway.external_id().to_string(),
            attachments,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::ItemKey;

    #[test]
    fn test_detached_gateway_has_no_attachments() {
        let view = InternetGatewayView::from(&InternetGateway::restore(ItemKey::new(1), None));
        assert_eq!(view.internet_gateway_id, "igw-00000001");
        assert!(view.attachments.is_empty());
    }

    #[test]
    fn test_attached_gateway_reports_available_attachment() {
        let gateway = InternetGateway::restore(ItemKey::new(1), Some(ItemKey::new(2)));
        let view = InternetGatewayView::from(&gateway);
        assert_eq!(
            view.attachments,
            vec![AttachmentView {
                vpc_id: "vpc-00000002".to_string(),
                state: AttachmentState::Available,
            }]
        );
    }
}
