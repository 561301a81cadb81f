use crate::template::RenderedPayload;
use serde::{Deserialize, Serialize};

/// One rendered notification, serialized as a Slack message attachment
///
/// Empty fields are left out of the JSON, matching what Slack's own
/// clients send.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundNotification {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title_link: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub text: String,
}

impl From<RenderedPayload> for OutboundNotification {
    fn from(payload: RenderedPayload) -> Self {
        Self {
            color: payload.color.into_value(),
            title: payload.title.into_value(),
            title_link: payload.link.into_value(),
            text: payload.body.into_value(),
        }
    }
}

/// Body of an incoming-webhook POST
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookMessage {
    pub attachments: Vec<OutboundNotification>,
}

impl WebhookMessage {
    pub fn single(notification: OutboundNotification) -> Self {
        Self {
            attachments: vec![notification],
        }
    }
}
