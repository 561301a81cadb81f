mod client;
mod types;

pub use client::{WebhookClient, WebhookTransport};
pub use types::{OutboundNotification, WebhookMessage};
