use crate::template::TemplateField;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForwarderError {
    #[error("Invalid message filter '{pattern}': {source}")]
    InvalidFilter {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid {field} template: {source}")]
    InvalidTemplate {
        field: TemplateField,
        #[source]
        source: Box<handlebars::TemplateError>,
    },

    #[error("Unresolvable destination: {0}")]
    Destination(String),

    #[error("Invalid route: {0}")]
    Route(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl ForwarderError {
    /// Whether this error prevents an adapter from being built at all
    pub fn is_construction_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidFilter { .. }
                | Self::InvalidTemplate { .. }
                | Self::Destination(_)
                | Self::Route(_)
                | Self::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ForwarderError>;
