use crate::error::{ForwarderError, Result};
use crate::filter::MATCH_ALL;
use crate::record::EnvironmentSnapshot;
use crate::template::{TemplateField, TemplateSources};
use reqwest::Url;
use std::collections::HashMap;
use std::time::Duration;

pub const WEBHOOK_URL_KEY: &str = "SLACK_WEBHOOK_URL";
pub const MESSAGE_FILTER_KEY: &str = "SLACK_MESSAGE_FILTER";
pub const TITLE_TEMPLATE_KEY: &str = "SLACK_TITLE_TEMPLATE";
pub const MESSAGE_TEMPLATE_KEY: &str = "SLACK_MESSAGE_TEMPLATE";
pub const LINK_TEMPLATE_KEY: &str = "SLACK_LINK_TEMPLATE";
pub const COLOR_TEMPLATE_KEY: &str = "SLACK_COLOR_TEMPLATE";
pub const DELIVERY_TIMEOUT_KEY: &str = "SLACK_DELIVERY_TIMEOUT_SECS";

const DEFAULT_DELIVERY_TIMEOUT_SECS: u64 = 10;

/// One configured destination, as handed over by the host pipeline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Route {
    /// Host (and optional path) of the destination, e.g. "hooks.slack.com"
    pub address: String,

    /// Per-route options; keys are matched case-insensitively
    pub options: HashMap<String, String>,
}

impl Route {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            options: HashMap::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into().to_ascii_lowercase(), value.into());
        self
    }

    /// Parse a route URI such as `slack://hooks.slack.com?slack_message_filter=error`
    pub fn parse(uri: &str) -> Result<Self> {
        let url = Url::parse(uri).map_err(|e| ForwarderError::Route(format!("{}: {}", uri, e)))?;

        let host = url
            .host_str()
            .ok_or_else(|| ForwarderError::Route(format!("{}: missing address", uri)))?;

        let mut address = host.to_string();
        if let Some(port) = url.port() {
            address.push_str(&format!(":{}", port));
        }
        let path = url.path();
        if !path.is_empty() && path != "/" {
            address.push_str(path);
        }

        let options = url
            .query_pairs()
            .map(|(k, v)| (k.to_ascii_lowercase(), v.into_owned()))
            .collect();

        Ok(Self { address, options })
    }

    fn option(&self, key: &str) -> Option<&str> {
        self.options
            .get(&key.to_ascii_lowercase())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }
}

/// Fully resolved adapter configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub webhook_url: Url,
    pub message_filter: String,
    pub templates: TemplateSources,
    pub delivery_timeout: Duration,
}

impl Settings {
    /// Resolve configuration: route option, then environment, then default
    pub fn resolve(route: &Route, env: &EnvironmentSnapshot) -> Result<Self> {
        let get = |key: &str| lookup(route, env, key);

        let webhook_url = resolve_webhook_url(&route.address, get(WEBHOOK_URL_KEY))?;

        let message_filter = get(MESSAGE_FILTER_KEY)
            .unwrap_or(MATCH_ALL)
            .to_string();

        let template = |key: &str, field: TemplateField| {
            get(key).unwrap_or(field.default_source()).to_string()
        };
        let templates = TemplateSources {
            title: template(TITLE_TEMPLATE_KEY, TemplateField::Title),
            body: template(MESSAGE_TEMPLATE_KEY, TemplateField::Body),
            link: template(LINK_TEMPLATE_KEY, TemplateField::Link),
            color: template(COLOR_TEMPLATE_KEY, TemplateField::Color),
        };

        let delivery_timeout = match get(DELIVERY_TIMEOUT_KEY) {
            Some(value) => Duration::from_secs(value.parse().map_err(|_| {
                ForwarderError::Config(format!("Invalid {}", DELIVERY_TIMEOUT_KEY))
            })?),
            None => Duration::from_secs(DEFAULT_DELIVERY_TIMEOUT_SECS),
        };
        if delivery_timeout.is_zero() {
            return Err(ForwarderError::Config(format!(
                "{} must be greater than zero",
                DELIVERY_TIMEOUT_KEY
            )));
        }

        Ok(Self {
            webhook_url,
            message_filter,
            templates,
            delivery_timeout,
        })
    }
}

/// Route option first, then the environment; empty values count as unset
fn lookup<'a>(route: &'a Route, env: &'a EnvironmentSnapshot, key: &str) -> Option<&'a str> {
    route.option(key).or_else(|| env.get_non_empty(key))
}

/// Build the webhook URL from the route address and the optional override
///
/// An override that is already an absolute http(s) URL wins outright.
/// Anything else (including no override) is appended to
/// `https://<address>`.
pub fn resolve_webhook_url(address: &str, override_url: Option<&str>) -> Result<Url> {
    let override_url = override_url.unwrap_or("");

    let candidate = if override_url.starts_with("https://") || override_url.starts_with("http://") {
        override_url.to_string()
    } else {
        if address.is_empty() {
            return Err(ForwarderError::Destination(format!(
                "route has no address and {} is not a full URL",
                WEBHOOK_URL_KEY
            )));
        }
        format!("https://{}{}", address, override_url)
    };

    let url = Url::parse(&candidate)
        .map_err(|e| ForwarderError::Destination(format!("{}: {}", candidate, e)))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(ForwarderError::Destination(format!(
            "{}: missing host",
            candidate
        )));
    }

    Ok(url)
}
