mod settings;

pub use settings::{
    COLOR_TEMPLATE_KEY, DELIVERY_TIMEOUT_KEY, LINK_TEMPLATE_KEY, MESSAGE_FILTER_KEY,
    MESSAGE_TEMPLATE_KEY, Route, Settings, TITLE_TEMPLATE_KEY, WEBHOOK_URL_KEY,
    resolve_webhook_url,
};
