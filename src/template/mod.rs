//! Notification templates
//!
//! Four independent Handlebars templates (title, body, link, color) are
//! compiled once into a [`TemplateSet`]. Templates see two names:
//!
//! - `record` - the log record (`data`, `source`, `time`, `container.id`,
//!   `container.name`, `container.image`, `container.hostname`,
//!   `container.labels.<key>`)
//! - `env` - the environment snapshot taken when the adapter was built
//!
//! ```text
//! {{record.container.name}} on {{env.HOSTNAME}}
//! https://logs.example.com/{{record.container.id}}
//! ```
//!
//! Compilation is strict: any bad template fails the whole set. Rendering is
//! lenient: a field that fails to render falls back to its default and the
//! other fields are unaffected.

mod set;
mod types;

pub use set::TemplateSet;
pub use types::{FieldOutcome, RenderedPayload, TemplateField, TemplateSources};
