use crate::record::LogRecord;
use std::fmt;

/// Title used when the title template fails to render
pub const FALLBACK_TITLE: &str = "[ALERT] Logspout";

/// Color used when the color template fails to render
pub const FALLBACK_COLOR: &str = "danger";

/// The four rendered fields of a notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateField {
    Title,
    Body,
    Link,
    Color,
}

impl TemplateField {
    pub const ALL: [TemplateField; 4] = [
        TemplateField::Title,
        TemplateField::Body,
        TemplateField::Link,
        TemplateField::Color,
    ];

    /// Name the template is registered under
    pub fn name(&self) -> &'static str {
        match self {
            TemplateField::Title => "title",
            TemplateField::Body => "body",
            TemplateField::Link => "link",
            TemplateField::Color => "color",
        }
    }

    /// Template source used when none is configured
    pub fn default_source(&self) -> &'static str {
        match self {
            TemplateField::Title => "{{record.container.name}}",
            TemplateField::Body => "{{record.data}}",
            TemplateField::Link => "",
            TemplateField::Color => "danger",
        }
    }

    /// Value substituted when this field fails to render
    pub fn fallback_value(&self, record: &LogRecord) -> String {
        match self {
            TemplateField::Title => FALLBACK_TITLE.to_string(),
            TemplateField::Body => record.data.clone(),
            TemplateField::Link => String::new(),
            TemplateField::Color => FALLBACK_COLOR.to_string(),
        }
    }
}

impl fmt::Display for TemplateField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Template sources for all four fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateSources {
    pub title: String,
    pub body: String,
    pub link: String,
    pub color: String,
}

impl TemplateSources {
    pub fn get(&self, field: TemplateField) -> &str {
        match field {
            TemplateField::Title => &self.title,
            TemplateField::Body => &self.body,
            TemplateField::Link => &self.link,
            TemplateField::Color => &self.color,
        }
    }
}

impl Default for TemplateSources {
    fn default() -> Self {
        Self {
            title: TemplateField::Title.default_source().to_string(),
            body: TemplateField::Body.default_source().to_string(),
            link: TemplateField::Link.default_source().to_string(),
            color: TemplateField::Color.default_source().to_string(),
        }
    }
}

/// Result of rendering one field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldOutcome {
    Rendered(String),
    /// The template failed; `value` is the field's default
    Fallback { value: String, reason: String },
}

impl FieldOutcome {
    pub fn value(&self) -> &str {
        match self {
            FieldOutcome::Rendered(value) => value,
            FieldOutcome::Fallback { value, .. } => value,
        }
    }

    pub fn into_value(self) -> String {
        match self {
            FieldOutcome::Rendered(value) => value,
            FieldOutcome::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, FieldOutcome::Fallback { .. })
    }
}

/// All four fields after one render pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedPayload {
    pub title: FieldOutcome,
    pub body: FieldOutcome,
    pub link: FieldOutcome,
    pub color: FieldOutcome,
}

impl RenderedPayload {
    pub fn get(&self, field: TemplateField) -> &FieldOutcome {
        match field {
            TemplateField::Title => &self.title,
            TemplateField::Body => &self.body,
            TemplateField::Link => &self.link,
            TemplateField::Color => &self.color,
        }
    }

    /// Fields that fell back, with the render error for each
    pub fn fallbacks(&self) -> Vec<(TemplateField, &str)> {
        TemplateField::ALL
            .iter()
            .filter_map(|field| match self.get(*field) {
                FieldOutcome::Fallback { reason, .. } => Some((*field, reason.as_str())),
                FieldOutcome::Rendered(_) => None,
            })
            .collect()
    }
}
