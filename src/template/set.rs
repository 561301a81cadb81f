use crate::error::{ForwarderError, Result};
use crate::record::RenderContext;
use crate::template::types::{FieldOutcome, RenderedPayload, TemplateField, TemplateSources};
use handlebars::{Context, Handlebars};

/// Compiled title, body, link and color templates
///
/// Strict mode is on, so referencing a path that does not exist in the
/// render context is a render error for that field. Output is not
/// HTML-escaped.
pub struct TemplateSet {
    registry: Handlebars<'static>,
}

impl TemplateSet {
    /// Compile all four templates, failing on the first invalid one
    pub fn compile(sources: &TemplateSources) -> Result<Self> {
        let mut registry = Handlebars::new();
        registry.set_strict_mode(true);
        registry.register_escape_fn(handlebars::no_escape);

        for field in TemplateField::ALL {
            registry
                .register_template_string(field.name(), sources.get(field))
                .map_err(|e| ForwarderError::InvalidTemplate {
                    field,
                    source: Box::new(e),
                })?;
        }

        tracing::debug!(
            title = %sources.title,
            body = %sources.body,
            link = %sources.link,
            color = %sources.color,
            "Compiled notification templates"
        );

        Ok(Self { registry })
    }

    /// Render every field against the same context
    ///
    /// Never fails: a field whose template errors gets its default value and
    /// is reported as [`FieldOutcome::Fallback`].
    pub fn render(&self, ctx: &RenderContext<'_>) -> RenderedPayload {
        let data = match Context::wraps(ctx) {
            Ok(data) => data,
            Err(e) => {
                let reason = e.to_string();
                let fallback = |field: TemplateField| FieldOutcome::Fallback {
                    value: field.fallback_value(ctx.record),
                    reason: reason.clone(),
                };
                return RenderedPayload {
                    title: fallback(TemplateField::Title),
                    body: fallback(TemplateField::Body),
                    link: fallback(TemplateField::Link),
                    color: fallback(TemplateField::Color),
                };
            }
        };

        RenderedPayload {
            title: self.render_field(TemplateField::Title, &data, ctx),
            body: self.render_field(TemplateField::Body, &data, ctx),
            link: self.render_field(TemplateField::Link, &data, ctx),
            color: self.render_field(TemplateField::Color, &data, ctx),
        }
    }

    fn render_field(
        &self,
        field: TemplateField,
        data: &Context,
        ctx: &RenderContext<'_>,
    ) -> FieldOutcome {
        match self.registry.render_with_context(field.name(), data) {
            Ok(value) => FieldOutcome::Rendered(value),
            Err(e) => FieldOutcome::Fallback {
                value: field.fallback_value(ctx.record),
                reason: e.to_string(),
            },
        }
    }
}

impl std::fmt::Debug for TemplateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateSet")
            .field("templates", &self.registry.get_templates().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{ContainerInfo, EnvironmentSnapshot, LogRecord, SourceStream};
    use crate::template::types::{FALLBACK_COLOR, FALLBACK_TITLE};

    fn web_record(data: &str) -> LogRecord {
        LogRecord::new(data).with_container(ContainerInfo::new("3f2a9c1b7d4e", "web", "nginx:1.27"))
    }

    fn sources(title: &str, body: &str, link: &str, color: &str) -> TemplateSources {
        TemplateSources {
            title: title.to_string(),
            body: body.to_string(),
            link: link.to_string(),
            color: color.to_string(),
        }
    }

    #[test]
    fn test_default_templates_render_record() {
        let set = TemplateSet::compile(&TemplateSources::default()).unwrap();
        let record = web_record("hello");
        let env = EnvironmentSnapshot::default();

        let payload = set.render(&RenderContext::new(&record, &env));

        assert_eq!(payload.title, FieldOutcome::Rendered("web".to_string()));
        assert_eq!(payload.body, FieldOutcome::Rendered("hello".to_string()));
        assert_eq!(payload.link, FieldOutcome::Rendered(String::new()));
        assert_eq!(payload.color, FieldOutcome::Rendered("danger".to_string()));
        assert!(payload.fallbacks().is_empty());
    }

    #[test]
    fn test_templates_read_environment() {
        let set = TemplateSet::compile(&sources(
            "{{record.container.name}}@{{env.CLUSTER}}",
            "[{{record.source}}] {{record.data}}",
            "https://logs.example.com/{{record.container.id}}",
            "{{env.ALERT_COLOR}}",
        ))
        .unwrap();
        let record = web_record("boom").with_source(SourceStream::Stderr);
        let env: EnvironmentSnapshot = [("CLUSTER", "prod-eu"), ("ALERT_COLOR", "#ff0000")]
            .into_iter()
            .collect();

        let payload = set.render(&RenderContext::new(&record, &env));

        assert_eq!(payload.title.value(), "web@prod-eu");
        assert_eq!(payload.body.value(), "[stderr] boom");
        assert_eq!(payload.link.value(), "https://logs.example.com/3f2a9c1b7d4e");
        assert_eq!(payload.color.value(), "#ff0000");
    }

    #[test]
    fn test_output_is_not_html_escaped() {
        let set = TemplateSet::compile(&TemplateSources::default()).unwrap();
        let record = web_record("<b>a & b</b> \"quoted\"");
        let env = EnvironmentSnapshot::default();

        let payload = set.render(&RenderContext::new(&record, &env));

        assert_eq!(payload.body.value(), "<b>a & b</b> \"quoted\"");
    }

    #[test]
    fn test_missing_path_falls_back_for_that_field_only() {
        let set = TemplateSet::compile(&sources(
            "{{record.container.labels.service}}",
            "{{record.data}}",
            "{{env.LOG_URL}}",
            "warning",
        ))
        .unwrap();
        let record = web_record("hello");
        let env = EnvironmentSnapshot::default();

        let payload = set.render(&RenderContext::new(&record, &env));

        assert!(payload.title.is_fallback());
        assert_eq!(payload.title.value(), FALLBACK_TITLE);
        assert_eq!(payload.body, FieldOutcome::Rendered("hello".to_string()));
        assert!(payload.link.is_fallback());
        assert_eq!(payload.link.value(), "");
        assert_eq!(payload.color, FieldOutcome::Rendered("warning".to_string()));

        let failed: Vec<_> = payload.fallbacks().into_iter().map(|(f, _)| f).collect();
        assert_eq!(failed, vec![TemplateField::Title, TemplateField::Link]);
    }

    #[test]
    fn test_body_and_color_fallbacks() {
        let set = TemplateSet::compile(&sources(
            "{{record.container.name}}",
            "{{record.missing}}",
            "",
            "{{env.NOT_SET}}",
        ))
        .unwrap();
        let record = web_record("raw text");
        let env = EnvironmentSnapshot::default();

        let payload = set.render(&RenderContext::new(&record, &env));

        assert_eq!(payload.title.value(), "web");
        assert!(payload.body.is_fallback());
        assert_eq!(payload.body.value(), "raw text");
        assert!(payload.color.is_fallback());
        assert_eq!(payload.color.value(), FALLBACK_COLOR);
    }

    #[test]
    fn test_present_label_renders() {
        let set = TemplateSet::compile(&sources(
            "{{record.container.labels.service}}",
            "{{record.data}}",
            "",
            "danger",
        ))
        .unwrap();
        let mut container = ContainerInfo::new("1", "web", "nginx");
        container
            .labels
            .insert("service".to_string(), "checkout".to_string());
        let record = LogRecord::new("x").with_container(container);
        let env = EnvironmentSnapshot::default();

        let payload = set.render(&RenderContext::new(&record, &env));

        assert_eq!(payload.title, FieldOutcome::Rendered("checkout".to_string()));
    }

    #[test]
    fn test_invalid_template_fails_compilation_and_names_field() {
        let err = TemplateSet::compile(&sources(
            "{{record.container.name}}",
            "{{record.data}}",
            "{{#if record.data}}unterminated",
            "danger",
        ))
        .unwrap_err();

        match err {
            ForwarderError::InvalidTemplate { field, .. } => {
                assert_eq!(field, TemplateField::Link)
            }
            e => panic!("Expected InvalidTemplate error, got {:?}", e),
        }
    }

    #[test]
    fn test_template_set_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TemplateSet>();
    }
}
