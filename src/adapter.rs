//! Per-route notification adapter
//!
//! Built once per route: configuration is resolved, the filter and templates
//! are compiled, and the environment is captured. Any failure there stops
//! the adapter from being created. Once running, every record goes through
//! filter, render and deliver in order; nothing that goes wrong with one
//! record affects the next.

use crate::config::{Route, Settings};
use crate::error::Result;
use crate::filter::FilterEngine;
use crate::logging::{Timer, log_error};
use crate::record::{EnvironmentSnapshot, LogRecord, RenderContext};
use crate::slack::{OutboundNotification, WebhookClient, WebhookTransport};
use crate::template::{RenderedPayload, TemplateSet};
use futures::{Stream, StreamExt};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

const PREVIEW_CHARS: usize = 150;

/// What happened to a single record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    SkippedEmpty,
    Filtered,
    Delivered { fallback_fields: usize },
    DeliveryFailed { fallback_fields: usize },
}

/// Counters for one run of the adapter
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub received: u64,
    pub skipped_empty: u64,
    pub filtered: u64,
    pub delivered: u64,
    pub failed: u64,
    pub fallback_fields: u64,
}

impl RunSummary {
    fn record(&mut self, outcome: RecordOutcome) {
        self.received += 1;
        match outcome {
            RecordOutcome::SkippedEmpty => self.skipped_empty += 1,
            RecordOutcome::Filtered => self.filtered += 1,
            RecordOutcome::Delivered { fallback_fields } => {
                self.delivered += 1;
                self.fallback_fields += fallback_fields as u64;
            }
            RecordOutcome::DeliveryFailed { fallback_fields } => {
                self.failed += 1;
                self.fallback_fields += fallback_fields as u64;
            }
        }
    }

    /// Notifications that were rendered and handed to the transport
    pub fn attempted(&self) -> u64 {
        self.delivered + self.failed
    }
}

pub struct NotificationAdapter {
    filter: FilterEngine,
    templates: TemplateSet,
    env: EnvironmentSnapshot,
    transport: Arc<dyn WebhookTransport>,
}

impl NotificationAdapter {
    /// Build an adapter for a route, delivering through a [`WebhookClient`]
    pub fn create(route: &Route, env: EnvironmentSnapshot) -> Result<Self> {
        let settings = Settings::resolve(route, &env)?;
        let client = WebhookClient::new(settings.webhook_url.clone(), settings.delivery_timeout)?;
        Self::from_settings(&settings, env, Arc::new(client))
    }

    /// Build an adapter from resolved settings and an explicit transport
    pub fn from_settings(
        settings: &Settings,
        env: EnvironmentSnapshot,
        transport: Arc<dyn WebhookTransport>,
    ) -> Result<Self> {
        let filter = FilterEngine::compile(&settings.message_filter)?;
        let templates = TemplateSet::compile(&settings.templates)?;

        tracing::info!(
            webhook_host = settings.webhook_url.host_str().unwrap_or_default(),
            filter = %filter.pattern(),
            timeout_secs = settings.delivery_timeout.as_secs(),
            env_vars = env.len(),
            "Created Slack adapter"
        );

        Ok(Self {
            filter,
            templates,
            env,
            transport,
        })
    }

    pub fn filter(&self) -> &FilterEngine {
        &self.filter
    }

    pub fn environment(&self) -> &EnvironmentSnapshot {
        &self.env
    }

    /// Render a record without filtering or delivering it
    pub fn render(&self, record: &LogRecord) -> RenderedPayload {
        self.templates.render(&RenderContext::new(record, &self.env))
    }

    /// Run one record through filter, render and deliver
    pub async fn process(&self, record: &LogRecord) -> RecordOutcome {
        if record.is_empty() {
            return RecordOutcome::SkippedEmpty;
        }

        tracing::trace!(message = %record.preview(PREVIEW_CHARS), "Filtering record");
        if !self.filter.matches(record) {
            return RecordOutcome::Filtered;
        }

        let payload = self.render(record);
        let fallbacks = payload.fallbacks();
        for (field, reason) in &fallbacks {
            tracing::warn!(
                field = %field,
                reason = %reason,
                container = %record.container.name,
                "Template failed to render, using default"
            );
        }
        let fallback_fields = fallbacks.len();

        let notification = OutboundNotification::from(payload);
        let span = tracing::info_span!(
            "deliver",
            notification_id = %Uuid::new_v4(),
            container = %record.container.name,
            source = %record.source
        );

        if self.deliver(&notification).instrument(span).await {
            RecordOutcome::Delivered { fallback_fields }
        } else {
            RecordOutcome::DeliveryFailed { fallback_fields }
        }
    }

    async fn deliver(&self, notification: &OutboundNotification) -> bool {
        let timer = Timer::new("deliver");
        tracing::debug!(
            title = %notification.title,
            color = %notification.color,
            text_len = notification.text.len(),
            "Sending Slack notification"
        );

        match self.transport.deliver(notification).await {
            Ok(()) => {
                tracing::info!(
                    duration_ms = timer.elapsed_ms(),
                    title = %notification.title,
                    "Slack notification delivered"
                );
                true
            }
            Err(e) => {
                log_error("deliver", &e);
                tracing::warn!(
                    endpoint_host = self.transport.endpoint().host_str().unwrap_or_default(),
                    "Notification dropped, continuing with next record"
                );
                false
            }
        }
    }

    /// Consume records until the stream ends
    ///
    /// Records are handled strictly one at a time, so notifications go out
    /// in input order. Nothing that happens to a record ends the loop.
    pub async fn run<S>(&self, records: S) -> RunSummary
    where
        S: Stream<Item = LogRecord>,
    {
        self.run_until(records, std::future::pending()).await
    }

    /// Like [`run`](Self::run), but also stops once `shutdown` completes
    ///
    /// Shutdown is only observed between records: a record already being
    /// filtered, rendered or delivered is finished first.
    pub async fn run_until<S, F>(&self, records: S, shutdown: F) -> RunSummary
    where
        S: Stream<Item = LogRecord>,
        F: Future<Output = ()>,
    {
        tracing::info!("Slack adapter streaming");
        let mut summary = RunSummary::default();

        let mut records = std::pin::pin!(records);
        let mut shutdown = std::pin::pin!(shutdown);
        loop {
            let record = tokio::select! {
                biased;
                () = &mut shutdown => {
                    tracing::info!("Shutdown requested, no further records will be read");
                    break;
                }
                record = records.next() => record,
            };
            let Some(record) = record else {
                break;
            };

            let outcome = self.process(&record).await;
            tracing::trace!(outcome = ?outcome, "Record processed");
            summary.record(outcome);
        }

        tracing::info!(
            received = summary.received,
            skipped_empty = summary.skipped_empty,
            filtered = summary.filtered,
            delivered = summary.delivered,
            failed = summary.failed,
            fallback_fields = summary.fallback_fields,
            "Slack adapter stopped"
        );
        summary
    }
}

impl std::fmt::Debug for NotificationAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NotificationAdapter")
            .field("filter", &self.filter.pattern())
            .field("templates", &self.templates)
            .field("env_vars", &self.env.len())
            .finish()
    }
}
