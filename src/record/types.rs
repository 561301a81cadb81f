//! Log record types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Which output stream of the container produced the line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceStream {
    #[default]
    Stdout,
    Stderr,
}

impl SourceStream {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceStream::Stdout => "stdout",
            SourceStream::Stderr => "stderr",
        }
    }
}

impl fmt::Display for SourceStream {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Container metadata attached to every record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerInfo {
    /// Container ID (e.g., "3f2a9c1b7d4e")
    #[serde(default)]
    pub id: String,

    /// Container name without the leading slash (e.g., "web")
    #[serde(default)]
    pub name: String,

    /// Image reference (e.g., "nginx:1.27")
    #[serde(default)]
    pub image: String,

    /// Container hostname, when the host reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Container labels
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub labels: BTreeMap<String, String>,
}

/// One log line plus its source metadata
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Raw message text, may be empty
    #[serde(default)]
    pub data: String,

    #[serde(default)]
    pub container: ContainerInfo,

    #[serde(default)]
    pub source: SourceStream,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<DateTime<Utc>>,
}

impl LogRecord {
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            ..Default::default()
        }
    }

    pub fn with_container(mut self, container: ContainerInfo) -> Self {
        self.container = container;
        self
    }

    pub fn with_source(mut self, source: SourceStream) -> Self {
        self.source = source;
        self
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = Some(time);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Short preview of the message for log lines
    pub fn preview(&self, max_chars: usize) -> String {
        if self.data.chars().count() > max_chars {
            format!("{}...", self.data.chars().take(max_chars).collect::<String>())
        } else {
            self.data.clone()
        }
    }
}

impl ContainerInfo {
    pub fn new(id: impl Into<String>, name: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into().trim_start_matches('/').to_string(),
            image: image.into(),
            ..Default::default()
        }
    }
}
