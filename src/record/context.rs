use crate::record::LogRecord;
use serde::Serialize;
use std::collections::BTreeMap;

/// Process environment captured once, read-only afterwards
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct EnvironmentSnapshot(BTreeMap<String, String>);

impl EnvironmentSnapshot {
    /// Capture the current process environment
    ///
    /// Variables whose name or value is not valid unicode are skipped.
    pub fn capture() -> Self {
        let vars: BTreeMap<String, String> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();
        tracing::debug!(variables = vars.len(), "Captured environment snapshot");
        Self(vars)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Like `get`, but an empty value counts as unset
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|v| !v.is_empty())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for EnvironmentSnapshot
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Everything a template can see while rendering one record
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RenderContext<'a> {
    pub record: &'a LogRecord,
    pub env: &'a EnvironmentSnapshot,
}

impl<'a> RenderContext<'a> {
    pub fn new(record: &'a LogRecord, env: &'a EnvironmentSnapshot) -> Self {
        Self { record, env }
    }
}
