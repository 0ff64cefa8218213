//! Mock request for tests and embedder experiments

use crate::request::{FieldValue, SyncRequest};

/// Builder-style [`SyncRequest`] double.
///
/// Parameters iterate in insertion order; repeated names accumulate values
/// under one entry, mirroring a parsed form/multipart body.
#[derive(Debug, Clone, Default)]
pub struct MockRequest {
    params: Vec<(String, Vec<FieldValue>)>,
    suffix: Option<String>,
    selectors: Vec<String>,
    raw_uri: String,
    encoding: Option<String>,
}

impl MockRequest {
    pub fn new(raw_uri: impl Into<String>) -> Self {
        Self {
            raw_uri: raw_uri.into(),
            ..Self::default()
        }
    }

    pub fn with_parameter(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name.into(), FieldValue::field(value))
    }

    pub fn with_upload(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(name.into(), FieldValue::upload(value))
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn with_selectors(mut self, selectors: &[&str]) -> Self {
        self.selectors = selectors.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
        self.encoding = Some(encoding.into());
        self
    }

    fn push(mut self, name: String, value: FieldValue) -> Self {
        if let Some((_, values)) = self.params.iter_mut().find(|(n, _)| *n == name) {
            values.push(value);
        } else {
            self.params.push((name, vec![value]));
        }
        self
    }
}

impl SyncRequest for MockRequest {
    fn parameter(&self, name: &str) -> Option<&str> {
        self.parameter_values(name)
            .and_then(|values| values.first())
            .map(|v| v.value.as_str())
    }

    fn parameter_values(&self, name: &str) -> Option<&[FieldValue]> {
        self.params
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, values)| values.as_slice())
    }

    fn parameter_map(&self) -> Vec<(&str, &[FieldValue])> {
        self.params
            .iter()
            .map(|(n, values)| (n.as_str(), values.as_slice()))
            .collect()
    }

    fn path_suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }

    fn selectors(&self) -> &[String] {
        &self.selectors
    }

    fn raw_uri(&self) -> &str {
        &self.raw_uri
    }

    fn character_encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }
}
