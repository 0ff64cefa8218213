//! Session configuration resolution
//!
//! Builds the effective [`SessionContext`] for one synchronization run by
//! merging, in precedence order: a stored source-context resource when one is
//! referenced, inline request parameters, the request's structural path info,
//! and the two extra-parameter carriers (query string, then form fields).
//!
//! The only hard failure is the absence of a remote host; every other
//! irregularity degrades to a default and is reported through the
//! diagnostics sink.

use crate::context::{SessionContext, SessionOptions, SourceContext};
use crate::diag::Diagnostics;
use crate::params::{
    self, NameValue, PROP_CONTEXT_PATH, PROP_HOST, PROP_IS_HTTPS, PROP_PASS, PROP_PORT, PROP_USER,
    RP_BATCH_SIZE, RP_ONLY_NEWER, RP_REMOTE_CONFIG, RP_REMOTE_CONTEXT_PATH, RP_REMOTE_HOST,
    RP_REMOTE_IS_HTTPS, RP_REMOTE_PASS, RP_REMOTE_PORT, RP_REMOTE_USER, RP_SELECTORS, RP_STRATEGY,
    RP_SUFFIX, RP_THROTTLE, RP_UPDATE,
};
use crate::request::{Properties, ResourceLocator, SyncRequest};

/// Resolution failure
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ResolveError {
    /// No host was found in the referenced resource or the inline parameters
    #[error("no remote host specified")]
    NoRemoteHost,
}

/// Build a [`SourceContext`] from a stored resource's properties.
///
/// Absent without a non-empty host property; all other properties fall back
/// to their defaults independently.
pub fn source_from_properties(props: &Properties) -> Option<SourceContext> {
    let host = props.get_str(PROP_HOST).filter(|h| !h.is_empty())?;
    let mut context = SourceContext::new(host);
    context.port = props.get_u16(PROP_PORT, 0);
    context.username = props.get_str(PROP_USER);
    context.password = props.get_str(PROP_PASS);
    context.context_path = props.get_str(PROP_CONTEXT_PATH);
    context.https = props.get_bool(PROP_IS_HTTPS, false);
    Some(context)
}

/// Resolves session configurations against a resource locator
pub struct SessionResolver<'a> {
    resources: &'a dyn ResourceLocator,
    diag: &'a dyn Diagnostics,
}

impl<'a> SessionResolver<'a> {
    pub fn new(resources: &'a dyn ResourceLocator, diag: &'a dyn Diagnostics) -> Self {
        Self { resources, diag }
    }

    /// Build a [`SourceContext`] from a request.
    ///
    /// A `remote_config` reference that resolves to a resource with a host
    /// wins outright; inline parameters are only consulted when the
    /// reference is absent or yields nothing.
    pub fn source_from_request(&self, request: &dyn SyncRequest) -> Option<SourceContext> {
        if let Some(reference) = request.parameter(RP_REMOTE_CONFIG) {
            if let Some(props) = self.resources.resource(reference) {
                if let Some(context) = source_from_properties(&props) {
                    return Some(context);
                }
            }
        }

        let host = request
            .parameter(RP_REMOTE_HOST)
            .filter(|h| !h.is_empty())?;
        let mut context = SourceContext::new(host);

        if let Some(raw) = request.parameter(RP_REMOTE_PORT) {
            match raw.parse::<u16>() {
                Ok(port) => context.port = port,
                Err(_) => self
                    .diag
                    .error(&format!("failed to parse remote port parameter: {}", raw)),
            }
        }

        if request.parameter(RP_REMOTE_IS_HTTPS) == Some("true") {
            context.https = true;
        }

        context.username = request.parameter(RP_REMOTE_USER).map(str::to_string);
        context.password = request.parameter(RP_REMOTE_PASS).map(str::to_string);
        context.context_path = request.parameter(RP_REMOTE_CONTEXT_PATH).map(str::to_string);

        Some(context)
    }

    /// Resolve the full session configuration for a request.
    ///
    /// Fails only when no remote host is resolvable; see the module docs for
    /// the merge order of everything else.
    pub fn resolve(&self, request: &dyn SyncRequest) -> Result<SessionContext, ResolveError> {
        let source = self
            .source_from_request(request)
            .ok_or(ResolveError::NoRemoteHost)?;

        let strategy = request.parameter(RP_STRATEGY).map(str::to_string);

        // Structural path info first, explicit parameters override.
        let suffix = request
            .parameter(RP_SUFFIX)
            .or_else(|| request.path_suffix())
            .map(str::to_string);

        let selectors = match request.parameter_values(RP_SELECTORS) {
            Some(values) => values.iter().map(|v| v.value.clone()).collect(),
            None => request.selectors().to_vec(),
        };

        let parameters = self.merge_parameters(request);
        let options = self.options_from_request(request);

        Ok(SessionContext {
            source,
            strategy,
            suffix,
            selectors,
            parameters,
            options,
        })
    }

    /// Merge the two extra-parameter carriers.
    ///
    /// Query-string pairs come first in URL order, then form-field pairs in
    /// map order. File uploads never carry over. A form pair identical in
    /// name and value to a query-string pair is dropped; the dedup window is
    /// the full query-string list, before reserved names are stripped.
    fn merge_parameters(&self, request: &dyn SyncRequest) -> Vec<NameValue> {
        let qs_pairs = params::parse_query(
            request.raw_uri(),
            request.character_encoding(),
            self.diag,
        );

        let mut pairs: Vec<NameValue> = qs_pairs
            .iter()
            .filter(|pair| !params::is_reserved(&pair.name))
            .cloned()
            .collect();

        for (name, values) in request.parameter_map() {
            if params::is_reserved(name) {
                continue;
            }
            for value in values {
                if !value.is_form_field {
                    continue;
                }
                let pair = NameValue::new(name, value.value.clone());
                if !qs_pairs.contains(&pair) {
                    pairs.push(pair);
                }
            }
        }

        pairs
    }

    fn options_from_request(&self, request: &dyn SyncRequest) -> SessionOptions {
        let mut options = SessionOptions::default();

        if request.parameter(RP_UPDATE) == Some("true") {
            options.update = true;
        }
        if request.parameter(RP_ONLY_NEWER) == Some("true") {
            options.only_newer = true;
        }

        if let Some(raw) = request.parameter(RP_BATCH_SIZE) {
            match raw.parse::<u32>() {
                Ok(size) => options.batch_size = Some(size),
                Err(_) => self
                    .diag
                    .error(&format!("failed to parse batch size parameter: {}", raw)),
            }
        }

        if let Some(raw) = request.parameter(RP_THROTTLE) {
            match raw.parse::<u32>() {
                Ok(throttle) => options.throttle = Some(throttle),
                Err(_) => self
                    .diag
                    .error(&format!("failed to parse throttle parameter: {}", raw)),
            }
        }

        options
    }
}
