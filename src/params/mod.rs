//! Reserved parameter registry and query-string parsing
//!
//! Reserved parameters steer session resolution itself and are consumed by
//! the resolver; they are never forwarded into a session's extra-parameter
//! list. Matching is case-sensitive.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::diag::Diagnostics;

/// Request parameter: overwrite existing target content
pub const RP_UPDATE: &str = "update";
/// Request parameter: only copy nodes newer than the target's
pub const RP_ONLY_NEWER: &str = "only_newer";
/// Request parameter: save batch size
pub const RP_BATCH_SIZE: &str = "batch_size";
/// Request parameter: per-batch throttle in seconds
pub const RP_THROTTLE: &str = "throttle";
/// Request parameter: remote host (inline source context)
pub const RP_REMOTE_HOST: &str = "remote_host";
/// Request parameter: remote port
pub const RP_REMOTE_PORT: &str = "remote_port";
/// Request parameter: remote username
pub const RP_REMOTE_USER: &str = "remote_user";
/// Request parameter: remote password
pub const RP_REMOTE_PASS: &str = "remote_pass";
/// Request parameter: remote servlet context path prefix
pub const RP_REMOTE_CONTEXT_PATH: &str = "remote_context_path";
/// Request parameter: use https for the remote connection
pub const RP_REMOTE_IS_HTTPS: &str = "remote_is_https";
/// Request parameter: reference to a stored source-context resource
pub const RP_REMOTE_CONFIG: &str = "remote_config";
/// Request parameter: synchronization strategy identifier
pub const RP_STRATEGY: &str = "strategy";
/// Request parameter: explicit path suffix override
pub const RP_SUFFIX: &str = "suffix";
/// Request parameter: explicit selector override (multi-value)
pub const RP_SELECTORS: &str = "selectors";

/// Resource property: remote host
pub const PROP_HOST: &str = "host";
/// Resource property: remote port
pub const PROP_PORT: &str = "port";
/// Resource property: remote username
pub const PROP_USER: &str = "user";
/// Resource property: remote password
pub const PROP_PASS: &str = "pass";
/// Resource property: remote servlet context path prefix
pub const PROP_CONTEXT_PATH: &str = "context_path";
/// Resource property: use https for the remote connection
pub const PROP_IS_HTTPS: &str = "is_https";

/// All reserved request-parameter names
pub const RESERVED_PARAMS: &[&str] = &[
    RP_UPDATE,
    RP_ONLY_NEWER,
    RP_BATCH_SIZE,
    RP_THROTTLE,
    RP_REMOTE_HOST,
    RP_REMOTE_PORT,
    RP_REMOTE_USER,
    RP_REMOTE_PASS,
    RP_REMOTE_CONTEXT_PATH,
    RP_REMOTE_IS_HTTPS,
    RP_REMOTE_CONFIG,
    RP_STRATEGY,
    RP_SUFFIX,
    RP_SELECTORS,
];

/// Returns true when `name` is consumed by session resolution itself
pub fn is_reserved(name: &str) -> bool {
    RESERVED_PARAMS.contains(&name)
}

/// An ordered name/value parameter pair
///
/// Equality is exact name+value; two pairs with the same name but different
/// values are distinct for deduplication purposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameValue {
    pub name: String,
    pub value: String,
}

impl NameValue {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

// Server-relative request URIs have no scheme; join them onto a synthetic
// base so the url crate will accept them.
const SYNTHETIC_BASE: &str = "http://localhost/";

/// Parse the query string of a raw request URI into ordered pairs.
///
/// Pairs come back in the exact order they appear in the URI,
/// percent-decoded. A malformed URI is reported through `diag` and yields an
/// empty list; resolution proceeds with form parameters only. Decoding is
/// UTF-8; a declared non-UTF-8 encoding is reported and UTF-8 is used anyway.
pub fn parse_query(
    raw_uri: &str,
    declared_encoding: Option<&str>,
    diag: &dyn Diagnostics,
) -> Vec<NameValue> {
    if let Some(enc) = declared_encoding {
        if !enc.eq_ignore_ascii_case("utf-8") && !enc.eq_ignore_ascii_case("utf8") {
            diag.warn(&format!(
                "declared character encoding '{}' is not supported; decoding query string as UTF-8",
                enc
            ));
        }
    }

    let parsed = Url::parse(raw_uri).or_else(|err| match err {
        url::ParseError::RelativeUrlWithoutBase => {
            Url::parse(SYNTHETIC_BASE).and_then(|base| base.join(raw_uri))
        }
        other => Err(other),
    });

    match parsed {
        Ok(uri) => uri
            .query()
            .map(|query| {
                url::form_urlencoded::parse(query.as_bytes())
                    .map(|(name, value)| NameValue::new(name, value))
                    .collect()
            })
            .unwrap_or_default(),
        Err(err) => {
            diag.error(&format!("failed to parse request URI '{}': {}", raw_uri, err));
            Vec::new()
        }
    }
}
