//! Resolved session data model
//!
//! These types are built once per resolution and never mutated afterwards;
//! concurrent reads need no locking.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::params::NameValue;

/// Remote endpoint to pull content from.
///
/// A context only exists once a host is known; there is no such thing as a
/// partial context without one.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceContext {
    /// Remote hostname, never empty
    pub host: String,

    /// Remote port; 0 means "use the scheme default"
    #[serde(default)]
    pub port: u16,

    /// Username for the remote connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    /// Password for the remote connection
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    /// Servlet context path prefix on the remote host
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_path: Option<String>,

    /// Connect over https
    #[serde(default)]
    pub https: bool,
}

impl SourceContext {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 0,
            username: None,
            password: None,
            context_path: None,
            https: false,
        }
    }
}

// Keeps the password out of log output.
impl fmt::Debug for SourceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceContext")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .field("context_path", &self.context_path)
            .field("https", &self.https)
            .finish()
    }
}

/// Per-session transfer options parsed from reserved request parameters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionOptions {
    /// Overwrite nodes that already exist on the target
    #[serde(default)]
    pub update: bool,

    /// Only copy nodes newer than their target counterpart
    #[serde(default)]
    pub only_newer: bool,

    /// Save batch size; None leaves the engine default in place
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub batch_size: Option<u32>,

    /// Seconds to pause between batches; None leaves the engine default
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throttle: Option<u32>,
}

/// Effective configuration of one synchronization run.
///
/// Produced by [`crate::resolve::SessionResolver::resolve`] and consumed
/// read-only by the transfer engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionContext {
    /// Remote endpoint to read from
    pub source: SourceContext,

    /// Strategy identifier; the engine applies its own default when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strategy: Option<String>,

    /// Path suffix scoping the run
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suffix: Option<String>,

    /// Selector tokens, in request order
    #[serde(default)]
    pub selectors: Vec<String>,

    /// Pass-through parameters for the remote request, in carrier order,
    /// deduplicated, with reserved names removed
    #[serde(default)]
    pub parameters: Vec<NameValue>,

    /// Transfer options
    #[serde(default)]
    pub options: SessionOptions,
}
