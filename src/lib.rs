//! treesync - configuration resolution for remote content-tree synchronization
//!
//! This crate turns an incoming synchronization request (or a stored
//! configuration resource) into the effective configuration of one
//! synchronization run: which remote repository to pull from, the
//! authentication and path-scoping parameters for that pull, and how deep the
//! traversal should recurse per path or per tree level. The transfer engine
//! and the HTTP surface live elsewhere and consume the immutable
//! [`SessionContext`] produced here.

pub mod context;
pub mod depth;
pub mod diag;
pub mod mock;
pub mod params;
pub mod request;
pub mod resolve;

pub use context::{SessionContext, SessionOptions, SourceContext};
pub use depth::DepthConfig;
pub use diag::{CaptureSink, Diagnostics, TracingSink};
pub use params::NameValue;
pub use request::{Properties, ResourceLocator, StaticResources, SyncRequest, TomlResources};
pub use resolve::{ResolveError, SessionResolver};
