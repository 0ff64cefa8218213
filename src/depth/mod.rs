//! Traversal depth configuration
//!
//! A depth specification is a compact string carried in a request parameter.
//! Two forms are recognized: `<path>=<depth>` pins an exact path to a depth,
//! and a bare integer sets the depth applied by tree level. Only the first
//! whitespace-delimited token of the specification is significant; trailing
//! tokens are accepted and ignored. Downstream callers rely on this
//! permissive behavior, so it must not be tightened.

use std::collections::HashMap;

use crate::diag::Diagnostics;

/// Depth applied when no configuration matches
pub const DEFAULT_DEPTH: i32 = 1;

/// Parsed depth configuration, immutable and shareable across sessions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DepthConfig {
    depth_by_path: HashMap<String, i32>,
    depth_by_depth: Vec<i32>,
}

impl DepthConfig {
    /// Parse a depth specification.
    ///
    /// Malformed integers are reported through `diag` and dropped; the result
    /// then behaves as if that entry had never been given. An empty
    /// specification yields an empty config resolving everything to
    /// [`DEFAULT_DEPTH`].
    pub fn parse(spec: &str, diag: &dyn Diagnostics) -> Self {
        let mut depth_by_path = HashMap::new();
        let mut depth_by_depth = Vec::new();

        if let Some(token) = spec.split_whitespace().next() {
            if let Some((path, depth)) = token.split_once('=') {
                match depth.parse::<i32>() {
                    Ok(depth) => {
                        depth_by_path.insert(path.to_string(), depth);
                    }
                    Err(_) => {
                        diag.error(&format!("failed to parse depth-by-path token: {}", token));
                    }
                }
            } else {
                match token.parse::<i32>() {
                    Ok(depth) => depth_by_depth.push(depth),
                    Err(_) => {
                        diag.error(&format!("failed to parse depth-by-depth token: {}", token));
                    }
                }
            }
        }

        Self {
            depth_by_path,
            depth_by_depth,
        }
    }

    /// Resolve the traversal depth for a node.
    ///
    /// `path` is the node's full path and `tree_depth` its zero-based nesting
    /// level under the traversal root. An exact depth-by-path entry wins;
    /// otherwise the depth-by-depth sequence applies, with its last element
    /// covering every level beyond its length. Total over all inputs.
    pub fn resolve_depth(&self, path: &str, tree_depth: usize) -> i32 {
        if let Some(&depth) = self.depth_by_path.get(path) {
            depth
        } else if let Some(&last) = self.depth_by_depth.last() {
            self.depth_by_depth
                .get(tree_depth)
                .copied()
                .unwrap_or(last)
        } else {
            DEFAULT_DEPTH
        }
    }

    /// True when neither representation holds any entry
    pub fn is_empty(&self) -> bool {
        self.depth_by_path.is_empty() && self.depth_by_depth.is_empty()
    }
}
