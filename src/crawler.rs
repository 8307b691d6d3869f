//! # Decorated Crawler
//!
//! Collects the documentation declared on every layer of a decorated view and
//! merges it into the view's operations, bottom-up: the view's own operations
//! come first, then each decorator from the innermost to the topmost.
//!
//! Decorators may also declare the reserved `_` key. Those global defaults are
//! applied in a second pass to every method the operations already declare.
//!
//! ```rust
//! use decorated_crawler::crawler::DecoratedCrawler;
//! use decorated_crawler::handler::{docd_wraps, ViewFn};
//! use serde_yaml::Mapping;
//! use std::sync::Arc;
//!
//! let view = Arc::new(ViewFn::new("pets", None));
//! let authed = docd_wraps(view, "auth", Some("---\n_:\n  responses:\n    401:\n      description: Unauthorized\n"));
//!
//! let mut operations: Mapping = serde_yaml::from_str("get:\n  description: List pets\n").unwrap();
//! DecoratedCrawler::default().operation_helper("/pets", &mut operations, &authed).unwrap();
//!
//! assert_eq!(operations["get"]["responses"][401]["description"].as_str(), Some("Unauthorized"));
//! ```

use crate::config::CrawlerConfig;
use crate::error::CrawlError;
use crate::fragment::is_http_method;
use crate::handler::{collect_fragments, DocumentedView};
use crate::merge::{merge_with_default, MergeContext};
use serde_yaml::{Mapping, Value};
use tracing::{debug, debug_span};

/// Per-method operations of one path, keyed by lowercase HTTP method
pub type Operations = Mapping;

/// Merges decorator-chain documentation into per-method operations
#[derive(Debug, Clone, Default)]
pub struct DecoratedCrawler {
    config: CrawlerConfig,
}

impl DecoratedCrawler {
    pub fn new(config: CrawlerConfig) -> Self {
        DecoratedCrawler { config }
    }

    pub fn config(&self) -> &CrawlerConfig {
        &self.config
    }

    /// Merge every fragment of `view`'s chain into `operations`.
    ///
    /// Returns `path` unchanged; the only effect is the mutation of
    /// `operations`.
    pub fn operation_helper<'p>(
        &self,
        path: &'p str,
        operations: &mut Operations,
        view: &dyn DocumentedView,
    ) -> Result<&'p str, CrawlError> {
        let span = debug_span!("decorated_crawler.operation_helper", path, view = view.name());
        let _enter = span.enter();

        let view_doc = view.doc().unwrap_or_default();
        let fragments = collect_fragments(view, &self.config)?;
        debug!(fragments = fragments.len(), "Merging decorator documentation");

        let mut fallover_defaults = Vec::new();
        for fragment in fragments {
            let ctx = MergeContext::new(view_doc, &fragment.per_method);
            merge_with_default(operations, &fragment.per_method, &ctx)?;
            if let Some(defaults) = fragment.global_default {
                fallover_defaults.push(defaults);
            }
        }

        let mut fallover_defaults = fallover_defaults.into_iter();
        let Some(mut underscore_default) = fallover_defaults.next() else {
            return Ok(path);
        };
        // Reduce all global defaults once, then apply once per method.
        for default in fallover_defaults {
            let ctx = MergeContext::new(view_doc, &default);
            merge_with_default(&mut underscore_default, &default, &ctx)?;
        }

        let ctx = MergeContext::new(view_doc, &underscore_default);
        for (method, method_operations) in operations.iter_mut() {
            if !is_http_method(method) {
                continue;
            }
            if let Value::Mapping(method_operations) = method_operations {
                debug!(method = ?method, "Applying global defaults");
                merge_with_default(method_operations, &underscore_default, &ctx)?;
            }
        }
        Ok(path)
    }
}
