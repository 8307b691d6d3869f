//! # Documented Handler Chains
//!
//! A decorated endpoint is a chain of nodes: the outermost decorator wraps the
//! next one down, and so on until the undecorated view. Every wrapper keeps
//! the documentation it was written with (its *original* documentation) and
//! exposes the wrapped view's documentation as its own visible docs, the way
//! documentation-copying wrappers usually behave.
//!
//! ```rust
//! use decorated_crawler::handler::{docd_wraps, DocumentedView, ViewFn};
//! use std::sync::Arc;
//!
//! let view = Arc::new(ViewFn::new("random_pet", Some("A pet.\n---\nget:\n  description: Get a pet\n")));
//! let authed = docd_wraps(view, "requires_auth", Some("---\nget:\n  security:\n    - ApiKeyAuth: []\n"));
//!
//! assert_eq!(authed.doc(), Some("A pet.\n---\nget:\n  description: Get a pet\n"));
//! assert!(authed.wrapped().is_some());
//! ```

use crate::config::CrawlerConfig;
use crate::error::CrawlError;
use crate::fragment::Fragment;
use serde_yaml::Mapping;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

/// Documentation attached to a chain node
#[derive(Debug, Clone, PartialEq)]
pub enum Documentation {
    /// Docstring text; the YAML section follows a `---` line
    Raw(String),
    /// Already parsed fragment mapping
    Parsed(Mapping),
}

impl From<&str> for Documentation {
    fn from(doc: &str) -> Self {
        Documentation::Raw(doc.to_string())
    }
}

impl From<String> for Documentation {
    fn from(doc: String) -> Self {
        Documentation::Raw(doc)
    }
}

impl From<Mapping> for Documentation {
    fn from(fragment: Mapping) -> Self {
        Documentation::Parsed(fragment)
    }
}

/// A handler-like node in a decorator chain
pub trait DocumentedView: Send + Sync + fmt::Debug {
    /// Name of this node (the decorator or view function)
    fn name(&self) -> &str;

    /// Visible documentation; wrappers expose the wrapped view's docs
    fn doc(&self) -> Option<&str>;

    /// Documentation this node declared itself before being wrapped
    fn orig_doc(&self) -> Option<&Documentation>;

    /// The node this one wraps, `None` for the undecorated view
    fn wrapped(&self) -> Option<&dyn DocumentedView>;
}

/// Concrete chain node built by [`ViewFn::new`] and [`docd_wraps`]
#[derive(Debug, Clone)]
pub struct ViewFn {
    name: String,
    doc: Option<String>,
    orig_doc: Option<Documentation>,
    wrapped: Option<Arc<dyn DocumentedView>>,
}

impl ViewFn {
    /// An undecorated view with its own docstring
    pub fn new(name: impl Into<String>, doc: Option<&str>) -> Self {
        ViewFn {
            name: name.into(),
            doc: doc.map(str::to_string),
            orig_doc: None,
            wrapped: None,
        }
    }
}

impl DocumentedView for ViewFn {
    fn name(&self) -> &str {
        &self.name
    }

    fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    fn orig_doc(&self) -> Option<&Documentation> {
        self.orig_doc.as_ref()
    }

    fn wrapped(&self) -> Option<&dyn DocumentedView> {
        self.wrapped.as_deref()
    }
}

/// Wrap `wrapped` in a decorator node named `name`.
///
/// The wrapper's own documentation is kept as its original documentation for
/// the crawler; its visible documentation becomes the wrapped node's.
pub fn docd_wraps(
    wrapped: Arc<dyn DocumentedView>,
    name: impl Into<String>,
    wrapper_doc: Option<impl Into<Documentation>>,
) -> ViewFn {
    ViewFn {
        name: name.into(),
        doc: wrapped.doc().map(str::to_string),
        orig_doc: wrapper_doc.map(Into::into),
        wrapped: Some(wrapped),
    }
}

/// Iterator over a chain, outermost node first
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    next: Option<&'a dyn DocumentedView>,
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a dyn DocumentedView;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.wrapped();
        Some(current)
    }
}

/// Walk the chain starting at `view`
pub fn chain(view: &dyn DocumentedView) -> Chain<'_> {
    Chain { next: Some(view) }
}

/// Decode the fragment a single node declares.
pub fn node_fragment(
    node: &dyn DocumentedView,
    config: &CrawlerConfig,
) -> Result<Option<Fragment>, CrawlError> {
    match node.orig_doc() {
        None => Ok(None),
        Some(Documentation::Raw(doc)) => {
            Fragment::from_docstring(node.name(), doc, &config.defaults_key)
        }
        Some(Documentation::Parsed(mapping)) => Fragment::decode(mapping.clone(), &config.defaults_key)
            .map(Some)
            .map_err(|reason| CrawlError::MalformedFragment {
                view: node.name().to_string(),
                reason,
            }),
    }
}

/// Collect the fragments of a chain, innermost first.
///
/// Nodes without documentation, or whose docstring is plain prose, contribute
/// nothing. Malformed fragments are skipped with a warning unless
/// `config.strict_fragments` is set.
pub fn collect_fragments(
    view: &dyn DocumentedView,
    config: &CrawlerConfig,
) -> Result<Vec<Fragment>, CrawlError> {
    let mut fragments = Vec::new();
    for node in chain(view) {
        match node_fragment(node, config) {
            Ok(Some(fragment)) if !fragment.is_empty() => {
                debug!(node = node.name(), "Collected documentation fragment");
                fragments.push(fragment);
            }
            Ok(_) => {}
            Err(err) if !config.strict_fragments => {
                warn!(node = node.name(), error = %err, "Skipping malformed documentation fragment");
            }
            Err(err) => return Err(err),
        }
    }
    fragments.reverse();
    Ok(fragments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layered() -> ViewFn {
        let view = Arc::new(ViewFn::new(
            "random_pet",
            Some("A pet.\n---\nget:\n  description: Get a pet\n"),
        ));
        let inner = Arc::new(docd_wraps(
            view,
            "decorates2",
            Some("---\nget:\n  tags: [inner]\n"),
        ));
        let prose = Arc::new(docd_wraps(inner, "logged", Some("Only prose here.")));
        docd_wraps(prose, "decorates", Some("---\nget:\n  tags: [outer]\n_:\n  tags: [all]\n"))
    }

    #[test]
    fn test_chain_walks_outermost_first() {
        let outer = layered();
        let names: Vec<_> = chain(&outer).map(|n| n.name().to_string()).collect();
        assert_eq!(names, vec!["decorates", "logged", "decorates2", "random_pet"]);
    }

    #[test]
    fn test_wrapper_exposes_view_docs() {
        let outer = layered();
        assert_eq!(outer.doc(), Some("A pet.\n---\nget:\n  description: Get a pet\n"));
        assert!(matches!(outer.orig_doc(), Some(Documentation::Raw(_))));
    }

    #[test]
    fn test_fragments_are_innermost_first_and_skip_prose() {
        let outer = layered();
        let fragments = collect_fragments(&outer, &CrawlerConfig::default()).unwrap();
        assert_eq!(fragments.len(), 2);
        assert_eq!(fragments[0].per_method["get"]["tags"][0].as_str(), Some("inner"));
        assert!(fragments[0].global_default.is_none());
        assert_eq!(fragments[1].per_method["get"]["tags"][0].as_str(), Some("outer"));
        assert!(fragments[1].global_default.is_some());
    }

    #[test]
    fn test_malformed_fragment_is_skipped_or_raised() {
        let view = Arc::new(ViewFn::new("view", None));
        let broken = docd_wraps(view, "broken", Some("---\n- not\n- a mapping\n"));

        let fragments = collect_fragments(&broken, &CrawlerConfig::default()).unwrap();
        assert!(fragments.is_empty());

        let err = collect_fragments(&broken, &CrawlerConfig::default().strict(true)).unwrap_err();
        assert_eq!(err.kind(), "malformed_fragment");
        assert!(err.to_string().contains("'broken'"));
    }

    #[test]
    fn test_parsed_documentation() {
        let view = Arc::new(ViewFn::new("view", None));
        let fragment: Mapping = serde_yaml::from_str("post:\n  tags: [p]\n").unwrap();
        let wrapper = docd_wraps(view, "pre_parsed", Some(fragment));
        let fragments = collect_fragments(&wrapper, &CrawlerConfig::default()).unwrap();
        assert_eq!(fragments.len(), 1);
        assert!(fragments[0].per_method.contains_key("post"));
    }
}
