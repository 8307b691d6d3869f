//! # decorated-crawler
//!
//! **decorated-crawler** merges OpenAPI documentation declared on every layer of a
//! decorated endpoint into one operation per HTTP method.
//!
//! ## Overview
//!
//! Cross-cutting concerns such as authentication or shared error responses are
//! usually implemented as decorators around many views. Documenting them on
//! every view is tedious and drifts. Instead, each decorator carries a YAML
//! fragment in its docstring, and the crawler folds those fragments into the
//! view's operations, bottom-up:
//!
//! 1. the view's own operations (parsed from its docstring);
//! 2. each decorator's method-keyed fragment, innermost first;
//! 3. the decorators' `_` fragments, reduced into one and applied to every
//!    declared method.
//!
//! Defaults never override what a view declares. Mappings merge recursively,
//! `parameters` merge by (`in`, `name`), `security` by scheme set, and
//! `tags`/`produces`/`consumes` as an ordered union.
//!
//! ## Architecture
//!
//! - **[`handler`]** - Typed decorator chains and the chain walker
//! - **[`fragment`]** - Docstring YAML extraction and the `Fragment` record
//! - **[`merge`]** - Structural merge, list policies and template rendering
//! - **[`crawler`]** - Two-pass merge orchestration
//! - **[`spec`]** - Path registry, document rendering and chain manifests
//! - **[`config`]** / **[`logging`]** - Environment-driven configuration
//! - **[`cli`]** - The `decorated-crawler` binary
//!
//! ```mermaid
//! sequenceDiagram
//!     participant Spec as ApiSpec::path
//!     participant Crawler as DecoratedCrawler
//!     participant Chain as handler::collect_fragments
//!     participant Merge as merge::merge_with_default
//!
//!     Spec->>Spec: load_operations_from_docstring(view.doc())
//!     Spec->>Crawler: operation_helper(path, operations, view)
//!     Crawler->>Chain: walk wrapped-by links
//!     Chain-->>Crawler: Vec<Fragment> (innermost first)
//!     loop each fragment
//!         Crawler->>Merge: per_method into operations
//!     end
//!     Crawler->>Merge: reduce global defaults
//!     loop each declared method
//!         Crawler->>Merge: global default into method
//!     end
//!     Crawler-->>Spec: path
//! ```
//!
//! ## Example
//!
//! ```rust
//! use decorated_crawler::{docd_wraps, ApiSpec, ViewFn};
//! use std::sync::Arc;
//!
//! let view = Arc::new(ViewFn::new(
//!     "get_pet",
//!     Some("Get a pet.\n---\nget:\n  responses:\n    200:\n      description: A pet\n"),
//! ));
//! let view = docd_wraps(
//!     view,
//!     "requires_auth",
//!     Some("---\n_:\n  responses:\n    401:\n      description: Unauthorized\n"),
//! );
//!
//! let mut spec = ApiSpec::new("Petstore", "1.0.0", "2.0");
//! spec.path("/pets/{id}", &view)?;
//!
//! let get = &spec.paths()["/pets/{id}"]["get"];
//! assert_eq!(get["responses"][401]["description"].as_str(), Some("Unauthorized"));
//! # Ok::<(), decorated_crawler::CrawlError>(())
//! ```

pub mod cli;
pub mod config;
pub mod crawler;
pub mod error;
pub mod fragment;
pub mod handler;
pub mod logging;
pub mod merge;
pub mod spec;

pub use config::CrawlerConfig;
pub use crawler::{DecoratedCrawler, Operations};
pub use error::CrawlError;
pub use fragment::{load_operations_from_docstring, load_yaml_from_docstring, Fragment};
pub use handler::{docd_wraps, Documentation, DocumentedView, ViewFn};
pub use merge::{merge_with_default, ListPolicy, MergeContext};
pub use spec::{ApiSpec, Manifest};
