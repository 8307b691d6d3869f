//! # API Document Registry
//!
//! A small path registry producing the OpenAPI document the crawler
//! feeds. Registering a path seeds its operations from the view's visible
//! documentation, lets [`DecoratedCrawler`] merge the decorator chain into them,
//! and stores the result under the path.
//!
//! ```rust
//! use decorated_crawler::handler::{docd_wraps, ViewFn};
//! use decorated_crawler::spec::ApiSpec;
//! use std::sync::Arc;
//!
//! let view = Arc::new(ViewFn::new("pets", Some("Pets.\n---\nget:\n  description: List pets\n")));
//! let authed = docd_wraps(view, "auth", Some("---\nget:\n  security:\n    - ApiKeyAuth: []\n"));
//!
//! let mut spec = ApiSpec::new("Petstore", "1.0.0", "2.0");
//! spec.path("/pets", &authed).unwrap();
//! assert!(spec.to_yaml().unwrap().contains("ApiKeyAuth"));
//! ```

mod manifest;

pub use manifest::{Manifest, PathEntry};

use crate::config::CrawlerConfig;
use crate::crawler::{DecoratedCrawler, Operations};
use crate::error::CrawlError;
use crate::fragment::load_operations_from_docstring;
use crate::handler::{chain, DocumentedView};
use serde_yaml::{Mapping, Value};
use tracing::{info, warn};

/// OpenAPI document under construction
#[derive(Debug, Clone)]
pub struct ApiSpec {
    pub title: String,
    pub version: String,
    pub openapi_version: String,
    paths: Mapping,
    crawler: DecoratedCrawler,
}

impl ApiSpec {
    pub fn new(
        title: impl Into<String>,
        version: impl Into<String>,
        openapi_version: impl Into<String>,
    ) -> Self {
        ApiSpec {
            title: title.into(),
            version: version.into(),
            openapi_version: openapi_version.into(),
            paths: Mapping::new(),
            crawler: DecoratedCrawler::default(),
        }
    }

    /// Replace the crawler configuration
    pub fn with_config(mut self, config: CrawlerConfig) -> Self {
        self.crawler = DecoratedCrawler::new(config);
        self
    }

    /// Registered paths and their operations, in registration order
    pub fn paths(&self) -> &Mapping {
        &self.paths
    }

    fn view_operations(&self, view: &dyn DocumentedView) -> Result<Operations, CrawlError> {
        let Some(doc) = view.doc() else {
            return Ok(Operations::new());
        };
        // Wrappers expose the view's docs; blame the view itself.
        let owner = chain(view).last().unwrap_or(view).name();
        match load_operations_from_docstring(doc) {
            Ok(operations) => Ok(operations),
            Err(CrawlError::MalformedFragment { reason, .. }) => {
                let err = CrawlError::MalformedFragment {
                    view: owner.to_string(),
                    reason,
                };
                if self.crawler.config().strict_fragments {
                    return Err(err);
                }
                warn!(view = owner, error = %err, "Ignoring malformed view documentation");
                Ok(Operations::new())
            }
            Err(err) => Err(err),
        }
    }

    /// Register `path`, documented by `view` and its decorators.
    pub fn path(&mut self, path: &str, view: &dyn DocumentedView) -> Result<&mut Self, CrawlError> {
        let mut operations = self.view_operations(view)?;
        self.crawler.operation_helper(path, &mut operations, view)?;
        info!(
            path,
            view = view.name(),
            methods = operations.len(),
            "Registered path"
        );

        let key = Value::from(path);
        match self.paths.get_mut(&key) {
            Some(Value::Mapping(existing)) => existing.extend(operations),
            _ => {
                self.paths.insert(key, Value::Mapping(operations));
            }
        }
        Ok(self)
    }

    /// The document as a YAML value
    pub fn to_value(&self) -> Value {
        let mut document = Mapping::new();
        if self.openapi_version.starts_with('2') {
            document.insert("swagger".into(), "2.0".into());
        } else {
            document.insert("openapi".into(), self.openapi_version.as_str().into());
        }

        let mut info = Mapping::new();
        info.insert("title".into(), self.title.as_str().into());
        info.insert("version".into(), self.version.as_str().into());
        document.insert("info".into(), Value::Mapping(info));
        document.insert("paths".into(), Value::Mapping(self.paths.clone()));
        Value::Mapping(document)
    }

    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(&self.to_value())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_value())
    }
}
