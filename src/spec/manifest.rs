//! Chain manifests: views and reusable decorators described in YAML.
//!
//! ```yaml
//! title: Petstore
//! version: 1.0.0
//! openapi_version: "2.0"
//! decorators:
//!   auth: |
//!     ---
//!     get:
//!       security:
//!         - ApiKeyAuth: []
//! paths:
//!   /pets/{kind}:
//!     doc: |
//!       A pet.
//!       ---
//!       get:
//!         description: Get a pet
//!     decorated_by: [auth]
//! ```
//!
//! `decorated_by` reads like stacked decorators: the first entry is the
//! outermost, the last one wraps the view directly.

use super::ApiSpec;
use crate::config::CrawlerConfig;
use crate::handler::{docd_wraps, DocumentedView, ViewFn};
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_yaml::Mapping;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

fn default_openapi_version() -> String {
    "2.0".to_string()
}

/// One documented path
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathEntry {
    /// View name used in logs; defaults to the path itself
    #[serde(default)]
    pub name: Option<String>,
    /// The view's own docstring
    #[serde(default)]
    pub doc: Option<String>,
    /// Decorator names, outermost first
    #[serde(default)]
    pub decorated_by: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct RawManifest {
    title: String,
    version: String,
    #[serde(default = "default_openapi_version")]
    openapi_version: String,
    #[serde(default)]
    decorators: BTreeMap<String, String>,
    #[serde(default)]
    paths: Mapping,
}

/// A parsed chain manifest
#[derive(Debug, Clone)]
pub struct Manifest {
    pub title: String,
    pub version: String,
    pub openapi_version: String,
    pub decorators: BTreeMap<String, String>,
    /// Paths in declaration order
    pub paths: Vec<(String, PathEntry)>,
}

impl Manifest {
    pub fn from_yaml(content: &str) -> Result<Self> {
        let raw: RawManifest = serde_yaml::from_str(content).context("Invalid chain manifest")?;
        let mut paths = Vec::with_capacity(raw.paths.len());
        for (key, entry) in raw.paths {
            let path = key
                .as_str()
                .ok_or_else(|| anyhow!("Path keys must be strings, found {:?}", key))?
                .to_string();
            let entry: PathEntry = if entry.is_null() {
                PathEntry::default()
            } else {
                serde_yaml::from_value(entry)
                    .with_context(|| format!("Invalid entry for path '{}'", path))?
            };
            paths.push((path, entry));
        }
        Ok(Manifest {
            title: raw.title,
            version: raw.version,
            openapi_version: raw.openapi_version,
            decorators: raw.decorators,
            paths,
        })
    }

    pub fn load(file_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(file_path)
            .with_context(|| format!("Failed to read manifest {}", file_path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Failed to load manifest {}", file_path.display()))
    }

    /// Build the decorator chain of every path, outermost node returned.
    pub fn chains(&self) -> Result<Vec<(String, Arc<dyn DocumentedView>)>> {
        self.paths
            .iter()
            .map(|(path, entry)| {
                let name = entry.name.clone().unwrap_or_else(|| path.clone());
                let mut node: Arc<dyn DocumentedView> =
                    Arc::new(ViewFn::new(name, entry.doc.as_deref()));
                for decorator in entry.decorated_by.iter().rev() {
                    let doc = self.decorators.get(decorator).ok_or_else(|| {
                        anyhow!(
                            "Path '{}' is decorated by unknown decorator '{}'",
                            path,
                            decorator
                        )
                    })?;
                    node = Arc::new(docd_wraps(node, decorator.as_str(), Some(doc.as_str())));
                }
                Ok((path.clone(), node))
            })
            .collect()
    }

    /// Register every path on a fresh [`ApiSpec`].
    pub fn build(&self, config: CrawlerConfig) -> Result<ApiSpec> {
        let mut spec = ApiSpec::new(
            self.title.as_str(),
            self.version.as_str(),
            self.openapi_version.as_str(),
        )
        .with_config(config);
        for (path, view) in self.chains()? {
            spec.path(&path, view.as_ref())
                .with_context(|| format!("Failed to document path '{}'", path))?;
        }
        Ok(spec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::chain;

    const MANIFEST: &str = r#"
title: Petstore
version: 1.0.0
decorators:
  outer: |
    ---
    get: {tags: [outer]}
  inner: |
    ---
    get: {tags: [inner]}
paths:
  /pets:
    doc: |
      Pets.
      ---
      get: {description: List}
    decorated_by: [outer, inner]
  /health:
"#;

    #[test]
    fn test_manifest_preserves_path_order_and_defaults() {
        let manifest = Manifest::from_yaml(MANIFEST).unwrap();
        assert_eq!(manifest.openapi_version, "2.0");
        let paths: Vec<_> = manifest.paths.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, vec!["/pets", "/health"]);
        assert!(manifest.paths[1].1.decorated_by.is_empty());
    }

    #[test]
    fn test_chain_order_matches_decorator_stack() {
        let manifest = Manifest::from_yaml(MANIFEST).unwrap();
        let chains = manifest.chains().unwrap();
        let names: Vec<_> = chain(chains[0].1.as_ref())
            .map(|n| n.name().to_string())
            .collect();
        assert_eq!(names, vec!["outer", "inner", "/pets"]);
    }

    #[test]
    fn test_build_merges_inner_first() {
        let spec = Manifest::from_yaml(MANIFEST)
            .unwrap()
            .build(CrawlerConfig::default())
            .unwrap();
        let tags = &spec.paths()["/pets"]["get"]["tags"];
        assert_eq!(tags, &serde_yaml::from_str::<serde_yaml::Value>("[inner, outer]").unwrap());
    }

    #[test]
    fn test_unknown_decorator() {
        let manifest = Manifest::from_yaml(
            "title: T\nversion: '1'\npaths:\n  /x:\n    decorated_by: [missing]\n",
        )
        .unwrap();
        let err = manifest.chains().err().unwrap();
        assert!(err.to_string().contains("unknown decorator 'missing'"));
    }
}
