//! # Structural Merge
//!
//! Folds a *defaults* mapping into a *target* mapping in place. Defaults only
//! ever fill gaps:
//!
//! - a key missing from the target is copied over (strings are rendered
//!   through [`template::render`] against the target first);
//! - two mappings under the same key merge recursively;
//! - two sequences under the same key merge according to the key's
//!   [`ListPolicy`];
//! - anything else keeps the target's value.
//!
//! ```rust
//! use decorated_crawler::merge::{merge_with_default, MergeContext};
//! use serde_yaml::Mapping;
//!
//! let mut target: Mapping = serde_yaml::from_str("tags: [pets]\ndescription: Mine").unwrap();
//! let defaults: Mapping = serde_yaml::from_str("tags: [auth]\ndescription: Theirs").unwrap();
//! merge_with_default(&mut target, &defaults, &MergeContext::new("view", &defaults)).unwrap();
//!
//! assert_eq!(target["description"].as_str(), Some("Mine"));
//! assert_eq!(target["tags"], serde_yaml::from_str::<serde_yaml::Value>("[pets, auth]").unwrap());
//! ```

mod parameters;
mod policy;
pub mod template;


pub use policy::ListPolicy;

use crate::error::CrawlError;
use serde_yaml::{Mapping, Value};

/// Diagnostics carried through a merge for error reporting
#[derive(Debug, Clone, Copy)]
pub struct MergeContext<'a> {
    /// Visible documentation of the view the crawl started from
    pub view: &'a str,
    /// The defaults mapping currently being merged
    pub fragment: &'a Mapping,
}

impl<'a> MergeContext<'a> {
    pub fn new(view: &'a str, fragment: &'a Mapping) -> Self {
        MergeContext { view, fragment }
    }

    pub(crate) fn incomplete_parameter(&self, parameter: &Value, missing: &'static str) -> CrawlError {
        CrawlError::IncompleteParameter {
            parameter: parameter.clone(),
            fragment: Value::Mapping(self.fragment.clone()),
            view: self.view.to_string(),
            missing,
        }
    }
}

/// Merge `defaults` into `target` without overriding anything `target` defines.
///
/// Fails only when a `parameters` list on either side holds a parameter
/// without `in` or `name`.
pub fn merge_with_default(
    target: &mut Mapping,
    defaults: &Mapping,
    ctx: &MergeContext<'_>,
) -> Result<(), CrawlError> {
    for (key, default) in defaults {
        match target.get_mut(key) {
            Some(Value::Mapping(existing)) => {
                if let Value::Mapping(default) = default {
                    merge_with_default(existing, default, ctx)?;
                }
            }
            Some(Value::Sequence(existing)) => {
                if let Value::Sequence(default) = default {
                    ListPolicy::for_key(key).apply(existing, default, ctx)?;
                }
            }
            Some(_) => {}
            None => {
                target.insert(key.clone(), default.clone());
                if let Value::String(raw) = default {
                    let rendered = template::render(raw, target);
                    target.insert(key.clone(), Value::String(rendered));
                }
            }
        }
    }
    Ok(())
}
