//! # Documentation Fragments
//!
//! Turns handler docstrings into YAML mappings. A docstring is prose followed by
//! an optional YAML section introduced by a line holding only `---`:
//!
//! ```text
//! A cute furry animal endpoint.
//! ---
//! get:
//!     description: Get a pet
//! _:
//!     responses:
//!         500:
//!             description: Something broke
//! ```
//!
//! Method keys (`get`, `post`, ...) describe one operation each; the reserved
//! key (`_` unless configured otherwise) holds defaults applied to every method.
//! [`Fragment`] separates the two once, at parse time.

use crate::error::CrawlError;
use serde_yaml::{Mapping, Value};

/// HTTP methods that may appear as operation keys in a path item.
pub const HTTP_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

const SEPARATOR: &str = "---";

/// Whether a mapping key names an HTTP method operation
pub fn is_http_method(key: &Value) -> bool {
    key.as_str().is_some_and(|k| HTTP_METHODS.contains(&k))
}

/// Strip the common leading whitespace of all non-blank lines.
fn dedent(text: &str) -> String {
    let indent = text
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| line.len() - line.trim_start().len())
        .min()
        .unwrap_or(0);

    text.lines()
        .map(|line| line.get(indent..).unwrap_or_else(|| line.trim_start()))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse the YAML section of a docstring.
///
/// `Ok(None)` means the docstring carries no structured section at all.
pub(crate) fn parse_yaml_section(doc: &str) -> Result<Option<Mapping>, String> {
    let mut lines = doc.lines();
    if !lines.by_ref().any(|line| line.trim().starts_with(SEPARATOR)) {
        return Ok(None);
    }
    let section = dedent(&lines.collect::<Vec<_>>().join("\n"));
    if section.trim().is_empty() {
        return Ok(None);
    }

    match serde_yaml::from_str::<Value>(&section) {
        Ok(Value::Mapping(mapping)) => Ok(Some(mapping)),
        Ok(Value::Null) => Ok(None),
        Ok(other) => Err(format!("expected a mapping, found {}", shape_of(&other))),
        Err(e) => Err(e.to_string()),
    }
}

pub(crate) fn shape_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}

/// Load the YAML mapping declared by a docstring.
///
/// Returns `Ok(None)` for plain prose. A YAML section that fails to parse, or
/// that is not a mapping, is reported as [`CrawlError::MalformedFragment`].
pub fn load_yaml_from_docstring(doc: &str) -> Result<Option<Mapping>, CrawlError> {
    parse_yaml_section(doc).map_err(|reason| CrawlError::MalformedFragment {
        view: "<docstring>".to_string(),
        reason,
    })
}

/// Load the operations declared by a view docstring.
///
/// Only HTTP method keys and `x-` extensions survive; anything else in the
/// section (including the global defaults key) is dropped.
pub fn load_operations_from_docstring(doc: &str) -> Result<Mapping, CrawlError> {
    let mapping = load_yaml_from_docstring(doc)?.unwrap_or_default();
    Ok(mapping
        .into_iter()
        .filter(|(key, _)| {
            is_http_method(key) || key.as_str().is_some_and(|k| k.starts_with("x-"))
        })
        .collect())
}

/// One decorator layer's documentation, split by purpose
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fragment {
    /// Method-keyed content, merged directly into the operations
    pub per_method: Mapping,
    /// Content applied to every declared method in the second pass
    pub global_default: Option<Mapping>,
}

impl Fragment {
    /// Split a parsed mapping on the reserved defaults key.
    ///
    /// An empty defaults entry (`_:` with nothing under it) counts as absent.
    pub fn decode(mut mapping: Mapping, defaults_key: &str) -> Result<Self, String> {
        let global_default = match mapping.shift_remove(defaults_key) {
            None | Some(Value::Null) => None,
            Some(Value::Mapping(defaults)) => Some(defaults),
            Some(other) => {
                return Err(format!(
                    "'{}' must be a mapping, found {}",
                    defaults_key,
                    shape_of(&other)
                ))
            }
        };
        Ok(Fragment {
            per_method: mapping,
            global_default,
        })
    }

    /// Parse and decode a docstring in one go, attributing failures to `owner`.
    pub fn from_docstring(
        owner: &str,
        doc: &str,
        defaults_key: &str,
    ) -> Result<Option<Self>, CrawlError> {
        let malformed = |reason| CrawlError::MalformedFragment {
            view: owner.to_string(),
            reason,
        };
        match parse_yaml_section(doc).map_err(malformed)? {
            Some(mapping) => Fragment::decode(mapping, defaults_key)
                .map(Some)
                .map_err(malformed),
            None => Ok(None),
        }
    }

    /// True when neither part carries anything to merge
    pub fn is_empty(&self) -> bool {
        self.per_method.is_empty() && self.global_default.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDENTED: &str = "A cute furry animal endpoint.
        ---
        get:
            description: Get a pet
        _:
            responses:
                400:
                    description: Global fail
        ";

    #[test]
    fn test_prose_only_docstring_has_no_fragment() {
        assert_eq!(load_yaml_from_docstring("Just some words.").unwrap(), None);
        assert_eq!(load_yaml_from_docstring("").unwrap(), None);
        assert_eq!(load_yaml_from_docstring("Words\n---\n   \n").unwrap(), None);
    }

    #[test]
    fn test_indented_section_is_dedented() {
        let mapping = load_yaml_from_docstring(INDENTED).unwrap().unwrap();
        assert_eq!(mapping["get"]["description"].as_str(), Some("Get a pet"));
        assert_eq!(
            mapping["_"]["responses"][400]["description"].as_str(),
            Some("Global fail")
        );
    }

    #[test]
    fn test_non_mapping_section_is_malformed() {
        let err = load_yaml_from_docstring("---\n- a\n- b\n").unwrap_err();
        assert_eq!(err.kind(), "malformed_fragment");
        assert!(err.to_string().contains("a sequence"));

        let err = load_yaml_from_docstring("---\nget: [unclosed\n").unwrap_err();
        assert_eq!(err.kind(), "malformed_fragment");
    }

    #[test]
    fn test_fragment_splits_global_defaults() {
        let fragment = Fragment::from_docstring("view", INDENTED, "_")
            .unwrap()
            .unwrap();
        assert_eq!(fragment.per_method.len(), 1);
        assert!(fragment.per_method.contains_key("get"));
        let defaults = fragment.global_default.unwrap();
        assert!(defaults.contains_key("responses"));
    }

    #[test]
    fn test_fragment_keeps_method_order() {
        let fragment = Fragment::from_docstring(
            "v",
            "---\n_: {tags: [all]}\nget: {}\npost: {}\ndelete: {}\n",
            "_",
        )
        .unwrap()
        .unwrap();
        let methods: Vec<_> = fragment.per_method.keys().filter_map(|k| k.as_str()).collect();
        assert_eq!(methods, vec!["get", "post", "delete"]);
    }

    #[test]
    fn test_separator_line_may_carry_trailing_text() {
        let mapping = load_yaml_from_docstring("Pets.\n--- # operations\nget: {description: g}\n")
            .unwrap()
            .unwrap();
        assert_eq!(mapping["get"]["description"].as_str(), Some("g"));
    }

    #[test]
    fn test_fragment_rejects_scalar_defaults() {
        let err = Fragment::from_docstring("auth", "---\n_: nope\n", "_").unwrap_err();
        match err {
            CrawlError::MalformedFragment { view, reason } => {
                assert_eq!(view, "auth");
                assert!(reason.contains("'_' must be a mapping"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_custom_defaults_key() {
        let fragment = Fragment::from_docstring("v", "---\nall:\n  tags: [x]\n_:\n  tags: [y]\n", "all")
            .unwrap()
            .unwrap();
        assert!(fragment.per_method.contains_key("_"));
        assert!(fragment.global_default.unwrap().contains_key("tags"));
    }

    #[test]
    fn test_operations_keep_methods_and_extensions() {
        let ops = load_operations_from_docstring(
            "Doc\n---\nget: {description: g}\nx-internal: true\n_: {tags: [a]}\nsummary: s\n",
        )
        .unwrap();
        let keys: Vec<_> = ops.keys().filter_map(|k| k.as_str()).collect();
        assert_eq!(keys, vec!["get", "x-internal"]);
    }
}
