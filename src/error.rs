use serde_yaml::Value;
use std::fmt;

/// Errors raised while crawling a decorator chain
///
/// Returned by [`crate::crawler::DecoratedCrawler::operation_helper`] and
/// [`crate::fragment::load_yaml_from_docstring`].
#[derive(Debug, Clone, PartialEq)]
pub enum CrawlError {
    /// A parameter taking part in identity merging lacks `in` or `name`
    ///
    /// Raised for parameters on either side of the merge, so the payload
    /// carries enough context to find the decorator that declared it.
    IncompleteParameter {
        /// The offending parameter as declared
        parameter: Value,
        /// The documentation fragment being merged when the parameter was met
        fragment: Value,
        /// Visible documentation of the view the crawl started from
        view: String,
        /// The missing attribute, `in` or `name`
        missing: &'static str,
    },
    /// A docstring declared a YAML section that is not a YAML mapping
    ///
    /// Only surfaced when strict fragment parsing is enabled; otherwise the
    /// fragment is skipped with a warning.
    MalformedFragment {
        /// Name of the chain node the documentation belongs to
        view: String,
        /// Parser message or shape description
        reason: String,
    },
}

impl CrawlError {
    /// Short machine-readable tag for logs
    pub fn kind(&self) -> &'static str {
        match self {
            CrawlError::IncompleteParameter { .. } => "incomplete_parameter",
            CrawlError::MalformedFragment { .. } => "malformed_fragment",
        }
    }
}

fn inline(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value))
}

impl fmt::Display for CrawlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CrawlError::IncompleteParameter {
                parameter,
                fragment,
                view,
                missing,
            } => {
                write!(
                    f,
                    "While solving parameter {}, with yaml document {}, related to view with doc {:?}, \
                    the parameter attribute '{}' was missing",
                    inline(parameter),
                    inline(fragment),
                    view,
                    missing
                )
            }
            CrawlError::MalformedFragment { view, reason } => {
                write!(
                    f,
                    "Documentation attached to '{}' is not a YAML mapping: {}",
                    view, reason
                )
            }
        }
    }
}

impl std::error::Error for CrawlError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incomplete_parameter_display_names_missing_field() {
        let parameter: Value = serde_yaml::from_str("{in: query}").unwrap();
        let err = CrawlError::IncompleteParameter {
            parameter,
            fragment: Value::Null,
            view: "A pet endpoint".to_string(),
            missing: "name",
        };
        let msg = err.to_string();
        assert!(msg.contains("'name' was missing"));
        assert!(msg.contains(r#"{"in":"query"}"#));
        assert!(msg.contains("A pet endpoint"));
        assert_eq!(err.kind(), "incomplete_parameter");
    }

    #[test]
    fn test_malformed_fragment_display() {
        let err = CrawlError::MalformedFragment {
            view: "auth".to_string(),
            reason: "expected a mapping, found a sequence".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Documentation attached to 'auth' is not a YAML mapping: expected a mapping, found a sequence"
        );
    }
}
