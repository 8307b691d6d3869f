//! `{f[key]}` interpolation for inherited strings.
//!
//! A string copied from defaults may refer to sibling fields of the mapping it
//! lands in, so a decorator can declare `description: "he may fail {f[x-suffix]}"`
//! and let each view supply `x-suffix`. Missing keys render empty; the renderer
//! never fails.

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde_yaml::{Mapping, Value};

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\{\{|\}\}|\{f\[([^\[\]{}]*)\]\}").expect("placeholder regex should be valid")
});

fn lookup<'a>(scope: &'a Mapping, key: &str) -> Option<&'a Value> {
    if let Some(found) = scope.get(key) {
        return Some(found);
    }
    // Response codes parse as integers, so `{f[400]}` must also hit `400:`.
    if !key.is_empty() && key.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(number) = key.parse::<u64>() {
            return scope.get(&Value::Number(number.into()));
        }
    }
    None
}

/// Text form of a value spliced into a template.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => serde_json::to_string(other).unwrap_or_default(),
    }
}

/// Render `template` against the keys of `scope`.
///
/// `{{` and `}}` collapse to single braces; any other brace group is kept as
/// written.
pub fn render(template: &str, scope: &Mapping) -> String {
    if !template.contains(['{', '}']) {
        return template.to_string();
    }
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures<'_>| match caps.get(1) {
            Some(key) => lookup(scope, key.as_str())
                .map(display_value)
                .unwrap_or_default(),
            None if &caps[0] == "{{" => "{".to_string(),
            None => "}".to_string(),
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(yaml: &str) -> Mapping {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_placeholder_resolves_sibling() {
        let s = scope("x-400-suffix: yeah yeah....");
        assert_eq!(
            render("he may fail {f[x-400-suffix]}", &s),
            "he may fail yeah yeah...."
        );
    }

    #[test]
    fn test_missing_placeholder_renders_empty() {
        assert_eq!(
            render("he may fail {f[x-400-suffix]}", &Mapping::new()),
            "he may fail "
        );
    }

    #[test]
    fn test_escaped_and_foreign_braces() {
        let s = scope("a: 1");
        assert_eq!(render("{{literal}} {f[a]}", &s), "{literal} 1");
        assert_eq!(render("{other} {0}", &s), "{other} {0}");
        assert_eq!(render("no braces", &s), "no braces");
    }

    #[test]
    fn test_numeric_key_and_value_shapes() {
        let s = scope("400: bad\nflag: true\nnothing: null\nlist: [a, b]");
        assert_eq!(render("{f[400]}", &s), "bad");
        assert_eq!(render("{f[flag]}|{f[nothing]}|{f[list]}", &s), r#"true||["a","b"]"#);
    }
}
