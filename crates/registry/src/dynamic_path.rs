//! Dynamic path resolution for sidebar links.
//!
//! Paths use `:name` segments as placeholders (for example
//! `/actor/themes/:themeId/submit`). A sidebar link must always resolve to a
//! navigable path, so placeholders without a contextual value are filled with
//! a sentinel:
//!
//! | placeholder | sentinel  |
//! |-------------|-----------|
//! | `themeId`   | `current` |
//! | `courseId`  | `all`     |
//! | anything else | `default` |
//!
//! A template's own `pathDefaults` take precedence over this table.

use std::collections::HashMap;

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use regex::Regex;
use selftape_types::{NavItemState, NavItemTemplate};

/// Sentinel used for placeholders with no documented default.
pub const DEFAULT_SENTINEL: &str = "default";

const SENTINELS: &[(&str, &str)] = &[("themeId", "current"), ("courseId", "all")];

/// RFC 3986 unreserved characters stay readable in substituted segments.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

static PLACEHOLDER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:([A-Za-z][A-Za-z0-9_]*)$").expect("placeholder pattern"));

fn placeholder_name(segment: &str) -> Option<&str> {
    PLACEHOLDER.captures(segment).and_then(|captures| captures.get(1)).map(|name| name.as_str())
}

/// Placeholder names in order of appearance.
pub fn placeholders(path: &str) -> Vec<&str> {
    path.split('/').filter_map(placeholder_name).collect()
}

pub fn has_placeholders(path: &str) -> bool {
    path.split('/').any(|segment| placeholder_name(segment).is_some())
}

fn sentinel_for<'a>(name: &str, path_defaults: &'a IndexMap<String, String>) -> &'a str {
    if let Some(value) = path_defaults.get(name) {
        return value;
    }
    SENTINELS
        .iter()
        .find(|(placeholder, _)| *placeholder == name)
        .map(|(_, sentinel)| *sentinel)
        .unwrap_or(DEFAULT_SENTINEL)
}

/// Replaces every placeholder segment of `path`.
///
/// Provided values are percent-encoded; blank values count as missing.
///
/// ```rust
/// use std::collections::HashMap;
/// use indexmap::IndexMap;
/// use selftape_registry::resolve_path;
///
/// let mut substitutions = HashMap::new();
/// substitutions.insert("themeId".to_string(), "spring 24".to_string());
/// let resolved = resolve_path("/actor/themes/:themeId/submit", &IndexMap::new(), &substitutions);
/// assert_eq!(resolved, "/actor/themes/spring%2024/submit");
///
/// let fallback = resolve_path("/actor/themes/:themeId/submit", &IndexMap::new(), &HashMap::new());
/// assert_eq!(fallback, "/actor/themes/current/submit");
/// ```
pub fn resolve_path(path: &str, path_defaults: &IndexMap<String, String>, substitutions: &HashMap<String, String>) -> String {
    path.split('/')
        .map(|segment| {
            let Some(name) = placeholder_name(segment) else {
                return segment.to_string();
            };
            match substitutions.get(name).map(|value| value.trim()).filter(|value| !value.is_empty()) {
                Some(value) => utf8_percent_encode(value, SEGMENT).to_string(),
                None => sentinel_for(name, path_defaults).to_string(),
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

pub fn resolve_dynamic_path(template: &NavItemTemplate, substitutions: &HashMap<String, String>) -> String {
    if !template.is_dynamic {
        return template.path.clone();
    }
    resolve_path(&template.path, &template.path_defaults, substitutions)
}

/// Same as [`resolve_dynamic_path`] for a persisted item, which carries its
/// own copy of the template's path metadata.
pub fn resolve_state_path(state: &NavItemState, substitutions: &HashMap<String, String>) -> String {
    if !state.is_dynamic {
        return state.path.clone();
    }
    resolve_path(&state.path, &state.path_defaults, substitutions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TemplateRegistry;

    #[test]
    fn finds_placeholders_by_segment() {
        assert_eq!(placeholders("/admin/courses/:courseId"), vec!["courseId"]);
        assert!(placeholders("/a:b/c").is_empty());
        assert!(!has_placeholders("/sessions"));
    }

    #[test]
    fn documented_sentinels_apply_without_values() {
        let none = HashMap::new();
        let defaults = IndexMap::new();
        assert_eq!(resolve_path("/t/:themeId", &defaults, &none), "/t/current");
        assert_eq!(resolve_path("/c/:courseId", &defaults, &none), "/c/all");
        assert_eq!(resolve_path("/s/:sessionId", &defaults, &none), "/s/default");
    }

    #[test]
    fn template_defaults_override_global_sentinels() {
        let registry = TemplateRegistry::embedded().unwrap();
        let template = registry.template("/tutor/themes/:themeId/submissions").unwrap();
        assert_eq!(resolve_dynamic_path(template, &HashMap::new()), "/tutor/themes/all/submissions");
    }

    #[test]
    fn blank_values_fall_back_and_real_values_are_encoded() {
        let mut substitutions = HashMap::new();
        substitutions.insert("courseId".to_string(), "  ".to_string());
        assert_eq!(resolve_path("/c/:courseId", &IndexMap::new(), &substitutions), "/c/all");

        substitutions.insert("courseId".to_string(), "acting/101".to_string());
        assert_eq!(resolve_path("/c/:courseId", &IndexMap::new(), &substitutions), "/c/acting%2F101");
    }

    #[test]
    fn static_templates_ignore_substitutions() {
        let registry = TemplateRegistry::embedded().unwrap();
        let template = registry.template("/sessions").unwrap();
        let mut substitutions = HashMap::new();
        substitutions.insert("themeId".to_string(), "x".to_string());
        assert_eq!(resolve_dynamic_path(template, &substitutions), "/sessions");
    }
}
