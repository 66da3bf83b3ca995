//! Sidebar model: what a signed-in user actually sees.
//!
//! Built from a reconciled [`RoleNavConfig`]: hidden items are dropped,
//! disabled items stay in place but are inert, dynamic paths are resolved
//! against the navigation context and each enabled item with a notification
//! source gets a badge.

use std::collections::HashMap;

use selftape_engine::NotificationCounter;
use selftape_registry::resolve_state_path;
use selftape_types::{NavItemState, RoleNavConfig};

use crate::icons::IconRegistry;

/// Largest count shown verbatim on a badge.
pub const BADGE_CAP: u32 = 9;

/// Where the user is and which entities dynamic links should point at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavigationContext {
    pub user_id: String,
    pub current_path: String,
    /// Placeholder values such as `themeId`; missing ones fall back to sentinels.
    pub substitutions: HashMap<String, String>,
}

impl NavigationContext {
    pub fn new(user_id: impl Into<String>, current_path: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            current_path: current_path.into(),
            substitutions: HashMap::new(),
        }
    }

    pub fn with_substitution(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.substitutions.insert(name.into(), value.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SidebarEntry {
    pub id: String,
    pub label: String,
    pub icon: &'static str,
    pub href: String,
    pub enabled: bool,
    pub active: bool,
    pub badge: Option<String>,
}

impl SidebarEntry {
    /// Where activating this entry navigates to; `None` for inert entries.
    pub fn target(&self) -> Option<&str> {
        self.enabled.then_some(self.href.as_str())
    }
}

/// Badge text for an unread count: nothing for zero, `9+` past the cap.
pub fn format_badge(count: u32) -> Option<String> {
    match count {
        0 => None,
        count if count > BADGE_CAP => Some(format!("{BADGE_CAP}+")),
        count => Some(count.to_string()),
    }
}

fn trim_trailing_slash(path: &str) -> &str {
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}

/// Whether `href` is the active link for `current_path`.
///
/// Exact items match only their own path. Others also match any descendant
/// path, split on segment boundaries so `/courses` does not claim
/// `/courses-archive`.
pub fn is_active(href: &str, current_path: &str, exact_match: bool) -> bool {
    let href = trim_trailing_slash(href);
    let current = trim_trailing_slash(current_path);
    if href == current {
        return true;
    }
    if exact_match {
        return false;
    }
    if href == "/" {
        return true;
    }
    current.strip_prefix(href).is_some_and(|rest| rest.starts_with('/'))
}

fn entry_for(item: &NavItemState, context: &NavigationContext, counter: &dyn NotificationCounter, icons: &IconRegistry) -> SidebarEntry {
    let href = resolve_state_path(item, &context.substitutions);
    let enabled = !item.is_disabled;
    let badge = match (&item.notification_source, enabled) {
        (Some(source), true) => format_badge(counter.unread_count(&context.user_id, source)),
        _ => None,
    };
    SidebarEntry {
        id: item.id.clone(),
        label: item.display_title().to_string(),
        icon: icons.glyph(&item.icon_key),
        active: enabled && is_active(&href, &context.current_path, item.exact_match),
        href,
        enabled,
        badge,
    }
}

/// Renders the reconciled list into sidebar entries, in list order.
pub fn build_sidebar(
    config: &RoleNavConfig,
    context: &NavigationContext,
    counter: &dyn NotificationCounter,
    icons: &IconRegistry,
) -> Vec<SidebarEntry> {
    config
        .visible_items()
        .map(|item| entry_for(item, context, counter, icons))
        .collect()
}
