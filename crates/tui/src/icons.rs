//! Icon registry: maps catalog icon keys to terminal glyphs.
//!
//! Lookups never fail. Unknown keys resolve to the glyph registered under
//! [`FALLBACK_ICON`] and are logged once per key at debug level.

use std::collections::HashSet;
use std::sync::Mutex;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

/// Key whose glyph stands in for any unknown icon key.
pub const FALLBACK_ICON: &str = "dot";

static GLYPHS: Lazy<IndexMap<&'static str, &'static str>> = Lazy::new(|| {
    IndexMap::from([
        (FALLBACK_ICON, "•"),
        ("home", "⌂"),
        ("video", "▶"),
        ("film", "▣"),
        ("message", "✎"),
        ("inbox", "✉"),
        ("clock", "◷"),
        ("book", "▤"),
        ("hourglass", "⧗"),
        ("graduation", "◆"),
        ("calendar", "▦"),
        ("mail", "✉"),
        ("user", "☺"),
        ("users", "☻"),
        ("palette", "◐"),
        ("menu", "≡"),
    ])
});

static REPORTED_UNKNOWN: Lazy<Mutex<HashSet<String>>> = Lazy::new(|| Mutex::new(HashSet::new()));

#[derive(Debug, Default, Clone, Copy)]
pub struct IconRegistry;

impl IconRegistry {
    /// Glyph for `key`, or the fallback glyph when the key is unknown.
    pub fn glyph(&self, key: &str) -> &'static str {
        if let Some(glyph) = GLYPHS.get(key).copied() {
            return glyph;
        }
        let mut reported = REPORTED_UNKNOWN.lock().expect("icon report lock poisoned");
        if reported.insert(key.to_string()) {
            tracing::debug!(icon_key = key, "unknown icon key; using fallback");
        }
        GLYPHS[FALLBACK_ICON]
    }

    pub fn contains(&self, key: &str) -> bool {
        GLYPHS.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> {
        GLYPHS.keys().copied()
    }
}
