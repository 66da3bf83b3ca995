use ratatui::layout::Rect;

use crate::sidebar::SidebarEntry;

/// Rendered sidebar entries plus the layout recorded for hit testing.
#[derive(Debug, Default, Clone)]
pub struct SidebarState {
    pub entries: Vec<SidebarEntry>,
    /// Last rendered area of the sidebar.
    pub last_area: Rect,
    /// Last computed per-entry row areas.
    pub per_item_areas: Vec<Rect>,
}

impl SidebarState {
    pub fn set_entries(&mut self, entries: Vec<SidebarEntry>) {
        self.entries = entries;
        self.per_item_areas.truncate(self.entries.len());
    }

    pub fn active_index(&self) -> Option<usize> {
        self.entries.iter().position(|entry| entry.active)
    }
}
