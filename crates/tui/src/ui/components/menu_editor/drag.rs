//! Drag-to-reorder state machine.
//!
//! `Idle -> Dragging -> Idle`. Releasing over a different row yields a
//! reorder; releasing outside the list, over the origin row, or cancelling
//! yields nothing.

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        from: usize,
        /// Row currently under the pointer, if any.
        hover: Option<usize>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    Reordered { from: usize, to: usize },
    NoChange,
}

impl DragState {
    /// Starts dragging row `from` of a list with `len` rows. Refused while a
    /// drag is already in progress or when `from` is out of range.
    pub fn begin(&mut self, from: usize, len: usize) -> bool {
        if self.is_dragging() || from >= len {
            return false;
        }
        *self = Self::Dragging { from, hover: Some(from) };
        true
    }

    pub fn hover(&mut self, target: Option<usize>) {
        if let Self::Dragging { hover, .. } = self {
            *hover = target;
        }
    }

    /// Drops over `target` (`None` when released outside the list).
    pub fn finish(&mut self, target: Option<usize>, len: usize) -> DragOutcome {
        let state = std::mem::take(self);
        match (state, target) {
            (Self::Dragging { from, .. }, Some(to)) if to != from && to < len && from < len => DragOutcome::Reordered { from, to },
            _ => DragOutcome::NoChange,
        }
    }

    pub fn cancel(&mut self) {
        *self = Self::Idle;
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    pub fn dragged_index(&self) -> Option<usize> {
        match self {
            Self::Dragging { from, .. } => Some(*from),
            Self::Idle => None,
        }
    }

    pub fn hover_index(&self) -> Option<usize> {
        match self {
            Self::Dragging { hover, .. } => *hover,
            Self::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_on_another_row_reorders() {
        let mut drag = DragState::default();
        assert!(drag.begin(1, 4));
        drag.hover(Some(3));
        assert_eq!(drag.hover_index(), Some(3));
        assert_eq!(drag.finish(Some(3), 4), DragOutcome::Reordered { from: 1, to: 3 });
        assert_eq!(drag, DragState::Idle);
    }

    #[test]
    fn drop_outside_or_in_place_is_a_no_op() {
        let mut drag = DragState::default();
        drag.begin(2, 4);
        assert_eq!(drag.finish(None, 4), DragOutcome::NoChange);
        assert_eq!(drag, DragState::Idle);

        drag.begin(2, 4);
        assert_eq!(drag.finish(Some(2), 4), DragOutcome::NoChange);

        drag.begin(2, 4);
        assert_eq!(drag.finish(Some(9), 4), DragOutcome::NoChange);
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut drag = DragState::default();
        drag.begin(0, 2);
        drag.cancel();
        assert!(!drag.is_dragging());
        assert_eq!(drag.finish(Some(1), 2), DragOutcome::NoChange);
    }

    #[test]
    fn begin_is_refused_mid_drag_or_out_of_range() {
        let mut drag = DragState::default();
        assert!(!drag.begin(3, 3));
        assert!(drag.begin(0, 3));
        assert!(!drag.begin(1, 3));
        assert_eq!(drag.dragged_index(), Some(0));
    }
}
