//! Pointer gesture to swap request
//!
//! Press on an element to grab it, drag over a neighbour and release there to
//! ask for a swap. The tracker only decides *what* the gesture means; drawing
//! the highlight is left to a [`SelectionFeedback`] implementation.
//!
//! Pointer positions are grid coordinates; hosts convert screen points with
//! [`Board::pick`] first. `None` means the pointer is outside the board.

use hexmatch_core::Board;
use hexmatch_types::Coord;
use tracing::{debug, trace};

/// Highlight callbacks driven by the tracker
pub trait SelectionFeedback {
    fn highlight(&mut self, at: Coord);
    fn unhighlight(&mut self, at: Coord);
    fn clear_highlights(&mut self);
}

/// Feedback sink that draws nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl SelectionFeedback for NoFeedback {
    fn highlight(&mut self, _at: Coord) {}
    fn unhighlight(&mut self, _at: Coord) {}
    fn clear_highlights(&mut self) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTracker {
    selected: Coord,
    hovered: Coord,
}

impl Default for SelectionTracker {
    fn default() -> Self {
        Self {
            selected: Coord::NULL,
            hovered: Coord::NULL,
        }
    }
}

impl SelectionTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grabbed element, if any
    pub fn selected(&self) -> Option<Coord> {
        (!self.selected.is_null()).then_some(self.selected)
    }

    pub fn hovered(&self) -> Option<Coord> {
        (!self.hovered.is_null()).then_some(self.hovered)
    }

    /// Pointer pressed; returns true if an element was grabbed
    ///
    /// Ignored while a turn is resolving. Goals and empty cells cannot be
    /// grabbed.
    pub fn press<F: SelectionFeedback + ?Sized>(
        &mut self,
        board: &Board,
        at: Option<Coord>,
        resolving: bool,
        feedback: &mut F,
    ) -> bool {
        if resolving {
            trace!("press ignored while resolving");
            return false;
        }
        self.hovered = at.unwrap_or(Coord::NULL);
        let Some(at) = at.filter(|&c| board.element(c).is_some()) else {
            return false;
        };
        self.selected = at;
        feedback.highlight(at);
        trace!(%at, "element grabbed");
        true
    }

    /// Pointer moved while pressed
    pub fn hover<F: SelectionFeedback + ?Sized>(
        &mut self,
        board: &Board,
        at: Option<Coord>,
        feedback: &mut F,
    ) {
        if self.selected.is_null() {
            return;
        }
        let at = at.unwrap_or(Coord::NULL);
        if at == self.hovered {
            return;
        }
        if !at.is_null() && board.are_adjacent(self.selected, at) && board.element(at).is_some() {
            feedback.highlight(at);
        }
        if !self.hovered.is_null() && self.hovered != self.selected {
            feedback.unhighlight(self.hovered);
        }
        self.hovered = at;
    }

    /// Pointer released; returns the swap to request, if the gesture ended on
    /// a neighbour of the grabbed element
    pub fn release<F: SelectionFeedback + ?Sized>(
        &mut self,
        board: &Board,
        at: Option<Coord>,
        feedback: &mut F,
    ) -> Option<(Coord, Coord)> {
        if self.selected.is_null() {
            return None;
        }
        let from = self.selected;
        let swap = at
            .filter(|&to| board.are_adjacent(from, to))
            .map(|to| (from, to));
        match swap {
            Some((a, b)) => debug!(%a, %b, "swap gesture"),
            None => trace!(%from, "released away from a neighbour"),
        }
        self.cancel(feedback);
        swap
    }

    /// Drop the gesture and every highlight
    pub fn cancel<F: SelectionFeedback + ?Sized>(&mut self, feedback: &mut F) {
        self.selected = Coord::NULL;
        self.hovered = Coord::NULL;
        feedback.clear_highlights();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexmatch_core::{BoardLayout, HexMetrics};

    #[derive(Debug, Default)]
    struct Highlights {
        calls: Vec<String>,
    }

    impl SelectionFeedback for Highlights {
        fn highlight(&mut self, at: Coord) {
            self.calls.push(format!("+{}", at));
        }
        fn unhighlight(&mut self, at: Coord) {
            self.calls.push(format!("-{}", at));
        }
        fn clear_highlights(&mut self) {
            self.calls.push("clear".to_string());
        }
    }

    fn board() -> Board {
        let mut board = Board::new(BoardLayout::diamond(), HexMetrics::default());
        board
            .paint(&[
                "c . . . . . . . b",
                "c a . . . . . e d",
                "b a d . . . c b c",
                "a e d b . a e a b",
                "b d c 2 e 2 d e c",
            ])
            .unwrap();
        board
    }

    fn c(x: i16, y: i16) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn test_drag_to_neighbour_requests_swap() {
        let board = board();
        let mut fx = Highlights::default();
        let mut t = SelectionTracker::new();
        assert!(t.press(&board, Some(c(0, 1)), false, &mut fx));
        t.hover(&board, Some(c(0, 2)), &mut fx);
        assert_eq!(t.release(&board, Some(c(0, 2)), &mut fx), Some((c(0, 1), c(0, 2))));
        assert_eq!(fx.calls, vec!["+0|1", "+0|2", "clear"]);
        assert_eq!(t.selected(), None);
    }

    #[test]
    fn test_hover_moves_highlight() {
        let board = board();
        let mut fx = Highlights::default();
        let mut t = SelectionTracker::new();
        t.press(&board, Some(c(1, 1)), false, &mut fx);
        t.hover(&board, Some(c(1, 2)), &mut fx);
        t.hover(&board, Some(c(1, 2)), &mut fx);
        // (5,1) is not a neighbour: only the previous hover is cleared.
        t.hover(&board, Some(c(5, 1)), &mut fx);
        assert_eq!(fx.calls, vec!["+1|1", "+1|2", "-1|2"]);
        assert_eq!(t.hovered(), Some(c(5, 1)));
    }

    #[test]
    fn test_release_elsewhere_cancels() {
        let board = board();
        let mut fx = NoFeedback;
        let mut t = SelectionTracker::new();
        t.press(&board, Some(c(0, 1)), false, &mut fx);
        assert_eq!(t.release(&board, Some(c(8, 1)), &mut fx), None);
        t.press(&board, Some(c(0, 1)), false, &mut fx);
        assert_eq!(t.release(&board, None, &mut fx), None);
        t.press(&board, Some(c(0, 1)), false, &mut fx);
        assert_eq!(t.release(&board, Some(c(0, 1)), &mut fx), None);
    }

    #[test]
    fn test_goals_and_resolving_block_press() {
        let board = board();
        let mut fx = Highlights::default();
        let mut t = SelectionTracker::new();
        assert!(!t.press(&board, Some(c(3, 0)), false, &mut fx));
        assert!(!t.press(&board, Some(c(0, 1)), true, &mut fx));
        assert!(!t.press(&board, None, false, &mut fx));
        assert_eq!(t.release(&board, Some(c(0, 2)), &mut fx), None);
        assert!(fx.calls.is_empty());
    }
}
