//! Swap hints - which swaps on a settled board would make a match
//!
//! Every candidate is tried on a scratch copy of the board, so the result is
//! exactly what the resolver would see. Meant for idle boards; on a board that
//! already holds matches every legal swap qualifies.

use hexmatch_core::{Board, Detector, ElementCatalog};
use hexmatch_types::Coord;

/// A swap with the number of cells its first round would remove
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapHint {
    pub a: Coord,
    pub b: Coord,
    pub removed: usize,
}

/// All matching swaps, each pair once with `a < b`, in scan order
pub fn find_matching_swaps(
    board: &Board,
    catalog: &ElementCatalog,
    detector: &Detector,
) -> Vec<SwapHint> {
    let mut hints = Vec::new();
    scan(board, catalog, detector, |hint| {
        hints.push(hint);
        true
    });
    hints
}

pub fn has_matching_swap(board: &Board, catalog: &ElementCatalog, detector: &Detector) -> bool {
    let mut found = false;
    scan(board, catalog, detector, |_| {
        found = true;
        false
    });
    found
}

/// The swap removing the most cells; the earliest one on ties
pub fn best_swap(board: &Board, catalog: &ElementCatalog, detector: &Detector) -> Option<SwapHint> {
    find_matching_swaps(board, catalog, detector)
        .into_iter()
        .fold(None, |best: Option<SwapHint>, hint| match best {
            Some(b) if b.removed >= hint.removed => Some(b),
            _ => Some(hint),
        })
}

/// Calls `visit` per matching swap until it returns false
fn scan(
    board: &Board,
    catalog: &ElementCatalog,
    detector: &Detector,
    mut visit: impl FnMut(SwapHint) -> bool,
) {
    let mut scratch = board.clone();
    for a in board.coords() {
        for b in board.neighbors(a) {
            if b < a || board.check_swap(a, b).is_some() {
                continue;
            }
            if scratch.swap(a, b).is_err() {
                continue;
            }
            let removed: usize = detector
                .detect(&scratch, catalog)
                .iter()
                .map(|g| g.len())
                .sum();
            if scratch.swap(a, b).is_err() {
                scratch.clone_from(board);
            }
            if removed > 0 && !visit(SwapHint { a, b, removed }) {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexmatch_core::{BoardLayout, HexMetrics};
    use hexmatch_types::Lane;

    fn board(rows: &[&str]) -> Board {
        let mut board = Board::new(BoardLayout::diamond(), HexMetrics::default());
        board.paint(rows).unwrap();
        board
    }

    const FIRST_FILL: [&str; 5] = [
        "c . . . . . . . b",
        "c a . . . . . e d",
        "b a d . . . c b c",
        "a e d b . a e a b",
        "b d c 2 e 2 d e c",
    ];

    fn c(x: i16, y: i16) -> Coord {
        Coord::new(x, y)
    }

    #[test]
    fn test_finds_every_matching_swap() {
        let board = board(&FIRST_FILL);
        let catalog = ElementCatalog::standard(5).unwrap();
        let hints = find_matching_swaps(&board, &catalog, &Detector::default());
        let pairs: Vec<_> = hints.iter().map(|h| (h.a, h.b)).collect();
        assert_eq!(
            pairs,
            vec![
                (c(1, 0), c(1, 1)),
                (c(1, 0), c(2, 0)),
                (c(0, 1), c(0, 2)),
                (c(0, 1), c(1, 1)),
            ]
        );
        assert!(hints.iter().all(|h| h.removed == 3));
        assert!(has_matching_swap(&board, &catalog, &Detector::default()));
    }

    #[test]
    fn test_hints_agree_with_a_fresh_board_per_swap() {
        let board = board(&FIRST_FILL);
        let catalog = ElementCatalog::standard(5).unwrap();
        let detector = Detector::lanes(2, &Lane::ALL);

        let mut expected = Vec::new();
        for a in board.coords() {
            for b in board.neighbors(a) {
                if b < a {
                    continue;
                }
                let mut fresh = board.clone();
                if fresh.swap(a, b).is_err() {
                    continue;
                }
                let removed: usize = detector.detect(&fresh, &catalog).iter().map(|g| g.len()).sum();
                if removed > 0 {
                    expected.push(SwapHint { a, b, removed });
                }
            }
        }
        assert!(!expected.is_empty());
        assert_eq!(find_matching_swaps(&board, &catalog, &detector), expected);
    }

    #[test]
    fn test_scan_leaves_board_untouched() {
        let board = board(&FIRST_FILL);
        let before = board.clone();
        let catalog = ElementCatalog::standard(5).unwrap();
        find_matching_swaps(&board, &catalog, &Detector::default());
        assert_eq!(board, before);
    }

    #[test]
    fn test_best_swap_prefers_larger_groups() {
        let board = board(&[
            "b . . . . . . . c",
            "b e . . . . . e d",
            "d a b . . . b e c",
            "e b c b . e d d a",
            "a d b 2 c 2 b a d",
        ]);
        let catalog = ElementCatalog::standard(5).unwrap();
        let best = best_swap(&board, &catalog, &Detector::default()).unwrap();
        assert_eq!((best.a, best.b, best.removed), (c(1, 1), c(1, 2), 5));
    }

    #[test]
    fn test_no_hint_without_moves() {
        let board = board(&[
            "b . . . . . . . d",
            "e d . . . . . a b",
            "b a c . . . d e d",
            "e c d e . b a c e",
            "c a b 2 c 2 b d b",
        ]);
        let catalog = ElementCatalog::standard(5).unwrap();
        assert!(!has_matching_swap(&board, &catalog, &Detector::default()));
        assert_eq!(best_swap(&board, &catalog, &Detector::default()), None);
    }
}
