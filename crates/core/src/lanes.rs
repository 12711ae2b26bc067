//! Lane runs - straight-line matching through the hex grid
//!
//! A run is a maximal sequence of matching elements along one lane. Runs are
//! found independently per lane, so one cell may sit on several runs; those
//! are merged into disjoint groups before removal, keeping the lane of the
//! longest run for special-element creation.

use crate::board::Board;
use crate::catalog::ElementCatalog;
use crate::matcher::MatchGroup;
use crate::types::{Coord, ElementId, Lane};

/// One straight run, cells in forward lane order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneRun {
    pub lane: Lane,
    pub kind: ElementId,
    pub cells: Vec<Coord>,
}

/// All runs of at least `min_len` cells along `lanes`
///
/// Runs are reported by lane in the order given, then by the playable-cell
/// scan order of their first cell.
pub fn find_lane_runs(
    board: &Board,
    catalog: &ElementCatalog,
    lanes: &[Lane],
    min_len: usize,
) -> Vec<LaneRun> {
    let grid = board.grid();
    let mut runs = Vec::new();
    for &lane in lanes {
        for start in board.coords() {
            let Some(kind) = board.element_kind(start) else {
                continue;
            };
            // Only start runs at their first cell.
            let extends_back = grid
                .step(start, lane, false)
                .and_then(|prev| board.element_kind(prev))
                .is_some_and(|prev| catalog.matches(kind, prev));
            if extends_back {
                continue;
            }

            let mut cells = vec![start];
            let mut cur = start;
            while let Some(next) = grid.step(cur, lane, true) {
                match board.element_kind(next) {
                    Some(k) if catalog.matches(kind, k) => {
                        cells.push(next);
                        cur = next;
                    }
                    _ => break,
                }
            }
            if cells.len() >= min_len.max(1) {
                runs.push(LaneRun { lane, kind, cells });
            }
        }
    }
    runs
}

/// Merge runs that share a cell into disjoint groups
///
/// Group order follows the first run of each group; cells keep first-seen
/// order. The group lane is the lane of its longest run (earliest on ties).
pub fn merge_runs(runs: &[LaneRun]) -> Vec<MatchGroup> {
    let mut parent: Vec<usize> = (0..runs.len()).collect();

    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    for i in 0..runs.len() {
        for j in (i + 1)..runs.len() {
            if runs[i].cells.iter().any(|c| runs[j].cells.contains(c)) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[rj.max(ri)] = ri.min(rj);
                }
            }
        }
    }

    let mut groups: Vec<(usize, MatchGroup, usize)> = Vec::new();
    for (i, run) in runs.iter().enumerate() {
        let root = find(&mut parent, i);
        match groups.iter_mut().find(|(r, _, _)| *r == root) {
            Some((_, group, best)) => {
                for &c in &run.cells {
                    if !group.cells.contains(&c) {
                        group.cells.push(c);
                    }
                }
                if run.cells.len() > *best {
                    *best = run.cells.len();
                    group.lane = Some(run.lane);
                }
            }
            None => groups.push((
                root,
                MatchGroup {
                    kind: run.kind,
                    cells: run.cells.clone(),
                    lane: Some(run.lane),
                },
                run.cells.len(),
            )),
        }
    }
    groups.into_iter().map(|(_, g, _)| g).collect()
}

/// Length of the run of `kind`-matching elements through `at` along `lane`,
/// counting only cells accepted by `within`
pub fn run_length_through(
    board: &Board,
    catalog: &ElementCatalog,
    at: Coord,
    lane: Lane,
    within: impl Fn(Coord) -> bool,
) -> usize {
    let Some(kind) = board.element_kind(at) else {
        return 0;
    };
    let mut len = 1;
    for forward in [true, false] {
        let mut cur = at;
        while let Some(next) = board.grid().step(cur, lane, forward) {
            let ok = within(next)
                && board
                    .element_kind(next)
                    .is_some_and(|k| catalog.matches(kind, k));
            if !ok {
                break;
            }
            len += 1;
            cur = next;
        }
    }
    len
}
