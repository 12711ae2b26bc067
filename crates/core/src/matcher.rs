//! Match detector - connected groups and lane runs
//!
//! Cluster mode flood-fills over the six-neighbour relation once per element
//! type, in catalog order, scanning seeds bottom row first. Lane mode collects
//! straight runs instead (see [`crate::lanes`]).
//!
//! Groups returned from one pass are always pairwise disjoint. What happens to
//! cells of a group that is too small is governed by [`DiscardPolicy`]: with
//! `Claim` they stay claimed for the rest of the pass, so a cell bordering two
//! clusters goes to whichever type is scanned first.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::catalog::ElementCatalog;
use crate::lanes::{find_lane_runs, merge_runs, run_length_through};
use crate::types::{Coord, ElementId, Lane, DEFAULT_MIN_GROUP_SIZE};

/// Fate of sub-threshold flood-fill candidates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscardPolicy {
    /// Stay claimed for the remaining type scans of the pass
    #[default]
    Claim,
    /// Remain eligible for later type scans
    Release,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Unrestricted six-neighbour flood fill
    #[default]
    Cluster,
    /// Straight runs along configured lanes
    Lanes,
}

impl MatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchMode::Cluster => "cluster",
            MatchMode::Lanes => "lanes",
        }
    }
}

/// One group of matching elements
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchGroup {
    /// Type that was scanned when the group was found
    pub kind: ElementId,
    /// Seed first, no duplicates
    pub cells: Vec<Coord>,
    /// Lane of the run the group came from (lane mode only)
    pub lane: Option<Lane>,
}

impl MatchGroup {
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, c: Coord) -> bool {
        self.cells.contains(&c)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detector {
    pub mode: MatchMode,
    pub min_group_size: usize,
    pub discard: DiscardPolicy,
    /// Lanes scanned in lane mode
    pub lanes: Vec<Lane>,
}

impl Default for Detector {
    fn default() -> Self {
        Self {
            mode: MatchMode::Cluster,
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
            discard: DiscardPolicy::Claim,
            lanes: Lane::STRAIGHT.to_vec(),
        }
    }
}

impl Detector {
    pub fn cluster(min_group_size: usize) -> Self {
        Self {
            min_group_size,
            ..Self::default()
        }
    }

    pub fn lanes(min_group_size: usize, lanes: &[Lane]) -> Self {
        Self {
            mode: MatchMode::Lanes,
            min_group_size,
            lanes: lanes.to_vec(),
            ..Self::default()
        }
    }

    pub fn with_discard(mut self, discard: DiscardPolicy) -> Self {
        self.discard = discard;
        self
    }

    /// Every group of at least `min_group_size` matching elements
    pub fn detect(&self, board: &Board, catalog: &ElementCatalog) -> Vec<MatchGroup> {
        match self.mode {
            MatchMode::Cluster => self.detect_clusters(board, catalog),
            MatchMode::Lanes => {
                let runs = find_lane_runs(board, catalog, &self.lanes, self.min_group_size);
                merge_runs(&runs)
            }
        }
    }

    fn detect_clusters(&self, board: &Board, catalog: &ElementCatalog) -> Vec<MatchGroup> {
        let grid = board.grid();
        let mut claimed = vec![false; grid.cell_count()];
        let mut groups = Vec::new();

        for kind in catalog.ids() {
            // Cells already tried during this type's scan.
            let mut visited = claimed.clone();
            for seed in board.coords() {
                let Some(seed_idx) = grid.index(seed) else {
                    continue;
                };
                if visited[seed_idx] {
                    continue;
                }
                let compatible = board
                    .element_kind(seed)
                    .is_some_and(|k| catalog.matches(kind, k));
                if !compatible {
                    continue;
                }

                let cells = flood(board, seed, &mut visited, |k| catalog.matches(kind, k));
                let keep = cells.len() >= self.min_group_size;
                if keep || self.discard == DiscardPolicy::Claim {
                    for c in &cells {
                        if let Some(i) = grid.index(*c) {
                            claimed[i] = true;
                        }
                    }
                }
                if keep {
                    groups.push(MatchGroup {
                        kind,
                        cells,
                        lane: None,
                    });
                }
            }
        }
        groups
    }
}

/// Breadth-first fill from `seed` over playable neighbours holding an element
/// accepted by `accept`, skipping (and marking) `visited` cells
fn flood(
    board: &Board,
    seed: Coord,
    visited: &mut [bool],
    accept: impl Fn(ElementId) -> bool,
) -> Vec<Coord> {
    let grid = board.grid();
    let mut cells = Vec::new();
    let mut queue = VecDeque::new();
    if let Some(i) = grid.index(seed) {
        visited[i] = true;
        queue.push_back(seed);
    }
    while let Some(c) = queue.pop_front() {
        cells.push(c);
        for n in board.neighbors(c) {
            let Some(i) = grid.index(n) else {
                continue;
            };
            if visited[i] {
                continue;
            }
            if board.element_kind(n).is_some_and(&accept) {
                visited[i] = true;
                queue.push_back(n);
            }
        }
    }
    cells
}

/// Full connected cluster of elements matching the one at `at`, regardless of
/// size; empty when `at` holds no element
pub fn connected_group(board: &Board, catalog: &ElementCatalog, at: Coord) -> Vec<Coord> {
    let Some(kind) = board.element_kind(at) else {
        return Vec::new();
    };
    let mut visited = vec![false; board.grid().cell_count()];
    flood(board, at, &mut visited, |k| catalog.matches(kind, k))
}

/// Straight axis with the longest run through `at` inside `cells`
///
/// Ties go to the earlier lane in [`Lane::STRAIGHT`].
pub fn dominant_lane(board: &Board, catalog: &ElementCatalog, cells: &[Coord], at: Coord) -> Lane {
    let mut best = (Lane::Column, 0usize);
    for lane in Lane::STRAIGHT {
        let len = run_length_through(board, catalog, at, lane, |c| cells.contains(&c));
        if len > best.1 {
            best = (lane, len);
        }
    }
    best.0
}
