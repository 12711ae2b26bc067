//! Refill - spawn at the top, compact toward the bottom, repeat until full
//!
//! One iteration spawns an element at every empty spawn point, then runs a
//! single compaction sweep over the board (bottom row first, left to right).
//! Each element moves at most one step per sweep: straight down if that cell
//! is empty, otherwise to the lower neighbour toward the centre column. Cells
//! that received an element during the sweep are skipped for the rest of it.
//!
//! A layout in which some cell can never be reached stalls; the iteration cap
//! turns that into [`ConfigError::RefillStalled`] instead of a hang.

use tracing::{trace, warn};

use crate::board::{Board, Element};
use crate::catalog::ElementCatalog;
use crate::effects::{EffectsSink, SpawnRequest};
use crate::error::ConfigError;
use crate::rng::{FillMode, TypeSource};
use crate::types::{Coord, Lane};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefillReport {
    /// Spawn/compaction rounds run
    pub iterations: u32,
    /// Cells new elements were spawned at, in spawn order
    pub spawned: Vec<Coord>,
    /// Single-step moves made by compaction
    pub moves: usize,
}

/// Fill every empty playable cell
pub fn fill_until_full<E: EffectsSink + ?Sized>(
    board: &mut Board,
    catalog: &ElementCatalog,
    source: &mut dyn TypeSource,
    mode: FillMode,
    effects: &mut E,
    pool_tag: &str,
    iteration_cap: u32,
) -> Result<RefillReport, ConfigError> {
    let mut report = RefillReport::default();
    let spawn_points = board.layout().spawn_points().to_vec();

    while !board.is_full() {
        if report.iterations >= iteration_cap {
            let empty_cells = board.empty_count();
            warn!(
                iterations = report.iterations,
                empty_cells, "refill stalled before the board was full"
            );
            return Err(ConfigError::RefillStalled {
                iterations: report.iterations,
                empty_cells,
            });
        }
        report.iterations += 1;

        for &at in &spawn_points {
            if !board.is_empty_cell(at) {
                continue;
            }
            let kind = source.next_type(mode, catalog.len());
            let material = catalog.get(kind).map_or("", |t| t.material.as_str());
            let handle = effects.spawn_visual(SpawnRequest {
                pool_tag,
                material,
                at: board.metrics().spawn_position(board.grid(), at),
            });
            board.place_element(
                at,
                Element {
                    handle: Some(handle),
                    ..Element::new(kind)
                },
            );
            report.spawned.push(at);
        }

        let moved = compaction_pass(board);
        report.moves += moved;
        trace!(
            iteration = report.iterations,
            moved,
            empty = board.empty_count(),
            "refill iteration"
        );
    }

    Ok(report)
}

/// One sweep; returns the number of elements moved
pub fn compaction_pass(board: &mut Board) -> usize {
    let grid = *board.grid();
    let mut forbidden = vec![false; grid.cell_count()];
    let mut moved = 0;

    let coords: Vec<Coord> = board.coords().collect();
    for c in coords {
        let Some(idx) = grid.index(c) else {
            continue;
        };
        if forbidden[idx] || board.element(c).is_none() {
            continue;
        }
        let Some(to) = fall_target(board, c) else {
            continue;
        };
        board.move_occupant(c, to);
        if let Some(i) = grid.index(to) {
            forbidden[i] = true;
        }
        moved += 1;
    }
    moved
}

/// Where the element at `c` falls this sweep, if anywhere
pub fn fall_target(board: &Board, c: Coord) -> Option<Coord> {
    let down = c.offset(0, -1);
    if board.is_empty_cell(down) {
        return Some(down);
    }
    let grid = board.grid();
    let diagonal = if grid.toward_center(c.x) > 0 {
        grid.step(c, Lane::Falling, true)
    } else {
        grid.step(c, Lane::Rising, false)
    }?;
    board.is_empty_cell(diagonal).then_some(diagonal)
}
