//! Plain-data snapshots of a board and a session
//!
//! The text form matches the picture format accepted by [`Board::paint`]:
//! rows top first, one space-separated token per column.
//!
//! | Token | Cell |
//! |-------|------|
//! | `.` | void |
//! | `_` | empty |
//! | `a`..`z` | element of type 0..25 |
//! | `A`..`Z` | special element of type 0..25 |
//! | `1`..`8` | goal tile with that much health |
//! | `?` | element type beyond `z` |

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, Occupant};
use crate::types::{Coord, ElementId, GameOutcome, Lane, TurnPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "cell", rename_all = "snake_case")]
pub enum CellSnapshot {
    Void,
    Empty,
    Element {
        kind: ElementId,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        charge: Option<Lane>,
    },
    Goal {
        health: u8,
    },
}

impl CellSnapshot {
    pub fn token(self) -> char {
        match self {
            CellSnapshot::Void => '.',
            CellSnapshot::Empty => '_',
            CellSnapshot::Element { kind, charge } => {
                let Some(offset) = u8::try_from(kind.index()).ok().filter(|&i| i < 26) else {
                    return '?';
                };
                let base = if charge.is_some() { b'A' } else { b'a' };
                char::from(base + offset)
            }
            CellSnapshot::Goal { health } => char::from_digit(u32::from(health), 10).unwrap_or('#'),
        }
    }

    fn hash_bytes(self) -> [u8; 3] {
        match self {
            CellSnapshot::Void => [0, 0, 0],
            CellSnapshot::Empty => [1, 0, 0],
            CellSnapshot::Element { kind, charge } => {
                [2, kind.0, charge.map_or(0, |l| l as u8 + 1)]
            }
            CellSnapshot::Goal { health } => [3, health, 0],
        }
    }
}

/// Cells in row-major order, bottom row first
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub width: u8,
    pub height: u8,
    pub cells: Vec<CellSnapshot>,
}

impl BoardSnapshot {
    pub fn from_board(board: &Board) -> Self {
        let grid = board.grid();
        let cells = grid
            .coords()
            .map(|c| match board.get(c) {
                None => CellSnapshot::Void,
                Some(Occupant::Empty) => CellSnapshot::Empty,
                Some(Occupant::Element(e)) => CellSnapshot::Element {
                    kind: e.kind,
                    charge: e.charge,
                },
                Some(Occupant::Goal(g)) => CellSnapshot::Goal { health: g.health },
            })
            .collect();
        Self {
            width: grid.width(),
            height: grid.height(),
            cells,
        }
    }

    pub fn get(&self, c: Coord) -> CellSnapshot {
        let in_range =
            c.x >= 0 && c.y >= 0 && (c.x as u8) < self.width && (c.y as u8) < self.height;
        if !in_range {
            return CellSnapshot::Void;
        }
        let idx = c.y as usize * self.width as usize + c.x as usize;
        self.cells.get(idx).copied().unwrap_or(CellSnapshot::Void)
    }

    /// Picture rows, top row first
    pub fn rows(&self) -> Vec<String> {
        let width = usize::from(self.width).max(1);
        self.cells
            .chunks(width)
            .rev()
            .map(|row| {
                row.iter()
                    .map(|cell| cell.token().to_string())
                    .collect::<Vec<_>>()
                    .join(" ")
            })
            .collect()
    }

    /// FNV-1a over the cell contents; equal boards hash equal across runs
    pub fn board_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf29ce484222325;
        const PRIME: u64 = 0x100000001b3;

        let mut state = OFFSET_BASIS;
        let header = [self.width, self.height];
        let bytes = header
            .into_iter()
            .chain(self.cells.iter().flat_map(|c| c.hash_bytes()));
        for b in bytes {
            state ^= u64::from(b);
            state = state.wrapping_mul(PRIME);
        }
        state
    }

    pub fn element_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|c| matches!(c, CellSnapshot::Element { .. }))
            .count()
    }
}

impl fmt::Display for BoardSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, row) in self.rows().iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            f.write_str(row)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub board: BoardSnapshot,
    pub phase: TurnPhase,
    pub moves_left: u32,
    pub goals_left: u32,
    pub outcome: Option<GameOutcome>,
    pub episode: u32,
}

impl SessionSnapshot {
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// True when a swap request would be considered
    pub fn playable(&self) -> bool {
        self.outcome.is_none() && self.phase == TurnPhase::Idle
    }
}
