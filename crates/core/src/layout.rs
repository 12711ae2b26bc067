//! Board layout - the immutable per-session cell mask
//!
//! Layouts are given as one small integer per cell, rows listed bottom row
//! first (see the cell code table in `hexmatch_types`). Goal codes place a goal
//! tile at session start; once destroyed, the cell is an ordinary playable
//! cell for the rest of the session.

use crate::error::ConfigError;
use crate::hex::{HexGrid, Topology};
use crate::types::{
    Coord, CELL_PLAYABLE, CELL_VOID, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH,
    DEFAULT_GOAL_HEALTH, MAX_GOAL_HEALTH,
};

/// What a layout cell is at session start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellKind {
    Void,
    Playable,
    Goal { health: u8 },
}

impl CellKind {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            CELL_VOID => Some(CellKind::Void),
            CELL_PLAYABLE => Some(CellKind::Playable),
            c if c - 1 <= MAX_GOAL_HEALTH => Some(CellKind::Goal { health: c - 1 }),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            CellKind::Void => CELL_VOID,
            CellKind::Playable => CELL_PLAYABLE,
            CellKind::Goal { health } => health + 1,
        }
    }

    pub fn is_void(self) -> bool {
        matches!(self, CellKind::Void)
    }
}

/// Rows of the default board, bottom row first
const DIAMOND_ROWS: [[u8; DEFAULT_BOARD_WIDTH as usize]; DEFAULT_BOARD_HEIGHT as usize] = [
    [1, 1, 1, DEFAULT_GOAL_HEALTH + 1, 1, DEFAULT_GOAL_HEALTH + 1, 1, 1, 1],
    [1, 1, 1, 1, 0, 1, 1, 1, 1],
    [1, 1, 1, 0, 0, 0, 1, 1, 1],
    [1, 1, 0, 0, 0, 0, 0, 1, 1],
    [1, 0, 0, 0, 0, 0, 0, 0, 1],
];

/// Validated layout: grid dimensions, per-cell kinds and spawn coordinates
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardLayout {
    grid: HexGrid,
    cells: Vec<CellKind>,
    spawn_points: Vec<Coord>,
}

impl BoardLayout {
    /// Build from a flat row-major code list (bottom row first)
    ///
    /// Without explicit spawn points, every playable non-goal cell of the top
    /// row is a spawn point.
    pub fn from_codes(
        width: u8,
        height: u8,
        topology: Topology,
        codes: &[u8],
        spawn_points: Option<Vec<Coord>>,
    ) -> Result<Self, ConfigError> {
        let grid = HexGrid::new(width, height, topology)?;
        if codes.len() != grid.cell_count() {
            return Err(ConfigError::LayoutDimensions {
                width,
                height,
                expected: grid.cell_count(),
                actual: codes.len(),
            });
        }

        let mut cells = Vec::with_capacity(codes.len());
        for (i, &code) in codes.iter().enumerate() {
            let kind = CellKind::from_code(code).ok_or(ConfigError::InvalidCellCode {
                at: grid.coord_at(i),
                code,
            })?;
            cells.push(kind);
        }
        if cells.iter().all(|k| k.is_void()) {
            return Err(ConfigError::EmptyLayout);
        }

        let spawn_points = match spawn_points {
            Some(points) => points,
            None => {
                let top = height as i16 - 1;
                (0..width as i16)
                    .map(|x| Coord::new(x, top))
                    .filter(|&c| grid.index(c).map(|i| cells[i]) == Some(CellKind::Playable))
                    .collect()
            }
        };
        if spawn_points.is_empty() {
            return Err(ConfigError::NoSpawnPoints);
        }
        for &p in &spawn_points {
            match grid.index(p).map(|i| cells[i]) {
                Some(CellKind::Playable) => {}
                _ => return Err(ConfigError::InvalidSpawnPoint(p)),
            }
        }

        Ok(Self {
            grid,
            cells,
            spawn_points,
        })
    }

    /// Build from rows (bottom row first); width is taken from the first row
    pub fn from_rows(
        topology: Topology,
        rows: &[Vec<u8>],
        spawn_points: Option<Vec<Coord>>,
    ) -> Result<Self, ConfigError> {
        let width = rows.first().map_or(0, |r| r.len());
        let height = rows.len();
        if let Some((row, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(ConfigError::RowLength {
                row,
                expected: width,
                actual: r.len(),
            });
        }
        let codes: Vec<u8> = rows.iter().flatten().copied().collect();
        let (w, h) = match (u8::try_from(width), u8::try_from(height)) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(ConfigError::LayoutDimensions {
                    width: u8::MAX,
                    height: u8::MAX,
                    expected: usize::from(u8::MAX) * usize::from(u8::MAX),
                    actual: codes.len(),
                })
            }
        };
        Self::from_codes(w, h, topology, &codes, spawn_points)
    }

    /// The 9-wide mirrored board: full bottom row narrowing toward two spawn
    /// corners, with two goal tiles in the bottom row
    pub fn diamond() -> Self {
        let grid = HexGrid::diamond();
        let cells = DIAMOND_ROWS
            .iter()
            .flatten()
            .map(|&code| CellKind::from_code(code).unwrap_or(CellKind::Void))
            .collect();
        let top = DEFAULT_BOARD_HEIGHT as i16 - 1;
        let right = DEFAULT_BOARD_WIDTH as i16 - 1;
        Self {
            grid,
            cells,
            spawn_points: vec![Coord::new(0, top), Coord::new(right, top)],
        }
    }

    pub fn grid(&self) -> &HexGrid {
        &self.grid
    }

    pub fn width(&self) -> u8 {
        self.grid.width()
    }

    pub fn height(&self) -> u8 {
        self.grid.height()
    }

    /// Kind at `c`; out-of-range coordinates read as void
    pub fn kind(&self, c: Coord) -> CellKind {
        self.grid
            .index(c)
            .map_or(CellKind::Void, |i| self.cells[i])
    }

    pub fn is_void(&self, c: Coord) -> bool {
        self.kind(c).is_void()
    }

    pub fn spawn_points(&self) -> &[Coord] {
        &self.spawn_points
    }

    /// Goal tiles placed at session start with their initial health
    pub fn goals(&self) -> impl Iterator<Item = (Coord, u8)> + '_ {
        self.cells.iter().enumerate().filter_map(|(i, k)| match *k {
            CellKind::Goal { health } => Some((self.grid.coord_at(i), health)),
            _ => None,
        })
    }

    pub fn goal_count(&self) -> usize {
        self.goals().count()
    }

    /// Non-void cells
    pub fn playable_count(&self) -> usize {
        self.cells.iter().filter(|k| !k.is_void()).count()
    }

    /// Layout codes as rows, bottom row first
    pub fn rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.grid.width() as usize)
            .map(|row| row.iter().map(|k| k.code()).collect())
            .collect()
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::diamond()
    }
}
