//! Hex adjacency model - coordinates, neighbour tables, lanes, world positions
//!
//! The board is stored as a rectangle of columns. Neighbouring columns are
//! shifted half a cell against each other, so the six neighbours of a cell
//! depend on which column it sits in:
//!
//! - [`Topology::OffsetColumns`]: odd columns sit half a cell higher; the
//!   neighbour table is picked by column parity.
//! - [`Topology::MirroredAtCenter`]: every column toward the centre sits half
//!   a cell higher than the one before it, so the packing direction flips at
//!   the centre column; the table is picked by left / centre / right.
//!
//! All functions here are pure. Vertical shifts are tracked in half cells
//! (`half_offset`) which keeps lane stepping in integer arithmetic.

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{
    Coord, Lane, WorldPos, DEFAULT_BOARD_HEIGHT, DEFAULT_BOARD_WIDTH, DEFAULT_ELEMENT_WIDTH,
    DEFAULT_HEX_GAP, DEFAULT_HEX_HEIGHT, DEFAULT_HEX_WIDTH,
};

/// Neighbour offsets `(dx, dy)` for an even column of an offset-column board
pub const OFFSET_EVEN: [(i16, i16); 6] = [(0, 1), (0, -1), (1, 0), (1, -1), (-1, 0), (-1, -1)];

/// Neighbour offsets `(dx, dy)` for an odd column of an offset-column board
pub const OFFSET_ODD: [(i16, i16); 6] = [(0, 1), (0, -1), (1, 1), (1, 0), (-1, 1), (-1, 0)];

/// Neighbour offsets left of the centre column of a mirrored board
pub const MIRRORED_LEFT: [(i16, i16); 6] = [(0, 1), (0, -1), (1, 0), (1, -1), (-1, 1), (-1, 0)];

/// Neighbour offsets on the centre column of a mirrored board
pub const MIRRORED_CENTER: [(i16, i16); 6] =
    [(0, 1), (0, -1), (1, 1), (1, 0), (-1, 1), (-1, 0)];

/// Neighbour offsets right of the centre column of a mirrored board
pub const MIRRORED_RIGHT: [(i16, i16); 6] = [(0, 1), (0, -1), (1, 1), (1, 0), (-1, 0), (-1, -1)];

/// Column packing scheme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topology {
    /// Odd columns raised by half a cell
    OffsetColumns,
    /// Columns rise toward the centre column and fall again after it
    #[default]
    MirroredAtCenter,
}

/// Dimensions plus topology: everything needed to answer adjacency questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexGrid {
    width: u8,
    height: u8,
    topology: Topology,
}

impl HexGrid {
    pub fn new(width: u8, height: u8, topology: Topology) -> Result<Self, ConfigError> {
        if width == 0 || height == 0 {
            return Err(ConfigError::EmptyLayout);
        }
        if topology == Topology::MirroredAtCenter && width % 2 == 0 {
            return Err(ConfigError::MirroredEvenWidth(width));
        }
        Ok(Self {
            width,
            height,
            topology,
        })
    }

    /// Grid of the default 9x5 mirrored board
    pub(crate) const fn diamond() -> Self {
        Self {
            width: DEFAULT_BOARD_WIDTH,
            height: DEFAULT_BOARD_HEIGHT,
            topology: Topology::MirroredAtCenter,
        }
    }

    pub fn width(&self) -> u8 {
        self.width
    }

    pub fn height(&self) -> u8 {
        self.height
    }

    pub fn topology(&self) -> Topology {
        self.topology
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, c: Coord) -> bool {
        c.x >= 0 && c.x < self.width as i16 && c.y >= 0 && c.y < self.height as i16
    }

    /// Flat row-major index (`y * width + x`), `None` when out of range
    #[inline(always)]
    pub fn index(&self, c: Coord) -> Option<usize> {
        if !self.contains(c) {
            return None;
        }
        Some(c.y as usize * self.width as usize + c.x as usize)
    }

    pub fn coord_at(&self, index: usize) -> Coord {
        let w = self.width as usize;
        Coord::new((index % w) as i16, (index / w) as i16)
    }

    /// All coordinates, bottom row first, left to right
    pub fn coords(&self) -> impl Iterator<Item = Coord> {
        let (w, h) = (self.width as i16, self.height as i16);
        (0..h).flat_map(move |y| (0..w).map(move |x| Coord::new(x, y)))
    }

    pub fn center_column(&self) -> i16 {
        (self.width / 2) as i16
    }

    /// Horizontal direction toward the centre column (`-1` on and right of it)
    pub fn toward_center(&self, x: i16) -> i16 {
        if self.center_column() > x {
            1
        } else {
            -1
        }
    }

    /// Literal neighbour table for a column
    pub fn neighbor_offsets(&self, x: i16) -> &'static [(i16, i16); 6] {
        match self.topology {
            Topology::OffsetColumns => {
                if x.rem_euclid(2) == 0 {
                    &OFFSET_EVEN
                } else {
                    &OFFSET_ODD
                }
            }
            Topology::MirroredAtCenter => {
                let center = self.center_column();
                if x < center {
                    &MIRRORED_LEFT
                } else if x == center {
                    &MIRRORED_CENTER
                } else {
                    &MIRRORED_RIGHT
                }
            }
        }
    }

    /// In-range neighbours of `c` (void cells are filtered by the board, not here)
    pub fn neighbors(&self, c: Coord) -> ArrayVec<Coord, 6> {
        let mut out = ArrayVec::new();
        if !self.contains(c) {
            return out;
        }
        for &(dx, dy) in self.neighbor_offsets(c.x) {
            let n = c.offset(dx, dy);
            if self.contains(n) {
                out.push(n);
            }
        }
        out
    }

    /// Table lookup; never true for `a == b` or out-of-range coordinates
    pub fn is_neighbor(&self, a: Coord, b: Coord) -> bool {
        if a == b || !self.contains(a) || !self.contains(b) {
            return false;
        }
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        self.neighbor_offsets(a.x).contains(&(dx, dy))
    }

    /// Vertical shift of a column in half cells
    pub fn half_offset(&self, x: i16) -> i32 {
        match self.topology {
            Topology::OffsetColumns => (x as i32).rem_euclid(2),
            Topology::MirroredAtCenter => {
                let x = x as i32;
                x.min(self.width as i32 - 1 - x)
            }
        }
    }

    /// Next cell along `lane`, or `None` past the edge of the grid
    pub fn step(&self, c: Coord, lane: Lane, forward: bool) -> Option<Coord> {
        let (dx, dh) = lane.step();
        let (dx, dh) = if forward { (dx, dh) } else { (-dx, -dh) };
        let nx = c.x + dx;
        if nx < 0 || nx >= self.width as i16 {
            return None;
        }
        let doubled = 2 * c.y as i32 + self.half_offset(c.x) + dh - self.half_offset(nx);
        debug_assert!(doubled % 2 == 0, "lane step landed between rows");
        let next = Coord::new(nx, (doubled / 2) as i16);
        self.contains(next).then_some(next)
    }

    /// Every in-range cell on `lane` through `origin`, origin excluded
    ///
    /// Forward cells come first (nearest first), then backward cells.
    pub fn lane_path(&self, origin: Coord, lane: Lane) -> Vec<Coord> {
        let mut out = Vec::new();
        for forward in [true, false] {
            let mut cur = origin;
            while let Some(next) = self.step(cur, lane, forward) {
                out.push(next);
                cur = next;
            }
        }
        out
    }
}

/// Hex spacing used to place cells in world space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HexMetrics {
    pub hex_width: f32,
    pub hex_height: f32,
    pub gap: f32,
    pub element_width: f32,
}

impl Default for HexMetrics {
    fn default() -> Self {
        Self {
            hex_width: DEFAULT_HEX_WIDTH,
            hex_height: DEFAULT_HEX_HEIGHT,
            gap: DEFAULT_HEX_GAP,
            element_width: DEFAULT_ELEMENT_WIDTH,
        }
    }
}

impl HexMetrics {
    /// Cell width and height with the gap applied
    pub fn spacing(&self) -> (f32, f32) {
        (
            self.hex_width * (1.0 + self.gap),
            self.hex_height * (1.0 + self.gap),
        )
    }

    /// World position of cell `(0, 0)` before its column shift; centres the board
    pub fn origin(&self, grid: &HexGrid) -> WorldPos {
        let (w, h) = self.spacing();
        WorldPos::new(
            -w * 0.75 * (grid.width() as f32 / 2.0),
            -h * (grid.height() as f32 / 2.0),
        )
    }

    pub fn to_world(&self, grid: &HexGrid, c: Coord) -> WorldPos {
        let (w, h) = self.spacing();
        let origin = self.origin(grid);
        let shift = grid.half_offset(c.x) as f32 * 0.5;
        WorldPos::new(
            origin.x + c.x as f32 * w * 0.75,
            origin.y + (c.y as f32 + shift) * h,
        )
    }

    /// Where a freshly spawned element starts: one cell above its target
    pub fn spawn_position(&self, grid: &HexGrid, c: Coord) -> WorldPos {
        let target = self.to_world(grid, c);
        WorldPos::new(target.x, target.y + self.spacing().1)
    }

    /// Grid coordinate under a world point
    ///
    /// `tight` restricts the hit box to the element sprite instead of the hex.
    pub fn pick(&self, grid: &HexGrid, pos: WorldPos, tight: bool) -> Option<Coord> {
        let half = if tight {
            self.element_width / 2.0
        } else {
            (self.spacing().1 - self.gap) / 2.0
        };
        grid.coords().find(|&c| {
            let centre = self.to_world(grid, c);
            (pos.x - centre.x).abs() <= half && (pos.y - centre.y).abs() <= half
        })
    }
}
