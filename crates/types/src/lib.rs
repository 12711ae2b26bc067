//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! Everything here is plain data: the core engine, the engine glue and the
//! headless runner all speak in these types.
//!
//! # Board Conventions
//!
//! - Coordinates are `(x, y)` = (column, row)
//! - Row 0 is the **bottom** row; gravity pulls elements toward row 0
//! - `Coord::NULL` (`-1, -1`) is the "no coordinate" sentinel
//!
//! # Default Rules
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_BOARD_WIDTH` | 9 | Columns of the default board |
//! | `DEFAULT_BOARD_HEIGHT` | 5 | Rows of the default board |
//! | `DEFAULT_ELEMENT_TYPES` | 5 | Element types in the default catalog |
//! | `DEFAULT_MIN_GROUP_SIZE` | 3 | Smallest group that counts as a match |
//! | `DEFAULT_SPECIAL_THRESHOLD` | 5 | Group size that creates a special element |
//! | `DEFAULT_MOVE_BUDGET` | 25 | Moves per session |
//! | `DEFAULT_REFILL_ITERATION_CAP` | 1024 | Spawn/compaction rounds before a refill is declared stalled |
//!
//! # Layout Cell Codes
//!
//! | Code | Meaning |
//! |------|---------|
//! | 0 | Void (never holds anything) |
//! | 1 | Playable |
//! | 2..=9 | Goal tile with `code - 1` health |
//!
//! # Examples
//!
//! ```
//! use hexmatch_types::{Coord, Lane, TurnPhase};
//!
//! let c = Coord::new(3, 1);
//! assert!(!c.is_null());
//! assert!(Coord::NULL.is_null());
//!
//! assert_eq!(Lane::from_str("rising"), Some(Lane::Rising));
//! assert_eq!(Lane::Rising.as_str(), "rising");
//!
//! assert_eq!(TurnPhase::default(), TurnPhase::Idle);
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Columns of the default (diamond) board
pub const DEFAULT_BOARD_WIDTH: u8 = 9;

/// Rows of the default (diamond) board
pub const DEFAULT_BOARD_HEIGHT: u8 = 5;

/// Number of element types in the default catalog
pub const DEFAULT_ELEMENT_TYPES: usize = 5;

/// Smallest connected group that is removed as a match
pub const DEFAULT_MIN_GROUP_SIZE: usize = 3;

/// Group size at which one cell of the group becomes a special element
pub const DEFAULT_SPECIAL_THRESHOLD: usize = 5;

/// Moves available at the start of a session
pub const DEFAULT_MOVE_BUDGET: u32 = 25;

/// Health of the goal tiles placed on the default board
pub const DEFAULT_GOAL_HEALTH: u8 = 2;

/// Seed used for random refills when none is configured
pub const DEFAULT_SEED: u32 = 1;

/// Spawn/compaction rounds allowed before a refill is declared stalled
pub const DEFAULT_REFILL_ITERATION_CAP: u32 = 1024;

/// Logical steps allowed for a single turn before it is declared runaway
pub const DEFAULT_CASCADE_STEP_CAP: u32 = 10_000;

/// Upper bound on catalog size (match relations are stored as 64-bit masks)
pub const MAX_ELEMENT_TYPES: usize = 64;

/// Layout code: void cell
pub const CELL_VOID: u8 = 0;

/// Layout code: ordinary playable cell
pub const CELL_PLAYABLE: u8 = 1;

/// Highest goal health expressible by a layout code (`code = health + 1`)
pub const MAX_GOAL_HEALTH: u8 = 8;

/// Counter delta carried by `GameEvent::SuccessfulMove`
pub const MOVE_DELTA: i32 = -1;

/// Counter delta carried by `GameEvent::GoalDestroyed`
pub const GOAL_DELTA: i32 = -1;

/// Hex cell width before the gap is applied (world units)
pub const DEFAULT_HEX_WIDTH: f32 = 0.75;

/// Hex cell height before the gap is applied (world units)
pub const DEFAULT_HEX_HEIGHT: f32 = 0.866;

/// Relative gap added between neighbouring hexes
pub const DEFAULT_HEX_GAP: f32 = 0.1;

/// Width of the element sprite sitting on a hex (used for tight picking)
pub const DEFAULT_ELEMENT_WIDTH: f32 = 0.5;


/// Integer grid coordinate: `x` is the column, `y` the row (row 0 at the bottom)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coord {
    pub x: i16,
    pub y: i16,
}

impl Coord {
    /// Sentinel for "no coordinate" (an invalid selection)
    pub const NULL: Coord = Coord { x: -1, y: -1 };

    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y }
    }

    pub fn is_null(&self) -> bool {
        *self == Self::NULL
    }

    /// Offset by `(dx, dy)`
    pub fn offset(&self, dx: i16, dy: i16) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

impl Default for Coord {
    fn default() -> Self {
        Self::NULL
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.x, self.y)
    }
}

/// Index of an element type inside the element catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u8);

impl ElementId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// World-space position consumed by the visual layer
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WorldPos {
    pub x: f32,
    pub y: f32,
}

impl WorldPos {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Straight lines through the hex grid
///
/// - **Column**: straight up/down the column
/// - **Rising**: toward the next column, half a cell up
/// - **Falling**: toward the next column, half a cell down
/// - **Row**: two columns over at the same height (a zig-zag of neighbour
///   pairs; the cells on the lane are not adjacent to each other)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Lane {
    Column,
    Rising,
    Falling,
    Row,
}

impl Lane {
    /// The three straight hex axes (lanes made of adjacent cells)
    pub const STRAIGHT: [Lane; 3] = [Lane::Column, Lane::Rising, Lane::Falling];

    /// All four lanes, including the two-column row lane of the dense layout
    pub const ALL: [Lane; 4] = [Lane::Column, Lane::Rising, Lane::Falling, Lane::Row];

    /// Forward step as `(columns, half-rows)`
    ///
    /// Rows are measured in half cells because neighbouring columns sit half a
    /// cell apart; the backward step is the negation.
    pub fn step(self) -> (i16, i32) {
        match self {
            Lane::Column => (0, 2),
            Lane::Rising => (1, 1),
            Lane::Falling => (1, -1),
            Lane::Row => (2, 0),
        }
    }

    /// Whether consecutive cells on the lane are neighbours
    pub fn is_straight_axis(self) -> bool {
        !matches!(self, Lane::Row)
    }

    /// Parse lane from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "column" => Some(Lane::Column),
            "rising" => Some(Lane::Rising),
            "falling" => Some(Lane::Falling),
            "row" => Some(Lane::Row),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Lane::Column => "column",
            Lane::Rising => "rising",
            Lane::Falling => "falling",
            Lane::Row => "row",
        }
    }
}

/// Cascade resolver phases
///
/// `Idle` is the only phase in which a swap request is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TurnPhase {
    #[default]
    Idle,
    Swapping,
    Resolving,
    Settling,
}

impl TurnPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnPhase::Idle => "idle",
            TurnPhase::Swapping => "swapping",
            TurnPhase::Resolving => "resolving",
            TurnPhase::Settling => "settling",
        }
    }
}

impl fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameOutcome {
    Won,
    Lost,
}

impl GameOutcome {
    pub fn is_win(self) -> bool {
        matches!(self, GameOutcome::Won)
    }
}

impl fmt::Display for GameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameOutcome::Won => f.write_str("won"),
            GameOutcome::Lost => f.write_str("lost"),
        }
    }
}

/// Notifications pushed to session listeners, in emission order
///
/// Inside one resolution round the order is `AutoMatchesFound`,
/// `SuccessfulMove` (first round of a player turn only), then the removal
/// events. `GameOver` follows the event that ended the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GameEvent {
    /// Groups removed by one resolution round (pairwise disjoint)
    AutoMatchesFound { groups: Vec<Vec<Coord>> },
    /// The player's swap produced a match; `delta` applies to the move budget
    SuccessfulMove { delta: i32 },
    /// A goal tile lost health but survived
    GoalDamaged { at: Coord, health: u8 },
    /// A goal tile reached zero health; `delta` applies to the goal counter
    GoalDestroyed { at: Coord, delta: i32 },
    /// A cell of a large group was empowered instead of removed
    SpecialCreated { at: Coord, lane: Lane },
    /// An empowered element was matched and swept its lane
    SpecialTriggered { at: Coord, lane: Lane, swept: usize },
    /// The session ended
    GameOver { won: bool },
}

impl GameEvent {
    pub fn name(&self) -> &'static str {
        match self {
            GameEvent::AutoMatchesFound { .. } => "auto_matches_found",
            GameEvent::SuccessfulMove { .. } => "successful_move",
            GameEvent::GoalDamaged { .. } => "goal_damaged",
            GameEvent::GoalDestroyed { .. } => "goal_destroyed",
            GameEvent::SpecialCreated { .. } => "special_created",
            GameEvent::SpecialTriggered { .. } => "special_triggered",
            GameEvent::GameOver { .. } => "game_over",
        }
    }
}
