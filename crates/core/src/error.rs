//! Error types for the core engine
//!
//! Configuration problems are fatal and surface to the host. Swap problems are
//! recovered locally: the request is a no-op and nothing is emitted.

use std::fmt;

use crate::types::{Coord, GameOutcome, TurnPhase};

/// Invalid or inconsistent session configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("layout declares {width}x{height} = {expected} cells but provides {actual}")]
    LayoutDimensions {
        width: u8,
        height: u8,
        expected: usize,
        actual: usize,
    },
    #[error("layout row {row} has {actual} cells, expected {expected}")]
    RowLength {
        row: usize,
        expected: usize,
        actual: usize,
    },
    #[error("layout has no playable cells")]
    EmptyLayout,
    #[error("invalid layout code {code} at {at}")]
    InvalidCellCode { at: Coord, code: u8 },
    #[error("mirrored topology needs an odd width to have a centre column, got {0}")]
    MirroredEvenWidth(u8),
    #[error("layout has no spawn points")]
    NoSpawnPoints,
    #[error("spawn point {0} is not a playable cell")]
    InvalidSpawnPoint(Coord),
    #[error("element catalog is empty")]
    NoElementTypes,
    #[error("element catalog has {count} types, at most {max} are supported")]
    TooManyElementTypes { count: usize, max: usize },
    #[error("element type `{0}` is declared twice")]
    DuplicateElementType(String),
    #[error("element type `{0}` does not list itself as a matching type")]
    MissingSelfMatch(String),
    #[error("element type `{owner}` matches unknown type `{name}`")]
    UnknownElementType { owner: String, name: String },
    #[error("invalid thresholds: min group size {min_group_size}, special threshold {special_threshold}")]
    InvalidThresholds {
        min_group_size: usize,
        special_threshold: usize,
    },
    #[error("move budget must be at least 1")]
    InvalidMoveBudget,
    #[error("goal count {goal_count} must be between 1 and the {goal_tiles} goal tiles in the layout")]
    InvalidGoalCount { goal_count: u32, goal_tiles: usize },
    #[error("refill did not fill the board after {iterations} iterations ({empty_cells} cells still empty)")]
    RefillStalled { iterations: u32, empty_cells: usize },
    #[error("turn did not settle after {steps} steps")]
    CascadeLimit { steps: u32 },
    #[error("config io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a swap between two coordinates was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidSwapReason {
    OutOfBounds,
    VoidCell,
    SameCell,
    NotAdjacent,
    /// Empty cell or goal tile
    Immovable,
}

impl fmt::Display for InvalidSwapReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            InvalidSwapReason::OutOfBounds => "out of bounds",
            InvalidSwapReason::VoidCell => "void cell",
            InvalidSwapReason::SameCell => "same cell",
            InvalidSwapReason::NotAdjacent => "not adjacent",
            InvalidSwapReason::Immovable => "nothing movable to swap",
        };
        f.write_str(s)
    }
}

/// A rejected swap request; the board is untouched
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SwapError {
    #[error("invalid swap {a} <-> {b}: {reason}")]
    InvalidSwap {
        a: Coord,
        b: Coord,
        reason: InvalidSwapReason,
    },
    #[error("swap rejected while the resolver is {phase}")]
    StateConflict { phase: TurnPhase },
    #[error("swap rejected: session already {outcome}")]
    SessionOver { outcome: GameOutcome },
}

/// Direct cell writes outside the playable area
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("cell {0} is outside the board")]
    OutOfBounds(Coord),
    #[error("cell {0} is void")]
    VoidCell(Coord),
    #[error("board picture row {row}: {reason}")]
    Picture { row: usize, reason: String },
}

/// Umbrella error for convenience APIs that both request and resolve a turn
#[derive(Debug, thiserror::Error)]
pub enum HexMatchError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Swap(#[from] SwapError),
    #[error(transparent)]
    Board(#[from] BoardError),
}
