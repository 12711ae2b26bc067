//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules of the hex matching game: the board model,
//! match detection, the refill algorithm and the turn/cascade state machine.
//! It has **no dependencies** on rendering, input or I/O beyond reading a JSON
//! config, which makes it:
//!
//! - **Deterministic**: the same seed and config produce the same game
//! - **Testable**: every rule is exercised headless
//! - **Portable**: the host plugs in visuals through [`EffectsSink`]
//!
//! # Module Structure
//!
//! - [`hex`]: grid topologies, neighbour tables, lanes and world positions
//! - [`layout`]: the immutable per-session cell mask
//! - [`catalog`]: element types and their symmetric matching relation
//! - [`board`]: cell occupancy with validated mutation
//! - [`matcher`] / [`lanes`]: cluster and straight-lane match detection
//! - [`refill`]: spawn and compaction until the board is full
//! - [`resolver`]: one turn as an explicit state machine
//! - [`session`]: move budget, goals and the game-over flag
//! - [`events`], [`effects`]: the two outward interfaces
//! - [`rng`]: type sources for first fill and refills
//! - [`config`], [`snapshot`], [`error`]
//!
//! # Game Rules
//!
//! - **Swap**: two adjacent movable elements trade places; a swap that makes
//!   no match is undone and costs nothing
//! - **Match**: a connected group of at least `min_group_size` matching
//!   elements (or a straight run, in lane mode) is removed
//! - **Goals**: every removed cell damages the goal tiles next to it
//! - **Specials**: a group of `special_threshold` or more leaves one charged
//!   element behind, which sweeps its lane when matched later
//! - **Cascade**: removal, refill and detection repeat until nothing matches
//! - **End**: destroying the last goal wins, running out of moves loses
//!
//! # Example
//!
//! ```
//! use hexmatch_core::{GameConfig, Session};
//! use hexmatch_core::types::{Coord, GameEvent};
//!
//! let mut session = Session::headless(GameConfig::default()).unwrap();
//! session.run_until_idle().unwrap();
//!
//! // This swap does not line anything up, so it is undone.
//! let events = session
//!     .play_swap(Coord::new(0, 0), Coord::new(0, 1))
//!     .unwrap();
//! assert!(events.is_empty());
//! assert_eq!(session.moves_left(), 25);
//!
//! // This one completes a group of three.
//! let events = session
//!     .play_swap(Coord::new(0, 1), Coord::new(0, 2))
//!     .unwrap();
//! assert!(matches!(events[0], GameEvent::AutoMatchesFound { .. }));
//! assert_eq!(session.moves_left(), 24);
//! assert!(session.board().is_full());
//! ```

pub mod board;
pub mod catalog;
pub mod config;
pub mod effects;
pub mod error;
pub mod events;
pub mod hex;
pub mod lanes;
pub mod layout;
pub mod matcher;
pub mod refill;
pub mod resolver;
pub mod rng;
pub mod session;
pub mod snapshot;

pub use hexmatch_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, Element, Occupant};
pub use catalog::{ElementCatalog, ElementType};
pub use config::GameConfig;
pub use effects::{EffectsSink, NullEffects, RecordingEffects, VisualHandle};
pub use error::{BoardError, ConfigError, HexMatchError, InvalidSwapReason, SwapError};
pub use events::{EventBus, EventRecorder, Listener};
pub use hex::{HexGrid, HexMetrics, Topology};
pub use layout::{BoardLayout, CellKind};
pub use matcher::{connected_group, Detector, DiscardPolicy, MatchGroup, MatchMode};
pub use resolver::{CascadeRules, Resolver};
pub use rng::{ElementQueue, RefillPolicy, ScriptedSource, SimpleRng, TypeSource};
pub use session::Session;
pub use snapshot::{BoardSnapshot, CellSnapshot, SessionSnapshot};
