//! Host-side helpers around a core [`Session`](hexmatch_core::Session)
//!
//! Nothing here changes the rules; these are the pieces every front end ends
//! up writing:
//!
//! - [`selection`]: press/drag/release gesture into a swap request
//! - [`hint`]: which swaps on the current board would match
//! - [`driver`]: advancing a turn a few transitions per frame

pub mod driver;
pub mod hint;
pub mod selection;

pub use driver::{FrameDriver, FrameReport};
pub use hint::{best_swap, find_matching_swaps, has_matching_swap, SwapHint};
pub use selection::{NoFeedback, SelectionFeedback, SelectionTracker};
