//! HexMatch (workspace facade crate).
//!
//! Re-exports the workspace crates as `hexmatch::{core,engine,types}` so hosts
//! and integration tests depend on a single package.

pub use hexmatch_core as core;
pub use hexmatch_engine as engine;
pub use hexmatch_types as types;

pub mod logging;
