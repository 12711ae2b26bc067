//! Effects sink - the seam to the host's pooling and particle services
//!
//! The core never creates or destroys visuals itself. It asks the sink for a
//! handle when an occupant appears, releases the handle when the occupant
//! leaves the board, and fires one-shot effects (collection bursts, goal hits,
//! lane sweeps) at world positions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::types::WorldPos;

/// Opaque reference to a pooled visual owned by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VisualHandle(pub u32);

/// Arguments of a spawn call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpawnRequest<'a> {
    pub pool_tag: &'a str,
    pub material: &'a str,
    pub at: WorldPos,
}

/// Pool and effect tags the core hands to the sink
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolTags {
    pub element: String,
    pub goal: String,
    /// Played at the origin of a lane sweep
    pub sweep_effect: String,
    /// Played on a goal tile each time it loses health
    pub goal_hit_effect: String,
    /// Played where a goal tile is destroyed
    pub goal_destroyed_effect: String,
    /// Played where a special element is created
    pub special_created_effect: String,
}

impl Default for PoolTags {
    fn default() -> Self {
        Self {
            element: "element".to_string(),
            goal: "goal".to_string(),
            sweep_effect: "sweep".to_string(),
            goal_hit_effect: "goal_hit".to_string(),
            goal_destroyed_effect: "goal_destroyed".to_string(),
            special_created_effect: "special_created".to_string(),
        }
    }
}

/// Host services the resolver calls into
pub trait EffectsSink {
    fn spawn_visual(&mut self, request: SpawnRequest<'_>) -> VisualHandle;

    fn release(&mut self, handle: VisualHandle);

    fn play_effect(&mut self, tag: &str, at: WorldPos);
}

impl<T: EffectsSink + ?Sized> EffectsSink for &mut T {
    fn spawn_visual(&mut self, request: SpawnRequest<'_>) -> VisualHandle {
        (**self).spawn_visual(request)
    }

    fn release(&mut self, handle: VisualHandle) {
        (**self).release(handle)
    }

    fn play_effect(&mut self, tag: &str, at: WorldPos) {
        (**self).play_effect(tag, at)
    }
}

impl<T: EffectsSink + ?Sized> EffectsSink for Box<T> {
    fn spawn_visual(&mut self, request: SpawnRequest<'_>) -> VisualHandle {
        (**self).spawn_visual(request)
    }

    fn release(&mut self, handle: VisualHandle) {
        (**self).release(handle)
    }

    fn play_effect(&mut self, tag: &str, at: WorldPos) {
        (**self).play_effect(tag, at)
    }
}

/// Hands out sequential handles and ignores everything else (headless runs)
#[derive(Debug, Clone, Default)]
pub struct NullEffects {
    next: u32,
}

impl EffectsSink for NullEffects {
    fn spawn_visual(&mut self, _request: SpawnRequest<'_>) -> VisualHandle {
        self.next = self.next.wrapping_add(1);
        VisualHandle(self.next)
    }

    fn release(&mut self, _handle: VisualHandle) {}

    fn play_effect(&mut self, _tag: &str, _at: WorldPos) {}
}

/// One call received by [`RecordingEffects`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum EffectCall {
    Spawn {
        handle: VisualHandle,
        pool_tag: String,
        material: String,
    },
    Release {
        handle: VisualHandle,
    },
    Effect {
        tag: String,
        at: WorldPos,
    },
}

/// Records every call and tracks which handles are still live
#[derive(Debug, Clone, Default)]
pub struct RecordingEffects {
    next: u32,
    live: BTreeSet<VisualHandle>,
    calls: Vec<EffectCall>,
    /// Releases of handles that were not live
    stale_releases: usize,
}

impl RecordingEffects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> &[EffectCall] {
        &self.calls
    }

    pub fn live_handles(&self) -> &BTreeSet<VisualHandle> {
        &self.live
    }

    pub fn stale_releases(&self) -> usize {
        self.stale_releases
    }

    /// Effect tags played so far, in order
    pub fn effect_tags(&self) -> Vec<&str> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                EffectCall::Effect { tag, .. } => Some(tag.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }
}

impl EffectsSink for RecordingEffects {
    fn spawn_visual(&mut self, request: SpawnRequest<'_>) -> VisualHandle {
        self.next = self.next.wrapping_add(1);
        let handle = VisualHandle(self.next);
        self.live.insert(handle);
        self.calls.push(EffectCall::Spawn {
            handle,
            pool_tag: request.pool_tag.to_string(),
            material: request.material.to_string(),
        });
        handle
    }

    fn release(&mut self, handle: VisualHandle) {
        if !self.live.remove(&handle) {
            self.stale_releases += 1;
        }
        self.calls.push(EffectCall::Release { handle });
    }

    fn play_effect(&mut self, tag: &str, at: WorldPos) {
        self.calls.push(EffectCall::Effect {
            tag: tag.to_string(),
            at,
        });
    }
}
