//! Frame driver - spreads a turn over host frames
//!
//! Hosts that animate call [`FrameDriver::frame`] once per rendered frame; each
//! call advances the session by at most `steps_per_frame` transitions. Headless
//! hosts use [`FrameDriver::run_to_idle`] instead.

use hexmatch_core::{ConfigError, EffectsSink, Session};
use hexmatch_types::TurnPhase;
use tracing::{trace, warn};

/// What one frame did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameReport {
    pub steps: u32,
    pub phase: TurnPhase,
}

impl FrameReport {
    pub fn settled(&self) -> bool {
        self.phase == TurnPhase::Idle
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameDriver {
    steps_per_frame: u32,
    frames: u64,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new(1)
    }
}

impl FrameDriver {
    /// Zero is treated as one step per frame
    pub fn new(steps_per_frame: u32) -> Self {
        Self {
            steps_per_frame: steps_per_frame.max(1),
            frames: 0,
        }
    }

    pub fn steps_per_frame(&self) -> u32 {
        self.steps_per_frame
    }

    /// Frames driven so far
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Advance one frame; stops early once the session is idle
    pub fn frame<E: EffectsSink>(
        &mut self,
        session: &mut Session<E>,
    ) -> Result<FrameReport, ConfigError> {
        self.frames += 1;
        let mut steps = 0;
        while steps < self.steps_per_frame && session.is_resolving() {
            session.step()?;
            steps += 1;
        }
        let phase = session.phase();
        trace!(frame = self.frames, steps, %phase, "frame");
        Ok(FrameReport { steps, phase })
    }

    /// Drive frames until the session is idle; returns the frames used
    ///
    /// Fails with [`ConfigError::CascadeLimit`] if the turn is still resolving
    /// after `max_frames`.
    pub fn run_to_idle<E: EffectsSink>(
        &mut self,
        session: &mut Session<E>,
        max_frames: u32,
    ) -> Result<u32, ConfigError> {
        let mut used = 0;
        let mut steps = 0;
        while session.is_resolving() {
            if used >= max_frames {
                warn!(frames = used, steps, "turn did not settle within frame budget");
                return Err(ConfigError::CascadeLimit { steps });
            }
            steps += self.frame(session)?.steps;
            used += 1;
        }
        Ok(used)
    }
}
