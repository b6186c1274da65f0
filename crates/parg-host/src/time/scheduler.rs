use crate::engine::Engine;

use super::{FrameClock, FrameTime};

/// When a frame issues a draw.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum DrawPolicy {
    /// Draw every frame regardless of what tick returned.
    #[default]
    Always,
    /// Draw only when tick reported that a redraw is needed.
    OnRequest,
}

/// What happened during one frame.
#[derive(Debug, Copy, Clone)]
pub struct FrameReport {
    pub time: FrameTime,
    pub redraw_requested: bool,
    pub drew: bool,
}

/// Drives the engine one frame at a time.
///
/// The caller owns pacing: it invokes `run_frame` from the host's frame
/// callback and schedules the next callback afterwards, so frames never
/// overlap.
#[derive(Debug, Clone, Default)]
pub struct FrameScheduler {
    clock: FrameClock,
    policy: DrawPolicy,
    frames: u64,
}

impl FrameScheduler {
    pub fn new(policy: DrawPolicy) -> Self {
        Self {
            clock: FrameClock::new(),
            policy,
            frames: 0,
        }
    }

    pub fn policy(&self) -> DrawPolicy {
        self.policy
    }

    /// Frames run so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Ticks the engine with the current time and `pixel_density`, then draws if due.
    pub fn run_frame(&mut self, engine: &mut dyn Engine, pixel_density: f32) -> FrameReport {
        let time = self.clock.tick();
        let redraw_requested = engine.tick(time.seconds, pixel_density);

        let drew = match self.policy {
            DrawPolicy::Always => true,
            DrawPolicy::OnRequest => redraw_requested,
        };
        if drew {
            engine.draw();
        }

        self.frames += 1;
        FrameReport {
            time,
            redraw_requested,
            drew,
        }
    }
}
