use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Seconds since the clock's epoch. This is what the engine's tick receives.
    pub seconds: f64,

    /// Time elapsed since the previous sample, in seconds (clamped).
    pub dt: f32,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Monotonic frame clock.
///
/// `seconds` is never clamped: it is the raw distance from the epoch, so engine
/// animation stays wall-clock accurate. Only `dt` is clamped, to avoid
/// pathological values after a debugger pause or a minimized window.
#[derive(Debug, Clone)]
pub struct FrameClock {
    epoch: Instant,
    last: Instant,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::with_clamps(Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a clock with custom delta-time clamps.
    pub fn with_clamps(dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        let now = Instant::now();
        Self {
            epoch: now,
            last: now,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    pub fn epoch(&self) -> Instant {
        self.epoch
    }

    /// Samples the clock and returns a new `FrameTime`.
    pub fn tick(&mut self) -> FrameTime {
        self.tick_at(Instant::now())
    }

    pub(crate) fn tick_at(&mut self, now: Instant) -> FrameTime {
        let dt = now
            .saturating_duration_since(self.last)
            .clamp(self.dt_min, self.dt_max);
        self.last = now;

        let ft = FrameTime {
            seconds: now.saturating_duration_since(self.epoch).as_secs_f64(),
            dt: dt.as_secs_f32(),
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
