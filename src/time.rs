//! Frame timing.
//!
//! [`FrameClock`] measures the time between redraws, keeps a running FPS
//! figure for the settings panel and tells the event loop when the next
//! frame is due.
//!
//! ```ignore
//! let mut clock = FrameClock::new();
//!
//! // Once per redraw:
//! let dt = clock.tick();
//! world.step(dt);
//!
//! event_loop.set_control_flow(ControlFlow::WaitUntil(clock.next_frame_deadline()));
//! ```

use std::time::{Duration, Instant};

/// Target spacing between frames (roughly 60 FPS).
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// Longest step handed to the simulation, in seconds.
///
/// A window that was dragged or minimised would otherwise report a huge
/// delta and fling every ball at the floor.
pub const MAX_DELTA: f32 = 0.1;

/// Per-frame timing state.
#[derive(Debug)]
pub struct FrameClock {
    /// When the last tick happened.
    last_frame: Instant,
    /// Seconds between the last two ticks, after clamping.
    delta_secs: f32,
    /// Ticks since creation.
    frame_count: u64,
    /// FPS measured over the last averaging window.
    fps: f32,
    /// Frame count at the start of the averaging window.
    fps_frame_count: u64,
    /// Start of the averaging window.
    fps_update_time: Instant,
    /// Averaging window length.
    fps_update_interval: Duration,
    /// Replaces the measured delta when set.
    fixed_delta: Option<f32>,
}

impl FrameClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta_secs: 0.0,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
            fixed_delta: None,
        }
    }

    /// Mark the start of a frame and return the seconds since the previous one.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let raw_delta = now.duration_since(self.last_frame).as_secs_f32();
        self.delta_secs = self.fixed_delta.unwrap_or(raw_delta).clamp(0.0, MAX_DELTA);
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
        }

        self.delta_secs
    }

    /// When the next frame should start.
    pub fn next_frame_deadline(&self) -> Instant {
        self.last_frame + FRAME_INTERVAL
    }

    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Use a constant delta instead of wall-clock time.
    ///
    /// Pass `None` to go back to measured frame times.
    pub fn set_fixed_delta(&mut self, delta: Option<f32>) {
        self.fixed_delta = delta;
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
