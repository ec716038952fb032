//! Time facilities for the orrery.
//!
//! Two clocks are kept apart on purpose:
//!
//! - [`FrameTimer`] measures wall-clock time between frames.
//! - [`SimulationClock`] accumulates those deltas into the pausable
//!   simulation time that drives every orbit.
//!
//! # Example
//!
//! ```ignore
//! use orrery::time::{FrameTimer, SimulationClock};
//!
//! let mut timer = FrameTimer::new();
//! let mut clock = SimulationClock::new();
//!
//! // In your frame loop:
//! let t = clock.advance(timer.tick());
//! ```

use std::time::{Duration, Instant};

/// Pausable accumulator of simulation time.
///
/// Simulation time never decreases: negative or NaN deltas count as zero.
/// It is kept in `f64` so a frame delta still registers after days of
/// uptime.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationClock {
    /// Accumulated simulation time in seconds.
    elapsed: f64,
    /// Whether time is paused.
    paused: bool,
    /// Time scale multiplier (1.0 = real time).
    time_scale: f32,
}

impl SimulationClock {
    /// Create a running clock at `t = 0`.
    pub fn new() -> Self {
        Self {
            elapsed: 0.0,
            paused: false,
            time_scale: 1.0,
        }
    }

    /// Advance by a real frame delta and return the current simulation time.
    ///
    /// While paused the accumulated time is returned unchanged.
    pub fn advance(&mut self, real_delta: f32) -> f64 {
        if !self.paused {
            // `max` also maps NaN to zero.
            self.elapsed += f64::from(real_delta.max(0.0)) * f64::from(self.time_scale);
        }
        self.elapsed
    }

    /// Current simulation time in seconds.
    #[inline]
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    /// Whether time is currently paused.
    #[inline]
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Current time scale multiplier.
    #[inline]
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Stop time progression.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume time progression.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Set the paused flag directly.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    /// Toggle pause state.
    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    /// Set time scale multiplier.
    ///
    /// - `1.0` = real time
    /// - `0.5` = half speed
    /// - `10.0` = ten times faster
    ///
    /// Negative and NaN values clamp to `0.0`.
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(0.0);
    }

    /// Back to `t = 0`, running, at the current time scale.
    pub fn reset(&mut self) {
        self.elapsed = 0.0;
        self.paused = false;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

/// Wall-clock frame timing.
///
/// Provides the real delta fed to [`SimulationClock::advance`], plus frame
/// counting and an FPS estimate.
#[derive(Debug)]
pub struct FrameTimer {
    /// When the last frame occurred.
    last_frame: Instant,
    /// Time since last frame in seconds.
    delta_secs: f32,
    /// Total frames since start.
    frame_count: u64,
    /// Calculated FPS (updated periodically).
    fps: f32,
    /// Frame count at last FPS update.
    fps_frame_count: u64,
    /// Time of last FPS calculation.
    fps_update_time: Instant,
    /// How often to update FPS calculation.
    fps_update_interval: Duration,
}

impl FrameTimer {
    /// Create a timer starting from now.
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
        }
    }

    /// Mark the start of a new frame and return seconds since the last one.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        self.delta_secs = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frame_count += 1;

        let fps_elapsed = now.duration_since(self.fps_update_time);
        if fps_elapsed >= self.fps_update_interval {
            let frames_since = self.frame_count - self.fps_frame_count;
            self.fps = frames_since as f32 / fps_elapsed.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            log::debug!("FPS: {:.1}", self.fps);
        }

        self.delta_secs
    }

    /// Time since last frame in seconds.
    #[inline]
    pub fn delta(&self) -> f32 {
        self.delta_secs
    }

    /// Total frames since start.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    /// Calculated frames per second.
    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_clock_new() {
        let clock = SimulationClock::new();
        assert_eq!(clock.elapsed(), 0.0);
        assert!(!clock.is_paused());
        assert_eq!(clock.time_scale(), 1.0);
    }

    #[test]
    fn test_clock_accumulates() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.advance(0.5), 0.5);
        assert_eq!(clock.advance(0.25), 0.75);
        assert_eq!(clock.elapsed(), 0.75);
    }

    #[test]
    fn test_clock_negative_delta_is_zero() {
        let mut clock = SimulationClock::new();
        clock.advance(1.0);
        assert_eq!(clock.advance(-0.3), 1.0);
        assert_eq!(clock.advance(f32::NAN), 1.0);
    }

    #[test]
    fn test_clock_large_delta() {
        let mut clock = SimulationClock::new();
        assert_eq!(clock.advance(3600.0), 3600.0);
    }

    #[test]
    fn test_clock_keeps_running_after_long_uptime() {
        let mut clock = SimulationClock::new();
        clock.advance(600_000.0);
        let before = clock.elapsed();
        for _ in 0..60 {
            clock.advance(1.0 / 60.0);
        }
        let gained = clock.elapsed() - before;
        assert!((gained - 1.0).abs() < 1e-4, "gained {gained}");
    }

    #[test]
    fn test_clock_pause() {
        let mut clock = SimulationClock::new();
        clock.advance(1.0);
        clock.pause();
        assert!(clock.is_paused());

        assert_eq!(clock.advance(0.1), 1.0);
        assert_eq!(clock.advance(100.0), 1.0);

        clock.resume();
        assert_eq!(clock.advance(0.5), 1.5);
    }

    #[test]
    fn test_clock_pause_is_idempotent() {
        let mut clock = SimulationClock::new();
        clock.pause();
        clock.pause();
        assert!(clock.is_paused());
        clock.set_paused(false);
        clock.set_paused(false);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_even_toggles_change_nothing() {
        let mut toggled = SimulationClock::new();
        let mut plain = SimulationClock::new();
        for dt in [0.016, 0.020, 0.5, 0.0] {
            toggled.toggle_pause();
            toggled.toggle_pause();
            assert_eq!(toggled.advance(dt), plain.advance(dt));
        }
    }

    #[test]
    fn test_clock_time_scale() {
        let mut clock = SimulationClock::new();
        clock.set_time_scale(2.0);
        assert_eq!(clock.advance(1.0), 2.0);

        // Negative scale should clamp to 0
        clock.set_time_scale(-1.0);
        assert_eq!(clock.time_scale(), 0.0);
        assert_eq!(clock.advance(1.0), 2.0);
    }

    #[test]
    fn test_clock_reset() {
        let mut clock = SimulationClock::new();
        clock.advance(4.0);
        clock.pause();
        clock.reset();
        assert_eq!(clock.elapsed(), 0.0);
        assert!(!clock.is_paused());
    }

    #[test]
    fn test_frame_timer_tick() {
        let mut timer = FrameTimer::new();
        thread::sleep(Duration::from_millis(10));
        let delta = timer.tick();

        assert!(delta > 0.0);
        assert_eq!(timer.delta(), delta);
        assert_eq!(timer.frame(), 1);
    }
}
