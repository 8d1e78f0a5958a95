//! Time management utilities

use std::time::{Duration, Instant};

/// High-precision timer for frame timing
pub struct Timer {
    last_frame: Instant,
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer {
    /// Create a new timer
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            delta_time: 0.0,
            total_time: 0.0,
            frame_count: 0,
        }
    }

    /// Update the timer (should be called once per frame)
    pub fn update(&mut self) {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame);
        self.delta_time = elapsed.as_secs_f32();
        self.total_time += self.delta_time;
        self.last_frame = now;
        self.frame_count += 1;
    }

    /// Get the time since the last frame in seconds
    pub fn delta_time(&self) -> f32 {
        self.delta_time
    }

    /// Get the total elapsed time since timer creation
    pub fn total_time(&self) -> f32 {
        self.total_time
    }

    /// Get the current frame count
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the average FPS since timer creation
    pub fn average_fps(&self) -> f32 {
        if self.total_time > 0.0 {
            self.frame_count as f32 / self.total_time
        } else {
            0.0
        }
    }
}

/// Repeating timer driven by elapsed time fed in from the frame loop
///
/// Stands in for a periodic callback: the owner calls [`IntervalTimer::tick`]
/// once per frame and runs its side effect once per returned fire.
#[derive(Debug, Clone)]
pub struct IntervalTimer {
    period: f32,
    accumulated: f32,
}

impl IntervalTimer {
    /// Create a timer firing every `period` seconds
    pub fn new(period: f32) -> Self {
        Self {
            period: period.max(f32::EPSILON),
            accumulated: 0.0,
        }
    }

    /// Advance by `delta` seconds and return how many periods elapsed
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn tick(&mut self, delta: f32) -> u32 {
        if !(delta > 0.0) {
            return 0;
        }
        self.accumulated += delta;
        if self.accumulated < self.period {
            return 0;
        }
        let periods = (self.accumulated / self.period).floor();
        self.accumulated %= self.period;
        // Saturates at u32::MAX
        periods as u32
    }

    /// Period in seconds
    pub fn period(&self) -> f32 {
        self.period
    }

    /// Restart the current period from zero
    pub fn restart(&mut self) {
        self.accumulated = 0.0;
    }
}

/// Sleeps out the remainder of each frame to hold a target refresh rate
///
/// Used when no vsync-capable surface is available.
pub struct FramePacer {
    frame_duration: Duration,
    next_deadline: Instant,
}

impl FramePacer {
    /// Create a pacer for the given refresh rate in Hz
    pub fn new(refresh_rate: f32) -> Self {
        let frame_duration = Duration::from_secs_f32(1.0 / refresh_rate.max(1.0));
        Self {
            frame_duration,
            next_deadline: Instant::now() + frame_duration,
        }
    }

    /// Block until the next frame is due
    pub fn wait(&mut self) {
        let now = Instant::now();
        if now < self.next_deadline {
            std::thread::sleep(self.next_deadline - now);
            self.next_deadline += self.frame_duration;
        } else {
            // Running behind: never try to catch up with a burst of frames
            self.next_deadline = now + self.frame_duration;
        }
    }

    /// Target frame duration
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interval_timer_fires_once_per_period() {
        let mut timer = IntervalTimer::new(1.0);
        assert_eq!(timer.tick(0.6), 0);
        assert_eq!(timer.tick(0.6), 1);
        assert_eq!(timer.tick(2.0), 2);
    }

    #[test]
    fn test_interval_timer_ignores_negative_delta() {
        let mut timer = IntervalTimer::new(0.5);
        assert_eq!(timer.tick(-3.0), 0);
        assert_eq!(timer.tick(0.5), 1);
    }

    #[test]
    fn test_interval_timer_long_gap_with_tiny_period() {
        let mut timer = IntervalTimer::new(1e-6);
        assert_eq!(timer.tick(1e6), u32::MAX);
        assert_eq!(timer.tick(0.0), 0);
        assert!(timer.accumulated < timer.period());
    }

    #[test]
    fn test_interval_timer_keeps_remainder() {
        let mut timer = IntervalTimer::new(0.25);
        assert_eq!(timer.tick(1.1), 4);
        assert_eq!(timer.tick(0.1), 0);
        assert_eq!(timer.tick(0.1), 1);
    }

    #[test]
    fn test_interval_timer_restart() {
        let mut timer = IntervalTimer::new(1.0);
        timer.tick(0.9);
        timer.restart();
        assert_eq!(timer.tick(0.2), 0);
    }

    #[test]
    fn test_frame_pacer_duration() {
        let pacer = FramePacer::new(50.0);
        assert!((pacer.frame_duration().as_secs_f64() - 0.02).abs() < 1e-6);
    }
}
