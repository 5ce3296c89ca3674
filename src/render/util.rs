//! Render utility helpers.
//!
//! Currently just frame pacing: the event loop sleeps until `FramePacer::deadline()` and
//! redraws once `is_due`, which caps the frame rate the same way a `clock.tick(fps)` call
//! at the end of a hand-written loop would.

use std::time::{Duration, Instant};

/// Fixed-rate frame scheduler.
///
/// Typical usage:
/// - Create once: `let mut pacer = FramePacer::new(60, Instant::now());`
/// - In `about_to_wait`: redraw if `pacer.is_due(now)`, then wait until `pacer.deadline()`.
/// - After presenting: `pacer.frame_presented(Instant::now())`.
///
/// Note:
/// - A late frame does not cause a burst of catch-up frames; the schedule restarts from
///   the moment the late frame was presented.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    next: Instant,
    frames: u64,
}

impl FramePacer {
    /// `target_fps` is clamped to at least 1.
    pub fn new(target_fps: u32, now: Instant) -> Self {
        Self {
            interval: Duration::from_secs(1) / target_fps.max(1),
            next: now,
            frames: 0,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next frame should start.
    #[inline]
    pub fn deadline(&self) -> Instant {
        self.next
    }

    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.next
    }

    /// Number of frames presented so far.
    #[inline]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Schedule the frame after the one just presented at `now`.
    pub fn frame_presented(&mut self, now: Instant) {
        self.frames += 1;
        let next = self.next + self.interval;
        self.next = if next < now { now } else { next };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_frame_is_due_immediately() {
        let t0 = Instant::now();
        let pacer = FramePacer::new(60, t0);
        assert!(pacer.is_due(t0));
        assert_eq!(pacer.interval(), Duration::from_secs(1) / 60);
    }

    #[test]
    fn on_time_frames_keep_a_fixed_cadence() {
        let t0 = Instant::now();
        let mut pacer = FramePacer::new(50, t0);
        let step = Duration::from_millis(20);

        pacer.frame_presented(t0 + Duration::from_millis(5));
        assert_eq!(pacer.deadline(), t0 + step);
        assert!(!pacer.is_due(t0 + Duration::from_millis(19)));
        assert!(pacer.is_due(t0 + step));

        pacer.frame_presented(t0 + Duration::from_millis(26));
        assert_eq!(pacer.deadline(), t0 + 2 * step);
        assert_eq!(pacer.frames(), 2);
    }

    #[test]
    fn late_frame_does_not_schedule_into_the_past() {
        let t0 = Instant::now();
        let mut pacer = FramePacer::new(60, t0);
        let late = t0 + Duration::from_millis(500);
        pacer.frame_presented(late);
        assert_eq!(pacer.deadline(), late);
        assert!(pacer.deadline() >= late);
    }

    #[test]
    fn zero_fps_is_clamped() {
        let pacer = FramePacer::new(0, Instant::now());
        assert_eq!(pacer.interval(), Duration::from_secs(1));
    }
}
