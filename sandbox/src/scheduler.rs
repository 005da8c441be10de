//! Fixed-timestep frame pacing and frame-rate statistics
//!
//! The physics step is always `1 / target_fps` of simulated time, whatever the
//! frame actually cost. Under load the simulation slows down instead of
//! taking bigger steps.
//!
//! All methods take the current `Instant` so the policy can be tested without
//! sleeping.

use std::time::{Duration, Instant};

/// Frame budget and nominal step for a target frame rate
#[derive(Debug, Clone, Copy)]
pub struct FramePacer {
    budget: Duration,
    step: f32,
}

impl FramePacer {
    pub fn new(target_fps: f32) -> Self {
        let fps = target_fps.max(1.0);
        Self {
            budget: Duration::from_secs_f32(1.0 / fps),
            step: 1.0 / fps,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Simulated seconds per frame
    pub fn nominal_step(&self) -> f32 {
        self.step
    }

    /// How long to sleep after a frame that took `elapsed`; `None` once over budget
    pub fn remaining(&self, elapsed: Duration) -> Option<Duration> {
        self.budget
            .checked_sub(elapsed)
            .filter(|left| !left.is_zero())
    }
}

/// Stopwatch that can be paused without losing the time already measured
#[derive(Debug, Clone, Default)]
pub struct PausableTimer {
    start: Option<Instant>,
    paused_at: Option<Duration>,
}

impl PausableTimer {
    pub fn start(&mut self, now: Instant) {
        self.start = Some(now);
        self.paused_at = None;
    }

    pub fn pause(&mut self, now: Instant) {
        if let (Some(start), None) = (self.start, self.paused_at) {
            self.paused_at = Some(now.saturating_duration_since(start));
        }
    }

    pub fn unpause(&mut self, now: Instant) {
        if let (Some(_), Some(elapsed)) = (self.start, self.paused_at.take()) {
            self.start = Some(now.checked_sub(elapsed).unwrap_or(now));
        }
    }

    pub fn elapsed(&self, now: Instant) -> Duration {
        match (self.start, self.paused_at) {
            (Some(_), Some(elapsed)) => elapsed,
            (Some(start), None) => now.saturating_duration_since(start),
            (None, _) => Duration::ZERO,
        }
    }

    pub fn is_paused(&self) -> bool {
        self.start.is_some() && self.paused_at.is_some()
    }
}

/// Average frame rate since start: counted frames over unpaused seconds
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    timer: PausableTimer,
    frames: u64,
}

impl FrameClock {
    pub fn start(&mut self, now: Instant) {
        self.timer.start(now);
        self.frames = 0;
    }

    /// Count a completed frame; paused frames are not counted
    pub fn tick(&mut self) {
        if !self.timer.is_paused() {
            self.frames += 1;
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn pause(&mut self, now: Instant) {
        self.timer.pause(now);
    }

    pub fn unpause(&mut self, now: Instant) {
        self.timer.unpause(now);
    }

    pub fn is_paused(&self) -> bool {
        self.timer.is_paused()
    }

    pub fn fps(&self, now: Instant) -> f32 {
        let secs = self.timer.elapsed(now).as_secs_f32();
        if secs > 0.0 {
            self.frames as f32 / secs
        } else {
            0.0
        }
    }
}

/// Drives one frame at a time: begin, (render, step), end and sleep
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    pacer: FramePacer,
    clock: FrameClock,
    frame_start: Instant,
}

impl FrameScheduler {
    pub fn new(target_fps: f32, now: Instant) -> Self {
        let mut clock = FrameClock::default();
        clock.start(now);
        Self {
            pacer: FramePacer::new(target_fps),
            clock,
            frame_start: now,
        }
    }

    pub fn begin_frame(&mut self, now: Instant) {
        self.frame_start = now;
    }

    pub fn nominal_step(&self) -> f32 {
        self.pacer.nominal_step()
    }

    /// Physics only advances while not paused
    pub fn should_step(&self) -> bool {
        !self.clock.is_paused()
    }

    pub fn toggle_pause(&mut self, now: Instant) {
        if self.clock.is_paused() {
            self.clock.unpause(now);
            log::info!("simulation resumed");
        } else {
            self.clock.pause(now);
            log::info!("simulation paused");
        }
    }

    /// Finish the frame; returns how long to sleep to hold the target rate
    pub fn end_frame(&mut self, now: Instant) -> Option<Duration> {
        self.clock.tick();
        self.pacer
            .remaining(now.saturating_duration_since(self.frame_start))
    }

    pub fn fps(&self, now: Instant) -> f32 {
        self.clock.fps(now)
    }

    pub fn frames(&self) -> u64 {
        self.clock.frames()
    }
}
