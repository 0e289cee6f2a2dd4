//! Time-driven fall of a released cable end.
//!
//! A fall runs `Idle → Running → Done`. The host drives it from its
//! per-frame callback by calling [`FallAnimation::step`] with the current
//! wall-clock time in milliseconds; the animation never schedules itself.

use crate::constants::{FALLEN_SAG_FRACTION, FALL_DURATION_MS};
use crate::geometry::QuadCurve;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FallPhase {
    Idle,
    Running,
    Done,
}

/// Cubic ease-out, `1 - (1 - p)^3`, with `p` clamped to \[0, 1\].
#[inline]
pub fn ease_out_cubic(p: f32) -> f32 {
    let p = p.clamp(0.0, 1.0);
    1.0 - (1.0 - p).powi(3)
}

/// One rendered frame of a fall.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallFrame {
    pub falling: Vec2,
    pub curve: QuadCurve,
    /// Linear time fraction in \[0, 1\].
    pub progress: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FallAnimation {
    pub anchor: Vec2,
    pub from: Vec2,
    pub to: Vec2,
    pub duration_ms: f64,
    started_at_ms: f64,
    phase: FallPhase,
    current: Vec2,
    progress: f32,
    eased: f32,
}

impl FallAnimation {
    /// Prepare a fall of the point at `from`, ending `cable_length` straight
    /// below `anchor`.
    pub fn new(anchor: Vec2, from: Vec2, cable_length: f32) -> Self {
        Self {
            anchor,
            from,
            to: anchor + Vec2::new(0.0, cable_length.max(0.0)),
            duration_ms: FALL_DURATION_MS,
            started_at_ms: 0.0,
            phase: FallPhase::Idle,
            current: from,
            progress: 0.0,
            eased: 0.0,
        }
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms.max(0.0);
        self
    }

    pub fn phase(&self) -> FallPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == FallPhase::Running
    }

    pub fn is_done(&self) -> bool {
        self.phase == FallPhase::Done
    }

    /// Current position of the falling point.
    pub fn falling_point(&self) -> Vec2 {
        self.current
    }

    /// Record the start time. Only an idle animation can start.
    pub fn start(&mut self, now_ms: f64) -> bool {
        if self.phase != FallPhase::Idle {
            return false;
        }
        self.started_at_ms = now_ms;
        self.phase = FallPhase::Running;
        true
    }

    /// Advance to `now_ms`. Returns the frame to draw while running, including
    /// the final frame on which the animation switches to `Done`.
    pub fn step(&mut self, now_ms: f64) -> Option<FallFrame> {
        if self.phase != FallPhase::Running {
            return None;
        }
        let elapsed = (now_ms - self.started_at_ms).max(0.0);
        let progress = if self.duration_ms <= 0.0 {
            1.0
        } else {
            (elapsed / self.duration_ms).min(1.0) as f32
        };
        self.progress = progress;
        self.eased = ease_out_cubic(progress);
        self.current = self.from.lerp(self.to, self.eased);
        if elapsed >= self.duration_ms {
            self.current = self.to;
            self.progress = 1.0;
            self.eased = 1.0;
            self.phase = FallPhase::Done;
        }
        Some(self.frame(progress))
    }

    /// Jump straight to the resting position.
    pub fn settle(&mut self) -> FallFrame {
        self.current = self.to;
        self.progress = 1.0;
        self.eased = 1.0;
        self.phase = FallPhase::Done;
        self.frame(1.0)
    }

    /// Move the fall onto new endpoints, keeping how far along it is.
    /// Used when the board is rescaled mid-fall or after landing.
    pub fn rebase(&mut self, anchor: Vec2, from: Vec2, cable_length: f32) {
        self.anchor = anchor;
        self.from = from;
        self.to = anchor + Vec2::new(0.0, cable_length.max(0.0));
        self.current = if self.phase == FallPhase::Done {
            self.to
        } else {
            from.lerp(self.to, self.eased)
        };
    }

    /// Frame for the last reached state, without advancing time.
    pub fn current_frame(&self) -> FallFrame {
        self.frame(self.progress)
    }

    /// Curve for the current state. The light sag follows the vertical drop
    /// travelled so far.
    pub fn frame(&self, progress: f32) -> FallFrame {
        let drop = (self.current.y - self.anchor.y).abs();
        let curve = QuadCurve::sagging(self.anchor, self.current, drop * FALLEN_SAG_FRACTION);
        FallFrame {
            falling: self.current,
            curve,
            progress,
        }
    }
}
