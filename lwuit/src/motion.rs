//! Motion - time-based interpolation between two values.
//!
//! A [`Motion`] is created with its endpoints and duration, started once,
//! then sampled. Time comes from an injected [`Clock`] so animations can be
//! driven deterministically by [`ManualClock`].

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

// =========================================================================
// Clocks
// =========================================================================

/// Source of monotonic time for motions.
pub trait Clock: Send + Sync {
    /// Time elapsed since an arbitrary fixed epoch.
    fn now(&self) -> Duration;
}

/// Wall clock backed by [`Instant`].
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    epoch: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { epoch: Instant::now() }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.epoch.elapsed()
    }
}

/// A clock that only moves when told to. Clones share the same time.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.millis.fetch_add(by.as_millis() as u64, Ordering::SeqCst);
    }

    /// Jump to an absolute time.
    pub fn set(&self, at: Duration) {
        self.millis.store(at.as_millis() as u64, Ordering::SeqCst);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        Duration::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

// =========================================================================
// Motion
// =========================================================================

/// Interpolation curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionStyle {
    Linear,
    /// Ease-in/ease-out.
    #[default]
    Spline,
}

/// Longest a friction motion runs before it is cut off.
pub const MAX_FRICTION_SECONDS: f64 = 60.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Curve {
    Linear,
    Spline,
    /// Constant deceleration from an initial velocity (pixels per second)
    /// at `friction` pixels per second squared.
    Friction { velocity: f64, friction: f64 },
}

/// A time-parameterized interpolation from `start` to `end`.
///
/// Samples are monotonic in the start → end direction and equal `end` once
/// the duration has elapsed. A motion cannot be rewound; create a new one.
#[derive(Clone)]
pub struct Motion {
    start: i32,
    end: i32,
    duration: Duration,
    curve: Curve,
    clock: Arc<dyn Clock>,
    started_at: Option<Duration>,
}

impl std::fmt::Debug for Motion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Motion")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("duration", &self.duration)
            .field("curve", &self.curve)
            .field("started_at", &self.started_at)
            .finish()
    }
}

impl Motion {
    /// Linear interpolation.
    pub fn linear(start: i32, end: i32, duration: Duration, clock: Arc<dyn Clock>) -> Self {
        Self::with_curve(start, end, duration, Curve::Linear, clock)
    }

    /// Eased interpolation (slow start, slow finish).
    pub fn spline(start: i32, end: i32, duration: Duration, clock: Arc<dyn Clock>) -> Self {
        Self::with_curve(start, end, duration, Curve::Spline, clock)
    }

    /// Interpolation with the given style.
    pub fn with_style(
        style: MotionStyle,
        start: i32,
        end: i32,
        duration: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        match style {
            MotionStyle::Linear => Self::linear(start, end, duration, clock),
            MotionStyle::Spline => Self::spline(start, end, duration, clock),
        }
    }

    /// Decelerating motion for kinetic scrolling.
    ///
    /// Starts at `start` moving at `velocity` pixels per second and slows at
    /// `friction` pixels per second squared until it stops, for at most
    /// [`MAX_FRICTION_SECONDS`]. A non-finite velocity or a friction that is
    /// not a positive finite number yields a motion that stays at `start`.
    pub fn friction(start: i32, velocity: f64, friction: f64, clock: Arc<dyn Clock>) -> Self {
        if !velocity.is_finite() || !friction.is_finite() || friction <= 0.0 {
            tracing::warn!(velocity, friction, "friction motion rejected; staying in place");
            return Self::with_curve(start, start, Duration::ZERO, Curve::Linear, clock);
        }
        let seconds = (velocity.abs() / friction).min(MAX_FRICTION_SECONDS);
        let travelled = velocity.abs() * seconds - 0.5 * friction * seconds * seconds;
        let duration = Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO);
        Self::with_curve(
            start,
            start.saturating_add((velocity.signum() * travelled).round() as i32),
            duration,
            Curve::Friction { velocity, friction },
            clock,
        )
    }

    fn with_curve(start: i32, end: i32, duration: Duration, curve: Curve, clock: Arc<dyn Clock>) -> Self {
        Self {
            start,
            end,
            duration,
            curve,
            clock,
            started_at: None,
        }
    }

    /// Record the reference time. Calling again restarts from now.
    pub fn start(&mut self) {
        self.started_at = Some(self.clock.now());
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn start_value(&self) -> i32 {
        self.start
    }

    pub fn end_value(&self) -> i32 {
        self.end
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Time since `start`, zero if not started.
    pub fn elapsed(&self) -> Duration {
        match self.started_at {
            Some(at) => self.clock.now().saturating_sub(at),
            None => Duration::ZERO,
        }
    }

    /// True once the full duration has elapsed since `start`.
    pub fn is_finished(&self) -> bool {
        self.is_started() && self.elapsed() >= self.duration
    }

    /// Sample at the current time.
    pub fn value(&self) -> i32 {
        self.value_at(self.elapsed())
    }

    /// Sample at an elapsed time. Pure: does not consult the clock.
    pub fn value_at(&self, elapsed: Duration) -> i32 {
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.end;
        }
        let distance = f64::from(self.end - self.start);
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();

        let offset = match self.curve {
            Curve::Linear => {
                // Integer math keeps linear samples exact.
                let d = i64::from(self.end - self.start);
                let num = d * elapsed.as_millis() as i64;
                let den = (self.duration.as_millis() as i64).max(1);
                return self.start + (num / den) as i32;
            }
            Curve::Spline => distance * (3.0 * t * t - 2.0 * t * t * t),
            Curve::Friction { velocity, friction } => {
                let secs = elapsed.as_secs_f64();
                let travelled = velocity.abs() * secs - 0.5 * friction * secs * secs;
                travelled.min(distance.abs()) * velocity.signum()
            }
        };
        self.start + offset.trunc() as i32
    }
}
