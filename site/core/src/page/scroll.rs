//! Smooth Scrolling
//!
//! Nav links scroll the page with an eased animation rather than jumping.
//! Progress is advanced with frame deltas so the motion is frame-rate
//! independent.

use std::time::Duration;

/// Default length of a smooth scroll
pub const DEFAULT_SCROLL_DURATION: Duration = Duration::from_millis(400);

/// Easing curves available for scrolling
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EasingFunction {
    /// Constant speed
    Linear,

    /// Slow start and end
    #[default]
    EaseInOut,

    /// Fast start, gentle landing
    EaseOutCubic,
}

impl EasingFunction {
    /// Apply the easing function to a progress value (0.0 to 1.0)
    #[must_use]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::EaseInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
        }
    }
}

/// An in-flight scroll from one offset to another
#[derive(Clone, Copy, Debug)]
pub struct SmoothScroll {
    from: u32,
    to: u32,
    elapsed: Duration,
    duration: Duration,
    easing: EasingFunction,
}

impl SmoothScroll {
    /// Start scrolling from `from` to `to`
    #[must_use]
    pub fn new(from: u32, to: u32, duration: Duration) -> Self {
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
            easing: EasingFunction::default(),
        }
    }

    /// Use a different easing curve
    #[must_use]
    pub fn with_easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Destination offset
    #[must_use]
    pub fn target(&self) -> u32 {
        self.to
    }

    /// Whether the destination has been reached
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance by `delta` and return the offset to display
    pub fn update(&mut self, delta: Duration) -> u32 {
        self.elapsed = (self.elapsed + delta).min(self.duration);
        self.position()
    }

    /// Offset at the current progress
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn position(&self) -> u32 {
        if self.duration.is_zero() || self.is_finished() {
            return self.to;
        }

        let progress = self.elapsed.as_secs_f32() / self.duration.as_secs_f32();
        let eased = self.easing.apply(progress);
        let from = f64::from(self.from);
        let to = f64::from(self.to);
        // Bounded by `from` and `to`, both u32.
        (from + (to - from) * f64::from(eased)).round() as u32
    }
}
