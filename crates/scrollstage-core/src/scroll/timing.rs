//! L4 Atomic Layer: Time and progress calculation utilities
//!
//! Pure functions for animation progress, interpolation and the
//! index-staggered local progress used by element clusters.

use std::time::Duration;

/// Calculate tween progress (0.0 to 1.0) from elapsed time and duration
///
/// # Arguments
/// * `elapsed` - Time since the tween started
/// * `duration` - Total tween duration
///
/// # Returns
/// Progress value clamped to [0.0, 1.0]
#[inline]
pub fn progress(elapsed: Duration, duration: Duration) -> f64 {
    if duration.is_zero() {
        return 1.0;
    }
    let ratio = elapsed.as_secs_f64() / duration.as_secs_f64();
    ratio.clamp(0.0, 1.0)
}

/// Check if a tween is complete
#[inline]
pub fn is_complete(elapsed: Duration, duration: Duration) -> bool {
    elapsed >= duration
}

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor [0.0, 1.0]
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Frame-rate independent exponential approach of `from` toward `to`
///
/// `lambda` is the per-second decay rate; `dt` the frame time in seconds.
#[inline]
pub fn damp(from: f64, to: f64, lambda: f64, dt: f64) -> f64 {
    lerp(from, to, 1.0 - (-lambda * dt).exp())
}

/// Local progress of a delayed element
///
/// `clamp((p - delay) / (window - delay), 0, 1)`. A delay at or past the
/// window leaves the element at 0 for the whole range.
#[inline]
pub fn clamped_normalize_within(p: f64, delay: f64, window: f64) -> f64 {
    let span = window - delay;
    if span <= 0.0 || !span.is_finite() {
        return 0.0;
    }
    ((p - delay) / span).clamp(0.0, 1.0)
}

/// [`clamped_normalize_within`] over the full [0, 1] window
#[inline]
pub fn clamped_normalize(p: f64, delay: f64) -> f64 {
    clamped_normalize_within(p, delay, 1.0)
}
