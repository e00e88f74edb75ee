//! L4 Atomic Layer: Configuration helpers for smooth scrolling

use std::time::Duration;

pub use crate::config::{EasingType, ScrollConfig};

use super::animation::SmoothingMode;

/// Extension trait for ScrollConfig with utility methods
pub trait ScrollConfigExt {
    /// Get page tween duration as Duration
    fn animation_duration(&self) -> Duration;

    /// Get tick duration for the frame loop
    fn animation_tick_duration(&self) -> Duration;

    /// Check if smooth scrolling is effectively enabled
    fn is_smooth(&self) -> bool;

    /// Smoothing regime for the page-level scroller
    fn page_mode(&self) -> SmoothingMode;

    /// Smoothing regime for a section-level scroller
    fn section_mode(&self) -> SmoothingMode;

    /// Lag smoothing window, if enabled
    fn lag_smoothing(&self) -> Option<(Duration, Duration)>;
}

impl ScrollConfigExt for ScrollConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    #[inline]
    fn animation_tick_duration(&self) -> Duration {
        if self.animation_fps == 0 {
            Duration::from_millis(16) // ~60fps fallback
        } else {
            Duration::from_millis(1000 / self.animation_fps as u64)
        }
    }

    #[inline]
    fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.duration_ms > 0
    }

    fn page_mode(&self) -> SmoothingMode {
        if self.is_smooth() {
            SmoothingMode::Duration {
                duration: self.animation_duration(),
                easing: self.easing,
            }
        } else {
            SmoothingMode::Immediate
        }
    }

    fn section_mode(&self) -> SmoothingMode {
        if self.smooth_enabled && self.section_lerp > 0.0 {
            SmoothingMode::Lerp {
                factor: self.section_lerp.min(1.0),
            }
        } else {
            SmoothingMode::Immediate
        }
    }

    fn lag_smoothing(&self) -> Option<(Duration, Duration)> {
        if self.lag_threshold_ms == 0 {
            None
        } else {
            Some((
                Duration::from_millis(self.lag_threshold_ms),
                Duration::from_millis(self.adjusted_lag_ms),
            ))
        }
    }
}
