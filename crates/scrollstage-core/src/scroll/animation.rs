//! L3 Molecular Layer: Smooth scroll emulator
//!
//! Combines easing functions and timing utilities into a virtual scroll
//! offset that trails the physical (input) offset. Feed input with
//! [`SmoothScroller::push`], then call [`SmoothScroller::update`] once per
//! frame with the frame timestamp.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::{ScrollConfig, ScrollConfigExt};
use super::easing::{EasingType, EasingTypeExt};
use super::timing::{damp, is_complete, lerp, progress};

/// How the virtual offset chases the physical offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SmoothingMode {
    /// Virtual offset equals physical offset
    Immediate,
    /// Each new target restarts an eased tween of fixed duration
    Duration { duration: Duration, easing: EasingType },
    /// Exponential approach by `factor` per 60 Hz frame
    Lerp { factor: f64 },
}

/// Raw scroll input from the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScrollInput {
    /// Wheel delta in pixels (positive = down)
    Wheel(f64),
    /// Touch/gesture delta in pixels (positive = down)
    Touch(f64),
    /// Smoothly scroll to an absolute offset
    ScrollTo(f64),
    /// Jump to an absolute offset without smoothing
    JumpTo(f64),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    #[default]
    Forward,
    Backward,
}

/// Published scroll state for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrollState {
    /// Offset the input has requested
    pub physical_offset: f64,
    /// Smoothed offset that triggers read
    pub virtual_offset: f64,
    /// Virtual offset change during the last frame
    pub velocity: f64,
    /// Direction of the last non-zero virtual movement
    pub direction: ScrollDirection,
}

impl ScrollState {
    /// Distance the virtual offset still trails the physical one
    #[inline]
    pub fn lag(&self) -> f64 {
        self.physical_offset - self.virtual_offset
    }
}

/// Active tween state for duration-based smoothing
#[derive(Debug, Clone)]
struct ActiveTween {
    /// Frame timestamp the tween started at
    start: Duration,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

/// Inertial scroll position tracker
///
/// Page-level and section-level instances coexist, each with its own
/// smoothing regime. Deltas pushed between frames are batched and
/// applied on the next `update`.
#[derive(Debug, Clone)]
pub struct SmoothScroller {
    mode: SmoothingMode,
    state: ScrollState,
    /// Maximum scroll offset
    limit: f64,
    tween: Option<ActiveTween>,
    /// Smoothed delta accumulated since the last frame
    pending_delta: f64,
    /// Unsmoothed delta accumulated since the last frame
    pending_immediate: f64,
    /// Absolute target requested since the last frame
    pending_target: Option<(f64, bool)>,
    last_frame: Option<Duration>,
    mouse_multiplier: f64,
    touch_multiplier: f64,
    smooth_touch: bool,
    settle_epsilon: f64,
}

impl SmoothScroller {
    /// Create a scroller with an explicit smoothing regime
    pub fn new(mode: SmoothingMode, config: &ScrollConfig) -> Self {
        Self {
            mode,
            state: ScrollState::default(),
            limit: f64::INFINITY,
            tween: None,
            pending_delta: 0.0,
            pending_immediate: 0.0,
            pending_target: None,
            last_frame: None,
            mouse_multiplier: config.mouse_multiplier,
            touch_multiplier: config.touch_multiplier,
            smooth_touch: config.smooth_touch,
            settle_epsilon: config.settle_epsilon.max(0.0),
        }
    }

    /// Page-level scroller (duration easing)
    pub fn page(config: &ScrollConfig) -> Self {
        Self::new(config.page_mode(), config)
    }

    /// Section-level scroller (per-frame lerp)
    pub fn section(config: &ScrollConfig) -> Self {
        Self::new(config.section_mode(), config)
    }

    #[inline]
    pub fn state(&self) -> ScrollState {
        self.state
    }

    #[inline]
    pub fn virtual_offset(&self) -> f64 {
        self.state.virtual_offset
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Set the maximum scroll offset, clamping current offsets into range
    pub fn set_limit(&mut self, limit: f64) {
        self.limit = limit.max(0.0);
        if self.state.physical_offset > self.limit {
            self.state.physical_offset = self.limit;
            if let Some(ref mut tween) = self.tween {
                tween.to = tween.to.min(self.limit);
            }
        }
        if self.state.virtual_offset > self.limit {
            self.state.virtual_offset = self.limit;
        }
    }

    /// Check if the virtual offset is still catching up
    #[inline]
    pub fn is_animating(&self) -> bool {
        self.tween.is_some() || self.state.virtual_offset != self.state.physical_offset
    }

    /// Check if there's pending work (animation or unapplied input)
    #[inline]
    pub fn needs_update(&self) -> bool {
        self.is_animating()
            || self.pending_delta != 0.0
            || self.pending_immediate != 0.0
            || self.pending_target.is_some()
    }

    /// Queue raw input for the next frame
    pub fn push(&mut self, input: ScrollInput) {
        match input {
            ScrollInput::Wheel(delta) => self.pending_delta += delta * self.mouse_multiplier,
            ScrollInput::Touch(delta) => {
                let delta = delta * self.touch_multiplier;
                if self.smooth_touch {
                    self.pending_delta += delta;
                } else {
                    self.pending_immediate += delta;
                }
            }
            ScrollInput::ScrollTo(offset) => {
                self.pending_target = Some((offset, false));
                self.pending_delta = 0.0;
            }
            ScrollInput::JumpTo(offset) => {
                self.pending_target = Some((offset, true));
                self.pending_delta = 0.0;
                self.pending_immediate = 0.0;
            }
        }
    }

    /// Set both offsets immediately and drop any animation
    pub fn reset_to(&mut self, offset: f64) {
        let offset = self.clamp(offset);
        self.tween = None;
        self.pending_delta = 0.0;
        self.pending_immediate = 0.0;
        self.pending_target = None;
        self.state.physical_offset = offset;
        self.state.virtual_offset = offset;
        self.state.velocity = 0.0;
    }

    /// Advance one frame and publish the new state
    ///
    /// `now` is the frame timestamp, monotonically non-decreasing.
    pub fn update(&mut self, now: Duration) -> ScrollState {
        let last = self.last_frame.replace(now);
        let dt = last.map(|last| now.saturating_sub(last)).unwrap_or(Duration::ZERO);
        let previous = self.state.virtual_offset;

        // Input arrived during the last frame interval, so a new tween
        // already has `dt` of progress when this frame samples it
        self.apply_pending(last.unwrap_or(now));

        match self.mode {
            SmoothingMode::Immediate => {
                self.state.virtual_offset = self.state.physical_offset;
            }
            SmoothingMode::Duration { .. } => {
                if let Some(ref tween) = self.tween {
                    let elapsed = now.saturating_sub(tween.start);
                    if is_complete(elapsed, tween.duration) {
                        self.state.virtual_offset = tween.to;
                        self.tween = None;
                    } else {
                        let t = tween.easing.apply(progress(elapsed, tween.duration));
                        self.state.virtual_offset = lerp(tween.from, tween.to, t);
                    }
                }
            }
            SmoothingMode::Lerp { factor } => {
                let target = self.state.physical_offset;
                let next = damp(
                    self.state.virtual_offset,
                    target,
                    factor * 60.0,
                    dt.as_secs_f64(),
                );
                self.state.virtual_offset = if (target - next).abs() <= self.settle_epsilon {
                    target
                } else {
                    next
                };
            }
        }

        self.state.velocity = self.state.virtual_offset - previous;
        if self.state.velocity > 0.0 {
            self.state.direction = ScrollDirection::Forward;
        } else if self.state.velocity < 0.0 {
            self.state.direction = ScrollDirection::Backward;
        }

        self.state
    }

    /// Apply batched input; a retargeted tween starts at `tween_start`
    fn apply_pending(&mut self, tween_start: Duration) {
        if self.pending_immediate != 0.0 {
            let offset = self.clamp(self.state.physical_offset + self.pending_immediate);
            self.pending_immediate = 0.0;
            self.tween = None;
            self.state.physical_offset = offset;
            self.state.virtual_offset = offset;
        }

        let mut target = None;
        if let Some((offset, immediate)) = self.pending_target.take() {
            let offset = self.clamp(offset);
            if immediate {
                self.tween = None;
                self.state.physical_offset = offset;
                self.state.virtual_offset = offset;
            } else {
                target = Some(offset);
            }
        }
        if self.pending_delta != 0.0 {
            let base = target.unwrap_or(self.state.physical_offset);
            target = Some(self.clamp(base + self.pending_delta));
            self.pending_delta = 0.0;
        }

        let Some(target) = target else {
            return;
        };
        self.state.physical_offset = target;

        if let SmoothingMode::Duration { duration, easing } = self.mode {
            // Restart from the visible position toward the new target
            self.tween = if target != self.state.virtual_offset {
                Some(ActiveTween {
                    start: tween_start,
                    from: self.state.virtual_offset,
                    to: target,
                    duration,
                    easing,
                })
            } else {
                None
            };
        }
    }

    #[inline]
    fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(n: u64) -> Duration {
        Duration::from_micros(n * 16_667)
    }

    fn drive_to_rest(scroller: &mut SmoothScroller, max_frames: u64) -> Vec<f64> {
        let mut offsets = Vec::new();
        for n in 0..max_frames {
            offsets.push(scroller.update(frame(n)).virtual_offset);
            if !scroller.is_animating() {
                break;
            }
        }
        offsets
    }

    fn assert_converges(offsets: &[f64], target: f64) {
        for pair in offsets.windows(2) {
            let before = (target - pair[0]).abs();
            let after = (target - pair[1]).abs();
            assert!(
                after < before || after == 0.0,
                "distance did not shrink: {} -> {}",
                before,
                after
            );
            assert!(pair[1] <= target + 1e-9, "overshoot: {}", pair[1]);
        }
        assert!((offsets[offsets.len() - 1] - target).abs() < 1e-9);
    }

    #[test]
    fn test_immediate_when_disabled() {
        let config = ScrollConfig {
            smooth_enabled: false,
            ..Default::default()
        };
        let mut scroller = SmoothScroller::page(&config);
        scroller.push(ScrollInput::Wheel(300.0));
        let state = scroller.update(frame(0));
        assert_eq!(state.virtual_offset, 300.0);
        assert!(!scroller.is_animating());
    }

    #[test]
    fn test_duration_mode_converges_monotonically() {
        let mut scroller = SmoothScroller::page(&ScrollConfig::default());
        scroller.push(ScrollInput::Wheel(1000.0));
        // 1.2s at 60fps is 72 frames
        let offsets = drive_to_rest(&mut scroller, 200);
        assert!(offsets.len() <= 80, "took {} frames", offsets.len());
        assert_converges(&offsets, 1000.0);
    }

    #[test]
    fn test_lerp_mode_converges_monotonically() {
        let mut scroller = SmoothScroller::section(&ScrollConfig::default());
        scroller.push(ScrollInput::Wheel(1000.0));
        let offsets = drive_to_rest(&mut scroller, 1000);
        assert!(offsets.len() < 300, "took {} frames", offsets.len());
        assert_converges(&offsets, 1000.0);
    }

    #[test]
    fn test_wheel_batching() {
        let mut scroller = SmoothScroller::page(&ScrollConfig::default());
        scroller.push(ScrollInput::Wheel(100.0));
        scroller.push(ScrollInput::Wheel(100.0));
        scroller.push(ScrollInput::Wheel(100.0));
        let state = scroller.update(frame(0));
        assert_eq!(state.physical_offset, 300.0);
        assert_eq!(state.virtual_offset, 0.0);
        assert!(scroller.is_animating());
    }

    #[test]
    fn test_holds_without_input() {
        let mut scroller = SmoothScroller::page(&ScrollConfig::default());
        scroller.reset_to(420.0);
        for n in 0..10 {
            let state = scroller.update(frame(n));
            assert_eq!(state.virtual_offset, 420.0);
            assert_eq!(state.velocity, 0.0);
        }
    }

    #[test]
    fn test_limit_clamps_target() {
        let mut scroller = SmoothScroller::page(&ScrollConfig::default());
        scroller.set_limit(500.0);
        scroller.push(ScrollInput::Wheel(2000.0));
        scroller.update(frame(0));
        assert_eq!(scroller.state().physical_offset, 500.0);

        scroller.push(ScrollInput::Wheel(-5000.0));
        scroller.update(frame(1));
        assert_eq!(scroller.state().physical_offset, 0.0);
    }

    #[test]
    fn test_touch_is_immediate_unless_smoothed() {
        let mut scroller = SmoothScroller::page(&ScrollConfig::default());
        scroller.push(ScrollInput::Touch(50.0));
        let state = scroller.update(frame(0));
        assert_eq!(state.virtual_offset, 100.0);

        let config = ScrollConfig {
            smooth_touch: true,
            ..Default::default()
        };
        let mut smooth = SmoothScroller::page(&config);
        smooth.push(ScrollInput::Touch(50.0));
        let state = smooth.update(frame(0));
        assert_eq!(state.physical_offset, 100.0);
        assert_eq!(state.virtual_offset, 0.0);
    }

    #[test]
    fn test_jump_bypasses_smoothing() {
        let mut scroller = SmoothScroller::page(&ScrollConfig::default());
        scroller.push(ScrollInput::Wheel(300.0));
        scroller.update(frame(0));
        scroller.push(ScrollInput::JumpTo(1500.0));
        let state = scroller.update(frame(1));
        assert_eq!(state.virtual_offset, 1500.0);
        assert!(!scroller.is_animating());
    }

    #[test]
    fn test_retarget_mid_tween_starts_from_visible_offset() {
        let mut scroller = SmoothScroller::page(&ScrollConfig::default());
        scroller.push(ScrollInput::Wheel(1000.0));
        scroller.update(frame(0));
        let mid = scroller.update(frame(10)).virtual_offset;
        assert!(mid > 0.0 && mid < 1000.0);

        scroller.push(ScrollInput::Wheel(-500.0));
        let state = scroller.update(frame(11));
        assert_eq!(state.physical_offset, 500.0);
        // the new tween starts at `mid` and already moved one frame toward 500
        assert!(state.virtual_offset > mid && state.virtual_offset < 500.0);
    }

    #[test]
    fn test_first_frame_after_input_moves() {
        let mut scroller = SmoothScroller::page(&ScrollConfig::default());
        scroller.update(frame(0));
        scroller.push(ScrollInput::Wheel(1000.0));
        let state = scroller.update(frame(1));
        assert!(state.virtual_offset > 0.0 && state.virtual_offset < 1000.0);
        assert!(state.velocity > 0.0);
    }

    #[test]
    fn test_streamed_wheel_keeps_moving() {
        let mut scroller = SmoothScroller::page(&ScrollConfig::default());
        scroller.update(frame(0));
        let mut last = 0.0;
        for n in 1..=30 {
            scroller.push(ScrollInput::Wheel(20.0));
            let state = scroller.update(frame(n));
            assert_eq!(state.physical_offset, 20.0 * n as f64);
            assert!(
                state.virtual_offset > last,
                "stalled at frame {}: {} -> {}",
                n,
                last,
                state.virtual_offset
            );
            assert!(state.virtual_offset < state.physical_offset);
            last = state.virtual_offset;
        }
    }

    #[test]
    fn test_direction_tracks_movement() {
        let mut scroller = SmoothScroller::section(&ScrollConfig::default());
        scroller.push(ScrollInput::Wheel(400.0));
        scroller.update(frame(0));
        let state = scroller.update(frame(1));
        assert_eq!(state.direction, ScrollDirection::Forward);

        scroller.push(ScrollInput::JumpTo(0.0));
        let state = scroller.update(frame(2));
        assert_eq!(state.direction, ScrollDirection::Backward);
        assert!(state.velocity < 0.0);
    }
}
