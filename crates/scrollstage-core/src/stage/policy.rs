//! Staged, role-aware choreography policies
//!
//! A [`StagePolicy`] maps a cluster's global progress and an element index
//! to a [`VisualState`]: the stagger turns global progress into the
//! element's local progress, the index picks a [`Role`], and the role's
//! channel tracks are sampled at the local progress.

use serde::{Deserialize, Serialize};

use super::role::Role;
use super::stagger::Stagger;
use super::state::{Channel, LengthUnit, VisualState};
use super::track::Track;

/// One track per animatable channel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelTracks {
    pub x: Track,
    pub y: Track,
    pub z: Track,
    pub rotation: Track,
    pub rotation_y: Track,
    pub scale: Track,
    pub opacity: Track,
    pub unit: LengthUnit,
}

impl Default for ChannelTracks {
    fn default() -> Self {
        Self::identity()
    }
}

impl ChannelTracks {
    /// Tracks that hold the identity transform
    pub fn identity() -> Self {
        let state = VisualState::IDENTITY;
        Self {
            x: Track::constant(state.x),
            y: Track::constant(state.y),
            z: Track::constant(state.z),
            rotation: Track::constant(state.rotation),
            rotation_y: Track::constant(state.rotation_y),
            scale: Track::constant(state.scale),
            opacity: Track::constant(state.opacity),
            unit: state.unit,
        }
    }

    /// Replace one channel's track
    pub fn with(mut self, channel: Channel, track: Track) -> Self {
        *self.track_mut(channel) = track;
        self
    }

    pub fn track(&self, channel: Channel) -> &Track {
        match channel {
            Channel::X => &self.x,
            Channel::Y => &self.y,
            Channel::Z => &self.z,
            Channel::Rotation => &self.rotation,
            Channel::RotationY => &self.rotation_y,
            Channel::Scale => &self.scale,
            Channel::Opacity => &self.opacity,
        }
    }

    fn track_mut(&mut self, channel: Channel) -> &mut Track {
        match channel {
            Channel::X => &mut self.x,
            Channel::Y => &mut self.y,
            Channel::Z => &mut self.z,
            Channel::Rotation => &mut self.rotation,
            Channel::RotationY => &mut self.rotation_y,
            Channel::Scale => &mut self.scale,
            Channel::Opacity => &mut self.opacity,
        }
    }

    /// Sample every channel at local progress `p`
    pub fn sample(&self, p: f64) -> VisualState {
        let mut state = VisualState {
            unit: self.unit,
            ..VisualState::IDENTITY
        };
        for channel in Channel::ALL {
            state.set(channel, self.track(channel).sample(p));
        }
        state
    }
}

/// Declarative choreography for a cluster
///
/// `left` and `right` fall back to `center` when absent, so a policy with
/// no role-specific tracks treats every element alike.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StagePolicy {
    #[serde(default)]
    pub stagger: Stagger,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<ChannelTracks>,
    #[serde(default)]
    pub center: ChannelTracks,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub right: Option<ChannelTracks>,
}

impl StagePolicy {
    /// Same tracks for every role
    pub fn uniform(stagger: Stagger, tracks: ChannelTracks) -> Self {
        Self {
            stagger,
            left: None,
            center: tracks,
            right: None,
        }
    }

    pub fn tracks_for(&self, role: Role) -> &ChannelTracks {
        match role {
            Role::Left => self.left.as_ref().unwrap_or(&self.center),
            Role::Center => &self.center,
            Role::Right => self.right.as_ref().unwrap_or(&self.center),
        }
    }

    /// Local progress of element `index` for global `progress`
    pub fn local_progress(&self, progress: f64, index: usize) -> f64 {
        self.stagger.local(progress, index)
    }

    /// Three-phase card flip
    ///
    /// - [0, 0.2): fade in
    /// - [0, 0.4): rise from -100% to 50% while growing 0.25 → 0.75
    /// - [0.4, 0.6): settle to 0% at full scale
    /// - [0.6, 1]: slide from the role offset to center, untilt, flip 0 → 180°
    ///
    /// Before 0.6 the role offset and tilt are held fixed.
    pub fn card_flip() -> Self {
        let base = ChannelTracks::identity()
            .with(Channel::Opacity, Track::starting_at(0.0).ease_to(0.2, 1.0).build())
            .with(
                Channel::Y,
                Track::starting_at(-100.0).ease_to(0.4, 50.0).ease_to(0.6, 0.0).build(),
            )
            .with(
                Channel::Scale,
                Track::starting_at(0.25).ease_to(0.4, 0.75).ease_to(0.6, 1.0).build(),
            )
            .with(
                Channel::RotationY,
                Track::starting_at(0.0).hold_to(0.6).ease_to(1.0, 180.0).build(),
            );

        let converge = |offset: f64, tilt: f64| {
            base.clone()
                .with(Channel::X, Track::starting_at(offset).hold_to(0.6).ease_to(1.0, 0.0).build())
                .with(
                    Channel::Rotation,
                    Track::starting_at(tilt).hold_to(0.6).ease_to(1.0, 0.0).build(),
                )
        };

        Self {
            stagger: Stagger::new(0.5, 0.1).within(0.9),
            left: Some(converge(100.0, -5.0)),
            center: converge(0.0, 0.0),
            right: Some(converge(-100.0, 5.0)),
        }
    }

    /// Single-phase exit: every card drifts down and shrinks, the two edge
    /// cards also drift toward the middle and tilt in opposite directions
    pub fn hero_exit() -> Self {
        let center = ChannelTracks::identity()
            .with(Channel::Y, Track::single(0.0, 250.0))
            .with(Channel::Scale, Track::single(1.0, 0.75));
        let edge = |x: f64, rotation: f64| {
            center
                .clone()
                .with(Channel::X, Track::single(0.0, x))
                .with(Channel::Rotation, Track::single(0.0, rotation))
        };

        Self {
            stagger: Stagger::new(0.9, 0.1),
            left: Some(edge(90.0, -15.0)),
            right: Some(edge(-90.0, 15.0)),
            center,
        }
    }

    /// Section header rising through the viewport, done at 90% progress
    pub fn header_rise() -> Self {
        Self::uniform(
            Stagger::NONE.within(0.9),
            ChannelTracks::identity().with(Channel::Y, Track::single(400.0, -50.0)),
        )
    }

    /// Whole-cluster opacity fade
    pub fn container_fade(from: f64, to: f64) -> Self {
        Self::uniform(
            Stagger::NONE,
            ChannelTracks::identity().with(Channel::Opacity, Track::single(from, to)),
        )
    }
}

/// Visual state of element `index` at global `progress`
///
/// Total for every input: progress is clamped, out-of-range indices take
/// the center role, and a delay past the window leaves the element at its
/// initial state.
pub fn compute_state(progress: f64, index: usize, policy: &StagePolicy) -> VisualState {
    let local = policy.local_progress(progress, index);
    policy
        .tracks_for(Role::from_index(index))
        .sample(local)
        .normalized()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    /// Global progress that puts element `index` at local progress `local`
    fn global_for(policy: &StagePolicy, index: usize, local: f64) -> f64 {
        let s = policy.stagger;
        let delay = s.delay(index);
        delay + local * (s.window_end - delay)
    }

    #[test]
    fn test_card_flip_initial_state() {
        let policy = StagePolicy::card_flip();
        let state = compute_state(0.0, 0, &policy);
        assert_eq!(state.opacity, 0.0);
        assert_eq!(state.y, -100.0);
        assert_eq!(state.scale, 0.25);
        assert_eq!(state.x, 100.0);
        assert_eq!(state.rotation, -5.0);
        assert_eq!(state.rotation_y, 0.0);
    }

    #[test]
    fn test_card_flip_final_state() {
        let policy = StagePolicy::card_flip();
        for index in 0..3 {
            let state = compute_state(1.0, index, &policy);
            assert_eq!(state.x, 0.0);
            assert_eq!(state.y, 0.0);
            assert_eq!(state.rotation, 0.0);
            assert_eq!(state.rotation_y, 180.0);
            assert_eq!(state.scale, 1.0);
            assert_eq!(state.opacity, 1.0);
        }
    }

    #[test]
    fn test_card_flip_roles_hold_before_flip() {
        let policy = StagePolicy::card_flip();
        let expected = [(100.0, -5.0), (0.0, 0.0), (-100.0, 5.0)];
        for (index, (x, tilt)) in expected.into_iter().enumerate() {
            for local in [0.0, 0.2, 0.45, 0.599] {
                let state = compute_state(global_for(&policy, index, local), index, &policy);
                assert!(close(state.x, x), "index {} local {}: x {}", index, local, state.x);
                assert!(close(state.rotation, tilt));
                assert!(close(state.rotation_y, 0.0));
            }
        }
    }

    #[test]
    fn test_card_flip_settle_segment_midpoint() {
        let policy = StagePolicy::card_flip();
        let y = &policy.center.y;
        assert_eq!(y.segment_index(0.5), 1);

        // normalized (0.5 - 0.4) / 0.2 = 0.5 and smoothstep(0.5) = 0.5
        let state = policy.tracks_for(Role::Center).sample(0.5);
        assert!(close(state.y, 25.0));
        assert!(close(state.scale, 0.875));
    }

    #[test]
    fn test_card_flip_continuous_at_boundaries() {
        let policy = StagePolicy::card_flip();
        for role in [Role::Left, Role::Center, Role::Right] {
            let tracks = policy.tracks_for(role);
            for boundary in [0.2, 0.4, 0.6] {
                let before = tracks.sample(boundary - EPS);
                let at = tracks.sample(boundary);
                for channel in Channel::ALL {
                    assert!(
                        (before.get(channel) - at.get(channel)).abs() < 1e-5,
                        "{:?} {:?} jumps at {}",
                        role,
                        channel,
                        boundary
                    );
                }
            }
        }
    }

    #[test]
    fn test_card_flip_offset_held_exactly_until_flip() {
        let policy = StagePolicy::card_flip();
        let left = policy.tracks_for(Role::Left);
        // Held value right before the boundary is the role base, and the
        // interpolation starts from that same base
        assert_eq!(left.x.sample(0.6 - EPS), 100.0);
        assert_eq!(left.x.sample(0.6), 100.0);
        assert!(left.x.sample(0.6 + 0.01) < 100.0);
        assert_eq!(left.rotation.sample(0.6), -5.0);
    }

    #[test]
    fn test_card_flip_stagger_orders_elements() {
        let policy = StagePolicy::card_flip();
        let first = compute_state(0.3, 0, &policy);
        let third = compute_state(0.3, 2, &policy);
        assert!(first.opacity >= third.opacity);
        assert!(first.y >= third.y);
    }

    #[test]
    fn test_extra_cards_use_center_role() {
        let policy = StagePolicy::card_flip();
        let center = compute_state(0.3, 1, &policy);
        let extra = compute_state(0.3, 4, &policy);
        assert_eq!(extra.x, center.x);
        assert_eq!(extra.rotation, center.rotation);
    }

    #[test]
    fn test_hero_exit_mirrors_edges() {
        let policy = StagePolicy::hero_exit();
        let left = compute_state(1.0, 0, &policy);
        let middle = compute_state(1.0, 1, &policy);
        let right = compute_state(1.0, 2, &policy);

        assert_eq!(left.x, 90.0);
        assert_eq!(right.x, -90.0);
        assert_eq!(left.rotation, -15.0);
        assert_eq!(right.rotation, 15.0);
        assert_eq!(middle.x, 0.0);
        assert_eq!(middle.rotation, 0.0);
        for state in [left, middle, right] {
            assert_eq!(state.y, 250.0);
            assert_eq!(state.scale, 0.75);
        }
    }

    #[test]
    fn test_hero_exit_is_continuous_in_progress() {
        let policy = StagePolicy::hero_exit();
        for index in 0..3 {
            let mut prev = compute_state(0.0, index, &policy);
            for i in 1..=1000 {
                let state = compute_state(i as f64 / 1000.0, index, &policy);
                assert!((state.y - prev.y).abs() < 2.0);
                assert!((state.x - prev.x).abs() < 1.0);
                assert!(state.y >= prev.y);
                prev = state;
            }
        }
    }

    #[test]
    fn test_hero_exit_before_state() {
        let policy = StagePolicy::hero_exit();
        for index in 0..3 {
            let state = compute_state(0.0, index, &policy);
            assert_eq!(state, VisualState::IDENTITY);
        }
    }

    #[test]
    fn test_fully_delayed_element_stays_initial() {
        let policy = StagePolicy::hero_exit();
        // index 12 delays by 1.08, past the window
        for i in 0..100 {
            let state = compute_state(i as f64 / 100.0, 12, &policy);
            assert_eq!(state, VisualState::IDENTITY);
        }
    }

    #[test]
    fn test_header_rise_done_at_ninety_percent() {
        let policy = StagePolicy::header_rise();
        assert_eq!(compute_state(0.0, 0, &policy).y, 400.0);
        assert_eq!(compute_state(0.9, 0, &policy).y, -50.0);
        assert_eq!(compute_state(1.0, 0, &policy).y, -50.0);
    }

    #[test]
    fn test_container_fade() {
        let policy = StagePolicy::container_fade(1.0, 0.5);
        assert_eq!(compute_state(0.0, 0, &policy).opacity, 1.0);
        assert!(close(compute_state(0.5, 0, &policy).opacity, 0.75));
        assert_eq!(compute_state(1.0, 0, &policy).opacity, 0.5);
    }

    #[test]
    fn test_output_ranges_hold_everywhere() {
        for policy in [StagePolicy::card_flip(), StagePolicy::hero_exit()] {
            for index in 0..6 {
                for i in -10..=110 {
                    let state = compute_state(i as f64 / 100.0, index, &policy);
                    assert!((0.0..=1.0).contains(&state.opacity));
                    assert!(state.scale > 0.0);
                    assert!(state.x.is_finite() && state.y.is_finite());
                }
            }
        }
    }

    #[test]
    fn test_policy_serde_roundtrip_keeps_behaviour() {
        let policy = StagePolicy::card_flip();
        let json = serde_json::to_string(&policy).unwrap();
        let parsed: StagePolicy = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, policy);

        let partial: StagePolicy =
            serde_json::from_str(r#"{"center":{"y":[{"start":0.0,"end":1.0,"from":0.0,"to":10.0}]}}"#)
                .unwrap();
        let state = compute_state(1.0, 0, &partial);
        assert_eq!(state.y, 10.0);
        assert_eq!(state.scale, 1.0);
    }
}
