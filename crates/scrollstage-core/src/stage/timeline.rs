//! Scrubbed timelines
//!
//! Tweens are laid out on a time axis (seconds) and the whole timeline is
//! scrubbed by trigger progress: progress `p` samples time
//! `p * timeline.duration()`. Staggered tweens offset each element's start
//! by `each * distance`, where the distance is measured from the stagger
//! origin (start, center or end of the cluster).

use serde::{Deserialize, Serialize};

use super::stagger::StaggerFrom;
use super::state::{Channel, LengthUnit, VisualState};
use crate::scroll::{lerp, EasingType, EasingTypeExt};

/// A subset of visual channels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation_y: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<LengthUnit>,
}

impl PartialState {
    pub fn get(&self, channel: Channel) -> Option<f64> {
        match channel {
            Channel::X => self.x,
            Channel::Y => self.y,
            Channel::Z => self.z,
            Channel::Rotation => self.rotation,
            Channel::RotationY => self.rotation_y,
            Channel::Scale => self.scale,
            Channel::Opacity => self.opacity,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimelineStagger {
    /// Seconds between consecutive elements
    pub each: f64,
    #[serde(default)]
    pub from: StaggerFrom,
}

/// One tween of a cluster's elements from `from` to `to`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tween {
    /// Cluster id
    pub target: String,
    /// Start time in seconds
    #[serde(default)]
    pub position: f64,
    #[serde(default = "default_duration")]
    pub duration: f64,
    #[serde(default = "default_ease")]
    pub ease: EasingType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stagger: Option<TimelineStagger>,
    /// Starting values; channels missing here start from the running state
    #[serde(default)]
    pub from: PartialState,
    pub to: PartialState,
}

fn default_duration() -> f64 {
    0.5
}

fn default_ease() -> EasingType {
    EasingType::Quadratic
}

impl Tween {
    pub fn new(target: impl Into<String>, from: PartialState, to: PartialState) -> Self {
        Self {
            target: target.into(),
            position: 0.0,
            duration: default_duration(),
            ease: default_ease(),
            stagger: None,
            from,
            to,
        }
    }

    pub fn at(mut self, position: f64) -> Self {
        self.position = position;
        self
    }

    pub fn staggered(mut self, each: f64, from: StaggerFrom) -> Self {
        self.stagger = Some(TimelineStagger { each, from });
        self
    }

    /// Start time of element `index` in a cluster of `count`
    pub fn start_for(&self, index: usize, count: usize) -> f64 {
        let offset = self
            .stagger
            .map(|s| s.each * s.from.distance(index, count))
            .unwrap_or(0.0);
        self.position + offset
    }

    /// Time the last element finishes
    pub fn end(&self, count: usize) -> f64 {
        let spread = self
            .stagger
            .map(|s| s.each * s.from.max_distance(count))
            .unwrap_or(0.0);
        self.position + self.duration.max(0.0) + spread
    }

    /// Eased completion of element `index` at `time`
    fn completion(&self, time: f64, index: usize, count: usize) -> f64 {
        let start = self.start_for(index, count);
        let t = if self.duration <= 0.0 {
            if time >= start { 1.0 } else { 0.0 }
        } else {
            ((time - start) / self.duration).clamp(0.0, 1.0)
        };
        self.ease.apply(t)
    }
}

/// Tweens scrubbed together by one trigger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Timeline {
    pub name: String,
    #[serde(default)]
    pub tweens: Vec<Tween>,
}

impl Timeline {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tweens: Vec::new(),
        }
    }

    pub fn tween(mut self, tween: Tween) -> Self {
        self.tweens.push(tween);
        self
    }

    /// Total duration given each target's element count
    pub fn duration<F>(&self, count_of: F) -> f64
    where
        F: Fn(&str) -> usize,
    {
        self.tweens
            .iter()
            .map(|t| t.end(count_of(&t.target)))
            .fold(0.0, f64::max)
    }

    /// State of element `index` of `target` at timeline `progress`
    ///
    /// Tweens apply in order; a later tween on the same channel wins.
    pub fn state<F>(&self, target: &str, index: usize, progress: f64, count_of: F) -> VisualState
    where
        F: Fn(&str) -> usize,
    {
        let time = progress.clamp(0.0, 1.0) * self.duration(&count_of);
        let count = count_of(target);

        let mut state = VisualState::IDENTITY;
        for tween in self.tweens.iter().filter(|t| t.target == target) {
            if let Some(unit) = tween.to.unit.or(tween.from.unit) {
                state.unit = unit;
            }
            let eased = tween.completion(time, index, count);
            for channel in Channel::ALL {
                if let Some(to) = tween.to.get(channel) {
                    let from = tween.from.get(channel).unwrap_or(state.get(channel));
                    state.set(channel, lerp(from, to, eased));
                }
            }
        }
        state.normalized()
    }

    /// The scroll gallery: panel slides up a full height, images drift up
    /// 150px one after another, title characters unfold from the center
    /// outwards, and the subtitle fades in a quarter second in
    pub fn gallery() -> Self {
        Timeline::new("gallery")
            .tween(Tween::new(
                "scroll-gallery",
                PartialState::default(),
                PartialState {
                    y: Some(-100.0),
                    ..Default::default()
                },
            ))
            .tween(
                Tween::new(
                    "gallery-images",
                    PartialState::default(),
                    PartialState {
                        y: Some(-150.0),
                        unit: Some(LengthUnit::Pixels),
                        ..Default::default()
                    },
                )
                .staggered(0.05, StaggerFrom::Start),
            )
            .tween(
                Tween::new(
                    "title-chars",
                    PartialState {
                        scale: Some(0.0),
                        y: Some(-60.0),
                        z: Some(-40.0),
                        rotation_y: Some(180.0),
                        ..Default::default()
                    },
                    PartialState {
                        scale: Some(1.0),
                        y: Some(0.0),
                        z: Some(0.0),
                        rotation_y: Some(0.0),
                        ..Default::default()
                    },
                )
                .staggered(0.1, StaggerFrom::Center),
            )
            .tween(
                Tween::new(
                    "subtitle",
                    PartialState {
                        opacity: Some(0.0),
                        ..Default::default()
                    },
                    PartialState {
                        opacity: Some(1.0),
                        ..Default::default()
                    },
                )
                .at(0.25),
            )
    }
}
