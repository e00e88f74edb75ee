use serde::{Deserialize, Serialize};

/// Smallest scale a state may carry
pub const MIN_SCALE: f64 = 1e-3;

/// Unit of the x/y translation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// Percent of the element's own box
    #[default]
    Percent,
    Pixels,
}

/// One element's transform for the current frame
///
/// Applied verbatim by the renderer. `x`/`y` are in `unit`, `z` is in
/// pixels, rotations in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub rotation: f64,
    pub rotation_y: f64,
    pub scale: f64,
    pub opacity: f64,
    pub unit: LengthUnit,
}

impl Default for VisualState {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl VisualState {
    pub const IDENTITY: VisualState = VisualState {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        rotation: 0.0,
        rotation_y: 0.0,
        scale: 1.0,
        opacity: 1.0,
        unit: LengthUnit::Percent,
    };

    pub fn get(&self, channel: Channel) -> f64 {
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

    pub fn set(&mut self, channel: Channel, value: f64) {
        match channel {
            Channel::X => self.x = value,
            Channel::Y => self.y = value,
            Channel::Z => self.z = value,
            Channel::Rotation => self.rotation = value,
            Channel::RotationY => self.rotation_y = value,
            Channel::Scale => self.scale = value,
            Channel::Opacity => self.opacity = value,
        }
    }

    /// Clamp opacity into [0, 1] and keep scale positive
    pub fn normalized(mut self) -> Self {
        self.opacity = self.opacity.clamp(0.0, 1.0);
        self.scale = self.scale.max(MIN_SCALE);
        self
    }
}

/// One animatable field of a [`VisualState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    X,
    Y,
    Z,
    Rotation,
    RotationY,
    Scale,
    Opacity,
}

impl Channel {
    pub const ALL: [Channel; 7] = [
        Channel::X,
        Channel::Y,
        Channel::Z,
        Channel::Rotation,
        Channel::RotationY,
        Channel::Scale,
        Channel::Opacity,
    ];
}
