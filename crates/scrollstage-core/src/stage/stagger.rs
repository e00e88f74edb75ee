//! Per-element phase offsets

use serde::{Deserialize, Serialize};

use crate::scroll::clamped_normalize_within;

/// Index-proportional delay applied to a cluster's global progress
///
/// Element `i` is delayed by `i * step * scale` and reaches local progress 1
/// when global progress reaches `window_end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stagger {
    #[serde(default)]
    pub step: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default = "default_window_end")]
    pub window_end: f64,
}

fn default_scale() -> f64 {
    1.0
}

fn default_window_end() -> f64 {
    1.0
}

impl Default for Stagger {
    fn default() -> Self {
        Self::NONE
    }
}

impl Stagger {
    /// Every element follows global progress
    pub const NONE: Stagger = Stagger {
        step: 0.0,
        scale: 1.0,
        window_end: 1.0,
    };

    pub fn new(step: f64, scale: f64) -> Self {
        Self {
            step,
            scale,
            window_end: 1.0,
        }
    }

    /// Finish the local range at `window_end` instead of 1.0
    pub fn within(mut self, window_end: f64) -> Self {
        self.window_end = window_end;
        self
    }

    /// Progress offset for element `index`
    #[inline]
    pub fn delay(&self, index: usize) -> f64 {
        index as f64 * self.step * self.scale
    }

    /// Local progress of element `index`
    #[inline]
    pub fn local(&self, progress: f64, index: usize) -> f64 {
        clamped_normalize_within(progress, self.delay(index), self.window_end)
    }
}

/// Which element a timeline stagger starts from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StaggerFrom {
    #[default]
    Start,
    Center,
    End,
}

impl StaggerFrom {
    /// Distance of `index` from the origin, in element steps
    ///
    /// For `Center` with an even count the origin sits between the two
    /// middle elements, so distances are half-integers.
    pub fn distance(&self, index: usize, count: usize) -> f64 {
        if count == 0 {
            return 0.0;
        }
        let last = (count - 1) as f64;
        let i = index as f64;
        match self {
            StaggerFrom::Start => i,
            StaggerFrom::End => last - i,
            StaggerFrom::Center => (i - last / 2.0).abs(),
        }
    }

    /// Largest distance in a cluster of `count`
    pub fn max_distance(&self, count: usize) -> f64 {
        match count {
            0 => 0.0,
            n => match self {
                StaggerFrom::Center => (n - 1) as f64 / 2.0,
                _ => (n - 1) as f64,
            },
        }
    }
}
