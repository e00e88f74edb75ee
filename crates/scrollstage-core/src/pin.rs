//! Pin/layout controller
//!
//! A pinned cluster is sticky while its trigger is active. When the trigger
//! leaves forward, the cluster switches to absolute positioning in the
//! document at the top it occupied at that instant, so it scrolls away with
//! the content that follows. Entering back switches it to sticky again.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::trigger::{Region, TriggerEventKind};

/// How a cluster is laid out relative to the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum Positioning {
    /// Fixed `top` px below the viewport top
    Sticky { top: f64 },
    /// `top` px from the document top
    Absolute { top: f64 },
}

impl Positioning {
    /// Top edge on screen for a scroll offset
    pub fn screen_top(&self, scroll: f64) -> f64 {
        match *self {
            Positioning::Sticky { top } => top,
            Positioning::Absolute { top } => top - scroll,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PinController {
    cluster: String,
    sticky_top: f64,
    positioning: Positioning,
}

impl PinController {
    pub fn new(cluster: impl Into<String>, sticky_top: f64) -> Self {
        Self {
            cluster: cluster.into(),
            sticky_top,
            positioning: Positioning::Sticky { top: sticky_top },
        }
    }

    pub fn cluster(&self) -> &str {
        &self.cluster
    }

    pub fn positioning(&self) -> Positioning {
        self.positioning
    }

    pub fn screen_top(&self, scroll: f64) -> f64 {
        self.positioning.screen_top(scroll)
    }

    /// Release into the document flow at the end of `region`
    ///
    /// At scroll offset `region.end` the sticky cluster sits at
    /// `sticky_top` on screen, which is document top `region.end + sticky_top`.
    pub fn on_leave(&mut self, region: Region) {
        let top = region.end + self.sticky_top;
        debug!(cluster = %self.cluster, top, "pin released");
        self.positioning = Positioning::Absolute { top };
    }

    pub fn on_enter_back(&mut self) {
        debug!(cluster = %self.cluster, "pin re-engaged");
        self.positioning = Positioning::Sticky {
            top: self.sticky_top,
        };
    }

    /// Apply a trigger event; returns whether positioning changed
    pub fn handle(&mut self, kind: TriggerEventKind, region: Region) -> bool {
        let before = self.positioning;
        match kind {
            TriggerEventKind::Leave => self.on_leave(region),
            TriggerEventKind::EnterBack => self.on_enter_back(),
            _ => {}
        }
        before != self.positioning
    }
}
