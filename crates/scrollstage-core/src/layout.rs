//! Geometry supplied by the rendering layer
//!
//! The engine reads anchor boxes and the viewport through [`LayoutHost`]
//! every frame and never caches them across frames, because pin spacing
//! reserved by the engine itself moves everything below a pinned section.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// An element box in document coordinates (px from the top of the page)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnchorRect {
    pub top: f64,
    pub height: f64,
}

impl AnchorRect {
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1440.0,
            height: 900.0,
        }
    }
}

/// Read access to page geometry plus the one layout side effect the
/// engine owns (pin spacing)
pub trait LayoutHost {
    /// Box of an anchor element, or None if it is not on the page
    fn anchor(&self, id: &str) -> Option<AnchorRect>;

    fn viewport(&self) -> Viewport;

    /// Number of elements in a cluster (0 if the cluster is absent)
    fn element_count(&self, cluster: &str) -> usize;

    /// Maximum scroll offset
    fn scroll_limit(&self) -> f64;

    /// Reserve `distance` px of scroll after a pinned anchor
    fn reserve_pin_spacing(&mut self, anchor: &str, distance: f64);
}

/// A vertical section in the page flow
#[derive(Debug, Clone, PartialEq)]
struct SectionBox {
    id: String,
    height: f64,
}

/// In-memory page: sections stacked top to bottom plus element clusters
#[derive(Debug, Clone, Default)]
pub struct PageLayout {
    viewport: Viewport,
    sections: Vec<SectionBox>,
    clusters: HashMap<String, usize>,
    pin_spacing: HashMap<String, f64>,
}

impl PageLayout {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            ..Default::default()
        }
    }

    /// Append a section of the given height to the page flow
    pub fn with_section(mut self, id: impl Into<String>, height: f64) -> Self {
        self.push_section(id, height);
        self
    }

    /// Register a cluster with `count` elements
    pub fn with_cluster(mut self, id: impl Into<String>, count: usize) -> Self {
        self.clusters.insert(id.into(), count);
        self
    }

    pub fn push_section(&mut self, id: impl Into<String>, height: f64) {
        self.sections.push(SectionBox {
            id: id.into(),
            height: height.max(0.0),
        });
    }

    pub fn set_cluster(&mut self, id: impl Into<String>, count: usize) {
        self.clusters.insert(id.into(), count);
    }

    /// Pin spacing currently reserved after an anchor
    pub fn pin_spacing(&self, anchor: &str) -> f64 {
        self.pin_spacing.get(anchor).copied().unwrap_or(0.0)
    }

    /// Total document height including reserved pin spacing
    pub fn document_height(&self) -> f64 {
        self.sections
            .iter()
            .map(|s| s.height + self.pin_spacing(&s.id))
            .sum()
    }
}

impl LayoutHost for PageLayout {
    fn anchor(&self, id: &str) -> Option<AnchorRect> {
        let mut top = 0.0;
        for section in &self.sections {
            if section.id == id {
                return Some(AnchorRect {
                    top,
                    height: section.height,
                });
            }
            top += section.height + self.pin_spacing(&section.id);
        }
        None
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn element_count(&self, cluster: &str) -> usize {
        self.clusters.get(cluster).copied().unwrap_or(0)
    }

    fn scroll_limit(&self) -> f64 {
        (self.document_height() - self.viewport.height).max(0.0)
    }

    fn reserve_pin_spacing(&mut self, anchor: &str, distance: f64) {
        self.pin_spacing.insert(anchor.to_string(), distance.max(0.0));
    }
}
