//! Declarative scene description
//!
//! A scene lists the page sections, the triggers observing them, and the
//! element clusters each trigger drives. Scenes load from TOML or JSON;
//! [`Scene::landing_page`] is the built-in marketing page.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::layout::{PageLayout, Viewport};
use crate::stage::{StagePolicy, Timeline};
use crate::trigger::{EndBound, Position, TriggerDef};
use crate::{Error, Result};

/// A vertical section of the page flow; height is `height_px + height_vh * viewport`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDef {
    pub id: String,
    #[serde(default)]
    pub height_px: f64,
    #[serde(default)]
    pub height_vh: f64,
}

impl SectionDef {
    pub fn viewports(id: impl Into<String>, height_vh: f64) -> Self {
        Self {
            id: id.into(),
            height_px: 0.0,
            height_vh,
        }
    }

    pub fn height(&self, viewport: Viewport) -> f64 {
        self.height_px + self.height_vh * viewport.height
    }
}

/// How a cluster's elements respond to progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Choreography {
    CardFlip,
    HeroExit,
    HeaderRise,
    ContainerFade { from: f64, to: f64 },
    Staged { policy: StagePolicy },
    /// Scrubbed by a named timeline in [`Scene::timelines`]
    Timeline { name: String },
}

impl Choreography {
    /// Policy for policy-driven choreographies; None for timelines
    pub fn policy(&self) -> Option<StagePolicy> {
        match self {
            Choreography::CardFlip => Some(StagePolicy::card_flip()),
            Choreography::HeroExit => Some(StagePolicy::hero_exit()),
            Choreography::HeaderRise => Some(StagePolicy::header_rise()),
            Choreography::ContainerFade { from, to } => Some(StagePolicy::container_fade(*from, *to)),
            Choreography::Staged { policy } => Some(policy.clone()),
            Choreography::Timeline { .. } => None,
        }
    }
}

/// Hold a cluster on screen over a pinned trigger's range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PinDef {
    /// Trigger whose Leave/EnterBack switch positioning
    pub trigger: String,
    /// Sticky offset below the viewport top, px
    #[serde(default)]
    pub sticky_top: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterDef {
    pub id: String,
    /// Trigger whose progress drives the choreography
    pub trigger: String,
    /// Number of elements
    pub elements: usize,
    pub choreography: Choreography,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin: Option<PinDef>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub sections: Vec<SectionDef>,
    /// Named section-level scrollers triggers may read from
    #[serde(default)]
    pub scrollers: Vec<String>,
    #[serde(default)]
    pub triggers: Vec<TriggerDef>,
    #[serde(default)]
    pub clusters: Vec<ClusterDef>,
    #[serde(default)]
    pub timelines: Vec<Timeline>,
}

impl Scene {
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Ok(serde_json::from_str(&content)?),
            _ => Self::from_toml(&content),
        }
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Other(e.to_string()))
    }

    pub fn timeline(&self, name: &str) -> Option<&Timeline> {
        self.timelines.iter().find(|t| t.name == name)
    }

    pub fn cluster(&self, id: &str) -> Option<&ClusterDef> {
        self.clusters.iter().find(|c| c.id == id)
    }

    /// In-memory layout with every section and cluster of the scene
    pub fn layout(&self, viewport: Viewport) -> PageLayout {
        let mut layout = PageLayout::new(viewport);
        for section in &self.sections {
            layout.push_section(section.id.clone(), section.height(viewport));
        }
        for cluster in &self.clusters {
            layout.set_cluster(cluster.id.clone(), cluster.elements);
        }
        layout
    }

    /// The marketing page: hero cards exiting, a pinned services section
    /// with flip cards and a rising header, then the scroll gallery
    pub fn landing_page() -> Self {
        let four_viewports = EndBound::viewports(4.0);
        let triggers = vec![
            TriggerDef::new(
                "hero",
                "home",
                Position::TOP_TOP,
                EndBound::At(parse_position("75% top")),
            ),
            TriggerDef::new("services-pin", "services", Position::TOP_TOP, four_viewports).pinned(),
            TriggerDef::new(
                "services-flip",
                "services",
                parse_position("top bottom"),
                four_viewports,
            ),
            TriggerDef::new(
                "gallery",
                "scroll",
                Position::TOP_TOP,
                EndBound::At(parse_position("bottom bottom")),
            )
            .on_scroller("gallery"),
        ];

        let cluster = |id: &str, trigger: &str, elements: usize, choreography: Choreography| ClusterDef {
            id: id.to_string(),
            trigger: trigger.to_string(),
            elements,
            choreography,
            pin: None,
        };
        let gallery = || Choreography::Timeline {
            name: "gallery".to_string(),
        };

        let clusters = vec![
            cluster(
                "hero-container",
                "hero",
                1,
                Choreography::ContainerFade { from: 1.0, to: 0.5 },
            ),
            cluster("hero-cards", "hero", 3, Choreography::HeroExit),
            cluster("services-header", "services-flip", 1, Choreography::HeaderRise),
            ClusterDef {
                pin: Some(PinDef {
                    trigger: "services-pin".to_string(),
                    sticky_top: 0.0,
                }),
                ..cluster("cards", "services-flip", 3, Choreography::CardFlip)
            },
            cluster("scroll-gallery", "gallery", 1, gallery()),
            cluster("gallery-images", "gallery", 6, gallery()),
            cluster("title-chars", "gallery", 6, gallery()),
            cluster("subtitle", "gallery", 2, gallery()),
        ];

        Self {
            sections: vec![
                SectionDef::viewports("home", 1.0),
                SectionDef::viewports("services", 1.0),
                SectionDef::viewports("scroll", 3.0),
                SectionDef::viewports("footer", 1.0),
            ],
            scrollers: vec!["gallery".to_string()],
            triggers,
            clusters,
            timelines: vec![Timeline::gallery()],
        }
    }
}

/// Parse a position literal known to be valid
fn parse_position(s: &str) -> Position {
    s.parse().unwrap_or(Position::TOP_TOP)
}
