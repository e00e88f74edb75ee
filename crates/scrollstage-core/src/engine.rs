//! Per-frame scheduler
//!
//! One [`Engine::tick`] per display frame, in a fixed order: the frame
//! clock advances, every scroller publishes its virtual offset, the trigger
//! registry recomputes regions and progress from the frame's geometry, pin
//! controllers consume boundary events, and finally every cluster element's
//! visual state is computed. Nothing is read from a previous frame except
//! the scroller and trigger state the engine owns.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ScrollConfig;
use crate::layout::LayoutHost;
use crate::pin::{PinController, Positioning};
use crate::scene::{Choreography, Scene};
use crate::scroll::{ScrollConfigExt, ScrollInput, ScrollState, SmoothScroller};
use crate::stage::{compute_state, StagePolicy, Timeline, VisualState};
use crate::trigger::{TriggerEventKind, TriggerId, TriggerRegistry};

/// Frame timestamps with optional lag smoothing
///
/// When a gap between two real timestamps exceeds the threshold, the clock
/// advances by the adjusted amount instead, so animations resume where they
/// were rather than jumping.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    lag: Option<(Duration, Duration)>,
    last_real: Option<Duration>,
    time: Duration,
}

impl FrameClock {
    pub fn new(lag: Option<(Duration, Duration)>) -> Self {
        Self {
            lag,
            last_real: None,
            time: Duration::ZERO,
        }
    }

    /// Advance to real timestamp `real` and return engine time
    pub fn advance(&mut self, real: Duration) -> Duration {
        match self.last_real {
            None => self.time = real,
            Some(last) => {
                let mut delta = real.saturating_sub(last);
                if let Some((threshold, adjusted)) = self.lag {
                    if delta > threshold {
                        debug!(?delta, ?adjusted, "frame gap smoothed");
                        delta = adjusted;
                    }
                }
                self.time += delta;
            }
        }
        self.last_real = Some(real);
        self.time
    }

    pub fn time(&self) -> Duration {
        self.time
    }
}

/// A trigger event labelled with the trigger's name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameEvent {
    pub trigger: String,
    #[serde(flatten)]
    pub kind: TriggerEventKind,
}

/// Computed state of one cluster for a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusterFrame {
    pub id: String,
    pub progress: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub positioning: Option<Positioning>,
    pub elements: Vec<VisualState>,
}

/// Everything the rendering layer applies for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub number: u64,
    /// Engine time in seconds
    pub time: f64,
    pub scroll: ScrollState,
    pub events: Vec<FrameEvent>,
    pub clusters: Vec<ClusterFrame>,
}

impl Frame {
    pub fn cluster(&self, id: &str) -> Option<&ClusterFrame> {
        self.clusters.iter().find(|c| c.id == id)
    }
}

#[derive(Debug, Clone)]
enum Animation {
    Policy(StagePolicy),
    Timeline(Timeline),
}

#[derive(Debug, Clone)]
struct ClusterRuntime {
    id: String,
    trigger: TriggerId,
    animation: Animation,
    pin: Option<(TriggerId, PinController)>,
}

pub struct Engine {
    page: SmoothScroller,
    sections: Vec<(String, SmoothScroller)>,
    registry: TriggerRegistry,
    clusters: Vec<ClusterRuntime>,
    clock: FrameClock,
    frame: u64,
}

impl Engine {
    /// Build the engine for a scene
    ///
    /// Triggers whose anchor is missing and clusters with no elements or an
    /// unknown trigger are skipped with a warning; the rest of the scene
    /// stays functional.
    pub fn new(config: &ScrollConfig, scene: &Scene, layout: &mut dyn LayoutHost) -> Self {
        let sections: Vec<(String, SmoothScroller)> = scene
            .scrollers
            .iter()
            .map(|name| (name.clone(), SmoothScroller::section(config)))
            .collect();

        let mut registry = TriggerRegistry::new();
        for def in &scene.triggers {
            if let Some(scroller) = def.scroller.as_deref() {
                if !sections.iter().any(|(name, _)| name == scroller) {
                    warn!(trigger = %def.name, scroller, "unknown scroller, using page offset");
                }
            }
            if let Err(e) = registry.create_trigger(def.clone(), layout) {
                warn!(trigger = %def.name, error = %e, "skipping trigger");
            }
        }

        let mut clusters = Vec::new();
        for def in &scene.clusters {
            let Some(trigger) = registry.find(&def.trigger).map(|t| t.id()) else {
                warn!(cluster = %def.id, trigger = %def.trigger, "skipping cluster, trigger not registered");
                continue;
            };
            if layout.element_count(&def.id) == 0 {
                warn!(cluster = %def.id, "skipping cluster, no elements on the page");
                continue;
            }

            let animation = match def.choreography.policy() {
                Some(policy) => Animation::Policy(policy),
                None => {
                    let name = match &def.choreography {
                        Choreography::Timeline { name } => name.as_str(),
                        _ => "",
                    };
                    match scene.timeline(name) {
                        Some(timeline) => Animation::Timeline(timeline.clone()),
                        None => {
                            warn!(cluster = %def.id, timeline = name, "skipping cluster, unknown timeline");
                            continue;
                        }
                    }
                }
            };

            let pin = def.pin.as_ref().and_then(|pin| {
                match registry.find(&pin.trigger) {
                    Some(t) => Some((t.id(), PinController::new(def.id.clone(), pin.sticky_top))),
                    None => {
                        warn!(cluster = %def.id, trigger = %pin.trigger, "pin trigger not registered");
                        None
                    }
                }
            });

            clusters.push(ClusterRuntime {
                id: def.id.clone(),
                trigger,
                animation,
                pin,
            });
        }

        info!(
            triggers = registry.len(),
            clusters = clusters.len(),
            scrollers = sections.len(),
            "engine ready"
        );

        Self {
            page: SmoothScroller::page(config),
            sections,
            registry,
            clusters,
            clock: FrameClock::new(config.lag_smoothing()),
            frame: 0,
        }
    }

    /// Queue input for every scroller
    pub fn push(&mut self, input: ScrollInput) {
        self.page.push(input);
        for (_, scroller) in &mut self.sections {
            scroller.push(input);
        }
    }

    /// Whether another frame would change anything without new input
    pub fn needs_update(&self) -> bool {
        self.page.needs_update() || self.sections.iter().any(|(_, s)| s.needs_update())
    }

    pub fn registry(&self) -> &TriggerRegistry {
        &self.registry
    }

    pub fn page_state(&self) -> ScrollState {
        self.page.state()
    }

    pub fn scroller(&self, name: &str) -> Option<&SmoothScroller> {
        self.sections
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, s)| s)
    }

    pub fn cluster_ids(&self) -> impl Iterator<Item = &str> {
        self.clusters.iter().map(|c| c.id.as_str())
    }

    pub fn frame_number(&self) -> u64 {
        self.frame
    }

    /// Run one frame at real timestamp `now`
    pub fn tick(&mut self, now: Duration, layout: &mut dyn LayoutHost) -> Frame {
        let time = self.clock.advance(now);

        let limit = layout.scroll_limit();
        self.page.set_limit(limit);
        let scroll = self.page.update(time);
        for (_, scroller) in &mut self.sections {
            scroller.set_limit(limit);
            scroller.update(time);
        }

        let page = &self.page;
        let sections = &self.sections;
        let events = self.registry.update_with(layout, |scroller| {
            scroller
                .and_then(|name| sections.iter().find(|(n, _)| n == name))
                .map(|(_, s)| s.virtual_offset())
                .unwrap_or_else(|| page.virtual_offset())
        });

        for cluster in &mut self.clusters {
            let Some((pin_trigger, controller)) = cluster.pin.as_mut() else {
                continue;
            };
            let Some(trigger) = self.registry.get(*pin_trigger) else {
                continue;
            };
            for event in events.iter().filter(|e| e.trigger == *pin_trigger) {
                controller.handle(event.kind, trigger.region());
            }
        }

        let host: &dyn LayoutHost = layout;
        let clusters = self
            .clusters
            .iter()
            .map(|cluster| {
                let progress = self
                    .registry
                    .get(cluster.trigger)
                    .map(|t| t.progress())
                    .unwrap_or(0.0);
                let count = host.element_count(&cluster.id);
                let elements = (0..count)
                    .map(|index| match &cluster.animation {
                        Animation::Policy(policy) => compute_state(progress, index, policy),
                        Animation::Timeline(timeline) => {
                            timeline.state(&cluster.id, index, progress, |target| host.element_count(target))
                        }
                    })
                    .collect();
                ClusterFrame {
                    id: cluster.id.clone(),
                    progress,
                    positioning: cluster.pin.as_ref().map(|(_, c)| c.positioning()),
                    elements,
                }
            })
            .collect();

        let events = events
            .into_iter()
            .map(|e| FrameEvent {
                trigger: self
                    .registry
                    .get(e.trigger)
                    .map(|t| t.name().to_string())
                    .unwrap_or_default(),
                kind: e.kind,
            })
            .collect();

        self.frame += 1;
        Frame {
            number: self.frame,
            time: time.as_secs_f64(),
            scroll,
            events,
            clusters,
        }
    }
}
