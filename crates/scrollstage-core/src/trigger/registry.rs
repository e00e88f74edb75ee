use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::position::{EndBound, Position};
use crate::layout::LayoutHost;
use crate::{Error, Result};

/// Index of a trigger within its registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TriggerId(pub usize);

/// Where the scroll offset sits relative to a trigger's region
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TriggerState {
    /// progress == 0
    #[default]
    Before,
    /// 0 < progress < 1
    Active,
    /// progress == 1
    After,
}

impl TriggerState {
    fn from_progress(progress: f64) -> Self {
        if progress <= 0.0 {
            TriggerState::Before
        } else if progress >= 1.0 {
            TriggerState::After
        } else {
            TriggerState::Active
        }
    }

    fn rank(self) -> u8 {
        match self {
            TriggerState::Before => 0,
            TriggerState::Active => 1,
            TriggerState::After => 2,
        }
    }
}

/// Resolved scroll range of a trigger for the current frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub start: f64,
    pub end: f64,
}

impl Region {
    #[inline]
    pub fn span(&self) -> f64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !(self.span() > 0.0)
    }

    /// Clamped linear progress; a zero-length region is a step at `start`
    pub fn progress_at(&self, offset: f64) -> f64 {
        if self.is_degenerate() {
            return if offset >= self.start { 1.0 } else { 0.0 };
        }
        ((offset - self.start) / self.span()).clamp(0.0, 1.0)
    }
}

/// Static definition a trigger is created from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggerDef {
    pub name: String,
    /// Anchor element id
    pub anchor: String,
    #[serde(default = "default_start")]
    pub start: Position,
    pub end: EndBound,
    /// Reserve `end - start` of scroll after the anchor and hold it in place
    #[serde(default)]
    pub pin: bool,
    /// Section scroller driving this trigger (page scroller when absent)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scroller: Option<String>,
}

fn default_start() -> Position {
    Position::TOP_TOP
}

impl TriggerDef {
    pub fn new(name: impl Into<String>, anchor: impl Into<String>, start: Position, end: EndBound) -> Self {
        Self {
            name: name.into(),
            anchor: anchor.into(),
            start,
            end,
            pin: false,
            scroller: None,
        }
    }

    pub fn pinned(mut self) -> Self {
        self.pin = true;
        self
    }

    pub fn on_scroller(mut self, scroller: impl Into<String>) -> Self {
        self.scroller = Some(scroller.into());
        self
    }
}

/// Lifecycle notifications produced by a registry update
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TriggerEventKind {
    /// Progress changed, or the trigger is active
    Update { progress: f64 },
    /// Progress left 0 moving forward
    Enter,
    /// Progress reached 1 moving forward
    Leave,
    /// Progress left 1 moving backward
    EnterBack,
    /// Progress reached 0 moving backward
    LeaveBack,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TriggerEvent {
    pub trigger: TriggerId,
    #[serde(flatten)]
    pub kind: TriggerEventKind,
}

/// A registered trigger and its per-frame state
#[derive(Debug, Clone)]
pub struct Trigger {
    id: TriggerId,
    def: TriggerDef,
    region: Region,
    progress: f64,
    state: TriggerState,
}

impl Trigger {
    pub fn id(&self) -> TriggerId {
        self.id
    }

    pub fn def(&self) -> &TriggerDef {
        &self.def
    }

    pub fn name(&self) -> &str {
        &self.def.name
    }

    pub fn region(&self) -> Region {
        self.region
    }

    /// Progress as of the last update
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn state(&self) -> TriggerState {
        self.state
    }

    /// Scroll distance a pinned trigger reserves (0 when not pinned)
    pub fn pin_spacing(&self) -> f64 {
        if self.def.pin {
            self.region.span().max(0.0)
        } else {
            0.0
        }
    }

    fn resolve_region(&self, layout: &dyn LayoutHost) -> Option<Region> {
        let anchor = layout.anchor(&self.def.anchor)?;
        let viewport = layout.viewport();
        let start = self.def.start.resolve(anchor, viewport);
        let end = self.def.end.resolve(start, anchor, viewport);
        Some(Region { start, end })
    }

    /// Recompute progress for `offset` and append resulting events
    fn step(&mut self, offset: f64, events: &mut Vec<TriggerEvent>) {
        let progress = self.region.progress_at(offset);
        let previous = self.progress;
        let from = self.state;
        let to = TriggerState::from_progress(progress);
        self.progress = progress;
        self.state = to;

        if to == TriggerState::Active || progress != previous {
            trace!(trigger = %self.def.name, progress, "trigger update");
            events.push(self.event(TriggerEventKind::Update { progress }));
        }
        if from == to {
            return;
        }

        debug!(trigger = %self.def.name, ?from, ?to, offset, "trigger state changed");
        let crossings: &[TriggerEventKind] = if to.rank() > from.rank() {
            match (from, to) {
                (TriggerState::Before, TriggerState::Active) => &[TriggerEventKind::Enter],
                (TriggerState::Before, TriggerState::After) => {
                    &[TriggerEventKind::Enter, TriggerEventKind::Leave]
                }
                _ => &[TriggerEventKind::Leave],
            }
        } else {
            match (from, to) {
                (TriggerState::After, TriggerState::Active) => &[TriggerEventKind::EnterBack],
                (TriggerState::After, TriggerState::Before) => {
                    &[TriggerEventKind::EnterBack, TriggerEventKind::LeaveBack]
                }
                _ => &[TriggerEventKind::LeaveBack],
            }
        };
        events.extend(crossings.iter().map(|kind| self.event(*kind)));
    }

    fn event(&self, kind: TriggerEventKind) -> TriggerEvent {
        TriggerEvent {
            trigger: self.id,
            kind,
        }
    }
}

/// Owns every trigger on the page
#[derive(Debug, Clone, Default)]
pub struct TriggerRegistry {
    triggers: Vec<Trigger>,
    by_name: HashMap<String, TriggerId>,
}

impl TriggerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a trigger
    ///
    /// Fails with `MissingTarget` when the anchor is not on the page.
    pub fn create_trigger(&mut self, def: TriggerDef, layout: &mut dyn LayoutHost) -> Result<TriggerId> {
        if layout.anchor(&def.anchor).is_none() {
            return Err(Error::MissingTarget(format!(
                "trigger {:?} anchor {:?}",
                def.name, def.anchor
            )));
        }

        let id = TriggerId(self.triggers.len());
        self.by_name.insert(def.name.clone(), id);
        self.triggers.push(Trigger {
            id,
            def,
            region: Region::default(),
            progress: 0.0,
            state: TriggerState::Before,
        });
        self.refresh(layout);

        Ok(id)
    }

    pub fn get(&self, id: TriggerId) -> Option<&Trigger> {
        self.triggers.get(id.0)
    }

    pub fn find(&self, name: &str) -> Option<&Trigger> {
        self.by_name.get(name).and_then(|id| self.get(*id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trigger> {
        self.triggers.iter()
    }

    pub fn len(&self) -> usize {
        self.triggers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triggers.is_empty()
    }

    /// Resolve every region from current geometry, reserving pin spacing
    ///
    /// Pinned triggers are resolved top-down first so the spacing each one
    /// reserves is in place before anything below it is measured.
    pub fn refresh(&mut self, layout: &mut dyn LayoutHost) {
        let mut pinned: Vec<usize> = (0..self.triggers.len())
            .filter(|&i| self.triggers[i].def.pin)
            .collect();
        pinned.sort_by(|&a, &b| {
            let top = |i: usize| {
                layout
                    .anchor(&self.triggers[i].def.anchor)
                    .map(|r| r.top)
                    .unwrap_or(f64::INFINITY)
            };
            top(a).total_cmp(&top(b))
        });

        for i in pinned {
            let trigger = &mut self.triggers[i];
            if let Some(region) = trigger.resolve_region(layout) {
                trigger.region = region;
                layout.reserve_pin_spacing(&trigger.def.anchor, trigger.pin_spacing());
            }
        }

        for trigger in &mut self.triggers {
            match trigger.resolve_region(layout) {
                Some(region) => {
                    if region.is_degenerate() && !trigger.region.is_degenerate() {
                        debug!(trigger = %trigger.def.name, ?region, "degenerate region, progress is a step");
                    }
                    trigger.region = region;
                }
                None => trace!(trigger = %trigger.def.name, "anchor missing this frame, keeping region"),
            }
        }
    }

    /// Recompute every trigger against one scroll offset
    pub fn update(&mut self, offset: f64, layout: &mut dyn LayoutHost) -> Vec<TriggerEvent> {
        self.update_with(layout, |_| offset)
    }

    /// Recompute every trigger, reading each one's offset from its scroller
    pub fn update_with<F>(&mut self, layout: &mut dyn LayoutHost, offset_for: F) -> Vec<TriggerEvent>
    where
        F: Fn(Option<&str>) -> f64,
    {
        self.refresh(layout);

        let mut events = Vec::new();
        for trigger in &mut self.triggers {
            let offset = offset_for(trigger.def.scroller.as_deref());
            trigger.step(offset, &mut events);
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{PageLayout, Viewport};

    fn layout() -> PageLayout {
        PageLayout::new(Viewport {
            width: 1000.0,
            height: 1000.0,
        })
        .with_section("intro", 1000.0)
        .with_section("region", 1000.0)
        .with_section("tail", 3000.0)
    }

    /// Region spanning [1000, 2000]
    fn span_def() -> TriggerDef {
        TriggerDef::new("span", "region", Position::TOP_TOP, "bottom top".parse().unwrap())
    }

    fn kinds(events: &[TriggerEvent]) -> Vec<TriggerEventKind> {
        events.iter().map(|e| e.kind).collect()
    }

    fn lifecycle(events: &[TriggerEvent]) -> Vec<TriggerEventKind> {
        kinds(events)
            .into_iter()
            .filter(|k| !matches!(k, TriggerEventKind::Update { .. }))
            .collect()
    }

    #[test]
    fn test_progress_is_clamped_linear() {
        let mut layout = layout();
        let mut registry = TriggerRegistry::new();
        let id = registry.create_trigger(span_def(), &mut layout).unwrap();

        registry.update(1000.0, &mut layout);
        assert_eq!(registry.get(id).unwrap().progress(), 0.0);
        assert_eq!(registry.get(id).unwrap().state(), TriggerState::Before);

        registry.update(1500.0, &mut layout);
        assert_eq!(registry.get(id).unwrap().progress(), 0.5);

        registry.update(5000.0, &mut layout);
        assert_eq!(registry.get(id).unwrap().progress(), 1.0);

        registry.update(-50.0, &mut layout);
        assert_eq!(registry.get(id).unwrap().progress(), 0.0);
    }

    #[test]
    fn test_leave_fires_once() {
        let mut layout = layout();
        let mut registry = TriggerRegistry::new();
        registry.create_trigger(span_def(), &mut layout).unwrap();

        registry.update(1500.0, &mut layout);
        let events = registry.update(2000.0, &mut layout);
        assert_eq!(lifecycle(&events), vec![TriggerEventKind::Leave]);
        assert_eq!(events[0].kind, TriggerEventKind::Update { progress: 1.0 });

        for offset in [2000.0, 2100.0, 2600.0] {
            let events = registry.update(offset, &mut layout);
            assert!(events.is_empty(), "unexpected events at {}: {:?}", offset, events);
        }
    }

    #[test]
    fn test_enter_back_on_reverse() {
        let mut layout = layout();
        let mut registry = TriggerRegistry::new();
        registry.create_trigger(span_def(), &mut layout).unwrap();

        registry.update(2500.0, &mut layout);
        let events = registry.update(1999.0, &mut layout);
        assert_eq!(lifecycle(&events), vec![TriggerEventKind::EnterBack]);

        let events = registry.update(900.0, &mut layout);
        assert_eq!(lifecycle(&events), vec![TriggerEventKind::LeaveBack]);
    }

    #[test]
    fn test_jump_across_region_fires_both_crossings() {
        let mut layout = layout();
        let mut registry = TriggerRegistry::new();
        registry.create_trigger(span_def(), &mut layout).unwrap();

        let events = registry.update(3000.0, &mut layout);
        assert_eq!(
            lifecycle(&events),
            vec![TriggerEventKind::Enter, TriggerEventKind::Leave]
        );

        let events = registry.update(0.0, &mut layout);
        assert_eq!(
            lifecycle(&events),
            vec![TriggerEventKind::EnterBack, TriggerEventKind::LeaveBack]
        );
    }

    #[test]
    fn test_update_fires_every_active_frame() {
        let mut layout = layout();
        let mut registry = TriggerRegistry::new();
        registry.create_trigger(span_def(), &mut layout).unwrap();

        registry.update(1400.0, &mut layout);
        let events = registry.update(1400.0, &mut layout);
        assert_eq!(kinds(&events), vec![TriggerEventKind::Update { progress: 0.4 }]);

        let events = registry.update(200.0, &mut layout);
        assert_eq!(
            kinds(&events),
            vec![
                TriggerEventKind::Update { progress: 0.0 },
                TriggerEventKind::LeaveBack
            ]
        );
        assert!(registry.update(100.0, &mut layout).is_empty());
    }

    #[test]
    fn test_degenerate_region_is_step() {
        let mut layout = layout();
        let mut registry = TriggerRegistry::new();
        let def = TriggerDef::new("flat", "region", Position::TOP_TOP, EndBound::viewports(0.0));
        let id = registry.create_trigger(def, &mut layout).unwrap();
        assert!(registry.get(id).unwrap().region().is_degenerate());

        registry.update(999.0, &mut layout);
        assert_eq!(registry.get(id).unwrap().progress(), 0.0);

        let events = registry.update(1000.0, &mut layout);
        assert_eq!(registry.get(id).unwrap().progress(), 1.0);
        assert_eq!(
            lifecycle(&events),
            vec![TriggerEventKind::Enter, TriggerEventKind::Leave]
        );
    }

    #[test]
    fn test_missing_anchor_is_rejected() {
        let mut layout = layout();
        let mut registry = TriggerRegistry::new();
        let def = TriggerDef::new("ghost", "nowhere", Position::TOP_TOP, EndBound::viewports(1.0));
        let err = registry.create_trigger(def, &mut layout).unwrap_err();
        assert!(matches!(err, Error::MissingTarget(_)));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_pin_reserves_exact_span() {
        let mut layout = layout();
        let mut registry = TriggerRegistry::new();
        let pinned = TriggerDef::new("pin", "region", Position::TOP_TOP, EndBound::viewports(4.0)).pinned();
        let tail = TriggerDef::new("tail", "tail", Position::TOP_TOP, EndBound::viewports(1.0));

        // Created before the pin it sits below
        let tail_id = registry.create_trigger(tail, &mut layout).unwrap();
        let pin_id = registry.create_trigger(pinned, &mut layout).unwrap();

        let pin = registry.get(pin_id).unwrap();
        assert_eq!(pin.region(), Region { start: 1000.0, end: 5000.0 });
        assert_eq!(layout.pin_spacing("region"), pin.region().span());

        let tail = registry.get(tail_id).unwrap();
        assert_eq!(tail.region().start, 2000.0 + 4000.0);
        assert_eq!(registry.find("tail").unwrap().id(), tail_id);
    }

    #[test]
    fn test_scroller_routing() {
        let mut layout = layout();
        let mut registry = TriggerRegistry::new();
        let page = registry.create_trigger(span_def(), &mut layout).unwrap();
        let section = registry
            .create_trigger(
                TriggerDef {
                    name: "section".into(),
                    ..span_def()
                }
                .on_scroller("gallery"),
                &mut layout,
            )
            .unwrap();

        registry.update_with(&mut layout, |scroller| match scroller {
            Some("gallery") => 1750.0,
            _ => 1250.0,
        });
        assert_eq!(registry.get(page).unwrap().progress(), 0.25);
        assert_eq!(registry.get(section).unwrap().progress(), 0.75);
    }
}
