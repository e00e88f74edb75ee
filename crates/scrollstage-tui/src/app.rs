use std::time::Duration;

use scrollstage_core::{
    AnchorRect, Engine, Frame, LayoutHost, PageLayout, Scene, ScrollInput, ScrollState, StageConfig,
    Viewport,
};
use tracing::debug;

use crate::input::Action;
use crate::theme::Theme;

/// Current UI mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Help,
}

/// Preview state: the engine, the in-memory page it reads geometry from,
/// and the last frame it produced
pub struct App {
    pub engine: Engine,
    pub layout: PageLayout,
    pub scene: Scene,
    pub viewport: Viewport,
    pub theme: Theme,
    pub mode: Mode,
    pub frame: Option<Frame>,
    /// Pixels per wheel notch or line key
    pub wheel_step: f64,
    pub should_quit: bool,
    pub status_message: Option<String>,
}

impl App {
    pub fn new(config: &StageConfig, scene: Scene, theme: Theme) -> Self {
        let viewport = Viewport {
            width: config.viewport.width,
            height: config.viewport.height,
        };
        let mut layout = scene.layout(viewport);
        let engine = Engine::new(&config.scroll, &scene, &mut layout);

        Self {
            engine,
            layout,
            scene,
            viewport,
            theme,
            mode: Mode::Normal,
            frame: None,
            wheel_step: config.preview.wheel_step,
            should_quit: false,
            status_message: None,
        }
    }

    /// Run one engine frame at `now`
    pub fn tick(&mut self, now: Duration) {
        let frame = self.engine.tick(now, &mut self.layout);
        for event in &frame.events {
            if !matches!(event.kind, scrollstage_core::TriggerEventKind::Update { .. }) {
                debug!(trigger = %event.trigger, kind = ?event.kind, "trigger event");
            }
        }
        self.frame = Some(frame);
    }

    /// Whether the engine still has motion to play out
    pub fn needs_update(&self) -> bool {
        self.engine.needs_update()
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.engine.page_state()
    }

    pub fn scroll_limit(&self) -> f64 {
        self.layout.scroll_limit()
    }

    /// Document box of the section a cluster's trigger observes
    pub fn cluster_anchor(&self, cluster: &str) -> Option<AnchorRect> {
        let trigger = &self.scene.cluster(cluster)?.trigger;
        let anchor = &self
            .scene
            .triggers
            .iter()
            .find(|t| &t.name == trigger)?
            .anchor;
        self.layout.anchor(anchor)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn scroll_by(&mut self, delta: f64) {
        self.engine.push(ScrollInput::Wheel(delta));
    }

    pub fn handle_action(&mut self, action: Action) {
        if self.mode == Mode::Help && action != Action::None {
            self.mode = Mode::Normal;
            if action != Action::Quit {
                return;
            }
        }

        match action {
            Action::Quit => self.should_quit = true,
            Action::ScrollDown => self.scroll_by(self.wheel_step),
            Action::ScrollUp => self.scroll_by(-self.wheel_step),
            Action::PageDown => self.scroll_by(self.viewport.height),
            Action::PageUp => self.scroll_by(-self.viewport.height),
            Action::JumpToTop => self.engine.push(ScrollInput::ScrollTo(0.0)),
            Action::JumpToBottom => {
                let limit = self.scroll_limit();
                self.engine.push(ScrollInput::ScrollTo(limit));
            }
            Action::Settle => {
                let target = self.scroll_state().physical_offset;
                self.engine.push(ScrollInput::JumpTo(target));
                self.set_status(format!("Settled at {:.0}px", target));
            }
            Action::ToggleHelp => self.mode = Mode::Help,
            Action::None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new(&StageConfig::default(), Scene::landing_page(), Theme::default())
    }

    fn run_frames(app: &mut App, from: u64, count: u64) {
        for n in from..from + count {
            app.tick(Duration::from_millis(n * 16));
        }
    }

    #[test]
    fn test_wheel_scroll_is_smoothed() {
        let mut app = app();
        app.tick(Duration::ZERO);
        app.handle_action(Action::ScrollDown);
        run_frames(&mut app, 1, 5);
        let state = app.scroll_state();
        assert_eq!(state.physical_offset, 120.0);
        assert!(state.virtual_offset > 0.0 && state.virtual_offset < 120.0);
        assert!(app.needs_update());

        run_frames(&mut app, 6, 100);
        assert_eq!(app.scroll_state().virtual_offset, 120.0);
    }

    #[test]
    fn test_jump_to_bottom_reaches_limit() {
        let mut app = app();
        app.handle_action(Action::JumpToBottom);
        run_frames(&mut app, 0, 1);
        assert!(app.scroll_state().virtual_offset < app.scroll_limit());

        app.handle_action(Action::Settle);
        run_frames(&mut app, 1, 1);
        assert_eq!(app.scroll_state().virtual_offset, app.scroll_limit());
        let frame = app.frame.as_ref().unwrap();
        assert_eq!(frame.cluster("hero-cards").unwrap().progress, 1.0);
    }

    #[test]
    fn test_cluster_anchor_follows_trigger() {
        let app = app();
        let cards = app.cluster_anchor("cards").unwrap();
        let services = app.layout.anchor("services").unwrap();
        assert_eq!(cards, services);
        assert!(app.cluster_anchor("missing").is_none());
    }

    #[test]
    fn test_help_mode_swallows_next_key() {
        let mut app = app();
        app.handle_action(Action::ToggleHelp);
        assert_eq!(app.mode, Mode::Help);
        app.handle_action(Action::ScrollDown);
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.scroll_state().physical_offset, 0.0);

        app.handle_action(Action::Quit);
        assert!(app.should_quit);
    }
}
