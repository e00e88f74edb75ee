pub mod config;
pub mod engine;
pub mod error;
pub mod layout;
pub mod pin;
pub mod scene;
pub mod scroll;
pub mod stage;
pub mod trigger;

pub use config::{EasingType, ScrollConfig, StageConfig};
pub use engine::{ClusterFrame, Engine, Frame, FrameClock, FrameEvent};
pub use error::{Error, Result};
pub use layout::{AnchorRect, LayoutHost, PageLayout, Viewport};
pub use pin::{PinController, Positioning};
pub use scene::{Choreography, ClusterDef, PinDef, Scene, SectionDef};
pub use scroll::{ScrollInput, ScrollState, SmoothScroller};
pub use stage::{compute_state, StagePolicy, Timeline, VisualState};
pub use trigger::{TriggerDef, TriggerEvent, TriggerEventKind, TriggerRegistry};
