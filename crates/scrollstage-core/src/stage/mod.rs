//! L3 Molecular Layer - Staging
//!
//! Turns trigger progress into per-element visual states, either through a
//! role-aware [`StagePolicy`] or a scrubbed [`Timeline`].

mod policy;
mod role;
mod stagger;
mod state;
mod timeline;
mod track;

pub use policy::{compute_state, ChannelTracks, StagePolicy};
pub use role::Role;
pub use stagger::{Stagger, StaggerFrom};
pub use state::{Channel, LengthUnit, VisualState, MIN_SCALE};
pub use timeline::{PartialState, Timeline, TimelineStagger, Tween};
pub use track::{Curve, Segment, Track, TrackBuilder};
