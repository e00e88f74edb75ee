//! Smooth scroll emulation
//!
//! A virtual scroll offset that trails the physical input offset, in two
//! regimes: a duration tween with an ease-out curve for the whole page and
//! a per-frame lerp for individual sections.
//!
//! # Architecture
//!
//! ## L4 Atomic Layer
//! - `easing` - Pure easing functions (power ease-outs, exponential, smoothstep)
//! - `timing` - Progress, interpolation and stagger normalization
//! - `config` - Configuration helpers (types live in `crate::config`)
//!
//! ## L3 Molecular Layer
//! - `animation` - The smooth scroller combining atoms
//!
//! # Usage
//!
//! ```ignore
//! use scrollstage_core::scroll::{ScrollInput, SmoothScroller};
//!
//! let mut scroller = SmoothScroller::page(&config.scroll);
//! scroller.set_limit(document_height - viewport_height);
//!
//! scroller.push(ScrollInput::Wheel(120.0));
//!
//! // Once per frame
//! let state = scroller.update(frame_time);
//! ```

// L4 Atomic Layer
pub mod config;
pub mod easing;
pub mod timing;

// L3 Molecular Layer
pub mod animation;

pub use animation::{ScrollDirection, ScrollInput, ScrollState, SmoothScroller, SmoothingMode};
pub use config::{ScrollConfig, ScrollConfigExt};
pub use easing::{smoothstep, EasingType, EasingTypeExt};
pub use timing::{clamped_normalize, clamped_normalize_within, lerp};
