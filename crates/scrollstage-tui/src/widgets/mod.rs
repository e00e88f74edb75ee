mod popup;
mod stage;
mod status_bar;
mod triggers;

pub use popup::PopupWidget;
pub use stage::{element_quad, frame_shapes, row_boxes, ElementBox, Shape, StageWidget};
pub use status_bar::StatusBarWidget;
pub use triggers::TriggersWidget;
