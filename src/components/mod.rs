pub mod zoom_controls;
pub mod zoom_overlay;

pub use zoom_overlay::{ZoomOverlay, ZoomOverlayProps};
