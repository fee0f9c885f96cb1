pub mod zoom;

pub use zoom::{ZoomDirection, ZoomState};
