pub mod hit;
pub mod viewport;

pub use hit::{CardBounds, HitTestProvider, insertion_index};
pub use viewport::{FOCUS_ZOOM, MAX_ZOOM, MIN_ZOOM, ViewportState, ViewportTransform};
