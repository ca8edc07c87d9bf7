pub mod color_range;
pub mod contour;
pub mod detection;
pub mod distance;
pub mod filter;
pub mod frame;
pub mod hsv;
pub mod mask;
pub mod overlay;
pub mod selector;
