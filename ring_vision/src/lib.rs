// THEORY:
// This file is the main entry point for the `ring_vision` library crate.
// It exposes `RingDetector` and its data types (`DetectorConfig`, `FrameReport`,
// `Detection`, overlay `Mark`s) as the high-level interface. The stages in
// `core_modules` stay public for callers that want a single step, but the
// frame loop only ever needs the re-exports below.
//
// The crate never touches a camera, a window or a video file. Frames come in
// as `RgbImage` and leave as detections plus drawing instructions; the binary
// decides where pixels come from and where marks get rendered.

pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod presets;
pub mod status;

#[cfg(test)]
mod test_utils;

pub use core_modules::color_range::{ColorRange, RingColor};
pub use core_modules::detection::{BoundingBox, Detection};
pub use core_modules::distance::DistanceModel;
pub use core_modules::filter::ShapeFilter;
pub use core_modules::frame::{bgr_bytes, rgb_from_bgr};
pub use core_modules::overlay::{render_image, Mark, OverlayStyle};
pub use core_modules::selector::closest;
pub use error::VisionError;
pub use pipeline::{DetectorConfig, FrameReport, RingDetector};
pub use status::{PlaybackTime, StatusCadence, StatusLine};
