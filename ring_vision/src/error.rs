use thiserror::Error;

/// Errors raised while building detector inputs. Per-frame detection itself
/// cannot fail.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum VisionError {
    #[error("invalid {channel} bounds: lower {lower} exceeds upper {upper}")]
    InvertedRange {
        channel: &'static str,
        lower: u8,
        upper: u8,
    },
    #[error("hue bound {0} is outside 0..=180")]
    HueOutOfRange(u8),
    #[error("invalid detector config: {0}")]
    InvalidConfig(String),
    #[error("frame buffer of {len} bytes does not match a {width}x{height} BGR frame")]
    FrameBuffer { width: u32, height: u32, len: usize },
}
