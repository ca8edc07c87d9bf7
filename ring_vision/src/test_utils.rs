//! Synthetic frames shared by the detector tests.

use image::{Rgb, RgbImage};

/// Neutral background with zero saturation, outside every ring range.
pub(crate) const BACKGROUND_GRAY: [u8; 3] = [90, 90, 90];
/// Encodes to HSV (105, 255, 255), inside the blue ring range.
pub(crate) const RING_BLUE: [u8; 3] = [0, 128, 255];

/// A gray frame with filled `(x, y, width, height, color)` rectangles painted in order.
pub(crate) fn frame_with_rects(
    width: u32,
    height: u32,
    rects: &[(u32, u32, u32, u32, [u8; 3])],
) -> RgbImage {
    let mut frame = RgbImage::from_pixel(width, height, Rgb(BACKGROUND_GRAY));
    for &(x0, y0, w, h, color) in rects {
        for y in y0..(y0 + h).min(height) {
            for x in x0..(x0 + w).min(width) {
                frame.put_pixel(x, y, Rgb(color));
            }
        }
    }
    frame
}
