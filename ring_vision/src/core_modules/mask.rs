// THEORY:
// The mask stage turns an HSV frame into a binary foreground map and then
// cleans it. Two operations, both stateless:
// 1.  **Threshold**: a pixel is foreground (255) when its H, S and V all sit in
//     the target `ColorRange`, background (0) otherwise.
// 2.  **Opening**: erosion followed by dilation with a square structuring
//     element. Isolated specks smaller than the element disappear; a ring-sized
//     blob comes back with its outline intact. The square element of side
//     `2 * radius + 1` is the chessboard (L-infinity) ball of that radius.

use crate::core_modules::color_range::ColorRange;
use crate::core_modules::hsv::hsv::{Hsv, HsvImage};
use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::morphology;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// Marks every pixel inside `range` as foreground.
pub fn threshold(hsv: &HsvImage, range: &ColorRange) -> GrayImage {
    let (width, height) = hsv.dimensions();
    GrayImage::from_fn(width, height, |x, y| {
        let pixel = Hsv::from(*hsv.get_pixel(x, y));
        if range.contains(pixel) {
            Luma([FOREGROUND])
        } else {
            Luma([BACKGROUND])
        }
    })
}

/// Morphological opening with a `(2 * radius + 1)` square element.
pub fn open_mask(mask: &GrayImage, radius: u8) -> GrayImage {
    morphology::open(mask, Norm::LInf, radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn hsv_frame(pixels: &[[u8; 3]]) -> HsvImage {
        let mut frame = HsvImage::new(pixels.len() as u32, 1);
        for (x, pixel) in pixels.iter().enumerate() {
            frame.put_pixel(x as u32, 0, Rgb(*pixel));
        }
        frame
    }

    #[test]
    fn in_range_pixels_are_set_and_the_rest_clear() {
        let range = ColorRange::new([80, 120, 150], [120, 255, 255]).unwrap();
        let frame = hsv_frame(&[
            [80, 120, 150],
            [120, 255, 255],
            [100, 200, 200],
            [79, 200, 200],
            [121, 200, 200],
            [100, 119, 200],
            [100, 200, 149],
        ]);

        let mask = threshold(&frame, &range);
        let bits: Vec<u8> = mask.pixels().map(|p| p.0[0]).collect();
        assert_eq!(bits, vec![255, 255, 255, 0, 0, 0, 0]);
    }

    #[test]
    fn every_encoded_pixel_agrees_with_the_range() {
        let range = ColorRange::new([10, 20, 30], [40, 50, 60]).unwrap();
        let mut frame = HsvImage::new(64, 64);
        for (x, y, pixel) in frame.enumerate_pixels_mut() {
            *pixel = Rgb([(x % 60) as u8, (y * 2) as u8, ((x + y) % 90) as u8]);
        }

        let mask = threshold(&frame, &range);
        for (x, y, pixel) in frame.enumerate_pixels() {
            let expected = range.contains(Hsv::from(*pixel));
            assert_eq!(mask.get_pixel(x, y).0[0] == FOREGROUND, expected, "pixel ({x}, {y})");
        }
    }

    #[test]
    fn opening_removes_specks_and_keeps_blobs() {
        let mut mask = GrayImage::new(60, 40);
        for y in 10..30 {
            for x in 10..40 {
                mask.put_pixel(x, y, Luma([FOREGROUND]));
            }
        }
        mask.put_pixel(50, 5, Luma([FOREGROUND]));
        mask.put_pixel(51, 5, Luma([FOREGROUND]));

        let opened = open_mask(&mask, 2);
        assert_eq!(opened.get_pixel(50, 5).0[0], BACKGROUND);
        assert_eq!(opened.get_pixel(51, 5).0[0], BACKGROUND);
        assert_eq!(opened.get_pixel(10, 10).0[0], FOREGROUND);
        assert_eq!(opened.get_pixel(39, 29).0[0], FOREGROUND);
        assert_eq!(opened.get_pixel(9, 10).0[0], BACKGROUND);
    }
}
