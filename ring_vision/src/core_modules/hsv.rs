// THEORY:
// The `hsv` module is the first stage of the detector: it moves a frame out of
// RGB and into hue/saturation/value, where a colored ring under uneven field
// lighting stays inside one compact box of values. Thresholding in RGB would
// need a different box for every shade of the same ring.
//
// Key principles:
// 1.  **8-bit OpenCV encoding**: Hue is stored in half-degrees (0..180) so it fits
//     a byte; saturation and value use the full 0..=255 range. Every color range
//     in this crate is written against this encoding, so the conversion must
//     match it: V = max, S = 255 * chroma / V, H = hue_degrees / 2, rounded.
// 2.  **Single-pixel scope**: The conversion never looks at neighbors. Spatial
//     work (masking, morphology, contours) happens in later stages.
// 3.  **Frame-shaped output**: The converted frame reuses `image`'s buffer type,
//     with the three channels reinterpreted as H, S and V.

pub mod hsv {
    use image::{ImageBuffer, Rgb, RgbImage};

    pub type Channel = u8;
    pub type HueDegrees = f32;

    /// Number of hue steps in the 8-bit encoding (two degrees per step).
    pub const HUE_RANGE: u16 = 180;

    /// A frame in HSV. Channel 0 is hue, 1 is saturation, 2 is value.
    pub type HsvImage = ImageBuffer<Rgb<u8>, Vec<u8>>;

    /// A single pixel in the 8-bit HSV encoding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Hsv {
        /// Hue in half-degrees (0..180).
        pub hue: Channel,
        /// Saturation (0..=255). Zero for any gray.
        pub saturation: Channel,
        /// Value, the brightest RGB channel (0..=255).
        pub value: Channel,
    }

    impl Hsv {
        pub const fn new(hue: Channel, saturation: Channel, value: Channel) -> Self {
            Self {
                hue,
                saturation,
                value,
            }
        }

        pub fn from_rgb(red: Channel, green: Channel, blue: Channel) -> Self {
            let maximum_channel = red.max(green).max(blue);
            let minimum_channel = red.min(green).min(blue);
            let chroma = (maximum_channel - minimum_channel) as f32;

            let saturation = if maximum_channel == 0 {
                0
            } else {
                (chroma * 255.0 / maximum_channel as f32).round() as Channel
            };

            Self {
                hue: Self::half_degree_hue(red, green, blue, maximum_channel, chroma),
                saturation,
                value: maximum_channel,
            }
        }

        fn half_degree_hue(
            red: Channel,
            green: Channel,
            blue: Channel,
            maximum_channel: Channel,
            chroma: f32,
        ) -> Channel {
            if chroma == 0.0 {
                return 0;
            }

            let (red, green, blue) = (red as f32, green as f32, blue as f32);
            let (base_difference, sector_offset) = if maximum_channel as f32 == red {
                (green - blue, 0.0)
            } else if maximum_channel as f32 == green {
                (blue - red, 120.0)
            } else {
                (red - green, 240.0)
            };

            let mut hue_degrees: HueDegrees = base_difference * 60.0 / chroma + sector_offset;
            if hue_degrees < 0.0 {
                hue_degrees += 360.0;
            }

            // 359.x degrees rounds up to a full turn, which is hue 0 again.
            ((hue_degrees / 2.0).round() as u16 % HUE_RANGE) as Channel
        }
    }

    impl From<Rgb<u8>> for Hsv {
        fn from(pixel: Rgb<u8>) -> Self {
            let [red, green, blue] = pixel.0;
            Hsv::from_rgb(red, green, blue)
        }
    }

    impl From<Hsv> for Rgb<u8> {
        fn from(hsv: Hsv) -> Self {
            Rgb([hsv.hue, hsv.saturation, hsv.value])
        }
    }

    /// Converts a whole RGB frame into the 8-bit HSV encoding.
    pub fn to_hsv(frame: &RgbImage) -> HsvImage {
        let (width, height) = frame.dimensions();
        HsvImage::from_fn(width, height, |x, y| Rgb::from(Hsv::from(*frame.get_pixel(x, y))))
    }
}

#[cfg(test)]
mod tests {
    use super::hsv::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn primaries_match_opencv_encoding() {
        assert_eq!(Hsv::from_rgb(255, 0, 0), Hsv::new(0, 255, 255));
        assert_eq!(Hsv::from_rgb(0, 255, 0), Hsv::new(60, 255, 255));
        assert_eq!(Hsv::from_rgb(0, 0, 255), Hsv::new(120, 255, 255));
        assert_eq!(Hsv::from_rgb(255, 255, 0), Hsv::new(30, 255, 255));
    }

    #[test]
    fn grays_have_no_hue_or_saturation() {
        assert_eq!(Hsv::from_rgb(0, 0, 0), Hsv::new(0, 0, 0));
        assert_eq!(Hsv::from_rgb(128, 128, 128), Hsv::new(0, 0, 128));
        assert_eq!(Hsv::from_rgb(255, 255, 255), Hsv::new(0, 0, 255));
    }

    #[test]
    fn hue_near_a_full_turn_wraps_to_zero() {
        // Magenta-leaning red sits just under 360 degrees.
        let hsv = Hsv::from_rgb(255, 0, 1);
        assert_eq!(hsv.hue, 0);
        assert_eq!(hsv.value, 255);
    }

    #[test]
    fn ring_blue_lands_inside_the_blue_band() {
        let hsv = Hsv::from_rgb(0, 128, 255);
        assert_eq!(hsv.hue, 105);
        assert_eq!(hsv.saturation, 255);
    }

    #[test]
    fn frame_conversion_keeps_dimensions() {
        let frame = RgbImage::from_pixel(7, 3, Rgb([0, 0, 255]));
        let hsv = to_hsv(&frame);
        assert_eq!(hsv.dimensions(), (7, 3));
        assert!(hsv.pixels().all(|p| *p == Rgb([120, 255, 255])));
    }
}
