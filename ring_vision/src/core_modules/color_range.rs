// THEORY:
// A `ColorRange` is the whole definition of "what a ring looks like" to the
// detector: an inclusive box in HSV space. The ranges below were tuned on field
// footage and webcam captures of the competition rings; they are data, not
// derived values, and each preset keeps the range it was tuned with.

use crate::core_modules::hsv::hsv::{Hsv, HUE_RANGE};
use crate::error::VisionError;
use serde::{Deserialize, Serialize};

const CHANNEL_NAMES: [&str; 3] = ["hue", "saturation", "value"];

/// Inclusive lower/upper HSV bounds in the 8-bit encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    lower: [u8; 3],
    upper: [u8; 3],
}

impl ColorRange {
    /// Red rings in field video.
    pub const FIELD_RED: ColorRange = ColorRange::from_bounds([160, 100, 100], [179, 255, 255]);
    /// Blue rings, shared by the field video and webcam presets.
    pub const FIELD_BLUE: ColorRange = ColorRange::from_bounds([80, 120, 150], [120, 255, 255]);
    /// Red rings on the single-color webcam.
    pub const WEBCAM_RED: ColorRange = ColorRange::from_bounds([175, 100, 60], [180, 255, 255]);
    /// Red rings on the two-color webcam, with a looser saturation/value floor.
    pub const WEBCAM_PAIR_RED: ColorRange = ColorRange::from_bounds([175, 50, 50], [180, 255, 255]);

    const fn from_bounds(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    pub fn new(lower: [u8; 3], upper: [u8; 3]) -> Result<Self, VisionError> {
        let range = Self::from_bounds(lower, upper);
        range.validate()?;
        Ok(range)
    }

    /// Checks that every channel is ordered and hue stays inside the 8-bit encoding.
    pub fn validate(&self) -> Result<(), VisionError> {
        for (channel, name) in CHANNEL_NAMES.into_iter().enumerate() {
            if self.lower[channel] > self.upper[channel] {
                return Err(VisionError::InvertedRange {
                    channel: name,
                    lower: self.lower[channel],
                    upper: self.upper[channel],
                });
            }
        }
        if self.upper[0] as u16 > HUE_RANGE {
            return Err(VisionError::HueOutOfRange(self.upper[0]));
        }
        Ok(())
    }

    pub fn lower(&self) -> Hsv {
        Hsv::new(self.lower[0], self.lower[1], self.lower[2])
    }

    pub fn upper(&self) -> Hsv {
        Hsv::new(self.upper[0], self.upper[1], self.upper[2])
    }

    /// True when all three channels fall inside the bounds, both ends included.
    #[inline]
    pub fn contains(&self, pixel: Hsv) -> bool {
        let channels = [pixel.hue, pixel.saturation, pixel.value];
        channels
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(value, (lower, upper))| lower <= value && value <= upper)
    }
}

/// The two ring colors of the competition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RingColor {
    Red,
    Blue,
}

impl RingColor {
    pub const ALL: [RingColor; 2] = [RingColor::Red, RingColor::Blue];

    /// Human-readable label prefix used on the overlay and in status lines.
    pub fn label(self) -> &'static str {
        match self {
            RingColor::Red => "Red ring",
            RingColor::Blue => "Blue ring",
        }
    }

    pub fn field_range(self) -> ColorRange {
        match self {
            RingColor::Red => ColorRange::FIELD_RED,
            RingColor::Blue => ColorRange::FIELD_BLUE,
        }
    }

    pub fn webcam_pair_range(self) -> ColorRange {
        match self {
            RingColor::Red => ColorRange::WEBCAM_PAIR_RED,
            RingColor::Blue => ColorRange::FIELD_BLUE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_valid() {
        for range in [
            ColorRange::FIELD_RED,
            ColorRange::FIELD_BLUE,
            ColorRange::WEBCAM_RED,
            ColorRange::WEBCAM_PAIR_RED,
        ] {
            assert_eq!(range.validate(), Ok(()));
        }
    }

    #[test]
    fn inverted_channel_is_rejected() {
        let err = ColorRange::new([10, 200, 0], [20, 100, 255]).unwrap_err();
        assert_eq!(
            err,
            VisionError::InvertedRange {
                channel: "saturation",
                lower: 200,
                upper: 100
            }
        );
    }

    #[test]
    fn hue_above_encoding_is_rejected() {
        let err = ColorRange::new([170, 0, 0], [181, 255, 255]).unwrap_err();
        assert_eq!(err, VisionError::HueOutOfRange(181));
    }

    #[test]
    fn bounds_are_inclusive_on_both_ends() {
        let range = ColorRange::new([80, 120, 150], [120, 255, 255]).unwrap();
        assert!(range.contains(Hsv::new(80, 120, 150)));
        assert!(range.contains(Hsv::new(120, 255, 255)));
        assert!(!range.contains(Hsv::new(79, 200, 200)));
        assert!(!range.contains(Hsv::new(121, 200, 200)));
        assert!(!range.contains(Hsv::new(100, 119, 200)));
        assert!(!range.contains(Hsv::new(100, 200, 149)));
        assert!(range.contains(range.lower()));
        assert!(range.contains(range.upper()));
        assert_eq!(range.upper(), Hsv::new(120, 255, 255));
    }

    #[test]
    fn ring_colors_map_to_their_ranges() {
        assert_eq!(RingColor::Red.field_range(), ColorRange::FIELD_RED);
        assert_eq!(RingColor::Blue.webcam_pair_range(), ColorRange::FIELD_BLUE);
        assert_eq!(RingColor::Blue.label(), "Blue ring");
    }
}
