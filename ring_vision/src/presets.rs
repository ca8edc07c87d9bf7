// THEORY:
// Presets reproduce the three capture setups the detector was tuned on. Each
// one is just a `DetectorConfig`; nothing in the pipeline knows which preset it
// is running.
//
// - Field video: recorded match footage, either ring color. Opening on, only
//   horizontal boxes, height-based distance against a ring measured at 64 cm.
// - Webcam: laptop camera pointed at red rings. No opening, any shape,
//   width-based distance with a rough constant.
// - Webcam pair: laptop camera, red and blue detected on the same frame with
//   contrasting unlabeled overlays.

use crate::core_modules::color_range::{ColorRange, RingColor};
use crate::core_modules::distance::DistanceModel;
use crate::core_modules::filter::ShapeFilter;
use crate::core_modules::overlay::OverlayStyle;
use crate::pipeline::{DetectorConfig, DEFAULT_MIN_CONTOUR_AREA};

/// Distance (cm) at which the reference ring was measured.
pub const FIELD_REFERENCE_DISTANCE_CM: f64 = 64.0;
/// Physical height (cm) of the reference ring.
pub const FIELD_REFERENCE_HEIGHT_CM: f64 = 5.58;
/// 5x5 square opening.
pub const FIELD_OPENING_RADIUS: u8 = 2;
/// Empirical numerator of the webcam width-based estimate.
pub const WEBCAM_WIDTH_SCALE: f64 = 100.0;

impl DetectorConfig {
    pub fn field_video(color: RingColor) -> Self {
        Self {
            label: color.label().to_string(),
            range: color.field_range(),
            min_contour_area: DEFAULT_MIN_CONTOUR_AREA,
            opening_radius: Some(FIELD_OPENING_RADIUS),
            shape_filter: ShapeFilter::Horizontal,
            distance_model: DistanceModel::ReferenceHeight {
                reference_distance: FIELD_REFERENCE_DISTANCE_CM,
                reference_height: FIELD_REFERENCE_HEIGHT_CM,
            },
            style: OverlayStyle::field_video(),
        }
    }

    /// Single-color webcam preset. Tuned on red rings only.
    pub fn webcam() -> Self {
        Self {
            label: "Ring".to_string(),
            range: ColorRange::WEBCAM_RED,
            min_contour_area: DEFAULT_MIN_CONTOUR_AREA,
            opening_radius: None,
            shape_filter: ShapeFilter::Any,
            distance_model: DistanceModel::InverseWidth {
                scale: WEBCAM_WIDTH_SCALE,
            },
            style: OverlayStyle::webcam(),
        }
    }

    pub fn webcam_pair(color: RingColor) -> Self {
        let style = match color {
            RingColor::Red => OverlayStyle::unlabeled([0, 255, 0], [255, 0, 0]),
            RingColor::Blue => OverlayStyle::unlabeled([0, 0, 255], [255, 0, 255]),
        };
        Self {
            label: color.label().to_string(),
            range: color.webcam_pair_range(),
            min_contour_area: DEFAULT_MIN_CONTOUR_AREA,
            opening_radius: None,
            shape_filter: ShapeFilter::Any,
            distance_model: DistanceModel::InverseWidth {
                scale: WEBCAM_WIDTH_SCALE,
            },
            style,
        }
    }
}
