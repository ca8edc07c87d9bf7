// THEORY:
// Distance is estimated from a single bounding-box dimension. None of the
// models here is a calibrated measurement; they are the heuristics the presets
// were tuned with, kept side by side so each preset reproduces its own numbers.
//
// - `ReferenceHeight`: a ring of known height was measured once at a known
//   distance; distance falls off inversely with pixel height. The `/ 10` scale
//   is part of the tuned formula.
// - `InverseWidth`: an empirical constant over pixel width.
// - `Pinhole`: the textbook pinhole estimate for callers with a calibrated focal
//   length, `real_height * focal_length_px / pixel_height`.
//
// Every model returns exactly 0.0 for a zero-sized dimension instead of dividing.

use crate::core_modules::detection::BoundingBox;
use crate::error::VisionError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "model", rename_all = "snake_case")]
pub enum DistanceModel {
    ReferenceHeight {
        reference_distance: f64,
        reference_height: f64,
    },
    InverseWidth {
        scale: f64,
    },
    Pinhole {
        real_height: f64,
        focal_length_px: f64,
    },
}

impl DistanceModel {
    pub fn estimate(&self, bounding_box: &BoundingBox) -> f64 {
        match *self {
            DistanceModel::ReferenceHeight {
                reference_distance,
                reference_height,
            } => inverse(reference_distance * reference_height / 10.0, bounding_box.height),
            DistanceModel::InverseWidth { scale } => inverse(scale, bounding_box.width),
            DistanceModel::Pinhole {
                real_height,
                focal_length_px,
            } => inverse(real_height * focal_length_px, bounding_box.height),
        }
    }

    pub fn validate(&self) -> Result<(), VisionError> {
        let constants: Vec<(&str, f64)> = match *self {
            DistanceModel::ReferenceHeight {
                reference_distance,
                reference_height,
            } => vec![
                ("reference_distance", reference_distance),
                ("reference_height", reference_height),
            ],
            DistanceModel::InverseWidth { scale } => vec![("scale", scale)],
            DistanceModel::Pinhole {
                real_height,
                focal_length_px,
            } => vec![("real_height", real_height), ("focal_length_px", focal_length_px)],
        };

        match constants.iter().find(|(_, value)| !(value.is_finite() && *value > 0.0)) {
            Some((name, value)) => Err(VisionError::InvalidConfig(format!(
                "distance constant {name} must be positive, got {value}"
            ))),
            None => Ok(()),
        }
    }
}

fn inverse(numerator: f64, pixels: u32) -> f64 {
    if pixels == 0 {
        0.0
    } else {
        numerator / pixels as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const FIELD: DistanceModel = DistanceModel::ReferenceHeight {
        reference_distance: 64.0,
        reference_height: 5.58,
    };

    #[test]
    fn reference_height_formula() {
        let distance = FIELD.estimate(&BoundingBox::new(0, 0, 80, 40));
        assert_relative_eq!(distance, 64.0 * 5.58 / 10.0 / 40.0, epsilon = 1e-12);
    }

    #[test]
    fn zero_height_gives_exactly_zero() {
        assert_eq!(FIELD.estimate(&BoundingBox::new(3, 3, 10, 0)), 0.0);
        let pinhole = DistanceModel::Pinhole {
            real_height: 5.58,
            focal_length_px: 700.0,
        };
        assert_eq!(pinhole.estimate(&BoundingBox::new(3, 3, 10, 0)), 0.0);
    }

    #[test]
    fn inverse_width_uses_width_only() {
        let model = DistanceModel::InverseWidth { scale: 100.0 };
        assert_relative_eq!(model.estimate(&BoundingBox::new(0, 0, 50, 7)), 2.0);
        assert_eq!(model.estimate(&BoundingBox::new(0, 0, 0, 7)), 0.0);
    }

    #[test]
    fn pinhole_scales_with_focal_length() {
        let model = DistanceModel::Pinhole {
            real_height: 5.58,
            focal_length_px: 700.0,
        };
        assert_relative_eq!(
            model.estimate(&BoundingBox::new(0, 0, 90, 39)),
            5.58 * 700.0 / 39.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn non_positive_constants_are_rejected() {
        assert!(FIELD.validate().is_ok());
        assert!(DistanceModel::InverseWidth { scale: 0.0 }.validate().is_err());
        assert!(
            DistanceModel::Pinhole {
                real_height: 5.0,
                focal_length_px: f64::NAN
            }
            .validate()
            .is_err()
        );
    }

    #[test]
    fn models_round_trip_through_tagged_json() {
        let json = r#"{"model":"inverse_width","scale":100.0}"#;
        let model: DistanceModel = serde_json::from_str(json).unwrap();
        assert_eq!(model, DistanceModel::InverseWidth { scale: 100.0 });
    }
}
