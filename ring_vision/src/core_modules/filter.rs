use crate::core_modules::detection::BoundingBox;
use serde::{Deserialize, Serialize};

/// Contours must enclose strictly more than `min_area` to count as a ring.
#[inline]
pub fn passes_area(area: f64, min_area: f64) -> bool {
    area > min_area
}

/// Optional acceptance test on the bounding box shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeFilter {
    #[default]
    Any,
    /// Only boxes wider than they are tall. Rings lying on the field, seen from
    /// the robot's camera height, always look like this.
    Horizontal,
}

impl ShapeFilter {
    pub fn accepts(self, bounding_box: &BoundingBox) -> bool {
        match self {
            ShapeFilter::Any => true,
            ShapeFilter::Horizontal => bounding_box.width > bounding_box.height,
        }
    }
}
