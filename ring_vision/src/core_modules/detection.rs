// THEORY:
// `BoundingBox` and `Detection` are the "dumb" data containers of the detector.
// A `Detection` is a snapshot of one accepted blob in one frame: nothing about
// it survives to the next frame, and two detections with the same label in
// consecutive frames are not the same ring. The label number is the discovery
// order within the frame and nothing more.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in pixel coordinates. `width` and `height` count
/// pixels, so a single pixel has a 1x1 box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point, rounded toward the top-left corner.
    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }

    /// Bottom-right corner, inclusive of the outline drawn around the box.
    pub fn far_corner(&self) -> (i32, i32) {
        (self.x + self.width as i32, self.y + self.height as i32)
    }
}

/// One ring accepted in a single frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    /// "<target label> <n>", numbered in discovery order within the frame.
    pub label: String,
    /// Estimated distance in the units of the configured distance model.
    pub distance: f64,
    /// Center of the bounding box.
    pub center: (i32, i32),
    pub bounding_box: BoundingBox,
    /// Polygon area of the contour the box was taken from.
    pub area: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_uses_integer_halves() {
        assert_eq!(BoundingBox::new(40, 60, 80, 40).center(), (80, 80));
        assert_eq!(BoundingBox::new(0, 0, 5, 3).center(), (2, 1));
    }

    #[test]
    fn far_corner_is_origin_plus_size() {
        assert_eq!(BoundingBox::new(3, 4, 10, 2).far_corner(), (13, 6));
    }
}
