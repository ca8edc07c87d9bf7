// THEORY:
// The contour stage finds the outline of every foreground blob in the cleaned
// mask and reduces each outline to the two numbers the filters care about: its
// enclosed area and its bounding box.
//
// 1.  **External only**: Rings photographed face-on have a hole; the hole's
//     border and anything nested inside it are ignored. Only borders whose parent
//     is the image frame itself are kept. Everything outside the frame counts as
//     background, so a ring cut off by the frame edge still has an outer border.
// 2.  **Polygon area**: Area is measured on the polygon through the contour's
//     border pixels (shoelace formula), not by counting pixels. A filled
//     `w x h` rectangle therefore measures `(w - 1) * (h - 1)`.
// 3.  **Pixel-extent boxes**: The bounding box covers every border pixel, so the
//     same rectangle yields a `w x h` box.

use crate::core_modules::detection::BoundingBox;
use image::{imageops, GrayImage};
use imageproc::contours::{find_contours, BorderType, Contour};
use imageproc::point::Point;

pub type RingContour = Contour<i32>;

/// Outermost contours of the mask, in raster discovery order.
pub fn external_contours(mask: &GrayImage) -> Vec<RingContour> {
    // Border tracing needs a background ring around the blobs, so trace a
    // one-pixel padded copy and shift the points back.
    let (width, height) = mask.dimensions();
    let mut padded = GrayImage::new(width + 2, height + 2);
    imageops::replace(&mut padded, mask, 1, 1);

    find_contours::<i32>(&padded)
        .into_iter()
        .filter(|contour| matches!(contour.border_type, BorderType::Outer) && contour.parent.is_none())
        .map(|mut contour| {
            for point in &mut contour.points {
                point.x -= 1;
                point.y -= 1;
            }
            contour
        })
        .collect()
}

/// Absolute area of the closed polygon through `points`.
pub fn polygon_area(points: &[Point<i32>]) -> f64 {
    if points.len() < 3 {
        return 0.0;
    }

    let twice_area: i64 = points
        .iter()
        .zip(points.iter().cycle().skip(1))
        .map(|(a, b)| a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64)
        .sum();

    twice_area.abs() as f64 / 2.0
}

/// Smallest axis-aligned box covering all `points`, or `None` for an empty contour.
pub fn bounding_box(points: &[Point<i32>]) -> Option<BoundingBox> {
    let first = points.first()?;
    let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);

    for point in &points[1..] {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Some(BoundingBox::new(
        min_x,
        min_y,
        (max_x - min_x + 1) as u32,
        (max_y - min_y + 1) as u32,
    ))
}
