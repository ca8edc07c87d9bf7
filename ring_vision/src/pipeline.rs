// THEORY:
// The `pipeline` module is the top-level API of the detector. It wires the
// stateless stages of `core_modules` into one call per frame:
//
//   RGB frame -> HSV -> range mask -> opening -> external contours
//             -> area filter -> shape filter -> distance -> detections + marks
//
// Everything that varies between capture setups is a field of `DetectorConfig`
// and one `RingDetector` runs per target color. A detector holds no per-frame
// state: the same frame always produces the same report, and label numbering
// restarts on every call.

use crate::core_modules::color_range::ColorRange;
use crate::core_modules::contour::{bounding_box, external_contours, polygon_area};
use crate::core_modules::detection::Detection;
use crate::core_modules::distance::DistanceModel;
use crate::core_modules::filter::{passes_area, ShapeFilter};
use crate::core_modules::hsv::hsv::to_hsv;
use crate::core_modules::mask::{open_mask, threshold};
use crate::core_modules::overlay::{detection_marks, render_image, Mark, OverlayStyle};
use crate::core_modules::selector;
use crate::error::VisionError;
use image::RgbImage;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// Contours at or below this area are treated as noise.
pub const DEFAULT_MIN_CONTOUR_AREA: f64 = 500.0;

/// Configuration for a `RingDetector`, one per target color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Prefix of every detection label, e.g. "Red ring".
    pub label: String,
    pub range: ColorRange,
    #[serde(default = "default_min_contour_area")]
    pub min_contour_area: f64,
    /// Radius of the square opening element; `None` skips the opening.
    #[serde(default)]
    pub opening_radius: Option<u8>,
    #[serde(default)]
    pub shape_filter: ShapeFilter,
    pub distance_model: DistanceModel,
    #[serde(default)]
    pub style: OverlayStyle,
}

fn default_min_contour_area() -> f64 {
    DEFAULT_MIN_CONTOUR_AREA
}

impl DetectorConfig {
    pub fn validate(&self) -> Result<(), VisionError> {
        self.range.validate()?;
        if self.label.trim().is_empty() {
            return Err(VisionError::InvalidConfig("label must not be empty".into()));
        }
        if !(self.min_contour_area.is_finite() && self.min_contour_area >= 0.0) {
            return Err(VisionError::InvalidConfig(format!(
                "min_contour_area must be a non-negative number, got {}",
                self.min_contour_area
            )));
        }
        self.distance_model.validate()
    }
}

/// Everything the detector found in one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub detections: Vec<Detection>,
    /// Overlay for `detections`, in drawing order.
    pub marks: Vec<Mark>,
}

impl FrameReport {
    pub fn closest(&self) -> Option<&Detection> {
        selector::closest(&self.detections)
    }

    /// Appends another detector's results for the same frame.
    pub fn merge(&mut self, other: FrameReport) {
        self.detections.extend(other.detections);
        self.marks.extend(other.marks);
    }
}

/// Finds and annotates rings of a single color.
#[derive(Debug, Clone)]
pub struct RingDetector {
    config: DetectorConfig,
}

impl RingDetector {
    pub fn new(config: DetectorConfig) -> Result<Self, VisionError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Runs the detection stages on `frame` without drawing anything.
    pub fn detect(&self, frame: &RgbImage) -> Vec<Detection> {
        // --- 1. Color Space & Mask ---
        let hsv = to_hsv(frame);
        let mut mask = threshold(&hsv, &self.config.range);
        if let Some(radius) = self.config.opening_radius {
            mask = open_mask(&mask, radius);
        }

        // --- 2. Contours ---
        let contours = external_contours(&mask);

        // --- 3. Filtering & Measurement ---
        let mut detections: Vec<Detection> = Vec::new();
        for contour in &contours {
            let area = polygon_area(&contour.points);
            if !passes_area(area, self.config.min_contour_area) {
                trace!(area, "contour rejected by area");
                continue;
            }

            let Some(bounding_box) = bounding_box(&contour.points) else {
                continue;
            };
            if !self.config.shape_filter.accepts(&bounding_box) {
                trace!(?bounding_box, "contour rejected by shape");
                continue;
            }

            let count = detections.len() + 1;
            detections.push(Detection {
                label: format!("{} {}", self.config.label, count),
                distance: self.config.distance_model.estimate(&bounding_box),
                center: bounding_box.center(),
                bounding_box,
                area,
            });
        }

        debug!(
            target_label = %self.config.label,
            contours = contours.len(),
            accepted = detections.len(),
            "frame analysed"
        );
        detections
    }

    /// Detections plus the overlay that annotates them.
    pub fn process(&self, frame: &RgbImage) -> FrameReport {
        let detections = self.detect(frame);
        let marks = detections
            .iter()
            .flat_map(|detection| detection_marks(detection, &self.config.style))
            .collect();
        FrameReport { detections, marks }
    }

    /// Detects rings and draws the overlay onto `frame` in place.
    pub fn annotate(&self, frame: &mut RgbImage) -> Vec<Detection> {
        let report = self.process(frame);
        render_image(frame, &report.marks);
        report.detections
    }
}
