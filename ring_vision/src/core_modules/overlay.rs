// THEORY:
// The overlay is described as data before it is drawn. For every detection the
// detector emits a short list of `Mark`s (box outline, label panel, label and
// distance text, center dot) styled by the preset's `OverlayStyle`. Keeping the
// marks as values lets one frame be rendered by more than one backend:
// `render_image` draws onto an `RgbImage` with `imageproc`, and the video
// front end draws the same marks onto its own frames.
//
// Text is rasterized with DejaVu Sans, embedded in the crate, sized so that a
// text `scale` of 1.0 matches the height of OpenCV's Hershey simplex font.
// Rectangle thickness straddles the nominal edge the way OpenCV's brush does.

use crate::core_modules::detection::Detection;
use ab_glyph::{Font, FontRef, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::{
    draw_filled_circle_mut, draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut,
};
use imageproc::rect::Rect;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;
use tracing::warn;

static FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");
/// Pixel height per unit of text scale.
const FONT_PX_PER_SCALE: f32 = 30.0;

pub type Color = [u8; 3];

/// Label panel geometry relative to the box's top-left corner.
const PANEL_WIDTH: i32 = 150;
const PANEL_HEIGHT: i32 = 40;
const LABEL_BASELINE: i32 = 10;
const DISTANCE_BASELINE: i32 = 25;
const TEXT_SCALE: f64 = 0.5;
const TEXT_THICKNESS: u32 = 2;

/// Colors and geometry of the overlay. All colors are RGB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayStyle {
    pub box_color: Color,
    pub box_thickness: u32,
    pub center_color: Color,
    pub center_radius: u32,
    pub text_color: Color,
    /// Filled panel behind the label text, if any.
    pub label_background: Option<Color>,
    /// When false only the box and the center dot are drawn.
    pub draw_labels: bool,
}

impl OverlayStyle {
    /// Light-gray box and dot, white text on a black panel.
    pub fn field_video() -> Self {
        Self {
            box_color: [211, 211, 211],
            box_thickness: 2,
            center_color: [211, 211, 211],
            center_radius: 5,
            text_color: [255, 255, 255],
            label_background: Some([0, 0, 0]),
            draw_labels: true,
        }
    }

    /// Everything in one light gray, no panel.
    pub fn webcam() -> Self {
        Self {
            box_color: [200, 200, 200],
            box_thickness: 2,
            center_color: [200, 200, 200],
            center_radius: 5,
            text_color: [200, 200, 200],
            label_background: None,
            draw_labels: true,
        }
    }

    /// Box and dot only, in contrasting colors so two targets can share a frame.
    pub fn unlabeled(box_color: Color, center_color: Color) -> Self {
        Self {
            box_color,
            box_thickness: 2,
            center_color,
            center_radius: 5,
            text_color: [255, 255, 255],
            label_background: None,
            draw_labels: false,
        }
    }
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self::field_video()
    }
}

/// A single drawing primitive. Rectangle corners are inclusive.
#[derive(Debug, Clone, PartialEq)]
pub enum Mark {
    Outline {
        top_left: (i32, i32),
        bottom_right: (i32, i32),
        color: Color,
        thickness: u32,
    },
    Panel {
        top_left: (i32, i32),
        bottom_right: (i32, i32),
        color: Color,
    },
    /// `origin` is the left end of the text baseline.
    Text {
        origin: (i32, i32),
        text: String,
        color: Color,
        scale: f64,
        thickness: u32,
    },
    Dot {
        center: (i32, i32),
        radius: u32,
        color: Color,
    },
}

/// The marks that annotate one detection, in drawing order.
pub fn detection_marks(detection: &Detection, style: &OverlayStyle) -> Vec<Mark> {
    let (x, y) = (detection.bounding_box.x, detection.bounding_box.y);
    let mut marks = vec![Mark::Outline {
        top_left: (x, y),
        bottom_right: detection.bounding_box.far_corner(),
        color: style.box_color,
        thickness: style.box_thickness,
    }];

    if style.draw_labels {
        if let Some(color) = style.label_background {
            marks.push(Mark::Panel {
                top_left: (x, y - PANEL_HEIGHT),
                bottom_right: (x + PANEL_WIDTH, y),
                color,
            });
        }
        marks.push(Mark::Text {
            origin: (x, y - LABEL_BASELINE),
            text: detection.label.clone(),
            color: style.text_color,
            scale: TEXT_SCALE,
            thickness: TEXT_THICKNESS,
        });
        marks.push(Mark::Text {
            origin: (x, y - DISTANCE_BASELINE),
            text: format!("Dist: {:.2}m", detection.distance),
            color: style.text_color,
            scale: TEXT_SCALE,
            thickness: TEXT_THICKNESS,
        });
    }

    marks.push(Mark::Dot {
        center: detection.center,
        radius: style.center_radius,
        color: style.center_color,
    });
    marks
}

/// Draws `marks` onto `frame` in order.
pub fn render_image(frame: &mut RgbImage, marks: &[Mark]) {
    for mark in marks {
        match mark {
            Mark::Outline {
                top_left,
                bottom_right,
                color,
                thickness,
            } => {
                let half = (*thickness).max(1) as i32 / 2;
                for grow in -half..=half {
                    let ring = span(
                        (top_left.0 - grow, top_left.1 - grow),
                        (bottom_right.0 + grow, bottom_right.1 + grow),
                    );
                    if let Some(rect) = ring {
                        draw_hollow_rect_mut(frame, rect, Rgb(*color));
                    }
                }
            }
            Mark::Panel {
                top_left,
                bottom_right,
                color,
            } => {
                if let Some(rect) = span(*top_left, *bottom_right) {
                    draw_filled_rect_mut(frame, rect, Rgb(*color));
                }
            }
            Mark::Text {
                origin,
                text,
                color,
                scale,
                ..
            } => {
                if let Some(font) = overlay_font() {
                    let px = PxScale::from(*scale as f32 * FONT_PX_PER_SCALE);
                    let ascent = font.as_scaled(px).ascent().round() as i32;
                    draw_text_mut(frame, Rgb(*color), origin.0, origin.1 - ascent, px, font, text);
                }
            }
            Mark::Dot {
                center,
                radius,
                color,
            } => draw_filled_circle_mut(frame, *center, *radius as i32, Rgb(*color)),
        }
    }
}

fn overlay_font() -> Option<&'static FontRef<'static>> {
    static FONT: OnceLock<Option<FontRef<'static>>> = OnceLock::new();
    FONT.get_or_init(|| match FontRef::try_from_slice(FONT_BYTES) {
        Ok(font) => Some(font),
        Err(error) => {
            warn!(%error, "overlay font unreadable, text marks will not be drawn");
            None
        }
    })
    .as_ref()
}

fn span(top_left: (i32, i32), bottom_right: (i32, i32)) -> Option<Rect> {
    if bottom_right.0 < top_left.0 || bottom_right.1 < top_left.1 {
        return None;
    }
    Some(Rect::at(top_left.0, top_left.1).of_size(
        (bottom_right.0 - top_left.0 + 1) as u32,
        (bottom_right.1 - top_left.1 + 1) as u32,
    ))
}
