// THEORY:
// OpenCV backend for the tester loop. Frames arrive from `VideoCapture` as BGR
// `Mat`s and are handed to the detector as `RgbImage`s; on the way out the
// annotated frame is packed back into a BGR `Mat`, the overlay marks are drawn
// with `imgproc` in OpenCV's own Hershey font, and the result goes to the
// encoders and the preview window.

use crate::frames::{Flow, FrameSink, FrameSource};
use anyhow::{bail, Context, Result};
use image::RgbImage;
use opencv::{
    core::{self, Mat, Point, Scalar},
    highgui, imgproc,
    prelude::*,
    videoio::{self, VideoCapture, VideoWriter},
};
use ring_vision::core_modules::overlay::Color;
use ring_vision::{bgr_bytes, rgb_from_bgr, Mark};
use std::path::Path;
use tracing::info;

const WINDOW_TITLE: &str = "Ring Detection";
const QUIT_KEY: i32 = 'q' as i32;

pub struct VideoSource {
    capture: VideoCapture,
    frame: Mat,
}

impl VideoSource {
    pub fn open_file(path: &Path) -> Result<Self> {
        if !path.is_file() {
            bail!("the file {} does not exist", path.display());
        }
        let name = path.to_string_lossy();
        let capture = VideoCapture::from_file(&name, videoio::CAP_ANY)
            .with_context(|| format!("opening video {}", path.display()))?;
        Self::from_capture(capture, &name)
    }

    pub fn open_camera(index: i32) -> Result<Self> {
        let capture = VideoCapture::new(index, videoio::CAP_ANY)
            .with_context(|| format!("opening camera {index}"))?;
        Self::from_capture(capture, &format!("camera {index}"))
    }

    fn from_capture(capture: VideoCapture, name: &str) -> Result<Self> {
        if !capture.is_opened()? {
            bail!("error opening {name}");
        }
        info!("Opened {name}");
        Ok(Self {
            capture,
            frame: Mat::default(),
        })
    }

    pub fn frame_size(&self) -> Result<core::Size> {
        let width = self.capture.get(videoio::CAP_PROP_FRAME_WIDTH)?;
        let height = self.capture.get(videoio::CAP_PROP_FRAME_HEIGHT)?;
        Ok(core::Size::new(width as i32, height as i32))
    }
}

impl FrameSource for VideoSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        if !self.capture.read(&mut self.frame)? || self.frame.empty() {
            return Ok(None);
        }
        mat_to_rgb(&self.frame).map(Some)
    }

    fn position_ms(&self) -> f64 {
        self.capture.get(videoio::CAP_PROP_POS_MSEC).unwrap_or(0.0)
    }

    fn frame_rate(&self) -> f64 {
        self.capture.get(videoio::CAP_PROP_FPS).unwrap_or(0.0)
    }
}

/// Encoders plus an optional preview window.
pub struct VideoSink {
    writers: Vec<VideoWriter>,
    display: bool,
}

impl VideoSink {
    pub fn new(display: bool) -> Self {
        Self {
            writers: Vec::new(),
            display,
        }
    }

    /// Adds an mp4v encoder writing every presented frame at `fps`.
    pub fn record(&mut self, path: &Path, fps: f64, size: core::Size) -> Result<()> {
        let fourcc = VideoWriter::fourcc('m', 'p', '4', 'v')?;
        let writer = VideoWriter::new(&path.to_string_lossy(), fourcc, fps, size, true)
            .with_context(|| format!("creating writer for {}", path.display()))?;
        if !writer.is_opened()? {
            bail!("could not open {} for writing", path.display());
        }
        info!(fps, "Recording to {}", path.display());
        self.writers.push(writer);
        Ok(())
    }
}

impl FrameSink for VideoSink {
    fn present(&mut self, frame: &RgbImage, marks: &[Mark]) -> Result<Flow> {
        let mut output = rgb_to_mat(frame)?;
        draw_marks(&mut output, marks)?;

        for writer in &mut self.writers {
            writer.write(&output)?;
        }

        if self.display {
            highgui::imshow(WINDOW_TITLE, &output)?;
            if highgui::wait_key(1)? & 0xFF == QUIT_KEY {
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }
}

impl Drop for VideoSink {
    fn drop(&mut self) {
        for writer in &mut self.writers {
            let _ = writer.release();
        }
        if self.display {
            let _ = highgui::destroy_all_windows();
        }
    }
}

fn mat_to_rgb(mat: &Mat) -> Result<RgbImage> {
    let bytes = mat.data_bytes()?.to_vec();
    Ok(rgb_from_bgr(mat.cols() as u32, mat.rows() as u32, bytes)?)
}

fn rgb_to_mat(frame: &RgbImage) -> Result<Mat> {
    let size = core::Size::new(frame.width() as i32, frame.height() as i32);
    let mut mat = Mat::new_size_with_default(size, core::CV_8UC3, Scalar::all(0.0))?;
    mat.data_bytes_mut()?.copy_from_slice(&bgr_bytes(frame));
    Ok(mat)
}

/// OpenCV scalars are BGR.
fn scalar(color: Color) -> Scalar {
    Scalar::new(color[2] as f64, color[1] as f64, color[0] as f64, 0.0)
}

fn point((x, y): (i32, i32)) -> Point {
    Point::new(x, y)
}

fn draw_marks(frame: &mut Mat, marks: &[Mark]) -> opencv::Result<()> {
    for mark in marks {
        match mark {
            Mark::Outline {
                top_left,
                bottom_right,
                color,
                thickness,
            } => imgproc::rectangle_points(
                frame,
                point(*top_left),
                point(*bottom_right),
                scalar(*color),
                *thickness as i32,
                imgproc::LINE_8,
                0,
            )?,
            Mark::Panel {
                top_left,
                bottom_right,
                color,
            } => imgproc::rectangle_points(
                frame,
                point(*top_left),
                point(*bottom_right),
                scalar(*color),
                imgproc::FILLED,
                imgproc::LINE_8,
                0,
            )?,
            Mark::Text {
                origin,
                text,
                color,
                scale,
                thickness,
            } => imgproc::put_text(
                frame,
                text,
                point(*origin),
                imgproc::FONT_HERSHEY_SIMPLEX,
                *scale,
                scalar(*color),
                *thickness as i32,
                imgproc::LINE_8,
                false,
            )?,
            Mark::Dot {
                center,
                radius,
                color,
            } => imgproc::circle(
                frame,
                point(*center),
                *radius as i32,
                scalar(*color),
                imgproc::FILLED,
                imgproc::LINE_8,
                0,
            )?,
        }
    }
    Ok(())
}
