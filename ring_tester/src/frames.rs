// THEORY:
// The tester loop only needs two things from its surroundings: a stream of RGB
// frames with a playback clock, and somewhere to send each annotated frame.
// `FrameSource` and `FrameSink` are those two seams. The image-directory
// backend below needs nothing beyond `image`; the OpenCV backend in `video`
// implements the same traits for files, cameras, windows and encoders.

use anyhow::{bail, Context, Result};
use image::RgbImage;
use ring_vision::{render_image, Mark};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const IMAGE_EXTENSIONS: [&str; 4] = ["png", "jpg", "jpeg", "bmp"];

pub trait FrameSource {
    /// The next frame, or `None` at the end of the stream.
    fn next_frame(&mut self) -> Result<Option<RgbImage>>;
    /// Playback position of the frame last returned, in milliseconds.
    fn position_ms(&self) -> f64;
    fn frame_rate(&self) -> f64;
}

/// What the loop should do after a frame has been presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub trait FrameSink {
    fn present(&mut self, frame: &RgbImage, marks: &[Mark]) -> Result<Flow>;
}

/// Still images in a directory, played back in file-name order at a fixed rate.
pub struct ImageDirSource {
    paths: Vec<PathBuf>,
    next: usize,
    fps: f64,
}

impl ImageDirSource {
    pub fn open(dir: &Path, fps: f64) -> Result<Self> {
        if !(fps.is_finite() && fps > 0.0) {
            bail!("frame rate must be positive, got {fps}");
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(dir)
            .with_context(|| format!("reading image directory {}", dir.display()))?
            .filter_map(|entry| entry.ok().map(|entry| entry.path()))
            .filter(|path| is_image(path))
            .collect();
        paths.sort();

        if paths.is_empty() {
            bail!("no images found in {}", dir.display());
        }
        info!(frames = paths.len(), "Loaded image directory {}", dir.display());
        Ok(Self {
            paths,
            next: 0,
            fps,
        })
    }
}

fn is_image(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

impl FrameSource for ImageDirSource {
    fn next_frame(&mut self) -> Result<Option<RgbImage>> {
        let Some(path) = self.paths.get(self.next) else {
            return Ok(None);
        };
        let frame = image::open(path)
            .with_context(|| format!("decoding {}", path.display()))?
            .to_rgb8();
        self.next += 1;
        Ok(Some(frame))
    }

    fn position_ms(&self) -> f64 {
        self.next.saturating_sub(1) as f64 * 1000.0 / self.fps
    }

    fn frame_rate(&self) -> f64 {
        self.fps
    }
}

/// Writes every annotated frame as a numbered PNG.
pub struct PngSink {
    dir: PathBuf,
    written: usize,
}

impl PngSink {
    pub fn create(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating output directory {}", dir.display()))?;
        Ok(Self {
            dir: dir.to_path_buf(),
            written: 0,
        })
    }
}

impl FrameSink for PngSink {
    fn present(&mut self, frame: &RgbImage, marks: &[Mark]) -> Result<Flow> {
        let mut annotated = frame.clone();
        render_image(&mut annotated, marks);

        let path = self.dir.join(format!("frame_{:05}.png", self.written));
        annotated
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
        self.written += 1;
        Ok(Flow::Continue)
    }
}
