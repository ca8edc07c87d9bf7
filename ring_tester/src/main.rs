mod frames;
mod prompt;
mod targets;
#[cfg(feature = "video")]
mod video;

use anyhow::{Context, Result};
use clap::Parser;
use frames::{Flow, FrameSink, FrameSource, ImageDirSource, PngSink};
use ring_vision::{FrameReport, RingColor, StatusCadence, StatusLine};
use std::io;
use std::path::PathBuf;
use targets::{ColorArg, Preset};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(name = "ring_tester")]
#[command(about = "Detect colored rings in a video, camera feed or image directory")]
#[command(version)]
struct Cli {
    /// Video file, or a directory of still frames.
    #[arg(long, default_value = "video_recorrido.mp4", conflicts_with = "camera")]
    input: PathBuf,

    /// Camera device index.
    #[arg(long)]
    camera: Option<i32>,

    /// Ring colors to track. Repeat for more than one.
    #[arg(long = "color", value_enum)]
    colors: Vec<ColorArg>,

    #[arg(long, value_enum, default_value_t = Preset::FieldVideo)]
    preset: Preset,

    /// JSON detector config used instead of the preset.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Annotated video at the source frame rate, or the PNG directory for image input.
    #[arg(long, default_value = "video_procesado.mp4")]
    output: PathBuf,

    /// Annotated video at half the source frame rate.
    #[arg(long, default_value = "video_procesado_lento.mp4")]
    slow_output: PathBuf,

    /// Frame rate assumed for image directories.
    #[arg(long, default_value_t = 30.0)]
    fps: f64,

    /// Do not open a preview window.
    #[arg(long)]
    no_display: bool,

    /// Seconds of playback between status lines.
    #[arg(long, default_value_t = ring_vision::status::DEFAULT_STATUS_INTERVAL_SECS)]
    status_interval: u32,

    /// Print status lines as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    // --- 1. Target Selection ---
    let configs = match &cli.config {
        Some(path) => {
            if !cli.colors.is_empty() {
                warn!("--color is ignored when --config is given");
            }
            vec![targets::load_config(path)?]
        }
        None => {
            let colors: Vec<RingColor> = cli.colors.iter().map(|&color| color.into()).collect();
            targets::target_configs(cli.preset, &colors, || {
                prompt::choose_color(&mut io::stdin().lock(), &mut io::stdout())
            })?
        }
    };
    let detectors = targets::build_detectors(configs)?;

    // --- 2. Frame I/O ---
    let (mut source, mut sink) = open_io(&cli)?;
    info!(fps = source.frame_rate(), detectors = detectors.len(), "Source ready");
    println!("Press 'q' to quit");

    // --- 3. Main Processing Loop ---
    let mut cadence = StatusCadence::new(cli.status_interval);
    let mut frames = 0usize;
    loop {
        let frame = match source.next_frame() {
            Ok(Some(frame)) => frame,
            Ok(None) => {
                info!("End of stream");
                break;
            }
            Err(error) => {
                warn!("Error reading frame: {error:#}");
                break;
            }
        };
        frames += 1;

        let mut report = FrameReport::default();
        for detector in &detectors {
            report.merge(detector.process(&frame));
        }

        if let Some(at) = cadence.poll(source.position_ms()) {
            print_status(&StatusLine::from_detections(&report.detections, at), cli.json)?;
        }

        if sink.present(&frame, &report.marks)? == Flow::Quit {
            info!("Quit requested");
            break;
        }
    }

    info!(frames, "Processing complete");
    Ok(())
}

fn print_status(line: &StatusLine, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string(line).context("serializing status line")?);
    } else {
        println!("{line}");
    }
    Ok(())
}

type FrameIo = (Box<dyn FrameSource>, Box<dyn FrameSink>);

fn open_io(cli: &Cli) -> Result<FrameIo> {
    if cli.camera.is_none() && cli.input.is_dir() {
        let source = ImageDirSource::open(&cli.input, cli.fps)?;
        let sink = PngSink::create(&cli.output)?;
        info!("Writing annotated frames to {}", cli.output.display());
        return Ok((Box::new(source), Box::new(sink)));
    }
    open_video(cli)
}

#[cfg(feature = "video")]
fn open_video(cli: &Cli) -> Result<FrameIo> {
    use video::{VideoSink, VideoSource};

    let source = match cli.camera {
        Some(index) => VideoSource::open_camera(index)?,
        None => VideoSource::open_file(&cli.input)?,
    };

    let mut sink = VideoSink::new(!cli.no_display);
    // Camera runs are preview only.
    if cli.camera.is_none() {
        let size = source.frame_size()?;
        let fps = source.frame_rate();
        sink.record(&cli.output, fps, size)?;
        sink.record(&cli.slow_output, fps / 2.0, size)?;
    }
    Ok((Box::new(source), Box::new(sink)))
}

#[cfg(not(feature = "video"))]
fn open_video(cli: &Cli) -> Result<FrameIo> {
    match cli.camera {
        Some(index) => anyhow::bail!("camera {index} needs the `video` feature"),
        None => anyhow::bail!(
            "{} is not an image directory; rebuild with `--features video` to read videos",
            cli.input.display()
        ),
    }
}
