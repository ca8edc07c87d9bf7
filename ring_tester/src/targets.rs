use anyhow::{Context, Result};
use clap::ValueEnum;
use ring_vision::{DetectorConfig, RingColor, RingDetector};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Preset {
    /// Recorded field footage, one color at a time, height-based distance.
    FieldVideo,
    /// Live camera, red rings only, width-based distance.
    Webcam,
    /// Live camera, red and blue together, unlabeled overlay.
    WebcamPair,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorArg {
    Red,
    Blue,
}

impl From<ColorArg> for RingColor {
    fn from(color: ColorArg) -> Self {
        match color {
            ColorArg::Red => RingColor::Red,
            ColorArg::Blue => RingColor::Blue,
        }
    }
}

/// Resolves the detector configs for a run. `ask` is only called when the
/// preset needs a color and none was given.
pub fn target_configs(
    preset: Preset,
    colors: &[RingColor],
    ask: impl FnOnce() -> Result<RingColor>,
) -> Result<Vec<DetectorConfig>> {
    let mut unique: Vec<RingColor> = Vec::new();
    for color in colors {
        if !unique.contains(color) {
            unique.push(*color);
        }
    }

    let configs = match preset {
        Preset::FieldVideo => {
            if unique.is_empty() {
                unique.push(ask()?);
            }
            unique.into_iter().map(DetectorConfig::field_video).collect()
        }
        Preset::Webcam => {
            if unique.contains(&RingColor::Blue) {
                warn!("the webcam preset only tracks red rings; ignoring --color blue");
            }
            vec![DetectorConfig::webcam()]
        }
        Preset::WebcamPair => {
            if unique.is_empty() {
                unique.extend(RingColor::ALL);
            }
            unique.into_iter().map(DetectorConfig::webcam_pair).collect()
        }
    };
    Ok(configs)
}

pub fn load_config(path: &Path) -> Result<DetectorConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading detector config {}", path.display()))?;
    serde_json::from_str(&text)
        .with_context(|| format!("parsing detector config {}", path.display()))
}

pub fn build_detectors(configs: Vec<DetectorConfig>) -> Result<Vec<RingDetector>> {
    configs
        .into_iter()
        .map(|config| {
            let label = config.label.clone();
            let detector = RingDetector::new(config)
                .with_context(|| format!("invalid detector config for {label:?}"))?;
            let range = &detector.config().range;
            info!(
                target_label = %label,
                lower = ?range.lower(),
                upper = ?range.upper(),
                "Tracking"
            );
            Ok(detector)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    fn never_asked() -> Result<RingColor> {
        bail!("prompt should not be shown")
    }

    fn labels(configs: &[DetectorConfig]) -> Vec<&str> {
        configs.iter().map(|config| config.label.as_str()).collect()
    }

    #[test]
    fn field_video_prompts_without_colors() {
        let configs = target_configs(Preset::FieldVideo, &[], || Ok(RingColor::Blue)).unwrap();
        assert_eq!(labels(&configs), vec!["Blue ring"]);

        let refused = target_configs(Preset::FieldVideo, &[], || bail!("invalid option"));
        assert!(refused.is_err());
    }

    #[test]
    fn explicit_colors_skip_the_prompt_and_dedupe() {
        let colors = [RingColor::Red, RingColor::Blue, RingColor::Red];
        let configs = target_configs(Preset::FieldVideo, &colors, never_asked).unwrap();
        assert_eq!(labels(&configs), vec!["Red ring", "Blue ring"]);
    }

    #[test]
    fn webcam_pair_defaults_to_both_colors() {
        let configs = target_configs(Preset::WebcamPair, &[], never_asked).unwrap();
        assert_eq!(configs.len(), 2);
    }

    #[test]
    fn webcam_is_red_only() {
        let configs = target_configs(Preset::Webcam, &[RingColor::Blue], never_asked).unwrap();
        assert_eq!(labels(&configs), vec!["Ring"]);
    }

    #[test]
    fn configs_load_from_json_files() {
        let path = std::env::temp_dir().join(format!("ring_tester_config_{}.json", std::process::id()));
        let config = DetectorConfig::webcam_pair(RingColor::Red);
        fs::write(&path, serde_json::to_string_pretty(&config).unwrap()).unwrap();

        assert_eq!(load_config(&path).unwrap(), config);
        fs::remove_file(&path).unwrap();
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn invalid_configs_fail_to_build() {
        let mut config = DetectorConfig::webcam();
        config.min_contour_area = f64::NAN;
        assert!(build_detectors(vec![config]).is_err());
        let detectors = build_detectors(vec![DetectorConfig::webcam()]).unwrap();
        assert_eq!(detectors.len(), 1);
        assert_eq!(detectors[0].config(), &DetectorConfig::webcam());
    }
}
