// THEORY:
// Status reporting is throttled on the video's own timeline, not wall-clock
// time: slow playback or a paused window never changes which frames report.
// `StatusCadence` fires on the first frame and then whenever at least
// `interval` whole seconds of playback have passed since it last fired.
// `StatusLine` is the report itself, printable as prose or serializable.

use crate::core_modules::detection::Detection;
use crate::core_modules::selector;
use serde::Serialize;
use std::fmt;

pub const DEFAULT_STATUS_INTERVAL_SECS: u32 = 2;

/// A playback position split into whole seconds and leftover milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackTime {
    pub seconds: i64,
    pub millis: u32,
}

impl PlaybackTime {
    pub fn from_millis(position_ms: f64) -> Self {
        let position_ms = if position_ms.is_finite() {
            position_ms.max(0.0)
        } else {
            0.0
        };
        Self {
            seconds: (position_ms / 1000.0).floor() as i64,
            millis: (position_ms % 1000.0).floor() as u32,
        }
    }
}

impl fmt::Display for PlaybackTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.seconds, self.millis)
    }
}

#[derive(Debug, Clone)]
pub struct StatusCadence {
    interval: i64,
    last_fired: i64,
}

impl StatusCadence {
    pub fn new(interval_secs: u32) -> Self {
        let interval = interval_secs as i64;
        Self {
            interval,
            last_fired: -interval,
        }
    }

    /// Returns the playback time when a status line is due at `position_ms`.
    pub fn poll(&mut self, position_ms: f64) -> Option<PlaybackTime> {
        let now = PlaybackTime::from_millis(position_ms);
        if now.seconds - self.last_fired >= self.interval {
            self.last_fired = now.seconds;
            Some(now)
        } else {
            None
        }
    }
}

impl Default for StatusCadence {
    fn default() -> Self {
        Self::new(DEFAULT_STATUS_INTERVAL_SECS)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StatusLine {
    Closest {
        label: String,
        distance: f64,
        at: PlaybackTime,
    },
    Empty {
        at: PlaybackTime,
    },
}

impl StatusLine {
    pub fn from_detections(detections: &[Detection], at: PlaybackTime) -> Self {
        match selector::closest(detections) {
            Some(nearest) => StatusLine::Closest {
                label: nearest.label.clone(),
                distance: nearest.distance,
                at,
            },
            None => StatusLine::Empty { at },
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLine::Closest {
                label,
                distance,
                at,
            } => write!(
                f,
                "The closest {label} is {distance:.2} meters away, at second {at}."
            ),
            StatusLine::Empty { at } => {
                write!(f, "Second {at}: no objects detected in the current frame.")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::detection::BoundingBox;

    fn detection(label: &str, distance: f64) -> Detection {
        Detection {
            label: label.to_string(),
            distance,
            center: (10, 10),
            bounding_box: BoundingBox::new(0, 0, 20, 20),
            area: 361.0,
        }
    }

    #[test]
    fn playback_time_splits_milliseconds() {
        assert_eq!(
            PlaybackTime::from_millis(4_071.9),
            PlaybackTime {
                seconds: 4,
                millis: 71
            }
        );
        assert_eq!(PlaybackTime::from_millis(4_071.9).to_string(), "4.071");
        assert_eq!(PlaybackTime::from_millis(-3.0).to_string(), "0.000");
    }

    #[test]
    fn cadence_fires_every_two_seconds_of_playback() {
        let mut cadence = StatusCadence::default();
        let fired: Vec<f64> = [0.0, 33.3, 1_500.0, 1_999.0, 2_000.0, 3_999.0, 4_000.0, 7_250.0]
            .into_iter()
            .filter(|position| cadence.poll(*position).is_some())
            .collect();
        assert_eq!(fired, vec![0.0, 2_000.0, 4_000.0, 7_250.0]);
    }

    #[test]
    fn zero_interval_fires_every_frame() {
        let mut cadence = StatusCadence::new(0);
        assert!(cadence.poll(10.0).is_some());
        assert!(cadence.poll(11.0).is_some());
    }

    #[test]
    fn status_reports_the_closest_ring() {
        let at = PlaybackTime::from_millis(2_005.0);
        let line = StatusLine::from_detections(
            &[detection("Red ring 1", 3.0), detection("Red ring 2", 1.0), detection("Red ring 3", 2.0)],
            at,
        );
        assert_eq!(
            line.to_string(),
            "The closest Red ring 2 is 1.00 meters away, at second 2.005."
        );
    }

    #[test]
    fn status_reports_empty_frames() {
        let line = StatusLine::from_detections(&[], PlaybackTime::from_millis(0.0));
        assert_eq!(
            line.to_string(),
            "Second 0.000: no objects detected in the current frame."
        );
        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(json["status"], "empty");
        assert_eq!(json["at"]["seconds"], 0);
    }
}
