use crate::core_modules::detection::Detection;

/// The detection with the smallest distance. Ties go to the earliest detection,
/// matching a stable ascending sort that takes the first entry.
pub fn closest(detections: &[Detection]) -> Option<&Detection> {
    detections
        .iter()
        .min_by(|a, b| a.distance.total_cmp(&b.distance))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_modules::detection::BoundingBox;

    fn detection(label: &str, distance: f64) -> Detection {
        Detection {
            label: label.to_string(),
            distance,
            center: (0, 0),
            bounding_box: BoundingBox::new(0, 0, 1, 1),
            area: 0.0,
        }
    }

    #[test]
    fn picks_the_nearest_ring() {
        let detections = vec![
            detection("Red ring 1", 3.0),
            detection("Red ring 2", 1.0),
            detection("Red ring 3", 2.0),
        ];
        let nearest = closest(&detections).unwrap();
        assert_eq!(nearest.label, "Red ring 2");
        assert_eq!(nearest.distance, 1.0);
    }

    #[test]
    fn ties_keep_discovery_order() {
        let detections = vec![detection("Blue ring 1", 1.5), detection("Blue ring 2", 1.5)];
        assert_eq!(closest(&detections).unwrap().label, "Blue ring 1");
    }

    #[test]
    fn empty_frame_has_no_closest() {
        assert!(closest(&[]).is_none());
    }
}
