//! Hand-landmark frames as emitted by the external landmark extractor.
//!
//! The extractor writes one JSON object per camera frame:
//!
//! ```json
//! {"width": 640, "height": 480, "hands": [[[0.51, 0.42], [0.53, 0.47], ...]]}
//! ```
//!
//! Coordinates are normalised to `[0, 1]`.  Only the first hand is used.  An
//! empty `hands` array (or a missing field) means no hand was detected.

use serde::Deserialize;

use super::classifier::Centroid;

/// One decoded extractor frame.
#[derive(Debug, Clone, Deserialize)]
pub struct LandmarkFrame {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub hands: Vec<Vec<[f32; 2]>>,
}

impl LandmarkFrame {
    /// Pixel centroid of the first detected hand.
    ///
    /// With `mirror` set the x axis is flipped, giving the selfie view the
    /// player sees on screen.
    pub fn centroid(&self, mirror: bool) -> Option<Centroid> {
        let hand = self.hands.first()?;
        centroid_of(hand, self.width, self.height, mirror)
    }
}

/// Mean of the normalised landmark positions, scaled to pixels and truncated
/// to whole pixels.
pub fn centroid_of(points: &[[f32; 2]], width: u32, height: u32, mirror: bool) -> Option<Centroid> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f32;
    let mut mean_x = points.iter().map(|p| p[0]).sum::<f32>() / n;
    let mean_y = points.iter().map(|p| p[1]).sum::<f32>() / n;
    if mirror {
        mean_x = 1.0 - mean_x;
    }
    Some(Centroid::new(
        (mean_x * width as f32).trunc(),
        (mean_y * height as f32).trunc(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centroid_is_mean_scaled_to_pixels() {
        let points = [[0.25, 0.5], [0.75, 0.5]];
        let c = centroid_of(&points, 640, 480, false).unwrap();
        assert_eq!(c, Centroid::new(320.0, 240.0));
    }

    #[test]
    fn centroid_truncates_fractional_pixels() {
        let c = centroid_of(&[[0.1, 0.1]], 645, 485, false).unwrap();
        // 64.5 -> 64, 48.5 -> 48
        assert_eq!(c, Centroid::new(64.0, 48.0));
    }

    #[test]
    fn mirror_flips_horizontal_axis() {
        let c = centroid_of(&[[0.25, 0.5]], 400, 100, true).unwrap();
        assert_eq!(c, Centroid::new(300.0, 50.0));
    }

    #[test]
    fn empty_hand_has_no_centroid() {
        assert!(centroid_of(&[], 640, 480, false).is_none());
    }

    #[test]
    fn frame_decodes_and_uses_first_hand() {
        let raw = r#"{"width":100,"height":100,"hands":[[[0.2,0.4]],[[0.9,0.9]]]}"#;
        let frame: LandmarkFrame = serde_json::from_str(raw).unwrap();
        assert_eq!(frame.centroid(false), Some(Centroid::new(20.0, 40.0)));
    }

    #[test]
    fn frame_without_hands_field_means_no_hand() {
        let frame: LandmarkFrame = serde_json::from_str(r#"{"width":640,"height":480}"#).unwrap();
        assert!(frame.centroid(true).is_none());
    }
}
