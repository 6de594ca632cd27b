//! Canvas to source image coordinate rescaling.

use pose_models::Pose;

/// Per-axis factors from canvas pixels to source image pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleFactors {
    pub x: f64,
    pub y: f64,
}

impl ScaleFactors {
    /// `(source_width / side, source_height / side)`.
    pub fn new(source_width: u32, source_height: u32, side: u32) -> Self {
        let side = side as f64;
        Self {
            x: source_width as f64 / side,
            y: source_height as f64 / side,
        }
    }
}

/// Multiply every keypoint by the scale factors, in place.
pub fn rescale_pose(pose: &mut Pose, factors: ScaleFactors) {
    pose.scale(factors.x, factors.y);
}

#[cfg(test)]
mod tests {
    use pose_models::{Keypoint, Part};

    use super::*;

    fn pose_with(points: &[(f64, f64)]) -> Pose {
        Pose::from_keypoints(
            points
                .iter()
                .zip(Part::ALL)
                .map(|(&(x, y), part)| Keypoint::new(part, 0.5, x, y))
                .collect(),
        )
    }

    #[test]
    fn test_factors() {
        let f = ScaleFactors::new(400, 100, 200);
        assert_eq!(f, ScaleFactors { x: 2.0, y: 0.5 });
    }

    #[test]
    fn test_rescale_matches_product_for_many_sizes() {
        let side = 250;
        let normalized = [(0.0, 0.0), (125.0, 60.5), (249.9, 250.0), (17.25, 3.75)];

        for &(w, h) in &[(1, 1), (640, 480), (400, 100), (1920, 1080), (7, 9001)] {
            let mut pose = pose_with(&normalized);
            let factors = ScaleFactors::new(w, h, side);
            rescale_pose(&mut pose, factors);

            for (kp, &(nx, ny)) in pose.keypoints.iter().zip(&normalized) {
                assert_eq!(kp.position.x, nx * factors.x);
                assert_eq!(kp.position.y, ny * factors.y);
                assert!((kp.position.x - nx * w as f64 / side as f64).abs() < 1e-9);
                assert!((kp.position.y - ny * h as f64 / side as f64).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn test_in_bounds_stays_in_bounds() {
        let side = 200;
        let mut pose = pose_with(&[(0.0, 0.0), (200.0, 200.0), (100.0, 37.0)]);
        rescale_pose(&mut pose, ScaleFactors::new(400, 100, side));

        for kp in &pose.keypoints {
            assert!((0.0..=400.0).contains(&kp.position.x));
            assert!((0.0..=100.0).contains(&kp.position.y));
        }
        assert_eq!(pose.keypoints[1].position.x, 400.0);
        assert_eq!(pose.keypoints[1].position.y, 100.0);
    }

    #[test]
    fn test_scores_untouched() {
        let mut pose = pose_with(&[(10.0, 10.0)]);
        rescale_pose(&mut pose, ScaleFactors::new(1000, 1000, 10));
        assert_eq!(pose.keypoints[0].score, 0.5);
        assert_eq!(pose.score, 0.5);
    }
}
