// Window feature extraction for phase segmentation
//
// Derives the per-sample series the detector's state machine runs over:
// gravity-free activity (acceleration magnitude minus the calibrated noise
// floor), the dominant rotation axis, and the oriented rotation rate on
// that axis. Orientation folds in handedness so a backswing always reads
// as positive rotation.
//
// Extraction happens exactly once per window; every downstream stage
// consumes the same features.

use crate::analysis::sample::MotionSample;
use crate::calibration::Calibration;

/// Derived per-window series and scalars
#[derive(Debug, Clone)]
pub struct WindowFeatures {
    /// Acceleration magnitude minus baseline noise, floored at zero (m/s²)
    pub activity: Vec<f32>,
    /// Raw acceleration magnitude (m/s²)
    pub accel_magnitude: Vec<f32>,
    /// Dominant-axis angular rate times handedness orientation (deg/s)
    pub oriented_rate: Vec<f32>,
    /// Axis index (0 = x, 1 = y, 2 = z) carrying the most rotation
    pub dominant_axis: usize,
    /// Peak acceleration magnitude over the window (m/s²)
    pub peak_accel: f32,
    /// Peak acceleration over baseline noise; saturates high for clean signals
    pub snr: f32,
}

/// Extract detector features from a sanitized window
///
/// # Arguments
/// * `window` - Sanitized, time-ordered samples
/// * `calibration` - Profile supplying baseline noise and handedness
pub fn extract(window: &[MotionSample], calibration: &Calibration) -> WindowFeatures {
    let accel_magnitude: Vec<f32> = window
        .iter()
        .map(|s| s.acceleration.magnitude())
        .collect();

    let activity: Vec<f32> = accel_magnitude
        .iter()
        .map(|m| (m - calibration.baseline_noise).max(0.0))
        .collect();

    let dominant_axis = dominant_rotation_axis(window);
    let orientation = calibration.handedness.orientation();
    let oriented_rate: Vec<f32> = window
        .iter()
        .map(|s| s.angular_rate.axis(dominant_axis) * orientation)
        .collect();

    let peak_accel = accel_magnitude.iter().copied().fold(0.0f32, f32::max);
    let snr = if calibration.baseline_noise > f32::EPSILON {
        peak_accel / calibration.baseline_noise
    } else {
        peak_accel / f32::EPSILON
    };

    WindowFeatures {
        activity,
        accel_magnitude,
        oriented_rate,
        dominant_axis,
        peak_accel,
        snr,
    }
}

/// Axis with the largest accumulated absolute angular rate
fn dominant_rotation_axis(window: &[MotionSample]) -> usize {
    let mut sums = [0.0f32; 3];
    for s in window {
        sums[0] += s.angular_rate.x.abs();
        sums[1] += s.angular_rate.y.abs();
        sums[2] += s.angular_rate.z.abs();
    }
    let mut best = 0;
    for axis in 1..3 {
        if sums[axis] > sums[best] {
            best = axis;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::sample::Vec3;
    use crate::calibration::{ClubType, Handedness, PersonalThresholds};

    fn calibration(handedness: Handedness) -> Calibration {
        Calibration::for_user(
            "user-1",
            ClubType::Iron,
            handedness,
            0.5,
            2.5,
            PersonalThresholds::default(),
        )
        .unwrap()
    }

    fn sample(accel: Vec3, rate: Vec3, ts: u64) -> MotionSample {
        MotionSample::new(accel, rate, ts)
    }

    #[test]
    fn test_activity_floors_at_zero() {
        let window = vec![
            sample(Vec3::new(0.1, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.0), 0),
            sample(Vec3::new(3.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 0.0), 20),
        ];
        let features = extract(&window, &calibration(Handedness::Right));
        assert_eq!(features.activity[0], 0.0);
        assert!((features.activity[1] - 2.5).abs() < 1e-6);
    }

    #[test]
    fn test_dominant_axis_selection() {
        let window = vec![
            sample(Vec3::new(0.0, 0.0, 0.0), Vec3::new(5.0, 90.0, 1.0), 0),
            sample(Vec3::new(0.0, 0.0, 0.0), Vec3::new(3.0, 120.0, 2.0), 20),
        ];
        let features = extract(&window, &calibration(Handedness::Right));
        assert_eq!(features.dominant_axis, 1);
        assert_eq!(features.oriented_rate, vec![90.0, 120.0]);
    }

    #[test]
    fn test_left_handed_orientation_flips_rate() {
        let window = vec![sample(
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(0.0, -80.0, 0.0),
            0,
        )];
        let features = extract(&window, &calibration(Handedness::Left));
        assert_eq!(features.oriented_rate, vec![80.0]);
    }

    #[test]
    fn test_snr_uses_peak_over_baseline() {
        let window = vec![sample(
            Vec3::new(12.0, 0.0, 0.0),
            Vec3::new(0.0, 0.0, 0.0),
            0,
        )];
        let features = extract(&window, &calibration(Handedness::Right));
        assert!((features.snr - 24.0).abs() < 1e-3);
    }
}
