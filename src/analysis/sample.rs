// Motion sample types - raw IMU input for the detection pipeline
//
// A MotionSample is one timestamped reading of 3-axis acceleration
// (gravity-compensated, device frame) and 3-axis angular rate. Windows of
// samples are handed to the detector as owned, immutable slices; nothing in
// the pipeline mutates a sample after creation.
//
// Malformed samples (NaN/Inf in any component) are dropped during
// sanitation rather than aborting detection. Timestamp gaps larger than one
// detection window reset segmentation: only the last contiguous run of the
// window is analyzed.

use serde::{Deserialize, Serialize};

/// 3-axis vector in the device frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Euclidean magnitude
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Component by axis index (0 = x, 1 = y, 2 = z)
    pub fn axis(&self, axis: usize) -> f32 {
        match axis {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }

    fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// One timestamped IMU reading
///
/// Acceleration is linear (gravity-removed) in m/s²; angular rate is in
/// deg/s. Timestamps are milliseconds, monotonically non-decreasing within
/// a window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSample {
    pub acceleration: Vec3,
    pub angular_rate: Vec3,
    pub timestamp_ms: u64,
}

impl MotionSample {
    pub fn new(acceleration: Vec3, angular_rate: Vec3, timestamp_ms: u64) -> Self {
        Self {
            acceleration,
            angular_rate,
            timestamp_ms,
        }
    }

    /// True if every component of both vectors is finite
    pub fn is_valid(&self) -> bool {
        self.acceleration.is_finite() && self.angular_rate.is_finite()
    }
}

/// Drop malformed samples from a window
///
/// Samples containing NaN or Inf in any component are removed. Order is
/// preserved; the input is never mutated.
pub fn sanitize_window(window: &[MotionSample]) -> Vec<MotionSample> {
    let sanitized: Vec<MotionSample> = window.iter().copied().filter(|s| s.is_valid()).collect();
    let dropped = window.len() - sanitized.len();
    if dropped > 0 {
        tracing::debug!("[Sample] Dropped {} malformed samples from window", dropped);
    }
    sanitized
}

/// Return the last contiguous run of a window
///
/// A gap between consecutive timestamps larger than `max_gap_ms` resets
/// segmentation; everything before the final gap is discarded.
///
/// # Arguments
/// * `window` - Sanitized, time-ordered samples
/// * `max_gap_ms` - Largest tolerated gap between consecutive samples
pub fn last_contiguous_run(window: &[MotionSample], max_gap_ms: u64) -> &[MotionSample] {
    let mut start = 0;
    for i in 1..window.len() {
        let gap = window[i]
            .timestamp_ms
            .saturating_sub(window[i - 1].timestamp_ms);
        if gap > max_gap_ms {
            start = i;
        }
    }
    if start > 0 {
        tracing::debug!(
            "[Sample] Timestamp gap reset segmentation, keeping {} of {} samples",
            window.len() - start,
            window.len()
        );
    }
    &window[start..]
}

/// Duration of a window in milliseconds (0 for fewer than two samples)
pub fn window_duration_ms(window: &[MotionSample]) -> u64 {
    match (window.first(), window.last()) {
        (Some(first), Some(last)) => last.timestamp_ms.saturating_sub(first.timestamp_ms),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(ts: u64) -> MotionSample {
        MotionSample::new(Vec3::new(0.1, 0.0, 0.2), Vec3::new(1.0, 2.0, 0.5), ts)
    }

    #[test]
    fn test_magnitude() {
        let v = Vec3::new(3.0, 4.0, 0.0);
        assert_eq!(v.magnitude(), 5.0);
    }

    #[test]
    fn test_sanitize_drops_nan_and_inf() {
        let mut bad_accel = sample(20);
        bad_accel.acceleration.y = f32::NAN;
        let mut bad_gyro = sample(40);
        bad_gyro.angular_rate.z = f32::INFINITY;

        let window = vec![sample(0), bad_accel, bad_gyro, sample(60)];
        let clean = sanitize_window(&window);

        assert_eq!(clean.len(), 2);
        assert_eq!(clean[0].timestamp_ms, 0);
        assert_eq!(clean[1].timestamp_ms, 60);
    }

    #[test]
    fn test_sanitize_keeps_valid_window_intact() {
        let window = vec![sample(0), sample(20), sample(40)];
        let clean = sanitize_window(&window);
        assert_eq!(clean, window);
    }

    #[test]
    fn test_last_contiguous_run_resets_on_gap() {
        let window = vec![sample(0), sample(20), sample(5000), sample(5020)];
        let run = last_contiguous_run(&window, 2000);
        assert_eq!(run.len(), 2);
        assert_eq!(run[0].timestamp_ms, 5000);
    }

    #[test]
    fn test_last_contiguous_run_no_gap() {
        let window = vec![sample(0), sample(20), sample(40)];
        let run = last_contiguous_run(&window, 2000);
        assert_eq!(run.len(), 3);
    }

    #[test]
    fn test_window_duration() {
        let window = vec![sample(100), sample(120), sample(1600)];
        assert_eq!(window_duration_ms(&window), 1500);
        assert_eq!(window_duration_ms(&[]), 0);
    }
}
