// SwingDetector - phase segmentation over an IMU sample window
//
// This module implements online segmentation of a motion window into the
// six swing phases and emits a raw detection result (is-swing, confidence,
// phase boundaries, computed metrics).
//
// Algorithm:
// 1. Sanitize the window (drop NaN/Inf samples) and keep the last
//    contiguous run after any large timestamp gap
// 2. Extract activity + oriented-rotation features once
// 3. Walk a phase state machine: Address → Backswing → Transition →
//    Downswing → Impact → FollowThrough
//    - Address: sustained stillness (low activity, low rotation)
//    - Backswing: slow rising rotation on the dominant axis
//    - Transition: rotation falls below a fraction of the backswing peak
//    - Downswing: activity crosses swing_threshold; impact is the
//      acceleration peak that follows
//    - FollowThrough: activity and rotation settle back down
// 4. A candidate is a swing only if all six boundaries occur in order,
//    the backswing angle and downswing speed clear the calibrated
//    thresholds, and total motion lasts at least min_swing_duration_ms.
//    The duration floor is what separates a swing from a car door or a
//    dropped bag: a mechanical impact has no sustained rotation phase.
//
// Confidence is a weighted sum of threshold headroom (capped at 1.0),
// phase-chain completeness, and signal-to-noise ratio. Noisy but
// phase-complete input degrades confidence; it never fails detection.

use serde::{Deserialize, Serialize};

use crate::analysis::features::{self, WindowFeatures};
use crate::analysis::sample::{self, MotionSample};
use crate::calibration::Calibration;
use crate::config::DetectionConfig;
use crate::error::DetectionError;

/// The six temporal segments of a genuine golf swing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwingPhase {
    Address,
    Backswing,
    Transition,
    Downswing,
    Impact,
    FollowThrough,
}

impl SwingPhase {
    /// All phases in temporal order
    pub const ORDERED: [SwingPhase; 6] = [
        SwingPhase::Address,
        SwingPhase::Backswing,
        SwingPhase::Transition,
        SwingPhase::Downswing,
        SwingPhase::Impact,
        SwingPhase::FollowThrough,
    ];
}

/// Sample indices marking each phase boundary within the analyzed window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseBoundaries {
    pub address: usize,
    pub backswing_start: usize,
    pub transition: usize,
    pub downswing_start: usize,
    pub impact: usize,
    pub follow_through_end: usize,
}

impl PhaseBoundaries {
    /// Boundary index for a phase, enabling exhaustive phase handling
    pub fn boundary(&self, phase: SwingPhase) -> usize {
        match phase {
            SwingPhase::Address => self.address,
            SwingPhase::Backswing => self.backswing_start,
            SwingPhase::Transition => self.transition,
            SwingPhase::Downswing => self.downswing_start,
            SwingPhase::Impact => self.impact,
            SwingPhase::FollowThrough => self.follow_through_end,
        }
    }

    /// True if every boundary strictly follows the previous one
    pub fn is_ordered(&self) -> bool {
        SwingPhase::ORDERED
            .windows(2)
            .all(|pair| self.boundary(pair[0]) < self.boundary(pair[1]))
    }
}

/// Metrics derived deterministically from phase boundaries + the window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingMetrics {
    /// Integrated hand speed over the downswing (m/s)
    pub max_speed: f32,
    /// Rotation accumulated on the dominant axis during the backswing (deg)
    pub backswing_angle_deg: f32,
    /// Peak gravity-free acceleration during the downswing (m/s²)
    pub downswing_speed: f32,
    /// Backswing duration / downswing duration
    pub swing_tempo_ratio: f32,
    /// Hand speed scaled by the club's lever gain (m/s)
    pub estimated_clubhead_speed: f32,
}

/// Raw detection output
///
/// `metrics` and `phases` are present iff `is_swing` is true; a rejected
/// window reports `confidence = 0.0` and carries no payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub is_swing: bool,
    /// 0.0-1.0, never NaN
    pub confidence: f32,
    pub metrics: Option<SwingMetrics>,
    pub phases: Option<PhaseBoundaries>,
}

impl DetectionResult {
    fn rejected() -> Self {
        Self {
            is_swing: false,
            confidence: 0.0,
            metrics: None,
            phases: None,
        }
    }
}

/// SwingDetector segments a sample window into swing phases
///
/// Stateless between calls: each invocation is a pure function of the
/// window, the calibration, and the configuration.
pub struct SwingDetector {
    config: DetectionConfig,
}

impl SwingDetector {
    pub fn new(config: DetectionConfig) -> Self {
        Self { config }
    }

    /// Detect a swing in a bounded sample window
    ///
    /// # Arguments
    /// * `window` - Time-ordered samples covering roughly 1-2 seconds
    /// * `calibration` - Calibrated per-user profile (required)
    ///
    /// # Returns
    /// * `Ok(DetectionResult)` - Detection outcome, including rejections
    /// * `Err(DetectionError)` - Missing or invalid calibration only
    pub fn detect(
        &self,
        window: &[MotionSample],
        calibration: &Calibration,
    ) -> Result<DetectionResult, DetectionError> {
        if !calibration.is_calibrated {
            return Err(DetectionError::NotCalibrated);
        }
        calibration.validate()?;

        let clean = sample::sanitize_window(window);
        let run = sample::last_contiguous_run(&clean, self.config.max_gap_ms);
        if run.len() < self.config.min_valid_samples {
            tracing::debug!(
                "[Detector] Too few valid samples: {} < {}",
                run.len(),
                self.config.min_valid_samples
            );
            return Ok(DetectionResult::rejected());
        }

        let feats = features::extract(run, calibration);

        let bounds = match self.segment(run, &feats, calibration) {
            Some(bounds) => bounds,
            None => return Ok(DetectionResult::rejected()),
        };

        // Total motion span, backswing start through settle. A sharp
        // single-axis spike never sustains rotation long enough to get
        // here, but a fast compact swing can still fall under the floor.
        let motion_ms = run[bounds.follow_through_end]
            .timestamp_ms
            .saturating_sub(run[bounds.backswing_start].timestamp_ms);
        if motion_ms < self.config.min_swing_duration_ms {
            tracing::debug!(
                "[Detector] Motion span {}ms below minimum swing duration, rejecting as mechanical impact",
                motion_ms
            );
            return Ok(DetectionResult::rejected());
        }

        let metrics = self.derive_metrics(run, &feats, &bounds, calibration);

        if metrics.backswing_angle_deg < calibration.thresholds.min_backswing_angle_deg {
            tracing::debug!(
                "[Detector] Backswing angle {:.1}° below calibrated minimum {:.1}°",
                metrics.backswing_angle_deg,
                calibration.thresholds.min_backswing_angle_deg
            );
            return Ok(DetectionResult::rejected());
        }
        if metrics.downswing_speed < calibration.thresholds.min_downswing_speed {
            tracing::debug!(
                "[Detector] Downswing speed {:.1} below calibrated minimum {:.1}",
                metrics.downswing_speed,
                calibration.thresholds.min_downswing_speed
            );
            return Ok(DetectionResult::rejected());
        }

        let confidence = self.confidence(&metrics, &feats, calibration);
        tracing::debug!(
            "[Detector] Swing detected: angle {:.1}°, downswing {:.1} m/s², tempo {:.2}, confidence {:.2}",
            metrics.backswing_angle_deg,
            metrics.downswing_speed,
            metrics.swing_tempo_ratio,
            confidence
        );

        Ok(DetectionResult {
            is_swing: true,
            confidence,
            metrics: Some(metrics),
            phases: Some(bounds),
        })
    }

    /// Walk the phase state machine over the feature series
    ///
    /// Returns None if any phase is missing or out of order - an
    /// incomplete chain is a normal rejection, not an error.
    fn segment(
        &self,
        run: &[MotionSample],
        feats: &WindowFeatures,
        calibration: &Calibration,
    ) -> Option<PhaseBoundaries> {
        let cfg = &self.config;
        let n = run.len();

        let mut address = None;
        let mut backswing_start: Option<usize> = None;
        let mut transition = None;
        let mut quiet_run = 0usize;
        let mut peak_rate = 0.0f32;
        let mut backswing_samples = 0usize;

        for i in 0..n {
            let rate = feats.oriented_rate[i];
            match backswing_start {
                None => {
                    let quiet = feats.activity[i] < cfg.address_activity_ceiling
                        && rate.abs() < cfg.address_rotation_floor_dps;
                    if quiet {
                        quiet_run += 1;
                        if quiet_run >= cfg.address_min_samples && address.is_none() {
                            address = Some(i + 1 - cfg.address_min_samples);
                        }
                    } else {
                        quiet_run = 0;
                    }
                    // A backswing only starts from an established address
                    if address.is_some() && rate >= cfg.backswing_rotation_floor_dps {
                        backswing_start = Some(i);
                        peak_rate = rate;
                        backswing_samples = 1;
                    }
                }
                Some(_) => {
                    if rate > peak_rate {
                        peak_rate = rate;
                    }
                    backswing_samples += 1;
                    if rate < cfg.transition_drop_ratio * peak_rate {
                        if backswing_samples >= cfg.min_backswing_samples {
                            transition = Some(i);
                            break;
                        } else if rate.abs() < cfg.address_rotation_floor_dps {
                            // Brief rotation spike, not a sustained backswing
                            tracing::debug!(
                                "[Detector] Rotation spike of {} samples collapsed, resetting segmentation",
                                backswing_samples
                            );
                            backswing_start = None;
                            peak_rate = 0.0;
                            backswing_samples = 0;
                            quiet_run = 0;
                        }
                    }
                }
            }
        }

        let address = address?;
        let backswing_start = backswing_start?;
        let transition = transition?;

        // Downswing: first sample after transition where activity crosses
        // the calibrated swing threshold
        let downswing_start = (transition..n)
            .find(|&i| feats.activity[i] > calibration.swing_threshold)?;

        // Impact: acceleration peak after the downswing begins
        let impact = (downswing_start + 1..n)
            .max_by(|&a, &b| {
                feats.accel_magnitude[a]
                    .partial_cmp(&feats.accel_magnitude[b])
                    .unwrap_or(std::cmp::Ordering::Equal)
            })?;

        // Follow-through: motion settles back below the swing envelope
        let settle_activity = calibration.swing_threshold * cfg.follow_settle_ratio;
        let follow_through_end = (impact + 1..n).find(|&i| {
            feats.activity[i] < settle_activity
                && feats.oriented_rate[i].abs() < cfg.backswing_rotation_floor_dps
        })?;

        let bounds = PhaseBoundaries {
            address,
            backswing_start,
            transition,
            downswing_start,
            impact,
            follow_through_end,
        };
        if !bounds.is_ordered() {
            tracing::debug!("[Detector] Phase boundaries out of order: {:?}", bounds);
            return None;
        }
        Some(bounds)
    }

    /// Derive swing metrics from phase boundaries
    fn derive_metrics(
        &self,
        run: &[MotionSample],
        feats: &WindowFeatures,
        bounds: &PhaseBoundaries,
        calibration: &Calibration,
    ) -> SwingMetrics {
        let backswing_ms = run[bounds.transition]
            .timestamp_ms
            .saturating_sub(run[bounds.backswing_start].timestamp_ms);
        let downswing_ms = run[bounds.impact]
            .timestamp_ms
            .saturating_sub(run[bounds.downswing_start].timestamp_ms);

        // Rectangle-rule integral of the oriented rotation rate
        let mut backswing_angle_deg = 0.0f32;
        for i in bounds.backswing_start..bounds.transition {
            let dt_s = run[i + 1].timestamp_ms.saturating_sub(run[i].timestamp_ms) as f32 / 1000.0;
            backswing_angle_deg += feats.oriented_rate[i].abs() * dt_s;
        }

        let downswing_speed = feats.activity[bounds.downswing_start..=bounds.impact]
            .iter()
            .copied()
            .fold(0.0f32, f32::max);

        // Hand speed from integrated downswing acceleration
        let mut max_speed = 0.0f32;
        for i in bounds.downswing_start..bounds.impact {
            let dt_s = run[i + 1].timestamp_ms.saturating_sub(run[i].timestamp_ms) as f32 / 1000.0;
            max_speed += feats.activity[i] * dt_s;
        }

        let swing_tempo_ratio = if downswing_ms > 0 {
            backswing_ms as f32 / downswing_ms as f32
        } else {
            0.0
        };

        SwingMetrics {
            max_speed,
            backswing_angle_deg,
            downswing_speed,
            swing_tempo_ratio,
            estimated_clubhead_speed: max_speed * calibration.club_type.lever_gain(),
        }
    }

    /// Weighted confidence: threshold headroom, completeness, SNR
    fn confidence(
        &self,
        metrics: &SwingMetrics,
        feats: &WindowFeatures,
        calibration: &Calibration,
    ) -> f32 {
        let cfg = &self.config;
        let t = &calibration.thresholds;

        let headroom = |measured: f32, threshold: f32| -> f32 {
            if threshold <= f32::EPSILON {
                return 1.0;
            }
            ((measured - threshold) / threshold).clamp(0.0, 1.0)
        };
        let headroom_avg = (headroom(metrics.backswing_angle_deg, t.min_backswing_angle_deg)
            + headroom(metrics.downswing_speed, t.min_downswing_speed)
            + headroom(metrics.downswing_speed, calibration.swing_threshold))
            / 3.0;

        // All six boundaries are present by the time confidence is
        // computed; the term keeps the formula honest if partial chains
        // ever become reportable.
        let completeness = 1.0;

        let snr_norm = (feats.snr / cfg.snr_target).clamp(0.0, 1.0);

        let confidence = cfg.headroom_weight * headroom_avg
            + cfg.completeness_weight * completeness
            + cfg.snr_weight * snr_norm;
        confidence.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "detector_tests.rs"]
mod tests;
