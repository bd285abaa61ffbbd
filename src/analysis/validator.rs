// ContextValidator - second-pass rejection of look-alike motions
//
// Applies environmental and behavioral context to a pattern-matched
// detection: recent walking or driving, device stability, and course
// conditions. The validator is a pure function - the same (detection,
// context) pair always yields the same result, with no hidden state or
// timers.
//
// Decision rules, applied in order:
// 1. Walking recently with too little settle time -> reject "likely-gait-motion"
// 2. Driving detected -> reject "likely-vehicle-impact" regardless of
//    detector confidence (vehicle transients must never become swings)
// 3. Sensor variance above the stability ceiling discounts confidence
//    multiplicatively; it does not reject on its own
// 4. Accept if the discounted confidence clears the acceptance floor
//
// is_round_active is informational context for downstream consumers, not a
// gating rule: practice swings are rejected structurally by the detector's
// incomplete-phase handling, not by round state.

use serde::{Deserialize, Serialize};

use crate::analysis::detector::DetectionResult;
use crate::config::ValidationConfig;

/// Rejection reason: periodic gait motion shortly after walking
pub const REASON_GAIT: &str = "likely-gait-motion";
/// Rejection reason: sharp transient while driving
pub const REASON_VEHICLE: &str = "likely-vehicle-impact";
/// Rejection reason: discounted confidence under the acceptance floor
pub const REASON_BELOW_FLOOR: &str = "below-confidence-floor";
/// Rejection reason: the detector did not flag a swing at all
pub const REASON_NO_SWING: &str = "no-swing-detected";

/// Recent user activity as classified by the host's motion tracker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecentActivity {
    pub walking_detected: bool,
    pub driving_detected: bool,
    /// Seconds of stillness since the last walking/driving activity
    pub static_period_seconds: f32,
    /// Mean acceleration magnitude over the recent activity window (m/s²)
    pub average_motion_magnitude: f32,
}

/// Sensor health snapshot for the detection window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DeviceStability {
    /// Accelerometer variance over the window ((m/s²)²)
    pub accel_variance: f32,
    /// Gyroscope variance over the window ((deg/s)²)
    pub gyro_variance: f32,
    pub temperature_drift_c: f32,
    /// Transport-level signal quality, 0-100
    pub signal_quality: u8,
}

/// Where the swing happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    Course,
    Range,
    Indoor,
}

/// Playing conditions around the swing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Ordinal wind level, 0 (calm) to 10 (gale)
    pub wind_level: u8,
    /// Footing quality, 0-100
    pub ground_stability: u8,
    pub course_type: CourseType,
}

/// Ambient context supplied fresh for each validation call
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ValidationContext {
    /// Informational for downstream consumers; never gates validation
    pub is_round_active: bool,
    pub time_of_day_hour: u8,
    pub recent_activity: RecentActivity,
    pub device_stability: DeviceStability,
    pub environment: Environment,
}

impl ValidationContext {
    /// A benign on-course context: still, stable sensors, calm conditions
    pub fn neutral() -> Self {
        Self {
            is_round_active: true,
            time_of_day_hour: 10,
            recent_activity: RecentActivity {
                walking_detected: false,
                driving_detected: false,
                static_period_seconds: 120.0,
                average_motion_magnitude: 0.2,
            },
            device_stability: DeviceStability {
                accel_variance: 0.5,
                gyro_variance: 20.0,
                temperature_drift_c: 0.5,
                signal_quality: 95,
            },
            environment: Environment {
                wind_level: 0,
                ground_stability: 100,
                course_type: CourseType::Course,
            },
        }
    }
}

/// Final accept/reject decision with adjusted confidence
///
/// Every rejected result carries at least one reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub is_valid: bool,
    /// 0.0-1.0, never NaN
    pub adjusted_confidence: f32,
    pub rejection_reasons: Vec<String>,
}

/// ContextValidator applies behavioral gates and confidence discounts
pub struct ContextValidator {
    config: ValidationConfig,
}

impl ContextValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validate a detection against ambient context
    ///
    /// # Arguments
    /// * `detection` - Detector output, confidence already pattern-adjusted
    /// * `context` - Fresh context snapshot for this call
    pub fn validate(
        &self,
        detection: &DetectionResult,
        context: &ValidationContext,
    ) -> ValidationResult {
        if !detection.is_swing {
            return ValidationResult {
                is_valid: false,
                adjusted_confidence: 0.0,
                rejection_reasons: vec![REASON_NO_SWING.to_string()],
            };
        }

        let cfg = &self.config;
        let mut rejection_reasons = Vec::new();

        let activity = &context.recent_activity;
        if activity.walking_detected && activity.static_period_seconds < cfg.min_settle_seconds {
            rejection_reasons.push(REASON_GAIT.to_string());
        }
        if activity.driving_detected {
            rejection_reasons.push(REASON_VEHICLE.to_string());
        }
        if !rejection_reasons.is_empty() {
            tracing::debug!("[Validator] Context rejection: {:?}", rejection_reasons);
            return ValidationResult {
                is_valid: false,
                adjusted_confidence: 0.0,
                rejection_reasons,
            };
        }

        let stability = self.stability_penalty(&context.device_stability);
        let environment = self.environment_penalty(&context.environment);
        let adjusted_confidence = (detection.confidence * stability * environment).clamp(0.0, 1.0);

        let is_valid = adjusted_confidence >= cfg.acceptance_floor;
        if !is_valid {
            rejection_reasons.push(REASON_BELOW_FLOOR.to_string());
        }
        tracing::debug!(
            "[Validator] adjusted {:.3} (stability {:.3}, environment {:.3}) -> valid={}",
            adjusted_confidence,
            stability,
            environment,
            is_valid
        );

        ValidationResult {
            is_valid,
            adjusted_confidence,
            rejection_reasons,
        }
    }

    /// Multiplicative discount for noisy sensors
    ///
    /// Monotone non-increasing in both variances: excess variance over the
    /// ceiling shrinks the factor, it never rejects outright.
    fn stability_penalty(&self, stability: &DeviceStability) -> f32 {
        let cfg = &self.config;
        let factor = |variance: f32, ceiling: f32| -> f32 {
            let excess_ratio = (variance / ceiling - 1.0).max(0.0);
            1.0 / (1.0 + cfg.variance_penalty_slope * excess_ratio)
        };
        factor(stability.accel_variance, cfg.accel_variance_ceiling)
            * factor(stability.gyro_variance, cfg.gyro_variance_ceiling)
    }

    /// Discount for conditions that degrade the backswing-angle measurement
    ///
    /// High wind and poor footing reduce trust in the rotation integral,
    /// not in downswing speed; both map to a soft confidence discount.
    fn environment_penalty(&self, environment: &Environment) -> f32 {
        let cfg = &self.config;
        let wind_factor = if environment.course_type == CourseType::Indoor {
            1.0
        } else {
            let excess = environment.wind_level.saturating_sub(cfg.wind_calm_level) as f32;
            (1.0 - cfg.wind_penalty_per_level * excess).max(cfg.wind_penalty_floor)
        };
        let ground = (environment.ground_stability.min(100)) as f32 / 100.0;
        let ground_factor = cfg.ground_penalty_floor + (1.0 - cfg.ground_penalty_floor) * ground;
        wind_factor * ground_factor
    }
}
