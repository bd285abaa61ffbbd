// Calibration - per-user thresholds for swing detection
//
// This module stores the per-user calibration profile read by every stage
// of the detection pipeline. Profiles are created or updated only through
// an explicit calibration step owned by the host application; during a
// detection session the pipeline treats them as read-only.
//
// A profile must exist and be calibrated before any detection call. An
// uncalibrated placeholder is rejected with NotCalibrated, never silently
// replaced by defaults.

use serde::{Deserialize, Serialize};

use crate::error::CalibrationError;

/// Which side the player swings from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Handedness {
    Left,
    Right,
}

impl Handedness {
    /// Sign applied to the dominant rotation axis so a backswing always
    /// reads as positive rotation regardless of side.
    pub fn orientation(&self) -> f32 {
        match self {
            Handedness::Right => 1.0,
            Handedness::Left => -1.0,
        }
    }
}

/// Club categories with distinct swing signatures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClubType {
    Driver,
    Iron,
    Wedge,
    Putter,
}

impl ClubType {
    /// All club types, in reference-pattern order
    pub const ALL: [ClubType; 4] = [
        ClubType::Driver,
        ClubType::Iron,
        ClubType::Wedge,
        ClubType::Putter,
    ];

    /// Lever gain mapping integrated hand speed to estimated clubhead
    /// speed. Longer clubs swing a faster head for the same hand speed.
    pub fn lever_gain(&self) -> f32 {
        match self {
            ClubType::Driver => 20.0,
            ClubType::Iron => 17.0,
            ClubType::Wedge => 14.0,
            ClubType::Putter => 2.5,
        }
    }
}

/// Personalized detection thresholds
///
/// Adapted to skill level by the calibration flow: a beginner's profile
/// carries a lower backswing-angle floor than a scratch golfer's.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PersonalThresholds {
    /// Minimum accepted backswing rotation (degrees)
    pub min_backswing_angle_deg: f32,
    /// Minimum peak downswing acceleration (m/s², gravity-free)
    pub min_downswing_speed: f32,
    /// Expected backswing/downswing duration ratio
    pub expected_tempo_ratio: f32,
}

impl Default for PersonalThresholds {
    fn default() -> Self {
        Self {
            min_backswing_angle_deg: 60.0,
            min_downswing_speed: 8.0,
            expected_tempo_ratio: 3.0,
        }
    }
}

/// Per-user calibration profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Calibration {
    /// Owning user id (host-assigned)
    pub user_id: String,
    /// Resting acceleration noise floor (m/s², gravity-free)
    pub baseline_noise: f32,
    /// Activity threshold separating swing motion from handling (m/s²)
    pub swing_threshold: f32,
    pub handedness: Handedness,
    /// Club the player is calibrated for; used as the matcher hint
    pub club_type: ClubType,
    pub thresholds: PersonalThresholds,
    /// Whether an explicit calibration step produced this profile
    #[serde(default)]
    pub is_calibrated: bool,
}

impl Calibration {
    /// Create a calibrated profile with explicit thresholds
    ///
    /// # Arguments
    /// * `user_id` - Host-assigned user id (must be non-empty)
    /// * `club_type` - Club the user calibrated with
    /// * `handedness` - Swing side
    /// * `baseline_noise` - Resting noise floor in m/s²
    /// * `swing_threshold` - Activity threshold in m/s²
    /// * `thresholds` - Personalized phase thresholds
    ///
    /// # Returns
    /// * `Ok(Calibration)` - Validated, calibrated profile
    /// * `Err(CalibrationError)` - A threshold is out of range
    pub fn for_user(
        user_id: impl Into<String>,
        club_type: ClubType,
        handedness: Handedness,
        baseline_noise: f32,
        swing_threshold: f32,
        thresholds: PersonalThresholds,
    ) -> Result<Self, CalibrationError> {
        let calibration = Self {
            user_id: user_id.into(),
            baseline_noise,
            swing_threshold,
            handedness,
            club_type,
            thresholds,
            is_calibrated: true,
        };
        calibration.validate()?;
        Ok(calibration)
    }

    /// Create an uncalibrated placeholder for a user
    ///
    /// Every pipeline entry point rejects this profile with
    /// `DetectionError::NotCalibrated` until the host runs calibration.
    pub fn uncalibrated(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            baseline_noise: 0.0,
            swing_threshold: 0.0,
            handedness: Handedness::Right,
            club_type: ClubType::Iron,
            thresholds: PersonalThresholds::default(),
            is_calibrated: false,
        }
    }

    /// Validate threshold ranges
    ///
    /// # Returns
    /// * `Ok(())` - All thresholds plausible
    /// * `Err(CalibrationError)` - First violated range
    pub fn validate(&self) -> Result<(), CalibrationError> {
        if self.user_id.is_empty() {
            return Err(CalibrationError::MissingUserId);
        }
        if !self.baseline_noise.is_finite() || self.baseline_noise < 0.0 {
            return Err(CalibrationError::InvalidThreshold {
                field: "baseline_noise",
                value: self.baseline_noise,
            });
        }
        if !self.swing_threshold.is_finite() || self.swing_threshold <= 0.0 {
            return Err(CalibrationError::InvalidThreshold {
                field: "swing_threshold",
                value: self.swing_threshold,
            });
        }
        let t = &self.thresholds;
        if !t.min_backswing_angle_deg.is_finite() || t.min_backswing_angle_deg <= 0.0 {
            return Err(CalibrationError::InvalidThreshold {
                field: "min_backswing_angle_deg",
                value: t.min_backswing_angle_deg,
            });
        }
        if !t.min_downswing_speed.is_finite() || t.min_downswing_speed <= 0.0 {
            return Err(CalibrationError::InvalidThreshold {
                field: "min_downswing_speed",
                value: t.min_downswing_speed,
            });
        }
        if !t.expected_tempo_ratio.is_finite()
            || t.expected_tempo_ratio < 1.0
            || t.expected_tempo_ratio > 6.0
        {
            return Err(CalibrationError::InvalidTempoRatio {
                value: t.expected_tempo_ratio,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_calibration() -> Calibration {
        Calibration::for_user(
            "user-1",
            ClubType::Iron,
            Handedness::Right,
            0.5,
            2.5,
            PersonalThresholds::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_for_user_valid() {
        let cal = valid_calibration();
        assert!(cal.is_calibrated);
        assert_eq!(cal.club_type, ClubType::Iron);
        assert_eq!(cal.thresholds.min_downswing_speed, 8.0);
    }

    #[test]
    fn test_uncalibrated_placeholder() {
        let cal = Calibration::uncalibrated("user-2");
        assert!(!cal.is_calibrated);
    }

    #[test]
    fn test_validate_rejects_zero_swing_threshold() {
        let mut cal = valid_calibration();
        cal.swing_threshold = 0.0;
        match cal.validate().unwrap_err() {
            CalibrationError::InvalidThreshold { field, .. } => {
                assert_eq!(field, "swing_threshold");
            }
            e => panic!("Expected InvalidThreshold error, got: {:?}", e),
        }
    }

    #[test]
    fn test_validate_rejects_negative_baseline() {
        let mut cal = valid_calibration();
        cal.baseline_noise = -0.1;
        assert!(cal.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_implausible_tempo() {
        let mut cal = valid_calibration();
        cal.thresholds.expected_tempo_ratio = 9.0;
        match cal.validate().unwrap_err() {
            CalibrationError::InvalidTempoRatio { value } => assert_eq!(value, 9.0),
            e => panic!("Expected InvalidTempoRatio error, got: {:?}", e),
        }
    }

    #[test]
    fn test_validate_rejects_empty_user() {
        let mut cal = valid_calibration();
        cal.user_id = String::new();
        assert_eq!(cal.validate().unwrap_err(), CalibrationError::MissingUserId);
    }

    #[test]
    fn test_handedness_orientation() {
        assert_eq!(Handedness::Right.orientation(), 1.0);
        assert_eq!(Handedness::Left.orientation(), -1.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let cal = valid_calibration();
        let json = serde_json::to_string(&cal).unwrap();
        let parsed: Calibration = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cal);
    }

    #[test]
    fn test_deserialization_without_calibrated_flag_defaults_false() {
        // Legacy profiles predate the is_calibrated flag
        let json = r#"{
            "user_id": "legacy",
            "baseline_noise": 0.4,
            "swing_threshold": 2.0,
            "handedness": "right",
            "club_type": "driver",
            "thresholds": {
                "min_backswing_angle_deg": 70.0,
                "min_downswing_speed": 9.0,
                "expected_tempo_ratio": 3.0
            }
        }"#;
        let cal: Calibration = serde_json::from_str(json).unwrap();
        assert!(!cal.is_calibrated);
    }
}
