// Detector tests - synthetic windows through the phase state machine

use super::*;
use crate::calibration::{ClubType, Handedness, PersonalThresholds};
use crate::testing::fixtures::{
    door_slam_window, full_swing_window, gait_window, truncated_swing_window, SwingProfile,
};

fn iron_calibration() -> Calibration {
    Calibration::for_user(
        "user-1",
        ClubType::Iron,
        Handedness::Right,
        0.5,
        2.5,
        PersonalThresholds {
            min_backswing_angle_deg: 60.0,
            min_downswing_speed: 8.0,
            expected_tempo_ratio: 3.0,
        },
    )
    .unwrap()
}

fn detector() -> SwingDetector {
    SwingDetector::new(DetectionConfig::default())
}

#[test]
fn test_full_swing_is_detected_with_high_confidence() {
    let window = full_swing_window(&SwingProfile::iron(), 42);
    let result = detector().detect(&window, &iron_calibration()).unwrap();

    assert!(result.is_swing, "Synthetic full swing should be detected");
    assert!(
        result.confidence > 0.7,
        "Confidence {} should exceed 0.7 for a clear-margin swing",
        result.confidence
    );
    assert!(result.metrics.is_some());
    assert!(result.phases.is_some());
}

#[test]
fn test_detected_phases_are_ordered() {
    let window = full_swing_window(&SwingProfile::iron(), 42);
    let result = detector().detect(&window, &iron_calibration()).unwrap();

    let phases = result.phases.expect("swing should carry phases");
    assert!(phases.is_ordered(), "Boundaries out of order: {:?}", phases);
}

#[test]
fn test_metrics_reflect_profile() {
    let window = full_swing_window(&SwingProfile::iron(), 42);
    let result = detector().detect(&window, &iron_calibration()).unwrap();

    let metrics = result.metrics.expect("swing should carry metrics");
    assert!(
        metrics.backswing_angle_deg >= 60.0,
        "Backswing angle {} below calibrated floor",
        metrics.backswing_angle_deg
    );
    assert!(
        metrics.downswing_speed >= 8.0,
        "Downswing speed {} below calibrated floor",
        metrics.downswing_speed
    );
    assert!(
        metrics.swing_tempo_ratio > 2.0 && metrics.swing_tempo_ratio < 4.0,
        "Tempo ratio {} outside plausible band",
        metrics.swing_tempo_ratio
    );
    assert!(metrics.estimated_clubhead_speed > metrics.max_speed);
}

#[test]
fn test_stronger_swing_scores_higher_confidence() {
    let cal = iron_calibration();
    let iron = detector()
        .detect(&full_swing_window(&SwingProfile::iron(), 42), &cal)
        .unwrap();
    let driver = detector()
        .detect(&full_swing_window(&SwingProfile::driver(), 42), &cal)
        .unwrap();

    assert!(driver.is_swing);
    assert!(
        driver.confidence > iron.confidence,
        "Wider threshold margins should raise confidence ({} vs {})",
        driver.confidence,
        iron.confidence
    );
}

#[test]
fn test_gait_is_rejected() {
    let window = gait_window(5);
    let result = detector().detect(&window, &iron_calibration()).unwrap();

    assert!(!result.is_swing, "Periodic gait must not read as a swing");
    assert_eq!(result.confidence, 0.0);
    assert!(result.metrics.is_none());
    assert!(result.phases.is_none());
}

#[test]
fn test_door_slam_is_rejected() {
    let window = door_slam_window(9);
    let result = detector().detect(&window, &iron_calibration()).unwrap();

    assert!(
        !result.is_swing,
        "A short single-axis spike must not read as a swing"
    );
}

#[test]
fn test_truncated_swing_is_rejected() {
    let window = truncated_swing_window(&SwingProfile::iron(), 42);
    let result = detector().detect(&window, &iron_calibration()).unwrap();

    assert!(
        !result.is_swing,
        "A window cut before follow-through is incomplete"
    );
}

#[test]
fn test_uncalibrated_profile_is_a_hard_error() {
    let window = full_swing_window(&SwingProfile::iron(), 42);
    let result = detector().detect(&window, &Calibration::uncalibrated("user-2"));

    assert_eq!(result.unwrap_err(), DetectionError::NotCalibrated);
}

#[test]
fn test_invalid_calibration_is_a_hard_error() {
    let mut cal = iron_calibration();
    cal.swing_threshold = -1.0;
    let window = full_swing_window(&SwingProfile::iron(), 42);

    match detector().detect(&window, &cal).unwrap_err() {
        DetectionError::InvalidCalibration(_) => {}
        e => panic!("Expected InvalidCalibration, got: {:?}", e),
    }
}

#[test]
fn test_malformed_samples_are_dropped_not_fatal() {
    let mut window = full_swing_window(&SwingProfile::iron(), 42);
    // Corrupt a handful of address samples; detection should survive
    window[1].acceleration.x = f32::NAN;
    window[3].angular_rate.y = f32::INFINITY;

    let result = detector().detect(&window, &iron_calibration()).unwrap();
    assert!(result.is_swing);
}

#[test]
fn test_too_few_valid_samples_rejects_quietly() {
    let full = full_swing_window(&SwingProfile::iron(), 42);
    let result = detector().detect(&full[..10], &iron_calibration()).unwrap();

    assert!(!result.is_swing);
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn test_detection_is_deterministic() {
    let window = full_swing_window(&SwingProfile::iron(), 42);
    let cal = iron_calibration();
    let first = detector().detect(&window, &cal).unwrap();
    let second = detector().detect(&window, &cal).unwrap();

    assert_eq!(first, second, "Identical inputs must yield identical results");
}

#[test]
fn test_left_handed_swing_with_left_calibration() {
    let profile = SwingProfile {
        handedness: Handedness::Left,
        ..SwingProfile::iron()
    };
    let mut cal = iron_calibration();
    cal.handedness = Handedness::Left;

    let result = detector()
        .detect(&full_swing_window(&profile, 42), &cal)
        .unwrap();
    assert!(result.is_swing, "Mirrored swing should detect for a lefty profile");
}

#[test]
fn test_handedness_mismatch_rejects() {
    let profile = SwingProfile {
        handedness: Handedness::Left,
        ..SwingProfile::iron()
    };
    // Right-handed calibration sees the mirrored backswing as negative rotation
    let result = detector()
        .detect(&full_swing_window(&profile, 42), &iron_calibration())
        .unwrap();
    assert!(!result.is_swing);
}

#[test]
fn test_large_gap_resets_segmentation() {
    let mut window = full_swing_window(&SwingProfile::iron(), 42);
    let gap_start = window.last().unwrap().timestamp_ms + 5000;
    // Quiet tail after a gap longer than the detection window
    for k in 0..30u64 {
        window.push(MotionSample::new(
            crate::analysis::sample::Vec3::new(0.1, 0.0, 0.1),
            crate::analysis::sample::Vec3::new(1.0, 0.5, 0.2),
            gap_start + k * 20,
        ));
    }

    let result = detector().detect(&window, &iron_calibration()).unwrap();
    assert!(
        !result.is_swing,
        "Only the post-gap run should be analyzed, and it is quiet"
    );
}
