// QualityScorer - technique rating for accepted swings
//
// Converts an accepted swing's metrics into a 0-10 quality score with a
// per-dimension breakdown. Each dimension measures deviation from the
// calibration's expected ranges and maps it through a saturating curve,
// so large deviations flatten out instead of cliffing to zero. The score
// annotates accepted swings only; it never feeds back into validation.
//
// Dimensions and fixed weights:
// - tempo (0.40): measured tempo ratio vs the calibrated expectation
// - plane (0.35): backswing angle vs the profile's ideal arc
// - follow-through (0.25): integrated downswing speed vs what the peak
//   implies - a swing that decelerates into the ball (cut-off finish)
//   shows a low integral relative to its peak

use serde::{Deserialize, Serialize};

use crate::analysis::detector::SwingMetrics;
use crate::calibration::Calibration;

/// Fixed dimension weights
const TEMPO_WEIGHT: f32 = 0.40;
const PLANE_WEIGHT: f32 = 0.35;
const FOLLOW_THROUGH_WEIGHT: f32 = 0.25;

/// Saturation slope for deviation-based sub-scores
const DEVIATION_SLOPE: f32 = 3.0;

/// Ideal backswing arc relative to the calibrated minimum
const IDEAL_ANGLE_FACTOR: f32 = 4.0 / 3.0;

/// Nominal downswing duration used to relate peak and integrated speed (s)
const REFERENCE_DOWNSWING_S: f32 = 0.25;

/// Saturation constant for the follow-through ratio
const FOLLOW_THROUGH_SATURATION: f32 = 0.3;

/// Per-dimension sub-scores, each 0-10
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionBreakdown {
    pub tempo: f32,
    pub plane: f32,
    pub follow_through: f32,
}

/// Technique rating for one accepted swing
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityScore {
    /// Weighted overall score, 0-10
    pub score: f32,
    pub breakdown: DimensionBreakdown,
}

/// QualityScorer rates swing technique against the calibrated profile
pub struct QualityScorer;

impl QualityScorer {
    pub fn new() -> Self {
        Self
    }

    /// Score an accepted swing's metrics
    ///
    /// # Arguments
    /// * `metrics` - Metrics of a detected, validated swing
    /// * `calibration` - Profile supplying expected tempo and angle ranges
    pub fn score(&self, metrics: &SwingMetrics, calibration: &Calibration) -> QualityScore {
        let thresholds = &calibration.thresholds;

        let tempo = deviation_subscore(
            metrics.swing_tempo_ratio,
            thresholds.expected_tempo_ratio,
        );

        let ideal_angle = thresholds.min_backswing_angle_deg * IDEAL_ANGLE_FACTOR;
        let plane = deviation_subscore(metrics.backswing_angle_deg, ideal_angle);

        let follow_through = follow_through_subscore(metrics);

        let score = TEMPO_WEIGHT * tempo
            + PLANE_WEIGHT * plane
            + FOLLOW_THROUGH_WEIGHT * follow_through;

        QualityScore {
            score: score.clamp(0.0, 10.0),
            breakdown: DimensionBreakdown {
                tempo,
                plane,
                follow_through,
            },
        }
    }
}

impl Default for QualityScorer {
    fn default() -> Self {
        Self::new()
    }
}

/// Map relative deviation from an expected value onto 0-10
///
/// 10 at zero deviation, saturating toward 0 as deviation grows; the
/// curve has no cliff, a 2x miss still scores a few points.
fn deviation_subscore(measured: f32, expected: f32) -> f32 {
    if expected <= f32::EPSILON {
        return 0.0;
    }
    let deviation = (measured - expected).abs() / expected;
    10.0 / (1.0 + DEVIATION_SLOPE * deviation)
}

/// Rate acceleration through impact
///
/// Relates integrated downswing speed to the speed the acceleration peak
/// would produce over a nominal downswing. Swinging through the ball
/// keeps the ratio high; stabbing at it leaves a tall peak with a small
/// integral.
fn follow_through_subscore(metrics: &SwingMetrics) -> f32 {
    if metrics.downswing_speed <= f32::EPSILON {
        return 0.0;
    }
    let implied_speed = metrics.downswing_speed * REFERENCE_DOWNSWING_S;
    let ratio = (metrics.max_speed / implied_speed).clamp(0.0, 1.5);
    10.0 * ratio / (ratio + FOLLOW_THROUGH_SATURATION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{ClubType, Handedness, PersonalThresholds};

    fn calibration() -> Calibration {
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

    fn good_metrics() -> SwingMetrics {
        SwingMetrics {
            max_speed: 1.8,
            backswing_angle_deg: 78.0,
            downswing_speed: 11.5,
            swing_tempo_ratio: 2.9,
            estimated_clubhead_speed: 30.0,
        }
    }

    #[test]
    fn test_good_swing_scores_well() {
        let quality = QualityScorer::new().score(&good_metrics(), &calibration());

        assert!(
            quality.score >= 6.0 && quality.score <= 10.0,
            "Good swing scored {}",
            quality.score
        );
        assert!(quality.breakdown.tempo > 7.0);
        assert!(quality.breakdown.plane > 7.0);
    }

    #[test]
    fn test_rushed_tempo_lowers_tempo_dimension() {
        let mut rushed = good_metrics();
        rushed.swing_tempo_ratio = 1.5;

        let scorer = QualityScorer::new();
        let good = scorer.score(&good_metrics(), &calibration());
        let bad = scorer.score(&rushed, &calibration());

        assert!(bad.breakdown.tempo < good.breakdown.tempo);
        assert!(bad.score < good.score);
    }

    #[test]
    fn test_saturation_avoids_cliffs() {
        let mut wild = good_metrics();
        wild.swing_tempo_ratio = 6.0;
        wild.backswing_angle_deg = 160.0;

        let quality = QualityScorer::new().score(&wild, &calibration());

        assert!(
            quality.score > 2.0,
            "Large deviations should flatten, not zero out: {}",
            quality.score
        );
    }

    #[test]
    fn test_deceleration_lowers_follow_through() {
        let mut stabbed = good_metrics();
        // Tall peak, small integral: the player quit on the swing
        stabbed.max_speed = 0.4;
        stabbed.downswing_speed = 14.0;

        let scorer = QualityScorer::new();
        let good = scorer.score(&good_metrics(), &calibration());
        let bad = scorer.score(&stabbed, &calibration());

        assert!(bad.breakdown.follow_through < good.breakdown.follow_through);
    }

    #[test]
    fn test_score_is_deterministic() {
        let scorer = QualityScorer::new();
        let a = scorer.score(&good_metrics(), &calibration());
        let b = scorer.score(&good_metrics(), &calibration());
        assert_eq!(a, b);
    }

    #[test]
    fn test_score_stays_in_range() {
        let mut zeroed = good_metrics();
        zeroed.max_speed = 0.0;
        zeroed.downswing_speed = 0.0;
        zeroed.swing_tempo_ratio = 0.0;
        zeroed.backswing_angle_deg = 0.0;

        let quality = QualityScorer::new().score(&zeroed, &calibration());
        assert!(quality.score >= 0.0 && quality.score <= 10.0);
    }
}
