// Analysis module - swing detection pipeline
//
// This module orchestrates the complete analysis pipeline over one sample
// window:
//
// Pipeline: SwingDetector → PatternMatcher → ContextValidator → QualityScorer
//
// Each stage is a pure function of its inputs plus calibration/context; no
// stage performs I/O or holds state across calls. The caller hands the
// analyzer an owned, immutable window snapshot, so a concurrent sample
// producer can keep appending without tearing an in-flight call.

use serde::{Deserialize, Serialize};

pub mod detector;
pub mod features;
pub mod matcher;
pub mod sample;
pub mod scorer;
pub mod validator;

use crate::calibration::Calibration;
use crate::config::PipelineConfig;
use crate::error::DetectionError;
use detector::{DetectionResult, SwingDetector};
use matcher::{PatternMatch, PatternMatcher};
use sample::MotionSample;
use scorer::{QualityScore, QualityScorer};
use validator::{ContextValidator, ValidationContext, ValidationResult};

/// Full pipeline output for one window
///
/// `detection` carries the raw detector confidence; the pattern-adjusted,
/// context-discounted confidence lives in `validation`. Downstream stages
/// are present only as far as the pipeline progressed: a non-swing window
/// stops after detection, and `quality` exists only for accepted swings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwingAnalysis {
    pub detection: DetectionResult,
    pub pattern: Option<PatternMatch>,
    pub validation: Option<ValidationResult>,
    pub quality: Option<QualityScore>,
}

/// SwingAnalyzer wires the four pipeline stages together
///
/// Construct once per configuration and reuse across windows; the
/// analyzer itself is stateless between calls.
pub struct SwingAnalyzer {
    detector: SwingDetector,
    matcher: PatternMatcher,
    validator: ContextValidator,
    scorer: QualityScorer,
}

impl SwingAnalyzer {
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            detector: SwingDetector::new(config.detection),
            matcher: PatternMatcher::new(config.matcher),
            validator: ContextValidator::new(config.validation),
            scorer: QualityScorer::new(),
        }
    }

    /// Analyzer with default configuration
    pub fn with_defaults() -> Self {
        Self::new(PipelineConfig::default())
    }

    /// Run the full pipeline over one sample window
    ///
    /// # Arguments
    /// * `window` - Owned, immutable snapshot of roughly 1-2s of samples
    /// * `calibration` - Calibrated per-user profile (required)
    /// * `context` - Fresh ambient context for the validator
    ///
    /// # Returns
    /// * `Ok(SwingAnalysis)` - Pipeline outcome, including rejections
    /// * `Err(DetectionError)` - Missing or invalid calibration only
    pub fn analyze(
        &self,
        window: &[MotionSample],
        calibration: &Calibration,
        context: &ValidationContext,
    ) -> Result<SwingAnalysis, DetectionError> {
        let detection = self.detector.detect(window, calibration)?;
        if !detection.is_swing {
            return Ok(SwingAnalysis {
                detection,
                pattern: None,
                validation: None,
                quality: None,
            });
        }

        // Both are present whenever is_swing is true
        let (metrics, phases) = match (&detection.metrics, &detection.phases) {
            (Some(metrics), Some(phases)) => (metrics, phases),
            _ => {
                return Ok(SwingAnalysis {
                    detection,
                    pattern: None,
                    validation: None,
                    quality: None,
                })
            }
        };

        let pattern = self
            .matcher
            .match_clubs(metrics, phases, window, calibration.club_type);

        let mut adjusted = detection.clone();
        adjusted.confidence = (detection.confidence + pattern.confidence_delta).clamp(0.0, 1.0);
        let validation = self.validator.validate(&adjusted, context);

        let quality = validation
            .is_valid
            .then(|| self.scorer.score(metrics, calibration));

        Ok(SwingAnalysis {
            detection,
            pattern: Some(pattern),
            validation: Some(validation),
            quality,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::{ClubType, Handedness, PersonalThresholds};
    use crate::testing::fixtures::{full_swing_window, gait_window, SwingProfile};

    fn iron_calibration() -> Calibration {
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
    fn test_non_swing_short_circuits_pipeline() {
        let analyzer = SwingAnalyzer::with_defaults();
        let analysis = analyzer
            .analyze(
                &gait_window(5),
                &iron_calibration(),
                &ValidationContext::neutral(),
            )
            .unwrap();

        assert!(!analysis.detection.is_swing);
        assert!(analysis.pattern.is_none());
        assert!(analysis.validation.is_none());
        assert!(analysis.quality.is_none());
    }

    #[test]
    fn test_accepted_swing_runs_every_stage() {
        let analyzer = SwingAnalyzer::with_defaults();
        let analysis = analyzer
            .analyze(
                &full_swing_window(&SwingProfile::iron(), 42),
                &iron_calibration(),
                &ValidationContext::neutral(),
            )
            .unwrap();

        assert!(analysis.detection.is_swing);
        assert!(analysis.pattern.is_some());
        assert!(analysis.validation.as_ref().unwrap().is_valid);
        assert!(analysis.quality.is_some());
    }

    #[test]
    fn test_rejected_swing_carries_no_quality() {
        let analyzer = SwingAnalyzer::with_defaults();
        let mut context = ValidationContext::neutral();
        context.recent_activity.driving_detected = true;

        let analysis = analyzer
            .analyze(
                &full_swing_window(&SwingProfile::iron(), 42),
                &iron_calibration(),
                &context,
            )
            .unwrap();

        assert!(analysis.detection.is_swing);
        assert!(!analysis.validation.as_ref().unwrap().is_valid);
        assert!(analysis.quality.is_none());
    }

    #[test]
    fn test_uncalibrated_profile_propagates_error() {
        let analyzer = SwingAnalyzer::with_defaults();
        let result = analyzer.analyze(
            &full_swing_window(&SwingProfile::iron(), 42),
            &Calibration::uncalibrated("user-9"),
            &ValidationContext::neutral(),
        );

        assert_eq!(result.unwrap_err(), DetectionError::NotCalibrated);
    }
}
