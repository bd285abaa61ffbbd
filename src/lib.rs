// Swingsense Core - swing detection and validation pipeline
//
// Turns a raw window of accelerometer/gyroscope samples plus a per-user
// calibration into a classified, confidence-scored, context-validated
// golf-swing event. Pure library boundary: the host application owns
// sample transport, calibration onboarding, persistence, and UI.

// Module declarations
pub mod analysis;
pub mod calibration;
pub mod config;
pub mod error;
pub mod testing;

// Re-exports for convenience
pub use analysis::detector::{
    DetectionResult, PhaseBoundaries, SwingDetector, SwingMetrics, SwingPhase,
};
pub use analysis::matcher::{PatternMatch, PatternMatcher};
pub use analysis::sample::{MotionSample, Vec3};
pub use analysis::scorer::{DimensionBreakdown, QualityScore, QualityScorer};
pub use analysis::validator::{
    ContextValidator, CourseType, DeviceStability, Environment, RecentActivity,
    ValidationContext, ValidationResult,
};
pub use analysis::{SwingAnalysis, SwingAnalyzer};
pub use calibration::{Calibration, ClubType, Handedness, PersonalThresholds};
pub use config::{DetectionConfig, MatcherConfig, PipelineConfig, ValidationConfig};
pub use error::{CalibrationError, DetectionError, ErrorCode};
