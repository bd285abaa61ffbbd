// Detection error types and constants

use crate::error::{CalibrationError, ErrorCode};
use log::error;
use std::fmt;

/// Detection error code constants
///
/// Error code range: 1001-1002
pub struct DetectionErrorCodes {}

impl DetectionErrorCodes {
    /// Detection was invoked without a calibrated profile
    pub const NOT_CALIBRATED: i32 = 1001;

    /// The supplied calibration failed validation
    pub const INVALID_CALIBRATION: i32 = 1002;
}

/// Log a detection error with structured context
pub fn log_detection_error(err: &DetectionError, context: &str) {
    error!(
        "Detection error in {}: code={}, component=SwingDetector, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Detection-related errors
///
/// Only calibration problems are errors at this layer. Incomplete swings,
/// rejected look-alike motions, and low-confidence results are ordinary
/// `DetectionResult`/`ValidationResult` outcomes, not errors.
///
/// Error code range: 1001-1002
#[derive(Debug, Clone, PartialEq)]
pub enum DetectionError {
    /// Detection was invoked without a calibrated profile (caller error)
    NotCalibrated,

    /// The supplied calibration failed validation
    InvalidCalibration(CalibrationError),
}

impl ErrorCode for DetectionError {
    fn code(&self) -> i32 {
        match self {
            DetectionError::NotCalibrated => DetectionErrorCodes::NOT_CALIBRATED,
            DetectionError::InvalidCalibration(_) => DetectionErrorCodes::INVALID_CALIBRATION,
        }
    }

    fn message(&self) -> String {
        match self {
            DetectionError::NotCalibrated => {
                "Detection requires a calibrated profile; run calibration first".to_string()
            }
            DetectionError::InvalidCalibration(inner) => {
                format!("Invalid calibration: {}", inner.message())
            }
        }
    }
}

impl fmt::Display for DetectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "DetectionError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for DetectionError {}

impl From<CalibrationError> for DetectionError {
    fn from(err: CalibrationError) -> Self {
        DetectionError::InvalidCalibration(err)
    }
}
