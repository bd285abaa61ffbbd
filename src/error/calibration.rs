// Calibration error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Calibration error code constants
///
/// These constants provide a single source of truth for error codes
/// shared between the core and host applications.
///
/// Error code range: 2001-2003
pub struct CalibrationErrorCodes {}

impl CalibrationErrorCodes {
    /// A personalized threshold is out of its valid range
    pub const INVALID_THRESHOLD: i32 = 2001;

    /// Expected tempo ratio is outside the plausible range
    pub const INVALID_TEMPO_RATIO: i32 = 2002;

    /// Calibration has no user id
    pub const MISSING_USER_ID: i32 = 2003;
}

/// Log a calibration error with structured context
///
/// Logs the numeric error code alongside the human-readable message so
/// host-side log scrapers can match on either.
pub fn log_calibration_error(err: &CalibrationError, context: &str) {
    error!(
        "Calibration error in {}: code={}, component=Calibration, message={}",
        context,
        err.code(),
        err.message()
    );
}

/// Calibration-related errors
///
/// These errors cover validation of per-user calibration profiles. They are
/// raised when a profile is constructed or handed to the pipeline, never
/// during detection of ordinary noisy input.
///
/// Error code range: 2001-2003
#[derive(Debug, Clone, PartialEq)]
pub enum CalibrationError {
    /// A personalized threshold is out of its valid range
    InvalidThreshold { field: &'static str, value: f32 },

    /// Expected tempo ratio is outside the plausible range [1.0, 6.0]
    InvalidTempoRatio { value: f32 },

    /// Calibration has no user id
    MissingUserId,
}

impl ErrorCode for CalibrationError {
    fn code(&self) -> i32 {
        match self {
            CalibrationError::InvalidThreshold { .. } => CalibrationErrorCodes::INVALID_THRESHOLD,
            CalibrationError::InvalidTempoRatio { .. } => {
                CalibrationErrorCodes::INVALID_TEMPO_RATIO
            }
            CalibrationError::MissingUserId => CalibrationErrorCodes::MISSING_USER_ID,
        }
    }

    fn message(&self) -> String {
        match self {
            CalibrationError::InvalidThreshold { field, value } => {
                format!("Invalid threshold {}: {}", field, value)
            }
            CalibrationError::InvalidTempoRatio { value } => {
                format!("Expected tempo ratio {} outside [1.0, 6.0]", value)
            }
            CalibrationError::MissingUserId => "Calibration has no user id".to_string(),
        }
    }
}

impl fmt::Display for CalibrationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CalibrationError::{:?} (code {}): {}",
            self,
            self.code(),
            self.message()
        )
    }
}

impl std::error::Error for CalibrationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_error_codes() {
        assert_eq!(
            CalibrationError::InvalidThreshold {
                field: "swing_threshold",
                value: -1.0
            }
            .code(),
            CalibrationErrorCodes::INVALID_THRESHOLD
        );
        assert_eq!(
            CalibrationError::InvalidTempoRatio { value: 9.0 }.code(),
            CalibrationErrorCodes::INVALID_TEMPO_RATIO
        );
        assert_eq!(
            CalibrationError::MissingUserId.code(),
            CalibrationErrorCodes::MISSING_USER_ID
        );
    }

    #[test]
    fn test_calibration_error_messages() {
        let err = CalibrationError::InvalidThreshold {
            field: "min_downswing_speed",
            value: 0.0,
        };
        assert_eq!(err.message(), "Invalid threshold min_downswing_speed: 0");

        let err = CalibrationError::InvalidTempoRatio { value: 9.0 };
        assert!(err.message().contains("9"));

        let err = CalibrationError::MissingUserId;
        assert!(err.message().contains("user id"));
    }

    #[test]
    fn test_calibration_error_display() {
        let err = CalibrationError::MissingUserId;
        let display = format!("{}", err);
        assert!(display.contains("CalibrationError"));
        assert!(display.contains(&err.code().to_string()));
    }
}
