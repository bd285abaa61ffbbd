// Error types for the swing detection core
//
// This module defines custom error types for detection and calibration
// operations, providing structured error handling with numeric error codes
// suitable for host-app reporting.
//
// Ordinary noisy or ambiguous input is NOT an error: incomplete swings and
// low-confidence detections are regular pipeline outcomes. Only missing or
// invalid calibration is treated as a caller error.

mod calibration;
mod detection;

pub use calibration::{log_calibration_error, CalibrationError, CalibrationErrorCodes};
pub use detection::{log_detection_error, DetectionError, DetectionErrorCodes};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent error handling at the
/// host-app boundary.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
