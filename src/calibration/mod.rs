// Calibration module - per-user profiles read by the detection pipeline
//
// The calibration flow itself (collecting reference swings, deriving
// thresholds) is owned by the host application; this module only defines
// the profile the pipeline consumes.

pub mod state;

pub use state::{Calibration, ClubType, Handedness, PersonalThresholds};
