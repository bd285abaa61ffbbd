//! Configuration management for dynamic parameter tuning
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling fast iteration without recompilation. Key parameters for
//! phase segmentation, pattern matching, and context validation can be
//! adjusted via the config file for rapid experimentation.
//!
//! Acceptance strictness is caller-controlled: `ValidationConfig` ships
//! strict/balanced/relaxed presets as distinct configurations, not code
//! branches.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete pipeline configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub detection: DetectionConfig,
    pub matcher: MatcherConfig,
    pub validation: ValidationConfig,
}

/// Swing detector segmentation and confidence parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionConfig {
    /// Activity ceiling for the address phase (m/s² above baseline)
    pub address_activity_ceiling: f32,
    /// Rotation ceiling for the address phase (deg/s)
    pub address_rotation_floor_dps: f32,
    /// Consecutive quiet samples required to establish address
    pub address_min_samples: usize,
    /// Oriented rotation rate that starts a backswing (deg/s)
    pub backswing_rotation_floor_dps: f32,
    /// Samples of sustained rotation required before a transition counts
    pub min_backswing_samples: usize,
    /// Fraction of peak backswing rate below which transition begins
    pub transition_drop_ratio: f32,
    /// Activity fraction of swing_threshold treated as settled follow-through
    pub follow_settle_ratio: f32,
    /// Total motion shorter than this is a mechanical impact, not a swing (ms)
    pub min_swing_duration_ms: u64,
    /// Timestamp gap that resets in-progress segmentation (ms)
    pub max_gap_ms: u64,
    /// Minimum valid samples for detection to proceed
    pub min_valid_samples: usize,
    /// Peak/baseline ratio treated as full signal-to-noise confidence
    pub snr_target: f32,
    /// Confidence weight: threshold headroom
    pub headroom_weight: f32,
    /// Confidence weight: phase-chain completeness
    pub completeness_weight: f32,
    /// Confidence weight: signal-to-noise ratio
    pub snr_weight: f32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            address_activity_ceiling: 1.0,
            address_rotation_floor_dps: 15.0,
            address_min_samples: 3,
            backswing_rotation_floor_dps: 30.0,
            min_backswing_samples: 8,
            transition_drop_ratio: 0.5,
            follow_settle_ratio: 0.5,
            min_swing_duration_ms: 400,
            max_gap_ms: 2000,
            min_valid_samples: 20,
            snr_target: 10.0,
            headroom_weight: 0.5,
            completeness_weight: 0.2,
            snr_weight: 0.3,
        }
    }
}

/// Club pattern matcher parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Relative distance per dimension accepted as a match
    pub dimension_tolerance: f32,
    /// Mean distance beyond which the swing is anomalous for every club
    pub rejection_distance: f32,
    /// Distance margin within which the hinted club wins a near-tie
    pub hint_tie_margin: f32,
    /// Largest positive confidence adjustment for a tight match
    pub max_bonus: f32,
    /// Largest negative confidence adjustment for an anomalous swing
    pub max_penalty: f32,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            dimension_tolerance: 0.2,
            rejection_distance: 0.6,
            hint_tie_margin: 0.05,
            max_bonus: 0.1,
            max_penalty: 0.25,
        }
    }
}

/// Context validator thresholds and penalties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    /// Seconds of stillness required after walking before a swing is trusted
    pub min_settle_seconds: f32,
    /// Accelerometer variance above this incurs a stability penalty ((m/s²)²)
    pub accel_variance_ceiling: f32,
    /// Gyroscope variance above this incurs a stability penalty ((deg/s)²)
    pub gyro_variance_ceiling: f32,
    /// Penalty slope per unit of relative excess variance over the ceiling
    pub variance_penalty_slope: f32,
    /// Wind level (0-10) below which no environment discount applies
    pub wind_calm_level: u8,
    /// Confidence discount per wind level above calm
    pub wind_penalty_per_level: f32,
    /// Smallest wind factor applied regardless of wind level
    pub wind_penalty_floor: f32,
    /// Environment factor at zero ground stability
    pub ground_penalty_floor: f32,
    /// Adjusted confidence at or above this is accepted
    pub acceptance_floor: f32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self::balanced()
    }
}

impl ValidationConfig {
    /// Default preset: the shipping acceptance bar
    pub fn balanced() -> Self {
        Self {
            min_settle_seconds: 5.0,
            accel_variance_ceiling: 4.0,
            gyro_variance_ceiling: 500.0,
            variance_penalty_slope: 0.15,
            wind_calm_level: 3,
            wind_penalty_per_level: 0.04,
            wind_penalty_floor: 0.7,
            ground_penalty_floor: 0.85,
            acceptance_floor: 0.5,
        }
    }

    /// Tournament-grade preset: fewer false positives, more misses
    pub fn strict() -> Self {
        Self {
            min_settle_seconds: 8.0,
            variance_penalty_slope: 0.25,
            acceptance_floor: 0.65,
            ..Self::balanced()
        }
    }

    /// Range-session preset: accept marginal swings for practice feedback
    pub fn relaxed() -> Self {
        Self {
            min_settle_seconds: 3.0,
            variance_penalty_slope: 0.1,
            acceptance_floor: 0.35,
            ..Self::balanced()
        }
    }
}

impl Default for PipelineConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            detection: DetectionConfig::default(),
            matcher: MatcherConfig::default(),
            validation: ValidationConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from JSON file
    ///
    /// # Arguments
    /// * `path` - Path to JSON config file
    ///
    /// # Returns
    /// * `Ok(PipelineConfig)` - Loaded configuration
    /// * `Err` - If file doesn't exist or JSON is invalid, returns default config
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}
