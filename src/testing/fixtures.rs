//! Deterministic synthetic IMU windows for the detection pipeline.
//!
//! The test suites and the CLI harness rely on reproducible motion windows
//! that can feed the pipeline without touching live sensors. This module
//! defines the fixture description (`FixtureSpec`) and the generators for
//! the canonical patterns: a full six-phase swing with a parameterized
//! profile, 2 Hz gait oscillation, a door-slam style mechanical spike, and
//! a swing truncated before the follow-through.
//!
//! All jitter comes from a seeded `StdRng`; the same spec always yields a
//! bit-identical window.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;

use crate::analysis::sample::{MotionSample, Vec3};
use crate::calibration::Handedness;

/// Sample rate every fixture is generated at (Hz)
pub const FIXTURE_SAMPLE_RATE_HZ: u32 = 50;

/// Sample spacing at the fixture rate (ms)
pub const FIXTURE_DT_MS: u64 = 20;

/// Timing and amplitude profile of a synthetic swing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SwingProfile {
    pub address_ms: u32,
    pub backswing_ms: u32,
    pub transition_ms: u32,
    pub downswing_ms: u32,
    pub follow_through_ms: u32,
    /// Peak backswing rotation on the dominant axis (deg/s)
    pub peak_rotation_dps: f32,
    /// Peak downswing acceleration magnitude (m/s²)
    pub peak_accel: f32,
    /// Resting jitter amplitude (m/s²)
    pub rest_noise: f32,
    pub handedness: Handedness,
}

impl SwingProfile {
    /// A calibrated mid-iron swing: 150 deg/s backswing peak, 12 m/s²
    /// downswing peak over a 1.5 s window.
    pub fn iron() -> Self {
        Self {
            address_ms: 200,
            backswing_ms: 650,
            transition_ms: 60,
            downswing_ms: 240,
            follow_through_ms: 350,
            peak_rotation_dps: 150.0,
            peak_accel: 12.0,
            rest_noise: 0.25,
            handedness: Handedness::Right,
        }
    }

    /// A driver swing with wide margins over default thresholds.
    pub fn driver() -> Self {
        Self {
            address_ms: 240,
            backswing_ms: 700,
            transition_ms: 60,
            downswing_ms: 220,
            follow_through_ms: 380,
            peak_rotation_dps: 180.0,
            peak_accel: 14.0,
            rest_noise: 0.25,
            handedness: Handedness::Right,
        }
    }

    fn total_ms(&self) -> u32 {
        self.address_ms
            + self.backswing_ms
            + self.transition_ms
            + self.downswing_ms
            + self.follow_through_ms
    }
}

/// Supported deterministic motion patterns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FixturePattern {
    /// Full six-phase swing
    FullSwing { profile: SwingProfile },
    /// Swing cut off at impact, before any follow-through
    TruncatedSwing { profile: SwingProfile },
    /// Periodic walking oscillation with no dominant transient
    Gait {
        step_hz: f32,
        sway_accel: f32,
        duration_ms: u32,
    },
    /// Short single-axis spike with no preceding rotation (car door, dropped bag)
    DoorSlam { duration_ms: u32 },
}

/// Declarative description of a runnable fixture window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FixtureSpec {
    pub pattern: FixturePattern,
    #[serde(default)]
    pub seed: u64,
}

impl FixtureSpec {
    /// Generate the sample window for this spec.
    pub fn generate(&self) -> Vec<MotionSample> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        match &self.pattern {
            FixturePattern::FullSwing { profile } => swing_samples(profile, false, &mut rng),
            FixturePattern::TruncatedSwing { profile } => swing_samples(profile, true, &mut rng),
            FixturePattern::Gait {
                step_hz,
                sway_accel,
                duration_ms,
            } => gait_samples(*step_hz, *sway_accel, *duration_ms, &mut rng),
            FixturePattern::DoorSlam { duration_ms } => door_slam_samples(*duration_ms, &mut rng),
        }
    }
}

/// Full six-phase swing window.
pub fn full_swing_window(profile: &SwingProfile, seed: u64) -> Vec<MotionSample> {
    FixtureSpec {
        pattern: FixturePattern::FullSwing { profile: *profile },
        seed,
    }
    .generate()
}

/// Swing window cut off at impact.
pub fn truncated_swing_window(profile: &SwingProfile, seed: u64) -> Vec<MotionSample> {
    FixtureSpec {
        pattern: FixturePattern::TruncatedSwing { profile: *profile },
        seed,
    }
    .generate()
}

/// 2 Hz walking oscillation window.
pub fn gait_window(seed: u64) -> Vec<MotionSample> {
    FixtureSpec {
        pattern: FixturePattern::Gait {
            step_hz: 2.0,
            sway_accel: 3.0,
            duration_ms: 1500,
        },
        seed,
    }
    .generate()
}

/// Door-slam spike window.
pub fn door_slam_window(seed: u64) -> Vec<MotionSample> {
    FixtureSpec {
        pattern: FixturePattern::DoorSlam { duration_ms: 1500 },
        seed,
    }
    .generate()
}

/// Trapezoid envelope for the backswing rotation: ramp up over the first
/// quarter, hold, release over the final 15%.
fn trapezoid(u: f32) -> f32 {
    if u < 0.25 {
        u / 0.25
    } else if u < 0.85 {
        1.0
    } else {
        ((1.0 - u) / 0.15).max(0.0)
    }
}

fn jitter(rng: &mut StdRng, scale: f32) -> f32 {
    rng.gen_range(-1.0..=1.0) * scale
}

fn rest_sample(ts: u64, noise: f32, rng: &mut StdRng) -> MotionSample {
    MotionSample::new(
        Vec3::new(
            jitter(rng, noise * 0.6),
            jitter(rng, noise * 0.6),
            jitter(rng, noise * 0.6),
        ),
        Vec3::new(jitter(rng, 2.5), jitter(rng, 2.5), jitter(rng, 2.5)),
        ts,
    )
}

fn swing_samples(profile: &SwingProfile, truncate_at_impact: bool, rng: &mut StdRng) -> Vec<MotionSample> {
    let orientation = profile.handedness.orientation();
    let total = if truncate_at_impact {
        profile.total_ms() - profile.follow_through_ms
    } else {
        profile.total_ms()
    };

    let backswing_end = profile.address_ms + profile.backswing_ms;
    let transition_end = backswing_end + profile.transition_ms;
    let downswing_end = transition_end + profile.downswing_ms;

    let mut samples = Vec::with_capacity((total as u64 / FIXTURE_DT_MS) as usize + 1);
    let mut ts = 0u64;
    while ts < total as u64 {
        let t = ts as u32;
        let sample = if t < profile.address_ms {
            rest_sample(ts, profile.rest_noise, rng)
        } else if t < backswing_end {
            let u = (t - profile.address_ms) as f32 / profile.backswing_ms as f32;
            let shape = trapezoid(u);
            MotionSample::new(
                Vec3::new(
                    1.3 * shape + jitter(rng, 0.1),
                    jitter(rng, 0.1),
                    0.5 * shape + jitter(rng, 0.1),
                ),
                Vec3::new(
                    jitter(rng, 4.0),
                    orientation * (profile.peak_rotation_dps * shape + jitter(rng, 3.0)),
                    jitter(rng, 4.0),
                ),
                ts,
            )
        } else if t < transition_end {
            // Club reverses direction at the top: low rotation, low activity
            MotionSample::new(
                Vec3::new(0.8 + jitter(rng, 0.1), jitter(rng, 0.1), jitter(rng, 0.1)),
                Vec3::new(
                    jitter(rng, 3.0),
                    orientation * (8.0 + jitter(rng, 3.0)),
                    jitter(rng, 3.0),
                ),
                ts,
            )
        } else if t < downswing_end {
            // Acceleration builds to its peak at impact
            let frac = ((t - transition_end + FIXTURE_DT_MS as u32) as f32
                / profile.downswing_ms as f32)
                .min(1.0);
            let mag = profile.peak_accel * frac.sqrt();
            MotionSample::new(
                Vec3::new(mag, jitter(rng, 0.15), jitter(rng, 0.15)),
                Vec3::new(
                    jitter(rng, 5.0),
                    -orientation * (2.2 * profile.peak_rotation_dps * frac.sqrt() + jitter(rng, 5.0)),
                    jitter(rng, 5.0),
                ),
                ts,
            )
        } else {
            // Exponential release after impact
            let t_local = (t - downswing_end) as f32 / 1000.0;
            let decay = (-t_local / 0.08).exp();
            MotionSample::new(
                Vec3::new(
                    0.8 * profile.peak_accel * decay + jitter(rng, 0.1),
                    jitter(rng, 0.1),
                    jitter(rng, 0.1),
                ),
                Vec3::new(
                    jitter(rng, 3.0),
                    -orientation * (2.2 * profile.peak_rotation_dps * decay + jitter(rng, 3.0)),
                    jitter(rng, 3.0),
                ),
                ts,
            )
        };
        samples.push(sample);
        ts += FIXTURE_DT_MS;
    }
    samples
}

fn gait_samples(step_hz: f32, sway_accel: f32, duration_ms: u32, rng: &mut StdRng) -> Vec<MotionSample> {
    let mut samples = Vec::with_capacity((duration_ms as u64 / FIXTURE_DT_MS) as usize + 1);
    let mut ts = 0u64;
    while ts < duration_ms as u64 {
        let t_s = ts as f32 / 1000.0;
        let phase = 2.0 * PI * step_hz * t_s;
        samples.push(MotionSample::new(
            Vec3::new(
                0.6 * (2.0 * phase).sin() + jitter(rng, 0.2),
                jitter(rng, 0.2),
                sway_accel * phase.sin() + jitter(rng, 0.2),
            ),
            Vec3::new(
                20.0 * phase.sin() + jitter(rng, 3.0),
                12.0 * phase.cos() + jitter(rng, 3.0),
                jitter(rng, 3.0),
            ),
            ts,
        ));
        ts += FIXTURE_DT_MS;
    }
    samples
}

fn door_slam_samples(duration_ms: u32, rng: &mut StdRng) -> Vec<MotionSample> {
    let spike_at = (duration_ms / 2 / FIXTURE_DT_MS as u32) * FIXTURE_DT_MS as u32;
    let mut samples = Vec::with_capacity((duration_ms as u64 / FIXTURE_DT_MS) as usize + 1);
    let mut ts = 0u64;
    while ts < duration_ms as u64 {
        let offset = ts as i64 - spike_at as i64;
        let sample = match offset {
            0 => MotionSample::new(
                Vec3::new(25.0, jitter(rng, 0.3), jitter(rng, 0.3)),
                Vec3::new(jitter(rng, 3.0), jitter(rng, 3.0), 95.0),
                ts,
            ),
            o if o == FIXTURE_DT_MS as i64 => MotionSample::new(
                Vec3::new(15.0, jitter(rng, 0.3), jitter(rng, 0.3)),
                Vec3::new(jitter(rng, 3.0), jitter(rng, 3.0), 60.0),
                ts,
            ),
            o if o == 2 * FIXTURE_DT_MS as i64 => MotionSample::new(
                Vec3::new(4.0, jitter(rng, 0.3), jitter(rng, 0.3)),
                Vec3::new(jitter(rng, 3.0), jitter(rng, 3.0), 10.0),
                ts,
            ),
            _ => rest_sample(ts, 0.25, rng),
        };
        samples.push(sample);
        ts += FIXTURE_DT_MS;
    }
    samples
}
