// PatternMatcher - club-type refinement against reference swing patterns
//
// Compares a detected swing's metric vector against stored per-club
// reference vectors using a bounded relative-distance test. The matcher
// refines the club classification (the calibration's club is only a hint),
// ranks plausible alternates, and adjusts pipeline confidence. An
// anomalous swing that matches no club earns a negative confidence delta
// instead of failing the pipeline.
//
// Distances are relative per dimension: |measured - reference| / reference,
// averaged over tempo ratio, backswing angle, and downswing speed.
// Estimated clubhead speed is excluded - it is a linear derivation of the
// other dimensions and would double-count downswing speed.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::analysis::detector::{PhaseBoundaries, SwingMetrics};
use crate::analysis::sample::MotionSample;
use crate::calibration::ClubType;
use crate::config::MatcherConfig;

/// Reference swing signature for one club type
#[derive(Debug, Clone, Copy)]
struct ClubPattern {
    club: ClubType,
    tempo_ratio: f32,
    backswing_angle_deg: f32,
    downswing_speed: f32,
}

/// Reference vectors per club, in `ClubType::ALL` order
static CLUB_PATTERNS: Lazy<[ClubPattern; 4]> = Lazy::new(|| {
    [
        ClubPattern {
            club: ClubType::Driver,
            tempo_ratio: 3.0,
            backswing_angle_deg: 105.0,
            downswing_speed: 13.5,
        },
        ClubPattern {
            club: ClubType::Iron,
            tempo_ratio: 2.8,
            backswing_angle_deg: 78.0,
            downswing_speed: 11.0,
        },
        ClubPattern {
            club: ClubType::Wedge,
            tempo_ratio: 2.5,
            backswing_angle_deg: 64.0,
            downswing_speed: 8.5,
        },
        ClubPattern {
            club: ClubType::Putter,
            tempo_ratio: 2.0,
            backswing_angle_deg: 15.0,
            downswing_speed: 1.2,
        },
    ]
});

/// Refined club classification for a detected swing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternMatch {
    pub refined_type: ClubType,
    /// Other clubs whose pattern also sits within tolerance, nearest first
    pub alternates: Vec<ClubType>,
    /// Adjustment applied to detection confidence downstream
    pub confidence_delta: f32,
    /// Mean relative distance to the refined club's reference vector
    pub best_distance: f32,
}

/// PatternMatcher ranks club reference patterns against swing metrics
pub struct PatternMatcher {
    config: MatcherConfig,
}

impl PatternMatcher {
    pub fn new(config: MatcherConfig) -> Self {
        Self { config }
    }

    /// Match a swing against the club reference patterns
    ///
    /// # Arguments
    /// * `metrics` - Derived swing metrics
    /// * `phases` - Phase boundaries backing the metrics
    /// * `window` - The analyzed sample window (boundary consistency check)
    /// * `hint` - Club the user is calibrated for; wins near-ties
    ///
    /// # Returns
    /// Ranked classification with a bounded confidence adjustment
    pub fn match_clubs(
        &self,
        metrics: &SwingMetrics,
        phases: &PhaseBoundaries,
        window: &[MotionSample],
        hint: ClubType,
    ) -> PatternMatch {
        let cfg = &self.config;

        // Boundaries that do not describe the window mean the metrics
        // cannot be trusted; treat as anomalous rather than failing.
        if !phases.is_ordered() || phases.follow_through_end >= window.len() {
            tracing::debug!("[Matcher] Inconsistent phase boundaries, marking anomalous");
            return PatternMatch {
                refined_type: hint,
                alternates: Vec::new(),
                confidence_delta: -cfg.max_penalty,
                best_distance: f32::MAX,
            };
        }

        let mut ranked: Vec<(ClubType, f32)> = CLUB_PATTERNS
            .iter()
            .map(|p| (p.club, pattern_distance(metrics, p)))
            .collect();
        ranked.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

        let (mut refined_type, mut best_distance) = ranked[0];

        // The calibrated club wins a near-tie: players rarely switch club
        // families mid-session, and the hint carries that prior.
        if refined_type != hint {
            if let Some(&(_, hint_distance)) = ranked.iter().find(|(club, _)| *club == hint) {
                if hint_distance <= cfg.dimension_tolerance
                    && hint_distance - best_distance <= cfg.hint_tie_margin
                {
                    refined_type = hint;
                    best_distance = hint_distance;
                }
            }
        }

        let alternates: Vec<ClubType> = ranked
            .iter()
            .filter(|(club, distance)| *club != refined_type && *distance <= cfg.dimension_tolerance)
            .map(|(club, _)| *club)
            .collect();

        let confidence_delta = if best_distance <= cfg.dimension_tolerance {
            cfg.max_bonus * (1.0 - best_distance / cfg.dimension_tolerance)
        } else if best_distance <= cfg.rejection_distance {
            0.0
        } else {
            let excess = (best_distance - cfg.rejection_distance) / cfg.rejection_distance;
            -cfg.max_penalty * excess.min(1.0)
        };

        tracing::debug!(
            "[Matcher] Refined {:?} (distance {:.3}, delta {:+.3}, {} alternates)",
            refined_type,
            best_distance,
            confidence_delta,
            alternates.len()
        );

        PatternMatch {
            refined_type,
            alternates,
            confidence_delta,
            best_distance,
        }
    }
}

/// Mean relative distance between measured metrics and a reference pattern
fn pattern_distance(metrics: &SwingMetrics, pattern: &ClubPattern) -> f32 {
    let dims = [
        (metrics.swing_tempo_ratio, pattern.tempo_ratio),
        (metrics.backswing_angle_deg, pattern.backswing_angle_deg),
        (metrics.downswing_speed, pattern.downswing_speed),
    ];
    let sum: f32 = dims
        .iter()
        .map(|(measured, reference)| (measured - reference).abs() / reference)
        .sum();
    sum / dims.len() as f32
}
