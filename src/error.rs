//! Error types surfaced by encounter setup and replication.
//!
//! Configuration problems are reported when a profile, pattern or actor is
//! built. The per-tick path never fails: missing targets are a flee branch
//! and authority checks gate the randomised calls structurally.

use thiserror::Error;

use crate::phase::PhaseId;

/// Invalid encounter configuration detected at setup time.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Steering inertia must be finite and at least `1.0`.
    #[error("inertia must be finite and >= 1.0, got {0}")]
    InvalidInertia(f32),
    /// A spread needs at least one projectile.
    #[error("spread pattern must produce at least one direction")]
    EmptySpread,
    /// Spread arc widths and offsets must be finite.
    #[error("spread angle {0} is not finite")]
    NonFiniteAngle(f32),
    /// Health thresholds are fractions of maximum health in `(0, 1]`.
    #[error("phase threshold {0} must lie in (0, 1]")]
    ThresholdOutOfRange(f64),
    /// Transition targets must strictly increase down the table.
    #[error("transition into phase {next} does not follow phase {previous}")]
    TransitionOrder {
        /// Target of the preceding transition.
        previous: PhaseId,
        /// Offending target phase.
        next: PhaseId,
    },
    /// A transition or start phase has no plan to run.
    #[error("phase {0} has no plan")]
    MissingPlan(PhaseId),
    /// Dash impulses key off the homing counter, which must advance first.
    #[error("phase {0} dashes without a preceding homing barrage")]
    DashWithoutCadence(PhaseId),
    /// Scheduler periods are counted in whole ticks and must be non-zero.
    #[error("scheduler period must be at least one tick")]
    ZeroPeriod,
    /// Regeneration spreads healing over a non-zero number of ticks.
    #[error("regeneration budget must be at least one tick")]
    ZeroRegenBudget,
    /// An actor cannot be created without health.
    #[error("maximum health must be positive")]
    ZeroMaxHealth,
    /// A speed, distance or scale is not finite or lies outside its bounds.
    #[error("{field} must be {expected}, got {value}")]
    TuningOutOfRange {
        /// Name of the offending field.
        field: &'static str,
        /// Human-readable bound.
        expected: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// A random draw range has no values to draw from.
    #[error("{field} range [{min}, {max}) is empty")]
    EmptyRange {
        /// Name of the offending field.
        field: &'static str,
        /// Inclusive lower bound.
        min: f32,
        /// Exclusive upper bound.
        max: f32,
    },
    /// A profile document could not be parsed.
    #[error("malformed encounter profile: {0}")]
    Parse(#[from] serde_json::Error),
}

impl ConfigError {
    /// Accepts finite values `>= 0`.
    pub(crate) fn non_negative(field: &'static str, value: f32) -> Result<(), Self> {
        if value.is_finite() && value >= 0.0 {
            Ok(())
        } else {
            Err(Self::TuningOutOfRange {
                field,
                expected: "finite and >= 0",
                value,
            })
        }
    }

    /// Accepts finite values `> 0`.
    pub(crate) fn positive(field: &'static str, value: f32) -> Result<(), Self> {
        if value.is_finite() && value > 0.0 {
            Ok(())
        } else {
            Err(Self::TuningOutOfRange {
                field,
                expected: "finite and > 0",
                value,
            })
        }
    }

    /// Accepts any finite value.
    pub(crate) fn finite(field: &'static str, value: f32) -> Result<(), Self> {
        if value.is_finite() {
            Ok(())
        } else {
            Err(Self::TuningOutOfRange {
                field,
                expected: "finite",
                value,
            })
        }
    }

    /// Accepts finite half-open ranges `[min, max)` holding at least one value.
    pub(crate) fn draw_range(field: &'static str, (min, max): (f32, f32)) -> Result<(), Self> {
        if min.is_finite() && max.is_finite() && min < max {
            Ok(())
        } else {
            Err(Self::EmptyRange { field, min, max })
        }
    }
}

/// A snapshot could not be applied to an actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ReplicationError {
    /// Only observers accept snapshots; the authority is the single writer.
    #[error("the authoritative encounter does not accept snapshots")]
    NotAnObserver,
    /// Phases never move backwards, even through replication.
    #[error("snapshot phase {offered} is behind local phase {current}")]
    PhaseRegression {
        /// Phase carried by the snapshot.
        offered: PhaseId,
        /// Phase already applied locally.
        current: PhaseId,
    },
    /// Snapshot health must lie within its own maximum.
    #[error("snapshot health {current} exceeds maximum {max}")]
    HealthOutOfRange {
        /// Offered current health.
        current: u32,
        /// Offered maximum health.
        max: u32,
    },
}
