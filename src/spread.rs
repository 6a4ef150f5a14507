//! Procedural projectile spreads.
//!
//! A [`SpreadPattern`] describes how many directions to derive from one base
//! direction and at which angular offsets. [`spread`] is a pure function: the
//! same base and pattern always produce the same ordered directions.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::vector_math::rotated;

/// Serialised form of a spread pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum SpreadMode {
    /// `count` directions evenly covering `arc` radians centred on the base.
    EvenArc {
        /// Number of directions.
        count: usize,
        /// Total arc width in radians.
        arc: f32,
    },
    /// One direction per listed offset, in list order.
    FixedOffsets {
        /// Offsets in radians relative to the base direction.
        offsets: Vec<f32>,
    },
}

/// A validated spread description.
///
/// # Examples
///
/// ```
/// use talon::spread::SpreadPattern;
/// assert!(SpreadPattern::even_arc(0, 1.0).is_err());
/// let pattern = SpreadPattern::stepped(3, 5f32.to_radians()).expect("valid spread");
/// assert_eq!(pattern.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SpreadMode", into = "SpreadMode")]
pub struct SpreadPattern(SpreadMode);

impl SpreadPattern {
    /// Wraps a mode known to be valid, such as a built-in preset's.
    pub(crate) fn from_validated(mode: SpreadMode) -> Self {
        debug_assert!(Self::try_from(mode.clone()).is_ok());
        Self(mode)
    }

    /// Four directions: along the base, opposite it, then the two
    /// perpendiculars (`+90°` before `-90°`).
    #[must_use]
    pub fn cardinal() -> Self {
        Self(SpreadMode::FixedOffsets {
            offsets: vec![
                0.0,
                std::f32::consts::PI,
                std::f32::consts::FRAC_PI_2,
                -std::f32::consts::FRAC_PI_2,
            ],
        })
    }

    /// Evenly distributes `count` directions over an arc of `arc` radians.
    ///
    /// # Errors
    /// Returns [`ConfigError::EmptySpread`] when `count` is zero and
    /// [`ConfigError::NonFiniteAngle`] for a non-finite arc.
    pub fn even_arc(count: usize, arc: f32) -> Result<Self, ConfigError> {
        Self::try_from(SpreadMode::EvenArc { count, arc })
    }

    /// Even arc whose neighbouring directions sit `step` radians apart.
    ///
    /// `stepped(3, 5°)` yields offsets `-5°, 0°, +5°`.
    ///
    /// # Errors
    /// As for [`SpreadPattern::even_arc`].
    pub fn stepped(count: usize, step: f32) -> Result<Self, ConfigError> {
        let gaps = count.saturating_sub(1) as f32;
        Self::even_arc(count, step * gaps)
    }

    /// Uses caller-supplied offsets verbatim.
    ///
    /// # Errors
    /// Returns [`ConfigError::EmptySpread`] for an empty list and
    /// [`ConfigError::NonFiniteAngle`] for any non-finite offset.
    pub fn fixed_offsets(offsets: Vec<f32>) -> Result<Self, ConfigError> {
        Self::try_from(SpreadMode::FixedOffsets { offsets })
    }

    /// Offsets `0, +step, -2·step, +3·step, -4·step, …`.
    ///
    /// # Errors
    /// As for [`SpreadPattern::fixed_offsets`].
    pub fn alternating(count: usize, step: f32) -> Result<Self, ConfigError> {
        Self::fixed_offsets(alternating_offsets(count, step))
    }

    /// Number of directions the pattern produces.
    #[must_use]
    pub fn len(&self) -> usize {
        match &self.0 {
            SpreadMode::EvenArc { count, .. } => *count,
            SpreadMode::FixedOffsets { offsets } => offsets.len(),
        }
    }

    /// Patterns are never empty; provided for API symmetry with [`len`](Self::len).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Angular offsets in radians, in emission order.
    #[must_use]
    pub fn angles(&self) -> Vec<f32> {
        match &self.0 {
            SpreadMode::EvenArc { count: 1, .. } => vec![0.0],
            SpreadMode::EvenArc { count, arc } => {
                let half = arc / 2.0;
                let last = (*count - 1) as f32;
                (0..*count)
                    .map(|i| lerp(-half, half, i as f32 / last))
                    .collect()
            }
            SpreadMode::FixedOffsets { offsets } => offsets.clone(),
        }
    }
}

impl TryFrom<SpreadMode> for SpreadPattern {
    type Error = ConfigError;

    fn try_from(mode: SpreadMode) -> Result<Self, Self::Error> {
        match &mode {
            SpreadMode::EvenArc { count, arc } => {
                if *count == 0 {
                    return Err(ConfigError::EmptySpread);
                }
                if !arc.is_finite() {
                    return Err(ConfigError::NonFiniteAngle(*arc));
                }
            }
            SpreadMode::FixedOffsets { offsets } => {
                if offsets.is_empty() {
                    return Err(ConfigError::EmptySpread);
                }
                if let Some(bad) = offsets.iter().find(|o| !o.is_finite()) {
                    return Err(ConfigError::NonFiniteAngle(*bad));
                }
            }
        }
        Ok(Self(mode))
    }
}

impl From<SpreadPattern> for SpreadMode {
    fn from(pattern: SpreadPattern) -> Self {
        pattern.0
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

/// Offsets `0, +step, -2·step, …` for `count` directions.
pub(crate) fn alternating_offsets(count: usize, step: f32) -> Vec<f32> {
    (0..count)
        .map(|i| {
            let magnitude = step * i as f32;
            if i % 2 == 0 {
                -magnitude
            } else {
                magnitude
            }
        })
        .collect()
}

/// Rotates `base` by every offset of `pattern`, preserving order and length.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use talon::spread::{spread, SpreadPattern};
/// let pattern = SpreadPattern::even_arc(1, 1.0).expect("valid spread");
/// assert_eq!(spread(Vec2::X, &pattern), vec![Vec2::X]);
/// ```
#[must_use]
pub fn spread(base: Vec2, pattern: &SpreadPattern) -> Vec<Vec2> {
    pattern
        .angles()
        .into_iter()
        .map(|angle| rotated(base, angle))
        .collect()
}
