//! Inertial steering shared by every movement behaviour.
//!
//! A behaviour decides where it wants to go; [`steer`] decides how quickly the
//! actor's velocity gets there. Larger inertia means wider, smoother turns.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Validated steering inertia (finite, `>= 1.0`).
///
/// An inertia of `1.0` snaps straight to the desired velocity.
///
/// # Examples
///
/// ```
/// use talon::steering::Inertia;
/// assert!(Inertia::new(40.0).is_ok());
/// assert!(Inertia::new(0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "f32", into = "f32")]
pub struct Inertia(f32);

impl Inertia {
    /// Immediate response: the new velocity is the desired velocity.
    pub const SNAP: Self = Self(1.0);

    /// Validates an inertia value.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidInertia`] for non-finite values and
    /// values below `1.0`, which would overshoot or divide by zero.
    pub fn new(value: f32) -> Result<Self, ConfigError> {
        if value.is_finite() && value >= 1.0 {
            Ok(Self(value))
        } else {
            Err(ConfigError::InvalidInertia(value))
        }
    }

    /// Raw inertia value.
    #[must_use]
    pub const fn get(self) -> f32 {
        self.0
    }
}

impl TryFrom<f32> for Inertia {
    type Error = ConfigError;

    fn try_from(value: f32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Inertia> for f32 {
    fn from(inertia: Inertia) -> Self {
        inertia.0
    }
}

/// Blends `current` towards `desired`.
///
/// Computes `(current * (inertia - 1) + desired) / inertia`. Inputs are taken
/// by value and a fresh vector is returned.
///
/// # Examples
///
/// ```
/// use glam::Vec2;
/// use talon::steering::{steer, Inertia};
/// let inertia = Inertia::new(4.0).expect("valid inertia");
/// let next = steer(Vec2::ZERO, Vec2::new(8.0, 0.0), inertia);
/// assert_eq!(next, Vec2::new(2.0, 0.0));
/// ```
#[must_use]
pub fn steer(current: Vec2, desired: Vec2, inertia: Inertia) -> Vec2 {
    let weight = inertia.get();
    (current * (weight - 1.0) + desired) / weight
}
