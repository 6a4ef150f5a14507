//! Single-writer discipline for randomised and health-gated decisions.
//!
//! Only the authoritative simulation owns an [`Authority`], and the only way
//! to draw randomness or commit a phase is through one. Observers hold
//! [`Role::Observer`] and therefore cannot reach those code paths at all; they
//! converge by applying replicated snapshots instead.

use std::ops::Range;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Capability held by the authoritative simulation instance.
///
/// Owns the encounter's random generator. Seeding makes every authoritative
/// run reproducible, which the tests rely on.
#[derive(Debug, Clone)]
pub struct Authority {
    rng: ChaCha8Rng,
}

impl Authority {
    /// Creates an authority whose generator starts from `seed`.
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Uniform float in `range` (half-open).
    ///
    /// `range` must be non-empty; scheduler validation guarantees it.
    pub(crate) fn float_in(&mut self, range: Range<f32>) -> f32 {
        debug_assert!(!range.is_empty(), "empty draw range {range:?}");
        self.rng.random_range(range)
    }

    /// Uniform integer in `range` (half-open).
    ///
    /// `range` must be non-empty; scheduler validation guarantees it.
    pub(crate) fn int_in(&mut self, range: Range<i32>) -> i32 {
        debug_assert!(!range.is_empty(), "empty draw range {range:?}");
        self.rng.random_range(range)
    }
}

/// Which side of the client/server split this simulation instance is.
#[derive(Debug, Clone)]
pub enum Role {
    /// The single instance that makes randomised and threshold decisions.
    Authoritative(Authority),
    /// An instance that mirrors replicated state.
    Observer,
}

impl Role {
    /// Authoritative role seeded with `seed`.
    #[must_use]
    pub fn authoritative(seed: u64) -> Self {
        Self::Authoritative(Authority::seeded(seed))
    }

    /// Whether this instance may make guarded decisions.
    #[must_use]
    pub const fn is_authoritative(&self) -> bool {
        matches!(self, Self::Authoritative(_))
    }

    /// The authority capability, or `None` on observers.
    pub fn authority_mut(&mut self) -> Option<&mut Authority> {
        match self {
            Self::Authoritative(authority) => Some(authority),
            Self::Observer => None,
        }
    }
}
