//! Convenience constructors for targets and rosters used in tests.

use glam::Vec2;
use talon::target::{Target, TargetId, TargetRoster};

/// Bounding box of a standard player-sized target.
pub const PLAYER_SIZE: Vec2 = Vec2::new(20.0, 42.0);

/// Fluent builder for a [`Target`].
///
/// # Examples
/// ```
/// use test_utils::PlayerTarget;
/// let target = PlayerTarget::new(3).at(10.0, 20.0).moving(2.0, 0.0).build();
/// assert_eq!(target.center.x, 10.0);
/// assert!(target.is_eligible());
/// ```
#[derive(Clone, Copy, Debug)]
pub struct PlayerTarget {
    target: Target,
}

impl PlayerTarget {
    /// Live player-sized target at the origin.
    pub fn new(id: u32) -> Self {
        Self {
            target: Target::new(TargetId(id), Vec2::ZERO, PLAYER_SIZE),
        }
    }

    /// Moves the target to `(x, y)`.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.target.center = Vec2::new(x, y);
        self
    }

    /// Sets the target velocity.
    pub fn moving(mut self, vx: f32, vy: f32) -> Self {
        self.target.velocity = Vec2::new(vx, vy);
        self
    }

    /// Marks the target as dead.
    pub fn dead(mut self) -> Self {
        self.target.alive = false;
        self
    }

    /// Marks the target as having left the simulation.
    pub fn inactive(mut self) -> Self {
        self.target.active = false;
        self
    }

    /// Finishes the builder.
    pub fn build(self) -> Target {
        self.target
    }
}

/// Live player-sized target with id `id` at `(x, y)`.
pub fn target_at(id: u32, x: f32, y: f32) -> Target {
    PlayerTarget::new(id).at(x, y).build()
}

/// Roster holding `targets`.
pub fn roster_with(targets: impl IntoIterator<Item = Target>) -> TargetRoster {
    let mut roster = TargetRoster::new();
    for target in targets {
        roster.upsert(target);
    }
    roster
}
