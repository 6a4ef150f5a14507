//! Targets the encounter pursues and the registry it resolves them from.
//!
//! Targets belong to the host simulation. The encounter only reads them and
//! asks the registry for the nearest eligible one when it needs a new target.

use glam::Vec2;
use hashbrown::HashMap;
use serde::{Deserialize, Serialize};

/// Identifier of a pursuable target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub u32);

/// Read-only view of a target for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Registry key.
    pub id: TargetId,
    /// Centre position.
    pub center: Vec2,
    /// Velocity in units per tick.
    pub velocity: Vec2,
    /// Bounding box extent.
    pub size: Vec2,
    /// `false` once the target has died.
    pub alive: bool,
    /// `false` once the target has left the simulation.
    pub active: bool,
}

impl Target {
    /// A live, active target at rest.
    #[must_use]
    pub fn new(id: TargetId, center: Vec2, size: Vec2) -> Self {
        Self {
            id,
            center,
            velocity: Vec2::ZERO,
            size,
            alive: true,
            active: true,
        }
    }

    /// Whether the encounter may keep fighting this target.
    #[must_use]
    pub const fn is_eligible(&self) -> bool {
        self.alive && self.active
    }

    /// Midpoint of the top edge (y grows downward).
    #[must_use]
    pub fn top(&self) -> Vec2 {
        Vec2::new(self.center.x, self.center.y - self.size.y / 2.0)
    }

    /// Y coordinate of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.center.y + self.size.y / 2.0
    }
}

/// Lookup of targets owned by the host simulation.
pub trait TargetRegistry {
    /// Current view of `id`, if the registry still knows it.
    fn target(&self, id: TargetId) -> Option<Target>;

    /// Nearest target that is alive and active, measured from `from`.
    fn closest_eligible_target(&self, from: Vec2) -> Option<TargetId>;
}

/// In-memory registry used by the headless runner and tests.
#[derive(Debug, Clone, Default)]
pub struct TargetRoster {
    targets: HashMap<TargetId, Target>,
}

impl TargetRoster {
    /// An empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a target.
    pub fn upsert(&mut self, target: Target) {
        self.targets.insert(target.id, target);
    }

    /// Mutable access for the host to move or kill a target.
    pub fn get_mut(&mut self, id: TargetId) -> Option<&mut Target> {
        self.targets.get_mut(&id)
    }

    /// Drops a target, returning its last view.
    pub fn remove(&mut self, id: TargetId) -> Option<Target> {
        self.targets.remove(&id)
    }
}

impl TargetRegistry for TargetRoster {
    fn target(&self, id: TargetId) -> Option<Target> {
        self.targets.get(&id).copied()
    }

    fn closest_eligible_target(&self, from: Vec2) -> Option<TargetId> {
        self.targets
            .values()
            .filter(|t| t.is_eligible())
            .map(|t| (t.center.distance_squared(from), t.id))
            // Ties resolve to the lower id so every instance agrees.
            .min_by(|(da, ia), (db, ib)| da.total_cmp(db).then(ia.cmp(ib)))
            .map(|(_, id)| id)
    }
}
