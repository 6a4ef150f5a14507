//! Player weapon volleys built on the spread generator.

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::actor::ActorId;
use crate::attack::{AttackRequest, ProjectileKind};
use crate::spread::{alternating_offsets, spread, SpreadMode, SpreadPattern};
use crate::vector_math::safe_normalize;

/// One trigger pull: a spread of identical projectiles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Volley {
    /// Directions relative to the aim.
    pub pattern: SpreadPattern,
    /// Projectile speed.
    pub speed: f32,
    /// Damage per projectile.
    pub damage: u32,
    /// Knockback per projectile.
    pub knockback: f32,
    /// Projectile kind.
    pub kind: ProjectileKind,
}

impl Volley {
    /// Three arrows, five degrees apart.
    #[must_use]
    pub fn frost_bow() -> Self {
        Self {
            pattern: SpreadPattern::from_validated(SpreadMode::EvenArc {
                count: 3,
                arc: 10f32.to_radians(),
            }),
            speed: 10.0,
            damage: 70,
            knockback: 5.0,
            kind: ProjectileKind::FrostArrow,
        }
    }

    /// Five arrows fanning out alternately to each side of the aim.
    #[must_use]
    pub fn cursed_frost_bow() -> Self {
        Self {
            pattern: SpreadPattern::from_validated(SpreadMode::FixedOffsets {
                offsets: alternating_offsets(5, 5f32.to_radians()),
            }),
            speed: 15.0,
            damage: 90,
            knockback: 5.0,
            kind: ProjectileKind::CursedFrostArrow,
        }
    }

    /// Fires from `origin` toward `aim`. A zero-length aim shoots straight up.
    #[must_use]
    pub fn fire(&self, origin: Vec2, aim: Vec2, owner: ActorId) -> Vec<AttackRequest> {
        let base = safe_normalize(aim - origin, Vec2::NEG_Y);
        debug!("{owner:?} fires {} x {:?}", self.pattern.len(), self.kind);
        spread(base, &self.pattern)
            .into_iter()
            .map(|direction| AttackRequest {
                origin,
                direction,
                speed: self.speed,
                kind: self.kind,
                damage: self.damage,
                knockback: self.knockback,
                owner,
            })
            .collect()
    }
}
