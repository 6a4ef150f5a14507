//! Requests the encounter hands to its external collaborators.
//!
//! Attacks, effect cues and lifecycle instructions flow out through an
//! [`EncounterSink`]. [`TickEffects`] is a buffering sink the host drains after
//! each tick.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::actor::ActorId;

/// Projectile archetype understood by the projectile spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectileKind {
    /// Straight aimed bolt.
    Laser,
    /// Seeker spawned near the target.
    Homing,
    /// Slow radial bolt.
    PurpleLaser,
    /// Player arrow.
    FrostArrow,
    /// Player arrow from the cursed bow.
    CursedFrostArrow,
}

/// One projectile to spawn. Not retained after hand-off.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttackRequest {
    /// Spawn position.
    pub origin: Vec2,
    /// Unit launch direction.
    pub direction: Vec2,
    /// Launch speed.
    pub speed: f32,
    /// What to spawn.
    pub kind: ProjectileKind,
    /// Damage on hit.
    pub damage: u32,
    /// Knockback on hit.
    pub knockback: f32,
    /// Actor credited with the hit.
    pub owner: ActorId,
}

impl AttackRequest {
    /// Launch velocity: `direction * speed`.
    #[must_use]
    pub fn velocity(&self) -> Vec2 {
        self.direction * self.speed
    }
}

/// Fire-and-forget presentation cues.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectCue {
    /// Second dash impulse.
    DashCry {
        /// Where the cue plays.
        at: Vec2,
    },
    /// Third dash impulse.
    DashShriek {
        /// Where the cue plays.
        at: Vec2,
    },
    /// Dotted line from the actor towards its new destination.
    Trajectory {
        /// Start of the line.
        from: Vec2,
        /// The destination.
        to: Vec2,
        /// Number of markers along the line.
        markers: u32,
    },
    /// The actor has been defeated.
    DeathRoar {
        /// Where the cue plays.
        at: Vec2,
    },
}

/// Lifecycle instruction raised to the spawner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleCommand {
    /// Despawn once out of view, after the given number of ticks.
    DespawnAfter(u32),
    /// Remove immediately.
    RemoveNow,
}

/// Outbound interface to the projectile spawner, effect player and lifecycle
/// manager.
pub trait EncounterSink {
    /// Hands one projectile to the spawner.
    fn spawn_attack(&mut self, request: AttackRequest);
    /// Plays a presentation cue.
    fn cue(&mut self, cue: EffectCue);
    /// Asks for the actor to despawn after `ticks`.
    fn despawn_after(&mut self, ticks: u32);
    /// Asks for the actor to be removed at once.
    fn remove_now(&mut self);
}

/// Buffers everything one tick produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEffects {
    attacks: Vec<AttackRequest>,
    cues: Vec<EffectCue>,
    lifecycle: Option<LifecycleCommand>,
}

impl TickEffects {
    /// Projectiles requested so far.
    #[must_use]
    pub fn attacks(&self) -> &[AttackRequest] {
        &self.attacks
    }

    /// Cues played so far.
    #[must_use]
    pub fn cues(&self) -> &[EffectCue] {
        &self.cues
    }

    /// The most recent lifecycle instruction, if any.
    #[must_use]
    pub const fn lifecycle(&self) -> Option<LifecycleCommand> {
        self.lifecycle
    }

    /// Takes the buffered projectiles.
    pub fn drain_attacks(&mut self) -> std::vec::Drain<'_, AttackRequest> {
        self.attacks.drain(..)
    }

    /// Takes the buffered cues.
    pub fn drain_cues(&mut self) -> std::vec::Drain<'_, EffectCue> {
        self.cues.drain(..)
    }

    /// Empties all buffers, ready for the next tick.
    pub fn clear(&mut self) {
        self.attacks.clear();
        self.cues.clear();
        self.lifecycle = None;
    }

    /// Whether nothing was emitted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.attacks.is_empty() && self.cues.is_empty() && self.lifecycle.is_none()
    }
}

impl EncounterSink for TickEffects {
    fn spawn_attack(&mut self, request: AttackRequest) {
        self.attacks.push(request);
    }

    fn cue(&mut self, cue: EffectCue) {
        self.cues.push(cue);
    }

    fn despawn_after(&mut self, ticks: u32) {
        self.lifecycle = Some(LifecycleCommand::DespawnAfter(ticks));
    }

    fn remove_now(&mut self) {
        self.lifecycle = Some(LifecycleCommand::RemoveNow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn sample_request() -> AttackRequest {
        AttackRequest {
            origin: Vec2::ZERO,
            direction: Vec2::X,
            speed: 10.0,
            kind: ProjectileKind::Laser,
            damage: 12,
            knockback: 0.0,
            owner: ActorId(1),
        }
    }

    #[rstest]
    fn buffers_and_drains_attacks() {
        let mut effects = TickEffects::default();
        assert!(effects.is_empty());
        effects.spawn_attack(sample_request());
        effects.cue(EffectCue::DeathRoar { at: Vec2::ZERO });
        assert_eq!(effects.attacks().len(), 1);
        let drained: Vec<_> = effects.drain_attacks().collect();
        assert_eq!(drained, vec![sample_request()]);
        assert!(effects.attacks().is_empty());
        assert_eq!(effects.cues().len(), 1);
    }

    #[rstest]
    fn later_lifecycle_command_wins() {
        let mut effects = TickEffects::default();
        effects.despawn_after(30);
        effects.remove_now();
        assert_eq!(effects.lifecycle(), Some(LifecycleCommand::RemoveNow));
        effects.clear();
        assert!(effects.is_empty());
    }

    #[rstest]
    fn velocity_scales_direction() {
        assert_eq!(sample_request().velocity(), Vec2::new(10.0, 0.0));
    }
}
