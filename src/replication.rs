//! Authority-to-observer state transfer.
//!
//! The authoritative instance is the single writer. Whenever a tick sets the
//! actor's replication flag, the host takes a [`Snapshot`] and ships it to
//! every observer, which applies it whole. Snapshots carry everything an
//! observer cannot derive locally: phase, kinematics, health, latches and the
//! scheduler counters.

use glam::Vec2;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, EncounterTimers, Facing, Health};
use crate::error::ReplicationError;
use crate::phase::PhaseId;
use crate::target::TargetId;

/// Complete replicated view of one actor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Committed phase.
    pub phase: PhaseId,
    /// Centre position.
    pub center: Vec2,
    /// Velocity in units per tick.
    pub velocity: Vec2,
    /// Sprite rotation in radians.
    pub rotation: f32,
    /// Horizontal facing.
    pub facing: Facing,
    /// Current health.
    pub health: u32,
    /// Health ceiling.
    pub max_health: u32,
    /// Whether gravity and tile collision are ignored.
    pub flying: bool,
    /// Damage dealt on touch.
    pub contact_damage: u32,
    /// Encounter counters.
    pub timers: EncounterTimers,
    /// Pending seek destination.
    pub destination: Option<Vec2>,
    /// Current pursuit target.
    pub target: Option<TargetId>,
}

impl Snapshot {
    /// Captures the replicated fields of `actor`.
    #[must_use]
    pub fn capture(actor: &Actor) -> Self {
        Self {
            phase: actor.phase,
            center: actor.center,
            velocity: actor.velocity,
            rotation: actor.rotation,
            facing: actor.facing,
            health: actor.health.current(),
            max_health: actor.health.max(),
            flying: actor.flying,
            contact_damage: actor.contact_damage,
            timers: actor.timers,
            destination: actor.destination,
            target: actor.target,
        }
    }

    /// Checks the snapshot against the receiving actor without changing it.
    ///
    /// # Errors
    /// [`ReplicationError::PhaseRegression`] when the snapshot is behind the
    /// local phase, [`ReplicationError::HealthOutOfRange`] for inconsistent
    /// health.
    pub fn validate(&self, actor: &Actor) -> Result<Health, ReplicationError> {
        if self.phase < actor.phase {
            return Err(ReplicationError::PhaseRegression {
                offered: self.phase,
                current: actor.phase,
            });
        }
        Health::from_parts(self.health, self.max_health).ok_or(
            ReplicationError::HealthOutOfRange {
                current: self.health,
                max: self.max_health,
            },
        )
    }

    /// Overwrites the actor's replicated state with this snapshot.
    ///
    /// Either every field is applied or, on error, none is. The local
    /// destination edge tracker is left alone so the observer still cues the
    /// telegraph when it first sees a new destination.
    pub(crate) fn apply_to(&self, actor: &mut Actor) -> Result<(), ReplicationError> {
        let health = self.validate(actor).inspect_err(|error| {
            warn!("Actor {:?} rejected snapshot: {error}", actor.id);
        })?;
        actor.phase = self.phase;
        actor.center = self.center;
        actor.velocity = self.velocity;
        actor.rotation = self.rotation;
        actor.facing = self.facing;
        actor.health = health;
        actor.flying = self.flying;
        actor.contact_damage = self.contact_damage;
        actor.timers = self.timers;
        actor.destination = self.destination;
        actor.target = self.target;
        Ok(())
    }
}
