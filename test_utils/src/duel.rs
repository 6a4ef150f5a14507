//! A host/observer pair fighting one target, for replication tests.

use glam::Vec2;
use talon::actor::{Actor, ActorId};
use talon::attack::TickEffects;
use talon::authority::Role;
use talon::encounter::{integrate, Encounter, TickOutcome};
use talon::profile::EncounterProfile;
use talon::target::TargetRoster;

use crate::builders::target_at;

/// Authoritative encounter, one observer mirror and a shared roster.
///
/// Each [`Duel::step`] ticks both sides, integrates positions and forwards
/// any snapshot the host produced.
#[derive(Clone, Debug)]
pub struct Duel {
    /// Authoritative encounter.
    pub host: Encounter,
    /// Actor driven by the host.
    pub host_actor: Actor,
    /// Observer encounter.
    pub observer: Encounter,
    /// Observer's copy of the actor.
    pub mirror: Actor,
    /// Targets shared by both sides.
    pub roster: TargetRoster,
    /// Everything the host emitted on the last step.
    pub effects: TickEffects,
    /// Everything the observer emitted on the last step.
    pub observer_effects: TickEffects,
    /// Snapshots forwarded so far.
    pub snapshots: usize,
}

impl Duel {
    /// The actor spawns at `spawn`; a single target with id `1` waits at
    /// `target`.
    ///
    /// # Panics
    /// Panics if the profile cannot spawn an actor.
    pub fn new(profile: EncounterProfile, seed: u64, spawn: Vec2, target: Vec2) -> Self {
        let host_actor = profile
            .spawn(ActorId(1), spawn)
            .unwrap_or_else(|err| panic!("profile should spawn an actor: {err}"));
        let mut roster = TargetRoster::new();
        roster.upsert(target_at(1, target.x, target.y));
        Self {
            host: Encounter::new(profile.clone(), Role::authoritative(seed)),
            mirror: host_actor.clone(),
            host_actor,
            observer: Encounter::new(profile, Role::Observer),
            roster,
            effects: TickEffects::default(),
            observer_effects: TickEffects::default(),
            snapshots: 0,
        }
    }

    /// Damages the host only and flags it for replication, as a server-side
    /// damage system would. The mirror learns of it from the next snapshot.
    pub fn damage_host(&mut self, amount: u32) {
        self.host_actor.health.damage(amount);
        self.host_actor.mark_for_replication();
    }

    /// Sets health on both sides, bypassing replication.
    pub fn set_health(&mut self, health: u32) {
        self.host_actor.health.set(health);
        self.mirror.health.set(health);
    }

    /// Runs one tick on both sides and returns the host's outcome.
    ///
    /// # Panics
    /// Panics if the observer rejects a host snapshot.
    pub fn step(&mut self) -> TickOutcome {
        self.effects.clear();
        self.observer_effects.clear();
        let outcome = self
            .host
            .tick(&mut self.host_actor, &self.roster, &mut self.effects);
        self.host_actor.center = integrate(&self.host_actor);
        self.observer
            .tick(&mut self.mirror, &self.roster, &mut self.observer_effects);
        self.mirror.center = integrate(&self.mirror);
        if let Some(snapshot) = self.host.take_snapshot(&mut self.host_actor) {
            self.observer
                .apply_snapshot(&mut self.mirror, &snapshot)
                .unwrap_or_else(|err| panic!("observer rejected snapshot: {err}"));
            self.snapshots += 1;
        }
        outcome
    }

    /// Runs `ticks` steps.
    pub fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.step();
        }
    }
}
