//! The per-tick driver.
//!
//! [`Encounter::tick`] runs one fixed-order update of an actor:
//!
//! 1. Defeat check: a depleted actor roars, is removed, and nothing else runs.
//! 2. Target resolution, reacquiring the nearest eligible target if needed.
//! 3. Flee branch when no eligible target remains.
//! 4. Phase evaluation (authority only).
//! 5. Contact damage reset, then the phase's movement and schedulers.

use glam::Vec2;
use log::{info, trace, warn};

use crate::actor::Actor;
use crate::attack::{EffectCue, EncounterSink};
use crate::authority::{Authority, Role};
use crate::constants::DESPAWN_DELAY_TICKS;
use crate::error::ReplicationError;
use crate::movement::flee;
use crate::phase::PhaseId;
use crate::profile::EncounterProfile;
use crate::replication::Snapshot;
use crate::target::{Target, TargetRegistry};

/// Borrowed collaborators for one tick of movement and attacks.
pub struct TickContext<'a> {
    /// The resolved, eligible target for this tick.
    pub target: Target,
    /// Lookup for reacquiring targets.
    pub registry: &'a dyn TargetRegistry,
    /// Receives attacks and cues.
    pub sink: &'a mut dyn EncounterSink,
    /// Present only on the authoritative instance.
    pub authority: Option<&'a mut Authority>,
}

/// What a tick did with the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Fighting in the given phase.
    Engaged {
        /// Phase after this tick's evaluation.
        phase: PhaseId,
    },
    /// No eligible target; drifting away pending despawn.
    Fleeing,
    /// Defeated; the lifecycle manager was told to remove the actor.
    Removed,
}

/// One encounter instance bound to a profile and a network role.
#[derive(Debug, Clone)]
pub struct Encounter {
    profile: EncounterProfile,
    role: Role,
}

impl Encounter {
    /// Binds `profile` to this instance's `role`.
    #[must_use]
    pub fn new(profile: EncounterProfile, role: Role) -> Self {
        Self { profile, role }
    }

    /// The profile being run.
    #[must_use]
    pub const fn profile(&self) -> &EncounterProfile {
        &self.profile
    }

    /// Which side of the split this instance is.
    #[must_use]
    pub const fn role(&self) -> &Role {
        &self.role
    }

    /// Advances `actor` by one tick.
    pub fn tick(
        &mut self,
        actor: &mut Actor,
        registry: &dyn TargetRegistry,
        sink: &mut dyn EncounterSink,
    ) -> TickOutcome {
        if actor.health.is_depleted() {
            info!("Actor {:?} defeated", actor.id);
            sink.cue(EffectCue::DeathRoar { at: actor.center });
            sink.remove_now();
            return TickOutcome::Removed;
        }

        let Some(target) = resolve_target(actor, registry) else {
            flee(actor);
            sink.despawn_after(DESPAWN_DELAY_TICKS);
            info!("Actor {:?} lost its target and is fleeing", actor.id);
            return TickOutcome::Fleeing;
        };

        if let Some(authority) = self.role.authority_mut() {
            self.profile.transitions().evaluate(actor, authority);
        }

        actor.contact_damage = actor.base_damage;
        let phase = actor.phase;
        let Some(plan) = self.profile.plan(phase) else {
            warn!(
                "Profile {} has no plan for phase {phase}",
                self.profile.name()
            );
            return TickOutcome::Engaged { phase };
        };

        let mut ctx = TickContext {
            target,
            registry,
            sink,
            authority: self.role.authority_mut(),
        };
        plan.movement.apply(actor, &mut ctx);
        for attack in &plan.attacks {
            attack.run(actor, &mut ctx);
        }
        trace!(
            "Actor {:?} phase {phase} at {:?} moving {:?}",
            actor.id,
            actor.center,
            actor.velocity
        );
        TickOutcome::Engaged { phase }
    }

    /// Takes a snapshot if the last tick flagged the actor for replication,
    /// clearing the flag.
    ///
    /// Observers never produce snapshots.
    pub fn take_snapshot(&self, actor: &mut Actor) -> Option<Snapshot> {
        if !self.role.is_authoritative() || !actor.net_update {
            return None;
        }
        actor.net_update = false;
        Some(Snapshot::capture(actor))
    }

    /// Applies an authoritative snapshot on an observer.
    ///
    /// # Errors
    /// [`ReplicationError::NotAnObserver`] on the authoritative instance, or
    /// the snapshot's own validation error. Nothing is applied on error.
    pub fn apply_snapshot(
        &self,
        actor: &mut Actor,
        snapshot: &Snapshot,
    ) -> Result<(), ReplicationError> {
        if self.role.is_authoritative() {
            return Err(ReplicationError::NotAnObserver);
        }
        snapshot.apply_to(actor)
    }
}

/// Keeps the current target while it stays eligible, otherwise asks the
/// registry for the nearest eligible one.
fn resolve_target(actor: &mut Actor, registry: &dyn TargetRegistry) -> Option<Target> {
    let current = actor
        .target
        .and_then(|id| registry.target(id))
        .filter(Target::is_eligible);
    if current.is_some() {
        return current;
    }
    actor.target = registry.closest_eligible_target(actor.center);
    actor
        .target
        .and_then(|id| registry.target(id))
        .filter(Target::is_eligible)
}

/// Position the actor would reach after integrating its velocity once.
///
/// The encounter never integrates positions itself; hosts without their own
/// physics step can use this.
#[must_use]
pub fn integrate(actor: &Actor) -> Vec2 {
    actor.center + actor.velocity
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorId;
    use crate::attack::{LifecycleCommand, TickEffects};
    use crate::target::{TargetId, TargetRoster};
    use rstest::{fixture, rstest};

    #[fixture]
    fn roster() -> TargetRoster {
        let mut roster = TargetRoster::new();
        roster.upsert(Target::new(
            TargetId(1),
            Vec2::new(0.0, 0.0),
            Vec2::new(20.0, 42.0),
        ));
        roster
    }

    fn marsh_lord() -> (Encounter, Actor) {
        let profile = EncounterProfile::marsh_lord();
        let actor = profile
            .spawn(ActorId(1), Vec2::new(-500.0, 0.0))
            .expect("valid actor");
        (Encounter::new(profile, Role::authoritative(42)), actor)
    }

    #[rstest]
    fn depleted_actor_is_removed_without_acting(roster: TargetRoster) {
        let (mut encounter, mut actor) = marsh_lord();
        actor.health.set(0);
        let mut effects = TickEffects::default();
        let outcome = encounter.tick(&mut actor, &roster, &mut effects);
        assert_eq!(outcome, TickOutcome::Removed);
        assert_eq!(effects.lifecycle(), Some(LifecycleCommand::RemoveNow));
        assert!(effects.attacks().is_empty());
        assert_eq!(actor.velocity, Vec2::ZERO);
    }

    #[rstest]
    fn acquires_nearest_target_on_first_tick(roster: TargetRoster) {
        let (mut encounter, mut actor) = marsh_lord();
        let mut effects = TickEffects::default();
        let outcome = encounter.tick(&mut actor, &roster, &mut effects);
        assert_eq!(outcome, TickOutcome::Engaged { phase: PhaseId(0) });
        assert_eq!(actor.target, Some(TargetId(1)));
        assert!(actor.velocity.x > 0.0);
    }

    #[rstest]
    fn authority_commits_phase_before_acting(roster: TargetRoster) {
        let (mut encounter, mut actor) = marsh_lord();
        actor.health.set(15_000);
        let mut effects = TickEffects::default();
        let outcome = encounter.tick(&mut actor, &roster, &mut effects);
        assert_eq!(outcome, TickOutcome::Engaged { phase: PhaseId(1) });
        assert!(actor.flying);
        assert!(actor.destination.is_some());
        assert!(encounter.take_snapshot(&mut actor).is_some());
        assert!(encounter.take_snapshot(&mut actor).is_none());
    }

    #[rstest]
    fn observers_do_not_commit_phases(roster: TargetRoster) {
        let (_, mut actor) = marsh_lord();
        let mut observer = Encounter::new(EncounterProfile::marsh_lord(), Role::Observer);
        actor.health.set(1_000);
        let mut effects = TickEffects::default();
        observer.tick(&mut actor, &roster, &mut effects);
        assert_eq!(actor.phase(), PhaseId(0));
        assert!(observer.take_snapshot(&mut actor).is_none());
    }

    #[rstest]
    fn authority_refuses_snapshots() {
        let (encounter, mut actor) = marsh_lord();
        let snapshot = Snapshot::capture(&actor);
        assert_eq!(
            encounter.apply_snapshot(&mut actor, &snapshot),
            Err(ReplicationError::NotAnObserver)
        );
    }

    #[rstest]
    fn integration_adds_velocity() {
        let (_, mut actor) = marsh_lord();
        actor.velocity = Vec2::new(1.5, -2.0);
        assert_eq!(integrate(&actor), Vec2::new(-498.5, -2.0));
    }
}
