//! Health-gated phase progression.
//!
//! A [`PhaseTable`] lists transitions `threshold → next phase (+ entry
//! actions)`. Each authoritative tick walks the table from the highest target
//! phase down and commits the first transition whose threshold the current
//! health has crossed. The walk stops as soon as it reaches a phase the actor
//! already holds, so phases only ever increase and re-evaluation is a no-op.

use std::fmt;

use log::info;
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::authority::Authority;
use crate::error::ConfigError;

/// Ordinal of an encounter phase; the encounter starts in phase zero.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct PhaseId(pub u8);

impl PhaseId {
    /// Phase every actor spawns in.
    pub const START: Self = Self(0);
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// State reset or latched when a phase is entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryAction {
    /// Stop obeying gravity.
    EnableFlight,
    /// Make the full heal budget available again.
    ResetRegeneration,
    /// Drop any stored relocation point so a fresh one is chosen.
    ClearDestination,
}

impl EntryAction {
    fn apply(self, actor: &mut Actor) {
        match self {
            Self::EnableFlight => actor.flying = true,
            Self::ResetRegeneration => actor.timers.regen.reset(),
            Self::ClearDestination => actor.destination = None,
        }
    }
}

/// One row of the transition table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseTransition {
    /// Fraction of maximum health at or below which the transition fires.
    pub threshold: f64,
    /// Phase committed when the threshold is crossed.
    pub next: PhaseId,
    /// Applied once, in order, on entering `next`.
    #[serde(default)]
    pub entry: Vec<EntryAction>,
}

impl PhaseTransition {
    /// Transition into `next` with no entry actions.
    #[must_use]
    pub fn new(threshold: f64, next: PhaseId) -> Self {
        Self {
            threshold,
            next,
            entry: Vec::new(),
        }
    }

    /// Appends an entry action.
    #[must_use]
    pub fn on_entry(mut self, action: EntryAction) -> Self {
        self.entry.push(action);
        self
    }
}

/// Validated transition table, ordered by ascending target phase.
///
/// # Examples
///
/// ```
/// use talon::phase::{PhaseId, PhaseTable, PhaseTransition};
/// let table = PhaseTable::new(vec![
///     PhaseTransition::new(0.75, PhaseId(1)),
///     PhaseTransition::new(0.2, PhaseId(2)),
/// ])
/// .expect("valid table");
/// assert_eq!(table.final_phase(), PhaseId(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<PhaseTransition>", into = "Vec<PhaseTransition>")]
pub struct PhaseTable {
    transitions: Vec<PhaseTransition>,
}

impl PhaseTable {
    /// Validates and stores `transitions`.
    ///
    /// # Errors
    /// Returns [`ConfigError::ThresholdOutOfRange`] for thresholds outside
    /// `(0, 1]` and [`ConfigError::TransitionOrder`] unless target phases
    /// strictly increase from phase one onwards.
    pub fn new(transitions: Vec<PhaseTransition>) -> Result<Self, ConfigError> {
        let mut previous = PhaseId::START;
        for transition in &transitions {
            if !(transition.threshold > 0.0 && transition.threshold <= 1.0) {
                return Err(ConfigError::ThresholdOutOfRange(transition.threshold));
            }
            if transition.next <= previous {
                return Err(ConfigError::TransitionOrder {
                    previous,
                    next: transition.next,
                });
            }
            previous = transition.next;
        }
        Ok(Self { transitions })
    }

    /// Wraps a table known to be valid, such as a built-in profile's.
    pub(crate) fn from_validated(transitions: Vec<PhaseTransition>) -> Self {
        debug_assert!(Self::new(transitions.clone()).is_ok());
        Self { transitions }
    }

    /// Rows in table order.
    #[must_use]
    pub fn transitions(&self) -> &[PhaseTransition] {
        &self.transitions
    }

    /// Highest phase reachable through the table.
    #[must_use]
    pub fn final_phase(&self) -> PhaseId {
        self.transitions
            .last()
            .map_or(PhaseId::START, |transition| transition.next)
    }

    /// Evaluates the table against the actor's health and commits at most
    /// one transition.
    ///
    /// Requires the [`Authority`] capability: observers receive the phase
    /// through replication instead. On commit the entry actions run and the
    /// actor is flagged for replication.
    pub fn evaluate(&self, actor: &mut Actor, _authority: &Authority) -> Option<PhaseId> {
        for transition in self.transitions.iter().rev() {
            if actor.phase >= transition.next {
                return None;
            }
            if actor.health.at_or_below(transition.threshold) {
                commit(actor, transition);
                return Some(transition.next);
            }
        }
        None
    }
}

fn commit(actor: &mut Actor, transition: &PhaseTransition) {
    info!(
        "Actor {:?} entering phase {} at {}/{} health",
        actor.id,
        transition.next,
        actor.health.current(),
        actor.health.max()
    );
    actor.phase = transition.next;
    for action in &transition.entry {
        action.apply(actor);
    }
    actor.net_update = true;
}

impl TryFrom<Vec<PhaseTransition>> for PhaseTable {
    type Error = ConfigError;

    fn try_from(transitions: Vec<PhaseTransition>) -> Result<Self, Self::Error> {
        Self::new(transitions)
    }
}

impl From<PhaseTable> for Vec<PhaseTransition> {
    fn from(table: PhaseTable) -> Self {
        table.transitions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorId;
    use glam::Vec2;
    use rstest::{fixture, rstest};

    #[fixture]
    fn three_phase() -> PhaseTable {
        PhaseTable::new(vec![
            PhaseTransition::new(0.75, PhaseId(1)).on_entry(EntryAction::EnableFlight),
            PhaseTransition::new(0.2, PhaseId(2)).on_entry(EntryAction::ResetRegeneration),
        ])
        .expect("valid table")
    }

    #[fixture]
    fn actor() -> Actor {
        Actor::new(ActorId(1), Vec2::ZERO, Vec2::splat(60.0), 20_000, 40).expect("valid actor")
    }

    #[fixture]
    fn authority() -> Authority {
        Authority::seeded(0)
    }

    #[rstest]
    #[case(15_001, None)]
    #[case(15_000, Some(PhaseId(1)))]
    #[case(4_000, Some(PhaseId(2)))]
    fn commits_on_inclusive_threshold(
        three_phase: PhaseTable,
        mut actor: Actor,
        authority: Authority,
        #[case] health: u32,
        #[case] expected: Option<PhaseId>,
    ) {
        actor.health.set(health);
        assert_eq!(three_phase.evaluate(&mut actor, &authority), expected);
        assert_eq!(actor.replication_pending(), expected.is_some());
    }

    #[rstest]
    fn large_hit_skips_straight_to_final_phase(
        three_phase: PhaseTable,
        mut actor: Actor,
        authority: Authority,
    ) {
        actor.health.set(100);
        assert_eq!(
            three_phase.evaluate(&mut actor, &authority),
            Some(PhaseId(2))
        );
        assert!(!actor.flying);
    }

    #[rstest]
    fn entry_actions_run_on_commit(
        three_phase: PhaseTable,
        mut actor: Actor,
        authority: Authority,
    ) {
        actor.health.set(10_000);
        three_phase.evaluate(&mut actor, &authority);
        assert!(actor.flying);
    }

    #[rstest]
    fn phases_never_regress_when_healed(
        three_phase: PhaseTable,
        mut actor: Actor,
        authority: Authority,
    ) {
        let script = [20_000, 14_000, 20_000, 3_000, 20_000, 15_000, 0];
        let mut seen = Vec::new();
        for health in script {
            actor.health.set(health);
            three_phase.evaluate(&mut actor, &authority);
            seen.push(actor.phase());
        }
        assert!(seen.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(seen.last(), Some(&PhaseId(2)));
    }

    #[rstest]
    fn re_evaluation_is_a_no_op(three_phase: PhaseTable, mut actor: Actor, authority: Authority) {
        actor.health.set(12_000);
        assert!(three_phase.evaluate(&mut actor, &authority).is_some());
        actor.net_update = false;
        assert_eq!(three_phase.evaluate(&mut actor, &authority), None);
        assert!(!actor.replication_pending());
    }

    #[rstest]
    #[case(vec![PhaseTransition::new(0.0, PhaseId(1))])]
    #[case(vec![PhaseTransition::new(1.5, PhaseId(1))])]
    #[case(vec![PhaseTransition::new(f64::NAN, PhaseId(1))])]
    fn rejects_thresholds_outside_unit_interval(#[case] rows: Vec<PhaseTransition>) {
        assert!(matches!(
            PhaseTable::new(rows),
            Err(ConfigError::ThresholdOutOfRange(_))
        ));
    }

    #[rstest]
    fn rejects_unordered_targets() {
        let rows = vec![
            PhaseTransition::new(0.5, PhaseId(2)),
            PhaseTransition::new(0.2, PhaseId(1)),
        ];
        assert!(matches!(
            PhaseTable::new(rows),
            Err(ConfigError::TransitionOrder { .. })
        ));
        assert!(PhaseTable::new(vec![PhaseTransition::new(0.5, PhaseId(0))]).is_err());
    }
}
