#![cfg_attr(docsrs, feature(doc_cfg))]
//! Tick-driven boss encounter controller.
//!
//! An [`Encounter`] advances one [`Actor`] per fixed simulation tick: it
//! resolves a target, walks a health-gated phase table, steers with inertia
//! and runs the phase's attack schedulers. Attacks, cues and lifecycle
//! instructions leave through an [`EncounterSink`]. Randomised and
//! health-gated decisions require the [`Authority`] capability; observers
//! converge by applying [`Snapshot`]s.
pub mod actor;
pub mod attack;
pub mod attacks;
pub mod authority;
pub mod constants;
pub mod encounter;
pub mod error;
pub mod logging;
pub mod movement;
pub mod numeric;
pub mod phase;
pub mod profile;
pub mod replication;
pub mod schedule;
pub mod spread;
pub mod steering;
pub mod target;
pub mod vector_math;
pub mod weapon;

// Re-export commonly used items
pub use actor::{Actor, ActorId, Facing, Health};
pub use attack::{
    AttackRequest, EffectCue, EncounterSink, LifecycleCommand, ProjectileKind, TickEffects,
};
pub use authority::{Authority, Role};
pub use encounter::{Encounter, TickContext, TickOutcome};
pub use error::{ConfigError, ReplicationError};
pub use logging::init as init_logging;
pub use phase::{EntryAction, PhaseId, PhaseTable, PhaseTransition};
pub use profile::{EncounterProfile, PhasePlan};
pub use replication::Snapshot;
pub use spread::{spread, SpreadPattern};
pub use target::{Target, TargetId, TargetRegistry, TargetRoster};
pub use weapon::Volley;

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use talon::prelude::*;
    //! ```

    pub use crate::attacks::AttackPattern;
    pub use crate::movement::MovementBehavior;
    pub use crate::{
        Actor, ActorId, Encounter, EncounterProfile, EncounterSink, PhaseId, Role, Snapshot,
        Target, TargetId, TargetRegistry, TargetRoster, TickEffects, TickOutcome,
    };
    pub use glam::Vec2;
}
