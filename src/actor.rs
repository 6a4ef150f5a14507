//! The actor record the encounter drives each tick.
//!
//! The lifecycle manager creates an [`Actor`] with its maximum health and
//! phase zero; the encounter mutates it in place every tick. Scheduler state
//! lives in [`EncounterTimers`] rather than anonymous scratch slots.
use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::phase::PhaseId;
use crate::schedule::{CycleTimer, RegenBudget};
use crate::target::TargetId;

/// Stable identifier of an actor, used as the owner of its projectiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActorId(pub u32);

/// Current and maximum health. `current` always lies in `[0, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    current: u32,
    max: u32,
}

impl Health {
    /// Full health.
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroMaxHealth`] when `max` is zero.
    pub fn new(max: u32) -> Result<Self, ConfigError> {
        if max == 0 {
            return Err(ConfigError::ZeroMaxHealth);
        }
        Ok(Self { current: max, max })
    }

    /// Rebuilds health from replicated parts, rejecting values above `max`.
    pub(crate) fn from_parts(current: u32, max: u32) -> Option<Self> {
        (max > 0 && current <= max).then_some(Self { current, max })
    }

    /// Current health.
    #[must_use]
    pub const fn current(&self) -> u32 {
        self.current
    }

    /// Maximum health.
    #[must_use]
    pub const fn max(&self) -> u32 {
        self.max
    }

    /// Sets current health, clamped to the maximum.
    pub fn set(&mut self, value: u32) {
        self.current = value.min(self.max);
    }

    /// Applies damage, saturating at zero.
    pub fn damage(&mut self, amount: u32) {
        self.current = self.current.saturating_sub(amount);
    }

    /// `current / max` as a fraction in `[0, 1]`.
    #[must_use]
    pub fn ratio(&self) -> f64 {
        f64::from(self.current) / f64::from(self.max)
    }

    /// Whether health is at or below `fraction` of the maximum.
    ///
    /// The boundary is inclusive: 15000 of 20000 is at or below `0.75`.
    #[must_use]
    pub fn at_or_below(&self, fraction: f64) -> bool {
        f64::from(self.current) <= f64::from(self.max) * fraction
    }

    /// Whether health has reached zero.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.current == 0
    }
}

/// Horizontal facing, used to pick the hover side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    /// Towards negative x.
    Left,
    /// Towards positive x.
    #[default]
    Right,
}

impl Facing {
    /// `-1.0` for left, `1.0` for right.
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The opposite side.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// Named scheduler and latch state carried across ticks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterTimers {
    /// Direct-fire cadence.
    pub direct_fire: CycleTimer,
    /// Homing barrage cadence; dashes key off the same counter.
    pub homing: CycleTimer,
    /// Completed homing cycles, capped; each one shortens the homing period.
    pub escalation: u32,
    /// Remaining ticks of multiplied contact damage after a dash impulse.
    pub dash_window: u32,
    /// Telegraphed relocation cadence.
    pub relocation: CycleTimer,
    /// Heal-to-full progress on entering the final phase.
    pub regen: RegenBudget,
    /// Radial barrage cadence.
    pub barrage: CycleTimer,
}

/// The controlled entity.
#[derive(Debug, Clone, PartialEq)]
pub struct Actor {
    /// Identity, stamped on every attack the actor owns.
    pub id: ActorId,
    /// Centre of the actor's bounding box.
    pub center: Vec2,
    /// Bounding box width and height.
    pub size: Vec2,
    /// Displacement per tick.
    pub velocity: Vec2,
    /// Sprite rotation in radians.
    pub rotation: f32,
    /// Side the actor hovers on.
    pub facing: Facing,
    /// Clamped health pool.
    pub health: Health,
    /// Contact damage before any temporary multiplier.
    pub base_damage: u32,
    /// Contact damage in effect this tick.
    pub contact_damage: u32,
    /// Whether the actor ignores gravity; external physics reads this.
    pub flying: bool,
    /// Target pursued last tick.
    pub target: Option<TargetId>,
    /// Relocation point chosen by the authority, if any.
    pub destination: Option<Vec2>,
    /// Destination seen on this instance's previous tick. Local only.
    pub(crate) last_destination: Option<Vec2>,
    /// Scheduler counters.
    pub timers: EncounterTimers,
    pub(crate) phase: PhaseId,
    pub(crate) net_update: bool,
}

impl Actor {
    /// Creates an actor at full health in phase zero.
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroMaxHealth`] when `max_health` is zero.
    pub fn new(
        id: ActorId,
        center: Vec2,
        size: Vec2,
        max_health: u32,
        base_damage: u32,
    ) -> Result<Self, ConfigError> {
        debug!("Creating actor {id:?} at {center:?} with {max_health} health");
        Ok(Self {
            id,
            center,
            size,
            velocity: Vec2::ZERO,
            rotation: 0.0,
            facing: Facing::default(),
            health: Health::new(max_health)?,
            base_damage,
            contact_damage: base_damage,
            flying: false,
            target: None,
            destination: None,
            last_destination: None,
            timers: EncounterTimers::default(),
            phase: PhaseId::START,
            net_update: false,
        })
    }

    /// Current phase. Only the phase machine and replication write it.
    #[must_use]
    pub const fn phase(&self) -> PhaseId {
        self.phase
    }

    /// Whether state changed that observers must receive.
    #[must_use]
    pub const fn replication_pending(&self) -> bool {
        self.net_update
    }

    /// Flags the actor for replication.
    pub fn mark_for_replication(&mut self) {
        self.net_update = true;
    }

    /// Top edge of the bounding box (y grows downward).
    #[must_use]
    pub fn top(&self) -> f32 {
        self.center.y - self.size.y / 2.0
    }
}
