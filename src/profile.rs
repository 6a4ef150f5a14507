//! Encounter profiles: the data that turns the generic state machine into a
//! particular boss.
//!
//! A profile pairs a [`PhaseTable`] with one [`PhasePlan`] per phase. Profiles
//! are validated when built or deserialised, so the tick path never meets an
//! inconsistent configuration.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, ActorId};
use crate::attacks::{
    AttackPattern, Dash, DirectFire, HomingBarrage, RadialBarrage, Regenerate, Relocation,
};
use crate::constants::FLANK_HOLD_RANGE;
use crate::error::ConfigError;
use crate::movement::{HoverFlank, MovementBehavior, SeekDestination, Walk};
use crate::phase::{EntryAction, PhaseId, PhaseTable, PhaseTransition};

/// What the actor does while in one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasePlan {
    /// Runs first each tick.
    pub movement: MovementBehavior,
    /// Schedulers, run in order after movement.
    #[serde(default)]
    pub attacks: Vec<AttackPattern>,
}

impl PhasePlan {
    /// Plan with `movement` and no attacks.
    #[must_use]
    pub fn new(movement: MovementBehavior) -> Self {
        Self {
            movement,
            attacks: Vec::new(),
        }
    }

    /// Appends `attack` after the existing schedulers.
    #[must_use]
    pub fn with(mut self, attack: AttackPattern) -> Self {
        self.attacks.push(attack);
        self
    }
}

/// Serialised form; converted through [`EncounterProfile::new`] so every
/// loaded profile is validated.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileDocument {
    name: String,
    max_health: u32,
    base_damage: u32,
    size: Vec2,
    #[serde(default)]
    transitions: PhaseTable,
    phases: Vec<PhasePlan>,
}

/// A validated encounter definition.
///
/// # Examples
///
/// ```
/// use talon::profile::EncounterProfile;
/// use talon::phase::PhaseId;
/// let profile = EncounterProfile::marsh_lord();
/// assert_eq!(profile.transitions().final_phase(), PhaseId(2));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileDocument", into = "ProfileDocument")]
pub struct EncounterProfile {
    name: String,
    max_health: u32,
    base_damage: u32,
    size: Vec2,
    transitions: PhaseTable,
    phases: Vec<PhasePlan>,
}

impl EncounterProfile {
    /// Validates and assembles a profile.
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroMaxHealth`] for a zero health pool,
    /// [`ConfigError::MissingPlan`] when a reachable phase has no plan,
    /// [`ConfigError::DashWithoutCadence`] when a dash is not preceded by a
    /// homing barrage in its plan, and any movement or scheduler validation
    /// error.
    pub fn new(
        name: impl Into<String>,
        max_health: u32,
        base_damage: u32,
        size: Vec2,
        transitions: PhaseTable,
        phases: Vec<PhasePlan>,
    ) -> Result<Self, ConfigError> {
        if max_health == 0 {
            return Err(ConfigError::ZeroMaxHealth);
        }
        let final_phase = transitions.final_phase();
        if phases.len() <= usize::from(final_phase.0) {
            let missing = u8::try_from(phases.len()).unwrap_or(u8::MAX);
            return Err(ConfigError::MissingPlan(PhaseId(missing)));
        }
        for (index, plan) in phases.iter().enumerate() {
            let phase = PhaseId(u8::try_from(index).unwrap_or(u8::MAX));
            plan.movement.validate()?;
            let mut cadence = false;
            for attack in &plan.attacks {
                attack.validate()?;
                match attack {
                    AttackPattern::HomingBarrage(_) => cadence = true,
                    AttackPattern::Dash(_) if !cadence => {
                        return Err(ConfigError::DashWithoutCadence(phase));
                    }
                    _ => {}
                }
            }
        }
        Ok(Self {
            name: name.into(),
            max_health,
            base_damage,
            size,
            transitions,
            phases,
        })
    }

    /// Parses and validates a JSON profile document.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed JSON and for documents
    /// that fail validation.
    pub fn from_json_str(source: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Airborne flanker: hovers beside the target firing lasers, then adds
    /// escalating homing barrages and dashes below half health.
    #[must_use]
    pub fn sky_warden() -> Self {
        let transitions = PhaseTable::from_validated(vec![PhaseTransition::new(0.5, PhaseId(1))]);
        let held = HoverFlank {
            hold_range: Some(FLANK_HOLD_RANGE),
            ..HoverFlank::default()
        };
        let phases = vec![
            PhasePlan::new(MovementBehavior::HoverFlank(HoverFlank::default()))
                .with(AttackPattern::DirectFire(DirectFire::default())),
            PhasePlan::new(MovementBehavior::HoverFlank(held))
                .with(AttackPattern::DirectFire(DirectFire::default()))
                .with(AttackPattern::HomingBarrage(HomingBarrage::default()))
                .with(AttackPattern::Dash(Dash::default())),
        ];
        Self {
            name: "Sky Warden".to_owned(),
            max_health: 20_000,
            base_damage: 12,
            size: Vec2::new(110.0, 110.0),
            transitions,
            phases,
        }
    }

    /// Ground walker that takes flight to relocate around the target, then
    /// heals and fires radial barrages in its final phase.
    #[must_use]
    pub fn marsh_lord() -> Self {
        let transitions = PhaseTable::from_validated(vec![
            PhaseTransition::new(0.75, PhaseId(1))
                .on_entry(EntryAction::EnableFlight)
                .on_entry(EntryAction::ClearDestination),
            PhaseTransition::new(0.2, PhaseId(2))
                .on_entry(EntryAction::EnableFlight)
                .on_entry(EntryAction::ResetRegeneration),
        ]);
        let phases = vec![
            PhasePlan::new(MovementBehavior::Walk(Walk::default())),
            PhasePlan::new(MovementBehavior::SeekDestination(SeekDestination::default()))
                .with(AttackPattern::Relocation(Relocation::default())),
            PhasePlan::new(MovementBehavior::Coast)
                .with(AttackPattern::Regenerate(Regenerate::default()))
                .with(AttackPattern::RadialBarrage(RadialBarrage::default())),
        ];
        Self {
            name: "Marsh Lord".to_owned(),
            max_health: 20_000,
            base_damage: 40,
            size: Vec2::new(120.0, 90.0),
            transitions,
            phases,
        }
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Health pool of spawned actors.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Contact damage outside dash windows.
    #[must_use]
    pub const fn base_damage(&self) -> u32 {
        self.base_damage
    }

    /// Health-gated phase transitions.
    #[must_use]
    pub const fn transitions(&self) -> &PhaseTable {
        &self.transitions
    }

    /// Plan for `phase`, if the profile defines one.
    #[must_use]
    pub fn plan(&self, phase: PhaseId) -> Option<&PhasePlan> {
        self.phases.get(usize::from(phase.0))
    }

    /// Creates a fresh actor for this profile at `center`.
    ///
    /// # Errors
    /// Propagates [`ConfigError::ZeroMaxHealth`] from [`Actor::new`].
    pub fn spawn(&self, id: ActorId, center: Vec2) -> Result<Actor, ConfigError> {
        Actor::new(id, center, self.size, self.max_health, self.base_damage)
    }
}

impl TryFrom<ProfileDocument> for EncounterProfile {
    type Error = ConfigError;

    fn try_from(doc: ProfileDocument) -> Result<Self, Self::Error> {
        Self::new(
            doc.name,
            doc.max_health,
            doc.base_damage,
            doc.size,
            doc.transitions,
            doc.phases,
        )
    }
}

impl From<EncounterProfile> for ProfileDocument {
    fn from(profile: EncounterProfile) -> Self {
        Self {
            name: profile.name,
            max_health: profile.max_health,
            base_damage: profile.base_damage,
            size: profile.size,
            transitions: profile.transitions,
            phases: profile.phases,
        }
    }
}
