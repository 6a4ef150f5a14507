//! Attack schedulers.
//!
//! Each scheduler owns one cadence in [`EncounterTimers`](crate::actor::EncounterTimers)
//! and runs once per tick in the order its phase plan lists it. Counters advance
//! on every simulation instance so observers stay in step between snapshots;
//! projectile spawns, random draws and health-gated impulses only happen when
//! the tick carries the [`Authority`](crate::authority::Authority).

use glam::Vec2;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::actor::Actor;
use crate::attack::{AttackRequest, EffectCue, ProjectileKind};
use crate::constants::{
    BARRAGE_DAMAGE, BARRAGE_MUZZLE_OFFSET, BARRAGE_PERIOD, BARRAGE_SPAWN_X, BARRAGE_SPAWN_Y,
    BARRAGE_SPEED, DASH_DAMAGE_MULTIPLIER, DASH_SECOND_IMPULSE_RATIO, DASH_SECOND_IMPULSE_TICK,
    DASH_SPEED, DASH_THIRD_IMPULSE_RATIO, DASH_THIRD_IMPULSE_TICK, DASH_WINDOW_TICKS,
    DIRECT_FIRE_MAX_PERIOD, DIRECT_FIRE_MIN_RATIO, DIRECT_FIRE_SPEED, HOMING_BASE_PERIOD,
    HOMING_DAMAGE, HOMING_ESCALATION_CAP, HOMING_JITTER, HOMING_KITE_LIMIT, HOMING_KITE_SCALE,
    HOMING_SPEED_SCALE, REGEN_BUDGET_TICKS, RELOCATION_DISTANCE, RELOCATION_PERIOD,
};
use crate::authority::Authority;
use crate::encounter::TickContext;
use crate::error::ConfigError;
use crate::numeric::floor_to_u32;
use crate::spread::{spread, SpreadPattern};
use crate::vector_math::{rotation_vector, safe_normalize, sprite_rotation, to_rotation, wrap_angle};

/// One scheduler slot in a phase plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttackPattern {
    /// Aimed laser.
    DirectFire(DirectFire),
    /// Homing shots around the target.
    HomingBarrage(HomingBarrage),
    /// Charge impulses.
    Dash(Dash),
    /// Destination picks behind the target.
    Relocation(Relocation),
    /// Heal to full.
    Regenerate(Regenerate),
    /// Teleport and cardinal volley.
    RadialBarrage(RadialBarrage),
}

impl AttackPattern {
    /// Runs this scheduler for one tick.
    pub fn run(&self, actor: &mut Actor, ctx: &mut TickContext<'_>) {
        match self {
            Self::DirectFire(pattern) => pattern.run(actor, ctx),
            Self::HomingBarrage(pattern) => pattern.run(actor, ctx),
            Self::Dash(pattern) => pattern.run(actor, ctx),
            Self::Relocation(pattern) => pattern.run(actor, ctx),
            Self::Regenerate(pattern) => pattern.run(actor),
            Self::RadialBarrage(pattern) => pattern.run(actor, ctx),
        }
    }

    /// Rejects tunings that would stall, divide by zero or draw from an
    /// empty range.
    ///
    /// # Errors
    /// Returns the [`ConfigError`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::DirectFire(pattern) => pattern.validate(),
            Self::HomingBarrage(pattern) => pattern.validate(),
            Self::Dash(pattern) => pattern.validate(),
            Self::Relocation(pattern) => pattern.validate(),
            Self::Regenerate(pattern) if pattern.budget == 0 => Err(ConfigError::ZeroRegenBudget),
            Self::Regenerate(_) => Ok(()),
            Self::RadialBarrage(pattern) => pattern.validate(),
        }
    }
}

/// Aimed laser whose cadence quickens as health drops.
///
/// The period is `floor(clamp(health ratio, min_ratio, 1) * max_period)`,
/// recomputed every tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DirectFire {
    /// Period at full health.
    pub max_period: f32,
    /// Lowest health ratio the period keeps shrinking for.
    pub min_ratio: f32,
    /// Projectile speed.
    pub speed: f32,
}

impl Default for DirectFire {
    fn default() -> Self {
        Self {
            max_period: DIRECT_FIRE_MAX_PERIOD,
            min_ratio: DIRECT_FIRE_MIN_RATIO,
            speed: DIRECT_FIRE_SPEED,
        }
    }
}

impl DirectFire {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_period < 1.0 || !self.max_period.is_finite() {
            return Err(ConfigError::ZeroPeriod);
        }
        if !(self.min_ratio > 0.0 && self.min_ratio <= 1.0) {
            return Err(ConfigError::ThresholdOutOfRange(f64::from(self.min_ratio)));
        }
        ConfigError::non_negative("direct_fire.speed", self.speed)
    }

    /// Ticks between shots at the actor's current health.
    #[must_use]
    pub fn period(&self, actor: &Actor) -> u32 {
        let ratio = actor
            .health
            .ratio()
            .clamp(f64::from(self.min_ratio), 1.0);
        floor_to_u32(ratio * f64::from(self.max_period))
    }

    fn run(&self, actor: &mut Actor, ctx: &mut TickContext<'_>) {
        let period = self.period(actor);
        if !actor.timers.direct_fire.advance(period) || ctx.authority.is_none() {
            return;
        }
        let direction = safe_normalize(ctx.target.center - actor.center, Vec2::Y);
        debug!("Actor {:?} fires laser (period {period})", actor.id);
        ctx.sink.spawn_attack(AttackRequest {
            origin: actor.center,
            direction,
            speed: self.speed,
            kind: ProjectileKind::Laser,
            damage: actor.contact_damage,
            knockback: 0.0,
            owner: actor.id,
        });
    }
}

/// Homing shots spawned around the target, leading its horizontal motion.
///
/// Every completed cycle shortens the next one by a tick until
/// `escalation_cap` cycles have passed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomingBarrage {
    /// Period before any escalation.
    pub base_period: u32,
    /// Most ticks escalation may shave off the period.
    pub escalation_cap: u32,
    /// Ticks of target motion the spawn point leads by.
    pub kite_scale: f32,
    /// Bound on the horizontal lead.
    pub kite_limit: f32,
    /// Spawn jitter, drawn per axis from `[-jitter, jitter)`.
    pub jitter: u16,
    /// Launch speed per unit of spawn distance.
    pub speed_scale: f32,
    /// Damage per shot.
    pub damage: u32,
}

impl Default for HomingBarrage {
    fn default() -> Self {
        Self {
            base_period: HOMING_BASE_PERIOD,
            escalation_cap: HOMING_ESCALATION_CAP,
            kite_scale: HOMING_KITE_SCALE,
            kite_limit: HOMING_KITE_LIMIT,
            jitter: HOMING_JITTER,
            speed_scale: HOMING_SPEED_SCALE,
            damage: HOMING_DAMAGE,
        }
    }
}

impl HomingBarrage {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.base_period <= self.escalation_cap {
            return Err(ConfigError::ZeroPeriod);
        }
        ConfigError::finite("homing_barrage.kite_scale", self.kite_scale)?;
        ConfigError::non_negative("homing_barrage.kite_limit", self.kite_limit)?;
        ConfigError::finite("homing_barrage.speed_scale", self.speed_scale)
    }

    fn draw_jitter(&self, authority: &mut Authority) -> i32 {
        let jitter = i32::from(self.jitter);
        if jitter == 0 {
            0
        } else {
            authority.int_in(-jitter..jitter)
        }
    }

    /// Current period after escalation.
    #[must_use]
    pub fn period(&self, actor: &Actor) -> u32 {
        self.base_period.saturating_sub(actor.timers.escalation)
    }

    fn run(&self, actor: &mut Actor, ctx: &mut TickContext<'_>) {
        let period = self.period(actor);
        if !actor.timers.homing.advance(period) {
            return;
        }
        if actor.timers.escalation < self.escalation_cap {
            actor.timers.escalation += 1;
        }
        let Some(authority) = ctx.authority.as_deref_mut() else {
            return;
        };
        let target = ctx.target;
        let kite = (target.velocity.x * self.kite_scale).clamp(-self.kite_limit, self.kite_limit);
        let jitter_x = self.draw_jitter(authority);
        let jitter_y = self.draw_jitter(authority);
        #[expect(
            clippy::cast_precision_loss,
            reason = "Jitter is bounded well inside the exact f32 integer range."
        )]
        let spawn = target.center + Vec2::new(kite + jitter_x as f32, jitter_y as f32);
        let launch = (target.center - spawn) * self.speed_scale;
        debug!(
            "Actor {:?} spawns homing shot at {spawn:?} (period {period})",
            actor.id
        );
        ctx.sink.spawn_attack(AttackRequest {
            origin: spawn,
            direction: safe_normalize(launch, Vec2::Y),
            speed: launch.length(),
            kind: ProjectileKind::Homing,
            damage: self.damage,
            knockback: 0.0,
            owner: actor.id,
        });
    }
}

/// Cue played alongside a dash impulse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DashCue {
    /// Plays [`EffectCue::DashCry`].
    Cry,
    /// Plays [`EffectCue::DashShriek`].
    Shriek,
}

/// One scheduled dash: fires when the homing counter equals `at_tick` and
/// health is at or below `at_or_below` of the maximum.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashImpulse {
    /// Homing counter value that triggers the impulse.
    pub at_tick: u32,
    /// Health ratio the actor must be at or below.
    pub at_or_below: f64,
    /// Cue played with the impulse.
    #[serde(default)]
    pub cue: Option<DashCue>,
}

impl DashImpulse {
    /// Impulses gated below full health depend on damage the authority
    /// observed first.
    fn is_health_gated(&self) -> bool {
        self.at_or_below < 1.0
    }
}

/// Charge at the target, keyed off the homing barrage's counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Dash {
    /// Impulse speed.
    pub speed: f32,
    /// Contact damage multiplier while the window is open.
    pub damage_multiplier: u32,
    /// Ticks of multiplied contact damage after each impulse.
    pub window: u32,
    /// Checked in order; the first due impulse fires.
    pub impulses: Vec<DashImpulse>,
}

impl Default for Dash {
    fn default() -> Self {
        Self {
            speed: DASH_SPEED,
            damage_multiplier: DASH_DAMAGE_MULTIPLIER,
            window: DASH_WINDOW_TICKS,
            impulses: vec![
                DashImpulse {
                    at_tick: 0,
                    at_or_below: 1.0,
                    cue: None,
                },
                DashImpulse {
                    at_tick: DASH_SECOND_IMPULSE_TICK,
                    at_or_below: DASH_SECOND_IMPULSE_RATIO,
                    cue: Some(DashCue::Cry),
                },
                DashImpulse {
                    at_tick: DASH_THIRD_IMPULSE_TICK,
                    at_or_below: DASH_THIRD_IMPULSE_RATIO,
                    cue: Some(DashCue::Shriek),
                },
            ],
        }
    }
}

impl Dash {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(impulse) = self
            .impulses
            .iter()
            .find(|impulse| !(impulse.at_or_below > 0.0 && impulse.at_or_below <= 1.0))
        {
            return Err(ConfigError::ThresholdOutOfRange(impulse.at_or_below));
        }
        ConfigError::non_negative("dash.speed", self.speed)
    }

    fn due(&self, actor: &Actor, authoritative: bool) -> Option<&DashImpulse> {
        let counter = actor.timers.homing.elapsed();
        self.impulses.iter().find(|impulse| {
            impulse.at_tick == counter
                && actor.health.at_or_below(impulse.at_or_below)
                && (authoritative || !impulse.is_health_gated())
        })
    }

    fn run(&self, actor: &mut Actor, ctx: &mut TickContext<'_>) {
        if let Some(impulse) = self.due(actor, ctx.authority.is_some()) {
            let to_target = ctx.target.center - actor.center;
            actor.velocity = safe_normalize(to_target, Vec2::ZERO) * self.speed;
            actor.rotation = sprite_rotation(to_target);
            actor.timers.dash_window = self.window;
            if impulse.is_health_gated() {
                actor.net_update = true;
            }
            let at = actor.center;
            match impulse.cue {
                Some(DashCue::Cry) => ctx.sink.cue(EffectCue::DashCry { at }),
                Some(DashCue::Shriek) => ctx.sink.cue(EffectCue::DashShriek { at }),
                None => {}
            }
            debug!(
                "Actor {:?} dashes at tick {} of the homing cycle",
                actor.id, impulse.at_tick
            );
        }
        if actor.timers.dash_window > 0 {
            actor.contact_damage = actor.base_damage.saturating_mul(self.damage_multiplier);
            actor.timers.dash_window -= 1;
        }
    }
}

/// Periodically chooses a point behind the target for the actor to fly to.
///
/// Only the authority picks destinations; a fresh pick is also made whenever
/// none is stored, so entering the phase relocates at once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Relocation {
    /// Ticks between picks.
    pub period: u32,
    /// Distance of the destination from the target.
    pub distance: f32,
    /// Half-width in radians of the random spread around "directly behind".
    pub jitter: f32,
}

impl Default for Relocation {
    fn default() -> Self {
        Self {
            period: RELOCATION_PERIOD,
            distance: RELOCATION_DISTANCE,
            jitter: std::f32::consts::FRAC_PI_6,
        }
    }
}

impl Relocation {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.period == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        ConfigError::non_negative("relocation.distance", self.distance)?;
        ConfigError::non_negative("relocation.jitter", self.jitter)
    }

    fn run(&self, actor: &mut Actor, ctx: &mut TickContext<'_>) {
        let fired = actor.timers.relocation.advance(self.period);
        if !fired && actor.destination.is_some() {
            return;
        }
        let Some(authority) = ctx.authority.as_deref_mut() else {
            return;
        };
        let target = ctx.target.center;
        let behind = to_rotation(actor.center - target) + std::f32::consts::PI;
        let swing = if self.jitter > 0.0 {
            authority.float_in(-self.jitter..self.jitter)
        } else {
            0.0
        };
        let angle = wrap_angle(behind + swing);
        let destination = target + rotation_vector(angle) * self.distance;
        debug!("Actor {:?} relocating to {destination:?}", actor.id);
        actor.destination = Some(destination);
        actor.net_update = true;
    }
}

/// Heals to full over `budget` ticks, once per phase entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Regenerate {
    /// Ticks from entry to full health.
    pub budget: u32,
}

impl Default for Regenerate {
    fn default() -> Self {
        Self {
            budget: REGEN_BUDGET_TICKS,
        }
    }
}

impl Regenerate {
    fn run(&self, actor: &mut Actor) {
        let healed = actor.timers.regen.apply(&mut actor.health, self.budget);
        if healed.is_some() && actor.timers.regen.is_exhausted(self.budget) {
            debug!(
                "Actor {:?} finished regenerating after {} ticks",
                actor.id,
                actor.timers.regen.spent()
            );
        }
    }
}

/// Teleports near the target and fires a ring of slow bolts.
///
/// Fires on the first tick of its phase, then once per `period`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialBarrage {
    /// Ticks between volleys after the first.
    pub period: u32,
    /// Offset from the target, drawn per axis from `[min, max)`.
    pub spawn_x: (f32, f32),
    /// Vertical counterpart of `spawn_x`.
    pub spawn_y: (f32, f32),
    /// Distance from the centre each bolt starts at.
    pub muzzle_offset: f32,
    /// Bolt speed.
    pub speed: f32,
    /// Damage per bolt.
    pub damage: u32,
    /// Directions relative to `+x`.
    pub pattern: SpreadPattern,
}

impl Default for RadialBarrage {
    fn default() -> Self {
        Self {
            period: BARRAGE_PERIOD,
            spawn_x: BARRAGE_SPAWN_X,
            spawn_y: BARRAGE_SPAWN_Y,
            muzzle_offset: BARRAGE_MUZZLE_OFFSET,
            speed: BARRAGE_SPEED,
            damage: BARRAGE_DAMAGE,
            pattern: SpreadPattern::cardinal(),
        }
    }
}

impl RadialBarrage {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.period == 0 {
            return Err(ConfigError::ZeroPeriod);
        }
        ConfigError::draw_range("radial_barrage.spawn_x", self.spawn_x)?;
        ConfigError::draw_range("radial_barrage.spawn_y", self.spawn_y)?;
        ConfigError::non_negative("radial_barrage.muzzle_offset", self.muzzle_offset)?;
        ConfigError::non_negative("radial_barrage.speed", self.speed)
    }

    fn run(&self, actor: &mut Actor, ctx: &mut TickContext<'_>) {
        if !actor.timers.barrage.advance_leading(self.period) {
            return;
        }
        let Some(authority) = ctx.authority.as_deref_mut() else {
            return;
        };
        let offset = Vec2::new(
            authority.float_in(self.spawn_x.0..self.spawn_x.1),
            authority.float_in(self.spawn_y.0..self.spawn_y.1),
        );
        actor.velocity = Vec2::ZERO;
        actor.center = ctx.target.center + offset;
        actor.net_update = true;
        debug!("Actor {:?} teleports to {:?}", actor.id, actor.center);
        for direction in spread(Vec2::X, &self.pattern) {
            ctx.sink.spawn_attack(AttackRequest {
                origin: actor.center + direction * self.muzzle_offset,
                direction,
                speed: self.speed,
                kind: ProjectileKind::PurpleLaser,
                damage: self.damage,
                knockback: 0.0,
                owner: actor.id,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorId;
    use crate::attack::TickEffects;
    use crate::target::{Target, TargetId, TargetRoster};
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    const TARGET_AT: Vec2 = Vec2::new(0.0, 0.0);

    #[fixture]
    fn actor() -> Actor {
        Actor::new(
            ActorId(7),
            Vec2::new(-300.0, -200.0),
            Vec2::splat(110.0),
            20_000,
            12,
        )
        .expect("valid actor")
    }

    #[fixture]
    fn roster() -> TargetRoster {
        let mut roster = TargetRoster::new();
        roster.upsert(Target::new(TargetId(1), TARGET_AT, Vec2::new(20.0, 42.0)));
        roster
    }

    fn target() -> Target {
        Target::new(TargetId(1), TARGET_AT, Vec2::new(20.0, 42.0))
    }

    /// Runs `pattern` for `ticks` ticks, returning everything emitted.
    fn drive(
        pattern: &AttackPattern,
        actor: &mut Actor,
        roster: &TargetRoster,
        authority: Option<&mut Authority>,
        ticks: u32,
    ) -> TickEffects {
        let mut effects = TickEffects::default();
        let mut ctx = TickContext {
            target: target(),
            registry: roster,
            sink: &mut effects,
            authority,
        };
        for _ in 0..ticks {
            actor.contact_damage = actor.base_damage;
            pattern.run(actor, &mut ctx);
        }
        effects
    }

    #[rstest]
    #[case(20_000, 300)]
    #[case(10_000, 150)]
    #[case(2_000, 60)]
    #[case(1, 60)]
    fn direct_fire_period_tracks_health(
        mut actor: Actor,
        #[case] health: u32,
        #[case] period: u32,
    ) {
        actor.health.set(health);
        assert_eq!(DirectFire::default().period(&actor), period);
    }

    #[rstest]
    fn direct_fire_aims_at_target_with_contact_damage(mut actor: Actor, roster: TargetRoster) {
        let mut authority = Authority::seeded(1);
        let pattern = AttackPattern::DirectFire(DirectFire::default());
        let effects = drive(&pattern, &mut actor, &roster, Some(&mut authority), 301);
        assert_eq!(effects.attacks().len(), 1);
        let shot = effects.attacks()[0];
        assert_eq!(shot.kind, ProjectileKind::Laser);
        assert_eq!(shot.damage, 12);
        assert_relative_eq!(shot.speed, 10.0);
        let expected = (TARGET_AT - actor.center).normalize();
        assert_relative_eq!(shot.direction.x, expected.x, epsilon = 1e-6);
        assert_relative_eq!(shot.direction.y, expected.y, epsilon = 1e-6);
    }

    #[rstest]
    fn observers_count_but_never_fire(mut actor: Actor, roster: TargetRoster) {
        let pattern = AttackPattern::DirectFire(DirectFire::default());
        let effects = drive(&pattern, &mut actor, &roster, None, 301);
        assert!(effects.is_empty());
        assert_eq!(actor.timers.direct_fire.elapsed(), 0);
    }

    #[rstest]
    fn homing_escalation_shortens_cycles(mut actor: Actor, roster: TargetRoster) {
        let mut authority = Authority::seeded(3);
        let pattern = AttackPattern::HomingBarrage(HomingBarrage::default());
        let effects = drive(&pattern, &mut actor, &roster, Some(&mut authority), 301 + 300);
        assert_eq!(effects.attacks().len(), 2);
        assert_eq!(actor.timers.escalation, 2);
    }

    #[rstest]
    fn homing_escalation_stops_at_its_cap(mut actor: Actor, roster: TargetRoster) {
        let pattern = AttackPattern::HomingBarrage(HomingBarrage::default());
        // The 120 shrinking cycles take 28980 ticks.
        drive(&pattern, &mut actor, &roster, None, 40_000);
        assert_eq!(actor.timers.escalation, HOMING_ESCALATION_CAP);
        assert_eq!(HomingBarrage::default().period(&actor), 180);
    }

    #[rstest]
    fn homing_shot_leads_and_closes_on_target(mut actor: Actor, roster: TargetRoster) {
        let mut authority = Authority::seeded(11);
        let pattern = AttackPattern::HomingBarrage(HomingBarrage::default());
        let effects = drive(&pattern, &mut actor, &roster, Some(&mut authority), 301);
        let shot = effects.attacks()[0];
        let offset = shot.origin - TARGET_AT;
        assert!((-100.0..100.0).contains(&offset.x));
        assert!((-100.0..100.0).contains(&offset.y));
        assert_relative_eq!(shot.speed, offset.length(), epsilon = 1e-3);
        assert_eq!(shot.damage, 10);
    }

    #[rstest]
    fn dash_fires_at_cycle_start_and_multiplies_contact_damage(
        mut actor: Actor,
        roster: TargetRoster,
    ) {
        let pattern = AttackPattern::Dash(Dash::default());
        let effects = drive(&pattern, &mut actor, &roster, None, 1);
        assert!(effects.cues().is_empty());
        assert_relative_eq!(actor.velocity.length(), 15.0, epsilon = 1e-4);
        assert_eq!(actor.contact_damage, 36);
        assert_eq!(actor.timers.dash_window, DASH_WINDOW_TICKS - 1);
    }

    #[rstest]
    fn second_impulse_needs_low_health_and_authority(mut actor: Actor, roster: TargetRoster) {
        let pattern = AttackPattern::Dash(Dash::default());
        for _ in 0..60 {
            actor.timers.homing.advance(300);
        }
        actor.health.set(5_000);

        let quiet = drive(&pattern, &mut actor, &roster, None, 1);
        assert!(quiet.cues().is_empty());
        assert_eq!(actor.velocity, Vec2::ZERO);

        let mut authority = Authority::seeded(0);
        let loud = drive(&pattern, &mut actor, &roster, Some(&mut authority), 1);
        assert_eq!(
            loud.cues(),
            &[EffectCue::DashCry {
                at: actor.center
            }]
        );
        assert!(actor.replication_pending());
    }

    #[rstest]
    #[case::authority_low_health(2_000, true, true)]
    #[case::authority_above_threshold(3_200, true, false)]
    #[case::observer_low_health(2_000, false, false)]
    fn third_impulse_shrieks_at_counter_120(
        mut actor: Actor,
        roster: TargetRoster,
        #[case] health: u32,
        #[case] authoritative: bool,
        #[case] fires: bool,
    ) {
        let pattern = AttackPattern::Dash(Dash::default());
        for _ in 0..120 {
            actor.timers.homing.advance(300);
        }
        actor.health.set(health);

        let mut authority = Authority::seeded(0);
        let effects = drive(
            &pattern,
            &mut actor,
            &roster,
            authoritative.then_some(&mut authority),
            1,
        );
        if fires {
            assert_eq!(
                effects.cues(),
                &[EffectCue::DashShriek { at: actor.center }]
            );
            let expected = (TARGET_AT - actor.center).normalize() * DASH_SPEED;
            assert_relative_eq!(actor.velocity.x, expected.x, epsilon = 1e-4);
            assert_relative_eq!(actor.velocity.y, expected.y, epsilon = 1e-4);
            assert_eq!(actor.contact_damage, 36);
            assert!(actor.replication_pending());
        } else {
            assert!(effects.cues().is_empty());
            assert_eq!(actor.velocity, Vec2::ZERO);
            assert_eq!(actor.contact_damage, 12);
            assert!(!actor.replication_pending());
        }
    }

    #[rstest]
    fn relocation_without_jitter_lands_directly_behind(mut actor: Actor, roster: TargetRoster) {
        let mut authority = Authority::seeded(5);
        let pattern = AttackPattern::Relocation(Relocation {
            jitter: 0.0,
            ..Relocation::default()
        });
        drive(&pattern, &mut actor, &roster, Some(&mut authority), 1);
        let destination = actor.destination.expect("destination chosen");
        let expected = (TARGET_AT - actor.center).normalize() * 200.0;
        assert_relative_eq!(destination.x, expected.x, epsilon = 1e-3);
        assert_relative_eq!(destination.y, expected.y, epsilon = 1e-3);
    }

    #[rstest]
    fn relocation_picks_a_point_behind_the_target(mut actor: Actor, roster: TargetRoster) {
        let mut authority = Authority::seeded(5);
        let pattern = AttackPattern::Relocation(Relocation::default());
        drive(&pattern, &mut actor, &roster, Some(&mut authority), 1);
        let destination = actor.destination.expect("destination chosen");
        assert_relative_eq!(destination.distance(TARGET_AT), 200.0, epsilon = 1e-3);
        let behind = (TARGET_AT - actor.center).normalize();
        let chosen = (destination - TARGET_AT).normalize();
        assert!(behind.dot(chosen) >= (std::f32::consts::FRAC_PI_6).cos() - 1e-4);
    }

    #[rstest]
    fn observers_never_choose_destinations(mut actor: Actor, roster: TargetRoster) {
        let pattern = AttackPattern::Relocation(Relocation::default());
        drive(&pattern, &mut actor, &roster, None, 200);
        assert_eq!(actor.destination, None);
    }

    #[rstest]
    fn radial_barrage_fires_cardinal_ring_on_entry(mut actor: Actor, roster: TargetRoster) {
        let mut authority = Authority::seeded(9);
        actor.velocity = Vec2::new(3.0, 3.0);
        let pattern = AttackPattern::RadialBarrage(RadialBarrage::default());
        let effects = drive(&pattern, &mut actor, &roster, Some(&mut authority), 1);
        let offset = actor.center - TARGET_AT;
        assert!((-300.0..301.0).contains(&offset.x));
        assert!((-400.0..-200.0).contains(&offset.y));
        assert_eq!(actor.velocity, Vec2::ZERO);
        let directions: Vec<Vec2> = effects.attacks().iter().map(|a| a.direction).collect();
        let expected = [Vec2::X, Vec2::NEG_X, Vec2::Y, Vec2::NEG_Y];
        assert_eq!(directions.len(), 4);
        for (got, want) in directions.iter().zip(expected) {
            assert_relative_eq!(got.x, want.x, epsilon = 1e-6);
            assert_relative_eq!(got.y, want.y, epsilon = 1e-6);
        }
        for attack in effects.attacks() {
            assert_relative_eq!(
                attack.origin.distance(actor.center),
                50.0,
                epsilon = 1e-3
            );
            assert_eq!(attack.damage, 100);
        }
    }

    #[rstest]
    fn regeneration_scheduler_heals(mut actor: Actor, roster: TargetRoster) {
        actor.health.set(4_000);
        let pattern = AttackPattern::Regenerate(Regenerate::default());
        drive(&pattern, &mut actor, &roster, None, 400);
        assert_eq!(actor.health.current(), 20_000);
    }

    #[rstest]
    fn validation_rejects_stalled_schedulers() {
        let stalled = AttackPattern::Relocation(Relocation {
            period: 0,
            ..Relocation::default()
        });
        assert!(matches!(stalled.validate(), Err(ConfigError::ZeroPeriod)));
        let no_budget = AttackPattern::Regenerate(Regenerate { budget: 0 });
        assert!(matches!(
            no_budget.validate(),
            Err(ConfigError::ZeroRegenBudget)
        ));
        assert!(AttackPattern::Dash(Dash::default()).validate().is_ok());
        assert!(AttackPattern::RadialBarrage(RadialBarrage::default())
            .validate()
            .is_ok());
        assert!(AttackPattern::HomingBarrage(HomingBarrage::default())
            .validate()
            .is_ok());
    }

    #[rstest]
    #[case::inverted_spawn_x(AttackPattern::RadialBarrage(RadialBarrage {
        spawn_x: (301.0, -300.0),
        ..RadialBarrage::default()
    }))]
    #[case::empty_spawn_y(AttackPattern::RadialBarrage(RadialBarrage {
        spawn_y: (-200.0, -200.0),
        ..RadialBarrage::default()
    }))]
    fn empty_draw_ranges_are_rejected(#[case] pattern: AttackPattern) {
        assert!(matches!(
            pattern.validate(),
            Err(ConfigError::EmptyRange { .. })
        ));
    }

    #[rstest]
    #[case::negative_relocation_jitter(AttackPattern::Relocation(Relocation {
        jitter: -0.5,
        ..Relocation::default()
    }))]
    #[case::nan_relocation_distance(AttackPattern::Relocation(Relocation {
        distance: f32::NAN,
        ..Relocation::default()
    }))]
    #[case::negative_kite_limit(AttackPattern::HomingBarrage(HomingBarrage {
        kite_limit: -1.0,
        ..HomingBarrage::default()
    }))]
    #[case::infinite_dash(AttackPattern::Dash(Dash {
        speed: f32::INFINITY,
        ..Dash::default()
    }))]
    #[case::backwards_laser(AttackPattern::DirectFire(DirectFire {
        speed: -10.0,
        ..DirectFire::default()
    }))]
    #[case::infinite_bolts(AttackPattern::RadialBarrage(RadialBarrage {
        speed: f32::INFINITY,
        ..RadialBarrage::default()
    }))]
    fn degenerate_tunings_are_rejected(#[case] pattern: AttackPattern) {
        assert!(matches!(
            pattern.validate(),
            Err(ConfigError::TuningOutOfRange { .. })
        ));
    }

    #[rstest]
    fn negative_homing_jitter_does_not_parse() {
        let parsed: Result<AttackPattern, _> =
            serde_json::from_str(r#"{ "kind": "homing_barrage", "jitter": -50 }"#);
        assert!(parsed.is_err());
    }

    #[rstest]
    fn patterns_deserialise_with_defaults() {
        let pattern: AttackPattern =
            serde_json::from_str(r#"{ "kind": "homing_barrage", "damage": 25 }"#)
                .expect("valid pattern");
        let AttackPattern::HomingBarrage(homing) = pattern else {
            panic!("expected homing barrage");
        };
        assert_eq!(homing.damage, 25);
        assert_eq!(homing.base_period, HOMING_BASE_PERIOD);
    }
}
