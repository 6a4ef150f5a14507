//! Movement behaviours selected per phase.
//!
//! Each behaviour computes a desired velocity and hands it to
//! [`steer`](crate::steering::steer), or writes the velocity directly when the
//! motion is a timed glide. Behaviours run on every simulation instance.

use glam::Vec2;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::actor::{Actor, Facing};
use crate::attack::EffectCue;
use crate::constants::{
    DEFAULT_INERTIA, FLANK_CLIMB_SPEED, FLANK_OFFSET, FLANK_SPEED, FLANK_SWITCH_FRACTION,
    FLEE_LIFT, RELOCATION_DISTANCE, RELOCATION_TRAVEL_TICKS, TELEGRAPH_SPACING, WALK_SPEED,
};
use crate::encounter::TickContext;
use crate::error::ConfigError;
use crate::numeric::floor_to_u32;
use crate::steering::{steer, Inertia};
use crate::vector_math::{safe_normalize, sprite_rotation};

/// Movement slot of a phase plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MovementBehavior {
    /// Horizontal ground pursuit.
    Walk(Walk),
    /// Flanking hover above the target.
    HoverFlank(HoverFlank),
    /// Timed glide to the stored destination.
    SeekDestination(SeekDestination),
    /// Keep the current velocity; attacks move the actor.
    Coast,
}

impl MovementBehavior {
    /// Updates the actor's velocity and rotation for one tick.
    pub fn apply(&self, actor: &mut Actor, ctx: &mut TickContext<'_>) {
        match self {
            Self::Walk(walk) => walk.apply(actor, ctx),
            Self::HoverFlank(flank) => flank.apply(actor, ctx),
            Self::SeekDestination(seek) => seek.apply(actor, ctx),
            Self::Coast => {}
        }
    }

    /// Rejects speeds and distances that would stall or poison the velocity.
    ///
    /// # Errors
    /// Returns [`ConfigError::TuningOutOfRange`] naming the first invalid
    /// field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Self::Walk(walk) => ConfigError::non_negative("walk.speed", walk.speed),
            Self::HoverFlank(flank) => {
                ConfigError::non_negative("hover_flank.offset", flank.offset)?;
                ConfigError::non_negative("hover_flank.switch_fraction", flank.switch_fraction)?;
                ConfigError::non_negative("hover_flank.speed", flank.speed)?;
                ConfigError::non_negative("hover_flank.climb_speed", flank.climb_speed)?;
                flank
                    .hold_range
                    .map_or(Ok(()), |range| {
                        ConfigError::non_negative("hover_flank.hold_range", range)
                    })
            }
            Self::SeekDestination(seek) => {
                ConfigError::non_negative("seek_destination.max_distance", seek.max_distance)?;
                ConfigError::positive("seek_destination.travel_ticks", seek.travel_ticks)?;
                ConfigError::positive(
                    "seek_destination.telegraph_spacing",
                    seek.telegraph_spacing,
                )
            }
            Self::Coast => Ok(()),
        }
    }
}

fn default_inertia() -> Inertia {
    Inertia::new(DEFAULT_INERTIA).unwrap_or(Inertia::SNAP)
}

/// Ground pursuit along the horizontal axis only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Walk {
    /// Target horizontal speed.
    pub speed: f32,
    /// Steering inertia.
    pub inertia: Inertia,
}

impl Default for Walk {
    fn default() -> Self {
        Self {
            speed: WALK_SPEED,
            inertia: default_inertia(),
        }
    }
}

impl Walk {
    fn apply(&self, actor: &mut Actor, ctx: &TickContext<'_>) {
        let dx = ctx.target.center.x - actor.center.x;
        let desired = if dx > 0.0 {
            Vec2::new(self.speed, 0.0)
        } else if dx < 0.0 {
            Vec2::new(-self.speed, 0.0)
        } else {
            return;
        };
        actor.velocity = steer(actor.velocity, desired, self.inertia);
    }
}

/// Hovers above and beside the target, swapping sides once close to the
/// hover point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverFlank {
    /// Horizontal distance of the hover point from the target.
    pub offset: f32,
    /// Fraction of `offset` at which the side flips.
    pub switch_fraction: f32,
    /// Cruising speed.
    pub speed: f32,
    /// Speed while the actor's top edge is below the target's feet.
    pub climb_speed: f32,
    /// Steering inertia.
    pub inertia: Inertia,
    /// When set, steering only applies beyond this distance from the target.
    pub hold_range: Option<f32>,
}

impl Default for HoverFlank {
    fn default() -> Self {
        Self {
            offset: FLANK_OFFSET,
            switch_fraction: FLANK_SWITCH_FRACTION,
            speed: FLANK_SPEED,
            climb_speed: FLANK_CLIMB_SPEED,
            inertia: default_inertia(),
            hold_range: None,
        }
    }
}

impl HoverFlank {
    /// Hover point for the actor's current facing.
    #[must_use]
    pub fn aim_point(&self, actor: &Actor, target_top: Vec2) -> Vec2 {
        target_top + Vec2::new(actor.facing.sign() * self.offset, -actor.size.y)
    }

    fn apply(&self, actor: &mut Actor, ctx: &TickContext<'_>) {
        let target = ctx.target;
        let aim = self.aim_point(actor, target.top());
        let switch = self.offset * self.switch_fraction;
        let reached = match actor.facing {
            Facing::Left => actor.center.x - switch < aim.x,
            Facing::Right => actor.center.x + switch > aim.x,
        };
        if reached {
            actor.facing = actor.facing.flipped();
            trace!("Actor {:?} flank side now {:?}", actor.id, actor.facing);
        }

        let speed = if actor.top() > target.bottom() {
            self.climb_speed
        } else {
            self.speed
        };
        let far = self
            .hold_range
            .is_none_or(|range| actor.center.distance_squared(target.center) > range * range);
        if far {
            let desired = safe_normalize(aim - actor.center, Vec2::ZERO) * speed;
            actor.velocity = steer(actor.velocity, desired, self.inertia);
        }
        actor.rotation = sprite_rotation(target.center - actor.center);
    }
}

/// Glides toward the stored destination, covering the remaining distance
/// (capped) over a fixed number of ticks.
///
/// A destination that differs from the one seen last tick triggers a target
/// reacquire and a trajectory telegraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeekDestination {
    /// Longest stretch covered by one glide.
    pub max_distance: f32,
    /// Ticks a glide of `max_distance` takes.
    pub travel_ticks: f32,
    /// Distance between telegraph markers.
    pub telegraph_spacing: f32,
}

impl Default for SeekDestination {
    fn default() -> Self {
        Self {
            max_distance: RELOCATION_DISTANCE,
            travel_ticks: RELOCATION_TRAVEL_TICKS,
            telegraph_spacing: TELEGRAPH_SPACING,
        }
    }
}

impl SeekDestination {
    fn apply(&self, actor: &mut Actor, ctx: &mut TickContext<'_>) {
        let Some(destination) = actor.destination else {
            return;
        };
        let to_destination = destination - actor.center;
        let direction = safe_normalize(to_destination, Vec2::ZERO);
        let distance = to_destination.length();
        actor.velocity = direction * distance.min(self.max_distance) / self.travel_ticks;
        actor.rotation = sprite_rotation(actor.velocity);

        if actor.last_destination != Some(destination) {
            actor.target = ctx.registry.closest_eligible_target(actor.center);
            let from = actor.center + direction * actor.size.x;
            let markers = floor_to_u32(f64::from(distance / self.telegraph_spacing));
            debug!(
                "Actor {:?} telegraphs relocation to {destination:?} ({markers} markers)",
                actor.id
            );
            ctx.sink.cue(EffectCue::Trajectory {
                from,
                to: destination,
                markers,
            });
            actor.last_destination = Some(destination);
        }
    }
}

/// Drifts upward after losing every target.
pub fn flee(actor: &mut Actor) {
    actor.velocity.y -= FLEE_LIFT;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::ActorId;
    use crate::attack::TickEffects;
    use crate::target::{Target, TargetId, TargetRoster};
    use approx::assert_relative_eq;
    use rstest::{fixture, rstest};

    #[fixture]
    fn actor() -> Actor {
        Actor::new(ActorId(3), Vec2::ZERO, Vec2::new(110.0, 110.0), 20_000, 12)
            .expect("valid actor")
    }

    fn run(behavior: &MovementBehavior, actor: &mut Actor, target: Target) -> TickEffects {
        let mut roster = TargetRoster::new();
        roster.upsert(target);
        let mut effects = TickEffects::default();
        let mut ctx = TickContext {
            target,
            registry: &roster,
            sink: &mut effects,
            authority: None,
        };
        behavior.apply(actor, &mut ctx);
        effects
    }

    #[rstest]
    #[case(500.0, 1.0)]
    #[case(-500.0, -1.0)]
    fn walk_heads_toward_target(mut actor: Actor, #[case] x: f32, #[case] sign: f32) {
        let target = Target::new(TargetId(1), Vec2::new(x, 0.0), Vec2::ONE);
        run(&MovementBehavior::Walk(Walk::default()), &mut actor, target);
        assert_relative_eq!(actor.velocity.x, sign * 5.0 / 40.0);
        assert_relative_eq!(actor.velocity.y, 0.0);
    }

    #[rstest]
    fn walk_holds_when_aligned(mut actor: Actor) {
        actor.velocity = Vec2::new(2.0, 1.0);
        let target = Target::new(TargetId(1), Vec2::new(0.0, 300.0), Vec2::ONE);
        run(&MovementBehavior::Walk(Walk::default()), &mut actor, target);
        assert_eq!(actor.velocity, Vec2::new(2.0, 1.0));
    }

    #[rstest]
    fn flank_flips_side_near_hover_point(mut actor: Actor) {
        // Facing right, hover point at x = 300; the actor is within 210 of it.
        actor.center = Vec2::new(150.0, -200.0);
        let target = Target::new(TargetId(1), Vec2::ZERO, Vec2::new(20.0, 42.0));
        run(
            &MovementBehavior::HoverFlank(HoverFlank::default()),
            &mut actor,
            target,
        );
        assert_eq!(actor.facing, Facing::Left);
    }

    #[rstest]
    fn flank_keeps_side_while_far(mut actor: Actor) {
        actor.center = Vec2::new(-400.0, -200.0);
        let target = Target::new(TargetId(1), Vec2::ZERO, Vec2::new(20.0, 42.0));
        run(
            &MovementBehavior::HoverFlank(HoverFlank::default()),
            &mut actor,
            target,
        );
        assert_eq!(actor.facing, Facing::Right);
        assert!(actor.velocity.x > 0.0);
        assert_relative_eq!(
            actor.rotation,
            (-actor.center).to_angle() - std::f32::consts::FRAC_PI_2
        );
    }

    #[rstest]
    fn flank_climbs_faster_from_below(mut actor: Actor) {
        let target = Target::new(TargetId(1), Vec2::ZERO, Vec2::new(20.0, 42.0));
        actor.center = Vec2::new(-600.0, 500.0);
        run(
            &MovementBehavior::HoverFlank(HoverFlank {
                inertia: Inertia::SNAP,
                ..HoverFlank::default()
            }),
            &mut actor,
            target,
        );
        assert_relative_eq!(actor.velocity.length(), 12.0, epsilon = 1e-4);
    }

    #[rstest]
    fn held_flank_does_not_steer_in_range(mut actor: Actor) {
        actor.center = Vec2::new(-100.0, -100.0);
        actor.velocity = Vec2::new(0.5, 0.0);
        let target = Target::new(TargetId(1), Vec2::ZERO, Vec2::new(20.0, 42.0));
        let held = HoverFlank {
            hold_range: Some(400.0),
            ..HoverFlank::default()
        };
        run(&MovementBehavior::HoverFlank(held), &mut actor, target);
        assert_eq!(actor.velocity, Vec2::new(0.5, 0.0));
    }

    #[rstest]
    fn seek_glides_and_telegraphs_once(mut actor: Actor) {
        let target = Target::new(TargetId(1), Vec2::new(0.0, 500.0), Vec2::ONE);
        actor.destination = Some(Vec2::new(300.0, 0.0));
        let seek = MovementBehavior::SeekDestination(SeekDestination::default());

        let first = run(&seek, &mut actor, target);
        assert_relative_eq!(actor.velocity.x, 200.0 / 30.0, epsilon = 1e-5);
        assert_eq!(actor.target, Some(TargetId(1)));
        assert!(matches!(
            first.cues(),
            [EffectCue::Trajectory { markers: 15, .. }]
        ));

        let second = run(&seek, &mut actor, target);
        assert!(second.cues().is_empty());
    }

    #[rstest]
    fn telegraph_markers_span_the_whole_glide(mut actor: Actor) {
        let target = Target::new(TargetId(1), Vec2::ZERO, Vec2::ONE);
        actor.destination = Some(Vec2::new(0.0, -410.0));
        let effects = run(
            &MovementBehavior::SeekDestination(SeekDestination::default()),
            &mut actor,
            target,
        );
        let [EffectCue::Trajectory { from, markers, .. }] = effects.cues() else {
            panic!("expected one trajectory cue");
        };
        assert_eq!(*markers, 20);
        assert_relative_eq!(from.y, -110.0);
    }

    #[rstest]
    #[case::stalled_glide(MovementBehavior::SeekDestination(SeekDestination {
        travel_ticks: 0.0,
        ..SeekDestination::default()
    }))]
    #[case::markerless_glide(MovementBehavior::SeekDestination(SeekDestination {
        telegraph_spacing: -20.0,
        ..SeekDestination::default()
    }))]
    #[case::runaway_walk(MovementBehavior::Walk(Walk {
        speed: f32::INFINITY,
        ..Walk::default()
    }))]
    #[case::negative_offset(MovementBehavior::HoverFlank(HoverFlank {
        offset: -300.0,
        ..HoverFlank::default()
    }))]
    #[case::nan_hold(MovementBehavior::HoverFlank(HoverFlank {
        hold_range: Some(f32::NAN),
        ..HoverFlank::default()
    }))]
    fn degenerate_tunings_are_rejected(#[case] behavior: MovementBehavior) {
        assert!(matches!(
            behavior.validate(),
            Err(ConfigError::TuningOutOfRange { .. })
        ));
    }

    #[rstest]
    #[case(MovementBehavior::Walk(Walk::default()))]
    #[case(MovementBehavior::HoverFlank(HoverFlank::default()))]
    #[case(MovementBehavior::SeekDestination(SeekDestination::default()))]
    #[case(MovementBehavior::Coast)]
    fn default_tunings_validate(#[case] behavior: MovementBehavior) {
        assert!(behavior.validate().is_ok());
    }

    #[rstest]
    fn seek_without_destination_keeps_velocity(mut actor: Actor) {
        actor.velocity = Vec2::new(1.0, 2.0);
        let target = Target::new(TargetId(1), Vec2::ZERO, Vec2::ONE);
        run(
            &MovementBehavior::SeekDestination(SeekDestination::default()),
            &mut actor,
            target,
        );
        assert_eq!(actor.velocity, Vec2::new(1.0, 2.0));
    }

    #[rstest]
    fn fleeing_lifts_upward(mut actor: Actor) {
        flee(&mut actor);
        assert_relative_eq!(actor.velocity.y, -FLEE_LIFT);
    }
}
