//! Encounter tuning constants shared by the built-in profiles.
//!
//! Distances are in world units (one per pixel), durations in ticks at sixty
//! ticks per second, and the y axis grows downwards.

/// Simulation rate.
pub const TICKS_PER_SECOND: u32 = 60;

/// Upward drift applied each tick while fleeing a lost target.
pub const FLEE_LIFT: f32 = 0.04;
/// Delay handed to the lifecycle manager once the target is lost.
pub const DESPAWN_DELAY_TICKS: u32 = 30;

/// Horizontal offset of the hover point beside the target.
pub const FLANK_OFFSET: f32 = 300.0;
/// Fraction of [`FLANK_OFFSET`] at which the hover side flips.
pub const FLANK_SWITCH_FRACTION: f32 = 0.7;
/// Cruising speed of the hover flank.
pub const FLANK_SPEED: f32 = 8.0;
/// Speed used while the actor is below the target and must climb.
pub const FLANK_CLIMB_SPEED: f32 = 12.0;
/// Within this range the second-phase flanker stops steering and lets dashes
/// carry it.
pub const FLANK_HOLD_RANGE: f32 = 400.0;
/// Steering inertia shared by the built-in movement behaviours.
pub const DEFAULT_INERTIA: f32 = 40.0;

/// Ground pursuit speed.
pub const WALK_SPEED: f32 = 5.0;

/// Direct-fire period at full health.
pub const DIRECT_FIRE_MAX_PERIOD: f32 = 300.0;
/// Health ratio below which direct fire stops quickening.
pub const DIRECT_FIRE_MIN_RATIO: f32 = 0.2;
/// Laser speed.
pub const DIRECT_FIRE_SPEED: f32 = 10.0;

/// Homing barrage period before escalation.
pub const HOMING_BASE_PERIOD: u32 = 300;
/// Most ticks escalation removes from the homing period.
pub const HOMING_ESCALATION_CAP: u32 = 120;
/// Scale applied to the target's horizontal velocity to lead the spawn point.
pub const HOMING_KITE_SCALE: f32 = 16.0;
/// Bound on the homing spawn lead.
pub const HOMING_KITE_LIMIT: f32 = 100.0;
/// Spawn jitter is drawn from `[-HOMING_JITTER, HOMING_JITTER)`.
pub const HOMING_JITTER: u16 = 100;
/// Homing launch speed per unit of spawn distance.
pub const HOMING_SPEED_SCALE: f32 = 1.0;
/// Damage per homing shot.
pub const HOMING_DAMAGE: u32 = 10;

/// Dash impulse speed.
pub const DASH_SPEED: f32 = 15.0;
/// Contact damage multiplier during a dash window.
pub const DASH_DAMAGE_MULTIPLIER: u32 = 3;
/// Ticks after an impulse during which contact damage stays multiplied.
pub const DASH_WINDOW_TICKS: u32 = 20;
/// Homing counter value of the second dash impulse.
pub const DASH_SECOND_IMPULSE_TICK: u32 = 60;
/// Health ratio at or below which the second impulse fires.
pub const DASH_SECOND_IMPULSE_RATIO: f64 = 0.25;
/// Homing counter value of the third dash impulse.
pub const DASH_THIRD_IMPULSE_TICK: u32 = 120;
/// Health ratio at or below which the third impulse fires.
pub const DASH_THIRD_IMPULSE_RATIO: f64 = 0.15;

/// Ticks between relocation picks.
pub const RELOCATION_PERIOD: u32 = 90;
/// Distance behind the target at which relocation destinations are placed.
pub const RELOCATION_DISTANCE: f32 = 200.0;
/// Relocation travels the remaining distance over this many ticks.
pub const RELOCATION_TRAVEL_TICKS: f32 = 30.0;
/// Spacing of trajectory telegraph markers.
pub const TELEGRAPH_SPACING: f32 = 20.0;

/// Ticks the final-phase heal takes from empty to full.
pub const REGEN_BUDGET_TICKS: u32 = 180;

/// Ticks between radial barrages after the first.
pub const BARRAGE_PERIOD: u32 = 600;
/// Distance from the centre at which barrage bolts start.
pub const BARRAGE_MUZZLE_OFFSET: f32 = 50.0;
/// Barrage bolt speed.
pub const BARRAGE_SPEED: f32 = 1.0;
/// Damage per barrage bolt.
pub const BARRAGE_DAMAGE: u32 = 100;
/// Horizontal teleport offset range from the target, `[min, max)`.
pub const BARRAGE_SPAWN_X: (f32, f32) = (-300.0, 301.0);
/// Vertical teleport offset range from the target, `[min, max)`.
pub const BARRAGE_SPAWN_Y: (f32, f32) = (-400.0, -200.0);
