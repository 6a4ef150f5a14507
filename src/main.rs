//! Headless duel runner.
//!
//! Pits an encounter against a scripted, strafing target for a fixed number
//! of ticks, mirrors it on an observer through snapshots, and prints a JSON
//! summary.

use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use hashbrown::HashMap;
use log::info;
use serde::Serialize;
use talon::constants::TICKS_PER_SECOND;
use talon::encounter::integrate;
use talon::prelude::*;
use talon::{init_logging, LifecycleCommand, ProjectileKind};

/// Built-in encounters.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    /// Airborne flanker with homing barrages and dashes.
    SkyWarden,
    /// Ground walker that relocates, heals and fires radial barrages.
    MarshLord,
}

/// Run a boss encounter headlessly
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Built-in encounter to run
    #[arg(long, value_enum, default_value_t = Preset::SkyWarden)]
    encounter: Preset,
    /// JSON profile to load instead of a built-in encounter
    #[arg(long)]
    profile: Option<PathBuf>,
    /// Seed for the authoritative random generator
    #[arg(long, default_value_t = 0)]
    seed: u64,
    /// Number of ticks to simulate
    #[arg(long, default_value_t = 7_200)]
    ticks: u32,
    /// Damage the target deals per second
    #[arg(long, default_value_t = 400)]
    target_dps: u32,
    /// Tick at which the target leaves the fight
    #[arg(long)]
    target_leaves_at: Option<u32>,
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Serialize)]
struct PhaseChange {
    tick: u32,
    phase: PhaseId,
}

#[derive(Serialize)]
struct AttackCount {
    kind: ProjectileKind,
    count: usize,
}

#[derive(Serialize)]
struct Summary {
    encounter: String,
    seed: u64,
    ticks_run: u32,
    outcome: &'static str,
    final_phase: PhaseId,
    final_health: u32,
    phase_changes: Vec<PhaseChange>,
    attacks: Vec<AttackCount>,
    cues: usize,
    snapshots: usize,
    observer_phase: PhaseId,
}

fn load_profile(args: &Args) -> Result<EncounterProfile> {
    let Some(path) = &args.profile else {
        return Ok(match args.encounter {
            Preset::SkyWarden => EncounterProfile::sky_warden(),
            Preset::MarshLord => EncounterProfile::marsh_lord(),
        });
    };
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("reading profile {}", path.display()))?;
    EncounterProfile::from_json_str(&source)
        .with_context(|| format!("loading profile {}", path.display()))
}

/// Target strafing left and right beneath the spawn point.
#[expect(
    clippy::cast_possible_truncation,
    reason = "Script coordinates are small and need only f32 precision."
)]
fn strafe(tick: u32) -> (Vec2, Vec2) {
    let t = f64::from(tick) / 120.0;
    let x = 400.0 * t.sin();
    let vx = 400.0 / 120.0 * t.cos();
    (Vec2::new(x as f32, 300.0), Vec2::new(vx as f32, 0.0))
}

fn run(args: &Args) -> Result<Summary> {
    let profile = load_profile(args)?;
    info!("Running {} with seed {}", profile.name(), args.seed);
    let mut host_actor = profile.spawn(ActorId(1), Vec2::new(0.0, -400.0))?;
    let mut mirror = host_actor.clone();
    let mut host = Encounter::new(profile.clone(), Role::authoritative(args.seed));
    let mut observer = Encounter::new(profile, Role::Observer);

    let target_id = TargetId(1);
    let mut roster = TargetRoster::new();
    roster.upsert(Target::new(target_id, strafe(0).0, Vec2::new(20.0, 42.0)));

    let mut effects = TickEffects::default();
    let mut discarded = TickEffects::default();
    let mut tally: HashMap<ProjectileKind, usize> = HashMap::new();
    let mut phase_changes = Vec::new();
    let mut cues = 0;
    let mut snapshots = 0;
    let mut outcome = "engaged";
    let mut despawn_at = None;
    let mut ticks_run = 0;

    for tick in 0..args.ticks {
        ticks_run = tick + 1;
        if let Some(target) = roster.get_mut(target_id) {
            (target.center, target.velocity) = strafe(tick);
            target.active = args.target_leaves_at.is_none_or(|leave| tick < leave);
        }
        // Damage lands on the host only; observers learn of it by snapshot.
        if tick % TICKS_PER_SECOND == 0 && tick > 0 {
            host_actor.health.damage(args.target_dps);
            host_actor.mark_for_replication();
        }

        let before = host_actor.phase();
        let result = host.tick(&mut host_actor, &roster, &mut effects);
        host_actor.center = integrate(&host_actor);
        observer.tick(&mut mirror, &roster, &mut discarded);
        mirror.center = integrate(&mirror);
        if let Some(snapshot) = host.take_snapshot(&mut host_actor) {
            observer.apply_snapshot(&mut mirror, &snapshot)?;
            snapshots += 1;
        }
        discarded.clear();

        if host_actor.phase() != before {
            phase_changes.push(PhaseChange {
                tick,
                phase: host_actor.phase(),
            });
        }
        for attack in effects.drain_attacks() {
            *tally.entry(attack.kind).or_insert(0) += 1;
        }
        cues += effects.drain_cues().count();

        match (result, effects.lifecycle()) {
            (TickOutcome::Removed, _) => {
                outcome = "removed";
                break;
            }
            (TickOutcome::Fleeing, Some(LifecycleCommand::DespawnAfter(delay))) => {
                outcome = "fleeing";
                let due = *despawn_at.get_or_insert(tick + delay);
                if tick >= due {
                    outcome = "despawned";
                    break;
                }
            }
            _ => {}
        }
        effects.clear();
    }

    let mut attacks: Vec<AttackCount> = tally
        .into_iter()
        .map(|(kind, count)| AttackCount { kind, count })
        .collect();
    attacks.sort_by_key(|entry| format!("{:?}", entry.kind));

    Ok(Summary {
        encounter: host.profile().name().to_owned(),
        seed: args.seed,
        ticks_run,
        outcome,
        final_phase: host_actor.phase(),
        final_health: host_actor.health.current(),
        phase_changes,
        attacks,
        cues,
        snapshots,
        observer_phase: mirror.phase(),
    })
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let summary = run(&args)?;
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, &summary)?;
    writeln!(stdout)?;
    Ok(())
}
