//! Logger setup for the headless runner and tests.
//!
//! Encounter code logs through the `log` facade: phase commits, flee and
//! removal at `info`, scheduler fires and relocations at `debug`, rejected
//! snapshots at `warn`, per-tick kinematics at `trace`. `RUST_LOG` overrides
//! the default level.

use env_logger::{Builder, Env};
use log::LevelFilter;

fn builder(default: LevelFilter) -> Builder {
    let env = Env::default().default_filter_or(default.to_string());
    let mut builder = Builder::from_env(env);
    // Simulated ticks, not wall-clock time, order the output.
    builder.format_timestamp(None);
    builder
}

/// Initializes the global logger.
///
/// `verbose` lowers the default level from info to debug.
pub fn init(verbose: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if builder(level).try_init().is_err() {
        log::debug!("logger already installed; keeping it");
    }
}

/// Routes log output through the test harness's captured stdout.
///
/// Safe to call from every test.
pub fn init_for_tests() {
    if builder(LevelFilter::Debug).is_test(true).try_init().is_err() {
        log::trace!("test logger already installed");
    }
}
