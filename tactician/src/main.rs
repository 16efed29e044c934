// Disable warning for the crate name, not a really good way to do this but..
// (https://github.com/rust-lang/rust/issues/45127)
#![allow(non_snake_case)]

#[macro_use]
extern crate clap;

use std::ops::RangeInclusive;
use std::rc::Rc;
use std::str::FromStr;

mod arena;

use clap::{Parser, Subcommand};
use log::{info, warn};

use crate::arena::SimulatedArena;
use tactician_core::clock::{Clock, ManualClock, SystemClock};
use tactician_core::emulator::LogStatus;
use tactician_core::engine::BattleEngine;
use tactician_core::error::TacticianResult;
use tactician_core::geometry::Zones;

const DURATION_RANGE: RangeInclusive<f32> = 1f32..=600f32;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[clap(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Engine versus a simulated arena
    Simulate {
        /// Seed for the engine and the arena
        #[clap(short = 's', long = "seed", default_value_t = 0)]
        seed: u64,
        /// Battle length in seconds
        #[clap(short = 'd', long = "duration", default_value_t = 180f32, validator = duration_in_range)]
        duration: f32,
        /// Number of battles to play
        #[clap(short = 'b', long = "battles", default_value_t = 1)]
        battles: u32,
        /// Sleep for real instead of advancing a virtual clock
        #[clap(long)]
        realtime: bool,
    },
}

fn duration_in_range(s: &str) -> Result<(), String> {
    f32::from_str(s)
        .map(|duration| DURATION_RANGE.contains(&duration))
        .map_err(|e| e.to_string())
        .and_then(|result| match result {
            true => Ok(()),
            false => Err(format!(
                "Duration not in range {}-{}",
                DURATION_RANGE.start(),
                DURATION_RANGE.end()
            )),
        })
}

fn simulate(seed: u64, duration: f32, battles: u32, realtime: bool) -> TacticianResult<()> {
    let zones = Rc::new(Zones::default());
    let mut engine = BattleEngine::new(zones.clone(), seed);
    let mut status = LogStatus::default();
    let mut won = 0;

    for battle in 0..battles {
        let (mut clock, arena_clock): (Box<dyn Clock>, Box<dyn Clock>) = if realtime {
            (Box::new(SystemClock::default()), Box::new(SystemClock::default()))
        } else {
            let clock = ManualClock::default();
            (Box::new(clock.clone()), Box::new(clock))
        };
        let arena_seed = seed.wrapping_add(battle as u64 + 1);
        let mut arena = SimulatedArena::new(zones.clone(), arena_clock, arena_seed, duration);

        let outcome = engine.run_battle(&mut arena, clock.as_mut(), &mut status);
        let summary = arena.summary();
        println!(
            "Battle {}: {} after {} cycles, {} spawned, {} defended, {} leaked, {} cards",
            battle + 1,
            if outcome.success { "finished" } else { "failed" },
            outcome.cycles,
            summary.spawned,
            summary.defended,
            summary.leaked,
            summary.deployed
        );
        let mut tallies = outcome.tallies.iter().collect::<Vec<_>>();
        tallies.sort_by_key(|(kind, _)| format!("{:?}", kind));
        for (kind, tally) in tallies {
            info!(
                "{:?}: {}/{} ({:.0}%)",
                kind,
                tally.successes,
                tally.attempts,
                tally.success_rate() * 100f32
            );
        }
        match outcome.error {
            Some(e) => {
                warn!("Battle {} aborted", battle + 1);
                return Err(e);
            }
            None => won += 1,
        }
    }
    info!("{} of {} battles completed", won, battles);
    Ok(())
}

fn main() -> TacticianResult<()> {
    env_logger::init();
    let app = Cli::parse();
    info!("{} v{}", crate_name!(), crate_version!());

    match app.command {
        Some(Command::Simulate {
            seed,
            duration,
            battles,
            realtime,
        }) => simulate(seed, duration, battles, realtime),
        None => simulate(0, 180f32, 1, false),
    }
}
