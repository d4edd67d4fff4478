//! rampart-run: headless session runner.
//!
//! Usage:
//!   rampart-run play --defender arrow@3,10 --defender cannon@10,22:Fire
//!   rampart-run play --config campaign.json --seed 9 --max-ticks 20000
//!   rampart-run dump-config > campaign.json

use std::path::PathBuf;
use std::process;

use log::{info, warn};

use rampart_core::config::GameConfig;
use rampart_core::enums::{ElementType, SessionPhase};
use rampart_core::events::SimEvent;
use rampart_core::types::Position;
use rampart_sim::scenario;
use rampart_sim::SimulationEngine;

const DEFAULT_MAX_TICKS: u64 = 60_000;

fn main() {
    let _ = env_logger::Builder::from_default_env().try_init();
    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        process::exit(1);
    }

    let result = match args[1].as_str() {
        "play" => cmd_play(&args[2..]),
        "dump-config" => cmd_dump_config(),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {other}");
            print_usage();
            process::exit(1);
        }
    };

    if let Err(message) = result {
        eprintln!("Error: {message}");
        process::exit(1);
    }
}

fn print_usage() {
    eprintln!(
        "rampart-run: RAMPART headless session runner\n\
         \n\
         Commands:\n\
         \n\
         play         Run a full session and print a JSON summary\n\
         \n\
           --config <path>             Game config JSON (default: built-in campaign)\n\
           --seed <N>                  Override the config seed\n\
           --max-ticks <N>             Stop after N ticks (default: {DEFAULT_MAX_TICKS})\n\
           --defender <id@x,z[:Elem]>  Place a defender before round 0 (repeatable)\n\
         \n\
         dump-config  Print the built-in campaign as JSON\n"
    );
}

/// A defender requested on the command line.
struct Placement {
    template_id: String,
    position: Position,
    element: Option<ElementType>,
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn parse_placement(arg: &str) -> Result<Placement, String> {
    let (template_id, rest) = arg
        .split_once('@')
        .ok_or_else(|| format!("defender {arg:?} is missing '@'"))?;
    let (coords, element) = match rest.split_once(':') {
        Some((coords, element)) => (coords, Some(element)),
        None => (rest, None),
    };
    let (x, z) = coords
        .split_once(',')
        .ok_or_else(|| format!("defender {arg:?} needs x,z"))?;
    let x: f64 = x.trim().parse().map_err(|e| format!("bad x in {arg:?}: {e}"))?;
    let z: f64 = z.trim().parse().map_err(|e| format!("bad z in {arg:?}: {e}"))?;
    let element = element
        .map(|name| {
            serde_json::from_str::<ElementType>(&format!("\"{name}\""))
                .map_err(|_| format!("unknown element {name:?}"))
        })
        .transpose()?;

    Ok(Placement {
        template_id: template_id.to_string(),
        position: Position::new(x, 0.0, z),
        element,
    })
}

fn parse_placements(args: &[String]) -> Result<Vec<Placement>, String> {
    args.windows(2)
        .filter(|w| w[0] == "--defender")
        .map(|w| parse_placement(&w[1]))
        .collect()
}

fn cmd_dump_config() -> Result<(), String> {
    let json = serde_json::to_string_pretty(&scenario::default_campaign())
        .map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}

fn cmd_play(args: &[String]) -> Result<(), String> {
    let mut config = match flag_value(args, "--config") {
        Some(path) => GameConfig::load(PathBuf::from(path)).map_err(|e| e.to_string())?,
        None => scenario::default_campaign(),
    };
    if let Some(seed) = flag_value(args, "--seed") {
        config.seed = seed.parse().map_err(|e| format!("bad seed: {e}"))?;
    }
    let max_ticks = match flag_value(args, "--max-ticks") {
        Some(n) => n.parse().map_err(|e| format!("bad tick limit: {e}"))?,
        None => DEFAULT_MAX_TICKS,
    };
    let placements = parse_placements(args)?;

    let mut engine = SimulationEngine::new(config).map_err(|e| e.to_string())?;
    for placement in &placements {
        match engine.place_defender(&placement.template_id, placement.position, placement.element)
        {
            Ok(id) => info!("placed {} as {:?}", placement.template_id, id),
            Err(err) => warn!("could not place {}: {}", placement.template_id, err),
        }
    }

    let mut kills = 0u32;
    let mut leaks = 0u32;
    let mut shots = 0u32;
    let mut rounds = Vec::new();
    engine.start_round().map_err(|e| e.to_string())?;

    let mut snapshot = engine.snapshot();
    for _ in 0..max_ticks {
        snapshot = engine.step();
        for event in &snapshot.events {
            match event {
                SimEvent::AgentKilled { .. } => kills += 1,
                SimEvent::AgentReachedCore { .. } => leaks += 1,
                SimEvent::DefenderFired { .. } => shots += 1,
                SimEvent::RoundChanged { round } => rounds.push(serde_json::json!({
                    "cleared": round - 1,
                    "time": snapshot.time.elapsed_secs,
                    "core": snapshot.core.current,
                    "gold": snapshot.gold,
                })),
                _ => {}
            }
        }

        match snapshot.phase {
            SessionPhase::Preparation => {
                engine.start_round().map_err(|e| e.to_string())?;
            }
            SessionPhase::Lost | SessionPhase::Victory => break,
            SessionPhase::Combat => {}
        }
    }

    let summary = serde_json::json!({
        "outcome": snapshot.phase,
        "ticks": snapshot.time.tick,
        "elapsed_secs": snapshot.time.elapsed_secs,
        "rounds_cleared": snapshot.director.round,
        "total_rounds": snapshot.director.total_rounds,
        "core": snapshot.core,
        "gold": snapshot.gold,
        "kills": kills,
        "leaks": leaks,
        "shots": shots,
        "rounds": rounds,
        "defenders": snapshot.defenders,
    });
    let json = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
    println!("{json}");
    Ok(())
}
