//! Headless HexMatch runner (default binary).
//!
//! Plays a session with hint-driven autoplay: every turn swaps the pair that
//! removes the most cells, resolves it frame by frame and prints the events.
//! A finished game, or a board without a matching swap, starts a new episode.
//!
//! ```text
//! hexmatch [--config PATH] [--seed N] [--turns N] [--steps-per-frame N] [--json]
//! ```

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use serde_json::json;
use tracing::info;

use hexmatch::core::{GameConfig, NullEffects, Session};
use hexmatch::engine::{best_swap, FrameDriver, SwapHint};
use hexmatch::logging::init_tracing_default;
use hexmatch::types::GameEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
struct RunConfig {
    config: Option<PathBuf>,
    seed: Option<u32>,
    turns: u32,
    steps_per_frame: u32,
    json: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            config: None,
            seed: None,
            turns: 10,
            steps_per_frame: 1,
            json: false,
        }
    }
}

fn parse_args(args: &[String]) -> Result<RunConfig> {
    let mut run = RunConfig::default();
    let mut i = 0usize;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --config"))?;
                run.config = Some(PathBuf::from(v));
            }
            "--seed" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --seed"))?;
                run.seed = Some(
                    v.parse::<u32>()
                        .map_err(|_| anyhow!("invalid --seed value: {}", v))?,
                );
            }
            "--turns" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --turns"))?;
                run.turns = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --turns value: {}", v))?;
            }
            "--steps-per-frame" => {
                i += 1;
                let v = args
                    .get(i)
                    .ok_or_else(|| anyhow!("missing value for --steps-per-frame"))?;
                run.steps_per_frame = v
                    .parse::<u32>()
                    .map_err(|_| anyhow!("invalid --steps-per-frame value: {}", v))?;
            }
            "--json" => run.json = true,
            other => {
                return Err(anyhow!("unknown argument: {}", other));
            }
        }
        i += 1;
    }
    Ok(run)
}

fn load_config(run: &RunConfig) -> Result<GameConfig> {
    let config = match &run.config {
        Some(path) => GameConfig::from_path(path)
            .map_err(|e| anyhow!("config {}: {}", path.display(), e))?,
        None => GameConfig::default(),
    };
    let config = config.with_env_overrides();
    Ok(match run.seed {
        Some(seed) => config.with_seed(seed),
        None => config,
    })
}

fn main() -> Result<()> {
    init_tracing_default();
    let args: Vec<String> = std::env::args().skip(1).collect();
    let run = parse_args(&args)?;
    play(&run, load_config(&run)?)
}

fn play(run: &RunConfig, config: GameConfig) -> Result<()> {
    let mut session = Session::headless(config)?;
    let mut driver = FrameDriver::new(run.steps_per_frame);
    // Every frame takes at least one step, so the step cap bounds the frames too.
    let max_frames = session.resolver().rules().step_cap;
    driver.run_to_idle(&mut session, max_frames)?;
    print_board(run, &session);

    for turn in 1..=run.turns {
        let hint = if session.is_over() {
            None
        } else {
            let resolver = session.resolver();
            best_swap(resolver.board(), resolver.catalog(), resolver.detector())
        };
        let Some(hint) = hint else {
            info!(turn, outcome = ?session.outcome(), "starting a new episode");
            session.restart()?;
            driver.run_to_idle(&mut session, max_frames)?;
            report_restart(run, turn, &session);
            continue;
        };

        session.request_swap(hint.a, hint.b)?;
        let frames = driver.run_to_idle(&mut session, max_frames)?;
        report_turn(run, turn, hint, frames, &session);
    }

    print_board(run, &session);
    Ok(())
}

fn print_board(run: &RunConfig, session: &Session<NullEffects>) {
    if run.json {
        println!("{}", json!({ "snapshot": session.snapshot() }));
    } else {
        println!("{}", session.snapshot().board);
        println!(
            "episode {}  moves {}  goals {}",
            session.episode(),
            session.moves_left(),
            session.goals_left()
        );
    }
}

fn report_restart(run: &RunConfig, turn: u32, session: &Session<NullEffects>) {
    if run.json {
        println!("{}", json!({ "turn": turn, "restart": session.episode() }));
    } else {
        println!("turn {}: new episode {}", turn, session.episode());
    }
}

fn report_turn(
    run: &RunConfig,
    turn: u32,
    hint: SwapHint,
    frames: u32,
    session: &Session<NullEffects>,
) {
    let events = session.turn_events();
    if run.json {
        println!(
            "{}",
            json!({
                "turn": turn,
                "swap": [hint.a, hint.b],
                "frames": frames,
                "events": events,
                "moves_left": session.moves_left(),
                "goals_left": session.goals_left(),
                "outcome": session.outcome(),
            })
        );
        return;
    }

    println!(
        "turn {}: swap {} <-> {} ({} cells, {} frames)",
        turn, hint.a, hint.b, hint.removed, frames
    );
    for event in events {
        println!("  {}", describe(event));
    }
    if let Some(outcome) = session.outcome() {
        println!("  game {}", outcome);
    }
}

fn describe(event: &GameEvent) -> String {
    match event {
        GameEvent::AutoMatchesFound { groups } => {
            let sizes: Vec<String> = groups.iter().map(|g| g.len().to_string()).collect();
            format!("{} [{}]", event.name(), sizes.join(", "))
        }
        GameEvent::SuccessfulMove { delta } => format!("{} {:+}", event.name(), delta),
        GameEvent::GoalDamaged { at, health } => format!("{} {} health {}", event.name(), at, health),
        GameEvent::GoalDestroyed { at, .. } => format!("{} {}", event.name(), at),
        GameEvent::SpecialCreated { at, lane } => format!("{} {} {:?}", event.name(), at, lane),
        GameEvent::SpecialTriggered { at, lane, swept } => {
            format!("{} {} {:?} swept {}", event.name(), at, lane, swept)
        }
        GameEvent::GameOver { won } => format!("{} won={}", event.name(), won),
    }
}
