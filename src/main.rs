//! Cave Runner headless driver
//!
//! Runs one autopiloted run at a fixed frame rate, feeding the simulation
//! through the fixed-step accumulator, and keeps the high score on disk.

use std::path::Path;

use cave_runner::consts::*;
use cave_runner::sim::{
    FixedStep, HazardPhase, RunPhase, RunState, TickInput, TickOutcome, start_run, tick,
};
use cave_runner::{HighScore, Scoreboard, Settings};

/// Simulated display refresh
const FRAME_DT: f32 = 1.0 / 60.0;

/// Walk right, hop onto jump blocks, shelter in gaps while the cave moves
#[derive(Debug, Default)]
struct Autopilot;

impl Autopilot {
    fn input(&self, state: &RunState) -> TickInput {
        let player = &state.player;
        let here = state.occupied_block();
        let next = state.blocks.get(player.nearest_block + 1);

        let hazard_active = !matches!(state.hazard.phase(), HazardPhase::Open { .. });
        if hazard_active && here.is_some_and(|b| b.is_gap) {
            return TickInput::default();
        }

        TickInput {
            move_left: false,
            move_right: true,
            jump: player.grounded && next.is_some_and(|b| b.is_jump_block()),
        }
    }
}

fn main() {
    env_logger::init();

    let settings = Settings::load(Path::new(Settings::DEFAULT_PATH));
    let seed = settings.resolve_seed();
    log::info!("Cave Runner starting (seed {})", seed);

    let mut state = RunState::new(seed);
    let mut board = Scoreboard::new(HighScore::load(&settings.highscore_path));
    if let Err(e) = start_run(&mut state, &mut board) {
        log::error!("Could not start run: {}", e);
        std::process::exit(1);
    }

    let pilot = Autopilot;
    let mut stepper = FixedStep::new(settings.max_substeps);

    'frames: while state.phase == RunPhase::Running && state.time_ticks < settings.demo_ticks {
        for _ in 0..stepper.advance(FRAME_DT) {
            let input = pilot.input(&state);
            match tick(&mut state, &input, SIM_DT, &mut board) {
                Ok(TickOutcome::Died) => break 'frames,
                Ok(_) => {}
                Err(e) => {
                    log::error!("Tick failed: {}", e);
                    break 'frames;
                }
            }
            if state.time_ticks >= settings.demo_ticks {
                break 'frames;
            }
        }
    }

    if board.take_pending_save() {
        if let Err(e) = board.high.persist(&settings.highscore_path) {
            log::warn!("Failed to save high score: {}", e);
        }
    }

    let outcome = match state.phase {
        RunPhase::Dead => "crushed",
        _ => "survived",
    };
    println!(
        "{} after {} ticks: level {}, score {}, best {}",
        outcome, state.time_ticks, state.level, state.score, board.high.best
    );
}
