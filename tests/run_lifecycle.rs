//! End-to-end run lifecycle through the public API

use cave_runner::RunError;
use cave_runner::consts::*;
use cave_runner::sim::{
    GenerationParams, HazardPhase, RunObserver, RunPhase, RunState, TickInput, TickOutcome,
    regenerate, start_run, tick,
};

#[derive(Default)]
struct Recorder {
    scores: u32,
    resets: u32,
    deaths: Vec<u64>,
}

impl RunObserver for Recorder {
    fn on_score_increment(&mut self) {
        self.scores += 1;
    }
    fn on_run_reset(&mut self) {
        self.resets += 1;
    }
    fn on_death(&mut self, final_score: u64) {
        self.deaths.push(final_score);
    }
}

fn flat_run(seed: u64) -> RunState {
    RunState::with_params(
        seed,
        GenerationParams {
            step_chance: 0.0,
            ..Default::default()
        },
    )
}

#[test]
fn walking_right_scores_each_block() {
    let mut state = flat_run(2024);
    let mut recorder = Recorder::default();
    start_run(&mut state, &mut recorder).unwrap();

    let input = TickInput {
        move_right: true,
        ..Default::default()
    };
    let last = BLOCK_COUNT - 1;
    let mut guard = 0;
    while state.player.nearest_block < last {
        assert_eq!(
            tick(&mut state, &input, SIM_DT, &mut recorder),
            Ok(TickOutcome::Alive)
        );
        guard += 1;
        assert!(guard < 400, "player stuck at block {}", state.player.nearest_block);
    }

    assert_eq!(state.score, last as u64);
    assert_eq!(recorder.scores, last as u32);
    assert_eq!(state.level, 0);
    assert_eq!(recorder.resets, 1);
    assert!(recorder.deaths.is_empty());
}

#[test]
fn sealed_cave_kills_once() {
    let mut state = RunState::new(31337);
    let mut recorder = Recorder::default();
    start_run(&mut state, &mut recorder).unwrap();
    for block in state.blocks.iter_mut() {
        block.is_gap = false;
        block.set_closure_amount(SEPARATION);
    }

    assert_eq!(
        tick(&mut state, &TickInput::default(), SIM_DT, &mut recorder),
        Ok(TickOutcome::Died)
    );
    assert_eq!(state.phase, RunPhase::Dead);
    assert_eq!(recorder.deaths, vec![0]);

    let frozen = state.player.pos;
    let input = TickInput {
        move_right: true,
        jump: true,
        ..Default::default()
    };
    for _ in 0..10 {
        assert_eq!(
            tick(&mut state, &input, SIM_DT, &mut recorder),
            Err(RunError::NotRunning(RunPhase::Dead))
        );
    }
    assert_eq!(state.player.pos, frozen);
    assert_eq!(recorder.deaths.len(), 1);
}

#[test]
fn regeneration_resumes_opening() {
    let mut state = RunState::new(555);
    start_run(&mut state, &mut ()).unwrap();
    assert!(state.blocks[0].is_gap);

    // Shelter in the opening gap until the cave is partway open again
    let mut guard = 0;
    loop {
        tick(&mut state, &TickInput::default(), SIM_DT, &mut ()).unwrap();
        let opening = matches!(state.hazard.phase(), HazardPhase::Opening { .. });
        if opening && state.hazard.timeline().elapsed_since_open_start > 0.5 {
            break;
        }
        guard += 1;
        assert!(guard < 1_500, "hazard never reopened");
    }

    let closure = state.hazard.closure();
    let elapsed = state.hazard.timeline().elapsed_since_open_start;
    assert!(closure > 0);

    regenerate(&mut state, false, &mut ()).unwrap();
    assert_eq!(state.level, 1);

    let timeline = state.hazard.timeline();
    assert!(timeline.is_opening);
    let expected = (timeline.open_duration - elapsed).max(MIN_ANIMATION_SECS);
    match state.hazard.phase() {
        HazardPhase::Opening {
            from,
            elapsed,
            duration,
        } => {
            assert_eq!(from, closure);
            assert_eq!(elapsed, 0.0);
            assert!((duration - expected).abs() < 1e-4);
        }
        other => panic!("expected Opening, got {:?}", other),
    }
    assert!(state.blocks.iter().all(|b| b.closure_amount() == closure));
    assert!(state.blocks.iter().all(|b| !b.closed));
}

#[test]
fn run_control_rejects_out_of_phase_requests() {
    let mut state = RunState::new(9);
    assert_eq!(
        tick(&mut state, &TickInput::default(), SIM_DT, &mut ()),
        Err(RunError::NotRunning(RunPhase::Idle))
    );

    start_run(&mut state, &mut ()).unwrap();
    let blocks = state.blocks.clone();
    assert_eq!(start_run(&mut state, &mut ()), Err(RunError::AlreadyRunning));
    assert_eq!(state.blocks, blocks);
}
