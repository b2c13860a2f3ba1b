//! Fixed timestep simulation tick
//!
//! Run lifecycle (Idle -> Running -> Dead) and the per-tick ordering:
//! hazard first, then physics, then scoring/death/regeneration.

use super::collision::{self, Outcome};
use super::hazard::{HazardEvent, Resumption};
use super::state::{Player, RunPhase, RunState};
use crate::consts::*;
use crate::error::{GenerationError, RunError};

/// Input intents for a single tick, read once and never queued
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    /// Jump while held and grounded
    pub jump: bool,
}

/// Notifications for the score display and high-score collaborator.
///
/// Called synchronously from inside the tick; implementations must not block.
pub trait RunObserver {
    /// At most once per tick
    fn on_score_increment(&mut self) {}
    /// Once per explicit restart (not on mid-run regeneration)
    fn on_run_reset(&mut self) {}
    /// Exactly once per death
    fn on_death(&mut self, _final_score: u64) {}
}

impl RunObserver for () {}

/// Result of a successful tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Alive,
    /// Player crossed the last block and a new cave was generated
    Regenerated,
    Died,
}

/// Start a new run from Idle or Dead.
pub fn start_run(state: &mut RunState, observer: &mut impl RunObserver) -> Result<(), RunError> {
    if state.phase == RunPhase::Running {
        return Err(RunError::AlreadyRunning);
    }

    log::info!("Starting run (seed {})", state.seed);
    state.level = -1;
    state.score = 0;
    state.high_water = 0;
    state.time_ticks = 0;
    state.player = Player::default();
    state.hazard.reset();

    regenerate(state, true, observer)?;
    state.phase = RunPhase::Running;
    Ok(())
}

/// Replace the cave with a freshly generated sequence for the next level.
///
/// The hazard carries over: closure is copied onto the new blocks and any
/// in-flight animation resumes. `new_run` distinguishes an explicit restart
/// from a wraparound.
pub fn regenerate(
    state: &mut RunState,
    new_run: bool,
    observer: &mut impl RunObserver,
) -> Result<(), GenerationError> {
    state.level += 1;
    state.high_water = 0;
    state.hazard.retime(state.level);

    let blocks = state.generator.generate_sequence(
        state.level == 0,
        state.hazard.closure(),
        BLOCK_COUNT,
        &mut state.rng,
    )?;
    state.blocks = blocks;

    let resumption = state.hazard.resume(&mut state.blocks);
    state.player.reset_position();

    let timeline = state.hazard.timeline();
    log::info!(
        "Level {}: interval={:.2}s close={:.2}s open={:.2}s",
        state.level,
        timeline.interval,
        timeline.close_duration,
        timeline.open_duration
    );
    if resumption != Resumption::Rescheduled {
        log::debug!(
            "Hazard {:?} at closure {}",
            resumption,
            state.hazard.closure()
        );
    }

    if new_run {
        observer.on_run_reset();
    }
    Ok(())
}

/// Advance the run by one fixed timestep
pub fn tick(
    state: &mut RunState,
    input: &TickInput,
    dt: f32,
    observer: &mut impl RunObserver,
) -> Result<TickOutcome, RunError> {
    if state.phase != RunPhase::Running {
        return Err(RunError::NotRunning(state.phase));
    }
    state.time_ticks += 1;

    // Hazard before physics so a cave that shuts this tick can kill this tick
    if let Some(event) = state.hazard.advance(dt, &mut state.blocks) {
        match event {
            HazardEvent::CloseTriggered => log::debug!("Cave closing (level {})", state.level),
            HazardEvent::Closed => log::debug!("Cave closed"),
            HazardEvent::Opened => log::debug!("Cave open"),
        }
    }

    let resolution = collision::resolve(
        &mut state.player,
        &state.blocks,
        &mut state.high_water,
        input,
    );

    if resolution.scored {
        state.score += 1;
        observer.on_score_increment();
    }

    match resolution.outcome {
        Outcome::Alive => Ok(TickOutcome::Alive),
        Outcome::Wrapped => {
            regenerate(state, false, observer)?;
            Ok(TickOutcome::Regenerated)
        }
        Outcome::Died => {
            state.phase = RunPhase::Dead;
            log::info!(
                "Crushed at block {} on level {}, score {}",
                state.player.nearest_block,
                state.level,
                state.score
            );
            observer.on_death(state.score);
            Ok(TickOutcome::Died)
        }
    }
}

/// Frame-time accumulator feeding fixed `SIM_DT` ticks
#[derive(Debug, Clone)]
pub struct FixedStep {
    accumulator: f32,
    max_substeps: u32,
}

impl Default for FixedStep {
    fn default() -> Self {
        Self::new(MAX_SUBSTEPS)
    }
}

impl FixedStep {
    pub fn new(max_substeps: u32) -> Self {
        Self {
            accumulator: 0.0,
            max_substeps: max_substeps.max(1),
        }
    }

    /// Add a frame's elapsed time; returns how many ticks to run now
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < self.max_substeps {
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }
}
