//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering, input capture or file I/O

pub mod block;
pub mod collision;
pub mod generator;
pub mod hazard;
pub mod state;
pub mod tick;

pub use block::{Rect, StepKind, TerrainBlock};
pub use collision::{MoveGates, Outcome, Resolution, movement_gates, resolve};
pub use generator::{BlockGenerator, GenerationParams, level_height_fits};
pub use hazard::{
    ExpCurve, HazardController, HazardEvent, HazardPhase, HazardTimeline, HazardTuning, Resumption,
};
pub use state::{Animation, AnimationKind, Facing, Player, RunPhase, RunState};
pub use tick::{FixedStep, RunObserver, TickInput, TickOutcome, regenerate, start_run, tick};
