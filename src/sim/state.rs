//! Run state and core simulation types
//!
//! Everything the orchestrator owns for the lifetime of a run lives here.

use glam::IVec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::block::TerrainBlock;
use super::generator::{BlockGenerator, GenerationParams};
use super::hazard::HazardController;
use crate::consts::*;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunPhase {
    /// Waiting for an external start signal
    Idle,
    /// Ticking physics and hazard
    Running,
    /// Frozen until restarted
    Dead,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Which sprite strip is playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationKind {
    Idle,
    Run,
    Jump,
}

/// Sprite animation with its own frame index per strip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Animation {
    Idle { frame: u8 },
    Run { frame: u8 },
    /// Plays once and holds on the last frame
    Jump { frame: u8 },
}

impl Animation {
    pub const IDLE_FRAMES: u8 = 4;
    pub const RUN_FRAMES: u8 = 6;
    pub const JUMP_FRAMES: u8 = 4;

    pub fn start(kind: AnimationKind) -> Self {
        match kind {
            AnimationKind::Idle => Animation::Idle { frame: 0 },
            AnimationKind::Run => Animation::Run { frame: 0 },
            AnimationKind::Jump => Animation::Jump { frame: 0 },
        }
    }

    pub fn kind(&self) -> AnimationKind {
        match self {
            Animation::Idle { .. } => AnimationKind::Idle,
            Animation::Run { .. } => AnimationKind::Run,
            Animation::Jump { .. } => AnimationKind::Jump,
        }
    }

    pub fn frame(&self) -> u8 {
        match *self {
            Animation::Idle { frame } | Animation::Run { frame } | Animation::Jump { frame } => frame,
        }
    }

    fn advanced(self) -> Self {
        match self {
            Animation::Idle { frame } => Animation::Idle {
                frame: (frame + 1) % Self::IDLE_FRAMES,
            },
            Animation::Run { frame } => Animation::Run {
                frame: (frame + 1) % Self::RUN_FRAMES,
            },
            Animation::Jump { frame } => Animation::Jump {
                frame: (frame + 1).min(Self::JUMP_FRAMES - 1),
            },
        }
    }
}

/// The controllable character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Top-left corner of the sprite box
    pub pos: IVec2,
    /// Pixels per tick, positive is down
    pub vel_y: i32,
    pub grounded: bool,
    pub facing: Facing,
    pub animation: Animation,
    /// Ticks since the animation counter started
    pub anim_counter: u64,
    /// Block under the player's horizontal center (as of the last tick)
    pub nearest_block: usize,
    /// Offset of the player's center within that block
    pub coord_in_block: i32,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            pos: IVec2::new(PLAYER_START_X, PLAYER_START_Y),
            vel_y: 0,
            grounded: false,
            facing: Facing::Right,
            animation: Animation::Idle { frame: 0 },
            anim_counter: 0,
            nearest_block: 0,
            coord_in_block: 0,
        }
    }
}

impl Player {
    /// Move back to the corridor's left edge (after a regeneration)
    pub fn reset_position(&mut self) {
        self.pos = IVec2::new(PLAYER_START_X, PLAYER_START_Y);
        self.vel_y = 0;
        self.grounded = false;
        self.nearest_block = 0;
        self.coord_in_block = 0;
    }

    /// Bottom edge of the sprite box (feet)
    #[inline]
    pub fn bottom(&self) -> i32 {
        self.pos.y + PLAYER_HEIGHT
    }

    /// Switch strips immediately; step frames every `ANIMATION_FRAME_TICKS`
    pub fn animate(&mut self, kind: AnimationKind) {
        if self.animation.kind() != kind {
            self.animation = Animation::start(kind);
        } else if self.anim_counter % ANIMATION_FRAME_TICKS == 0 {
            self.animation = self.animation.advanced();
        }
        self.anim_counter += 1;
    }
}

/// Complete run state, exclusively owned by the orchestrator
#[derive(Debug, Clone)]
pub struct RunState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub phase: RunPhase,
    /// Regenerations this run (-1 before the first)
    pub level: i32,
    /// Blocks passed this run
    pub score: u64,
    /// Highest block index reached in the current sequence
    pub high_water: usize,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub player: Player,
    /// Current sequence, replaced wholesale on regeneration
    pub blocks: Vec<TerrainBlock>,
    pub hazard: HazardController,
    pub(crate) generator: BlockGenerator,
    pub(crate) rng: Pcg32,
}

impl RunState {
    /// Create an idle run with the given seed
    pub fn new(seed: u64) -> Self {
        Self::with_params(seed, GenerationParams::default())
    }

    /// Create an idle run with explicit generation odds
    pub fn with_params(seed: u64, params: GenerationParams) -> Self {
        Self {
            seed,
            phase: RunPhase::Idle,
            level: -1,
            score: 0,
            high_water: 0,
            time_ticks: 0,
            player: Player::default(),
            blocks: Vec::new(),
            hazard: HazardController::default(),
            generator: BlockGenerator::new(params),
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Block the player currently occupies, if any
    pub fn occupied_block(&self) -> Option<&TerrainBlock> {
        self.blocks.get(self.player.nearest_block)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_animation_switch_resets_frame() {
        let mut player = Player::default();
        for _ in 0..30 {
            player.animate(AnimationKind::Run);
        }
        assert_eq!(player.animation.kind(), AnimationKind::Run);
        assert!(player.animation.frame() > 0);

        player.animate(AnimationKind::Idle);
        assert_eq!(player.animation, Animation::Idle { frame: 0 });
    }

    #[test]
    fn test_run_frames_loop() {
        let mut player = Player::default();
        player.animate(AnimationKind::Run);
        let mut seen = Vec::new();
        for _ in 0..(ANIMATION_FRAME_TICKS * 12) {
            player.animate(AnimationKind::Run);
            seen.push(player.animation.frame());
        }
        assert!(seen.iter().all(|&f| f < Animation::RUN_FRAMES));
        assert!(seen.contains(&(Animation::RUN_FRAMES - 1)));
        assert!(seen.contains(&0));
    }

    #[test]
    fn test_jump_holds_last_frame() {
        let mut player = Player::default();
        for _ in 0..(ANIMATION_FRAME_TICKS * 20) {
            player.animate(AnimationKind::Jump);
        }
        assert_eq!(
            player.animation,
            Animation::Jump {
                frame: Animation::JUMP_FRAMES - 1
            }
        );
    }

    #[test]
    fn test_reset_position_keeps_facing() {
        let mut player = Player::default();
        player.pos = IVec2::new(300, 120);
        player.vel_y = 9;
        player.facing = Facing::Left;
        player.reset_position();
        assert_eq!(player.pos, IVec2::new(PLAYER_START_X, PLAYER_START_Y));
        assert_eq!(player.vel_y, 0);
        assert_eq!(player.facing, Facing::Left);
    }

    #[test]
    fn test_new_run_is_idle_and_empty() {
        let state = RunState::new(42);
        assert_eq!(state.phase, RunPhase::Idle);
        assert_eq!(state.level, -1);
        assert!(state.blocks.is_empty());
        assert!(state.occupied_block().is_none());
    }
}
