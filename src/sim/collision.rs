//! Player physics and collision against the cave
//!
//! Blocks are axis-aligned columns, so every contact is resolved by clamping
//! the player's box onto the relevant surface rather than by sweeping.

use super::block::{StepKind, TerrainBlock};
use super::state::{AnimationKind, Facing, Player};
use super::tick::TickInput;
use crate::consts::*;
use crate::locate_block;

/// Which moves the terrain currently allows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveGates {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    /// Walking up to a jump block (suppresses ground snap)
    pub approaching_jump: bool,
}

impl Default for MoveGates {
    fn default() -> Self {
        Self {
            left: true,
            right: true,
            jump: true,
            approaching_jump: false,
        }
    }
}

/// What the resolver decided for this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Alive,
    /// Player walked past the last block; the cave must be regenerated
    Wrapped,
    /// Crushed by the ceiling outside a gap
    Died,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    /// The high-water mark advanced this tick
    pub scored: bool,
    pub outcome: Outcome,
}

/// Terrain lookahead around `index`; unrestricted when `index` is off the cave
pub fn movement_gates(player: &Player, blocks: &[TerrainBlock], index: usize, coord: i32) -> MoveGates {
    let mut gates = MoveGates::default();
    let half = BLOCK_WIDTH / 2;
    let Some(block) = blocks.get(index) else {
        return gates;
    };

    // Momentum over a drop: no backing up or jumping until past the midpoint
    if block.is_fall_block() && coord < half {
        gates.left = false;
        gates.jump = false;
    }

    if coord < half {
        return gates;
    }
    if let Some(next) = blocks.get(index + 1) {
        let below_next_floor = player.bottom() - next.floor_y();
        match next.step {
            StepKind::Jump { cutoff: true } => {
                if below_next_floor > CUTOFF_JUMP_TOLERANCE {
                    gates.right = false;
                }
            }
            StepKind::Jump { cutoff: false } => {
                gates.approaching_jump = true;
                if below_next_floor > 0 {
                    gates.right = false;
                }
            }
            _ => {}
        }
    }

    gates
}

/// Confine horizontal movement to the gap column while the cave is shut
fn gate_inside_gap(gates: &mut MoveGates, blocks: &[TerrainBlock], index: usize, coord: i32) {
    let half = BLOCK_WIDTH / 2;
    let prev_gap = coord < half && index > 0 && blocks[index - 1].is_gap;
    let next_gap = coord >= half && blocks.get(index + 1).is_some_and(|b| b.is_gap);

    gates.left &= prev_gap || coord > GAP_EDGE_TOLERANCE;
    gates.right &= next_gap || coord < BLOCK_WIDTH - GAP_EDGE_TOLERANCE;
}

/// Rest the player on `floor_y` if they have sunk into it by less than a step
fn snap_to_ground(player: &mut Player, floor_y: i32) {
    let depth = player.bottom() - floor_y;
    if depth > 0 && depth < JUMP_FALL_HEIGHT {
        player.pos.y = floor_y - PLAYER_HEIGHT;
        player.vel_y = 0;
    }
}

/// Advance the player by one tick against `blocks`.
///
/// `high_water` is the furthest block index reached in this sequence; it is
/// advanced here and reset to 0 on wrap.
pub fn resolve(
    player: &mut Player,
    blocks: &[TerrainBlock],
    high_water: &mut usize,
    input: &TickInput,
) -> Resolution {
    let (index, coord) = locate_block(player.pos.x);
    player.nearest_block = index;
    player.coord_in_block = coord;

    let mut scored = false;
    if index > *high_water {
        *high_water = index;
        scored = true;
    }

    let Some(block) = blocks.get(index) else {
        *high_water = 0;
        return Resolution {
            scored,
            outcome: Outcome::Wrapped,
        };
    };

    let mut gates = movement_gates(player, blocks, index, coord);
    let floor_y = block.floor_y();
    let grounded = player.bottom() >= floor_y;

    // Gravity
    if grounded {
        player.vel_y = 0;
    } else {
        player.vel_y += GRAVITY;
        player.pos.y += player.vel_y;
    }

    if !gates.approaching_jump {
        snap_to_ground(player, floor_y);
    }

    let crushing = block.closed_below_head();
    if crushing {
        if block.is_gap {
            gate_inside_gap(&mut gates, blocks, index, coord);
        } else {
            return Resolution {
                scored,
                outcome: Outcome::Died,
            };
        }
    }

    // Ceiling
    let top_y = block.top_y();
    if !crushing && player.pos.y + CEILING_TOLERANCE < top_y {
        // Never below the floor, even when the ceiling is lower than standing height
        player.pos.y = top_y.min(floor_y - PLAYER_HEIGHT);
        player.vel_y = 0;
    }

    if input.jump && grounded && gates.jump {
        player.vel_y = -JUMP_IMPULSE;
        player.pos.y += player.vel_y;
    }

    let mut walked = false;
    if input.move_left && gates.left && player.pos.x > PLAYER_MIN_X {
        player.pos.x -= WALK_SPEED;
        player.facing = Facing::Left;
        walked = true;
    }
    if input.move_right && gates.right {
        player.pos.x += WALK_SPEED;
        player.facing = Facing::Right;
        walked = true;
    }

    player.grounded = player.bottom() >= floor_y;
    let kind = if !player.grounded {
        AnimationKind::Jump
    } else if walked {
        AnimationKind::Run
    } else {
        AnimationKind::Idle
    };
    player.animate(kind);

    Resolution {
        scored,
        outcome: Outcome::Alive,
    }
}
