//! Render-facing view of the simulation
//!
//! The core never draws. This module answers "what is where" for an external
//! renderer and packs it into GPU-ready instances.

use bytemuck::{Pod, Zeroable};

use crate::consts::*;
use crate::sim::{AnimationKind, Facing, Player, Rect, RunState, StepKind, TerrainBlock};

/// Colors for cave elements
pub mod colors {
    /// #334766
    pub const BLOCK_NORMAL: [f32; 4] = [0.200, 0.278, 0.400, 1.0];
    /// #1f2b3d
    pub const BLOCK_JUMP: [f32; 4] = [0.122, 0.169, 0.239, 1.0];
    /// #242b7e
    pub const BLOCK_FALL: [f32; 4] = [0.141, 0.169, 0.494, 1.0];
}

/// Geometry of one live block
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockView {
    pub x: i32,
    pub ceiling: Rect,
    pub floor: Rect,
    pub step: StepKind,
    pub closed: bool,
}

impl From<&TerrainBlock> for BlockView {
    fn from(block: &TerrainBlock) -> Self {
        Self {
            x: block.x_position(),
            ceiling: block.ceiling_rect(),
            floor: block.floor_rect(),
            step: block.step,
            closed: block.closed,
        }
    }
}

/// Which sprite to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameId {
    pub kind: AnimationKind,
    pub index: u8,
    /// Mirror horizontally (facing left)
    pub flipped: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub frame: FrameId,
}

impl From<&Player> for PlayerView {
    fn from(player: &Player) -> Self {
        Self {
            x: player.pos.x,
            y: player.pos.y,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            frame: FrameId {
                kind: player.animation.kind(),
                index: player.animation.frame(),
                flipped: player.facing == Facing::Left,
            },
        }
    }
}

pub fn block_views(state: &RunState) -> Vec<BlockView> {
    state.blocks.iter().map(BlockView::from).collect()
}

pub fn player_view(state: &RunState) -> PlayerView {
    PlayerView::from(&state.player)
}

/// One solid rectangle for instanced drawing
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct RectInstance {
    pub position: [f32; 2],
    pub size: [f32; 2],
    pub color: [f32; 4],
}

impl RectInstance {
    pub fn new(rect: Rect, color: [f32; 4]) -> Self {
        Self {
            position: rect.min.as_vec2().to_array(),
            size: rect.size.as_vec2().to_array(),
            color,
        }
    }
}

fn step_color(step: StepKind) -> [f32; 4] {
    match step {
        StepKind::Level => colors::BLOCK_NORMAL,
        StepKind::Jump { .. } => colors::BLOCK_JUMP,
        StepKind::Fall => colors::BLOCK_FALL,
    }
}

/// Ceiling and floor rectangles for every block, empty ones skipped
pub fn cave_instances(state: &RunState) -> Vec<RectInstance> {
    let mut instances = Vec::with_capacity(state.blocks.len() * 2);
    for view in state.blocks.iter().map(BlockView::from) {
        let color = step_color(view.step);
        for rect in [view.ceiling, view.floor] {
            if !rect.is_empty() {
                instances.push(RectInstance::new(rect, color));
            }
        }
    }
    instances
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::start_run;

    #[test]
    fn test_views_cover_every_block() {
        let mut state = RunState::new(8);
        start_run(&mut state, &mut ()).unwrap();
        let views = block_views(&state);
        assert_eq!(views.len(), BLOCK_COUNT);
        for (i, view) in views.iter().enumerate() {
            assert_eq!(view.x, i as i32 * BLOCK_WIDTH);
            assert_eq!(view.ceiling.min.x, view.x);
            assert_eq!(view.floor.max().y, CORRIDOR_HEIGHT);
        }
    }

    #[test]
    fn test_player_view_flips_when_facing_left() {
        let mut state = RunState::new(8);
        state.player.facing = Facing::Left;
        let view = player_view(&state);
        assert!(view.frame.flipped);
        assert_eq!((view.width, view.height), (PLAYER_WIDTH, PLAYER_HEIGHT));
    }

    #[test]
    fn test_instances_are_tightly_packed() {
        assert_eq!(std::mem::size_of::<RectInstance>(), 32);
        let mut state = RunState::new(8);
        start_run(&mut state, &mut ()).unwrap();
        let instances = cave_instances(&state);
        assert!(instances.len() <= BLOCK_COUNT * 2);
        let bytes: &[u8] = bytemuck::cast_slice(&instances);
        assert_eq!(bytes.len(), instances.len() * 32);
    }
}
