//! Terrain block geometry
//!
//! A block is one vertical column of the cave. In screen space (y grows down):
//! - ceiling segment: from the corridor top down to `top_y()`
//! - floor segment: from `floor_y()` down to the corridor bottom
//!
//! `top_height` positions the column; `closure_amount` lowers the ceiling
//! toward the floor while the hazard runs.

use glam::IVec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Axis-aligned rectangle in corridor pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    pub min: IVec2,
    pub size: IVec2,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            min: IVec2::new(x, y),
            size: IVec2::new(width, height),
        }
    }

    #[inline]
    pub fn max(&self) -> IVec2 {
        self.min + self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size.x <= 0 || self.size.y <= 0
    }
}

/// Vertical step of a block relative to the one before it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StepKind {
    /// Height resampled near the previous block
    #[default]
    Level,
    /// Floor steps up by `JUMP_FALL_HEIGHT`; `cutoff` when clamped at the top edge
    Jump { cutoff: bool },
    /// Floor steps down by `JUMP_FALL_HEIGHT`
    Fall,
}

/// One column of the corridor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerrainBlock {
    /// Position in the current sequence
    pub index: usize,
    /// Unobstructed space above the gap, measured from the corridor top
    pub top_height: i32,
    /// Refuge column with a shortened ceiling
    pub is_gap: bool,
    pub step: StepKind,
    /// Non-gap blocks since the last gap (generation only)
    pub blocks_since_last_gap: u32,
    /// Set once the hazard has fully closed over this sequence
    pub closed: bool,
    closure_amount: i32,
}

impl TerrainBlock {
    pub fn new(index: usize, top_height: i32) -> Self {
        Self {
            index,
            top_height,
            is_gap: false,
            step: StepKind::Level,
            blocks_since_last_gap: 0,
            closed: false,
            closure_amount: 0,
        }
    }

    /// Horizontal offset of the column
    #[inline]
    pub fn x_position(&self) -> i32 {
        self.index as i32 * BLOCK_WIDTH
    }

    #[inline]
    pub fn closure_amount(&self) -> i32 {
        self.closure_amount
    }

    /// Set the closure, clamped to `[0, SEPARATION]`
    pub fn set_closure_amount(&mut self, amount: i32) {
        self.closure_amount = amount.clamp(0, SEPARATION);
    }

    pub fn is_jump_block(&self) -> bool {
        matches!(self.step, StepKind::Jump { .. })
    }

    pub fn is_cutoff_jump_block(&self) -> bool {
        matches!(self.step, StepKind::Jump { cutoff: true })
    }

    pub fn is_fall_block(&self) -> bool {
        self.step == StepKind::Fall
    }

    /// Effective bottom edge of the ceiling segment.
    ///
    /// May be negative for a gap block near the top of the corridor.
    #[inline]
    pub fn top_y(&self) -> i32 {
        let base = if self.is_gap {
            self.top_height - GAP
        } else {
            self.top_height
        };
        base + self.closure_amount
    }

    /// Top edge of the floor segment (the surface the player stands on)
    #[inline]
    pub fn floor_y(&self) -> i32 {
        self.top_height + SEPARATION
    }

    /// Whether the ceiling has come low enough to crush a standing player
    #[inline]
    pub fn closed_below_head(&self) -> bool {
        self.closure_amount > KILL_CLOSURE
    }

    pub fn ceiling_rect(&self) -> Rect {
        Rect::new(self.x_position(), 0, BLOCK_WIDTH, self.top_y().max(0))
    }

    pub fn floor_rect(&self) -> Rect {
        let floor_y = self.floor_y();
        Rect::new(
            self.x_position(),
            floor_y,
            BLOCK_WIDTH,
            (CORRIDOR_HEIGHT - floor_y).max(0),
        )
    }
}
