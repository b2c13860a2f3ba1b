//! Procedural cave generation
//!
//! Each block is derived from the previous one so the corridor stays
//! continuous, and a gap is forced after `MAX_BLOCKS_WITHOUT_GAP` solid
//! blocks so there is always a refuge from the hazard within reach.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::block::{StepKind, TerrainBlock};
use crate::consts::*;
use crate::error::GenerationError;

/// Odds used when rolling each new block
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationParams {
    /// Chance of a gap while the gap counter is below the limit
    pub gap_chance: f64,
    /// Chance of a jump block, then (independently) of a fall block
    pub step_chance: f64,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            gap_chance: GAP_CHANCE,
            step_chance: JUMP_FALL_CHANCE,
        }
    }
}

/// Builds block sequences. Holds no blocks itself.
#[derive(Debug, Clone, Default)]
pub struct BlockGenerator {
    params: GenerationParams,
}

impl BlockGenerator {
    pub fn new(params: GenerationParams) -> Self {
        Self { params }
    }

    /// First block of a sequence: centred, level, and a gap only for the
    /// very first sequence of a run.
    pub fn generate_first(&self, is_first_of_run: bool, closure: i32) -> TerrainBlock {
        let mut block = TerrainBlock::new(0, CORRIDOR_HEIGHT / 2 - GAP);
        block.is_gap = is_first_of_run;
        block.blocks_since_last_gap = FIRST_BLOCK_GAP_COUNTER;
        block.set_closure_amount(closure);
        block
    }

    /// Derive the next block from `previous`
    pub fn generate_next<R: Rng + ?Sized>(
        &self,
        previous: &TerrainBlock,
        rng: &mut R,
    ) -> Result<TerrainBlock, GenerationError> {
        let mut block = TerrainBlock::new(previous.index + 1, previous.top_height);

        block.is_gap = if previous.blocks_since_last_gap < MAX_BLOCKS_WITHOUT_GAP {
            rng.random_bool(self.params.gap_chance.clamp(0.0, 1.0))
        } else {
            true
        };
        block.blocks_since_last_gap = if block.is_gap {
            0
        } else {
            previous.blocks_since_last_gap + 1
        };

        block.set_closure_amount(previous.closure_amount());

        let step_chance = self.params.step_chance.clamp(0.0, 1.0);
        let is_jump = rng.random_bool(step_chance);
        let is_fall = !is_jump && rng.random_bool(step_chance);

        if is_jump {
            let top = previous.top_height - JUMP_FALL_HEIGHT;
            block.step = StepKind::Jump { cutoff: top < 0 };
            block.top_height = top.max(0);
        } else if is_fall {
            block.step = StepKind::Fall;
            block.top_height = (previous.top_height + JUMP_FALL_HEIGHT).min(CORRIDOR_HEIGHT - SEPARATION);
        } else {
            block.top_height = sample_level_height(previous.top_height, rng)?;
        }

        Ok(block)
    }

    /// Build a full sequence of `count` blocks
    pub fn generate_sequence<R: Rng + ?Sized>(
        &self,
        is_first_of_run: bool,
        closure: i32,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<TerrainBlock>, GenerationError> {
        let mut blocks = Vec::with_capacity(count);
        if count == 0 {
            return Ok(blocks);
        }
        blocks.push(self.generate_first(is_first_of_run, closure));
        for i in 1..count {
            let next = self.generate_next(&blocks[i - 1], rng)?;
            blocks.push(next);
        }
        Ok(blocks)
    }
}

/// Whether a level block may take `candidate` after a block at `previous`
pub fn level_height_fits(previous: i32, candidate: i32) -> bool {
    (candidate - previous).abs() <= TOLERANCE
        && candidate >= TOP_BOTTOM_DISTANCE
        && candidate + SEPARATION + TOP_BOTTOM_DISTANCE <= CORRIDOR_HEIGHT
}

/// Rejection-sample a level height over the whole corridor
fn sample_level_height<R: Rng + ?Sized>(previous: i32, rng: &mut R) -> Result<i32, GenerationError> {
    for _ in 0..MAX_HEIGHT_ATTEMPTS {
        let candidate = rng.random_range(0..CORRIDOR_HEIGHT);
        if level_height_fits(previous, candidate) {
            return Ok(candidate);
        }
    }
    Err(GenerationError::NoFeasibleHeight {
        previous,
        attempts: MAX_HEIGHT_ATTEMPTS,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    /// Chain `count` blocks after a first block, ignoring sequence boundaries
    fn chain(seed: u64, count: usize, params: GenerationParams) -> Vec<TerrainBlock> {
        let generator = BlockGenerator::new(params);
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut blocks = vec![generator.generate_first(false, 0)];
        for _ in 1..count {
            let next = generator
                .generate_next(blocks.last().unwrap(), &mut rng)
                .unwrap();
            blocks.push(next);
        }
        blocks
    }

    #[test]
    fn test_first_block() {
        let generator = BlockGenerator::default();
        let first = generator.generate_first(true, 0);
        assert!(first.is_gap);
        assert_eq!(first.top_height, CORRIDOR_HEIGHT / 2 - GAP);
        assert_eq!(first.step, StepKind::Level);

        let later = generator.generate_first(false, 77);
        assert!(!later.is_gap);
        assert_eq!(later.closure_amount(), 77);
    }

    #[test]
    fn test_sequence_has_fixed_length_and_indices() {
        let generator = BlockGenerator::default();
        let mut rng = Pcg32::seed_from_u64(7);
        let blocks = generator
            .generate_sequence(true, 0, BLOCK_COUNT, &mut rng)
            .unwrap();
        assert_eq!(blocks.len(), BLOCK_COUNT);
        for (i, block) in blocks.iter().enumerate() {
            assert_eq!(block.index, i);
            assert_eq!(block.x_position(), i as i32 * BLOCK_WIDTH);
        }
    }

    #[test]
    fn test_gap_forced_after_limit() {
        let generator = BlockGenerator::new(GenerationParams {
            gap_chance: 0.0,
            step_chance: 0.0,
        });
        let mut rng = Pcg32::seed_from_u64(1);
        let mut previous = TerrainBlock::new(0, 106);
        previous.blocks_since_last_gap = MAX_BLOCKS_WITHOUT_GAP;
        let next = generator.generate_next(&previous, &mut rng).unwrap();
        assert!(next.is_gap);
        assert_eq!(next.blocks_since_last_gap, 0);
    }

    #[test]
    fn test_jump_clamps_at_top_and_marks_cutoff() {
        let generator = BlockGenerator::new(GenerationParams {
            gap_chance: 0.0,
            step_chance: 1.0,
        });
        let mut rng = Pcg32::seed_from_u64(3);
        let previous = TerrainBlock::new(0, 40);
        let next = generator.generate_next(&previous, &mut rng).unwrap();
        assert_eq!(next.step, StepKind::Jump { cutoff: true });
        assert_eq!(next.top_height, 0);

        let previous = TerrainBlock::new(0, 150);
        let next = generator.generate_next(&previous, &mut rng).unwrap();
        assert_eq!(next.step, StepKind::Jump { cutoff: false });
        assert_eq!(next.top_height, 50);
    }

    #[test]
    fn test_closure_is_inherited() {
        let generator = BlockGenerator::default();
        let mut rng = Pcg32::seed_from_u64(11);
        let blocks = generator
            .generate_sequence(false, 93, BLOCK_COUNT, &mut rng)
            .unwrap();
        assert!(blocks.iter().all(|b| b.closure_amount() == 93));
    }

    #[test]
    fn test_generation_is_deterministic() {
        let a = chain(99, 200, GenerationParams::default());
        let b = chain(99, 200, GenerationParams::default());
        assert_eq!(a, b);
    }

    proptest! {
        #[test]
        fn prop_never_more_than_ten_solid_blocks(seed in any::<u64>()) {
            let blocks = chain(seed, 400, GenerationParams::default());
            let mut run = 0;
            for block in &blocks {
                run = if block.is_gap { 0 } else { run + 1 };
                prop_assert!(run <= MAX_BLOCKS_WITHOUT_GAP);
            }
        }

        #[test]
        fn prop_level_blocks_stay_near_previous(seed in any::<u64>()) {
            let blocks = chain(seed, 400, GenerationParams::default());
            for pair in blocks.windows(2) {
                if pair[1].step == StepKind::Level {
                    prop_assert!((pair[1].top_height - pair[0].top_height).abs() <= TOLERANCE);
                    prop_assert!(pair[1].top_height >= TOP_BOTTOM_DISTANCE);
                    prop_assert!(pair[1].floor_y() + TOP_BOTTOM_DISTANCE <= CORRIDOR_HEIGHT);
                }
            }
        }

        #[test]
        fn prop_step_blocks_stay_in_corridor(seed in any::<u64>()) {
            let blocks = chain(seed, 400, GenerationParams { gap_chance: GAP_CHANCE, step_chance: 0.4 });
            for block in &blocks {
                if block.step != StepKind::Level {
                    prop_assert!(block.top_height >= 0);
                    prop_assert!(block.top_height <= CORRIDOR_HEIGHT - SEPARATION);
                }
                prop_assert!(!(block.is_jump_block() && block.is_fall_block()));
            }
        }
    }
}
