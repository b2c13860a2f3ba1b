//! Cave closing hazard
//!
//! One shared timeline drives every block: Open -> Closing (quad-out ease)
//! -> Closed (instant) -> Opening (linear) -> Open. Durations shrink with the
//! level. When the cave is regenerated mid-animation the timeline resumes on
//! the new blocks instead of snapping open.

use serde::{Deserialize, Serialize};

use super::block::TerrainBlock;
use crate::consts::*;

/// `scale * base^(level - offset) + floor`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpCurve {
    pub scale: f32,
    pub base: f32,
    pub offset: f32,
    pub floor: f32,
}

impl ExpCurve {
    pub fn at(&self, level: i32) -> f32 {
        self.scale * self.base.powf(level as f32 - self.offset) + self.floor
    }
}

/// Level progression for the hazard (all values in seconds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardTuning {
    pub close_secs: ExpCurve,
    pub open_secs: ExpCurve,
    pub interval_secs: ExpCurve,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            // 3.0s at level 0, approaching 0.5s
            close_secs: ExpCurve {
                scale: 1.0,
                base: 0.95,
                offset: 17.864,
                floor: 0.5,
            },
            // 2.0s at level 0, approaching 0.3s
            open_secs: ExpCurve {
                scale: 1.0,
                base: 0.95,
                offset: 10.34,
                floor: 0.3,
            },
            // 10s at level 0, approaching 3s
            interval_secs: ExpCurve {
                scale: 0.001,
                base: 0.95,
                offset: 172.61,
                floor: 3.0,
            },
        }
    }
}

/// Where the shared animation currently is
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum HazardPhase {
    /// Settled open, counting down to the next close
    Open { next_close_in: f32 },
    /// Animating from `from` toward `SEPARATION`
    Closing { from: i32, elapsed: f32, duration: f32 },
    /// Animating from `from` toward 0
    Opening { from: i32, elapsed: f32, duration: f32 },
}

/// Per-run timing, re-derived on every regeneration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HazardTimeline {
    pub close_duration: f32,
    pub open_duration: f32,
    /// Period between close triggers
    pub interval: f32,
    pub is_opening: bool,
    /// Time spent opening since the cave last reached Closed
    pub elapsed_since_open_start: f32,
    pub time_since_last_close_trigger: f32,
    /// Animation was carried across a regeneration; the next close waits a
    /// full interval once opening completes
    pub resumed: bool,
}

/// Phase transitions reported by [`HazardController::advance`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardEvent {
    CloseTriggered,
    Closed,
    Opened,
}

/// How the timeline continued after a regeneration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resumption {
    /// Cave was open; next close rescheduled against the new interval
    Rescheduled,
    /// Cave was closing; closing restarted from the current closure
    RestartedClosing,
    /// Cave was opening; opening continues for the remaining time
    ResumedOpening,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HazardController {
    tuning: HazardTuning,
    timeline: HazardTimeline,
    phase: HazardPhase,
    closure: i32,
}

impl Default for HazardController {
    fn default() -> Self {
        Self::new(HazardTuning::default())
    }
}

impl HazardController {
    pub fn new(tuning: HazardTuning) -> Self {
        let mut hazard = Self {
            tuning,
            timeline: HazardTimeline {
                close_duration: 0.0,
                open_duration: 0.0,
                interval: 0.0,
                is_opening: false,
                elapsed_since_open_start: 0.0,
                time_since_last_close_trigger: 0.0,
                resumed: false,
            },
            phase: HazardPhase::Open {
                next_close_in: FIRST_CLOSE_DELAY_SECS,
            },
            closure: 0,
        };
        hazard.retime(0);
        hazard
    }

    /// Back to a fresh, open timeline (new run)
    pub fn reset(&mut self) {
        *self = Self::new(self.tuning);
    }

    pub fn timeline(&self) -> &HazardTimeline {
        &self.timeline
    }

    pub fn phase(&self) -> HazardPhase {
        self.phase
    }

    /// Current closure shared by every block
    pub fn closure(&self) -> i32 {
        self.closure
    }

    pub fn is_closing(&self) -> bool {
        matches!(self.phase, HazardPhase::Closing { .. })
    }

    /// Recompute durations for `level`. Phase is left untouched.
    pub fn retime(&mut self, level: i32) {
        self.timeline.close_duration = self.tuning.close_secs.at(level);
        self.timeline.open_duration = self.tuning.open_secs.at(level);
        self.timeline.interval = self.tuning.interval_secs.at(level);
    }

    /// Advance the animation clock by `dt` seconds and write the resulting
    /// closure onto `blocks`.
    pub fn advance(&mut self, dt: f32, blocks: &mut [TerrainBlock]) -> Option<HazardEvent> {
        self.timeline.time_since_last_close_trigger += dt;

        match self.phase {
            HazardPhase::Open { next_close_in } => {
                let remaining = next_close_in - dt;
                if remaining > 0.0 {
                    self.phase = HazardPhase::Open {
                        next_close_in: remaining,
                    };
                    return None;
                }
                self.timeline.time_since_last_close_trigger = 0.0;
                self.phase = HazardPhase::Closing {
                    from: self.closure,
                    elapsed: 0.0,
                    duration: self.timeline.close_duration.max(MIN_ANIMATION_SECS),
                };
                Some(HazardEvent::CloseTriggered)
            }
            HazardPhase::Closing {
                from,
                elapsed,
                duration,
            } => {
                let elapsed = elapsed + dt;
                if elapsed >= duration {
                    self.set_closure(SEPARATION, blocks);
                    for block in blocks.iter_mut() {
                        block.closed = true;
                    }
                    self.timeline.is_opening = true;
                    self.timeline.elapsed_since_open_start = 0.0;
                    self.phase = HazardPhase::Opening {
                        from: SEPARATION,
                        elapsed: 0.0,
                        duration: self.timeline.open_duration.max(MIN_ANIMATION_SECS),
                    };
                    return Some(HazardEvent::Closed);
                }
                let t = ease_quad_out(elapsed / duration);
                let value = from as f32 + (SEPARATION - from) as f32 * t;
                self.set_closure(value as i32, blocks);
                self.phase = HazardPhase::Closing {
                    from,
                    elapsed,
                    duration,
                };
                None
            }
            HazardPhase::Opening {
                from,
                elapsed,
                duration,
            } => {
                let elapsed = elapsed + dt;
                self.timeline.elapsed_since_open_start += dt;
                if elapsed >= duration {
                    self.set_closure(0, blocks);
                    for block in blocks.iter_mut() {
                        block.closed = false;
                    }
                    self.timeline.is_opening = false;
                    self.timeline.elapsed_since_open_start = 0.0;
                    let next_close_in = if std::mem::take(&mut self.timeline.resumed) {
                        self.timeline.interval.max(MIN_ANIMATION_SECS)
                    } else {
                        self.until_next_close()
                    };
                    self.phase = HazardPhase::Open { next_close_in };
                    return Some(HazardEvent::Opened);
                }
                let value = from as f32 * (1.0 - elapsed / duration);
                self.set_closure(value as i32, blocks);
                self.phase = HazardPhase::Opening {
                    from,
                    elapsed,
                    duration,
                };
                None
            }
        }
    }

    /// Continue the current animation on a freshly generated block set.
    ///
    /// Call after [`retime`](Self::retime) so the new level's durations apply.
    pub fn resume(&mut self, blocks: &mut [TerrainBlock]) -> Resumption {
        for block in blocks.iter_mut() {
            block.set_closure_amount(self.closure);
            block.closed = false;
        }

        match self.phase {
            HazardPhase::Open { next_close_in } => {
                self.phase = HazardPhase::Open {
                    next_close_in: next_close_in.min(self.until_next_close()),
                };
                Resumption::Rescheduled
            }
            HazardPhase::Closing { .. } => {
                self.timeline.time_since_last_close_trigger = 0.0;
                self.timeline.resumed = true;
                self.phase = HazardPhase::Closing {
                    from: self.closure,
                    elapsed: 0.0,
                    duration: self.timeline.close_duration.max(MIN_ANIMATION_SECS),
                };
                Resumption::RestartedClosing
            }
            HazardPhase::Opening { .. } => {
                let remaining = self.timeline.open_duration - self.timeline.elapsed_since_open_start;
                self.timeline.time_since_last_close_trigger = 0.0;
                self.timeline.is_opening = true;
                self.timeline.resumed = true;
                self.phase = HazardPhase::Opening {
                    from: self.closure,
                    elapsed: 0.0,
                    duration: remaining.max(MIN_ANIMATION_SECS),
                };
                Resumption::ResumedOpening
            }
        }
    }

    fn until_next_close(&self) -> f32 {
        (self.timeline.interval - self.timeline.time_since_last_close_trigger).max(MIN_ANIMATION_SECS)
    }

    fn set_closure(&mut self, value: i32, blocks: &mut [TerrainBlock]) {
        self.closure = value.clamp(0, SEPARATION);
        for block in blocks.iter_mut() {
            block.set_closure_amount(self.closure);
        }
    }
}

/// Quadratic ease-out over `t` in [0, 1]
#[inline]
fn ease_quad_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * (2.0 - t)
}
