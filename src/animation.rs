// src/animation.rs
//
// Animation is driven by a discrete tick. Every animated tile shows
// `(tick + phase(x, y)) % state_count`, so neighbours start at different
// points of their cycle and the whole sequence is a pure function of the
// time deltas fed in.

use tracing::warn;

use crate::level::GridPosition;
use crate::tiles::AnimationState;

/// Shortest allowed time between animation ticks, in seconds.
pub const MIN_FRAME_TIME: f32 = 0.05;
/// Longest allowed time between animation ticks, in seconds.
pub const MAX_FRAME_TIME: f32 = 2.0;

/// Per-cell offset into the animation cycle.
#[inline]
pub fn phase(pos: GridPosition, state_count: u8) -> u8 {
    if state_count <= 1 {
        return 0;
    }
    let h = pos.x.wrapping_mul(73_856_093) ^ pos.y.wrapping_mul(19_349_663);
    (h % state_count as u32) as u8
}

/// Animation state of the cell at `pos` on `tick`.
#[inline]
pub fn state_at(tick: u64, pos: GridPosition, state_count: u8) -> AnimationState {
    if state_count <= 1 {
        return AnimationState(0);
    }
    let count = state_count as u64;
    AnimationState(((tick % count + phase(pos, state_count) as u64) % count) as u8)
}

/// Clamps a tick interval into `[MIN_FRAME_TIME, MAX_FRAME_TIME]`.
pub fn clamp_frame_time(secs: f32) -> f32 {
    if !secs.is_finite() {
        warn!(secs, "non-finite animation frame time, using minimum");
        return MIN_FRAME_TIME;
    }
    let clamped = secs.clamp(MIN_FRAME_TIME, MAX_FRAME_TIME);
    if clamped != secs {
        warn!(requested = secs, clamped, "animation frame time out of range");
    }
    clamped
}

/// Turns elapsed time into animation ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationClock {
    enabled: bool,
    frame_time: f32,
    accumulator: f32,
    tick: u64,
}

impl AnimationClock {
    /// New clock at tick 0.
    pub fn new(enabled: bool, frame_time: f32) -> Self {
        Self {
            enabled,
            frame_time: clamp_frame_time(frame_time),
            accumulator: 0.0,
            tick: 0,
        }
    }

    /// Feeds `delta` seconds; returns `true` when the tick moved.
    pub fn advance(&mut self, delta: f32) -> bool {
        if !delta.is_finite() || delta < 0.0 {
            warn!(delta, "ignoring invalid time delta");
            return false;
        }
        if !self.enabled {
            return false;
        }
        self.accumulator += delta;
        let steps = (self.accumulator / self.frame_time).floor();
        if steps < 1.0 {
            return false;
        }
        self.accumulator -= steps * self.frame_time;
        if !(0.0..self.frame_time).contains(&self.accumulator) {
            // precision lost; drop the remainder
            self.accumulator = 0.0;
        }
        self.tick = self.tick.saturating_add(steps as u64);
        true
    }

    /// Pausing keeps the current tick.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.accumulator = 0.0;
        }
    }

    /// Whether [`AnimationClock::advance`] moves the tick.
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Sets the tick interval, clamped to the supported range.
    pub fn set_frame_time(&mut self, secs: f32) {
        self.frame_time = clamp_frame_time(secs);
    }

    /// Seconds per tick.
    pub fn frame_time(&self) -> f32 {
        self.frame_time
    }

    /// Current tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticks_accumulate_fractional_time() {
        let mut clock = AnimationClock::new(true, 0.2);
        assert!(!clock.advance(0.1));
        assert!(clock.advance(0.15));
        assert_eq!(clock.tick(), 1);
        assert!(clock.advance(0.5));
        assert_eq!(clock.tick(), 3);
    }

    #[test]
    fn huge_deltas_never_move_the_tick_backwards() {
        let mut clock = AnimationClock::new(true, 0.25);
        assert!(clock.advance(1.0));
        assert_eq!(clock.tick(), 4);
        assert!(clock.advance(1e30));
        assert!(clock.tick() > 4);
        let before = clock.tick();
        clock.advance(f32::MAX);
        assert!(clock.tick() >= before);
        assert_eq!(clock.tick(), u64::MAX);
        assert!(!clock.advance(0.1));
        assert_eq!(clock.tick(), u64::MAX);
    }

    #[test]
    fn disabled_clock_does_not_tick() {
        let mut clock = AnimationClock::new(false, 0.2);
        assert!(!clock.advance(10.0));
        assert_eq!(clock.tick(), 0);
        clock.set_enabled(true);
        assert!(clock.advance(0.2));
    }

    #[test]
    fn invalid_deltas_are_ignored() {
        let mut clock = AnimationClock::new(true, 0.2);
        assert!(!clock.advance(-1.0));
        assert!(!clock.advance(f32::NAN));
        assert_eq!(clock.tick(), 0);
    }

    #[test]
    fn frame_time_is_clamped() {
        let mut clock = AnimationClock::new(true, 0.0);
        assert_eq!(clock.frame_time(), MIN_FRAME_TIME);
        clock.set_frame_time(30.0);
        assert_eq!(clock.frame_time(), MAX_FRAME_TIME);
    }

    #[test]
    fn neighbours_are_desynchronised() {
        let a = state_at(0, GridPosition::new(0, 0), 5);
        let b = state_at(0, GridPosition::new(1, 0), 5);
        assert_ne!(a, b);
        assert_eq!(state_at(7, GridPosition::new(3, 4), 1), AnimationState(0));
    }

    #[test]
    fn state_cycles_with_tick() {
        let pos = GridPosition::new(4, 9);
        let start = state_at(0, pos, 5);
        assert_eq!(state_at(5, pos, 5), start);
        assert_ne!(state_at(1, pos, 5), start);
    }
}
