//! Momentum ("toss") physics.
//!
//! A toss projects how far a released drag would coast if its velocity decayed
//! geometrically every frame, reconciles that distance against page snapping
//! and the boundary, and then consumes it frame by frame in proportion to the
//! elapsed time.

/// Slowest release velocity (px/ms) that still produces a toss.
pub const MIN_TOSS_VELOCITY: f32 = 0.1;

/// Fastest release velocity (px/ms). Infinite samples clamp here.
pub const MAX_TOSS_VELOCITY: f32 = 20.0;

/// Per-frame velocity retention used to project the toss distance.
pub const TOSS_DECAY: f32 = 0.9;

/// Nominal frame length used by the projection.
pub const TOSS_FRAME_MILLIS: f32 = 16.0;

/// Frames closer together than this are skipped; some hosts deliver paint
/// callbacks faster than they can render.
pub const MIN_FRAME_INTERVAL_MILLIS: u64 = 5;

/// Remaining distances and per-frame steps below this are treated as settled.
pub const SETTLE_EPSILON: f32 = 0.1;

/// Tunables for the momentum simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TossConfig {
    pub min_velocity: f32,
    pub max_velocity: f32,
    pub decay: f32,
    pub frame_millis: f32,
    pub min_frame_interval_millis: u64,
    pub settle_epsilon: f32,
}

impl Default for TossConfig {
    fn default() -> Self {
        Self {
            min_velocity: MIN_TOSS_VELOCITY,
            max_velocity: MAX_TOSS_VELOCITY,
            decay: TOSS_DECAY,
            frame_millis: TOSS_FRAME_MILLIS,
            min_frame_interval_millis: MIN_FRAME_INTERVAL_MILLIS,
            settle_epsilon: SETTLE_EPSILON,
        }
    }
}

impl TossConfig {
    /// Brings a raw release velocity into the simulated range.
    ///
    /// NaN counts as zero and anything faster than `max_velocity` (including
    /// infinities) is clamped. Velocities slower than `min_velocity` abort the
    /// toss (`None`) unless `snap_to_nearest` is set, in which case they are
    /// lifted to the minimum, keeping their sign or the sign of the drag.
    pub fn normalize_velocity(&self, velocity: f32, drag: f32, snap_to_nearest: bool) -> Option<f32> {
        let velocity = if velocity.is_nan() { 0.0 } else { velocity };
        let velocity = velocity.clamp(-self.max_velocity, self.max_velocity);
        if velocity.abs() >= self.min_velocity {
            return Some(velocity);
        }
        if !snap_to_nearest {
            return None;
        }
        let direction = if velocity != 0.0 {
            velocity.signum()
        } else if drag != 0.0 {
            drag.signum()
        } else {
            return None;
        };
        Some(direction * self.min_velocity)
    }

    /// Distance covered when `velocity` decays by `decay` each nominal frame
    /// until a frame moves less than one whole pixel.
    pub fn project_distance(&self, velocity: f32) -> f32 {
        if !velocity.is_finite() || self.decay <= 0.0 || self.decay >= 1.0 {
            return 0.0;
        }
        let mut step = velocity * self.frame_millis;
        let mut total = 0.0;
        while step.trunc() != 0.0 {
            total += step;
            step *= self.decay;
        }
        total
    }
}

/// Rounds a projected distance so the toss ends on a whole page, accounting
/// for the part of a page already dragged.
pub fn snap_distance(total_distance: f32, drag: f32, page_width: f32) -> f32 {
    if page_width <= 0.0 {
        return total_distance;
    }
    let pages = (total_distance / page_width).round();
    let overflow = drag % page_width;
    pages * page_width - overflow
}

/// Pulls `total_distance` back so the overshoot at the resting point stays
/// within `limit` in either direction.
pub fn clamp_overshoot(total_distance: f32, overshoot_at_rest: f32, limit: f32) -> f32 {
    if overshoot_at_rest < -limit {
        total_distance - (overshoot_at_rest + limit)
    } else if overshoot_at_rest > limit {
        total_distance - (overshoot_at_rest - limit)
    } else {
        total_distance
    }
}

/// Outcome of advancing a toss by one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TossStep {
    /// Frame arrived too soon after the previous one; nothing moved.
    Skip,
    /// Move by this many pixels and keep going.
    Advance(f32),
    /// Move by this many pixels and settle.
    Finished(f32),
}

/// Live state of one toss.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TossState {
    initial_velocity: f32,
    total_distance: f32,
    remaining_distance: f32,
    last_frame_time: u64,
}

impl TossState {
    pub fn new(initial_velocity: f32, total_distance: f32, start_time_millis: u64) -> Self {
        Self {
            initial_velocity,
            total_distance,
            remaining_distance: total_distance,
            last_frame_time: start_time_millis,
        }
    }

    pub fn initial_velocity(&self) -> f32 {
        self.initial_velocity
    }

    pub fn total_distance(&self) -> f32 {
        self.total_distance
    }

    pub fn remaining_distance(&self) -> f32 {
        self.remaining_distance
    }

    /// Consumes the share of the remaining distance that `initial_velocity`
    /// covers in the time since the previous frame.
    pub fn advance(&mut self, frame_time_millis: u64, config: &TossConfig) -> TossStep {
        let elapsed = frame_time_millis.saturating_sub(self.last_frame_time);
        if elapsed < config.min_frame_interval_millis {
            return TossStep::Skip;
        }
        self.last_frame_time = frame_time_millis;

        if self.total_distance == 0.0 || self.remaining_distance.abs() < config.settle_epsilon {
            return TossStep::Finished(0.0);
        }

        let fraction =
            (self.initial_velocity.abs() * elapsed as f32 / self.total_distance.abs()).min(1.0);
        let step = self.remaining_distance * fraction;
        self.remaining_distance -= step;

        if step.abs() < config.settle_epsilon
            || self.remaining_distance.abs() < config.settle_epsilon
        {
            TossStep::Finished(step)
        } else {
            TossStep::Advance(step)
        }
    }
}

#[cfg(test)]
#[path = "tests/toss_tests.rs"]
mod tests;
