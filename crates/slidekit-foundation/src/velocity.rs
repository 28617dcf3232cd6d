//! Release velocity estimation for horizontal drags.

use crate::gesture_constants::VELOCITY_SAMPLE_CAPACITY;

/// Fixed-size ring of the most recent per-move velocities (px/ms).
///
/// A sample moving against the most recent non-zero sample empties the ring
/// first, so a flick that reverses direction is not averaged with the motion
/// it just undid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VelocityRing {
    /// Ring buffer of samples.
    samples: [Option<f32>; VELOCITY_SAMPLE_CAPACITY],
    /// Next slot to overwrite.
    next: usize,
    /// Direction of the most recent non-zero sample.
    direction: Option<bool>,
}

impl VelocityRing {
    pub fn new() -> Self {
        Self::default()
    }

    /// Velocity for `distance` travelled over `elapsed_millis`.
    ///
    /// Zero elapsed time yields a signed infinity for any movement and zero
    /// otherwise.
    pub fn sample_velocity(distance: f32, elapsed_millis: u64) -> f32 {
        if elapsed_millis == 0 {
            if distance == 0.0 || distance.is_nan() {
                0.0
            } else {
                f32::INFINITY.copysign(distance)
            }
        } else {
            distance / elapsed_millis as f32
        }
    }

    pub fn push(&mut self, velocity: f32) {
        if velocity != 0.0 && !velocity.is_nan() {
            let forward = velocity > 0.0;
            if self.direction.is_some_and(|previous| previous != forward) {
                log::trace!("velocity reversed, dropping {} samples", self.len());
                self.samples = [None; VELOCITY_SAMPLE_CAPACITY];
                self.next = 0;
            }
            self.direction = Some(forward);
        }
        self.samples[self.next] = Some(velocity);
        self.next = (self.next + 1) % VELOCITY_SAMPLE_CAPACITY;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn len(&self) -> usize {
        self.samples.iter().flatten().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn samples(&self) -> impl Iterator<Item = f32> + '_ {
        self.samples.iter().flatten().copied()
    }

    /// Mean of the held samples, or 0 when empty.
    pub fn average(&self) -> f32 {
        let count = self.len();
        if count == 0 {
            return 0.0;
        }
        self.samples().sum::<f32>() / count as f32
    }
}
