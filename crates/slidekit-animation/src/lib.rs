//! Animation primitives for slidekit: ease-out tweens driven by frames and
//! the momentum model behind tossed drags.

pub mod easing;
pub mod toss;
pub mod tween;

pub use easing::{ease_out, Lerp};
pub use toss::{
    clamp_overshoot, snap_distance, TossConfig, TossState, TossStep, MAX_TOSS_VELOCITY,
    MIN_TOSS_VELOCITY,
};
pub use tween::{FrameTween, TweenSpec};
