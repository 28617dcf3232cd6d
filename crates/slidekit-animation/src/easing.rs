//! Easing for settle transitions.

/// Trait for types that can be linearly interpolated.
pub trait Lerp {
    fn lerp(&self, target: &Self, fraction: f32) -> Self;
}

impl Lerp for f32 {
    fn lerp(&self, target: &Self, fraction: f32) -> Self {
        self + (target - self) * fraction
    }
}

/// Second control point of the CSS `ease-out` curve; the first is the origin.
const EASE_OUT_CONTROL: (f32, f32) = (0.58, 1.0);

const SOLVE_EPSILON: f32 = 1e-6;
const SOLVE_ITERATIONS: usize = 24;

/// CSS `ease-out`, the curve native transitions on animated surfaces use, so
/// frame-driven tweens move the same way.
pub fn ease_out(fraction: f32) -> f32 {
    if fraction <= 0.0 {
        return 0.0;
    }
    if fraction >= 1.0 {
        return 1.0;
    }

    // x(t) is increasing on [0, 1], so bisection always finds the parameter.
    let (control_x, control_y) = EASE_OUT_CONTROL;
    let (mut low, mut high) = (0.0_f32, 1.0_f32);
    let mut t = fraction;
    for _ in 0..SOLVE_ITERATIONS {
        let x = bezier_coordinate(control_x, t);
        if (x - fraction).abs() < SOLVE_EPSILON {
            break;
        }
        if x < fraction {
            low = t;
        } else {
            high = t;
        }
        t = 0.5 * (low + high);
    }
    bezier_coordinate(control_y, t)
}

/// One coordinate of a cubic bezier from 0 to 1 whose first control point
/// sits at 0.
fn bezier_coordinate(second_control: f32, t: f32) -> f32 {
    3.0 * (1.0 - t) * t * t * second_control + t * t * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_are_exact() {
        assert_eq!(ease_out(0.0), 0.0);
        assert_eq!(ease_out(1.0), 1.0);
        assert_eq!(ease_out(-0.5), 0.0);
        assert_eq!(ease_out(1.5), 1.0);
    }

    #[test]
    fn ease_out_leads_linear() {
        for fraction in [0.1, 0.3, 0.5, 0.9] {
            let eased = ease_out(fraction);
            assert!(eased > fraction, "{fraction} eased to {eased}");
        }
    }

    #[test]
    fn curve_is_monotonic() {
        let mut previous = 0.0;
        for i in 0..=50 {
            let value = ease_out(i as f32 / 50.0);
            assert!(value + 1e-4 >= previous);
            previous = value;
        }
    }

    #[test]
    fn lerp_interpolates() {
        assert_eq!(0.0f32.lerp(&100.0, 0.25), 25.0);
        assert_eq!((-320.0f32).lerp(&0.0, 0.5), -160.0);
    }
}
