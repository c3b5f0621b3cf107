//! Piecewise-linear calibration curves.
//!
//! Every empirical correction in the flight model is a list of
//! `(breakpoint, value)` pairs evaluated with clamped linear interpolation.
//! Inputs outside the table clamp to the nearest endpoint so that shots beyond
//! the calibrated range still produce a plausible value.

/// Ordered `(breakpoint, value)` pairs with clamped linear interpolation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Curve {
    points: &'static [(f64, f64)],
    /// Value returned strictly below the first breakpoint, when the
    /// calibration has a step there instead of a continuous clamp.
    below: Option<f64>,
}

impl Curve {
    /// Create a curve from breakpoints sorted by ascending `x`
    pub const fn new(points: &'static [(f64, f64)]) -> Self {
        Self { points, below: None }
    }

    /// Create a curve that steps to `below` for inputs under the first breakpoint
    pub const fn with_step_below(points: &'static [(f64, f64)], below: f64) -> Self {
        Self { points, below: Some(below) }
    }

    pub fn points(&self) -> &'static [(f64, f64)] {
        self.points
    }

    /// Evaluate the curve at `x`
    pub fn interpolate(&self, x: f64) -> f64 {
        let n = self.points.len();
        if n == 0 {
            return self.below.unwrap_or(1.0);
        }

        let (x_first, y_first) = self.points[0];
        if x < x_first {
            return self.below.unwrap_or(y_first);
        }
        if x <= x_first || n == 1 {
            return y_first;
        }

        let (x_last, y_last) = self.points[n - 1];
        if x >= x_last {
            return y_last;
        }

        for window in self.points.windows(2) {
            let (x0, y0) = window[0];
            let (x1, y1) = window[1];
            if x <= x1 {
                return lerp(x, x0, x1, y0, y1);
            }
        }

        y_last
    }
}

/// Linear blend between `(x0, y0)` and `(x1, y1)` with `t = (x - x0) / (x1 - x0)`
#[inline]
pub fn lerp(x: f64, x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    let span = x1 - x0;
    if span.abs() < crate::constants::MIN_DIVISION_THRESHOLD {
        return y0;
    }
    let t = (x - x0) / span;
    y0 + t * (y1 - y0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    static CD: Curve = Curve::new(&[(55.0, 0.85), (75.0, 0.31), (100.0, 0.22)]);
    static STEP: Curve = Curve::with_step_below(&[(2000.0, 0.98), (3000.0, 1.01)], 0.95);

    #[test]
    fn test_interpolates_between_breakpoints() {
        assert_abs_diff_eq!(CD.interpolate(65.0), 0.58, epsilon = 1e-12);
        assert_abs_diff_eq!(CD.interpolate(87.5), 0.265, epsilon = 1e-12);
    }

    #[test]
    fn test_exact_breakpoints() {
        assert_eq!(CD.interpolate(55.0), 0.85);
        assert_abs_diff_eq!(CD.interpolate(75.0), 0.31, epsilon = 1e-12);
        assert_eq!(CD.interpolate(100.0), 0.22);
    }

    #[test]
    fn test_clamps_outside_range() {
        assert_eq!(CD.interpolate(-20.0), 0.85);
        assert_eq!(CD.interpolate(250.0), 0.22);
    }

    #[test]
    fn test_step_below_first_breakpoint() {
        assert_eq!(STEP.interpolate(1999.9), 0.95);
        assert_eq!(STEP.interpolate(2000.0), 0.98);
        assert_abs_diff_eq!(STEP.interpolate(2500.0), 0.995, epsilon = 1e-12);
        assert_eq!(STEP.interpolate(9000.0), 1.01);
    }

    #[test]
    fn test_single_point_curve_is_a_step() {
        static SWITCH: Curve = Curve::with_step_below(&[(2000.0, 1.4)], 1.0);
        assert_eq!(SWITCH.interpolate(1500.0), 1.0);
        assert_eq!(SWITCH.interpolate(2000.0), 1.4);
        assert_eq!(SWITCH.interpolate(6000.0), 1.4);
    }
}
