//! Two-control-point cubic Bezier ease curves.
//!
//! A curve runs from (0, 0) to (127, 127) on the byte scale used by the
//! keyframe interpolation block. [`bezier_ease`] maps a linear time fraction
//! to the eased fraction by inverting the curve's x(t) and evaluating y(t).

/// Upper bound of a control-point coordinate.
pub const CONTROL_MAX: u8 = 127;

/// Residual in x at which the parameter search stops.
const SOLVE_TOLERANCE: f64 = 1e-12;

/// Iteration budget for the parameter search.
const SOLVE_MAX_ITERATIONS: usize = 64;

/// Control points of one ease curve, each coordinate on the 0..=127 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BezierCurve {
    pub x1: u8,
    pub y1: u8,
    pub x2: u8,
    pub y2: u8,
}

impl Default for BezierCurve {
    fn default() -> Self {
        Self::LINEAR
    }
}

impl BezierCurve {
    /// The curve written for linear segments.
    pub const LINEAR: BezierCurve = BezierCurve {
        x1: 20,
        y1: 20,
        x2: 107,
        y2: 107,
    };

    /// Creates a curve from its control points.
    pub const fn new(x1: u8, y1: u8, x2: u8, y2: u8) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Copy with every coordinate clamped to [0, 127].
    pub fn clamped(self) -> Self {
        Self {
            x1: self.x1.min(CONTROL_MAX),
            y1: self.y1.min(CONTROL_MAX),
            x2: self.x2.min(CONTROL_MAX),
            y2: self.y2.min(CONTROL_MAX),
        }
    }

    /// Whether both control points sit on the diagonal, making y(x) = x.
    pub fn is_linear(&self) -> bool {
        let c = self.clamped();
        c.x1 == c.y1 && c.x2 == c.y2
    }

    /// Control points as an (x1, y1, x2, y2) array.
    pub fn to_array(self) -> [u8; 4] {
        [self.x1, self.y1, self.x2, self.y2]
    }

    /// Eased fraction for the linear fraction `x`.
    pub fn ease(&self, x: f64) -> f64 {
        bezier_ease((self.x1, self.y1), (self.x2, self.y2), x)
    }
}

/// Eases `x` in [0, 1] through the curve with control points `c1` and `c2`.
///
/// Control coordinates above 127 are clamped. Inputs outside [0, 1] are
/// pinned to the curve's endpoints.
pub fn bezier_ease(c1: (u8, u8), c2: (u8, u8), x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let curve = BezierCurve::new(c1.0, c1.1, c2.0, c2.1).clamped();
    if curve.is_linear() {
        return x;
    }

    let scale = CONTROL_MAX as f64;
    let t = solve_parameter(curve.x1 as f64 / scale, curve.x2 as f64 / scale, x);
    cubic(curve.y1 as f64 / scale, curve.y2 as f64 / scale, t)
}

/// Finds `t` with `x(t) = x` for the normalized control abscissas `x1`, `x2`.
///
/// Newton steps are taken inside a shrinking bisection bracket; a step that
/// leaves the bracket or meets a vanishing derivative becomes a bisection
/// step. When the budget runs out the current estimate is returned.
pub fn solve_parameter(x1: f64, x2: f64, x: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    let mut t = x;
    for _ in 0..SOLVE_MAX_ITERATIONS {
        let f = cubic(x1, x2, t) - x;
        if f.abs() < SOLVE_TOLERANCE {
            break;
        }
        if f < 0.0 {
            lo = t;
        } else {
            hi = t;
        }

        let d = cubic_derivative(x1, x2, t);
        let newton = if d.abs() > 1e-12 { t - f / d } else { f64::NAN };
        t = if newton > lo && newton < hi {
            newton
        } else {
            0.5 * (lo + hi)
        };
    }
    t
}

/// One coordinate of the cubic with endpoints 0 and 1 and inner control
/// values `p1`, `p2`.
#[inline]
pub(crate) fn cubic(p1: f64, p2: f64, t: f64) -> f64 {
    let (a, b, c) = bernstein_weights(t);
    a * p1 + b * p2 + c
}

#[inline]
fn cubic_derivative(p1: f64, p2: f64, t: f64) -> f64 {
    let s = 1.0 - t;
    3.0 * s * s * p1 + 6.0 * s * t * (p2 - p1) + 3.0 * t * t * (1.0 - p2)
}

/// Weights (w1, w2, w_end) such that a coordinate equals `w1*p1 + w2*p2 + w_end`.
#[inline]
pub(crate) fn bernstein_weights(t: f64) -> (f64, f64, f64) {
    let s = 1.0 - t;
    (3.0 * s * s * t, 3.0 * s * t * t, t * t * t)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoints() {
        let curve = BezierCurve::new(10, 100, 110, 30);
        assert_eq!(curve.ease(0.0), 0.0);
        assert_eq!(curve.ease(1.0), 1.0);
        assert_eq!(curve.ease(-0.5), 0.0);
        assert_eq!(curve.ease(1.5), 1.0);
    }

    #[test]
    fn test_linear_curve_is_identity() {
        for i in 1..10 {
            let x = i as f64 / 10.0;
            assert_eq!(BezierCurve::LINEAR.ease(x), x);
        }
    }

    #[test]
    fn test_solver_converges() {
        let (x1, x2) = (10.0 / 127.0, 110.0 / 127.0);
        for i in 1..100 {
            let x = i as f64 / 100.0;
            let t = solve_parameter(x1, x2, x);
            assert!((cubic(x1, x2, t) - x).abs() < 1e-10, "x = {}", x);
        }
    }

    #[test]
    fn test_ease_in_stays_below_diagonal() {
        // Both control points below the diagonal: slow start.
        let curve = BezierCurve::new(64, 0, 127, 64);
        for i in 1..10 {
            let x = i as f64 / 10.0;
            assert!(curve.ease(x) < x);
        }
    }

    #[test]
    fn test_ease_is_monotonic_for_valid_curve() {
        let curve = BezierCurve::new(20, 5, 90, 127);
        let mut previous = 0.0;
        for i in 1..=50 {
            let y = curve.ease(i as f64 / 50.0);
            assert!(y >= previous);
            previous = y;
        }
    }

    #[test]
    fn test_out_of_range_bytes_are_clamped() {
        let wild = BezierCurve::new(200, 255, 130, 128);
        assert_eq!(wild.clamped(), BezierCurve::new(127, 127, 127, 127));
        let y = wild.ease(0.3);
        assert!((0.0..=1.0).contains(&y));
    }

    #[test]
    fn test_degenerate_flat_start_still_returns() {
        // x(t) has zero slope at t = 0 when x1 = 0; Newton falls back to bisection.
        let y = bezier_ease((0, 127), (0, 127), 0.001);
        assert!(y.is_finite());
        assert!(y > 0.0 && y <= 1.0);
    }
}
