//! Geometry and numeric utilities.
//!
//! These are miscellaneous functions that are functionally pure but also
//! implement well-known algorithms and formulae. They might be reusable
//! elsewhere.
//!
//! Heights are always given as a `(tx, rx)` tuple in metres. They must be
//! positive, as must distances; this is not checked.

/// Length of the direct (line-of-sight) ray.
pub fn length_los(distance: f64, heights: (f64, f64)) -> f64 {
    distance.hypot(heights.0 - heights.1)
}

/// Length of the ray reflected off the ground.
///
/// By the image method, this is the distance to the receiver mirrored below
/// the ground plane, hence always longer than the direct ray.
pub fn length_ref(distance: f64, heights: (f64, f64)) -> f64 {
    distance.hypot(heights.0 + heights.1)
}

/// Path length difference _Δd = d_ref − d_los_ between the two rays.
///
/// This is strictly decreasing in the distance, starting from
/// _2 min(h_tx, h_rx)_ right under the transmitter and tending to zero.
///
/// Computed as _4 h_tx h_rx / (d_ref + d_los)_ rather than the difference
/// itself, which cancels catastrophically at long range.
pub fn path_difference(distance: f64, heights: (f64, f64)) -> f64 {
    4.0 * heights.0 * heights.1 / (length_ref(distance, heights) + length_los(distance, heights))
}

/// Converts a linear power ratio to decibels.
pub fn to_decibel(power: f64) -> f64 {
    10.0 * power.log10()
}

/// `num` points evenly spaced in log10 between `10^start` and `10^stop`.
pub fn logspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![10f64.powf(start)],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| 10f64.powf(start + step * i as f64))
                .collect()
        }
    }
}

/// Options for [`minimise_bounded`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinimiseOptions {
    /// Maximum number of function evaluations after the initial one.
    pub max_iter: usize,

    /// Absolute tolerance on the abscissa.
    pub xatol: f64,
}

impl Default for MinimiseOptions {
    fn default() -> Self {
        Self {
            max_iter: 500,
            xatol: 1e-5,
        }
    }
}

/// Result of a bounded scalar minimisation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Minimum {
    /// Abscissa of the minimum found.
    pub x: f64,

    /// Function value there.
    pub value: f64,

    /// Number of iterations used.
    pub iterations: usize,

    /// Whether the tolerance was met before the iteration cap.
    pub converged: bool,
}

/// Golden section ratio, _(3 − √5) / 2_.
const GOLDEN: f64 = 0.381_966_011_250_105_1;

/// Brent's bounded minimisation of a scalar function over `[a, b]`.
///
/// This is the classic combination of golden-section steps with parabolic
/// interpolation, as in Brent's _Algorithms for Minimization without
/// Derivatives_ (1973) and `fminbound` in many numeric libraries. The search
/// starts at `start` (clamped into the bounds) so that results are
/// reproducible for a given seed.
///
/// Non-finite function values are tolerated: they are never accepted as an
/// improvement and they disable the parabolic step, falling back to golden
/// section. The loop always terminates after `options.max_iter` iterations;
/// check [`Minimum::converged`] for whether the result is within tolerance.
pub fn minimise_bounded<F>(
    f: F,
    bounds: (f64, f64),
    start: f64,
    options: MinimiseOptions,
) -> Minimum
where
    F: Fn(f64) -> f64,
{
    let (mut a, mut b) = if bounds.0 <= bounds.1 {
        bounds
    } else {
        (bounds.1, bounds.0)
    };
    let sqrt_eps = f64::EPSILON.sqrt();

    let mut x = start.max(a).min(b);
    let mut fx = f(x);
    let (mut w, mut fw) = (x, fx);
    let (mut v, mut fv) = (x, fx);

    // step taken on the last iteration, and on the one before that
    let mut step = 0.0_f64;
    let mut prev_step = 0.0_f64;

    let mut iterations = 0;
    let mut converged = true;

    loop {
        let xm = 0.5 * (a + b);
        let tol1 = sqrt_eps * x.abs() + options.xatol / 3.0;
        let tol2 = 2.0 * tol1;

        if (x - xm).abs() <= tol2 - 0.5 * (b - a) {
            break;
        }

        if iterations >= options.max_iter {
            converged = false;
            break;
        }
        iterations += 1;

        let mut golden = true;
        if prev_step.abs() > tol1 {
            let r = (x - w) * (fx - fv);
            let mut q = (x - v) * (fx - fw);
            let mut p = (x - v) * q - (x - w) * r;
            q = 2.0 * (q - r);
            if q > 0.0 {
                p = -p;
            }
            q = q.abs();
            let older = prev_step;
            prev_step = step;

            // NaN from non-finite values fails every comparison below
            if p.abs() < (0.5 * q * older).abs() && p > q * (a - x) && p < q * (b - x) {
                step = p / q;
                let u = x + step;
                if (u - a) < tol2 || (b - u) < tol2 {
                    step = if xm >= x { tol1 } else { -tol1 };
                }
                golden = false;
            }
        }

        if golden {
            prev_step = if x >= xm { a - x } else { b - x };
            step = GOLDEN * prev_step;
        }

        let direction = if step < 0.0 { -1.0 } else { 1.0 };
        let u = x + direction * step.abs().max(tol1);
        let fu = f(u);

        if fu <= fx {
            if u >= x {
                a = x;
            } else {
                b = x;
            }
            v = w;
            fv = fw;
            w = x;
            fw = fx;
            x = u;
            fx = fu;
        } else {
            if u < x {
                a = u;
            } else {
                b = u;
            }
            if fu <= fw || w == x {
                v = w;
                fv = fw;
                w = u;
                fw = fu;
            } else if fu <= fv || v == x || v == w {
                v = u;
                fv = fu;
            }
        }
    }

    Minimum {
        x,
        value: fx,
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reflected_path_is_longer() {
        for &d in &[0.1, 1.0, 20.0, 30.0, 1e3, 1e5] {
            for &heights in &[(10.0, 1.5), (1.5, 10.0), (2.0, 2.0), (30.0, 0.5)] {
                let los = length_los(d, heights);
                let rf = length_ref(d, heights);
                assert!(rf > los, "d={} h={:?}", d, heights);
                assert!(los >= d);
                assert!(rf >= d);
            }
        }
    }

    #[test]
    fn path_lengths() {
        assert_relative_eq!(length_los(4.0, (5.0, 2.0)), 5.0);
        assert_relative_eq!(length_ref(24.0, (5.0, 2.0)), 25.0);
        assert_relative_eq!(
            path_difference(24.0, (5.0, 2.0)),
            25.0 - 24.0_f64.hypot(3.0),
            epsilon = 1e-12
        );
    }

    #[test]
    fn path_difference_is_decreasing() {
        let heights = (10.0, 1.5);
        let mut last = 2.0 * 1.5;
        for d in logspace(-2.0, 4.0, 200) {
            let diff = path_difference(d, heights);
            assert!(diff < last);
            assert!(diff > 0.0);
            last = diff;
        }
    }

    #[test]
    fn decibels() {
        assert_relative_eq!(to_decibel(1.0), 0.0);
        assert_relative_eq!(to_decibel(1e-3), -30.0, epsilon = 1e-12);
    }

    #[test]
    fn logspace_endpoints() {
        let grid = logspace(0.0, 3.0, 4);
        assert_eq!(grid.len(), 4);
        assert_relative_eq!(grid[0], 1.0);
        assert_relative_eq!(grid[1], 10.0, epsilon = 1e-9);
        assert_relative_eq!(grid[3], 1000.0, epsilon = 1e-9);
        assert!(logspace(0.0, 1.0, 0).is_empty());
        assert_eq!(logspace(2.0, 5.0, 1), vec![100.0]);
    }

    #[test]
    fn minimise_parabola() {
        let min = minimise_bounded(
            |x| (x - 1.3).powi(2) + 2.0,
            (0.0, 4.0),
            2.0,
            MinimiseOptions::default(),
        );
        assert!(min.converged);
        assert_relative_eq!(min.x, 1.3, epsilon = 1e-4);
        assert_relative_eq!(min.value, 2.0, epsilon = 1e-8);
    }

    #[test]
    fn minimise_v_shape() {
        let min = minimise_bounded(
            |x: f64| (x - 8.2).abs(),
            (7.5, 9.0),
            8.25,
            MinimiseOptions::default(),
        );
        assert!(min.converged);
        assert_relative_eq!(min.x, 8.2, epsilon = 1e-4);
    }

    #[test]
    fn minimise_at_boundary() {
        let min = minimise_bounded(|x| x, (-1.0, 1.0), 0.0, MinimiseOptions::default());
        assert!(min.converged);
        assert!(min.x < -0.999);
    }

    #[test]
    fn minimise_respects_cap() {
        let options = MinimiseOptions {
            max_iter: 3,
            xatol: 1e-12,
        };
        let min = minimise_bounded(|x| (x - 0.1).powi(2), (0.0, 10.0), 5.0, options);
        assert!(!min.converged);
        assert_eq!(min.iterations, 3);
        assert!(min.x.is_finite());
    }

    #[test]
    fn minimise_ignores_infinities() {
        let f = |x: f64| {
            if x > 2.0 {
                f64::INFINITY
            } else {
                (x - 1.0).powi(2)
            }
        };
        let min = minimise_bounded(f, (0.0, 3.0), 1.5, MinimiseOptions::default());
        assert!(min.converged);
        assert_relative_eq!(min.x, 1.0, epsilon = 1e-4);
    }

    #[test]
    fn minimise_is_deterministic() {
        let f = |x: f64| (x.sin() - 0.3).abs();
        let opts = MinimiseOptions::default();
        assert_eq!(
            minimise_bounded(f, (0.0, 1.5), 0.75, opts),
            minimise_bounded(f, (0.0, 1.5), 0.75, opts)
        );
    }
}
