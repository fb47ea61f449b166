//! Solutions of Kepler's equation `E - e sin E = M`.

use std::f64::consts;

use tracing::trace;

/// Convergence tolerance on successive eccentric anomaly estimates
/// (radians).
pub const TOLERANCE: f64 = 1e-8;

/// Iteration cap for each solver stage.
pub const MAX_ITERATIONS: u32 = 10;

/// Eccentricity at or above which the iteration is seeded at `π`
/// instead of at the mean anomaly.
pub const HIGH_ECCENTRICITY: f64 = 0.8;

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly (radians).
    pub ea: f64,
    /// Total number of iterations performed.
    pub iterations: u32,
    /// Whether successive estimates agreed to within the tolerance.
    pub converged: bool,
}

/// Solve Kepler's equation for the eccentric anomaly with the default
/// tolerance and iteration cap.
///
/// `ma` is the mean anomaly in radians.
pub fn solve(ma: f64, e: f64) -> f64 {
    ma_to_ea(ma, e, TOLERANCE, MAX_ITERATIONS).ea
}

/// Solve Kepler's equation for the eccentric anomaly.
///
/// Runs the fixed-point iteration `E = M + e sin E`, seeded at `M` for
/// `e < 0.8` and at `π` otherwise. If that has not settled after
/// `maxiter` steps (which happens for high eccentricities), the estimate is
/// refined with at most `maxiter` Newton-Raphson steps. Failing to converge
/// is not an error: the last estimate is returned with `converged` unset.
pub fn ma_to_ea(ma: f64, e: f64, tol: f64, maxiter: u32) -> KeplerSolution {
    let mut ea = if e < HIGH_ECCENTRICITY { ma } else { consts::PI };

    let mut iterations = 0;
    while iterations < maxiter {
        let ea_new = ma + e * libm::sin(ea);
        iterations += 1;
        let delta = (ea_new - ea).abs();
        ea = ea_new;
        if delta < tol {
            return KeplerSolution {
                ea,
                iterations,
                converged: true,
            };
        }
    }

    for _ in 0..maxiter {
        let delta = (ea - e * libm::sin(ea) - ma) / (1.0 - e * libm::cos(ea));
        ea -= delta;
        iterations += 1;
        if delta.abs() < tol {
            return KeplerSolution {
                ea,
                iterations,
                converged: true,
            };
        }
    }

    trace!("ma_to_ea({ma}, {e}, {tol}, {maxiter}): stopped at {ea} without converging");
    KeplerSolution {
        ea,
        iterations,
        converged: false,
    }
}

/// How far `ea` is from satisfying Kepler's equation for `ma` and `e`.
pub fn residual(ea: f64, ma: f64, e: f64) -> f64 {
    (ea - e * libm::sin(ea) - ma).abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn circular_orbit_is_identity() {
        for ma in [0.0, 0.3, 1.0, consts::FRAC_PI_2, 3.0, 5.5, 2.0 * consts::PI - 1e-3] {
            let sol = ma_to_ea(ma, 0.0, TOLERANCE, MAX_ITERATIONS);
            assert_eq!(sol.ea, ma);
            assert!(sol.converged);
        }
    }

    #[test]
    fn earthlike_at_periapsis() {
        let ea = solve(0.0, 0.0167);
        assert!(ea.abs() < 1e-12);
    }

    #[test]
    fn high_eccentricity_converges() {
        let ma = consts::FRAC_PI_2;
        let sol = ma_to_ea(ma, 0.9, TOLERANCE, MAX_ITERATIONS);
        assert!(sol.converged);
        assert!(residual(sol.ea, ma, 0.9) < 1e-6);
    }

    #[test]
    fn moderate_eccentricities_satisfy_equation() {
        for e in [0.0549, 0.2056, 0.5, 0.79, 0.8, 0.95] {
            for k in 0..36 {
                let ma = k as f64 * 10.0_f64.to_radians();
                let ea = solve(ma, e);
                assert!(
                    residual(ea, ma, e) < 1e-6,
                    "e = {e}, M = {ma}: residual {}",
                    residual(ea, ma, e)
                );
            }
        }
    }

    #[test]
    fn capped_iterations_still_return_estimate() {
        let sol = ma_to_ea(1.0, 0.95, 1e-300, 2);
        assert!(!sol.converged);
        assert_eq!(sol.iterations, 4);
        assert!(sol.ea.is_finite());
    }
}
