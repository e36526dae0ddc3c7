//! Simultaneous root finding for real-coefficient polynomials.

use tracing::{debug, warn};

use crate::complex::Complex;

/// Iteration cap for the Aberth–Ehrlich refinement.
const MAX_ITERATIONS: usize = 500;

/// Relative correction size below which a root estimate is considered settled.
const TOLERANCE: f64 = 1e-14;

/// Angular offset of the starting circle. Keeps the initial guesses off the
/// real axis so conjugate pairs of a real polynomial can separate.
const START_ANGLE: f64 = 0.4;

/// Find every complex root of the polynomial with `coeffs` (highest degree
/// first, leading coefficient non-zero).
///
/// Trailing zero coefficients contribute exact roots at the origin. The rest
/// are found with Aberth–Ehrlich iteration started on a circle whose radius is
/// the geometric mean of the root magnitudes. The returned vector always has
/// `coeffs.len() - 1` entries and is sorted by real then imaginary part.
pub fn find_roots(coeffs: &[f64]) -> Vec<Complex> {
    let degree = coeffs.len().saturating_sub(1);
    let mut roots = Vec::with_capacity(degree);

    let trailing_zeros = coeffs.iter().rev().take_while(|&&c| c == 0.0).count();
    roots.extend(std::iter::repeat(Complex::ZERO).take(trailing_zeros));

    let reduced = &coeffs[..coeffs.len() - trailing_zeros];
    match reduced.len() {
        0 | 1 => {}
        2 => roots.push(Complex::from_real(-reduced[1] / reduced[0])),
        _ => roots.extend(aberth_ehrlich(reduced)),
    }

    roots.sort_by(|a, b| a.re.total_cmp(&b.re).then(a.im.total_cmp(&b.im)));
    roots
}

fn aberth_ehrlich(coeffs: &[f64]) -> Vec<Complex> {
    let lead = coeffs[0];
    let monic: Vec<f64> = coeffs.iter().map(|c| c / lead).collect();
    let n = monic.len() - 1;

    // |a_n| is the product of the root magnitudes for a monic polynomial.
    let radius = monic[n].abs().powf(1.0 / n as f64);
    let mut z: Vec<Complex> = (0..n)
        .map(|k| {
            let theta = std::f64::consts::TAU * k as f64 / n as f64 + START_ANGLE;
            Complex::from_polar(radius, theta)
        })
        .collect();
    let mut settled = vec![false; n];

    for iteration in 0..MAX_ITERATIONS {
        let mut all_settled = true;
        for k in 0..n {
            if settled[k] {
                continue;
            }
            let (p, dp) = eval_with_derivative(&monic, z[k]);
            if p == Complex::ZERO {
                settled[k] = true;
                continue;
            }
            let ratio = p / dp;
            let mut repulsion = Complex::ZERO;
            for j in 0..n {
                if j != k {
                    repulsion += Complex::ONE / (z[k] - z[j]);
                }
            }
            let correction = ratio / (Complex::ONE - ratio * repulsion);
            if !correction.is_finite() {
                continue;
            }
            z[k] -= correction;
            if correction.norm() <= TOLERANCE * (1.0 + z[k].norm()) {
                settled[k] = true;
            } else {
                all_settled = false;
            }
        }
        if all_settled && settled.iter().all(|&s| s) {
            debug!(degree = n, iterations = iteration + 1, "Aberth iteration converged");
            return z;
        }
    }

    warn!(
        degree = n,
        max_iterations = MAX_ITERATIONS,
        "Aberth iteration did not fully converge; returning best estimates"
    );
    z
}

/// Horner evaluation of `p(z)` and `p'(z)` in one pass.
fn eval_with_derivative(coeffs: &[f64], z: Complex) -> (Complex, Complex) {
    let mut p = Complex::from_real(coeffs[0]);
    let mut dp = Complex::ZERO;
    for &c in &coeffs[1..] {
        dp = dp * z + p;
        p = p * z + c;
    }
    (p, dp)
}
