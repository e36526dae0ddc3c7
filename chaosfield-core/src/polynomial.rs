use std::fmt;
use std::sync::OnceLock;

use crate::complex::Complex;
use crate::error::CoreError;
use crate::roots::find_roots;

/// Padding factor applied to the outermost root when deriving a default view.
const AUTO_LIMIT_PADDING: f64 = 1.15;

/// A polynomial with real coefficients, highest degree first.
///
/// Coefficients never change after construction, so the roots are computed on
/// first request and memoized for the lifetime of the value. Derivatives are
/// separate `Polynomial` values with their own caches.
#[derive(Debug, Clone)]
pub struct Polynomial {
    coeffs: Vec<f64>,
    roots: OnceLock<Vec<Complex>>,
}

impl Polynomial {
    /// Build a polynomial from coefficients ordered highest degree first.
    ///
    /// Zeros at the high-degree end are trimmed, so `[0, 0, 1, 2]` is the
    /// linear polynomial `x + 2`. NaN or infinite coefficients are rejected.
    pub fn new(coeffs: impl Into<Vec<f64>>) -> crate::Result<Self> {
        let mut coeffs = coeffs.into();
        if let Some((index, &value)) = coeffs.iter().enumerate().find(|(_, c)| !c.is_finite()) {
            return Err(CoreError::NonFiniteCoefficient { index, value });
        }
        let first_nonzero = coeffs
            .iter()
            .position(|&c| c != 0.0)
            .ok_or(CoreError::ZeroPolynomial)?;
        coeffs.drain(..first_nonzero);
        Ok(Self {
            coeffs,
            roots: OnceLock::new(),
        })
    }

    /// Coefficients, highest degree first, leading coefficient non-zero.
    pub fn coeffs(&self) -> &[f64] {
        &self.coeffs
    }

    pub fn degree(&self) -> usize {
        self.coeffs.len() - 1
    }

    /// Evaluate at a real `x` (Horner's scheme).
    #[inline]
    pub fn evaluate(&self, x: f64) -> f64 {
        self.coeffs.iter().fold(0.0, |acc, &c| acc * x + c)
    }

    /// Evaluate at a complex `z` (Horner's scheme).
    #[inline]
    pub fn evaluate_complex(&self, z: Complex) -> Complex {
        self.coeffs
            .iter()
            .fold(Complex::ZERO, |acc, &c| acc * z + c)
    }

    /// Evaluate element-wise over a slice of points.
    pub fn evaluate_all(&self, points: &[Complex]) -> Vec<Complex> {
        points.iter().map(|&z| self.evaluate_complex(z)).collect()
    }

    /// The `order`-th derivative as a new polynomial.
    ///
    /// Each pass multiplies every coefficient by its exponent and drops the
    /// constant term. Differentiating past the degree leaves nothing, which is
    /// the zero polynomial and fails like any other all-zero construction.
    pub fn derivative(&self, order: u32) -> crate::Result<Self> {
        Self::new(differentiate(&self.coeffs, order))
    }

    /// Evaluate the `order`-th derivative at `z`.
    pub fn evaluate_derivative(&self, z: Complex, order: u32) -> crate::Result<Complex> {
        Ok(self.derivative(order)?.evaluate_complex(z))
    }

    /// All complex roots, computed once and cached.
    ///
    /// The slice has exactly [`degree`](Self::degree) entries, ordered by real
    /// part then imaginary part.
    pub fn roots(&self) -> &[Complex] {
        self.roots.get_or_init(|| find_roots(&self.coeffs))
    }

    /// Symmetric limit `(-l, l)` enclosing every root with some padding.
    ///
    /// Falls back to `(-1, 1)` when the roots give no extent (a constant, or a
    /// polynomial whose only root is the origin).
    pub fn auto_limit(&self) -> (f64, f64) {
        let extent = self
            .roots()
            .iter()
            .filter(|r| r.is_finite())
            .map(|r| r.re.abs().max(r.im.abs()))
            .fold(0.0_f64, f64::max);
        let lim = extent * AUTO_LIMIT_PADDING;
        if lim > 0.0 {
            (-lim, lim)
        } else {
            (-1.0, 1.0)
        }
    }

    /// Render the `order`-th derivative the same way [`Display`](fmt::Display)
    /// renders the polynomial itself.
    pub fn derivative_string(&self, order: u32) -> crate::Result<String> {
        Ok(self.derivative(order)?.to_string())
    }
}

impl PartialEq for Polynomial {
    fn eq(&self, other: &Self) -> bool {
        self.coeffs == other.coeffs
    }
}

fn differentiate(coeffs: &[f64], order: u32) -> Vec<f64> {
    let mut current = coeffs.to_vec();
    for _ in 0..order {
        let n = current.len();
        if n <= 1 {
            return Vec::new();
        }
        current = current[..n - 1]
            .iter()
            .enumerate()
            .map(|(i, &c)| c * (n - 1 - i) as f64)
            .collect();
    }
    current
}

/// Formats as e.g. `x^{5} + x^{2} - x + 1`.
impl fmt::Display for Polynomial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let degree = self.degree();
        let mut first = true;
        for (i, &c) in self.coeffs.iter().enumerate() {
            if c == 0.0 {
                continue;
            }
            let exponent = degree - i;
            let sign = if c < 0.0 { "-" } else { "+" };
            if first {
                if c < 0.0 {
                    f.write_str("-")?;
                }
            } else {
                write!(f, " {sign} ")?;
            }
            first = false;

            let magnitude = c.abs();
            if magnitude != 1.0 || exponent == 0 {
                write!(f, "{magnitude}")?;
            }
            match exponent {
                0 => {}
                1 => f.write_str("x")?,
                e => write!(f, "x^{{{e}}}")?,
            }
        }
        Ok(())
    }
}
