use tracing::debug;

use crate::complex::Complex;
use crate::error::CoreError;
use crate::polynomial::Polynomial;

/// Parameters controlling Newton–Raphson iteration.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct NewtonParams {
    /// Number of Newton updates applied to every point.
    pub steps: u32,

    /// Radius of the neighbourhood around each root that counts as converged.
    pub epsilon: f64,
}

/// Re-validates on deserialization so settings files stay consistent.
impl<'de> serde::Deserialize<'de> for NewtonParams {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(serde::Deserialize)]
        struct Raw {
            steps: u32,
            #[serde(default = "default_epsilon")]
            epsilon: f64,
        }
        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.steps, raw.epsilon).map_err(serde::de::Error::custom)
    }
}

fn default_epsilon() -> f64 {
    NewtonParams::DEFAULT_EPSILON
}

impl NewtonParams {
    pub const DEFAULT_STEPS: u32 = 20;
    pub const DEFAULT_EPSILON: f64 = 1e-6;

    pub fn new(steps: u32, epsilon: f64) -> crate::Result<Self> {
        if steps < 1 {
            return Err(CoreError::InvalidStepCount(steps));
        }
        if epsilon <= 0.0 || !epsilon.is_finite() {
            return Err(CoreError::InvalidEpsilon(epsilon));
        }
        Ok(Self { steps, epsilon })
    }

    /// Default epsilon with a custom step count.
    pub fn with_steps(steps: u32) -> crate::Result<Self> {
        Self::new(steps, Self::DEFAULT_EPSILON)
    }
}

impl Default for NewtonParams {
    fn default() -> Self {
        Self {
            steps: Self::DEFAULT_STEPS,
            epsilon: Self::DEFAULT_EPSILON,
        }
    }
}

/// Final values and convergence counts for a batch of seeds.
#[derive(Debug, Clone, PartialEq)]
pub struct NewtonOutput {
    /// Value of each seed after all steps.
    pub values: Vec<Complex>,
    /// Number of steps after which each value sat within epsilon of some root.
    pub counts: Vec<u32>,
}

/// One Newton–Raphson update: `z − p(z) / p'(z)`.
///
/// A vanishing derivative is deliberately not special-cased; the division
/// yields `inf`/`NaN` and that value propagates through later steps.
#[inline]
pub fn newton_step(p: &Polynomial, dp: &Polynomial, z: Complex) -> Complex {
    z - p.evaluate_complex(z) / dp.evaluate_complex(z)
}

/// A polynomial prepared for repeated Newton iteration.
///
/// Holds the first derivative and the root list so batches and per-frame
/// renders do not rebuild them for every point.
#[derive(Debug, Clone)]
pub struct NewtonEngine<'a> {
    poly: &'a Polynomial,
    derivative: Polynomial,
    params: NewtonParams,
}

impl<'a> NewtonEngine<'a> {
    /// Fails with [`CoreError::ZeroPolynomial`] for a constant polynomial,
    /// whose derivative vanishes identically.
    pub fn new(poly: &'a Polynomial, params: NewtonParams) -> crate::Result<Self> {
        let derivative = poly.derivative(1)?;
        Ok(Self {
            poly,
            derivative,
            params,
        })
    }

    pub fn polynomial(&self) -> &Polynomial {
        self.poly
    }

    pub fn params(&self) -> &NewtonParams {
        &self.params
    }

    pub fn roots(&self) -> &[Complex] {
        self.poly.roots()
    }

    /// Iterate a single seed, returning its final value and convergence count.
    #[inline]
    pub fn iterate_point(&self, seed: Complex) -> (Complex, u32) {
        let roots = self.poly.roots();
        let eps = self.params.epsilon;
        let mut z = seed;
        let mut count = 0;
        for _ in 0..self.params.steps {
            z = newton_step(self.poly, &self.derivative, z);
            // NaN distances compare false, so diverged points never count.
            if roots.iter().any(|&r| z.dist(r) < eps) {
                count += 1;
            }
        }
        (z, count)
    }

    /// Iterate every seed independently.
    pub fn iterate(&self, seeds: &[Complex]) -> NewtonOutput {
        let mut values = Vec::with_capacity(seeds.len());
        let mut counts = Vec::with_capacity(seeds.len());
        for &seed in seeds {
            let (z, c) = self.iterate_point(seed);
            values.push(z);
            counts.push(c);
        }
        NewtonOutput { values, counts }
    }
}

/// Apply `steps` Newton updates to every point in `seeds`.
///
/// Convenience wrapper over [`NewtonEngine`] with the default epsilon.
pub fn iterate(poly: &Polynomial, seeds: &[Complex], steps: u32) -> crate::Result<NewtonOutput> {
    let params = NewtonParams::with_steps(steps)?;
    let engine = NewtonEngine::new(poly, params)?;
    debug!(
        points = seeds.len(),
        steps,
        degree = poly.degree(),
        "Running Newton iteration"
    );
    Ok(engine.iterate(seeds))
}
