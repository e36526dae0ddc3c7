use tracing::debug;

use crate::error::CoreError;

/// A two-dimensional chaotic recurrence with fixed parameters.
///
/// Variants carry their own parameters and [`trajectory`](Self::trajectory)
/// matches on the variant once, before the loop, so the per-step arithmetic
/// is monomorphized and inlined.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Attractor {
    /// `x' = sin(a y) + c cos(a x)`, `y' = sin(b x) + d cos(b y)`.
    Clifford { a: f64, b: f64, c: f64, d: f64 },

    /// `x' = d sin(a x) − sin(b y)`, `y' = c cos(a x) + cos(b y)`.
    JohnnySvensson { a: f64, b: f64, c: f64, d: f64 },

    /// Field–Golubitsky map with `degree`-fold rotational symmetry.
    SymmetricIcon {
        alpha: f64,
        beta: f64,
        gamma: f64,
        omega: f64,
        lambda: f64,
        degree: u32,
    },

    /// Ikeda map with dissipation `u`.
    Ikeda { u: f64 },

    /// `x' = sin(b y) + c sin(b x)`, `y' = sin(a x) + d sin(a y)`.
    FractalDream { a: f64, b: f64, c: f64, d: f64 },
}

/// Parallel `x` / `y` coordinate streams of an orbit.
#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Trajectory {
    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// `((xmin, xmax), (ymin, ymax))` over finite points, or `None` if no
    /// point is finite.
    pub fn bounds(&self) -> Option<((f64, f64), (f64, f64))> {
        let mut xr = (f64::INFINITY, f64::NEG_INFINITY);
        let mut yr = (f64::INFINITY, f64::NEG_INFINITY);
        let mut any = false;
        for (&x, &y) in self.x.iter().zip(&self.y) {
            if !x.is_finite() || !y.is_finite() {
                continue;
            }
            any = true;
            xr = (xr.0.min(x), xr.1.max(x));
            yr = (yr.0.min(y), yr.1.max(y));
        }
        any.then_some((xr, yr))
    }

    pub fn iter(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }
}

impl Attractor {
    /// The Fractal Dream parameter set used for the gallery renders.
    pub fn fractal_dream_preset() -> Self {
        Self::FractalDream {
            a: -0.966918,
            b: 2.879879,
            c: 0.765145,
            d: 0.744728,
        }
    }

    /// Conventional seed point for every map.
    pub const DEFAULT_SEED: (f64, f64) = (0.1, 0.1);

    /// Short lowercase name, used in file names and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Clifford { .. } => "clifford",
            Self::JohnnySvensson { .. } => "johnny_svensson",
            Self::SymmetricIcon { .. } => "symmetric_icon",
            Self::Ikeda { .. } => "ikeda",
            Self::FractalDream { .. } => "fractal_dream",
        }
    }

    /// Apply the map once.
    #[inline]
    pub fn step(&self, x: f64, y: f64) -> (f64, f64) {
        match *self {
            Self::Clifford { a, b, c, d } => clifford(x, y, a, b, c, d),
            Self::JohnnySvensson { a, b, c, d } => johnny_svensson(x, y, a, b, c, d),
            Self::SymmetricIcon {
                alpha,
                beta,
                gamma,
                omega,
                lambda,
                degree,
            } => symmetric_icon(x, y, alpha, beta, gamma, omega, lambda, degree),
            Self::Ikeda { u } => ikeda(x, y, u),
            Self::FractalDream { a, b, c, d } => fractal_dream(x, y, a, b, c, d),
        }
    }

    /// Generate `n` points starting with `(x0, y0)`.
    pub fn trajectory(&self, x0: f64, y0: f64, n: usize) -> crate::Result<Trajectory> {
        if n == 0 {
            return Err(CoreError::InvalidIterationCount(n));
        }
        debug!(attractor = self.name(), n, "Generating trajectory");
        let traj = match *self {
            Self::Clifford { a, b, c, d } => {
                run(x0, y0, n, |x, y| clifford(x, y, a, b, c, d))
            }
            Self::JohnnySvensson { a, b, c, d } => {
                run(x0, y0, n, |x, y| johnny_svensson(x, y, a, b, c, d))
            }
            Self::SymmetricIcon {
                alpha,
                beta,
                gamma,
                omega,
                lambda,
                degree,
            } => run(x0, y0, n, |x, y| {
                symmetric_icon(x, y, alpha, beta, gamma, omega, lambda, degree)
            }),
            Self::Ikeda { u } => run(x0, y0, n, |x, y| ikeda(x, y, u)),
            Self::FractalDream { a, b, c, d } => {
                run(x0, y0, n, |x, y| fractal_dream(x, y, a, b, c, d))
            }
        };
        Ok(traj)
    }
}

/// The hot loop. `f` is a concrete closure type per call site.
#[inline]
fn run<F: Fn(f64, f64) -> (f64, f64)>(x0: f64, y0: f64, n: usize, f: F) -> Trajectory {
    let mut xs = Vec::with_capacity(n);
    let mut ys = Vec::with_capacity(n);
    let (mut x, mut y) = (x0, y0);
    xs.push(x);
    ys.push(y);
    for _ in 1..n {
        (x, y) = f(x, y);
        xs.push(x);
        ys.push(y);
    }
    Trajectory { x: xs, y: ys }
}

#[inline(always)]
fn clifford(x: f64, y: f64, a: f64, b: f64, c: f64, d: f64) -> (f64, f64) {
    (
        (a * y).sin() + c * (a * x).cos(),
        (b * x).sin() + d * (b * y).cos(),
    )
}

#[inline(always)]
fn johnny_svensson(x: f64, y: f64, a: f64, b: f64, c: f64, d: f64) -> (f64, f64) {
    (
        d * (x * a).sin() - (y * b).sin(),
        c * (x * a).cos() + (y * b).cos(),
    )
}

/// `z = x + iy`; `w = z^m` with `m = 1 + max(degree − 2, 0)` built by repeated
/// multiplication, then `p = alpha |z|² + lambda + beta Re(z w)`.
#[allow(clippy::too_many_arguments)]
#[inline(always)]
fn symmetric_icon(
    x: f64,
    y: f64,
    alpha: f64,
    beta: f64,
    gamma: f64,
    omega: f64,
    lambda: f64,
    degree: u32,
) -> (f64, f64) {
    let zzbar = x * x + y * y;
    let mut p = alpha * zzbar + lambda;
    let (mut zreal, mut zimag) = (x, y);
    for _ in 1..degree.saturating_sub(1) {
        let za = zreal * x - zimag * y;
        let zb = zimag * x + zreal * y;
        zreal = za;
        zimag = zb;
    }
    let zn = x * zreal - y * zimag;
    p += beta * zn;
    (
        p * x + gamma * zreal - omega * y,
        p * y - gamma * zimag + omega * x,
    )
}

#[inline(always)]
fn ikeda(x: f64, y: f64, u: f64) -> (f64, f64) {
    let t = 0.4 - 6.0 / (1.0 + x * x + y * y);
    let (sin_t, cos_t) = t.sin_cos();
    (
        1.0 + u * (x * cos_t - y * sin_t),
        u * (x * sin_t + y * cos_t),
    )
}

#[inline(always)]
fn fractal_dream(x: f64, y: f64, a: f64, b: f64, c: f64, d: f64) -> (f64, f64) {
    (
        (y * b).sin() + c * (x * b).sin(),
        (x * a).sin() + d * (y * a).sin(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all() -> Vec<Attractor> {
        vec![
            Attractor::Clifford {
                a: -1.4,
                b: 1.6,
                c: 1.0,
                d: 0.7,
            },
            Attractor::JohnnySvensson {
                a: 1.4,
                b: 1.56,
                c: 1.4,
                d: -6.56,
            },
            Attractor::SymmetricIcon {
                alpha: 1.8,
                beta: 0.0,
                gamma: 1.0,
                omega: 0.1,
                lambda: -1.93,
                degree: 5,
            },
            Attractor::Ikeda { u: 0.9 },
            Attractor::fractal_dream_preset(),
        ]
    }

    #[test]
    fn zero_length_rejected() {
        for att in all() {
            assert!(matches!(
                att.trajectory(0.1, 0.1, 0),
                Err(CoreError::InvalidIterationCount(0))
            ));
        }
    }

    #[test]
    fn first_point_is_seed() {
        for att in all() {
            let t = att.trajectory(0.1, 0.2, 5).unwrap();
            assert_eq!(t.len(), 5);
            assert_eq!((t.x[0], t.y[0]), (0.1, 0.2));
        }
    }

    #[test]
    fn trajectory_matches_step() {
        for att in all() {
            let t = att.trajectory(0.1, 0.1, 50).unwrap();
            for i in 1..t.len() {
                assert_eq!(att.step(t.x[i - 1], t.y[i - 1]), (t.x[i], t.y[i]));
            }
        }
    }

    #[test]
    fn deterministic() {
        for att in all() {
            let a = att.trajectory(0.1, 0.1, 10_000).unwrap();
            let b = att.trajectory(0.1, 0.1, 10_000).unwrap();
            assert_eq!(a, b, "{} is not deterministic", att.name());
        }
    }

    #[test]
    fn clifford_single_step() {
        let att = Attractor::Clifford {
            a: 1.0,
            b: 1.0,
            c: 1.0,
            d: 1.0,
        };
        let (x, y) = att.step(0.0, 0.0);
        assert_eq!((x, y), (1.0, 1.0));
    }

    #[test]
    fn ikeda_origin() {
        // t = 0.4 - 6 = -5.6 but x = y = 0, so only the constant survives.
        assert_eq!(Attractor::Ikeda { u: 0.9 }.step(0.0, 0.0), (1.0, 0.0));
    }

    #[test]
    fn symmetric_icon_low_degrees_skip_power_loop() {
        let icon = |degree| Attractor::SymmetricIcon {
            alpha: 1.0,
            beta: 1.0,
            gamma: 0.0,
            omega: 0.0,
            lambda: 0.0,
            degree,
        };
        let base = icon(2).step(0.5, 0.0);
        assert_eq!(base, (0.25, 0.0));
        for degree in [0, 1] {
            assert_eq!(icon(degree).step(0.5, 0.0), base, "degree {degree}");
        }
        assert_eq!(icon(3).step(0.5, 0.0), (0.1875, 0.0));
        assert_ne!(icon(3).step(0.5, 0.0), base);
    }

    #[test]
    fn symmetric_icon_has_rotational_symmetry() {
        // Rotating the input by 2π/degree rotates the output by the same angle.
        let degree = 5;
        let att = Attractor::SymmetricIcon {
            alpha: 1.8,
            beta: 0.0,
            gamma: 1.0,
            omega: 0.1,
            lambda: -1.93,
            degree,
        };
        let (x, y) = (0.3, -0.2);
        let theta = std::f64::consts::TAU / degree as f64;
        let (s, c) = theta.sin_cos();
        let (rx, ry) = (x * c - y * s, x * s + y * c);
        let (ox, oy) = att.step(x, y);
        let (rox, roy) = att.step(rx, ry);
        assert!((rox - (ox * c - oy * s)).abs() < 1e-12);
        assert!((roy - (ox * s + oy * c)).abs() < 1e-12);
    }

    #[test]
    fn stays_bounded() {
        let t = Attractor::fractal_dream_preset()
            .trajectory(0.1, 0.1, 100_000)
            .unwrap();
        let ((x0, x1), (y0, y1)) = t.bounds().unwrap();
        // |sin| ≤ 1, so each coordinate is bounded by 1 + |c| or 1 + |d|.
        assert!(x0 >= -1.8 && x1 <= 1.8);
        assert!(y0 >= -1.8 && y1 <= 1.8);
    }

    #[test]
    fn bounds_skip_non_finite() {
        let t = Trajectory {
            x: vec![f64::NAN, 1.0, -2.0],
            y: vec![0.0, 3.0, f64::INFINITY],
        };
        assert_eq!(t.bounds(), Some(((1.0, 1.0), (3.0, 3.0))));
    }

    #[test]
    fn serde_tagged() {
        let json = serde_json::to_string(&Attractor::Ikeda { u: 0.9 }).unwrap();
        assert_eq!(json, r#"{"kind":"ikeda","u":0.9}"#);
        let back: Attractor = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Attractor::Ikeda { u: 0.9 });
    }
}
