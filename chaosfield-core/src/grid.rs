use crate::complex::Complex;
use crate::error::CoreError;
use crate::viewport::Viewport;

/// Evenly spaced samples over the plane, stored row-major.
///
/// Row `j` holds the `j`-th y-sample, column `i` the `i`-th x-sample, so the
/// point at `(i, j)` lives at index `j * nx + i`.
#[derive(Debug, Clone, PartialEq)]
pub struct ComplexGrid {
    pub nx: usize,
    pub ny: usize,
    pub points: Vec<Complex>,
}

impl ComplexGrid {
    /// `n × n` samples regardless of the viewport's aspect ratio.
    pub fn square(n: usize, viewport: &Viewport) -> crate::Result<Self> {
        Self::with_counts(n, n, viewport)
    }

    /// Roughly `n` samples along the shorter side and proportionally more
    /// along the longer one, so spacing is about equal on both axes.
    pub fn even(n: usize, viewport: &Viewport) -> crate::Result<Self> {
        if n == 0 {
            return Err(CoreError::InvalidGridSize(n));
        }
        let (nx, ny) = even_point_counts(n, viewport);
        Self::with_counts(nx, ny, viewport)
    }

    /// Exactly `nx` columns and `ny` rows spanning the viewport, endpoints included.
    pub fn with_counts(nx: usize, ny: usize, viewport: &Viewport) -> crate::Result<Self> {
        if nx == 0 {
            return Err(CoreError::InvalidGridSize(nx));
        }
        if ny == 0 {
            return Err(CoreError::InvalidGridSize(ny));
        }
        let xs = linspace(viewport.x.0, viewport.x.1, nx);
        let ys = linspace(viewport.y.0, viewport.y.1, ny);

        let mut points = Vec::with_capacity(nx * ny);
        for &im in &ys {
            points.extend(xs.iter().map(|&re| Complex::new(re, im)));
        }
        Ok(Self { nx, ny, points })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Sample at column `i`, row `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> Complex {
        self.points[j * self.nx + i]
    }
}

/// Column and row counts for [`ComplexGrid::even`].
///
/// With `dx = width / height`: `nx = round(n · max(dx, 1))` and
/// `ny = round(n · max(1/dx, 1))`. Halves round to even.
pub fn even_point_counts(n: usize, viewport: &Viewport) -> (usize, usize) {
    let dx = viewport.aspect_ratio();
    let n = n as f64;
    let nx = (n * dx.max(1.0)).round_ties_even() as usize;
    let ny = (n * (1.0 / dx).max(1.0)).round_ties_even() as usize;
    (nx.max(1), ny.max(1))
}

/// `num` evenly spaced values from `start` to `stop` inclusive.
///
/// The final value is pinned to `stop` so grid edges land exactly on the
/// viewport limits. A single sample sits on `start`.
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            let mut values: Vec<f64> = (0..num).map(|i| start + i as f64 * step).collect();
            values[num - 1] = stop;
            values
        }
    }
}
