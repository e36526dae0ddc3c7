//! Point-density rendering for attractor trajectories.

use rayon::prelude::*;
use tracing::debug;

use chaosfield_core::Trajectory;

use crate::buffer::{check_dimensions, RenderBuffer};
use crate::error::RenderError;
use crate::palette::Palette;

/// How hit counts are mapped onto the palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DensityScale {
    /// `count / max`.
    Linear,
    /// `ln(1 + count) / ln(1 + max)`; brings out faint filaments.
    #[default]
    Log,
}

/// A 2-D histogram of trajectory points.
///
/// Bins span the trajectory's finite bounding box. Row 0 is the top (largest
/// y). Points on the upper edge fall into the last bin rather than off the
/// canvas.
#[derive(Debug, Clone)]
pub struct DensityCanvas {
    pub width: u32,
    pub height: u32,
    pub x_range: (f64, f64),
    pub y_range: (f64, f64),
    pub counts: Vec<u32>,
}

impl DensityCanvas {
    /// Bin every finite point of `traj` into a `width × height` canvas.
    pub fn from_trajectory(traj: &Trajectory, width: u32, height: u32) -> crate::Result<Self> {
        check_dimensions(width, height)?;
        let (x_range, y_range) = traj.bounds().ok_or(RenderError::EmptyTrajectory)?;
        let x_range = widen(x_range);
        let y_range = widen(y_range);

        let mut canvas = Self {
            width,
            height,
            x_range,
            y_range,
            counts: vec![0; width as usize * height as usize],
        };
        for (x, y) in traj.iter() {
            canvas.add(x, y);
        }
        debug!(
            width,
            height,
            points = traj.len(),
            hits = canvas.total(),
            "Binned trajectory"
        );
        Ok(canvas)
    }

    /// Count one point; points outside the ranges or non-finite are ignored.
    #[inline]
    pub fn add(&mut self, x: f64, y: f64) {
        let (Some(col), Some(row)) = (
            bin(x, self.x_range, self.width),
            bin(y, self.y_range, self.height),
        ) else {
            return;
        };
        let row = self.height as usize - 1 - row;
        let idx = row * self.width as usize + col;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    /// Total number of binned points.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    pub fn max(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }

    /// Color every bin. Empty bins get `background`; occupied bins sample the
    /// palette at their scaled density.
    pub fn shade(&self, palette: &Palette, scale: DensityScale, background: [u8; 3]) -> RenderBuffer {
        let max = self.max() as f64;
        let log_max = (1.0 + max).ln();
        let mut pixels = vec![0u8; self.counts.len() * 4];
        pixels
            .par_chunks_mut(4)
            .zip(self.counts.par_iter())
            .for_each(|(pixel, &count)| {
                let c = if count == 0 {
                    [background[0], background[1], background[2], 255]
                } else {
                    let t = match scale {
                        DensityScale::Linear => count as f64 / max,
                        DensityScale::Log => (1.0 + count as f64).ln() / log_max,
                    };
                    palette.sample(t)
                };
                pixel.copy_from_slice(&c);
            });
        RenderBuffer {
            width: self.width,
            height: self.height,
            pixels,
        }
    }
}

/// Give a degenerate range some extent so every point still lands in a bin.
fn widen((lo, hi): (f64, f64)) -> (f64, f64) {
    if hi > lo {
        (lo, hi)
    } else {
        (lo - 0.5, hi + 0.5)
    }
}

#[inline]
fn bin(v: f64, (lo, hi): (f64, f64), n: u32) -> Option<usize> {
    if !(v >= lo && v <= hi) {
        return None;
    }
    let idx = ((v - lo) / (hi - lo) * n as f64) as usize;
    Some(idx.min(n as usize - 1))
}
