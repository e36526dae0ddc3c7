use std::time::{Duration, Instant};

use rayon::prelude::*;
use tracing::{debug, info};

use chaosfield_core::{
    closest_root, normalized_index, ComplexGrid, NewtonEngine, NewtonParams, Polynomial, Viewport,
};

use crate::buffer::RenderBuffer;
use crate::palette::Palette;

/// How the sample grid is sized from the requested resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridMode {
    /// `resolution × resolution` samples whatever the aspect ratio.
    #[default]
    Square,
    /// `resolution` samples along the shorter side, more along the longer.
    Even,
}

// ---------------------------------------------------------------------------
// Result
// ---------------------------------------------------------------------------

/// Raw Newton output for one image.
///
/// Contains classification and convergence data only; apply
/// [`colorize_newton`] with a palette to get displayable pixels. Row 0 is the
/// top edge of the viewport.
#[derive(Debug, Clone)]
pub struct NewtonFrame {
    pub width: u32,
    pub height: u32,
    pub viewport: Viewport,
    pub root_count: usize,
    pub steps: u32,
    /// Nearest-root index per pixel.
    pub classes: Vec<usize>,
    /// Steps spent within epsilon of a root, per pixel.
    pub counts: Vec<u32>,
    pub elapsed: Duration,
}

impl NewtonFrame {
    pub fn max_count(&self) -> u32 {
        self.counts.iter().copied().max().unwrap_or(0)
    }
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Run Newton iteration over a grid covering `viewport` and classify every
/// terminal value by nearest root.
///
/// Grid points are independent, so they are processed in parallel via Rayon;
/// results come back in grid order.
pub fn render_newton(
    poly: &Polynomial,
    viewport: &Viewport,
    resolution: usize,
    mode: GridMode,
    params: NewtonParams,
) -> crate::Result<NewtonFrame> {
    let start = Instant::now();
    let engine = NewtonEngine::new(poly, params)?;
    let roots = engine.roots();

    let top_down = top_down(viewport);
    let grid = match mode {
        GridMode::Square => ComplexGrid::square(resolution, &top_down)?,
        GridMode::Even => ComplexGrid::even(resolution, &top_down)?,
    };
    debug!(
        nx = grid.nx,
        ny = grid.ny,
        steps = params.steps,
        "Starting Newton render"
    );

    let (classes, counts): (Vec<usize>, Vec<u32>) = grid
        .points
        .par_iter()
        .map(|&seed| {
            let (z, count) = engine.iterate_point(seed);
            (closest_root(roots, z), count)
        })
        .unzip();

    let elapsed = start.elapsed();
    debug!(elapsed_ms = elapsed.as_millis(), "Newton render complete");

    Ok(NewtonFrame {
        width: grid.nx as u32,
        height: grid.ny as u32,
        viewport: *viewport,
        root_count: roots.len(),
        steps: params.steps,
        classes,
        counts,
        elapsed,
    })
}

/// Render every viewport of a zoom sequence.
///
/// Frames are independent and computed in parallel; the returned vector is in
/// frame-index order regardless of completion order.
pub fn render_zoom(
    poly: &Polynomial,
    frames: &[Viewport],
    resolution: usize,
    mode: GridMode,
    params: NewtonParams,
) -> crate::Result<Vec<NewtonFrame>> {
    let start = Instant::now();
    // Populate the root cache once instead of racing on it from every frame.
    let _ = poly.roots();

    let rendered = frames
        .par_iter()
        .map(|vp| render_newton(poly, vp, resolution, mode, params))
        .collect::<crate::Result<Vec<_>>>()?;

    info!(
        frames = rendered.len(),
        elapsed_ms = start.elapsed().as_millis(),
        "Zoom render complete"
    );
    Ok(rendered)
}

/// Same region with the y-limits ordered high to low, so grid row 0 is the
/// top of the image.
fn top_down(viewport: &Viewport) -> Viewport {
    let (a, b) = viewport.y;
    Viewport {
        x: viewport.x,
        y: (a.max(b), a.min(b)),
    }
}

// ---------------------------------------------------------------------------
// Coloring
// ---------------------------------------------------------------------------

/// Options for [`colorize_newton`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewtonShading {
    /// Darken pixels by how long they sat on a root.
    pub brightness: bool,
}

impl Default for NewtonShading {
    fn default() -> Self {
        Self { brightness: true }
    }
}

/// Map a Newton frame to RGBA.
///
/// Each pixel takes the palette color at its normalized root index. With
/// brightness shading on, a black overlay with opacity `count / (4 · max)` is
/// composited on top, so points that settled early appear darker.
pub fn colorize_newton(
    frame: &NewtonFrame,
    palette: &Palette,
    shading: &NewtonShading,
) -> RenderBuffer {
    let max = frame.max_count();
    let scale = if shading.brightness && max > 0 {
        1.0 / (4.0 * max as f64)
    } else {
        0.0
    };
    let len = frame.classes.len();
    let mut pixels = vec![0u8; len * 4];
    pixels
        .par_chunks_mut(4)
        .zip(frame.classes.par_iter().zip(frame.counts.par_iter()))
        .for_each(|(pixel, (&class, &count))| {
            let c = palette.sample(normalized_index(class, frame.root_count));
            let keep = 1.0 - count as f64 * scale;
            pixel[0] = (c[0] as f64 * keep).round() as u8;
            pixel[1] = (c[1] as f64 * keep).round() as u8;
            pixel[2] = (c[2] as f64 * keep).round() as u8;
            pixel[3] = 255;
        });
    RenderBuffer {
        width: frame.width,
        height: frame.height,
        pixels,
    }
}
