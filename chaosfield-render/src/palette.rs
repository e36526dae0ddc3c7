use crate::error::RenderError;

const LUT_SIZE: usize = 256;

/// A colormap backed by a gradient lookup table.
///
/// Values in `[0, 1]` are mapped onto the table and the final color is
/// linearly interpolated between adjacent entries. Unlike a cyclic palette
/// the ends do not wrap: `0.0` is the first entry and `1.0` the last.
#[derive(Debug, Clone)]
pub struct Palette {
    pub name: &'static str,
    colors: Vec<[u8; 4]>,
}

impl Palette {
    pub fn new(name: &'static str, colors: Vec<[u8; 4]>) -> Self {
        assert!(!colors.is_empty());
        Self { name, colors }
    }

    /// Look up a built-in palette by (case-insensitive) name.
    pub fn by_name(name: &str) -> crate::Result<Self> {
        builtin_palettes()
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| RenderError::UnknownPalette(name.to_string()))
    }

    /// Color at `t`, clamped to `[0, 1]`. `NaN` samples the first entry.
    pub fn sample(&self, t: f64) -> [u8; 4] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let pos = t * (self.colors.len() - 1) as f64;
        let lo = pos.floor() as usize;
        let hi = (lo + 1).min(self.colors.len() - 1);
        lerp_color(self.colors[lo], self.colors[hi], pos - lo as f64)
    }
}

impl Default for Palette {
    fn default() -> Self {
        cubehelix()
    }
}

fn lerp_color(a: [u8; 4], b: [u8; 4], t: f64) -> [u8; 4] {
    let inv = 1.0 - t;
    [
        (a[0] as f64 * inv + b[0] as f64 * t).round() as u8,
        (a[1] as f64 * inv + b[1] as f64 * t).round() as u8,
        (a[2] as f64 * inv + b[2] as f64 * t).round() as u8,
        255,
    ]
}

// ---------------------------------------------------------------------------
// Builtin palettes
// ---------------------------------------------------------------------------

pub fn builtin_palettes() -> Vec<Palette> {
    vec![cubehelix(), viridis(), bmy(), fire(), grayscale()]
}

/// Build a gradient LUT by interpolating between color stops.
fn gradient_lut(stops: &[(f64, [u8; 3])]) -> Vec<[u8; 4]> {
    (0..LUT_SIZE)
        .map(|i| {
            let t = i as f64 / (LUT_SIZE - 1) as f64;
            let mut lo = 0;
            for (j, &(pos, _)) in stops.iter().enumerate() {
                if pos <= t {
                    lo = j;
                }
            }
            let hi = (lo + 1).min(stops.len() - 1);
            let (lo_t, lo_c) = stops[lo];
            let (hi_t, hi_c) = stops[hi];
            let frac = if (hi_t - lo_t).abs() < 1e-10 {
                0.0
            } else {
                ((t - lo_t) / (hi_t - lo_t)).clamp(0.0, 1.0)
            };
            let inv = 1.0 - frac;
            [
                (lo_c[0] as f64 * inv + hi_c[0] as f64 * frac) as u8,
                (lo_c[1] as f64 * inv + hi_c[1] as f64 * frac) as u8,
                (lo_c[2] as f64 * inv + hi_c[2] as f64 * frac) as u8,
                255,
            ]
        })
        .collect()
}

/// Green's cubehelix running from light to dark, with a slight negative
/// start and moderate rotation. The default for Newton basins.
fn cubehelix() -> Palette {
    const START: f64 = -0.2;
    const ROT: f64 = 0.6;
    const HUE: f64 = 0.8;
    const LIGHT: f64 = 0.85;
    const DARK: f64 = 0.15;

    let colors = (0..LUT_SIZE)
        .map(|i| {
            let t = i as f64 / (LUT_SIZE - 1) as f64;
            let x = LIGHT + (DARK - LIGHT) * t;
            let amp = HUE * x * (1.0 - x) / 2.0;
            let phi = std::f64::consts::TAU * (START / 3.0 + ROT * x);
            let (s, c) = phi.sin_cos();
            let channel = |v: f64| ((v.clamp(0.0, 1.0)) * 255.0).round() as u8;
            [
                channel(x + amp * (-0.14861 * c + 1.78277 * s)),
                channel(x + amp * (-0.29227 * c - 0.90649 * s)),
                channel(x + amp * (1.97294 * c)),
                255,
            ]
        })
        .collect();
    Palette::new("Cubehelix", colors)
}

fn viridis() -> Palette {
    let stops = &[
        (0.0, [68, 1, 84]),
        (0.25, [59, 82, 139]),
        (0.5, [33, 145, 140]),
        (0.75, [94, 201, 98]),
        (1.0, [253, 231, 37]),
    ];
    Palette::new("Viridis", gradient_lut(stops))
}

/// Blue, magenta, yellow. The default for attractor densities.
fn bmy() -> Palette {
    let stops = &[
        (0.0, [0, 11, 125]),
        (0.25, [92, 24, 151]),
        (0.5, [176, 43, 141]),
        (0.75, [236, 101, 80]),
        (1.0, [254, 233, 69]),
    ];
    Palette::new("Bmy", gradient_lut(stops))
}

fn fire() -> Palette {
    let stops = &[
        (0.0, [0, 0, 0]),
        (0.25, [128, 0, 0]),
        (0.5, [255, 128, 0]),
        (0.75, [255, 255, 0]),
        (1.0, [255, 255, 255]),
    ];
    Palette::new("Fire", gradient_lut(stops))
}

fn grayscale() -> Palette {
    let stops = &[(0.0, [0, 0, 0]), (1.0, [255, 255, 255])];
    Palette::new("Grayscale", gradient_lut(stops))
}
