//! Subcommand implementations. Each takes fully resolved settings.

use std::path::Path;
use std::str::FromStr;
use std::time::Instant;

use rayon::prelude::*;
use thiserror::Error;
use tracing::{debug, info, warn};

use chaosfield_core::explore::sample_seeded;
use chaosfield_core::{zoom_frames, Attractor, ExploreKind, Polynomial, Viewport};
use chaosfield_render::{
    colorize_newton, export_png, frame_file_name, list_frames, render_newton, render_zoom,
    DensityCanvas, ExportConfig, ExportMetadata, NewtonFrame, NewtonShading, Palette,
};

use crate::settings::{AttractorSettings, NewtonSettings, Settings};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Core(#[from] chaosfield_core::CoreError),

    #[error(transparent)]
    Render(#[from] chaosfield_render::RenderError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type CliResult<T> = Result<T, CliError>;

// ---------------------------------------------------------------------------
// Argument parsing helpers
// ---------------------------------------------------------------------------

/// Parse `"<left><sep><right>"` into two values.
pub fn parse_pair<T: FromStr>(s: &str, separator: char) -> Option<(T, T)> {
    let index = s.find(separator)?;
    match (T::from_str(&s[..index]), T::from_str(&s[index + 1..])) {
        (Ok(l), Ok(r)) => Some((l, r)),
        _ => None,
    }
}

/// clap value parser for `min,max` style ranges and `x,y` points.
pub fn parse_range(s: &str) -> Result<(f64, f64), String> {
    parse_pair(s.trim(), ',').ok_or_else(|| format!("expected two numbers as `a,b`, got `{s}`"))
}

/// Attractor families selectable on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum AttractorKind {
    Clifford,
    JohnnySvensson,
    SymmetricIcon,
    Ikeda,
    FractalDream,
}

/// Build an attractor from a flat parameter list.
///
/// Clifford, Johnny Svensson and Fractal Dream take `a,b,c,d`; the symmetric
/// icon takes `alpha,beta,gamma,omega,lambda,degree`; Ikeda takes `u`.
pub fn build_attractor(kind: AttractorKind, params: &[f64]) -> CliResult<Attractor> {
    let expected = match kind {
        AttractorKind::SymmetricIcon => 6,
        AttractorKind::Ikeda => 1,
        _ => 4,
    };
    if params.len() != expected {
        return Err(CliError::InvalidArgument(format!(
            "{kind:?} takes {expected} parameters, got {}",
            params.len()
        )));
    }
    let p = params;
    Ok(match kind {
        AttractorKind::Clifford => Attractor::Clifford {
            a: p[0],
            b: p[1],
            c: p[2],
            d: p[3],
        },
        AttractorKind::JohnnySvensson => Attractor::JohnnySvensson {
            a: p[0],
            b: p[1],
            c: p[2],
            d: p[3],
        },
        AttractorKind::FractalDream => Attractor::FractalDream {
            a: p[0],
            b: p[1],
            c: p[2],
            d: p[3],
        },
        AttractorKind::Ikeda => Attractor::Ikeda { u: p[0] },
        AttractorKind::SymmetricIcon => {
            let degree = p[5];
            if !(degree >= 0.0 && degree.fract() == 0.0 && degree <= u32::MAX as f64) {
                return Err(CliError::InvalidArgument(format!(
                    "symmetric icon degree must be a non-negative integer, got {degree}"
                )));
            }
            Attractor::SymmetricIcon {
                alpha: p[0],
                beta: p[1],
                gamma: p[2],
                omega: p[3],
                lambda: p[4],
                degree: degree as u32,
            }
        }
    })
}

/// Parameters of an attractor as a metadata string.
fn describe_attractor(att: &Attractor) -> String {
    match *att {
        Attractor::Clifford { a, b, c, d }
        | Attractor::JohnnySvensson { a, b, c, d }
        | Attractor::FractalDream { a, b, c, d } => format!("a={a} b={b} c={c} d={d}"),
        Attractor::SymmetricIcon {
            alpha,
            beta,
            gamma,
            omega,
            lambda,
            degree,
        } => format!(
            "alpha={alpha} beta={beta} gamma={gamma} omega={omega} lambda={lambda} degree={degree}"
        ),
        Attractor::Ikeda { u } => format!("u={u}"),
    }
}

fn export_config(settings: &Settings) -> CliResult<ExportConfig> {
    let config = ExportConfig::new(settings.output_dir());
    config.ensure_dir()?;
    Ok(config)
}

// ---------------------------------------------------------------------------
// Newton basins
// ---------------------------------------------------------------------------

fn newton_metadata(poly: &Polynomial, frame: &NewtonFrame, palette: &Palette) -> ExportMetadata {
    ExportMetadata::new("Newton")
        .description(format!("Newton basins of {poly}"))
        .field("Polynomial", poly)
        .field("X", format!("{},{}", frame.viewport.x.0, frame.viewport.x.1))
        .field("Y", format!("{},{}", frame.viewport.y.0, frame.viewport.y.1))
        .field("Steps", frame.steps)
        .field("Palette", palette.name)
}

fn shading(newton: &NewtonSettings) -> NewtonShading {
    NewtonShading {
        brightness: newton.brightness,
    }
}

/// Render one Newton basin image.
pub fn newton(settings: &Settings, file_name: &str) -> CliResult<()> {
    let ns = &settings.newton;
    let poly = Polynomial::new(ns.polynomial.clone())?;
    info!("Polynomial: {poly}");
    info!("Derivative: {}", poly.derivative_string(1)?);
    for (i, r) in poly.roots().iter().enumerate() {
        debug!(index = i, re = r.re, im = r.im, "Root");
    }

    let viewport = match ns.viewport {
        Some(vp) => vp,
        None => Viewport::square(poly.auto_limit())?,
    };
    let palette = Palette::by_name(&ns.palette)?;
    let frame = render_newton(&poly, &viewport, ns.resolution, ns.grid_mode, ns.newton)?;
    let buffer = colorize_newton(&frame, &palette, &shading(ns));

    let config = export_config(settings)?;
    let path = config.path_for(file_name);
    export_png(&buffer, &path, &newton_metadata(&poly, &frame, &palette))?;
    info!(
        "Rendered {}x{} in {:.1} ms to {}",
        frame.width,
        frame.height,
        frame.elapsed.as_secs_f64() * 1000.0,
        path.display()
    );
    Ok(())
}

/// Render a zoom sequence as numbered frame files.
///
/// Frames are rendered in batches of the Rayon pool size so only one batch of
/// raw results is held in memory at a time.
pub fn zoom(settings: &Settings) -> CliResult<()> {
    let ns = &settings.newton;
    let zs = &settings.zoom;
    let start = Instant::now();
    let poly = Polynomial::new(ns.polynomial.clone())?;
    let palette = Palette::by_name(&ns.palette)?;
    let frames = zoom_frames(&zs.start, &zs.end, zs.frames, zs.mode)?;
    let config = export_config(settings)?;
    info!(
        frames = frames.len(),
        mode = ?zs.mode,
        "Rendering zoom into {}",
        config.output_dir.display()
    );

    let batch = rayon::current_num_threads().max(1);
    for (b, chunk) in frames.chunks(batch).enumerate() {
        let rendered = render_zoom(&poly, chunk, ns.resolution, ns.grid_mode, ns.newton)?;
        rendered
            .par_iter()
            .enumerate()
            .try_for_each(|(offset, frame)| -> CliResult<()> {
                let index = b * batch + offset;
                let buffer = colorize_newton(frame, &palette, &shading(ns));
                let meta = newton_metadata(&poly, frame, &palette).field("Frame", index);
                export_png(&buffer, &config.path_for(&frame_file_name(&zs.prefix, index)), &meta)?;
                Ok(())
            })?;
        debug!(done = b * batch + chunk.len(), "Zoom batch written");
    }

    info!(
        "Wrote {} frames in {:.2} s",
        frames.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Attractors
// ---------------------------------------------------------------------------

fn render_attractor(
    att: &Attractor,
    settings: &AttractorSettings,
    palette: &Palette,
    path: &Path,
) -> CliResult<()> {
    let (x0, y0) = settings.seed_point;
    let traj = att.trajectory(x0, y0, settings.points)?;
    let canvas = DensityCanvas::from_trajectory(&traj, settings.width, settings.height)?;
    let buffer = canvas.shade(palette, settings.scale, settings.background);
    let meta = ExportMetadata::new("Attractor")
        .description(format!("{} attractor, {}", att.name(), describe_attractor(att)))
        .field("Name", att.name())
        .field("Parameters", describe_attractor(att))
        .field("Seed", format!("{x0},{y0}"))
        .field("Points", settings.points)
        .field("Palette", palette.name);
    export_png(&buffer, path, &meta)?;
    Ok(())
}

/// Render the configured attractor.
pub fn attractor(settings: &Settings, file_name: Option<&str>) -> CliResult<()> {
    let start = Instant::now();
    let att_settings = &settings.attractor;
    let att = &att_settings.attractor;
    let palette = Palette::by_name(&att_settings.palette)?;
    let config = export_config(settings)?;
    let path = match file_name {
        Some(name) => config.path_for(name),
        None => config.path_for(&format!("{}.png", att.name())),
    };
    info!("Plotting {} ({})", att.name(), describe_attractor(att));
    render_attractor(att, att_settings, &palette, &path)?;
    info!(
        "Wrote {} in {:.2} s",
        path.display(),
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Render `count` randomly parameterized attractors of one family.
///
/// Parameter sets come from a seeded generator so a run can be repeated. Maps
/// that diverge produce no finite points and are skipped with a warning.
pub fn explore(
    settings: &Settings,
    kind: ExploreKind,
    count: usize,
    seed: Option<u64>,
    prefix: &str,
) -> CliResult<()> {
    let seed = seed.unwrap_or_else(rand::random);
    let start = Instant::now();
    let palette = Palette::by_name(&settings.attractor.palette)?;
    let config = export_config(settings)?;
    info!(?kind, count, seed, "Exploring parameter space");

    let candidates = sample_seeded(kind, seed, count);
    let written = candidates
        .par_iter()
        .enumerate()
        .map(|(i, att)| {
            let path = config.path_for(&frame_file_name(prefix, i));
            match render_attractor(att, &settings.attractor, &palette, &path) {
                Ok(()) => {
                    info!("{}. {}", i + 1, describe_attractor(att));
                    Ok(1usize)
                }
                Err(CliError::Render(chaosfield_render::RenderError::EmptyTrajectory)) => {
                    warn!("{}. {} diverged, skipped", i + 1, describe_attractor(att));
                    Ok(0)
                }
                Err(e) => Err(e),
            }
        })
        .try_reduce(|| 0, |a, b| Ok(a + b))?;

    info!(
        "Wrote {written} of {count} attractors in {:.2} s",
        start.elapsed().as_secs_f64()
    );
    Ok(())
}

// ---------------------------------------------------------------------------
// Frame listing
// ---------------------------------------------------------------------------

/// Print the frame files of `dir` in playback order, one per line.
pub fn frames(dir: &Path, ext: &str) -> CliResult<()> {
    let frames = list_frames(dir, ext)?;
    if frames.is_empty() {
        warn!("No .{ext} files in {}", dir.display());
    }
    for path in frames {
        println!("{}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pair_and_range() {
        assert_eq!(parse_pair::<i32>("4,5", ','), Some((4, 5)));
        assert_eq!(parse_pair::<i32>("4x", 'x'), None);
        assert_eq!(parse_range("-1.5,1.5"), Ok((-1.5, 1.5)));
        assert!(parse_range("1.5").is_err());
        assert!(parse_range("a,b").is_err());
    }

    #[test]
    fn build_attractor_checks_arity() {
        assert_eq!(
            build_attractor(AttractorKind::Ikeda, &[0.9]).unwrap(),
            Attractor::Ikeda { u: 0.9 }
        );
        assert!(matches!(
            build_attractor(AttractorKind::Clifford, &[1.0, 2.0]),
            Err(CliError::InvalidArgument(_))
        ));
        let icon =
            build_attractor(AttractorKind::SymmetricIcon, &[1.8, 0.0, 1.0, 0.1, -1.93, 5.0])
                .unwrap();
        assert!(matches!(icon, Attractor::SymmetricIcon { degree: 5, .. }));
        assert!(build_attractor(AttractorKind::SymmetricIcon, &[1.8, 0.0, 1.0, 0.1, -1.93, 2.5])
            .is_err());
    }

    #[test]
    fn describe_lists_parameters() {
        assert_eq!(describe_attractor(&Attractor::Ikeda { u: 0.9 }), "u=0.9");
        assert!(describe_attractor(&Attractor::fractal_dream_preset()).starts_with("a=-0.966918"));
    }

    fn scratch_settings(name: &str) -> Settings {
        let dir = std::env::temp_dir().join(format!("chaosfield_cli_{name}_{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        let mut s = Settings {
            output_dir: dir.to_string_lossy().into_owned(),
            ..Default::default()
        };
        s.newton.resolution = 16;
        s.newton.newton = chaosfield_core::NewtonParams::with_steps(5).unwrap();
        s.zoom.frames = 3;
        s.attractor.points = 5_000;
        s.attractor.width = 32;
        s.attractor.height = 32;
        s
    }

    #[test]
    fn newton_and_zoom_write_files() {
        let s = scratch_settings("newton");
        newton(&s, "basins.png").unwrap();
        zoom(&s).unwrap();
        let dir = s.output_dir();
        assert!(dir.join("basins.png").is_file());
        let listed = list_frames(&dir, "png").unwrap();
        assert_eq!(listed.len(), 4);
        assert!(dir.join("zoom-0002.png").is_file());
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn attractor_and_explore_write_files() {
        let s = scratch_settings("explore");
        attractor(&s, None).unwrap();
        explore(&s, ExploreKind::FractalDream, 2, Some(11), "fd").unwrap();
        let dir = s.output_dir();
        assert!(dir.join("fractal_dream.png").is_file());
        assert!(dir.join("fd-0000.png").is_file());
        assert!(dir.join("fd-0001.png").is_file());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
