mod app_dir;
mod commands;
mod settings;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing::{error, info};

use chaosfield_core::{ExploreKind, NewtonParams, Viewport, ZoomMode};
use chaosfield_render::{DensityScale, GridMode};

use commands::{parse_range, AttractorKind, CliError, CliResult};
use settings::Settings;

// ---------------------------------------------------------------------------
// Command line
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "chaosfield", version, about = "Newton basins, zoom animations and strange attractors")]
struct Cli {
    /// JSON settings file. Defaults to `settings.json` next to the executable.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Output directory, overriding the settings file.
    #[arg(long, global = true)]
    out: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Render the Newton basins of a polynomial.
    Newton(NewtonArgs),
    /// Render a sequence of Newton frames zooming from one viewport to another.
    Zoom(ZoomArgs),
    /// Plot the density of a single attractor trajectory.
    Attractor(AttractorArgs),
    /// Plot randomly parameterized attractors of one family.
    Explore(ExploreArgs),
    /// List a directory's frame files in playback order.
    Frames(FramesArgs),
    /// Write the resolved settings to the settings file.
    Init,
}

/// Options shared by every Newton render.
#[derive(Debug, Args)]
struct NewtonOpts {
    /// Coefficients, highest degree first, e.g. `1,0,0,1,-1,1`.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    coeffs: Option<Vec<f64>>,

    /// Samples along each axis (square) or along the shorter axis (even).
    #[arg(long)]
    resolution: Option<usize>,

    /// Newton steps per point.
    #[arg(long)]
    steps: Option<u32>,

    /// Radius within which a value counts as sitting on a root.
    #[arg(long)]
    epsilon: Option<f64>,

    /// Size the grid to the viewport's aspect ratio.
    #[arg(long)]
    even: bool,

    /// Skip the convergence-time darkening.
    #[arg(long)]
    flat: bool,

    #[arg(long)]
    palette: Option<String>,
}

impl NewtonOpts {
    fn apply(&self, settings: &mut Settings) -> CliResult<()> {
        let ns = &mut settings.newton;
        if let Some(coeffs) = &self.coeffs {
            ns.polynomial = coeffs.clone();
        }
        if let Some(resolution) = self.resolution {
            ns.resolution = resolution;
        }
        if self.steps.is_some() || self.epsilon.is_some() {
            ns.newton = NewtonParams::new(
                self.steps.unwrap_or(ns.newton.steps),
                self.epsilon.unwrap_or(ns.newton.epsilon),
            )?;
        }
        if self.even {
            ns.grid_mode = GridMode::Even;
        }
        if self.flat {
            ns.brightness = false;
        }
        if let Some(palette) = &self.palette {
            ns.palette = palette.clone();
        }
        Ok(())
    }
}

#[derive(Debug, Args)]
struct NewtonArgs {
    #[command(flatten)]
    opts: NewtonOpts,

    /// Real-axis limits as `min,max`; defaults to a square around the roots.
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    x: Option<(f64, f64)>,

    /// Imaginary-axis limits as `min,max`; defaults to the x limits.
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    y: Option<(f64, f64)>,

    /// Output file name inside the output directory.
    #[arg(long, default_value = "newton.png")]
    name: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ZoomModeArg {
    Linear,
    Geometric,
}

impl From<ZoomModeArg> for ZoomMode {
    fn from(mode: ZoomModeArg) -> Self {
        match mode {
            ZoomModeArg::Linear => ZoomMode::Linear,
            ZoomModeArg::Geometric => ZoomMode::Geometric,
        }
    }
}

#[derive(Debug, Args)]
struct ZoomArgs {
    #[command(flatten)]
    opts: NewtonOpts,

    #[arg(long)]
    frames: Option<usize>,

    #[arg(long, value_enum)]
    mode: Option<ZoomModeArg>,

    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    start_x: Option<(f64, f64)>,
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    start_y: Option<(f64, f64)>,
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    end_x: Option<(f64, f64)>,
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    end_y: Option<(f64, f64)>,

    /// Frame file prefix; files are named `<prefix>-0000.png` onwards.
    #[arg(long)]
    prefix: Option<String>,
}

/// Replace either axis of `viewport` that was given on the command line.
fn override_viewport(
    viewport: Viewport,
    x: Option<(f64, f64)>,
    y: Option<(f64, f64)>,
) -> CliResult<Viewport> {
    if x.is_none() && y.is_none() {
        return Ok(viewport);
    }
    Ok(Viewport::new(x.unwrap_or(viewport.x), y.unwrap_or(viewport.y))?)
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ScaleArg {
    Linear,
    Log,
}

/// Options shared by attractor renders.
#[derive(Debug, Args)]
struct DensityOpts {
    /// Trajectory length.
    #[arg(long)]
    points: Option<usize>,

    /// Canvas size as `width,height`.
    #[arg(long, value_parser = parse_size)]
    size: Option<(u32, u32)>,

    /// Starting point as `x,y`.
    #[arg(long, value_parser = parse_range, allow_hyphen_values = true)]
    seed_point: Option<(f64, f64)>,

    #[arg(long, value_enum)]
    scale: Option<ScaleArg>,

    #[arg(long)]
    palette: Option<String>,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    commands::parse_pair(s.trim(), ',')
        .ok_or_else(|| format!("expected `width,height`, got `{s}`"))
}

impl DensityOpts {
    fn apply(&self, settings: &mut Settings) {
        let att = &mut settings.attractor;
        if let Some(points) = self.points {
            att.points = points;
        }
        if let Some((w, h)) = self.size {
            att.width = w;
            att.height = h;
        }
        if let Some(seed_point) = self.seed_point {
            att.seed_point = seed_point;
        }
        if let Some(scale) = self.scale {
            att.scale = match scale {
                ScaleArg::Linear => DensityScale::Linear,
                ScaleArg::Log => DensityScale::Log,
            };
        }
        if let Some(palette) = &self.palette {
            att.palette = palette.clone();
        }
    }
}

#[derive(Debug, Args)]
struct AttractorArgs {
    #[command(flatten)]
    opts: DensityOpts,

    /// Map to iterate. Requires `--params`.
    #[arg(long, value_enum, requires = "params")]
    kind: Option<AttractorKind>,

    /// Map parameters, comma separated.
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, requires = "kind")]
    params: Option<Vec<f64>>,

    /// Output file name; defaults to `<attractor>.png`.
    #[arg(long)]
    name: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ExploreFamily {
    JohnnySvensson,
    FractalDream,
}

impl From<ExploreFamily> for ExploreKind {
    fn from(family: ExploreFamily) -> Self {
        match family {
            ExploreFamily::JohnnySvensson => ExploreKind::JohnnySvensson,
            ExploreFamily::FractalDream => ExploreKind::FractalDream,
        }
    }
}

#[derive(Debug, Args)]
struct ExploreArgs {
    #[command(flatten)]
    opts: DensityOpts,

    #[arg(long, value_enum, default_value = "fractal-dream")]
    family: ExploreFamily,

    /// Number of parameter sets to try.
    #[arg(long, default_value_t = 10)]
    count: usize,

    /// Generator seed; a random one is drawn and logged when omitted.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = "explore")]
    prefix: String,
}

#[derive(Debug, Args)]
struct FramesArgs {
    /// Directory to list; defaults to the output directory.
    dir: Option<PathBuf>,

    #[arg(long, default_value = "png")]
    ext: String,
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn run(cli: Cli) -> CliResult<()> {
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(app_dir::default_settings_path);
    let is_init = matches!(cli.command, Command::Init);
    if cli.config.is_some() && !is_init && !config_path.exists() {
        return Err(CliError::InvalidArgument(format!(
            "settings file {} does not exist",
            config_path.display()
        )));
    }
    let mut settings = Settings::load(&config_path);
    if let Some(out) = &cli.out {
        settings.output_dir = out.to_string_lossy().into_owned();
    }

    match cli.command {
        Command::Newton(args) => {
            args.opts.apply(&mut settings)?;
            if let Some(x) = args.x.or(args.y) {
                settings.newton.viewport = Some(Viewport::new(x, args.y.unwrap_or(x))?);
            }
            commands::newton(&settings, &args.name)
        }
        Command::Zoom(args) => {
            args.opts.apply(&mut settings)?;
            let zs = &mut settings.zoom;
            if let Some(frames) = args.frames {
                zs.frames = frames;
            }
            if let Some(mode) = args.mode {
                zs.mode = mode.into();
            }
            zs.start = override_viewport(zs.start, args.start_x, args.start_y)?;
            zs.end = override_viewport(zs.end, args.end_x, args.end_y)?;
            if let Some(prefix) = args.prefix {
                zs.prefix = prefix;
            }
            commands::zoom(&settings)
        }
        Command::Attractor(args) => {
            args.opts.apply(&mut settings);
            if let (Some(kind), Some(params)) = (args.kind, &args.params) {
                settings.attractor.attractor = commands::build_attractor(kind, params)?;
            }
            commands::attractor(&settings, args.name.as_deref())
        }
        Command::Explore(args) => {
            args.opts.apply(&mut settings);
            commands::explore(
                &settings,
                args.family.into(),
                args.count,
                args.seed,
                &args.prefix,
            )
        }
        Command::Frames(args) => {
            let dir = args.dir.unwrap_or_else(|| settings.output_dir());
            commands::frames(&dir, &args.ext)
        }
        Command::Init => {
            settings.save(&config_path)?;
            info!("Wrote settings to {}", config_path.display());
            Ok(())
        }
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    info!("Starting chaosfield");

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let mut msg = e.to_string();
            let mut source = std::error::Error::source(&e);
            while let Some(cause) = source {
                msg.push_str(&format!(": {cause}"));
                source = std::error::Error::source(cause);
            }
            error!("{msg}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_negative_ranges_and_coefficients() {
        let cli = Cli::try_parse_from([
            "chaosfield",
            "newton",
            "--coeffs",
            "-1,0,2",
            "--x",
            "-2.5,1",
            "--steps",
            "12",
        ])
        .unwrap();
        let Command::Newton(args) = cli.command else {
            panic!("expected newton");
        };
        assert_eq!(args.opts.coeffs, Some(vec![-1.0, 0.0, 2.0]));
        assert_eq!(args.x, Some((-2.5, 1.0)));
        assert_eq!(args.opts.steps, Some(12));
        assert_eq!(args.name, "newton.png");
    }

    #[test]
    fn newton_opts_override_settings() {
        let cli = Cli::try_parse_from([
            "chaosfield",
            "--out",
            "renders",
            "zoom",
            "--resolution",
            "64",
            "--epsilon",
            "0.001",
            "--even",
            "--mode",
            "linear",
        ])
        .unwrap();
        assert_eq!(cli.out, Some(PathBuf::from("renders")));
        let Command::Zoom(args) = cli.command else {
            panic!("expected zoom");
        };
        let mut settings = Settings::default();
        args.opts.apply(&mut settings).unwrap();
        assert_eq!(settings.newton.resolution, 64);
        assert_eq!(settings.newton.newton.steps, 20);
        assert_eq!(settings.newton.newton.epsilon, 0.001);
        assert_eq!(settings.newton.grid_mode, GridMode::Even);
        assert!(matches!(args.mode, Some(ZoomModeArg::Linear)));
    }

    #[test]
    fn zero_steps_rejected_when_applied() {
        let cli = Cli::try_parse_from(["chaosfield", "newton", "--steps", "0"]).unwrap();
        let Command::Newton(args) = cli.command else {
            panic!("expected newton");
        };
        assert!(args.opts.apply(&mut Settings::default()).is_err());
    }

    #[test]
    fn attractor_kind_requires_params() {
        assert!(Cli::try_parse_from(["chaosfield", "attractor", "--kind", "ikeda"]).is_err());
        let cli = Cli::try_parse_from([
            "chaosfield",
            "attractor",
            "--kind",
            "clifford",
            "--params",
            "-1.4,1.6,1.0,0.7",
            "--size",
            "300,200",
        ])
        .unwrap();
        let Command::Attractor(args) = cli.command else {
            panic!("expected attractor");
        };
        assert_eq!(args.params, Some(vec![-1.4, 1.6, 1.0, 0.7]));
        assert_eq!(args.opts.size, Some((300, 200)));
    }

    #[test]
    fn explore_defaults() {
        let cli = Cli::try_parse_from(["chaosfield", "explore"]).unwrap();
        let Command::Explore(args) = cli.command else {
            panic!("expected explore");
        };
        assert!(matches!(args.family, ExploreFamily::FractalDream));
        assert_eq!(args.count, 10);
        assert_eq!(args.prefix, "explore");
        assert!(args.seed.is_none());
    }
}
