use bellows::animation::{DEFAULT_PHASE_STEP, Oscillator};
use bellows::render::raster::{self, RasterError, RasterOptions};
use bellows::render::{HeadlessError, RenderError, SolvedAssembly, SvgRenderOptions, Visualizer};
use bellows::{DeformationState, JOINT_CATALOG, JointTopology, LoadStatus, VisualizerConfig};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

#[derive(Debug)]
enum CliError {
    Usage(&'static str),
    InvalidArg(String),
    Io(std::io::Error),
    Config(bellows::Error),
    Render(HeadlessError),
    Raster(RasterError),
    Json(serde_json::Error),
    Yaml(serde_yaml::Error),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CliError::Usage(msg) => write!(f, "{msg}"),
            CliError::InvalidArg(msg) => write!(f, "{msg}"),
            CliError::Io(err) => write!(f, "I/O error: {err}"),
            CliError::Config(err) => write!(f, "{err}"),
            CliError::Render(err) => write!(f, "{err}"),
            CliError::Raster(err) => write!(f, "{err}"),
            CliError::Json(err) => write!(f, "JSON error: {err}"),
            CliError::Yaml(err) => write!(f, "state file error: {err}"),
        }
    }
}

impl CliError {
    fn exit_code(&self) -> i32 {
        let headless = match self {
            CliError::Usage(_) | CliError::InvalidArg(_) => return 2,
            CliError::Render(err) => Some(err),
            CliError::Raster(RasterError::Headless(err)) => Some(err),
            _ => None,
        };
        match headless {
            Some(HeadlessError::Render(RenderError::UnsupportedTopology { .. })) => 3,
            _ => 1,
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<bellows::Error> for CliError {
    fn from(value: bellows::Error) -> Self {
        Self::Config(value)
    }
}

impl From<HeadlessError> for CliError {
    fn from(value: HeadlessError) -> Self {
        Self::Render(value)
    }
}

impl From<RasterError> for CliError {
    fn from(value: RasterError) -> Self {
        Self::Raster(value)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

impl From<serde_yaml::Error> for CliError {
    fn from(value: serde_yaml::Error) -> Self {
        Self::Yaml(value)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Command {
    #[default]
    Catalog,
    Solve,
    Render,
    Animate,
}

#[derive(Debug, Clone, Copy, Default)]
enum RenderFormat {
    #[default]
    Svg,
    Png,
    Jpeg,
    Pdf,
}

impl RenderFormat {
    fn extension(self) -> &'static str {
        match self {
            RenderFormat::Svg => "svg",
            RenderFormat::Png => "png",
            RenderFormat::Jpeg => "jpg",
            RenderFormat::Pdf => "pdf",
        }
    }
}

impl FromStr for RenderFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "svg" => Ok(Self::Svg),
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            "pdf" => Ok(Self::Pdf),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    command: Command,
    joint: Option<JointTopology>,
    axial: Option<f64>,
    lateral: Option<f64>,
    angular: Option<f64>,
    pressure: Option<f64>,
    cross_section: Option<bool>,
    state_path: Option<String>,
    config_path: Option<String>,
    pretty: bool,
    render_format: RenderFormat,
    render_scale: f32,
    background: Option<String>,
    diagram_id: Option<String>,
    out: Option<String>,
    frames: usize,
    step: Option<f64>,
    out_dir: Option<String>,
}

#[derive(Serialize)]
struct SolveOut<'a> {
    #[serde(flatten)]
    assembly: &'a SolvedAssembly,
    load_status: LoadStatus,
}

fn usage() -> &'static str {
    "bellows-cli\n\
\n\
USAGE:\n\
  bellows-cli catalog [--pretty]\n\
  bellows-cli solve --joint <type> [--axial <n>] [--lateral <n>] [--angular <n>] [--pressure <n>] [--state <path>] [--config <path>] [--pretty]\n\
  bellows-cli render --joint <type> [deformation flags] [--solid|--section] [--format svg|png|jpg|pdf] [--scale <n>] [--background <css-color>] [--id <diagram-id>] [--out <path>]\n\
  bellows-cli animate --joint <type> --frames <n> --out-dir <dir> [--step <radians>] [--solid|--section] [--format svg|png|jpg|pdf] [--config <path>]\n\
\n\
NOTES:\n\
  - <type> is one of axial, universal (alias lateral), hinged, gimbal, pressure-balanced.\n\
  - --axial is a signed percentage (-100..100), --lateral a percentage (0..100), --angular degrees.\n\
  - --state reads a JSON or YAML deformation state; flags override its fields.\n\
  - --config reads a JSON or YAML file merged over the default drawing constants.\n\
  - render prints SVG to stdout by default; raster formats default to ./bellows-<type>.<ext>.\n\
  - Set BELLOWS_LOG (e.g. BELLOWS_LOG=debug) to log solver decisions to stderr.\n\
"
}

fn next_f64<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<f64, CliError> {
    let Some(v) = it.next() else {
        return Err(CliError::Usage(usage()));
    };
    let v = v.parse::<f64>().map_err(|_| CliError::Usage(usage()))?;
    if !v.is_finite() {
        return Err(CliError::Usage(usage()));
    }
    Ok(v)
}

fn next_string<'a>(it: &mut impl Iterator<Item = &'a String>) -> Result<String, CliError> {
    it.next().cloned().ok_or(CliError::Usage(usage()))
}

fn parse_args(argv: &[String]) -> Result<Args, CliError> {
    let mut args = Args {
        render_scale: 1.0,
        ..Default::default()
    };

    let mut it = argv.iter().skip(1);
    while let Some(a) = it.next() {
        match a.as_str() {
            "--help" | "-h" => return Err(CliError::Usage(usage())),
            "catalog" => args.command = Command::Catalog,
            "solve" => args.command = Command::Solve,
            "render" => args.command = Command::Render,
            "animate" => args.command = Command::Animate,
            "--pretty" => args.pretty = true,
            "--solid" => args.cross_section = Some(false),
            "--section" => args.cross_section = Some(true),
            "--joint" => {
                let name = next_string(&mut it)?;
                let joint = name
                    .parse::<JointTopology>()
                    .map_err(|e| CliError::InvalidArg(e.to_string()))?;
                args.joint = Some(joint);
            }
            "--axial" => args.axial = Some(next_f64(&mut it)?),
            "--lateral" => args.lateral = Some(next_f64(&mut it)?),
            "--angular" => args.angular = Some(next_f64(&mut it)?),
            "--pressure" => args.pressure = Some(next_f64(&mut it)?),
            "--state" => args.state_path = Some(next_string(&mut it)?),
            "--config" => args.config_path = Some(next_string(&mut it)?),
            "--format" => {
                let fmt = next_string(&mut it)?;
                args.render_format = fmt
                    .parse::<RenderFormat>()
                    .map_err(|_| CliError::Usage(usage()))?;
            }
            "--scale" => {
                let scale = next_string(&mut it)?;
                args.render_scale = scale.parse::<f32>().map_err(|_| CliError::Usage(usage()))?;
                if !(args.render_scale.is_finite() && args.render_scale > 0.0) {
                    return Err(CliError::Usage(usage()));
                }
            }
            "--background" => {
                let bg = next_string(&mut it)?;
                if !bg.trim().is_empty() {
                    args.background = Some(bg.trim().to_string());
                }
            }
            "--id" => args.diagram_id = Some(next_string(&mut it)?),
            "--out" => args.out = Some(next_string(&mut it)?),
            "--out-dir" => args.out_dir = Some(next_string(&mut it)?),
            "--frames" => {
                let n = next_string(&mut it)?;
                args.frames = n.parse::<usize>().map_err(|_| CliError::Usage(usage()))?;
            }
            "--step" => {
                let step = next_f64(&mut it)?;
                if step <= 0.0 {
                    return Err(CliError::Usage(usage()));
                }
                args.step = Some(step);
            }
            _ => return Err(CliError::Usage(usage())),
        }
    }

    if args.command != Command::Catalog && args.joint.is_none() {
        return Err(CliError::Usage(usage()));
    }
    if args.command == Command::Animate && (args.frames == 0 || args.out_dir.is_none()) {
        return Err(CliError::Usage(usage()));
    }
    Ok(args)
}

fn write_json(value: &impl Serialize, pretty: bool) -> Result<(), CliError> {
    if pretty {
        serde_json::to_writer_pretty(std::io::stdout().lock(), value)?;
    } else {
        serde_json::to_writer(std::io::stdout().lock(), value)?;
    }
    println!();
    Ok(())
}

fn load_config(path: Option<&str>) -> Result<VisualizerConfig, CliError> {
    match path {
        None => Ok(VisualizerConfig::default()),
        Some(path) => Ok(VisualizerConfig::from_str_any(&std::fs::read_to_string(path)?)?),
    }
}

/// State file first, then individual flags on top.
fn load_state(args: &Args) -> Result<DeformationState, CliError> {
    let mut state = match args.state_path.as_deref() {
        None => DeformationState::default(),
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            if text.trim().is_empty() {
                DeformationState::default()
            } else {
                serde_yaml::from_str(&text)?
            }
        }
    };
    if let Some(v) = args.axial {
        state.axial = v;
    }
    if let Some(v) = args.lateral {
        state.lateral = v;
    }
    if let Some(v) = args.angular {
        state.angular = v;
    }
    if let Some(v) = args.pressure {
        state.pressure = v;
    }
    if let Some(v) = args.cross_section {
        state.cross_section_mode = v;
    }
    Ok(state)
}

fn default_out_path(joint: JointTopology, ext: &str) -> PathBuf {
    PathBuf::from(format!("bellows-{}.{ext}", joint.as_str()))
}

/// Everything a joint command needs, resolved from the arguments.
struct Session {
    joint: JointTopology,
    state: DeformationState,
    visualizer: Visualizer,
    raster: RasterOptions,
}

impl Session {
    fn from_args(args: &Args) -> Result<Self, CliError> {
        let Some(joint) = args.joint else {
            return Err(CliError::Usage(usage()));
        };
        let config = load_config(args.config_path.as_deref())?;
        let state = load_state(args)?;
        tracing::debug!(%joint, ?state, "loaded inputs");

        let visualizer = Visualizer::new()
            .with_config(config)
            .with_svg_options(SvgRenderOptions {
                diagram_id: args.diagram_id.clone(),
                background: args.background.clone(),
                ..Default::default()
            });
        let raster = RasterOptions {
            scale: args.render_scale,
            background: args.background.clone(),
            ..Default::default()
        };
        Ok(Self {
            joint,
            state,
            visualizer,
            raster,
        })
    }

    fn render(&self, state: &DeformationState, format: RenderFormat) -> Result<Vec<u8>, CliError> {
        let svg = self.visualizer.render_svg(self.joint, state)?;
        Ok(match format {
            RenderFormat::Svg => svg.into_bytes(),
            RenderFormat::Png => raster::svg_to_png(&svg, &self.raster)?,
            RenderFormat::Jpeg => raster::svg_to_jpeg(&svg, &self.raster)?,
            RenderFormat::Pdf => raster::svg_to_pdf(&svg)?,
        })
    }
}

fn write_output(bytes: &[u8], out: Option<&Path>) -> Result<(), CliError> {
    use std::io::Write;
    match out {
        Some(path) if path != Path::new("-") => std::fs::write(path, bytes)?,
        _ => std::io::stdout().lock().write_all(bytes)?,
    }
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    match args.command {
        Command::Catalog => write_json(&JOINT_CATALOG, args.pretty),
        Command::Solve => {
            let session = Session::from_args(&args)?;
            let assembly = session.visualizer.solve(session.joint, &session.state)?;
            let out = SolveOut {
                load_status: assembly.state.load_status(),
                assembly: &assembly,
            };
            write_json(&out, args.pretty)
        }
        Command::Render => {
            let session = Session::from_args(&args)?;
            let bytes = session.render(&session.state, args.render_format)?;
            let out = match (&args.out, args.render_format) {
                (Some(out), _) => Some(PathBuf::from(out)),
                (None, RenderFormat::Svg) => None,
                (None, fmt) => Some(default_out_path(session.joint, fmt.extension())),
            };
            write_output(&bytes, out.as_deref())
        }
        Command::Animate => {
            let session = Session::from_args(&args)?;
            let Some(dir) = args.out_dir.as_deref() else {
                return Err(CliError::Usage(usage()));
            };
            std::fs::create_dir_all(dir)?;

            let allowed = session.joint.capabilities();
            let mut clock = Oscillator::new(args.step.unwrap_or(DEFAULT_PHASE_STEP));
            let mut state = session.state;
            let ext = args.render_format.extension();
            for i in 0..args.frames {
                state = clock.tick(allowed, &state);
                let bytes = session.render(&state, args.render_format)?;
                let path = Path::new(dir).join(format!("frame-{i:04}.{ext}"));
                std::fs::write(&path, bytes)?;
                tracing::debug!(frame = i, phase = clock.phase(), path = %path.display(), "wrote frame");
            }
            Ok(())
        }
    }
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_env("BELLOWS_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() {
    init_logging();

    let args = match parse_args(&std::env::args().collect::<Vec<_>>()) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(err.exit_code());
        }
    };

    if let Err(err) = run(args) {
        eprintln!("{err}");
        std::process::exit(err.exit_code());
    }
}
