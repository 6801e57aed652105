use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;
use std::time::Duration;

use clap::ValueHint;
use nalgebra::Vector3;
use polyview_core::projection::{DEFAULT_FAR, DEFAULT_FOV_DEGREES, DEFAULT_NEAR};
use polyview_core::{Camera, ModelState, RenderConfig, Rotation, VisibilityPolicy};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::AppConfig;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum LogFormat {
    Compact,
    Full,
    Pretty,
    Json,
}

impl std::fmt::Display for LogFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormat::Compact => f.write_str("compact"),
            LogFormat::Full => f.write_str("full"),
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, clap::ValueEnum)]
pub enum Visibility {
    /// Painter's ordering, nothing dropped
    DepthSort,
    /// Drop faces turned away from the camera
    Backface,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Visibility::DepthSort => f.write_str("depth-sort"),
            Visibility::Backface => f.write_str("backface"),
        }
    }
}

impl From<Visibility> for VisibilityPolicy {
    fn from(v: Visibility) -> Self {
        match v {
            Visibility::DepthSort => VisibilityPolicy::DepthSort,
            Visibility::Backface => VisibilityPolicy::BackfaceCull,
        }
    }
}

#[derive(Debug, clap::Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// Logging output filters; comma-separated
    #[arg(
        short,
        long,
        default_value = "warn,polyview_core=info,polyview_terminal=info",
        env = "POLYVIEW_LOG_FILTER"
    )]
    pub log_filter: String,
    /// Logging output format
    #[arg(long, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
    /// Write logs to this file instead of stderr
    #[arg(long, value_hint = ValueHint::FilePath, env = "POLYVIEW_LOG_FILE")]
    pub log_file: Option<PathBuf>,
    /// Uniform scale applied to the model
    #[arg(short, long, default_value_t = 0.3)]
    pub scale: f64,
    /// Near clip plane
    #[arg(long, default_value_t = DEFAULT_NEAR)]
    pub near: f64,
    /// Far clip plane
    #[arg(long, default_value_t = DEFAULT_FAR)]
    pub far: f64,
    /// Reported field of view in degrees; the projection itself is fixed at 60
    #[arg(long, default_value_t = DEFAULT_FOV_DEGREES)]
    pub fov: f64,
    /// Visibility pass run on every frame
    #[arg(short, long, default_value_t = Visibility::DepthSort)]
    pub visibility: Visibility,
    /// Camera position; without it no view transform is applied
    #[arg(long, value_parser = parse_vec3::<f64>, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub camera: Option<Vector3<f64>>,
    /// Point the camera looks at
    #[arg(long, default_value = "0,0,0", value_parser = parse_vec3::<f64>, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub target: Vector3<f64>,
    /// Initial rotation in degrees
    #[arg(long, default_value = "45,120,0", value_parser = parse_vec3::<f64>, value_name = "X,Y,Z", allow_hyphen_values = true)]
    pub rotation: Vector3<f64>,
    /// Degrees of automatic spin about y per frame
    #[arg(long, default_value_t = 2.0, allow_hyphen_values = true)]
    pub step: f64,
    /// Frame budget in milliseconds
    #[arg(long, default_value_t = 15)]
    pub frame_ms: u64,
    /// OBJ model to render; the built-in cube when omitted
    #[arg(value_hint = ValueHint::FilePath)]
    pub model: Option<PathBuf>,
}

impl Cli {
    pub fn app_config(&self) -> AppConfig {
        let render = RenderConfig {
            scale: self.scale,
            near: self.near,
            far: self.far,
            fov_degrees: self.fov,
            camera: self.camera.map(|position| Camera::new(position, self.target)),
            visibility: self.visibility.into(),
            ..Default::default()
        };
        let rotation = Rotation::new(self.rotation.x, self.rotation.y, self.rotation.z);

        AppConfig {
            render,
            state: ModelState::new(rotation, self.step),
            frame_time: Duration::from_millis(self.frame_ms),
        }
    }
}

fn parse_vec3<R: FromStr>(
    s: &str,
) -> Result<Vector3<R>, Box<dyn std::error::Error + Send + Sync + 'static>>
where
    <R as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let mut split = s.trim().split(',');
    let mut next = || {
        split
            .next()
            .ok_or_else(|| format!("expected three comma-separated values, got {s:?}"))
    };
    let x = R::from_str(next()?.trim())?;
    let y = R::from_str(next()?.trim())?;
    let z = R::from_str(next()?.trim())?;
    Ok(nalgebra::vector![x, y, z])
}

/// Set up log output
pub fn initialize_tracing(
    log_filter: &str,
    log_format: LogFormat,
    log_file: Option<&Path>,
) -> io::Result<()> {
    let writer = match log_file {
        Some(path) => BoxMakeWriter::new(Mutex::new(File::create(path)?)),
        None => BoxMakeWriter::new(io::stderr),
    };
    let tsub = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_env_filter(log_filter);

    match log_format {
        LogFormat::Compact => tsub.compact().init(),
        LogFormat::Full => tsub.init(),
        LogFormat::Pretty => tsub.pretty().init(),
        LogFormat::Json => tsub.json().init(),
    }
    Ok(())
}
