use anyhow::{anyhow, Context, Result};
use clap::Parser;
use config::{Config, Environment, File};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::brightness::Model;
use crate::controls::ControlScales;
use crate::params::OpticalParams;

/// Environment variable naming the directory that contains `config/`.
pub const ROOT_DIR_VAR: &str = "FRINGES_ROOT_DIR";
/// Prefix for environment overrides, eg. `FRINGES_PARAMS__N1=1.5`.
pub const ENV_PREFIX: &str = "FRINGES";


/// Runtime configuration for the application.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub model: Model,
    /// Upper end of the radial axis, in the units of the focal length.
    pub r_max: f64,
    /// Radial spacing of the brightness curve.
    pub curve_step: f64,
    /// Ring image width in pixels.
    pub width: usize,
    /// Ring image height in pixels.
    pub height: usize,
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
    pub params: OpticalParams,
    #[serde(default)]
    pub controls: ControlScales,
}

fn default_output_dir() -> String {
    "output".to_string()
}

pub fn load_default_config() -> Result<Settings> {
    let root = retrieve_project_root()?;
    let default_config_file = root.join("config/default.toml");

    let settings = Config::builder()
        .add_source(File::from(default_config_file).required(true))
        .build()
        .context("Error loading configuration")?;

    let mut config: Settings = settings
        .try_deserialize()
        .context("Error deserializing configuration")?;

    clamp_range(&mut config);
    validate_config(&config)?;

    Ok(config)
}

/// Loads settings from the config file, the environment and the command line.
pub fn load_config() -> Result<Settings> {
    let args = CliArgs::parse();
    load_config_with(&args)
}

/// Loads settings from the config file and the environment, then applies `args`.
///
/// `config/local.toml` is used in place of `config/default.toml` when it exists.
pub fn load_config_with(args: &CliArgs) -> Result<Settings> {
    let root = retrieve_project_root()?;

    let default_config_file = root.join("config/default.toml");
    let local_config = root.join("config/local.toml");

    let config_file = if local_config.exists() {
        info!("Using local configuration: {:?}", local_config);
        local_config
    } else {
        info!("Using default configuration: {:?}", default_config_file);
        default_config_file
    };

    let settings = Config::builder()
        .add_source(File::from(config_file).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
        .build()
        .context("Error loading configuration")?;

    let mut config: Settings = settings
        .try_deserialize()
        .context("Error deserializing configuration")?;

    apply_cli_args(&mut config, args);
    clamp_range(&mut config);
    validate_config(&config)?;

    log::debug!("{:#?}", config);

    Ok(config)
}

/// Overrides settings with any values given on the command line.
pub fn apply_cli_args(config: &mut Settings, args: &CliArgs) {
    if let Some(thickness) = args.thickness {
        config.params.gap_thickness = thickness;
    }
    if let Some(n1) = args.n1 {
        config.params.n1 = n1;
    }
    if let Some(n2) = args.n2 {
        config.params.n2 = n2;
    }
    if let Some(n3) = args.n3 {
        config.params.n3 = n3;
    }
    if let Some(wavelength) = args.wavelength {
        config.params.wavelength = wavelength;
    }
    if let Some(focal) = args.focal {
        config.params.focal_length = focal;
    }
    if let Some(model) = args.model {
        config.model = model;
    }
    if let Some(r_max) = args.r_max {
        config.r_max = r_max;
    }
    if let Some(step) = args.step {
        config.curve_step = step;
    }
    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(output) = &args.output {
        config.output_dir = output.clone();
    }
}

/// Raises the radial range to the visible minimum.
pub fn clamp_range(config: &mut Settings) {
    let r_max = crate::scene::clamp_r_max(config.r_max);
    if r_max != config.r_max {
        warn!(
            "Radial range {} is below the minimum, using {}",
            config.r_max, r_max
        );
        config.r_max = r_max;
    }
}

/// Retrieve the project root directory.
/// This function tries to find the project root directory in different ways:
/// 1. If the CARGO_MANIFEST_DIR environment variable is set, use it.
/// 2. If the FRINGES_ROOT_DIR environment variable is set, use it.
/// 3. If the "config" subdirectory is found in the executable directory or any of its parents, use it.
fn retrieve_project_root() -> Result<PathBuf> {
    if let Ok(manifest_dir) = env::var("CARGO_MANIFEST_DIR") {
        // When running through cargo (e.g. cargo run, cargo test)
        return Ok(PathBuf::from(manifest_dir));
    }
    if let Ok(path) = env::var(ROOT_DIR_VAR) {
        return Ok(PathBuf::from(path));
    }

    // Walk upward from the executable to the nearest directory with a "config" subdirectory
    let exe_path = env::current_exe().context("Failed to get current executable path")?;
    exe_path
        .ancestors()
        .skip(1)
        .find(|dir| dir.join("config").is_dir())
        .map(|dir| dir.to_path_buf())
        .ok_or_else(|| {
            anyhow!(
                "Could not find project root directory. Set {} to the directory containing config/",
                ROOT_DIR_VAR
            )
        })
}

pub fn validate_config(config: &Settings) -> Result<()> {
    config.params.validate()?;
    if !(config.curve_step > 0.0 && config.curve_step.is_finite()) {
        return Err(anyhow!(
            "Curve step must be greater than 0, got {}",
            config.curve_step
        ));
    }
    if !config.r_max.is_finite() {
        return Err(anyhow!("Radial range must be finite, got {}", config.r_max));
    }
    config.controls.validate()?;
    Ok(())
}

#[derive(Parser, Debug, Default)]
#[command(version, about = "Newton's rings: thin-film interference brightness and ring images")]
pub struct CliArgs {
    /// Gap (film) thickness, in the same units as the wavelength.
    #[arg(long)]
    pub thickness: Option<f64>,

    /// Refractive index of the entry medium.
    #[arg(long)]
    pub n1: Option<f64>,

    /// Refractive index of the gap.
    #[arg(long)]
    pub n2: Option<f64>,

    /// Refractive index of the substrate.
    #[arg(long)]
    pub n3: Option<f64>,

    /// Wavelength, in the same units as the gap thickness.
    #[arg(short, long)]
    pub wavelength: Option<f64>,

    /// Focal length. A non-positive value gives a dark image.
    #[arg(short, long, allow_negative_numbers = true)]
    pub focal: Option<f64>,

    /// Brightness model.
    #[arg(long, value_enum)]
    pub model: Option<Model>,

    /// Upper end of the radial axis. Values below 0.1 are raised to 0.1.
    #[arg(long, allow_negative_numbers = true)]
    pub r_max: Option<f64>,

    /// Radial spacing of the brightness curve.
    #[arg(long)]
    pub step: Option<f64>,

    /// Ring image width in pixels.
    #[arg(long)]
    pub width: Option<usize>,

    /// Ring image height in pixels.
    #[arg(long)]
    pub height: Option<usize>,

    /// Directory to write output files to.
    #[arg(short, long)]
    pub output: Option<String>,

    /// Rasterize the ring image on all cores.
    #[arg(long)]
    pub parallel: bool,

    /// Open the interactive viewer instead of writing files.
    #[arg(long)]
    pub view: bool,
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Settings:
  - Model: {}
  - Gap Thickness: {:.6}
  - Refractive Indices: {:.6} / {:.6} / {:.6}
  - Wavelength: {:.6}
  - Focal Length: {:.6}
  - Radial Range: 0 - {:.6}
  - Curve Step: {:.6}
  - Image Size: {} x {}
  ",
            self.model,
            self.params.gap_thickness,
            self.params.n1,
            self.params.n2,
            self.params.n3,
            self.params.wavelength,
            self.params.focal_length,
            self.r_max,
            self.curve_step,
            self.width,
            self.height,
        )
    }
}
