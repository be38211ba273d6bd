//! Command-line parsing for the run configuration

use std::path::PathBuf;

use clap::Parser;

use super::{Config, ConfigError, FrameTimeSampling, RunConfiguration};

/// Command-line options
///
/// Every option is optional. Options that are given override the base
/// configuration, which is either the defaults or the file named by `--config`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "lattice_bench_app",
    about = "Renders an N x N x N lattice of cubes as fast as possible and records FPS and frame times"
)]
pub struct CliArgs {
    /// Base configuration file (.toml or .ron)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Objects per lattice axis
    #[arg(short = 'n', long, value_name = "N")]
    pub cube_dimension: Option<u32>,

    /// Gap between neighbouring objects, in object sizes
    #[arg(short = 'p', long, value_name = "FACTOR")]
    pub cube_padding: Option<f32>,

    /// Run-time limit in seconds (0 = unlimited)
    #[arg(short = 's', long, value_name = "SECONDS")]
    pub seconds: Option<f64>,

    /// Frame-time sample limit (0 = unlimited)
    #[arg(short = 'c', long, value_name = "COUNT")]
    pub data_count: Option<u32>,

    /// Write the configuration artifact
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub export_conf: Option<bool>,

    /// Record and write the FPS series
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub record_fps: Option<bool>,

    /// Record and write the frame-time series
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub record_frame_time: Option<bool>,

    /// Frame-time sampling policy
    #[arg(long, value_enum, value_name = "POLICY")]
    pub frame_time_sampling: Option<FrameTimeSampling>,

    /// Record the previous interval's FPS instead of the current one
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub lagged_fps: Option<bool>,

    /// Render target width in pixels
    #[arg(long, value_name = "PIXELS")]
    pub width: Option<u32>,

    /// Render target height in pixels
    #[arg(long, value_name = "PIXELS")]
    pub height: Option<u32>,

    /// Directory for result artifacts
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// PNG used as the cube texture
    #[arg(long, value_name = "FILE")]
    pub texture: Option<PathBuf>,

    /// Directory holding shader.vert and shader.frag
    #[arg(long, value_name = "DIR")]
    pub shader_dir: Option<PathBuf>,

    /// Run without a window
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub headless: Option<bool>,
}

impl CliArgs {
    /// Parse a single whitespace-separated argument string
    pub fn parse_arg_string(args: &str) -> Result<Self, ConfigError> {
        let argv = std::iter::once("lattice_bench_app").chain(args.split_whitespace());
        Self::try_parse_from(argv).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Resolve the base configuration, apply overrides and validate
    pub fn into_run_configuration(self) -> Result<RunConfiguration, ConfigError> {
        let mut config = match &self.config {
            Some(path) => {
                log::info!("Loading run configuration from {}", path.display());
                RunConfiguration::load_from_file(path)?
            }
            None => RunConfiguration::default(),
        };

        self.apply_to(&mut config);
        config.validate()?;
        Ok(config)
    }

    fn apply_to(self, config: &mut RunConfiguration) {
        fn set<T>(slot: &mut T, value: Option<T>) {
            if let Some(value) = value {
                *slot = value;
            }
        }

        set(&mut config.cube_dimension, self.cube_dimension);
        set(&mut config.cube_padding, self.cube_padding);
        set(&mut config.seconds, self.seconds);
        set(&mut config.data_count, self.data_count);
        set(&mut config.export_conf, self.export_conf);
        set(&mut config.record_fps, self.record_fps);
        set(&mut config.record_frame_time, self.record_frame_time);
        set(&mut config.frame_time_sampling, self.frame_time_sampling);
        set(&mut config.lagged_fps, self.lagged_fps);
        set(&mut config.window_width, self.width);
        set(&mut config.window_height, self.height);
        set(&mut config.output_dir, self.output_dir);
        set(&mut config.headless, self.headless);

        if self.texture.is_some() {
            config.texture_path = self.texture;
        }
        if self.shader_dir.is_some() {
            config.shader_dir = self.shader_dir;
        }
    }
}
