//! Run configuration

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{CliArgs, Config, ConfigError};

/// How frame-duration samples are taken
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum FrameTimeSampling {
    /// One sample per reporting interval: the duration of the most recent frame
    #[default]
    PerInterval,
    /// One sample per rendered frame
    PerFrame,
}

impl FrameTimeSampling {
    /// Name used in exported configuration
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::PerInterval => "per_interval",
            Self::PerFrame => "per_frame",
        }
    }
}

/// # Run Configuration
///
/// Everything one benchmark run needs to know, fixed before the scene is
/// built. Constructed once at startup and handed by reference to the scene
/// builder, the harness and the exporter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfiguration {
    /// Objects per lattice axis (N); the scene holds N³ objects
    pub cube_dimension: u32,
    /// Gap between neighbouring objects, in object sizes
    pub cube_padding: f32,
    /// Run-time limit in seconds, 0 = unlimited
    pub seconds: f64,
    /// Frame-time sample limit, 0 = unlimited
    pub data_count: u32,
    /// Write the configuration artifact at shutdown
    pub export_conf: bool,
    /// Record and write the FPS series
    pub record_fps: bool,
    /// Record and write the frame-time series
    pub record_frame_time: bool,
    /// Frame-time sampling policy
    pub frame_time_sampling: FrameTimeSampling,
    /// Record the previous interval's FPS instead of the current one
    pub lagged_fps: bool,
    /// Render target width in pixels
    pub window_width: u32,
    /// Render target height in pixels
    pub window_height: u32,
    /// Directory the result artifacts are written to
    pub output_dir: PathBuf,
    /// Optional PNG used as the cube texture
    pub texture_path: Option<PathBuf>,
    /// Optional directory holding `shader.vert` and `shader.frag`
    pub shader_dir: Option<PathBuf>,
    /// Run without a window even when one is available
    pub headless: bool,
}

impl Default for RunConfiguration {
    fn default() -> Self {
        Self {
            cube_dimension: 10,
            cube_padding: 0.5,
            seconds: 0.0,
            data_count: 0,
            export_conf: false,
            record_fps: false,
            record_frame_time: false,
            frame_time_sampling: FrameTimeSampling::default(),
            lagged_fps: false,
            window_width: 800,
            window_height: 600,
            output_dir: PathBuf::from("."),
            texture_path: None,
            shader_dir: None,
            headless: false,
        }
    }
}

impl Config for RunConfiguration {}

impl RunConfiguration {
    /// Parse a flat command-line style string, e.g.
    /// `"--cube-dimension 20 --cube-padding 1.5 --seconds 30 --record-fps"`
    pub fn from_arg_string(args: &str) -> Result<Self, ConfigError> {
        CliArgs::parse_arg_string(args)?.into_run_configuration()
    }

    /// Check the invariants every consumer relies on
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cube_dimension == 0 {
            return Err(invalid("cube_dimension", "must be at least 1"));
        }
        if !self.cube_padding.is_finite() || self.cube_padding < 0.0 {
            return Err(invalid("cube_padding", format!("must be a finite value >= 0, got {}", self.cube_padding)));
        }
        if !self.seconds.is_finite() || self.seconds < 0.0 {
            return Err(invalid("seconds", format!("must be a finite value >= 0, got {}", self.seconds)));
        }
        if Duration::try_from_secs_f64(self.seconds).is_err() {
            return Err(invalid("seconds", format!("{} is too large for a run-time limit", self.seconds)));
        }
        if self.window_width == 0 || self.window_height == 0 {
            return Err(invalid(
                "window size",
                format!("must be non-zero, got {}x{}", self.window_width, self.window_height),
            ));
        }
        Ok(())
    }

    /// Wall-clock budget, `None` when unlimited
    pub fn time_limit(&self) -> Option<Duration> {
        // Unrepresentable values are rejected by `validate`
        (self.seconds > 0.0)
            .then(|| Duration::try_from_secs_f64(self.seconds).ok())
            .flatten()
    }

    /// Frame-time sample budget, `None` when unlimited
    pub fn sample_limit(&self) -> Option<usize> {
        (self.data_count > 0).then_some(self.data_count as usize)
    }

    /// Width over height of the render target
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }

    /// Ordered key/value pairs written by the configuration export
    pub fn to_key_values(&self) -> Vec<(&'static str, String)> {
        let optional_path = |path: &Option<PathBuf>| {
            path.as_ref().map_or_else(|| "none".to_string(), |p| p.display().to_string())
        };

        vec![
            ("cube_dimension", self.cube_dimension.to_string()),
            ("cube_padding", self.cube_padding.to_string()),
            ("object_count", (u64::from(self.cube_dimension).pow(3)).to_string()),
            ("seconds", self.seconds.to_string()),
            ("data_count", self.data_count.to_string()),
            ("export_conf", self.export_conf.to_string()),
            ("record_fps", self.record_fps.to_string()),
            ("record_frame_time", self.record_frame_time.to_string()),
            ("frame_time_sampling", self.frame_time_sampling.as_str().to_string()),
            ("lagged_fps", self.lagged_fps.to_string()),
            ("window_width", self.window_width.to_string()),
            ("window_height", self.window_height.to_string()),
            ("texture_path", optional_path(&self.texture_path)),
            ("shader_dir", optional_path(&self.shader_dir)),
        ]
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}
