//! Benchmark engine: setup, run and export of one configuration

use thiserror::Error;

use crate::bench::{BenchmarkHarness, BenchmarkOutcome, ExportReport, GraphicsSession, ResultExporter, SceneAssets};
use crate::config::{ConfigError, RunConfiguration};
use crate::foundation::time::FrameClock;
use crate::platform::{GraphicsBackend, Platform, PlatformError};
use crate::render::{Camera, Lattice, RenderError, Scene};

/// Coordinates one benchmark run
///
/// Setup failures (assets, shaders, resource upload) abort before the loop
/// starts; graphics resources are released on every path.
#[derive(Debug, Clone)]
pub struct BenchmarkEngine {
    config: RunConfiguration,
    exporter: ResultExporter,
}

impl BenchmarkEngine {
    /// Create an engine for a validated configuration
    pub fn new(config: RunConfiguration) -> Result<Self, EngineError> {
        config.validate()?;
        let exporter = ResultExporter::from_config(&config);
        Ok(Self { config, exporter })
    }

    /// Run configuration
    pub const fn config(&self) -> &RunConfiguration {
        &self.config
    }

    /// Build the scene for `platform`, prepare `graphics` and run the loop
    pub fn run<P, G, C>(&self, platform: &mut P, graphics: G, clock: &C) -> Result<BenchmarkOutcome, EngineError>
    where
        P: Platform,
        G: GraphicsBackend,
        C: FrameClock,
    {
        log::info!("Initializing benchmark...");

        let aspect_ratio = platform.aspect_ratio();
        let lattice = Lattice::new(self.config.cube_dimension, self.config.cube_padding);
        let (scene, framing) = Scene::framed_lattice(Camera::default(), lattice, aspect_ratio);
        log::info!(
            "Camera at z = {:.3}, far plane {:.3}, {} objects",
            framing.camera_z,
            framing.far,
            scene.render_objects().len()
        );

        let assets = SceneAssets::load(&self.config)?;
        let mut session = GraphicsSession::new(graphics);
        let index_count = session.prepare(&assets)?;

        let harness = BenchmarkHarness::from_config(&scene, &self.config, aspect_ratio, index_count);
        Ok(harness.run(platform, session.backend_mut(), clock))
    }

    /// Write the enabled artifacts for `outcome`
    pub fn export(&self, outcome: &BenchmarkOutcome) -> ExportReport {
        self.exporter.export(&self.config, &outcome.samples)
    }
}

/// Engine errors
#[derive(Error, Debug)]
pub enum EngineError {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Asset loading or graphics setup failed
    #[error("Rendering error: {0}")]
    Render(#[from] RenderError),

    /// Window system failure
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::StopReason;
    use crate::foundation::time::SystemClock;
    use crate::platform::{HeadlessPlatform, NullGraphics, PlatformEvent};
    use crate::config::FrameTimeSampling;
    use std::path::PathBuf;

    #[test]
    fn test_invalid_configuration_rejected() {
        let config = RunConfiguration {
            cube_dimension: 0,
            ..Default::default()
        };
        assert!(matches!(BenchmarkEngine::new(config), Err(EngineError::Config(_))));

        let config = RunConfiguration::from_arg_string("--seconds 1e20");
        assert!(matches!(config, Err(ConfigError::Invalid { field: "seconds", .. })));
    }

    #[test]
    fn test_headless_run_collects_per_frame_samples() {
        let config = RunConfiguration {
            cube_dimension: 3,
            data_count: 50,
            record_frame_time: true,
            frame_time_sampling: FrameTimeSampling::PerFrame,
            ..Default::default()
        };
        let engine = BenchmarkEngine::new(config).unwrap();
        let mut platform = HeadlessPlatform::new(800, 600);

        let outcome = engine.run(&mut platform, NullGraphics::new(), &SystemClock::new()).unwrap();

        assert_eq!(outcome.stop_reason, StopReason::SampleBudget);
        assert_eq!(outcome.samples.frame_time_count(), 50);
        assert_eq!(outcome.frames_rendered, 50);
        assert_eq!(platform.presented_frames(), 50);
        assert!(outcome.samples.frame_times_ms().iter().all(|&ms| ms >= 0.0));
    }

    #[test]
    fn test_quit_before_first_frame() {
        let engine = BenchmarkEngine::new(RunConfiguration::default()).unwrap();
        let mut platform = HeadlessPlatform::new(640, 480);
        platform.push_event(PlatformEvent::Quit);

        let outcome = engine.run(&mut platform, NullGraphics::new(), &SystemClock::new()).unwrap();

        assert_eq!(outcome.stop_reason, StopReason::QuitSignal);
        assert_eq!(outcome.frames_rendered, 0);
        assert_eq!(platform.presented_frames(), 0);
    }

    #[test]
    fn test_missing_shader_directory_aborts_setup() {
        let config = RunConfiguration {
            shader_dir: Some(PathBuf::from("no/such/shaders")),
            ..Default::default()
        };
        let engine = BenchmarkEngine::new(config).unwrap();
        let mut platform = HeadlessPlatform::new(800, 600);

        let result = engine.run(&mut platform, NullGraphics::new(), &SystemClock::new());

        assert!(matches!(result, Err(EngineError::Render(RenderError::ShaderLoad { .. }))));
        assert_eq!(platform.presented_frames(), 0);
    }

    #[test]
    fn test_run_then_export() {
        let dir = std::env::temp_dir().join(format!("lattice_bench_engine_{}", std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        let config = RunConfiguration {
            cube_dimension: 2,
            data_count: 5,
            export_conf: true,
            record_frame_time: true,
            frame_time_sampling: FrameTimeSampling::PerFrame,
            output_dir: dir.clone(),
            ..Default::default()
        };
        let engine = BenchmarkEngine::new(config).unwrap();
        let mut platform = HeadlessPlatform::new(800, 600);

        let outcome = engine.run(&mut platform, NullGraphics::new(), &SystemClock::new()).unwrap();
        let report = engine.export(&outcome);

        assert!(report.is_complete());
        assert_eq!(report.written.len(), 2);
        for path in &report.written {
            assert!(path.starts_with(&dir));
            assert!(path.exists());
        }
        std::fs::remove_dir_all(&dir).ok();
    }
}
