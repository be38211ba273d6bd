//! # Lattice Bench
//!
//! A rendering micro-benchmark: draws an N×N×N lattice of textured cubes as
//! fast as possible and measures how long it takes.
//!
//! ## Features
//!
//! - **Auto-framed scene**: the lattice is centred on the origin and the
//!   camera is placed so the whole grid fills the vertical field of view
//! - **Timing harness**: FPS per one-second interval and frame-time samples,
//!   bounded by an optional time and sample budget
//! - **CSV export**: timestamped configuration, FPS and frame-time files
//! - **Pluggable platform**: headless by default, GLFW window behind the
//!   `windowed` feature
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use lattice_bench::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RunConfiguration::from_arg_string("--cube-dimension 20 --seconds 10 --record-fps")?;
//!     let engine = BenchmarkEngine::new(config)?;
//!
//!     let mut platform = HeadlessPlatform::new(800, 600);
//!     let outcome = engine.run(&mut platform, NullGraphics::new(), &SystemClock::new())?;
//!     engine.export(&outcome);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::cast_precision_loss)]

pub mod foundation;
pub mod config;
pub mod render;
pub mod platform;
pub mod bench;

mod engine;

pub use engine::{BenchmarkEngine, EngineError};

/// Common imports for benchmark users
pub mod prelude {
    pub use crate::{
        BenchmarkEngine, EngineError,
        bench::{BenchmarkOutcome, ExportReport, SampleBuffers, StopReason},
        config::{CliArgs, Config, FrameTimeSampling, RunConfiguration},
        foundation::time::{FrameClock, ManualClock, SystemClock},
        platform::{GraphicsBackend, HeadlessPlatform, NullGraphics, Platform, PlatformEvent},
        render::{Camera, Lattice, Scene},
    };
}
