//! Benchmark runtime
//!
//! - [`harness`]: the render loop, its budgets and interval reports
//! - [`samples`]: FPS and frame-time buffers
//! - [`session`]: asset loading and scoped graphics resources
//! - [`export`]: CSV artifacts written after the run

pub mod export;
pub mod harness;
pub mod samples;
pub mod session;

pub use export::{Artifact, ExportError, ExportReport, ResultExporter};
pub use harness::{
    BenchmarkHarness, BenchmarkOutcome, HarnessState, IntervalReport, RecordingOptions, RunBudget, StopReason,
    REPORT_INTERVAL,
};
pub use samples::SampleBuffers;
pub use session::{GraphicsSession, SceneAssets};
