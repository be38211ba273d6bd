//! # Benchmark Harness
//!
//! Drives the render loop and samples its timing.
//!
//! ## Loop
//!
//! Each iteration either consumes exactly one pending platform event or,
//! when none is pending, renders one frame. A quit event stops the loop.
//! After every iteration the run budget is checked: the loop continues
//! while neither the time budget nor the sample budget is exhausted, and an
//! unset budget never exhausts.
//!
//! ## Reporting
//!
//! Before rendering a frame, if at least [`REPORT_INTERVAL`] has passed
//! since the interval started, the interval is closed: the status title is
//! updated, one FPS sample is appended, and (with per-interval sampling)
//! the duration of the most recent frame is appended as a frame-time sample.

use std::fmt;
use std::time::Duration;

use crate::bench::SampleBuffers;
use crate::config::{FrameTimeSampling, RunConfiguration};
use crate::foundation::math::{Mat4, Mat4Ext};
use crate::foundation::time::{as_millis_f64, FrameClock};
use crate::platform::{GraphicsBackend, Platform, PlatformEvent};
use crate::render::Scene;

/// Length of one reporting interval
pub const REPORT_INTERVAL: Duration = Duration::from_secs(1);

/// Why the loop ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The platform delivered a quit event
    QuitSignal,
    /// The configured run time elapsed
    TimeBudget,
    /// The configured number of frame-time samples was recorded
    SampleBudget,
}

/// Harness state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarnessState {
    /// Pumping events and rendering frames
    Running,
    /// Loop finished
    Stopped(StopReason),
}

/// Optional limits on a run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunBudget {
    /// Wall-clock limit
    pub time_limit: Option<Duration>,
    /// Frame-time sample limit
    pub sample_limit: Option<usize>,
}

impl RunBudget {
    /// No limits: only a quit event ends the run
    pub const fn unlimited() -> Self {
        Self {
            time_limit: None,
            sample_limit: None,
        }
    }

    /// Budgets from the configuration, where 0 means unlimited
    pub fn from_config(config: &RunConfiguration) -> Self {
        Self {
            time_limit: config.time_limit(),
            sample_limit: config.sample_limit(),
        }
    }

    /// The first exhausted budget, if any
    pub fn exhausted(&self, elapsed: Duration, samples: usize) -> Option<StopReason> {
        if self.time_limit.is_some_and(|limit| elapsed >= limit) {
            return Some(StopReason::TimeBudget);
        }
        if self.sample_limit.is_some_and(|limit| samples >= limit) {
            return Some(StopReason::SampleBudget);
        }
        None
    }
}

/// Which samples the harness records
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecordingOptions {
    /// Append one FPS sample per interval
    pub record_fps: bool,
    /// Append frame-time samples
    pub record_frame_time: bool,
    /// When frame-time samples are taken
    pub sampling: FrameTimeSampling,
    /// Record the previous interval's frame count instead of the current one
    pub lagged_fps: bool,
}

impl RecordingOptions {
    /// Recording flags from the configuration
    pub fn from_config(config: &RunConfiguration) -> Self {
        Self {
            record_fps: config.record_fps,
            record_frame_time: config.record_frame_time,
            sampling: config.frame_time_sampling,
            lagged_fps: config.lagged_fps,
        }
    }
}

/// Statistics of one closed reporting interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntervalReport {
    /// Frames rendered in the interval
    pub frames: u32,
    /// Interval length
    pub elapsed: Duration,
    /// Duration of the most recent frame
    pub last_frame: Duration,
}

impl IntervalReport {
    /// Interval length divided by frames rendered (0 when nothing rendered)
    pub fn average_frame_ms(&self) -> f64 {
        if self.frames == 0 {
            0.0
        } else {
            as_millis_f64(self.elapsed) / f64::from(self.frames)
        }
    }

    /// Most recent frame's duration in milliseconds
    pub fn last_frame_ms(&self) -> f64 {
        as_millis_f64(self.last_frame)
    }
}

impl fmt::Display for IntervalReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FPS: {} --- Avg. Frame Time: {:.3}ms --- Last Frame Time: {:.3}ms",
            self.frames,
            self.average_frame_ms(),
            self.last_frame_ms()
        )
    }
}

/// Result of a finished run
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkOutcome {
    /// Recorded samples
    pub samples: SampleBuffers,
    /// Why the loop ended
    pub stop_reason: StopReason,
    /// Frames rendered over the whole run
    pub frames_rendered: u64,
    /// Time from loop start to stop
    pub run_time: Duration,
}

/// Render loop driver
///
/// Borrows the scene read-only for the whole run; the view-projection
/// matrix is computed once up front since the camera never moves.
pub struct BenchmarkHarness<'s> {
    scene: &'s Scene,
    view_projection: Mat4,
    index_count: u32,
    budget: RunBudget,
    recording: RecordingOptions,
    samples: SampleBuffers,
    state: HarnessState,
    interval_start: Duration,
    frames_this_interval: u32,
    previous_interval_frames: u32,
    frames_rendered: u64,
    last_frame: Duration,
}

impl<'s> BenchmarkHarness<'s> {
    /// Create a harness for `scene` drawn at `aspect_ratio`
    pub fn new(
        scene: &'s Scene,
        aspect_ratio: f32,
        index_count: u32,
        budget: RunBudget,
        recording: RecordingOptions,
    ) -> Self {
        Self {
            scene,
            view_projection: scene.camera().view_projection_matrix(aspect_ratio),
            index_count,
            budget,
            recording,
            samples: SampleBuffers::new(),
            state: HarnessState::Running,
            interval_start: Duration::ZERO,
            frames_this_interval: 0,
            previous_interval_frames: 0,
            frames_rendered: 0,
            last_frame: Duration::ZERO,
        }
    }

    /// Create a harness with budget and recording flags from `config`
    pub fn from_config(scene: &'s Scene, config: &RunConfiguration, aspect_ratio: f32, index_count: u32) -> Self {
        let budget = RunBudget::from_config(config);
        let recording = RecordingOptions::from_config(config);

        if budget.sample_limit.is_some() && !recording.record_frame_time {
            log::warn!("Sample limit set but frame-time recording is off; the sample budget can never be reached");
        }

        Self::new(scene, aspect_ratio, index_count, budget, recording)
    }

    /// Current state
    pub const fn state(&self) -> HarnessState {
        self.state
    }

    /// Samples recorded so far
    pub const fn samples(&self) -> &SampleBuffers {
        &self.samples
    }

    /// Run until a quit event or an exhausted budget
    pub fn run<P, G, C>(mut self, platform: &mut P, graphics: &mut G, clock: &C) -> BenchmarkOutcome
    where
        P: Platform,
        G: GraphicsBackend,
        C: FrameClock,
    {
        let start = clock.now();
        self.interval_start = start;

        log::info!(
            "Benchmark loop started: {} objects, time limit {:?}, sample limit {:?}",
            self.scene.render_objects().len(),
            self.budget.time_limit,
            self.budget.sample_limit
        );

        let stop_reason = loop {
            if let Some(reason) = self.iterate(platform, graphics, clock) {
                break reason;
            }
            let elapsed = clock.now().saturating_sub(start);
            if let Some(reason) = self.budget.exhausted(elapsed, self.samples.frame_time_count()) {
                break reason;
            }
        };

        self.state = HarnessState::Stopped(stop_reason);
        let run_time = clock.now().saturating_sub(start);

        log::info!(
            "Benchmark loop stopped ({:?}) after {:.3}s: {} frames, {} FPS samples, {} frame-time samples",
            stop_reason,
            run_time.as_secs_f64(),
            self.frames_rendered,
            self.samples.fps().len(),
            self.samples.frame_time_count()
        );

        BenchmarkOutcome {
            samples: self.samples,
            stop_reason,
            frames_rendered: self.frames_rendered,
            run_time,
        }
    }

    /// One loop iteration: handle one event or render one frame
    fn iterate<P, G, C>(&mut self, platform: &mut P, graphics: &mut G, clock: &C) -> Option<StopReason>
    where
        P: Platform,
        G: GraphicsBackend,
        C: FrameClock,
    {
        match platform.poll_event() {
            Some(PlatformEvent::Quit) => return Some(StopReason::QuitSignal),
            Some(event) => log::trace!("Platform event: {:?}", event),
            None => {
                let frame_start = clock.now();
                let since_report = frame_start.saturating_sub(self.interval_start);
                if since_report >= REPORT_INTERVAL {
                    self.close_interval(platform, since_report);
                    self.interval_start = frame_start;
                }

                self.render_frame(platform, graphics);
                self.last_frame = clock.now().saturating_sub(frame_start);

                if self.recording.record_frame_time && self.recording.sampling == FrameTimeSampling::PerFrame {
                    self.samples.push_frame_time(as_millis_f64(self.last_frame));
                }
            }
        }
        None
    }

    fn close_interval<P: Platform>(&mut self, platform: &mut P, elapsed: Duration) {
        let report = IntervalReport {
            frames: self.frames_this_interval,
            elapsed,
            last_frame: self.last_frame,
        };
        platform.set_title(&report.to_string());

        if self.recording.record_fps {
            let fps = if self.recording.lagged_fps {
                self.previous_interval_frames
            } else {
                report.frames
            };
            self.samples.push_fps(fps);
        }

        self.previous_interval_frames = report.frames;
        self.frames_this_interval = 0;

        if self.recording.record_frame_time && self.recording.sampling == FrameTimeSampling::PerInterval {
            self.samples.push_frame_time(report.last_frame_ms());
        }
    }

    fn render_frame<P: Platform, G: GraphicsBackend>(&mut self, platform: &mut P, graphics: &mut G) {
        graphics.begin_frame(&self.view_projection);
        for object in self.scene.render_objects() {
            graphics.draw_indexed(&Mat4::translation(object.position()), self.index_count);
        }
        graphics.end_frame();
        platform.swap_buffers();

        self.frames_this_interval += 1;
        self.frames_rendered += 1;
    }
}
