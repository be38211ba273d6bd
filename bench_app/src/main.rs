//! Lattice benchmark application
//!
//! Parses the command line, runs one benchmark and exports the results.
//! Failures are reported to the user and the process still exits with 0.
//!
//! ```text
//! lattice_bench_app -n 20 -p 1.5 -s 30 --record-fps --record-frame-time
//! ```

use anyhow::Result;
use clap::Parser;

use lattice_bench::bench::BenchmarkOutcome;
use lattice_bench::config::{CliArgs, RunConfiguration};
use lattice_bench::foundation::logging;
use lattice_bench::foundation::time::SystemClock;
use lattice_bench::platform::{HeadlessPlatform, NullGraphics, Platform};
use lattice_bench::BenchmarkEngine;

const WINDOW_TITLE: &str = "Lattice Bench";
const ERROR_TITLE: &str = "Error!";

fn main() {
    logging::init();

    if let Err(e) = try_main() {
        log::error!("{:#}", e);
    }

    log::info!("Benchmark application exiting");
}

fn try_main() -> Result<()> {
    let args = match CliArgs::try_parse() {
        Ok(args) => args,
        Err(e) => {
            // --help and --version land here too
            e.print()?;
            return Ok(());
        }
    };
    let config = args.into_run_configuration()?;

    if config.time_limit().is_none() && config.sample_limit().is_none() {
        log::warn!("No time or sample limit set; the run ends only on quit");
    }

    if config.headless {
        let mut platform = HeadlessPlatform::new(config.window_width, config.window_height);
        run_on(&mut platform, config);
        return Ok(());
    }

    run_windowed(config)
}

#[cfg(feature = "windowed")]
fn run_windowed(config: RunConfiguration) -> Result<()> {
    use lattice_bench::platform::GlfwPlatform;

    // No window to report into yet; try_main logs this failure
    let mut platform = GlfwPlatform::new(WINDOW_TITLE, config.window_width, config.window_height)?;
    run_on(&mut platform, config);
    Ok(())
}

#[cfg(not(feature = "windowed"))]
fn run_windowed(config: RunConfiguration) -> Result<()> {
    log::warn!("Built without the windowed feature; running \"{}\" headless", WINDOW_TITLE);
    let mut platform = HeadlessPlatform::new(config.window_width, config.window_height);
    run_on(&mut platform, config);
    Ok(())
}

/// Run, export and report; errors go to the platform's error dialog
fn run_on<P: Platform>(platform: &mut P, config: RunConfiguration) {
    let result = BenchmarkEngine::new(config).and_then(|engine| {
        let outcome = engine.run(platform, NullGraphics::new(), &SystemClock::new())?;
        Ok((engine, outcome))
    });

    match result {
        Ok((engine, outcome)) => {
            log_summary(&outcome);
            let report = engine.export(&outcome);
            if !report.is_complete() {
                log::warn!("{} of the enabled artifacts could not be written", report.failures.len());
            }
        }
        Err(e) => platform.show_error(ERROR_TITLE, &e.to_string()),
    }
}

fn log_summary(outcome: &BenchmarkOutcome) {
    log::info!(
        "Run finished ({:?}): {} frames in {:.3}s",
        outcome.stop_reason,
        outcome.frames_rendered,
        outcome.run_time.as_secs_f64()
    );
    if let Some(fps) = outcome.samples.mean_fps() {
        log::info!("Mean FPS: {:.1} over {} intervals", fps, outcome.samples.fps().len());
    }
    if let Some(ms) = outcome.samples.mean_frame_time_ms() {
        log::info!(
            "Mean frame time: {:.3}ms over {} samples",
            ms,
            outcome.samples.frame_time_count()
        );
    }
}
