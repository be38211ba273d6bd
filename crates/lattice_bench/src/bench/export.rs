//! # Result Export
//!
//! Writes the enabled artifacts of a finished run as small CSV files:
//!
//! | Artifact      | File                       | Header             |
//! |---------------|----------------------------|--------------------|
//! | configuration | `conf_<stamp>.csv`         | `parameter;value`  |
//! | FPS series    | `fps_<stamp>.csv`          | `FPS`              |
//! | frame times   | `frameTime_<stamp>.csv`    | `frametime (ms)`   |
//!
//! `<stamp>` is local wall-clock time formatted `YYYYMMDDHHMMSS`. Files are
//! opened in append mode, so a rerun within the same second appends a
//! second header and body to the existing file. Every enabled artifact is
//! attempted; a failure is reported and never retried.

use std::fs::OpenOptions;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDateTime};
use thiserror::Error;

use crate::bench::SampleBuffers;
use crate::config::RunConfiguration;

/// Second-precision stamp embedded in every file name
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Separator between key and value in the configuration artifact
pub const DELIMITER: char = ';';

/// One exported file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// Run parameters
    Configuration,
    /// FPS series
    Fps,
    /// Frame-time series
    FrameTime,
}

impl Artifact {
    /// File name prefix
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Configuration => "conf",
            Self::Fps => "fps",
            Self::FrameTime => "frameTime",
        }
    }

    /// Single header line
    pub const fn header(self) -> &'static str {
        match self {
            Self::Configuration => "parameter;value",
            Self::Fps => "FPS",
            Self::FrameTime => "frametime (ms)",
        }
    }

    /// `<prefix>_<stamp>.csv`
    pub fn file_name(self, stamp: &str) -> String {
        format!("{}_{}.csv", self.prefix(), stamp)
    }

    fn enabled(self, config: &RunConfiguration) -> bool {
        match self {
            Self::Configuration => config.export_conf,
            Self::Fps => config.record_fps,
            Self::FrameTime => config.record_frame_time,
        }
    }

    fn lines(self, config: &RunConfiguration, samples: &SampleBuffers) -> Vec<String> {
        match self {
            Self::Configuration => config
                .to_key_values()
                .into_iter()
                .map(|(key, value)| format!("{}{}{}", key, DELIMITER, value))
                .collect(),
            Self::Fps => samples.fps().iter().map(u32::to_string).collect(),
            Self::FrameTime => samples.frame_times_ms().iter().map(f64::to_string).collect(),
        }
    }
}

/// Failure to write one artifact
#[derive(Error, Debug)]
pub enum ExportError {
    /// Open or write failed
    #[error("Failed to write {path}: {source}")]
    Write {
        /// Destination file
        path: PathBuf,
        /// Underlying I/O error
        source: io::Error,
    },
}

/// What an export attempt produced
#[derive(Debug, Default)]
pub struct ExportReport {
    /// Files written (or appended to)
    pub written: Vec<PathBuf>,
    /// Artifacts that could not be written
    pub failures: Vec<ExportError>,
}

impl ExportReport {
    /// Whether every enabled artifact was written
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes run results into a directory
#[derive(Debug, Clone)]
pub struct ResultExporter {
    output_dir: PathBuf,
}

impl ResultExporter {
    /// Export into `output_dir`
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// Export into the configured output directory
    pub fn from_config(config: &RunConfiguration) -> Self {
        Self::new(&config.output_dir)
    }

    /// Destination directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Export stamped with the current local time
    pub fn export(&self, config: &RunConfiguration, samples: &SampleBuffers) -> ExportReport {
        self.export_at(config, samples, Local::now().naive_local())
    }

    /// Export stamped with `time`
    pub fn export_at(&self, config: &RunConfiguration, samples: &SampleBuffers, time: NaiveDateTime) -> ExportReport {
        let stamp = time.format(TIMESTAMP_FORMAT).to_string();
        let mut report = ExportReport::default();

        let artifacts: Vec<Artifact> = [Artifact::Configuration, Artifact::Fps, Artifact::FrameTime]
            .into_iter()
            .filter(|artifact| artifact.enabled(config))
            .collect();
        if artifacts.is_empty() {
            log::debug!("No export flags set; nothing written");
            return report;
        }

        // Open failures below report the real problem
        if let Err(e) = std::fs::create_dir_all(&self.output_dir) {
            log::debug!("Could not create {}: {}", self.output_dir.display(), e);
        }

        for artifact in artifacts {
            let path = self.output_dir.join(artifact.file_name(&stamp));
            match append_lines(&path, artifact.header(), &artifact.lines(config, samples)) {
                Ok(()) => {
                    log::info!("Exported {:?} to {}", artifact, path.display());
                    report.written.push(path);
                }
                Err(source) => {
                    log::warn!("Failed to export {:?} to {}: {}", artifact, path.display(), source);
                    report.failures.push(ExportError::Write { path, source });
                }
            }
        }

        report
    }
}

fn append_lines(path: &Path, header: &str, lines: &[String]) -> io::Result<()> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut writer = BufWriter::new(file);

    writeln!(writer, "{}", header)?;
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lattice_bench_export_{}_{}", name, std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        dir
    }

    fn stamp_time() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(14, 5, 7)
            .unwrap()
    }

    fn all_enabled() -> RunConfiguration {
        RunConfiguration {
            cube_dimension: 2,
            export_conf: true,
            record_fps: true,
            record_frame_time: true,
            ..Default::default()
        }
    }

    fn samples() -> SampleBuffers {
        let mut samples = SampleBuffers::new();
        samples.push_fps(120);
        samples.push_fps(118);
        samples.push_frame_time(8.25);
        samples.push_frame_time(8.5);
        samples.push_frame_time(9.0);
        samples
    }

    #[test]
    fn test_writes_three_stamped_files() {
        let dir = temp_dir("all");
        let report = ResultExporter::new(&dir).export_at(&all_enabled(), &samples(), stamp_time());

        assert!(report.is_complete());
        assert_eq!(report.written.len(), 3);

        let fps = std::fs::read_to_string(dir.join("fps_20240309140507.csv")).unwrap();
        assert_eq!(fps, "FPS\n120\n118\n");

        let frame_time = std::fs::read_to_string(dir.join("frameTime_20240309140507.csv")).unwrap();
        assert_eq!(frame_time, "frametime (ms)\n8.25\n8.5\n9\n");

        let conf = std::fs::read_to_string(dir.join("conf_20240309140507.csv")).unwrap();
        let mut lines = conf.lines();
        assert_eq!(lines.next(), Some("parameter;value"));
        assert_eq!(lines.next(), Some("cube_dimension;2"));
        assert!(conf.contains("object_count;8\n"));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_same_second_rerun_appends() {
        let dir = temp_dir("append");
        let exporter = ResultExporter::new(&dir);
        let config = RunConfiguration {
            record_fps: true,
            ..Default::default()
        };

        exporter.export_at(&config, &samples(), stamp_time());
        exporter.export_at(&config, &samples(), stamp_time());

        let fps = std::fs::read_to_string(dir.join("fps_20240309140507.csv")).unwrap();
        assert_eq!(fps, "FPS\n120\n118\nFPS\n120\n118\n");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_disabled_flags_write_nothing() {
        let dir = temp_dir("none");
        let report = ResultExporter::new(&dir).export_at(&RunConfiguration::default(), &samples(), stamp_time());

        assert!(report.written.is_empty());
        assert!(report.is_complete());
        assert!(!dir.exists());
    }

    #[test]
    fn test_empty_series_still_gets_header() {
        let dir = temp_dir("empty");
        let config = RunConfiguration {
            record_frame_time: true,
            ..Default::default()
        };
        ResultExporter::new(&dir).export_at(&config, &SampleBuffers::new(), stamp_time());

        let frame_time = std::fs::read_to_string(dir.join("frameTime_20240309140507.csv")).unwrap();
        assert_eq!(frame_time, "frametime (ms)\n");
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_unwritable_destination_reports_each_failure() {
        let dir = temp_dir("blocked");
        std::fs::create_dir_all(&dir).unwrap();
        let blocker = dir.join("not_a_dir");
        std::fs::write(&blocker, "occupied").unwrap();

        let report = ResultExporter::new(&blocker).export_at(&all_enabled(), &samples(), stamp_time());

        assert!(report.written.is_empty());
        assert_eq!(report.failures.len(), 3);
        std::fs::remove_dir_all(&dir).ok();
    }
}
