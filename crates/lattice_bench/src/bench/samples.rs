//! Sample buffers filled by the harness

/// FPS and frame-time series of one run
///
/// Append-only while the loop runs; samples are strictly time-ordered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SampleBuffers {
    fps: Vec<u32>,
    frame_times_ms: Vec<f64>,
}

impl SampleBuffers {
    /// Empty buffers
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one reporting interval's frame count
    pub fn push_fps(&mut self, frames: u32) {
        self.fps.push(frames);
    }

    /// Append one frame duration in milliseconds
    pub fn push_frame_time(&mut self, millis: f64) {
        self.frame_times_ms.push(millis);
    }

    /// FPS series, one entry per reporting interval
    pub fn fps(&self) -> &[u32] {
        &self.fps
    }

    /// Frame-time series in milliseconds
    pub fn frame_times_ms(&self) -> &[f64] {
        &self.frame_times_ms
    }

    /// Frame-time samples recorded so far; this is what a sample budget counts
    pub fn frame_time_count(&self) -> usize {
        self.frame_times_ms.len()
    }

    /// Mean of the FPS series
    pub fn mean_fps(&self) -> Option<f64> {
        mean(self.fps.iter().map(|&f| f64::from(f)), self.fps.len())
    }

    /// Mean of the frame-time series
    pub fn mean_frame_time_ms(&self) -> Option<f64> {
        mean(self.frame_times_ms.iter().copied(), self.frame_times_ms.len())
    }
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> Option<f64> {
    (count > 0).then(|| values.sum::<f64>() / count as f64)
}
