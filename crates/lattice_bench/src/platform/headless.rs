//! Headless platform and no-op graphics backend
//!
//! With these the benchmark measures the CPU side of a frame: matrix setup,
//! per-object submission and loop bookkeeping. Tests use them to script
//! events and inspect what was submitted.

use std::collections::VecDeque;

use crate::foundation::math::Mat4;
use crate::platform::{GraphicsBackend, Platform, PlatformEvent};
use crate::render::{Mesh, RenderError, RenderResult, ShaderSources, TextureData};

/// Platform without a window
#[derive(Debug, Clone)]
pub struct HeadlessPlatform {
    width: u32,
    height: u32,
    title: String,
    events: VecDeque<PlatformEvent>,
    presented_frames: u64,
    errors: Vec<String>,
}

impl HeadlessPlatform {
    /// Create a headless render target of the given size
    pub fn new(width: u32, height: u32) -> Self {
        log::info!("Using headless platform ({}x{})", width, height);
        Self {
            width,
            height,
            title: String::new(),
            events: VecDeque::new(),
            presented_frames: 0,
            errors: Vec::new(),
        }
    }

    /// Queue an event for the event pump
    pub fn push_event(&mut self, event: PlatformEvent) {
        self.events.push_back(event);
    }

    /// Most recent title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Frames presented so far
    pub const fn presented_frames(&self) -> u64 {
        self.presented_frames
    }

    /// Errors reported through [`Platform::show_error`]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

impl Platform for HeadlessPlatform {
    fn poll_event(&mut self) -> Option<PlatformEvent> {
        self.events.pop_front()
    }

    fn set_title(&mut self, title: &str) {
        log::info!("{}", title);
        self.title = title.to_string();
    }

    fn width(&self) -> u32 {
        self.width
    }

    fn height(&self) -> u32 {
        self.height
    }

    fn swap_buffers(&mut self) {
        self.presented_frames += 1;
    }

    fn show_error(&mut self, title: &str, message: &str) {
        log::error!("{}: {}", title, message);
        self.errors.push(format!("{}: {}", title, message));
    }
}

/// Submission counters kept by [`NullGraphics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphicsStats {
    /// Frames begun
    pub frames: u64,
    /// Draw calls submitted
    pub draw_calls: u64,
    /// Indices submitted across all draw calls
    pub indices: u64,
}

/// Graphics backend that validates setup and counts submissions
#[derive(Debug, Clone, Default)]
pub struct NullGraphics {
    program_linked: bool,
    mesh_indices: Option<u32>,
    texture_size: Option<(u32, u32)>,
    view_projection: Option<Mat4>,
    last_model: Option<Mat4>,
    in_frame: bool,
    stats: GraphicsStats,
    releases: u32,
}

impl NullGraphics {
    /// Create a backend with no resources
    pub fn new() -> Self {
        Self::default()
    }

    /// Submission counters
    pub const fn stats(&self) -> GraphicsStats {
        self.stats
    }

    /// Whether a program, mesh and texture are all live
    pub const fn is_ready(&self) -> bool {
        self.program_linked && self.mesh_indices.is_some() && self.texture_size.is_some()
    }

    /// View-projection bound by the last `begin_frame`
    pub const fn view_projection(&self) -> Option<&Mat4> {
        self.view_projection.as_ref()
    }

    /// Model matrix of the last draw
    pub const fn last_model(&self) -> Option<&Mat4> {
        self.last_model.as_ref()
    }

    /// How many times `release` ran
    pub const fn releases(&self) -> u32 {
        self.releases
    }
}

impl GraphicsBackend for NullGraphics {
    fn create_program(&mut self, sources: &ShaderSources) -> RenderResult<()> {
        for (stage, source) in [("vertex", &sources.vertex), ("fragment", &sources.fragment)] {
            if !source.contains("main") {
                return Err(RenderError::ShaderCompilation(format!(
                    "{} stage has no entry point",
                    stage
                )));
            }
        }
        self.program_linked = true;
        log::debug!("Shader program linked");
        Ok(())
    }

    fn upload_mesh(&mut self, mesh: &Mesh) -> RenderResult<()> {
        if mesh.indices.is_empty() {
            return Err(RenderError::ResourceCreationFailed("mesh has no indices".to_string()));
        }
        if let Some(bad) = mesh.indices.iter().find(|&&i| i as usize >= mesh.vertices.len()) {
            return Err(RenderError::ResourceCreationFailed(format!(
                "index {} out of range for {} vertices",
                bad,
                mesh.vertices.len()
            )));
        }
        self.mesh_indices = Some(mesh.index_count());
        log::debug!(
            "Uploaded mesh: {} bytes of vertices, {} bytes of indices",
            mesh.vertex_bytes().len(),
            mesh.index_bytes().len()
        );
        Ok(())
    }

    fn upload_texture(&mut self, texture: &TextureData) -> RenderResult<()> {
        let expected = texture.width as usize * texture.height as usize * 4;
        if texture.pixels.len() != expected {
            return Err(RenderError::ResourceCreationFailed(format!(
                "texture {}x{} needs {} bytes, got {}",
                texture.width,
                texture.height,
                expected,
                texture.pixels.len()
            )));
        }
        self.texture_size = Some((texture.width, texture.height));
        Ok(())
    }

    fn begin_frame(&mut self, view_projection: &Mat4) {
        self.view_projection = Some(*view_projection);
        self.in_frame = true;
        self.stats.frames += 1;
    }

    fn draw_indexed(&mut self, model: &Mat4, index_count: u32) {
        debug_assert!(self.in_frame, "draw outside begin_frame/end_frame");
        self.last_model = Some(*model);
        self.stats.draw_calls += 1;
        self.stats.indices += u64::from(index_count);
    }

    fn end_frame(&mut self) {
        self.in_frame = false;
    }

    fn release(&mut self) {
        self.program_linked = false;
        self.mesh_indices = None;
        self.texture_size = None;
        self.releases += 1;
    }
}
