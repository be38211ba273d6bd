//! # Platform and Graphics Collaborators
//!
//! The benchmark core never talks to a window system or a GPU API directly.
//! It drives two traits:
//!
//! - [`Platform`]: window, event pump, status title, presentation
//! - [`GraphicsBackend`]: program/mesh/texture setup and draw submission
//!
//! [`headless`] provides deterministic implementations of both. A GLFW
//! window is available behind the `windowed` feature.

use thiserror::Error;

use crate::foundation::math::Mat4;
use crate::render::{Mesh, RenderResult, ShaderSources, TextureData};

pub mod headless;
#[cfg(feature = "windowed")]
pub mod glfw_window;

pub use headless::{GraphicsStats, HeadlessPlatform, NullGraphics};
#[cfg(feature = "windowed")]
pub use glfw_window::GlfwPlatform;

/// Events surfaced by the platform event pump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlatformEvent {
    /// The user or the window system asked the run to end
    Quit,
    /// The window was resized
    Resized {
        /// New width in pixels
        width: u32,
        /// New height in pixels
        height: u32,
    },
    /// Keyboard, mouse or other input the benchmark ignores
    Input,
}

/// Window-system side of the benchmark
pub trait Platform {
    /// Take at most one pending event off the queue
    fn poll_event(&mut self) -> Option<PlatformEvent>;

    /// Replace the window/status title
    fn set_title(&mut self, title: &str);

    /// Render target width in pixels
    fn width(&self) -> u32;

    /// Render target height in pixels
    fn height(&self) -> u32;

    /// Width over height of the render target
    fn aspect_ratio(&self) -> f32 {
        self.width() as f32 / self.height().max(1) as f32
    }

    /// Present the finished frame (may block on vsync)
    fn swap_buffers(&mut self);

    /// Report a fatal error to the user
    fn show_error(&mut self, title: &str, message: &str) {
        log::error!("{}: {}", title, message);
    }
}

/// GPU side of the benchmark
///
/// Setup calls may fail; per-frame calls cannot, because there is no
/// recovery path once the loop is running.
pub trait GraphicsBackend {
    /// Compile and link the shader program used for every draw
    fn create_program(&mut self, sources: &ShaderSources) -> RenderResult<()>;

    /// Upload vertex and index buffers
    fn upload_mesh(&mut self, mesh: &Mesh) -> RenderResult<()>;

    /// Upload the cube texture
    fn upload_texture(&mut self, texture: &TextureData) -> RenderResult<()>;

    /// Clear the frame and bind the per-frame view-projection uniform
    fn begin_frame(&mut self, view_projection: &Mat4);

    /// Draw the bound mesh with the given per-object model matrix
    fn draw_indexed(&mut self, model: &Mat4, index_count: u32);

    /// Finish command submission for the frame
    fn end_frame(&mut self);

    /// Release every GPU resource; safe to call more than once
    fn release(&mut self);
}

/// Window-system setup errors
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Window system could not be initialized
    #[error("Window system initialization failed: {0}")]
    InitializationFailed(String),

    /// Window creation failed
    #[error("Window creation failed: {0}")]
    CreationFailed(String),
}
