//! # Rendering Data
//!
//! Everything the benchmark hands to a graphics backend: the camera and its
//! matrices, the cube lattice scene, the cube mesh, shader sources and
//! texture pixels. Rasterization itself lives behind
//! [`GraphicsBackend`](crate::platform::GraphicsBackend).

pub mod camera;
pub mod mesh;
pub mod scene;
pub mod shaders;
pub mod texture;

pub use camera::Camera;
pub use mesh::{Mesh, Vertex};
pub use scene::{frame_lattice, Bounds, Lattice, LatticeFraming, RenderObject, Scene};
pub use shaders::ShaderSources;
pub use texture::TextureData;

use thiserror::Error;

/// Rendering setup errors
///
/// All of these abort the run before the benchmark loop starts; the loop
/// itself has no recoverable-error path.
#[derive(Error, Debug)]
pub enum RenderError {
    /// A shader source file could not be read
    #[error("Failed to load shader {path}: {source}")]
    ShaderLoad {
        /// Shader file path
        path: String,
        /// Underlying I/O failure
        source: std::io::Error,
    },

    /// The backend rejected a shader stage or program
    #[error("Shader compilation failed: {0}")]
    ShaderCompilation(String),

    /// Resource creation or upload failed
    #[error("Resource creation failed: {0}")]
    ResourceCreationFailed(String),

    /// Texture image could not be loaded
    #[error("Failed to load texture image {path}: {reason}")]
    TextureLoad {
        /// Image file path
        path: String,
        /// Decoder or I/O message
        reason: String,
    },
}

/// Result type for rendering setup
pub type RenderResult<T> = Result<T, RenderError>;
