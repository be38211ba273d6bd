//! Scoped ownership of graphics resources
//!
//! A [`GraphicsSession`] owns the backend for the length of a run and
//! releases everything it uploaded when dropped, including when setup fails
//! halfway through.

use crate::config::RunConfiguration;
use crate::platform::GraphicsBackend;
use crate::render::{Mesh, RenderResult, ShaderSources, TextureData};

/// CPU-side resources uploaded before the loop starts
#[derive(Debug, Clone)]
pub struct SceneAssets {
    /// Vertex and fragment shader text
    pub shaders: ShaderSources,
    /// The shared cube mesh
    pub mesh: Mesh,
    /// Texture applied to every cube
    pub texture: TextureData,
}

impl SceneAssets {
    /// Load shaders and texture from the configured paths, falling back to
    /// the built-in shaders and checkerboard when unset
    pub fn load(config: &RunConfiguration) -> RenderResult<Self> {
        let shaders = ShaderSources::resolve(config.shader_dir.as_deref())?;
        let texture = TextureData::resolve(config.texture_path.as_deref())?;

        Ok(Self {
            shaders,
            mesh: Mesh::cube(),
            texture,
        })
    }
}

/// Graphics backend with guaranteed release
pub struct GraphicsSession<G: GraphicsBackend> {
    backend: G,
}

impl<G: GraphicsBackend> GraphicsSession<G> {
    /// Take ownership of `backend`
    pub fn new(backend: G) -> Self {
        Self { backend }
    }

    /// Create the program and upload mesh and texture
    ///
    /// Returns the index count to draw per object.
    pub fn prepare(&mut self, assets: &SceneAssets) -> RenderResult<u32> {
        self.backend.create_program(&assets.shaders)?;
        self.backend.upload_mesh(&assets.mesh)?;
        self.backend.upload_texture(&assets.texture)?;

        log::info!(
            "Graphics resources ready: {} vertices, {} indices, {}x{} texture",
            assets.mesh.vertices.len(),
            assets.mesh.index_count(),
            assets.texture.width,
            assets.texture.height
        );

        Ok(assets.mesh.index_count())
    }

    /// Shared access to the backend
    pub const fn backend(&self) -> &G {
        &self.backend
    }

    /// Mutable access for the render loop
    pub fn backend_mut(&mut self) -> &mut G {
        &mut self.backend
    }
}

impl<G: GraphicsBackend> Drop for GraphicsSession<G> {
    fn drop(&mut self) {
        self.backend.release();
        log::debug!("Graphics resources released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Mat4;
    use crate::render::RenderError;
    use std::cell::Cell;
    use std::path::PathBuf;
    use std::rc::Rc;

    /// Backend whose release count outlives the session
    struct TrackingBackend {
        released: Rc<Cell<u32>>,
        fail_mesh: bool,
    }

    impl GraphicsBackend for TrackingBackend {
        fn create_program(&mut self, _sources: &ShaderSources) -> RenderResult<()> {
            Ok(())
        }

        fn upload_mesh(&mut self, _mesh: &Mesh) -> RenderResult<()> {
            if self.fail_mesh {
                Err(RenderError::ResourceCreationFailed("out of memory".to_string()))
            } else {
                Ok(())
            }
        }

        fn upload_texture(&mut self, _texture: &TextureData) -> RenderResult<()> {
            Ok(())
        }

        fn begin_frame(&mut self, _view_projection: &Mat4) {}

        fn draw_indexed(&mut self, _model: &Mat4, _index_count: u32) {}

        fn end_frame(&mut self) {}

        fn release(&mut self) {
            self.released.set(self.released.get() + 1);
        }
    }

    fn assets() -> SceneAssets {
        SceneAssets::load(&RunConfiguration::default()).unwrap()
    }

    #[test]
    fn test_prepare_returns_cube_index_count() {
        let released = Rc::new(Cell::new(0));
        let mut session = GraphicsSession::new(TrackingBackend {
            released: Rc::clone(&released),
            fail_mesh: false,
        });

        assert_eq!(session.prepare(&assets()).unwrap(), 36);
        drop(session);
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_release_runs_when_setup_fails() {
        let released = Rc::new(Cell::new(0));
        let result = {
            let mut session = GraphicsSession::new(TrackingBackend {
                released: Rc::clone(&released),
                fail_mesh: true,
            });
            session.prepare(&assets())
        };

        assert!(matches!(result, Err(RenderError::ResourceCreationFailed(_))));
        assert_eq!(released.get(), 1);
    }

    #[test]
    fn test_missing_texture_path_fails_asset_load() {
        let config = RunConfiguration {
            texture_path: Some(PathBuf::from("does/not/exist.png")),
            ..Default::default()
        };
        assert!(matches!(
            SceneAssets::load(&config),
            Err(RenderError::TextureLoad { .. })
        ));
    }
}
