//! Shader sources for the cube program

use std::path::Path;

use crate::render::{RenderError, RenderResult};

/// File name of the vertex stage inside a shader directory
pub const VERTEX_SHADER_FILE: &str = "shader.vert";

/// File name of the fragment stage inside a shader directory
pub const FRAGMENT_SHADER_FILE: &str = "shader.frag";

const BUILTIN_VERTEX: &str = r"#version 330 core
layout(location = 0) in vec3 position;
layout(location = 1) in vec2 uv;

uniform mat4 vp;
uniform mat4 model;

out vec2 frag_uv;

void main() {
    frag_uv = uv;
    gl_Position = vp * model * vec4(position, 1.0);
}
";

const BUILTIN_FRAGMENT: &str = r"#version 330 core
in vec2 frag_uv;

uniform sampler2D tex;

out vec4 color;

void main() {
    color = texture(tex, frag_uv);
}
";

/// Vertex + fragment source pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSources {
    /// Vertex stage source text
    pub vertex: String,
    /// Fragment stage source text
    pub fragment: String,
}

impl ShaderSources {
    /// The textured-cube program compiled into the binary
    pub fn builtin() -> Self {
        Self {
            vertex: BUILTIN_VERTEX.to_string(),
            fragment: BUILTIN_FRAGMENT.to_string(),
        }
    }

    /// Read `shader.vert` and `shader.frag` from `dir`
    pub fn from_dir(dir: impl AsRef<Path>) -> RenderResult<Self> {
        let dir = dir.as_ref();
        let read = |name: &str| {
            let path = dir.join(name);
            std::fs::read_to_string(&path).map_err(|source| RenderError::ShaderLoad {
                path: path.display().to_string(),
                source,
            })
        };

        let sources = Self {
            vertex: read(VERTEX_SHADER_FILE)?,
            fragment: read(FRAGMENT_SHADER_FILE)?,
        };
        log::info!("Loaded shaders from {}", dir.display());
        Ok(sources)
    }

    /// Built-in sources unless a directory is given
    pub fn resolve(dir: Option<&Path>) -> RenderResult<Self> {
        match dir {
            Some(dir) => Self::from_dir(dir),
            None => Ok(Self::builtin()),
        }
    }
}
