//! Texture data for the cube program
//!
//! Pixels are always RGBA8, ready for upload.

use std::path::Path;

use crate::render::{RenderError, RenderResult};

/// RGBA8 pixel data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextureData {
    /// Raw RGBA pixel data, row-major
    pub pixels: Vec<u8>,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl TextureData {
    /// Load an image file and convert it to RGBA8
    pub fn from_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let path = path.as_ref();
        log::debug!("Loading texture from: {:?}", path);

        let image = image::open(path).map_err(|e| RenderError::TextureLoad {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let rgba = image.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::info!("Loaded texture {}x{} from {:?}", width, height, path);

        Ok(Self {
            pixels: rgba.into_raw(),
            width,
            height,
        })
    }

    /// Two-colour checkerboard with square cells of `cell` pixels
    pub fn checkerboard(size: u32, cell: u32, light: [u8; 4], dark: [u8; 4]) -> Self {
        let cell = cell.max(1);
        let mut pixels = Vec::with_capacity((size * size * 4) as usize);
        for y in 0..size {
            for x in 0..size {
                let color = if (x / cell + y / cell) % 2 == 0 { light } else { dark };
                pixels.extend_from_slice(&color);
            }
        }

        Self {
            pixels,
            width: size,
            height: size,
        }
    }

    /// Texture used when no file is configured
    pub fn default_checkerboard() -> Self {
        Self::checkerboard(64, 8, [235, 235, 235, 255], [40, 90, 200, 255])
    }

    /// Load `path` if given, otherwise generate the default checkerboard
    pub fn resolve(path: Option<&Path>) -> RenderResult<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default_checkerboard()),
        }
    }

    /// RGBA value at pixel (x, y)
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let start = ((y * self.width + x) * 4) as usize;
        self.pixels
            .get(start..start + 4)
            .and_then(|p| p.try_into().ok())
    }
}
