//=========================================================================
// Texture
//=========================================================================
//
// Decoded RGBA8 image. Decoding is delegated to the `image` crate; upload
// to a GPU is the render backend's business.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::path::Path;

use glam::UVec2;
use image::{ImageError, RgbaImage};

//=== Internal Dependencies ===============================================

use super::{Resource, ResourceError, ResourceId};

//=== Texture =============================================================

#[derive(Debug, Clone)]
pub struct Texture {
    image: RgbaImage,
}

impl Texture {
    /// Builds a texture from raw RGBA8 pixels.
    ///
    /// Returns `None` if `pixels` is not exactly `width * height * 4` bytes.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Option<Self> {
        RgbaImage::from_raw(width, height, pixels).map(|image| Self { image })
    }

    /// Size in pixels.
    pub fn size(&self) -> UVec2 {
        UVec2::new(self.image.width(), self.image.height())
    }

    /// Raw RGBA8 pixel data, row-major.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }
}

impl Resource for Texture {
    fn load_from_file(id: ResourceId, path: &Path) -> Result<Self, ResourceError> {
        let image = image::open(path).map_err(|e| match e {
            ImageError::IoError(source) => ResourceError::Io {
                id,
                path: path.to_path_buf(),
                source,
            },
            other => ResourceError::Decode {
                id,
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;

        Ok(Self {
            image: image.to_rgba8(),
        })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
