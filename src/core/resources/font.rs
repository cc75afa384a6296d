//=========================================================================
// Font
//=========================================================================

//=== External Dependencies ===============================================

use std::fs;
use std::path::Path;

//=== Internal Dependencies ===============================================

use super::{Resource, ResourceError, ResourceId};

//=== Font ================================================================

/// Font file contents, kept as raw bytes for the text renderer.
#[derive(Debug, Clone)]
pub struct Font {
    family: String,
    data: Vec<u8>,
}

impl Font {
    pub fn from_bytes(family: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            family: family.into(),
            data,
        }
    }

    /// Family name, taken from the file stem when loaded from disk.
    pub fn family(&self) -> &str {
        &self.family
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl Resource for Font {
    fn load_from_file(id: ResourceId, path: &Path) -> Result<Self, ResourceError> {
        let data = fs::read(path).map_err(|source| ResourceError::Io {
            id,
            path: path.to_path_buf(),
            source,
        })?;

        if data.is_empty() {
            return Err(ResourceError::Decode {
                id,
                path: path.to_path_buf(),
                reason: "font file is empty".to_owned(),
            });
        }

        let family = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| id.name().to_owned());

        Ok(Self { family, data })
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const MAIN: ResourceId = ResourceId::new("main");

    #[test]
    fn family_comes_from_file_stem() {
        let path = std::env::temp_dir().join("Sansation.ttf");
        fs::write(&path, b"not really a font").unwrap();

        let font = Font::load_from_file(MAIN, &path).unwrap();
        assert_eq!(font.family(), "Sansation");
        assert_eq!(font.data(), b"not really a font");

        let _ = fs::remove_file(path);
    }

    #[test]
    fn empty_file_is_decode_error() {
        let path = std::env::temp_dir().join("stagecraft_empty_font.ttf");
        fs::write(&path, b"").unwrap();

        let result = Font::load_from_file(MAIN, &path);
        assert!(matches!(result, Err(ResourceError::Decode { .. })));

        let _ = fs::remove_file(path);
    }
}
