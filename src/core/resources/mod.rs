//=========================================================================
// Resource Holders
//=========================================================================
//
// Load-by-id / get-by-id caches for textures and fonts.
//
// Architecture:
//   ResourceHolder<R>
//     └─ resources: HashMap<ResourceId, R>
//
// Resources are loaded once, usually before the first state is pushed,
// and looked up by id while states build their content.
//
//=========================================================================

//=== Module Declarations =================================================

mod font;
mod holder;
mod texture;

//=== Public API ==========================================================

pub use font::Font;
pub use holder::{Resource, ResourceHolder};
pub use texture::Texture;

//=== External Dependencies ===============================================

use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

//=== ResourceId ==========================================================

/// Identifier of a loaded resource.
///
/// Games usually declare their ids as constants:
/// ```
/// use stagecraft::core::resources::ResourceId;
///
/// pub const TITLE_SCREEN: ResourceId = ResourceId::new("title_screen");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResourceId(&'static str);

impl ResourceId {
    pub const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub fn name(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0)
    }
}

//=== ResourceError =======================================================

/// Failure to load or look up a resource.
#[derive(Debug, Error)]
pub enum ResourceError {
    /// The file could not be read.
    #[error("failed to read resource {id} from {path}: {source}")]
    Io {
        id: ResourceId,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file was read but its contents are not a valid resource.
    #[error("failed to decode resource {id} from {path}: {reason}")]
    Decode {
        id: ResourceId,
        path: PathBuf,
        reason: String,
    },

    /// Lookup of an id that was never loaded.
    #[error("resource {0} is not loaded")]
    NotLoaded(ResourceId),
}
