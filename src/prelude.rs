//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use stagecraft::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Application
pub use crate::{AppConfig, AppError, Application, ApplicationBuilder};

// State system
pub use crate::core::state::{Context, FromContext, State, StateContext, StateId, StateStack};

// Scene system
pub use crate::core::scene::{
    Category, Command, CommandQueue, EmptyNode, NodeContent, NodeId, RectNode, SceneGraph,
    SceneError, SceneNode, SpriteNode, TextNode,
};

// Rendering
pub use crate::core::render::{Color, RenderStates, RenderTarget, SurfaceSize, Transformable};

// Resources
pub use crate::core::resources::{Font, ResourceHolder, ResourceId, Texture};

// Input
pub use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};
