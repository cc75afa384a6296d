//=========================================================================
// Render System
//=========================================================================
//
// Drawing-surface abstraction shared by states and scene nodes.
//
// Components:
// - `transform`: `Transformable`, the local transform of a node
// - `target`: `RenderTarget` contract, `RenderStates`, `Primitive`
// - `draw_list`: recording target used by the application loop and tests
//
//=========================================================================

//=== Module Declarations =================================================

mod draw_list;
mod target;
mod transform;

//=== Public API ==========================================================

pub use draw_list::{DrawCall, DrawList};
pub use target::{Color, Primitive, RenderStates, RenderTarget, SurfaceSize};
pub use transform::Transformable;
