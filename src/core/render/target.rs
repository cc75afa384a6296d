//=========================================================================
// Render Target Contract
//=========================================================================
//
// The drawing surface as seen by states and scene nodes.
//
// The core never rasterises anything itself. Nodes describe what they
// want drawn as `Primitive`s, together with the accumulated transform in
// `RenderStates`, and hand them to whatever implements `RenderTarget`.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Affine2, Vec2};

//=== Internal Dependencies ===============================================

use crate::core::resources::ResourceId;

//=== Color ===============================================================

/// RGBA colour with 8 bits per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    pub const RED: Self = Self::rgb(255, 0, 0);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

//=== SurfaceSize =========================================================

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Centre of the surface in pixel coordinates.
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

//=== RenderStates ========================================================

/// Accumulated drawing state handed down the scene graph.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderStates {
    pub transform: Affine2,
}

impl Default for RenderStates {
    fn default() -> Self {
        Self {
            transform: Affine2::IDENTITY,
        }
    }
}

impl RenderStates {
    /// Returns a copy with `local` appended to the accumulated transform.
    pub fn combined(&self, local: Affine2) -> Self {
        Self {
            transform: self.transform * local,
        }
    }
}

//=== Primitive ===========================================================

/// Visual content a node or state asks the surface to draw.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// A textured quad covering the whole texture, or `rect` of it.
    Sprite {
        texture: ResourceId,
        rect: Option<[u32; 4]>,
        tint: Color,
    },

    /// A string of text in the given font.
    Text {
        font: ResourceId,
        string: String,
        size: u32,
        color: Color,
    },

    /// A solid, untextured rectangle.
    Rect { size: Vec2, color: Color },
}

//=== RenderTarget ========================================================

/// Drawing surface (window, offscreen buffer, recorder).
pub trait RenderTarget {
    /// Current size of the surface.
    fn size(&self) -> SurfaceSize;

    /// Clears the whole surface.
    fn clear(&mut self, color: Color);

    /// Draws `primitive` with the accumulated `states`.
    fn draw(&mut self, primitive: &Primitive, states: &RenderStates);
}
