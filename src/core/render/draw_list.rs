//=========================================================================
// Draw List
//=========================================================================
//
// Recording `RenderTarget`. Every draw call is stored with its final
// transform, in submission order, until the next `clear`.
//
// The application loop renders each frame into a draw list; tests use it
// to observe what (and in which order) states and nodes drew.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Affine2;

//=== Internal Dependencies ===============================================

use super::{Color, Primitive, RenderStates, RenderTarget, SurfaceSize};

//=== DrawCall ============================================================

/// One recorded draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawCall {
    pub primitive: Primitive,
    pub transform: Affine2,
}

//=== DrawList ============================================================

/// Render target that records draw calls instead of rasterising them.
#[derive(Debug, Clone)]
pub struct DrawList {
    size: SurfaceSize,
    clear_color: Color,
    calls: Vec<DrawCall>,
}

impl DrawList {
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            clear_color: Color::BLACK,
            calls: Vec::with_capacity(64),
        }
    }

    /// Recorded calls since the last clear, in draw order.
    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn len(&self) -> usize {
        self.calls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    pub fn clear_color(&self) -> Color {
        self.clear_color
    }

    pub fn resize(&mut self, size: SurfaceSize) {
        self.size = size;
    }
}

impl RenderTarget for DrawList {
    fn size(&self) -> SurfaceSize {
        self.size
    }

    fn clear(&mut self, color: Color) {
        self.clear_color = color;
        self.calls.clear();
    }

    fn draw(&mut self, primitive: &Primitive, states: &RenderStates) {
        self.calls.push(DrawCall {
            primitive: primitive.clone(),
            transform: states.transform,
        });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
