//=========================================================================
// Stock Node Content
//=========================================================================
//
// Thin visual leaves: an empty grouping node, a sprite, a text label and
// a solid rectangle. Games implement `NodeContent` for anything richer.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::NodeContent;
use crate::core::render::{Color, Primitive, RenderStates, RenderTarget};
use crate::core::resources::ResourceId;

//=== EmptyNode ===========================================================

/// Node without visuals, used for roots and layers.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyNode;

impl NodeContent for EmptyNode {}

//=== SpriteNode ==========================================================

/// Draws a texture, or a sub-rectangle of it.
#[derive(Debug, Clone)]
pub struct SpriteNode {
    texture: ResourceId,
    rect: Option<[u32; 4]>,
    tint: Color,
}

impl SpriteNode {
    pub fn new(texture: ResourceId) -> Self {
        Self {
            texture,
            rect: None,
            tint: Color::WHITE,
        }
    }

    /// Restricts drawing to `[left, top, width, height]` of the texture.
    pub fn with_rect(mut self, rect: [u32; 4]) -> Self {
        self.rect = Some(rect);
        self
    }

    pub fn with_tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    pub fn texture(&self) -> ResourceId {
        self.texture
    }

    pub fn set_texture(&mut self, texture: ResourceId) {
        self.texture = texture;
    }
}

impl NodeContent for SpriteNode {
    fn draw_current(&self, target: &mut dyn RenderTarget, states: &RenderStates) {
        target.draw(
            &Primitive::Sprite {
                texture: self.texture,
                rect: self.rect,
                tint: self.tint,
            },
            states,
        );
    }
}

//=== TextNode ============================================================

#[derive(Debug, Clone)]
pub struct TextNode {
    font: ResourceId,
    string: String,
    size: u32,
    color: Color,
}

impl TextNode {
    pub fn new(font: ResourceId, string: impl Into<String>) -> Self {
        Self {
            font,
            string: string.into(),
            size: 30,
            color: Color::WHITE,
        }
    }

    pub fn with_size(mut self, size: u32) -> Self {
        self.size = size;
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn string(&self) -> &str {
        &self.string
    }

    pub fn set_string(&mut self, string: impl Into<String>) {
        self.string = string.into();
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Primitive describing this label, for drawing outside a graph.
    pub fn primitive(&self) -> Primitive {
        Primitive::Text {
            font: self.font,
            string: self.string.clone(),
            size: self.size,
            color: self.color,
        }
    }
}

impl NodeContent for TextNode {
    fn draw_current(&self, target: &mut dyn RenderTarget, states: &RenderStates) {
        target.draw(&self.primitive(), states);
    }
}

//=== RectNode ============================================================

/// Solid rectangle with its top-left corner at the local origin.
#[derive(Debug, Clone, Copy)]
pub struct RectNode {
    pub size: Vec2,
    pub color: Color,
}

impl RectNode {
    pub fn new(size: Vec2, color: Color) -> Self {
        Self { size, color }
    }
}

impl NodeContent for RectNode {
    fn draw_current(&self, target: &mut dyn RenderTarget, states: &RenderStates) {
        target.draw(
            &Primitive::Rect {
                size: self.size,
                color: self.color,
            },
            states,
        );
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
