//=========================================================================
// Scene Node
//=========================================================================
//
// A single node of a `SceneGraph`: local transform, tree links and the
// content that gives the node its behaviour.
//
// The tree links are arena indices. `parent` is a plain observer id and
// never owns anything; the graph owns every node.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::any::Any;
use std::time::Duration;

//=== Internal Dependencies ===============================================

use super::{Category, NodeId};
use crate::core::render::{RenderStates, RenderTarget, Transformable};

//=== AsAny ===============================================================

/// Upcast helper so node content can be downcast to its concrete type.
///
/// Implemented automatically for every `'static` type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

//=== NodeContent Trait ===================================================

/// Behaviour of a scene node.
///
/// Every hook has a default, so a grouping node needs no code at all:
///
/// ```rust
/// # use stagecraft::core::scene::NodeContent;
/// struct Layer;
///
/// impl NodeContent for Layer {}
/// ```
pub trait NodeContent: AsAny {
    /// Advances this node's own state. Children are updated afterwards by
    /// the graph.
    fn update_current(&mut self, _transform: &mut Transformable, _dt: Duration) {}

    /// Draws this node's own visuals. `states` already contains this
    /// node's transform.
    fn draw_current(&self, _target: &mut dyn RenderTarget, _states: &RenderStates) {}

    /// Kinds of commands this node answers to.
    fn category(&self) -> Category {
        Category::SCENE
    }
}

//=== SceneNode ===========================================================

pub struct SceneNode {
    transform: Transformable,
    content: Box<dyn NodeContent>,
    pub(super) parent: Option<NodeId>,
    pub(super) children: Vec<NodeId>,
}

impl SceneNode {
    pub(super) fn new(content: Box<dyn NodeContent>) -> Self {
        Self {
            transform: Transformable::default(),
            content,
            parent: None,
            children: Vec::new(),
        }
    }

    //--- Transform --------------------------------------------------------

    pub fn transform(&self) -> &Transformable {
        &self.transform
    }

    pub fn transform_mut(&mut self) -> &mut Transformable {
        &mut self.transform
    }

    //--- Content ----------------------------------------------------------

    pub fn category(&self) -> Category {
        self.content.category()
    }

    pub fn content(&self) -> &dyn NodeContent {
        self.content.as_ref()
    }

    pub fn content_mut(&mut self) -> &mut dyn NodeContent {
        self.content.as_mut()
    }

    /// Returns the content as `T`, if that is its concrete type.
    pub fn downcast_ref<T: NodeContent>(&self) -> Option<&T> {
        self.content.as_ref().as_any().downcast_ref::<T>()
    }

    /// Returns the content as `T` together with the node transform.
    pub fn downcast_mut<T: NodeContent>(&mut self) -> Option<(&mut T, &mut Transformable)> {
        let content = self.content.as_mut().as_any_mut().downcast_mut::<T>()?;
        Some((content, &mut self.transform))
    }

    //--- Links ------------------------------------------------------------

    /// Parent id, `None` for the root of a graph.
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in draw/update order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    //--- Hooks (graph-internal) ------------------------------------------

    pub(super) fn update_current(&mut self, dt: Duration) {
        self.content.update_current(&mut self.transform, dt);
    }

    pub(super) fn draw_current(&self, target: &mut dyn RenderTarget, states: &RenderStates) {
        self.content.draw_current(target, states);
    }
}

impl std::fmt::Debug for SceneNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneNode")
            .field("transform", &self.transform)
            .field("category", &self.category())
            .field("parent", &self.parent)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
