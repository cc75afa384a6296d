//=========================================================================
// Scene Graph
//=========================================================================
//
// Owned tree of scene nodes stored in a slotmap arena.
//
// Architecture:
//   SceneGraph
//     ├─ nodes: SlotMap<NodeId, SceneNode>
//     └─ root: NodeId
//
// Ownership:
//   The graph owns every node. Attaching moves another graph into this
//   one; detaching moves a subtree out into a new graph handed back to
//   the caller. Ids of moved nodes are reissued by the receiving arena.
//
// Traversal:
//   update, draw and command dispatch are pre-order depth-first, children
//   visited in list order. Node hooks only see their own node, so the
//   tree shape cannot change during a traversal.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use glam::{Affine2, Vec2};
use log::{debug, error, trace};
use slotmap::SlotMap;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::{Command, CommandQueue, EmptyNode, NodeContent, SceneNode};
use crate::core::render::{RenderStates, RenderTarget};

//=== NodeId ==============================================================

slotmap::new_key_type! {
    /// Handle of a node inside one `SceneGraph`.
    pub struct NodeId;
}

//=== SceneError ==========================================================

/// Structural misuse of a scene graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SceneError {
    /// The id does not name a node of this graph (stale or foreign id).
    #[error("node {0:?} does not exist in this scene graph")]
    UnknownNode(NodeId),

    /// Detach requested for a node that is not a direct child.
    #[error("node {child:?} is not a direct child of {parent:?}")]
    NotAChild { parent: NodeId, child: NodeId },
}

//=== SceneGraph ==========================================================

pub struct SceneGraph {
    nodes: SlotMap<NodeId, SceneNode>,
    root: NodeId,
}

impl SceneGraph {
    //--- Construction -----------------------------------------------------

    /// Creates a graph whose root is an empty grouping node.
    pub fn new() -> Self {
        Self::with_root(EmptyNode)
    }

    /// Creates a single-node graph with `content` at the root.
    ///
    /// A single-node graph is also how a fresh node is built before
    /// [`attach_child`](Self::attach_child) moves it into a tree.
    pub fn with_root(content: impl NodeContent) -> Self {
        let mut nodes = SlotMap::with_key();
        let root = nodes.insert(SceneNode::new(Box::new(content)));
        Self { nodes, root }
    }

    //--- Queries ----------------------------------------------------------

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&SceneNode> {
        self.nodes.get(id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut SceneNode> {
        self.nodes.get_mut(id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|node| node.parent)
    }

    /// Children of `id` in list order (empty for unknown ids).
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Ids of `id` and all its descendants in pre-order.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut pending = vec![id];

        while let Some(current) = pending.pop() {
            let Some(node) = self.nodes.get(current) else {
                continue;
            };
            out.push(current);
            pending.extend(node.children.iter().rev().copied());
        }

        out
    }

    //--- Structure --------------------------------------------------------

    /// Moves `child` (a whole graph) under `parent` as its last child.
    ///
    /// Returns the id the former root of `child` has in this graph.
    pub fn attach_child(&mut self, parent: NodeId, child: SceneGraph) -> Result<NodeId, SceneError> {
        if !self.nodes.contains_key(parent) {
            error!(target: "scene", "Attach to unknown parent {:?}", parent);
            return Err(SceneError::UnknownNode(parent));
        }

        let SceneGraph { mut nodes, root } = child;
        let moved = nodes.len();
        let id = transplant(&mut nodes, root, &mut self.nodes, Some(parent))
            .ok_or(SceneError::UnknownNode(root))?;
        self.nodes[parent].children.push(id);

        trace!(target: "scene", "Attached {} node(s) as {:?} under {:?}", moved, id, parent);
        Ok(id)
    }

    /// Attaches a fresh single node with `content` under `parent`.
    pub fn spawn(&mut self, parent: NodeId, content: impl NodeContent) -> Result<NodeId, SceneError> {
        self.attach_child(parent, SceneGraph::with_root(content))
    }

    /// Detaches the direct child `child` of `parent` with its subtree.
    ///
    /// The subtree is returned as an independent graph; dropping it
    /// destroys the nodes.
    ///
    /// Detaching a node that is not a direct child of `parent` is a caller
    /// bug. Instead of aborting in debug builds, it is logged at `error!`
    /// and reported as [`SceneError::NotAChild`] in every build profile,
    /// with the tree left untouched.
    pub fn detach_child(&mut self, parent: NodeId, child: NodeId) -> Result<SceneGraph, SceneError> {
        let parent_node = self
            .nodes
            .get_mut(parent)
            .ok_or(SceneError::UnknownNode(parent))?;

        let Some(position) = parent_node.children.iter().position(|&c| c == child) else {
            error!(target: "scene", "Detach of {:?} which is not a child of {:?}", child, parent);
            return Err(SceneError::NotAChild { parent, child });
        };
        parent_node.children.remove(position);

        let mut nodes = SlotMap::with_key();
        let root = transplant(&mut self.nodes, child, &mut nodes, None)
            .ok_or(SceneError::UnknownNode(child))?;

        debug!(target: "scene", "Detached {} node(s) from {:?}", nodes.len(), parent);
        Ok(SceneGraph { nodes, root })
    }

    //--- Update -----------------------------------------------------------

    /// Updates the whole tree.
    pub fn update(&mut self, dt: Duration) {
        self.update_node(self.root, dt);
    }

    /// Updates `id` and then its children, recursively.
    pub fn update_node(&mut self, id: NodeId, dt: Duration) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        node.update_current(dt);

        let count = node.children.len();
        for index in 0..count {
            let child = self.nodes[id].children[index];
            self.update_node(child, dt);
        }
    }

    //--- Draw -------------------------------------------------------------

    /// Draws the whole tree, parents before children.
    pub fn draw(&self, target: &mut dyn RenderTarget, states: RenderStates) {
        self.draw_node(self.root, target, states);
    }

    /// Draws `id` with `states` combined with its local transform, then
    /// its children with the combined states.
    pub fn draw_node(&self, id: NodeId, target: &mut dyn RenderTarget, states: RenderStates) {
        let Some(node) = self.nodes.get(id) else {
            return;
        };

        let states = states.combined(node.transform().transform());
        node.draw_current(target, &states);

        for &child in &node.children {
            self.draw_node(child, target, states);
        }
    }

    //--- Transforms -------------------------------------------------------

    /// Absolute transform of `id`: every ancestor's local transform
    /// applied before its own, root first.
    pub fn world_transform(&self, id: NodeId) -> Option<Affine2> {
        let mut node = self.nodes.get(id)?;
        let mut transform = node.transform().transform();

        while let Some(parent) = node.parent {
            node = self.nodes.get(parent)?;
            transform = node.transform().transform() * transform;
        }

        Some(transform)
    }

    /// Absolute position of the local origin of `id`.
    pub fn world_position(&self, id: NodeId) -> Option<Vec2> {
        self.world_transform(id)
            .map(|transform| transform.transform_point2(Vec2::ZERO))
    }

    //--- Commands ---------------------------------------------------------

    /// Broadcasts `command` to the whole tree.
    pub fn on_command(&mut self, command: &Command, dt: Duration) {
        self.on_command_at(self.root, command, dt);
    }

    /// Runs `command` on `id` if the categories intersect, then forwards it
    /// to every child regardless of the match.
    pub fn on_command_at(&mut self, id: NodeId, command: &Command, dt: Duration) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };

        if command.category.intersects(node.category()) {
            command.execute(node, dt);
        }

        let count = node.children.len();
        for index in 0..count {
            let child = self.nodes[id].children[index];
            self.on_command_at(child, command, dt);
        }
    }

    /// Drains `queue` in FIFO order, broadcasting every command.
    pub fn dispatch(&mut self, queue: &mut CommandQueue, dt: Duration) {
        while let Some(command) = queue.pop() {
            self.on_command(&command, dt);
        }
    }
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SceneGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SceneGraph")
            .field("root", &self.root)
            .field("len", &self.nodes.len())
            .finish()
    }
}

//=== Internal Helpers ====================================================

/// Moves the subtree rooted at `id` from `src` into `dst`, linking its
/// root to `parent`. Returns the new id of the subtree root.
fn transplant(
    src: &mut SlotMap<NodeId, SceneNode>,
    id: NodeId,
    dst: &mut SlotMap<NodeId, SceneNode>,
    parent: Option<NodeId>,
) -> Option<NodeId> {
    let mut node = src.remove(id)?;
    let children = std::mem::take(&mut node.children);
    node.parent = parent;

    let new_id = dst.insert(node);
    let moved: Vec<NodeId> = children
        .into_iter()
        .filter_map(|child| transplant(src, child, dst, Some(new_id)))
        .collect();
    dst[new_id].children = moved;

    Some(new_id)
}

//=========================================================================
// Unit Tests
//=========================================================================
