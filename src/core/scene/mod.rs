//=========================================================================
// Scene System
//=========================================================================
//
// Hierarchical scene graph used inside gameplay states.
//
// Architecture:
//   SceneGraph
//     ├─ nodes: SlotMap<NodeId, SceneNode>
//     │    └─ SceneNode: Transformable + Box<dyn NodeContent> + links
//     └─ root: NodeId
//
// Flow:
//   update(dt)         → pre-order NodeContent::update_current
//   draw(target)       → pre-order NodeContent::draw_current
//   on_command(cmd)    → pre-order, action on category match
//
//=========================================================================

//=== Module Declarations =================================================

mod category;
mod command;
mod content;
mod graph;
mod node;

//=== Public API ==========================================================

pub use category::Category;
pub use command::{Command, CommandQueue};
pub use content::{EmptyNode, RectNode, SpriteNode, TextNode};
pub use graph::{NodeId, SceneError, SceneGraph};
pub use node::{AsAny, NodeContent, SceneNode};
