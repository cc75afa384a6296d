//=========================================================================
// Commands
//=========================================================================
//
// A command is a category mask plus an action. The scene graph runs the
// action on every node whose category intersects the mask.
//
// Game logic queues commands during a frame; the owner of the graph
// drains the queue into `SceneGraph::dispatch` once per update.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use log::warn;

//=== Internal Dependencies ===============================================

use super::{Category, NodeContent, SceneNode};
use crate::core::render::Transformable;

//=== Command =============================================================

type Action = Box<dyn Fn(&mut SceneNode, Duration)>;

/// Category-filtered action broadcast through a scene graph.
pub struct Command {
    /// Nodes whose category intersects this mask receive the action.
    pub category: Category,
    action: Action,
}

impl Command {
    pub fn new<F>(category: Category, action: F) -> Self
    where
        F: Fn(&mut SceneNode, Duration) + 'static,
    {
        Self {
            category,
            action: Box::new(action),
        }
    }

    /// Builds a command whose action works on content of type `T`.
    ///
    /// Matching nodes whose content is not a `T` are skipped with a
    /// warning; a category that selects the wrong content type is a bug in
    /// the game's category table.
    pub fn for_content<T, F>(category: Category, action: F) -> Self
    where
        T: NodeContent,
        F: Fn(&mut T, &mut Transformable, Duration) + 'static,
    {
        Self::new(category, move |node, dt| match node.downcast_mut::<T>() {
            Some((content, transform)) => action(content, transform, dt),
            None => warn!(
                target: "scene",
                "Command for {} reached a node of category {:?} with other content",
                std::any::type_name::<T>(),
                node.category()
            ),
        })
    }

    /// Runs the action on `node` without checking the category.
    pub fn execute(&self, node: &mut SceneNode, dt: Duration) {
        (self.action)(node, dt);
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("category", &self.category)
            .finish_non_exhaustive()
    }
}

//=== CommandQueue ========================================================

/// FIFO of commands waiting for the next dispatch.
#[derive(Debug, Default)]
pub struct CommandQueue {
    queue: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }

    /// Queues a command for the next dispatch.
    pub fn push(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    /// Removes the oldest command.
    pub fn pop(&mut self) -> Option<Command> {
        self.queue.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Drops every queued command.
    pub fn clear(&mut self) {
        self.queue.clear()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::scene::{EmptyNode, SceneGraph};
    use glam::Vec2;

    const MOVER: Category = Category::from_bits_retain(1 << 3);

    struct Mover {
        speed: f32,
    }

    impl NodeContent for Mover {
        fn category(&self) -> Category {
            MOVER
        }
    }

    #[test]
    fn queue_is_fifo() {
        let mut queue = CommandQueue::new();
        queue.push(Command::new(Category::SCENE, |_, _| {}));
        queue.push(Command::new(MOVER, |_, _| {}));

        assert_eq!(queue.len(), 2);
        assert_eq!(queue.pop().map(|c| c.category), Some(Category::SCENE));
        assert_eq!(queue.pop().map(|c| c.category), Some(MOVER));
        assert!(queue.pop().is_none());
    }

    #[test]
    fn clear_empties_queue() {
        let mut queue = CommandQueue::new();
        queue.push(Command::new(MOVER, |_, _| {}));
        queue.clear();
        assert!(queue.is_empty());
    }

    #[test]
    fn typed_command_reaches_concrete_content() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let mover = graph.spawn(root, Mover { speed: 2.0 }).unwrap();

        let command = Command::for_content::<Mover, _>(MOVER, |mover, transform, dt| {
            transform.move_by(Vec2::X * mover.speed * dt.as_secs_f32());
            mover.speed += 1.0;
        });

        graph.on_command(&command, Duration::from_secs(1));

        let node = graph.node(mover).unwrap();
        assert_eq!(node.transform().position(), Vec2::new(2.0, 0.0));
        assert_eq!(node.downcast_ref::<Mover>().map(|m| m.speed), Some(3.0));
    }

    #[test]
    fn typed_command_skips_mismatched_content() {
        let mut graph = SceneGraph::new();
        let root = graph.root();
        let plain = graph.spawn(root, EmptyNode).unwrap();

        // SCENE selects EmptyNode content, which is not a Mover
        let command = Command::for_content::<Mover, _>(Category::SCENE, |_, transform, _| {
            transform.move_by(Vec2::ONE);
        });
        graph.on_command(&command, Duration::ZERO);

        assert_eq!(graph.node(plain).unwrap().transform().position(), Vec2::ZERO);
    }
}
