//=========================================================================
// Pending Queue
//=========================================================================
//
// Structural requests (push / pop / clear) recorded during a traversal of
// the state stack and applied afterwards, in the order they were made.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::StateId;

//=== PendingChange =======================================================

/// A deferred change to the state stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingChange<I: StateId> {
    /// Build the state registered under the id and put it on top.
    Push(I),

    /// Remove the top state.
    Pop,

    /// Remove every state.
    Clear,
}

//=== PendingQueue ========================================================

/// FIFO of deferred stack changes.
#[derive(Debug)]
pub struct PendingQueue<I: StateId> {
    queue: Vec<PendingChange<I>>,
}

impl<I: StateId> PendingQueue<I> {
    pub fn new() -> Self {
        Self { queue: Vec::new() }
    }

    /// Records a change for the next apply point.
    pub fn push(&mut self, change: PendingChange<I>) {
        self.queue.push(change);
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Takes all recorded changes, leaving the queue empty.
    ///
    /// Changes recorded while the taken batch is being applied land in the
    /// fresh queue and wait for the next apply point.
    pub fn take(&mut self) -> Vec<PendingChange<I>> {
        std::mem::take(&mut self.queue)
    }
}

impl<I: StateId> Default for PendingQueue<I> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum Screen {
        Title,
        Menu,
    }

    impl StateId for Screen {}

    #[test]
    fn take_preserves_order_and_empties_queue() {
        let mut queue = PendingQueue::new();
        queue.push(PendingChange::Push(Screen::Title));
        queue.push(PendingChange::Pop);
        queue.push(PendingChange::Push(Screen::Menu));
        queue.push(PendingChange::Clear);

        assert_eq!(queue.len(), 4);
        assert_eq!(
            queue.take(),
            vec![
                PendingChange::Push(Screen::Title),
                PendingChange::Pop,
                PendingChange::Push(Screen::Menu),
                PendingChange::Clear,
            ]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn changes_recorded_after_take_wait_in_fresh_queue() {
        let mut queue = PendingQueue::new();
        queue.push(PendingChange::Push(Screen::Title));

        let batch = queue.take();
        queue.push(PendingChange::<Screen>::Pop);

        assert_eq!(batch, vec![PendingChange::Push(Screen::Title)]);
        assert_eq!(queue.len(), 1);
    }
}
