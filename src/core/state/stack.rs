//=========================================================================
// State Stack
//=========================================================================
//
// Owns the live states, the factories that build them and the shared
// context. Structural changes are requested during traversals and
// applied afterwards, so the live sequence never changes while it is
// being iterated.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, error, trace, warn};

//=== Internal Dependencies ===============================================

use super::{
    Context, FromContext, PendingChange, PendingQueue, State, StateContext, StateError, StateId,
};
use crate::core::input::InputEvent;
use crate::core::render::RenderTarget;

//=== Types ===============================================================

type StateFactory<I, D> = Box<dyn FnMut(&mut Context<D>) -> Box<dyn State<I, D>>>;

struct LiveState<I: StateId, D> {
    id: I,
    state: Box<dyn State<I, D>>,
}

//=== StateStack ==========================================================

/// Layered state machine.
///
/// The back of the stack is the top: it receives input and updates first
/// and draws last.
pub struct StateStack<I: StateId, D> {
    stack: Vec<LiveState<I, D>>,
    pending: PendingQueue<I>,
    factories: HashMap<I, StateFactory<I, D>>,
    context: Context<D>,
}

impl<I: StateId, D> StateStack<I, D> {
    //--- Construction -----------------------------------------------------

    /// Creates an empty stack owning `context`.
    pub fn new(context: Context<D>) -> Self {
        Self {
            stack: Vec::new(),
            pending: PendingQueue::new(),
            factories: HashMap::new(),
            context,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers `T` under `id`, built with [`FromContext`].
    pub fn register_state<T>(&mut self, id: I)
    where
        T: State<I, D> + FromContext<D> + 'static,
    {
        self.register_state_with(id, |context| {
            let state: Box<dyn State<I, D>> = Box::new(T::from_context(context));
            state
        });
    }

    /// Registers a factory closure under `id`.
    ///
    /// Registering the same id again replaces the previous factory.
    pub fn register_state_with<F>(&mut self, id: I, factory: F)
    where
        F: FnMut(&mut Context<D>) -> Box<dyn State<I, D>> + 'static,
    {
        if self.factories.insert(id, Box::new(factory)).is_some() {
            warn!(target: "state", "State {:?} was already registered and has been replaced", id);
        }
    }

    pub fn is_registered(&self, id: I) -> bool {
        self.factories.contains_key(&id)
    }

    //--- Requests ---------------------------------------------------------

    /// Queues a push of `id` for the next apply point.
    pub fn push_state(&mut self, id: I) {
        self.pending.push(PendingChange::Push(id));
    }

    /// Queues removal of the top state for the next apply point.
    pub fn pop_state(&mut self) {
        self.pending.push(PendingChange::Pop);
    }

    /// Queues removal of every state for the next apply point.
    pub fn clear_states(&mut self) {
        self.pending.push(PendingChange::Clear);
    }

    //--- Dispatch ---------------------------------------------------------

    /// Forwards `event` top-down until a state returns `false`, then
    /// applies pending changes.
    pub fn handle_event(&mut self, event: &InputEvent) -> Result<(), StateError> {
        let mut ctx = StateContext::new(&mut self.context, &mut self.pending);

        for live in self.stack.iter_mut().rev() {
            if !live.state.handle_event(event, &mut ctx) {
                trace!(target: "state", "Event {:?} consumed by {:?}", event, live.id);
                break;
            }
        }

        self.apply_pending_changes()
    }

    /// Updates states top-down until one returns `false`, then applies
    /// pending changes.
    pub fn update(&mut self, dt: Duration) -> Result<(), StateError> {
        let mut ctx = StateContext::new(&mut self.context, &mut self.pending);

        for live in self.stack.iter_mut().rev() {
            if !live.state.update(dt, &mut ctx) {
                break;
            }
        }

        self.apply_pending_changes()
    }

    /// Draws every state, bottom first.
    pub fn draw(&self, target: &mut dyn RenderTarget) {
        for live in &self.stack {
            live.state.draw(target, &self.context);
        }
    }

    //--- Apply Point ------------------------------------------------------

    /// Applies queued changes in request order.
    ///
    /// A push of an unregistered id stops the batch: the error is returned
    /// and the changes queued after it are discarded.
    pub fn apply_pending_changes(&mut self) -> Result<(), StateError> {
        let mut changes = self.pending.take().into_iter();

        while let Some(change) = changes.next() {
            match change {
                PendingChange::Push(id) => {
                    if let Err(e) = self.push_internal(id) {
                        error!(
                            target: "state",
                            "{}; discarding {} queued change(s)",
                            e,
                            changes.len()
                        );
                        return Err(e);
                    }
                }
                PendingChange::Pop => self.pop_internal(),
                PendingChange::Clear => self.clear_internal(),
            }
        }

        Ok(())
    }

    //--- Queries ----------------------------------------------------------

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    /// Ids of the live states, bottom to top.
    pub fn state_ids(&self) -> Vec<I> {
        self.stack.iter().map(|live| live.id).collect()
    }

    /// Id of the top state.
    pub fn top(&self) -> Option<I> {
        self.stack.last().map(|live| live.id)
    }

    /// Number of changes waiting for the next apply point.
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn context(&self) -> &Context<D> {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context<D> {
        &mut self.context
    }

    //--- Internal Helpers -------------------------------------------------

    fn push_internal(&mut self, id: I) -> Result<(), StateError> {
        let factory = self
            .factories
            .get_mut(&id)
            .ok_or_else(|| StateError::unregistered(id))?;

        let mut state = factory(&mut self.context);
        debug!(target: "state", "Pushing state {:?} (depth {})", id, self.stack.len() + 1);

        let mut ctx = StateContext::new(&mut self.context, &mut self.pending);
        state.on_enter(&mut ctx);
        self.stack.push(LiveState { id, state });

        Ok(())
    }

    fn pop_internal(&mut self) {
        match self.stack.pop() {
            Some(mut live) => {
                debug!(target: "state", "Popping state {:?}", live.id);
                live.state.on_exit(&mut self.context);
            }
            None => debug!(target: "state", "Pop on empty stack ignored"),
        }
    }

    fn clear_internal(&mut self) {
        debug!(target: "state", "Clearing {} state(s)", self.stack.len());

        while let Some(mut live) = self.stack.pop() {
            live.state.on_exit(&mut self.context);
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;
    use crate::core::render::{DrawList, SurfaceSize};
    use std::cell::RefCell;
    use std::rc::Rc;

    //--- Test Helpers -----------------------------------------------------

    #[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
    enum Screen {
        T1,
        T2,
        T3,
        T4,
    }

    impl StateId for Screen {}

    type Journal = Rc<RefCell<Vec<String>>>;
    type TestStack = StateStack<Screen, Journal>;

    /// Per-state scripted behaviour.
    #[derive(Clone, Copy, Default)]
    struct Script {
        consume_events: bool,
        consume_updates: bool,
        on_event: Option<PendingChange<Screen>>,
        on_update: Option<PendingChange<Screen>>,
        on_enter: Option<PendingChange<Screen>>,
    }

    /// State that journals every call, including construction and drop.
    struct Probe {
        id: Screen,
        script: Script,
        journal: Journal,
    }

    impl Probe {
        fn record(&self, what: &str) {
            self.journal.borrow_mut().push(format!("{} {:?}", what, self.id));
        }
    }

    impl State<Screen, Journal> for Probe {
        fn on_enter(&mut self, ctx: &mut StateContext<'_, Screen, Journal>) {
            self.record("enter");
            if let Some(change) = self.script.on_enter {
                ctx.request(change);
            }
        }

        fn on_exit(&mut self, _context: &mut Context<Journal>) {
            self.record("exit");
        }

        fn handle_event(&mut self, _event: &InputEvent, ctx: &mut StateContext<'_, Screen, Journal>) -> bool {
            self.record("event");
            if let Some(change) = self.script.on_event {
                ctx.request(change);
            }
            !self.script.consume_events
        }

        fn update(&mut self, _dt: Duration, ctx: &mut StateContext<'_, Screen, Journal>) -> bool {
            self.record("update");
            if let Some(change) = self.script.on_update {
                ctx.request(change);
            }
            !self.script.consume_updates
        }

        fn draw(&self, _target: &mut dyn RenderTarget, _context: &Context<Journal>) {
            self.record("draw");
        }
    }

    impl Drop for Probe {
        fn drop(&mut self) {
            self.record("drop");
        }
    }

    fn new_stack() -> TestStack {
        StateStack::new(Context::new(SurfaceSize::new(640, 480), Journal::default()))
    }

    fn register(stack: &mut TestStack, id: Screen, script: Script) {
        stack.register_state_with(id, move |context| {
            let journal = Rc::clone(&context.data);
            journal.borrow_mut().push(format!("new {:?}", id));
            Box::new(Probe { id, script, journal })
        });
    }

    fn journal(stack: &TestStack) -> Vec<String> {
        stack.context().data.borrow().clone()
    }

    fn reset_journal(stack: &TestStack) {
        stack.context().data.borrow_mut().clear();
    }

    /// T1, T2, T3 live, no scripts.
    fn three_layers() -> TestStack {
        let mut stack = new_stack();
        for id in [Screen::T1, Screen::T2, Screen::T3, Screen::T4] {
            register(&mut stack, id, Script::default());
        }
        stack.push_state(Screen::T1);
        stack.push_state(Screen::T2);
        stack.push_state(Screen::T3);
        stack.apply_pending_changes().unwrap();
        reset_journal(&stack);
        stack
    }

    fn key() -> InputEvent {
        InputEvent::key_down(KeyCode::Space)
    }

    //--- Requests Are Deferred --------------------------------------------

    #[test]
    fn requests_take_effect_only_at_apply_point() {
        let mut stack = new_stack();
        register(&mut stack, Screen::T1, Script::default());

        stack.push_state(Screen::T1);
        assert!(stack.is_empty());
        assert_eq!(stack.pending_len(), 1);

        stack.apply_pending_changes().unwrap();
        assert_eq!(stack.state_ids(), vec![Screen::T1]);
        assert_eq!(stack.pending_len(), 0);

        stack.pop_state();
        assert_eq!(stack.len(), 1);
        stack.update(Duration::ZERO).unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn push_builds_then_enters() {
        let mut stack = new_stack();
        register(&mut stack, Screen::T1, Script::default());

        stack.push_state(Screen::T1);
        stack.apply_pending_changes().unwrap();

        assert_eq!(journal(&stack), vec!["new T1", "enter T1"]);
        assert_eq!(stack.top(), Some(Screen::T1));
    }

    //--- Dispatch Order ---------------------------------------------------

    #[test]
    fn events_go_top_down_and_stop_at_consumer() {
        let mut stack = new_stack();
        register(&mut stack, Screen::T1, Script::default());
        register(
            &mut stack,
            Screen::T2,
            Script {
                consume_events: true,
                ..Script::default()
            },
        );
        register(&mut stack, Screen::T3, Script::default());
        for id in [Screen::T1, Screen::T2, Screen::T3] {
            stack.push_state(id);
        }
        stack.apply_pending_changes().unwrap();
        reset_journal(&stack);

        stack.handle_event(&key()).unwrap();

        assert_eq!(journal(&stack), vec!["event T3", "event T2"]);
    }

    #[test]
    fn events_reach_every_layer_when_nobody_consumes() {
        let mut stack = three_layers();
        stack.handle_event(&key()).unwrap();
        assert_eq!(journal(&stack), vec!["event T3", "event T2", "event T1"]);
    }

    #[test]
    fn updates_go_top_down_and_stop_at_consumer() {
        let mut stack = new_stack();
        register(
            &mut stack,
            Screen::T1,
            Script {
                consume_updates: true,
                ..Script::default()
            },
        );
        register(
            &mut stack,
            Screen::T2,
            Script {
                consume_updates: true,
                ..Script::default()
            },
        );
        stack.push_state(Screen::T1);
        stack.push_state(Screen::T2);
        stack.apply_pending_changes().unwrap();
        reset_journal(&stack);

        stack.update(Duration::from_millis(16)).unwrap();

        assert_eq!(journal(&stack), vec!["update T2"]);
    }

    #[test]
    fn draw_goes_bottom_up_over_every_layer() {
        let mut stack = new_stack();
        for id in [Screen::T1, Screen::T2, Screen::T3] {
            register(
                &mut stack,
                id,
                Script {
                    consume_events: true,
                    consume_updates: true,
                    ..Script::default()
                },
            );
            stack.push_state(id);
        }
        stack.apply_pending_changes().unwrap();
        reset_journal(&stack);

        let mut target = DrawList::new(SurfaceSize::new(640, 480));
        stack.draw(&mut target);

        assert_eq!(journal(&stack), vec!["draw T1", "draw T2", "draw T3"]);
    }

    //--- Apply Timing -----------------------------------------------------

    #[test]
    fn push_during_update_is_invisible_to_the_same_update() {
        let mut stack = new_stack();
        register(&mut stack, Screen::T1, Script::default());
        register(
            &mut stack,
            Screen::T2,
            Script {
                on_update: Some(PendingChange::Push(Screen::T3)),
                ..Script::default()
            },
        );
        register(&mut stack, Screen::T3, Script::default());
        stack.push_state(Screen::T1);
        stack.push_state(Screen::T2);
        stack.apply_pending_changes().unwrap();
        reset_journal(&stack);

        stack.update(Duration::ZERO).unwrap();

        // T3 is built after the traversal, never updated in this pass
        assert_eq!(
            journal(&stack),
            vec!["update T2", "update T1", "new T3", "enter T3"]
        );
        assert_eq!(stack.state_ids(), vec![Screen::T1, Screen::T2, Screen::T3]);

        reset_journal(&stack);
        let mut target = DrawList::new(SurfaceSize::new(640, 480));
        stack.draw(&mut target);
        assert_eq!(journal(&stack), vec!["draw T1", "draw T2", "draw T3"]);
    }

    #[test]
    fn pop_during_event_applies_before_next_update() {
        let mut stack = new_stack();
        register(&mut stack, Screen::T1, Script::default());
        register(
            &mut stack,
            Screen::T2,
            Script {
                consume_events: true,
                on_event: Some(PendingChange::Pop),
                ..Script::default()
            },
        );
        stack.push_state(Screen::T1);
        stack.push_state(Screen::T2);
        stack.apply_pending_changes().unwrap();
        reset_journal(&stack);

        stack.handle_event(&key()).unwrap();
        stack.update(Duration::ZERO).unwrap();

        assert_eq!(
            journal(&stack),
            vec!["event T2", "exit T2", "drop T2", "update T1"]
        );
    }

    #[test]
    fn requests_from_on_enter_wait_for_next_apply_point() {
        let mut stack = new_stack();
        register(
            &mut stack,
            Screen::T1,
            Script {
                on_enter: Some(PendingChange::Push(Screen::T2)),
                ..Script::default()
            },
        );
        register(&mut stack, Screen::T2, Script::default());

        stack.push_state(Screen::T1);
        stack.apply_pending_changes().unwrap();
        assert_eq!(stack.state_ids(), vec![Screen::T1]);
        assert_eq!(stack.pending_len(), 1);

        stack.apply_pending_changes().unwrap();
        assert_eq!(stack.state_ids(), vec![Screen::T1, Screen::T2]);
    }

    //--- Pop / Clear ------------------------------------------------------

    #[test]
    fn pop_on_empty_stack_is_a_noop() {
        let mut stack = new_stack();
        stack.pop_state();
        stack.pop_state();
        stack.clear_states();

        assert!(stack.apply_pending_changes().is_ok());
        assert!(stack.is_empty());
    }

    #[test]
    fn double_pop_in_one_frame_is_tolerated() {
        let mut stack = new_stack();
        register(
            &mut stack,
            Screen::T1,
            Script {
                on_event: Some(PendingChange::Pop),
                ..Script::default()
            },
        );
        stack.push_state(Screen::T1);
        stack.apply_pending_changes().unwrap();

        // Two dismiss events queued by the same frame
        stack.pop_state();
        stack.handle_event(&key()).unwrap();

        assert!(stack.is_empty());
    }

    #[test]
    fn clear_exits_every_state_top_down() {
        let mut stack = three_layers();

        stack.clear_states();
        stack.apply_pending_changes().unwrap();

        assert!(stack.is_empty());
        assert_eq!(
            journal(&stack),
            vec!["exit T3", "drop T3", "exit T2", "drop T2", "exit T1", "drop T1"]
        );
    }

    #[test]
    fn push_then_pop_in_one_batch_builds_and_destroys() {
        let mut stack = three_layers();

        stack.push_state(Screen::T4);
        stack.pop_state();
        stack.apply_pending_changes().unwrap();

        assert_eq!(
            journal(&stack),
            vec!["new T4", "enter T4", "exit T4", "drop T4"]
        );
        assert_eq!(stack.state_ids(), vec![Screen::T1, Screen::T2, Screen::T3]);
    }

    #[test]
    fn clear_then_push_replaces_whole_stack() {
        let mut stack = three_layers();

        stack.clear_states();
        stack.push_state(Screen::T4);
        stack.apply_pending_changes().unwrap();

        assert_eq!(stack.state_ids(), vec![Screen::T4]);
    }

    //--- Registration -----------------------------------------------------

    #[test]
    fn unregistered_push_fails_and_discards_rest_of_batch() {
        let mut stack = new_stack();
        register(&mut stack, Screen::T1, Script::default());

        stack.push_state(Screen::T1);
        stack.push_state(Screen::T2);
        stack.push_state(Screen::T1);

        let result = stack.apply_pending_changes();

        assert_eq!(
            result,
            Err(StateError::UnregisteredState {
                id: "T2".to_owned()
            })
        );
        assert_eq!(stack.state_ids(), vec![Screen::T1]);
        assert_eq!(stack.pending_len(), 0);
    }

    #[test]
    fn reregistering_overwrites_factory() {
        let mut stack = new_stack();
        register(&mut stack, Screen::T1, Script::default());
        register(
            &mut stack,
            Screen::T1,
            Script {
                consume_events: true,
                ..Script::default()
            },
        );
        register(&mut stack, Screen::T2, Script::default());
        stack.push_state(Screen::T2);
        stack.push_state(Screen::T1);
        stack.apply_pending_changes().unwrap();
        reset_journal(&stack);

        stack.handle_event(&key()).unwrap();

        assert_eq!(journal(&stack), vec!["event T1"]);
    }

    #[test]
    fn register_state_uses_from_context() {
        struct Counter;

        impl FromContext<Journal> for Counter {
            fn from_context(context: &mut Context<Journal>) -> Self {
                context.data.borrow_mut().push("counter built".to_owned());
                Counter
            }
        }

        impl State<Screen, Journal> for Counter {
            fn handle_event(&mut self, _: &InputEvent, _: &mut StateContext<'_, Screen, Journal>) -> bool {
                true
            }

            fn update(&mut self, _: Duration, _: &mut StateContext<'_, Screen, Journal>) -> bool {
                true
            }

            fn draw(&self, _: &mut dyn RenderTarget, _: &Context<Journal>) {}
        }

        let mut stack = new_stack();
        stack.register_state::<Counter>(Screen::T4);
        assert!(stack.is_registered(Screen::T4));

        stack.push_state(Screen::T4);
        stack.apply_pending_changes().unwrap();

        assert_eq!(journal(&stack), vec!["counter built"]);
        assert_eq!(stack.top(), Some(Screen::T4));
    }

    //--- Shared Context ---------------------------------------------------

    #[test]
    fn states_share_context_data() {
        let mut stack = three_layers();
        stack.update(Duration::ZERO).unwrap();

        // Every layer wrote to the same journal
        assert_eq!(journal(&stack).len(), 3);
        stack.context_mut().set_surface_size(SurfaceSize::new(800, 600));
        assert_eq!(stack.context().surface_size(), SurfaceSize::new(800, 600));
    }
}
