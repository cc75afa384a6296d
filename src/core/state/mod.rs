//=========================================================================
// State System
//=========================================================================
//
// Layered application states (title, menu, game, pause, settings...).
//
// Architecture:
//   StateStack
//     ├─ stack: Vec<(I, Box<dyn State>)>     bottom → top
//     ├─ pending: PendingQueue<I>            push / pop / clear
//     ├─ factories: HashMap<I, StateFactory>
//     └─ context: Context<D>                 shared by every state
//
// Flow:
//   handle_event() → top-down, stop at first `false` → apply pending
//   update()       → top-down, stop at first `false` → apply pending
//   draw()         → bottom-up, every state, no apply
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};
use std::time::Duration;

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;
use crate::core::render::{RenderTarget, SurfaceSize};
use crate::core::resources::{Font, ResourceHolder, Texture};

//=== Module Declarations =================================================

mod pending;
mod stack;

//=== Public API ==========================================================

pub use pending::{PendingChange, PendingQueue};
pub use stack::StateStack;

//=== State Id Trait ======================================================

/// Marker trait for state identifiers.
///
/// Typically implemented by a small game-specific enum.
pub trait StateId: Clone + Copy + Eq + Hash + Debug + 'static {}

//=== Context =============================================================

/// Data shared by every live state.
///
/// Owned by the [`StateStack`] and lent to states for the duration of
/// each call. States must not assume exclusive access to `data`: a state
/// pushed later sees whatever earlier states left in it.
#[derive(Debug)]
pub struct Context<D> {
    pub textures: ResourceHolder<Texture>,
    pub fonts: ResourceHolder<Font>,

    /// Game-defined shared data (player bindings, scores, settings...).
    pub data: D,

    surface: SurfaceSize,
}

impl<D> Context<D> {
    pub fn new(surface: SurfaceSize, data: D) -> Self {
        Self {
            textures: ResourceHolder::new(),
            fonts: ResourceHolder::new(),
            data,
            surface,
        }
    }

    /// Size of the drawing surface.
    pub fn surface_size(&self) -> SurfaceSize {
        self.surface
    }

    pub fn set_surface_size(&mut self, surface: SurfaceSize) {
        self.surface = surface;
    }
}

//=== StateContext ========================================================

/// What a state sees while handling input or updating: the shared
/// [`Context`] plus the stack's request queue.
///
/// Requests are recorded only; the stack applies them after the current
/// traversal has finished.
pub struct StateContext<'a, I: StateId, D> {
    context: &'a mut Context<D>,
    pending: &'a mut PendingQueue<I>,
}

impl<'a, I: StateId, D> StateContext<'a, I, D> {
    pub(crate) fn new(context: &'a mut Context<D>, pending: &'a mut PendingQueue<I>) -> Self {
        Self { context, pending }
    }

    /// Requests that the state registered under `id` be pushed.
    pub fn push_state(&mut self, id: I) {
        self.pending.push(PendingChange::Push(id));
    }

    /// Requests removal of the top state.
    pub fn pop_state(&mut self) {
        self.pending.push(PendingChange::Pop);
    }

    /// Requests removal of every state.
    pub fn clear_states(&mut self) {
        self.pending.push(PendingChange::Clear);
    }

    /// Records an arbitrary change.
    pub fn request(&mut self, change: PendingChange<I>) {
        self.pending.push(change);
    }
}

impl<I: StateId, D> Deref for StateContext<'_, I, D> {
    type Target = Context<D>;

    fn deref(&self) -> &Context<D> {
        self.context
    }
}

impl<I: StateId, D> DerefMut for StateContext<'_, I, D> {
    fn deref_mut(&mut self) -> &mut Context<D> {
        self.context
    }
}

//=== State Trait =========================================================

/// One logical screen of the application.
///
/// `handle_event` and `update` return whether the state below should
/// receive the same call. Returning `false` makes this state opaque for
/// that call; an overlay such as a pause menu returns `false` from both to
/// freeze the game underneath, while still letting it draw.
///
/// # Minimal Implementation
///
/// ```rust
/// # use std::time::Duration;
/// # use stagecraft::prelude::*;
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Screen { Title }
/// # impl StateId for Screen {}
/// struct Title;
///
/// impl State<Screen, ()> for Title {
///     fn handle_event(&mut self, event: &InputEvent, ctx: &mut StateContext<'_, Screen, ()>) -> bool {
///         if event.pressed_key().is_some() {
///             ctx.pop_state();
///         }
///         false
///     }
///
///     fn update(&mut self, _dt: Duration, _ctx: &mut StateContext<'_, Screen, ()>) -> bool {
///         true
///     }
///
///     fn draw(&self, _target: &mut dyn RenderTarget, _context: &Context<()>) {}
/// }
/// ```
pub trait State<I: StateId, D> {
    /// Called right after the state has been built and put on top.
    fn on_enter(&mut self, _ctx: &mut StateContext<'_, I, D>) {}

    /// Called right before the state is removed and dropped.
    fn on_exit(&mut self, _context: &mut Context<D>) {}

    fn handle_event(&mut self, event: &InputEvent, ctx: &mut StateContext<'_, I, D>) -> bool;

    fn update(&mut self, dt: Duration, ctx: &mut StateContext<'_, I, D>) -> bool;

    fn draw(&self, target: &mut dyn RenderTarget, context: &Context<D>);
}

//=== FromContext Trait ===================================================

/// Construction from the shared context, used by
/// [`StateStack::register_state`].
pub trait FromContext<D>: Sized {
    fn from_context(context: &mut Context<D>) -> Self;
}

//=== StateError ==========================================================

/// Integrity failure of the state stack.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    /// A push was applied for an id that has no registered factory.
    #[error("no factory registered for state {id}")]
    UnregisteredState { id: String },
}

impl StateError {
    pub(crate) fn unregistered<I: StateId>(id: I) -> Self {
        Self::UnregisteredState {
            id: format!("{:?}", id),
        }
    }
}
