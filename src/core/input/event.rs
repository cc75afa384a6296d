//=========================================================================
// Input Events
//
// Engine-side representation of the input a state receives in
// `State::handle_event`.
//
// The platform layer converts winit events into these types, so states
// never depend on the windowing library.
//
// Event Flow:
// ```text
// Platform Layer (winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    StateStack::handle_event (top-down, short-circuit)
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::hash::{Hash, Hasher};

//=== External Dependencies ===============================================

use bitflags::bitflags;

//=== MouseButton =========================================================

/// Physical mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    /// Side, thumb and macro buttons.
    Other,
}

//=== KeyCode =============================================================

/// Physical keyboard key (location, not character).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Special Keys -----------------------------------------------------
    Space,
    Enter,
    Escape,
    Tab,
    Backspace,
    Delete,
    Backquote,

    /// Any key the platform reported that is not listed above.
    Unidentified,
}

//=== Modifiers ===========================================================

bitflags! {
    /// Modifier keys held while a key or button event happened.
    ///
    /// Left and right variants are not distinguished. On macOS, Command
    /// maps to `CTRL` and Option to `ALT`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT = 1;
        const CTRL = 1 << 1;
        const ALT = 1 << 2;
    }
}

impl Modifiers {
    /// No modifier held.
    pub const NONE: Self = Self::empty();
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

//=== InputEvent ==========================================================

/// Input delivered to states.
///
/// # Equality & Hashing Semantics
///
/// Events compare by kind and payload, except the continuous kinds
/// (`MouseMoved`, `Resized`) which compare equal regardless of their
/// coordinates. The platform buffer relies on this to keep only the
/// latest value of each continuous kind per frame.
///
/// ```text
/// KeyDown{A, CTRL} == KeyDown{A, CTRL}       ✓
/// KeyDown{A, CTRL} == KeyDown{A, SHIFT}      ✗
/// MouseMoved{..}   == MouseMoved{..}         ✓
/// ```
#[derive(Debug, Clone)]
pub enum InputEvent {
    KeyDown { key: KeyCode, modifiers: Modifiers },
    KeyUp { key: KeyCode, modifiers: Modifiers },
    MouseButtonDown { button: MouseButton, modifiers: Modifiers },
    MouseButtonUp { button: MouseButton, modifiers: Modifiers },

    /// Cursor position in window pixels, top-left origin.
    MouseMoved { x: f32, y: f32 },

    /// New drawable size of the window in pixels.
    Resized { width: u32, height: u32 },

    FocusLost,
    FocusGained,

    /// Platform event with no engine equivalent.
    Unidentified,
}

impl InputEvent {
    /// Shorthand for an unmodified key press.
    pub fn key_down(key: KeyCode) -> Self {
        Self::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// Shorthand for an unmodified key release.
    pub fn key_up(key: KeyCode) -> Self {
        Self::KeyUp {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    /// The key pressed by this event, if it is a key press.
    pub fn pressed_key(&self) -> Option<KeyCode> {
        match self {
            Self::KeyDown { key, .. } => Some(*key),
            _ => None,
        }
    }

    /// The key released by this event, if it is a key release.
    pub fn released_key(&self) -> Option<KeyCode> {
        match self {
            Self::KeyUp { key, .. } => Some(*key),
            _ => None,
        }
    }

    /// Continuous events are coalesced per frame; discrete ones are not.
    pub fn is_continuous(&self) -> bool {
        matches!(self, Self::MouseMoved { .. } | Self::Resized { .. })
    }
}

//--- Trait Implementations -----------------------------------------------

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        use InputEvent::*;
        match (self, other) {
            (KeyDown { key: a, modifiers: ma }, KeyDown { key: b, modifiers: mb })
            | (KeyUp { key: a, modifiers: ma }, KeyUp { key: b, modifiers: mb }) => {
                a == b && ma == mb
            }
            (
                MouseButtonDown { button: a, modifiers: ma },
                MouseButtonDown { button: b, modifiers: mb },
            )
            | (
                MouseButtonUp { button: a, modifiers: ma },
                MouseButtonUp { button: b, modifiers: mb },
            ) => a == b && ma == mb,
            // Continuous kinds: payload ignored
            (MouseMoved { .. }, MouseMoved { .. }) => true,
            (Resized { .. }, Resized { .. }) => true,
            (FocusLost, FocusLost) | (FocusGained, FocusGained) => true,
            (Unidentified, Unidentified) => true,
            _ => false,
        }
    }
}

impl Eq for InputEvent {}

/// Consistent with `PartialEq`: continuous payloads are not hashed.
impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Self::KeyDown { key, modifiers } | Self::KeyUp { key, modifiers } => {
                key.hash(state);
                modifiers.hash(state);
            }
            Self::MouseButtonDown { button, modifiers }
            | Self::MouseButtonUp { button, modifiers } => {
                button.hash(state);
                modifiers.hash(state);
            }
            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
