//=========================================================================
// Input Processor
//=========================================================================
//
// Translates winit window events into engine `InputEvent`s so states never
// see windowing types.
//
//   winit WindowEvent → InputProcessor → InputEvent → InputBuffer
//
// Modifiers arrive as their own `ModifiersChanged` event; the processor
// remembers the last set and stamps it on key and button events. Auto
// repeat and keys outside `KeyCode` yield `None`.
//
//=========================================================================

//=== External Dependencies ===============================================

use winit::{
    dpi::PhysicalSize,
    event::{ElementState, KeyEvent, MouseButton as WinitMouseButton},
    keyboard::{KeyCode as WinitKeyCode, ModifiersState, PhysicalKey},
};

//=== Internal Dependencies ===============================================

use crate::core::input::{InputEvent, KeyCode, Modifiers, MouseButton};

//=== InputProcessor ======================================================

pub(crate) struct InputProcessor {
    modifiers: Modifiers,
}

impl InputProcessor {
    pub(crate) fn new() -> Self {
        Self {
            modifiers: Modifiers::NONE,
        }
    }

    pub(crate) fn update_modifiers(&mut self, state: ModifiersState) {
        self.modifiers = state.into();
    }

    #[cfg(test)]
    pub(crate) fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    //--- Keyboard And Mouse -----------------------------------------------

    pub(crate) fn process_key_event(&self, key_event: &KeyEvent) -> Option<InputEvent> {
        if key_event.repeat {
            return None;
        }
        let PhysicalKey::Code(code) = key_event.physical_key else {
            return None;
        };
        self.key(code.into(), key_event.state)
    }

    pub(crate) fn process_mouse_button(&self, button: WinitMouseButton, state: ElementState) -> InputEvent {
        let (button, modifiers) = (button.into(), self.modifiers);
        if state.is_pressed() {
            InputEvent::MouseButtonDown { button, modifiers }
        } else {
            InputEvent::MouseButtonUp { button, modifiers }
        }
    }

    pub(crate) fn process_mouse_move(&self, x: f32, y: f32) -> InputEvent {
        InputEvent::MouseMoved { x, y }
    }

    //--- Window -----------------------------------------------------------

    pub(crate) fn process_resize(&self, size: PhysicalSize<u32>) -> InputEvent {
        InputEvent::Resized {
            width: size.width,
            height: size.height,
        }
    }

    pub(crate) fn process_focus(&self, focused: bool) -> InputEvent {
        match focused {
            true => InputEvent::FocusGained,
            false => InputEvent::FocusLost,
        }
    }

    /// `None` for `KeyCode::Unidentified`.
    fn key(&self, key: KeyCode, state: ElementState) -> Option<InputEvent> {
        if key == KeyCode::Unidentified {
            return None;
        }
        let modifiers = self.modifiers;
        Some(if state.is_pressed() {
            InputEvent::KeyDown { key, modifiers }
        } else {
            InputEvent::KeyUp { key, modifiers }
        })
    }
}

//=========================================================================
// Winit Conversions
//=========================================================================

impl From<ModifiersState> for Modifiers {
    fn from(state: ModifiersState) -> Self {
        let mut modifiers = Modifiers::NONE;
        modifiers.set(Modifiers::SHIFT, state.shift_key());
        modifiers.set(Modifiers::CTRL, state.control_key());
        modifiers.set(Modifiers::ALT, state.alt_key());
        modifiers
    }
}

/// Every engine key has a winit key of the same name.
macro_rules! same_named_keys {
    ($code:expr => $($key:ident)*) => {
        match $code {
            $(WinitKeyCode::$key => KeyCode::$key,)*
            _ => KeyCode::Unidentified,
        }
    };
}

impl From<WinitKeyCode> for KeyCode {
    fn from(code: WinitKeyCode) -> Self {
        same_named_keys!(code =>
            Digit0 Digit1 Digit2 Digit3 Digit4 Digit5 Digit6 Digit7 Digit8 Digit9
            KeyA KeyB KeyC KeyD KeyE KeyF KeyG KeyH KeyI KeyJ KeyK KeyL KeyM
            KeyN KeyO KeyP KeyQ KeyR KeyS KeyT KeyU KeyV KeyW KeyX KeyY KeyZ
            ArrowUp ArrowDown ArrowLeft ArrowRight
            Space Enter Escape Tab Backspace Delete Backquote
        )
    }
}

impl From<WinitMouseButton> for MouseButton {
    fn from(button: WinitMouseButton) -> Self {
        match button {
            WinitMouseButton::Left => MouseButton::Left,
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Other,
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
