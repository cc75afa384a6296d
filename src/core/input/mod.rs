//=========================================================================
// Input
//=========================================================================
//
// Platform-independent input events handed to states.
//
//=========================================================================

pub mod event;

pub use event::{InputEvent, KeyCode, Modifiers, MouseButton};
