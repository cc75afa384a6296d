//=========================================================================
// Platform Bridge Interface
//=========================================================================
//
// Platform-to-loop interface types (events, control flow and errors).
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::input::InputEvent;

//=== PlatformEvent =======================================================

/// Events sent from the platform to the application loop.
#[derive(Debug, Clone)]
pub(crate) enum PlatformEvent {
    /// Input buffered since the previous frame boundary.
    Inputs {
        discrete: Vec<InputEvent>,
        continuous: Vec<InputEvent>,
    },

    /// Window close requested.
    WindowClosed,
}

//=== TickControl =========================================================

/// Loop control signal returned by every frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TickControl {
    Continue,
    Exit,
}

//=== FrameDriver =========================================================

/// Called by the platform once per frame boundary, after input has been
/// flushed into the channel.
pub(crate) trait FrameDriver {
    fn frame(&mut self) -> TickControl;
}

//=== PlatformError =======================================================

/// Windowing backend failures.
#[derive(Debug, Error)]
pub enum PlatformError {
    /// Event loop creation failed (OS-level issue).
    #[error("event loop creation failed: {0}")]
    EventLoopCreation(String),

    /// Event loop execution error.
    #[error("event loop error: {0}")]
    EventLoopExecution(String),
}

//=========================================================================
// Unit Tests
//=========================================================================
