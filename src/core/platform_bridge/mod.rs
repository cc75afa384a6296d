//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the windowing backend and the application loop.
//
// Components:
// - `interface`: events, errors and the `FrameDriver` hook
// - `event_collector`: loop-side draining of platform events
//
// The backend pushes `PlatformEvent`s into a crossbeam channel and then
// calls `FrameDriver::frame`; the driver drains the channel through an
// `EventCollector`. Both ends live on the same thread.
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::EventCollector;
pub(crate) use interface::{FrameDriver, PlatformEvent, TickControl};

//=== Public API ==========================================================

pub use interface::PlatformError;
