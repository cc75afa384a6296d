//=========================================================================
// Platform Subsystem
//
// Bridges winit (OS-level events) with the application loop.
//
// Architecture:
// ```text
//  Main Thread
//  ┌────────────────────────────────────────────────────────┐
//  │  winit Event Loop                                      │
//  │   ↓                                                    │
//  │  InputProcessor   (winit → InputEvent, modifiers)      │
//  │   ↓                                                    │
//  │  InputBuffer      (discrete in order, continuous last) │
//  │   ↓                                                    │
//  │  RedrawRequested  (frame boundary)                     │
//  │   ├─ flush → Sender<PlatformEvent>                     │
//  │   └─ FrameDriver::frame() → Continue | Exit            │
//  └────────────────────────────────────────────────────────┘
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: all input buffered since the
//   previous boundary is sent as one batch, then the driver runs
// - **Sticky modifiers**: modifier state persists until winit reports a
//   change
// - **Graceful channel disconnect**: a dropped receiver is logged and the
//   input discarded, the window stays closable
// - **Main thread requirement**: winit mandates the main thread on
//   macOS/iOS, so this runs on the thread that called `Application::run()`
//
//=========================================================================

//=== Submodules ==========================================================

mod input_buffer;
mod input_processor;

//=== External Crates =====================================================

use crossbeam_channel::{Sender, TrySendError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::LogicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{FrameDriver, PlatformError, PlatformEvent, TickControl};
use input_buffer::InputBuffer;
use input_processor::InputProcessor;

//=== WindowSettings ======================================================

/// Attributes of the window created in `resumed()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowSettings {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

//=== Platform ============================================================

/// Window owner, input aggregator and frame pacer.
///
/// Runs on the main thread. Input is pushed into the channel, then the
/// driver is asked to run one frame; the driver drains the channel on the
/// same thread.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(sender, settings, driver)`
/// 2. **Execution**: `platform.run()` blocks inside the winit loop
/// 3. **Frames**: every `RedrawRequested` flushes input and calls the driver
/// 4. **Shutdown**: window closed or driver returned `Exit`
pub(crate) struct Platform<F: FrameDriver> {
    /// OS window handle (None until `resumed()` called).
    window: Option<Window>,

    settings: WindowSettings,

    /// Buffers discrete/continuous input until frame boundary.
    buffer: InputBuffer,

    event_sender: Sender<PlatformEvent>,

    input_processor: InputProcessor,

    driver: F,
}

impl<F: FrameDriver> Platform<F> {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens lazily in `resumed()`.
    pub fn new(event_sender: Sender<PlatformEvent>, settings: WindowSettings, driver: F) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            window: None,
            settings,
            buffer: InputBuffer::new(),
            event_sender,
            input_processor: InputProcessor::new(),
            driver,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the winit event loop until the window closes or the driver
    /// asks to exit, then hands the driver back.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails while running.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS winit requirement).
    pub fn run(mut self) -> Result<F, PlatformError> {
        debug!(target: "platform", "Starting winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))?;

        info!(target: "platform", "Event loop exited");
        Ok(self.driver)
    }

    //--- Frame Boundary ---------------------------------------------------

    /// Flushes input and runs one driver frame.
    fn frame_boundary(&mut self) -> TickControl {
        self.flush_input_buffer();
        self.driver.frame()
    }

    /// Sends the buffered input as one [`PlatformEvent::Inputs`].
    ///
    /// Empty buffers are not sent. The receiver is drained on this same
    /// thread, so a full or disconnected channel drops the events with a
    /// warning instead of blocking.
    fn flush_input_buffer(&mut self) {
        if let Some((discrete, continuous)) = self.buffer.drain() {
            let discrete_count = discrete.len();
            let continuous_count = continuous.len();

            trace!(
                target: "platform::input",
                "Flushing {} discrete + {} continuous events",
                discrete_count,
                continuous_count
            );

            match self
                .event_sender
                .try_send(PlatformEvent::Inputs { discrete, continuous })
            {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => warn!(
                    target: "platform::input",
                    "Channel full, dropping {} events",
                    discrete_count + continuous_count
                ),
                Err(TrySendError::Disconnected(_)) => warn!(
                    target: "platform::input",
                    "Channel disconnected, dropping {} events",
                    discrete_count + continuous_count
                ),
            }
        }
    }

    fn close(&mut self, event_loop: &ActiveEventLoop) {
        let _ = self.event_sender.try_send(PlatformEvent::WindowClosed);
        event_loop.exit();
    }
}

//=== Winit Integration ===================================================

impl<F: FrameDriver> ApplicationHandler for Platform<F> {
    /// Creates the window if it doesn't exist yet. On mobile, this may be
    /// called multiple times (suspend/resume cycle).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.settings.title.clone())
            .with_inner_size(LogicalSize::new(self.settings.width, self.settings.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    window.inner_size().width,
                    window.inner_size().height,
                    window.scale_factor()
                );
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.close(event_loop);
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.close(event_loop);
            }

            WindowEvent::ModifiersChanged(state) => {
                trace!(target: "platform::input", "Modifiers changed: {:?}", state);
                self.input_processor.update_modifiers(state.state());
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = self
                    .input_processor
                    .process_mouse_move(position.x as f32, position.y as f32);
                self.buffer.push(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                match self.input_processor.process_key_event(key_event) {
                    Some(event) => self.buffer.push(event),
                    None => trace!(target: "platform::input", "Repeat or unmapped key ignored"),
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = self.input_processor.process_mouse_button(*button, *state);
                self.buffer.push(event);
            }

            WindowEvent::Resized(size) => {
                self.buffer.push(self.input_processor.process_resize(*size));
            }

            WindowEvent::Focused(focused) => {
                self.buffer.push(self.input_processor.process_focus(*focused));
            }

            WindowEvent::RedrawRequested => match self.frame_boundary() {
                TickControl::Exit => {
                    info!(target: "platform", "Frame driver requested exit");
                    event_loop.exit();
                }
                TickControl::Continue => {
                    if let Some(window) = &self.window {
                        window.request_redraw();
                    }
                }
            },

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::{InputEvent, KeyCode};
    use crossbeam_channel::{unbounded, Receiver};

    /// Counts frames and exits after `exit_after` of them.
    struct CountingDriver {
        frames: usize,
        exit_after: usize,
    }

    impl FrameDriver for CountingDriver {
        fn frame(&mut self) -> TickControl {
            self.frames += 1;
            if self.frames >= self.exit_after {
                TickControl::Exit
            } else {
                TickControl::Continue
            }
        }
    }

    fn settings() -> WindowSettings {
        WindowSettings {
            title: "Test".into(),
            width: 640,
            height: 480,
        }
    }

    fn platform(exit_after: usize) -> (Platform<CountingDriver>, Receiver<PlatformEvent>) {
        let (tx, rx) = unbounded();
        let driver = CountingDriver {
            frames: 0,
            exit_after,
        };
        (Platform::new(tx, settings(), driver), rx)
    }

    #[test]
    fn window_is_created_lazily() {
        let (platform, _rx) = platform(1);
        assert!(platform.window.is_none());
    }

    #[test]
    fn flush_empty_buffer_is_noop() {
        let (mut platform, rx) = platform(1);

        platform.flush_input_buffer();

        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn flush_sends_buffered_events() {
        let (mut platform, rx) = platform(1);
        platform.buffer.push(InputEvent::key_down(KeyCode::Space));
        platform.buffer.push(InputEvent::MouseMoved { x: 3.0, y: 4.0 });

        platform.flush_input_buffer();

        match rx.try_recv() {
            Ok(PlatformEvent::Inputs { discrete, continuous }) => {
                assert_eq!(discrete.len(), 1);
                assert_eq!(continuous.len(), 1);
            }
            other => panic!("Expected Inputs event, got {:?}", other),
        }
        assert!(rx.try_recv().is_err(), "Second message should not exist");
    }

    #[test]
    fn flush_handles_disconnected_channel() {
        let (mut platform, rx) = platform(1);
        platform.buffer.push(InputEvent::key_down(KeyCode::Space));
        drop(rx);

        platform.flush_input_buffer();
        assert!(platform.buffer.is_empty());
    }

    #[test]
    fn flush_drops_events_when_channel_is_full() {
        let (tx, rx) = crossbeam_channel::bounded(1);
        let driver = CountingDriver {
            frames: 0,
            exit_after: 1,
        };
        let mut platform = Platform::new(tx, settings(), driver);

        platform.buffer.push(InputEvent::key_down(KeyCode::KeyA));
        platform.flush_input_buffer();
        platform.buffer.push(InputEvent::key_down(KeyCode::KeyB));
        platform.flush_input_buffer();

        assert_eq!(rx.len(), 1);
        assert!(platform.buffer.is_empty());
    }

    #[test]
    fn frame_boundary_flushes_before_driving() {
        let (mut platform, rx) = platform(2);
        platform.buffer.push(InputEvent::key_down(KeyCode::KeyA));

        assert_eq!(platform.frame_boundary(), TickControl::Continue);
        assert!(matches!(rx.try_recv(), Ok(PlatformEvent::Inputs { .. })));

        assert_eq!(platform.frame_boundary(), TickControl::Exit);
        assert_eq!(platform.driver.frames, 2);
    }
}
