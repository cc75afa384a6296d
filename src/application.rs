//=========================================================================
// Application
//
// Entry point: configures the window and timing, owns the state stack
// until `run()` hands it to the runtime.
//
// Architecture:
// ```text
//     ApplicationBuilder ──build(data)──> Application ──run()──> [Runtime]
//         │                                 │
//         ├─ from_config()                  ├─ init(|stack| ...)
//         ├─ with_tps()                     └─ opens window, drives frames
//         ├─ with_title()                      blocks until exit
//         ├─ with_window_size()
//         ├─ with_channel_capacity()
//         └─ with_statistics()
// ```
//
//=========================================================================

//=== Submodules ==========================================================

mod clock;
mod runtime;
mod statistics;

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Receiver, Sender};
use log::info;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::config::AppConfig;
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::render::SurfaceSize;
use crate::core::state::{Context, StateError, StateId, StateStack};
use crate::platform::{Platform, WindowSettings};
use runtime::Runtime;

//=== Public API ==========================================================

pub use clock::FixedTimestep;
pub use statistics::{FrameStatistics, STATISTICS_FONT};

//=== AppError ============================================================

/// Failure that ended [`Application::run`].
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    State(#[from] StateError),
}

//=== ApplicationBuilder ==================================================

/// Builder for configuring and constructing an [`Application`].
///
/// # Default Values
///
/// - **TPS**: 60.0 (state stack updates per second)
/// - **Window**: "Stagecraft", 640x480
/// - **Channel capacity**: 128 batches
/// - **Statistics overlay**: off
///
/// # Examples
///
/// ```no_run
/// use stagecraft::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Screen { Title }
/// impl StateId for Screen {}
///
/// ApplicationBuilder::<Screen, ()>::new()
///     .with_tps(120.0)
///     .with_title("States")
///     .build(())
///     .init(|stack| stack.push_state(Screen::Title))
///     .run()
///     .unwrap();
/// ```
pub struct ApplicationBuilder<I: StateId, D> {
    tps: f64,
    title: String,
    width: u32,
    height: u32,
    channel_capacity: usize,
    show_statistics: bool,
    _phantom: std::marker::PhantomData<(I, D)>,
}

impl<I: StateId, D> ApplicationBuilder<I, D> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::from_config(&AppConfig::default())
    }

    /// Creates a builder from a loaded configuration.
    ///
    /// # Panics
    ///
    /// Panics on the values [`AppConfig::validate`] rejects.
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            tps: 60.0,
            title: String::new(),
            width: 1,
            height: 1,
            channel_capacity: 1,
            show_statistics: false,
            _phantom: std::marker::PhantomData,
        }
        .with_tps(config.timing.ticks_per_second)
        .with_title(config.window.title.clone())
        .with_window_size(config.window.width, config.window.height)
        .with_channel_capacity(config.runtime.channel_capacity)
        .with_statistics(config.runtime.show_statistics)
    }

    /// Sets the fixed update rate of the state stack.
    ///
    /// Default: 60.0
    ///
    /// # Panics
    ///
    /// Panics if `tps <= 0.0`.
    pub fn with_tps(mut self, tps: f64) -> Self {
        assert!(tps > 0.0, "TPS must be positive, got {}", tps);
        self.tps = tps;
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the initial window size in logical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is zero.
    pub fn with_window_size(mut self, width: u32, height: u32) -> Self {
        assert!(width > 0 && height > 0, "Window size must be non-zero");
        self.width = width;
        self.height = height;
        self
    }

    /// Sets the capacity of the platform event channel.
    ///
    /// Default: 128
    ///
    /// # Panics
    ///
    /// Panics if `capacity == 0`.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Toggles the frames-per-second overlay.
    pub fn with_statistics(mut self, show: bool) -> Self {
        self.show_statistics = show;
        self
    }

    /// Builds the application around the shared game data `data`.
    pub fn build(self, data: D) -> Application<I, D> {
        info!(
            target: "app",
            "Building application (TPS: {}, window: {}x{}, channel: {})",
            self.tps,
            self.width,
            self.height,
            self.channel_capacity
        );

        let surface = SurfaceSize::new(self.width, self.height);

        Application {
            stack: StateStack::new(Context::new(surface, data)),
            settings: WindowSettings {
                title: self.title,
                width: self.width,
                height: self.height,
            },
            tps: self.tps,
            channel_capacity: self.channel_capacity,
            show_statistics: self.show_statistics,
        }
    }
}

impl<I: StateId, D> Default for ApplicationBuilder<I, D> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Application =========================================================

/// A configured application, ready to register states and run.
pub struct Application<I: StateId, D> {
    stack: StateStack<I, D>,
    settings: WindowSettings,
    tps: f64,
    channel_capacity: usize,
    show_statistics: bool,
}

impl<I: StateId, D> Application<I, D> {
    //--- Initialization ---------------------------------------------------

    /// Gives mutable access to the state stack before running: register
    /// states, load resources into the context, push the first state.
    pub fn init<F>(mut self, init_fn: F) -> Self
    where
        F: FnOnce(&mut StateStack<I, D>),
    {
        info!(target: "app", "Initializing application");
        init_fn(&mut self.stack);
        self
    }

    pub fn stack(&self) -> &StateStack<I, D> {
        &self.stack
    }

    pub fn stack_mut(&mut self) -> &mut StateStack<I, D> {
        &mut self.stack
    }

    //--- Execution --------------------------------------------------------

    /// Opens the window and drives frames until the stack empties or the
    /// window closes.
    ///
    /// # Errors
    ///
    /// [`AppError::Platform`] if the event loop cannot run,
    /// [`AppError::State`] if the stack hit an integrity failure.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS winit requirement).
    pub fn run(self) -> Result<(), AppError> {
        info!(target: "app", "Starting application (TPS: {})", self.tps);

        let (tx, rx): (Sender<PlatformEvent>, Receiver<PlatformEvent>) =
            bounded(self.channel_capacity);

        let runtime = Runtime::new(
            self.stack,
            rx,
            FixedTimestep::from_tps(self.tps),
            self.show_statistics,
        );
        let platform = Platform::new(tx, self.settings, runtime);

        let runtime = platform.run()?;

        if let Some(e) = runtime.into_failure() {
            return Err(e.into());
        }

        info!(target: "app", "Application shutdown complete");
        Ok(())
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
    }

    impl StateId for Screen {}

    type Builder = ApplicationBuilder<Screen, ()>;

    //--- ApplicationBuilder -----------------------------------------------

    #[test]
    fn builder_defaults() {
        let builder = Builder::new();
        assert_eq!(builder.tps, 60.0);
        assert_eq!(builder.title, "Stagecraft");
        assert_eq!((builder.width, builder.height), (640, 480));
        assert_eq!(builder.channel_capacity, 128);
        assert!(!builder.show_statistics);
    }

    #[test]
    fn builder_from_config() {
        let config = AppConfig::from_toml_str(
            "[window]\ntitle = \"States\"\n[timing]\nticks_per_second = 30.0\n[runtime]\nshow_statistics = true\n",
        )
        .unwrap();

        let builder = Builder::from_config(&config);

        assert_eq!(builder.title, "States");
        assert_eq!(builder.tps, 30.0);
        assert!(builder.show_statistics);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_zero() {
        Builder::new().with_tps(0.0);
    }

    #[test]
    #[should_panic(expected = "TPS must be positive")]
    fn builder_with_tps_panics_on_negative() {
        Builder::new().with_tps(-60.0);
    }

    #[test]
    #[should_panic(expected = "Channel capacity must be positive")]
    fn builder_with_channel_capacity_panics_on_zero() {
        Builder::new().with_channel_capacity(0);
    }

    #[test]
    #[should_panic(expected = "Window size must be non-zero")]
    fn builder_with_window_size_panics_on_zero() {
        Builder::new().with_window_size(0, 480);
    }

    #[test]
    fn builder_fluent_api_chaining() {
        let app = Builder::new()
            .with_tps(120.0)
            .with_title("States")
            .with_window_size(800, 600)
            .with_channel_capacity(256)
            .with_statistics(true)
            .build(());

        assert_eq!(app.tps, 120.0);
        assert_eq!(app.channel_capacity, 256);
        assert!(app.show_statistics);
        assert_eq!(app.settings.title, "States");
        assert_eq!(
            app.stack().context().surface_size(),
            SurfaceSize::new(800, 600)
        );
    }

    //--- Application ------------------------------------------------------

    #[test]
    fn init_gives_access_to_stack() {
        let app = Builder::new().build(()).init(|stack| {
            stack.push_state(Screen::Title);
        });

        assert_eq!(app.stack().pending_len(), 1);
        assert!(app.stack().is_empty());
    }

    #[test]
    fn app_error_wraps_state_error() {
        let err: AppError = StateError::UnregisteredState {
            id: "Title".into(),
        }
        .into();

        assert!(matches!(err, AppError::State(_)));
        assert_eq!(err.to_string(), "no factory registered for state Title");
    }
}
