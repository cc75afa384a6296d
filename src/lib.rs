//=========================================================================
// Stagecraft — Library Root
//
// A layered application state stack and a 2D scene graph.
//
// Responsibilities:
// - Expose the application entry point (`ApplicationBuilder`)
// - Expose the core systems (states, scene graph, rendering contract,
//   resources, input)
// - Keep the windowing backend (`platform`) hidden from users
//
// Typical usage:
// ```no_run
// use stagecraft::prelude::*;
//
// ApplicationBuilder::<MyScreen, MyData>::new()
//     .build(MyData::default())
//     .init(|stack| {
//         stack.register_state::<TitleState>(MyScreen::Title);
//         stack.push_state(MyScreen::Title);
//     })
//     .run()?;
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` holds the platform-independent systems; `config` the TOML
// settings the builder can start from.
//
pub mod config;
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` owns the winit event loop and window. `application` wires
// it to the state stack.
//
mod application;
mod platform;

//--- Public Exports ------------------------------------------------------

pub use application::{
    AppError, Application, ApplicationBuilder, FixedTimestep, FrameStatistics, STATISTICS_FONT,
};
pub use config::{AppConfig, ConfigError};
pub use crate::core::platform_bridge::PlatformError;
