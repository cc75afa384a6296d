//=========================================================================
// Core Systems
//
// Platform-independent building blocks of an application.
//
// Components:
// - `state`: layered state stack with deferred push / pop / clear
// - `scene`: arena scene graph, node contents and commands
// - `render`: transforms and the `RenderTarget` contract
// - `resources`: texture and font holders keyed by `ResourceId`
// - `input`: engine input events handed to states
// - `platform_bridge`: contract between the windowing backend and the
//   application loop (crate-internal)
//
// Nothing in here touches the OS; the `platform` module is the only
// place that does.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod input;
pub mod render;
pub mod resources;
pub mod scene;
pub mod state;

pub(crate) mod platform_bridge;
