//=========================================================================
// Runtime
//=========================================================================
//
// Per-frame driver of the state stack, called by the platform at every
// frame boundary.
//
// Frame:
//   advance(elapsed)
//     └─ while a fixed step is due:
//          collect platform events → handle_event (each)
//          update(step)
//          stack empty? → Exit
//     └─ statistics.record(elapsed)
//     └─ clear, draw every state, draw overlay
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::{Duration, Instant};

use crossbeam_channel::Receiver;
use log::{error, info, trace};

//=== Internal Dependencies ===============================================

use super::clock::FixedTimestep;
use super::statistics::FrameStatistics;
use crate::core::input::InputEvent;
use crate::core::platform_bridge::{EventCollector, FrameDriver, PlatformEvent, TickControl};
use crate::core::render::{Color, DrawList, RenderTarget, SurfaceSize};
use crate::core::state::{StateError, StateId, StateStack};

//=== Runtime =============================================================

pub(crate) struct Runtime<I: StateId, D> {
    stack: StateStack<I, D>,
    collector: EventCollector,
    timestep: FixedTimestep,
    statistics: Option<FrameStatistics>,
    draw_list: DrawList,
    last_frame: Option<Instant>,
    failure: Option<StateError>,
}

impl<I: StateId, D> Runtime<I, D> {
    pub(crate) fn new(
        stack: StateStack<I, D>,
        receiver: Receiver<PlatformEvent>,
        timestep: FixedTimestep,
        show_statistics: bool,
    ) -> Self {
        let surface = stack.context().surface_size();

        Self {
            stack,
            collector: EventCollector::new(receiver),
            timestep,
            statistics: show_statistics.then(FrameStatistics::new),
            draw_list: DrawList::new(surface),
            last_frame: None,
            failure: None,
        }
    }

    //--- Frame ------------------------------------------------------------

    /// Runs every fixed step due after `elapsed`, then renders once.
    pub(crate) fn advance(&mut self, elapsed: Duration) -> TickControl {
        self.timestep.advance(elapsed);

        while let Some(step) = self.timestep.next_step() {
            if self.process_input() == TickControl::Exit {
                return TickControl::Exit;
            }

            if let Err(e) = self.stack.update(step) {
                return self.fail(e);
            }

            if self.stack.is_empty() {
                info!(target: "app", "State stack is empty, exiting");
                return TickControl::Exit;
            }
        }

        if let Some(statistics) = &mut self.statistics {
            statistics.record(elapsed);
        }

        self.render();
        TickControl::Continue
    }

    fn process_input(&mut self) -> TickControl {
        if self.collector.collect_frame() == TickControl::Exit {
            info!(target: "app", "Platform closed, exiting");
            return TickControl::Exit;
        }

        for event in self.collector.take_events() {
            if let InputEvent::Resized { width, height } = event {
                self.resize(SurfaceSize::new(width, height));
            }

            if let Err(e) = self.stack.handle_event(&event) {
                return self.fail(e);
            }
        }

        TickControl::Continue
    }

    fn render(&mut self) {
        self.draw_list.clear(Color::BLACK);
        self.stack.draw(&mut self.draw_list);

        if let Some(statistics) = &self.statistics {
            statistics.draw(&mut self.draw_list);
        }

        trace!(target: "app", "Frame rendered with {} draw calls", self.draw_list.len());
    }

    fn resize(&mut self, surface: SurfaceSize) {
        trace!(target: "app", "Surface resized to {}x{}", surface.width, surface.height);
        self.stack.context_mut().set_surface_size(surface);
        self.draw_list.resize(surface);
    }

    fn fail(&mut self, e: StateError) -> TickControl {
        error!(target: "app", "State stack failure: {}", e);
        self.failure = Some(e);
        TickControl::Exit
    }

    //--- Accessors --------------------------------------------------------

    /// Error that stopped the loop, if any.
    pub(crate) fn into_failure(self) -> Option<StateError> {
        self.failure
    }

    //--- Test Accessors ---------------------------------------------------

    /// Draw calls of the last rendered frame.
    #[cfg(test)]
    pub(crate) fn draw_list(&self) -> &DrawList {
        &self.draw_list
    }

    #[cfg(test)]
    pub(crate) fn stack(&self) -> &StateStack<I, D> {
        &self.stack
    }
}

impl<I: StateId, D> FrameDriver for Runtime<I, D> {
    fn frame(&mut self) -> TickControl {
        let now = Instant::now();
        let elapsed = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_frame = Some(now);

        self.advance(elapsed)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
