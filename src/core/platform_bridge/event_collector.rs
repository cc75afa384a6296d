//=========================================================================
// Event Collector
//=========================================================================
//
// Drains platform events with a per-frame bound and shutdown detection.
//
// Architecture:
//   Receiver<PlatformEvent> → collect_frame() → events → TickControl
//
// Within a batch, discrete events keep their order and come before the
// coalesced continuous ones.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{Receiver, TryRecvError};
use log::warn;

//=== Internal Dependencies ===============================================

use super::{PlatformEvent, TickControl};
use crate::core::input::InputEvent;

//=== EventCollector ======================================================

/// Collects platform events into one ordered list per tick.
pub(crate) struct EventCollector {
    receiver: Receiver<PlatformEvent>,
    events: Vec<InputEvent>,
}

impl EventCollector {
    /// Upper bound on channel messages drained by one `collect_frame`.
    const MAX_EVENTS_PER_FRAME: usize = 100;

    pub(crate) fn new(receiver: Receiver<PlatformEvent>) -> Self {
        Self {
            receiver,
            events: Vec::with_capacity(16),
        }
    }

    /// Drains pending platform events (bounded to prevent starvation).
    ///
    /// Returns `Exit` when the window was closed or the platform side of
    /// the channel is gone.
    pub(crate) fn collect_frame(&mut self) -> TickControl {
        self.events.clear();
        let mut drained = 0;

        while drained < Self::MAX_EVENTS_PER_FRAME {
            match self.receiver.try_recv() {
                Ok(PlatformEvent::Inputs { discrete, continuous }) => {
                    self.events.extend(discrete);
                    self.events.extend(continuous);
                    drained += 1;
                }
                Ok(PlatformEvent::WindowClosed) => return TickControl::Exit,
                Err(TryRecvError::Disconnected) => return TickControl::Exit,
                Err(TryRecvError::Empty) => break,
            }
        }

        if drained >= Self::MAX_EVENTS_PER_FRAME {
            warn!(
                target: "platform",
                "Event queue backlog: drained {} batches this frame",
                drained
            );
        }

        TickControl::Continue
    }

    /// Events collected by the last `collect_frame`.
    #[cfg(test)]
    pub(crate) fn events(&self) -> &[InputEvent] {
        &self.events
    }

    /// Takes the collected events, leaving an empty list behind.
    pub(crate) fn take_events(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::input::KeyCode;
    use crossbeam_channel::unbounded;

    fn inputs(discrete: Vec<InputEvent>, continuous: Vec<InputEvent>) -> PlatformEvent {
        PlatformEvent::Inputs {
            discrete,
            continuous,
        }
    }

    #[test]
    fn collect_handles_empty_queue() {
        let (_tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        assert_eq!(collector.collect_frame(), TickControl::Continue);
        assert!(collector.events().is_empty());
    }

    #[test]
    fn collect_preserves_batch_order() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(inputs(
            vec![InputEvent::key_down(KeyCode::KeyA)],
            vec![InputEvent::MouseMoved { x: 1.0, y: 2.0 }],
        ))
        .unwrap();
        tx.send(inputs(vec![InputEvent::key_up(KeyCode::KeyA)], vec![]))
            .unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Continue);

        let events = collector.events();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].pressed_key(), Some(KeyCode::KeyA));
        assert!(events[1].is_continuous());
        assert_eq!(events[2].released_key(), Some(KeyCode::KeyA));
    }

    #[test]
    fn collect_returns_exit_on_window_closed() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(PlatformEvent::WindowClosed).unwrap();

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }

    #[test]
    fn collect_clears_previous_events() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(inputs(vec![InputEvent::key_down(KeyCode::Space)], vec![]))
            .unwrap();
        collector.collect_frame();
        assert_eq!(collector.events().len(), 1);

        collector.collect_frame();
        assert!(collector.events().is_empty());
    }

    #[test]
    fn collect_is_bounded_per_frame() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        for _ in 0..EventCollector::MAX_EVENTS_PER_FRAME + 5 {
            tx.send(inputs(vec![InputEvent::key_down(KeyCode::KeyB)], vec![]))
                .unwrap();
        }

        collector.collect_frame();
        assert_eq!(collector.events().len(), EventCollector::MAX_EVENTS_PER_FRAME);

        collector.collect_frame();
        assert_eq!(collector.events().len(), 5);
    }

    #[test]
    fn take_events_empties_collector() {
        let (tx, rx) = unbounded();
        let mut collector = EventCollector::new(rx);

        tx.send(inputs(vec![InputEvent::FocusLost], vec![])).unwrap();
        collector.collect_frame();

        let events = collector.take_events();
        assert_eq!(events, vec![InputEvent::FocusLost]);
        assert!(collector.events().is_empty());
    }

    #[test]
    fn collect_returns_exit_on_disconnect() {
        let (tx, rx) = unbounded::<PlatformEvent>();
        let mut collector = EventCollector::new(rx);

        drop(tx);

        assert_eq!(collector.collect_frame(), TickControl::Exit);
    }
}
