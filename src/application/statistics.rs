//=========================================================================
// Frame Statistics
//=========================================================================
//
// Frames per second and average frame time over one-second windows,
// shown as a small text overlay in the top-left corner.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use glam::{Affine2, Vec2};

//=== Internal Dependencies ===============================================

use crate::core::render::{RenderStates, RenderTarget};
use crate::core::resources::ResourceId;
use crate::core::scene::TextNode;

//=== Constants ===========================================================

/// Font the overlay is drawn with. Load a font under this id to see it.
pub const STATISTICS_FONT: ResourceId = ResourceId::new("statistics");

const WINDOW: Duration = Duration::from_secs(1);
const OVERLAY_OFFSET: Vec2 = Vec2::new(5.0, 5.0);
const OVERLAY_TEXT_SIZE: u32 = 20;

//=== FrameStatistics =====================================================

#[derive(Debug)]
pub struct FrameStatistics {
    elapsed: Duration,
    frames: u32,
    text: TextNode,
}

impl FrameStatistics {
    pub fn new() -> Self {
        Self {
            elapsed: Duration::ZERO,
            frames: 0,
            text: TextNode::new(STATISTICS_FONT, "").with_size(OVERLAY_TEXT_SIZE),
        }
    }

    /// Counts one frame that took `elapsed`; refreshes the text once a
    /// full second has been recorded.
    pub fn record(&mut self, elapsed: Duration) {
        self.elapsed += elapsed;
        self.frames += 1;

        if self.elapsed >= WINDOW {
            let per_frame = self.elapsed.as_micros() / u128::from(self.frames);
            self.text.set_string(format!(
                "Frames/Second = {}\nTime/Update = {}us",
                self.frames, per_frame
            ));

            self.elapsed -= WINDOW;
            self.frames = 0;
        }
    }

    /// Current overlay text (empty until the first window completes).
    pub fn text(&self) -> &str {
        self.text.string()
    }

    pub fn draw(&self, target: &mut dyn RenderTarget) {
        if self.text().is_empty() {
            return;
        }

        let states = RenderStates {
            transform: Affine2::from_translation(OVERLAY_OFFSET),
        };
        target.draw(&self.text.primitive(), &states);
    }
}

impl Default for FrameStatistics {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::render::{DrawList, Primitive, SurfaceSize};

    #[test]
    fn text_is_empty_before_first_second() {
        let mut stats = FrameStatistics::new();
        for _ in 0..10 {
            stats.record(Duration::from_millis(16));
        }
        assert_eq!(stats.text(), "");
    }

    #[test]
    fn reports_frames_and_average_time() {
        let mut stats = FrameStatistics::new();
        for _ in 0..4 {
            stats.record(Duration::from_millis(250));
        }

        assert_eq!(stats.text(), "Frames/Second = 4\nTime/Update = 250000us");
    }

    #[test]
    fn overflow_carries_into_next_window() {
        let mut stats = FrameStatistics::new();
        stats.record(Duration::from_millis(1500));
        assert_eq!(stats.text(), "Frames/Second = 1\nTime/Update = 1500000us");

        stats.record(Duration::from_millis(500));
        assert_eq!(stats.text(), "Frames/Second = 1\nTime/Update = 1000000us");
    }

    #[test]
    fn draw_emits_text_only_once_available() {
        let mut stats = FrameStatistics::new();
        let mut target = DrawList::new(SurfaceSize::new(640, 480));

        stats.draw(&mut target);
        assert!(target.is_empty());

        stats.record(Duration::from_secs(1));
        stats.draw(&mut target);

        assert_eq!(target.len(), 1);
        let call = &target.calls()[0];
        assert!(matches!(call.primitive, Primitive::Text { font, .. } if font == STATISTICS_FONT));
        assert_eq!(call.transform.translation, OVERLAY_OFFSET);
    }
}
