// Exponential smoothing for the fingertip cursor.

#[cfg(test)]
#[path = "smoothing_test.rs"]
mod smoothing_test;

use crate::types::ScreenPoint;

/// Holds the smoothed cursor between frames.
/// `None` means the hand was lost (or never seen), so the next update snaps.
#[derive(Debug, Default, Clone)]
pub struct CursorSmoother {
    smoothed: Option<ScreenPoint>,
}

impl CursorSmoother {
    pub fn new() -> Self {
        Self::default()
    }

    /// Blend `raw` into the cursor: `smoothed * alpha + raw * (1 - alpha)`.
    /// The first sample after a gap is taken as-is so reacquisition has no lag.
    pub fn update(&mut self, raw: ScreenPoint, alpha: f32) -> ScreenPoint {
        let next = match self.smoothed {
            None => raw,
            Some(s) => ScreenPoint::new(
                s.x * alpha + raw.x * (1.0 - alpha),
                s.y * alpha + raw.y * (1.0 - alpha),
            ),
        };
        self.smoothed = Some(next);
        next
    }

    /// Forget the cursor; called when a frame has no hand.
    pub fn reset(&mut self) {
        self.smoothed = None;
    }

    pub fn current(&self) -> Option<ScreenPoint> {
        self.smoothed
    }
}
