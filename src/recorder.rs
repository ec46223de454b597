//! Stroke state machine: `Idle` until a pinch starts, `Drawing` while it holds.
//!
//! | From | Event | To | Effect |
//! |------|-------|----|--------|
//! | Idle | pinch | Drawing | history snapshot, remember cursor |
//! | Drawing | pinch | Drawing | segment last -> cursor |
//! | Drawing | release / hand lost | Idle | forget last point |
//! | Idle | release / hand lost | Idle | nothing |

#[cfg(test)]
#[path = "recorder_test.rs"]
mod recorder_test;

use tracing::trace;

use crate::history::History;
use crate::surface::RasterSurface;
use crate::types::{Color, ScreenPoint};

/// Color and width applied to new segments.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StrokeStyle {
    pub color: Color,
    pub width: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum StrokeState {
    #[default]
    Idle,
    Drawing { last: ScreenPoint },
}

#[derive(Debug, Default)]
pub struct StrokeRecorder {
    state: StrokeState,
}

impl StrokeRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> StrokeState {
        self.state
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, StrokeState::Drawing { .. })
    }

    /// Advance one frame with a hand in view.
    pub fn advance<S>(
        &mut self,
        pinched: bool,
        cursor: ScreenPoint,
        style: StrokeStyle,
        surface: &mut S,
        history: &mut History<S::Snapshot>,
    ) where
        S: RasterSurface,
    {
        self.state = match (self.state, pinched) {
            (StrokeState::Idle, true) => {
                // Snapshot before the first mark so undo removes the whole stroke.
                history.snapshot(&*surface);
                trace!(x = cursor.x, y = cursor.y, "stroke start");
                StrokeState::Drawing { last: cursor }
            }
            (StrokeState::Drawing { last }, true) => {
                surface.draw_line_segment(last, cursor, style.color, style.width);
                StrokeState::Drawing { last: cursor }
            }
            (StrokeState::Drawing { .. }, false) => {
                trace!("stroke end");
                StrokeState::Idle
            }
            (StrokeState::Idle, false) => StrokeState::Idle,
        };
    }

    /// No hand this frame: abort any stroke in progress.
    pub fn hand_lost(&mut self) {
        self.state = StrokeState::Idle;
    }
}
