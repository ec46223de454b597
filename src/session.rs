//! One drawing session: the paint layer plus everything that mutates it.
//!
//! The frame loop owns a [`DrawSession`] and calls [`DrawSession::tick`] once
//! per displayed frame with whatever the landmark source has. Nothing in here
//! blocks or spawns; the session is the only writer to its surface and
//! history.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use crate::gesture::{self, DEFAULT_THRESHOLD};
use crate::history::History;
use crate::recorder::{StrokeRecorder, StrokeStyle};
use crate::smoothing::CursorSmoother;
use crate::surface::RasterSurface;
use crate::types::{Color, HandObservation, ScreenPoint};

pub const DEFAULT_ALPHA: f32 = 0.5;
pub const DEFAULT_STROKE_WIDTH: f32 = 6.0;
pub const DEFAULT_COLOR: Color = Color::rgb(0xff, 0x3b, 0x6b);

/// Knobs read every tick. Change them at any time; the next tick uses them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawSettings {
    /// Pinch cutoff in normalized landmark units.
    pub threshold: f32,
    /// Smoothing weight of the previous cursor, in [0, 1).
    pub alpha: f32,
    pub color: Color,
    /// Stroke width in surface pixels.
    pub width: f32,
}

impl Default for DrawSettings {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            alpha: DEFAULT_ALPHA,
            color: DEFAULT_COLOR,
            width: DEFAULT_STROKE_WIDTH,
        }
    }
}

impl DrawSettings {
    /// Same settings pulled back into their valid ranges.
    pub fn sanitized(self) -> Self {
        Self {
            threshold: if self.threshold > 0.0 { self.threshold } else { f32::EPSILON },
            alpha: if self.alpha.is_nan() { DEFAULT_ALPHA } else { self.alpha.clamp(0.0, 0.99) },
            color: self.color,
            width: if self.width >= 1.0 { self.width } else { 1.0 },
        }
    }

    pub fn style(&self) -> StrokeStyle {
        StrokeStyle { color: self.color, width: self.width }
    }
}

/// What the UI may show after a tick. Purely observational.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameFeedback {
    pub hand_visible: bool,
    pub pinched: bool,
    pub drawing: bool,
    /// Smoothed cursor; `None` when no hand is in view.
    pub cursor: Option<ScreenPoint>,
    /// Raw thumb-to-index distance, for the HUD.
    pub pinch_distance: Option<f32>,
}

pub struct DrawSession<S: RasterSurface> {
    surface: S,
    history: History<S::Snapshot>,
    smoother: CursorSmoother,
    recorder: StrokeRecorder,
    pub settings: DrawSettings,
}

impl<S: RasterSurface> DrawSession<S> {
    pub fn new(surface: S, settings: DrawSettings) -> Self {
        Self {
            surface,
            history: History::new(),
            smoother: CursorSmoother::new(),
            recorder: StrokeRecorder::new(),
            settings,
        }
    }

    /// Run the per-frame pipeline for one observation (or the lack of one).
    pub fn tick(&mut self, hand: Option<&HandObservation>) -> FrameFeedback {
        let Some(hand) = hand else {
            self.smoother.reset();
            self.recorder.hand_lost();
            return FrameFeedback::default();
        };

        let settings = self.settings.sanitized();
        let pinch_distance = gesture::pinch_distance(hand);
        let pinched = gesture::is_pinched(hand, settings.threshold);

        let raw = gesture::project(
            hand.index_tip(),
            self.surface.width() as f32,
            self.surface.height() as f32,
        );
        let cursor = self.smoother.update(raw, settings.alpha);

        self.recorder
            .advance(pinched, cursor, settings.style(), &mut self.surface, &mut self.history);

        FrameFeedback {
            hand_visible: true,
            pinched,
            drawing: self.recorder.is_drawing(),
            cursor: Some(cursor),
            pinch_distance: Some(pinch_distance),
        }
    }

    pub fn undo(&mut self) {
        self.history.undo(&mut self.surface);
    }

    pub fn redo(&mut self) {
        self.history.redo(&mut self.surface);
    }

    pub fn clear(&mut self) {
        self.history.clear(&mut self.surface);
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn history(&self) -> &History<S::Snapshot> {
        &self.history
    }

    pub fn is_drawing(&self) -> bool {
        self.recorder.is_drawing()
    }
}
