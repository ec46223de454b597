//! Live controls: the keyboard equivalents of the sliders and buttons.
//!
//! Keys are mapped to [`Control`]s by the window layer. Controls that only
//! nudge a setting are handled here by [`Control::adjust`]; the ones that
//! touch the canvas or the disk (undo, redo, clear, save, quit) are left to
//! the frame loop.

#[cfg(test)]
#[path = "controls_test.rs"]
mod controls_test;

use crate::session::DrawSettings;
use crate::types::Color;

pub const THRESHOLD_STEP: f32 = 0.005;
pub const THRESHOLD_MIN: f32 = 0.01;
pub const THRESHOLD_MAX: f32 = 0.12;
pub const ALPHA_STEP: f32 = 0.05;
pub const ALPHA_MAX: f32 = 0.95;
pub const WIDTH_STEP: f32 = 1.0;
pub const WIDTH_MIN: f32 = 1.0;
pub const WIDTH_MAX: f32 = 40.0;

/// Colors on keys 1-5.
pub const PALETTE: [Color; 5] = [
    Color::rgb(0xff, 0x3b, 0x6b),
    Color::rgb(0x3b, 0xc1, 0xff),
    Color::rgb(0x5c, 0xff, 0x8a),
    Color::rgb(0xff, 0xd4, 0x3b),
    Color::rgb(0xff, 0xff, 0xff),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    Undo,
    Redo,
    Clear,
    Save,
    ToggleGuides,
    TogglePointer,
    Thicker,
    Thinner,
    /// Raise the pinch threshold (pinch registers from further apart).
    Looser,
    Tighter,
    Smoother,
    Snappier,
    Palette(usize),
    Quit,
}

/// What to draw on top of the picture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewFlags {
    pub show_guides: bool,
    pub show_pointer: bool,
}

impl Default for ViewFlags {
    fn default() -> Self {
        Self { show_guides: true, show_pointer: false }
    }
}

impl Control {
    /// Nudges keep firing while the key is held; everything else fires once.
    pub fn repeats(self) -> bool {
        matches!(
            self,
            Control::Thicker
                | Control::Thinner
                | Control::Looser
                | Control::Tighter
                | Control::Smoother
                | Control::Snappier
        )
    }

    /// Apply a settings/view control. Returns false for controls the frame
    /// loop has to carry out itself.
    pub fn adjust(self, settings: &mut DrawSettings, view: &mut ViewFlags) -> bool {
        match self {
            Control::ToggleGuides => view.show_guides = !view.show_guides,
            Control::TogglePointer => view.show_pointer = !view.show_pointer,
            Control::Thicker => settings.width = (settings.width + WIDTH_STEP).min(WIDTH_MAX),
            Control::Thinner => settings.width = (settings.width - WIDTH_STEP).max(WIDTH_MIN),
            Control::Looser => {
                settings.threshold = (settings.threshold + THRESHOLD_STEP).min(THRESHOLD_MAX)
            }
            Control::Tighter => {
                settings.threshold = (settings.threshold - THRESHOLD_STEP).max(THRESHOLD_MIN)
            }
            Control::Smoother => settings.alpha = (settings.alpha + ALPHA_STEP).min(ALPHA_MAX),
            Control::Snappier => settings.alpha = (settings.alpha - ALPHA_STEP).max(0.0),
            Control::Palette(i) => match PALETTE.get(i) {
                Some(&c) => settings.color = c,
                None => return false,
            },
            Control::Undo | Control::Redo | Control::Clear | Control::Save | Control::Quit => {
                return false;
            }
        }
        true
    }
}
