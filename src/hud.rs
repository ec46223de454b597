// HUD text and frame-rate bookkeeping.

#[cfg(test)]
#[path = "hud_test.rs"]
mod hud_test;

use std::time::{Duration, Instant};

use crate::session::{DrawSettings, FrameFeedback};

/// Short state tag for the left of the HUD.
pub fn status_tag(fb: &FrameFeedback) -> &'static str {
    match (fb.hand_visible, fb.drawing) {
        (false, _) => "NO HAND",
        (true, true) => "DRAWING",
        (true, false) => "HOVER",
    }
}

/// One-line HUD: state, pinch gap vs threshold, smoothing, width, fps.
pub fn hud_line(fb: &FrameFeedback, settings: &DrawSettings, fps: f32) -> String {
    let gap = match fb.pinch_distance {
        Some(d) => format!("{d:.3}"),
        None => "-".into(),
    };
    format!(
        "{} | GAP {} / {:.3} | SMOOTH {:.2} | SIZE {} | FPS: {:.1}",
        status_tag(fb),
        gap,
        settings.threshold,
        settings.alpha,
        settings.width.round() as i32,
        fps
    )
}

/// Counts frames and reports the rate once per second.
pub struct FpsCounter {
    window_start: Instant,
    frames: u32,
    fps: f32,
}

impl FpsCounter {
    pub fn new(now: Instant) -> Self {
        Self { window_start: now, frames: 0, fps: 0.0 }
    }

    /// Count one frame. Returns the new rate when a second has passed.
    pub fn frame(&mut self, now: Instant) -> Option<f32> {
        self.frames += 1;
        let elapsed = now.duration_since(self.window_start);
        if elapsed < Duration::from_secs(1) {
            return None;
        }
        self.fps = self.frames as f32 / elapsed.as_secs_f32();
        self.frames = 0;
        self.window_start = now;
        Some(self.fps)
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}
