//! Pinch detection from one hand observation.
//!
//! The decision is a bare threshold on the thumb-tip to index-tip distance,
//! measured in the same normalized space as the landmarks. There is no
//! hysteresis: noise around the threshold flips the state frame to frame.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use crate::types::{HandObservation, Landmark, ScreenPoint};

/// Default pinch threshold in normalized landmark units.
pub const DEFAULT_THRESHOLD: f32 = 0.05;

/// Euclidean distance between two landmarks.
pub fn distance(a: Landmark, b: Landmark) -> f32 {
    (a.x - b.x).hypot(a.y - b.y)
}

/// Map a normalized landmark onto a `width` x `height` pixel surface.
pub fn project(l: Landmark, width: f32, height: f32) -> ScreenPoint {
    ScreenPoint::new(l.x * width, l.y * height)
}

/// Thumb-to-index gap for this observation.
pub fn pinch_distance(hand: &HandObservation) -> f32 {
    distance(hand.thumb_tip(), hand.index_tip())
}

/// True when the fingertips are strictly closer than `threshold`.
pub fn is_pinched(hand: &HandObservation, threshold: f32) -> bool {
    pinch_distance(hand) < threshold
}
